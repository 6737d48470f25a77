//! Lineup pipeline: build the model, solve it, read the players back.
//!
//! # Key Components
//!
//! - [`LineupOptimizer`]: one synchronous build → solve → extract run
//! - [`extract`]: joins a solver assignment back to player records
//! - [`Lineup`], [`SelectedPlayer`]: serializable result with a text report

mod extract;
mod optimizer;

pub use extract::{extract, Lineup, SelectedPlayer};
pub use optimizer::LineupOptimizer;
