//! Daily fantasy lineup selection as a 0/1 integer linear program.
//!
//! Given a slate of players with salaries and projected points, picks the
//! roster that maximizes projected points under a salary cap, offense and
//! defense head counts, a running-back minimum and an efficiency filter on
//! running backs.
//!
//! - **Catalog**: validated player records, CSV ingestion, synthetic slates.
//! - **Model**: one binary variable per player, a projected-points objective
//!   and declarative [`LineupRule`](model::LineupRule)s folded into linear
//!   constraints. Renders as LP text.
//! - **Solver**: the [`IlpSolver`](solver::IlpSolver) trait and an exact
//!   branch-and-bound engine, plus infeasibility diagnosis.
//! - **Lineup**: the [`LineupOptimizer`](lineup::LineupOptimizer) pipeline
//!   and result extraction.
//!
//! # Architecture
//!
//! Data flows one way: catalog → model → solver → lineup. The model is an
//! immutable value; solvers never see player records, and extraction never
//! sees the solver's internals.

pub mod catalog;
pub mod error;
pub mod lineup;
pub mod logging;
pub mod model;
pub mod solver;

pub use error::LineupError;
