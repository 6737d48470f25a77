//! Player catalog: validated player records for one slate.
//!
//! # Key Components
//!
//! - [`PlayerRecord`], [`Position`], [`RoleClass`], [`PlayerId`]: player data
//! - [`PlayerCatalog`]: ordered, validated collection keyed by [`PlayerId`]
//! - [`ingest`]: positional CSV reader for salary files
//! - [`synthetic`]: seeded slate generator for benchmarks and tests

mod collection;
pub mod ingest;
pub mod synthetic;
mod types;

pub use collection::PlayerCatalog;
pub use ingest::RawPlayerRow;
pub use types::{PlayerId, PlayerRecord, Position, RoleClass};
