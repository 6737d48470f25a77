//! Lineup model construction.
//!
//! Turns a [`PlayerCatalog`](crate::catalog::PlayerCatalog) into a 0/1
//! integer linear program.
//!
//! # Key Components
//!
//! - **Variables**: [`DecisionVariableSet`]: one binary variable per player
//! - **Expressions**: [`LinearExpr`], [`Constraint`], [`Objective`]
//! - **Rules**: [`LineupRule`]: declarative per-player contributions to one
//!   constraint; [`standard_rules`] yields the built-in roster rules
//! - **Model**: [`LineupModel`]: objective plus constraints, built by a
//!   single fold over the catalog
//! - **Config**: [`LineupConfig`]: salary cap, role targets, thresholds
//!
//! # Design
//!
//! This module defines the modeling layer only. Solving is delegated to an
//! [`IlpSolver`](crate::solver::IlpSolver) implementation.

mod config;
mod expr;
mod lineup_model;
pub mod rules;
mod variables;

pub use config::LineupConfig;
pub use expr::{Comparison, Constraint, LinearExpr, Objective, Sense};
pub use lineup_model::{LineupModel, PROJECTED_POINTS};
pub use rules::{
    standard_rules, ExcludeUnderperformingRunningBacks, LineupRule, MinRunningBacks,
    PredicateRule, RoleCount, SalaryCap,
};
pub use variables::{DecisionVariable, DecisionVariableSet, VarId};
