//! 0/1 integer linear programming solvers.
//!
//! # Key Components
//!
//! - **Interface**: [`IlpSolver`] trait, [`SolverConfig`], [`IlpSolution`]
//! - **Engine**: [`BranchAndBoundSolver`]: exact depth-first branch and bound
//! - **Diagnosis**: [`conflicting_constraints`]: irreducible infeasible subset
//!
//! # Design
//!
//! Solvers receive an immutable [`LineupModel`](crate::model::LineupModel)
//! and know nothing about players. The [`IlpSolver`] trait allows plugging in
//! an external MIP solver in place of the built-in search.
//!
//! # References
//!
//! Wolsey (1998), "Integer Programming", ch. 7 (branch and bound).
//! Chinneck (2008), "Feasibility and Infeasibility in Optimization", ch. 6.

mod branch_bound;
mod diagnose;
mod types;

pub use branch_bound::BranchAndBoundSolver;
pub use diagnose::conflicting_constraints;
pub use types::{IlpSolution, IlpSolver, SolutionAssignment, SolveStatus, SolverConfig};
