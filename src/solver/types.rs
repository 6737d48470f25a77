//! Solver interface types.

use crate::model::{LineupModel, VarId};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Status of the solver after execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    /// Proven optimal solution found.
    Optimal,
    /// Feasible solution found, optimality not proven (`stop_after_first`).
    Feasible,
    /// No assignment satisfies every constraint.
    Infeasible,
    /// Objective can grow without limit. Not reachable for binary models
    /// with finite coefficients; part of the contract for completeness.
    Unbounded,
    /// Model is invalid or malformed.
    ModelInvalid,
    /// Solver exceeded its time limit.
    Timeout,
    /// Cancelled through the caller's flag.
    Cancelled,
}

/// A 0/1 value for every variable plus the objective it achieves.
#[derive(Debug, Clone, PartialEq)]
pub struct SolutionAssignment {
    /// Value of each variable, keyed by id.
    pub values: BTreeMap<VarId, bool>,
    /// Objective value as computed by the solver.
    pub objective_value: f64,
}

impl SolutionAssignment {
    /// Variables set to 1, in id order.
    pub fn selected(&self) -> impl Iterator<Item = VarId> + '_ {
        self.values
            .iter()
            .filter(|(_, on)| **on)
            .map(|(&id, _)| id)
    }

    pub fn is_selected(&self, id: VarId) -> bool {
        self.values.get(&id).copied().unwrap_or(false)
    }
}

/// Solution from an ILP solver.
#[derive(Debug, Clone)]
pub struct IlpSolution {
    /// Solver status.
    pub status: SolveStatus,
    /// Best assignment found, if any.
    pub assignment: Option<SolutionAssignment>,
    /// Search nodes visited.
    pub nodes_explored: u64,
    /// Solve time in milliseconds.
    pub solve_time_ms: u64,
}

impl IlpSolution {
    /// Creates an empty solution with the given status.
    pub fn empty(status: SolveStatus) -> Self {
        Self {
            status,
            assignment: None,
            nodes_explored: 0,
            solve_time_ms: 0,
        }
    }

    /// Whether a feasible assignment was found and returned as the answer.
    pub fn is_solution_found(&self) -> bool {
        matches!(self.status, SolveStatus::Optimal | SolveStatus::Feasible)
            && self.assignment.is_some()
    }

    pub fn objective_value(&self) -> Option<f64> {
        self.assignment.as_ref().map(|a| a.objective_value)
    }
}

/// Solver configuration.
///
/// # Examples
///
/// ```
/// use lineup_ilp::solver::SolverConfig;
/// use std::time::Duration;
///
/// let config = SolverConfig::default().with_time_limit(Duration::from_secs(5));
/// assert_eq!(config.time_limit, Some(Duration::from_secs(5)));
/// assert!(!config.stop_after_first);
/// ```
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Maximum wall-clock time; `None` searches to completion.
    pub time_limit: Option<Duration>,
    /// Stop after finding the first feasible solution.
    pub stop_after_first: bool,
    /// Absolute tolerance for constraint checks and objective comparisons.
    pub tolerance: f64,
    /// Cancellation flag polled during the search.
    pub cancel: Option<Arc<AtomicBool>>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            time_limit: Some(Duration::from_secs(60)),
            stop_after_first: false,
            tolerance: 1e-6,
            cancel: None,
        }
    }
}

impl SolverConfig {
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    pub fn without_time_limit(mut self) -> Self {
        self.time_limit = None;
        self
    }

    pub fn with_stop_after_first(mut self, stop: bool) -> Self {
        self.stop_after_first = stop;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_cancel(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(format!(
                "tolerance must be a non-negative number, got {}",
                self.tolerance
            ));
        }
        Ok(())
    }
}

/// Trait for 0/1 ILP solver implementations.
///
/// Implementors receive an immutable model and return either a single
/// assignment or a terminal status. They may wrap an external MIP solver or
/// search on their own; the caller makes no assumption about the algorithm.
pub trait IlpSolver {
    /// Solves the model and returns a solution.
    fn solve(&self, model: &LineupModel, config: &SolverConfig) -> IlpSolution;
}
