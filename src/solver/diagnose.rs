//! Infeasibility diagnosis.
//!
//! Finds an irreducible infeasible subset (IIS) of constraints with a
//! deletion filter: drop each constraint in turn and keep it out if the rest
//! stays infeasible. What remains is infeasible, and removing any single
//! member makes it feasible.

use super::types::{IlpSolver, SolveStatus, SolverConfig};
use crate::model::LineupModel;
use std::time::Instant;
use tracing::{debug, warn};

/// Labels of a minimal set of constraints that cannot hold together.
///
/// Each check solves a feasibility-only copy of the model. All checks share
/// one deadline, `config.time_limit` from the call: each gets only what is
/// left of it. A check that ends without a verdict keeps its constraint, and
/// once the deadline passes the constraints still kept are returned as they
/// are, so the result is always infeasible but may not be minimal. Returns
/// an empty list if the model turns out to be feasible.
pub fn conflicting_constraints<S: IlpSolver + ?Sized>(
    solver: &S,
    model: &LineupModel,
    config: &SolverConfig,
) -> Vec<String> {
    let deadline = config
        .time_limit
        .and_then(|limit| Instant::now().checked_add(limit));
    let expired = || deadline.is_some_and(|d| Instant::now() >= d) || config.is_cancelled();
    let base = model.feasibility_only();

    // Some(true) when infeasible, None when the check gave no verdict.
    let is_infeasible = |indices: &[usize]| -> Option<bool> {
        let mut check_config = config.clone().with_stop_after_first(true);
        if let Some(deadline) = deadline {
            let left = deadline.saturating_duration_since(Instant::now());
            if left.is_zero() {
                return None;
            }
            check_config = check_config.with_time_limit(left);
        }
        match solver.solve(&base.with_constraint_subset(indices), &check_config).status {
            SolveStatus::Infeasible => Some(true),
            SolveStatus::Optimal | SolveStatus::Feasible => Some(false),
            _ => None,
        }
    };

    let mut kept: Vec<usize> = (0..model.constraint_count()).collect();
    if is_infeasible(&kept) == Some(false) {
        return Vec::new();
    }

    let mut i = 0;
    while i < kept.len() {
        let candidate: Vec<usize> = kept
            .iter()
            .enumerate()
            .filter(|&(k, _)| k != i)
            .map(|(_, &c)| c)
            .collect();
        match is_infeasible(&candidate) {
            Some(true) => {
                debug!(constraint = %model.constraints[kept[i]].label, "not needed for conflict");
                kept = candidate;
            }
            Some(false) => i += 1,
            None if expired() => {
                warn!(
                    kept = kept.len(),
                    unchecked = kept.len() - i,
                    "diagnosis budget exhausted, conflict may not be minimal"
                );
                break;
            }
            None => i += 1,
        }
    }

    kept.into_iter()
        .map(|c| model.constraints[c].label.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{PlayerCatalog, PlayerId, PlayerRecord, Position};
    use crate::model::{rules, standard_rules, DecisionVariableSet, LineupConfig};
    use crate::solver::BranchAndBoundSolver;
    use std::time::Duration;

    fn model(records: Vec<PlayerRecord>, config: &LineupConfig) -> LineupModel {
        let catalog = PlayerCatalog::from_records(records).unwrap();
        let variables = DecisionVariableSet::from_catalog(&catalog, true).unwrap();
        LineupModel::build("diag", &catalog, variables, &standard_rules(config)).unwrap()
    }

    fn abc() -> Vec<PlayerRecord> {
        vec![
            PlayerRecord::new(PlayerId(0), Position::Qb, "A", 10_000.0, 20.0),
            PlayerRecord::new(PlayerId(1), Position::Wr, "B", 20_000.0, 25.0),
            PlayerRecord::new(PlayerId(2), Position::Te, "C", 5_000.0, 10.0),
        ]
    }

    #[test]
    fn test_cap_and_count_conflict() {
        let config = LineupConfig::default()
            .with_salary_cap(14_000.0)
            .with_offense_count(2)
            .with_defense_count(0)
            .with_min_running_backs(0);
        let conflict = conflicting_constraints(
            &BranchAndBoundSolver::new(),
            &model(abc(), &config),
            &SolverConfig::default(),
        );
        assert_eq!(conflict, vec![rules::SALARY_CAP, rules::OFFENSE_COUNT]);
    }

    #[test]
    fn test_single_constraint_conflict() {
        // no defensive players at all
        let config = LineupConfig::default()
            .with_offense_count(2)
            .with_defense_count(1)
            .with_min_running_backs(0);
        let conflict = conflicting_constraints(
            &BranchAndBoundSolver::new(),
            &model(abc(), &config),
            &SolverConfig::default(),
        );
        assert_eq!(conflict, vec![rules::DEFENSE_COUNT]);
    }

    #[test]
    fn test_feasible_model_has_no_conflict() {
        let config = LineupConfig::default()
            .with_salary_cap(30_000.0)
            .with_offense_count(2)
            .with_defense_count(0)
            .with_min_running_backs(0);
        let conflict = conflicting_constraints(
            &BranchAndBoundSolver::new(),
            &model(abc(), &config),
            &SolverConfig::default(),
        );
        assert!(conflict.is_empty());
    }

    #[test]
    fn test_exhausted_budget_keeps_every_constraint() {
        let config = LineupConfig::default()
            .with_salary_cap(14_000.0)
            .with_offense_count(2)
            .with_defense_count(0)
            .with_min_running_backs(0);
        let m = model(abc(), &config);
        let conflict = conflicting_constraints(
            &BranchAndBoundSolver::new(),
            &m,
            &SolverConfig::default().with_time_limit(Duration::ZERO),
        );
        let all: Vec<&str> = m.constraints.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(conflict, all);
    }
}
