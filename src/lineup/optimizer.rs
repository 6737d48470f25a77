//! Build, solve, extract.

use super::extract::{extract, Lineup};
use crate::catalog::PlayerCatalog;
use crate::error::LineupError;
use crate::model::{standard_rules, DecisionVariableSet, LineupConfig, LineupModel, LineupRule};
use crate::solver::{conflicting_constraints, BranchAndBoundSolver, IlpSolver, SolveStatus, SolverConfig};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Runs one lineup optimization over a catalog.
///
/// Starts from the built-in roster rules for its [`LineupConfig`]; extra
/// rules can be appended with [`with_rule`](Self::with_rule). The solver is
/// pluggable through the [`IlpSolver`] trait.
///
/// # Examples
///
/// ```
/// use lineup_ilp::catalog::{PlayerCatalog, PlayerId, PlayerRecord, Position};
/// use lineup_ilp::lineup::LineupOptimizer;
/// use lineup_ilp::model::LineupConfig;
///
/// let catalog = PlayerCatalog::from_records(vec![
///     PlayerRecord::new(PlayerId(0), Position::Qb, "A", 10_000.0, 20.0),
///     PlayerRecord::new(PlayerId(1), Position::Wr, "B", 20_000.0, 25.0),
///     PlayerRecord::new(PlayerId(2), Position::Te, "C", 5_000.0, 10.0),
/// ])
/// .unwrap();
/// let config = LineupConfig::default()
///     .with_salary_cap(30_000.0)
///     .with_offense_count(2)
///     .with_defense_count(0)
///     .with_min_running_backs(0);
///
/// let lineup = LineupOptimizer::new(config).optimize(&catalog).unwrap();
/// assert_eq!(lineup.names(), vec!["A", "B"]);
/// assert_eq!(lineup.objective_value, 45.0);
/// assert_eq!(lineup.total_salary, 30_000.0);
/// ```
pub struct LineupOptimizer<S = BranchAndBoundSolver> {
    config: LineupConfig,
    rules: Vec<Box<dyn LineupRule>>,
    solver: S,
    solver_config: SolverConfig,
}

impl LineupOptimizer<BranchAndBoundSolver> {
    pub fn new(config: LineupConfig) -> Self {
        Self {
            rules: standard_rules(&config),
            config,
            solver: BranchAndBoundSolver::new(),
            solver_config: SolverConfig::default(),
        }
    }
}

impl<S: IlpSolver> LineupOptimizer<S> {
    /// Replaces the solver, keeping config and rules.
    pub fn with_solver<T: IlpSolver>(self, solver: T) -> LineupOptimizer<T> {
        LineupOptimizer {
            config: self.config,
            rules: self.rules,
            solver,
            solver_config: self.solver_config,
        }
    }

    pub fn with_solver_config(mut self, solver_config: SolverConfig) -> Self {
        self.solver_config = solver_config;
        self
    }

    /// Appends a rule after the built-in ones.
    pub fn with_rule(mut self, rule: impl LineupRule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Validates the config and builds the model for `catalog`.
    pub fn build_model(&self, catalog: &PlayerCatalog) -> Result<LineupModel, LineupError> {
        self.config.validate().map_err(LineupError::InvalidConfig)?;
        let variables = DecisionVariableSet::from_catalog(catalog, self.config.unique_names)?;
        let model = LineupModel::build("lineup", catalog, variables, &self.rules)?;
        model.validate().map_err(LineupError::InvalidModel)?;

        debug!(
            variables = model.variable_count(),
            constraints = model.constraint_count(),
            "model built"
        );
        Ok(model)
    }

    /// Builds the model, solves it and extracts the lineup.
    ///
    /// The solver config's time limit covers the whole call: infeasibility
    /// diagnosis only gets what the main solve left over.
    pub fn optimize(&self, catalog: &PlayerCatalog) -> Result<Lineup, LineupError> {
        let model = self.build_model(catalog)?;
        self.solver_config
            .validate()
            .map_err(LineupError::InvalidConfig)?;

        let started = Instant::now();
        let solution = self.solver.solve(&model, &self.solver_config);
        match solution.status {
            SolveStatus::Optimal | SolveStatus::Feasible => {}
            SolveStatus::Infeasible => {
                let conflicting = if self.config.diagnose_infeasible {
                    let mut budget = self.solver_config.clone();
                    if let Some(limit) = budget.time_limit {
                        budget = budget.with_time_limit(limit.saturating_sub(started.elapsed()));
                    }
                    conflicting_constraints(&self.solver, &model, &budget)
                } else {
                    Vec::new()
                };
                warn!(?conflicting, "no feasible lineup");
                return Err(LineupError::Infeasible { conflicting });
            }
            SolveStatus::Timeout => {
                warn!(
                    elapsed_ms = solution.solve_time_ms,
                    nodes = solution.nodes_explored,
                    "solver timed out"
                );
                return Err(LineupError::Timeout {
                    elapsed_ms: solution.solve_time_ms,
                });
            }
            SolveStatus::Cancelled => return Err(LineupError::Cancelled),
            SolveStatus::Unbounded => return Err(LineupError::Unbounded),
            SolveStatus::ModelInvalid => {
                return Err(LineupError::InvalidModel(
                    "solver rejected the model".to_string(),
                ))
            }
        }

        let lineup = extract(catalog, &model, &solution)?;
        info!(
            players = lineup.len(),
            points = lineup.objective_value,
            salary = lineup.total_salary,
            optimal = lineup.proven_optimal,
            nodes = solution.nodes_explored,
            elapsed_ms = solution.solve_time_ms,
            "lineup selected"
        );
        Ok(lineup)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{PlayerId, PlayerRecord, Position, RoleClass};
    use crate::model::{rules, Comparison, PredicateRule, VarId};
    use crate::solver::{IlpSolution, SolutionAssignment};
    use std::sync::atomic::AtomicBool;
    use std::sync::Arc;
    use std::time::Duration;

    fn abc() -> PlayerCatalog {
        PlayerCatalog::from_records(vec![
            PlayerRecord::new(PlayerId(0), Position::Qb, "A", 10_000.0, 20.0),
            PlayerRecord::new(PlayerId(1), Position::Wr, "B", 20_000.0, 25.0),
            PlayerRecord::new(PlayerId(2), Position::Te, "C", 5_000.0, 10.0),
        ])
        .unwrap()
    }

    fn two_offense(cap: f64) -> LineupConfig {
        LineupConfig::default()
            .with_salary_cap(cap)
            .with_offense_count(2)
            .with_defense_count(0)
            .with_min_running_backs(0)
    }

    fn slate() -> PlayerCatalog {
        PlayerCatalog::from_records(vec![
            PlayerRecord::new(PlayerId(0), Position::Qb, "Tom Brady", 11_000.0, 24.0)
                .with_team("NE"),
            PlayerRecord::new(PlayerId(1), Position::Qb, "Nick Foles", 9_000.0, 19.0)
                .with_team("PHI"),
            PlayerRecord::new(PlayerId(2), Position::Rb, "Jay Ajayi", 7_800.0, 13.0)
                .with_team("PHI")
                .with_rushing(184.0, 873.0, 4.7),
            PlayerRecord::new(PlayerId(3), Position::Rb, "Dion Lewis", 6_400.0, 14.0)
                .with_team("NE")
                .with_rushing(180.0, 896.0, 5.0),
            PlayerRecord::new(PlayerId(4), Position::Rb, "LeGarrette Blount", 5_800.0, 16.0)
                .with_team("PHI")
                .with_rushing(173.0, 766.0, 4.4),
            PlayerRecord::new(PlayerId(5), Position::Rb, "James White", 5_200.0, 15.0)
                .with_team("NE")
                .with_rushing(43.0, 171.0, 4.0),
            PlayerRecord::new(PlayerId(6), Position::Wr, "Brandin Cooks", 8_800.0, 15.0)
                .with_team("NE"),
            PlayerRecord::new(PlayerId(7), Position::Te, "Rob Gronkowski", 9_600.0, 17.0)
                .with_team("NE"),
            PlayerRecord::new(PlayerId(8), Position::Dst, "Eagles", 4_000.0, 7.0)
                .with_team("PHI"),
            PlayerRecord::new(PlayerId(9), Position::Dst, "Patriots", 4_200.0, 8.0)
                .with_team("NE"),
            PlayerRecord::new(PlayerId(10), Position::K, "Jake Elliott", 3_800.0, 6.0)
                .with_team("PHI"),
        ])
        .unwrap()
    }

    #[test]
    fn test_example_lineup() {
        let lineup = LineupOptimizer::new(two_offense(30_000.0))
            .optimize(&abc())
            .unwrap();
        assert_eq!(lineup.names(), vec!["A", "B"]);
        assert_eq!(lineup.objective_value, 45.0);
        assert_eq!(lineup.total_salary, 30_000.0);
        assert!(lineup.proven_optimal);
    }

    #[test]
    fn test_example_infeasible_is_diagnosed() {
        let err = LineupOptimizer::new(two_offense(14_000.0))
            .optimize(&abc())
            .unwrap_err();
        match err {
            LineupError::Infeasible { conflicting } => {
                assert_eq!(conflicting, vec![rules::SALARY_CAP, rules::OFFENSE_COUNT]);
            }
            other => panic!("expected Infeasible, got {other:?}"),
        }
    }

    #[test]
    fn test_infeasible_without_diagnosis() {
        let config = two_offense(14_000.0).with_diagnose_infeasible(false);
        let err = LineupOptimizer::new(config).optimize(&abc()).unwrap_err();
        assert!(matches!(err, LineupError::Infeasible { conflicting } if conflicting.is_empty()));
    }

    #[test]
    fn test_standard_roster() {
        crate::logging::init_test();
        let lineup = LineupOptimizer::new(LineupConfig::default())
            .optimize(&slate())
            .unwrap();

        let offense = lineup
            .players
            .iter()
            .filter(|p| p.role_class == RoleClass::Offense)
            .count();
        let backs = lineup
            .players
            .iter()
            .filter(|p| p.position == Position::Rb)
            .count();
        assert_eq!(lineup.len(), 6);
        assert_eq!(offense, 4);
        assert!(backs >= 2);
        assert!(lineup.total_salary <= 50_000.0);
        // fewer than 100 attempts
        assert!(!lineup.contains("James White"));
        assert!(lineup.contains("Patriots"));
        assert!(lineup.contains("Eagles"));
        assert_eq!(lineup.objective_value, 88.0);
    }

    #[test]
    fn test_custom_rule() {
        let no_qb = PredicateRule::new("no_qb", Comparison::Eq, 0.0, |p: &PlayerRecord| {
            (p.position == Position::Qb).then_some(1.0)
        });
        let lineup = LineupOptimizer::new(two_offense(30_000.0))
            .with_rule(no_qb)
            .optimize(&abc())
            .unwrap();
        assert_eq!(lineup.names(), vec!["B", "C"]);
        assert_eq!(lineup.objective_value, 35.0);
    }

    #[test]
    fn test_duplicate_rule_label() {
        let again = PredicateRule::new(rules::SALARY_CAP, Comparison::Le, 1.0, |_: &PlayerRecord| {
            None
        });
        let err = LineupOptimizer::new(two_offense(30_000.0))
            .with_rule(again)
            .build_model(&abc())
            .unwrap_err();
        assert!(matches!(err, LineupError::InvalidModel(_)));
    }

    #[test]
    fn test_duplicate_names() {
        let catalog = PlayerCatalog::from_records(vec![
            PlayerRecord::new(PlayerId(0), Position::Wr, "Same", 5_000.0, 10.0),
            PlayerRecord::new(PlayerId(1), Position::Wr, "Same", 6_000.0, 12.0),
        ])
        .unwrap();

        let err = LineupOptimizer::new(two_offense(50_000.0))
            .optimize(&catalog)
            .unwrap_err();
        assert!(matches!(err, LineupError::DuplicateVariable { .. }));

        let lineup = LineupOptimizer::new(two_offense(50_000.0).with_unique_names(false))
            .optimize(&catalog)
            .unwrap();
        assert_eq!(lineup.len(), 2);
    }

    #[test]
    fn test_invalid_config() {
        let err = LineupOptimizer::new(two_offense(-1.0))
            .optimize(&abc())
            .unwrap_err();
        assert!(matches!(err, LineupError::InvalidConfig(_)));
    }

    #[test]
    fn test_cancelled() {
        let flag = Arc::new(AtomicBool::new(true));
        let err = LineupOptimizer::new(two_offense(30_000.0))
            .with_solver_config(SolverConfig::default().with_cancel(flag))
            .optimize(&abc())
            .unwrap_err();
        assert!(matches!(err, LineupError::Cancelled));
    }

    #[test]
    fn test_timeout_is_reported() {
        let err = LineupOptimizer::new(two_offense(30_000.0))
            .with_solver_config(SolverConfig::default().with_time_limit(Duration::ZERO))
            .optimize(&abc())
            .unwrap_err();
        assert!(matches!(err, LineupError::Timeout { .. }));
        assert!(err.to_string().contains("without proving optimality"));
    }

    /// Takes `step` per solve, or times out when the budget is shorter.
    struct PacedSolver {
        step: Duration,
    }

    impl IlpSolver for PacedSolver {
        fn solve(&self, model: &LineupModel, config: &SolverConfig) -> IlpSolution {
            match config.time_limit {
                Some(limit) if limit < self.step => {
                    std::thread::sleep(limit);
                    IlpSolution::empty(SolveStatus::Timeout)
                }
                _ => {
                    std::thread::sleep(self.step);
                    BranchAndBoundSolver::new().solve(model, config)
                }
            }
        }
    }

    #[test]
    fn test_diagnosis_shares_the_time_limit() {
        let limit = Duration::from_millis(200);
        let optimizer = LineupOptimizer::new(two_offense(14_000.0))
            .with_solver(PacedSolver {
                step: Duration::from_millis(80),
            })
            .with_solver_config(SolverConfig::default().with_time_limit(limit));

        let started = Instant::now();
        let err = optimizer.optimize(&abc()).unwrap_err();
        let elapsed = started.elapsed();

        // one main solve plus six checks would take 560ms without a shared deadline
        assert!(elapsed < limit + Duration::from_millis(150), "took {elapsed:?}");
        match err {
            LineupError::Infeasible { conflicting } => {
                assert!(conflicting.contains(&rules::SALARY_CAP.to_string()));
                assert!(conflicting.contains(&rules::OFFENSE_COUNT.to_string()));
            }
            other => panic!("expected Infeasible, got {other:?}"),
        }
    }

    /// Claims an optimum it did not compute.
    struct LyingSolver;

    impl IlpSolver for LyingSolver {
        fn solve(&self, model: &LineupModel, _config: &SolverConfig) -> IlpSolution {
            let values = (0..model.variable_count())
                .map(|j| (VarId(j), j == 0))
                .collect();
            IlpSolution {
                status: SolveStatus::Optimal,
                assignment: Some(SolutionAssignment {
                    values,
                    objective_value: 999.0,
                }),
                nodes_explored: 0,
                solve_time_ms: 0,
            }
        }
    }

    #[test]
    fn test_inconsistent_solver_output() {
        let err = LineupOptimizer::new(two_offense(30_000.0))
            .with_solver(LyingSolver)
            .optimize(&abc())
            .unwrap_err();
        assert!(matches!(err, LineupError::InconsistentSolution(_)));
    }
}
