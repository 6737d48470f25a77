//! Reading a solver assignment back into players.

use crate::catalog::{PlayerCatalog, PlayerId, Position, RoleClass};
use crate::error::LineupError;
use crate::model::LineupModel;
use crate::solver::{IlpSolution, SolveStatus};
use serde::Serialize;
use std::fmt;

/// Relative tolerance between the solver's objective and the recomputed sum.
const OBJECTIVE_TOLERANCE: f64 = 1e-6;

const RULE: &str =
    "-------------------------------------------------------------------------------";

/// One chosen player.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectedPlayer {
    pub id: PlayerId,
    pub name: String,
    pub role_class: RoleClass,
    pub position: Position,
    pub salary: f64,
    pub team: String,
    pub projected_points: f64,
}

/// The optimized lineup with its totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Lineup {
    /// Selected players in catalog order.
    pub players: Vec<SelectedPlayer>,
    pub total_salary: f64,
    /// Sum of projected points of the selection.
    pub objective_value: f64,
    /// `false` when the solver stopped early with a feasible lineup.
    pub proven_optimal: bool,
}

impl Lineup {
    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.players.iter().any(|p| p.name == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.players.iter().map(|p| p.name.as_str()).collect()
    }
}

impl fmt::Display for Lineup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{RULE}")?;
        writeln!(f, "Optimized player lineup solved for maximum point production")?;
        writeln!(f, "{RULE}")?;
        for p in &self.players {
            writeln!(
                f,
                "{:<28} {:<8} {:<4} salary={:<8} team={}",
                p.name,
                p.role_class,
                p.position,
                p.salary,
                p.team
            )?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "The total point production from this lineup is: {}",
            self.objective_value
        )?;
        write!(f, "The total salary for this lineup is: ${}", self.total_salary)?;
        if !self.proven_optimal {
            write!(f, "\n(solver stopped early; optimality not proven)")?;
        }
        Ok(())
    }
}

/// Joins the variables set to 1 back to their player records.
///
/// Fails with [`LineupError::InconsistentSolution`] if the solution carries
/// no assignment, a selected variable does not resolve to a player, or the
/// reported objective disagrees with the selected players' points.
pub fn extract(
    catalog: &PlayerCatalog,
    model: &LineupModel,
    solution: &IlpSolution,
) -> Result<Lineup, LineupError> {
    let assignment = solution.assignment.as_ref().ok_or_else(|| {
        LineupError::InconsistentSolution(format!(
            "no assignment to extract (status {:?})",
            solution.status
        ))
    })?;

    let mut players = assignment
        .selected()
        .map(|var| {
            let record = model
                .variables
                .get(var)
                .and_then(|v| catalog.get(v.player))
                .ok_or_else(|| {
                    LineupError::InconsistentSolution(format!(
                        "selected variable {var} does not resolve to a player"
                    ))
                })?;
            Ok(SelectedPlayer {
                id: record.id,
                name: record.name.clone(),
                role_class: record.role_class,
                position: record.position.clone(),
                salary: record.salary,
                team: record.team.clone(),
                projected_points: record.projected_points,
            })
        })
        .collect::<Result<Vec<_>, LineupError>>()?;
    players.sort_by_key(|p| p.id);

    let objective_value: f64 = players.iter().map(|p| p.projected_points).sum();
    let reported = assignment.objective_value;
    if (reported - objective_value).abs() > OBJECTIVE_TOLERANCE * objective_value.abs().max(1.0) {
        return Err(LineupError::InconsistentSolution(format!(
            "solver reported objective {reported}, selected players sum to {objective_value}"
        )));
    }

    Ok(Lineup {
        total_salary: players.iter().map(|p| p.salary).sum(),
        players,
        objective_value,
        proven_optimal: solution.status == SolveStatus::Optimal,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::PlayerRecord;
    use crate::model::{standard_rules, DecisionVariableSet, LineupConfig, VarId};
    use crate::solver::SolutionAssignment;

    fn fixture() -> (PlayerCatalog, LineupModel) {
        let catalog = PlayerCatalog::from_records(vec![
            PlayerRecord::new(PlayerId(0), Position::Qb, "A", 10_000.0, 20.0).with_team("NE"),
            PlayerRecord::new(PlayerId(1), Position::Wr, "B", 20_000.0, 25.0).with_team("NO"),
            PlayerRecord::new(PlayerId(2), Position::Te, "C", 5_000.0, 10.0).with_team("KC"),
        ])
        .unwrap();
        let variables = DecisionVariableSet::from_catalog(&catalog, true).unwrap();
        let model = LineupModel::build(
            "extract",
            &catalog,
            variables,
            &standard_rules(&LineupConfig::default()),
        )
        .unwrap();
        (catalog, model)
    }

    fn solution(status: SolveStatus, on: &[usize], objective: f64) -> IlpSolution {
        let values = (0..3).map(|j| (VarId(j), on.contains(&j))).collect();
        IlpSolution {
            status,
            assignment: Some(SolutionAssignment {
                values,
                objective_value: objective,
            }),
            nodes_explored: 1,
            solve_time_ms: 0,
        }
    }

    #[test]
    fn test_extract_selected_players() {
        let (catalog, model) = fixture();
        let lineup = extract(&catalog, &model, &solution(SolveStatus::Optimal, &[1, 0], 45.0)).unwrap();

        assert_eq!(lineup.names(), vec!["A", "B"]);
        assert_eq!(lineup.total_salary, 30_000.0);
        assert_eq!(lineup.objective_value, 45.0);
        assert!(lineup.proven_optimal);
        assert_eq!(lineup.players[0].team, "NE");
        assert_eq!(lineup.players[1].role_class, RoleClass::Offense);
    }

    #[test]
    fn test_extract_feasible_not_proven() {
        let (catalog, model) = fixture();
        let lineup = extract(&catalog, &model, &solution(SolveStatus::Feasible, &[2], 10.0)).unwrap();
        assert!(!lineup.proven_optimal);
        assert!(lineup.to_string().contains("optimality not proven"));
    }

    #[test]
    fn test_extract_objective_mismatch() {
        let (catalog, model) = fixture();
        let err = extract(&catalog, &model, &solution(SolveStatus::Optimal, &[0, 1], 50.0)).unwrap_err();
        assert!(matches!(err, LineupError::InconsistentSolution(_)));
    }

    #[test]
    fn test_extract_unknown_variable() {
        let (catalog, model) = fixture();
        let mut s = solution(SolveStatus::Optimal, &[0], 20.0);
        if let Some(a) = s.assignment.as_mut() {
            a.values.insert(VarId(9), true);
        }
        let err = extract(&catalog, &model, &s).unwrap_err();
        assert!(err.to_string().contains("x9"));
    }

    #[test]
    fn test_extract_without_assignment() {
        let (catalog, model) = fixture();
        let err = extract(&catalog, &model, &IlpSolution::empty(SolveStatus::Infeasible)).unwrap_err();
        assert!(matches!(err, LineupError::InconsistentSolution(_)));
    }

    #[test]
    fn test_report_text() {
        let (catalog, model) = fixture();
        let lineup = extract(&catalog, &model, &solution(SolveStatus::Optimal, &[0, 1], 45.0)).unwrap();
        let text = lineup.to_string();

        assert!(text.contains("Optimized player lineup solved for maximum point production"));
        assert!(text.contains("salary=10000"));
        assert!(text.contains("team=NO"));
        assert!(text.contains("The total point production from this lineup is: 45"));
        assert!(text.ends_with("The total salary for this lineup is: $30000"));
    }

    #[test]
    fn test_lineup_serializes() {
        let (catalog, model) = fixture();
        let lineup = extract(&catalog, &model, &solution(SolveStatus::Optimal, &[0, 1], 45.0)).unwrap();
        let json = serde_json::to_value(&lineup).unwrap();

        assert_eq!(json["players"][0]["name"], "A");
        assert_eq!(json["players"][0]["role_class"], "offense");
        assert_eq!(json["total_salary"], 30_000.0);
    }
}
