//! Lineup model: objective, constraints and variables for one run.

use super::expr::{Constraint, LinearExpr, Objective, Sense};
use super::rules::LineupRule;
use super::variables::{DecisionVariableSet, VarId};
use crate::catalog::PlayerCatalog;
use crate::error::LineupError;
use std::collections::HashSet;
use std::fmt;

/// Label of the projected-points objective.
pub const PROJECTED_POINTS: &str = "projected_points";

/// A 0/1 integer linear program over one binary variable per player.
///
/// Built once per run from a catalog and a rule list, then handed to a
/// solver as an immutable value.
///
/// # Examples
///
/// ```
/// use lineup_ilp::catalog::{PlayerCatalog, PlayerId, PlayerRecord, Position};
/// use lineup_ilp::model::{standard_rules, DecisionVariableSet, LineupConfig, LineupModel};
///
/// let catalog = PlayerCatalog::from_records(vec![
///     PlayerRecord::new(PlayerId(0), Position::Qb, "A", 10_000.0, 20.0),
///     PlayerRecord::new(PlayerId(1), Position::Wr, "B", 20_000.0, 25.0),
/// ])
/// .unwrap();
/// let variables = DecisionVariableSet::from_catalog(&catalog, true).unwrap();
/// let rules = standard_rules(&LineupConfig::default());
/// let model = LineupModel::build("example", &catalog, variables, &rules).unwrap();
///
/// assert_eq!(model.variable_count(), 2);
/// assert_eq!(model.constraint_count(), 5);
/// assert!(model.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct LineupModel {
    /// Model name.
    pub name: String,
    /// Decision variables, one per player.
    pub variables: DecisionVariableSet,
    /// Objective function.
    pub objective: Objective,
    /// Constraints, in rule order.
    pub constraints: Vec<Constraint>,
}

impl LineupModel {
    /// Builds the model in a single pass over the catalog.
    ///
    /// Each player contributes its projected points to the objective and,
    /// for every rule that accepts it, one term to that rule's constraint.
    /// Constraints whose rule matched no player are kept with an empty
    /// expression.
    ///
    /// `variables` must map every catalog player to its own variable and
    /// hold nothing else; otherwise [`LineupError::InvalidModel`] is returned.
    pub fn build(
        name: impl Into<String>,
        catalog: &PlayerCatalog,
        variables: DecisionVariableSet,
        rules: &[Box<dyn LineupRule>],
    ) -> Result<Self, LineupError> {
        if variables.len() != catalog.len() {
            return Err(LineupError::InvalidModel(format!(
                "{} decision variables for {} players",
                variables.len(),
                catalog.len()
            )));
        }

        let mut used = vec![false; variables.len()];
        let seed = (LinearExpr::new(), vec![LinearExpr::new(); rules.len()]);
        let (objective, rows) =
            catalog
                .iter()
                .try_fold(seed, |(mut objective, mut rows), player| {
                    let var = variables
                        .by_player(player.id)
                        .filter(|v| !std::mem::replace(&mut used[v.0], true))
                        .ok_or_else(|| {
                            LineupError::InvalidModel(format!(
                                "player {} ({}) has no decision variable of its own",
                                player.id, player.name
                            ))
                        })?;
                    objective.push(var, player.projected_points);
                    for (row, rule) in rows.iter_mut().zip(rules) {
                        if let Some(coefficient) = rule.contribution(player) {
                            row.push(var, coefficient);
                        }
                    }
                    Ok::<_, LineupError>((objective, rows))
                })?;

        let constraints = rows
            .into_iter()
            .zip(rules)
            .map(|(expr, rule)| Constraint {
                label: rule.label().to_string(),
                expr,
                comparison: rule.comparison(),
                bound: rule.bound(),
            })
            .collect();

        Ok(Self {
            name: name.into(),
            variables,
            objective: Objective {
                label: PROJECTED_POINTS.to_string(),
                sense: Sense::Maximize,
                expr: objective,
            },
            constraints,
        })
    }

    /// Returns a copy keeping only the constraints at `indices`.
    ///
    /// Used for infeasibility diagnosis.
    pub fn with_constraint_subset(&self, indices: &[usize]) -> Self {
        Self {
            name: self.name.clone(),
            variables: self.variables.clone(),
            objective: self.objective.clone(),
            constraints: indices
                .iter()
                .filter_map(|&i| self.constraints.get(i).cloned())
                .collect(),
        }
    }

    /// Returns a copy with an all-zero objective, so any feasible point is optimal.
    pub fn feasibility_only(&self) -> Self {
        Self {
            objective: Objective {
                label: self.objective.label.clone(),
                sense: self.objective.sense,
                expr: LinearExpr::new(),
            },
            ..self.clone()
        }
    }

    /// Validates the model for consistency.
    ///
    /// Checks that every referenced variable exists, that no variable is
    /// repeated within one expression, that all numbers are finite and that
    /// constraint labels are unique.
    pub fn validate(&self) -> Result<(), String> {
        let n = self.variables.len();
        check_expr(&self.objective.label, &self.objective.expr, n)?;

        let mut labels = HashSet::with_capacity(self.constraints.len());
        for c in &self.constraints {
            if !labels.insert(c.label.as_str()) {
                return Err(format!("duplicate constraint label: {}", c.label));
            }
            if !c.bound.is_finite() {
                return Err(format!("{}: bound is not finite", c.label));
            }
            check_expr(&c.label, &c.expr, n)?;
        }
        Ok(())
    }

    /// Objective value of a 0/1 assignment.
    pub fn objective_value(&self, is_selected: impl Fn(VarId) -> bool) -> f64 {
        self.objective.expr.evaluate(is_selected)
    }

    /// Labels of the constraints a 0/1 assignment violates.
    pub fn violated_constraints(
        &self,
        is_selected: impl Fn(VarId) -> bool + Copy,
        tolerance: f64,
    ) -> Vec<&str> {
        self.constraints
            .iter()
            .filter(|c| !c.is_satisfied(is_selected, tolerance))
            .map(|c| c.label.as_str())
            .collect()
    }

    pub fn constraint(&self, label: &str) -> Option<&Constraint> {
        self.constraints.iter().find(|c| c.label == label)
    }

    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }
}

fn check_expr(label: &str, expr: &LinearExpr, var_count: usize) -> Result<(), String> {
    let mut seen = HashSet::with_capacity(expr.len());
    for (var, coefficient) in &expr.terms {
        if var.0 >= var_count {
            return Err(format!("{label}: undefined variable {var}"));
        }
        if !seen.insert(*var) {
            return Err(format!("{label}: variable {var} appears twice"));
        }
        if !coefficient.is_finite() {
            return Err(format!("{label}: coefficient of {var} is not finite"));
        }
    }
    Ok(())
}

/// Renders the model in CPLEX LP text form.
///
/// Variable `xN` selects the player behind `VarId(N)`; a comment block at
/// the end maps variables back to player names.
impl fmt::Display for LineupModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\\ {}", self.name)?;
        match self.objective.sense {
            Sense::Maximize => writeln!(f, "Maximize")?,
            Sense::Minimize => writeln!(f, "Minimize")?,
        }
        writeln!(f, " {}: {}", self.objective.label, self.objective.expr)?;
        writeln!(f, "Subject To")?;
        for c in &self.constraints {
            writeln!(f, " {}: {} {} {}", c.label, c.expr, c.comparison, c.bound)?;
        }
        writeln!(f, "Binary")?;
        for var in self.variables.iter() {
            writeln!(f, " {}", var.id)?;
        }
        writeln!(f, "End")?;
        for var in self.variables.iter() {
            writeln!(f, "\\ {} = {} {}", var.id, var.player, var.name)?;
        }
        Ok(())
    }
}
