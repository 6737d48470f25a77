//! Linear expressions, constraints and objectives.

use super::variables::VarId;
use std::fmt;

/// A sum of `coefficient * variable` terms.
///
/// Terms keep insertion order; a variable may appear at most once per
/// expression when built through [`LineupModel::build`](super::LineupModel::build).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinearExpr {
    pub terms: Vec<(VarId, f64)>,
}

impl LinearExpr {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, var: VarId, coefficient: f64) {
        self.terms.push((var, coefficient));
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Evaluates the expression under a 0/1 assignment.
    pub fn evaluate(&self, is_selected: impl Fn(VarId) -> bool) -> f64 {
        self.terms
            .iter()
            .filter(|(v, _)| is_selected(*v))
            .map(|(_, c)| c)
            .sum()
    }
}

impl FromIterator<(VarId, f64)> for LinearExpr {
    fn from_iter<I: IntoIterator<Item = (VarId, f64)>>(iter: I) -> Self {
        Self {
            terms: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for LinearExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.terms.is_empty() {
            return f.write_str("0");
        }
        for (i, (var, coef)) in self.terms.iter().enumerate() {
            let sign = if *coef < 0.0 { "-" } else { "+" };
            if i == 0 {
                if *coef < 0.0 {
                    f.write_str("- ")?;
                }
            } else {
                write!(f, " {sign} ")?;
            }
            write!(f, "{} {var}", coef.abs())?;
        }
        Ok(())
    }
}

/// Relational operator of a constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    /// `expr <= bound`
    Le,
    /// `expr == bound`
    Eq,
    /// `expr >= bound`
    Ge,
}

impl Comparison {
    /// Whether `value` satisfies `value <op> bound` within `tolerance`.
    pub fn holds(self, value: f64, bound: f64, tolerance: f64) -> bool {
        match self {
            Comparison::Le => value <= bound + tolerance,
            Comparison::Eq => (value - bound).abs() <= tolerance,
            Comparison::Ge => value >= bound - tolerance,
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Comparison::Le => f.write_str("<="),
            Comparison::Eq => f.write_str("="),
            Comparison::Ge => f.write_str(">="),
        }
    }
}

/// A labelled linear constraint `expr <op> bound`.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    /// Stable diagnostic label, unique within a model.
    pub label: String,
    pub expr: LinearExpr,
    pub comparison: Comparison,
    pub bound: f64,
}

impl Constraint {
    pub fn is_satisfied(&self, is_selected: impl Fn(VarId) -> bool, tolerance: f64) -> bool {
        self.comparison
            .holds(self.expr.evaluate(is_selected), self.bound, tolerance)
    }
}

/// Optimization direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    Maximize,
    Minimize,
}

/// Linear objective over the model's binary variables.
#[derive(Debug, Clone, PartialEq)]
pub struct Objective {
    pub label: String,
    pub sense: Sense,
    pub expr: LinearExpr,
}
