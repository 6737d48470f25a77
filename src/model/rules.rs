//! Declarative constraint rules.
//!
//! A rule says, for each player, whether and with what coefficient the
//! player's variable enters one linear constraint. The model builder folds
//! every rule over the catalog in a single pass, so adding a rule never
//! touches the others.

use super::config::LineupConfig;
use super::expr::Comparison;
use crate::catalog::{PlayerRecord, Position, RoleClass};

/// Label of the salary budget constraint.
pub const SALARY_CAP: &str = "salary_cap";
/// Label of the offensive head-count constraint.
pub const OFFENSE_COUNT: &str = "offense_count";
/// Label of the defensive head-count constraint.
pub const DEFENSE_COUNT: &str = "defense_count";
/// Label of the running-back minimum.
pub const MIN_RUNNING_BACKS: &str = "min_running_backs";
/// Label of the under-performing running-back exclusion.
pub const EXCLUDE_UNDERPERFORMING_RBS: &str = "exclude_underperforming_running_backs";

/// One linear constraint described as a per-player contribution.
///
/// # Examples
///
/// ```ignore
/// // At most one tight end
/// struct MaxTightEnds;
///
/// impl LineupRule for MaxTightEnds {
///     fn label(&self) -> &str { "max_tight_ends" }
///     fn contribution(&self, p: &PlayerRecord) -> Option<f64> {
///         (p.position == Position::Te).then_some(1.0)
///     }
///     fn comparison(&self) -> Comparison { Comparison::Le }
///     fn bound(&self) -> f64 { 1.0 }
/// }
/// ```
pub trait LineupRule: Send + Sync {
    /// Stable label used in diagnostics and the LP rendering.
    fn label(&self) -> &str;

    /// Coefficient of the player's variable, or `None` if the player is
    /// not part of this constraint.
    fn contribution(&self, player: &PlayerRecord) -> Option<f64>;

    fn comparison(&self) -> Comparison;

    fn bound(&self) -> f64;
}

/// Total salary must not exceed the cap.
#[derive(Debug, Clone, Copy)]
pub struct SalaryCap {
    pub cap: f64,
}

impl LineupRule for SalaryCap {
    fn label(&self) -> &str {
        SALARY_CAP
    }

    fn contribution(&self, player: &PlayerRecord) -> Option<f64> {
        Some(player.salary)
    }

    fn comparison(&self) -> Comparison {
        Comparison::Le
    }

    fn bound(&self) -> f64 {
        self.cap
    }
}

/// Exactly `target` players of a role class.
#[derive(Debug, Clone, Copy)]
pub struct RoleCount {
    pub role: RoleClass,
    pub target: u32,
}

impl LineupRule for RoleCount {
    fn label(&self) -> &str {
        match self.role {
            RoleClass::Offense => OFFENSE_COUNT,
            RoleClass::Defense => DEFENSE_COUNT,
        }
    }

    fn contribution(&self, player: &PlayerRecord) -> Option<f64> {
        (player.role_class == self.role).then_some(1.0)
    }

    fn comparison(&self) -> Comparison {
        Comparison::Eq
    }

    fn bound(&self) -> f64 {
        f64::from(self.target)
    }
}

/// At least `min` running backs.
#[derive(Debug, Clone, Copy)]
pub struct MinRunningBacks {
    pub min: u32,
}

impl LineupRule for MinRunningBacks {
    fn label(&self) -> &str {
        MIN_RUNNING_BACKS
    }

    fn contribution(&self, player: &PlayerRecord) -> Option<f64> {
        (player.position == Position::Rb).then_some(1.0)
    }

    fn comparison(&self) -> Comparison {
        Comparison::Ge
    }

    fn bound(&self) -> f64 {
        f64::from(self.min)
    }
}

/// Forces running backs with low volume or low efficiency out of the lineup.
///
/// A back is under-performing when `rushing_attempts < min_attempts` or
/// `yards_per_attempt < min_yards_per_attempt`. Other positions are never
/// affected.
#[derive(Debug, Clone, Copy)]
pub struct ExcludeUnderperformingRunningBacks {
    pub min_attempts: f64,
    pub min_yards_per_attempt: f64,
}

impl ExcludeUnderperformingRunningBacks {
    pub fn is_underperforming(&self, player: &PlayerRecord) -> bool {
        player.position == Position::Rb
            && (player.rushing_attempts < self.min_attempts
                || player.yards_per_attempt < self.min_yards_per_attempt)
    }
}

impl LineupRule for ExcludeUnderperformingRunningBacks {
    fn label(&self) -> &str {
        EXCLUDE_UNDERPERFORMING_RBS
    }

    fn contribution(&self, player: &PlayerRecord) -> Option<f64> {
        self.is_underperforming(player).then_some(1.0)
    }

    fn comparison(&self) -> Comparison {
        Comparison::Eq
    }

    fn bound(&self) -> f64 {
        0.0
    }
}

/// Ad hoc rule built from a label, a contribution closure and a bound.
///
/// # Examples
///
/// ```
/// use lineup_ilp::catalog::{PlayerRecord, Position};
/// use lineup_ilp::model::{Comparison, LineupRule, PredicateRule};
///
/// let max_one_qb = PredicateRule::new("max_one_qb", Comparison::Le, 1.0, |p: &PlayerRecord| {
///     (p.position == Position::Qb).then_some(1.0)
/// });
/// assert_eq!(max_one_qb.label(), "max_one_qb");
/// ```
pub struct PredicateRule<F> {
    label: String,
    comparison: Comparison,
    bound: f64,
    contribution: F,
}

impl<F> PredicateRule<F>
where
    F: Fn(&PlayerRecord) -> Option<f64> + Send + Sync,
{
    pub fn new(label: impl Into<String>, comparison: Comparison, bound: f64, contribution: F) -> Self {
        Self {
            label: label.into(),
            comparison,
            bound,
            contribution,
        }
    }
}

impl<F> LineupRule for PredicateRule<F>
where
    F: Fn(&PlayerRecord) -> Option<f64> + Send + Sync,
{
    fn label(&self) -> &str {
        &self.label
    }

    fn contribution(&self, player: &PlayerRecord) -> Option<f64> {
        (self.contribution)(player)
    }

    fn comparison(&self) -> Comparison {
        self.comparison
    }

    fn bound(&self) -> f64 {
        self.bound
    }
}

/// The five built-in roster rules, in model order.
pub fn standard_rules(config: &LineupConfig) -> Vec<Box<dyn LineupRule>> {
    vec![
        Box::new(SalaryCap {
            cap: config.salary_cap,
        }),
        Box::new(RoleCount {
            role: RoleClass::Offense,
            target: config.offense_count,
        }),
        Box::new(RoleCount {
            role: RoleClass::Defense,
            target: config.defense_count,
        }),
        Box::new(MinRunningBacks {
            min: config.min_running_backs,
        }),
        Box::new(ExcludeUnderperformingRunningBacks {
            min_attempts: config.min_rushing_attempts,
            min_yards_per_attempt: config.min_yards_per_attempt,
        }),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::PlayerId;

    fn rb(attempts: f64, ypa: f64) -> PlayerRecord {
        PlayerRecord::new(PlayerId(0), Position::Rb, "back", 6_000.0, 12.0).with_rushing(
            attempts,
            attempts * ypa,
            ypa,
        )
    }

    #[test]
    fn test_standard_rule_labels_in_order() {
        let labels: Vec<String> = standard_rules(&LineupConfig::default())
            .iter()
            .map(|r| r.label().to_string())
            .collect();
        assert_eq!(
            labels,
            vec![
                SALARY_CAP,
                OFFENSE_COUNT,
                DEFENSE_COUNT,
                MIN_RUNNING_BACKS,
                EXCLUDE_UNDERPERFORMING_RBS
            ]
        );
    }

    #[test]
    fn test_salary_cap_contribution() {
        let rule = SalaryCap { cap: 50_000.0 };
        assert_eq!(rule.contribution(&rb(150.0, 4.5)), Some(6_000.0));
        assert_eq!(rule.comparison(), Comparison::Le);
    }

    #[test]
    fn test_role_count_filters_by_role() {
        let offense = RoleCount {
            role: RoleClass::Offense,
            target: 4,
        };
        let dst = PlayerRecord::new(PlayerId(1), Position::Dst, "Eagles", 4_000.0, 8.0);
        assert_eq!(offense.contribution(&rb(150.0, 4.5)), Some(1.0));
        assert_eq!(offense.contribution(&dst), None);
        assert_eq!(offense.bound(), 4.0);
    }

    #[test]
    fn test_underperformance_predicate() {
        let rule = ExcludeUnderperformingRunningBacks {
            min_attempts: 100.0,
            min_yards_per_attempt: 4.0,
        };
        assert!(!rule.is_underperforming(&rb(150.0, 4.5)));
        assert!(rule.is_underperforming(&rb(99.0, 4.5)));
        assert!(rule.is_underperforming(&rb(150.0, 3.9)));
        // boundary values are not under-performing
        assert!(!rule.is_underperforming(&rb(100.0, 4.0)));

        let wr = PlayerRecord::new(PlayerId(2), Position::Wr, "wideout", 5_000.0, 9.0);
        assert!(!rule.is_underperforming(&wr));
    }

    #[test]
    fn test_predicate_rule() {
        let rule = PredicateRule::new("no_kickers", Comparison::Eq, 0.0, |p: &PlayerRecord| {
            (p.position == Position::K).then_some(1.0)
        });
        let k = PlayerRecord::new(PlayerId(3), Position::K, "kicker", 3_000.0, 6.0);
        assert_eq!(rule.contribution(&k), Some(1.0));
        assert_eq!(rule.contribution(&rb(150.0, 4.5)), None);
    }
}
