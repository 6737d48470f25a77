//! Lineup composition settings.

use serde::Deserialize;

/// Roster rules for one optimization run.
///
/// Defaults describe a six-player showdown roster: four offensive players,
/// two defensive players, at least two running backs, and a 50 000 cap.
///
/// # Examples
///
/// ```
/// use lineup_ilp::model::LineupConfig;
///
/// let config = LineupConfig::default()
///     .with_salary_cap(30_000.0)
///     .with_offense_count(2)
///     .with_defense_count(0)
///     .with_min_running_backs(0);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.offense_count, 2);
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LineupConfig {
    /// Maximum total salary of the lineup.
    pub salary_cap: f64,

    /// Exact number of offensive players (QB, RB, WR, TE).
    pub offense_count: u32,

    /// Exact number of defensive players (every other position).
    pub defense_count: u32,

    /// Minimum number of running backs.
    pub min_running_backs: u32,

    /// Running backs with fewer rushing attempts than this are excluded.
    pub min_rushing_attempts: f64,

    /// Running backs averaging fewer yards per attempt than this are excluded.
    pub min_yards_per_attempt: f64,

    /// Reject catalogs in which two players share a name.
    ///
    /// Variables are keyed by row id either way; turning this off only
    /// allows namesakes into the same slate.
    pub unique_names: bool,

    /// On infeasibility, search for a minimal conflicting constraint subset.
    pub diagnose_infeasible: bool,
}

impl Default for LineupConfig {
    fn default() -> Self {
        Self {
            salary_cap: 50_000.0,
            offense_count: 4,
            defense_count: 2,
            min_running_backs: 2,
            min_rushing_attempts: 100.0,
            min_yards_per_attempt: 4.0,
            unique_names: true,
            diagnose_infeasible: true,
        }
    }
}

impl LineupConfig {
    pub fn with_salary_cap(mut self, cap: f64) -> Self {
        self.salary_cap = cap;
        self
    }

    pub fn with_offense_count(mut self, n: u32) -> Self {
        self.offense_count = n;
        self
    }

    pub fn with_defense_count(mut self, n: u32) -> Self {
        self.defense_count = n;
        self
    }

    pub fn with_min_running_backs(mut self, n: u32) -> Self {
        self.min_running_backs = n;
        self
    }

    /// Sets both under-performance thresholds for running backs.
    pub fn with_rushing_thresholds(mut self, min_attempts: f64, min_yards_per_attempt: f64) -> Self {
        self.min_rushing_attempts = min_attempts;
        self.min_yards_per_attempt = min_yards_per_attempt;
        self
    }

    pub fn with_unique_names(mut self, unique: bool) -> Self {
        self.unique_names = unique;
        self
    }

    pub fn with_diagnose_infeasible(mut self, diagnose: bool) -> Self {
        self.diagnose_infeasible = diagnose;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if !self.salary_cap.is_finite() || self.salary_cap < 0.0 {
            return Err(format!(
                "salary_cap must be a non-negative number, got {}",
                self.salary_cap
            ));
        }
        if !self.min_rushing_attempts.is_finite() || self.min_rushing_attempts < 0.0 {
            return Err(format!(
                "min_rushing_attempts must be a non-negative number, got {}",
                self.min_rushing_attempts
            ));
        }
        if !self.min_yards_per_attempt.is_finite() || self.min_yards_per_attempt < 0.0 {
            return Err(format!(
                "min_yards_per_attempt must be a non-negative number, got {}",
                self.min_yards_per_attempt
            ));
        }
        Ok(())
    }
}
