//! Player record types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Stable synthetic key for a player: the zero-based row index in the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub usize);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Offense/defense grouping derived from a [`Position`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleClass {
    Offense,
    Defense,
}

impl fmt::Display for RoleClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoleClass::Offense => f.pad("offense"),
            RoleClass::Defense => f.pad("defense"),
        }
    }
}

/// Roster position as listed in the salary file.
///
/// Codes other than the common fantasy positions are kept verbatim in
/// [`Position::Other`] and classify as defense.
///
/// # Examples
///
/// ```
/// use lineup_ilp::catalog::{Position, RoleClass};
///
/// let rb: Position = "rb".parse().unwrap();
/// assert_eq!(rb, Position::Rb);
/// assert_eq!(rb.role_class(), RoleClass::Offense);
///
/// let lb: Position = "LB".parse().unwrap();
/// assert_eq!(lb, Position::Other("LB".into()));
/// assert_eq!(lb.role_class(), RoleClass::Defense);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    Qb,
    Rb,
    Wr,
    Te,
    /// Team defense / special teams.
    Dst,
    K,
    Other(String),
}

impl Position {
    /// Offense for QB, RB, WR and TE; defense for everything else.
    pub fn role_class(&self) -> RoleClass {
        match self {
            Position::Qb | Position::Rb | Position::Wr | Position::Te => RoleClass::Offense,
            Position::Dst | Position::K | Position::Other(_) => RoleClass::Defense,
        }
    }

    /// The canonical upper-case code.
    pub fn code(&self) -> &str {
        match self {
            Position::Qb => "QB",
            Position::Rb => "RB",
            Position::Wr => "WR",
            Position::Te => "TE",
            Position::Dst => "DST",
            Position::K => "K",
            Position::Other(code) => code,
        }
    }
}

impl FromStr for Position {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_uppercase();
        match code.as_str() {
            "" => Err("position code is empty".into()),
            "QB" => Ok(Position::Qb),
            "RB" => Ok(Position::Rb),
            "WR" => Ok(Position::Wr),
            "TE" => Ok(Position::Te),
            "D" | "DEF" | "DST" => Ok(Position::Dst),
            "K" => Ok(Position::K),
            _ => Ok(Position::Other(code)),
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.code())
    }
}

/// A validated, immutable player entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub id: PlayerId,
    pub position: Position,
    pub role_class: RoleClass,
    pub name: String,
    /// Contest salary; always positive.
    pub salary: f64,
    /// Projected fantasy points; never negative.
    pub projected_points: f64,
    /// Team affiliation, informational only.
    pub team: String,
    pub rushing_attempts: f64,
    pub rushing_yards: f64,
    pub yards_per_attempt: f64,
}

impl PlayerRecord {
    /// Creates a record with zeroed rushing stats, deriving the role class.
    pub fn new(
        id: PlayerId,
        position: Position,
        name: impl Into<String>,
        salary: f64,
        projected_points: f64,
    ) -> Self {
        Self {
            id,
            role_class: position.role_class(),
            position,
            name: name.into(),
            salary,
            projected_points,
            team: String::new(),
            rushing_attempts: 0.0,
            rushing_yards: 0.0,
            yards_per_attempt: 0.0,
        }
    }

    pub fn with_team(mut self, team: impl Into<String>) -> Self {
        self.team = team.into();
        self
    }

    pub fn with_rushing(mut self, attempts: f64, yards: f64, yards_per_attempt: f64) -> Self {
        self.rushing_attempts = attempts;
        self.rushing_yards = yards;
        self.yards_per_attempt = yards_per_attempt;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offense_positions() {
        for code in ["QB", "RB", "WR", "TE"] {
            let p: Position = code.parse().unwrap();
            assert_eq!(p.role_class(), RoleClass::Offense, "{code}");
        }
    }

    #[test]
    fn test_defense_positions() {
        for code in ["DST", "D", "def", "K", "LB", "CB"] {
            let p: Position = code.parse().unwrap();
            assert_eq!(p.role_class(), RoleClass::Defense, "{code}");
        }
    }

    #[test]
    fn test_empty_position_rejected() {
        assert!("  ".parse::<Position>().is_err());
    }

    #[test]
    fn test_position_code_round_trip() {
        let p: Position = " te ".parse().unwrap();
        assert_eq!(p.to_string(), "TE");
        let other: Position = "ss".parse().unwrap();
        assert_eq!(other.code(), "SS");
    }

    #[test]
    fn test_record_derives_role_class() {
        let r = PlayerRecord::new(PlayerId(0), Position::Dst, "Eagles", 3000.0, 7.5);
        assert_eq!(r.role_class, RoleClass::Defense);
        assert!(r.team.is_empty());
    }
}
