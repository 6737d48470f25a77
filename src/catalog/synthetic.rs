//! Seeded generator of plausible salary-file rows.
//!
//! Used by the benchmarks and property tests to get slates of any size
//! without shipping data files.

use super::ingest::RawPlayerRow;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const OFFENSE: [&str; 4] = ["QB", "RB", "WR", "TE"];
const DEFENSE: [&str; 3] = ["DST", "K", "LB"];
const TEAMS: [&str; 2] = ["PHI", "NE"];

/// Generates `size` rows from a deterministic RNG.
///
/// Roughly two thirds of the players are offensive. Salaries are multiples
/// of 100 in [2000, 12000]; points loosely track salary.
pub fn random_slate(size: usize, seed: u64) -> Vec<RawPlayerRow> {
    let mut rng = StdRng::seed_from_u64(seed);

    (0..size)
        .map(|i| {
            let position = if rng.random_bool(2.0 / 3.0) {
                OFFENSE[rng.random_range(0..OFFENSE.len())]
            } else {
                DEFENSE[rng.random_range(0..DEFENSE.len())]
            };
            let salary = f64::from(rng.random_range(20..=120u32) * 100);
            let projected_points = (salary / 500.0 + rng.random_range(-4.0..8.0)).max(0.0);
            let rushing_attempts = if position == "RB" {
                f64::from(rng.random_range(20..=300u32))
            } else {
                0.0
            };
            let yards_per_attempt = if rushing_attempts > 0.0 {
                rng.random_range(2.5..5.5)
            } else {
                0.0
            };

            RawPlayerRow {
                position: position.to_string(),
                name: format!("Player {i}"),
                salary,
                game_info: "PHI@NE".to_string(),
                projected_points,
                team: TEAMS[i % TEAMS.len()].to_string(),
                rushing_attempts,
                rushing_yards: rushing_attempts * yards_per_attempt,
                yards_per_attempt,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::PlayerCatalog;

    #[test]
    fn test_same_seed_same_slate() {
        assert_eq!(random_slate(40, 7), random_slate(40, 7));
        assert_ne!(random_slate(40, 7), random_slate(40, 8));
    }

    #[test]
    fn test_slate_builds_valid_catalog() {
        let catalog = PlayerCatalog::from_rows(random_slate(200, 42)).unwrap();
        assert_eq!(catalog.len(), 200);
        assert!(catalog.iter().all(|p| p.salary >= 2000.0 && p.salary <= 12_000.0));
    }
}
