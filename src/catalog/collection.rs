//! Validated player collection.

use super::ingest::RawPlayerRow;
use super::types::{PlayerId, PlayerRecord, Position};
use crate::error::LineupError;
use std::collections::HashMap;

/// Ordered, validated collection of [`PlayerRecord`]s for one slate.
///
/// # Examples
///
/// ```
/// use lineup_ilp::catalog::{PlayerCatalog, PlayerId, PlayerRecord, Position};
///
/// let catalog = PlayerCatalog::from_records(vec![
///     PlayerRecord::new(PlayerId(0), Position::Qb, "Foles", 10_000.0, 20.0),
///     PlayerRecord::new(PlayerId(1), Position::Dst, "Eagles", 4_000.0, 8.0),
/// ])
/// .unwrap();
/// assert_eq!(catalog.len(), 2);
/// assert_eq!(catalog.get(PlayerId(1)).unwrap().name, "Eagles");
/// ```
#[derive(Debug, Clone, Default)]
pub struct PlayerCatalog {
    players: Vec<PlayerRecord>,
    index: HashMap<PlayerId, usize>,
}

impl PlayerCatalog {
    /// Builds a catalog from ingested rows, keying each player by row index.
    pub fn from_rows(rows: Vec<RawPlayerRow>) -> Result<Self, LineupError> {
        let records = rows
            .into_iter()
            .enumerate()
            .map(|(row, raw)| record_from_row(row, raw))
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_records(records)
    }

    /// Builds a catalog from records the caller already constructed.
    ///
    /// Numeric fields are validated; ids are kept as given. Duplicate ids are
    /// not rejected here, they surface when decision variables are created.
    pub fn from_records(records: Vec<PlayerRecord>) -> Result<Self, LineupError> {
        let mut index = HashMap::with_capacity(records.len());
        for (pos, record) in records.iter().enumerate() {
            validate_record(pos, record)?;
            index.entry(record.id).or_insert(pos);
        }
        Ok(Self {
            players: records,
            index,
        })
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlayerRecord> {
        self.players.iter()
    }

    /// Looks a player up by id.
    pub fn get(&self, id: PlayerId) -> Option<&PlayerRecord> {
        self.index.get(&id).map(|&pos| &self.players[pos])
    }
}

fn record_from_row(row: usize, raw: RawPlayerRow) -> Result<PlayerRecord, LineupError> {
    let position: Position = raw
        .position
        .parse()
        .map_err(|e: String| LineupError::data_format(row, "position", e))?;

    Ok(PlayerRecord {
        id: PlayerId(row),
        role_class: position.role_class(),
        position,
        name: raw.name.trim().to_string(),
        salary: raw.salary,
        projected_points: raw.projected_points,
        team: raw.team.trim().to_string(),
        rushing_attempts: raw.rushing_attempts,
        rushing_yards: raw.rushing_yards,
        yards_per_attempt: raw.yards_per_attempt,
    })
}

fn validate_record(row: usize, record: &PlayerRecord) -> Result<(), LineupError> {
    if record.name.is_empty() {
        return Err(LineupError::data_format(row, "name", "name is empty"));
    }
    if !record.salary.is_finite() || record.salary <= 0.0 {
        return Err(LineupError::data_format(
            row,
            "salary",
            format!("must be positive, got {}", record.salary),
        ));
    }

    let non_negative = [
        ("projected_points", record.projected_points),
        ("rushing_attempts", record.rushing_attempts),
        ("rushing_yards", record.rushing_yards),
        ("yards_per_attempt", record.yards_per_attempt),
    ];
    for (field, value) in non_negative {
        if !value.is_finite() || value < 0.0 {
            return Err(LineupError::data_format(
                row,
                field,
                format!("must be a non-negative number, got {value}"),
            ));
        }
    }
    Ok(())
}
