//! Salary-file ingestion.
//!
//! The salary file is a CSV with a header row followed by positional
//! columns, in this order:
//!
//! | # | column            | type   |
//! |---|-------------------|--------|
//! | 0 | position          | text   |
//! | 1 | name              | text   |
//! | 2 | salary            | number |
//! | 3 | game info         | text (ignored) |
//! | 4 | projected points  | number |
//! | 5 | team              | text   |
//! | 6 | rushing attempts  | number |
//! | 7 | rushing yards     | number |
//! | 8 | yards per attempt | number |
//!
//! Header names are not checked; columns are read by position.

use super::collection::PlayerCatalog;
use crate::error::LineupError;
use csv::{ReaderBuilder, Trim};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Column names, indexed by position, used in error messages.
pub const COLUMNS: [&str; 9] = [
    "position",
    "name",
    "salary",
    "game_info",
    "projected_points",
    "team",
    "rushing_attempts",
    "rushing_yards",
    "yards_per_attempt",
];

/// One salary-file row with its fields parsed to their semantic types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPlayerRow {
    pub position: String,
    pub name: String,
    pub salary: f64,
    pub game_info: String,
    pub projected_points: f64,
    pub team: String,
    pub rushing_attempts: f64,
    pub rushing_yards: f64,
    pub yards_per_attempt: f64,
}

/// Reads a salary file from disk and builds the catalog.
pub fn read_csv(path: impl AsRef<Path>) -> Result<PlayerCatalog, LineupError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| LineupError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let rows = read_rows(file, &path.display().to_string())?;
    debug!(path = %path.display(), rows = rows.len(), "loaded salary file");
    PlayerCatalog::from_rows(rows)
}

/// Builds the catalog from any CSV byte source.
pub fn from_reader<R: Read>(reader: R) -> Result<PlayerCatalog, LineupError> {
    PlayerCatalog::from_rows(read_rows(reader, "<reader>")?)
}

/// Parses raw rows without building a catalog.
///
/// Fully blank lines are skipped. Row numbers in errors count data rows
/// from zero, matching the [`PlayerId`](super::PlayerId) the row would get.
pub fn read_rows<R: Read>(reader: R, source_name: &str) -> Result<Vec<RawPlayerRow>, LineupError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for result in reader.records() {
        let row = rows.len();
        let record = result.map_err(|e| csv_error(e, row, source_name))?;
        if record.iter().all(|field| field.is_empty()) {
            continue;
        }
        let parsed: RawPlayerRow = record
            .deserialize(None)
            .map_err(|e| csv_error(e, row, source_name))?;
        rows.push(parsed);
    }
    Ok(rows)
}

fn csv_error(err: csv::Error, row: usize, source_name: &str) -> LineupError {
    match err.into_kind() {
        csv::ErrorKind::Io(source) => LineupError::Io {
            path: source_name.to_string(),
            source,
        },
        csv::ErrorKind::Deserialize { err, .. } => {
            let field = err
                .field()
                .and_then(|i| COLUMNS.get(i as usize))
                .copied()
                .unwrap_or("record");
            LineupError::data_format(row, field, err.kind().to_string())
        }
        csv::ErrorKind::UnequalLengths {
            expected_len, len, ..
        } => LineupError::data_format(
            row,
            "record",
            format!("expected {expected_len} columns, found {len}"),
        ),
        other => LineupError::data_format(row, "record", format!("{other:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{PlayerId, Position, RoleClass};
    use std::io::Write;

    const SAMPLE: &str = "\
Position,Name,Salary,GameInfo,AvgPointsPerGame,TeamAbbrev,RushAtt,RushYds,YdsPerAtt
QB,Tom Brady,11200,PHI@NE,26.4,NE,25,28,1.1
RB,Jay Ajayi,7800,PHI@NE,11.5,PHI,184,873,4.7
DST,Eagles,4600,PHI@NE,8.2,PHI,0,0,0
";

    #[test]
    fn test_from_reader_parses_rows() {
        let catalog = from_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(catalog.len(), 3);

        let brady = catalog.get(PlayerId(0)).unwrap();
        assert_eq!(brady.name, "Tom Brady");
        assert_eq!(brady.position, Position::Qb);
        assert!((brady.salary - 11_200.0).abs() < 1e-9);
        assert!((brady.projected_points - 26.4).abs() < 1e-9);

        let ajayi = catalog.get(PlayerId(1)).unwrap();
        assert_eq!(ajayi.team, "PHI");
        assert!((ajayi.yards_per_attempt - 4.7).abs() < 1e-9);

        assert_eq!(catalog.get(PlayerId(2)).unwrap().role_class, RoleClass::Defense);
    }

    #[test]
    fn test_unparseable_number_is_data_format() {
        let text = "\
h1,h2,h3,h4,h5,h6,h7,h8,h9
QB,Tom Brady,11200,PHI@NE,26.4,NE,25,28,1.1
WR,Brandin Cooks,lots,PHI@NE,15.0,NE,0,0,0
";
        let err = from_reader(text.as_bytes()).unwrap_err();
        match err {
            LineupError::DataFormat { row, field, .. } => {
                assert_eq!(row, 1);
                assert_eq!(field, "salary");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_short_row_is_data_format() {
        let text = "\
h1,h2,h3,h4,h5,h6,h7,h8,h9
QB,Tom Brady,11200
";
        let err = from_reader(text.as_bytes()).unwrap_err();
        assert!(matches!(err, LineupError::DataFormat { row: 0, .. }));
    }

    #[test]
    fn test_read_csv_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let catalog = read_csv(file.path()).unwrap();
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn test_read_csv_missing_file() {
        let err = read_csv("/definitely/not/here.csv").unwrap_err();
        assert!(matches!(err, LineupError::Io { .. }));
    }
}
