//! Error type shared by every stage of the lineup pipeline.

use thiserror::Error;

/// Errors raised while ingesting players, building the model, solving it,
/// or reading the solution back.
#[derive(Debug, Error)]
pub enum LineupError {
    /// The player file could not be opened or read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    /// A row carries a numeric field that is missing, unparseable or out of range.
    #[error("malformed player data (row {row}, field {field}): {message}")]
    DataFormat {
        row: usize,
        field: String,
        message: String,
    },

    /// Two catalog entries map to the same decision-variable key.
    #[error("duplicate decision variable key: {key}")]
    DuplicateVariable { key: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid model: {0}")]
    InvalidModel(String),

    /// No lineup satisfies every constraint at once.
    ///
    /// `conflicting` lists the labels of a minimal conflicting subset when
    /// diagnosis is enabled, and is empty otherwise.
    #[error("no lineup satisfies every constraint (conflicting: [{}])", .conflicting.join(", "))]
    Infeasible { conflicting: Vec<String> },

    #[error("model is unbounded")]
    Unbounded,

    /// The solver hit its time limit before proving optimality.
    #[error("solver stopped after {elapsed_ms} ms without proving optimality")]
    Timeout { elapsed_ms: u64 },

    #[error("solve was cancelled")]
    Cancelled,

    /// The solver's assignment contradicts the model it was given.
    #[error("inconsistent solution: {0}")]
    InconsistentSolution(String),
}

impl LineupError {
    /// Shorthand for a [`LineupError::DataFormat`].
    pub fn data_format(row: usize, field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::DataFormat {
            row,
            field: field.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infeasible_message_lists_labels() {
        let err = LineupError::Infeasible {
            conflicting: vec!["salary_cap".into(), "offense_count".into()],
        };
        assert_eq!(
            err.to_string(),
            "no lineup satisfies every constraint (conflicting: [salary_cap, offense_count])"
        );
    }

    #[test]
    fn test_data_format_message() {
        let err = LineupError::data_format(3, "salary", "must be positive");
        assert_eq!(
            err.to_string(),
            "malformed player data (row 3, field salary): must be positive"
        );
    }
}
