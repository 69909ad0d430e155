//! Error types shared by the record, collection and command layers.

use thiserror::Error;

/// Every way a box-score operation can fail.
#[derive(Error, Debug)]
pub enum StatError {
    #[error("{value:?} cannot be converted to a number for field {field}")]
    Parse { field: String, value: String },

    #[error("expected {expected} fields in a game row, found {found}")]
    FieldCount { expected: usize, found: usize },

    #[error("invalid outcome {0:?}: expected \"W\" or \"L\"")]
    InvalidOutcome(String),

    #[error("unknown field: {0}")]
    UnknownField(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("advanced score is undefined for {id}: no field goal or free throw attempts")]
    Division { id: String },

    #[error("command not found: {0}")]
    CommandNotFound(String),

    #[error("{command} takes {expected} argument(s), got {found}")]
    Argument {
        command: String,
        expected: String,
        found: usize,
    },

    #[error("line {line}: {source}")]
    Row {
        line: u64,
        #[source]
        source: Box<StatError>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, StatError>;

impl StatError {
    /// Attach the file line a construction error came from.
    pub fn at_line(self, line: u64) -> Self {
        StatError::Row {
            line,
            source: Box::new(self),
        }
    }

    /// True for errors raised while turning raw text into a game.
    pub fn is_parse(&self) -> bool {
        match self {
            StatError::Parse { .. }
            | StatError::FieldCount { .. }
            | StatError::InvalidOutcome(_) => true,
            StatError::Row { source, .. } => source.is_parse(),
            _ => false,
        }
    }
}
