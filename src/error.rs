use thiserror::Error;

#[derive(Error, Debug)]
pub enum SudokuError {
    #[error("invalid board shape: {0}")]
    InvalidShape(String),

    #[error("value {value} out of range (0..={size})")]
    InvalidValue { value: u32, size: usize },

    #[error("cell ({row}, {col}) is outside a {size}x{size} board")]
    OutOfBounds { row: usize, col: usize, size: usize },

    #[error("cell ({row}, {col}) is a given and cannot be modified")]
    GivenCellImmutable { row: usize, col: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("no board loaded")]
    NoBoard,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type SudokuResult<T> = Result<T, SudokuError>;
