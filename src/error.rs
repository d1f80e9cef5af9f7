use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("could not read dataset: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed csv input: {0}")]
    Csv(#[from] csv::Error),
    #[error("dataset is missing required columns {columns:?}")]
    MissingColumns { columns: Vec<String> },
    #[error("grouping needs one value per key, got {keys} keys and {values} values")]
    InvalidInput { keys: usize, values: usize },
    #[error("cannot compute the range of an empty {field} column")]
    EmptyInput { field: &'static str },
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
