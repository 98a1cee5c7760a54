use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("dataset is missing required columns: {}", .columns.join(", "))]
    MissingColumns { columns: Vec<String> },

    #[error("row {row}: unparseable date '{value}'")]
    DateParse { row: usize, value: String },

    #[error("row {row}: unparseable {column} value '{value}'")]
    NumberParse {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("dataset contains no rows")]
    EmptyDataset,

    #[error("month '{month}' is not present in the dataset")]
    UnknownMonth { month: String },

    #[error("{metric} is undefined: total visits is zero")]
    RateUndefined { metric: &'static str },

    #[error("invalid synthetic KPI parameters: {detail}")]
    SyntheticParams { detail: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type DashboardResult<T> = Result<T, DashboardError>;
