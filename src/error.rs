use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("unknown size class '{0}' (expected small, medium or large)")]
    UnknownSize(String),
    #[error("unknown priority class '{0}' (expected standard, express or urgent)")]
    UnknownPriority(String),
    #[error("unknown parcel status '{0}'")]
    UnknownStatus(String),
    #[error("weight '{0}' is not a positive number of kilograms")]
    InvalidWeight(String),
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read table: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("line {line}: {reason}")]
    MalformedRow { line: usize, reason: String },
    #[error("line {line}: invalid distance {distance} km between '{from}' and '{to}'")]
    InvalidDistance {
        line: usize,
        from: String,
        to: String,
        distance: f64,
    },
}

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("parcel '{0}' not found")]
    NotFound(String),
    #[error("cannot book a parcel weighing {0} kg")]
    InvalidWeight(f64),
    #[error("could not allocate a free tracking number after {0} attempts")]
    TrackingNumbersExhausted(usize),
    #[error("stored parcel '{tracking_number}' is corrupt: {reason}")]
    CorruptRow {
        tracking_number: String,
        reason: String,
    },
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error(transparent)]
    Parse(#[from] ParseError),
}
