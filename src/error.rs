use thiserror::Error;

/// Why a dataset location string was rejected.
#[derive(Debug, Error)]
pub enum LocationError {
    #[error("'{0}' is neither an existing local path nor a valid http(s) URL")]
    NotAPathOrUrl(String),

    #[error("'{0}' does not point to a .csv or .parquet file")]
    UnsupportedExtension(String),
}

/// Failures while reading the first rows of a dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read dataset: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to fetch dataset: {0}")]
    Http(#[from] reqwest::Error),

    #[error("failed to parse dataset: {0}")]
    Csv(#[from] csv::Error),
}

/// Failures while fetching and extracting library documentation.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("failed to fetch documentation: {0}")]
    Http(#[from] reqwest::Error),

    #[error("documentation page yielded no extractable content")]
    Empty,
}

/// Infrastructure failures while staging candidate code for execution.
///
/// Faults raised by the candidate itself are not errors at this level;
/// they come back as a captured [`ExecutionFailure`](crate::workflow::ExecutionFailure).
#[derive(Debug, Error)]
pub enum ExecutorError {
    #[error("failed to stage code for execution: {0}")]
    Io(#[from] std::io::Error),
}
