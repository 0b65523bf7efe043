use thiserror::Error;

/// Failure reading or writing a data file.
#[derive(Error, Debug)]
pub enum DataFileError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid row {row}: {message}")]
    InvalidRow { row: usize, message: String },
}

impl DataFileError {
    pub(crate) fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
