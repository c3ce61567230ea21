use thiserror::Error;

/// Main error type for colsum
///
/// The summing pipeline itself is infallible: unparseable cells resolve to
/// a sentinel and malformed tables to empty footers. Errors only exist at
/// the edges (file access, selector compilation, configuration).
#[derive(Error, Debug)]
pub enum ColsumError {
    #[error("File I/O error: {path}")]
    FileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("HTML selector error: {message}")]
    Selector { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("General error: {0}")]
    General(#[from] anyhow::Error),
}

impl ColsumError {
    /// Create a file I/O error
    pub fn file_io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::FileIo {
            path: path.into(),
            source,
        }
    }

    /// Create a selector compilation error
    pub fn selector(message: impl Into<String>) -> Self {
        Self::Selector {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

/// Result type alias for convenience
pub type ColsumResult<T> = Result<T, ColsumError>;
