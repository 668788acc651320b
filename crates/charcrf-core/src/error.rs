use thiserror::Error;

/// Errors that can occur while building or running the character encoder.
#[derive(Debug, Error)]
pub enum CharCrfError {
    /// A hyperparameter is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A word matrix does not have shape `[word_length x n_chars]`.
    #[error("word {index}: expected shape [word_length x {expected}], got {actual:?}")]
    ShapeMismatch {
        /// Position of the offending word in the input list.
        index: usize,
        /// The configured character width.
        expected: usize,
        /// The dims of the word tensor as received.
        actual: Vec<usize>,
    },

    /// A word matrix has no characters.
    #[error("word {index} has zero length")]
    EmptyWord {
        /// Position of the offending word in the input list.
        index: usize,
    },

    /// Candle ML framework error.
    #[error("ML inference error: {0}")]
    Candle(#[from] candle_core::Error),

    /// The configuration JSON could not be parsed.
    #[error("failed to parse config: {0}")]
    Config(#[from] serde_json::Error),

    /// The configuration file could not be read.
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for charcrf operations.
pub type Result<T> = std::result::Result<T, CharCrfError>;
