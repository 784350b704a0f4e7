use thiserror::Error;

pub type Result<T> = std::result::Result<T, PrizeDrawError>;

#[derive(Error, Debug)]
pub enum PrizeDrawError {
    #[error("CSV file is empty")]
    EmptyFile,

    #[error("Invalid CSV header, missing column(s): {}", .0.join(", "))]
    MissingHeaders(Vec<String>),

    #[error("No valid participants found in CSV")]
    NoParticipants,

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("No winners in history")]
    EmptyHistory,

    #[error("Invalid timestamp '{value}': {reason}")]
    InvalidTimestamp { value: String, reason: String },

    #[error("External service error: {0}")]
    ExternalService(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl PrizeDrawError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn external(msg: impl Into<String>) -> Self {
        Self::ExternalService(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Errors raised while reading a participant list
    pub fn is_import_error(&self) -> bool {
        matches!(
            self,
            Self::EmptyFile | Self::MissingHeaders(_) | Self::NoParticipants | Self::Csv(_)
        )
    }

    /// Errors raised by the thank-you message service
    pub fn is_external_error(&self) -> bool {
        matches!(self, Self::ExternalService(_) | Self::Http(_))
    }
}
