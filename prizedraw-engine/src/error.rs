use thiserror::Error;

pub type Result<T> = std::result::Result<T, DrawError>;

#[derive(Error, Debug)]
pub enum DrawError {
    #[error("Prize draw core error: {0}")]
    Core(#[from] prizedraw_core::PrizeDrawError),

    #[error("Number of winners must be at least 1, got {0}")]
    NonPositiveWinnerCount(usize),

    #[error("Not enough eligible participants: {available} available, {requested} requested")]
    InsufficientParticipants { available: usize, requested: usize },

    #[error("No prizes entered")]
    NoPrizes,

    #[error("A draw is already in progress")]
    DrawInProgress,

    #[error("Draw was cancelled by a session reset")]
    Cancelled,

    #[error("Prize name cannot be empty")]
    EmptyPrize,

    #[error("No prize at position {0}")]
    PrizeNotFound(usize),

    #[error("No winners in history yet")]
    NoWinners,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DrawError {
    /// Draw request rejected before anything started
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::NonPositiveWinnerCount(_) | Self::InsufficientParticipants { .. } | Self::NoPrizes
        )
    }
}
