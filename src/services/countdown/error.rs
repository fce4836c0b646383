use thiserror::Error;

use crate::models::countdown::CountdownId;

#[derive(Debug, Error)]
pub enum CountdownError {
    #[error("no storage context available")]
    StorageUnavailable,

    #[error("no countdown at row {index} (list has {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("countdown {0:?} is not in the list")]
    UnknownCountdown(CountdownId),

    #[error("no edit in progress")]
    NoEditInProgress,

    #[error("failed to fetch countdowns: {0:#}")]
    Fetch(anyhow::Error),

    #[error("failed to save countdowns: {0:#}")]
    Save(anyhow::Error),

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

pub type CountdownResult<T> = Result<T, CountdownError>;
