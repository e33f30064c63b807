use crate::model::LocationFault;
use crate::services::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error(transparent)]
    Location(#[from] LocationFault),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<String> for FeedError {
    fn from(msg: String) -> Self {
        FeedError::ActorCommunicationError(msg)
    }
}
