//! Error types for the trace session.

use crate::resolver::ResolveError;
use crate::services::ServiceError;
use thiserror::Error;

/// Why a trace did not complete.
///
/// None of these escape to the caller of a trigger: the session turns them into
/// log lines (see [`TraceError::log_lines`]).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TraceError {
    /// Text that is neither a literal pair nor known to the geocoder.
    #[error("{0}")]
    Input(String),

    /// A resolved point with a non-finite or out-of-range coordinate.
    #[error("invalid coordinates")]
    InvalidCoordinates,

    /// The origin was the live position, but the feed has no fix yet.
    #[error("live position unavailable")]
    NoLiveFix,

    /// The geocoder or routing service could not be reached.
    #[error("{0}")]
    Network(String),

    /// The routing service answered with a non-success status.
    #[error("routing failed")]
    Server { status: u16, body: String },

    /// A service answered 2xx with a body we could not read.
    #[error("{0}")]
    BadResponse(String),

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl TraceError {
    /// Lines appended to the session log when a trace fails with this error.
    pub fn log_lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(2);
        if let TraceError::Server { status, body } = self {
            lines.push(format!("server_error status={status} {body}").trim_end().to_string());
        }
        lines.push(format!("error={self}"));
        lines
    }
}

impl From<ResolveError> for TraceError {
    fn from(e: ResolveError) -> Self {
        match e {
            ResolveError::NotFound(_) => TraceError::Input(e.to_string()),
            ResolveError::Transport(_) => TraceError::Network(e.to_string()),
            ResolveError::BadResponse(_) => TraceError::BadResponse(e.to_string()),
        }
    }
}

impl From<ServiceError> for TraceError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Transport(detail) => TraceError::Network(detail),
            ServiceError::Status { status, body } => TraceError::Server { status, body },
            ServiceError::Decode(detail) => TraceError::BadResponse(format!("malformed route response: {detail}")),
        }
    }
}

impl From<String> for TraceError {
    fn from(msg: String) -> Self {
        TraceError::ActorCommunicationError(msg)
    }
}
