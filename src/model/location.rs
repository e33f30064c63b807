use std::fmt;

/// Accuracy hint passed to a location provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accuracy {
    High,
    Low,
}

/// Category of a location failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    PermissionDenied,
    ServiceUnavailable,
    Timeout,
}

impl FaultKind {
    /// Short code used in `geo_error=` log lines.
    pub fn code(self) -> &'static str {
        match self {
            Self::PermissionDenied => "permission_denied",
            Self::ServiceUnavailable => "unavailable",
            Self::Timeout => "timeout",
        }
    }
}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Why the position feed could not produce a fix.
///
/// Kept as state on the feed (not a one-shot log line) until a later fix clears it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {detail}")]
pub struct LocationFault {
    pub kind: FaultKind,
    pub detail: String,
}

impl LocationFault {
    pub fn new(kind: FaultKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }

    pub fn permission_denied(detail: impl Into<String>) -> Self {
        Self::new(FaultKind::PermissionDenied, detail)
    }

    pub fn unavailable(detail: impl Into<String>) -> Self {
        Self::new(FaultKind::ServiceUnavailable, detail)
    }

    pub fn timeout(detail: impl Into<String>) -> Self {
        Self::new(FaultKind::Timeout, detail)
    }

    /// The `geo_error=...` line appended to the session log.
    pub fn log_line(&self) -> String {
        format!("geo_error={} {}", self.kind.code(), self.detail)
    }
}

/// Handle of an active watch subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WatchId(pub u64);

impl fmt::Display for WatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "watch#{}", self.0)
    }
}
