//! Actions handled by the [`PositionFeed`](super::PositionFeed) actor.
//!
//! Reports from acquisition and watch tasks carry the start generation they belong to;
//! anything from an older generation is dropped.

use crate::model::{LocationFault, Point, RemoteDevice, WatchId};

#[derive(Debug, Clone)]
pub enum FeedAction {
    Start,
    Stop,
    Rename(String),
    DetectName,

    // --- Task reports ---
    Fix { generation: u64, point: Point },
    Fault { generation: u64, fault: LocationFault },
    Watching { generation: u64, id: WatchId },
    /// The watch could not be installed; nothing is left running for this generation.
    WatchFailed { generation: u64, fault: LocationFault },
    /// Canonical record returned by a presence upload.
    MergeRemote(RemoteDevice),
    /// Last known record fetched at startup.
    Bootstrap(RemoteDevice),
}

#[derive(Debug, Clone, PartialEq)]
pub enum FeedActionResult {
    Done,
    Started { generation: u64 },
    /// Whether a task report belonged to the current generation.
    Applied(bool),
}
