//! Pure data structures: points, trace requests/results, device identity and location faults.
//!
//! The actor-owned entities ([`TraceSession`](crate::trace_actor::TraceSession),
//! [`PositionFeed`](crate::feed_actor::PositionFeed)) are built from these values.

pub mod device;
pub mod location;
pub mod point;
pub mod trace;

pub use device::*;
pub use location::*;
pub use point::*;
pub use trace::*;
