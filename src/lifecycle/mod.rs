//! System wiring and observability setup.

pub mod tracer_system;
pub mod tracing;

pub use self::tracing::setup_tracing;
pub use tracer_system::*;
