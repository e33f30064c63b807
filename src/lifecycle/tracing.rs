//! # Observability & Tracing
//!
//! [`setup_tracing`] initializes structured logging with the `tracing` crate.
//!
//! ## Configuration
//!
//! The subscriber uses a compact format that hides the crate/module prefix
//! (`with_target(false)`); actor events carry an `entity_type` field instead.
//! Levels come from `RUST_LOG`.
//!
//! ```bash
//! RUST_LOG=info neon-trace
//!
//! # Every action and pipeline report
//! RUST_LOG=debug neon-trace
//!
//! # Only the trace session
//! RUST_LOG=neon_trace::trace_actor=debug neon-trace
//! ```
//!
//! ## What Gets Traced
//!
//! - **Actor Lifecycle**: startup and shutdown, per `entity_type`
//! - **Actions**: each action at `debug`, failed actions at `warn`
//! - **Traces**: a `trace` span per trigger carrying its `seq`; superseded reports are
//!   noted at `debug`
//! - **Position Feed**: a `feed` span per start carrying its `generation`; faults at `warn`
//!
//! With `RUST_LOG=debug` a trace from the console looks like:
//!
//! ```text
//! INFO Actor started entity_type="TraceSession"
//! DEBUG Action entity_type="TraceSession" action=SetFields(FieldUpdate { .. })
//! DEBUG Action entity_type="TraceSession" action=Trigger(FromFields)
//! INFO Trace started seq=1 request=TraceRequest { .. }
//! DEBUG trace:resolve: literal coordinates seq=1 point=40.7,-74
//! DEBUG Action entity_type="TraceSession" action=Resolved { seq: 1, .. }
//! DEBUG Route received seq=1 points=12 steps=4
//! INFO Trace completed seq=1 elapsed_ms=953
//! ```
//!
//! The session log itself (`paths_analyzed=...`, `error=...`) is not a tracing event;
//! it goes to the render surface.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
