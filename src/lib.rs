//! # Neon Trace
//!
//! > **The core of an interactive path-tracing map client.**
//!
//! Two locations go in (free text, literal `lat,lng`, a map click or the device's live
//! position); the routing service computes a path; the client draws it and streams the
//! service's analysis into a log, one line every 180 ms. Alongside, a position feed keeps
//! the device's own location current and reports it to a presence endpoint.
//!
//! ## 🏗️ Design
//!
//! State lives in two actors built on one generic [`ResourceActor`](framework::ResourceActor):
//!
//! - **Trace session** ([`trace_actor`]): input fields, log, current result, state machine.
//! - **Position feed** ([`feed_actor`]): device profile, live position, location fault, watch.
//!
//! Each actor processes its messages one at a time, so its state has a single writer.
//! Slow work (geocoding, routing, timers, location fixes, uploads) runs in spawned tasks
//! that report back through the actor's own channel. Reports carry the sequence number
//! (trace) or start generation (feed) that produced them, and the actor drops anything
//! that is no longer current: a slow response for an old trace can never overwrite the
//! log of a new one.
//!
//! ### Async Context Injection
//! Dependencies are injected via `run()`, not at construction time. This is how the
//! trace session can read the feed's position while the feed writes into the session's
//! log without either actor owning the other.
//!
//! ### Errors
//! Each component has its own `thiserror` enum. Clients recover an actor's typed error
//! from [`FrameworkError::EntityError`](framework::FrameworkError::EntityError) by
//! downcasting. Nothing is fatal: trace failures become `error=` log lines, location
//! faults become feed state.
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Engine ([`framework`])
//! The generic actor loop, clients and the [`MockClient`](framework::mock::MockClient).
//!
//! ### 2. The Orchestrator ([`lifecycle`])
//! [`TracerSystem`](lifecycle::TracerSystem) wires the actors to their services and
//! shuts them down; [`setup_tracing`](lifecycle::setup_tracing) installs the subscriber.
//!
//! ### 3. The Interface ([`clients`], [`console`])
//! [`TraceClient`](clients::TraceClient) and [`FeedClient`](clients::FeedClient) wrap the
//! generic client; the [`console`] parses `trace --from "..." --to "..."` and friends.
//!
//! ### 4. The Implementation ([`trace_actor`], [`feed_actor`], [`resolver`])
//! The two entities and the coordinate resolver they depend on.
//!
//! ### 5. The Edges ([`services`], [`model`], [`config`])
//! Trait seams for HTTP, geocoding, location, storage and the render surface, with
//! production implementations and in-memory fakes; plain data types; environment config.
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! # Routing service on localhost:3001, fixed position for the feed
//! NEON_TRACE_LAT=40.7 NEON_TRACE_LNG=-74.0 RUST_LOG=info cargo run
//! > trace --from "40.7,-74.0" --to "Boston, MA" --profile walking
//! ```
//!
//! ### Running Tests
//!
//! ```bash
//! cargo test
//! ```

pub mod clients;
pub mod config;
pub mod console;
pub mod feed_actor;
pub mod framework;
pub mod lifecycle;
pub mod model;
pub mod resolver;
pub mod services;
pub mod trace_actor;
