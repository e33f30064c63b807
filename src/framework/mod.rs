//! Generic actor framework for single-resource actors.
//!
//! This module provides the building blocks the trace session and the position feed
//! are built on: an entity owned by one actor task, mutated only through actions.
//!
//! # Main Components
//!
//! - [`ActorEntity`] - Trait that resource types implement to be owned by an actor
//! - [`ResourceActor`] - Generic actor loop
//! - [`ResourceClient`] / [`WeakResourceClient`] - Typed handles for sending requests
//! - [`FrameworkError`] - Common error types
//!
//! # Testing
//!
//! See [`mock`] module for utilities to test clients without spawning full actors.

pub mod core;
pub mod mock;

// Re-export core types for convenience
pub use core::*;
