//! Type-safe wrappers around [`ResourceClient`](crate::framework::ResourceClient).

pub mod actor_client;
pub mod feed_client;
pub mod trace_client;

pub use actor_client::ActorClient;
pub use feed_client::*;
pub use trace_client::*;
