//! # Core Actor Framework
//!
//! This module defines the generic building blocks for the actor system.
//!
//! ## Key Types
//!
//! - [`ActorEntity`]: The trait that every actor-owned resource must implement.
//! - [`ResourceActor`]: The generic actor that owns one entity and serialises access to it.
//! - [`ResourceClient`]: The generic client for communicating with actors.
//! - [`WeakResourceClient`]: A non-owning client, used by an entity to report back to its own actor.
//! - [`FrameworkError`]: Common errors (e.g., ActorClosed, ActorDropped).

use async_trait::async_trait;
use std::fmt::Debug;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

// =============================================================================
// 1. THE ABSTRACTION (Trait with Hooks and Actions)
// =============================================================================

/// Trait that a resource must implement to be owned by a [`ResourceActor`].
///
/// # Architecture Note
/// Each actor owns exactly one entity (the trace session, the position feed).
/// All mutation goes through [`ActorEntity::handle_action`], which the actor calls
/// sequentially, so the entity never needs a lock for its own state.
///
/// # Async & Context
/// This trait is `#[async_trait]` to allow asynchronous operations in hooks.
/// It also defines a `Context` type, which is injected into every hook. This allows "Late Binding"
/// of dependencies (passing clients to `run()` instead of `new()`), which is how two actors
/// that need each other get wired without a construction cycle.
///
/// # Provided Methods (Hooks)
/// - [`ActorEntity::on_start`] runs once before the first message.
/// - [`ActorEntity::on_stop`] runs once after the channel closes.
#[async_trait]
pub trait ActorEntity: Clone + Send + Sync + 'static {
    /// Enum of resource-specific operations.
    type Action: Send + Sync + Debug;

    /// The result type returned by actions.
    type ActionResult: Send + Sync + Debug;

    /// The runtime context (dependencies) injected into the actor.
    /// Use `()` if no dependencies are needed.
    type Context: Send + Sync;

    /// The error type for this entity. Clients recover it from
    /// [`FrameworkError::EntityError`] by downcasting.
    type Error: std::error::Error + Send + Sync + 'static;

    // --- Lifecycle Hooks (Async) ---

    /// Called once when the actor loop starts, before any message is processed.
    async fn on_start(&mut self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Called once after the last client is gone.
    async fn on_stop(&mut self, _ctx: &Self::Context) {}

    // --- Action Handler (Async) ---

    /// Handle a resource-specific action.
    async fn handle_action(
        &mut self,
        action: Self::Action,
        ctx: &Self::Context,
    ) -> Result<Self::ActionResult, Self::Error>;
}

// =============================================================================
// 2. THE GENERIC MESSAGES & ERRORS
// =============================================================================

/// Errors that can occur within the actor framework itself.
#[derive(Debug, thiserror::Error)]
pub enum FrameworkError {
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped response channel")]
    ActorDropped,
    #[error("Entity error: {0}")]
    EntityError(Box<dyn std::error::Error + Send + Sync>),
}

/// Type alias for the one-shot response channel used by actors.
pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// Internal message type sent to the actor.
///
/// - **Get**: returns a snapshot (clone) of the entity.
/// - **Action**: executes an [`ActorEntity::Action`] against the entity.
#[derive(Debug)]
pub enum ResourceRequest<T: ActorEntity> {
    Get {
        respond_to: Response<T>,
    },
    Action {
        action: T::Action,
        respond_to: Response<T::ActionResult>,
    },
}

// =============================================================================
// 3. THE GENERIC ACTOR SERVER
// =============================================================================

/// The generic actor that owns a single entity.
///
/// # Architecture Note
/// This struct is the "Server" half of the actor. It owns the state (`entity`) and
/// the receiver end of the channel. Messages are processed one at a time, so every
/// write to the entity happens on this task.
pub struct ResourceActor<T: ActorEntity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    entity: T,
}

impl<T: ActorEntity> ResourceActor<T> {
    /// Creates the actor around `entity` and returns it with its client.
    pub fn new(entity: T, buffer_size: usize) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self { receiver, entity };
        let client = ResourceClient::new(sender);
        (actor, client)
    }

    /// Runs the actor's event loop, processing messages until every strong client is dropped.
    ///
    /// # Context Injection
    /// The `context` argument is injected into every entity hook. This allows the entity
    /// to reach dependencies (other clients, services) that were created *after*
    /// the actor was instantiated but *before* the loop started.
    pub async fn run(mut self, context: T::Context) {
        // Extract just the type name (e.g., "TraceSession" instead of the full path)
        let entity_type = std::any::type_name::<T>()
            .split("::")
            .last()
            .unwrap_or("Unknown");
        info!(entity_type, "Actor started");

        if let Err(e) = self.entity.on_start(&context).await {
            warn!(entity_type, error = %e, "on_start failed");
        }

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Get { respond_to } => {
                    debug!(entity_type, "Get");
                    let _ = respond_to.send(Ok(self.entity.clone()));
                }
                ResourceRequest::Action { action, respond_to } => {
                    debug!(entity_type, ?action, "Action");
                    let result = self
                        .entity
                        .handle_action(action, &context)
                        .await
                        .map_err(|e| FrameworkError::EntityError(Box::new(e)));
                    if let Err(e) = &result {
                        warn!(entity_type, error = %e, "Action failed");
                    }
                    let _ = respond_to.send(result);
                }
            }
        }

        self.entity.on_stop(&context).await;
        info!(entity_type, "Shutdown");
    }
}

// =============================================================================
// 4. THE GENERIC CLIENT
// =============================================================================

/// A type-safe client for interacting with a `ResourceActor`.
#[derive(Clone)]
pub struct ResourceClient<T: ActorEntity> {
    sender: mpsc::Sender<ResourceRequest<T>>,
}

impl<T: ActorEntity> ResourceClient<T> {
    pub fn new(sender: mpsc::Sender<ResourceRequest<T>>) -> Self {
        Self { sender }
    }

    /// Fetches a snapshot of the entity.
    pub async fn get(&self) -> Result<T, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(ResourceRequest::Get { respond_to })
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn perform_action(&self, action: T::Action) -> Result<T::ActionResult, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(ResourceRequest::Action { action, respond_to })
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    /// Returns a handle that does not keep the actor alive.
    pub fn downgrade(&self) -> WeakResourceClient<T> {
        WeakResourceClient {
            sender: self.sender.downgrade(),
        }
    }
}

/// A client that does not count towards keeping the actor alive.
///
/// Entities hold one of these to their own actor inside their context: a strong
/// client there would keep the channel open forever and block shutdown.
#[derive(Clone)]
pub struct WeakResourceClient<T: ActorEntity> {
    sender: mpsc::WeakSender<ResourceRequest<T>>,
}

impl<T: ActorEntity> WeakResourceClient<T> {
    /// Returns a strong client, or `None` once the actor is shutting down.
    pub fn upgrade(&self) -> Option<ResourceClient<T>> {
        self.sender.upgrade().map(ResourceClient::new)
    }

    /// Sends an action if the actor is still alive.
    pub async fn perform_action(&self, action: T::Action) -> Result<T::ActionResult, FrameworkError> {
        match self.upgrade() {
            Some(client) => client.perform_action(action).await,
            None => Err(FrameworkError::ActorClosed),
        }
    }
}

// =============================================================================
// 5. EXAMPLE USAGE (Test)
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Counter {
        value: i64,
        started: bool,
    }

    #[derive(Debug)]
    enum CounterAction {
        Add(i64),
        FailIfNegative,
    }

    #[derive(Debug, thiserror::Error, PartialEq)]
    #[error("negative: {0}")]
    struct Negative(i64);

    #[async_trait]
    impl ActorEntity for Counter {
        type Action = CounterAction;
        type ActionResult = i64;
        type Context = ();
        type Error = Negative;

        async fn on_start(&mut self, _ctx: &()) -> Result<(), Negative> {
            self.started = true;
            Ok(())
        }

        async fn handle_action(&mut self, action: CounterAction, _ctx: &()) -> Result<i64, Negative> {
            match action {
                CounterAction::Add(n) => {
                    self.value += n;
                    Ok(self.value)
                }
                CounterAction::FailIfNegative if self.value < 0 => Err(Negative(self.value)),
                CounterAction::FailIfNegative => Ok(self.value),
            }
        }
    }

    #[tokio::test]
    async fn test_actor_actions_and_snapshot() {
        let (actor, client) = ResourceActor::new(Counter { value: 0, started: false }, 8);
        let handle = tokio::spawn(actor.run(()));

        assert_eq!(client.perform_action(CounterAction::Add(5)).await.unwrap(), 5);
        assert_eq!(client.perform_action(CounterAction::Add(-7)).await.unwrap(), -2);

        let snapshot = client.get().await.unwrap();
        assert_eq!(snapshot, Counter { value: -2, started: true });

        match client.perform_action(CounterAction::FailIfNegative).await {
            Err(FrameworkError::EntityError(e)) => {
                let typed = e.downcast::<Negative>().unwrap();
                assert_eq!(*typed, Negative(-2));
            }
            other => panic!("unexpected result: {other:?}"),
        }

        drop(client);
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_weak_client_does_not_keep_actor_alive() {
        let (actor, client) = ResourceActor::new(Counter { value: 0, started: false }, 8);
        let handle = tokio::spawn(actor.run(()));
        let weak = client.downgrade();

        assert_eq!(weak.perform_action(CounterAction::Add(1)).await.unwrap(), 1);

        drop(client);
        handle.await.unwrap();
        assert!(weak.upgrade().is_none());
        assert!(matches!(
            weak.perform_action(CounterAction::Add(1)).await,
            Err(FrameworkError::ActorClosed)
        ));
    }
}
