use crate::framework::{ActorEntity, FrameworkError, ResourceClient};
use async_trait::async_trait;

/// Trait for resource-specific clients to inherit the standard operations.
///
/// This trait reduces boilerplate by providing default implementations for
/// fetching a snapshot and sending an action.
#[async_trait]
pub trait ActorClient<T: ActorEntity>: Send + Sync {
    /// The resource-specific error type.
    type Error: From<String> + Send + Sync;

    /// Access the inner generic ResourceClient.
    fn inner(&self) -> &ResourceClient<T>;

    /// Map framework errors to the specific resource error type.
    fn map_error(e: FrameworkError) -> Self::Error;

    /// Fetch a snapshot of the entity.
    #[tracing::instrument(skip(self))]
    async fn snapshot(&self) -> Result<T, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().get().await.map_err(Self::map_error)
    }

    /// Send an action and wait for its result.
    #[tracing::instrument(skip(self))]
    async fn perform(&self, action: T::Action) -> Result<T::ActionResult, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().perform_action(action).await.map_err(Self::map_error)
    }
}

/// Recovers the entity's own error type from a [`FrameworkError`], falling back to
/// `E::from(message)` for channel failures.
pub(crate) fn recover_entity_error<E>(e: FrameworkError) -> E
where
    E: std::error::Error + From<String> + 'static,
{
    match e {
        FrameworkError::EntityError(inner) => match inner.downcast::<E>() {
            Ok(typed) => *typed,
            Err(other) => E::from(other.to_string()),
        },
        other => E::from(other.to_string()),
    }
}
