//! # Mock Framework
//!
//! Utilities for testing clients in isolation.
//!
//! Use [`MockClient`] to queue expected requests with canned responses, or
//! [`create_mock_client`] to get a client and a raw receiver and answer requests by hand.

use crate::framework::{ActorEntity, FrameworkError, ResourceClient, ResourceRequest};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, oneshot};

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

type ActionMatcher<T> = Box<dyn Fn(&<T as ActorEntity>::Action) -> bool + Send>;

/// Represents an expected request to the mock client.
enum Expectation<T: ActorEntity> {
    Get {
        response: Result<T, FrameworkError>,
    },
    Action {
        matcher: Option<ActionMatcher<T>>,
        response: Result<T::ActionResult, FrameworkError>,
    },
}

type Expectations<T> = Arc<Mutex<VecDeque<Expectation<T>>>>;

/// A mock client with expectation tracking for fluent testing.
///
/// Requests are matched against expectations in the order they were queued.
/// A mismatch is answered with [`FrameworkError::ActorDropped`] and recorded,
/// so [`MockClient::verify`] fails afterwards.
///
/// # Example
/// ```ignore
/// let mut mock = MockClient::<TraceSession>::new();
/// mock.expect_action()
///     .matching(|a| matches!(a, TraceAction::AppendLog(_)))
///     .return_ok(TraceActionResult::Applied(true));
///
/// let client = TraceClient::new(mock.client());
/// // Use client in tests...
/// mock.verify(); // Ensures all expectations were met
/// ```
pub struct MockClient<T: ActorEntity> {
    client: ResourceClient<T>,
    expectations: Expectations<T>,
    failures: Arc<Mutex<Vec<String>>>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<T: ActorEntity> MockClient<T> {
    /// Creates a new mock client with no expectations.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<ResourceRequest<T>>(100);
        let expectations: Expectations<T> = Arc::new(Mutex::new(VecDeque::new()));
        let failures = Arc::new(Mutex::new(Vec::new()));
        let expectations_clone = expectations.clone();
        let failures_clone = failures.clone();

        // Spawn background task to handle requests
        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let expectation = expectations_clone.lock().unwrap().pop_front();

                match (request, expectation) {
                    (ResourceRequest::Get { respond_to }, Some(Expectation::Get { response })) => {
                        let _ = respond_to.send(response);
                    }
                    (
                        ResourceRequest::Action { action, respond_to },
                        Some(Expectation::Action { matcher, response }),
                    ) => {
                        if matcher.as_ref().is_some_and(|m| !m(&action)) {
                            failures_clone
                                .lock()
                                .unwrap()
                                .push(format!("action did not match expectation: {action:?}"));
                            let _ = respond_to.send(Err(FrameworkError::ActorDropped));
                        } else {
                            let _ = respond_to.send(response);
                        }
                    }
                    (ResourceRequest::Get { respond_to }, _) => {
                        failures_clone.lock().unwrap().push("unexpected Get".to_string());
                        let _ = respond_to.send(Err(FrameworkError::ActorDropped));
                    }
                    (ResourceRequest::Action { action, respond_to }, _) => {
                        failures_clone
                            .lock()
                            .unwrap()
                            .push(format!("unexpected action: {action:?}"));
                        let _ = respond_to.send(Err(FrameworkError::ActorDropped));
                    }
                }
            }
        });

        Self {
            client: ResourceClient::new(sender),
            expectations,
            failures,
            _handle: handle,
        }
    }

    /// Returns the client for use in tests.
    pub fn client(&self) -> ResourceClient<T> {
        self.client.clone()
    }

    /// Expects a `get` operation.
    pub fn expect_get(&mut self) -> GetExpectationBuilder<T> {
        GetExpectationBuilder {
            expectations: self.expectations.clone(),
        }
    }

    /// Expects an `action` operation.
    pub fn expect_action(&mut self) -> ActionExpectationBuilder<T> {
        ActionExpectationBuilder {
            matcher: None,
            expectations: self.expectations.clone(),
        }
    }

    /// Verifies that all expectations were met and nothing unexpected arrived.
    pub fn verify(&self) {
        let failures = self.failures.lock().unwrap();
        if !failures.is_empty() {
            panic!("Mock received unexpected requests: {failures:?}");
        }
        let exps = self.expectations.lock().unwrap();
        if !exps.is_empty() {
            panic!("Not all expectations were met. {} remaining", exps.len());
        }
    }
}

impl<T: ActorEntity> Default for MockClient<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `get` expectations.
pub struct GetExpectationBuilder<T: ActorEntity> {
    expectations: Expectations<T>,
}

impl<T: ActorEntity> GetExpectationBuilder<T> {
    /// Sets the expectation to return a snapshot.
    pub fn return_ok(self, value: T) {
        self.expectations
            .lock()
            .unwrap()
            .push_back(Expectation::Get { response: Ok(value) });
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: FrameworkError) {
        self.expectations
            .lock()
            .unwrap()
            .push_back(Expectation::Get { response: Err(error) });
    }
}

/// Builder for `action` expectations.
pub struct ActionExpectationBuilder<T: ActorEntity> {
    matcher: Option<ActionMatcher<T>>,
    expectations: Expectations<T>,
}

impl<T: ActorEntity> ActionExpectationBuilder<T> {
    /// Only accept actions for which `predicate` holds.
    pub fn matching(mut self, predicate: impl Fn(&T::Action) -> bool + Send + 'static) -> Self {
        self.matcher = Some(Box::new(predicate));
        self
    }

    /// Sets the expectation to return a successful result.
    pub fn return_ok(self, result: T::ActionResult) {
        self.expectations.lock().unwrap().push_back(Expectation::Action {
            matcher: self.matcher,
            response: Ok(result),
        });
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: FrameworkError) {
        self.expectations.lock().unwrap().push_back(Expectation::Action {
            matcher: self.matcher,
            response: Err(error),
        });
    }
}

// =============================================================================
// RAW HELPERS
// =============================================================================

/// Creates a client and the receiver its requests land on.
///
/// Useful when a test needs to hold a request open (e.g. to observe what a caller does
/// while an actor is slow) rather than answer it immediately.
pub fn create_mock_client<T: ActorEntity>(
    buffer_size: usize,
) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

/// Helper to verify that the next message is an Action request
pub async fn expect_action<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Action, oneshot::Sender<Result<T::ActionResult, FrameworkError>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Action { action, respond_to }) => Some((action, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    #[derive(Clone, Debug, PartialEq)]
    struct Lamp {
        on: bool,
    }

    #[derive(Debug, PartialEq)]
    enum LampAction {
        Toggle,
    }

    #[async_trait]
    impl ActorEntity for Lamp {
        type Action = LampAction;
        type ActionResult = bool;
        type Context = ();
        type Error = std::io::Error;

        async fn handle_action(&mut self, _action: LampAction, _ctx: &()) -> Result<bool, std::io::Error> {
            self.on = !self.on;
            Ok(self.on)
        }
    }

    #[tokio::test]
    async fn test_raw_mock_client() {
        let (client, mut receiver) = create_mock_client::<Lamp>(10);

        let task = tokio::spawn(async move { client.perform_action(LampAction::Toggle).await });

        let (action, responder) = expect_action(&mut receiver).await.expect("Expected Action request");
        assert_eq!(action, LampAction::Toggle);
        responder.send(Ok(true)).unwrap();

        assert!(task.await.unwrap().unwrap());
    }

    #[tokio::test]
    async fn test_mock_client_with_expectations() {
        let mut mock = MockClient::<Lamp>::new();
        mock.expect_action()
            .matching(|a| *a == LampAction::Toggle)
            .return_ok(true);
        mock.expect_get().return_ok(Lamp { on: true });

        let client = mock.client();
        assert!(client.perform_action(LampAction::Toggle).await.unwrap());
        assert_eq!(client.get().await.unwrap(), Lamp { on: true });

        mock.verify();
    }

    #[tokio::test]
    #[should_panic(expected = "unexpected Get")]
    async fn test_mock_client_records_unexpected_requests() {
        let mock = MockClient::<Lamp>::new();
        assert!(mock.client().get().await.is_err());
        mock.verify();
    }
}
