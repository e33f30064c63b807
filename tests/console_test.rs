use neon_trace::clients::TraceClient;
use neon_trace::console::{Console, Dispatched};
use neon_trace::framework::mock::MockClient;
use neon_trace::framework::FrameworkError;
use neon_trace::model::Profile;
use neon_trace::trace_actor::{FieldUpdate, TraceAction, TraceActionResult, TraceError, TraceSession, Trigger};

/// Console against a mocked trace session: checks exactly which actions each command sends.
#[tokio::test]
async fn test_trace_command_sets_fields_then_triggers() {
    let mut mock = MockClient::<TraceSession>::new();
    mock.expect_action()
        .matching(|a| {
            matches!(a, TraceAction::SetFields(update) if *update == FieldUpdate {
                origin_text: Some("New York".into()),
                destination_text: Some("Boston".into()),
                profile: Some(Profile::Walking),
                clear_points: true,
            })
        })
        .return_ok(TraceActionResult::Done);
    mock.expect_action()
        .matching(|a| matches!(a, TraceAction::Trigger(Trigger::FromFields)))
        .return_ok(TraceActionResult::Started { seq: 7 });

    let console = Console::new(TraceClient::new(mock.client()));
    let dispatched = console
        .dispatch(r#"trace --from "New York" --to "Boston" --profile walking"#)
        .await
        .unwrap();

    assert_eq!(dispatched, Dispatched::Trace { seq: 7 });
    mock.verify();
}

#[tokio::test]
async fn test_trace_command_without_profile_keeps_current_profile() {
    let mut mock = MockClient::<TraceSession>::new();
    mock.expect_action()
        .matching(|a| matches!(a, TraceAction::SetFields(FieldUpdate { profile: None, clear_points: true, .. })))
        .return_ok(TraceActionResult::Done);
    mock.expect_action()
        .matching(|a| matches!(a, TraceAction::Trigger(Trigger::FromFields)))
        .return_ok(TraceActionResult::Started { seq: 1 });

    let console = Console::new(TraceClient::new(mock.client()));
    console.dispatch(r#"trace --from "a" --to "b""#).await.unwrap();
    mock.verify();
}

#[tokio::test]
async fn test_hack_command() {
    let mut mock = MockClient::<TraceSession>::new();
    mock.expect_action()
        .matching(|a| matches!(a, TraceAction::HackSequence))
        .return_ok(TraceActionResult::Done);

    let console = Console::new(TraceClient::new(mock.client()));
    assert_eq!(console.dispatch("sudo hack").await.unwrap(), Dispatched::Hack);
    mock.verify();
}

#[tokio::test]
async fn test_unknown_command_is_logged() {
    let mut mock = MockClient::<TraceSession>::new();
    mock.expect_action()
        .matching(|a| matches!(a, TraceAction::AppendLog(line) if line == "unknown_command"))
        .return_ok(TraceActionResult::Done);

    let console = Console::new(TraceClient::new(mock.client()));
    assert_eq!(console.dispatch("make coffee").await.unwrap(), Dispatched::Unknown);
    mock.verify();
}

#[tokio::test]
async fn test_blank_input_sends_nothing() {
    let mock = MockClient::<TraceSession>::new();

    let console = Console::new(TraceClient::new(mock.client()));
    assert_eq!(console.dispatch("   ").await.unwrap(), Dispatched::Ignored);
    mock.verify();
}

#[tokio::test]
async fn test_actor_failure_is_reported() {
    let mut mock = MockClient::<TraceSession>::new();
    mock.expect_action().return_err(FrameworkError::ActorClosed);

    let console = Console::new(TraceClient::new(mock.client()));
    let result = console.dispatch("sudo hak").await;

    assert!(matches!(result, Err(TraceError::ActorCommunicationError(_))));
    mock.verify();
}
