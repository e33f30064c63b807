mod common;

use common::{harness, ok_route, wait_for_feed, wait_for_outcome, wait_until, BOSTON, NEW_YORK};
use neon_trace::clients::ActorClient;
use neon_trace::model::{Point, Profile, RouteRequest, TraceOutcome, TraceState};
use neon_trace::services::fake::{route_response, FakeGeocoder, FixScript, ScriptedLocationProvider, SurfaceEvent};
use neon_trace::services::{Cue, MarkerSlot, ServiceError};
use neon_trace::trace_actor::FieldUpdate;
use std::sync::Arc;
use std::time::Duration;

#[tokio::test(start_paused = true)]
async fn test_literal_coordinates_skip_the_geocoder() {
    let h = harness().build();
    h.routing.respond(Ok(ok_route(&["scan"], 3, "A*")));

    h.trace()
        .set_fields(FieldUpdate {
            origin_text: Some("40.7,-74.0".into()),
            destination_text: Some(" 42.36 , -71.06 ".into()),
            ..FieldUpdate::default()
        })
        .await
        .unwrap();
    let seq = h.trace().trigger_from_fields().await.unwrap();
    let session = wait_for_outcome(h.trace(), seq).await;

    assert_eq!(session.last_outcome, Some(TraceOutcome::Completed { seq }));
    assert!(h.geocoder.calls().is_empty());
    assert_eq!(
        h.routing.requests(),
        vec![RouteRequest {
            origin: NEW_YORK,
            destination: BOSTON,
            profile: Profile::Driving,
        }]
    );
    h.system.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_log_is_cleared_and_ends_with_three_summary_lines() {
    let h = harness().build();
    h.routing.respond(Ok(ok_route(&["expand frontier", "relax edges"], 1234, "bidirectional-dijkstra")));

    h.trace().append_log("left over from before").await.unwrap();
    let seq = h.trace().trigger_with_points(NEW_YORK, BOSTON).await.unwrap();
    let session = wait_for_outcome(h.trace(), seq).await;

    assert_eq!(session.log.len(), 5, "{:?}", session.log);
    assert_eq!(session.log[..4], ["expand frontier", "relax edges", "paths_analyzed=1234", "algorithm=bidirectional-dijkstra"]);
    let elapsed: u64 = session.log[4]
        .strip_prefix("time_ms=")
        .expect("time_ms line")
        .parse()
        .expect("numeric elapsed time");
    // Two paced steps.
    assert!(elapsed >= 360, "elapsed {elapsed}");

    assert_eq!(session.state, TraceState::Idle);
    assert_eq!(h.cues.played(), vec![Cue::Type, Cue::Route]);

    let events = h.surface.events();
    let cleared = events.iter().position(|e| *e == SurfaceEvent::ClearLog).unwrap();
    let stale = events
        .iter()
        .position(|e| *e == SurfaceEvent::Log("left over from before".into()))
        .unwrap();
    assert!(stale < cleared);
    h.system.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_steps_are_paced_in_order() {
    let h = harness().build();
    h.routing.respond(Ok(ok_route(&["one", "two", "three", "four"], 9, "A*")));

    let seq = h.trace().trigger_with_points(NEW_YORK, BOSTON).await.unwrap();
    wait_for_outcome(h.trace(), seq).await;

    let times = h.surface.log_times();
    let lines: Vec<&str> = times.iter().map(|(_, line)| line.as_str()).collect();
    assert_eq!(lines[..4], ["one", "two", "three", "four"]);
    for pair in times[..5].windows(2) {
        let gap = pair[1].0 - pair[0].0;
        assert!(gap >= Duration::from_millis(180), "{} -> {} after {gap:?}", pair[0].1, pair[1].1);
    }
    h.system.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_one_failed_resolution_means_no_routing_call() {
    let h = harness()
        .geocoder(FakeGeocoder::new().with_place("Boston", BOSTON).with_delay(Duration::from_millis(50)))
        .build();

    h.trace()
        .set_fields(FieldUpdate {
            origin_text: Some("Atlantis".into()),
            destination_text: Some("Boston".into()),
            ..FieldUpdate::default()
        })
        .await
        .unwrap();
    let seq = h.trace().trigger_from_fields().await.unwrap();
    let session = wait_for_outcome(h.trace(), seq).await;

    assert_eq!(session.log, vec!["error=location not found: Atlantis"]);
    assert_eq!(
        session.last_outcome,
        Some(TraceOutcome::Failed {
            seq,
            message: "location not found: Atlantis".into()
        })
    );
    assert_eq!(session.state, TraceState::Idle);
    assert!(h.routing.requests().is_empty());
    h.system.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_out_of_range_point_is_rejected_before_routing() {
    let h = harness().build();

    h.trace().set_origin_text("123.5,500").await.unwrap();
    h.trace().set_destination_text("42.36,-71.06").await.unwrap();
    let seq = h.trace().trigger_from_fields().await.unwrap();
    let session = wait_for_outcome(h.trace(), seq).await;

    assert_eq!(session.log, vec!["error=invalid coordinates"]);
    assert!(h.routing.requests().is_empty());

    let seq = h.trace().trigger_with_points(Point::new(f64::NAN, 0.0), BOSTON).await.unwrap();
    let session = wait_for_outcome(h.trace(), seq).await;
    assert_eq!(session.log, vec!["error=invalid coordinates"]);
    assert!(h.routing.requests().is_empty());
    h.system.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_markers_are_published_before_the_path() {
    let h = harness().build();
    h.routing.respond_after(Duration::from_secs(1), Ok(ok_route(&["scan"], 1, "A*")));

    let seq = h.trace().trigger_with_points(NEW_YORK, BOSTON).await.unwrap();
    wait_until(Duration::from_secs(5), || {
        h.surface.events().contains(&SurfaceEvent::Marker(MarkerSlot::Destination, BOSTON))
    })
    .await;
    // Markers are up while the routing call is still pending.
    let session = h.trace().snapshot().await.unwrap();
    assert_eq!(session.state, TraceState::Requesting);
    assert_eq!((session.origin, session.destination), (Some(NEW_YORK), Some(BOSTON)));

    wait_for_outcome(h.trace(), seq).await;
    let events = h.surface.events();
    let marker = events
        .iter()
        .position(|e| *e == SurfaceEvent::Marker(MarkerSlot::Origin, NEW_YORK))
        .unwrap();
    let fit = events.iter().position(|e| matches!(e, SurfaceEvent::FitView(_))).unwrap();
    let path = events
        .iter()
        .position(|e| matches!(e, SurfaceEvent::Path { incremental: true, .. }))
        .unwrap();
    assert!(marker < fit && fit < path, "{events:?}");
    h.system.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_late_response_from_superseded_trace_is_ignored() {
    let h = harness().build();
    h.routing.respond_after(
        Duration::from_secs(5),
        Ok(route_response(&[NEW_YORK, BOSTON], &["stale step"], 1, "slow")),
    );
    h.routing.respond(Ok(route_response(&[BOSTON, NEW_YORK], &["fresh step"], 2, "fast")));

    let first = h.trace().trigger_with_points(NEW_YORK, BOSTON).await.unwrap();
    wait_until(Duration::from_secs(1), || h.routing.requests().len() == 1).await;
    let second = h.trace().trigger_with_points(BOSTON, NEW_YORK).await.unwrap();
    assert!(second > first);

    wait_for_outcome(h.trace(), second).await;
    // Let the first response arrive.
    tokio::time::sleep(Duration::from_secs(10)).await;

    let session = h.trace().snapshot().await.unwrap();
    assert_eq!(session.last_outcome, Some(TraceOutcome::Completed { seq: second }));
    assert_eq!(session.result.as_ref().map(|r| r.algorithm.as_str()), Some("fast"));
    assert_eq!(session.log[..3], ["fresh step", "paths_analyzed=2", "algorithm=fast"]);
    assert!(!session.log.iter().any(|l| l == "stale step"));
    assert_eq!(session.origin, Some(BOSTON));
    h.system.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_new_trigger_stops_the_previous_stream() {
    let h = harness().build();
    h.routing.respond(Ok(ok_route(&["a1", "a2", "a3", "a4", "a5"], 5, "A*")));
    h.routing.respond(Ok(ok_route(&["b1"], 1, "A*")));

    let first = h.trace().trigger_with_points(NEW_YORK, BOSTON).await.unwrap();
    wait_until(Duration::from_secs(5), || {
        h.surface.events().contains(&SurfaceEvent::Log("a2".into()))
    })
    .await;
    let second = h.trace().trigger_with_points(NEW_YORK, BOSTON).await.unwrap();
    let session = wait_for_outcome(h.trace(), second).await;
    tokio::time::sleep(Duration::from_secs(2)).await;

    assert!(second > first);
    assert_eq!(session.log[0], "b1");
    let after = h.trace().snapshot().await.unwrap();
    assert_eq!(after.log, session.log);
    assert!(!h.surface.events().contains(&SurfaceEvent::Log("a5".into())));
    h.system.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_server_error_is_logged_with_status_and_body() {
    let h = harness().build();
    h.routing.respond(Err(ServiceError::Status {
        status: 503,
        body: r#"{"error":"overloaded"}"#.into(),
    }));

    let seq = h.trace().trigger_with_points(NEW_YORK, BOSTON).await.unwrap();
    let session = wait_for_outcome(h.trace(), seq).await;

    assert_eq!(
        session.log,
        vec![r#"server_error status=503 {"error":"overloaded"}"#, "error=routing failed"]
    );
    assert!(session.result.is_none());
    assert_eq!(h.cues.played(), vec![Cue::Type]);
    h.system.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_transport_error_is_logged() {
    let h = harness().build();
    h.routing.respond(Err(ServiceError::Transport("connection refused".into())));

    let seq = h.trace().trigger_with_points(NEW_YORK, BOSTON).await.unwrap();
    let session = wait_for_outcome(h.trace(), seq).await;

    assert_eq!(session.log, vec!["error=connection refused"]);
    h.system.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_map_clicks_trace_between_the_clicked_points() {
    let h = harness()
        .geocoder(
            FakeGeocoder::new()
                .with_place("New York, NY", Point::new(40.71, -74.01))
                .with_place("Boston, MA", Point::new(42.35, -71.05)),
        )
        .build();
    h.routing.respond(Ok(ok_route(&["scan"], 1, "A*")));
    h.routing.respond(Ok(ok_route(&["scan"], 1, "A*")));

    assert_eq!(h.trace().map_click(NEW_YORK).await.unwrap(), None);
    let seq = h.trace().map_click(BOSTON).await.unwrap().expect("second click starts a trace");
    let session = wait_for_outcome(h.trace(), seq).await;
    assert_eq!(session.last_outcome, Some(TraceOutcome::Completed { seq }));
    assert!(h.geocoder.calls().is_empty());
    assert_eq!((h.routing.requests()[0].origin, h.routing.requests()[0].destination), (NEW_YORK, BOSTON));

    // The text fields are resolved afresh; the clicked points are not reused.
    let seq = h.trace().trigger_from_fields().await.unwrap();
    wait_for_outcome(h.trace(), seq).await;
    let mut calls = h.geocoder.calls();
    calls.sort();
    assert_eq!(calls, vec!["Boston, MA", "New York, NY"]);
    let second = &h.routing.requests()[1];
    assert_eq!((second.origin, second.destination), (Point::new(40.71, -74.01), Point::new(42.35, -71.05)));
    h.system.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_trace_from_here_without_a_fix_fails() {
    let h = harness().build();

    let seq = h.trace().trigger_from_here().await.unwrap();
    let session = wait_for_outcome(h.trace(), seq).await;

    assert_eq!(session.log, vec!["error=live position unavailable"]);
    assert!(h.routing.requests().is_empty());
    h.system.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_trace_from_here_uses_the_live_position() {
    let here = Point::new(40.75, -73.99);
    let provider = Arc::new(ScriptedLocationProvider::new());
    provider.push_fix(FixScript::Fix(here));
    let h = harness()
        .location(provider.clone())
        .geocoder(FakeGeocoder::new().with_place("Boston, MA", BOSTON))
        .build();
    h.routing.respond(Ok(ok_route(&["scan"], 1, "A*")));

    h.feed().start().await.unwrap();
    wait_for_feed(h.feed(), Duration::from_secs(5), |f| f.self_position == Some(here)).await;

    let seq = h.trace().trigger_from_here().await.unwrap();
    let session = wait_for_outcome(h.trace(), seq).await;

    assert_eq!(session.last_outcome, Some(TraceOutcome::Completed { seq }));
    assert_eq!(h.routing.requests()[0].origin, here);
    assert_eq!(h.routing.requests()[0].destination, BOSTON);
    assert_eq!(h.geocoder.calls(), vec!["Boston, MA"]);
    h.system.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_profile_is_sent_to_the_routing_service() {
    let h = harness().build();
    h.routing.respond(Ok(ok_route(&[], 0, "A*")));

    h.trace().set_profile(Profile::Cycling).await.unwrap();
    let seq = h.trace().trigger_with_points(NEW_YORK, BOSTON).await.unwrap();
    let session = wait_for_outcome(h.trace(), seq).await;

    assert_eq!(h.routing.requests()[0].profile, Profile::Cycling);
    assert_eq!(session.log, vec!["paths_analyzed=0", "algorithm=A*", session.log[2].as_str()]);
    h.system.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_hack_sequence_raises_and_clears_the_flag() {
    let h = harness().build();

    h.trace().hack_sequence().await.unwrap();
    let session = h.trace().snapshot().await.unwrap();
    assert!(session.hack_active);
    assert_eq!(session.log, vec!["ELEVATING PRIVILEGES… [denied]", "…just kidding 😅"]);
    assert_eq!(session.seq(), 0);
    assert_eq!(h.cues.played(), vec![Cue::Hack]);

    tokio::time::sleep(Duration::from_millis(2100)).await;
    let session = h.trace().snapshot().await.unwrap();
    assert!(!session.hack_active);
    let flags: Vec<bool> = h
        .surface
        .events()
        .into_iter()
        .filter_map(|e| match e {
            SurfaceEvent::HackSequence(active) => Some(active),
            _ => None,
        })
        .collect();
    assert_eq!(flags, vec![true, false]);
    h.system.shutdown().await.unwrap();
}
