//! Integration tests for the polling pipeline with network scenarios
//!
//! **Purpose**: Test the critical path from HTTP client → coordinator →
//! sensors against a mock calendar service.
//!
//! **Coverage:**
//! - Happy path: authenticate → fetch → snapshot → sensor reads
//! - Failed fetch: stale snapshot retained, update-failed notification
//! - Auth probe mismatch: failed cycle without a snapshot
//! - Scheduler: polling suspended without subscribers, resumes with one
//! - Setup validation: valid, invalid auth, unreachable service
//!
//! **Infrastructure:**
//! - WireMock HTTP server (simulates the calendar API)
//! - Real client, coordinator, sensors, and scheduler

use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use offday_core::{
    CalendarCoordinator, CoordinatorEvent, DayTypeSensor, WorkdaySensor,
};
use offday_domain::{CalendarConfig, OffdayError};
use offday_infra::scheduling::{PollScheduler, PollSchedulerConfig};
use offday_infra::setup::{validate_config, SetupError};
use offday_infra::CalendarApiClient;
use once_cell::sync::Lazy;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Test Helpers
// ============================================================================

static TRACING: Lazy<()> = Lazy::new(|| {
    tracing_subscriber::fmt().with_env_filter("debug").with_test_writer().init();
});

fn init_tracing() {
    Lazy::force(&TRACING);
}

fn test_config(base_url: String) -> CalendarConfig {
    serde_json::from_value(serde_json::json!({
        "api_key": "key-123",
        "full_name": "Alice Example",
        "element_id": "element-1",
        "base_url": base_url,
    }))
    .expect("config deserializes")
}

fn entry_json(
    id: &str,
    name: &str,
    category: &str,
    start: &str,
    end: &str,
) -> serde_json::Value {
    serde_json::json!({
        "ID": id,
        "Name": name,
        "Category": category,
        "EventDate": start,
        "EndDate": end,
        "Description": "",
        "OriginalEventDate": start,
        "OriginalEndDate": end,
    })
}

async fn mount_ping(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/custom/calendar/ping"))
        .respond_with(ResponseTemplate::new(200).set_body_string("pong"))
        .mount(server)
        .await;
}

async fn mount_entries(server: &MockServer, entries: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/api/custom/calendar"))
        .and(query_param("elementId", "element-1"))
        .and(query_param("fullname", "Alice Example"))
        .respond_with(ResponseTemplate::new(200).set_body_json(entries))
        .mount(server)
        .await;
}

fn record_events(coordinator: &CalendarCoordinator) -> Arc<Mutex<Vec<CoordinatorEvent>>> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    coordinator.subscribe(move |event| {
        sink.lock().expect("event sink lock").push(event.clone());
    });
    events
}

// ============================================================================
// Pipeline Flows
// ============================================================================

#[tokio::test]
async fn full_pipeline_serves_sensor_values_from_a_poll() {
    init_tracing();
    let server = MockServer::start().await;
    mount_ping(&server).await;
    mount_entries(
        &server,
        serde_json::json!([
            entry_json(
                "1",
                "Alice Example",
                "Public_Holiday",
                "2024-01-01T00:00:00Z",
                "2024-01-01T23:59:59Z"
            ),
            entry_json(
                "2",
                "Bob Example",
                "Absent",
                "2024-01-01T00:00:00Z",
                "2024-01-01T23:59:59Z"
            ),
        ]),
    )
    .await;

    let client = CalendarApiClient::new(&test_config(server.uri())).expect("client builds");
    let coordinator = Arc::new(CalendarCoordinator::new(Arc::new(client), "Alice Example"));
    let events = record_events(&coordinator);

    coordinator.refresh().await.expect("refresh succeeds");

    let workday = WorkdaySensor::new(Arc::clone(&coordinator));
    let day_type = DayTypeSensor::new(Arc::clone(&coordinator));
    let now = "2024-01-01T09:00:00Z".parse().expect("valid timestamp");

    assert!(!workday.is_on_at(now));
    assert_eq!(day_type.day_type_at(now).label(), "Public_Holiday");
    assert_eq!(day_type.state_code_at(now), 5);

    // Bob's entry belongs to another user and is filtered out.
    assert_eq!(coordinator.entries_for("Alice Example").len(), 1);
    assert_eq!(*events.lock().expect("events"), vec![CoordinatorEvent::Updated]);
}

#[tokio::test]
async fn work_from_home_day_keeps_the_boolean_on() {
    init_tracing();
    let server = MockServer::start().await;
    mount_ping(&server).await;
    mount_entries(
        &server,
        serde_json::json!([entry_json(
            "1",
            "Alice Example",
            "WfH",
            "2024-03-05T00:00:00Z",
            "2024-03-05T23:59:59Z"
        )]),
    )
    .await;

    let client = CalendarApiClient::new(&test_config(server.uri())).expect("client builds");
    let coordinator = Arc::new(CalendarCoordinator::new(Arc::new(client), "Alice Example"));
    coordinator.refresh().await.expect("refresh succeeds");

    let workday = WorkdaySensor::new(Arc::clone(&coordinator));
    let day_type = DayTypeSensor::new(coordinator);
    let now = "2024-03-05T10:00:00Z".parse().expect("valid timestamp");

    assert!(workday.is_on_at(now));
    assert_eq!(day_type.day_type_at(now).label(), "WfH");
}

#[tokio::test]
async fn failed_fetch_keeps_the_previous_snapshot() {
    init_tracing();
    let server = MockServer::start().await;
    mount_ping(&server).await;
    mount_entries(
        &server,
        serde_json::json!([entry_json(
            "1",
            "Alice Example",
            "Absent",
            "2024-01-01T00:00:00Z",
            "2024-01-05T23:59:59Z"
        )]),
    )
    .await;

    let client = CalendarApiClient::new(&test_config(server.uri())).expect("client builds");
    let coordinator = Arc::new(CalendarCoordinator::new(Arc::new(client), "Alice Example"));
    let events = record_events(&coordinator);

    coordinator.refresh().await.expect("first refresh succeeds");
    let before = coordinator.entries_for("Alice Example");
    assert_eq!(before.len(), 1);

    // The service starts failing; the cached snapshot must survive.
    server.reset().await;
    mount_ping(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/custom/calendar"))
        .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
            "errors": [{"detail": "server down"}],
        })))
        .mount(&server)
        .await;

    let err = coordinator.refresh().await.expect_err("second refresh fails");
    match err {
        OffdayError::Api(message) => assert_eq!(message, "server down"),
        other => panic!("expected Api error, got {other:?}"),
    }

    assert_eq!(coordinator.entries_for("Alice Example"), before);
    assert!(coordinator.is_stale());

    let recorded = events.lock().expect("events");
    assert_eq!(recorded.len(), 2);
    match &recorded[1] {
        CoordinatorEvent::UpdateFailed { message } => assert!(message.contains("server down")),
        other => panic!("expected UpdateFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn mismatched_ping_body_fails_the_cycle() {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/custom/calendar/ping"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ping"))
        .mount(&server)
        .await;

    let client = CalendarApiClient::new(&test_config(server.uri())).expect("client builds");
    let coordinator = Arc::new(CalendarCoordinator::new(Arc::new(client), "Alice Example"));
    let events = record_events(&coordinator);

    let err = coordinator.refresh().await.expect_err("refresh fails");
    assert!(matches!(err, OffdayError::Auth(_)));
    assert!(coordinator.snapshot().is_none());
    assert!(coordinator.is_stale());

    let recorded = events.lock().expect("events");
    assert!(matches!(recorded[0], CoordinatorEvent::UpdateFailed { .. }));

    // No entries request is sent when the probe fails.
    let requests = server.received_requests().await.expect("requests recorded");
    assert!(requests.iter().all(|request| request.url.path().ends_with("/ping")));
}

// ============================================================================
// Scheduler Flows
// ============================================================================

#[tokio::test]
async fn scheduler_polls_only_while_subscribed() {
    init_tracing();
    let server = MockServer::start().await;
    mount_ping(&server).await;
    mount_entries(&server, serde_json::json!([])).await;

    let client = CalendarApiClient::new(&test_config(server.uri())).expect("client builds");
    let coordinator = Arc::new(CalendarCoordinator::new(Arc::new(client), "Alice Example"));

    let mut scheduler = PollScheduler::new(
        Arc::clone(&coordinator),
        PollSchedulerConfig {
            interval: Duration::from_millis(20),
            job_timeout: Duration::from_secs(5),
            join_timeout: Duration::from_secs(5),
        },
    );
    scheduler.start().await.expect("start succeeds");

    // Without a subscriber nothing reaches the network.
    tokio::time::sleep(Duration::from_millis(100)).await;
    let requests = server.received_requests().await.expect("requests recorded");
    assert!(requests.is_empty(), "polling should be suspended without subscribers");

    let handle = coordinator.subscribe(|_event| {});
    tokio::time::sleep(Duration::from_millis(150)).await;

    assert!(coordinator.snapshot().is_some(), "polling resumed after subscribing");
    coordinator.unsubscribe(handle);

    scheduler.stop().await.expect("stop succeeds");
}

// ============================================================================
// Setup Validation
// ============================================================================

#[tokio::test]
async fn setup_validation_accepts_a_working_configuration() {
    init_tracing();
    let server = MockServer::start().await;
    mount_ping(&server).await;
    mount_entries(&server, serde_json::json!([])).await;

    validate_config(&test_config(server.uri())).await.expect("validation succeeds");
}

#[tokio::test]
async fn setup_validation_reports_invalid_auth() {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/custom/calendar/ping"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = validate_config(&test_config(server.uri())).await.expect_err("validation fails");
    assert!(matches!(err, SetupError::InvalidAuth(_)));
}

#[tokio::test]
async fn setup_validation_reports_unreachable_service() {
    init_tracing();
    // Bind and drop a local port so connections are refused.
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind local port");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);

    let err = validate_config(&test_config(format!("http://{addr}")))
        .await
        .expect_err("validation fails");
    // The probe runs first, so a refused connection surfaces as an auth-step
    // failure rather than a generic network error.
    assert!(matches!(err, SetupError::InvalidAuth(_) | SetupError::CannotConnect(_)));
}
