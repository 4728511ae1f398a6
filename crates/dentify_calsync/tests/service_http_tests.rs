//! Exercises `ExternalCalendarService` against a local stub of the calendar API.

use axum::extract::Json;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::Router;
use dentify_calsync::ExternalCalendarService;
use dentify_common::services::{CalendarEvent, CalendarSyncService};
use dentify_config::CalendarApiConfig;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

/// Starts a stub calendar API and returns its base URL, its captured requests,
/// and the status code it will answer with.
async fn spawn_stub(status: StatusCode) -> (String, Arc<Mutex<Vec<Value>>>) {
    let seen: Arc<Mutex<Vec<Value>>> = Arc::new(Mutex::new(Vec::new()));
    let seen_handler = Arc::clone(&seen);

    let app = Router::new().route(
        "/event",
        post(move |headers: HeaderMap, Json(body): Json<Value>| {
            let seen = Arc::clone(&seen_handler);
            async move {
                let mut record = body;
                if let Some(key) = headers.get("x-api-key") {
                    record["_api_key"] = json!(key.to_str().unwrap_or_default());
                }
                seen.lock().unwrap().push(record);
                (
                    status,
                    Json(json!({ "id": "evt_42", "status": "confirmed" })),
                )
            }
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), seen)
}

fn service(base_url: &str) -> ExternalCalendarService {
    ExternalCalendarService::from_config(&CalendarApiConfig {
        base_url: base_url.to_string(),
        api_key: Some("secret-key".to_string()),
        time_zone: Some("Europe/Zurich".to_string()),
        max_attempts: None,
    })
    .unwrap()
}

fn event() -> CalendarEvent {
    CalendarEvent {
        start_time: "2030-01-09T10:00:00+00:00".to_string(),
        end_time: "2030-01-09T10:30:00+00:00".to_string(),
        summary: "Dental Appointment: Root canal".to_string(),
        description: Some("First session".to_string()),
        attendees: vec![
            "asha@example.com".to_string(),
            "dr.rao@example.com".to_string(),
        ],
    }
}

#[tokio::test]
async fn push_event_posts_the_payload_and_reads_the_reply() {
    let (base_url, seen) = spawn_stub(StatusCode::OK).await;
    let result = service(&base_url).push_event(event()).await.unwrap();

    assert_eq!(result.event_id.as_deref(), Some("evt_42"));
    assert_eq!(result.status, "confirmed");

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    let sent = &seen[0];
    assert_eq!(sent["summary"], json!("Dental Appointment: Root canal"));
    assert_eq!(sent["start_time"], json!("2030-01-09T10:00:00+00:00"));
    assert_eq!(sent["time_zone"], json!("Europe/Zurich"));
    assert_eq!(sent["attendees"].as_array().unwrap().len(), 2);
    assert_eq!(sent["_api_key"], json!("secret-key"));
}

#[tokio::test]
async fn api_errors_surface_the_status_code() {
    let (base_url, _seen) = spawn_stub(StatusCode::SERVICE_UNAVAILABLE).await;
    let error = service(&base_url).push_event(event()).await.unwrap_err();

    match error {
        dentify_calsync::CalendarSyncError::ApiError { status_code, .. } => {
            assert_eq!(status_code, 503);
        }
        other => panic!("unexpected error: {}", other),
    }
}
