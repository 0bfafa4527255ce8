//! HTTP surface tests driven through the router in process with
//! `tower::ServiceExt::oneshot`; no listener is bound.

mod common;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use common::SagaFixture;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

async fn send(
    router: Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn test_booking_round_trip_over_http() {
    let fixture = SagaFixture::new();

    let (status, event_body) = send(
        fixture.router(),
        Method::POST,
        "/events",
        Some(json!({
            "name": "Jazz Under the Stars",
            "location": "Galle Face Green",
            "eventDate": "2026-10-01T18:00:00Z",
            "capacity": 50,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(event_body["availableSeats"], 50);
    assert_eq!(event_body["status"], "DRAFT");
    let event_id = event_body["id"].as_i64().unwrap();

    let (status, booking_body) = send(
        fixture.router(),
        Method::POST,
        "/bookings",
        Some(json!({
            "userId": 7,
            "eventId": event_id,
            "numberOfTickets": 2,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(booking_body["status"], "CONFIRMED");
    assert_eq!(booking_body["numberOfTickets"], 2);
    let booking_id = booking_body["id"].as_i64().unwrap();

    let (status, fetched) = send(
        fixture.router(),
        Method::GET,
        &format!("/bookings/{booking_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["id"], booking_id);
    assert_eq!(fetched["userId"], 7);

    let (status, listed) =
        send(fixture.router(), Method::GET, "/bookings/user/7", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let (status, all) = send(fixture.router(), Method::GET, "/bookings", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all.as_array().unwrap().len(), 1);

    // Both handler-side publishes (EventCreated, BookingConfirmed) fan out
    fixture.drain_consumers().await;
    assert_eq!(fixture.audit.entry_count(), 2);
    assert_eq!(fixture.tickets.tickets_for_booking(booking_id).len(), 2);
}

#[tokio::test]
async fn test_sold_out_booking_is_created_failed() {
    let fixture = SagaFixture::new();
    let event = fixture.seed_event(1);

    let (status, body) = send(
        fixture.router(),
        Method::POST,
        "/bookings",
        Some(json!({
            "userId": 5,
            "eventId": event.id,
            "numberOfTickets": 4,
        })),
    )
    .await;

    // The saga settled and the record exists, so this is a created resource
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "FAILED");
}

#[tokio::test]
async fn test_validation_error_maps_to_400() {
    let fixture = SagaFixture::new();

    let (status, body) = send(
        fixture.router(),
        Method::POST,
        "/bookings",
        Some(json!({
            "userId": 5,
            "eventId": 1,
            "numberOfTickets": 0,
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("numberOfTickets"));

    let (status, body) = send(
        fixture.router(),
        Method::POST,
        "/events",
        Some(json!({
            "name": "Empty Hall",
            "location": "Nowhere",
            "eventDate": "2026-10-01T18:00:00Z",
            "capacity": 0,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_unknown_resources_map_to_404() {
    let fixture = SagaFixture::new();

    let (status, body) = send(fixture.router(), Method::GET, "/bookings/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
    assert_eq!(body["error"]["message"], "booking 999 not found");

    let (status, body) = send(fixture.router(), Method::GET, "/events/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["message"], "event 999 not found");

    let (status, body) = send(
        fixture.router(),
        Method::GET,
        "/tickets/TICKET-MISSING1",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["message"], "ticket TICKET-MISSING1 not found");
}

#[tokio::test]
async fn test_reserve_endpoint_returns_the_decision() {
    let fixture = SagaFixture::new();
    let event = fixture.seed_event(3);

    let (status, body) = send(
        fixture.router(),
        Method::POST,
        &format!("/events/{}/reserve?seats=2", event.id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::Bool(true));

    let (status, body) = send(
        fixture.router(),
        Method::POST,
        &format!("/events/{}/reserve?seats=99", event.id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::Bool(false), "a denial is an answer, not an error");

    let (status, _) = send(
        fixture.router(),
        Method::POST,
        &format!("/events/{}/reserve?seats=0", event.id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert_eq!(
        fixture
            .inventory
            .get_event(event.id)
            .unwrap()
            .available_seats,
        1
    );
}

#[tokio::test]
async fn test_event_publish_endpoint_opens_sales() {
    let fixture = SagaFixture::new();
    let event = fixture.seed_event(10);

    let (status, body) = send(
        fixture.router(),
        Method::POST,
        &format!("/events/{}/publish", event.id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "PUBLISHED");
    assert!(body["publishedAt"].is_string());

    let (status, listed) = send(fixture.router(), Method::GET, "/events", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_ticket_endpoints_reflect_worker_output() {
    let fixture = SagaFixture::new();
    let event = fixture.seed_event(10);
    let booking = fixture.book(3, event.id, 2).await;
    fixture.drain_consumers().await;

    let (status, body) = send(
        fixture.router(),
        Method::GET,
        &format!("/tickets/booking/{}", booking.id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let tickets = body.as_array().unwrap();
    assert_eq!(tickets.len(), 2);

    let (status, by_user) = send(fixture.router(), Method::GET, "/tickets/user/3", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(by_user.as_array().unwrap().len(), 2);

    let number = tickets[0]["ticketNumber"].as_str().unwrap();
    let (status, single) = send(
        fixture.router(),
        Method::GET,
        &format!("/tickets/{number}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(single["ticketNumber"], *number);
    assert!(single["qrCode"].as_str().unwrap().starts_with("QR-"));
}

#[tokio::test]
async fn test_health_reports_component_counts() {
    let fixture = SagaFixture::new();
    let event = fixture.seed_event(10);
    fixture.book(7, event.id, 2).await;
    fixture.drain_consumers().await;

    let (status, body) = send(fixture.router(), Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["components"]["bookings"], 1);
    assert_eq!(body["components"]["events"], 1);
    assert_eq!(body["components"]["tickets"], 2);
    assert_eq!(body["components"]["notifications"], 1);
    assert_eq!(body["components"]["audit_entries"], 1);
    assert_eq!(body["components"]["outbox_pending"], 0);
    assert_eq!(body["components"]["queues"], 7);
}
