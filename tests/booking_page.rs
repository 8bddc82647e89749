use std::time::Duration;

use seat_booking::config::BackendConfig;
use seat_booking::error::SubmitError;
use seat_booking::models::{ContactForm, SeatCode, SeatLayout};
use seat_booking::services::seat_map::SeatState;
use seat_booking::services::{PageController, PagePhase, PageView};
use seat_booking::sheet_client::SheetClient;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CATALOG_PATH: &str = "/data/live-events.json";

async fn backend_with_catalog() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(CATALOG_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "events": [
                { "id": "ev1", "title": "Jazz Night", "date": "2024-05-01", "venue": "Hall A" },
                { "id": "ev2", "title": "Opera" }
            ]
        })))
        .mount(&server)
        .await;
    server
}

fn sheet(server: &MockServer, script_url: String) -> SheetClient {
    SheetClient::new(&BackendConfig {
        script_url,
        events_source: format!("{}{}", server.uri(), CATALOG_PATH),
        timeout: Duration::from_secs(5),
    })
    .unwrap()
}

async fn mount_booked(server: &MockServer, seats: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/exec"))
        .and(query_param("eventId", "ev1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(seats))
        .mount(server)
        .await;
}

fn state_of(view: &PageView, code: &str) -> SeatState {
    view.seat_grid
        .as_ref()
        .unwrap()
        .iter()
        .flat_map(|row| row.seats.iter())
        .find(|c| c.code.to_string() == code)
        .map(|c| c.state)
        .unwrap()
}

fn contact() -> ContactForm {
    ContactForm {
        name: "Ann Lee".into(),
        email: "ann@example.com".into(),
        phone: "+65 5555 0000".into(),
    }
}

fn seat(raw: &str) -> SeatCode {
    raw.parse().unwrap()
}

#[tokio::test]
async fn renders_event_with_booked_seats() {
    let server = backend_with_catalog().await;
    mount_booked(&server, serde_json::json!({ "bookedSeats": ["A1", "A2"] })).await;

    let page = PageController::open(
        sheet(&server, format!("{}/exec", server.uri())),
        SeatLayout::default(),
        "?eventId=ev1",
    )
    .await;
    let view = page.view();

    assert_eq!(view.phase, PagePhase::Ready);
    assert_eq!(view.title, "Jazz Night");
    assert_eq!(view.meta, "Hall A • 01 May 2024");
    assert_eq!(state_of(&view, "A1"), SeatState::Booked);
    assert_eq!(state_of(&view, "A2"), SeatState::Booked);
    assert_eq!(state_of(&view, "A3"), SeatState::Available);
    assert_eq!(state_of(&view, "F10"), SeatState::Available);
}

#[tokio::test]
async fn missing_event_id_issues_no_requests() {
    let server = backend_with_catalog().await;

    let page = PageController::open(
        sheet(&server, format!("{}/exec", server.uri())),
        SeatLayout::default(),
        "",
    )
    .await;
    let view = page.view();

    assert_eq!(view.title, "Event not found");
    assert_eq!(view.meta, "Missing event ID.");
    assert_eq!(view.placeholder, Some("No event selected."));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn unknown_event_never_asks_for_booked_seats() {
    let server = backend_with_catalog().await;
    Mock::given(method("GET"))
        .and(path("/exec"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let page = PageController::open(
        sheet(&server, format!("{}/exec", server.uri())),
        SeatLayout::default(),
        "eventId=zzz",
    )
    .await;

    assert_eq!(page.view().phase, PagePhase::NotFound);
    assert_eq!(page.view().title, "Event not found");
}

#[tokio::test]
async fn malformed_booked_seats_fail_open() {
    let server = backend_with_catalog().await;
    Mock::given(method("GET"))
        .and(path("/exec"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let page = PageController::open(
        sheet(&server, format!("{}/exec", server.uri())),
        SeatLayout::default(),
        "eventId=ev1",
    )
    .await;
    let view = page.view();
    assert_eq!(view.phase, PagePhase::Ready);
    assert_eq!(state_of(&view, "A1"), SeatState::Available);
}

#[tokio::test]
async fn validation_failures_never_write() {
    let server = backend_with_catalog().await;
    mount_booked(&server, serde_json::json!({ "bookedSeats": [] })).await;
    Mock::given(method("POST"))
        .and(path("/exec"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut page = PageController::open(
        sheet(&server, format!("{}/exec", server.uri())),
        SeatLayout::default(),
        "eventId=ev1",
    )
    .await;

    page.update_form(contact());
    assert!(matches!(page.submit().await, Err(SubmitError::NoSeats)));
    assert_eq!(page.view().status.unwrap().text, "Please select at least one seat.");

    page.activate_seat(seat("C2"));
    page.update_form(ContactForm::default());
    assert!(matches!(page.submit().await, Err(SubmitError::MissingDetails)));
    assert_eq!(page.view().status.unwrap().text, "Please fill in all details.");
}

#[tokio::test]
async fn successful_booking_promotes_seats_to_booked() {
    let server = backend_with_catalog().await;
    mount_booked(&server, serde_json::json!({ "bookedSeats": ["A1"] })).await;
    Mock::given(method("POST"))
        .and(path("/exec"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let mut page = PageController::open(
        sheet(&server, format!("{}/exec", server.uri())),
        SeatLayout::default(),
        "eventId=ev1",
    )
    .await;

    page.activate_seat(seat("B3"));
    page.activate_seat(seat("B4"));
    page.update_form(contact());
    let receipt = page.submit().await.unwrap();
    assert_eq!(receipt.seats, vec![seat("B3"), seat("B4")]);

    let view = page.view();
    assert_eq!(view.status.as_ref().unwrap().text, "Booking submitted! We will contact you with details.");
    assert_eq!(view.form, ContactForm::default());
    assert_eq!(view.selected_seats_label, "None");
    assert_eq!(state_of(&view, "B3"), SeatState::Booked);
    assert_eq!(state_of(&view, "B4"), SeatState::Booked);
    assert!(view.submit_enabled);
}

#[tokio::test]
async fn unreachable_backend_keeps_state_for_retry() {
    let server = backend_with_catalog().await;
    let dead = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let dead_url = format!("http://{}/exec", dead.local_addr().unwrap());
    drop(dead);

    let mut page = PageController::open(sheet(&server, dead_url), SeatLayout::default(), "eventId=ev1").await;
    // Занятые места не загрузились, но схема нарисована
    assert_eq!(page.view().phase, PagePhase::Ready);

    page.activate_seat(seat("D7"));
    page.update_form(contact());
    let err = page.submit().await.unwrap_err();
    assert!(matches!(err, SubmitError::Transport(_)));

    let view = page.view();
    assert_eq!(view.status.as_ref().unwrap().text, "Network error. Please try again.");
    assert_eq!(view.form, contact());
    assert_eq!(view.selected_seats, "D7");
    assert_eq!(state_of(&view, "D7"), SeatState::Selected);
    assert!(view.submit_enabled);
}
