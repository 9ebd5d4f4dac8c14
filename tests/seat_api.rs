//! Seat ledger endpoints: check-in, check-out, transfer, occupancy.

mod helpers;

use axum::http::StatusCode;
use chrono::Duration;
use serde_json::json;

use helpers::TestApp;

fn seat(roll_number: &str, section: &str) -> serde_json::Value {
    json!({ "rollNumber": roll_number, "section": section })
}

#[tokio::test]
async fn test_check_in_creates_entry() {
    let app = TestApp::new().await;
    let token = app.admin_token();

    let response = app
        .request(
            "POST",
            "/check-in",
            Some(seat("21cse042", "central")),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["rollNumber"], "21CSE042");
    assert_eq!(response.body["name"], "Asha Rao");
    assert_eq!(response.body["section"], "Central Library");
    assert_eq!(response.body["status"], "Checked In");
    assert_eq!(response.body["date"], "2025-03-03");
    assert_eq!(response.body["timeIn"], "10:00:00");
}

#[tokio::test]
async fn test_reference_label_follows_cutoff() {
    let app = TestApp::new().await;
    let token = app.admin_token();
    let other = app.add_student("Ravi Kumar", "21ECE007").await;

    let morning = app
        .request(
            "POST",
            "/check-in",
            Some(seat("21CSE042", "reference")),
            Some(&token),
        )
        .await;
    assert_eq!(morning.status, StatusCode::CREATED);
    assert_eq!(morning.body["section"], "Reference");
    assert_eq!(morning.body["isStudySection"], false);

    // 16:35 local
    app.clock.advance(Duration::minutes(6 * 60 + 35));
    let evening = app
        .request(
            "POST",
            "/check-in",
            Some(seat(other.roll_number.as_deref().unwrap(), "reference")),
            Some(&token),
        )
        .await;
    assert_eq!(evening.status, StatusCode::CREATED);
    assert_eq!(evening.body["section"], "Reference - Study Section");
    assert_eq!(evening.body["isStudySection"], true);
}

#[tokio::test]
async fn test_double_check_in_is_rejected() {
    let app = TestApp::new().await;
    let token = app.admin_token();

    let first = app
        .request("POST", "/check-in", Some(seat("21CSE042", "reading")), Some(&token))
        .await;
    assert_eq!(first.status, StatusCode::CREATED);

    let second = app
        .request("POST", "/check-in", Some(seat("21CSE042", "central")), Some(&token))
        .await;
    assert_eq!(second.status, StatusCode::BAD_REQUEST);
    assert_eq!(second.body["status"], "fail");
    assert!(second.message().contains("already checked in"));
}

#[tokio::test]
async fn test_full_pool_rejects_check_in() {
    let app = TestApp::with_config(|cfg| cfg.library.seats.elibrary = 1).await;
    let token = app.admin_token();
    app.add_student("Ravi Kumar", "21ECE007").await;

    let first = app
        .request("POST", "/check-in", Some(seat("21CSE042", "elibrary")), Some(&token))
        .await;
    assert_eq!(first.status, StatusCode::CREATED);

    let second = app
        .request("POST", "/check-in", Some(seat("21ECE007", "elibrary")), Some(&token))
        .await;
    assert_eq!(second.status, StatusCode::BAD_REQUEST);
    assert!(second.message().contains("No seats available"));

    let seats = app.request("GET", "/seats", None, None).await;
    assert_eq!(seats.body["elibrary"]["total"], 1);
    assert_eq!(seats.body["elibrary"]["occupied"], 1);
}

#[tokio::test]
async fn test_check_in_validation() {
    let app = TestApp::new().await;
    let token = app.admin_token();

    let unknown_section = app
        .request("POST", "/check-in", Some(seat("21CSE042", "attic")), Some(&token))
        .await;
    assert_eq!(unknown_section.status, StatusCode::BAD_REQUEST);

    let unknown_student = app
        .request("POST", "/check-in", Some(seat("00XX000", "central")), Some(&token))
        .await;
    assert_eq!(unknown_student.status, StatusCode::NOT_FOUND);

    let missing_roll = app
        .request("POST", "/check-in", Some(seat("", "central")), Some(&token))
        .await;
    assert_eq!(missing_roll.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_check_out_records_duration() {
    let app = TestApp::new().await;
    let token = app.admin_token();

    app.request("POST", "/check-in", Some(seat("21CSE042", "central")), Some(&token))
        .await;
    app.clock.advance(Duration::minutes(95));

    let response = app
        .request("POST", "/check-out", Some(seat("21CSE042", "central")), Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "Checked Out");
    assert_eq!(response.body["timeOut"], "11:35:00");
    assert_eq!(response.body["duration"], "1h 35m");

    let again = app
        .request("POST", "/check-out", Some(seat("21CSE042", "central")), Some(&token))
        .await;
    assert_eq!(again.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_transfer_moves_entry() {
    let app = TestApp::new().await;
    let token = app.admin_token();

    app.request("POST", "/check-in", Some(seat("21CSE042", "central")), Some(&token))
        .await;

    let response = app
        .request(
            "POST",
            "/transfer",
            Some(json!({
                "rollNumber": "21CSE042",
                "fromSection": "central",
                "toSection": "reading",
            })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["section"], "Reading Room");
    assert_eq!(response.body["status"], "Checked In");

    let today = app.request("GET", "/today", None, Some(&token)).await;
    assert_eq!(today.status, StatusCode::OK);
    let logs = today.body.as_array().unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0]["section"], "Reading Room");
}

#[tokio::test]
async fn test_seat_availability_is_public() {
    let app = TestApp::new().await;
    let token = app.admin_token();

    app.request("POST", "/check-in", Some(seat("21CSE042", "central")), Some(&token))
        .await;

    let response = app.request("GET", "/seats", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["central"]["total"], 450);
    assert_eq!(response.body["central"]["occupied"], 1);
    assert_eq!(response.body["reference"]["occupied"], 0);
}

#[tokio::test]
async fn test_seat_routes_require_admin() {
    let app = TestApp::new().await;

    let anonymous = app
        .request("POST", "/check-in", Some(seat("21CSE042", "central")), None)
        .await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);
    assert_eq!(anonymous.message(), "You are not logged in");

    let garbage = app
        .request("GET", "/today", None, Some("not-a-token"))
        .await;
    assert_eq!(garbage.status, StatusCode::UNAUTHORIZED);

    let student = app
        .request("GET", "/today", None, Some(&app.student_token()))
        .await;
    assert_eq!(student.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_usage_summary_counts_completed_visits() {
    let app = TestApp::new().await;
    let token = app.admin_token();

    app.request("POST", "/check-in", Some(seat("21CSE042", "central")), Some(&token))
        .await;
    app.clock.advance(Duration::minutes(90));
    app.request("POST", "/check-out", Some(seat("21CSE042", "central")), Some(&token))
        .await;

    let response = app
        .request("GET", "/analytics/21CSE042", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["rollNumber"], "21CSE042");
    assert_eq!(response.body["totalVisits"], 1);
    assert_eq!(response.body["totalMinutes"], 90);
    assert_eq!(response.body["bySection"]["Central Library"]["visits"], 1);
    assert_eq!(response.body["peakHour"], "10:00–11:00");

    let unknown = app
        .request("GET", "/analytics/00XX000", None, Some(&token))
        .await;
    assert_eq!(unknown.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_student_lookup() {
    let app = TestApp::new().await;
    let token = app.admin_token();

    let response = app
        .request("GET", "/students/21cse042", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["name"], "Asha Rao");
    assert_eq!(response.body["role"], "student");

    let missing = app
        .request("GET", "/students/00XX000", None, Some(&token))
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health_reports_memory_backend() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/health", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
    assert_eq!(response.body["backend"], "memory");
}
