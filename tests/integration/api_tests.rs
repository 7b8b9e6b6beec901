//! API integration tests
//!
//! Requires a running server with a freshly migrated database seeded
//! with agent 1, account 1 (and account 2) and advertisement 1 owned
//! by agent 1. Tokens are minted directly with the development secret.

use chrono::{DateTime, Datelike, Duration, Timelike, Utc, Weekday};
use reqwest::Client;
use serde_json::{json, Value};

use dimora_server::models::session::{SessionClaims, SessionRole};

const BASE_URL: &str = "http://localhost:8080/api/v1";
const JWT_SECRET: &str = "change-this-secret-in-production";

fn token_for(subject_id: i32, role: SessionRole) -> String {
    let now = Utc::now();
    SessionClaims {
        sub: subject_id.to_string(),
        subject_id,
        role,
        exp: (now + Duration::hours(1)).timestamp(),
        iat: now.timestamp(),
    }
    .create_token(JWT_SECRET)
    .expect("Failed to mint token")
}

fn account_token() -> String {
    token_for(1, SessionRole::Account)
}

fn agent_token() -> String {
    token_for(1, SessionRole::Agent)
}

/// Next weekday at the given UTC hour, at least one day out
fn next_weekday_slot(hour: u32) -> DateTime<Utc> {
    let mut day = Utc::now() + Duration::days(1);
    while matches!(day.weekday(), Weekday::Sat | Weekday::Sun) {
        day += Duration::days(1);
    }
    day.with_hour(hour)
        .and_then(|d| d.with_minute(0))
        .and_then(|d| d.with_second(0))
        .and_then(|d| d.with_nanosecond(0))
        .expect("valid slot")
}

async fn create_appointment(client: &Client, token: &str, at: DateTime<Utc>) -> reqwest::Response {
    client
        .post(format!("{}/advertisements/1/appointments", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "appointment_at": at.to_rfc3339() }))
        .send()
        .await
        .expect("Failed to send request")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_unauthorized_access() {
    let client = Client::new();

    let response = client
        .get(format!("{}/advertisements/1/availability/days", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_available_days_slots_are_working_hours() {
    let client = Client::new();
    let token = account_token();

    let response = client
        .get(format!("{}/advertisements/1/availability/days", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["advertisement_id"], 1);
    for day in body["days"].as_array().expect("days array") {
        for hour in day["hours"].as_array().expect("hours array") {
            let h = hour.as_u64().expect("hour number");
            assert!((9..18).contains(&h));
        }
    }
}

#[tokio::test]
#[ignore]
async fn test_availability_unknown_advertisement() {
    let client = Client::new();
    let token = account_token();

    let response = client
        .get(format!("{}/advertisements/999999/availability/days", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_availability_invalid_range() {
    let client = Client::new();
    let token = account_token();
    let now = Utc::now();

    let response = client
        .get(format!(
            "{}/advertisements/1/availability/days?from={}&to={}",
            BASE_URL,
            now.to_rfc3339(),
            (now - Duration::days(1)).to_rfc3339()
        ))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_create_appointment_and_conflict() {
    let client = Client::new();
    let token = account_token();
    let slot = next_weekday_slot(10);

    let response = create_appointment(&client, &token, slot).await;
    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "requested");
    assert!(body["appointment_id"].is_number());

    // Same slot again, even from another account: 409
    let other = token_for(2, SessionRole::Account);
    let response = create_appointment(&client, &other, slot).await;
    assert_eq!(response.status(), 409);

    // One hour later is free
    let response = create_appointment(&client, &token, slot + Duration::hours(1)).await;
    assert_eq!(response.status(), 201);
}

#[tokio::test]
#[ignore]
async fn test_create_appointment_misaligned_slot() {
    let client = Client::new();
    let token = account_token();
    let slot = next_weekday_slot(11) + Duration::minutes(30);

    let response = create_appointment(&client, &token, slot).await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_create_appointment_past_slot() {
    let client = Client::new();
    let token = account_token();

    let mut day = Utc::now() - Duration::days(7);
    while matches!(day.weekday(), Weekday::Sat | Weekday::Sun) {
        day -= Duration::days(1);
    }
    let slot = day
        .with_hour(10)
        .and_then(|d| d.with_minute(0))
        .and_then(|d| d.with_second(0))
        .and_then(|d| d.with_nanosecond(0))
        .unwrap();

    let response = create_appointment(&client, &token, slot).await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_concurrent_create_single_winner() {
    let client = Client::new();
    let slot = next_weekday_slot(14);
    let first = token_for(1, SessionRole::Account);
    let second = token_for(2, SessionRole::Account);

    let (a, b) = tokio::join!(
        create_appointment(&client, &first, slot),
        create_appointment(&client, &second, slot),
    );

    let statuses = [a.status().as_u16(), b.status().as_u16()];
    assert!(statuses.contains(&201), "one request must win: {:?}", statuses);
    assert!(statuses.contains(&409), "one request must lose: {:?}", statuses);
}

#[tokio::test]
#[ignore]
async fn test_confirm_lifecycle() {
    let client = Client::new();
    let account = account_token();
    let agent = agent_token();
    let slot = next_weekday_slot(15);

    let response = create_appointment(&client, &account, slot).await;
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    let id = body["appointment_id"].as_i64().expect("No appointment ID");

    // Account session may not confirm
    let response = client
        .patch(format!("{}/appointments/{}/confirm", BASE_URL, id))
        .header("Authorization", format!("Bearer {}", account))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 403);

    // Agent confirms
    let response = client
        .patch(format!("{}/appointments/{}/confirm", BASE_URL, id))
        .header("Authorization", format!("Bearer {}", agent))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "confirmed");

    // Confirming again is no longer a legal transition
    let response = client
        .patch(format!("{}/appointments/{}/confirm", BASE_URL, id))
        .header("Authorization", format!("Bearer {}", agent))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);

    // The account can still cancel a confirmed appointment
    let response = client
        .patch(format!("{}/appointments/{}/cancel", BASE_URL, id))
        .header("Authorization", format!("Bearer {}", account))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "cancelled");

    // And the slot is bookable again
    let response = create_appointment(&client, &account, slot).await;
    assert_eq!(response.status(), 201);
}

#[tokio::test]
#[ignore]
async fn test_reject_then_cancel_is_invalid() {
    let client = Client::new();
    let account = account_token();
    let agent = agent_token();
    let slot = next_weekday_slot(16);

    let response = create_appointment(&client, &account, slot).await;
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    let id = body["appointment_id"].as_i64().expect("No appointment ID");

    let response = client
        .patch(format!("{}/appointments/{}/reject", BASE_URL, id))
        .header("Authorization", format!("Bearer {}", agent))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    // Rejected is terminal
    let response = client
        .patch(format!("{}/appointments/{}/cancel", BASE_URL, id))
        .header("Authorization", format!("Bearer {}", account))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_transition_not_owned() {
    let client = Client::new();
    let account = account_token();
    let slot = next_weekday_slot(17);

    let response = create_appointment(&client, &account, slot).await;
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    let id = body["appointment_id"].as_i64().expect("No appointment ID");

    // A different agent does not see this appointment
    let stranger = token_for(999, SessionRole::Agent);
    let response = client
        .patch(format!("{}/appointments/{}/confirm", BASE_URL, id))
        .header("Authorization", format!("Bearer {}", stranger))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_list_appointments_filtered() {
    let client = Client::new();
    let agent = agent_token();

    let response = client
        .get(format!("{}/agents/me/appointments?status=requested", BASE_URL))
        .header("Authorization", format!("Bearer {}", agent))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    for a in body["appointments"].as_array().expect("appointments array") {
        assert_eq!(a["status"], "requested");
    }

    // Unknown status value is rejected
    let response = client
        .get(format!("{}/agents/me/appointments?status=pending", BASE_URL))
        .header("Authorization", format!("Bearer {}", agent))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);
}
