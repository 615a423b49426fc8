use chrono::{Duration, NaiveTime, TimeZone, Utc};
use wiremock::matchers::{any, body_partial_json, method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::helpers::{TestApp, TestAppOptions};

#[tokio::test]
async fn reminder_returns_500_and_sends_nothing_when_members_cannot_be_fetched() {
    let test_app = TestApp::spawn_app().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&test_app.email_server)
        .await;

    let response = test_app.trigger_reminder(None).await;

    assert_eq!(response.status().as_u16(), 500);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body, serde_json::json!({ "error": "Internal server error" }));
}

#[tokio::test]
async fn reminder_requires_the_trigger_token_when_configured() {
    let test_app = TestApp::spawn_with(TestAppOptions {
        trigger_token: Some("s3cr3t".into()),
        ..TestAppOptions::default()
    })
    .await;

    // This is a common practice and it is called table-driven tests.
    let test_cases = vec![(None, "missing token"), (Some("wrong"), "wrong token")];

    for (token, description) in test_cases {
        let response = test_app.trigger_reminder(token).await;

        assert_eq!(
            401,
            response.status().as_u16(),
            "The API did not fail with 401 status when the request had a {}",
            description
        );
        assert_eq!(
            response
                .headers()
                .get("www-authenticate")
                .map(|value| value.to_str().unwrap()),
            Some("Bearer")
        );
    }
}

#[tokio::test]
async fn reminder_runs_the_sweep_with_a_valid_token() {
    let test_app = TestApp::spawn_with(TestAppOptions {
        trigger_token: Some("s3cr3t".into()),
        ..TestAppOptions::default()
    })
    .await;

    let response = test_app.trigger_reminder(Some("s3cr3t")).await;

    // Past authorization the sweep reaches the (unreachable) database
    assert_eq!(response.status().as_u16(), 500);
}

#[tokio::test]
async fn reminder_notifies_active_members_expiring_tomorrow() {
    let test_app = TestApp::spawn_app_with_database().await;
    let tomorrow = Utc.from_utc_datetime(
        &(Utc::now().date_naive() + Duration::days(1)).and_time(NaiveTime::default()),
    );
    let plan_id = test_app.insert_plan("Iron Gym", "Pro", 29.0).await;

    let at_start = test_app
        .insert_member(plan_id, "start@test.com", "active", tomorrow)
        .await;
    let at_end = test_app
        .insert_member(plan_id, "late@test.com", "active", tomorrow + Duration::hours(23))
        .await;
    test_app
        .insert_member(plan_id, "inactive@test.com", "inactive", tomorrow + Duration::hours(1))
        .await;
    test_app
        .insert_member(plan_id, "after@test.com", "active", tomorrow + Duration::days(1))
        .await;
    test_app
        .insert_member(plan_id, "today@test.com", "active", tomorrow - Duration::seconds(1))
        .await;

    Mock::given(path("/emails"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&test_app.email_server)
        .await;

    let response = test_app.trigger_reminder(None).await;

    assert_eq!(response.status().as_u16(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Subscription reminder check completed");
    assert_eq!(body["ranCount"], 2);
    assert_eq!(body["successCount"], 2);
    assert_eq!(body["errorCount"], 0);
    assert_eq!(body["details"][0]["memberId"], at_start.to_string());
    assert_eq!(body["details"][1]["memberId"], at_end.to_string());
}

#[tokio::test]
async fn reminder_records_failed_sends_and_keeps_going() {
    let test_app = TestApp::spawn_app_with_database().await;
    let tomorrow = Utc.from_utc_datetime(
        &(Utc::now().date_naive() + Duration::days(1)).and_time(NaiveTime::default()),
    );
    let plan_id = test_app.insert_plan("Iron Gym", "Pro", 29.0).await;

    test_app
        .insert_member(plan_id, "first@test.com", "active", tomorrow + Duration::hours(1))
        .await;
    test_app
        .insert_member(plan_id, "second@test.com", "active", tomorrow + Duration::hours(2))
        .await;

    // Mocks answer in the order they were mounted
    Mock::given(body_partial_json(serde_json::json!({ "to": ["first@test.com"] })))
        .respond_with(
            ResponseTemplate::new(422).set_body_json(serde_json::json!({ "message": "Invalid recipient" })),
        )
        .expect(1)
        .mount(&test_app.email_server)
        .await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&test_app.email_server)
        .await;

    let response = test_app.trigger_reminder(None).await;

    assert_eq!(response.status().as_u16(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["ranCount"], 2);
    assert_eq!(body["successCount"], 1);
    assert_eq!(body["errorCount"], 1);
    assert_eq!(body["details"][0]["status"], "error");
    assert_eq!(body["details"][0]["error"], "Invalid recipient");
    assert_eq!(body["details"][1]["status"], "success");
}

#[tokio::test]
async fn reminder_with_no_expiring_members_is_an_empty_success() {
    let test_app = TestApp::spawn_app_with_database().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&test_app.email_server)
        .await;

    let response = test_app.trigger_reminder(None).await;

    assert_eq!(response.status().as_u16(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["ranCount"], 0);
    assert_eq!(body["successCount"], 0);
    assert_eq!(body["errorCount"], 0);
    assert_eq!(body["details"], serde_json::json!([]));
}

#[tokio::test]
async fn reminder_skips_expired_members_and_the_day_after_tomorrow() {
    let test_app = TestApp::spawn_app_with_database().await;
    let tomorrow = Utc.from_utc_datetime(
        &(Utc::now().date_naive() + Duration::days(1)).and_time(NaiveTime::default()),
    );
    let plan_id = test_app.insert_plan("Iron Gym", "Basic", 15.0).await;

    let reminded = test_app
        .insert_member(plan_id, "reminded@test.com", "active", tomorrow + Duration::hours(12))
        .await;
    test_app
        .insert_member(plan_id, "expired@test.com", "expired", tomorrow + Duration::hours(12))
        .await;
    test_app
        .insert_member(plan_id, "next-day@test.com", "active", tomorrow + Duration::days(1))
        .await;

    Mock::given(body_partial_json(serde_json::json!({ "to": ["reminded@test.com"] })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&test_app.email_server)
        .await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&test_app.email_server)
        .await;

    let response = test_app.trigger_reminder(None).await;

    assert_eq!(response.status().as_u16(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["ranCount"], 1);
    assert_eq!(body["details"][0]["memberId"], reminded.to_string());
    assert_eq!(body["details"][0]["email"], "reminded@test.com");
}
