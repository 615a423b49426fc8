use wiremock::matchers::{any, body_partial_json, method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::helpers::{TestApp, TestAppOptions};

#[tokio::test]
async fn notifications_are_sent_to_every_member() {
    let test_app = TestApp::spawn_app().await;

    Mock::given(path("/emails"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&test_app.email_server)
        .await;

    let body = serde_json::json!({
        "subject": "Holiday opening hours",
        "message": "We are closed on Monday.",
        "members": [
            { "id": "m1", "email": "first@test.com" },
            { "email": "second@test.com" }
        ]
    });
    let response = test_app.post_notifications(body, None).await;

    assert_eq!(response.status().as_u16(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(
        body,
        serde_json::json!({
            "results": [
                { "memberId": "m1", "email": "first@test.com", "status": "success" },
                { "email": "second@test.com", "status": "success" }
            ]
        })
    );
}

#[tokio::test]
async fn a_rejected_member_does_not_stop_the_others() {
    let test_app = TestApp::spawn_app().await;

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

    let body = serde_json::json!({
        "subject": "Holiday opening hours",
        "message": "We are closed on Monday.",
        "members": [
            { "id": "m1", "email": "first@test.com" },
            { "id": "m2", "email": "second@test.com" }
        ]
    });
    let response = test_app.post_notifications(body, None).await;

    assert_eq!(response.status().as_u16(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["results"][0]["status"], "error");
    assert_eq!(body["results"][0]["error"], "Invalid recipient");
    assert_eq!(body["results"][1]["status"], "success");
}

#[tokio::test]
async fn notifications_return_400_when_body_is_invalid() {
    let test_app = TestApp::spawn_app().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&test_app.email_server)
        .await;

    // This is a common practice and it is called table-driven tests. In this case, it simulates different kind of possible request bodies
    // where API should return 400.
    let test_cases = vec![
        (
            serde_json::json!({ "message": "Hello", "members": [] }),
            "missing subject",
        ),
        (
            serde_json::json!({ "subject": "Hello", "members": [] }),
            "missing message",
        ),
        (
            serde_json::json!({ "subject": "Hello", "message": "Hello" }),
            "missing members",
        ),
        (
            serde_json::json!({ "subject": "  ", "message": "Hello", "members": [] }),
            "empty subject",
        ),
        (
            serde_json::json!({ "subject": "Hello", "message": "", "members": [] }),
            "empty message",
        ),
    ];

    for (invalid_body, error_message) in test_cases {
        let response = test_app.post_notifications(invalid_body, None).await;

        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail with 400 status when payload was {}",
            error_message
        );
    }
}

#[tokio::test]
async fn notifications_require_the_trigger_token_when_configured() {
    let test_app = TestApp::spawn_with(TestAppOptions {
        trigger_token: Some("s3cr3t".into()),
        ..TestAppOptions::default()
    })
    .await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&test_app.email_server)
        .await;

    let body = serde_json::json!({
        "subject": "Hello",
        "message": "Hello",
        "members": [{ "email": "first@test.com" }]
    });

    let rejected = test_app.post_notifications(body.clone(), None).await;
    let accepted = test_app.post_notifications(body, Some("s3cr3t")).await;

    assert_eq!(rejected.status().as_u16(), 401);
    assert_eq!(accepted.status().as_u16(), 200);
}
