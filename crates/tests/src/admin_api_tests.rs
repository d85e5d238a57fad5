use std::sync::atomic::Ordering;

use jsonwebtoken::{EncodingKey, Header, encode};
use serde_json::{Value, json};

use crate::fixtures::memory::PlatformCall;
use crate::fixtures::test_app::TestApp;

fn action_body() -> Value {
    json!({ "chat_id": -100, "telegram_user_id": 42 })
}

#[tokio::test]
async fn remove_user_bans_the_member() {
    let app = TestApp::spawn().await;

    let resp = app
        .client
        .post(app.url("/api/chats/remove-user"))
        .bearer_auth(app.admin_token())
        .json(&action_body())
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["ok"], true);
    assert_eq!(body["message"], "User removed successfully");
    assert_eq!(
        app.platform.calls(),
        vec![PlatformCall::Ban {
            chat_id: -100,
            user_id: 42,
        }]
    );
}

#[tokio::test]
async fn remove_user_reports_platform_failure_in_band() {
    let app = TestApp::spawn().await;
    app.platform.fail_ban.store(true, Ordering::SeqCst);

    let resp = app
        .client
        .post(app.url("/api/chats/remove-user"))
        .bearer_auth(app.admin_token())
        .json(&action_body())
        .send()
        .await
        .unwrap();

    // Platform refusals are outcomes, not transport errors.
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["ok"], false);
    assert_eq!(body["message"], "ban failed");
}

#[tokio::test]
async fn expired_admin_token_is_rejected_before_any_action() {
    let app = TestApp::spawn().await;

    let now = chrono::Utc::now().timestamp();
    let claims = json!({
        "sub": "ops@example.com",
        "role": "admin",
        "iat": now - 7200,
        "exp": now - 3600,
        "iss": app.settings.jwt.issuer,
    });
    let expired = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(app.settings.jwt.secret.as_bytes()),
    )
    .unwrap();

    let resp = app
        .client
        .post(app.url("/api/chats/remove-user"))
        .bearer_auth(expired)
        .json(&action_body())
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 401);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "token_expired");
    assert!(app.platform.calls().is_empty());
}

#[tokio::test]
async fn malformed_token_is_rejected() {
    let app = TestApp::spawn().await;

    let resp = app
        .client
        .post(app.url("/api/chats/remove-user"))
        .bearer_auth("not-a-jwt")
        .json(&action_body())
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 401);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "token_invalid");
}

#[tokio::test]
async fn non_admin_role_is_forbidden() {
    let app = TestApp::spawn().await;

    let now = chrono::Utc::now().timestamp();
    let claims = json!({
        "sub": "viewer@example.com",
        "role": "viewer",
        "iat": now,
        "exp": now + 3600,
        "iss": app.settings.jwt.issuer,
    });
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(app.settings.jwt.secret.as_bytes()),
    )
    .unwrap();

    let resp = app
        .client
        .post(app.url("/api/chats/sent-invitation"))
        .bearer_auth(token)
        .json(&action_body())
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 403);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "forbidden");
    assert!(app.platform.calls().is_empty());
}

#[tokio::test]
async fn missing_bearer_token_is_unauthorized() {
    let app = TestApp::spawn().await;

    let resp = app
        .client
        .post(app.url("/api/chats/remove-user"))
        .json(&action_body())
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 401);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "token_invalid");
}

#[tokio::test]
async fn sent_invitation_rotates_then_delivers() {
    let app = TestApp::spawn().await;

    let resp = app
        .client
        .post(app.url("/api/chats/sent-invitation"))
        .bearer_auth(app.admin_token())
        .json(&action_body())
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["ok"], true);
    assert_eq!(body["message"], "Invitation sent");

    let calls = app.platform.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0], PlatformCall::RotateLink { chat_id: -100 });
    match &calls[1] {
        PlatformCall::Direct { user_id, text } => {
            assert_eq!(*user_id, 42);
            assert!(text.contains("https://t.me/+stub-invite"), "text: {text}");
        }
        other => panic!("expected a direct message, got {other:?}"),
    }
}

#[tokio::test]
async fn sent_invitation_stops_when_rotation_fails() {
    let app = TestApp::spawn().await;
    app.platform.fail_rotate.store(true, Ordering::SeqCst);

    let resp = app
        .client
        .post(app.url("/api/chats/sent-invitation"))
        .bearer_auth(app.admin_token())
        .json(&action_body())
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["ok"], false);
    assert!(
        body["message"]
            .as_str()
            .unwrap()
            .starts_with("Failed to create invite link"),
        "message: {}",
        body["message"]
    );
    // No DM attempt after a failed rotation
    assert_eq!(app.platform.calls().len(), 1);
}

#[tokio::test]
async fn sent_invitation_reports_delivery_failure() {
    let app = TestApp::spawn().await;
    app.platform.fail_direct.store(true, Ordering::SeqCst);

    let resp = app
        .client
        .post(app.url("/api/chats/sent-invitation"))
        .bearer_auth(app.admin_token())
        .json(&action_body())
        .send()
        .await
        .unwrap();

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["ok"], false);
    assert!(
        body["message"].as_str().unwrap().contains("delivery failed"),
        "message: {}",
        body["message"]
    );
}

#[tokio::test]
async fn generate_invite_returns_a_verifiable_deep_link() {
    let app = TestApp::spawn().await;

    let resp = app
        .client
        .get(app.url("/generate-invite"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    let url = body["invite"].as_str().unwrap();

    let prefix = format!(
        "https://t.me/{}?start=",
        app.settings.telegram.bot_username
    );
    let token = url.strip_prefix(&prefix).unwrap();
    app.auth.verify_invite(token).unwrap();
}

#[tokio::test]
async fn health_reports_ok() {
    let app = TestApp::spawn().await;

    let resp = app.client.get(app.url("/health")).send().await.unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "ok");
}
