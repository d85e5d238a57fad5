use std::sync::atomic::Ordering;

use gatekeeper_services::telegram::{InitDataError, verify_init_data};
use hmac::{Hmac, Mac};
use serde_json::{Value, json};
use sha2::Sha256;

use crate::fixtures::memory::PlatformCall;
use crate::fixtures::test_app::{TestApp, test_settings};

/// Produces `initData` the way a Telegram client would: percent-encoded
/// pairs plus an HMAC over the sorted, decoded key=value lines.
fn sign_init_data(fields: &[(&str, &str)], bot_token: &str) -> String {
    let mut lines: Vec<String> = fields
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect();
    lines.sort();
    let data_check_string = lines.join("\n");

    let mut secret = Hmac::<Sha256>::new_from_slice(b"WebAppData").unwrap();
    secret.update(bot_token.as_bytes());
    let secret_key = secret.finalize().into_bytes();

    let mut mac = Hmac::<Sha256>::new_from_slice(&secret_key).unwrap();
    mac.update(data_check_string.as_bytes());
    let hash = hex::encode(mac.finalize().into_bytes());

    let mut encoded: Vec<String> = fields
        .iter()
        .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)))
        .collect();
    encoded.push(format!("hash={hash}"));
    encoded.join("&")
}

fn sample_fields() -> Vec<(&'static str, &'static str)> {
    vec![
        ("auth_date", "1756339200"),
        ("query_id", "AAE5Xh8AAAAAADleHwBQ1234"),
        ("user", r#"{"id":42,"first_name":"Alice","username":"alice"}"#),
    ]
}

#[test]
fn genuine_init_data_verifies() {
    let token = "12345:test-bot-token";
    let init_data = sign_init_data(&sample_fields(), token);

    let data = verify_init_data(&init_data, token).unwrap();
    assert_eq!(data.user_id(), Some(42));
    assert_eq!(data.get("auth_date"), Some("1756339200"));
}

#[test]
fn tampered_field_is_detected() {
    let token = "12345:test-bot-token";
    let init_data = sign_init_data(&sample_fields(), token);
    let tampered = init_data.replace("Alice", "Mallory");
    assert_eq!(
        verify_init_data(&tampered, token).unwrap_err(),
        InitDataError::SignatureMismatch
    );
}

#[test]
fn wrong_bot_token_is_detected() {
    let init_data = sign_init_data(&sample_fields(), "12345:test-bot-token");
    assert_eq!(
        verify_init_data(&init_data, "99999:other-bot").unwrap_err(),
        InitDataError::SignatureMismatch
    );
}

#[test]
fn missing_hash_is_rejected() {
    assert_eq!(
        verify_init_data("auth_date=1756339200&query_id=abc", "t").unwrap_err(),
        InitDataError::MissingHash
    );
}

#[test]
fn bare_field_is_malformed() {
    assert_eq!(
        verify_init_data("auth_date", "t").unwrap_err(),
        InitDataError::Malformed
    );
}

#[tokio::test]
async fn webapp_verification_confirms_over_dm() {
    let app = TestApp::spawn().await;
    let settings = test_settings();
    let init_data = sign_init_data(&sample_fields(), &settings.telegram.bot_token);
    let invite = app.auth.issue_invite().unwrap();

    let resp = app
        .client
        .post(app.url("/api/verify-webapp"))
        .json(&json!({
            "telegram_user_id": 42,
            "inviteToken": invite.token,
            "initData": init_data,
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], true);
    match &app.platform.calls()[..] {
        [PlatformCall::Direct { user_id, text }] => {
            assert_eq!(*user_id, 42);
            assert!(text.contains("confirmed"), "text: {text}");
        }
        other => panic!("expected one direct message, got {other:?}"),
    }
}

#[tokio::test]
async fn tampered_init_data_fails_without_a_dm() {
    let app = TestApp::spawn().await;
    let settings = test_settings();
    let init_data = sign_init_data(&sample_fields(), &settings.telegram.bot_token);
    let invite = app.auth.issue_invite().unwrap();

    let resp = app
        .client
        .post(app.url("/api/verify-webapp"))
        .json(&json!({
            "telegram_user_id": 42,
            "inviteToken": invite.token,
            "initData": init_data.replace("Alice", "Mallory"),
        }))
        .send()
        .await
        .unwrap();

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert!(app.platform.calls().is_empty());
}

#[tokio::test]
async fn claimed_user_id_must_match_the_signed_one() {
    let app = TestApp::spawn().await;
    let settings = test_settings();
    // Genuinely signed for user 42, claimed for user 43
    let init_data = sign_init_data(&sample_fields(), &settings.telegram.bot_token);
    let invite = app.auth.issue_invite().unwrap();

    let resp = app
        .client
        .post(app.url("/api/verify-webapp"))
        .json(&json!({
            "telegram_user_id": 43,
            "inviteToken": invite.token,
            "initData": init_data,
        }))
        .send()
        .await
        .unwrap();

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert!(app.platform.calls().is_empty());
}

#[tokio::test]
async fn bad_invite_token_fails_before_init_data() {
    let app = TestApp::spawn().await;
    let settings = test_settings();
    let init_data = sign_init_data(&sample_fields(), &settings.telegram.bot_token);

    let resp = app
        .client
        .post(app.url("/api/verify-webapp"))
        .json(&json!({
            "telegram_user_id": 42,
            "inviteToken": "not-a-token",
            "initData": init_data,
        }))
        .send()
        .await
        .unwrap();

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert!(app.platform.calls().is_empty());
}

#[tokio::test]
async fn confirmation_delivery_failure_does_not_change_the_outcome() {
    let app = TestApp::spawn().await;
    app.platform.fail_direct.store(true, Ordering::SeqCst);
    let settings = test_settings();
    let init_data = sign_init_data(&sample_fields(), &settings.telegram.bot_token);
    let invite = app.auth.issue_invite().unwrap();

    let resp = app
        .client
        .post(app.url("/api/verify-webapp"))
        .json(&json!({
            "telegram_user_id": 42,
            "inviteToken": invite.token,
            "initData": init_data,
        }))
        .send()
        .await
        .unwrap();

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], true);
}
