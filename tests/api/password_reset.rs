use crate::helpers::{spawn_app, TestApp, TestUser, FRONTEND_URL};
use chrono::{Duration, Utc};
use diesel::prelude::*;
use hotel_admin::schema::password_reset_tokens;
use serde_json::{json, Value};

async fn request_reset_link(app: &TestApp, user: &TestUser) -> (String, String) {
    let response = app
        .post_forgot_password(&json!({ "email": user.email }))
        .await;
    assert_eq!(200, response.status().as_u16());

    let emails = app.email_client.sent();
    let email = emails.last().expect("No email was sent.");
    let link = app.get_reset_link(email);
    let value_of = |key: &str| {
        link.query_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
            .unwrap_or_else(|| panic!("The reset link has no {}", key))
    };
    (value_of("token"), value_of("email"))
}

#[tokio::test]
async fn forgot_password_emails_a_link_to_the_dashboard() {
    // arrange
    let app = spawn_app().await;
    let user = app.register_user().await;

    // act
    let response = app
        .post_forgot_password(&json!({ "email": user.email }))
        .await;

    // assert
    assert_eq!(200, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "We have emailed your password reset link.");

    let emails = app.email_client.sent();
    assert_eq!(emails.len(), 1);
    assert_eq!(emails[0].recipient, user.email);
    assert_eq!(emails[0].subject, "Reset Password Notification");
    let link = app.get_reset_link(&emails[0]);
    assert!(link
        .as_str()
        .starts_with(&format!("{}/reset-password?token=", FRONTEND_URL)));
    assert!(emails[0].html.contains("reset-password?token="));
}

#[tokio::test]
async fn forgot_password_rejects_unknown_and_invalid_addresses() {
    let app = spawn_app().await;
    let test_cases = vec![
        (json!({ "email": "nobody@example.com" }), "We can't find a user with that email address."),
        (json!({ "email": "not-an-email" }), "The email field must be a valid email address."),
        (json!({}), "The email field is required."),
    ];

    for (body, message) in test_cases {
        let response = app.post_forgot_password(&body).await;

        assert_eq!(422, response.status().as_u16());
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["errors"]["email"][0], message);
    }
    assert!(app.email_client.sent().is_empty());
}

#[tokio::test]
async fn forgot_password_is_throttled() {
    let app = spawn_app().await;
    let user = app.register_user().await;

    app.post_forgot_password(&json!({ "email": user.email }))
        .await;
    let response = app
        .post_forgot_password(&json!({ "email": user.email }))
        .await;

    assert_eq!(422, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["errors"]["email"][0], "Please wait before retrying.");
    assert_eq!(app.email_client.sent().len(), 1);
}

#[tokio::test]
async fn the_reset_link_resets_the_password_once() {
    // arrange
    let app = spawn_app().await;
    let user = app.register_user().await;
    let (token, email) = request_reset_link(&app, &user).await;
    assert_eq!(email, user.email);
    let new_password = "a-brand-new-password";
    let body = json!({
        "token": token,
        "email": email,
        "password": new_password,
        "password_confirmation": new_password,
    });

    // act
    let first = app.post_reset_password(&body).await;
    let second = app.post_reset_password(&body).await;

    // assert
    assert_eq!(200, first.status().as_u16());
    let first: Value = first.json().await.unwrap();
    assert_eq!(first["message"], "Your password has been reset.");

    assert_eq!(422, second.status().as_u16());
    let second: Value = second.json().await.unwrap();
    assert_eq!(
        second["errors"]["email"][0],
        "This password reset token is invalid."
    );

    let old_login = app
        .post_login(&json!({ "email": user.email, "password": user.password }))
        .await;
    assert_eq!(401, old_login.status().as_u16());
    let new_login = app
        .post_login(&json!({ "email": user.email, "password": new_password }))
        .await;
    assert_eq!(200, new_login.status().as_u16());
}

#[tokio::test]
async fn a_wrong_token_is_rejected() {
    let app = spawn_app().await;
    let user = app.register_user().await;
    request_reset_link(&app, &user).await;

    let response = app
        .post_reset_password(&json!({
            "token": "not-the-token",
            "email": user.email,
            "password": "a-brand-new-password",
            "password_confirmation": "a-brand-new-password",
        }))
        .await;

    assert_eq!(422, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["errors"]["email"][0], "This password reset token is invalid.");
}

#[tokio::test]
async fn an_expired_token_is_rejected() {
    let mut app = spawn_app().await;
    let user = app.register_user().await;
    let (token, email) = request_reset_link(&app, &user).await;
    diesel::update(password_reset_tokens::table.find(email.as_str()))
        .set(password_reset_tokens::created_at.eq(Utc::now() - Duration::hours(2)))
        .execute(&mut app.db_connection)
        .unwrap();

    let response = app
        .post_reset_password(&json!({
            "token": token,
            "email": email,
            "password": "a-brand-new-password",
            "password_confirmation": "a-brand-new-password",
        }))
        .await;

    assert_eq!(422, response.status().as_u16());
}

#[tokio::test]
async fn reset_password_validates_the_new_password() {
    let app = spawn_app().await;
    let user = app.register_user().await;
    let (token, email) = request_reset_link(&app, &user).await;

    let response = app
        .post_reset_password(&json!({
            "token": token,
            "email": email,
            "password": "a-brand-new-password",
            "password_confirmation": "something-else",
        }))
        .await;

    assert_eq!(422, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert!(body["errors"]["password"].is_array());

    let login = app
        .post_login(&json!({ "email": user.email, "password": user.password }))
        .await;
    assert_eq!(200, login.status().as_u16());
}
