use crate::helpers::{png_part, spawn_app, stored_file, BASE_URL};
use diesel::prelude::*;
use hotel_admin::models::AccessToken;
use hotel_admin::schema::personal_access_tokens;
use reqwest::multipart::{Form, Part};
use serde_json::{json, Value};

#[tokio::test]
async fn register_returns_a_201_with_a_usable_token() {
    // arrange
    let mut app = spawn_app().await;
    let body = json!({
        "name": "le guin",
        "email": "ursula_le_guin@gmail.com",
        "password": "a-long-password",
        "password_confirmation": "a-long-password",
    });

    // act
    let response = app.post_register(&body).await;

    // assert
    assert_eq!(201, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["user"]["email"], "ursula_le_guin@gmail.com");
    assert_eq!(body["user"]["name"], "le guin");
    assert!(body["user"].get("password_hash").is_none());
    assert_eq!(body["token_type"], "Bearer");

    let token = body["token"].as_str().unwrap();
    let response = app.get_user(token).await;
    assert_eq!(200, response.status().as_u16());

    let stored = personal_access_tokens::table
        .select(AccessToken::as_select())
        .first(&mut app.db_connection)
        .expect("No token was stored.");
    assert_ne!(stored.token_hash, token);
}

#[tokio::test]
async fn register_returns_a_422_when_data_is_missing_or_invalid() {
    let app = spawn_app().await;
    let test_cases = vec![
        (
            json!({"email": "ursula@gmail.com", "password": "a-long-password", "password_confirmation": "a-long-password"}),
            "name",
            "missing the name",
        ),
        (
            json!({"name": "Ursula", "email": "not-an-email", "password": "a-long-password", "password_confirmation": "a-long-password"}),
            "email",
            "invalid email",
        ),
        (
            json!({"name": "Ursula", "email": "ursula@gmail.com", "password": "short", "password_confirmation": "short"}),
            "password",
            "short password",
        ),
        (
            json!({"name": "Ursula", "email": "ursula@gmail.com", "password": "a-long-password", "password_confirmation": "another-password"}),
            "password",
            "mismatched confirmation",
        ),
    ];

    for (body, field, description) in test_cases {
        let response = app.post_register(&body).await;

        assert_eq!(
            422,
            response.status().as_u16(),
            "The API did not fail with 422 when the payload had {}.",
            description
        );
        let body: Value = response.json().await.unwrap();
        assert!(
            body["errors"][field].is_array(),
            "No error was reported on `{}` for {}.",
            field,
            description
        );
    }
}

#[tokio::test]
async fn register_rejects_an_email_that_is_taken() {
    let app = spawn_app().await;
    let user = app.register_user().await;

    let response = app
        .post_register(&json!({
            "name": "Someone Else",
            "email": user.email,
            "password": "a-long-password",
            "password_confirmation": "a-long-password",
        }))
        .await;

    assert_eq!(422, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["errors"]["email"][0], "The email has already been taken.");
}

#[tokio::test]
async fn login_returns_a_token_for_valid_credentials() {
    let app = spawn_app().await;
    let user = app.register_user().await;

    let response = app
        .post_login(&json!({ "email": user.email, "password": user.password }))
        .await;

    assert_eq!(200, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["user"]["id"], user.id);
    let token = body["token"].as_str().unwrap();
    assert_ne!(token, user.token);
    assert_eq!(200, app.get_user(token).await.status().as_u16());
}

#[tokio::test]
async fn login_returns_a_401_for_invalid_credentials() {
    let app = spawn_app().await;
    let user = app.register_user().await;
    let test_cases = vec![
        (user.email.clone(), "wrong-password".to_string(), "wrong password"),
        ("nobody@example.com".to_string(), user.password.clone(), "unknown email"),
    ];

    for (email, password, description) in test_cases {
        let response = app
            .post_login(&json!({ "email": email, "password": password }))
            .await;

        assert_eq!(
            401,
            response.status().as_u16(),
            "The API did not reject the login with {}.",
            description
        );
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["message"], "Invalid credentials.");
    }
}

#[tokio::test]
async fn login_returns_a_422_when_fields_are_missing() {
    let app = spawn_app().await;

    let response = app.post_login(&json!({ "email": "ursula@gmail.com" })).await;

    assert_eq!(422, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert!(body["errors"]["password"].is_array());
}

#[tokio::test]
async fn requests_without_a_valid_token_are_rejected_with_401() {
    let app = spawn_app().await;

    let missing = app
        .api_client
        .get(format!("{}/api/user", &app.address))
        .send()
        .await
        .expect("Failed to execute request.");
    let bogus = app.get_user("not-a-real-token").await;

    for response in [missing, bogus] {
        assert_eq!(401, response.status().as_u16());
        assert_eq!(
            response.headers()["WWW-Authenticate"],
            r#"Bearer realm="api""#
        );
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["message"], "Unauthenticated.");
    }
}

#[tokio::test]
async fn a_logged_out_token_stops_working() {
    let app = spawn_app().await;
    let user = app.register_user().await;

    let response = app.post_logout(&user.token).await;
    assert_eq!(200, response.status().as_u16());

    let response = app.get_user(&user.token).await;
    assert_eq!(401, response.status().as_u16());
}

#[tokio::test]
async fn logout_only_revokes_the_token_used() {
    let app = spawn_app().await;
    let user = app.register_user().await;
    let body: Value = app
        .post_login(&json!({ "email": user.email, "password": user.password }))
        .await
        .json()
        .await
        .unwrap();
    let second_token = body["token"].as_str().unwrap();

    app.post_logout(&user.token).await;

    assert_eq!(200, app.get_user(second_token).await.status().as_u16());
}

#[tokio::test]
async fn current_user_returns_the_profile() {
    let app = spawn_app().await;
    let user = app.register_user().await;

    let response = app.get_user(&user.token).await;

    assert_eq!(200, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["id"], user.id);
    assert_eq!(body["name"], user.name.as_str());
    assert_eq!(body["email"], user.email.as_str());
    assert!(body["photo"].is_null());
}

#[tokio::test]
async fn uploading_a_profile_photo_replaces_the_previous_one() {
    // arrange
    let app = spawn_app().await;
    let user = app.register_user().await;

    // act
    let first: Value = app
        .post_upload_photo(&user.token, Form::new().part("photo", png_part()))
        .await
        .json()
        .await
        .unwrap();
    let response = app
        .post_upload_photo(&user.token, Form::new().part("photo", png_part()))
        .await;

    // assert
    assert_eq!(200, response.status().as_u16());
    let second: Value = response.json().await.unwrap();
    let first_url = first["user"]["photo"].as_str().unwrap();
    let second_url = second["user"]["photo"].as_str().unwrap();
    assert!(second_url.starts_with(&format!("{}/storage/users/", BASE_URL)));
    assert!(!stored_file(&app, first_url).exists());
    assert!(stored_file(&app, second_url).exists());

    let profile: Value = app.get_user(&user.token).await.json().await.unwrap();
    assert_eq!(profile["photo"], second_url);
}

#[tokio::test]
async fn uploading_a_profile_photo_requires_an_image() {
    let app = spawn_app().await;
    let user = app.register_user().await;
    let not_an_image = Part::bytes(b"just some text".to_vec())
        .file_name("notes.txt")
        .mime_str("text/plain")
        .unwrap();

    let empty = app
        .post_upload_photo(&user.token, Form::new().text("caption", "me"))
        .await;
    let text = app
        .post_upload_photo(&user.token, Form::new().part("photo", not_an_image))
        .await;

    for response in [empty, text] {
        assert_eq!(422, response.status().as_u16());
        let body: Value = response.json().await.unwrap();
        assert!(body["errors"]["photo"].is_array());
    }
}
