use crate::authentication::{compute_password_hash, generate_token, hash_token};
use crate::configuration::{ApplicationSettings, AuthSettings};
use crate::domain::{EmailAddress, NewPassword, ValidationErrors};
use crate::email::Email;
use crate::models::PasswordResetToken;
use crate::routes::auth::{find_user_by_email, required_email, AccountError};
use crate::startup::HotelDbConn;
use anyhow::Context;
use chrono::{Duration, Utc};
use diesel::prelude::*;
use rocket::http::uri::fmt::{Query, UriDisplay};
use rocket::serde::json::Json;
use rocket::State;
use secrecy::{ExposeSecret, Secret};
use serde_json::{json, Value};
use std::sync::Arc;
use uuid::Uuid;

const UNKNOWN_EMAIL: &str = "We can't find a user with that email address.";
const INVALID_TOKEN: &str = "This password reset token is invalid.";

#[derive(serde::Deserialize)]
pub struct ForgotPasswordBody {
    email: Option<String>,
}

#[derive(serde::Deserialize)]
pub struct ResetPasswordBody {
    token: Option<Secret<String>>,
    email: Option<String>,
    password: Option<Secret<String>>,
    password_confirmation: Option<Secret<String>>,
}

#[derive(Debug)]
pub struct PasswordReset {
    pub token: Secret<String>,
    pub email: EmailAddress,
    pub password: NewPassword,
}

impl TryFrom<ResetPasswordBody> for PasswordReset {
    type Error = ValidationErrors;

    fn try_from(body: ResetPasswordBody) -> Result<Self, Self::Error> {
        let mut errors = ValidationErrors::new();
        let token = body.token.filter(|t| !t.expose_secret().trim().is_empty());
        if token.is_none() {
            errors.add("token", "The token field is required.");
        }
        let email = required_email(body.email, &mut errors);
        let confirmation = body.password_confirmation;
        let password = NewPassword::parse(
            body.password.unwrap_or_else(|| Secret::new(String::new())),
            confirmation.as_ref().map(|c| c.expose_secret().as_str()),
        )
        .map_err(|e| errors.add("password", e))
        .ok();

        match (token, email, password) {
            (Some(token), Some(email), Some(password)) => Ok(PasswordReset {
                token,
                email,
                password,
            }),
            _ => Err(errors),
        }
    }
}

#[tracing::instrument(
    name = "Send a password reset link",
    skip(body, conn, email_client, application, settings),
    fields(request_id = %Uuid::new_v4())
)]
#[post("/forgot-password", data = "<body>")]
pub async fn forgot_password(
    body: Json<ForgotPasswordBody>,
    conn: HotelDbConn,
    email_client: &State<Arc<dyn Email>>,
    application: &State<ApplicationSettings>,
    settings: &State<AuthSettings>,
) -> Result<Json<Value>, AccountError> {
    let mut errors = ValidationErrors::new();
    let email = match required_email(body.into_inner().email, &mut errors) {
        Some(email) => email,
        None => return Err(errors.into()),
    };

    if find_user_by_email(&conn, email.as_ref().to_string())
        .await?
        .is_none()
    {
        return Err(ValidationErrors::single("email", UNKNOWN_EMAIL).into());
    }

    let now = Utc::now();
    let throttle = Duration::seconds(settings.password_reset_throttle_seconds);
    if let Some(existing) = find_reset_token(&conn, email.as_ref().to_string()).await? {
        if existing.recently_created(now, throttle) {
            return Err(
                ValidationErrors::single("email", "Please wait before retrying.").into(),
            );
        }
    }

    let token = generate_token();
    store_reset_token(
        &conn,
        PasswordResetToken {
            email: email.as_ref().to_string(),
            token_hash: token.digest.clone(),
            created_at: now,
        },
    )
    .await?;

    send_reset_link(
        email_client.inner().as_ref(),
        &email,
        &application.frontend_url,
        token.expose(),
        settings.password_reset_expiration_minutes,
    )
    .await
    .context("Failed to send the password reset email.")?;

    Ok(Json(json!({ "message": "We have emailed your password reset link." })))
}

#[tracing::instrument(
    name = "Reset a password",
    skip(body, conn, settings),
    fields(request_id = %Uuid::new_v4())
)]
#[post("/reset-password", data = "<body>")]
pub async fn reset_password(
    body: Json<ResetPasswordBody>,
    conn: HotelDbConn,
    settings: &State<AuthSettings>,
) -> Result<Json<Value>, AccountError> {
    let reset: PasswordReset = body.into_inner().try_into()?;
    let email = reset.email.as_ref().to_string();

    let user = find_user_by_email(&conn, email.clone())
        .await?
        .ok_or_else(|| ValidationErrors::single("email", UNKNOWN_EMAIL))?;

    let lifetime = Duration::minutes(settings.password_reset_expiration_minutes);
    let is_valid = match find_reset_token(&conn, email.clone()).await? {
        Some(record) => {
            record.token_hash == hash_token(reset.token.expose_secret())
                && !record.is_expired(Utc::now(), lifetime)
        }
        None => false,
    };
    if !is_valid {
        return Err(ValidationErrors::single("email", INVALID_TOKEN).into());
    }

    let password_hash =
        compute_password_hash(Secret::new(reset.password.expose_secret().clone())).await?;

    let user_id = user.id;
    conn.run(move |c| {
        use crate::schema::{password_reset_tokens, users};
        c.transaction::<_, diesel::result::Error, _>(|c| {
            diesel::update(users::table.find(user_id))
                .set((
                    users::password_hash.eq(password_hash.as_str()),
                    users::updated_at.eq(Utc::now()),
                ))
                .execute(c)?;
            diesel::delete(password_reset_tokens::table.find(email.as_str())).execute(c)?;
            Ok(())
        })
    })
    .await
    .context("Failed to store the new password.")?;

    Ok(Json(json!({ "message": "Your password has been reset." })))
}

#[tracing::instrument(name = "Send a password reset email", skip(email_client, token))]
async fn send_reset_link(
    email_client: &dyn Email,
    recipient: &EmailAddress,
    frontend_url: &str,
    token: &str,
    expiration_minutes: i64,
) -> Result<(), anyhow::Error> {
    let email = recipient.as_ref();
    let reset_link = format!(
        "{}/reset-password?token={}&email={}",
        frontend_url.trim_end_matches('/'),
        token,
        &email as &dyn UriDisplay<Query>
    );
    let html_body = format!(
        "You are receiving this email because we received a password reset request \
        for your account.<br />\
        Click <a href=\"{}\">here</a> to reset your password.<br />\
        This link will expire in {} minutes.",
        reset_link, expiration_minutes
    );
    let plain_body = format!(
        "You are receiving this email because we received a password reset request \
        for your account.\nVisit {} to reset your password.\n\
        This link will expire in {} minutes.",
        reset_link, expiration_minutes
    );
    email_client
        .send_email(recipient, "Reset Password Notification", &html_body, &plain_body)
        .await
}

async fn find_reset_token(
    conn: &HotelDbConn,
    email: String,
) -> Result<Option<PasswordResetToken>, anyhow::Error> {
    use crate::schema::password_reset_tokens;
    conn.run(move |c| {
        password_reset_tokens::table
            .find(email)
            .select(PasswordResetToken::as_select())
            .first(c)
            .optional()
    })
    .await
    .context("Failed to look up a password reset token.")
}

/// Replaces any previous token for the same address.
async fn store_reset_token(conn: &HotelDbConn, token: PasswordResetToken) -> Result<(), anyhow::Error> {
    use crate::schema::password_reset_tokens;
    conn.run(move |c| {
        diesel::insert_into(password_reset_tokens::table)
            .values(&token)
            .on_conflict(password_reset_tokens::email)
            .do_update()
            .set((
                password_reset_tokens::token_hash.eq(token.token_hash.as_str()),
                password_reset_tokens::created_at.eq(token.created_at),
            ))
            .execute(c)
    })
    .await
    .context("Failed to store a password reset token.")?;
    Ok(())
}
