pub(crate) mod current_user;
pub(crate) mod login;
pub(crate) mod logout;
mod password_reset;
pub(crate) mod register;

pub use current_user::*;
pub use login::*;
pub use logout::*;
pub use password_reset::*;
pub use register::*;

use crate::authentication::{generate_token, IssuedToken};
use crate::configuration::AuthSettings;
use crate::domain::{EmailAddress, ValidationErrors};
use crate::models::{NewAccessToken, User};
use crate::routes::{error_chain_fmt, json_message};
use crate::startup::HotelDbConn;
use crate::storage::PublicDisk;
use anyhow::Context;
use chrono::{DateTime, Duration, Utc};
use diesel::prelude::*;
use rocket::http::Status;
use rocket::response::Responder;
use rocket::Request;

/// Directory of the public disk holding profile photos.
pub const USER_PHOTO_DIRECTORY: &str = "users";

/// Name recorded for tokens issued by register and login.
const ACCESS_TOKEN_NAME: &str = "auth_token";

#[derive(thiserror::Error)]
pub enum AccountError {
    #[error("{0}")]
    ValidationError(ValidationErrors),
    #[error("Invalid credentials.")]
    InvalidCredentials(#[source] anyhow::Error),
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for AccountError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl From<ValidationErrors> for AccountError {
    fn from(errors: ValidationErrors) -> Self {
        AccountError::ValidationError(errors)
    }
}

impl<'r> Responder<'r, 'static> for AccountError {
    fn respond_to(self, request: &'r Request<'_>) -> rocket::response::Result<'static> {
        match self {
            AccountError::ValidationError(errors) => {
                tracing::info!(error = %errors, "Rejected account input.");
                errors.respond_to(request)
            }
            AccountError::InvalidCredentials(_) => {
                tracing::warn!("AccountError: {:?}", self);
                json_message(Status::Unauthorized, "Invalid credentials.").respond_to(request)
            }
            AccountError::UnexpectedError(_) => {
                tracing::error!("AccountError: {:?}", self);
                json_message(Status::InternalServerError, "Server Error").respond_to(request)
            }
        }
    }
}

/// JSON shape of a user; the password hash never leaves the server.
#[derive(serde::Serialize, Debug)]
pub struct UserResource {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub photo: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserResource {
    pub fn new(user: User, disk: &PublicDisk) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            photo: user.photo.as_deref().map(|path| disk.url(path)),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

fn required_email(email: Option<String>, errors: &mut ValidationErrors) -> Option<EmailAddress> {
    match email.filter(|e| !e.trim().is_empty()) {
        None => {
            errors.add("email", "The email field is required.");
            None
        }
        Some(email) => EmailAddress::parse(email)
            .map_err(|_| errors.add("email", "The email field must be a valid email address."))
            .ok(),
    }
}

#[tracing::instrument(name = "Issue a personal access token", skip(conn, settings))]
async fn issue_access_token(
    conn: &HotelDbConn,
    user_id: i64,
    settings: &AuthSettings,
) -> Result<IssuedToken, anyhow::Error> {
    use crate::schema::personal_access_tokens;

    let token = generate_token();
    let digest = token.digest.clone();
    let expires_at = settings
        .token_expiration_minutes
        .map(|minutes| Utc::now() + Duration::minutes(minutes));
    conn.run(move |c| {
        diesel::insert_into(personal_access_tokens::table)
            .values(NewAccessToken {
                user_id,
                name: ACCESS_TOKEN_NAME,
                token_hash: &digest,
                expires_at,
            })
            .execute(c)
    })
    .await
    .context("Failed to store a new access token.")?;
    Ok(token)
}

#[tracing::instrument(name = "Find a user by email", skip(conn))]
async fn find_user_by_email(conn: &HotelDbConn, email: String) -> Result<Option<User>, anyhow::Error> {
    use crate::schema::users;
    conn.run(move |c| {
        users::table
            .filter(users::email.eq(email))
            .select(User::as_select())
            .first(c)
            .optional()
    })
    .await
    .context("Failed to look up a user by email.")
}
