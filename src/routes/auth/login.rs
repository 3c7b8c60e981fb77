use crate::authentication::{verify_password_hash, CredentialsError};
use crate::configuration::AuthSettings;
use crate::domain::{EmailAddress, ValidationErrors};
use crate::routes::auth::{
    find_user_by_email, issue_access_token, required_email, AccountError, UserResource,
};
use crate::startup::HotelDbConn;
use crate::storage::PublicDisk;
use rocket::serde::json::Json;
use rocket::State;
use secrecy::{ExposeSecret, Secret};
use serde_json::{json, Value};
use uuid::Uuid;

#[derive(serde::Deserialize)]
pub struct LoginBody {
    email: Option<String>,
    password: Option<Secret<String>>,
}

pub struct Credentials {
    pub email: EmailAddress,
    pub password: Secret<String>,
}

impl TryFrom<LoginBody> for Credentials {
    type Error = ValidationErrors;

    fn try_from(body: LoginBody) -> Result<Self, Self::Error> {
        let mut errors = ValidationErrors::new();
        let email = required_email(body.email, &mut errors);
        let password = body.password.filter(|p| !p.expose_secret().is_empty());
        if password.is_none() {
            errors.add("password", "The password field is required.");
        }
        match (email, password) {
            (Some(email), Some(password)) => Ok(Credentials { email, password }),
            _ => Err(errors),
        }
    }
}

#[tracing::instrument(
    name = "Log a user in",
    skip(body, conn, disk, settings),
    fields(request_id = %Uuid::new_v4(), user_id = tracing::field::Empty)
)]
#[post("/login", data = "<body>")]
pub async fn login(
    body: Json<LoginBody>,
    conn: HotelDbConn,
    disk: &State<PublicDisk>,
    settings: &State<AuthSettings>,
) -> Result<Json<Value>, AccountError> {
    let credentials: Credentials = body.into_inner().try_into()?;

    let user = find_user_by_email(&conn, credentials.email.as_ref().to_string()).await?;
    let expected_hash = user.as_ref().map(|u| u.password_hash.clone());
    match verify_password_hash(expected_hash, credentials.password).await {
        Ok(()) => {}
        Err(CredentialsError::InvalidCredentials(e)) => {
            return Err(AccountError::InvalidCredentials(e))
        }
        Err(CredentialsError::UnexpectedError(e)) => return Err(AccountError::UnexpectedError(e)),
    }
    // Verification only succeeds for a known user.
    let user = match user {
        Some(user) => user,
        None => {
            return Err(AccountError::InvalidCredentials(anyhow::anyhow!(
                "Unknown email."
            )))
        }
    };
    tracing::Span::current().record("user_id", &user.id);

    let token = issue_access_token(&conn, user.id, settings).await?;
    Ok(Json(json!({
        "message": "Login successful.",
        "user": UserResource::new(user, disk),
        "token": token.expose(),
        "token_type": "Bearer",
    })))
}
