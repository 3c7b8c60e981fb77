use crate::authentication::compute_password_hash;
use crate::configuration::AuthSettings;
use crate::domain::{NewPassword, NewUser, UserName, ValidationErrors};
use crate::models::{NewUserRecord, User};
use crate::routes::auth::{issue_access_token, required_email, AccountError, UserResource};
use crate::startup::HotelDbConn;
use crate::storage::PublicDisk;
use anyhow::Context;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;
use secrecy::{ExposeSecret, Secret};
use serde_json::{json, Value};
use uuid::Uuid;

#[derive(serde::Deserialize)]
pub struct RegisterBody {
    name: Option<String>,
    email: Option<String>,
    password: Option<Secret<String>>,
    password_confirmation: Option<Secret<String>>,
}

impl TryFrom<RegisterBody> for NewUser {
    type Error = ValidationErrors;

    fn try_from(body: RegisterBody) -> Result<Self, Self::Error> {
        let mut errors = ValidationErrors::new();

        let name = UserName::parse(body.name.unwrap_or_default())
            .map_err(|e| errors.add("name", e))
            .ok();
        let email = required_email(body.email, &mut errors);
        let confirmation = body.password_confirmation;
        let password = NewPassword::parse(
            body.password.unwrap_or_else(|| Secret::new(String::new())),
            confirmation.as_ref().map(|c| c.expose_secret().as_str()),
        )
        .map_err(|e| errors.add("password", e))
        .ok();

        match (name, email, password) {
            (Some(name), Some(email), Some(password)) => Ok(NewUser {
                name,
                email,
                password,
            }),
            _ => Err(errors),
        }
    }
}

#[tracing::instrument(
    name = "Register a new user",
    skip(body, conn, disk, settings),
    fields(request_id = %Uuid::new_v4(), user_email = tracing::field::Empty)
)]
#[post("/register", data = "<body>")]
pub async fn register(
    body: Json<RegisterBody>,
    conn: HotelDbConn,
    disk: &State<PublicDisk>,
    settings: &State<AuthSettings>,
) -> Result<(Status, Json<Value>), AccountError> {
    let new_user: NewUser = body.into_inner().try_into()?;
    tracing::Span::current().record("user_email", &tracing::field::display(&new_user.email));

    let password_hash =
        compute_password_hash(Secret::new(new_user.password.expose_secret().clone())).await?;
    let user = insert_user(&conn, &new_user, password_hash).await?;
    let token = issue_access_token(&conn, user.id, settings).await?;

    Ok((
        Status::Created,
        Json(json!({
            "message": "User registered successfully.",
            "user": UserResource::new(user, disk),
            "token": token.expose(),
            "token_type": "Bearer",
        })),
    ))
}

#[tracing::instrument(name = "Saving new user details in the database", skip(conn, new_user, password_hash))]
async fn insert_user(
    conn: &HotelDbConn,
    new_user: &NewUser,
    password_hash: String,
) -> Result<User, AccountError> {
    use crate::schema::users;
    let name = new_user.name.as_ref().to_string();
    let email = new_user.email.as_ref().to_string();
    let outcome = conn
        .run(move |c| {
            diesel::insert_into(users::table)
                .values(NewUserRecord {
                    name: &name,
                    email: &email,
                    password_hash: &password_hash,
                })
                .returning(User::as_returning())
                .get_result(c)
        })
        .await;

    match outcome {
        Ok(user) => Ok(user),
        Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => Err(
            ValidationErrors::single("email", "The email has already been taken.").into(),
        ),
        Err(e) => Err(anyhow::Error::new(e)
            .context("Failed to insert a new user in the database.")
            .into()),
    }
}
