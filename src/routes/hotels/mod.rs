mod create;
mod delete;
mod form;
mod list;
mod resource;
mod update;

pub use create::*;
pub use delete::*;
pub use form::*;
pub use list::*;
pub use resource::*;
pub use update::*;

use crate::domain::ValidationErrors;
use crate::guards::AuthenticatedUser;
use crate::models::Hotel;
use crate::routes::{error_chain_fmt, json_message};
use crate::startup::HotelDbConn;
use anyhow::Context;
use diesel::prelude::*;
use rocket::http::Status;
use rocket::response::Responder;
use rocket::Request;

/// Directory of the public disk holding hotel photos.
pub const HOTEL_PHOTO_DIRECTORY: &str = "hotels";

#[derive(thiserror::Error)]
pub enum HotelError {
    #[error("{0}")]
    ValidationError(ValidationErrors),
    #[error("Hotel {0} does not exist.")]
    NotFound(i64),
    #[error("User {user_id} does not own hotel {hotel_id}.")]
    Forbidden { user_id: i64, hotel_id: i64 },
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for HotelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl From<ValidationErrors> for HotelError {
    fn from(errors: ValidationErrors) -> Self {
        HotelError::ValidationError(errors)
    }
}

impl<'r> Responder<'r, 'static> for HotelError {
    fn respond_to(self, request: &'r Request<'_>) -> rocket::response::Result<'static> {
        match self {
            HotelError::ValidationError(errors) => {
                tracing::info!(error = %errors, "Rejected hotel input.");
                errors.respond_to(request)
            }
            HotelError::NotFound(_) => {
                tracing::info!("HotelError: {:?}", self);
                json_message(Status::NotFound, "Not found.").respond_to(request)
            }
            HotelError::Forbidden { .. } => {
                tracing::warn!("HotelError: {:?}", self);
                json_message(Status::Forbidden, "This action is unauthorized.").respond_to(request)
            }
            HotelError::UnexpectedError(_) => {
                tracing::error!("HotelError: {:?}", self);
                json_message(Status::InternalServerError, "Server Error").respond_to(request)
            }
        }
    }
}

#[tracing::instrument(name = "Fetch a hotel", skip(conn))]
async fn find_hotel(conn: &HotelDbConn, hotel_id: i64) -> Result<Hotel, HotelError> {
    use crate::schema::hotels;
    conn.run(move |c| {
        hotels::table
            .find(hotel_id)
            .select(Hotel::as_select())
            .first(c)
            .optional()
    })
    .await
    .context("Failed to fetch a hotel from the database.")?
    .ok_or(HotelError::NotFound(hotel_id))
}

/// Only the owner may change or remove a hotel.
fn authorize(user: &AuthenticatedUser, hotel: &Hotel) -> Result<(), HotelError> {
    if hotel.user_id == user.id() {
        Ok(())
    } else {
        Err(HotelError::Forbidden {
            user_id: user.id(),
            hotel_id: hotel.id,
        })
    }
}
