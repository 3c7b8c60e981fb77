use crate::configuration::StorageSettings;
use crate::domain::{HotelChanges, ValidationErrors};
use crate::guards::AuthenticatedUser;
use crate::models::{Hotel, HotelChangeset};
use crate::routes::hotels::{
    authorize, find_hotel, HotelError, HotelForm, HotelResource, HOTEL_PHOTO_DIRECTORY,
};
use crate::routes::photo_upload;
use crate::startup::HotelDbConn;
use crate::storage::PublicDisk;
use anyhow::Context;
use chrono::Utc;
use diesel::prelude::*;
use rocket::form::Form;
use rocket::serde::json::Json;
use rocket::State;
use uuid::Uuid;

#[tracing::instrument(
    name = "Update a hotel",
    skip(form, user, conn, disk, storage),
    fields(request_id = %Uuid::new_v4(), user_id = %user.id())
)]
#[put("/hotels/<hotel_id>", data = "<form>")]
pub async fn update_hotel(
    hotel_id: i64,
    form: Form<HotelForm<'_>>,
    user: AuthenticatedUser,
    conn: HotelDbConn,
    disk: &State<PublicDisk>,
    storage: &State<StorageSettings>,
) -> Result<Json<HotelResource>, HotelError> {
    let hotel = find_hotel(&conn, hotel_id).await?;
    authorize(&user, &hotel)?;

    let (fields, photo) = form.into_inner().split();
    let mut errors = ValidationErrors::new();
    let changes = HotelChanges::try_from(fields)
        .map_err(|e| errors.extend(e))
        .ok();
    let photo = photo_upload("photo", photo, storage.max_upload_bytes(), &mut errors).await;
    let changes = match changes {
        Some(changes) if errors.is_empty() => changes,
        _ => return Err(errors.into()),
    };

    let new_photo = match photo {
        Some((mut file, kind)) => Some(
            disk.store(&mut file, HOTEL_PHOTO_DIRECTORY, kind)
                .await
                .context("Failed to store the hotel photo.")?,
        ),
        None => None,
    };

    let changeset = changeset(changes, new_photo.clone());
    let updated = match save_changes(&conn, hotel_id, changeset).await {
        Ok(updated) => updated,
        Err(e) => {
            if let Some(path) = &new_photo {
                if let Err(cleanup) = disk.delete(path).await {
                    tracing::warn!(error.cause_chain = ?cleanup, "Failed to remove an orphaned photo.");
                }
            }
            return Err(e.into());
        }
    };

    if let (Some(_), Some(previous)) = (&new_photo, &hotel.photo) {
        // The row already points at the new file; a leftover is harmless.
        if let Err(e) = disk.delete(previous).await {
            tracing::warn!(error.cause_chain = ?e, "Failed to delete the replaced photo.");
        }
    }

    Ok(Json(HotelResource::new(updated, disk)?))
}

fn changeset(changes: HotelChanges, photo: Option<String>) -> HotelChangeset {
    HotelChangeset {
        name: changes.name,
        address: changes.address,
        email: changes
            .email
            .map(|email| email.map(|e| e.as_ref().to_string())),
        phone: changes.phone,
        price_cents: changes.price.map(|price| price.cents()),
        currency: changes.currency,
        photo: photo.map(Some),
        updated_at: Utc::now(),
    }
}

#[tracing::instrument(name = "Saving hotel changes in the database", skip(conn, changeset))]
async fn save_changes(
    conn: &HotelDbConn,
    hotel_id: i64,
    changeset: HotelChangeset,
) -> Result<Hotel, anyhow::Error> {
    use crate::schema::hotels;
    conn.run(move |c| {
        diesel::update(hotels::table.find(hotel_id))
            .set(&changeset)
            .returning(Hotel::as_returning())
            .get_result(c)
    })
    .await
    .context("Failed to update a hotel in the database.")
}
