use crate::configuration::StorageSettings;
use crate::domain::{NewHotel, ValidationErrors};
use crate::guards::AuthenticatedUser;
use crate::models::{Hotel, NewHotelRecord};
use crate::routes::hotels::{HotelError, HotelForm, HotelResource, HOTEL_PHOTO_DIRECTORY};
use crate::routes::photo_upload;
use crate::startup::HotelDbConn;
use crate::storage::PublicDisk;
use anyhow::Context;
use diesel::prelude::*;
use rocket::form::Form;
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;
use uuid::Uuid;

#[tracing::instrument(
    name = "Create a hotel",
    skip(form, user, conn, disk, storage),
    fields(request_id = %Uuid::new_v4(), user_id = %user.id())
)]
#[post("/hotels", data = "<form>")]
pub async fn create_hotel(
    form: Form<HotelForm<'_>>,
    user: AuthenticatedUser,
    conn: HotelDbConn,
    disk: &State<PublicDisk>,
    storage: &State<StorageSettings>,
) -> Result<(Status, Json<HotelResource>), HotelError> {
    let (fields, photo) = form.into_inner().split();

    let mut errors = ValidationErrors::new();
    let new_hotel = NewHotel::try_from(fields)
        .map_err(|e| errors.extend(e))
        .ok();
    let photo = photo_upload("photo", photo, storage.max_upload_bytes(), &mut errors).await;
    let new_hotel = match new_hotel {
        Some(new_hotel) if errors.is_empty() => new_hotel,
        _ => return Err(errors.into()),
    };

    let stored_photo = match photo {
        Some((mut file, kind)) => Some(
            disk.store(&mut file, HOTEL_PHOTO_DIRECTORY, kind)
                .await
                .context("Failed to store the hotel photo.")?,
        ),
        None => None,
    };

    let hotel = match insert_hotel(&conn, user.id(), new_hotel, stored_photo.clone()).await {
        Ok(hotel) => hotel,
        Err(e) => {
            if let Some(path) = &stored_photo {
                if let Err(cleanup) = disk.delete(path).await {
                    tracing::warn!(error.cause_chain = ?cleanup, "Failed to remove an orphaned photo.");
                }
            }
            return Err(e.into());
        }
    };

    Ok((Status::Created, Json(HotelResource::new(hotel, disk)?)))
}

#[tracing::instrument(
    name = "Saving new hotel details in the database",
    skip(conn, new_hotel)
)]
async fn insert_hotel(
    conn: &HotelDbConn,
    user_id: i64,
    new_hotel: NewHotel,
    photo: Option<String>,
) -> Result<Hotel, anyhow::Error> {
    use crate::schema::hotels;
    conn.run(move |c| {
        diesel::insert_into(hotels::table)
            .values(NewHotelRecord {
                user_id,
                name: &new_hotel.name,
                address: &new_hotel.address,
                email: new_hotel.email.as_ref().map(|e| e.as_ref()),
                phone: new_hotel.phone.as_deref(),
                price_cents: new_hotel.price.cents(),
                currency: &new_hotel.currency,
                photo: photo.as_deref(),
            })
            .returning(Hotel::as_returning())
            .get_result(c)
    })
    .await
    .context("Failed to insert a new hotel in the database.")
}
