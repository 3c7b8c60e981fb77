use crate::guards::AuthenticatedUser;
use crate::routes::hotels::{authorize, find_hotel, HotelError};
use crate::startup::HotelDbConn;
use crate::storage::PublicDisk;
use anyhow::Context;
use diesel::prelude::*;
use rocket::serde::json::Json;
use rocket::State;
use serde_json::{json, Value};
use uuid::Uuid;

#[tracing::instrument(
    name = "Delete a hotel",
    skip(user, conn, disk),
    fields(request_id = %Uuid::new_v4(), user_id = %user.id())
)]
#[delete("/hotels/<hotel_id>")]
pub async fn delete_hotel(
    hotel_id: i64,
    user: AuthenticatedUser,
    conn: HotelDbConn,
    disk: &State<PublicDisk>,
) -> Result<Json<Value>, HotelError> {
    let hotel = find_hotel(&conn, hotel_id).await?;
    authorize(&user, &hotel)?;

    if let Some(photo) = &hotel.photo {
        // A photo that cannot be removed must not keep the row alive.
        if let Err(e) = disk.delete(photo).await {
            tracing::warn!(error.cause_chain = ?e, "Failed to delete the hotel photo.");
        }
    }

    conn.run(move |c| {
        use crate::schema::hotels;
        diesel::delete(hotels::table.find(hotel_id)).execute(c)
    })
    .await
    .context("Failed to delete a hotel from the database.")?;

    Ok(Json(json!({ "message": "Hotel deleted." })))
}
