use crate::guards::AuthenticatedUser;
use crate::models::Hotel;
use crate::routes::hotels::{find_hotel, HotelError, HotelResource};
use crate::startup::HotelDbConn;
use crate::storage::PublicDisk;
use anyhow::Context;
use diesel::prelude::*;
use rocket::serde::json::Json;
use rocket::State;
use uuid::Uuid;

#[tracing::instrument(
    name = "List the user's hotels",
    skip(user, conn, disk),
    fields(request_id = %Uuid::new_v4(), user_id = %user.id())
)]
#[get("/hotels")]
pub async fn list_hotels(
    user: AuthenticatedUser,
    conn: HotelDbConn,
    disk: &State<PublicDisk>,
) -> Result<Json<Vec<HotelResource>>, HotelError> {
    let user_id = user.id();
    let hotels = conn
        .run(move |c| hotels_owned_by(c, user_id))
        .await
        .context("Failed to fetch the user's hotels from the database.")?;
    let resources = hotels
        .into_iter()
        .map(|hotel| HotelResource::new(hotel, disk))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(resources))
}

#[tracing::instrument(
    name = "Show a hotel",
    skip(user, conn, disk),
    fields(request_id = %Uuid::new_v4(), user_id = %user.id())
)]
#[get("/hotels/<hotel_id>")]
pub async fn show_hotel(
    hotel_id: i64,
    user: AuthenticatedUser,
    conn: HotelDbConn,
    disk: &State<PublicDisk>,
) -> Result<Json<HotelResource>, HotelError> {
    let hotel = find_hotel(&conn, hotel_id).await?;
    Ok(Json(HotelResource::new(hotel, disk)?))
}

fn hotels_owned_by(conn: &mut PgConnection, user_id: i64) -> QueryResult<Vec<Hotel>> {
    use crate::schema::hotels;
    hotels::table
        .filter(hotels::user_id.eq(user_id))
        .order(hotels::id.asc())
        .select(Hotel::as_select())
        .load(conn)
}
