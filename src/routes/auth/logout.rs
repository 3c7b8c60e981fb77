use crate::guards::AuthenticatedUser;
use crate::routes::auth::AccountError;
use crate::startup::HotelDbConn;
use anyhow::Context;
use diesel::prelude::*;
use rocket::serde::json::Json;
use serde_json::{json, Value};
use uuid::Uuid;

#[tracing::instrument(
    name = "Log a user out",
    skip(user, conn),
    fields(request_id = %Uuid::new_v4(), user_id = %user.id())
)]
#[post("/logout")]
pub async fn logout(user: AuthenticatedUser, conn: HotelDbConn) -> Result<Json<Value>, AccountError> {
    let token_id = user.token_id;
    conn.run(move |c| {
        use crate::schema::personal_access_tokens as tokens;
        diesel::delete(tokens::table.find(token_id)).execute(c)
    })
    .await
    .context("Failed to revoke the access token.")?;

    Ok(Json(json!({ "message": "Logged out." })))
}
