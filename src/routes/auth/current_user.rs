use crate::configuration::StorageSettings;
use crate::domain::ValidationErrors;
use crate::guards::AuthenticatedUser;
use crate::models::User;
use crate::routes::auth::{AccountError, UserResource, USER_PHOTO_DIRECTORY};
use crate::routes::photo_upload;
use crate::startup::HotelDbConn;
use crate::storage::PublicDisk;
use anyhow::Context;
use chrono::Utc;
use diesel::prelude::*;
use rocket::form::{self, Form};
use rocket::fs::TempFile;
use rocket::serde::json::Json;
use rocket::State;
use serde_json::{json, Value};
use uuid::Uuid;

#[tracing::instrument(
    name = "Fetch the current user",
    skip(user, disk),
    fields(request_id = %Uuid::new_v4(), user_id = %user.id())
)]
#[get("/user")]
pub async fn current_user(user: AuthenticatedUser, disk: &State<PublicDisk>) -> Json<UserResource> {
    Json(UserResource::new(user.user, disk))
}

#[derive(FromForm)]
pub struct PhotoForm<'r> {
    pub photo: form::Result<'r, TempFile<'r>>,
}

#[tracing::instrument(
    name = "Upload a profile photo",
    skip(form, user, conn, disk, storage),
    fields(request_id = %Uuid::new_v4(), user_id = %user.id())
)]
#[post("/upload-photo", data = "<form>")]
pub async fn upload_photo(
    form: Form<PhotoForm<'_>>,
    user: AuthenticatedUser,
    conn: HotelDbConn,
    disk: &State<PublicDisk>,
    storage: &State<StorageSettings>,
) -> Result<Json<Value>, AccountError> {
    let mut errors = ValidationErrors::new();
    let upload = photo_upload(
        "photo",
        form.into_inner().photo,
        storage.max_upload_bytes(),
        &mut errors,
    )
    .await;
    let (mut file, kind) = match upload {
        Some(upload) => upload,
        None if errors.is_empty() => {
            return Err(ValidationErrors::single("photo", "The photo field is required.").into())
        }
        None => return Err(errors.into()),
    };

    let path = disk
        .store(&mut file, USER_PHOTO_DIRECTORY, kind)
        .await
        .context("Failed to store the profile photo.")?;

    let user_id = user.id();
    let stored = path.clone();
    let updated = conn
        .run(move |c| {
            use crate::schema::users;
            diesel::update(users::table.find(user_id))
                .set((users::photo.eq(Some(stored)), users::updated_at.eq(Utc::now())))
                .returning(User::as_returning())
                .get_result(c)
        })
        .await
        .context("Failed to save the profile photo path.");
    let updated = match updated {
        Ok(updated) => updated,
        Err(e) => {
            if let Err(cleanup) = disk.delete(&path).await {
                tracing::warn!(error.cause_chain = ?cleanup, "Failed to remove an orphaned photo.");
            }
            return Err(e.into());
        }
    };

    if let Some(previous) = &user.user.photo {
        if let Err(e) = disk.delete(previous).await {
            tracing::warn!(error.cause_chain = ?e, "Failed to delete the replaced photo.");
        }
    }

    Ok(Json(json!({
        "message": "Photo uploaded.",
        "user": UserResource::new(updated, disk),
    })))
}
