use crate::domain::ValidationErrors;
use crate::storage::{is_blank_upload, validate_photo, ImageKind};
use rocket::form;
use rocket::form::error::ErrorKind;
use rocket::fs::TempFile;

/// Extracts a usable upload from the `field` part of the form, recording why
/// it is unusable otherwise. An absent or untouched file input yields `None`
/// without errors.
pub async fn photo_upload<'r>(
    field: &'static str,
    photo: form::Result<'r, TempFile<'r>>,
    max_bytes: u64,
    errors: &mut ValidationErrors,
) -> Option<(TempFile<'r>, ImageKind)> {
    let file = match photo {
        Ok(file) if is_blank_upload(&file) => return None,
        Ok(file) => file,
        Err(form_errors) => {
            if form_errors.iter().all(|e| matches!(e.kind, ErrorKind::Missing)) {
                return None;
            }
            let too_large = form_errors
                .iter()
                .any(|e| matches!(e.kind, ErrorKind::InvalidLength { .. }));
            if too_large {
                errors.add(
                    field,
                    format!(
                        "The {} field must not be greater than {} kilobytes.",
                        field,
                        max_bytes / 1024
                    ),
                );
            } else {
                tracing::warn!(errors = %form_errors, "Failed to receive an uploaded file.");
                errors.add(field, format!("The {} field failed to upload.", field));
            }
            return None;
        }
    };
    let kind = validate_photo(field, &file, max_bytes, errors).await?;
    Some((file, kind))
}
