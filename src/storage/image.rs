use crate::domain::ValidationErrors;
use rocket::fs::TempFile;
use rocket::http::ContentType;
use rocket::tokio::io::AsyncReadExt;

const SNIFF_LENGTH: u64 = 8;
const ALLOWED_TYPES: &str = "jpeg, png, jpg, gif";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Jpeg,
    Png,
    Gif,
}

impl ImageKind {
    /// Identifies an image by its leading bytes.
    pub fn sniff(header: &[u8]) -> Option<ImageKind> {
        if header.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Some(ImageKind::Jpeg)
        } else if header.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
            Some(ImageKind::Png)
        } else if header.starts_with(b"GIF87a") || header.starts_with(b"GIF89a") {
            Some(ImageKind::Gif)
        } else {
            None
        }
    }

    pub fn from_content_type(content_type: &ContentType) -> Option<ImageKind> {
        if !content_type.top().as_str().eq_ignore_ascii_case("image") {
            return None;
        }
        match content_type.sub().as_str().to_ascii_lowercase().as_str() {
            "jpeg" | "jpg" | "pjpeg" => Some(ImageKind::Jpeg),
            "png" => Some(ImageKind::Png),
            "gif" => Some(ImageKind::Gif),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ImageKind::Jpeg => "jpg",
            ImageKind::Png => "png",
            ImageKind::Gif => "gif",
        }
    }
}

/// An empty file part without a filename: the browser sent an untouched
/// file input.
pub fn is_blank_upload(file: &TempFile<'_>) -> bool {
    file.len() == 0 && file.name().is_none()
}

/// Checks an uploaded photo by size and content. Both the file signature and
/// the declared content type, when one is sent, must name an allowed kind.
#[tracing::instrument(name = "Validate uploaded photo", skip(file, errors))]
pub async fn validate_photo(
    field: &'static str,
    file: &TempFile<'_>,
    max_bytes: u64,
    errors: &mut ValidationErrors,
) -> Option<ImageKind> {
    if file.len() > max_bytes {
        errors.add(
            field,
            format!(
                "The {} field must not be greater than {} kilobytes.",
                field,
                max_bytes / 1024
            ),
        );
        return None;
    }

    let header = match read_header(file).await {
        Ok(header) => header,
        Err(e) => {
            tracing::warn!(error.cause_chain = ?e, "Failed to read uploaded file.");
            errors.add(field, format!("The {} field failed to upload.", field));
            return None;
        }
    };

    match classify(&header, file.content_type()) {
        Ok(kind) => Some(kind),
        Err(rejection) => {
            if rejection == Rejection::NotAnImage {
                errors.add(field, format!("The {} field must be an image.", field));
            }
            errors.add(
                field,
                format!("The {} field must be a file of type: {}.", field, ALLOWED_TYPES),
            );
            None
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Rejection {
    NotAnImage,
    WrongType,
}

fn classify(header: &[u8], declared: Option<&ContentType>) -> Result<ImageKind, Rejection> {
    let declared_kind = declared.map(ImageKind::from_content_type);
    match ImageKind::sniff(header) {
        Some(_) if matches!(declared_kind, Some(None)) => Err(Rejection::WrongType),
        Some(kind) => Ok(kind),
        None => {
            let other_image = declared
                .map(|ct| ct.top().as_str().eq_ignore_ascii_case("image"))
                .unwrap_or(false)
                && matches!(declared_kind, Some(None));
            if other_image {
                Err(Rejection::WrongType)
            } else {
                Err(Rejection::NotAnImage)
            }
        }
    }
}

async fn read_header(file: &TempFile<'_>) -> std::io::Result<Vec<u8>> {
    let reader = file.open().await?;
    rocket::tokio::pin!(reader);
    let mut header = Vec::with_capacity(SNIFF_LENGTH as usize);
    reader.take(SNIFF_LENGTH).read_to_end(&mut header).await?;
    Ok(header)
}
