mod image;
mod public_disk;

pub use image::{is_blank_upload, validate_photo, ImageKind};
pub use public_disk::{PublicDisk, PUBLIC_MOUNT};
