use crate::storage::ImageKind;
use anyhow::{anyhow, Context};
use rand::distributions::Alphanumeric;
use rand::Rng;
use rocket::fs::TempFile;
use rocket::http::uri::Absolute;
use rocket::tokio::fs;
use std::path::{Component, Path, PathBuf};

const FILE_NAME_LENGTH: usize = 40;

/// Mount point of the public directory in the HTTP namespace.
pub const PUBLIC_MOUNT: &str = "/storage";

/// Disk location whose contents are served publicly under `/storage`.
///
/// Database rows keep the path relative to `root`; [`PublicDisk::url`] turns
/// it into an absolute URL at read time.
pub struct PublicDisk {
    root: PathBuf,
    base_url: String,
}

impl PublicDisk {
    pub fn new(root: impl Into<PathBuf>, base_url: &str) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Moves an upload into `directory` under a random name and returns the
    /// stored relative path.
    #[tracing::instrument(name = "Store uploaded file", skip(self, file))]
    pub async fn store(
        &self,
        file: &mut TempFile<'_>,
        directory: &str,
        kind: ImageKind,
    ) -> Result<String, anyhow::Error> {
        let relative = format!("{}/{}.{}", directory, random_file_name(), kind.extension());
        let destination = self.path(&relative)?;
        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
        file.move_copy_to(&destination)
            .await
            .with_context(|| format!("Failed to write {}", destination.display()))?;
        Ok(relative)
    }

    /// Removes a stored file. A file that is already gone is not an error.
    #[tracing::instrument(name = "Delete stored file", skip(self))]
    pub async fn delete(&self, relative: &str) -> Result<(), anyhow::Error> {
        if is_absolute_url(relative) {
            return Ok(());
        }
        let path = self.path(relative)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "Stored file was already missing.");
                Ok(())
            }
            Err(e) => Err(e).with_context(|| format!("Failed to delete {}", path.display())),
        }
    }

    /// Resolves a relative path below `root`, refusing anything that would
    /// escape it.
    pub fn path(&self, relative: &str) -> Result<PathBuf, anyhow::Error> {
        let relative_path = Path::new(relative);
        let is_contained = relative_path
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if relative.is_empty() || !is_contained {
            return Err(anyhow!("Refusing to access '{}' outside of the public disk.", relative));
        }
        Ok(self.root.join(relative_path))
    }

    /// Public URL of a stored value. Values that already are absolute URLs
    /// are returned unchanged.
    pub fn url(&self, stored: &str) -> String {
        if is_absolute_url(stored) {
            return stored.to_string();
        }
        format!(
            "{}{}/{}",
            self.base_url,
            PUBLIC_MOUNT,
            stored.trim_start_matches('/')
        )
    }
}

fn is_absolute_url(value: &str) -> bool {
    matches!(
        Absolute::parse(value),
        Ok(uri) if uri.scheme().eq_ignore_ascii_case("http") || uri.scheme().eq_ignore_ascii_case("https")
    )
}

fn random_file_name() -> String {
    let mut rng = rand::thread_rng();
    std::iter::repeat_with(|| rng.sample(Alphanumeric))
        .map(char::from)
        .take(FILE_NAME_LENGTH)
        .collect()
}
