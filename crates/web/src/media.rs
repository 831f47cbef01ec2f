use std::path::{Path, PathBuf};

use storage::services::image::DecodedImage;
use thiserror::Error;
use uuid::Uuid;

const AVATAR_DIR: &str = "avatars";

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("Failed to write media file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not a stored avatar: {0}")]
    ForeignUrl(String),
}

/// Uploaded files on local disk, exposed under `base_url`
#[derive(Debug, Clone)]
pub struct MediaStorage {
    root: PathBuf,
    base_url: String,
}

impl MediaStorage {
    pub fn new(root: impl Into<PathBuf>, base_url: &str) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write an avatar under a fresh name and return its public URL
    pub async fn save_avatar(&self, image: &DecodedImage) -> Result<String, MediaError> {
        let dir = self.root.join(AVATAR_DIR);
        tokio::fs::create_dir_all(&dir).await?;

        let file_name = format!("{}.{}", Uuid::new_v4(), image.format.extension());
        tokio::fs::write(dir.join(&file_name), &image.bytes).await?;

        tracing::debug!("Stored avatar {}", file_name);

        Ok(format!("{}/{}/{}", self.base_url, AVATAR_DIR, file_name))
    }

    /// Delete an avatar by the URL `save_avatar` returned for it
    pub async fn remove_avatar(&self, url: &str) -> Result<(), MediaError> {
        let prefix = format!("{}/{}/", self.base_url, AVATAR_DIR);
        let file_name = url
            .strip_prefix(&prefix)
            .filter(|name| !name.is_empty() && !name.contains(['/', '\\']) && *name != "..")
            .ok_or_else(|| MediaError::ForeignUrl(url.to_string()))?;

        tokio::fs::remove_file(self.root.join(AVATAR_DIR).join(file_name)).await?;
        tracing::debug!("Removed avatar {}", file_name);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::services::image::ImageFormat;

    #[tokio::test]
    async fn test_avatar_is_written_under_media_root() {
        let root = std::env::temp_dir().join(format!("media-{}", Uuid::new_v4()));
        let media = MediaStorage::new(&root, "/media/");
        let image = DecodedImage {
            format: ImageFormat::Png,
            bytes: vec![0x89, b'P', b'N', b'G'],
        };

        let url = media.save_avatar(&image).await.unwrap();
        assert!(url.starts_with("/media/avatars/"));
        assert!(url.ends_with(".png"));

        let file_name = url.rsplit('/').next().unwrap();
        let stored = tokio::fs::read(root.join(AVATAR_DIR).join(file_name))
            .await
            .unwrap();
        assert_eq!(stored, image.bytes);

        tokio::fs::remove_dir_all(&root).await.unwrap();
    }

    #[tokio::test]
    async fn test_removed_avatar_leaves_no_file() {
        let root = std::env::temp_dir().join(format!("media-{}", Uuid::new_v4()));
        let media = MediaStorage::new(&root, "/media");
        let image = DecodedImage {
            format: ImageFormat::Jpeg,
            bytes: vec![0xFF, 0xD8, 0xFF],
        };

        let url = media.save_avatar(&image).await.unwrap();
        media.remove_avatar(&url).await.unwrap();

        let mut entries = tokio::fs::read_dir(root.join(AVATAR_DIR)).await.unwrap();
        assert!(entries.next_entry().await.unwrap().is_none());

        tokio::fs::remove_dir_all(&root).await.unwrap();
    }

    #[tokio::test]
    async fn test_urls_outside_avatar_dir_are_refused() {
        let media = MediaStorage::new(std::env::temp_dir(), "/media");

        for url in ["/static/avatars/a.png", "/media/avatars/../secret", "/media/avatars/"] {
            assert!(matches!(
                media.remove_avatar(url).await,
                Err(MediaError::ForeignUrl(_))
            ));
        }
    }
}
