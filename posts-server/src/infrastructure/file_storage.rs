use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{error, info};
use uuid::Uuid;

use crate::domain::error::DomainError;

/// Public path under which stored uploads are served.
pub const UPLOAD_URL_PREFIX: &str = "/uploads/";

pub fn upload_url(filename: &str) -> String {
    format!("{}{}", UPLOAD_URL_PREFIX, filename)
}

/// A file part received from a multipart request.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

#[async_trait]
pub trait FileStorage: Send + Sync {
    /// Persists the bytes and returns the generated file name.
    async fn store_file(&self, file: &UploadedFile) -> Result<String, DomainError>;
    /// Reads a previously stored file. Returns `None` for unknown or unsafe names.
    async fn load_file(&self, filename: &str) -> Result<Option<Vec<u8>>, DomainError>;
}

pub struct LocalFileStorage {
    root: PathBuf,
}

impl LocalFileStorage {
    pub async fn init(root: impl Into<PathBuf>) -> std::io::Result<Self> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;
        info!(upload_dir = %root.display(), "upload directory ready");
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl FileStorage for LocalFileStorage {
    async fn store_file(&self, file: &UploadedFile) -> Result<String, DomainError> {
        let filename = stored_file_name(file.file_name.as_deref());
        let path = self.root.join(&filename);
        tokio::fs::write(&path, &file.bytes).await.map_err(|e| {
            error!("failed to store upload {}: {}", path.display(), e);
            DomainError::Internal(format!("could not store file: {}", e))
        })?;

        info!(
            filename = %filename,
            size_bytes = file.bytes.len(),
            content_type = file.content_type.as_deref().unwrap_or("unknown"),
            "upload stored"
        );
        Ok(filename)
    }

    async fn load_file(&self, filename: &str) -> Result<Option<Vec<u8>>, DomainError> {
        if !is_plain_file_name(filename) {
            return Ok(None);
        }
        match tokio::fs::read(self.root.join(filename)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => {
                error!("failed to read upload {}: {}", filename, e);
                Err(DomainError::Internal(format!("could not read file: {}", e)))
            }
        }
    }
}

/// Random name that keeps the original extension when it is a plain
/// alphanumeric suffix.
pub fn stored_file_name(original: Option<&str>) -> String {
    let extension = original
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty() && ext.len() <= 10)
        .filter(|ext| ext.chars().all(|c| c.is_ascii_alphanumeric()));

    match extension {
        Some(ext) => format!("{}.{}", Uuid::new_v4(), ext),
        None => Uuid::new_v4().to_string(),
    }
}

pub fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

pub fn content_type_for(filename: &str) -> &'static str {
    let ext = filename.rsplit('.').next().map(|ext| ext.to_lowercase());
    match ext.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        Some("mp4") => "video/mp4",
        Some("webm") => "video/webm",
        Some("mov") => "video/quicktime",
        Some("mkv") => "video/x-matroska",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_names_keep_safe_extensions() {
        let name = stored_file_name(Some("Holiday.PNG"));
        assert!(name.ends_with(".png"));
        assert!(Uuid::parse_str(name.trim_end_matches(".png")).is_ok());

        let name = stored_file_name(Some("../../etc/passwd"));
        assert!(Uuid::parse_str(&name).is_ok());

        let name = stored_file_name(None);
        assert!(Uuid::parse_str(&name).is_ok());
    }

    #[test]
    fn rejects_traversal_names() {
        assert!(is_plain_file_name("0b1c.png"));
        assert!(!is_plain_file_name("../secret"));
        assert!(!is_plain_file_name("a/b.png"));
        assert!(!is_plain_file_name(".env"));
        assert!(!is_plain_file_name(""));
    }

    #[test]
    fn upload_urls_use_the_public_prefix() {
        assert_eq!(upload_url("abc.png"), "/uploads/abc.png");
    }

    #[test]
    fn guesses_media_content_types() {
        assert_eq!(content_type_for("a.JPG"), "image/jpeg");
        assert_eq!(content_type_for("a.mp4"), "video/mp4");
        assert_eq!(content_type_for("a"), "application/octet-stream");
    }

    #[tokio::test]
    async fn stores_and_loads_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalFileStorage::init(dir.path().join("uploads")).await.unwrap();
        let file = UploadedFile {
            file_name: Some("cat.gif".into()),
            content_type: Some("image/gif".into()),
            bytes: b"GIF89a".to_vec(),
        };

        let name = storage.store_file(&file).await.unwrap();
        assert!(name.ends_with(".gif"));
        assert!(storage.root().join(&name).exists());

        let loaded = storage.load_file(&name).await.unwrap();
        assert_eq!(loaded.as_deref(), Some(&b"GIF89a"[..]));
        assert!(storage.load_file("missing.gif").await.unwrap().is_none());
        assert!(storage.load_file("../cat.gif").await.unwrap().is_none());
    }
}
