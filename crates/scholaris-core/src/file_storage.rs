//! File storage abstraction layer.
//!
//! Uploaded images and attachments (admission photos, teacher photos, gallery
//! images, notice attachments) go through the [`FileStorage`] trait so the
//! backend can be swapped without touching business logic.
//!
//! Two backends are provided:
//!
//! - [`LocalFileStorage`]: writes under a directory served by the API itself
//! - [`CloudinaryStorage`]: signed uploads to the Cloudinary REST API
//!
//! The backend is built once at startup and shared through application state.
//!
//! # Example
//!
//! ```ignore
//! use scholaris_core::file_storage::{FileStorage, LocalFileStorage};
//! use std::path::PathBuf;
//!
//! let storage = LocalFileStorage::new(
//!     PathBuf::from("./uploads"),
//!     "http://localhost:5000/uploads".to_string(),
//! );
//!
//! let stored = storage.save("gallery/abc.png", &bytes, "image/png").await?;
//! println!("{}", stored.url);
//! storage.delete(&stored.key).await?;
//! ```

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;

use serde::Deserialize;
use sha2::{Digest, Sha256};
use tokio::fs;

pub type StorageFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StorageError>> + Send + 'a>>;

pub const DEFAULT_MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

/// A file persisted by a storage backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    /// Backend-specific identifier used for deletion
    pub key: String,
    /// Public URL the file can be fetched from
    pub url: String,
}

/// Abstract trait for file storage backends.
pub trait FileStorage: Send + Sync {
    /// Save file content under `key`.
    ///
    /// # Arguments
    /// * `key` - Unique identifier for the file (e.g., "admissions/abc-123.png")
    /// * `content` - File bytes to store
    /// * `content_type` - MIME type reported by the client
    fn save<'a>(
        &'a self,
        key: &'a str,
        content: &'a [u8],
        content_type: &'a str,
    ) -> StorageFuture<'a, StoredObject>;

    /// Delete a file by key. Deleting a missing file is not an error.
    fn delete<'a>(&'a self, key: &'a str) -> StorageFuture<'a, ()>;

    /// Maximum accepted upload size in bytes.
    fn max_file_size(&self) -> usize {
        DEFAULT_MAX_FILE_SIZE
    }
}

/// Error type for file storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("File exceeds maximum size of {max_bytes} bytes")]
    InvalidFileSize { max_bytes: usize },

    #[error("MIME type '{received}' not allowed. Allowed types: {}", allowed.join(", "))]
    InvalidMimeType {
        received: String,
        allowed: Vec<String>,
    },

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend is misconfigured: {0}")]
    Configuration(String),

    #[error("Storage backend request failed: {0}")]
    Upstream(String),
}

impl From<reqwest::Error> for StorageError {
    fn from(e: reqwest::Error) -> Self {
        Self::Upstream(e.to_string())
    }
}

/// Checks an upload against a MIME prefix allow-list and a size limit.
///
/// `allowed` entries ending in `/` match a whole family (e.g. `"image/"`).
pub fn validate_upload(
    content_type: &str,
    size: usize,
    max_bytes: usize,
    allowed: &[&str],
) -> Result<(), StorageError> {
    if size > max_bytes {
        return Err(StorageError::InvalidFileSize { max_bytes });
    }

    let content_type = content_type.to_ascii_lowercase();
    let permitted = allowed.iter().any(|a| {
        if a.ends_with('/') {
            content_type.starts_with(a)
        } else {
            content_type == *a
        }
    });

    if !permitted {
        return Err(StorageError::InvalidMimeType {
            received: content_type,
            allowed: allowed.iter().map(|s| s.to_string()).collect(),
        });
    }

    Ok(())
}

/// Maps a MIME type to the file extension used in storage keys.
pub fn extension_for(content_type: &str) -> &'static str {
    match content_type.to_ascii_lowercase().as_str() {
        "image/png" => "png",
        "image/jpeg" | "image/jpg" => "jpg",
        "image/webp" => "webp",
        "image/gif" => "gif",
        "application/pdf" => "pdf",
        _ => "bin",
    }
}

/// Validate storage key format to prevent path traversal.
fn validate_key(key: &str) -> Result<(), StorageError> {
    if key.is_empty() || key.contains("..") || key.starts_with('/') || key.starts_with('\\') {
        return Err(StorageError::InvalidKey(
            "Key must not be empty, contain '..', or start with a separator".to_string(),
        ));
    }

    if !key
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_' || c == '/' || c == '.')
    {
        return Err(StorageError::InvalidKey(
            "Key contains invalid characters".to_string(),
        ));
    }

    Ok(())
}

// ============================================================================
// Local filesystem
// ============================================================================

/// Local filesystem-based file storage implementation.
#[derive(Clone)]
pub struct LocalFileStorage {
    /// Base directory where files are stored
    base_dir: PathBuf,
    /// Base URL for public file access (e.g., "http://localhost:5000/uploads")
    base_url: String,
    /// Maximum file size in bytes
    max_file_size: usize,
}

impl LocalFileStorage {
    pub fn new(base_dir: PathBuf, base_url: String) -> Self {
        Self::with_max_size(base_dir, base_url, DEFAULT_MAX_FILE_SIZE)
    }

    pub fn with_max_size(base_dir: PathBuf, base_url: String, max_file_size: usize) -> Self {
        Self {
            base_dir,
            base_url,
            max_file_size,
        }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    fn url_for(&self, key: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), key)
    }
}

impl FileStorage for LocalFileStorage {
    fn save<'a>(
        &'a self,
        key: &'a str,
        content: &'a [u8],
        _content_type: &'a str,
    ) -> StorageFuture<'a, StoredObject> {
        Box::pin(async move {
            validate_key(key)?;

            if content.len() > self.max_file_size {
                return Err(StorageError::InvalidFileSize {
                    max_bytes: self.max_file_size,
                });
            }

            let file_path = self.base_dir.join(key);
            if let Some(parent) = file_path.parent() {
                fs::create_dir_all(parent).await?;
            }
            fs::write(&file_path, content).await?;

            Ok(StoredObject {
                key: key.to_string(),
                url: self.url_for(key),
            })
        })
    }

    fn delete<'a>(&'a self, key: &'a str) -> StorageFuture<'a, ()> {
        Box::pin(async move {
            validate_key(key)?;

            match fs::remove_file(self.base_dir.join(key)).await {
                Ok(_) => Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(e.into()),
            }
        })
    }

    fn max_file_size(&self) -> usize {
        self.max_file_size
    }
}

// ============================================================================
// Cloudinary
// ============================================================================

const CLOUDINARY_API_BASE: &str = "https://api.cloudinary.com/v1_1";

/// Signed uploads to Cloudinary's upload API.
///
/// Keys map to Cloudinary public ids: the extension is dropped and the
/// configured folder is prefixed by Cloudinary itself.
#[derive(Clone)]
pub struct CloudinaryStorage {
    client: reqwest::Client,
    cloud_name: String,
    api_key: String,
    api_secret: String,
    folder: Option<String>,
    max_file_size: usize,
}

#[derive(Deserialize)]
struct CloudinaryUploadResponse {
    public_id: String,
    secure_url: String,
}

impl CloudinaryStorage {
    /// Builds the client, failing when any credential is blank.
    pub fn new(
        cloud_name: String,
        api_key: String,
        api_secret: String,
        folder: Option<String>,
        max_file_size: usize,
    ) -> Result<Self, StorageError> {
        for (name, value) in [
            ("cloud name", &cloud_name),
            ("api key", &api_key),
            ("api secret", &api_secret),
        ] {
            if value.trim().is_empty() {
                return Err(StorageError::Configuration(format!(
                    "Cloudinary {} is not set",
                    name
                )));
            }
        }

        Ok(Self {
            client: reqwest::Client::new(),
            cloud_name,
            api_key,
            api_secret,
            folder: folder.filter(|f| !f.trim().is_empty()),
            max_file_size,
        })
    }

    fn public_id_for(key: &str) -> String {
        match key.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem.to_string(),
            _ => key.to_string(),
        }
    }

    fn resource_type(content_type: &str) -> &'static str {
        if content_type.starts_with("image/") {
            "image"
        } else {
            "raw"
        }
    }

    /// Cloudinary request signature: the alphabetically sorted
    /// `name=value` pairs joined by `&`, followed by the API secret, hashed.
    fn sign(&self, params: &mut [(&str, String)]) -> String {
        params.sort_by(|a, b| a.0.cmp(b.0));
        let joined = params
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");

        let mut hasher = Sha256::new();
        hasher.update(joined.as_bytes());
        hasher.update(self.api_secret.as_bytes());
        hex::encode(hasher.finalize())
    }
}

impl FileStorage for CloudinaryStorage {
    fn save<'a>(
        &'a self,
        key: &'a str,
        content: &'a [u8],
        content_type: &'a str,
    ) -> StorageFuture<'a, StoredObject> {
        Box::pin(async move {
            validate_key(key)?;

            if content.len() > self.max_file_size {
                return Err(StorageError::InvalidFileSize {
                    max_bytes: self.max_file_size,
                });
            }

            let timestamp = chrono::Utc::now().timestamp().to_string();
            let public_id = Self::public_id_for(key);

            let mut signed = vec![
                ("public_id", public_id.clone()),
                ("timestamp", timestamp.clone()),
            ];
            if let Some(folder) = &self.folder {
                signed.push(("folder", folder.clone()));
            }
            let signature = self.sign(&mut signed);

            let file_part = reqwest::multipart::Part::bytes(content.to_vec())
                .file_name(key.rsplit('/').next().unwrap_or(key).to_string())
                .mime_str(content_type)?;

            let mut form = reqwest::multipart::Form::new()
                .part("file", file_part)
                .text("api_key", self.api_key.clone())
                .text("signature", signature)
                .text("signature_algorithm", "sha256");
            for (name, value) in signed {
                form = form.text(name, value);
            }

            let url = format!(
                "{}/{}/{}/upload",
                CLOUDINARY_API_BASE,
                self.cloud_name,
                Self::resource_type(content_type)
            );

            let response = self.client.post(url).multipart(form).send().await?;
            if !response.status().is_success() {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                return Err(StorageError::Upstream(format!(
                    "upload returned {}: {}",
                    status, body
                )));
            }

            let uploaded: CloudinaryUploadResponse = response.json().await?;
            tracing::debug!(public_id = %uploaded.public_id, "Uploaded file to Cloudinary");

            Ok(StoredObject {
                key: uploaded.public_id,
                url: uploaded.secure_url,
            })
        })
    }

    fn delete<'a>(&'a self, key: &'a str) -> StorageFuture<'a, ()> {
        Box::pin(async move {
            let timestamp = chrono::Utc::now().timestamp().to_string();
            let mut signed = vec![
                ("public_id", key.to_string()),
                ("timestamp", timestamp),
            ];
            let signature = self.sign(&mut signed);

            let mut form: Vec<(String, String)> = signed
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect();
            form.push(("api_key".to_string(), self.api_key.clone()));
            form.push(("signature".to_string(), signature));
            form.push(("signature_algorithm".to_string(), "sha256".to_string()));

            let url = format!(
                "{}/{}/image/destroy",
                CLOUDINARY_API_BASE, self.cloud_name
            );
            let response = self.client.post(url).form(&form).send().await?;

            if !response.status().is_success() {
                return Err(StorageError::Upstream(format!(
                    "destroy returned {}",
                    response.status()
                )));
            }

            Ok(())
        })
    }

    fn max_file_size(&self) -> usize {
        self.max_file_size
    }
}
