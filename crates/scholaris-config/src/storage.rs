use std::env;
use std::path::PathBuf;

use crate::{env_opt, env_parse};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StorageBackend {
    Local,
    Cloudinary,
}

#[derive(Clone, Debug)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Directory for the local backend
    pub upload_dir: PathBuf,
    /// Public base URL of the local upload directory
    pub public_url: String,
    pub max_upload_bytes: usize,
    pub cloudinary_cloud_name: Option<String>,
    pub cloudinary_api_key: Option<String>,
    pub cloudinary_api_secret: Option<String>,
    pub cloudinary_folder: Option<String>,
}

impl StorageConfig {
    pub fn from_env() -> Self {
        let backend = match env::var("STORAGE_BACKEND")
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase()
            .as_str()
        {
            "cloudinary" => StorageBackend::Cloudinary,
            _ => StorageBackend::Local,
        };

        Self {
            backend,
            upload_dir: PathBuf::from(
                env::var("UPLOAD_DIR").unwrap_or_else(|_| "./uploads".to_string()),
            ),
            public_url: env::var("PUBLIC_FILES_URL")
                .unwrap_or_else(|_| "http://localhost:5000/uploads".to_string()),
            max_upload_bytes: env_parse("MAX_UPLOAD_BYTES", 5 * 1024 * 1024),
            cloudinary_cloud_name: env_opt("CLOUDINARY_CLOUD_NAME"),
            cloudinary_api_key: env_opt("CLOUDINARY_API_KEY"),
            cloudinary_api_secret: env_opt("CLOUDINARY_API_SECRET"),
            cloudinary_folder: env_opt("CLOUDINARY_FOLDER"),
        }
    }

    /// Local storage rooted at `upload_dir`, used by tests and development.
    pub fn local(upload_dir: PathBuf, public_url: impl Into<String>) -> Self {
        Self {
            backend: StorageBackend::Local,
            upload_dir,
            public_url: public_url.into(),
            max_upload_bytes: 5 * 1024 * 1024,
            cloudinary_cloud_name: None,
            cloudinary_api_key: None,
            cloudinary_api_secret: None,
            cloudinary_folder: None,
        }
    }
}
