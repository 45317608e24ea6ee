//! Multipart request bodies.
//!
//! Forms with file parts (admission photo, teacher photo, notice attachment,
//! gallery image) are read in one pass into text fields and files. The text
//! fields are then parsed into a typed DTO by `from_form` on the DTO.

use std::collections::HashMap;

use anyhow::anyhow;
use axum::extract::Multipart;
use uuid::Uuid;

use scholaris_core::AppError;
use scholaris_core::file_storage::{FileStorage, StoredObject, extension_for, validate_upload};
use scholaris_models::FormFields;

/// A file part of a multipart body.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: Option<String>,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Default)]
pub struct MultipartForm {
    pub fields: FormFields,
    files: HashMap<String, UploadedFile>,
}

impl MultipartForm {
    /// Removes and returns the file submitted under `name`.
    pub fn take_file(&mut self, name: &str) -> Option<UploadedFile> {
        self.files.remove(name)
    }
}

/// Reads every part of the body. Parts with a file name are files, the rest
/// are text fields. Empty file parts are ignored.
pub async fn read_multipart(mut multipart: Multipart) -> Result<MultipartForm, AppError> {
    let mut form = MultipartForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::bad_request(anyhow!("Invalid multipart body: {}", e)))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if field.file_name().is_some() {
            let file_name = field.file_name().map(str::to_string);
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::bad_request(anyhow!("Failed to read {}: {}", name, e)))?;

            if !bytes.is_empty() {
                form.files.insert(
                    name,
                    UploadedFile {
                        file_name,
                        content_type,
                        bytes: bytes.to_vec(),
                    },
                );
            }
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| AppError::bad_request(anyhow!("Failed to read {}: {}", name, e)))?;
            form.fields.insert(name, value);
        }
    }

    Ok(form)
}

/// Checks an uploaded file against the allow-list and the backend's size
/// limit without storing it.
pub fn check_upload(
    storage: &dyn FileStorage,
    file: &UploadedFile,
    allowed: &[&str],
) -> Result<(), AppError> {
    validate_upload(
        &file.content_type,
        file.bytes.len(),
        storage.max_file_size(),
        allowed,
    )
    .map_err(AppError::bad_request)
}

/// Validates and stores `file` under `<prefix>/<uuid>.<ext>`.
///
/// Invalid files are a 400. A failing backend is an upstream error and
/// aborts the calling operation.
pub async fn store_upload(
    storage: &dyn FileStorage,
    prefix: &str,
    file: &UploadedFile,
    allowed: &[&str],
) -> Result<StoredObject, AppError> {
    check_upload(storage, file, allowed)?;

    let key = format!(
        "{}/{}.{}",
        prefix,
        Uuid::new_v4(),
        extension_for(&file.content_type)
    );

    storage
        .save(&key, &file.bytes, &file.content_type)
        .await
        .map_err(|e| AppError::upstream(anyhow!("Failed to upload file: {}", e)))
}

pub const IMAGES: &[&str] = &["image/"];
pub const ATTACHMENTS: &[&str] = &["image/", "application/pdf"];

#[cfg(test)]
mod tests {
    use super::*;
    use scholaris_core::file_storage::LocalFileStorage;

    fn image(content_type: &str, len: usize) -> UploadedFile {
        UploadedFile {
            file_name: Some("photo.png".to_string()),
            content_type: content_type.to_string(),
            bytes: vec![0u8; len],
        }
    }

    #[tokio::test]
    async fn test_store_upload_uses_prefixed_key() {
        let dir = std::env::temp_dir().join(format!("scholaris-upload-{}", Uuid::new_v4()));
        let storage = LocalFileStorage::new(dir.clone(), "http://localhost/uploads".to_string());

        let stored = store_upload(&storage, "admissions", &image("image/png", 16), IMAGES)
            .await
            .unwrap();

        assert!(stored.key.starts_with("admissions/"));
        assert!(stored.key.ends_with(".png"));
        assert!(stored.url.starts_with("http://localhost/uploads/admissions/"));

        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn test_rejects_non_images() {
        let storage = LocalFileStorage::new(
            std::env::temp_dir(),
            "http://localhost/uploads".to_string(),
        );
        let err = check_upload(&storage, &image("text/plain", 4), IMAGES).unwrap_err();
        assert_eq!(err.status.as_u16(), 400);
        assert!(check_upload(&storage, &image("application/pdf", 4), ATTACHMENTS).is_ok());
    }

    #[test]
    fn test_rejects_oversized_files() {
        let storage = LocalFileStorage::with_max_size(
            std::env::temp_dir(),
            "http://localhost/uploads".to_string(),
            8,
        );
        let err = check_upload(&storage, &image("image/png", 9), IMAGES).unwrap_err();
        assert_eq!(err.status.as_u16(), 400);
    }
}
