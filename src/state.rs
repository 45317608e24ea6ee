use std::fmt;
use std::sync::Arc;

use anyhow::Context;
use sqlx::PgPool;

use scholaris_config::{
    CorsConfig, EmailConfig, JwtConfig, PaymentConfig, ServerConfig, StorageBackend,
    StorageConfig,
};
use scholaris_core::file_storage::{CloudinaryStorage, FileStorage, LocalFileStorage};

use crate::side_effects::{AppSideEffectHandler, SideEffects};

/// Every setting the server needs, loaded once at startup.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub jwt: JwtConfig,
    pub email: EmailConfig,
    pub payment: PaymentConfig,
    pub cors: CorsConfig,
    pub server: ServerConfig,
    pub storage: StorageConfig,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            jwt: JwtConfig::from_env(),
            email: EmailConfig::from_env(),
            payment: PaymentConfig::from_env(),
            cors: CorsConfig::from_env(),
            server: ServerConfig::from_env(),
            storage: StorageConfig::from_env(),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub jwt_config: JwtConfig,
    pub email_config: EmailConfig,
    pub payment_config: PaymentConfig,
    pub cors_config: CorsConfig,
    pub server_config: ServerConfig,
    pub storage_config: StorageConfig,
    pub storage: Arc<dyn FileStorage>,
    pub side_effects: SideEffects,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("server_config", &self.server_config)
            .field("storage_backend", &self.storage_config.backend)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Builds the storage gateway and starts the side-effect worker.
    ///
    /// Must be called inside a Tokio runtime.
    pub fn new(db: PgPool, config: AppConfig) -> anyhow::Result<Self> {
        let storage = build_file_storage(&config.storage)?;
        let side_effects = SideEffects::spawn(
            config.server.side_effect_queue_capacity,
            AppSideEffectHandler::new(db.clone(), config.email.clone()),
        );

        Ok(Self {
            db,
            jwt_config: config.jwt,
            email_config: config.email,
            payment_config: config.payment,
            cors_config: config.cors,
            server_config: config.server,
            storage_config: config.storage,
            storage,
            side_effects,
        })
    }
}

/// Constructs the configured storage backend.
///
/// Missing Cloudinary credentials fail here, at startup, rather than on the
/// first upload.
pub fn build_file_storage(config: &StorageConfig) -> anyhow::Result<Arc<dyn FileStorage>> {
    match config.backend {
        StorageBackend::Local => {
            std::fs::create_dir_all(&config.upload_dir).with_context(|| {
                format!(
                    "Failed to create upload directory {}",
                    config.upload_dir.display()
                )
            })?;

            Ok(Arc::new(LocalFileStorage::with_max_size(
                config.upload_dir.clone(),
                config.public_url.clone(),
                config.max_upload_bytes,
            )))
        }
        StorageBackend::Cloudinary => {
            let storage = CloudinaryStorage::new(
                config.cloudinary_cloud_name.clone().unwrap_or_default(),
                config.cloudinary_api_key.clone().unwrap_or_default(),
                config.cloudinary_api_secret.clone().unwrap_or_default(),
                config.cloudinary_folder.clone(),
                config.max_upload_bytes,
            )
            .context("Invalid Cloudinary configuration")?;

            Ok(Arc::new(storage))
        }
    }
}
