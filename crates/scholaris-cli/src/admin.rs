use anyhow::{Context, bail};
use sqlx::PgPool;
use uuid::Uuid;

use scholaris_core::hash_password;
use scholaris_models::AdminRole;

pub struct NewAdmin {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: AdminRole,
}

/// Inserts an admin account. The email is trimmed and lowercased the same
/// way the login endpoint normalizes it.
pub async fn create_admin(db: &PgPool, admin: NewAdmin) -> anyhow::Result<Uuid> {
    let name = admin.name.trim();
    let email = admin.email.trim().to_lowercase();

    if name.is_empty() {
        bail!("Name is required");
    }
    if !email.contains('@') {
        bail!("A valid email is required");
    }
    if admin.password.len() < 8 {
        bail!("Password must be at least 8 characters");
    }

    let hashed = hash_password(&admin.password).map_err(|e| e.error)?;

    let id = sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO admins (name, email, password, role)
         VALUES ($1, $2, $3, $4)
         ON CONFLICT (email) DO NOTHING
         RETURNING id",
    )
    .bind(name)
    .bind(&email)
    .bind(&hashed)
    .bind(admin.role)
    .fetch_optional(db)
    .await
    .context("Failed to insert admin")?;

    match id {
        Some(id) => Ok(id),
        None => bail!("An admin with email {} already exists", email),
    }
}
