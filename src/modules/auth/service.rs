use sqlx::PgPool;
use tracing::{info, instrument, warn};

use scholaris_auth::create_access_token;
use scholaris_config::JwtConfig;
use scholaris_core::{AppError, hash_password, verify_password};
use scholaris_models::{AdminId, AdminRole};

use crate::metrics::{track_jwt_issued, track_login_failure, track_login_success};

use super::model::{
    Admin, ChangePasswordDto, LoginRequest, LoginResponse, RegisterAdminDto, normalize_email,
};

/// Name of the HttpOnly cookie carrying the access token.
pub const AUTH_COOKIE: &str = "token";

const ADMIN_COLUMNS: &str =
    "id, name, email, password, role, is_active, last_login, created_at, updated_at";

pub struct AuthService;

impl AuthService {
    #[instrument(skip(db))]
    pub async fn find_admin(db: &PgPool, id: AdminId) -> Result<Option<Admin>, AppError> {
        let admin = sqlx::query_as::<_, Admin>(&format!(
            "SELECT {} FROM admins WHERE id = $1",
            ADMIN_COLUMNS
        ))
        .bind(id)
        .fetch_optional(db)
        .await?;

        Ok(admin)
    }

    /// Checks the credentials, stamps `last_login` and issues a token.
    #[instrument(skip(db, dto, jwt_config), fields(email = %dto.email))]
    pub async fn login(
        db: &PgPool,
        dto: LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<LoginResponse, AppError> {
        let email = normalize_email(&dto.email);

        let Some(admin) = sqlx::query_as::<_, Admin>(&format!(
            "SELECT {} FROM admins WHERE email = $1",
            ADMIN_COLUMNS
        ))
        .bind(&email)
        .fetch_optional(db)
        .await?
        else {
            track_login_failure("unknown_email");
            return Err(AppError::unauthorized("Invalid credentials"));
        };

        if !verify_password(&dto.password, &admin.password)? {
            track_login_failure("wrong_password");
            return Err(AppError::unauthorized("Invalid credentials"));
        }

        if !admin.is_active {
            warn!(admin_id = %admin.id, "Login attempt on deactivated account");
            track_login_failure("inactive");
            return Err(AppError::unauthorized("Account is deactivated"));
        }

        let admin = sqlx::query_as::<_, Admin>(&format!(
            "UPDATE admins SET last_login = NOW() WHERE id = $1 RETURNING {}",
            ADMIN_COLUMNS
        ))
        .bind(admin.id)
        .fetch_one(db)
        .await?;

        let token = create_access_token(
            admin.id.into(),
            &admin.email,
            admin.role.as_str(),
            jwt_config,
        )?;

        track_jwt_issued();
        track_login_success(admin.role.as_str());
        info!(admin_id = %admin.id, "Admin logged in");

        Ok(LoginResponse { token, admin })
    }

    #[instrument(skip(db, dto), fields(email = %dto.email))]
    pub async fn register(db: &PgPool, dto: RegisterAdminDto) -> Result<Admin, AppError> {
        let hashed_password = hash_password(&dto.password)?;
        let role = dto.role.unwrap_or(AdminRole::Admin);

        let admin = sqlx::query_as::<_, Admin>(&format!(
            "INSERT INTO admins (name, email, password, role)
             VALUES ($1, $2, $3, $4)
             RETURNING {}",
            ADMIN_COLUMNS
        ))
        .bind(dto.name.trim())
        .bind(normalize_email(&dto.email))
        .bind(&hashed_password)
        .bind(role)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e
                && db_err.is_unique_violation()
            {
                return AppError::conflict("An admin with this email already exists");
            }
            AppError::from(e)
        })?;

        info!(admin_id = %admin.id, role = %admin.role, "Admin registered");
        Ok(admin)
    }

    #[instrument(skip(db, admin, dto), fields(admin_id = %admin.id))]
    pub async fn change_password(
        db: &PgPool,
        admin: &Admin,
        dto: ChangePasswordDto,
    ) -> Result<(), AppError> {
        if !verify_password(&dto.current_password, &admin.password)? {
            return Err(AppError::validation("Current password is incorrect"));
        }

        let hashed_password = hash_password(&dto.new_password)?;

        sqlx::query("UPDATE admins SET password = $1, updated_at = NOW() WHERE id = $2")
            .bind(&hashed_password)
            .bind(admin.id)
            .execute(db)
            .await?;

        Ok(())
    }
}

/// `Set-Cookie` value carrying a freshly issued token.
pub fn auth_cookie(token: &str, max_age_secs: i64, secure: bool) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}{}",
        AUTH_COOKIE,
        token,
        max_age_secs.max(0),
        if secure { "; Secure" } else { "" }
    )
}

/// `Set-Cookie` value that expires the auth cookie.
pub fn clear_auth_cookie(secure: bool) -> String {
    auth_cookie("", 0, secure)
}
