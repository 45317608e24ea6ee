//! Middleware modules for request processing.
//!
//! # Modules
//!
//! - [`auth`]: Credential lookup, the [`auth::CurrentAdmin`] extractor and the
//!   `require_auth` layer
//! - [`role`]: Role checks and the `require_admin` / `require_super_admin` layers
//!
//! # Authentication Flow
//!
//! 1. The client sends the `token` cookie set at login, or an
//!    `Authorization: Bearer <token>` header
//! 2. The JWT is verified and its subject re-resolved to an active admin
//! 3. Route layers check the admin's role where the route demands one
//! 4. Handlers receive the admin through [`auth::CurrentAdmin`]
//!
//! # Example
//!
//! ```ignore
//! use crate::middleware::auth::CurrentAdmin;
//!
//! async fn me(CurrentAdmin(admin): CurrentAdmin) -> impl IntoResponse {
//!     ApiResponse::ok(AdminPayload { admin })
//! }
//! ```

pub mod auth;
pub mod role;
