//! # Scholaris Auth
//!
//! Authentication types and JWT utilities for the Scholaris API.
//!
//! - [`claims`]: JWT claim structure carried by admin access tokens
//! - [`jwt`]: Token creation and verification utilities
//!
//! # Example
//!
//! ```ignore
//! use scholaris_auth::{create_access_token, verify_token};
//! use scholaris_config::JwtConfig;
//!
//! let config = JwtConfig::from_env();
//! let token = create_access_token(admin_id, "admin@school.edu", "admin", &config)?;
//! let claims = verify_token(&token, &config)?;
//! println!("Admin ID: {}", claims.sub);
//! ```

pub mod claims;
pub mod jwt;

// Re-export commonly used types at crate root
pub use claims::Claims;
pub use jwt::{create_access_token, verify_token};
