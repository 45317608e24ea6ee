//! # Scholaris Config
//!
//! Configuration types for the Scholaris API.
//!
//! Every structure is loaded from environment variables with sensible
//! development defaults:
//!
//! - [`cors`]: CORS (Cross-Origin Resource Sharing) configuration
//! - [`database`]: PostgreSQL connection settings
//! - [`email`]: Email/SMTP configuration
//! - [`jwt`]: JWT authentication configuration
//! - [`payment`]: Razorpay payment gateway credentials
//! - [`server`]: Listener addresses, cookie and background queue settings
//! - [`storage`]: File storage backend selection (local or Cloudinary)
//!
//! # Example
//!
//! ```ignore
//! use scholaris_config::{JwtConfig, CorsConfig, EmailConfig, PaymentConfig};
//!
//! let jwt_config = JwtConfig::from_env();
//! let cors_config = CorsConfig::from_env();
//! let email_config = EmailConfig::from_env();
//! let payment_config = PaymentConfig::from_env();
//! ```

pub mod cors;
pub mod database;
pub mod email;
pub mod jwt;
pub mod payment;
pub mod server;
pub mod storage;

// Re-export commonly used types at crate root
pub use cors::CorsConfig;
pub use database::DatabaseConfig;
pub use email::EmailConfig;
pub use jwt::JwtConfig;
pub use payment::PaymentConfig;
pub use server::ServerConfig;
pub use storage::{StorageBackend, StorageConfig};

/// Reads a boolean flag, accepting `true`/`1` (case-insensitive).
pub(crate) fn env_flag(name: &str, default: bool) -> bool {
    std::env::var(name)
        .map(|v| parse_flag(&v))
        .unwrap_or(default)
}

/// Reads and parses a variable, falling back to `default` when unset or invalid.
pub(crate) fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

/// Reads a variable, treating blank values as unset.
pub(crate) fn env_opt(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_flag(value: &str) -> bool {
    let value = value.trim();
    value.eq_ignore_ascii_case("true") || value == "1"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("true"));
        assert!(parse_flag("TRUE"));
        assert!(parse_flag(" 1 "));
        assert!(!parse_flag("false"));
        assert!(!parse_flag("yes"));
        assert!(!parse_flag(""));
    }
}
