//! # Scholaris Core
//!
//! Core types, errors, and utilities for the Scholaris API.
//!
//! This crate provides foundational types used throughout the application:
//!
//! - [`errors`]: Application error type with HTTP response conversion
//! - [`response`]: The `{ success, message?, ...payload }` response envelope
//! - [`pagination`]: Page/limit pagination for list endpoints
//! - [`password`]: Secure password hashing and verification
//! - [`serde`]: Custom serde helpers for query strings and form fields
//! - [`file_storage`]: Object storage abstraction (local filesystem, Cloudinary)
//!
//! # Example
//!
//! ```ignore
//! use scholaris_core::errors::AppError;
//! use scholaris_core::pagination::PaginationParams;
//!
//! let error = AppError::not_found(anyhow::anyhow!("Admission not found"));
//!
//! let params = PaginationParams::default();
//! assert_eq!(params.skip(), 0);
//! ```

pub mod errors;
pub mod file_storage;
pub mod pagination;
pub mod password;
pub mod response;
pub mod serde;

// Re-export commonly used types at crate root
pub use errors::AppError;
pub use pagination::{PageInfo, PaginationParams};
pub use password::{hash_password, verify_password};
pub use response::{ApiResponse, Empty, ErrorResponse, MessageResponse};
