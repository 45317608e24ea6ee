//! Admin account models and authentication DTOs.
//!
//! Re-exported from the `scholaris-models` crate.

pub use scholaris_models::admins::*;
