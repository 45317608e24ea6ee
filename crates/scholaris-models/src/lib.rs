//! # Scholaris Models
//!
//! Domain models and DTOs for the Scholaris API.
//!
//! Database entities, request/response DTOs, multipart form parsing and the
//! closed vocabularies shared by every module of the application.
//!
//! # Modules
//!
//! - [`admins`]: Admin accounts and authentication DTOs
//! - [`admissions`]: Admission applications and the approval workflow
//! - [`fees`]: Fee ledgers, payments and money helpers
//! - [`students`]: Enrolled students
//! - [`notifications`]: Internal admin notifications
//! - [`numbers`]: Application, admission and receipt number generation
//! - [`form`]: Typed access to multipart text fields
//!
//! # Example
//!
//! ```ignore
//! use scholaris_models::fees::{FeeStructure, derive_status};
//! use scholaris_models::enums::FeeStatus;
//!
//! let structure = FeeStructure::parse(&serde_json::json!({ "tuition": 1000 }))?;
//! assert_eq!(structure.total(), 1000.0);
//! assert_eq!(derive_status(0.0, 1000.0), FeeStatus::Pending);
//! ```

pub mod address;
pub mod admins;
pub mod admissions;
pub mod contacts;
pub mod content;
pub mod enums;
pub mod fees;
pub mod form;
pub mod gallery;
pub mod ids;
pub mod notices;
pub mod notifications;
pub mod numbers;
pub mod students;
pub mod teachers;

// Re-export commonly used types at crate root for convenience
pub use address::Address;
pub use admins::{Admin, AdminPayload, LoginRequest, LoginResponse};
pub use admissions::{Admission, AdmissionSubmission, ApprovalOutcome};
pub use enums::{
    AdminRole, AdmissionPaymentStatus, AdmissionStatus, ContactStatus, FeeStatus,
    GalleryCategory, Gender, NoticeCategory, NotificationType, ParseEnumError, PaymentMode,
    Priority,
};
pub use fees::{Fee, FeeDetail, FeeStructure, Payment};
pub use form::{FormError, FormFields};
pub use ids::{AdminId, AdmissionId, FeeId, NotificationId, PaymentId, StudentId};
pub use notifications::{NewNotification, Notification};
pub use students::Student;
