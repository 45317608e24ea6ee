pub mod admissions;
pub mod auth;
pub mod contacts;
pub mod content;
pub mod fees;
pub mod gallery;
pub mod health;
pub mod notices;
pub mod notifications;
pub mod students;
pub mod teachers;

pub use self::auth::model::LoginRequest;
pub use self::students::model::Student;
