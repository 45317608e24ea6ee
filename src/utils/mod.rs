//! Utility modules for the Scholaris API.
//!
//! - [`email`]: Transactional email rendering and SMTP delivery
//! - [`multipart`]: Multipart body parsing and file uploads
//! - [`payment_gateway`]: Razorpay order creation and signature verification
//! - [`sql`]: Dynamic `WHERE` clauses for list endpoints

pub mod email;
pub mod multipart;
pub mod payment_gateway;
pub mod sql;
