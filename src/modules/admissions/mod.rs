pub mod controller;
pub mod model;
pub mod router;
pub mod service;

pub use model::*;
pub use router::{init_admissions_admin_router, init_admissions_public_router, init_admissions_router};
