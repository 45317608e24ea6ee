pub mod controller;
pub mod model;
pub mod router;
pub mod service;

pub use model::*;
pub use router::{init_auth_router, init_auth_session_router, init_auth_super_admin_router};
