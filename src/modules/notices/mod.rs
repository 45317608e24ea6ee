pub mod controller;
pub mod model;
pub mod router;
pub mod service;

pub use model::*;
pub use router::{init_notices_admin_router, init_notices_public_router, init_notices_router};
