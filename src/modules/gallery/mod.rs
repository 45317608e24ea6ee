pub mod controller;
pub mod model;
pub mod router;
pub mod service;

pub use model::*;
pub use router::{init_gallery_admin_router, init_gallery_public_router};
