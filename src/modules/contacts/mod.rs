pub mod controller;
pub mod model;
pub mod router;
pub mod service;

pub use model::*;
pub use router::{init_contacts_admin_router, init_contacts_public_router, init_contacts_router};
