pub use scholaris_models::fees::*;
