pub use scholaris_models::contacts::*;
