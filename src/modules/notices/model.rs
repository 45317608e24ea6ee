pub use scholaris_models::notices::*;
