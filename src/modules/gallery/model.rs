pub use scholaris_models::gallery::*;
