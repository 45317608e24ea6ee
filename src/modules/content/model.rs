pub use scholaris_models::content::*;
