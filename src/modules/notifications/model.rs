pub use scholaris_models::notifications::*;
