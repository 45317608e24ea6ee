pub use scholaris_models::admissions::*;
