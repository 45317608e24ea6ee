//! # Scholaris CLI
//!
//! Administrative commands for Scholaris: creating admin accounts and
//! seeding a development database.
//!
//! ## Usage
//!
//! ```ignore
//! use scholaris_cli::seeder::{seed_all, SeedConfig};
//!
//! let config = SeedConfig::default().with_students(200);
//! seed_all(&pool, config).await?;
//! ```

pub mod admin;
pub mod seeder;
