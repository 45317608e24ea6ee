//! Database seeding with fake students, teachers and notices.
//!
//! Seeded rows are marked (an email domain for people, a title prefix for
//! notices) so `clear-seed` removes them without touching real data.
//!
//! ```ignore
//! use scholaris_cli::seeder::{seed_all, SeedConfig};
//!
//! seed_all(&db, SeedConfig::default().with_students(500)).await?;
//! ```

pub mod models;
pub mod notices;
pub mod students;
pub mod teachers;

pub use models::SeedConfig;

use sqlx::PgPool;
use std::time::Instant;

pub async fn seed_all(db: &PgPool, config: SeedConfig) -> anyhow::Result<()> {
    let start_time = Instant::now();

    println!("🌱 Starting database seeding...");
    println!(
        "   - Students: {}, Teachers: {}, Notices: {}",
        config.students, config.teachers, config.notices
    );

    let students = students::seed_students(db, config.students).await?;
    let teachers = teachers::seed_teachers(db, config.teachers).await?;
    let notices = notices::seed_notices(db, config.notices).await?;

    println!(
        "\n✅ Seeding complete! Created {} students, {} teachers, {} notices in {:?}",
        students.len(),
        teachers,
        notices,
        start_time.elapsed()
    );

    Ok(())
}

/// Removes everything [`seed_all`] created. Fee ledgers of seeded students
/// go with them through the cascade.
pub async fn clear_all(db: &PgPool) -> anyhow::Result<()> {
    let start_time = Instant::now();
    println!("🗑️  Clearing seeded data...");

    students::clear_students(db).await?;
    teachers::clear_teachers(db).await?;
    notices::clear_notices(db).await?;

    println!("\n✅ Cleared seeded data in {:?}", start_time.elapsed());
    Ok(())
}
