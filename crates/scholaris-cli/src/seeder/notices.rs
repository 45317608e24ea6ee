use std::time::Instant;

use fake::Fake;
use fake::faker::lorem::en::{Paragraph, Sentence};
use rand::seq::SliceRandom;
use sqlx::PgPool;

use scholaris_models::{NoticeCategory, Priority};

use super::models::{NoticeSeed, SEED_NOTICE_PREFIX};

const CATEGORIES: [NoticeCategory; 6] = [
    NoticeCategory::General,
    NoticeCategory::Academic,
    NoticeCategory::Event,
    NoticeCategory::Holiday,
    NoticeCategory::Exam,
    NoticeCategory::Urgent,
];

const PRIORITIES: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

pub fn generate_notices(count: usize) -> Vec<NoticeSeed> {
    let mut rng = rand::thread_rng();

    (0..count)
        .map(|_| {
            let title: String = Sentence(3..7).fake();
            NoticeSeed {
                title: format!("{}{}", SEED_NOTICE_PREFIX, title.trim_end_matches('.')),
                content: Paragraph(2..5).fake(),
                category: *CATEGORIES.choose(&mut rng).unwrap_or(&NoticeCategory::General),
                priority: *PRIORITIES.choose(&mut rng).unwrap_or(&Priority::Medium),
            }
        })
        .collect()
}

pub async fn seed_notices(db: &PgPool, count: usize) -> anyhow::Result<u64> {
    let start_time = Instant::now();
    println!("📌 Seeding {} notices...", count);

    let mut inserted = 0;
    for notice in generate_notices(count) {
        let result = sqlx::query(
            "INSERT INTO notices (title, content, category, priority) VALUES ($1, $2, $3, $4)",
        )
        .bind(&notice.title)
        .bind(&notice.content)
        .bind(notice.category)
        .bind(notice.priority)
        .execute(db)
        .await?;
        inserted += result.rows_affected();
    }

    println!(
        "   ✓ Inserted {} notices in {:?}",
        inserted,
        start_time.elapsed()
    );

    Ok(inserted)
}

pub async fn clear_notices(db: &PgPool) -> anyhow::Result<u64> {
    let result = sqlx::query("DELETE FROM notices WHERE title LIKE $1 AND created_by IS NULL")
        .bind(format!("{}%", SEED_NOTICE_PREFIX))
        .execute(db)
        .await?;

    println!("   ✓ Removed {} notices", result.rows_affected());
    Ok(result.rows_affected())
}
