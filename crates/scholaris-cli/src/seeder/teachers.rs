use std::time::Instant;

use chrono::{Duration, Utc};
use fake::Fake;
use fake::faker::name::en::{FirstName, LastName};
use fake::faker::phone_number::en::CellNumber;
use rand::Rng;
use rand::seq::SliceRandom;
use sqlx::PgPool;
use uuid::Uuid;

use super::models::{SEED_EMAIL_DOMAIN, SUBJECTS, TeacherSeed};

const QUALIFICATIONS: [&str; 4] = ["B.Ed", "M.Sc, B.Ed", "M.A, B.Ed", "Ph.D"];

pub fn generate_teachers(count: usize) -> Vec<TeacherSeed> {
    let mut rng = rand::thread_rng();
    let run = Uuid::new_v4().simple().to_string();

    (0..count)
        .map(|i| {
            let first_name: String = FirstName().fake();
            let last_name: String = LastName().fake();
            let experience_years = rng.gen_range(0..=30);

            TeacherSeed {
                employee_id: format!("EMP-{}-{:04}", &run[..6], i + 1),
                email: format!(
                    "{}.{}.{}@{}",
                    first_name.to_lowercase(),
                    last_name.to_lowercase(),
                    &run[..6],
                    SEED_EMAIL_DOMAIN
                )
                .replace(' ', ""),
                name: format!("{} {}", first_name, last_name),
                phone: CellNumber().fake(),
                subject: SUBJECTS.choose(&mut rng).unwrap_or(&"English").to_string(),
                qualification: QUALIFICATIONS
                    .choose(&mut rng)
                    .unwrap_or(&"B.Ed")
                    .to_string(),
                experience_years,
                joining_date: (Utc::now() - Duration::days(365 * i64::from(experience_years)))
                    .date_naive(),
            }
        })
        .collect()
}

pub async fn seed_teachers(db: &PgPool, count: usize) -> anyhow::Result<u64> {
    let start_time = Instant::now();
    println!("🧑‍🏫 Seeding {} teachers...", count);

    let mut inserted = 0;
    for teacher in generate_teachers(count) {
        // Two fake names can collide on email; skip the duplicate.
        let result = sqlx::query(
            "INSERT INTO teachers (employee_id, name, email, phone, subject, qualification,
                                   experience_years, joining_date)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             ON CONFLICT DO NOTHING",
        )
        .bind(&teacher.employee_id)
        .bind(&teacher.name)
        .bind(&teacher.email)
        .bind(&teacher.phone)
        .bind(&teacher.subject)
        .bind(&teacher.qualification)
        .bind(teacher.experience_years)
        .bind(teacher.joining_date)
        .execute(db)
        .await?;
        inserted += result.rows_affected();
    }

    println!(
        "   ✓ Inserted {} teachers in {:?}",
        inserted,
        start_time.elapsed()
    );

    Ok(inserted)
}

pub async fn clear_teachers(db: &PgPool) -> anyhow::Result<u64> {
    let result = sqlx::query("DELETE FROM teachers WHERE email LIKE $1")
        .bind(format!("%@{}", SEED_EMAIL_DOMAIN))
        .execute(db)
        .await?;

    println!("   ✓ Removed {} teachers", result.rows_affected());
    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_employee_ids_are_distinct() {
        let teachers = generate_teachers(20);
        let mut ids: Vec<_> = teachers.iter().map(|t| t.employee_id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 20);
        assert!(teachers.iter().all(|t| (0..=30).contains(&t.experience_years)));
    }
}
