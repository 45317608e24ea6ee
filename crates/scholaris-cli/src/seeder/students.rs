//! Student seeding.
//!
//! Seeded students are approved and carry admission numbers in the same
//! format the approval flow generates.

use std::collections::HashSet;
use std::time::Instant;

use chrono::NaiveDate;
use fake::Fake;
use fake::faker::address::en::{BuildingNumber, CityName, StateName, StreetName, ZipCode};
use fake::faker::name::en::{FirstName, LastName};
use fake::faker::phone_number::en::CellNumber;
use rand::Rng;
use rand::seq::SliceRandom;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use scholaris_models::Gender;
use scholaris_models::numbers::{admission_number, current_year, default_academic_year};

use super::models::{CLASSES, SECTIONS, SEED_EMAIL_DOMAIN, StudentSeed};

const BATCH_SIZE: usize = 500;
const COLUMNS_PER_ROW: usize = 16;

pub fn generate_students(count: usize) -> Vec<StudentSeed> {
    let mut rng = rand::thread_rng();
    let year = current_year();
    let academic_year = default_academic_year();
    let mut numbers = HashSet::with_capacity(count);

    (0..count)
        .map(|i| {
            let mut number = admission_number(year);
            while !numbers.insert(number.clone()) {
                number = admission_number(year);
            }

            let first_name: String = FirstName().fake();
            let surname: String = LastName().fake();
            let father_first: String = FirstName().fake();
            let mother_first: String = FirstName().fake();
            let building: String = BuildingNumber().fake();
            let street: String = StreetName().fake();

            let gender = match rng.gen_range(0..2) {
                0 => Gender::Male,
                _ => Gender::Female,
            };
            let date_of_birth = NaiveDate::from_ymd_opt(
                rng.gen_range(year - 18..=year - 4),
                rng.gen_range(1..=12),
                rng.gen_range(1..=28),
            )
            .unwrap_or_default();

            StudentSeed {
                email: format!(
                    "{}.{}.{}@{}",
                    first_name.to_lowercase(),
                    surname.to_lowercase(),
                    i,
                    SEED_EMAIL_DOMAIN
                ),
                name: format!("{} {}", first_name, surname),
                admission_number: number,
                date_of_birth,
                gender,
                class_name: CLASSES.choose(&mut rng).unwrap_or(&"1").to_string(),
                section: SECTIONS.choose(&mut rng).unwrap_or(&"A").to_string(),
                roll_number: (i % 40 + 1).to_string(),
                father_name: format!("{} {}", father_first, surname),
                mother_name: format!("{} {}", mother_first, surname),
                guardian_phone: CellNumber().fake(),
                street: format!("{} {}", building, street),
                city: CityName().fake(),
                state: StateName().fake(),
                pincode: ZipCode().fake(),
                academic_year: academic_year.clone(),
            }
        })
        .collect()
}

pub async fn seed_students(db: &PgPool, count: usize) -> anyhow::Result<Vec<Uuid>> {
    let start_time = Instant::now();
    println!("🎒 Seeding {} students...", count);

    let students = generate_students(count);

    let mut tx = db.begin().await?;
    let mut ids = Vec::with_capacity(students.len());
    for chunk in students.chunks(BATCH_SIZE) {
        ids.extend(insert_students_chunk(&mut tx, chunk).await?);
    }
    tx.commit().await?;

    println!(
        "   ✓ Inserted {} students in {:?}",
        ids.len(),
        start_time.elapsed()
    );

    Ok(ids)
}

async fn insert_students_chunk(
    tx: &mut Transaction<'_, Postgres>,
    students: &[StudentSeed],
) -> anyhow::Result<Vec<Uuid>> {
    if students.is_empty() {
        return Ok(Vec::new());
    }

    let mut query = String::from(
        "INSERT INTO students (admission_number, name, date_of_birth, gender, class_name, \
         section, roll_number, father_name, mother_name, guardian_phone, email, \
         address_street, address_city, address_state, address_pincode, academic_year, \
         is_approved) VALUES ",
    );

    for i in 0..students.len() {
        if i > 0 {
            query.push_str(", ");
        }
        let base = i * COLUMNS_PER_ROW;
        let placeholders = (1..=COLUMNS_PER_ROW)
            .map(|n| format!("${}", base + n))
            .collect::<Vec<_>>()
            .join(", ");
        query.push_str(&format!("({}, TRUE)", placeholders));
    }

    // A clash with an existing admission number skips that row.
    query.push_str(" ON CONFLICT (admission_number) DO NOTHING RETURNING id");

    let mut q = sqlx::query_scalar::<_, Uuid>(&query);
    for student in students {
        q = q
            .bind(&student.admission_number)
            .bind(&student.name)
            .bind(student.date_of_birth)
            .bind(student.gender)
            .bind(&student.class_name)
            .bind(&student.section)
            .bind(&student.roll_number)
            .bind(&student.father_name)
            .bind(&student.mother_name)
            .bind(&student.guardian_phone)
            .bind(&student.email)
            .bind(&student.street)
            .bind(&student.city)
            .bind(&student.state)
            .bind(&student.pincode)
            .bind(&student.academic_year);
    }

    Ok(q.fetch_all(&mut **tx).await?)
}

pub async fn clear_students(db: &PgPool) -> anyhow::Result<u64> {
    // Students with fee records keep their ledger and are left in place.
    let result = sqlx::query(
        "DELETE FROM students s WHERE s.email LIKE $1 \
         AND NOT EXISTS (SELECT 1 FROM fees f WHERE f.student_id = s.id)",
    )
    .bind(format!("%@{}", SEED_EMAIL_DOMAIN))
    .execute(db)
    .await?;

    println!("   ✓ Removed {} students", result.rows_affected());
    Ok(result.rows_affected())
}
