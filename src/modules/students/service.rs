use anyhow::{Context, anyhow};
use sqlx::{PgConnection, PgPool};
use tracing::{instrument, warn};

use scholaris_core::{AppError, PageInfo};
use scholaris_models::StudentId;
use scholaris_models::numbers::{MAX_NUMBER_ATTEMPTS, admission_number, current_year};

use crate::utils::sql::Filters;

use super::model::{
    CreateStudentDto, NewStudent, Student, StudentFilterParams, StudentList, UpdateStudentDto,
};

pub(crate) const STUDENT_COLUMNS: &str = "id, admission_number, name, date_of_birth, gender, \
    blood_group, class_name, section, roll_number, father_name, mother_name, guardian_phone, \
    email, address_street, address_city, address_state, address_pincode, photo_url, \
    is_approved, is_active, academic_year, created_at, updated_at";

pub struct StudentService;

impl StudentService {
    /// Inserts a student under `admission_number`. Returns `None` when the
    /// number is already taken; any other failure is an error.
    ///
    /// Uses `ON CONFLICT DO NOTHING` so a collision does not abort an
    /// enclosing transaction.
    async fn try_insert(
        conn: &mut PgConnection,
        student: &NewStudent,
        admission_number: &str,
    ) -> Result<Option<Student>, sqlx::Error> {
        sqlx::query_as::<_, Student>(&format!(
            "INSERT INTO students (admission_number, name, date_of_birth, gender, blood_group,
                                   class_name, section, roll_number, father_name, mother_name,
                                   guardian_phone, email, address_street, address_city,
                                   address_state, address_pincode, photo_url, is_approved,
                                   is_active, academic_year)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16,
                     $17, $18, $19, $20)
             ON CONFLICT (admission_number) DO NOTHING
             RETURNING {}",
            STUDENT_COLUMNS
        ))
        .bind(admission_number)
        .bind(&student.name)
        .bind(student.date_of_birth)
        .bind(student.gender)
        .bind(&student.blood_group)
        .bind(&student.class_name)
        .bind(&student.section)
        .bind(&student.roll_number)
        .bind(&student.father_name)
        .bind(&student.mother_name)
        .bind(&student.guardian_phone)
        .bind(&student.email)
        .bind(&student.address.street)
        .bind(&student.address.city)
        .bind(&student.address.state)
        .bind(&student.address.pincode)
        .bind(&student.photo_url)
        .bind(student.is_approved)
        .bind(student.is_active)
        .bind(&student.academic_year)
        .fetch_optional(&mut *conn)
        .await
    }

    /// Inserts a student with a generated `ADM<year><5 digits>` number,
    /// drawing a fresh number on collision.
    #[instrument(skip(conn, student), fields(name = %student.name))]
    pub async fn insert_with_generated_number(
        conn: &mut PgConnection,
        student: &NewStudent,
    ) -> Result<Student, AppError> {
        for attempt in 1..=MAX_NUMBER_ATTEMPTS {
            let number = admission_number(current_year());
            if let Some(created) = Self::try_insert(conn, student, &number).await? {
                return Ok(created);
            }
            warn!(attempt, admission_number = %number, "Admission number collision, retrying");
        }

        Err(AppError::internal_error(
            "Could not allocate a unique admission number",
        ))
    }

    #[instrument(skip(db, dto))]
    pub async fn create(db: &PgPool, dto: CreateStudentDto) -> Result<Student, AppError> {
        let requested = dto.admission_number.clone();
        let student = dto.into_new_student();
        let mut conn = db
            .acquire()
            .await
            .context("Failed to acquire connection")?;

        match requested {
            Some(number) => Self::try_insert(&mut *conn, &student, number.trim())
                .await?
                .ok_or_else(|| {
                    AppError::conflict(format!("Admission number {} already exists", number.trim()))
                }),
            None => Self::insert_with_generated_number(&mut *conn, &student).await,
        }
    }

    #[instrument(skip(db))]
    pub async fn list(db: &PgPool, filters: StudentFilterParams) -> Result<StudentList, AppError> {
        let pagination = filters.pagination();
        let mut where_filters = Filters::new();
        if let Some(class_name) = &filters.class_name {
            where_filters.eq("class_name", class_name.as_str());
        }
        if let Some(section) = &filters.section {
            where_filters.eq("section", section.as_str());
        }
        if let Some(academic_year) = &filters.academic_year {
            where_filters.eq("academic_year", academic_year.as_str());
        }
        if let Some(is_active) = filters.is_active {
            where_filters.raw(if is_active {
                "is_active = TRUE"
            } else {
                "is_active = FALSE"
            });
        }
        if let Some(search) = &filters.search {
            where_filters.search(&["name", "admission_number"], search);
        }
        let where_clause = where_filters.where_clause();

        let count_query = format!("SELECT COUNT(*) FROM students{}", where_clause);
        let mut count_sql = sqlx::query_scalar::<_, i64>(&count_query);
        for param in where_filters.params() {
            count_sql = count_sql.bind(param);
        }
        let total = count_sql.fetch_one(db).await?;

        let data_query = format!(
            "SELECT {} FROM students{} ORDER BY class_name, section, roll_number, name LIMIT {} OFFSET {}",
            STUDENT_COLUMNS,
            where_clause,
            pagination.limit(),
            pagination.skip()
        );
        let mut data_sql = sqlx::query_as::<_, Student>(&data_query);
        for param in where_filters.params() {
            data_sql = data_sql.bind(param);
        }
        let students = data_sql.fetch_all(db).await?;

        Ok(StudentList {
            page_info: PageInfo::new(&pagination, students.len(), total),
            students,
        })
    }

    #[instrument(skip(db))]
    pub async fn get(db: &PgPool, id: StudentId) -> Result<Student, AppError> {
        sqlx::query_as::<_, Student>(&format!(
            "SELECT {} FROM students WHERE id = $1",
            STUDENT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Student not found")))
    }

    #[instrument(skip(db, dto))]
    pub async fn update(
        db: &PgPool,
        id: StudentId,
        dto: UpdateStudentDto,
    ) -> Result<Student, AppError> {
        let address = dto.address;

        sqlx::query_as::<_, Student>(&format!(
            "UPDATE students
             SET name = COALESCE($1, name),
                 date_of_birth = COALESCE($2, date_of_birth),
                 gender = COALESCE($3, gender),
                 blood_group = COALESCE($4, blood_group),
                 class_name = COALESCE($5, class_name),
                 section = COALESCE($6, section),
                 roll_number = COALESCE($7, roll_number),
                 father_name = COALESCE($8, father_name),
                 mother_name = COALESCE($9, mother_name),
                 guardian_phone = COALESCE($10, guardian_phone),
                 email = COALESCE($11, email),
                 address_street = COALESCE($12, address_street),
                 address_city = COALESCE($13, address_city),
                 address_state = COALESCE($14, address_state),
                 address_pincode = COALESCE($15, address_pincode),
                 photo_url = COALESCE($16, photo_url),
                 is_approved = COALESCE($17, is_approved),
                 is_active = COALESCE($18, is_active),
                 academic_year = COALESCE($19, academic_year),
                 updated_at = NOW()
             WHERE id = $20
             RETURNING {}",
            STUDENT_COLUMNS
        ))
        .bind(dto.name.map(|n| n.trim().to_string()))
        .bind(dto.date_of_birth)
        .bind(dto.gender)
        .bind(dto.blood_group)
        .bind(dto.class_name)
        .bind(dto.section)
        .bind(dto.roll_number)
        .bind(dto.father_name)
        .bind(dto.mother_name)
        .bind(dto.guardian_phone)
        .bind(dto.email.map(|e| e.trim().to_lowercase()))
        .bind(address.as_ref().map(|a| a.street.clone()))
        .bind(address.as_ref().map(|a| a.city.clone()))
        .bind(address.as_ref().map(|a| a.state.clone()))
        .bind(address.as_ref().map(|a| a.pincode.clone()))
        .bind(dto.photo_url)
        .bind(dto.is_approved)
        .bind(dto.is_active)
        .bind(dto.academic_year)
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Student not found")))
    }

    /// A student with fee records cannot be deleted; the payment ledger is kept intact.
    #[instrument(skip(db))]
    pub async fn delete(db: &PgPool, id: StudentId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM students WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e
                    && db_err.is_foreign_key_violation()
                {
                    return AppError::conflict("Student has fee records");
                }
                AppError::from(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Student not found")));
        }

        Ok(())
    }
}
