use anyhow::anyhow;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use scholaris_core::{AppError, PageInfo};

use crate::utils::sql::Filters;

use super::model::{CreateTeacherDto, Teacher, TeacherFilterParams, TeacherList, UpdateTeacherDto};

const TEACHER_COLUMNS: &str = "id, employee_id, name, email, phone, subject, qualification, \
                               experience_years, designation, photo_url, joining_date, is_active, \
                               created_at, updated_at";

fn map_unique_violation(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e
        && db_err.is_unique_violation()
    {
        return AppError::conflict("A teacher with this employee ID or email already exists");
    }
    AppError::from(e)
}

pub struct TeacherService;

impl TeacherService {
    #[instrument(skip(db, dto), fields(employee_id = %dto.employee_id))]
    pub async fn create(
        db: &PgPool,
        dto: CreateTeacherDto,
        photo_url: Option<String>,
    ) -> Result<Teacher, AppError> {
        sqlx::query_as::<_, Teacher>(&format!(
            "INSERT INTO teachers (employee_id, name, email, phone, subject, qualification,
                                   experience_years, designation, photo_url, joining_date, is_active)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING {}",
            TEACHER_COLUMNS
        ))
        .bind(&dto.employee_id)
        .bind(&dto.name)
        .bind(&dto.email)
        .bind(&dto.phone)
        .bind(&dto.subject)
        .bind(&dto.qualification)
        .bind(dto.experience_years)
        .bind(&dto.designation)
        .bind(photo_url)
        .bind(dto.joining_date)
        .bind(dto.is_active)
        .fetch_one(db)
        .await
        .map_err(map_unique_violation)
    }

    /// Lists teachers ordered by name. Inactive teachers are only included
    /// when `include_inactive` is set.
    #[instrument(skip(db))]
    pub async fn list(
        db: &PgPool,
        filters: TeacherFilterParams,
        include_inactive: bool,
    ) -> Result<TeacherList, AppError> {
        let pagination = filters.pagination();
        let mut where_filters = Filters::new();
        if !include_inactive {
            where_filters.raw("is_active = TRUE");
        }
        if let Some(subject) = &filters.subject {
            where_filters.search(&["subject"], subject);
        }
        let where_clause = where_filters.where_clause();

        let count_query = format!("SELECT COUNT(*) FROM teachers{}", where_clause);
        let mut count_sql = sqlx::query_scalar::<_, i64>(&count_query);
        for param in where_filters.params() {
            count_sql = count_sql.bind(param);
        }
        let total = count_sql.fetch_one(db).await?;

        let data_query = format!(
            "SELECT {} FROM teachers{} ORDER BY name LIMIT {} OFFSET {}",
            TEACHER_COLUMNS,
            where_clause,
            pagination.limit(),
            pagination.skip()
        );
        let mut data_sql = sqlx::query_as::<_, Teacher>(&data_query);
        for param in where_filters.params() {
            data_sql = data_sql.bind(param);
        }
        let teachers = data_sql.fetch_all(db).await?;

        Ok(TeacherList {
            page_info: PageInfo::new(&pagination, teachers.len(), total),
            teachers,
        })
    }

    #[instrument(skip(db))]
    pub async fn get(db: &PgPool, id: Uuid, include_inactive: bool) -> Result<Teacher, AppError> {
        let teacher = sqlx::query_as::<_, Teacher>(&format!(
            "SELECT {} FROM teachers WHERE id = $1",
            TEACHER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(db)
        .await?
        .filter(|t| include_inactive || t.is_active);

        teacher.ok_or_else(|| AppError::not_found(anyhow!("Teacher not found")))
    }

    #[instrument(skip(db, dto))]
    pub async fn update(
        db: &PgPool,
        id: Uuid,
        dto: UpdateTeacherDto,
        photo_url: Option<String>,
    ) -> Result<Teacher, AppError> {
        sqlx::query_as::<_, Teacher>(&format!(
            "UPDATE teachers
             SET employee_id = COALESCE($1, employee_id),
                 name = COALESCE($2, name),
                 email = COALESCE($3, email),
                 phone = COALESCE($4, phone),
                 subject = COALESCE($5, subject),
                 qualification = COALESCE($6, qualification),
                 experience_years = COALESCE($7, experience_years),
                 designation = COALESCE($8, designation),
                 photo_url = COALESCE($9, photo_url),
                 joining_date = COALESCE($10, joining_date),
                 is_active = COALESCE($11, is_active),
                 updated_at = NOW()
             WHERE id = $12
             RETURNING {}",
            TEACHER_COLUMNS
        ))
        .bind(dto.employee_id)
        .bind(dto.name)
        .bind(dto.email)
        .bind(dto.phone)
        .bind(dto.subject)
        .bind(dto.qualification)
        .bind(dto.experience_years)
        .bind(dto.designation)
        .bind(photo_url)
        .bind(dto.joining_date)
        .bind(dto.is_active)
        .bind(id)
        .fetch_optional(db)
        .await
        .map_err(map_unique_violation)?
        .ok_or_else(|| AppError::not_found(anyhow!("Teacher not found")))
    }

    #[instrument(skip(db))]
    pub async fn delete(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM teachers WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Teacher not found")));
        }

        Ok(())
    }
}
