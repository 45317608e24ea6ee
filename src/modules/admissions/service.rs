use anyhow::anyhow;
use sqlx::PgPool;
use tracing::{info, instrument, warn};

use scholaris_config::EmailConfig;
use scholaris_core::{AppError, PageInfo};
use scholaris_models::numbers::{
    MAX_NUMBER_ATTEMPTS, application_number, current_year, default_academic_year,
};
use scholaris_models::students::NewStudent;
use scholaris_models::{
    Admin, AdmissionId, AdmissionStatus, NewNotification, NotificationType, Priority,
};

use crate::metrics::{track_admission_decided, track_admission_submitted};
use crate::modules::students::service::StudentService;
use crate::side_effects::SideEffects;
use crate::utils::email::OutboundEmail;
use crate::utils::sql::Filters;

use super::model::{
    Admission, AdmissionFilterParams, AdmissionList, AdmissionSubmission, ApprovalOutcome,
    ApproveAdmissionDto,
};

const ADMISSION_COLUMNS: &str = "id, application_number, student_name, date_of_birth, gender, \
    blood_group, class_applied, previous_school, father_name, father_occupation, father_phone, \
    father_email, mother_name, mother_occupation, mother_phone, mother_email, phone, email, \
    address_street, address_city, address_state, address_pincode, photo_url, status, remarks, \
    approved_by, approved_at, payment_status, academic_year, created_at, updated_at";

pub struct AdmissionService;

impl AdmissionService {
    /// Stores a public application under a fresh `DMPS<year><4 digits>`
    /// number, then queues the admin notification and the confirmation email.
    #[instrument(skip(db, side_effects, email_config, submission), fields(student = %submission.student_name))]
    pub async fn submit(
        db: &PgPool,
        side_effects: &SideEffects,
        email_config: &EmailConfig,
        submission: AdmissionSubmission,
        photo_url: Option<String>,
    ) -> Result<Admission, AppError> {
        let academic_year = submission
            .academic_year
            .clone()
            .unwrap_or_else(default_academic_year);

        let mut admission = None;
        for attempt in 1..=MAX_NUMBER_ATTEMPTS {
            let number = application_number(current_year());
            admission = sqlx::query_as::<_, Admission>(&format!(
                "INSERT INTO admissions (application_number, student_name, date_of_birth, gender,
                                         blood_group, class_applied, previous_school, father_name,
                                         father_occupation, father_phone, father_email, mother_name,
                                         mother_occupation, mother_phone, mother_email, phone, email,
                                         address_street, address_city, address_state,
                                         address_pincode, photo_url, academic_year)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16,
                         $17, $18, $19, $20, $21, $22, $23)
                 ON CONFLICT (application_number) DO NOTHING
                 RETURNING {}",
                ADMISSION_COLUMNS
            ))
            .bind(&number)
            .bind(&submission.student_name)
            .bind(submission.date_of_birth)
            .bind(submission.gender)
            .bind(&submission.blood_group)
            .bind(&submission.class_applied)
            .bind(&submission.previous_school)
            .bind(&submission.father_name)
            .bind(&submission.father_occupation)
            .bind(&submission.father_phone)
            .bind(&submission.father_email)
            .bind(&submission.mother_name)
            .bind(&submission.mother_occupation)
            .bind(&submission.mother_phone)
            .bind(&submission.mother_email)
            .bind(&submission.phone)
            .bind(&submission.email)
            .bind(&submission.address.street)
            .bind(&submission.address.city)
            .bind(&submission.address.state)
            .bind(&submission.address.pincode)
            .bind(&photo_url)
            .bind(&academic_year)
            .fetch_optional(db)
            .await?;

            if admission.is_some() {
                break;
            }
            warn!(attempt, application_number = %number, "Application number collision, retrying");
        }

        let admission = admission.ok_or_else(|| {
            AppError::internal_error("Could not allocate a unique application number")
        })?;

        info!(
            admission_id = %admission.id,
            application_number = %admission.application_number,
            "Admission submitted"
        );
        track_admission_submitted();

        side_effects.notify(
            NewNotification::new(
                NotificationType::Admission,
                "New admission application",
                format!(
                    "{} applied for class {} ({})",
                    admission.student_name, admission.class_applied, admission.application_number
                ),
            )
            .link(format!("/admin/admissions/{}", admission.id))
            .related(admission.id, "Admission")
            .priority(Priority::High),
        );

        if let Some(to) = submission.contact_email() {
            side_effects.email(OutboundEmail::admission_received(email_config, to, &admission));
        }

        Ok(admission)
    }

    #[instrument(skip(db))]
    pub async fn list(
        db: &PgPool,
        filters: AdmissionFilterParams,
    ) -> Result<AdmissionList, AppError> {
        let pagination = filters.pagination();
        let mut where_filters = Filters::new();
        if let Some(status) = filters.status {
            where_filters.eq("status", status.as_str());
        }
        if let Some(class_applied) = &filters.class_applied {
            where_filters.eq("class_applied", class_applied.as_str());
        }
        if let Some(academic_year) = &filters.academic_year {
            where_filters.eq("academic_year", academic_year.as_str());
        }
        let where_clause = where_filters.where_clause();

        let count_query = format!("SELECT COUNT(*) FROM admissions{}", where_clause);
        let mut count_sql = sqlx::query_scalar::<_, i64>(&count_query);
        for param in where_filters.params() {
            count_sql = count_sql.bind(param);
        }
        let total = count_sql.fetch_one(db).await?;

        let data_query = format!(
            "SELECT {} FROM admissions{} ORDER BY created_at DESC LIMIT {} OFFSET {}",
            ADMISSION_COLUMNS,
            where_clause,
            pagination.limit(),
            pagination.skip()
        );
        let mut data_sql = sqlx::query_as::<_, Admission>(&data_query);
        for param in where_filters.params() {
            data_sql = data_sql.bind(param);
        }
        let admissions = data_sql.fetch_all(db).await?;

        Ok(AdmissionList {
            page_info: PageInfo::new(&pagination, admissions.len(), total),
            admissions,
        })
    }

    #[instrument(skip(db))]
    pub async fn get(db: &PgPool, id: AdmissionId) -> Result<Admission, AppError> {
        sqlx::query_as::<_, Admission>(&format!(
            "SELECT {} FROM admissions WHERE id = $1",
            ADMISSION_COLUMNS
        ))
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Admission not found")))
    }

    /// Approves an admission and enrolls the applicant as a student.
    ///
    /// The admission row is locked for the whole transaction, so concurrent
    /// approvals of one admission create exactly one student. The approval
    /// email and notification are queued only after commit.
    #[instrument(skip(db, side_effects, email_config, admin, dto), fields(admin_id = %admin.id))]
    pub async fn approve(
        db: &PgPool,
        side_effects: &SideEffects,
        email_config: &EmailConfig,
        id: AdmissionId,
        admin: &Admin,
        dto: ApproveAdmissionDto,
    ) -> Result<ApprovalOutcome, AppError> {
        let mut tx = db.begin().await?;

        let current = sqlx::query_as::<_, Admission>(&format!(
            "SELECT {} FROM admissions WHERE id = $1 FOR UPDATE",
            ADMISSION_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Admission not found")))?;

        if current.status == AdmissionStatus::Approved {
            return Err(AppError::conflict("Admission already approved"));
        }

        let new_student = NewStudent::from_admission(&current, dto.section, dto.roll_number);
        let student =
            StudentService::insert_with_generated_number(&mut *tx, &new_student).await?;

        let admission = sqlx::query_as::<_, Admission>(&format!(
            "UPDATE admissions
             SET status = $1, approved_by = $2, approved_at = NOW(),
                 remarks = COALESCE($3, remarks), updated_at = NOW()
             WHERE id = $4
             RETURNING {}",
            ADMISSION_COLUMNS
        ))
        .bind(AdmissionStatus::Approved)
        .bind(admin.id)
        .bind(dto.remarks)
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(
            admission_id = %admission.id,
            student_id = %student.id,
            admission_number = %student.admission_number,
            "Admission approved"
        );
        track_admission_decided(AdmissionStatus::Approved.as_str());

        if let Some(to) = student.email.as_deref() {
            side_effects.email(OutboundEmail::admission_approved(email_config, to, &student));
        }
        side_effects.notify(
            NewNotification::new(
                NotificationType::Admission,
                "Admission approved",
                format!(
                    "{} was admitted to class {} as {}",
                    student.name, student.class_name, student.admission_number
                ),
            )
            .link(format!("/admin/students/{}", student.id))
            .related(student.id, "Student")
            .priority(Priority::High),
        );

        Ok(ApprovalOutcome { student, admission })
    }

    /// Moves a not-yet-approved admission to `rejected` or `on_hold`.
    #[instrument(skip(db, admin, remarks), fields(admin_id = %admin.id))]
    pub async fn decide(
        db: &PgPool,
        id: AdmissionId,
        admin: &Admin,
        status: AdmissionStatus,
        remarks: Option<String>,
    ) -> Result<Admission, AppError> {
        let mut tx = db.begin().await?;

        let current_status = sqlx::query_scalar::<_, AdmissionStatus>(
            "SELECT status FROM admissions WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Admission not found")))?;

        if current_status == AdmissionStatus::Approved {
            return Err(AppError::conflict(format!(
                "Cannot mark an approved admission as {}",
                status
            )));
        }

        let admission = sqlx::query_as::<_, Admission>(&format!(
            "UPDATE admissions
             SET status = $1, approved_by = $2, approved_at = NOW(),
                 remarks = COALESCE($3, remarks), updated_at = NOW()
             WHERE id = $4
             RETURNING {}",
            ADMISSION_COLUMNS
        ))
        .bind(status)
        .bind(admin.id)
        .bind(remarks)
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(admission_id = %admission.id, status = %status, "Admission decided");
        track_admission_decided(status.as_str());

        Ok(admission)
    }

    #[instrument(skip(db))]
    pub async fn delete(db: &PgPool, id: AdmissionId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM admissions WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Admission not found")));
        }

        Ok(())
    }
}
