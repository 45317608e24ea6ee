use anyhow::anyhow;
use sqlx::PgPool;
use tracing::{info, instrument};
use uuid::Uuid;

use scholaris_core::{AppError, PageInfo};
use scholaris_models::{ContactStatus, NewNotification, NotificationType, Priority};

use crate::side_effects::SideEffects;
use crate::utils::sql::Filters;

use super::model::{Contact, ContactFilterParams, ContactList, CreateContactDto};

const CONTACT_COLUMNS: &str =
    "id, name, email, phone, subject, message, status, created_at, updated_at";

pub struct ContactService;

impl ContactService {
    /// Stores an enquiry from the public site and queues a notification for
    /// the admins.
    #[instrument(skip(db, side_effects, dto), fields(email = %dto.email))]
    pub async fn create(
        db: &PgPool,
        side_effects: &SideEffects,
        dto: CreateContactDto,
    ) -> Result<Contact, AppError> {
        let contact = sqlx::query_as::<_, Contact>(&format!(
            "INSERT INTO contacts (name, email, phone, subject, message)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {}",
            CONTACT_COLUMNS
        ))
        .bind(dto.name.trim())
        .bind(dto.email.trim().to_lowercase())
        .bind(dto.phone.as_deref().map(str::trim))
        .bind(dto.subject.trim())
        .bind(&dto.message)
        .fetch_one(db)
        .await?;

        info!(contact_id = %contact.id, "Contact message received");

        side_effects.notify(
            NewNotification::new(
                NotificationType::Contact,
                "New contact message",
                format!("{} sent a message: {}", contact.name, contact.subject),
            )
            .link(format!("/admin/contacts/{}", contact.id))
            .related(contact.id, "Contact")
            .priority(Priority::Medium),
        );

        Ok(contact)
    }

    #[instrument(skip(db))]
    pub async fn list(db: &PgPool, filters: ContactFilterParams) -> Result<ContactList, AppError> {
        let pagination = filters.pagination();
        let mut where_filters = Filters::new();
        if let Some(status) = filters.status {
            where_filters.eq("status", status.as_str());
        }
        let where_clause = where_filters.where_clause();

        let count_query = format!("SELECT COUNT(*) FROM contacts{}", where_clause);
        let mut count_sql = sqlx::query_scalar::<_, i64>(&count_query);
        for param in where_filters.params() {
            count_sql = count_sql.bind(param);
        }
        let total = count_sql.fetch_one(db).await?;

        let data_query = format!(
            "SELECT {} FROM contacts{} ORDER BY created_at DESC LIMIT {} OFFSET {}",
            CONTACT_COLUMNS,
            where_clause,
            pagination.limit(),
            pagination.skip()
        );
        let mut data_sql = sqlx::query_as::<_, Contact>(&data_query);
        for param in where_filters.params() {
            data_sql = data_sql.bind(param);
        }
        let contacts = data_sql.fetch_all(db).await?;

        Ok(ContactList {
            page_info: PageInfo::new(&pagination, contacts.len(), total),
            contacts,
        })
    }

    #[instrument(skip(db))]
    pub async fn get(db: &PgPool, id: Uuid) -> Result<Contact, AppError> {
        sqlx::query_as::<_, Contact>(&format!(
            "SELECT {} FROM contacts WHERE id = $1",
            CONTACT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Contact not found")))
    }

    #[instrument(skip(db))]
    pub async fn update_status(
        db: &PgPool,
        id: Uuid,
        status: ContactStatus,
    ) -> Result<Contact, AppError> {
        sqlx::query_as::<_, Contact>(&format!(
            "UPDATE contacts SET status = $1, updated_at = NOW() WHERE id = $2 RETURNING {}",
            CONTACT_COLUMNS
        ))
        .bind(status)
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Contact not found")))
    }

    #[instrument(skip(db))]
    pub async fn delete(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM contacts WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Contact not found")));
        }

        Ok(())
    }
}
