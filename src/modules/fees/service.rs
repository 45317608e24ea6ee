use std::collections::HashMap;

use anyhow::anyhow;
use chrono::Utc;
use sqlx::PgPool;
use sqlx::types::Json;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use scholaris_config::{EmailConfig, PaymentConfig};
use scholaris_core::{AppError, PageInfo};
use scholaris_models::numbers::{MAX_NUMBER_ATTEMPTS, current_year, receipt_number};
use scholaris_models::{
    Admin, FeeId, NewNotification, NotificationType, PaymentMode, Priority, StudentId,
};

use crate::metrics::{
    track_fee_record_created, track_payment_recorded, track_payment_verification_failure,
};
use crate::side_effects::SideEffects;
use crate::utils::email::OutboundEmail;
use crate::utils::payment_gateway::{GatewayError, RazorpayClient, key_secret, verify_signature};
use crate::utils::sql::Filters;

use super::model::{
    CreateFeeDto, Fee, FeeDetail, FeeFilterParams, FeeList, FeeStructure, ManualPaymentDto,
    NewPayment, Payment, PaymentOrder, PaymentReceipt, StudentFees, VerifyPaymentDto,
    round_money, to_paise,
};

const FEE_COLUMNS: &str = "id, student_id, class_name, academic_year, fee_structure, total_amount, \
                           paid_amount, pending_amount, status, due_date, created_at, updated_at";

const FEE_DETAIL_SELECT: &str = "SELECT f.id, f.student_id, f.class_name, f.academic_year, \
    f.fee_structure, f.total_amount, f.paid_amount, f.pending_amount, f.status, f.due_date, \
    f.created_at, f.updated_at, s.name AS student_name, \
    s.admission_number AS student_admission_number, s.section AS student_section, \
    s.roll_number AS student_roll_number, s.email AS student_email \
    FROM fees f JOIN students s ON s.id = f.student_id";

const PAYMENT_COLUMNS: &str = "id, fee_id, amount, payment_date, payment_mode, transaction_id, \
                               razorpay_order_id, razorpay_payment_id, receipt_number, remarks, \
                               recorded_by, created_at";

fn gateway_error(e: GatewayError) -> AppError {
    match e {
        GatewayError::NotConfigured(name) => AppError::configuration(format!(
            "Payment gateway is not configured: {} is not set",
            name
        )),
        other => AppError::upstream(other),
    }
}

pub struct FeeService;

impl FeeService {
    /// Creates a fee record for a student. Class and academic year are copied
    /// from the student; the record always starts `pending`.
    #[instrument(skip(db, dto), fields(student_id = %dto.student_id))]
    pub async fn create(db: &PgPool, dto: CreateFeeDto) -> Result<FeeDetail, AppError> {
        let structure = FeeStructure::parse(&dto.fee_structure)
            .map_err(|e| AppError::validation(e.to_string()))?;
        let total = structure.total();

        let (class_name, academic_year) = sqlx::query_as::<_, (String, String)>(
            "SELECT class_name, academic_year FROM students WHERE id = $1",
        )
        .bind(dto.student_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Student not found")))?;

        let fee = sqlx::query_as::<_, Fee>(&format!(
            "INSERT INTO fees (student_id, class_name, academic_year, fee_structure,
                               total_amount, paid_amount, pending_amount, status, due_date)
             VALUES ($1, $2, $3, $4, $5, 0, $5, 'pending', $6)
             RETURNING {}",
            FEE_COLUMNS
        ))
        .bind(dto.student_id)
        .bind(&class_name)
        .bind(&academic_year)
        .bind(Json(structure))
        .bind(total)
        .bind(dto.due_date)
        .fetch_one(db)
        .await?;

        info!(fee_id = %fee.id, total_amount = fee.total_amount, "Fee record created");
        track_fee_record_created();

        Self::get(db, fee.id).await
    }

    async fn attach_payments(db: &PgPool, fees: &mut [FeeDetail]) -> Result<(), AppError> {
        if fees.is_empty() {
            return Ok(());
        }

        let ids: Vec<FeeId> = fees.iter().map(|f| f.fee.id).collect();
        let payments = sqlx::query_as::<_, Payment>(&format!(
            "SELECT {} FROM fee_payments WHERE fee_id = ANY($1) ORDER BY payment_date, created_at",
            PAYMENT_COLUMNS
        ))
        .bind(&ids)
        .fetch_all(db)
        .await?;

        let mut by_fee: HashMap<FeeId, Vec<Payment>> = HashMap::new();
        for payment in payments {
            by_fee.entry(payment.fee_id).or_default().push(payment);
        }
        for fee in fees.iter_mut() {
            fee.payments = by_fee.remove(&fee.fee.id).unwrap_or_default();
        }

        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn list(db: &PgPool, filters: FeeFilterParams) -> Result<FeeList, AppError> {
        let pagination = filters.pagination();
        let mut where_filters = Filters::new();
        if let Some(student_id) = filters.student_id {
            where_filters.eq_cast("f.student_id", student_id.to_string(), "uuid");
        }
        if let Some(admission_number) = &filters.admission_number {
            where_filters.eq("s.admission_number", admission_number.as_str());
        }
        if let Some(status) = filters.status {
            where_filters.eq("f.status", status.as_str());
        }
        if let Some(academic_year) = &filters.academic_year {
            where_filters.eq("f.academic_year", academic_year.as_str());
        }
        let where_clause = where_filters.where_clause();

        let count_query = format!(
            "SELECT COUNT(*) FROM fees f JOIN students s ON s.id = f.student_id{}",
            where_clause
        );
        let mut count_sql = sqlx::query_scalar::<_, i64>(&count_query);
        for param in where_filters.params() {
            count_sql = count_sql.bind(param);
        }
        let total = count_sql.fetch_one(db).await?;

        let data_query = format!(
            "{}{} ORDER BY f.created_at DESC LIMIT {} OFFSET {}",
            FEE_DETAIL_SELECT,
            where_clause,
            pagination.limit(),
            pagination.skip()
        );
        let mut data_sql = sqlx::query_as::<_, FeeDetail>(&data_query);
        for param in where_filters.params() {
            data_sql = data_sql.bind(param);
        }
        let mut fees = data_sql.fetch_all(db).await?;
        Self::attach_payments(db, &mut fees).await?;

        Ok(FeeList {
            page_info: PageInfo::new(&pagination, fees.len(), total),
            fees,
        })
    }

    /// A fee record with its student and payment history.
    #[instrument(skip(db))]
    pub async fn get(db: &PgPool, id: FeeId) -> Result<FeeDetail, AppError> {
        let fee =
            sqlx::query_as::<_, FeeDetail>(&format!("{} WHERE f.id = $1", FEE_DETAIL_SELECT))
                .bind(id)
                .fetch_optional(db)
                .await?
                .ok_or_else(|| AppError::not_found(anyhow!("Fee record not found")))?;

        let mut fees = [fee];
        Self::attach_payments(db, &mut fees).await?;
        let [fee] = fees;

        Ok(fee)
    }

    #[instrument(skip(db))]
    pub async fn for_student(db: &PgPool, student_id: StudentId) -> Result<StudentFees, AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM students WHERE id = $1)",
        )
        .bind(student_id)
        .fetch_one(db)
        .await?;
        if !exists {
            return Err(AppError::not_found(anyhow!("Student not found")));
        }

        let mut fees = sqlx::query_as::<_, FeeDetail>(&format!(
            "{} WHERE f.student_id = $1 ORDER BY f.academic_year DESC, f.created_at DESC",
            FEE_DETAIL_SELECT
        ))
        .bind(student_id)
        .fetch_all(db)
        .await?;
        Self::attach_payments(db, &mut fees).await?;

        Ok(StudentFees {
            count: fees.len() as i64,
            fees,
        })
    }

    /// Appends a payment and updates the running totals in one transaction.
    ///
    /// The fee row is locked first, so concurrent payments on one record are
    /// applied one after another. Payments beyond the total are accepted.
    #[instrument(
        skip(db, side_effects, email_config, payment),
        fields(amount = payment.amount, mode = %payment.payment_mode)
    )]
    pub async fn record_payment(
        db: &PgPool,
        side_effects: &SideEffects,
        email_config: &EmailConfig,
        fee_id: FeeId,
        payment: NewPayment,
    ) -> Result<PaymentReceipt, AppError> {
        if !payment.amount.is_finite() || payment.amount <= 0.0 {
            return Err(AppError::validation("amount must be greater than 0"));
        }
        let amount = round_money(payment.amount);
        if !amount.is_finite() {
            return Err(AppError::validation("amount is too large"));
        }

        let mut tx = db.begin().await?;

        let mut fee = sqlx::query_as::<_, Fee>(&format!(
            "SELECT {} FROM fees WHERE id = $1 FOR UPDATE",
            FEE_COLUMNS
        ))
        .bind(fee_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Fee record not found")))?;

        let mut recorded = None;
        for attempt in 1..=MAX_NUMBER_ATTEMPTS {
            let number = receipt_number(current_year());
            recorded = sqlx::query_as::<_, Payment>(&format!(
                "INSERT INTO fee_payments (fee_id, amount, payment_mode, transaction_id,
                                           razorpay_order_id, razorpay_payment_id,
                                           receipt_number, remarks, recorded_by)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                 ON CONFLICT (receipt_number) DO NOTHING
                 RETURNING {}",
                PAYMENT_COLUMNS
            ))
            .bind(fee_id)
            .bind(amount)
            .bind(payment.payment_mode)
            .bind(&payment.transaction_id)
            .bind(&payment.razorpay_order_id)
            .bind(&payment.razorpay_payment_id)
            .bind(&number)
            .bind(&payment.remarks)
            .bind(payment.recorded_by)
            .fetch_optional(&mut *tx)
            .await?;

            if recorded.is_some() {
                break;
            }
            warn!(attempt, receipt_number = %number, "Receipt number collision, retrying");
        }
        let recorded = recorded
            .ok_or_else(|| AppError::internal_error("Could not allocate a unique receipt number"))?;

        fee.apply_payment(amount);
        if !fee.paid_amount.is_finite() {
            return Err(AppError::validation("amount is too large"));
        }
        if fee.is_overpaid() {
            warn!(
                fee_id = %fee.id,
                total_amount = fee.total_amount,
                paid_amount = fee.paid_amount,
                "Fee overpaid"
            );
        }

        sqlx::query(
            "UPDATE fees
             SET paid_amount = $1, pending_amount = $2, status = $3, updated_at = NOW()
             WHERE id = $4",
        )
        .bind(fee.paid_amount)
        .bind(fee.pending_amount)
        .bind(fee.status)
        .bind(fee_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(
            fee_id = %fee_id,
            receipt_number = %recorded.receipt_number,
            status = %fee.status,
            "Payment recorded"
        );
        track_payment_recorded(recorded.payment_mode.as_str());

        let detail = Self::get(db, fee_id).await?;

        side_effects.notify(
            NewNotification::new(
                NotificationType::Payment,
                "Fee payment received",
                format!(
                    "₹{:.2} received from {} ({}), receipt {}",
                    amount,
                    detail.student.name,
                    detail.student.admission_number,
                    recorded.receipt_number
                ),
            )
            .link(format!("/admin/fees/{}", fee_id))
            .related(fee_id, "Fee")
            .priority(Priority::Medium),
        );
        if let Some(to) = detail.student.email.as_deref() {
            side_effects.email(OutboundEmail::payment_receipt(
                email_config,
                to,
                &detail.student.name,
                amount,
                &recorded.receipt_number,
                detail.fee.pending_amount,
            ));
        }

        Ok(PaymentReceipt {
            fee: detail,
            receipt_number: recorded.receipt_number,
        })
    }

    /// Checks the checkout signature, then records an `Online` payment.
    /// Nothing is recorded when the signature does not match.
    #[instrument(
        skip(db, side_effects, email_config, payment_config, admin, dto),
        fields(order_id = %dto.razorpay_order_id)
    )]
    pub async fn verify_payment(
        db: &PgPool,
        side_effects: &SideEffects,
        email_config: &EmailConfig,
        payment_config: &PaymentConfig,
        fee_id: FeeId,
        admin: &Admin,
        dto: VerifyPaymentDto,
    ) -> Result<PaymentReceipt, AppError> {
        let secret = key_secret(payment_config).map_err(gateway_error)?;

        if !verify_signature(
            secret,
            &dto.razorpay_order_id,
            &dto.razorpay_payment_id,
            &dto.razorpay_signature,
        ) {
            warn!(fee_id = %fee_id, "Payment signature mismatch");
            track_payment_verification_failure();
            return Err(AppError::validation("Payment verification failed"));
        }

        let payment = NewPayment {
            amount: dto.amount,
            payment_mode: PaymentMode::Online,
            transaction_id: Some(dto.razorpay_payment_id.clone()),
            razorpay_order_id: Some(dto.razorpay_order_id),
            razorpay_payment_id: Some(dto.razorpay_payment_id),
            remarks: dto.remarks,
            recorded_by: Some(admin.id),
        };

        Self::record_payment(db, side_effects, email_config, fee_id, payment).await
    }

    #[instrument(skip(db, side_effects, email_config, admin, dto))]
    pub async fn manual_payment(
        db: &PgPool,
        side_effects: &SideEffects,
        email_config: &EmailConfig,
        fee_id: FeeId,
        admin: &Admin,
        dto: ManualPaymentDto,
    ) -> Result<PaymentReceipt, AppError> {
        let payment = NewPayment {
            amount: dto.amount,
            payment_mode: dto.payment_mode,
            transaction_id: dto.transaction_id,
            razorpay_order_id: None,
            razorpay_payment_id: None,
            remarks: dto.remarks,
            recorded_by: Some(admin.id),
        };

        Self::record_payment(db, side_effects, email_config, fee_id, payment).await
    }

    /// Opens a gateway order for part or all of a fee. The gateway is not
    /// called when credentials are missing.
    #[instrument(skip(db, payment_config))]
    pub async fn create_order(
        db: &PgPool,
        payment_config: &PaymentConfig,
        fee_id: FeeId,
        amount: f64,
    ) -> Result<PaymentOrder, AppError> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(AppError::validation("amount must be greater than 0"));
        }

        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM fees WHERE id = $1)")
                .bind(fee_id)
                .fetch_one(db)
                .await?;
        if !exists {
            return Err(AppError::not_found(anyhow!("Fee record not found")));
        }

        let client = RazorpayClient::from_config(payment_config).map_err(gateway_error)?;

        let fee_uuid: Uuid = fee_id.into();
        let short_id: String = fee_uuid.simple().to_string().chars().take(8).collect();
        let receipt = format!("fee_{}_{}", short_id, Utc::now().timestamp());

        let order = client
            .create_order(to_paise(amount), &receipt)
            .await
            .map_err(gateway_error)?;

        info!(fee_id = %fee_id, order_id = %order.id, amount = order.amount, "Payment order created");

        Ok(PaymentOrder {
            order_id: order.id,
            amount: order.amount,
            currency: order.currency,
            key_id: client.key_id().to_string(),
        })
    }
}
