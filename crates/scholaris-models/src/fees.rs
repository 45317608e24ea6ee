//! Fee ledger models.
//!
//! A fee record holds a breakdown of named components, its derived totals
//! and an append-only list of payments. Amounts are rupees as `f64`,
//! rounded to the paisa after every operation.
//!
//! Status is derived from the amounts after every payment:
//!
//! - `paid` when `pending_amount <= 0`
//! - `partial` when `paid_amount > 0`
//! - `pending` otherwise
//!
//! Payments beyond the total are accepted, so `pending_amount` can go
//! negative.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use sqlx::types::Json;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use scholaris_core::pagination::{PageInfo, PaginationParams};
use scholaris_core::serde::{
    deserialize_optional_i64, deserialize_optional_trimmed, deserialize_optional_uuid,
};

use crate::enums::{FeeStatus, PaymentMode};
use crate::ids::{AdminId, FeeId, PaymentId, StudentId};

/// Rounds an amount to two decimal places.
pub fn round_money(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Converts rupees to the gateway's minor unit (paise).
pub fn to_paise(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeeStructureError(pub String);

impl std::error::Error for FeeStructureError {}

impl fmt::Display for FeeStructureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Named fee components, e.g. `{"tuitionFee": 1000, "libraryFee": 200}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeeStructure(BTreeMap<String, f64>);

impl FeeStructure {
    /// Parses a submitted structure.
    ///
    /// Components may be numbers or numeric strings. `null` and blank strings
    /// count as absent. Negative, non-finite or non-numeric components fail.
    pub fn parse(value: &Value) -> Result<Self, FeeStructureError> {
        let Value::Object(map) = value else {
            return Err(FeeStructureError(
                "feeStructure must be an object of named amounts".to_string(),
            ));
        };

        let mut components = BTreeMap::new();
        for (name, raw) in map {
            let amount = match raw {
                Value::Null => continue,
                Value::Number(n) => n.as_f64(),
                Value::String(s) if s.trim().is_empty() => continue,
                Value::String(s) => s.trim().parse::<f64>().ok(),
                _ => None,
            };

            match amount.map(round_money) {
                Some(a) if a.is_finite() && a >= 0.0 => {
                    components.insert(name.clone(), a);
                }
                _ => {
                    return Err(FeeStructureError(format!(
                        "feeStructure.{} must be a non-negative amount",
                        name
                    )));
                }
            }
        }

        let structure = Self(components);
        if !structure.total().is_finite() {
            return Err(FeeStructureError("feeStructure total is too large".to_string()));
        }
        Ok(structure)
    }

    pub fn total(&self) -> f64 {
        round_money(self.0.values().sum())
    }

    pub fn components(&self) -> &BTreeMap<String, f64> {
        &self.0
    }
}

/// Status rule shared by creation-time checks and payment recording.
pub fn derive_status(paid_amount: f64, pending_amount: f64) -> FeeStatus {
    if pending_amount <= 0.0 {
        FeeStatus::Paid
    } else if paid_amount > 0.0 {
        FeeStatus::Partial
    } else {
        FeeStatus::Pending
    }
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Fee {
    pub id: FeeId,
    pub student_id: StudentId,
    pub class_name: String,
    pub academic_year: String,
    #[schema(value_type = Object)]
    pub fee_structure: Json<FeeStructure>,
    pub total_amount: f64,
    pub paid_amount: f64,
    pub pending_amount: f64,
    pub status: FeeStatus,
    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Fee {
    /// Adds a payment to the running totals and recomputes the status.
    pub fn apply_payment(&mut self, amount: f64) {
        self.paid_amount = round_money(self.paid_amount + amount);
        self.pending_amount = round_money(self.total_amount - self.paid_amount);
        self.status = derive_status(self.paid_amount, self.pending_amount);
    }

    pub fn is_overpaid(&self) -> bool {
        self.paid_amount > self.total_amount
    }
}

/// A payment appended to a fee ledger. Never updated or deleted.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: PaymentId,
    pub fee_id: FeeId,
    pub amount: f64,
    pub payment_date: DateTime<Utc>,
    pub payment_mode: PaymentMode,
    pub transaction_id: Option<String>,
    pub razorpay_order_id: Option<String>,
    pub razorpay_payment_id: Option<String>,
    pub receipt_number: String,
    pub remarks: Option<String>,
    pub recorded_by: Option<AdminId>,
    pub created_at: DateTime<Utc>,
}

/// Column values for a payment insert.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPayment {
    pub amount: f64,
    pub payment_mode: PaymentMode,
    pub transaction_id: Option<String>,
    pub razorpay_order_id: Option<String>,
    pub razorpay_payment_id: Option<String>,
    pub remarks: Option<String>,
    pub recorded_by: Option<AdminId>,
}

/// Display fields of the student owning a fee record.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentSummary {
    #[sqlx(rename = "student_name")]
    pub name: String,
    #[sqlx(rename = "student_admission_number")]
    pub admission_number: String,
    #[sqlx(rename = "student_section")]
    pub section: Option<String>,
    #[sqlx(rename = "student_roll_number")]
    pub roll_number: Option<String>,
    #[sqlx(rename = "student_email")]
    pub email: Option<String>,
}

/// A fee record with its owning student and payment history.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct FeeDetail {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub fee: Fee,
    #[sqlx(flatten)]
    pub student: StudentSummary,
    #[sqlx(skip)]
    pub payments: Vec<Payment>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateFeeDto {
    pub student_id: StudentId,
    /// Object of named amounts, e.g. `{"tuitionFee": 1000}`
    #[schema(value_type = Object)]
    pub fee_structure: Value,
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifyPaymentDto {
    #[validate(length(min = 1))]
    pub razorpay_order_id: String,
    #[validate(length(min = 1))]
    pub razorpay_payment_id: String,
    #[validate(length(min = 1))]
    pub razorpay_signature: String,
    #[validate(range(exclusive_min = 0.0))]
    pub amount: f64,
    /// Ignored; gateway payments are always recorded as `Online`
    pub payment_mode: Option<PaymentMode>,
    #[validate(length(max = 500))]
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ManualPaymentDto {
    #[validate(range(exclusive_min = 0.0))]
    pub amount: f64,
    pub payment_mode: PaymentMode,
    #[validate(length(max = 100))]
    pub transaction_id: Option<String>,
    #[validate(length(max = 500))]
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateOrderDto {
    #[validate(range(exclusive_min = 0.0))]
    pub amount: f64,
}

/// Gateway order handed to the checkout widget.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentOrder {
    pub order_id: String,
    /// Amount in paise
    pub amount: i64,
    pub currency: String,
    pub key_id: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentReceipt {
    pub fee: FeeDetail,
    pub receipt_number: String,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct FeeFilterParams {
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub student_id: Option<Uuid>,
    #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
    pub admission_number: Option<String>,
    pub status: Option<FeeStatus>,
    #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
    pub academic_year: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub page: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub limit: Option<i64>,
}

impl FeeFilterParams {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams {
            page: self.page,
            limit: self.limit,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FeePayload {
    pub fee: FeeDetail,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FeeList {
    #[serde(flatten)]
    pub page_info: PageInfo,
    pub fees: Vec<FeeDetail>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StudentFees {
    pub count: i64,
    pub fees: Vec<FeeDetail>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fee_with_total(total: f64) -> Fee {
        let now = Utc::now();
        Fee {
            id: FeeId::new(),
            student_id: StudentId::new(),
            class_name: "5".to_string(),
            academic_year: "2025-2026".to_string(),
            fee_structure: Json(FeeStructure::default()),
            total_amount: total,
            paid_amount: 0.0,
            pending_amount: total,
            status: FeeStatus::Pending,
            due_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_total_is_sum_of_components() {
        let structure =
            FeeStructure::parse(&json!({ "tuitionFee": 1000, "libraryFee": 200 })).unwrap();
        assert_eq!(structure.total(), 1200.0);
        assert_eq!(structure.components().len(), 2);
    }

    #[test]
    fn test_numeric_strings_and_nulls() {
        let structure = FeeStructure::parse(&json!({
            "tuitionFee": "1500.50",
            "transportFee": null,
            "labFee": "",
            "sportsFee": 0
        }))
        .unwrap();
        assert_eq!(structure.total(), 1500.5);
        assert!(!structure.components().contains_key("transportFee"));
    }

    #[test]
    fn test_invalid_components_are_rejected() {
        assert!(FeeStructure::parse(&json!({ "tuitionFee": -1 })).is_err());
        assert!(FeeStructure::parse(&json!({ "tuitionFee": "abc" })).is_err());
        assert!(FeeStructure::parse(&json!({ "tuitionFee": [1, 2] })).is_err());
        assert!(FeeStructure::parse(&json!([1000])).is_err());

        let err = FeeStructure::parse(&json!({ "examFee": true })).unwrap_err();
        assert_eq!(err.0, "feeStructure.examFee must be a non-negative amount");
    }

    #[test]
    fn test_overflowing_amounts_are_rejected() {
        let err = FeeStructure::parse(&json!({ "a": 1e308, "b": 1e308 })).unwrap_err();
        assert_eq!(err.0, "feeStructure total is too large");

        let err = FeeStructure::parse(&json!({ "tuitionFee": 1e307 })).unwrap_err();
        assert_eq!(err.0, "feeStructure.tuitionFee must be a non-negative amount");
    }

    #[test]
    fn test_empty_structure_totals_zero() {
        let structure = FeeStructure::parse(&json!({})).unwrap();
        assert_eq!(structure.total(), 0.0);
    }

    #[test]
    fn test_derive_status() {
        assert_eq!(derive_status(0.0, 100.0), FeeStatus::Pending);
        assert_eq!(derive_status(10.0, 90.0), FeeStatus::Partial);
        assert_eq!(derive_status(100.0, 0.0), FeeStatus::Paid);
        assert_eq!(derive_status(150.0, -50.0), FeeStatus::Paid);
    }

    #[test]
    fn test_payment_sequence_keeps_totals_consistent() {
        let mut fee = fee_with_total(1200.0);
        for (amount, expected) in [
            (200.0, FeeStatus::Partial),
            (300.55, FeeStatus::Partial),
            (699.45, FeeStatus::Paid),
        ] {
            fee.apply_payment(amount);
            assert_eq!(fee.status, expected);
            assert!((fee.paid_amount + fee.pending_amount - fee.total_amount).abs() < 1e-9);
        }
        assert_eq!(fee.pending_amount, 0.0);
    }

    #[test]
    fn test_single_full_payment_goes_straight_to_paid() {
        let mut fee = fee_with_total(1200.0);
        fee.apply_payment(1200.0);
        assert_eq!(fee.paid_amount, 1200.0);
        assert_eq!(fee.pending_amount, 0.0);
        assert_eq!(fee.status, FeeStatus::Paid);
    }

    #[test]
    fn test_overpayment_is_accepted() {
        let mut fee = fee_with_total(1000.0);
        fee.apply_payment(1500.0);
        assert_eq!(fee.pending_amount, -500.0);
        assert_eq!(fee.status, FeeStatus::Paid);
        assert!(fee.is_overpaid());
    }

    #[test]
    fn test_to_paise() {
        assert_eq!(to_paise(1200.0), 120000);
        assert_eq!(to_paise(0.1 + 0.2), 30);
        assert_eq!(to_paise(499.5), 49950);
    }

    #[test]
    fn test_fee_serializes_structure_transparently() {
        let mut fee = fee_with_total(0.0);
        fee.fee_structure = Json(FeeStructure::parse(&json!({ "tuitionFee": 10 })).unwrap());
        let value = serde_json::to_value(&fee).unwrap();
        assert_eq!(value["feeStructure"], json!({ "tuitionFee": 10.0 }));
        assert_eq!(value["status"], "pending");
    }

    #[test]
    fn test_manual_payment_dto_rejects_non_positive_amount() {
        let dto: ManualPaymentDto =
            serde_json::from_value(json!({ "amount": 0, "paymentMode": "Cash" })).unwrap();
        assert!(dto.validate().is_err());

        let dto: ManualPaymentDto =
            serde_json::from_value(json!({ "amount": 10.5, "paymentMode": "Card" })).unwrap();
        assert!(dto.validate().is_ok());
        assert!(
            serde_json::from_value::<ManualPaymentDto>(
                json!({ "amount": 10, "paymentMode": "Crypto" })
            )
            .is_err()
        );
    }
}
