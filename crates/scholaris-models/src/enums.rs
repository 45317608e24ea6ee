//! Closed vocabularies stored as `TEXT` columns.
//!
//! Each enum serializes to the exact string persisted in the database and
//! accepted by the API, so the JSON value, the column value and the
//! `CHECK` constraint in the migrations always agree.

use serde::{Deserialize, Serialize};
use sqlx::{
    Database, Decode, Encode, Type,
    postgres::{PgHasArrayType, PgTypeInfo},
};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// Error returned when a string is not one of an enum's known values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
    pub expected: &'static [&'static str],
}

impl std::error::Error for ParseEnumError {}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid {} '{}'. Expected one of: {}",
            self.kind,
            self.value,
            self.expected.join(", ")
        )
    }
}

/// Defines a `TEXT`-backed enum with serde, sqlx and OpenAPI support.
macro_rules! text_enum {
    (
        $(#[$meta:meta])*
        $name:ident ($label:literal) {
            $($(#[$vmeta:meta])* $variant:ident => $text:tt),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $text)]
                $variant
            ),+
        }

        impl $name {
            pub const VALUES: &'static [&'static str] = &[$($text),+];

            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ParseEnumError;

            /// Matching ignores surrounding whitespace and ASCII case.
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                $(
                    if s.eq_ignore_ascii_case($text) {
                        return Ok(Self::$variant);
                    }
                )+
                Err(ParseEnumError {
                    kind: $label,
                    value: s.to_string(),
                    expected: Self::VALUES,
                })
            }
        }

        impl Type<sqlx::Postgres> for $name {
            fn type_info() -> PgTypeInfo {
                <String as Type<sqlx::Postgres>>::type_info()
            }

            fn compatible(ty: &PgTypeInfo) -> bool {
                <String as Type<sqlx::Postgres>>::compatible(ty)
            }
        }

        impl<'q> Encode<'q, sqlx::Postgres> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut <sqlx::Postgres as Database>::ArgumentBuffer<'q>,
            ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
                <&str as Encode<'q, sqlx::Postgres>>::encode_by_ref(&self.as_str(), buf)
            }
        }

        impl<'r> Decode<'r, sqlx::Postgres> for $name {
            fn decode(
                value: <sqlx::Postgres as Database>::ValueRef<'r>,
            ) -> Result<Self, sqlx::error::BoxDynError> {
                let s = <String as Decode<'r, sqlx::Postgres>>::decode(value)?;
                Ok(s.parse::<Self>()?)
            }
        }

        impl PgHasArrayType for $name {
            fn array_type_info() -> PgTypeInfo {
                <String as PgHasArrayType>::array_type_info()
            }
        }
    };
}

text_enum!(
    /// Role of an admin account.
    AdminRole("role") {
        SuperAdmin => "super_admin",
        Admin => "admin",
        Staff => "staff",
    }
);

impl AdminRole {
    /// Roles allowed on admin-only routes.
    pub const ADMINS: &'static [AdminRole] = &[AdminRole::SuperAdmin, AdminRole::Admin];

    pub fn is_admin(&self) -> bool {
        Self::ADMINS.contains(self)
    }
}

text_enum!(
    Gender("gender") {
        Male => "male",
        Female => "female",
        Other => "other",
    }
);

text_enum!(
    /// Decision state of an admission application.
    AdmissionStatus("admission status") {
        Pending => "pending",
        Approved => "approved",
        Rejected => "rejected",
        OnHold => "on_hold",
    }
);

text_enum!(
    /// Application fee state recorded on an admission.
    AdmissionPaymentStatus("payment status") {
        Pending => "pending",
        Paid => "paid",
        Failed => "failed",
    }
);

text_enum!(
    /// Derived settlement state of a fee ledger.
    FeeStatus("fee status") {
        Pending => "pending",
        Partial => "partial",
        Paid => "paid",
    }
);

text_enum!(
    PaymentMode("payment mode") {
        Cash => "Cash",
        Cheque => "Cheque",
        Online => "Online",
        Card => "Card",
    }
);

text_enum!(
    NotificationType("notification type") {
        Contact => "contact",
        Admission => "admission",
        Payment => "payment",
        System => "system",
        Other => "other",
    }
);

text_enum!(
    Priority("priority") {
        Low => "low",
        Medium => "medium",
        High => "high",
    }
);

text_enum!(
    NoticeCategory("notice category") {
        General => "general",
        Academic => "academic",
        Event => "event",
        Holiday => "holiday",
        Exam => "exam",
        Urgent => "urgent",
    }
);

text_enum!(
    GalleryCategory("gallery category") {
        Events => "events",
        Sports => "sports",
        Cultural => "cultural",
        Academic => "academic",
        Infrastructure => "infrastructure",
        Other => "other",
    }
);

text_enum!(
    ContactStatus("contact status") {
        New => "new",
        Read => "read",
        Replied => "replied",
        Archived => "archived",
    }
);

impl Default for Priority {
    fn default() -> Self {
        Self::Medium
    }
}

impl Default for NoticeCategory {
    fn default() -> Self {
        Self::General
    }
}

impl Default for GalleryCategory {
    fn default() -> Self {
        Self::Other
    }
}
