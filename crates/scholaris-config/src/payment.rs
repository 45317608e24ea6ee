use std::env;

use crate::env_opt;

pub const DEFAULT_RAZORPAY_API_BASE: &str = "https://api.razorpay.com";

/// Razorpay credentials.
///
/// Both keys are optional at startup. Operations that need them fail with a
/// configuration error when they are missing.
#[derive(Clone, Debug)]
pub struct PaymentConfig {
    pub key_id: Option<String>,
    pub key_secret: Option<String>,
    pub currency: String,
    pub api_base: String,
}

impl PaymentConfig {
    pub fn from_env() -> Self {
        Self {
            key_id: env_opt("RAZORPAY_KEY_ID"),
            key_secret: env_opt("RAZORPAY_KEY_SECRET"),
            currency: env::var("PAYMENT_CURRENCY").unwrap_or_else(|_| "INR".to_string()),
            api_base: env_opt("RAZORPAY_API_BASE")
                .unwrap_or_else(|| DEFAULT_RAZORPAY_API_BASE.to_string()),
        }
    }
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            key_id: None,
            key_secret: None,
            currency: "INR".to_string(),
            api_base: DEFAULT_RAZORPAY_API_BASE.to_string(),
        }
    }
}
