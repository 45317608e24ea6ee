//! Razorpay integration: order creation and checkout signature verification.

use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use tracing::instrument;

use scholaris_config::PaymentConfig;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("Payment gateway is not configured: {0} is not set")]
    NotConfigured(&'static str),

    #[error("Payment gateway request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Payment gateway rejected the request ({status}): {body}")]
    Rejected { status: u16, body: String },
}

/// Hex HMAC-SHA256 of `"<order_id>|<payment_id>"` keyed by the gateway secret.
pub fn sign(secret: &str, order_id: &str, payment_id: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .unwrap_or_else(|_| unreachable!("HMAC accepts keys of any length"));
    mac.update(format!("{}|{}", order_id, payment_id).as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Checks a checkout signature in constant time.
pub fn verify_signature(secret: &str, order_id: &str, payment_id: &str, signature: &str) -> bool {
    let Ok(expected) = hex::decode(signature.trim()) else {
        return false;
    };
    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(format!("{}|{}", order_id, payment_id).as_bytes());
    mac.verify_slice(&expected).is_ok()
}

/// The configured key secret, required for signature verification.
pub fn key_secret(config: &PaymentConfig) -> Result<&str, GatewayError> {
    config
        .key_secret
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .ok_or(GatewayError::NotConfigured("RAZORPAY_KEY_SECRET"))
}

#[derive(Debug, Serialize)]
struct OrderRequest<'a> {
    amount: i64,
    currency: &'a str,
    receipt: &'a str,
}

/// Order as returned by `POST /v1/orders`.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayOrder {
    pub id: String,
    pub amount: i64,
    pub currency: String,
}

pub struct RazorpayClient {
    http: reqwest::Client,
    key_id: String,
    key_secret: String,
    currency: String,
    api_base: String,
}

impl RazorpayClient {
    /// Fails without calling the gateway when either credential is missing.
    pub fn from_config(config: &PaymentConfig) -> Result<Self, GatewayError> {
        let key_id = config
            .key_id
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .ok_or(GatewayError::NotConfigured("RAZORPAY_KEY_ID"))?;
        let key_secret = key_secret(config)?;

        Ok(Self {
            http: reqwest::Client::new(),
            key_id: key_id.to_string(),
            key_secret: key_secret.to_string(),
            currency: config.currency.clone(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
        })
    }

    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    /// Creates an order for `amount_paise` in the configured currency.
    #[instrument(skip(self))]
    pub async fn create_order(
        &self,
        amount_paise: i64,
        receipt: &str,
    ) -> Result<GatewayOrder, GatewayError> {
        let response = self
            .http
            .post(format!("{}/v1/orders", self.api_base))
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(&OrderRequest {
                amount: amount_paise,
                currency: &self.currency,
                receipt,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<GatewayOrder>().await?)
    }
}
