// API payload types
// Request bodies and response data carried inside the envelope

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Bare (non-enveloped) health check payload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthCheck {
    pub status: String,
    /// RFC 3339 UTC timestamp
    pub timestamp: String,
    pub version: String,
}

/// `data` of the status endpoint
#[derive(Debug, Clone, Serialize)]
pub struct StatusData {
    /// Human readable, e.g. `1h2m3s`
    pub uptime: String,
    pub uptime_seconds: u64,
    pub environment: String,
    pub version: String,
    /// `"METHOD /path"` for every API route
    pub endpoints: Vec<String>,
}

fn default_transfer_currency() -> String {
    "shards".to_string()
}

/// Shard transfer request body
///
/// Missing ids and amount deserialize to empty values so they are reported as
/// validation failures rather than parse errors.
#[derive(Debug, Clone, Deserialize)]
pub struct TransferRequest {
    #[serde(default)]
    pub from_user_id: String,
    #[serde(default)]
    pub to_user_id: String,
    #[serde(default)]
    pub amount: i64,
    #[serde(default = "default_transfer_currency")]
    pub currency: String,
    #[serde(default)]
    pub note: Option<String>,
}

impl TransferRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.from_user_id.is_empty() || self.to_user_id.is_empty() {
            return Err(ApiError::validation(
                "from_user_id and to_user_id are required",
            ));
        }
        if self.amount <= 0 {
            return Err(ApiError::validation("amount must be greater than zero"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TransferStatus {
    Pending,
}

/// Echo of an accepted transfer request
#[derive(Debug, Clone, Serialize)]
pub struct TransferReceipt {
    pub transaction_id: String,
    pub from_user_id: String,
    pub to_user_id: String,
    pub amount: i64,
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub status: TransferStatus,
}

impl TransferReceipt {
    pub fn pending(transaction_id: String, request: TransferRequest) -> Self {
        Self {
            transaction_id,
            from_user_id: request.from_user_id,
            to_user_id: request.to_user_id,
            amount: request.amount,
            currency: request.currency,
            note: request.note,
            status: TransferStatus::Pending,
        }
    }
}

/// Wallet balances
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct WalletBalance {
    pub shards: u64,
    pub orbs: u64,
}

/// Fixed balances returned until wallets are backed by storage
pub const PLACEHOLDER_WALLET: WalletBalance = WalletBalance {
    shards: 1000,
    orbs: 100,
};

/// Sparks credited per unit of deposited currency
pub const SPARKS_PER_UNIT: f64 = 10.0;

fn default_payment_currency() -> String {
    "sparks".to_string()
}

/// Payment verification request body
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentVerificationRequest {
    #[serde(default)]
    pub reference: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub amount: f64,
    #[serde(default = "default_payment_currency")]
    pub currency: String,
}

impl PaymentVerificationRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        let amount_ok = self.amount.is_finite() && self.amount > 0.0;
        if self.reference.is_empty() || self.user_id.is_empty() || !amount_ok {
            return Err(ApiError::validation("Missing required fields"));
        }
        Ok(())
    }

    /// Whole sparks the deposit would credit
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn sparks_to_credit(&self) -> u64 {
        (self.amount * SPARKS_PER_UNIT).floor() as u64
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Unverified,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentVerificationReceipt {
    pub reference: String,
    pub user_id: String,
    pub amount: f64,
    pub currency: String,
    pub sparks_to_credit: u64,
    pub status: PaymentStatus,
}

impl From<PaymentVerificationRequest> for PaymentVerificationReceipt {
    fn from(request: PaymentVerificationRequest) -> Self {
        let sparks_to_credit = request.sparks_to_credit();
        Self {
            reference: request.reference,
            user_id: request.user_id,
            amount: request.amount,
            currency: request.currency,
            sparks_to_credit,
            status: PaymentStatus::Unverified,
        }
    }
}
