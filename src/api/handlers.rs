// API endpoint handlers
//
// Each handler is stateless: it reads the immutable `AppState` and the request
// body (when the route takes one) and returns a typed outcome.

use chrono::{SecondsFormat, Utc};
use hyper::body::Bytes;
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::envelope::Outcome;
use super::types::{
    HealthCheck, PaymentVerificationReceipt, PaymentVerificationRequest, StatusData,
    TransferReceipt, TransferRequest, WalletBalance, PLACEHOLDER_WALLET,
};
use super::ROUTES;
use crate::config::AppState;
use crate::error::ApiError;

/// `/health`
pub fn health(state: &AppState) -> HealthCheck {
    HealthCheck {
        status: "healthy".to_string(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        version: state.config.app.version.clone(),
    }
}

/// `/api/v1/status`
pub fn status(state: &AppState) -> Outcome<StatusData> {
    let uptime = state.started.uptime();
    let data = StatusData {
        uptime: format_uptime(uptime),
        uptime_seconds: uptime.as_secs(),
        environment: state.config.app.environment.clone(),
        version: state.config.app.version.clone(),
        endpoints: ROUTES.iter().map(ToString::to_string).collect(),
    };
    Outcome::success("API is operational", data)
}

/// `/api/v1/shards/transfer`
///
/// Validates and echoes the request. No balance is checked or moved.
pub fn shard_transfer(body: &Bytes, state: &AppState) -> Result<Outcome<TransferReceipt>, ApiError> {
    let request: TransferRequest = parse_json(body)?;
    request.validate()?;

    let transaction_id = format!("tx_{}", state.started.monotonic_nanos());
    tracing::debug!(
        %transaction_id,
        from = %request.from_user_id,
        to = %request.to_user_id,
        amount = request.amount,
        "Shard transfer accepted as pending"
    );
    Ok(Outcome::placeholder_with(
        "Shard transfer",
        TransferReceipt::pending(transaction_id, request),
    ))
}

/// `/api/v1/quests/complete`
pub fn quest_complete() -> Outcome<()> {
    Outcome::placeholder("Quest completion")
}

/// `/api/v1/quests/claim`
pub fn quest_claim() -> Outcome<()> {
    Outcome::placeholder("Quest claim")
}

/// `/api/v1/users/wallet`
pub fn user_wallet() -> Outcome<WalletBalance> {
    Outcome::placeholder_with("Wallet", PLACEHOLDER_WALLET)
}

/// `/api/v1/users/profile`
pub fn user_profile() -> Outcome<()> {
    Outcome::placeholder("Profile")
}

/// `/api/v1/payments/verify`
///
/// Checks the deposit request shape. Provider verification and wallet
/// crediting are not performed.
pub fn payment_verify(body: &Bytes) -> Result<Outcome<PaymentVerificationReceipt>, ApiError> {
    let request: PaymentVerificationRequest = parse_json(body)?;
    request.validate()?;
    Ok(Outcome::placeholder_with(
        "Payment verification",
        PaymentVerificationReceipt::from(request),
    ))
}

fn parse_json<T: DeserializeOwned>(body: &Bytes) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|e| ApiError::InvalidBody(e.to_string()))
}

/// Compact duration such as `2h5m3s`, `4m0s` or `12s`
pub fn format_uptime(uptime: Duration) -> String {
    let total = uptime.as_secs();
    let (hours, minutes, seconds) = (total / 3600, (total % 3600) / 60, total % 60);
    if hours > 0 {
        format!("{hours}h{minutes}m{seconds}s")
    } else if minutes > 0 {
        format!("{minutes}m{seconds}s")
    } else {
        format!("{seconds}s")
    }
}
