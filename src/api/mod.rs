// API module entry
// Route table for the JSON API and dispatch to handlers

pub mod envelope;
pub mod handlers;
pub mod types;

use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use hyper::{Method, Request, Response, StatusCode};
use std::fmt;

use crate::config::AppState;
use crate::error::ApiError;
use envelope::{error_response, write_json, Outcome};

// Re-export public types
pub use envelope::{Envelope, IMPLEMENTATION_STATUS_HEADER};

/// Methods a route accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Allow {
    Any,
    Get,
    Post,
}

impl Allow {
    pub fn permits(self, method: &Method) -> bool {
        match self {
            Self::Any => true,
            Self::Get => *method == Method::GET,
            Self::Post => *method == Method::POST,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Any => "ANY",
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Health,
    Status,
    ShardTransfer,
    QuestComplete,
    QuestClaim,
    UserWallet,
    UserProfile,
    PaymentVerify,
}

impl Endpoint {
    /// Only these endpoints look at the request body
    pub const fn reads_body(self) -> bool {
        matches!(self, Self::ShardTransfer | Self::PaymentVerify)
    }
}

/// Exact-path API route
#[derive(Debug, Clone, Copy)]
pub struct Route {
    pub path: &'static str,
    pub allow: Allow,
    pub endpoint: Endpoint,
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.allow.as_str(), self.path)
    }
}

/// Every API route; anything else is served by the static file handler
pub const ROUTES: &[Route] = &[
    Route { path: "/health", allow: Allow::Any, endpoint: Endpoint::Health },
    Route { path: "/api/v1/status", allow: Allow::Any, endpoint: Endpoint::Status },
    Route { path: "/api/v1/shards/transfer", allow: Allow::Post, endpoint: Endpoint::ShardTransfer },
    Route { path: "/api/v1/quests/complete", allow: Allow::Post, endpoint: Endpoint::QuestComplete },
    Route { path: "/api/v1/quests/claim", allow: Allow::Post, endpoint: Endpoint::QuestClaim },
    Route { path: "/api/v1/users/wallet", allow: Allow::Get, endpoint: Endpoint::UserWallet },
    Route { path: "/api/v1/users/profile", allow: Allow::Get, endpoint: Endpoint::UserProfile },
    Route { path: "/api/v1/payments/verify", allow: Allow::Post, endpoint: Endpoint::PaymentVerify },
];

pub fn find_route(path: &str) -> Option<&'static Route> {
    ROUTES.iter().find(|route| route.path == path)
}

/// Run the handler behind `route`
///
/// CORS is applied by the caller; this covers the method gate, body reading
/// and the envelope.
pub async fn dispatch<B>(route: &Route, req: Request<B>, state: &AppState) -> Response<Full<Bytes>>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    if !route.allow.permits(req.method()) {
        return error_response(&ApiError::MethodNotAllowed {
            allowed: route.allow.as_str(),
        });
    }

    let body = if route.endpoint.reads_body() {
        match read_body(req.into_body(), state.config.http.max_body_size).await {
            Ok(bytes) => bytes,
            Err(e) => return reject(route, &e),
        }
    } else {
        Bytes::new()
    };

    match route.endpoint {
        Endpoint::Health => write_json(StatusCode::OK, &handlers::health(state)),
        Endpoint::Status => handlers::status(state).into_response(),
        Endpoint::ShardTransfer => respond(route, handlers::shard_transfer(&body, state)),
        Endpoint::QuestComplete => handlers::quest_complete().into_response(),
        Endpoint::QuestClaim => handlers::quest_claim().into_response(),
        Endpoint::UserWallet => handlers::user_wallet().into_response(),
        Endpoint::UserProfile => handlers::user_profile().into_response(),
        Endpoint::PaymentVerify => respond(route, handlers::payment_verify(&body)),
    }
}

fn respond<T: serde::Serialize>(
    route: &Route,
    result: Result<Outcome<T>, ApiError>,
) -> Response<Full<Bytes>> {
    match result {
        Ok(outcome) => outcome.into_response(),
        Err(e) => reject(route, &e),
    }
}

fn reject(route: &Route, err: &ApiError) -> Response<Full<Bytes>> {
    tracing::debug!(path = route.path, error = %err, "Request rejected");
    error_response(err)
}

/// Collect the request body, refusing more than `limit` bytes
pub async fn read_body<B>(body: B, limit: u64) -> Result<Bytes, ApiError>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let max = usize::try_from(limit).unwrap_or(usize::MAX);
    match Limited::new(body, max).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => {
            Err(ApiError::PayloadTooLarge { limit })
        }
        Err(e) => Err(ApiError::BodyRead(e.to_string())),
    }
}
