// Response envelope module
// Uniform JSON body for API responses and the writer that serializes it

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderValue, ALLOW, CONTENT_TYPE};
use hyper::{Response, StatusCode};
use serde::Serialize;

use crate::error::ApiError;
use crate::logger;

/// Header marking responses produced by endpoints without a real backend yet
pub const IMPLEMENTATION_STATUS_HEADER: &str = "x-implementation-status";

/// `{success, message?, data?, error?}`
#[derive(Debug, Serialize)]
pub struct Envelope<T = ()> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Envelope {
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: None,
            data: None,
            error: Some(error.into()),
        }
    }
}

/// Successful handler result
///
/// `Placeholder` marks endpoints whose business logic does not exist yet; the
/// body is identical to `Success` but the response is tagged with
/// `X-Implementation-Status: placeholder`.
#[derive(Debug)]
pub enum Outcome<T> {
    Success { message: String, data: Option<T> },
    Placeholder { message: String, data: Option<T> },
}

impl<T: Serialize> Outcome<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self::Success {
            message: message.into(),
            data: Some(data),
        }
    }

    /// `"<feature> endpoint ready (not yet implemented)"` without data
    pub fn placeholder(feature: &str) -> Self {
        Self::Placeholder {
            message: format!("{feature} endpoint ready (not yet implemented)"),
            data: None,
        }
    }

    /// Placeholder that still returns example data
    pub fn placeholder_with(feature: &str, data: T) -> Self {
        Self::Placeholder {
            message: format!("{feature} endpoint ready (not yet implemented)"),
            data: Some(data),
        }
    }

    pub const fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder { .. })
    }

    pub fn into_envelope(self) -> Envelope<T> {
        let (Self::Success { message, data } | Self::Placeholder { message, data }) = self;
        Envelope {
            success: true,
            message: Some(message),
            data,
            error: None,
        }
    }

    pub fn into_response(self) -> Response<Full<Bytes>> {
        let placeholder = self.is_placeholder();
        let mut response = write_json(StatusCode::OK, &self.into_envelope());
        if placeholder {
            response.headers_mut().insert(
                IMPLEMENTATION_STATUS_HEADER,
                HeaderValue::from_static("placeholder"),
            );
        }
        response
    }
}

/// Serialize `payload` as the JSON body of a `status` response
///
/// A serialization failure is logged only: the status and headers stand and
/// the body is left empty.
pub fn write_json<T: Serialize + ?Sized>(status: StatusCode, payload: &T) -> Response<Full<Bytes>> {
    let body = match serde_json::to_vec(payload) {
        Ok(mut json) => {
            json.push(b'\n');
            Bytes::from(json)
        }
        Err(e) => {
            logger::log_error(&format!("Error encoding JSON: {e}"));
            Bytes::new()
        }
    };

    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "application/json")
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            logger::log_error(&format!("Failed to build response: {e}"));
            Response::new(Full::new(Bytes::new()))
        })
}

/// Envelope with `success:false` for a handler error
pub fn error_response(err: &ApiError) -> Response<Full<Bytes>> {
    let mut response = write_json(err.status(), &Envelope::failure(err.to_string()));
    if let ApiError::MethodNotAllowed { allowed } = err {
        response
            .headers_mut()
            .insert(ALLOW, HeaderValue::from_static(*allowed));
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(resp: Response<Full<Bytes>>) -> serde_json::Value {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    struct Unserializable;

    impl Serialize for Unserializable {
        fn serialize<S: serde::Serializer>(&self, _: S) -> Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("cannot encode"))
        }
    }

    #[test]
    fn test_failure_omits_data_and_message() {
        let value = serde_json::to_value(Envelope::failure("boom")).unwrap();
        assert_eq!(value, serde_json::json!({"success": false, "error": "boom"}));
    }

    #[tokio::test]
    async fn test_placeholder_is_tagged() {
        let resp = Outcome::<()>::placeholder("Quest claim").into_response();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[IMPLEMENTATION_STATUS_HEADER], "placeholder");
        assert_eq!(resp.headers()[CONTENT_TYPE], "application/json");
        assert_eq!(
            body_json(resp).await,
            serde_json::json!({
                "success": true,
                "message": "Quest claim endpoint ready (not yet implemented)"
            })
        );
    }

    #[tokio::test]
    async fn test_success_is_untagged() {
        let resp = Outcome::success("API is operational", 7).into_response();
        assert!(resp.headers().get(IMPLEMENTATION_STATUS_HEADER).is_none());
        assert_eq!(body_json(resp).await["data"], 7);
    }

    #[tokio::test]
    async fn test_body_ends_with_newline() {
        let resp = write_json(StatusCode::OK, &serde_json::json!({"a": 1}));
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], b"{\"a\":1}\n");
    }

    #[tokio::test]
    async fn test_serialization_failure_keeps_status() {
        let resp = write_json(StatusCode::CREATED, &Unserializable);
        assert_eq!(resp.status(), StatusCode::CREATED);
        assert_eq!(resp.headers()[CONTENT_TYPE], "application/json");
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        assert!(bytes.is_empty());
    }

    #[tokio::test]
    async fn test_method_not_allowed_sets_allow() {
        let resp = error_response(&ApiError::MethodNotAllowed { allowed: "GET" });
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(resp.headers()[ALLOW], "GET");
        let value = body_json(resp).await;
        assert_eq!(value["success"], false);
        assert_eq!(value["error"], "Method not allowed. Use GET.");
    }
}
