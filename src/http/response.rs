//! HTTP response building module
//!
//! Builders for the plain (non-JSON) responses of the static file server.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{
    ACCEPT_RANGES, ALLOW, CACHE_CONTROL, CONTENT_LENGTH, CONTENT_RANGE, CONTENT_TYPE, ETAG,
    LOCATION,
};
use hyper::{Response, StatusCode};

use super::cache::CachePolicy;
use super::range::ByteRange;

/// Methods the static file server answers
pub const STATIC_ALLOW: &str = "GET, HEAD, OPTIONS";

/// Build 304 Not Modified response
pub fn build_304_response(etag: &str, policy: CachePolicy) -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::NOT_MODIFIED)
        .header(ETAG, etag)
        .header(CACHE_CONTROL, policy.to_header_value())
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| fallback("304", &e, ""))
}

/// Build 404 Not Found response
pub fn build_404_response() -> Response<Full<Bytes>> {
    plain_text(StatusCode::NOT_FOUND, "404 page not found\n")
}

/// Build 405 Method Not Allowed response
pub fn build_405_response() -> Response<Full<Bytes>> {
    let mut resp = plain_text(StatusCode::METHOD_NOT_ALLOWED, "405 method not allowed\n");
    resp.headers_mut()
        .insert(ALLOW, hyper::header::HeaderValue::from_static(STATIC_ALLOW));
    resp
}

/// Build OPTIONS response for static paths (no CORS)
pub fn build_options_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header(ALLOW, STATIC_ALLOW)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| fallback("OPTIONS", &e, ""))
}

/// Build 416 Range Not Satisfiable response
pub fn build_416_response(file_size: usize) -> Response<Full<Bytes>> {
    let mut resp = plain_text(StatusCode::RANGE_NOT_SATISFIABLE, "416 range not satisfiable\n");
    if let Ok(value) = format!("bytes */{file_size}").parse() {
        resp.headers_mut().insert(CONTENT_RANGE, value);
    }
    resp
}

/// Build 301 redirect, used for directories requested without a trailing slash
pub fn build_redirect_response(target: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::MOVED_PERMANENTLY)
        .header(LOCATION, target)
        .header(CONTENT_TYPE, "text/plain; charset=utf-8")
        .body(Full::new(Bytes::from("Moved Permanently\n")))
        .unwrap_or_else(|e| fallback("301", &e, "Moved Permanently\n"))
}

/// Build 200 response for a whole file
pub fn build_file_response(
    data: Bytes,
    content_type: &str,
    etag: &str,
    policy: CachePolicy,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let content_length = data.len();
    let body = if is_head { Bytes::new() } else { data };

    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, content_type)
        .header(CONTENT_LENGTH, content_length)
        .header(ACCEPT_RANGES, "bytes")
        .header(ETAG, etag)
        .header(CACHE_CONTROL, policy.to_header_value())
        .body(Full::new(body))
        .unwrap_or_else(|e| fallback("200", &e, ""))
}

/// Build 206 Partial Content response; `data` is already sliced to `range`
pub fn build_partial_response(
    data: Bytes,
    content_type: &str,
    etag: &str,
    range: ByteRange,
    total_size: usize,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let body = if is_head { Bytes::new() } else { data };

    Response::builder()
        .status(StatusCode::PARTIAL_CONTENT)
        .header(CONTENT_TYPE, content_type)
        .header(CONTENT_LENGTH, range.content_length())
        .header(
            CONTENT_RANGE,
            format!("bytes {}-{}/{total_size}", range.start, range.end),
        )
        .header(ACCEPT_RANGES, "bytes")
        .header(ETAG, etag)
        .body(Full::new(body))
        .unwrap_or_else(|e| fallback("206", &e, ""))
}

fn plain_text(status: StatusCode, body: &'static str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "text/plain; charset=utf-8")
        .header("X-Content-Type-Options", "nosniff")
        .body(Full::new(Bytes::from_static(body.as_bytes())))
        .unwrap_or_else(|e| fallback(status.as_str(), &e, body))
}

/// Log response build error and return a bare response
fn fallback(status: &str, error: &hyper::http::Error, body: &'static str) -> Response<Full<Bytes>> {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
    Response::new(Full::new(Bytes::from_static(body.as_bytes())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_404_is_plain_text() {
        let resp = build_404_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            resp.headers()[CONTENT_TYPE],
            "text/plain; charset=utf-8"
        );
    }

    #[test]
    fn test_405_lists_static_methods() {
        let resp = build_405_response();
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(resp.headers()[ALLOW], STATIC_ALLOW);
    }

    #[test]
    fn test_partial_headers() {
        let resp = build_partial_response(
            Bytes::from_static(b"cdef"),
            "application/wasm",
            "\"e\"",
            ByteRange { start: 2, end: 5 },
            10,
            false,
        );
        assert_eq!(resp.status(), StatusCode::PARTIAL_CONTENT);
        assert_eq!(resp.headers()[CONTENT_RANGE], "bytes 2-5/10");
        assert_eq!(resp.headers()[CONTENT_LENGTH], "4");
    }

    #[test]
    fn test_head_keeps_length_drops_body() {
        use hyper::body::Body;

        let resp = build_file_response(
            Bytes::from_static(b"<html></html>"),
            "text/html; charset=utf-8",
            "\"x\"",
            CachePolicy::NoCache,
            true,
        );
        assert_eq!(resp.headers()[CONTENT_LENGTH], "13");
        assert_eq!(resp.body().size_hint().exact(), Some(0));
    }

    #[test]
    fn test_416_content_range() {
        let resp = build_416_response(42);
        assert_eq!(resp.headers()[CONTENT_RANGE], "bytes */42");
    }
}
