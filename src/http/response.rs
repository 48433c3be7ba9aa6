//! HTTP response building module
//!
//! Builders for every status this server answers with. Media responses always
//! advertise `Accept-Ranges: bytes` so players know they can seek.

use crate::error::MediaError;
use crate::http::body::{self, ResponseBody};
use crate::http::range::ResolvedRange;
use hyper::header::{ACCEPT_RANGES, ALLOW, CONTENT_LENGTH, CONTENT_RANGE, CONTENT_TYPE};
use hyper::{Response, StatusCode};

const ALLOWED_METHODS: &str = "GET, HEAD, OPTIONS";

/// Build 206 Partial Content response head around `body`
pub fn build_partial_response(
    body: ResponseBody,
    content_type: &str,
    range: &ResolvedRange,
) -> Response<ResponseBody> {
    Response::builder()
        .status(StatusCode::PARTIAL_CONTENT)
        .header(CONTENT_RANGE, range.content_range())
        .header(ACCEPT_RANGES, "bytes")
        .header(CONTENT_LENGTH, range.chunk_size())
        .header(CONTENT_TYPE, content_type)
        .body(body)
        .unwrap_or_else(|e| {
            log_build_error("206", &e);
            Response::new(body::empty())
        })
}

/// Build the response for a media error.
///
/// The status is only set when the error kind has one; otherwise the
/// builder default stays in place.
pub fn build_error_response(err: &MediaError) -> Response<ResponseBody> {
    let payload = err.to_payload();
    let mut builder = Response::builder();
    if let Some(status) = err.status() {
        builder = builder.status(status);
    }
    if let MediaError::RangeNotSatisfiable { total_size } = err {
        builder = builder
            .header(CONTENT_RANGE, format!("bytes */{total_size}"))
            .header(ACCEPT_RANGES, "bytes");
    }

    builder
        .header(CONTENT_TYPE, "application/json")
        .header(CONTENT_LENGTH, payload.len())
        .body(body::full(payload.clone()))
        .unwrap_or_else(|e| {
            log_build_error("error", &e);
            Response::new(body::full(payload))
        })
}

/// Build 404 Not Found response for unknown routes
pub fn build_404_response() -> Response<ResponseBody> {
    Response::builder()
        .status(StatusCode::NOT_FOUND)
        .header(CONTENT_TYPE, "text/plain")
        .body(body::full("404 Not Found"))
        .unwrap_or_else(|e| {
            log_build_error("404", &e);
            Response::new(body::full("404 Not Found"))
        })
}

/// Build 405 Method Not Allowed response
pub fn build_405_response() -> Response<ResponseBody> {
    Response::builder()
        .status(StatusCode::METHOD_NOT_ALLOWED)
        .header(CONTENT_TYPE, "text/plain")
        .header(ALLOW, ALLOWED_METHODS)
        .body(body::full("405 Method Not Allowed"))
        .unwrap_or_else(|e| {
            log_build_error("405", &e);
            Response::new(body::full("405 Method Not Allowed"))
        })
}

/// Build OPTIONS response (preflight request)
pub fn build_options_response(enable_cors: bool) -> Response<ResponseBody> {
    let mut builder = Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header(ALLOW, ALLOWED_METHODS);

    if enable_cors {
        builder = builder
            .header("Access-Control-Allow-Origin", "*")
            .header("Access-Control-Allow-Methods", ALLOWED_METHODS)
            .header("Access-Control-Allow-Headers", "Range")
            .header(
                "Access-Control-Expose-Headers",
                "Content-Range, Content-Length, Accept-Ranges",
            )
            .header("Access-Control-Max-Age", "86400");
    }

    builder.body(body::empty()).unwrap_or_else(|e| {
        log_build_error("OPTIONS", &e);
        Response::new(body::empty())
    })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header<'a>(resp: &'a Response<ResponseBody>, name: &str) -> &'a str {
        resp.headers()[name].to_str().unwrap()
    }

    #[test]
    fn test_partial_headers() {
        let range = ResolvedRange::new(100, 199, 1000).unwrap();
        let resp = build_partial_response(body::empty(), "video/mp4", &range);
        assert_eq!(resp.status(), StatusCode::PARTIAL_CONTENT);
        assert_eq!(header(&resp, "content-range"), "bytes 100-199/1000");
        assert_eq!(header(&resp, "content-length"), "100");
        assert_eq!(header(&resp, "accept-ranges"), "bytes");
        assert_eq!(header(&resp, "content-type"), "video/mp4");
    }

    #[test]
    fn test_error_statuses() {
        let resp = build_error_response(&MediaError::NotFound {
            path: "x".to_string(),
        });
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(header(&resp, "content-type"), "application/json");

        // No explicit status for other stat failures
        let resp = build_error_response(&MediaError::StatFailed {
            path: "x".to_string(),
            message: "denied".to_string(),
        });
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = build_error_response(&MediaError::RangeNotSatisfiable { total_size: 42 });
        assert_eq!(resp.status(), StatusCode::RANGE_NOT_SATISFIABLE);
        assert_eq!(header(&resp, "content-range"), "bytes */42");
    }

    #[test]
    fn test_options_cors() {
        let resp = build_options_response(false);
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        assert!(resp.headers().get("access-control-allow-origin").is_none());

        let resp = build_options_response(true);
        assert_eq!(header(&resp, "access-control-allow-origin"), "*");
        assert_eq!(header(&resp, "allow"), ALLOWED_METHODS);
    }

    #[test]
    fn test_405_allow_header() {
        let resp = build_405_response();
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(header(&resp, "allow"), ALLOWED_METHODS);
    }
}
