//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: method validation, route
//! matching against the fixed media routes, and access logging.

use crate::config::AppState;
use crate::handler::media;
use crate::http::{self, ResponseBody};
use crate::logger::{self, AccessLogEntry};
use crate::media::MediaTarget;
use hyper::header::{
    HeaderName, HeaderValue, CONTENT_LENGTH, CONTENT_RANGE, RANGE, SERVER, USER_AGENT,
};
use hyper::{Method, Request, Response, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    pub method: &'a Method,
    pub path: &'a str,
    pub is_head: bool,
    pub range_header: Option<String>,
    pub user_agent: Option<String>,
    pub remote_addr: Option<SocketAddr>,
    pub http_version: &'static str,
}

impl<'a> RequestContext<'a> {
    /// Capture what the handlers need from `req`
    pub fn from_request<B>(req: &'a Request<B>, remote_addr: Option<SocketAddr>) -> Self {
        let header = |name: HeaderName| {
            req.headers()
                .get(name)
                .and_then(|v: &HeaderValue| v.to_str().ok())
                .map(ToString::to_string)
        };

        Self {
            method: req.method(),
            path: req.uri().path(),
            is_head: req.method() == Method::HEAD,
            range_header: header(RANGE),
            user_agent: header(USER_AGENT),
            remote_addr,
            http_version: version_str(req.version()),
        }
    }
}

/// Main entry point for HTTP request handling
///
/// Never fails: every outcome, including errors, is a response.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    remote_addr: Option<SocketAddr>,
) -> Result<Response<ResponseBody>, Infallible> {
    let started = Instant::now();
    let ctx = RequestContext::from_request(&req, remote_addr);

    let mut response = match check_http_method(ctx.method, state.config.http.enable_cors) {
        Some(resp) => resp,
        None => route_request(&ctx, &state).await,
    };

    if let Ok(server) = HeaderValue::from_str(&state.config.http.server_name) {
        response.headers_mut().insert(SERVER, server);
    }

    if state.access_log_enabled() {
        log_access(&ctx, &response, started, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Check HTTP method and return appropriate response for non-GET/HEAD methods
fn check_http_method(method: &Method, enable_cors: bool) -> Option<Response<ResponseBody>> {
    match *method {
        Method::GET | Method::HEAD => None,
        Method::OPTIONS => Some(http::build_options_response(enable_cors)),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(http::build_405_response())
        }
    }
}

/// Route request to the media handler published under its path
async fn route_request(ctx: &RequestContext<'_>, state: &AppState) -> Response<ResponseBody> {
    match MediaTarget::from_route(ctx.path) {
        Some(MediaTarget::Party) => media::get_party(ctx, state).await,
        Some(MediaTarget::Bling) => media::get_bling(ctx, state).await,
        Some(MediaTarget::Bird) => media::get_bird(ctx, state).await,
        None => http::build_404_response(),
    }
}

fn log_access(
    ctx: &RequestContext<'_>,
    response: &Response<ResponseBody>,
    started: Instant,
    format: &str,
) {
    logger::log_access(&access_entry(ctx, response, started), format);
}

/// Access log record for a response whose head is ready
fn access_entry(
    ctx: &RequestContext<'_>,
    response: &Response<ResponseBody>,
    started: Instant,
) -> AccessLogEntry {
    let header = |name: HeaderName| {
        response
            .headers()
            .get(name)
            .and_then(|v: &HeaderValue| v.to_str().ok())
    };

    let mut entry = AccessLogEntry::new(
        ctx.remote_addr
            .map_or_else(|| "-".to_string(), |a| a.ip().to_string()),
        ctx.method.to_string(),
        ctx.path.to_string(),
    );
    entry.http_version = ctx.http_version.to_string();
    entry.status = response.status().as_u16();
    // HEAD advertises the length of a body it never sends
    entry.body_bytes = if ctx.is_head {
        0
    } else {
        header(CONTENT_LENGTH)
            .and_then(|v| v.parse().ok())
            .unwrap_or(0)
    };
    entry.range.clone_from(&ctx.range_header);
    entry.content_range = header(CONTENT_RANGE).map(ToString::to_string);
    entry.user_agent.clone_from(&ctx.user_agent);
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
    entry
}

const fn version_str(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}
