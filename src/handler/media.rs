//! Media file serving module
//!
//! Answers every satisfiable request with `206 Partial Content` and streams
//! the requested span straight from disk. File metadata is read fresh on
//! each request.

use crate::config::AppState;
use crate::error::MediaError;
use crate::handler::router::RequestContext;
use crate::http::{self, body, RangeParseResult, ResponseBody};
use crate::logger;
use crate::media::MediaTarget;
use hyper::Response;
use tokio::fs;

/// Serve the party video
pub async fn get_party(ctx: &RequestContext<'_>, state: &AppState) -> Response<ResponseBody> {
    serve(ctx, MediaTarget::Party, state).await
}

/// Serve the bling audio
pub async fn get_bling(ctx: &RequestContext<'_>, state: &AppState) -> Response<ResponseBody> {
    serve(ctx, MediaTarget::Bling, state).await
}

/// Serve the bird video
pub async fn get_bird(ctx: &RequestContext<'_>, state: &AppState) -> Response<ResponseBody> {
    serve(ctx, MediaTarget::Bird, state).await
}

/// Serve one byte range of `target`.
///
/// The head is fixed before the body starts: errors found while streaming
/// can only cut the body short, never change the status.
pub async fn serve(
    ctx: &RequestContext<'_>,
    target: MediaTarget,
    state: &AppState,
) -> Response<ResponseBody> {
    let path = target.resolve(&state.media_dir);
    let display = path.display().to_string();

    let total_size = match fs::metadata(&path).await {
        Ok(meta) if meta.is_file() => meta.len(),
        Ok(_) => {
            let err = MediaError::StatFailed {
                path: display,
                message: "not a regular file".to_string(),
            };
            logger::log_error(&err.to_string());
            return http::build_error_response(&err);
        }
        Err(e) => {
            let err = MediaError::from_stat(&display, &e);
            match err {
                MediaError::NotFound { .. } => logger::log_warning(&err.to_string()),
                _ => logger::log_error(&err.to_string()),
            }
            return http::build_error_response(&err);
        }
    };

    let range = match http::parse_range_header(ctx.range_header.as_deref(), total_size) {
        RangeParseResult::Valid(range) => range,
        RangeParseResult::NotSatisfiable => {
            let err = MediaError::RangeNotSatisfiable { total_size };
            logger::log_warning(&format!(
                "{target}: {err} (Range: {})",
                ctx.range_header.as_deref().unwrap_or("-")
            ));
            return http::build_error_response(&err);
        }
    };

    logger::log_debug(&format!(
        "{target}: serving {} ({} bytes)",
        range.content_range(),
        range.chunk_size()
    ));

    let body = if ctx.is_head {
        body::empty()
    } else {
        body::range_stream(path, range, state.config.media.stream_buffer_size)
    };

    http::build_partial_response(body, target.content_type(), &range)
}
