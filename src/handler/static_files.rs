//! Static file serving module
//!
//! Turns a resolution outcome into a response: streamed file, 304, redirect
//! or a generic error page.

use crate::config::AppState;
use crate::error::ResolveError;
use crate::handler::resolver::{self, Resolution, ResolvedFile};
use crate::handler::router::RequestContext;
use crate::http::response::{self, FileHeaders, ResponseBody};
use crate::http::{self, cache, AcceptEncoding};
use crate::logger;
use hyper::Response;

/// Serve the request path from the configured root
pub async fn serve(ctx: &RequestContext<'_>, state: &AppState) -> Response<ResponseBody> {
    let accept = AcceptEncoding::parse(ctx.accept_encoding.as_deref());

    match resolver::resolve(&state.config.root, ctx.path, &accept, &state.mime).await {
        Ok(Resolution::File(resolved)) => build_static_file_response(ctx, resolved),
        Ok(Resolution::Redirect(location)) => {
            let location = match ctx.query {
                Some(query) => format!("{location}?{query}"),
                None => location,
            };
            http::build_redirect_response(&location)
        }
        Err(ResolveError::Forbidden) => {
            logger::log_warning(&format!("Path traversal attempt blocked: {}", ctx.path));
            http::build_403_response()
        }
        // Missing files are routine, no need to log beyond the access log
        Err(ResolveError::NotFound) => http::build_404_response(),
        Err(ResolveError::Io(e)) => {
            logger::log_error(&format!("Failed to open '{}': {e}", ctx.path));
            http::build_500_response()
        }
    }
}

/// Build the response for an opened file, honouring HEAD and `If-Modified-Since`
fn build_static_file_response(
    ctx: &RequestContext<'_>,
    resolved: ResolvedFile,
) -> Response<ResponseBody> {
    let last_modified = resolved.modified.map(cache::format_last_modified);

    if cache::not_modified_since(ctx.if_modified_since.as_deref(), resolved.modified) {
        return http::build_304_response(last_modified.as_deref(), resolved.vary);
    }

    let headers = FileHeaders {
        content_type: resolved.content_type,
        content_encoding: resolved.content_encoding.map(http::ContentEncoding::as_str),
        content_length: resolved.len,
        last_modified,
        vary: resolved.vary,
    };

    // The handle moves into the body; for HEAD it is dropped here
    let body = if ctx.is_head {
        response::empty()
    } else {
        response::stream_file(resolved.file)
    };

    response::build_file_response(&headers, body)
}
