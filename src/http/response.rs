//! HTTP response building module
//!
//! Provides builders for each status the server emits. Every builder goes
//! through [`with_common_headers`], so error responses carry the
//! cross-origin isolation headers too.

use std::io;

use futures::TryStreamExt;
use http_body_util::combinators::UnsyncBoxBody;
use http_body_util::{BodyExt, Empty, Full, StreamBody};
use hyper::body::{Bytes, Frame};
use hyper::Response;
use tokio::fs::File;
use tokio_util::io::ReaderStream;

use super::headers::{with_common_headers, ALLOWED_METHODS};

/// Read size per streamed chunk
const STREAM_CHUNK_SIZE: usize = 64 * 1024;

/// Response body: either a small in-memory buffer or a streamed file
pub type ResponseBody = UnsyncBoxBody<Bytes, io::Error>;

/// In-memory body
pub fn full(data: impl Into<Bytes>) -> ResponseBody {
    Full::new(data.into())
        .map_err(|never| match never {})
        .boxed_unsync()
}

pub fn empty() -> ResponseBody {
    Empty::<Bytes>::new()
        .map_err(|never| match never {})
        .boxed_unsync()
}

/// Stream a file in chunks. The handle is owned by the body and closed when
/// the body is dropped, whether the transfer finished or the client went away.
pub fn stream_file(file: File) -> ResponseBody {
    StreamBody::new(ReaderStream::with_capacity(file, STREAM_CHUNK_SIZE).map_ok(Frame::data))
        .boxed_unsync()
}

/// Headers describing a file about to be sent
#[derive(Debug, Clone)]
pub struct FileHeaders<'a> {
    pub content_type: &'a str,
    pub content_encoding: Option<&'a str>,
    pub content_length: u64,
    pub last_modified: Option<String>,
    /// A compressed sibling exists, so the representation depends on `Accept-Encoding`
    pub vary: bool,
}

/// Build 200 OK response for a file
pub fn build_file_response(headers: &FileHeaders<'_>, body: ResponseBody) -> Response<ResponseBody> {
    let mut builder = with_common_headers(Response::builder().status(200))
        .header("Content-Type", headers.content_type)
        .header("Content-Length", headers.content_length);

    if let Some(encoding) = headers.content_encoding {
        builder = builder.header("Content-Encoding", encoding);
    }
    if headers.vary {
        builder = builder.header("Vary", "Accept-Encoding");
    }
    if let Some(ref last_modified) = headers.last_modified {
        builder = builder.header("Last-Modified", last_modified);
    }

    builder.body(body).unwrap_or_else(|e| {
        log_build_error("200", &e);
        Response::new(empty())
    })
}

/// Build 304 Not Modified response; `vary` must match what the 200 would carry
pub fn build_304_response(last_modified: Option<&str>, vary: bool) -> Response<ResponseBody> {
    let mut builder = with_common_headers(Response::builder().status(304));
    if let Some(last_modified) = last_modified {
        builder = builder.header("Last-Modified", last_modified);
    }
    if vary {
        builder = builder.header("Vary", "Accept-Encoding");
    }
    builder.body(empty()).unwrap_or_else(|e| {
        log_build_error("304", &e);
        Response::new(empty())
    })
}

/// Build 301 redirect response (directory without trailing slash)
pub fn build_redirect_response(location: &str) -> Response<ResponseBody> {
    with_common_headers(Response::builder().status(301))
        .header("Location", location)
        .header("Content-Type", "text/plain")
        .header("Content-Length", 0)
        .body(empty())
        .unwrap_or_else(|e| {
            log_build_error("301", &e);
            Response::new(empty())
        })
}

/// Build 403 Forbidden response; the body never names a filesystem path
pub fn build_403_response() -> Response<ResponseBody> {
    build_text_response(403, "403 Forbidden")
}

/// Build 404 Not Found response
pub fn build_404_response() -> Response<ResponseBody> {
    build_text_response(404, "404 Not Found")
}

/// Build 500 Internal Server Error response
pub fn build_500_response() -> Response<ResponseBody> {
    build_text_response(500, "500 Internal Server Error")
}

/// Build 405 Method Not Allowed response
pub fn build_405_response() -> Response<ResponseBody> {
    let text = "405 Method Not Allowed";
    with_common_headers(Response::builder().status(405))
        .header("Allow", ALLOWED_METHODS)
        .header("Content-Type", "text/plain")
        .header("Content-Length", text.len())
        .body(full(text))
        .unwrap_or_else(|e| {
            log_build_error("405", &e);
            Response::new(full(text))
        })
}

/// Build OPTIONS response (preflight request)
pub fn build_options_response() -> Response<ResponseBody> {
    with_common_headers(Response::builder().status(204))
        .header("Allow", ALLOWED_METHODS)
        .header("Access-Control-Max-Age", "86400")
        .body(empty())
        .unwrap_or_else(|e| {
            log_build_error("OPTIONS", &e);
            Response::new(empty())
        })
}

fn build_text_response(status: u16, text: &'static str) -> Response<ResponseBody> {
    with_common_headers(Response::builder().status(status))
        .header("Content-Type", "text/plain")
        .header("Content-Length", text.len())
        .body(full(text))
        .unwrap_or_else(|e| {
            log_build_error(&status.to_string(), &e);
            Response::new(full(text))
        })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}
