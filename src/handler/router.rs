//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: method validation, context
//! extraction, static file dispatch and access logging.

use crate::config::AppState;
use crate::handler::static_files;
use crate::http::{self, ResponseBody};
use crate::logger::{self, AccessLogEntry};
use hyper::header::{self, HeaderMap};
use hyper::{Method, Request, Response, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    /// Raw (still percent-encoded) path, without query string
    pub path: &'a str,
    pub query: Option<&'a str>,
    pub is_head: bool,
    pub accept_encoding: Option<String>,
    pub if_modified_since: Option<String>,
}

impl<'a> RequestContext<'a> {
    pub fn from_request<B>(req: &'a Request<B>) -> Self {
        let headers = req.headers();
        Self {
            path: req.uri().path(),
            query: req.uri().query(),
            is_head: *req.method() == Method::HEAD,
            accept_encoding: header_string(headers, &header::ACCEPT_ENCODING),
            if_modified_since: header_string(headers, &header::IF_MODIFIED_SINCE),
        }
    }
}

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<ResponseBody>, Infallible> {
    let started = Instant::now();

    let response = match check_http_method(req.method()) {
        Some(resp) => resp,
        None => {
            let ctx = RequestContext::from_request(&req);
            static_files::serve(&ctx, &state).await
        }
    };

    log_access(&req, &response, peer_addr, started);
    Ok(response)
}

/// Answer non-GET/HEAD methods directly
fn check_http_method(method: &Method) -> Option<Response<ResponseBody>> {
    match *method {
        Method::GET | Method::HEAD => None,
        Method::OPTIONS => Some(http::build_options_response()),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(http::build_405_response())
        }
    }
}

fn header_string(headers: &HeaderMap, name: &header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

/// Bytes the response body puts on the wire; HEAD keeps Content-Length but sends nothing
fn body_bytes_sent(method: &Method, response: &Response<ResponseBody>) -> u64 {
    if *method == Method::HEAD {
        return 0;
    }
    response
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
        .unwrap_or(0)
}

fn log_access<B>(
    req: &Request<B>,
    response: &Response<ResponseBody>,
    peer_addr: SocketAddr,
    started: Instant,
) {
    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = match req.version() {
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        _ => "1.1",
    }
    .to_string();
    entry.status = response.status().as_u16();
    entry.body_bytes = body_bytes_sent(req.method(), response);
    entry.encoding = response
        .headers()
        .get(header::CONTENT_ENCODING)
        .and_then(|v| match v.as_bytes() {
            b"br" => Some("br"),
            b"gzip" => Some("gzip"),
            _ => None,
        });
    entry.referer = header_string(req.headers(), &header::REFERER);
    entry.user_agent = header_string(req.headers(), &header::USER_AGENT);
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
    logger::log_access(&entry);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerConfig;
    use http_body_util::BodyExt;

    fn state_for(root: &std::path::Path) -> Arc<AppState> {
        Arc::new(AppState::new(ServerConfig {
            root: root.canonicalize().unwrap(),
            port: 8000,
            bind_address: "127.0.0.1".to_string(),
        }))
    }

    fn peer() -> SocketAddr {
        "127.0.0.1:50000".parse().unwrap()
    }

    fn request(method: Method, uri: &str, headers: &[(&str, &str)]) -> Request<()> {
        let mut builder = Request::builder().method(method).uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(()).unwrap()
    }

    #[tokio::test]
    async fn test_get_streams_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("app.wasm"), vec![7u8; 1000]).unwrap();
        let state = state_for(dir.path());

        let resp = handle_request(request(Method::GET, "/app.wasm", &[]), state, peer())
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["content-type"], "application/wasm");
        assert_eq!(resp.headers()["content-length"], "1000");
        assert!(resp.headers().get("last-modified").is_some());
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(body.len(), 1000);
    }

    #[tokio::test]
    async fn test_head_has_headers_but_no_body() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), vec![b'a'; 50]).unwrap();
        let state = state_for(dir.path());

        let resp = handle_request(request(Method::HEAD, "/", &[]), state, peer())
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["content-length"], "50");
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_options_and_disallowed_methods() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_for(dir.path());

        let resp = handle_request(request(Method::OPTIONS, "/", &[]), Arc::clone(&state), peer())
            .await
            .unwrap();
        assert_eq!(resp.status(), 204);
        assert_eq!(resp.headers()["cross-origin-embedder-policy"], "require-corp");

        let resp = handle_request(request(Method::POST, "/", &[]), state, peer())
            .await
            .unwrap();
        assert_eq!(resp.status(), 405);
        assert_eq!(resp.headers()["cross-origin-opener-policy"], "same-origin");
    }

    #[tokio::test]
    async fn test_forbidden_body_does_not_leak_path() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_for(dir.path());
        let root = state.config.root.display().to_string();

        let resp = handle_request(request(Method::GET, "/%2e%2e/%2e%2e/etc/passwd", &[]), state, peer())
            .await
            .unwrap();
        assert_eq!(resp.status(), 403);
        assert_eq!(resp.headers()["access-control-allow-origin"], "*");
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        let body = String::from_utf8_lossy(&body);
        assert!(!body.contains(&root));
        assert!(!body.contains("passwd"));
    }

    #[tokio::test]
    async fn test_head_logs_no_body_bytes() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("game.data"), vec![1u8; 300]).unwrap();
        let state = state_for(dir.path());

        let resp = handle_request(request(Method::HEAD, "/game.data", &[]), Arc::clone(&state), peer())
            .await
            .unwrap();
        assert_eq!(resp.headers()["content-length"], "300");
        assert_eq!(body_bytes_sent(&Method::HEAD, &resp), 0);

        let resp = handle_request(request(Method::GET, "/game.data", &[]), state, peer())
            .await
            .unwrap();
        assert_eq!(body_bytes_sent(&Method::GET, &resp), 300);
        assert_eq!(body_bytes_sent(&Method::GET, &http::build_304_response(None, true)), 0);
    }

    #[tokio::test]
    async fn test_not_modified_keeps_vary_for_compressed_resource() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("app.wasm"), vec![0u8; 20]).unwrap();
        std::fs::write(dir.path().join("app.wasm.br"), vec![0u8; 8]).unwrap();
        let state = state_for(dir.path());

        let req = request(
            Method::GET,
            "/app.wasm",
            &[
                ("Accept-Encoding", "br"),
                ("If-Modified-Since", "Fri, 01 Jan 2100 00:00:00 GMT"),
            ],
        );
        let resp = handle_request(req, state, peer()).await.unwrap();
        assert_eq!(resp.status(), 304);
        assert_eq!(resp.headers()["vary"], "Accept-Encoding");
    }

    #[tokio::test]
    async fn test_redirect_keeps_query() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("game")).unwrap();
        let state = state_for(dir.path());

        let resp = handle_request(request(Method::GET, "/game?level=2", &[]), state, peer())
            .await
            .unwrap();
        assert_eq!(resp.status(), 301);
        assert_eq!(resp.headers()["location"], "/game/?level=2");
    }

    #[tokio::test]
    async fn test_if_modified_since_in_future_is_304() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("style.css"), b"body{}").unwrap();
        let state = state_for(dir.path());

        let req = request(
            Method::GET,
            "/style.css",
            &[("If-Modified-Since", "Fri, 01 Jan 2100 00:00:00 GMT")],
        );
        let resp = handle_request(req, state, peer()).await.unwrap();
        assert_eq!(resp.status(), 304);
        assert_eq!(resp.headers()["cross-origin-opener-policy"], "same-origin");
    }
}
