//! Headers attached to every response
//!
//! Cross-origin isolation (`COOP`/`COEP`) lets WebGL builds use
//! `SharedArrayBuffer` and high-resolution timers; the CORS headers keep the
//! assets loadable from other local origins during development.

use hyper::http::response::Builder;

/// Allowed methods, as advertised in `Allow` and CORS responses
pub const ALLOWED_METHODS: &str = "GET, HEAD, OPTIONS";

/// Fixed header set, in the order they are written
pub const COMMON_HEADERS: [(&str, &str); 6] = [
    ("Access-Control-Allow-Origin", "*"),
    ("Access-Control-Allow-Methods", ALLOWED_METHODS),
    ("Access-Control-Allow-Headers", "Content-Type"),
    ("Cross-Origin-Opener-Policy", "same-origin"),
    ("Cross-Origin-Embedder-Policy", "require-corp"),
    ("Cross-Origin-Resource-Policy", "cross-origin"),
];

/// Add the fixed header set to a response under construction
pub fn with_common_headers(builder: Builder) -> Builder {
    COMMON_HEADERS
        .iter()
        .fold(builder, |b, (name, value)| b.header(*name, *value))
}
