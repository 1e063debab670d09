//! MIME type detection module
//!
//! Maps file name suffixes to Content-Type values. WebGL build artifacts need
//! types that generic tables get wrong or miss (`.wasm`, `.data`, `.unityweb`).

use std::collections::HashMap;

/// Fallback for unknown suffixes
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Built-in suffix table. Keys are lowercase and have no leading dot; compound
/// suffixes (`symbols.json`) win over their last component.
const DEFAULT_TYPES: &[(&str, &str)] = &[
    // Unity WebGL
    ("wasm", "application/wasm"),
    ("data", "application/octet-stream"),
    ("unityweb", "application/octet-stream"),
    ("symbols.json", "application/json"),
    ("mem", "application/octet-stream"),
    // Text
    ("html", "text/html; charset=utf-8"),
    ("htm", "text/html; charset=utf-8"),
    ("css", "text/css"),
    ("txt", "text/plain; charset=utf-8"),
    ("md", "text/plain; charset=utf-8"),
    ("xml", "application/xml"),
    ("csv", "text/csv"),
    // JavaScript
    ("js", "application/javascript"),
    ("mjs", "application/javascript"),
    ("json", "application/json"),
    ("map", "application/json"),
    ("webmanifest", "application/manifest+json"),
    // Images
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("svg", "image/svg+xml"),
    ("ico", "image/x-icon"),
    ("webp", "image/webp"),
    ("avif", "image/avif"),
    ("ktx2", "image/ktx2"),
    // Video
    ("mp4", "video/mp4"),
    ("webm", "video/webm"),
    ("ogv", "video/ogg"),
    ("mov", "video/quicktime"),
    // Audio
    ("mp3", "audio/mpeg"),
    ("wav", "audio/wav"),
    ("ogg", "audio/ogg"),
    ("flac", "audio/flac"),
    ("m4a", "audio/mp4"),
    // Fonts
    ("woff", "font/woff"),
    ("woff2", "font/woff2"),
    ("ttf", "font/ttf"),
    ("otf", "font/otf"),
    ("eot", "application/vnd.ms-fontobject"),
    // Archives
    ("pdf", "application/pdf"),
    ("zip", "application/zip"),
];

/// Suffix → Content-Type table, built once at startup and shared read-only
#[derive(Debug, Clone)]
pub struct MimeTable {
    types: HashMap<&'static str, &'static str>,
}

impl MimeTable {
    pub fn new() -> Self {
        Self {
            types: DEFAULT_TYPES.iter().copied().collect(),
        }
    }

    /// Content type for a file name, matched case-insensitively on the longest
    /// known dotted suffix
    ///
    /// # Examples
    /// ```
    /// use webgl_serve::http::mime::MimeTable;
    /// let table = MimeTable::new();
    /// assert_eq!(table.lookup("game.wasm"), "application/wasm");
    /// assert_eq!(table.lookup("game.symbols.json"), "application/json");
    /// assert_eq!(table.lookup("README"), "application/octet-stream");
    /// ```
    pub fn lookup(&self, file_name: &str) -> &'static str {
        let lower = file_name.to_ascii_lowercase();
        lower
            .match_indices('.')
            .filter_map(|(i, _)| self.types.get(&lower[i + 1..]))
            .copied()
            .next()
            .unwrap_or(DEFAULT_CONTENT_TYPE)
    }
}

impl Default for MimeTable {
    fn default() -> Self {
        Self::new()
    }
}
