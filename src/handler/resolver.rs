//! Request path resolution
//!
//! Maps a request path to exactly one file inside the root (picking a
//! pre-compressed sibling when the client accepts it), a redirect to the
//! directory's index, or an error. Nothing outside the root is ever opened.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use tokio::fs::{self, File};

use crate::error::ResolveError;
use crate::http::mime::MimeTable;
use crate::http::{AcceptEncoding, ContentEncoding};

/// Default document for directory requests
pub const INDEX_FILE: &str = "index.html";

/// Bytes escaped when a decoded segment is written back into a URL path
const SEGMENT_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Request path after decoding and dot-segment removal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedPath {
    pub segments: Vec<String>,
    pub trailing_slash: bool,
}

impl NormalizedPath {
    /// Join onto the root; the result cannot climb above it
    pub fn to_fs_path(&self, root: &Path) -> PathBuf {
        self.segments.iter().fold(root.to_path_buf(), |p, s| p.join(s))
    }

    /// Re-encoded absolute URL path ending in `/`. Always starts with a single
    /// slash, so it can never be read as a protocol-relative URL.
    pub fn to_directory_url(&self) -> String {
        let mut url = String::from("/");
        for segment in &self.segments {
            url.extend(utf8_percent_encode(segment, SEGMENT_ENCODE_SET));
            url.push('/');
        }
        url
    }
}

/// Outcome of a successful resolution
#[derive(Debug)]
pub enum Resolution {
    File(ResolvedFile),
    /// Directory requested without a trailing slash; value is the new location
    Redirect(String),
}

/// File chosen to answer the request, already opened
#[derive(Debug)]
pub struct ResolvedFile {
    pub file: File,
    /// From the uncompressed name, whichever variant is served
    pub content_type: &'static str,
    pub content_encoding: Option<ContentEncoding>,
    /// A pre-compressed sibling exists, so the answer varies on `Accept-Encoding`
    pub vary: bool,
    pub len: u64,
    pub modified: Option<SystemTime>,
}

/// Decode and normalize a raw request path (no query string).
///
/// `..` that would leave the root, and segments containing NUL or a backslash,
/// are forbidden. Paths that are not valid UTF-8 once decoded cannot name a
/// served file.
pub fn normalize(request_path: &str) -> Result<NormalizedPath, ResolveError> {
    let decoded = percent_decode_str(request_path)
        .decode_utf8()
        .map_err(|_| ResolveError::NotFound)?;

    let mut segments: Vec<String> = Vec::new();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if segments.pop().is_none() {
                    return Err(ResolveError::Forbidden);
                }
            }
            s if s.contains(['\0', '\\']) => return Err(ResolveError::Forbidden),
            s => segments.push(s.to_string()),
        }
    }

    Ok(NormalizedPath {
        segments,
        trailing_slash: decoded.ends_with('/'),
    })
}

/// Resolve a request path against the root directory.
///
/// `root` must be canonical (see [`crate::config::ServerConfig`]).
pub async fn resolve(
    root: &Path,
    request_path: &str,
    accept: &AcceptEncoding,
    mime: &MimeTable,
) -> Result<Resolution, ResolveError> {
    let normalized = normalize(request_path)?;
    let mut path = normalized.to_fs_path(root);
    let mut file_name = normalized.segments.last().cloned();

    if fs::metadata(&path).await.is_ok_and(|m| m.is_dir()) {
        if !normalized.trailing_slash && file_name.is_some() {
            return Ok(Resolution::Redirect(normalized.to_directory_url()));
        }
        path.push(INDEX_FILE);
        file_name = Some(INDEX_FILE.to_string());
    } else if normalized.trailing_slash {
        // `name/` only ever names a directory
        return Err(ResolveError::NotFound);
    }
    let file_name = file_name.unwrap_or_else(|| INDEX_FILE.to_string());

    // A pre-compressed file requested by name is served as-is
    let mut explicit = ContentEncoding::strip_suffix(&file_name);
    if explicit.is_some() && !is_regular_file(&path).await {
        explicit = None;
    }

    let (served, encoding, vary, type_name) = match explicit {
        Some((stem, encoding)) => (path, Some(encoding), false, stem),
        None => {
            let (served, encoding, vary) = negotiate(path, accept).await?;
            (served, encoding, vary, file_name.as_str())
        }
    };
    let content_type = mime.lookup(type_name);

    let served = contain(root, &served).await?;
    let file = File::open(&served).await.map_err(ResolveError::from_fs)?;
    let metadata = file.metadata().await?;

    Ok(Resolution::File(ResolvedFile {
        file,
        content_type,
        content_encoding: encoding,
        vary,
        len: metadata.len(),
        modified: metadata.modified().ok(),
    }))
}

/// Pick brotli, then gzip, then the uncompressed file
async fn negotiate(
    path: PathBuf,
    accept: &AcceptEncoding,
) -> Result<(PathBuf, Option<ContentEncoding>, bool), ResolveError> {
    let mut chosen = None;
    let mut has_sibling = false;

    for encoding in ContentEncoding::PREFERENCE {
        let sibling = sibling_path(&path, encoding);
        if !is_regular_file(&sibling).await {
            continue;
        }
        has_sibling = true;
        if chosen.is_none() && accept.accepts(encoding) {
            chosen = Some((sibling, encoding));
        }
    }

    match chosen {
        Some((sibling, encoding)) => Ok((sibling, Some(encoding), true)),
        None if is_regular_file(&path).await => Ok((path, None, has_sibling)),
        None => Err(ResolveError::NotFound),
    }
}

/// Canonicalize and require the result to stay under the root, so symlinks
/// cannot lead outside it
async fn contain(root: &Path, path: &Path) -> Result<PathBuf, ResolveError> {
    let canonical = fs::canonicalize(path)
        .await
        .map_err(ResolveError::from_fs)?;
    if canonical.starts_with(root) {
        Ok(canonical)
    } else {
        Err(ResolveError::Forbidden)
    }
}

fn sibling_path(path: &Path, encoding: ContentEncoding) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(encoding.file_suffix());
    PathBuf::from(name)
}

async fn is_regular_file(path: &Path) -> bool {
    fs::metadata(path).await.is_ok_and(|m| m.is_file())
}
