//! Content-Encoding negotiation module
//!
//! Parses `Accept-Encoding` by exact coding tokens with quality values and
//! knows which on-disk suffix belongs to which coding.

/// Codings the server can serve from pre-compressed siblings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentEncoding {
    Brotli,
    Gzip,
}

impl ContentEncoding {
    /// Negotiation order, most preferred first
    pub const PREFERENCE: [Self; 2] = [Self::Brotli, Self::Gzip];

    /// `Content-Encoding` header value
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Brotli => "br",
            Self::Gzip => "gzip",
        }
    }

    /// Suffix of the pre-compressed sibling file, including the dot
    pub const fn file_suffix(self) -> &'static str {
        match self {
            Self::Brotli => ".br",
            Self::Gzip => ".gz",
        }
    }

    /// Split a pre-compressed file name into its inner name and coding
    ///
    /// `app.wasm.br` → `("app.wasm", Brotli)`. A bare `.gz` has no inner name
    /// and is not treated as pre-compressed.
    pub fn strip_suffix(file_name: &str) -> Option<(&str, Self)> {
        Self::PREFERENCE.into_iter().find_map(|encoding| {
            let suffix = encoding.file_suffix();
            let split = file_name.len().checked_sub(suffix.len())?;
            let (stem, tail) = (file_name.get(..split)?, file_name.get(split..)?);
            (!stem.is_empty() && tail.eq_ignore_ascii_case(suffix)).then_some((stem, encoding))
        })
    }
}

/// Parsed `Accept-Encoding` request header
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AcceptEncoding {
    /// (lowercase coding, quality) in header order
    entries: Vec<(String, f32)>,
}

impl AcceptEncoding {
    /// Parse the header value. A missing header accepts nothing but identity.
    ///
    /// # Examples
    /// ```
    /// use webgl_serve::http::{AcceptEncoding, ContentEncoding};
    /// let accept = AcceptEncoding::parse(Some("gzip, br;q=0"));
    /// assert!(accept.accepts(ContentEncoding::Gzip));
    /// assert!(!accept.accepts(ContentEncoding::Brotli));
    /// ```
    pub fn parse(header: Option<&str>) -> Self {
        let entries = header
            .unwrap_or_default()
            .split(',')
            .filter_map(parse_entry)
            .collect();
        Self { entries }
    }

    /// Whether the client will accept the coding
    pub fn accepts(&self, encoding: ContentEncoding) -> bool {
        self.quality(encoding.as_str()) > 0.0
    }

    /// Explicit entries win over `*`; unlisted codings are not acceptable
    fn quality(&self, coding: &str) -> f32 {
        let explicit = self
            .entries
            .iter()
            .find(|(name, _)| name == coding)
            .map(|(_, q)| *q);
        explicit
            .or_else(|| {
                self.entries
                    .iter()
                    .find(|(name, _)| name == "*")
                    .map(|(_, q)| *q)
            })
            .unwrap_or(0.0)
    }
}

/// Parse one `coding[;q=value]` element; malformed elements are dropped
fn parse_entry(element: &str) -> Option<(String, f32)> {
    let mut parts = element.split(';');
    let coding = parts.next()?.trim().to_ascii_lowercase();
    if coding.is_empty() || !coding.bytes().all(is_token_byte) {
        return None;
    }

    let mut quality = 1.0;
    for param in parts {
        let Some((name, value)) = param.split_once('=') else {
            return None;
        };
        if name.trim().eq_ignore_ascii_case("q") {
            quality = parse_quality(value.trim())?;
        }
    }
    Some((coding, quality))
}

/// `qvalue = ( "0" [ "." 0*3DIGIT ] ) / ( "1" [ "." 0*3("0") ] )`
fn parse_quality(value: &str) -> Option<f32> {
    let (int, frac) = value.split_once('.').unwrap_or((value, ""));
    if frac.len() > 3 || !frac.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    match int {
        "0" => value.parse().ok(),
        "1" if frac.bytes().all(|b| b == b'0') => Some(1.0),
        _ => None,
    }
}

const fn is_token_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b'+' | b'!' | b'*')
}
