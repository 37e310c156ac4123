//! Osprey URL Model
//!
//! This crate defines the URL vocabulary shared by the rest of the Osprey
//! classification engine: the four addressable URL parts, the decomposed
//! `ParsedUrl` record, and the index-based parser that produces it.
//!
//! Parsing is deliberately not a full URI implementation. Classification
//! only needs (host, path, file, query), and a single left-to-right scan
//! over the input is enough to extract them.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Number of URL parts (used for flat array indexing).
pub const URL_PART_COUNT: usize = 4;

/// The four named substrings of a URL that rule conditions can target.
///
/// The set is fixed at compile time; `ordinal()` yields a dense index so
/// per-part structures can live in flat arrays instead of maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UrlPart {
    Host,
    Path,
    File,
    Query,
}

impl UrlPart {
    /// All URL part variants in ordinal order.
    pub const ALL: [UrlPart; URL_PART_COUNT] = [
        UrlPart::Host,
        UrlPart::Path,
        UrlPart::File,
        UrlPart::Query,
    ];

    /// Returns the dense ordinal index of this part (0..4).
    pub fn ordinal(self) -> usize {
        self as usize
    }

    /// Canonical lowercase name, as used in rule files.
    pub fn name(self) -> &'static str {
        match self {
            UrlPart::Host => "host",
            UrlPart::Path => "path",
            UrlPart::File => "file",
            UrlPart::Query => "query",
        }
    }
}

impl std::str::FromStr for UrlPart {
    type Err = UnknownUrlPart;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        for part in UrlPart::ALL {
            if s.eq_ignore_ascii_case(part.name()) {
                return Ok(part);
            }
        }
        Err(UnknownUrlPart(s.to_string()))
    }
}

impl std::fmt::Display for UrlPart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a rule file names a URL part that does not exist.
#[derive(Debug, Clone, Error)]
#[error("unknown URL part: {0:?} (expected host, path, file, or query)")]
pub struct UnknownUrlPart(pub String);

impl Serialize for UrlPart {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

// Part names in rule files are case-insensitive, so a plain derive with
// `rename_all` is not enough.
impl<'de> Deserialize<'de> for UrlPart {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

/// Immutable decomposition of a URL into the four addressable parts.
///
/// Absent parts are empty strings, never missing. The host is lowercased
/// and port-stripped; the query excludes the leading `?`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParsedUrl {
    pub host: String,
    pub path: String,
    pub file: String,
    pub query: String,
}

impl ParsedUrl {
    /// Creates a parsed URL directly from its parts.
    pub fn new(
        host: impl Into<String>,
        path: impl Into<String>,
        file: impl Into<String>,
        query: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            path: path.into(),
            file: file.into(),
            query: query.into(),
        }
    }

    /// Returns the value of the given part.
    pub fn part(&self, part: UrlPart) -> &str {
        match part {
            UrlPart::Host => &self.host,
            UrlPart::Path => &self.path,
            UrlPart::File => &self.file,
            UrlPart::Query => &self.query,
        }
    }
}

/// Errors produced while decomposing a raw URL string.
#[derive(Debug, Clone, Error)]
pub enum UrlParseError {
    #[error("URL must not be blank")]
    Blank,

    #[error("could not parse host from URL: {0}")]
    NoHost(String),
}

const SCHEME_SEPARATOR: &str = "://";

/// Parses a raw URL string into its constituent parts.
///
/// The scheme is optional; `example.com/a` and `https://example.com/a`
/// decompose identically. The file part is the last path segment after the
/// final `/`, empty when the path is empty or ends in `/`.
pub fn parse(raw: &str) -> Result<ParsedUrl, UrlParseError> {
    let url = raw.trim();
    if url.is_empty() {
        return Err(UrlParseError::Blank);
    }

    let rest = match url.find(SCHEME_SEPARATOR) {
        // "://example.com" has an empty scheme and no recoverable host.
        Some(0) => return Err(UrlParseError::NoHost(raw.to_string())),
        Some(pos) => &url[pos + SCHEME_SEPARATOR.len()..],
        None => url,
    };

    let path_start = rest.find('/');
    let query_start = rest.find('?');

    let authority_end = match (path_start, query_start) {
        (Some(p), Some(q)) => p.min(q),
        (Some(p), None) => p,
        (None, Some(q)) => q,
        (None, None) => rest.len(),
    };

    let mut host = &rest[..authority_end];
    if let Some(colon) = host.find(':') {
        host = &host[..colon];
    }
    if host.is_empty() {
        return Err(UrlParseError::NoHost(raw.to_string()));
    }

    // A '?' before the first '/' means the URL has a query but no path.
    let path = match (path_start, query_start) {
        (Some(p), Some(q)) if p < q => &rest[p..q],
        (Some(p), None) => &rest[p..],
        _ => "",
    };

    let query = match query_start {
        Some(q) => &rest[q + 1..],
        None => "",
    };

    let file = match path.rfind('/') {
        Some(pos) => &path[pos + 1..],
        None => path,
    };

    Ok(ParsedUrl {
        host: host.to_lowercase(),
        path: path.to_string(),
        file: file.to_string(),
        query: query.to_string(),
    })
}
