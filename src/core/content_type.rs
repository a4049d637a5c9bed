//! Content-type sniffing
//!
//! Maps a request's `Content-Type` header onto the body decoder to use.

use axum::http::{HeaderMap, header::CONTENT_TYPE};
use std::fmt;

/// Body encodings the binder knows how to decode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyFormat {
    Json,
    Xml,
    Form,
}

impl BodyFormat {
    /// Resolve a content type value (`application/json; charset=utf-8`, ...)
    ///
    /// Parameters are ignored and the comparison is case-insensitive.
    /// Structured syntax suffixes (`application/problem+json`,
    /// `application/atom+xml`) resolve to their base format.
    pub fn from_content_type(value: &str) -> Option<Self> {
        let essence = value.split(';').next().unwrap_or_default().trim();
        let essence = essence.to_ascii_lowercase();

        match essence.as_str() {
            "application/json" => Some(BodyFormat::Json),
            "application/xml" | "text/xml" => Some(BodyFormat::Xml),
            "application/x-www-form-urlencoded" => Some(BodyFormat::Form),
            other if other.ends_with("+json") => Some(BodyFormat::Json),
            other if other.ends_with("+xml") => Some(BodyFormat::Xml),
            _ => None,
        }
    }

    /// Resolve the `Content-Type` header of a request, if present
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        content_type(headers).and_then(Self::from_content_type)
    }

    /// Canonical MIME type for this format
    pub fn mime(&self) -> &'static str {
        match self {
            BodyFormat::Json => "application/json",
            BodyFormat::Xml => "application/xml",
            BodyFormat::Form => "application/x-www-form-urlencoded",
        }
    }
}

impl fmt::Display for BodyFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BodyFormat::Json => write!(f, "json"),
            BodyFormat::Xml => write!(f, "xml"),
            BodyFormat::Form => write!(f, "form"),
        }
    }
}

/// The raw `Content-Type` header; a non-visible-ASCII value counts as absent
pub(crate) fn content_type(headers: &HeaderMap) -> Option<&str> {
    headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_plain_types() {
        assert_eq!(
            BodyFormat::from_content_type("application/json"),
            Some(BodyFormat::Json)
        );
        assert_eq!(
            BodyFormat::from_content_type("application/xml"),
            Some(BodyFormat::Xml)
        );
        assert_eq!(
            BodyFormat::from_content_type("text/xml"),
            Some(BodyFormat::Xml)
        );
        assert_eq!(
            BodyFormat::from_content_type("application/x-www-form-urlencoded"),
            Some(BodyFormat::Form)
        );
    }

    #[test]
    fn test_parameters_and_case_are_ignored() {
        assert_eq!(
            BodyFormat::from_content_type("Application/JSON; charset=UTF-8"),
            Some(BodyFormat::Json)
        );
        assert_eq!(
            BodyFormat::from_content_type(" text/xml ;charset=utf-8"),
            Some(BodyFormat::Xml)
        );
    }

    #[test]
    fn test_structured_suffixes() {
        assert_eq!(
            BodyFormat::from_content_type("application/problem+json"),
            Some(BodyFormat::Json)
        );
        assert_eq!(
            BodyFormat::from_content_type("application/atom+xml"),
            Some(BodyFormat::Xml)
        );
    }

    #[test]
    fn test_unknown_types() {
        assert_eq!(BodyFormat::from_content_type("text/plain"), None);
        assert_eq!(BodyFormat::from_content_type("multipart/form-data; boundary=x"), None);
        assert_eq!(BodyFormat::from_content_type(""), None);
    }

    #[test]
    fn test_from_headers() {
        let mut headers = HeaderMap::new();
        assert_eq!(BodyFormat::from_headers(&headers), None);

        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        assert_eq!(BodyFormat::from_headers(&headers), Some(BodyFormat::Json));

        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_bytes(b"application/json\xff").unwrap(),
        );
        assert_eq!(BodyFormat::from_headers(&headers), None);
    }

    #[test]
    fn test_mime_resolves_back() {
        for format in [BodyFormat::Json, BodyFormat::Xml, BodyFormat::Form] {
            assert_eq!(BodyFormat::from_content_type(format.mime()), Some(format));
        }
    }
}
