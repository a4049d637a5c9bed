//! Request binder
//!
//! The [`Binder`] turns a request into a destination struct:
//!
//! 1. a body-less request whose method binds from the query string
//!    (`GET`, `DELETE`, `HEAD` by default) decodes the query string;
//! 2. any other request decodes its body with the decoder selected by
//!    `Content-Type` (JSON, XML or URL-encoded form);
//! 3. flagged string fields are sanitized ([`Sanitize`]);
//! 4. validation rules run ([`Validate`]).
//!
//! Any failure is returned as a [`BindError`]; nothing is partially applied.

use axum::extract::Request;
use axum::http::{HeaderMap, Method, request::Parts};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::config::BinderConfig;
use crate::core::content_type::{self, BodyFormat};
use crate::core::error::{BindError, DecodeSource};
use crate::core::validation;
use crate::core::xss::{Sanitize, XssPolicy};

/// Types the binder can populate
///
/// Implemented for every type that deserializes, validates and sanitizes.
pub trait Bindable: DeserializeOwned + Validate + Sanitize {}

impl<T: DeserializeOwned + Validate + Sanitize> Bindable for T {}

/// Framework-neutral view of the request parts the binder reads
#[derive(Debug, Clone, Copy)]
pub struct BindRequest<'a> {
    pub method: &'a Method,
    pub headers: &'a HeaderMap,
    /// Raw query string, without the leading `?`
    pub query: Option<&'a str>,
    pub body: &'a [u8],
}

impl<'a> BindRequest<'a> {
    pub fn new(
        method: &'a Method,
        headers: &'a HeaderMap,
        query: Option<&'a str>,
        body: &'a [u8],
    ) -> Self {
        Self {
            method,
            headers,
            query,
            body,
        }
    }

    /// Borrow method, headers and query from already-split request parts
    pub fn from_parts(parts: &'a Parts, body: &'a [u8]) -> Self {
        Self::new(&parts.method, &parts.headers, parts.uri.query(), body)
    }
}

/// Binds requests into destination structs
///
/// The XSS policy is compiled once, when the binder is built; clones share it.
#[derive(Debug, Clone)]
pub struct Binder {
    config: BinderConfig,
    policy: XssPolicy,
}

impl Default for Binder {
    fn default() -> Self {
        Self {
            config: BinderConfig::default(),
            policy: XssPolicy::default(),
        }
    }
}

impl Binder {
    /// Create a binder, rejecting configurations it cannot apply
    pub fn new(config: BinderConfig) -> Result<Self, BindError> {
        config
            .validate()
            .map_err(|e| BindError::Config(e.to_string()))?;
        let policy = XssPolicy::compile(&config.xss);
        Ok(Self { config, policy })
    }

    pub fn config(&self) -> &BinderConfig {
        &self.config
    }

    /// The compiled XSS policy of this binder
    pub fn policy(&self) -> &XssPolicy {
        &self.policy
    }

    /// Bind a request, choosing the source from its method and content type
    pub fn bind<T: Bindable>(&self, req: BindRequest<'_>) -> Result<T, BindError> {
        if req.body.len() > self.config.body_limit {
            tracing::debug!(
                size = req.body.len(),
                limit = self.config.body_limit,
                "request body over limit"
            );
            return Err(BindError::PayloadTooLarge {
                limit: self.config.body_limit,
            });
        }

        if req.body.is_empty() {
            if self.config.binds_query(req.method.as_str()) {
                tracing::debug!(method = %req.method, "binding from query string");
                return self.bind_query(req.query);
            }
            return Err(BindError::EmptyBody {
                method: req.method.to_string(),
            });
        }

        let raw_content_type = content_type::content_type(req.headers);
        let Some(format) = raw_content_type.and_then(BodyFormat::from_content_type) else {
            tracing::debug!(
                method = %req.method,
                content_type = ?raw_content_type,
                "no decoder for content type"
            );
            return Err(BindError::UnsupportedMediaType {
                content_type: raw_content_type.map(str::to_string),
            });
        };

        tracing::debug!(method = %req.method, format = %format, "binding from body");
        self.bind_body(format, req.body)
    }

    /// Bind a body whose format is already known
    pub fn bind_body<T: Bindable>(
        &self,
        format: BodyFormat,
        body: &[u8],
    ) -> Result<T, BindError> {
        match format {
            BodyFormat::Json => self.bind_json(body),
            BodyFormat::Xml => self.bind_xml(body),
            BodyFormat::Form => self.bind_form(body),
        }
    }

    /// Bind a JSON body
    pub fn bind_json<T: Bindable>(&self, body: &[u8]) -> Result<T, BindError> {
        let value = serde_json::from_slice(body)
            .map_err(|e| BindError::decode(DecodeSource::Body(BodyFormat::Json), e))?;
        self.finish(value)
    }

    /// Bind an XML body; the name of the root element is not checked
    pub fn bind_xml<T: Bindable>(&self, body: &[u8]) -> Result<T, BindError> {
        let source = DecodeSource::Body(BodyFormat::Xml);
        let text = std::str::from_utf8(body).map_err(|e| BindError::decode(source, e))?;
        let value = quick_xml::de::from_str(text).map_err(|e| BindError::decode(source, e))?;
        self.finish(value)
    }

    /// Bind a URL-encoded form body
    pub fn bind_form<T: Bindable>(&self, body: &[u8]) -> Result<T, BindError> {
        let value = serde_urlencoded::from_bytes(body)
            .map_err(|e| BindError::decode(DecodeSource::Body(BodyFormat::Form), e))?;
        self.finish(value)
    }

    /// Bind a query string; an absent query decodes like an empty one
    pub fn bind_query<T: Bindable>(&self, query: Option<&str>) -> Result<T, BindError> {
        let value = serde_urlencoded::from_str(query.unwrap_or_default())
            .map_err(|e| BindError::decode(DecodeSource::Query, e))?;
        self.finish(value)
    }

    /// Collect the body of an axum request and bind it
    pub async fn bind_request<T: Bindable>(&self, req: Request) -> Result<T, BindError> {
        let (parts, body) = req.into_parts();
        let limit = self.config.body_limit;

        let bytes = axum::body::to_bytes(body, limit).await.map_err(|e| {
            let inner = e.into_inner();
            if inner.is::<http_body_util::LengthLimitError>() {
                BindError::PayloadTooLarge { limit }
            } else {
                BindError::BodyRead {
                    message: inner.to_string(),
                }
            }
        })?;

        self.bind(BindRequest::from_parts(&parts, &bytes))
    }

    fn finish<T: Bindable>(&self, mut value: T) -> Result<T, BindError> {
        value.sanitize(&self.policy);
        validation::validate(&value)?;
        Ok(value)
    }
}
