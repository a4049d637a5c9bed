//! # This-Binder
//!
//! Request data binding for axum: decode a request into a typed struct,
//! sanitize the fields flagged for cross-site-scripting filtering and run the
//! struct's declarative validation rules.
//!
//! ## Features
//!
//! - **Content-Type Dispatch**: JSON, XML and URL-encoded form bodies
//! - **Query Fallback**: body-less `GET`/`DELETE`/`HEAD` requests bind from the query string
//! - **Custom Unmarshal Hooks**: per-type text parsers via [`UnmarshalForm`](core::UnmarshalForm)
//! - **Validation**: `validator` derive rules, flattened into per-field errors
//! - **XSS Filtering**: flagged fields cleaned by an ammonia policy, nested structs walked
//! - **Configuration-Based**: limits and sanitization policy from YAML
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use this_binder::prelude::*;
//!
//! #[derive(Default)]
//! struct Price(i64);
//!
//! impl UnmarshalForm for Price {
//!     fn unmarshal_form(text: &str) -> Result<Self, String> {
//!         text.parse().map(Price).map_err(|e| format!("invalid price: {}", e))
//!     }
//! }
//!
//! #[derive(Deserialize, Validate)]
//! struct User {
//!     #[validate(length(min = 1))]
//!     name: String,
//!     #[validate(email)]
//!     email: String,
//!     #[serde(default)]
//!     bio: String,
//!     #[serde(default, deserialize_with = "unmarshal_form")]
//!     price: Price,
//! }
//!
//! impl_sanitize!(leaf Price);
//! impl_sanitize!(User {
//!     name,
//!     email,
//!     bio: xss,
//!     price,
//! });
//!
//! async fn create_user(Bound(user): Bound<User>) -> String {
//!     user.name
//! }
//!
//! let app = Router::new().route("/users", post(create_user));
//! ```

pub mod config;
pub mod core;
pub mod macros;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Binder ===
    pub use crate::core::{
        binder::{BindRequest, Bindable, Binder},
        content_type::BodyFormat,
        extractors::{Bound, default_binder},
    };

    // === Hooks ===
    pub use crate::core::{
        unmarshal::{UnmarshalForm, unmarshal_form, unmarshal_form_opt},
        xss::{Sanitize, XssField, XssPolicy},
    };

    // === Errors ===
    pub use crate::core::error::{BindError, DecodeSource, ErrorResponse, FieldValidationError};

    // === Macros ===
    pub use crate::{impl_sanitize, impl_unmarshal_form};

    // === Config ===
    pub use crate::config::{BinderConfig, XssConfig};

    // === External dependencies ===
    pub use serde::{Deserialize, Serialize};
    pub use validator::Validate;

    // === Axum ===
    pub use axum::{
        Extension, Router,
        routing::{delete, get, post, put},
    };
}
