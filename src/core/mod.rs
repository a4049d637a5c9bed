//! Core module containing the binder, its hooks and its error type

pub mod binder;
pub mod content_type;
pub mod error;
pub mod extractors;
pub mod unmarshal;
pub mod validation;
pub mod xss;

pub use binder::{BindRequest, Bindable, Binder};
pub use content_type::BodyFormat;
pub use error::{BindError, DecodeSource, ErrorResponse, FieldValidationError};
pub use extractors::{Bound, default_binder};
pub use unmarshal::{UnmarshalForm, unmarshal_form, unmarshal_form_opt};
pub use xss::{Sanitize, XssField, XssPolicy};
