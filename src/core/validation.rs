//! Declarative validation
//!
//! Rules are declared with `validator`'s derive on the destination type:
//!
//! ```rust,ignore
//! #[derive(Deserialize, Validate)]
//! struct User {
//!     #[validate(length(min = 1))]
//!     name: String,
//!     #[validate(range(min = 0, max = 130))]
//!     age: i32,
//!     #[validate(email)]
//!     email: String,
//!     #[validate(nested)]
//!     address: Address,
//! }
//! ```
//!
//! Failures are flattened into one [`FieldValidationError`] per broken rule,
//! keyed by the dotted path of the field.

use std::collections::BTreeMap;

use validator::{Validate, ValidationErrors, ValidationErrorsKind};

use crate::core::error::{BindError, FieldValidationError};

/// Run the validation rules of `value`
pub fn validate<T: Validate>(value: &T) -> Result<(), BindError> {
    value.validate().map_err(|errors| {
        let fields = flatten_errors(&errors);
        tracing::debug!(failed = fields.len(), "validation failed");
        BindError::Validation(fields)
    })
}

/// Flatten nested validation errors, sorted by field path
pub fn flatten_errors(errors: &ValidationErrors) -> Vec<FieldValidationError> {
    let mut out = Vec::new();
    collect(errors, "", &mut out);
    out.sort_by(|a, b| a.field.cmp(&b.field).then_with(|| a.code.cmp(&b.code)));
    out
}

fn collect(errors: &ValidationErrors, prefix: &str, out: &mut Vec<FieldValidationError>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", prefix, field)
        };

        match kind {
            ValidationErrorsKind::Field(failures) => {
                out.extend(failures.iter().map(|failure| FieldValidationError {
                    field: path.clone(),
                    code: failure.code.to_string(),
                    message: failure
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| describe(&failure.code, &failure.params)),
                }));
            }
            ValidationErrorsKind::Struct(inner) => collect(inner, &path, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect(inner, &format!("{}[{}]", path, index), out);
                }
            }
        }
    }
}

fn describe<K, V>(code: &str, params: &std::collections::HashMap<K, V>) -> String
where
    K: AsRef<str>,
    V: std::fmt::Display,
{
    // `value` echoes the input back; leave it out of the message
    let bounds: BTreeMap<&str, String> = params
        .iter()
        .filter(|(k, _)| k.as_ref() != "value")
        .map(|(k, v)| (k.as_ref(), v.to_string()))
        .collect();

    if bounds.is_empty() {
        format!("failed '{}' check", code)
    } else {
        let bounds: Vec<String> = bounds.iter().map(|(k, v)| format!("{} = {}", k, v)).collect();
        format!("failed '{}' check ({})", code, bounds.join(", "))
    }
}
