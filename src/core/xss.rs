//! Cross-site-scripting filter for bound structs
//!
//! Struct types opt in by implementing [`Sanitize`], usually through the
//! [`impl_sanitize!`](crate::impl_sanitize) macro:
//!
//! ```rust,ignore
//! #[derive(Deserialize, Validate)]
//! struct Comment {
//!     author: String,
//!     body: String,
//!     links: Vec<String>,
//!     reply_to: Option<Quote>,
//! }
//!
//! impl_sanitize!(Comment {
//!     author,
//!     body: xss,
//!     links: xss,
//!     reply_to,
//! });
//! ```
//!
//! Fields marked `xss` are replaced by the policy's output. Every other field
//! is walked recursively, so flagged fields of nested structs are always
//! reached. Unflagged strings are left alone.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::sync::{Arc, Mutex, OnceLock};

use crate::config::XssConfig;
use crate::core::error::BindError;

static INTERNED: OnceLock<Mutex<HashSet<&'static str>>> = OnceLock::new();

/// Policy vocabulary (tag, attribute and scheme names) lives for the whole
/// process; each distinct name is allocated once.
fn intern(value: &str) -> &'static str {
    let mut interned = INTERNED
        .get_or_init(Default::default)
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());

    if let Some(existing) = interned.get(value) {
        return existing;
    }
    let leaked: &'static str = Box::leak(value.to_owned().into_boxed_str());
    interned.insert(leaked);
    leaked
}

fn intern_all<'s>(values: impl IntoIterator<Item = &'s String>) -> HashSet<&'static str> {
    values.into_iter().map(|v| intern(v)).collect()
}

/// Compiled HTML sanitization policy
///
/// Cheap to clone; clones share the compiled rules.
#[derive(Clone)]
pub struct XssPolicy {
    builder: Arc<ammonia::Builder<'static>>,
}

impl XssPolicy {
    /// Check and compile a policy from its configuration
    pub fn from_config(config: &XssConfig) -> Result<Self, BindError> {
        config
            .validate()
            .map_err(|e| BindError::Config(e.to_string()))?;
        Ok(Self::compile(config))
    }

    /// Compile a policy that already passed [`XssConfig::validate`]
    pub(crate) fn compile(config: &XssConfig) -> Self {
        let tag_attributes: HashMap<&'static str, HashSet<&'static str>> = config
            .tag_attributes
            .iter()
            .map(|(tag, attrs)| (intern(tag), intern_all(attrs)))
            .collect();

        let mut builder = ammonia::Builder::empty();
        builder
            .tags(intern_all(&config.tags))
            .tag_attributes(tag_attributes)
            .url_schemes(intern_all(&config.url_schemes))
            .link_rel(config.link_rel.as_deref().map(intern))
            .strip_comments(config.strip_comments)
            .clean_content_tags(intern_all(&config.clean_content_tags));

        Self {
            builder: Arc::new(builder),
        }
    }

    /// Sanitize an HTML fragment
    pub fn sanitize(&self, input: &str) -> String {
        self.builder.clean(input).to_string()
    }
}

impl Default for XssPolicy {
    fn default() -> Self {
        Self::compile(&XssConfig::default())
    }
}

impl fmt::Debug for XssPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("XssPolicy").finish_non_exhaustive()
    }
}

/// Recursive XSS walk over a bound value
pub trait Sanitize {
    fn sanitize(&mut self, policy: &XssPolicy);
}

/// A field flagged for XSS filtering
pub trait XssField {
    fn filter_xss(&mut self, policy: &XssPolicy);
}

impl XssField for String {
    fn filter_xss(&mut self, policy: &XssPolicy) {
        *self = policy.sanitize(self);
    }
}

impl<T: XssField> XssField for Option<T> {
    fn filter_xss(&mut self, policy: &XssPolicy) {
        if let Some(inner) = self {
            inner.filter_xss(policy);
        }
    }
}

impl<T: XssField> XssField for Vec<T> {
    fn filter_xss(&mut self, policy: &XssPolicy) {
        for item in self {
            item.filter_xss(policy);
        }
    }
}

impl<T: Sanitize> Sanitize for Option<T> {
    fn sanitize(&mut self, policy: &XssPolicy) {
        if let Some(inner) = self {
            inner.sanitize(policy);
        }
    }
}

impl<T: Sanitize> Sanitize for Vec<T> {
    fn sanitize(&mut self, policy: &XssPolicy) {
        for item in self {
            item.sanitize(policy);
        }
    }
}

impl<K, V: Sanitize> Sanitize for HashMap<K, V> {
    fn sanitize(&mut self, policy: &XssPolicy) {
        for value in self.values_mut() {
            value.sanitize(policy);
        }
    }
}

impl<K, V: Sanitize> Sanitize for BTreeMap<K, V> {
    fn sanitize(&mut self, policy: &XssPolicy) {
        for value in self.values_mut() {
            value.sanitize(policy);
        }
    }
}

impl<T: Sanitize + ?Sized> Sanitize for Box<T> {
    fn sanitize(&mut self, policy: &XssPolicy) {
        (**self).sanitize(policy);
    }
}

// Leaf types have nothing to walk; an unflagged String stays untouched.
crate::impl_sanitize!(
    leaf String, bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32,
    f64,
);
