//! Configuration loading and management

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Default maximum body size: 2 MiB
pub const DEFAULT_BODY_LIMIT: usize = 2 * 1024 * 1024;

/// Sanitization policy applied to fields flagged for XSS filtering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct XssConfig {
    /// Elements kept in the output
    pub tags: BTreeSet<String>,

    /// Attributes kept, per element (`a` -> [`href`])
    pub tag_attributes: BTreeMap<String, BTreeSet<String>>,

    /// URL schemes allowed in `href`/`src` values
    pub url_schemes: BTreeSet<String>,

    /// `rel` value forced onto links (`None` leaves links untouched)
    pub link_rel: Option<String>,

    /// Remove HTML comments
    pub strip_comments: bool,

    /// Elements removed together with their content
    pub clean_content_tags: BTreeSet<String>,
}

impl Default for XssConfig {
    fn default() -> Self {
        let set = |items: &[&str]| items.iter().map(|s| s.to_string()).collect();

        let mut tag_attributes = BTreeMap::new();
        tag_attributes.insert("a".to_string(), set(&["href"]));
        tag_attributes.insert("img".to_string(), set(&["src"]));

        Self {
            tags: set(&["a", "img", "p"]),
            tag_attributes,
            url_schemes: set(&["http", "https", "mailto"]),
            link_rel: Some("nofollow".to_string()),
            strip_comments: true,
            clean_content_tags: set(&["script", "style"]),
        }
    }
}

impl XssConfig {
    /// Check the policy for combinations the sanitizer cannot apply
    pub fn validate(&self) -> Result<()> {
        if let Some(tag) = self
            .clean_content_tags
            .iter()
            .find(|tag| self.tags.contains(*tag))
        {
            bail!(
                "tag '{}' is both allowed and listed in clean_content_tags",
                tag
            );
        }

        let rel_on_links = self
            .tag_attributes
            .get("a")
            .is_some_and(|attrs| attrs.contains("rel"));
        if rel_on_links && self.link_rel.is_some() {
            bail!("attribute 'rel' cannot be allowed on 'a' while link_rel is set");
        }

        if let Some(tag) = self
            .tag_attributes
            .keys()
            .find(|tag| !self.tags.contains(*tag))
        {
            tracing::warn!(tag = %tag, "attributes configured for a tag that is not allowed");
        }

        Ok(())
    }
}

/// Complete configuration for a binder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BinderConfig {
    /// Maximum accepted body size in bytes
    pub body_limit: usize,

    /// Methods whose body-less requests bind from the query string
    pub query_methods: Vec<String>,

    /// Policy for XSS-flagged fields
    pub xss: XssConfig,
}

impl Default for BinderConfig {
    fn default() -> Self {
        Self {
            body_limit: DEFAULT_BODY_LIMIT,
            query_methods: vec!["GET".to_string(), "DELETE".to_string(), "HEAD".to_string()],
            xss: XssConfig::default(),
        }
    }
}

impl BinderConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration for values the binder cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.body_limit == 0 {
            bail!("body_limit must be greater than zero");
        }

        self.xss.validate()
    }

    /// Whether body-less requests with this method bind from the query string
    pub fn binds_query(&self, method: &str) -> bool {
        self.query_methods
            .iter()
            .any(|m| m.eq_ignore_ascii_case(method))
    }
}
