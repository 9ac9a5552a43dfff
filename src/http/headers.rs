//! Semantic header fields and their configurable name aliases.
//!
//! Deployments disagree on the names of some fields (most visibly the refresh hints), so
//! every lookup goes through [`HeaderAliases`], which maps one semantic field to an ordered
//! list of header names. The first alias that is present wins. `HeaderMap` lookups are
//! case-insensitive.

use crate::constants::header_aliases;
use http::header::{HeaderMap, HeaderName};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderField {
    CacheControl,
    Expires,
    Date,
    Age,
    #[serde(rename = "etag")]
    ETag,
    LastModified,
    ContentLanguage,
    AcceptLanguage,
    IfNoneMatch,
    IfModifiedSince,
    ContentType,
    NextRefresh,
    Backoff,
}

impl HeaderField {
    pub const ALL: [HeaderField; 13] = [
        Self::CacheControl,
        Self::Expires,
        Self::Date,
        Self::Age,
        Self::ETag,
        Self::LastModified,
        Self::ContentLanguage,
        Self::AcceptLanguage,
        Self::IfNoneMatch,
        Self::IfModifiedSince,
        Self::ContentType,
        Self::NextRefresh,
        Self::Backoff,
    ];

    pub fn default_aliases(&self) -> &'static [&'static str] {
        match self {
            Self::CacheControl => header_aliases::CACHE_CONTROL,
            Self::Expires => header_aliases::EXPIRES,
            Self::Date => header_aliases::DATE,
            Self::Age => header_aliases::AGE,
            Self::ETag => header_aliases::ETAG,
            Self::LastModified => header_aliases::LAST_MODIFIED,
            Self::ContentLanguage => header_aliases::CONTENT_LANGUAGE,
            Self::AcceptLanguage => header_aliases::ACCEPT_LANGUAGE,
            Self::IfNoneMatch => header_aliases::IF_NONE_MATCH,
            Self::IfModifiedSince => header_aliases::IF_MODIFIED_SINCE,
            Self::ContentType => header_aliases::CONTENT_TYPE,
            Self::NextRefresh => header_aliases::NEXT_REFRESH,
            Self::Backoff => header_aliases::BACKOFF,
        }
    }
}

impl fmt::Display for HeaderField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.default_aliases()[0])
    }
}

/// Header-name aliases per semantic field, injected through configuration
///
/// Fields missing from `overrides` use [`HeaderField::default_aliases`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderAliases {
    pub overrides: HashMap<HeaderField, Vec<String>>,
}

impl HeaderAliases {
    /// Replace the alias list for one field
    pub fn with_aliases<I, S>(mut self, field: HeaderField, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.overrides
            .insert(field, names.into_iter().map(Into::into).collect());
        self
    }

    /// All names accepted for `field`, in priority order
    pub fn names(&self, field: HeaderField) -> Vec<&str> {
        match self.overrides.get(&field) {
            Some(names) if !names.is_empty() => names.iter().map(String::as_str).collect(),
            _ => field.default_aliases().to_vec(),
        }
    }

    /// First value present under any alias of `field`
    pub fn get<'h>(&self, headers: &'h HeaderMap, field: HeaderField) -> Option<&'h str> {
        self.names(field)
            .into_iter()
            .filter_map(|name| headers.get(name))
            .find_map(|value| value.to_str().ok())
            .map(str::trim)
    }

    /// All values of the first alias present, joined with `", "`
    ///
    /// Used for list-valued fields such as Cache-Control that may be split across
    /// several header lines.
    pub fn get_joined(&self, headers: &HeaderMap, field: HeaderField) -> Option<String> {
        self.names(field).into_iter().find_map(|name| {
            let values: Vec<&str> = headers
                .get_all(name)
                .iter()
                .filter_map(|value| value.to_str().ok())
                .collect();
            (!values.is_empty()).then(|| values.join(", "))
        })
    }

    pub fn contains(&self, headers: &HeaderMap, field: HeaderField) -> bool {
        self.names(field)
            .into_iter()
            .any(|name| headers.contains_key(name))
    }

    /// Header name used when writing `field` into a request or entry
    pub fn canonical_name(&self, field: HeaderField) -> Option<HeaderName> {
        self.names(field)
            .into_iter()
            .find_map(|name| HeaderName::from_bytes(name.as_bytes()).ok())
    }

    /// Verify every configured alias is a syntactically valid header name
    pub fn validate(&self) -> Result<(), String> {
        for (field, names) in &self.overrides {
            for name in names {
                if HeaderName::from_bytes(name.as_bytes()).is_err() {
                    return Err(format!("invalid header name '{name}' for {field}"));
                }
            }
        }
        Ok(())
    }
}
