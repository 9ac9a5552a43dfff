//! Cache-Control directive parsing.
//!
//! Grammar: comma- or space-separated tokens of the form `name` or `name=integer`.
//! Unknown directives are ignored; values that are not integers leave the directive unset.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheControl {
    pub no_cache: bool,
    pub no_store: bool,
    pub private: bool,
    pub public: bool,
    pub must_revalidate: bool,
    pub max_age: Option<u64>,
    pub s_maxage: Option<u64>,
}

impl CacheControl {
    pub fn parse(header: &str) -> Self {
        let mut control = Self::default();

        let tokens = header
            .split(|c: char| c == ',' || c.is_whitespace())
            .map(str::trim)
            .filter(|token| !token.is_empty());

        for token in tokens {
            let (name, value) = match token.split_once('=') {
                Some((name, value)) => (name.trim(), Some(value.trim().trim_matches('"'))),
                None => (token, None),
            };

            match name.to_ascii_lowercase().as_str() {
                // no-cache="field" still forbids reuse without revalidation
                "no-cache" => control.no_cache = true,
                "no-store" => control.no_store = true,
                "private" => control.private = true,
                "public" => control.public = true,
                "must-revalidate" => control.must_revalidate = true,
                "max-age" => control.max_age = value.and_then(|v| v.parse().ok()),
                "s-maxage" => control.s_maxage = value.and_then(|v| v.parse().ok()),
                _ => {}
            }
        }

        control
    }

    /// `no-cache` and `no-store` both rule out serving the stored response
    pub fn allows_caching(&self) -> bool {
        !self.no_cache && !self.no_store
    }

    /// Freshness lifetime in seconds; `s-maxage` wins over `max-age`
    pub fn freshness_lifetime(&self) -> Option<u64> {
        self.s_maxage.or(self.max_age)
    }
}
