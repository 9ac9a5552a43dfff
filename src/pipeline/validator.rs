//! Response validators run after transmission and before decoding.

use crate::error::{NetworkError, NetworkResult};
use crate::http::{HeaderAliases, HeaderField, ResponseMetadata, StatusCategory};
use bytes::Bytes;
use http::StatusCode;
use parking_lot::RwLock;
use std::sync::Arc;

pub trait ResponseValidator: Send + Sync {
    fn validate(&self, response: &ResponseMetadata, body: &Bytes) -> NetworkResult<()>;

    fn description(&self) -> &str;
}

/// Accepts a status category or an explicit set of codes
#[derive(Debug, Clone)]
pub enum StatusCodeValidator {
    Category(StatusCategory),
    OneOf(Vec<StatusCode>),
}

impl StatusCodeValidator {
    pub fn success() -> Self {
        Self::Category(StatusCategory::Success)
    }

    pub fn one_of(codes: impl IntoIterator<Item = StatusCode>) -> Self {
        Self::OneOf(codes.into_iter().collect())
    }
}

impl ResponseValidator for StatusCodeValidator {
    fn validate(&self, response: &ResponseMetadata, _body: &Bytes) -> NetworkResult<()> {
        let accepted = match self {
            Self::Category(category) => response.category() == *category,
            Self::OneOf(codes) => codes.contains(&response.status),
        };
        if accepted {
            Ok(())
        } else {
            Err(NetworkError::validation(
                self.description(),
                format!("unacceptable status {}", response.status),
            ))
        }
    }

    fn description(&self) -> &str {
        "status_code"
    }
}

/// Accepts listed media types; `type/*` matches any subtype
///
/// Only the essence (`type/subtype`) of the Content-Type is compared, case-insensitively.
#[derive(Debug, Clone)]
pub struct ContentTypeValidator {
    accepted: Vec<String>,
    aliases: HeaderAliases,
}

impl ContentTypeValidator {
    pub fn new<I, S>(accepted: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            accepted: accepted
                .into_iter()
                .map(|s| s.as_ref().trim().to_ascii_lowercase())
                .collect(),
            aliases: HeaderAliases::default(),
        }
    }

    pub fn json() -> Self {
        Self::new(["application/json"])
    }

    pub fn with_aliases(mut self, aliases: HeaderAliases) -> Self {
        self.aliases = aliases;
        self
    }

    fn matches(&self, essence: &str) -> bool {
        self.accepted.iter().any(|pattern| match pattern.strip_suffix("/*") {
            Some(top_level) => essence
                .split_once('/')
                .is_some_and(|(kind, _)| kind == top_level),
            None => pattern == "*/*" || pattern == essence,
        })
    }
}

fn essence(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

impl ResponseValidator for ContentTypeValidator {
    fn validate(&self, response: &ResponseMetadata, _body: &Bytes) -> NetworkResult<()> {
        let Some(content_type) = self.aliases.get(&response.headers, HeaderField::ContentType)
        else {
            return Err(NetworkError::validation(
                self.description(),
                "missing Content-Type",
            ));
        };
        let essence = essence(content_type);
        if self.matches(&essence) {
            Ok(())
        } else {
            Err(NetworkError::validation(
                self.description(),
                format!("unexpected content type {essence}"),
            ))
        }
    }

    fn description(&self) -> &str {
        "content_type"
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NonEmptyBodyValidator;

impl ResponseValidator for NonEmptyBodyValidator {
    fn validate(&self, _response: &ResponseMetadata, body: &Bytes) -> NetworkResult<()> {
        if body.is_empty() {
            Err(NetworkError::validation(self.description(), "empty body"))
        } else {
            Ok(())
        }
    }

    fn description(&self) -> &str {
        "non_empty_body"
    }
}

/// Ordered validators; all must pass, the first failure wins
#[derive(Default)]
pub struct ValidatorChain {
    validators: RwLock<Vec<Arc<dyn ResponseValidator>>>,
}

impl std::fmt::Debug for ValidatorChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<String> = self
            .validators
            .read()
            .iter()
            .map(|v| v.description().to_string())
            .collect();
        f.debug_struct("ValidatorChain")
            .field("validators", &names)
            .finish()
    }
}

impl ValidatorChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, validator: Arc<dyn ResponseValidator>) {
        self.validators.write().push(validator);
    }

    pub fn clear(&self) {
        self.validators.write().clear();
    }

    pub fn len(&self) -> usize {
        self.validators.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.read().is_empty()
    }

    pub fn validate(&self, response: &ResponseMetadata, body: &Bytes) -> NetworkResult<()> {
        let validators = self.validators.read().clone();
        validators
            .iter()
            .try_for_each(|validator| validator.validate(response, body))
    }
}
