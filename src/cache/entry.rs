use crate::http::{HeaderAliases, HeaderField, HttpRequest, ResponseMetadata};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use http::header::{CONTENT_LENGTH, TRANSFER_ENCODING};
use http::{HeaderMap, Method, StatusCode};
use serde::{Deserialize, Serialize};

/// Where a response may be kept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoragePolicy {
    #[default]
    Allowed,
    AllowedInMemoryOnly,
    NotAllowed,
}

impl StoragePolicy {
    pub fn is_storable(&self) -> bool {
        !matches!(self, Self::NotAllowed)
    }
}

/// Auxiliary data recorded alongside a stored response
#[derive(Debug, Clone, PartialEq)]
pub struct EntryMetadata {
    /// Method of the request that produced the response
    pub method: Method,
    /// Accept-Language sent with that request
    pub accept_language: Option<String>,
    pub stored_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CachedEntry {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
    pub metadata: EntryMetadata,
    pub storage_policy: StoragePolicy,
}

impl CachedEntry {
    pub fn from_response(
        request: &HttpRequest,
        response: &ResponseMetadata,
        body: Bytes,
        storage_policy: StoragePolicy,
        stored_at: DateTime<Utc>,
        aliases: &HeaderAliases,
    ) -> Self {
        Self {
            status: response.status,
            headers: response.headers.clone(),
            body,
            metadata: EntryMetadata {
                method: request.method.clone(),
                accept_language: aliases
                    .get(&request.headers, HeaderField::AcceptLanguage)
                    .map(str::to_string),
                stored_at,
            },
            storage_policy,
        }
    }

    /// Fold the headers of a `304 Not Modified` into this entry.
    ///
    /// Framing headers describe the empty 304 body, not the stored one, and are skipped.
    pub fn merge_not_modified(&mut self, headers: &HeaderMap, now: DateTime<Utc>) {
        for name in headers.keys() {
            if name == CONTENT_LENGTH || name == TRANSFER_ENCODING {
                continue;
            }
            self.headers.remove(name);
            for value in headers.get_all(name) {
                self.headers.append(name.clone(), value.clone());
            }
        }
        self.metadata.stored_at = now;
    }

    pub fn response_metadata(&self, url: impl Into<String>) -> ResponseMetadata {
        ResponseMetadata::new(self.status, self.headers.clone(), url)
    }
}
