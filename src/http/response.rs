use http::{HeaderMap, StatusCode};
use serde::{Deserialize, Serialize};

/// Status-code families used by validators and the cache policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusCategory {
    Informational,
    Success,
    Redirection,
    ClientError,
    ServerError,
    Unknown,
}

impl StatusCategory {
    pub fn of(status: StatusCode) -> Self {
        match status.as_u16() {
            100..=199 => Self::Informational,
            200..=299 => Self::Success,
            300..=399 => Self::Redirection,
            400..=499 => Self::ClientError,
            500..=599 => Self::ServerError,
            _ => Self::Unknown,
        }
    }
}

/// HTTP response head as delivered by the fetch collaborator
#[derive(Debug, Clone)]
pub struct ResponseMetadata {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub url: String,
}

impl ResponseMetadata {
    pub fn new(status: StatusCode, headers: HeaderMap, url: impl Into<String>) -> Self {
        Self {
            status,
            headers,
            url: url.into(),
        }
    }

    pub fn category(&self) -> StatusCategory {
        StatusCategory::of(self.status)
    }

    pub fn is_success(&self) -> bool {
        self.category() == StatusCategory::Success
    }

    pub fn is_not_modified(&self) -> bool {
        self.status == StatusCode::NOT_MODIFIED
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_categories() {
        assert_eq!(StatusCategory::of(StatusCode::OK), StatusCategory::Success);
        assert_eq!(
            StatusCategory::of(StatusCode::NO_CONTENT),
            StatusCategory::Success
        );
        assert_eq!(
            StatusCategory::of(StatusCode::NOT_MODIFIED),
            StatusCategory::Redirection
        );
        assert_eq!(
            StatusCategory::of(StatusCode::SERVICE_UNAVAILABLE),
            StatusCategory::ServerError
        );
    }

    #[test]
    fn test_not_modified_is_not_success() {
        let response = ResponseMetadata::new(StatusCode::NOT_MODIFIED, HeaderMap::new(), "/");
        assert!(response.is_not_modified());
        assert!(!response.is_success());
    }
}
