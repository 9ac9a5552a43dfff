//! HTTP vocabulary shared by the cache, pipelines and tasks.

pub mod headers;
pub mod request;
pub mod response;

pub use headers::{HeaderAliases, HeaderField};
pub use request::{HttpRequest, TaskPriority};
pub use response::{ResponseMetadata, StatusCategory};

use chrono::{DateTime, NaiveDateTime, Utc};

const IMF_FIXDATE: &str = "%a, %d %b %Y %H:%M:%S GMT";
const RFC850_DATE: &str = "%A, %d-%b-%y %H:%M:%S GMT";
const ASCTIME_DATE: &str = "%a %b %e %H:%M:%S %Y";

/// Parse an HTTP-date header value (IMF-fixdate, RFC 850 or asctime)
pub fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(at) = DateTime::parse_from_rfc2822(value) {
        return Some(at.with_timezone(&Utc));
    }
    [RFC850_DATE, ASCTIME_DATE]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|naive| naive.and_utc())
}

/// Format a timestamp as an IMF-fixdate header value
pub fn format_http_date(at: DateTime<Utc>) -> String {
    at.format(IMF_FIXDATE).to_string()
}
