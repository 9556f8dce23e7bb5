use time::{format_description::well_known::Rfc3339, OffsetDateTime};

/// Domain dates are epoch seconds.
pub(crate) fn now_epoch() -> i64 {
    OffsetDateTime::now_utc().unix_timestamp()
}

/// RFC3339 rendering of an epoch timestamp for API responses. Out-of-range
/// values fall back to the raw number rather than failing the response.
pub(crate) fn format_epoch(epoch: i64) -> String {
    OffsetDateTime::from_unix_timestamp(epoch)
        .ok()
        .and_then(|value| value.format(&Rfc3339).ok())
        .unwrap_or_else(|| epoch.to_string())
}
