use chrono::NaiveDateTime;
use libduckdb_sys::duckdb_timestamp;

use super::error::ErrorAccumulator;

const LOG_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// Parse a `YYYY/MM/DD HH:MM:SS` log timestamp. Failures become a conversion error
/// entry and `None`.
pub fn parse_log_timestamp(
    raw: &str,
    label: &str,
    parse_error: &mut ErrorAccumulator,
) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    match NaiveDateTime::parse_from_str(s, LOG_FORMAT) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            parse_error.push(&format!("Conversion error: {label}='{s}' (chrono: {e})"));
            None
        }
    }
}

/// DuckDB TIMESTAMP is microseconds since the Unix epoch, no timezone.
pub fn to_duckdb_timestamp(ts: NaiveDateTime) -> duckdb_timestamp {
    duckdb_timestamp {
        micros: ts.and_utc().timestamp_micros(),
    }
}
