//! Epoch/ISO-8601 conversions for player timestamps.
//!
//! WASM has no ambient clock; every `now` flows in from the JS bridge as
//! epoch milliseconds. Older local-variant exports stored ISO strings, so
//! import parses both directions. Exports always write the full
//! `YYYY-MM-DDTHH:MM:SS.mmmZ` shape.

use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime};

fn from_epoch_ms(epoch_ms: u64) -> Option<OffsetDateTime> {
    OffsetDateTime::from_unix_timestamp_nanos(epoch_ms as i128 * 1_000_000).ok()
}

fn to_epoch_ms(dt: OffsetDateTime) -> Option<u64> {
    u64::try_from(dt.unix_timestamp_nanos() / 1_000_000).ok()
}

/// Parse an RFC 3339 timestamp into epoch milliseconds. Also accepts a
/// datetime without an offset (assumed UTC) and a bare date (midnight
/// UTC). Returns `None` for anything else or pre-1970 instants.
pub fn parse_iso8601(text: &str) -> Option<u64> {
    let text = text.trim();
    if let Ok(dt) = OffsetDateTime::parse(text, &Rfc3339) {
        return to_epoch_ms(dt);
    }

    let naive = text.trim_end_matches('Z');
    let with_frac =
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]");
    let without_frac = format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");
    if let Ok(dt) = PrimitiveDateTime::parse(naive, &with_frac)
        .or_else(|_| PrimitiveDateTime::parse(naive, &without_frac))
    {
        return to_epoch_ms(dt.assume_utc());
    }

    let bare_date = format_description!("[year]-[month]-[day]");
    if let Ok(date) = Date::parse(text, &bare_date) {
        return to_epoch_ms(date.midnight().assume_utc());
    }
    None
}

/// Format epoch milliseconds as `YYYY-MM-DDTHH:MM:SS.mmmZ`.
pub fn format_iso8601(epoch_ms: u64) -> String {
    let format =
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z");
    from_epoch_ms(epoch_ms)
        .and_then(|dt| dt.format(&format).ok())
        .unwrap_or_default()
}

/// Compact `YYYY-MM-DD HH:MM` rendering for the admin table.
pub fn format_compact(epoch_ms: u64) -> String {
    if epoch_ms == 0 {
        return "-".to_string();
    }
    let format = format_description!("[year]-[month]-[day] [hour]:[minute]");
    from_epoch_ms(epoch_ms)
        .and_then(|dt| dt.format(&format).ok())
        .unwrap_or_else(|| "-".to_string())
}
