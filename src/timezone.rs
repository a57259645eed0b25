//! Resolves canonical timezone names to UTC offsets.

use time::{OffsetDateTime, UtcOffset};
use time_tz::{Offset, TimeZone};

/// Get the current UTC offset for a canonical timezone name, e.g. "Pacific/Auckland".
///
/// Returns [None] if `canonical_timezone` is not a known timezone.
pub fn get_local_offset(canonical_timezone: &str) -> Option<UtcOffset> {
    time_tz::timezones::get_by_name(canonical_timezone)
        .map(|tz| tz.get_offset_utc(&OffsetDateTime::now_utc()).to_utc())
}

#[cfg(test)]
mod tests {
    use super::get_local_offset;

    #[test]
    fn resolves_utc() {
        let offset = get_local_offset("Etc/UTC").expect("Etc/UTC should resolve");

        assert!(offset.is_utc());
    }

    #[test]
    fn rejects_unknown_timezone() {
        assert_eq!(get_local_offset("Middle/Earth"), None);
    }
}
