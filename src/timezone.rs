use time::{OffsetDateTime, UtcOffset};
use time_tz::{Offset, TimeZone, Tz};

use crate::Error;

/// Look up a canonical timezone, e.g. "Pacific/Auckland".
pub fn get_timezone(canonical_timezone: &str) -> Option<&'static Tz> {
    time_tz::timezones::get_by_name(canonical_timezone)
}

/// Get the current UTC offset of a canonical timezone, e.g. "Pacific/Auckland".
pub fn get_local_offset(canonical_timezone: &str) -> Option<UtcOffset> {
    get_timezone(canonical_timezone).map(|tz| offset_at(tz, OffsetDateTime::now_utc()))
}

/// The UTC offset `tz` observed at the instant `datetime`.
pub fn offset_at(tz: &Tz, datetime: OffsetDateTime) -> UtcOffset {
    tz.get_offset_utc(&datetime).to_utc()
}

/// Like [get_timezone], but logs and returns [Error::InvalidTimezone] for unknown names.
pub(crate) fn timezone_or_error(canonical_timezone: &str) -> Result<&'static Tz, Error> {
    get_timezone(canonical_timezone).ok_or_else(|| {
        tracing::error!("Invalid timezone {canonical_timezone}");
        Error::InvalidTimezone(canonical_timezone.to_owned())
    })
}

#[cfg(test)]
mod tests {
    use time::{UtcOffset, macros::datetime};

    use crate::{
        Error,
        timezone::{get_local_offset, get_timezone, offset_at, timezone_or_error},
    };

    #[test]
    fn utc_has_zero_offset() {
        assert_eq!(get_local_offset("Etc/UTC"), Some(UtcOffset::UTC));
    }

    #[test]
    fn unknown_timezone_is_an_error() {
        assert_eq!(
            timezone_or_error("Middle/Earth"),
            Err(Error::InvalidTimezone("Middle/Earth".to_owned()))
        );
    }

    #[test]
    fn offset_follows_daylight_saving() {
        let auckland = get_timezone("Pacific/Auckland").unwrap();

        assert_eq!(
            offset_at(auckland, datetime!(2026-07-31 11:30 UTC)),
            UtcOffset::from_hms(12, 0, 0).unwrap()
        );
        assert_eq!(
            offset_at(auckland, datetime!(2026-01-15 12:00 UTC)),
            UtcOffset::from_hms(13, 0, 0).unwrap()
        );
    }
}
