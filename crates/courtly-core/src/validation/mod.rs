//! Interval and operating-hours validation helpers.

use chrono::{DateTime, NaiveTime, Utc};

use crate::error::AppError;

const SECONDS_PER_DAY: i64 = 86_400;

/// Validate a half-open booking interval. `end > start` is the only shape
/// requirement; zero-length and inverted intervals are rejected.
pub fn validate_interval(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<(), AppError> {
    if end <= start {
        return Err(AppError::InvalidArgument(
            "booking end must be after start".to_string(),
        ));
    }
    Ok(())
}

/// Whether `[start, end)` fits inside one daily operating window.
///
/// `open == close` means open around the clock. A window with `close < open`
/// wraps past midnight (e.g. 22:00-02:00). Times are interpreted in UTC.
/// Requires `end > start`; validate the interval first.
pub fn within_operating_hours(
    open: NaiveTime,
    close: NaiveTime,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> bool {
    // Open around the clock: any interval fits, including multi-day ones.
    if open == close {
        return true;
    }
    let window = close
        .signed_duration_since(open)
        .num_seconds()
        .rem_euclid(SECONDS_PER_DAY);
    // Offset of the booking start into the window, in seconds. A booking
    // fits when it begins at or after opening and the whole interval stays
    // inside the same window.
    let offset = start
        .time()
        .signed_duration_since(open)
        .num_seconds()
        .rem_euclid(SECONDS_PER_DAY);
    let duration = (end - start).num_seconds();
    offset + duration <= window
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32, h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, day, h, m, 0).unwrap()
    }

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_validate_interval_rejects_inverted_and_empty() {
        assert!(validate_interval(at(1, 10, 0), at(1, 11, 0)).is_ok());
        assert!(matches!(
            validate_interval(at(1, 11, 0), at(1, 10, 0)),
            Err(AppError::InvalidArgument(_))
        ));
        assert!(matches!(
            validate_interval(at(1, 10, 0), at(1, 10, 0)),
            Err(AppError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_within_normal_window() {
        let (open, close) = (t(8, 0), t(22, 0));
        assert!(within_operating_hours(open, close, at(1, 8, 0), at(1, 9, 0)));
        assert!(within_operating_hours(open, close, at(1, 21, 0), at(1, 22, 0)));
        // Starts before opening.
        assert!(!within_operating_hours(open, close, at(1, 7, 30), at(1, 9, 0)));
        // Runs past closing.
        assert!(!within_operating_hours(open, close, at(1, 21, 30), at(1, 22, 30)));
    }

    #[test]
    fn test_around_the_clock_window() {
        let midnight = t(0, 0);
        assert!(within_operating_hours(
            midnight,
            midnight,
            at(1, 23, 0),
            at(2, 1, 0)
        ));
    }

    #[test]
    fn test_overnight_window_wraps_past_midnight() {
        let (open, close) = (t(22, 0), t(2, 0));
        assert!(within_operating_hours(open, close, at(1, 22, 30), at(2, 1, 30)));
        assert!(within_operating_hours(open, close, at(2, 0, 30), at(2, 1, 30)));
        // Daytime booking against a night venue.
        assert!(!within_operating_hours(open, close, at(1, 12, 0), at(1, 13, 0)));
        // Longer than the window itself.
        assert!(!within_operating_hours(open, close, at(1, 22, 0), at(2, 3, 0)));
    }

    #[test]
    fn test_booking_cannot_span_two_windows() {
        let (open, close) = (t(8, 0), t(22, 0));
        // 21:00 today to 09:00 tomorrow crosses the closed night gap.
        assert!(!within_operating_hours(open, close, at(1, 21, 0), at(2, 9, 0)));
    }
}
