/// Seconds until `scheduled_start`, clamped at zero.
pub fn remaining_secs(scheduled_start: i64, now: i64) -> i64 {
    scheduled_start.saturating_sub(now).max(0)
}

/// Render the time left before a start as `MM:SS`.
///
/// Minutes are not wrapped into hours, so a start 2h away reads `120:00`.
pub fn format_countdown(scheduled_start: i64, now: i64) -> String {
    let remaining = remaining_secs(scheduled_start, now);
    format!("{:02}:{:02}", remaining / 60, remaining % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_countdown() {
        assert_eq!(format_countdown(1_000, 1_000), "00:00");
        assert_eq!(format_countdown(1_065, 1_000), "01:05");
        assert_eq!(format_countdown(1_000 + 7_507, 1_000), "125:07");
    }

    #[test]
    fn test_started_events_read_zero() {
        assert_eq!(remaining_secs(1_000, 1_030), 0);
        assert_eq!(format_countdown(1_000, 1_030), "00:00");
    }

    #[test]
    fn test_extreme_starts_do_not_overflow() {
        assert_eq!(remaining_secs(i64::MIN, 1_700_000_000), 0);
        assert_eq!(remaining_secs(i64::MAX, -10), i64::MAX);
    }
}
