/// Minutes since midnight. Appointments never span midnight, so the valid
/// range for a time-of-day is 0..=1440 (1440 only as an exclusive end).
pub type Minutes = u16;

pub const MINUTES_PER_DAY: Minutes = 24 * 60;

/// Parses a time string (HH:MM) to minutes since midnight
pub fn parse_time_to_minutes(time_str: &str) -> Option<Minutes> {
    let parts: Vec<&str> = time_str.trim().split(':').collect();
    if parts.len() != 2 {
        return None;
    }
    let hours: u16 = parts[0].parse().ok()?;
    let minutes: u16 = parts[1].parse().ok()?;
    if minutes >= 60 {
        return None;
    }
    // "24:00" is accepted as an end-of-day boundary
    if hours > 24 || (hours == 24 && minutes != 0) {
        return None;
    }
    Some(hours * 60 + minutes)
}

/// Formats minutes since midnight to time string (HH:MM)
pub fn minutes_to_time_string(minutes: Minutes) -> String {
    let hours = minutes / 60;
    let mins = minutes % 60;
    format!("{:02}:{:02}", hours, mins)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_valid_times() {
        assert_eq!(parse_time_to_minutes("00:00"), Some(0));
        assert_eq!(parse_time_to_minutes("09:30"), Some(570));
        assert_eq!(parse_time_to_minutes(" 17:45 "), Some(1065));
        assert_eq!(parse_time_to_minutes("24:00"), Some(1440));
    }

    #[test]
    fn rejects_malformed_times() {
        assert_eq!(parse_time_to_minutes("9"), None);
        assert_eq!(parse_time_to_minutes("09:60"), None);
        assert_eq!(parse_time_to_minutes("24:01"), None);
        assert_eq!(parse_time_to_minutes("25:00"), None);
        assert_eq!(parse_time_to_minutes("ab:cd"), None);
        assert_eq!(parse_time_to_minutes("09:30:00"), None);
    }

    #[test]
    fn formats_round_trip() {
        for m in [0u16, 15, 570, 1065, 1439] {
            assert_eq!(parse_time_to_minutes(&minutes_to_time_string(m)), Some(m));
        }
    }
}
