use crate::time_provider::Moment;

const MS_PER_DAY: u64 = 86_400_000;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub enum TimeFormat {
    #[default]
    Hour12,
    Hour24,
}

impl TimeFormat {
    pub fn toggled(self) -> Self {
        match self {
            TimeFormat::Hour12 => TimeFormat::Hour24,
            TimeFormat::Hour24 => TimeFormat::Hour12,
        }
    }

    /// Only `"24h"` selects the 24-hour display; anything else is 12-hour.
    pub fn from_pref_value(value: Option<&str>) -> Self {
        match value {
            Some("24h") => TimeFormat::Hour24,
            _ => TimeFormat::Hour12,
        }
    }

    pub fn as_pref_value(self) -> &'static str {
        match self {
            TimeFormat::Hour12 => "12h",
            TimeFormat::Hour24 => "24h",
        }
    }
}

fn split_hour12(hour: u32) -> (u32, &'static str) {
    let meridiem = if hour >= 12 { "PM" } else { "AM" };
    let display = match hour % 12 {
        0 => 12,
        other => other,
    };
    (display, meridiem)
}

pub fn format_clock(moment: &Moment, format: TimeFormat) -> String {
    match format {
        TimeFormat::Hour24 => format!(
            "{}:{:02}:{:02}",
            moment.hour, moment.minute, moment.second
        ),
        TimeFormat::Hour12 => {
            let (hour, meridiem) = split_hour12(moment.hour);
            format!(
                "{}:{:02}:{:02} {}",
                hour, moment.minute, moment.second, meridiem
            )
        }
    }
}

/// Renders `ms` as `HH:MM:SS.CC` measured from a zero epoch, so anything at
/// or past 24 hours wraps around.
pub fn format_duration(ms: u64) -> String {
    let within_day = ms % MS_PER_DAY;
    let hours = within_day / 3_600_000;
    let minutes = (within_day / 60_000) % 60;
    let seconds = (within_day / 1_000) % 60;
    let hundredths = (within_day % 1_000) / 10;
    format!("{hours:02}:{minutes:02}:{seconds:02}.{hundredths:02}")
}

pub fn format_alarm_time(hour: u32, minute: u32, format: TimeFormat) -> String {
    match format {
        TimeFormat::Hour24 => format!("{hour:02}:{minute:02}"),
        TimeFormat::Hour12 => {
            let (display, meridiem) = split_hour12(hour);
            format!("{display}:{minute:02} {meridiem}")
        }
    }
}

/// Timer face: whole seconds rounded up, minutes unbounded.
pub fn format_countdown(ms: u64) -> String {
    let total_seconds = ms.div_ceil(1_000);
    format!("{:02}:{:02}", total_seconds / 60, total_seconds % 60)
}

pub fn format_date(moment: &Moment) -> String {
    moment.date.format("%A, %B %-d %Y").to_string()
}

pub fn format_lap(index: usize, ms: u64) -> String {
    format!("Lap {}: {}", index + 1, format_duration(ms))
}

pub fn greeting(hour: u32) -> &'static str {
    if hour < 12 {
        "Good Morning!"
    } else if hour < 18 {
        "Good Afternoon!"
    } else {
        "Good Evening!"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time_provider::test_moment;

    #[test]
    fn duration_formats_hundredths() {
        assert_eq!(format_duration(0), "00:00:00.00");
        assert_eq!(format_duration(3_723_450), "01:02:03.45");
        assert_eq!(format_duration(9), "00:00:00.00");
        assert_eq!(format_duration(59_990), "00:00:59.99");
    }

    #[test]
    fn duration_wraps_at_one_day() {
        assert_eq!(format_duration(MS_PER_DAY), "00:00:00.00");
        assert_eq!(format_duration(MS_PER_DAY + 61_020), "00:01:01.02");
    }

    #[test]
    fn duration_always_matches_display_shape() {
        for ms in [1, 999, 10_010, 359_999_999, 86_399_999, u64::MAX] {
            let text = format_duration(ms);
            let bytes = text.as_bytes();
            assert_eq!(text.len(), 11, "{text}");
            assert_eq!(bytes[2], b':');
            assert_eq!(bytes[5], b':');
            assert_eq!(bytes[8], b'.');
        }
    }

    #[test]
    fn clock_24h_never_has_meridiem() {
        for hour in 0..24 {
            let text = format_clock(&test_moment(hour, 5, 9), TimeFormat::Hour24);
            assert!(!text.contains("AM") && !text.contains("PM"), "{text}");
        }
        assert_eq!(
            format_clock(&test_moment(7, 5, 9), TimeFormat::Hour24),
            "7:05:09"
        );
    }

    #[test]
    fn clock_12h_shows_midnight_and_noon_as_twelve() {
        assert_eq!(
            format_clock(&test_moment(0, 0, 0), TimeFormat::Hour12),
            "12:00:00 AM"
        );
        assert_eq!(
            format_clock(&test_moment(12, 30, 1), TimeFormat::Hour12),
            "12:30:01 PM"
        );
        assert_eq!(
            format_clock(&test_moment(23, 59, 59), TimeFormat::Hour12),
            "11:59:59 PM"
        );
    }

    #[test]
    fn alarm_time_follows_display_mode() {
        assert_eq!(format_alarm_time(8, 5, TimeFormat::Hour24), "08:05");
        assert_eq!(format_alarm_time(8, 5, TimeFormat::Hour12), "8:05 AM");
        assert_eq!(format_alarm_time(0, 0, TimeFormat::Hour12), "12:00 AM");
        assert_eq!(format_alarm_time(18, 45, TimeFormat::Hour12), "6:45 PM");
    }

    #[test]
    fn countdown_rounds_up_to_whole_seconds() {
        assert_eq!(format_countdown(300_000), "05:00");
        assert_eq!(format_countdown(59_010), "01:00");
        assert_eq!(format_countdown(58_990), "00:59");
        assert_eq!(format_countdown(0), "00:00");
    }

    #[test]
    fn greeting_switches_at_noon_and_six() {
        assert_eq!(greeting(0), "Good Morning!");
        assert_eq!(greeting(11), "Good Morning!");
        assert_eq!(greeting(12), "Good Afternoon!");
        assert_eq!(greeting(17), "Good Afternoon!");
        assert_eq!(greeting(18), "Good Evening!");
    }

    #[test]
    fn pref_value_only_recognises_24h() {
        assert_eq!(TimeFormat::from_pref_value(Some("24h")), TimeFormat::Hour24);
        assert_eq!(TimeFormat::from_pref_value(Some("12h")), TimeFormat::Hour12);
        assert_eq!(TimeFormat::from_pref_value(Some("bogus")), TimeFormat::Hour12);
        assert_eq!(TimeFormat::from_pref_value(None), TimeFormat::Hour12);
        assert_eq!(TimeFormat::Hour12.toggled().as_pref_value(), "24h");
    }

    #[test]
    fn date_and_lap_lines() {
        assert_eq!(format_date(&test_moment(9, 0, 0)), "Monday, January 5 2026");
        assert_eq!(format_lap(0, 1_250), "Lap 1: 00:00:01.25");
    }
}
