use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnoozePreset {
    LaterToday,
    Tomorrow,
    NextWeek,
}

impl SnoozePreset {
    pub const ALL: [SnoozePreset; 3] = [
        SnoozePreset::LaterToday,
        SnoozePreset::Tomorrow,
        SnoozePreset::NextWeek,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SnoozePreset::LaterToday => "Later today",
            SnoozePreset::Tomorrow => "Tomorrow",
            SnoozePreset::NextWeek => "Next week",
        }
    }

    /// Instant the thread wakes up when snoozed at `now`
    pub fn until(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            SnoozePreset::LaterToday => now + Duration::hours(3),
            SnoozePreset::Tomorrow => morning_of(now.date_naive() + Duration::days(1), now),
            SnoozePreset::NextWeek => {
                // 1..=7 days ahead, always landing on a Monday
                let ahead = 7 - i64::from(now.weekday().num_days_from_monday());
                morning_of(now.date_naive() + Duration::days(ahead), now)
            }
        }
    }
}

fn morning_of(day: NaiveDate, now: DateTime<Utc>) -> DateTime<Utc> {
    day.and_hms_opt(8, 0, 0)
        .map(|dt| dt.and_utc())
        .unwrap_or(now + Duration::days(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Weekday};

    #[test]
    fn test_presets_from_tuesday_evening() {
        // 2026-03-10 is a Tuesday
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 19, 30, 0).unwrap();
        assert_eq!(
            SnoozePreset::LaterToday.until(now),
            Utc.with_ymd_and_hms(2026, 3, 10, 22, 30, 0).unwrap()
        );
        assert_eq!(
            SnoozePreset::Tomorrow.until(now),
            Utc.with_ymd_and_hms(2026, 3, 11, 8, 0, 0).unwrap()
        );
        assert_eq!(
            SnoozePreset::NextWeek.until(now),
            Utc.with_ymd_and_hms(2026, 3, 16, 8, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_next_week_from_monday_skips_a_full_week() {
        let monday = Utc.with_ymd_and_hms(2026, 3, 9, 7, 0, 0).unwrap();
        assert_eq!(monday.weekday(), Weekday::Mon);
        let until = SnoozePreset::NextWeek.until(monday);
        assert_eq!(until.weekday(), Weekday::Mon);
        assert_eq!(until.date_naive(), monday.date_naive() + Duration::days(7));
    }

    #[test]
    fn test_every_preset_is_in_the_future() {
        let now = Utc.with_ymd_and_hms(2026, 3, 15, 23, 59, 0).unwrap();
        for preset in SnoozePreset::ALL {
            assert!(preset.until(now) > now, "{:?}", preset);
        }
    }
}
