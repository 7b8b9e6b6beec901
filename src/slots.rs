//! Visit slot grid generation
//!
//! Pure working-hours logic shared by availability computation and
//! booking validation. All weekday/hour arithmetic is done in UTC:
//! the policy is pinned to one zone so that a slot names the same
//! instant for every caller.

use chrono::{DateTime, Datelike, Duration, Timelike, Utc, Weekday};

/// Working-hours policy: weekdays only, hour of day in
/// `[open_hour, close_hour)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkingHours {
    pub open_hour: u32,
    pub close_hour: u32,
}

impl Default for WorkingHours {
    fn default() -> Self {
        Self {
            open_hour: 9,
            close_hour: 18,
        }
    }
}

impl WorkingHours {
    pub fn new(open_hour: u32, close_hour: u32) -> Self {
        Self {
            open_hour,
            close_hour,
        }
    }

    /// Whether an instant falls on a weekday within open hours
    pub fn admits(&self, t: &DateTime<Utc>) -> bool {
        let weekend = matches!(t.weekday(), Weekday::Sat | Weekday::Sun);
        let hour = t.hour();
        !weekend && hour >= self.open_hour && hour < self.close_hour
    }

    /// Whether an instant is a bookable slot: exactly on the hour and
    /// admitted by the policy. Booking requests are validated with the
    /// same predicate that generates the availability grid.
    pub fn is_valid_slot(&self, t: &DateTime<Utc>) -> bool {
        let aligned = t.minute() == 0 && t.second() == 0 && t.nanosecond() == 0;
        aligned && self.admits(t)
    }
}

/// Truncate an instant to the start of its hour
fn truncate_to_hour(t: DateTime<Utc>) -> DateTime<Utc> {
    t.with_minute(0)
        .and_then(|x| x.with_second(0))
        .and_then(|x| x.with_nanosecond(0))
        .unwrap_or(t)
}

/// Lazy, finite, restartable sequence of bookable instants in
/// `[from, to)` at one-hour granularity.
///
/// The start bound is truncated to the start of its hour before the
/// policy filter applies, so a range opening mid-hour still considers
/// that hour's slot. Identical inputs always yield an identical
/// sequence; cloning restarts from wherever the clone was taken.
#[derive(Debug, Clone)]
pub struct HourlySlots {
    cursor: DateTime<Utc>,
    until: DateTime<Utc>,
    hours: WorkingHours,
}

impl HourlySlots {
    pub fn new(from: DateTime<Utc>, to: DateTime<Utc>, hours: WorkingHours) -> Self {
        Self {
            cursor: truncate_to_hour(from),
            until: to,
            hours,
        }
    }
}

impl Iterator for HourlySlots {
    type Item = DateTime<Utc>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.cursor < self.until {
            let slot = self.cursor;
            self.cursor += Duration::hours(1);
            if self.hours.admits(&slot) {
                return Some(slot);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    #[test]
    fn test_monday_working_day_grid() {
        // 2024-07-01 is a Monday; 08:00-20:00 under [9, 18) yields
        // exactly the nine slots 09:00 through 17:00
        let slots: Vec<_> = HourlySlots::new(
            utc(2024, 7, 1, 8, 0),
            utc(2024, 7, 1, 20, 0),
            WorkingHours::default(),
        )
        .collect();

        assert_eq!(slots.len(), 9);
        assert_eq!(slots[0], utc(2024, 7, 1, 9, 0));
        assert_eq!(slots[8], utc(2024, 7, 1, 17, 0));
    }

    #[test]
    fn test_grid_slots_satisfy_policy() {
        let hours = WorkingHours::default();
        let slots: Vec<_> = HourlySlots::new(
            utc(2024, 7, 1, 0, 0),
            utc(2024, 7, 15, 0, 0),
            hours,
        )
        .collect();

        assert!(!slots.is_empty());
        for s in &slots {
            assert_eq!(s.minute(), 0);
            assert_eq!(s.second(), 0);
            assert!(!matches!(s.weekday(), Weekday::Sat | Weekday::Sun));
            assert!(s.hour() >= 9 && s.hour() < 18);
            assert!(hours.is_valid_slot(s));
        }
    }

    #[test]
    fn test_weekend_excluded() {
        // 2024-07-06/07 are Saturday and Sunday
        let slots: Vec<_> = HourlySlots::new(
            utc(2024, 7, 6, 0, 0),
            utc(2024, 7, 8, 0, 0),
            WorkingHours::default(),
        )
        .collect();
        assert!(slots.is_empty());
    }

    #[test]
    fn test_mid_hour_start_truncated() {
        // Starting at 09:30 still considers the 09:00 slot
        let slots: Vec<_> = HourlySlots::new(
            utc(2024, 7, 1, 9, 30),
            utc(2024, 7, 1, 11, 0),
            WorkingHours::default(),
        )
        .collect();
        assert_eq!(slots, vec![utc(2024, 7, 1, 9, 0), utc(2024, 7, 1, 10, 0)]);
    }

    #[test]
    fn test_empty_range_yields_nothing() {
        let t = utc(2024, 7, 1, 9, 0);
        assert_eq!(HourlySlots::new(t, t, WorkingHours::default()).count(), 0);
    }

    #[test]
    fn test_deterministic_and_restartable() {
        let make = || {
            HourlySlots::new(
                utc(2024, 7, 1, 0, 0),
                utc(2024, 7, 3, 0, 0),
                WorkingHours::default(),
            )
        };
        let first: Vec<_> = make().collect();
        let second: Vec<_> = make().collect();
        assert_eq!(first, second);

        let mut iter = make();
        iter.next();
        let resumed = iter.clone();
        assert_eq!(iter.collect::<Vec<_>>(), resumed.collect::<Vec<_>>());
    }

    #[test]
    fn test_is_valid_slot() {
        let hours = WorkingHours::default();
        // Monday 14:00 exactly
        assert!(hours.is_valid_slot(&utc(2024, 7, 1, 14, 0)));
        // Misaligned
        assert!(!hours.is_valid_slot(&utc(2024, 7, 1, 14, 30)));
        // Out of hours
        assert!(!hours.is_valid_slot(&utc(2024, 7, 1, 8, 0)));
        assert!(!hours.is_valid_slot(&utc(2024, 7, 1, 18, 0)));
        // Saturday
        assert!(!hours.is_valid_slot(&utc(2024, 7, 6, 14, 0)));
    }

    #[test]
    fn test_custom_hours() {
        let hours = WorkingHours::new(10, 12);
        let slots: Vec<_> = HourlySlots::new(
            utc(2024, 7, 1, 0, 0),
            utc(2024, 7, 2, 0, 0),
            hours,
        )
        .collect();
        assert_eq!(slots, vec![utc(2024, 7, 1, 10, 0), utc(2024, 7, 1, 11, 0)]);
    }
}
