//! Availability service: free visit slots for an advertisement
//!
//! Composes the working-hours grid with the taken-slot query. The
//! result is advisory: nothing stops another account from booking a
//! listed slot before this caller does, and the write path resolves
//! that race on its own (see `AppointmentsService::create`).

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Timelike, Utc};

use crate::{
    error::{AppError, AppResult},
    repository::Repository,
    slots::{HourlySlots, WorkingHours},
};

#[derive(Clone)]
pub struct AvailabilityService {
    repository: Repository,
    hours: WorkingHours,
    default_window_days: i64,
}

/// Group slot instants into open hours per calendar day (UTC)
fn hours_by_day(slots: &[DateTime<Utc>]) -> BTreeMap<NaiveDate, Vec<u32>> {
    let mut days: BTreeMap<NaiveDate, Vec<u32>> = BTreeMap::new();
    for slot in slots {
        days.entry(slot.date_naive()).or_default().push(slot.hour());
    }
    days
}

impl AvailabilityService {
    pub fn new(repository: Repository, hours: WorkingHours, default_window_days: i64) -> Self {
        Self {
            repository,
            hours,
            default_window_days,
        }
    }

    /// Free slots for an advertisement within `[from, to)`
    ///
    /// Grid minus taken, in grid order. Slot comparison is by exact
    /// instant; both sides of the difference are hour-aligned UTC
    /// instants so no normalization is needed.
    pub async fn available_slots(
        &self,
        advertisement_id: i32,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<Vec<DateTime<Utc>>> {
        if from >= to {
            return Err(AppError::Validation("Invalid date range".to_string()));
        }

        let agent_id = self
            .repository
            .advertisements
            .owner_agent_id(advertisement_id)
            .await?;

        let taken: HashSet<DateTime<Utc>> = self
            .repository
            .appointments
            .taken_slots(agent_id, from, to)
            .await?
            .into_iter()
            .collect();

        Ok(HourlySlots::new(from, to, self.hours)
            .filter(|slot| !taken.contains(slot))
            .collect())
    }

    /// Free hours per day for an advertisement
    ///
    /// Bounds default to now and now + the configured window.
    pub async fn available_days(
        &self,
        advertisement_id: i32,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> AppResult<AvailableDays> {
        let from = from.unwrap_or_else(Utc::now);
        let to = to.unwrap_or_else(|| Utc::now() + Duration::days(self.default_window_days));

        let slots = self.available_slots(advertisement_id, from, to).await?;

        Ok(AvailableDays {
            from,
            to,
            days: hours_by_day(&slots),
        })
    }

    /// Free slots for an advertisement on a single calendar day
    pub async fn available_slots_by_day(
        &self,
        advertisement_id: i32,
        day: NaiveDate,
    ) -> AppResult<Vec<DateTime<Utc>>> {
        let from = day.and_time(NaiveTime::MIN).and_utc();
        let to = from + Duration::days(1);
        self.available_slots(advertisement_id, from, to).await
    }
}

/// Availability over a range, hours grouped by day
#[derive(Debug)]
pub struct AvailableDays {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
    pub days: BTreeMap<NaiveDate, Vec<u32>>,
}
