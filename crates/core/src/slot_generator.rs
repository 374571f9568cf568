//! # Slot Generator
//!
//! Expands a schedule window (date range, daily time window, slot duration)
//! into an ordered list of non-overlapping slots, one run per calendar day.
//!
//! Within a day the cursor starts at the window's start and advances by the
//! slot duration. A slot is only emitted when its end is at or before the
//! day's end boundary, so a trailing gap shorter than the duration is dropped
//! rather than turned into a short slot.

use chrono::{Duration, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::time_format::{format_wall_time, hhmm};

/// A slot produced by the generator, before it is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedSlot {
    /// Unique within one generation batch: `YYYY-MM-DD-HH:mm-HH:mm`.
    pub key: String,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub time_start: NaiveTime,
    #[serde(with = "hhmm")]
    pub time_end: NaiveTime,
}

impl GeneratedSlot {
    fn new(date: NaiveDate, time_start: NaiveTime, time_end: NaiveTime) -> Self {
        let key = format!(
            "{}-{}-{}",
            date.format("%Y-%m-%d"),
            format_wall_time(&time_start),
            format_wall_time(&time_end)
        );

        Self {
            key,
            date,
            time_start,
            time_end,
        }
    }
}

/// Generates the slots for every day from `start_date` to `end_date` inclusive.
///
/// Returns an empty list when `end_date` precedes `start_date` or the duration
/// is zero. A day whose `end_time` is not after `start_time` yields no slots.
pub fn generate_slots(
    start_date: NaiveDate,
    end_date: NaiveDate,
    start_time: NaiveTime,
    end_time: NaiveTime,
    duration_minutes: u32,
) -> Vec<GeneratedSlot> {
    if duration_minutes == 0 || end_date < start_date {
        return Vec::new();
    }

    let step = Duration::minutes(i64::from(duration_minutes));
    let mut slots = Vec::new();

    for day in start_date.iter_days().take_while(|day| *day <= end_date) {
        let day_end = day.and_time(end_time);
        let mut cursor = day.and_time(start_time);

        while cursor <= day_end {
            let slot_end = cursor + step;
            if slot_end > day_end {
                break;
            }
            slots.push(GeneratedSlot::new(day, cursor.time(), slot_end.time()));
            cursor = slot_end;
        }
    }

    slots
}

#[cfg(test)]
mod tests {
    use super::*;

    fn time(value: &str) -> NaiveTime {
        NaiveTime::parse_from_str(value, "%H:%M").unwrap()
    }

    #[test]
    fn slot_key_combines_date_and_times() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        let slot = GeneratedSlot::new(date, time("09:00"), time("09:30"));
        assert_eq!(slot.key, "2024-03-09-09:00-09:30");
    }

    #[test]
    fn window_ending_at_midnight_boundary_stays_on_the_day() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let slots = generate_slots(date, date, time("22:00"), time("23:59"), 60);
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].time_end, time("23:00"));
    }
}
