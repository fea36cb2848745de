// src/booking/slots.rs
//
// Calendar widget and time slots of the date/time step.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::dates::{days_in_month, is_past};

pub const SLOT_GROUP_STARTS: [&str; 3] = ["09:00", "10:00", "11:00"];
pub const SLOTS_PER_GROUP: usize = 12;
pub const SLOT_STEP_MINUTES: u32 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DayCell {
    Blank,
    Day {
        date: NaiveDate,
        disabled: bool,
        selected: bool,
    },
}

/// Month grid, Monday first. Leading blanks pad up to the first weekday.
pub fn month_grid(year: i32, month: u32, picked: Option<NaiveDate>, today: NaiveDate) -> Vec<DayCell> {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return Vec::new();
    };
    let lead = first.weekday().num_days_from_monday() as usize;

    let mut cells = vec![DayCell::Blank; lead];
    for day in 1..=days_in_month(year, month) {
        let Some(date) = NaiveDate::from_ymd_opt(year, month, day) else {
            continue;
        };
        cells.push(DayCell::Day {
            date,
            disabled: is_past(date, today),
            selected: picked == Some(date),
        });
    }
    cells
}

/// `count` times from `start` ("HH:MM"), `step` minutes apart.
pub fn make_slots(start: &str, count: usize, step: u32) -> Vec<String> {
    let mut parts = start.split(':').map(|p| p.parse::<u32>().unwrap_or(0));
    let mut total = parts.next().unwrap_or(0) * 60 + parts.next().unwrap_or(0);
    let mut out = Vec::with_capacity(count);
    for _ in 0..count {
        out.push(format!("{:02}:{:02}", total / 60, total % 60));
        total += step;
    }
    out
}

pub fn all_slot_times() -> Vec<String> {
    SLOT_GROUP_STARTS
        .iter()
        .flat_map(|s| make_slots(s, SLOTS_PER_GROUP, SLOT_STEP_MINUTES))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeSlot {
    pub time: String,
    pub disabled: bool,
    pub booked: bool,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeGroup {
    pub hour: &'static str,
    pub slots: Vec<TimeSlot>,
}

pub fn time_groups(
    date: Option<NaiveDate>,
    booked: &BTreeSet<String>,
    selected: Option<&str>,
    today: NaiveDate,
) -> Vec<TimeGroup> {
    let date_ok = date.is_some_and(|d| !is_past(d, today));

    SLOT_GROUP_STARTS
        .iter()
        .map(|&hour| TimeGroup {
            hour,
            slots: make_slots(hour, SLOTS_PER_GROUP, SLOT_STEP_MINUTES)
                .into_iter()
                .map(|time| {
                    let is_booked = booked.contains(&time);
                    TimeSlot {
                        disabled: !date_ok || is_booked,
                        booked: is_booked,
                        selected: selected == Some(time.as_str()),
                        time,
                    }
                })
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn grid_is_monday_first() {
        // October 2026 starts on a Thursday: three blanks.
        let today = d(2026, 10, 16);
        let cells = month_grid(2026, 10, Some(d(2026, 10, 20)), today);
        assert_eq!(cells.iter().filter(|c| **c == DayCell::Blank).count(), 3);
        assert_eq!(cells.len(), 3 + 31);

        let days: Vec<_> = cells
            .iter()
            .filter_map(|c| match c {
                DayCell::Day { date, disabled, selected } => Some((*date, *disabled, *selected)),
                DayCell::Blank => None,
            })
            .collect();
        assert_eq!(days[14], (d(2026, 10, 15), true, false));
        assert_eq!(days[15], (d(2026, 10, 16), false, false));
        assert_eq!(days[19], (d(2026, 10, 20), false, true));
    }

    #[test]
    fn monday_start_has_no_blanks() {
        // June 2026 starts on a Monday.
        let cells = month_grid(2026, 6, None, d(2026, 1, 1));
        assert_eq!(cells.first(), Some(&DayCell::Day { date: d(2026, 6, 1), disabled: false, selected: false }));
        assert_eq!(cells.len(), 30);
    }

    #[test]
    fn three_groups_of_five_minute_slots() {
        let slots = make_slots("09:00", 12, 5);
        assert_eq!(slots.first().map(String::as_str), Some("09:00"));
        assert_eq!(slots.last().map(String::as_str), Some("09:55"));
        assert_eq!(all_slot_times().len(), 36);
        assert_eq!(all_slot_times().last().map(String::as_str), Some("11:55"));
    }

    #[test]
    fn booked_and_past_slots_are_disabled() {
        let today = d(2026, 10, 16);
        let booked: BTreeSet<String> = ["09:05".to_string()].into();

        let groups = time_groups(Some(today), &booked, Some("09:10"), today);
        let first = &groups[0].slots;
        assert!(!first[0].disabled);
        assert!(first[1].disabled && first[1].booked);
        assert!(first[2].selected);

        let none = time_groups(None, &booked, None, today);
        assert!(none.iter().flat_map(|g| &g.slots).all(|s| s.disabled));

        let past = time_groups(Some(d(2026, 10, 1)), &BTreeSet::new(), None, today);
        assert!(past.iter().flat_map(|g| &g.slots).all(|s| s.disabled && !s.booked));
    }
}
