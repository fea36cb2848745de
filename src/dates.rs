// src/dates.rs

use chrono::{Datelike, Duration, NaiveDate};

const MONTHS_SHORT: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];
const MONTHS_LONG: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];

/* -------------------------
   Parsing
--------------------------*/

/// Upstream appointment dates come as DD-MM-YYYY.
pub fn parse_dmy(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%d-%m-%Y").ok()
}

pub fn parse_iso(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

pub fn iso(d: NaiveDate) -> String {
    d.format("%Y-%m-%d").to_string()
}

/// First five characters of a `HH:MM[:SS]` string.
pub fn hhmm(time: &str) -> String {
    time.chars().take(5).collect()
}

/// Hour part of `HH:MM[:SS]`; `None` when it is not a number.
pub fn floor_to_hour(time: &str) -> Option<u32> {
    let hour = time.split(':').next()?.trim();
    hour.parse::<u32>().ok().filter(|h| *h < 24)
}

/* -------------------------
   Arithmetic
--------------------------*/

pub fn is_past(d: NaiveDate, today: NaiveDate) -> bool {
    d < today
}

pub fn start_of_week_sunday(d: NaiveDate) -> NaiveDate {
    d - Duration::days(i64::from(d.weekday().num_days_from_sunday()))
}

pub fn first_of_month(d: NaiveDate) -> NaiveDate {
    d.with_day(1).unwrap_or(d)
}

/// Moves `(year, month)` by `delta` calendar months; month is 1-based.
pub fn shift_month(year: i32, month: u32, delta: i32) -> (i32, u32) {
    let index = year * 12 + month as i32 - 1 + delta;
    (index.div_euclid(12), index.rem_euclid(12) as u32 + 1)
}

pub fn add_months(first: NaiveDate, delta: i32) -> NaiveDate {
    let (y, m) = shift_month(first.year(), first.month(), delta);
    NaiveDate::from_ymd_opt(y, m, 1).unwrap_or(first)
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (ny, nm) = shift_month(year, month, 1);
    NaiveDate::from_ymd_opt(ny, nm, 1)
        .and_then(|next| next.pred_opt())
        .map(|last| last.day())
        .unwrap_or(28)
}

/* -------------------------
   Formatting
--------------------------*/

pub fn month_short(month: u32) -> &'static str {
    MONTHS_SHORT[(month as usize + 11) % 12]
}

pub fn month_long(month: u32) -> &'static str {
    MONTHS_LONG[(month as usize + 11) % 12]
}

pub fn weekday_upper(d: NaiveDate) -> &'static str {
    ["SUN", "MON", "TUE", "WED", "THU", "FRI", "SAT"][d.weekday().num_days_from_sunday() as usize]
}

/// "16 Oct"
pub fn chip_date(d: NaiveDate) -> String {
    format!("{:02} {}", d.day(), month_short(d.month()))
}

/// "16 Oct, 2026"
pub fn long_date(d: NaiveDate) -> String {
    format!("{} {}, {}", d.day(), month_short(d.month()), d.year())
}

/// "October 2026"
pub fn month_label(year: i32, month: u32) -> String {
    format!("{} {}", month_long(month), year)
}

/// "09:05" -> "9:05am", "13:00" -> "1:00pm"
pub fn to_am_pm(time: &str) -> String {
    let mut parts = time.split(':').map(|p| p.trim().parse::<u32>().unwrap_or(0));
    let hh = parts.next().unwrap_or(0);
    let mm = parts.next().unwrap_or(0);
    let suffix = if hh >= 12 { "pm" } else { "am" };
    let h = (hh + 11) % 12 + 1;
    format!("{h}:{mm:02}{suffix}")
}
