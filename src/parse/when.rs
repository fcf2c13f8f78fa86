//! Natural-language target-date inference.
//!
//! Turns phrases like "by Thursday", "by 6pm tomorrow" or "by 18:00" into a
//! concrete timestamp plus an all-day flag. First matching rule wins; text
//! with no date phrase infers nothing.

use std::sync::LazyLock;

use chrono::{DateTime, Datelike, Days, Local, NaiveDateTime, NaiveTime, TimeZone, Timelike};
use regex::Regex;

/// Result of date inference. `ts` is ms since epoch; `all_day` is only
/// meaningful when `ts` is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Inferred {
    pub ts: Option<i64>,
    pub all_day: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TimeOfDay {
    hour: u32,
    minute: u32,
}

static TIME_HHMM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([01]?\d|2[0-3]):([0-5]\d)\b").unwrap());
static TIME_AMPM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b([1-9]|1[0-2])\s*(?::([0-5]\d))?\s*(am|pm)\b").unwrap());
static TIME_H24: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b([01]?\d|2[0-3])\s*h\b").unwrap());

static BY_TODAY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bby\s+today\b").unwrap());
static BY_TOMORROW: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bby\s+(?:tomorrow|tmrw|tmr)\b").unwrap());
static BY_WEEKDAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\bby\s+(monday|tuesday|wednesday|thursday|friday|saturday|sunday|mon|tues|tue|wed|thurs|thur|thu|fri|sat|sun)\b",
    )
    .unwrap()
});
static BY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bby\b").unwrap());

/// Parse a clock time out of free text: `14:30`, `2pm`, `2:15pm`, `14h`.
fn parse_time_of_day(text: &str) -> Option<TimeOfDay> {
    if let Some(caps) = TIME_HHMM.captures(text) {
        return Some(TimeOfDay {
            hour: caps[1].parse().ok()?,
            minute: caps[2].parse().ok()?,
        });
    }
    if let Some(caps) = TIME_AMPM.captures(text) {
        let raw: u32 = caps[1].parse().ok()?;
        let minute = caps.get(2).map_or(Some(0), |m| m.as_str().parse().ok())?;
        let pm = caps[3].eq_ignore_ascii_case("pm");
        return Some(TimeOfDay {
            hour: (raw % 12) + if pm { 12 } else { 0 },
            minute,
        });
    }
    if let Some(caps) = TIME_H24.captures(text) {
        return Some(TimeOfDay {
            hour: caps[1].parse().ok()?,
            minute: 0,
        });
    }
    None
}

/// Weekday number (Sunday = 0) from a full name or common abbreviation.
fn weekday_from_name(name: &str) -> Option<u32> {
    match name.to_lowercase().as_str() {
        "sunday" | "sun" => Some(0),
        "monday" | "mon" => Some(1),
        "tuesday" | "tue" | "tues" => Some(2),
        "wednesday" | "wed" => Some(3),
        "thursday" | "thu" | "thur" | "thurs" => Some(4),
        "friday" | "fri" => Some(5),
        "saturday" | "sat" => Some(6),
        _ => None,
    }
}

/// Interpret a naive local datetime as ms since epoch. Falls back to UTC
/// for instants that don't exist locally (DST gaps).
fn to_millis(ndt: NaiveDateTime) -> i64 {
    match Local.from_local_datetime(&ndt).earliest() {
        Some(dt) => dt.timestamp_millis(),
        None => ndt.and_utc().timestamp_millis(),
    }
}

/// Midnight of the given instant's calendar day, as ms since epoch.
pub fn start_of_day(at: DateTime<Local>) -> i64 {
    to_millis(at.date_naive().and_time(NaiveTime::MIN))
}

/// Start of day of the next occurrence of `weekday` strictly after today.
/// If today already is that weekday, the result is a week out.
pub fn next_weekday_from(weekday: u32, from: DateTime<Local>) -> i64 {
    let current = from.weekday().num_days_from_sunday();
    let mut delta = (weekday as i64 - current as i64).rem_euclid(7);
    if delta == 0 {
        delta = 7;
    }
    let date = from.date_naive() + Days::new(delta as u64);
    to_millis(date.and_time(NaiveTime::MIN))
}

/// Next occurrence of a weekly `weekday`/`hour`/`minute` slot. Unlike
/// [`next_weekday_from`], today counts when the slot hasn't passed yet.
/// Used for rescheduling repeating nodes on completion.
pub fn next_weekly_at(weekday: u32, hour: u32, minute: u32, from: DateTime<Local>) -> i64 {
    let current = from.weekday().num_days_from_sunday();
    let mut delta = (weekday as i64 - current as i64).rem_euclid(7);
    if delta == 0 {
        let passed =
            from.hour() > hour || (from.hour() == hour && from.minute() >= minute);
        if passed {
            delta = 7;
        }
    }
    let date = from.date_naive() + Days::new(delta as u64);
    let time = NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN);
    to_millis(date.and_time(time))
}

fn at_time(date: chrono::NaiveDate, time: TimeOfDay) -> i64 {
    let t = NaiveTime::from_hms_opt(time.hour, time.minute, 0).unwrap_or(NaiveTime::MIN);
    to_millis(date.and_time(t))
}

/// Infer a target date and all-day flag from instruction text.
///
/// Rules, first match wins:
/// 1. "by today" [+ time]
/// 2. "by tomorrow" / "tmrw" / "tmr" [+ time]
/// 3. "by <weekday>" [+ time] — always the next future occurrence
/// 4. bare "by <time>" — today if still ahead, else tomorrow
/// 5. nothing → `{ts: None, all_day: None}`
pub fn infer_target_date(text: &str, now: DateTime<Local>) -> Inferred {
    if text.trim().is_empty() {
        return Inferred::default();
    }

    if BY_TODAY.is_match(text) {
        if let Some(time) = parse_time_of_day(text) {
            return Inferred {
                ts: Some(at_time(now.date_naive(), time)),
                all_day: Some(false),
            };
        }
        return Inferred {
            ts: Some(start_of_day(now)),
            all_day: Some(true),
        };
    }

    if BY_TOMORROW.is_match(text) {
        let date = now.date_naive() + Days::new(1);
        if let Some(time) = parse_time_of_day(text) {
            return Inferred {
                ts: Some(at_time(date, time)),
                all_day: Some(false),
            };
        }
        return Inferred {
            ts: Some(to_millis(date.and_time(NaiveTime::MIN))),
            all_day: Some(true),
        };
    }

    if let Some(caps) = BY_WEEKDAY.captures(text) {
        if let Some(weekday) = weekday_from_name(&caps[1]) {
            let base = next_weekday_from(weekday, now);
            if let Some(time) = parse_time_of_day(text) {
                if let Some(date) = Local.timestamp_millis_opt(base).single() {
                    return Inferred {
                        ts: Some(at_time(date.date_naive(), time)),
                        all_day: Some(false),
                    };
                }
            }
            return Inferred {
                ts: Some(base),
                all_day: Some(true),
            };
        }
    }

    // lone "by 18:00" / "by 6pm": today if the time is still ahead,
    // otherwise tomorrow
    if BY.is_match(text) {
        if let Some(time) = parse_time_of_day(text) {
            let mut ts = at_time(now.date_naive(), time);
            if ts <= now.timestamp_millis() {
                ts = at_time(now.date_naive() + Days::new(1), time);
            }
            return Inferred {
                ts: Some(ts),
                all_day: Some(false),
            };
        }
    }

    Inferred::default()
}
