use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display};
use utoipa::ToSchema;

/// How late a patient may arrive and still count as on time.
pub const GRACE_PERIOD_MINUTES: i64 = 15;

/// Derived on every read, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr, ToSchema)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ArrivalStatus {
    NotArrived,
    OnTime,
    Late,
}

/// 24-hour "H:MM" or "HH:MM"
static SCHEDULED_TIME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-1]?[0-9]|2[0-3]):([0-5][0-9])$").expect("time pattern compiles")
});

/// Parses a 24-hour "H:MM" / "HH:MM" wall-clock time.
pub fn parse_scheduled_time(value: &str) -> Option<NaiveTime> {
    let caps = SCHEDULED_TIME_RE.captures(value)?;
    NaiveTime::from_hms_opt(caps[1].parse().ok()?, caps[2].parse().ok()?, 0)
}

/// Canonical zero-padded "HH:MM" form of a scheduled time.
pub fn format_scheduled_time(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// Classifies an arrival against the scheduled slot.
///
/// The scheduled date and time are wall-clock values; they are read in the
/// same time zone as `arrival_time`. Arriving early, or up to and including
/// [`GRACE_PERIOD_MINUTES`] after the slot, is `OnTime`.
///
/// `scheduled_time` is expected to be validated on write. A value that does
/// not parse never compares as on time, so it classifies as `Late`.
pub fn classify_arrival<Tz: TimeZone>(
    scheduled_date: NaiveDate,
    scheduled_time: &str,
    arrival_time: Option<&DateTime<Tz>>,
) -> ArrivalStatus {
    let Some(arrival) = arrival_time else {
        return ArrivalStatus::NotArrived;
    };

    let Some(time) = parse_scheduled_time(scheduled_time) else {
        return ArrivalStatus::Late;
    };

    let scheduled = scheduled_date.and_time(time);
    let delta = arrival.naive_local() - scheduled;

    if delta <= Duration::minutes(GRACE_PERIOD_MINUTES) {
        ArrivalStatus::OnTime
    } else {
        ArrivalStatus::Late
    }
}
