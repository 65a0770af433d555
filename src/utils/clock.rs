use chrono::{DateTime, SubsecRound, Utc};

/// Current time truncated to the millisecond precision of the `DATETIME(3)` columns.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}
