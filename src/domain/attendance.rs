use chrono::{DateTime, Utc};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, EnumIter, EnumString};
use utoipa::ToSchema;

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    EnumIter,
    AsRefStr,
    strum_macros::Display,
    ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AttendanceStatus {
    Present,
    #[default]
    Absent,
    OnLeave,
    OffDuty,
}

/// A requested status outside the four known values.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
#[display(fmt = "Status must be one of: present, absent, on_leave, off_duty (got {:?})", _0)]
pub struct InvalidStatus(pub String);

impl std::error::Error for InvalidStatus {}

impl AttendanceStatus {
    pub fn parse(value: &str) -> Result<Self, InvalidStatus> {
        value.parse().map_err(|_| InvalidStatus(value.to_string()))
    }
}

/// A doctor's attendance. `status` is the single source for both the
/// current and the "today" status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AttendanceRecord {
    pub status: AttendanceStatus,
    #[schema(value_type = String, format = "date-time")]
    pub last_updated: DateTime<Utc>,
    /// Set on the first transition into `present`; never cleared.
    #[schema(value_type = Option<String>, format = "date-time")]
    pub check_in_time: Option<DateTime<Utc>>,
    /// Refreshed on every transition to a non-`present` status.
    #[schema(value_type = Option<String>, format = "date-time")]
    pub check_out_time: Option<DateTime<Utc>>,
    pub notes: String,
}

impl AttendanceRecord {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            status: AttendanceStatus::Absent,
            last_updated: now,
            check_in_time: None,
            check_out_time: None,
            notes: String::new(),
        }
    }
}

/// Computes the record that results from moving to `status` at `now`.
///
/// Any status may follow any other, including itself. `current` is left
/// untouched; a missing record starts from the absent default.
pub fn apply_attendance_transition(
    current: Option<&AttendanceRecord>,
    status: AttendanceStatus,
    notes: Option<&str>,
    now: DateTime<Utc>,
) -> AttendanceRecord {
    let mut next = current
        .cloned()
        .unwrap_or_else(|| AttendanceRecord::new(now));

    next.status = status;
    next.last_updated = now;
    next.notes = notes.unwrap_or_default().to_string();

    if status == AttendanceStatus::Present {
        if next.check_in_time.is_none() {
            next.check_in_time = Some(now);
        }
    } else {
        next.check_out_time = Some(now);
    }

    next
}
