use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, EnumString};
use utoipa::ToSchema;

use crate::domain::attendance::AttendanceRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, AsRefStr, ToSchema)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "working_days": ["monday", "tuesday", "wednesday", "thursday", "friday"],
    "start_time": "09:00",
    "end_time": "17:00"
}))]
pub struct Schedule {
    pub working_days: Vec<Weekday>,
    #[schema(example = "09:00")]
    pub start_time: String,
    #[schema(example = "17:00")]
    pub end_time: String,
}

impl Default for Schedule {
    fn default() -> Self {
        Self {
            working_days: vec![
                Weekday::Monday,
                Weekday::Tuesday,
                Weekday::Wednesday,
                Weekday::Thursday,
                Weekday::Friday,
            ],
            start_time: "09:00".to_string(),
            end_time: "17:00".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Contact {
    #[schema(example = "john.smith@example.com", nullable = true)]
    pub email: Option<String>,
    #[schema(example = "1234567890", nullable = true)]
    pub phone: Option<String>,
    #[schema(example = "9876543210", nullable = true)]
    pub emergency_contact: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "name": "Dr. John Smith",
        "specialization": "Cardiology",
        "experience": 10,
        "contact": {
            "email": "john.smith@example.com",
            "phone": "1234567890",
            "emergency_contact": "9876543210"
        },
        "schedule": {
            "working_days": ["monday", "tuesday", "wednesday", "thursday", "friday"],
            "start_time": "09:00",
            "end_time": "17:00"
        },
        "attendance": {
            "status": "present",
            "last_updated": "2024-01-10T09:02:00Z",
            "check_in_time": "2024-01-10T09:02:00Z",
            "check_out_time": null,
            "notes": "On duty"
        },
        "is_active": true,
        "created_at": "2024-01-01T08:00:00Z",
        "updated_at": "2024-01-10T09:02:00Z"
    })
)]
pub struct Doctor {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = "Dr. John Smith")]
    pub name: String,
    #[schema(example = "Cardiology")]
    pub specialization: String,
    /// Years of practice
    #[schema(example = 10)]
    pub experience: u32,
    pub contact: Contact,
    pub schedule: Schedule,
    pub attendance: AttendanceRecord,
    pub is_active: bool,
    #[schema(value_type = String, format = "date-time")]
    pub created_at: DateTime<Utc>,
    #[schema(value_type = String, format = "date-time")]
    pub updated_at: DateTime<Utc>,
}

/// Profile fields written on create and update; attendance is managed separately.
#[derive(Debug, Clone, PartialEq)]
pub struct DoctorProfile {
    pub name: String,
    pub specialization: String,
    pub experience: u32,
    pub contact: Contact,
    pub schedule: Schedule,
}

/// Shape embedded in appointment listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DoctorSummary {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = "Dr. John Smith")]
    pub name: String,
    #[schema(example = "Cardiology")]
    pub specialization: String,
}
