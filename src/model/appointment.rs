use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, EnumString};
use utoipa::ToSchema;

use crate::domain::arrival::{ArrivalStatus, classify_arrival};
use crate::model::doctor::DoctorSummary;
use crate::model::patient::PatientSummary;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, EnumString, AsRefStr, ToSchema)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AppointmentStatus {
    #[default]
    Scheduled,
    Arrived,
    InProgress,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Appointment {
    pub id: u64,
    pub patient_id: u64,
    pub doctor_id: u64,
    pub scheduled_date: NaiveDate,
    /// Wall-clock "HH:MM", 24-hour
    pub scheduled_time: String,
    pub arrival_time: Option<DateTime<Utc>>,
    pub status: AppointmentStatus,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Appointment {
    /// Arrival status with the scheduled slot read in the clinic's time zone.
    pub fn arrival_status(&self, clinic: &FixedOffset) -> ArrivalStatus {
        let arrival = self.arrival_time.map(|t| t.with_timezone(clinic));
        classify_arrival(self.scheduled_date, &self.scheduled_time, arrival.as_ref())
    }
}

/// Fields for a new appointment, already validated.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAppointment {
    pub patient_id: u64,
    pub doctor_id: u64,
    pub scheduled_date: NaiveDate,
    pub scheduled_time: String,
    pub notes: String,
}

/// An appointment as returned by the API: patient and doctor populated,
/// arrival status computed at read time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(
    example = json!({
        "id": 3,
        "patient": {"id": 7, "name": "Jane Roe", "age": 34, "gender": "female", "phone": "5551234567"},
        "doctor": {"id": 1, "name": "Dr. John Smith", "specialization": "Cardiology"},
        "scheduled_date": "2024-01-10",
        "scheduled_time": "09:00",
        "arrival_time": "2024-01-10T09:10:00Z",
        "status": "arrived",
        "arrival_status": "on_time",
        "notes": "",
        "created_at": "2024-01-05T12:00:00Z",
        "updated_at": "2024-01-10T09:10:00Z"
    })
)]
pub struct AppointmentView {
    #[schema(example = 3)]
    pub id: u64,
    pub patient: PatientSummary,
    pub doctor: DoctorSummary,
    #[schema(value_type = String, format = "date", example = "2024-01-10")]
    pub scheduled_date: NaiveDate,
    #[schema(example = "09:00")]
    pub scheduled_time: String,
    #[schema(value_type = Option<String>, format = "date-time")]
    pub arrival_time: Option<DateTime<Utc>>,
    pub status: AppointmentStatus,
    pub arrival_status: ArrivalStatus,
    pub notes: String,
    #[schema(value_type = String, format = "date-time")]
    pub created_at: DateTime<Utc>,
    #[schema(value_type = String, format = "date-time")]
    pub updated_at: DateTime<Utc>,
}

impl AppointmentView {
    pub fn new(
        appointment: Appointment,
        patient: PatientSummary,
        doctor: DoctorSummary,
        clinic: &FixedOffset,
    ) -> Self {
        let arrival_status = appointment.arrival_status(clinic);
        Self {
            id: appointment.id,
            patient,
            doctor,
            scheduled_date: appointment.scheduled_date,
            scheduled_time: appointment.scheduled_time,
            arrival_time: appointment.arrival_time,
            status: appointment.status,
            arrival_status,
            notes: appointment.notes,
            created_at: appointment.created_at,
            updated_at: appointment.updated_at,
        }
    }
}
