use crate::api::appointment::{CreateAppointment, UpdateAppointment};
use crate::api::attendance::{
    AttendanceSummary, AttendanceUpdate, BulkAttendanceItem, BulkAttendanceRequest,
    BulkAttendanceResponse, BulkAttendanceResult,
};
use crate::api::doctor::DoctorPayload;
use crate::api::patient::PatientPayload;
use crate::domain::arrival::ArrivalStatus;
use crate::domain::attendance::{AttendanceRecord, AttendanceStatus};
use crate::model::appointment::{AppointmentStatus, AppointmentView};
use crate::model::doctor::{Contact, Doctor, DoctorSummary, Schedule, Weekday};
use crate::model::patient::{Patient, PatientSummary};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Hospital Management API",
        version = "1.0.0",
        description = r#"
## Hospital Management System

Back end for a small clinic: doctors, patients and their appointments.

### Key Features
- **Doctors**
  - Register doctors with contact details and a weekly schedule
- **Attendance**
  - Daily doctor status (present, absent, on leave, off duty), one at a time or in bulk
  - Check-in time kept from the first "present" of the day, check-out on leaving
- **Patients**
  - Basic patient records
- **Appointments**
  - Booking, arrival marking and on-time / late classification with a 15 minute grace period

### Response Format
- JSON bodies
- Errors as `{"error": "...", "message": "..."}`

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::doctor::list_doctors,
        crate::api::doctor::create_doctor,
        crate::api::doctor::update_doctor,
        crate::api::doctor::delete_doctor,

        crate::api::attendance::update_attendance,
        crate::api::attendance::bulk_attendance,
        crate::api::attendance::attendance_summary,
        crate::api::attendance::doctors_by_status,

        crate::api::patient::list_patients,
        crate::api::patient::create_patient,
        crate::api::patient::update_patient,
        crate::api::patient::delete_patient,

        crate::api::appointment::list_appointments,
        crate::api::appointment::create_appointment,
        crate::api::appointment::mark_arrival,
        crate::api::appointment::update_appointment,
        crate::api::appointment::delete_appointment
    ),
    components(
        schemas(
            Doctor,
            DoctorSummary,
            DoctorPayload,
            Contact,
            Schedule,
            Weekday,
            AttendanceRecord,
            AttendanceStatus,
            AttendanceUpdate,
            AttendanceSummary,
            BulkAttendanceItem,
            BulkAttendanceRequest,
            BulkAttendanceResult,
            BulkAttendanceResponse,
            Patient,
            PatientSummary,
            PatientPayload,
            AppointmentView,
            AppointmentStatus,
            ArrivalStatus,
            CreateAppointment,
            UpdateAppointment
        )
    ),
    tags(
        (name = "Doctor", description = "Doctor management APIs"),
        (name = "Attendance", description = "Doctor attendance APIs"),
        (name = "Patient", description = "Patient management APIs"),
        (name = "Appointment", description = "Appointment and arrival APIs"),
    )
)]
pub struct ApiDoc;
