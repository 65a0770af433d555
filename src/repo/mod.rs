//! Persistence boundary. Services talk to these traits; the MySQL pool
//! implements them for the running server and an in-memory store backs tests.
//!
//! Writes are plain read-modify-write: nothing here locks a row between a
//! `find_*` and the matching save, so concurrent updates of one record are
//! last-write-wins.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::attendance::{AttendanceRecord, AttendanceStatus};
use crate::model::appointment::{Appointment, NewAppointment};
use crate::model::doctor::{Doctor, DoctorProfile, DoctorSummary};
use crate::model::patient::{Patient, PatientProfile, PatientSummary};

pub mod mysql;

#[cfg(test)]
pub mod memory;

pub type RepoResult<T> = Result<T, sqlx::Error>;

/// An appointment with the patient and doctor it references.
pub type PopulatedAppointment = (Appointment, PatientSummary, DoctorSummary);

#[async_trait]
pub trait DoctorRepository: Send + Sync {
    async fn list_doctors(&self) -> RepoResult<Vec<Doctor>>;

    async fn list_doctors_by_status(&self, status: AttendanceStatus) -> RepoResult<Vec<Doctor>>;

    async fn find_doctor(&self, id: u64) -> RepoResult<Option<Doctor>>;

    /// Inserts a doctor with a fresh `absent` attendance record.
    async fn insert_doctor(&self, profile: &DoctorProfile, now: DateTime<Utc>) -> RepoResult<Doctor>;

    async fn update_doctor(
        &self,
        id: u64,
        profile: &DoctorProfile,
        now: DateTime<Utc>,
    ) -> RepoResult<Option<Doctor>>;

    /// Overwrites the whole attendance record. Returns `false` if the doctor is gone.
    async fn save_attendance(&self, id: u64, record: &AttendanceRecord) -> RepoResult<bool>;

    async fn delete_doctor(&self, id: u64) -> RepoResult<bool>;

    /// Number of doctors per current attendance status; statuses with no doctors may be absent.
    async fn count_by_status(&self) -> RepoResult<Vec<(AttendanceStatus, i64)>>;
}

#[async_trait]
pub trait PatientRepository: Send + Sync {
    async fn list_patients(&self) -> RepoResult<Vec<Patient>>;

    async fn find_patient(&self, id: u64) -> RepoResult<Option<Patient>>;

    async fn insert_patient(&self, profile: &PatientProfile, now: DateTime<Utc>) -> RepoResult<Patient>;

    async fn update_patient(
        &self,
        id: u64,
        profile: &PatientProfile,
        now: DateTime<Utc>,
    ) -> RepoResult<Option<Patient>>;

    async fn delete_patient(&self, id: u64) -> RepoResult<bool>;
}

#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    async fn list_appointments(&self) -> RepoResult<Vec<PopulatedAppointment>>;

    async fn find_appointment(&self, id: u64) -> RepoResult<Option<Appointment>>;

    async fn find_populated_appointment(&self, id: u64) -> RepoResult<Option<PopulatedAppointment>>;

    /// Inserts in `scheduled` status and returns the new id.
    async fn insert_appointment(&self, new: &NewAppointment, now: DateTime<Utc>) -> RepoResult<u64>;

    /// Overwrites every mutable column. Returns `false` if the appointment is gone.
    async fn save_appointment(&self, appointment: &Appointment) -> RepoResult<bool>;

    async fn delete_appointment(&self, id: u64) -> RepoResult<bool>;
}
