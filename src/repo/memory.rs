use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{
    AppointmentRepository, DoctorRepository, PatientRepository, PopulatedAppointment, RepoResult,
};
use crate::domain::attendance::{AttendanceRecord, AttendanceStatus};
use crate::model::appointment::{Appointment, AppointmentStatus, NewAppointment};
use crate::model::doctor::{Doctor, DoctorProfile, DoctorSummary};
use crate::model::patient::{Patient, PatientProfile, PatientSummary};

#[derive(Default)]
struct Tables {
    next_id: u64,
    doctors: BTreeMap<u64, Doctor>,
    patients: BTreeMap<u64, Patient>,
    appointments: BTreeMap<u64, Appointment>,
    broken_doctors: HashSet<u64>,
}

impl Tables {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn populate(&self, appointment: &Appointment) -> Option<PopulatedAppointment> {
        let patient = self.patients.get(&appointment.patient_id)?;
        let doctor = self.doctors.get(&appointment.doctor_id)?;
        Some((
            appointment.clone(),
            PatientSummary {
                id: patient.id,
                name: patient.name.clone(),
                age: patient.age,
                gender: patient.gender.clone(),
                phone: patient.phone.clone(),
            },
            DoctorSummary {
                id: doctor.id,
                name: doctor.name.clone(),
                specialization: doctor.specialization.clone(),
            },
        ))
    }
}

/// In-process stand-in for the MySQL pool.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every attendance save for `doctor_id` fail with a storage error.
    pub fn break_attendance_saves(&self, doctor_id: u64) {
        self.tables.lock().unwrap().broken_doctors.insert(doctor_id);
    }
}

#[async_trait]
impl DoctorRepository for MemoryStore {
    async fn list_doctors(&self) -> RepoResult<Vec<Doctor>> {
        Ok(self.tables.lock().unwrap().doctors.values().cloned().collect())
    }

    async fn list_doctors_by_status(&self, status: AttendanceStatus) -> RepoResult<Vec<Doctor>> {
        Ok(self
            .tables
            .lock()
            .unwrap()
            .doctors
            .values()
            .filter(|d| d.attendance.status == status)
            .cloned()
            .collect())
    }

    async fn find_doctor(&self, id: u64) -> RepoResult<Option<Doctor>> {
        Ok(self.tables.lock().unwrap().doctors.get(&id).cloned())
    }

    async fn insert_doctor(&self, profile: &DoctorProfile, now: DateTime<Utc>) -> RepoResult<Doctor> {
        let mut tables = self.tables.lock().unwrap();
        let id = tables.next_id();
        let doctor = Doctor {
            id,
            name: profile.name.clone(),
            specialization: profile.specialization.clone(),
            experience: profile.experience,
            contact: profile.contact.clone(),
            schedule: profile.schedule.clone(),
            attendance: AttendanceRecord::new(now),
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        tables.doctors.insert(id, doctor.clone());
        Ok(doctor)
    }

    async fn update_doctor(
        &self,
        id: u64,
        profile: &DoctorProfile,
        now: DateTime<Utc>,
    ) -> RepoResult<Option<Doctor>> {
        let mut tables = self.tables.lock().unwrap();
        Ok(tables.doctors.get_mut(&id).map(|doctor| {
            doctor.name = profile.name.clone();
            doctor.specialization = profile.specialization.clone();
            doctor.experience = profile.experience;
            doctor.contact = profile.contact.clone();
            doctor.schedule = profile.schedule.clone();
            doctor.updated_at = now;
            doctor.clone()
        }))
    }

    async fn save_attendance(&self, id: u64, record: &AttendanceRecord) -> RepoResult<bool> {
        let mut tables = self.tables.lock().unwrap();
        if tables.broken_doctors.contains(&id) {
            return Err(sqlx::Error::PoolTimedOut);
        }
        Ok(match tables.doctors.get_mut(&id) {
            Some(doctor) => {
                doctor.attendance = record.clone();
                doctor.updated_at = record.last_updated;
                true
            }
            None => false,
        })
    }

    async fn delete_doctor(&self, id: u64) -> RepoResult<bool> {
        let mut tables = self.tables.lock().unwrap();
        let removed = tables.doctors.remove(&id).is_some();
        tables.appointments.retain(|_, a| a.doctor_id != id);
        Ok(removed)
    }

    async fn count_by_status(&self) -> RepoResult<Vec<(AttendanceStatus, i64)>> {
        let tables = self.tables.lock().unwrap();
        let mut counts: HashMap<AttendanceStatus, i64> = HashMap::new();
        for doctor in tables.doctors.values() {
            *counts.entry(doctor.attendance.status).or_insert(0) += 1;
        }
        Ok(counts.into_iter().collect())
    }
}

#[async_trait]
impl PatientRepository for MemoryStore {
    async fn list_patients(&self) -> RepoResult<Vec<Patient>> {
        Ok(self.tables.lock().unwrap().patients.values().cloned().collect())
    }

    async fn find_patient(&self, id: u64) -> RepoResult<Option<Patient>> {
        Ok(self.tables.lock().unwrap().patients.get(&id).cloned())
    }

    async fn insert_patient(&self, profile: &PatientProfile, now: DateTime<Utc>) -> RepoResult<Patient> {
        let mut tables = self.tables.lock().unwrap();
        let id = tables.next_id();
        let patient = Patient {
            id,
            name: profile.name.clone(),
            age: profile.age,
            gender: profile.gender.clone(),
            phone: profile.phone.clone(),
            created_at: now,
            updated_at: now,
        };
        tables.patients.insert(id, patient.clone());
        Ok(patient)
    }

    async fn update_patient(
        &self,
        id: u64,
        profile: &PatientProfile,
        now: DateTime<Utc>,
    ) -> RepoResult<Option<Patient>> {
        let mut tables = self.tables.lock().unwrap();
        Ok(tables.patients.get_mut(&id).map(|patient| {
            patient.name = profile.name.clone();
            patient.age = profile.age;
            patient.gender = profile.gender.clone();
            patient.phone = profile.phone.clone();
            patient.updated_at = now;
            patient.clone()
        }))
    }

    async fn delete_patient(&self, id: u64) -> RepoResult<bool> {
        let mut tables = self.tables.lock().unwrap();
        let removed = tables.patients.remove(&id).is_some();
        tables.appointments.retain(|_, a| a.patient_id != id);
        Ok(removed)
    }
}

#[async_trait]
impl AppointmentRepository for MemoryStore {
    async fn list_appointments(&self) -> RepoResult<Vec<PopulatedAppointment>> {
        let tables = self.tables.lock().unwrap();
        let mut rows: Vec<PopulatedAppointment> = tables
            .appointments
            .values()
            .filter_map(|a| tables.populate(a))
            .collect();
        rows.sort_by(|(a, ..), (b, ..)| {
            (a.scheduled_date, &a.scheduled_time, a.id).cmp(&(b.scheduled_date, &b.scheduled_time, b.id))
        });
        Ok(rows)
    }

    async fn find_appointment(&self, id: u64) -> RepoResult<Option<Appointment>> {
        Ok(self.tables.lock().unwrap().appointments.get(&id).cloned())
    }

    async fn find_populated_appointment(&self, id: u64) -> RepoResult<Option<PopulatedAppointment>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.appointments.get(&id).and_then(|a| tables.populate(a)))
    }

    async fn insert_appointment(&self, new: &NewAppointment, now: DateTime<Utc>) -> RepoResult<u64> {
        let mut tables = self.tables.lock().unwrap();
        let id = tables.next_id();
        tables.appointments.insert(
            id,
            Appointment {
                id,
                patient_id: new.patient_id,
                doctor_id: new.doctor_id,
                scheduled_date: new.scheduled_date,
                scheduled_time: new.scheduled_time.clone(),
                arrival_time: None,
                status: AppointmentStatus::Scheduled,
                notes: new.notes.clone(),
                created_at: now,
                updated_at: now,
            },
        );
        Ok(id)
    }

    async fn save_appointment(&self, appointment: &Appointment) -> RepoResult<bool> {
        let mut tables = self.tables.lock().unwrap();
        Ok(match tables.appointments.get_mut(&appointment.id) {
            Some(stored) => {
                *stored = appointment.clone();
                true
            }
            None => false,
        })
    }

    async fn delete_appointment(&self, id: u64) -> RepoResult<bool> {
        Ok(self.tables.lock().unwrap().appointments.remove(&id).is_some())
    }
}
