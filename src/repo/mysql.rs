use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, MySqlPool};

use super::{
    AppointmentRepository, DoctorRepository, PatientRepository, PopulatedAppointment, RepoResult,
};
use crate::domain::attendance::{AttendanceRecord, AttendanceStatus};
use crate::model::appointment::{Appointment, AppointmentStatus, NewAppointment};
use crate::model::doctor::{Contact, Doctor, DoctorProfile, DoctorSummary, Schedule, Weekday};
use crate::model::patient::{Patient, PatientProfile, PatientSummary};

fn decode_err<E>(e: E) -> sqlx::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    sqlx::Error::Decode(Box::new(e))
}

// -------------------- Doctors --------------------

const DOCTOR_COLUMNS: &str = r#"
    id, name, specialization, experience,
    email, phone, emergency_contact,
    working_days, start_time, end_time,
    attendance_status, attendance_updated_at, check_in_time, check_out_time, attendance_notes,
    is_active, created_at, updated_at
"#;

#[derive(FromRow)]
struct DoctorRow {
    id: u64,
    name: String,
    specialization: String,
    experience: u32,
    email: Option<String>,
    phone: Option<String>,
    emergency_contact: Option<String>,
    working_days: String,
    start_time: String,
    end_time: String,
    attendance_status: String,
    attendance_updated_at: DateTime<Utc>,
    check_in_time: Option<DateTime<Utc>>,
    check_out_time: Option<DateTime<Utc>>,
    attendance_notes: String,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn join_working_days(days: &[Weekday]) -> String {
    days.iter().map(|d| d.as_ref()).collect::<Vec<_>>().join(",")
}

fn split_working_days(raw: &str) -> RepoResult<Vec<Weekday>> {
    raw.split(',')
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(|d| d.parse::<Weekday>().map_err(decode_err))
        .collect()
}

impl TryFrom<DoctorRow> for Doctor {
    type Error = sqlx::Error;

    fn try_from(row: DoctorRow) -> RepoResult<Self> {
        Ok(Doctor {
            id: row.id,
            name: row.name,
            specialization: row.specialization,
            experience: row.experience,
            contact: Contact {
                email: row.email,
                phone: row.phone,
                emergency_contact: row.emergency_contact,
            },
            schedule: Schedule {
                working_days: split_working_days(&row.working_days)?,
                start_time: row.start_time,
                end_time: row.end_time,
            },
            attendance: AttendanceRecord {
                status: AttendanceStatus::parse(&row.attendance_status).map_err(decode_err)?,
                last_updated: row.attendance_updated_at,
                check_in_time: row.check_in_time,
                check_out_time: row.check_out_time,
                notes: row.attendance_notes,
            },
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn into_doctors(rows: Vec<DoctorRow>) -> RepoResult<Vec<Doctor>> {
    rows.into_iter().map(Doctor::try_from).collect()
}

#[async_trait]
impl DoctorRepository for MySqlPool {
    async fn list_doctors(&self) -> RepoResult<Vec<Doctor>> {
        let sql = format!("SELECT {} FROM doctors ORDER BY id", DOCTOR_COLUMNS);
        let rows = sqlx::query_as::<_, DoctorRow>(&sql).fetch_all(self).await?;
        into_doctors(rows)
    }

    async fn list_doctors_by_status(&self, status: AttendanceStatus) -> RepoResult<Vec<Doctor>> {
        let sql = format!(
            "SELECT {} FROM doctors WHERE attendance_status = ? ORDER BY id",
            DOCTOR_COLUMNS
        );
        let rows = sqlx::query_as::<_, DoctorRow>(&sql)
            .bind(status.as_ref())
            .fetch_all(self)
            .await?;
        into_doctors(rows)
    }

    async fn find_doctor(&self, id: u64) -> RepoResult<Option<Doctor>> {
        let sql = format!("SELECT {} FROM doctors WHERE id = ?", DOCTOR_COLUMNS);
        sqlx::query_as::<_, DoctorRow>(&sql)
            .bind(id)
            .fetch_optional(self)
            .await?
            .map(Doctor::try_from)
            .transpose()
    }

    async fn insert_doctor(&self, profile: &DoctorProfile, now: DateTime<Utc>) -> RepoResult<Doctor> {
        let attendance = AttendanceRecord::new(now);

        let result = sqlx::query(
            r#"
            INSERT INTO doctors
                (name, specialization, experience,
                 email, phone, emergency_contact,
                 working_days, start_time, end_time,
                 attendance_status, attendance_updated_at, attendance_notes,
                 is_active, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, TRUE, ?, ?)
            "#,
        )
        .bind(&profile.name)
        .bind(&profile.specialization)
        .bind(profile.experience)
        .bind(&profile.contact.email)
        .bind(&profile.contact.phone)
        .bind(&profile.contact.emergency_contact)
        .bind(join_working_days(&profile.schedule.working_days))
        .bind(&profile.schedule.start_time)
        .bind(&profile.schedule.end_time)
        .bind(attendance.status.as_ref())
        .bind(attendance.last_updated)
        .bind(&attendance.notes)
        .bind(now)
        .bind(now)
        .execute(self)
        .await?;

        self.find_doctor(result.last_insert_id())
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    async fn update_doctor(
        &self,
        id: u64,
        profile: &DoctorProfile,
        now: DateTime<Utc>,
    ) -> RepoResult<Option<Doctor>> {
        sqlx::query(
            r#"
            UPDATE doctors
            SET name = ?, specialization = ?, experience = ?,
                email = ?, phone = ?, emergency_contact = ?,
                working_days = ?, start_time = ?, end_time = ?,
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&profile.name)
        .bind(&profile.specialization)
        .bind(profile.experience)
        .bind(&profile.contact.email)
        .bind(&profile.contact.phone)
        .bind(&profile.contact.emergency_contact)
        .bind(join_working_days(&profile.schedule.working_days))
        .bind(&profile.schedule.start_time)
        .bind(&profile.schedule.end_time)
        .bind(now)
        .bind(id)
        .execute(self)
        .await?;

        self.find_doctor(id).await
    }

    async fn save_attendance(&self, id: u64, record: &AttendanceRecord) -> RepoResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE doctors
            SET attendance_status = ?,
                attendance_updated_at = ?,
                check_in_time = ?,
                check_out_time = ?,
                attendance_notes = ?,
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(record.status.as_ref())
        .bind(record.last_updated)
        .bind(record.check_in_time)
        .bind(record.check_out_time)
        .bind(&record.notes)
        .bind(record.last_updated)
        .bind(id)
        .execute(self)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_doctor(&self, id: u64) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM doctors WHERE id = ?")
            .bind(id)
            .execute(self)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count_by_status(&self) -> RepoResult<Vec<(AttendanceStatus, i64)>> {
        let rows = sqlx::query_as::<_, (String, i64)>(
            "SELECT attendance_status, COUNT(*) FROM doctors GROUP BY attendance_status",
        )
        .fetch_all(self)
        .await?;

        rows.into_iter()
            .map(|(status, count)| {
                AttendanceStatus::parse(&status)
                    .map(|s| (s, count))
                    .map_err(decode_err)
            })
            .collect()
    }
}

// -------------------- Patients --------------------

#[async_trait]
impl PatientRepository for MySqlPool {
    async fn list_patients(&self) -> RepoResult<Vec<Patient>> {
        sqlx::query_as::<_, Patient>(
            "SELECT id, name, age, gender, phone, created_at, updated_at FROM patients ORDER BY id",
        )
        .fetch_all(self)
        .await
    }

    async fn find_patient(&self, id: u64) -> RepoResult<Option<Patient>> {
        sqlx::query_as::<_, Patient>(
            "SELECT id, name, age, gender, phone, created_at, updated_at FROM patients WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self)
        .await
    }

    async fn insert_patient(&self, profile: &PatientProfile, now: DateTime<Utc>) -> RepoResult<Patient> {
        let result = sqlx::query(
            r#"
            INSERT INTO patients (name, age, gender, phone, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&profile.name)
        .bind(profile.age)
        .bind(&profile.gender)
        .bind(&profile.phone)
        .bind(now)
        .bind(now)
        .execute(self)
        .await?;

        self.find_patient(result.last_insert_id())
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    async fn update_patient(
        &self,
        id: u64,
        profile: &PatientProfile,
        now: DateTime<Utc>,
    ) -> RepoResult<Option<Patient>> {
        sqlx::query(
            r#"
            UPDATE patients
            SET name = ?, age = ?, gender = ?, phone = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&profile.name)
        .bind(profile.age)
        .bind(&profile.gender)
        .bind(&profile.phone)
        .bind(now)
        .bind(id)
        .execute(self)
        .await?;

        self.find_patient(id).await
    }

    async fn delete_patient(&self, id: u64) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM patients WHERE id = ?")
            .bind(id)
            .execute(self)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

// -------------------- Appointments --------------------

#[derive(FromRow)]
struct AppointmentRow {
    id: u64,
    patient_id: u64,
    doctor_id: u64,
    scheduled_date: NaiveDate,
    scheduled_time: String,
    arrival_time: Option<DateTime<Utc>>,
    status: String,
    notes: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<AppointmentRow> for Appointment {
    type Error = sqlx::Error;

    fn try_from(row: AppointmentRow) -> RepoResult<Self> {
        Ok(Appointment {
            id: row.id,
            patient_id: row.patient_id,
            doctor_id: row.doctor_id,
            scheduled_date: row.scheduled_date,
            scheduled_time: row.scheduled_time,
            arrival_time: row.arrival_time,
            status: row.status.parse::<AppointmentStatus>().map_err(decode_err)?,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(FromRow)]
struct PopulatedRow {
    #[sqlx(flatten)]
    appointment: AppointmentRow,
    patient_name: String,
    patient_age: u32,
    patient_gender: String,
    patient_phone: Option<String>,
    doctor_name: String,
    doctor_specialization: String,
}

impl PopulatedRow {
    fn into_populated(row: Self) -> RepoResult<PopulatedAppointment> {
        let patient = PatientSummary {
            id: row.appointment.patient_id,
            name: row.patient_name,
            age: row.patient_age,
            gender: row.patient_gender,
            phone: row.patient_phone,
        };
        let doctor = DoctorSummary {
            id: row.appointment.doctor_id,
            name: row.doctor_name,
            specialization: row.doctor_specialization,
        };
        Ok((Appointment::try_from(row.appointment)?, patient, doctor))
    }
}

const POPULATED_SELECT: &str = r#"
    SELECT
        a.id, a.patient_id, a.doctor_id, a.scheduled_date, a.scheduled_time,
        a.arrival_time, a.status, a.notes, a.created_at, a.updated_at,
        p.name AS patient_name, p.age AS patient_age,
        p.gender AS patient_gender, p.phone AS patient_phone,
        d.name AS doctor_name, d.specialization AS doctor_specialization
    FROM appointments a
    JOIN patients p ON p.id = a.patient_id
    JOIN doctors d ON d.id = a.doctor_id
"#;

#[async_trait]
impl AppointmentRepository for MySqlPool {
    async fn list_appointments(&self) -> RepoResult<Vec<PopulatedAppointment>> {
        // scheduled_time is written zero-padded, so text order is clock order
        let sql = format!("{} ORDER BY a.scheduled_date, a.scheduled_time, a.id", POPULATED_SELECT);
        sqlx::query_as::<_, PopulatedRow>(&sql)
            .fetch_all(self)
            .await?
            .into_iter()
            .map(PopulatedRow::into_populated)
            .collect()
    }

    async fn find_appointment(&self, id: u64) -> RepoResult<Option<Appointment>> {
        sqlx::query_as::<_, AppointmentRow>(
            r#"
            SELECT id, patient_id, doctor_id, scheduled_date, scheduled_time,
                   arrival_time, status, notes, created_at, updated_at
            FROM appointments
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(self)
        .await?
        .map(Appointment::try_from)
        .transpose()
    }

    async fn find_populated_appointment(&self, id: u64) -> RepoResult<Option<PopulatedAppointment>> {
        let sql = format!("{} WHERE a.id = ?", POPULATED_SELECT);
        sqlx::query_as::<_, PopulatedRow>(&sql)
            .bind(id)
            .fetch_optional(self)
            .await?
            .map(PopulatedRow::into_populated)
            .transpose()
    }

    async fn insert_appointment(&self, new: &NewAppointment, now: DateTime<Utc>) -> RepoResult<u64> {
        let result = sqlx::query(
            r#"
            INSERT INTO appointments
                (patient_id, doctor_id, scheduled_date, scheduled_time,
                 status, notes, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(new.patient_id)
        .bind(new.doctor_id)
        .bind(new.scheduled_date)
        .bind(&new.scheduled_time)
        .bind(AppointmentStatus::Scheduled.as_ref())
        .bind(&new.notes)
        .bind(now)
        .bind(now)
        .execute(self)
        .await?;

        Ok(result.last_insert_id())
    }

    async fn save_appointment(&self, appointment: &Appointment) -> RepoResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE appointments
            SET patient_id = ?, doctor_id = ?,
                scheduled_date = ?, scheduled_time = ?,
                arrival_time = ?, status = ?, notes = ?,
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(appointment.patient_id)
        .bind(appointment.doctor_id)
        .bind(appointment.scheduled_date)
        .bind(&appointment.scheduled_time)
        .bind(appointment.arrival_time)
        .bind(appointment.status.as_ref())
        .bind(&appointment.notes)
        .bind(appointment.updated_at)
        .bind(appointment.id)
        .execute(self)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_appointment(&self, id: u64) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM appointments WHERE id = ?")
            .bind(id)
            .execute(self)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
