use actix_web::{HttpResponse, web};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use sqlx::MySqlPool;
use tracing::info;
use utoipa::ToSchema;

use crate::{
    error::ApiError,
    model::doctor::{Contact, Doctor, DoctorProfile, Schedule, Weekday},
    repo::DoctorRepository,
    utils::{
        clock,
        validation::{non_blank, validate_time},
    },
};

/// Body for both create and update; `name`, `specialization` and `experience` are required.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[schema(example = json!({
    "name": "Dr. Emily Brown",
    "specialization": "Neurology",
    "experience": 8,
    "email": "emily.brown@example.com",
    "phone": "2345678901",
    "emergency_contact": "8765432109",
    "working_days": ["monday", "wednesday", "friday"],
    "start_time": "08:30",
    "end_time": "16:30"
}))]
pub struct DoctorPayload {
    pub name: Option<String>,
    pub specialization: Option<String>,
    pub experience: Option<u32>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub emergency_contact: Option<String>,
    pub working_days: Option<Vec<Weekday>>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

impl DoctorPayload {
    /// Builds a validated profile. Schedule fields left out fall back to `current`.
    pub fn into_profile(self, current: &Schedule) -> Result<DoctorProfile, ApiError> {
        let (Some(name), Some(specialization), Some(experience)) = (
            non_blank(self.name.as_deref()),
            non_blank(self.specialization.as_deref()),
            self.experience,
        ) else {
            return Err(ApiError::MissingFields("name, specialization, and experience"));
        };

        let start_time = validate_time(self.start_time.as_deref().unwrap_or(&current.start_time))?;
        let end_time = validate_time(self.end_time.as_deref().unwrap_or(&current.end_time))?;

        Ok(DoctorProfile {
            name,
            specialization,
            experience,
            contact: Contact {
                email: non_blank(self.email.as_deref()),
                phone: non_blank(self.phone.as_deref()),
                emergency_contact: non_blank(self.emergency_contact.as_deref()),
            },
            schedule: Schedule {
                working_days: self
                    .working_days
                    .unwrap_or_else(|| current.working_days.clone()),
                start_time,
                end_time,
            },
        })
    }
}

pub async fn create_doctor_record<R>(
    repo: &R,
    payload: DoctorPayload,
    now: DateTime<Utc>,
) -> Result<Doctor, ApiError>
where
    R: DoctorRepository + ?Sized,
{
    let profile = payload.into_profile(&Schedule::default())?;
    Ok(repo.insert_doctor(&profile, now).await?)
}

pub async fn update_doctor_record<R>(
    repo: &R,
    doctor_id: u64,
    payload: DoctorPayload,
    now: DateTime<Utc>,
) -> Result<Doctor, ApiError>
where
    R: DoctorRepository + ?Sized,
{
    // required fields are checked before the lookup
    let current = match (&payload.name, &payload.specialization, payload.experience) {
        (Some(_), Some(_), Some(_)) => repo
            .find_doctor(doctor_id)
            .await?
            .ok_or(ApiError::DoctorNotFound)?,
        _ => return Err(ApiError::MissingFields("name, specialization, and experience")),
    };

    let profile = payload.into_profile(&current.schedule)?;

    repo.update_doctor(doctor_id, &profile, now)
        .await?
        .ok_or(ApiError::DoctorNotFound)
}

/// List all doctors
#[utoipa::path(
    get,
    path = "/api/doctors",
    responses(
        (status = 200, description = "All doctors", body = [Doctor]),
        (status = 500, description = "Internal server error")
    ),
    tag = "Doctor"
)]
pub async fn list_doctors(pool: web::Data<MySqlPool>) -> Result<HttpResponse, ApiError> {
    let doctors = pool.get_ref().list_doctors().await?;
    Ok(HttpResponse::Ok().json(doctors))
}

/// Create Doctor
#[utoipa::path(
    post,
    path = "/api/doctors/add",
    request_body = DoctorPayload,
    responses(
        (status = 201, description = "Doctor created", body = Doctor),
        (status = 400, description = "Missing required fields", body = Object, example = json!({
            "error": "Missing required fields",
            "message": "name, specialization, and experience are required"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Doctor"
)]
pub async fn create_doctor(
    pool: web::Data<MySqlPool>,
    payload: web::Json<DoctorPayload>,
) -> Result<HttpResponse, ApiError> {
    let doctor = create_doctor_record(pool.get_ref(), payload.into_inner(), clock::now()).await?;

    info!(doctor_id = doctor.id, name = %doctor.name, "Doctor created");
    Ok(HttpResponse::Created().json(doctor))
}

/// Update Doctor
#[utoipa::path(
    post,
    path = "/api/doctors/update/{doctor_id}",
    params(
        ("doctor_id" = u64, Path, description = "Doctor ID")
    ),
    request_body = DoctorPayload,
    responses(
        (status = 200, description = "Doctor updated", body = Doctor),
        (status = 400, description = "Missing required fields or invalid schedule"),
        (status = 404, description = "Doctor not found", body = Object, example = json!({
            "error": "Doctor not found",
            "message": "No doctor found with the provided ID"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Doctor"
)]
pub async fn update_doctor(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<DoctorPayload>,
) -> Result<HttpResponse, ApiError> {
    let doctor_id = path.into_inner();
    let doctor =
        update_doctor_record(pool.get_ref(), doctor_id, payload.into_inner(), clock::now()).await?;

    info!(doctor_id, "Doctor updated");
    Ok(HttpResponse::Ok().json(doctor))
}

/// Delete Doctor
#[utoipa::path(
    delete,
    path = "/api/doctors/delete/{doctor_id}",
    params(
        ("doctor_id" = u64, Path, description = "Doctor ID")
    ),
    responses(
        (status = 200, description = "Successfully deleted", body = Object, example = json!({
            "message": "Doctor deleted successfully"
        })),
        (status = 404, description = "Doctor not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Doctor"
)]
pub async fn delete_doctor(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> Result<HttpResponse, ApiError> {
    let doctor_id = path.into_inner();

    if !pool.get_ref().delete_doctor(doctor_id).await? {
        return Err(ApiError::DoctorNotFound);
    }

    info!(doctor_id, "Doctor deleted");
    Ok(HttpResponse::Ok().json(json!({
        "message": "Doctor deleted successfully"
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::attendance::AttendanceStatus;
    use crate::repo::memory::MemoryStore;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 10, 8, 0, 0).unwrap()
    }

    fn payload() -> DoctorPayload {
        DoctorPayload {
            name: Some("  Dr. Emily Brown ".into()),
            specialization: Some("Neurology".into()),
            experience: Some(8),
            email: Some("emily.brown@example.com".into()),
            ..Default::default()
        }
    }

    #[actix_web::test]
    async fn create_trims_and_applies_default_schedule() {
        let store = MemoryStore::new();
        let doctor = create_doctor_record(&store, payload(), now()).await.unwrap();

        assert_eq!(doctor.name, "Dr. Emily Brown");
        assert_eq!(doctor.schedule, Schedule::default());
        assert_eq!(doctor.contact.email.as_deref(), Some("emily.brown@example.com"));
        assert_eq!(doctor.contact.phone, None);
        assert_eq!(doctor.attendance.status, AttendanceStatus::Absent);
        assert!(doctor.is_active);
    }

    #[actix_web::test]
    async fn create_requires_name_specialization_experience() {
        let store = MemoryStore::new();
        let missing = DoctorPayload {
            experience: None,
            ..payload()
        };
        let err = create_doctor_record(&store, missing, now()).await.unwrap_err();
        assert!(matches!(err, ApiError::MissingFields(_)));

        let blank = DoctorPayload {
            name: Some("   ".into()),
            ..payload()
        };
        let err = create_doctor_record(&store, blank, now()).await.unwrap_err();
        assert!(matches!(err, ApiError::MissingFields(_)));

        assert!(store.list_doctors().await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn create_rejects_bad_schedule_times() {
        let store = MemoryStore::new();
        let bad = DoctorPayload {
            start_time: Some("25:00".into()),
            ..payload()
        };
        let err = create_doctor_record(&store, bad, now()).await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidTimeFormat));
    }

    #[actix_web::test]
    async fn update_keeps_schedule_fields_left_out() {
        let store = MemoryStore::new();
        let created = create_doctor_record(
            &store,
            DoctorPayload {
                working_days: Some(vec![Weekday::Saturday]),
                start_time: Some("10:00".into()),
                ..payload()
            },
            now(),
        )
        .await
        .unwrap();

        let updated = update_doctor_record(
            &store,
            created.id,
            DoctorPayload {
                name: Some("Dr. Emily Brown-Lee".into()),
                end_time: Some("18:00".into()),
                ..payload()
            },
            now(),
        )
        .await
        .unwrap();

        assert_eq!(updated.name, "Dr. Emily Brown-Lee");
        assert_eq!(updated.schedule.working_days, vec![Weekday::Saturday]);
        assert_eq!(updated.schedule.start_time, "10:00");
        assert_eq!(updated.schedule.end_time, "18:00");
        assert_eq!(updated.attendance, created.attendance);
    }

    #[actix_web::test]
    async fn update_of_missing_doctor_is_not_found() {
        let store = MemoryStore::new();
        let err = update_doctor_record(&store, 77, payload(), now()).await.unwrap_err();
        assert!(matches!(err, ApiError::DoctorNotFound));
    }

    #[test]
    fn payload_reads_lowercase_weekdays() {
        let body = serde_json::json!({
            "name": "Dr. Michael Lee",
            "specialization": "Orthopedics",
            "experience": 12,
            "working_days": ["monday", "sunday"]
        });
        let payload: DoctorPayload = serde_json::from_value(body).unwrap();
        assert_eq!(payload.working_days, Some(vec![Weekday::Monday, Weekday::Sunday]));
    }
}
