use actix_web::{HttpResponse, web};
use chrono::{DateTime, FixedOffset, Utc};
use serde::Deserialize;
use serde_json::json;
use sqlx::MySqlPool;
use tracing::info;
use utoipa::ToSchema;

use crate::{
    config::Config,
    error::ApiError,
    model::appointment::{AppointmentStatus, AppointmentView, NewAppointment},
    repo::{AppointmentRepository, DoctorRepository, PatientRepository},
    utils::{
        clock,
        validation::{parse_date, validate_time},
    },
};

#[derive(Debug, Default, Deserialize, ToSchema)]
#[schema(example = json!({
    "patient_id": 7,
    "doctor_id": 1,
    "scheduled_date": "2024-01-10",
    "scheduled_time": "09:00",
    "notes": "Follow-up"
}))]
pub struct CreateAppointment {
    pub patient_id: Option<u64>,
    pub doctor_id: Option<u64>,
    /// `YYYY-MM-DD`
    pub scheduled_date: Option<String>,
    /// `HH:MM`, 24-hour
    pub scheduled_time: Option<String>,
    pub notes: Option<String>,
}

/// Every field is optional; only the ones present are changed.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateAppointment {
    pub patient_id: Option<u64>,
    pub doctor_id: Option<u64>,
    pub scheduled_date: Option<String>,
    pub scheduled_time: Option<String>,
    /// scheduled, arrived, in_progress, completed or cancelled
    #[schema(example = "in_progress")]
    pub status: Option<String>,
    pub notes: Option<String>,
}

async fn ensure_parties_exist<R>(repo: &R, patient_id: u64, doctor_id: u64) -> Result<(), ApiError>
where
    R: PatientRepository + DoctorRepository + ?Sized,
{
    if repo.find_patient(patient_id).await?.is_none() {
        return Err(ApiError::PatientNotFound);
    }
    if repo.find_doctor(doctor_id).await?.is_none() {
        return Err(ApiError::DoctorNotFound);
    }
    Ok(())
}

async fn load_view<R>(repo: &R, id: u64, clinic: &FixedOffset) -> Result<AppointmentView, ApiError>
where
    R: AppointmentRepository + ?Sized,
{
    let (appointment, patient, doctor) = repo
        .find_populated_appointment(id)
        .await?
        .ok_or(ApiError::AppointmentNotFound)?;
    Ok(AppointmentView::new(appointment, patient, doctor, clinic))
}

pub async fn create_appointment_record<R>(
    repo: &R,
    clinic: &FixedOffset,
    payload: CreateAppointment,
    now: DateTime<Utc>,
) -> Result<AppointmentView, ApiError>
where
    R: AppointmentRepository + PatientRepository + DoctorRepository + ?Sized,
{
    let (Some(patient_id), Some(doctor_id), Some(date), Some(time)) = (
        payload.patient_id,
        payload.doctor_id,
        payload.scheduled_date.as_deref(),
        payload.scheduled_time.as_deref(),
    ) else {
        return Err(ApiError::MissingFields(
            "patient_id, doctor_id, scheduled_date, and scheduled_time",
        ));
    };

    let scheduled_date = parse_date(date)?;
    let scheduled_time = validate_time(time)?;
    ensure_parties_exist(repo, patient_id, doctor_id).await?;

    let new = NewAppointment {
        patient_id,
        doctor_id,
        scheduled_date,
        scheduled_time,
        notes: payload.notes.unwrap_or_default(),
    };
    let id = repo.insert_appointment(&new, now).await?;

    load_view(repo, id, clinic).await
}

/// Stamps the arrival. Repeat calls overwrite the previous arrival time.
pub async fn mark_arrival_record<R>(
    repo: &R,
    clinic: &FixedOffset,
    appointment_id: u64,
    now: DateTime<Utc>,
) -> Result<AppointmentView, ApiError>
where
    R: AppointmentRepository + ?Sized,
{
    let mut appointment = repo
        .find_appointment(appointment_id)
        .await?
        .ok_or(ApiError::AppointmentNotFound)?;

    appointment.arrival_time = Some(now);
    appointment.status = AppointmentStatus::Arrived;
    appointment.updated_at = now;

    if !repo.save_appointment(&appointment).await? {
        return Err(ApiError::AppointmentNotFound);
    }

    load_view(repo, appointment_id, clinic).await
}

pub async fn update_appointment_record<R>(
    repo: &R,
    clinic: &FixedOffset,
    appointment_id: u64,
    payload: UpdateAppointment,
    now: DateTime<Utc>,
) -> Result<AppointmentView, ApiError>
where
    R: AppointmentRepository + PatientRepository + DoctorRepository + ?Sized,
{
    let mut appointment = repo
        .find_appointment(appointment_id)
        .await?
        .ok_or(ApiError::AppointmentNotFound)?;

    if let Some(patient_id) = payload.patient_id {
        appointment.patient_id = patient_id;
    }
    if let Some(doctor_id) = payload.doctor_id {
        appointment.doctor_id = doctor_id;
    }
    if let Some(date) = payload.scheduled_date.as_deref() {
        appointment.scheduled_date = parse_date(date)?;
    }
    if let Some(time) = payload.scheduled_time.as_deref() {
        appointment.scheduled_time = validate_time(time)?;
    }
    if let Some(status) = payload.status.as_deref() {
        appointment.status = status.parse().map_err(|_| {
            ApiError::Validation(
                "Status must be one of: scheduled, arrived, in_progress, completed, cancelled"
                    .to_string(),
            )
        })?;
    }
    if let Some(notes) = payload.notes {
        appointment.notes = notes;
    }

    if payload.patient_id.is_some() || payload.doctor_id.is_some() {
        ensure_parties_exist(repo, appointment.patient_id, appointment.doctor_id).await?;
    }

    appointment.updated_at = now;

    if !repo.save_appointment(&appointment).await? {
        return Err(ApiError::AppointmentNotFound);
    }

    load_view(repo, appointment_id, clinic).await
}

pub async fn list_appointment_views<R>(
    repo: &R,
    clinic: &FixedOffset,
) -> Result<Vec<AppointmentView>, ApiError>
where
    R: AppointmentRepository + ?Sized,
{
    Ok(repo
        .list_appointments()
        .await?
        .into_iter()
        .map(|(appointment, patient, doctor)| AppointmentView::new(appointment, patient, doctor, clinic))
        .collect())
}

/// List appointments with patient, doctor and arrival status
#[utoipa::path(
    get,
    path = "/api/appointments",
    responses(
        (status = 200, description = "All appointments", body = [AppointmentView]),
        (status = 500, description = "Internal server error")
    ),
    tag = "Appointment"
)]
pub async fn list_appointments(
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> Result<HttpResponse, ApiError> {
    let views = list_appointment_views(pool.get_ref(), &config.clinic_offset()).await?;
    Ok(HttpResponse::Ok().json(views))
}

/// Book an appointment
#[utoipa::path(
    post,
    path = "/api/appointments/add",
    request_body = CreateAppointment,
    responses(
        (status = 201, description = "Appointment created", body = AppointmentView),
        (status = 400, description = "Missing fields, invalid date or invalid time", body = Object, example = json!({
            "error": "Invalid time format",
            "message": "Please provide time in HH:MM format (e.g., 14:30)"
        })),
        (status = 404, description = "Patient or doctor not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Appointment"
)]
pub async fn create_appointment(
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    payload: web::Json<CreateAppointment>,
) -> Result<HttpResponse, ApiError> {
    let view = create_appointment_record(
        pool.get_ref(),
        &config.clinic_offset(),
        payload.into_inner(),
        clock::now(),
    )
    .await?;

    info!(appointment_id = view.id, patient_id = view.patient.id, doctor_id = view.doctor.id, "Appointment created");
    Ok(HttpResponse::Created().json(view))
}

/// Mark that the patient has arrived
#[utoipa::path(
    post,
    path = "/api/appointments/arrival/{appointment_id}",
    params(
        ("appointment_id" = u64, Path, description = "Appointment ID")
    ),
    responses(
        (status = 200, description = "Arrival recorded", body = AppointmentView),
        (status = 404, description = "Appointment not found", body = Object, example = json!({
            "error": "Appointment not found",
            "message": "No appointment found with the provided ID"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Appointment"
)]
pub async fn mark_arrival(
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    path: web::Path<u64>,
) -> Result<HttpResponse, ApiError> {
    let appointment_id = path.into_inner();
    let view =
        mark_arrival_record(pool.get_ref(), &config.clinic_offset(), appointment_id, clock::now())
            .await?;

    info!(appointment_id, arrival_status = %view.arrival_status, "Arrival marked");
    Ok(HttpResponse::Ok().json(view))
}

/// Update Appointment
#[utoipa::path(
    post,
    path = "/api/appointments/update/{appointment_id}",
    params(
        ("appointment_id" = u64, Path, description = "Appointment ID")
    ),
    request_body = UpdateAppointment,
    responses(
        (status = 200, description = "Appointment updated", body = AppointmentView),
        (status = 400, description = "Invalid date, time or status"),
        (status = 404, description = "Appointment, patient or doctor not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Appointment"
)]
pub async fn update_appointment(
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    path: web::Path<u64>,
    payload: web::Json<UpdateAppointment>,
) -> Result<HttpResponse, ApiError> {
    let appointment_id = path.into_inner();
    let view = update_appointment_record(
        pool.get_ref(),
        &config.clinic_offset(),
        appointment_id,
        payload.into_inner(),
        clock::now(),
    )
    .await?;

    info!(appointment_id, "Appointment updated");
    Ok(HttpResponse::Ok().json(view))
}

/// Delete Appointment
#[utoipa::path(
    delete,
    path = "/api/appointments/delete/{appointment_id}",
    params(
        ("appointment_id" = u64, Path, description = "Appointment ID")
    ),
    responses(
        (status = 200, description = "Successfully deleted", body = Object, example = json!({
            "message": "Appointment deleted successfully"
        })),
        (status = 404, description = "Appointment not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Appointment"
)]
pub async fn delete_appointment(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> Result<HttpResponse, ApiError> {
    let appointment_id = path.into_inner();

    if !pool.get_ref().delete_appointment(appointment_id).await? {
        return Err(ApiError::AppointmentNotFound);
    }

    info!(appointment_id, "Appointment deleted");
    Ok(HttpResponse::Ok().json(json!({
        "message": "Appointment deleted successfully"
    })))
}
