use actix_web::{HttpResponse, web};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use sqlx::MySqlPool;
use tracing::info;
use utoipa::ToSchema;

use crate::{
    error::ApiError,
    model::patient::{Patient, PatientProfile},
    repo::PatientRepository,
    utils::{clock, validation::non_blank},
};

#[derive(Debug, Default, Deserialize, ToSchema)]
#[schema(example = json!({
    "name": "Jane Roe",
    "age": 34,
    "gender": "female",
    "phone": "5551234567"
}))]
pub struct PatientPayload {
    pub name: Option<String>,
    pub age: Option<u32>,
    pub gender: Option<String>,
    pub phone: Option<String>,
}

impl PatientPayload {
    pub fn into_profile(self) -> Result<PatientProfile, ApiError> {
        let (Some(name), Some(age), Some(gender)) = (
            non_blank(self.name.as_deref()),
            self.age,
            non_blank(self.gender.as_deref()),
        ) else {
            return Err(ApiError::MissingFields("name, age, and gender"));
        };

        Ok(PatientProfile {
            name,
            age,
            gender,
            phone: non_blank(self.phone.as_deref()),
        })
    }
}

pub async fn update_patient_record<R>(
    repo: &R,
    patient_id: u64,
    payload: PatientPayload,
    now: DateTime<Utc>,
) -> Result<Patient, ApiError>
where
    R: PatientRepository + ?Sized,
{
    let profile = payload.into_profile()?;
    repo.update_patient(patient_id, &profile, now)
        .await?
        .ok_or(ApiError::PatientNotFound)
}

/// List all patients
#[utoipa::path(
    get,
    path = "/api/patients",
    responses(
        (status = 200, description = "All patients", body = [Patient]),
        (status = 500, description = "Internal server error")
    ),
    tag = "Patient"
)]
pub async fn list_patients(pool: web::Data<MySqlPool>) -> Result<HttpResponse, ApiError> {
    let patients = pool.get_ref().list_patients().await?;
    Ok(HttpResponse::Ok().json(patients))
}

/// Register Patient
#[utoipa::path(
    post,
    path = "/api/patients/add",
    request_body = PatientPayload,
    responses(
        (status = 201, description = "Patient created", body = Patient),
        (status = 400, description = "Missing required fields", body = Object, example = json!({
            "error": "Missing required fields",
            "message": "name, age, and gender are required"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Patient"
)]
pub async fn create_patient(
    pool: web::Data<MySqlPool>,
    payload: web::Json<PatientPayload>,
) -> Result<HttpResponse, ApiError> {
    let profile = payload.into_inner().into_profile()?;
    let patient = pool.get_ref().insert_patient(&profile, clock::now()).await?;

    info!(patient_id = patient.id, "Patient created");
    Ok(HttpResponse::Created().json(patient))
}

/// Update Patient
#[utoipa::path(
    post,
    path = "/api/patients/update/{patient_id}",
    params(
        ("patient_id" = u64, Path, description = "Patient ID")
    ),
    request_body = PatientPayload,
    responses(
        (status = 200, description = "Patient updated", body = Patient),
        (status = 400, description = "Missing required fields"),
        (status = 404, description = "Patient not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Patient"
)]
pub async fn update_patient(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<PatientPayload>,
) -> Result<HttpResponse, ApiError> {
    let patient_id = path.into_inner();
    let patient =
        update_patient_record(pool.get_ref(), patient_id, payload.into_inner(), clock::now()).await?;

    info!(patient_id, "Patient updated");
    Ok(HttpResponse::Ok().json(patient))
}

/// Delete Patient
#[utoipa::path(
    delete,
    path = "/api/patients/delete/{patient_id}",
    params(
        ("patient_id" = u64, Path, description = "Patient ID")
    ),
    responses(
        (status = 200, description = "Successfully deleted", body = Object, example = json!({
            "message": "Patient deleted successfully"
        })),
        (status = 404, description = "Patient not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Patient"
)]
pub async fn delete_patient(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> Result<HttpResponse, ApiError> {
    let patient_id = path.into_inner();

    if !pool.get_ref().delete_patient(patient_id).await? {
        return Err(ApiError::PatientNotFound);
    }

    info!(patient_id, "Patient deleted");
    Ok(HttpResponse::Ok().json(json!({
        "message": "Patient deleted successfully"
    })))
}
