use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use derive_more::Display;
use serde_json::json;

use crate::domain::attendance::InvalidStatus;

/// Errors surfaced to API callers.
#[derive(Debug, Display)]
pub enum ApiError {
    #[display(fmt = "{}", _0)]
    InvalidStatus(InvalidStatus),

    #[display(fmt = "Please provide time in HH:MM format (e.g., 14:30)")]
    InvalidTimeFormat,

    #[display(fmt = "Please provide a valid date")]
    InvalidDate,

    /// Names the fields the caller must supply
    #[display(fmt = "{} are required", _0)]
    MissingFields(&'static str),

    #[display(fmt = "{}", _0)]
    Validation(String),

    #[display(fmt = "No doctor found with the provided ID")]
    DoctorNotFound,

    #[display(fmt = "No patient found with the provided ID")]
    PatientNotFound,

    #[display(fmt = "No appointment found with the provided ID")]
    AppointmentNotFound,

    #[display(fmt = "Database error: {}", _0)]
    Database(sqlx::Error),
}

impl std::error::Error for ApiError {}

impl ApiError {
    /// Short label used in the `error` field of response bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::InvalidStatus(_) => "Invalid status",
            ApiError::InvalidTimeFormat => "Invalid time format",
            ApiError::InvalidDate => "Invalid date format",
            ApiError::MissingFields(_) => "Missing required fields",
            ApiError::Validation(_) => "Validation failed",
            ApiError::DoctorNotFound => "Doctor not found",
            ApiError::PatientNotFound => "Patient not found",
            ApiError::AppointmentNotFound => "Appointment not found",
            ApiError::Database(_) => "Internal Server Error",
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        ApiError::Database(e)
    }
}

impl From<InvalidStatus> for ApiError {
    fn from(e: InvalidStatus) -> Self {
        ApiError::InvalidStatus(e)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidStatus(_)
            | ApiError::InvalidTimeFormat
            | ApiError::InvalidDate
            | ApiError::MissingFields(_)
            | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::DoctorNotFound | ApiError::PatientNotFound | ApiError::AppointmentNotFound => {
                StatusCode::NOT_FOUND
            }
            ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            ApiError::Database(e) => {
                tracing::error!(error = %e, "Database operation failed");
                "Something went wrong, Contact with system admin".to_string()
            }
            other => other.to_string(),
        };

        HttpResponse::build(self.status_code()).json(json!({
            "error": self.kind(),
            "message": message
        }))
    }
}
