use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 7,
        "name": "Jane Roe",
        "age": 34,
        "gender": "female",
        "phone": "5551234567",
        "created_at": "2024-01-02T10:00:00Z",
        "updated_at": "2024-01-02T10:00:00Z"
    })
)]
pub struct Patient {
    #[schema(example = 7)]
    pub id: u64,
    #[schema(example = "Jane Roe")]
    pub name: String,
    #[schema(example = 34)]
    pub age: u32,
    #[schema(example = "female")]
    pub gender: String,
    #[schema(example = "5551234567", nullable = true)]
    pub phone: Option<String>,
    #[schema(value_type = String, format = "date-time")]
    pub created_at: DateTime<Utc>,
    #[schema(value_type = String, format = "date-time")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PatientProfile {
    pub name: String,
    pub age: u32,
    pub gender: String,
    pub phone: Option<String>,
}

/// Shape embedded in appointment listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PatientSummary {
    #[schema(example = 7)]
    pub id: u64,
    #[schema(example = "Jane Roe")]
    pub name: String,
    #[schema(example = 34)]
    pub age: u32,
    #[schema(example = "female")]
    pub gender: String,
    #[schema(example = "5551234567", nullable = true)]
    pub phone: Option<String>,
}
