use actix_web::{HttpResponse, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;
use tracing::{debug, info, warn};
use utoipa::ToSchema;

use crate::{
    domain::attendance::{AttendanceStatus, apply_attendance_transition},
    error::ApiError,
    model::doctor::Doctor,
    repo::DoctorRepository,
    utils::clock,
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct AttendanceUpdate {
    /// One of present, absent, on_leave, off_duty
    #[schema(example = "present")]
    pub status: String,
    #[schema(example = "Morning shift", nullable = true)]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct BulkAttendanceItem {
    #[schema(example = 1)]
    pub doctor_id: u64,
    #[schema(example = "on_leave")]
    pub status: String,
    #[schema(example = "Conference", nullable = true)]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct BulkAttendanceRequest {
    pub updates: Vec<BulkAttendanceItem>,
}

#[derive(Debug, PartialEq, Serialize, ToSchema)]
pub struct BulkAttendanceResult {
    #[schema(example = 1)]
    pub doctor_id: u64,
    pub success: bool,
    /// Doctor name, on success
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "Dr. John Smith")]
    pub doctor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "Invalid status")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BulkAttendanceResponse {
    pub results: Vec<BulkAttendanceResult>,
}

#[derive(Debug, Default, PartialEq, Serialize, ToSchema)]
#[schema(example = json!({
    "present": 4,
    "absent": 1,
    "on_leave": 1,
    "off_duty": 0,
    "total": 6
}))]
pub struct AttendanceSummary {
    pub present: i64,
    pub absent: i64,
    pub on_leave: i64,
    pub off_duty: i64,
    pub total: i64,
}

/// Validate, fetch, transition, save. The status is checked before the doctor is looked up.
pub async fn apply_attendance_update<R>(
    repo: &R,
    doctor_id: u64,
    status: &str,
    notes: Option<&str>,
    now: DateTime<Utc>,
) -> Result<Doctor, ApiError>
where
    R: DoctorRepository + ?Sized,
{
    let status = AttendanceStatus::parse(status)?;

    let mut doctor = repo
        .find_doctor(doctor_id)
        .await?
        .ok_or(ApiError::DoctorNotFound)?;

    debug!(doctor_id, from = %doctor.attendance.status, to = %status, "Applying attendance transition");

    let next = apply_attendance_transition(Some(&doctor.attendance), status, notes, now);

    if !repo.save_attendance(doctor_id, &next).await? {
        return Err(ApiError::DoctorNotFound);
    }

    doctor.attendance = next;
    doctor.updated_at = now;
    Ok(doctor)
}

/// Applies each item in order; one failing item never stops the rest.
pub async fn apply_bulk_attendance<R, C>(
    repo: &R,
    items: &[BulkAttendanceItem],
    clock: C,
) -> Vec<BulkAttendanceResult>
where
    R: DoctorRepository + ?Sized,
    C: Fn() -> DateTime<Utc>,
{
    let mut results = Vec::with_capacity(items.len());

    for item in items {
        let outcome =
            apply_attendance_update(repo, item.doctor_id, &item.status, item.notes.as_deref(), clock())
                .await;

        results.push(match outcome {
            Ok(doctor) => BulkAttendanceResult {
                doctor_id: item.doctor_id,
                success: true,
                doctor: Some(doctor.name),
                error: None,
            },
            Err(e) => {
                warn!(doctor_id = item.doctor_id, error = %e, "Bulk attendance item failed");
                let error = match &e {
                    ApiError::Database(db) => db.to_string(),
                    other => other.kind().to_string(),
                };
                BulkAttendanceResult {
                    doctor_id: item.doctor_id,
                    success: false,
                    doctor: None,
                    error: Some(error),
                }
            }
        });
    }

    results
}

pub async fn load_attendance_summary<R>(repo: &R) -> Result<AttendanceSummary, ApiError>
where
    R: DoctorRepository + ?Sized,
{
    let mut summary = AttendanceSummary::default();

    for (status, count) in repo.count_by_status().await? {
        match status {
            AttendanceStatus::Present => summary.present += count,
            AttendanceStatus::Absent => summary.absent += count,
            AttendanceStatus::OnLeave => summary.on_leave += count,
            AttendanceStatus::OffDuty => summary.off_duty += count,
        }
        summary.total += count;
    }

    Ok(summary)
}

/// Update a doctor's attendance
#[utoipa::path(
    post,
    path = "/api/doctors/attendance/{doctor_id}",
    params(
        ("doctor_id" = u64, Path, description = "Doctor ID")
    ),
    request_body = AttendanceUpdate,
    responses(
        (status = 200, description = "Attendance updated", body = Doctor),
        (status = 400, description = "Invalid status", body = Object, example = json!({
            "error": "Invalid status",
            "message": "Status must be one of: present, absent, on_leave, off_duty (got \"vacation\")"
        })),
        (status = 404, description = "Doctor not found", body = Object, example = json!({
            "error": "Doctor not found",
            "message": "No doctor found with the provided ID"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn update_attendance(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<AttendanceUpdate>,
) -> Result<HttpResponse, ApiError> {
    let doctor_id = path.into_inner();

    let doctor = apply_attendance_update(
        pool.get_ref(),
        doctor_id,
        &payload.status,
        payload.notes.as_deref(),
        clock::now(),
    )
    .await?;

    info!(doctor_id, status = %doctor.attendance.status, "Attendance updated");
    Ok(HttpResponse::Ok().json(doctor))
}

/// Apply several attendance updates, reporting each one separately
#[utoipa::path(
    post,
    path = "/api/doctors/bulk-attendance",
    request_body = BulkAttendanceRequest,
    responses(
        (status = 200, description = "Per-item results", body = BulkAttendanceResponse, example = json!({
            "results": [
                {"doctor_id": 1, "success": true, "doctor": "Dr. John Smith"},
                {"doctor_id": 2, "success": false, "error": "Invalid status"}
            ]
        })),
        (status = 400, description = "Malformed request body")
    ),
    tag = "Attendance"
)]
pub async fn bulk_attendance(
    pool: web::Data<MySqlPool>,
    payload: web::Json<BulkAttendanceRequest>,
) -> Result<HttpResponse, ApiError> {
    let results = apply_bulk_attendance(pool.get_ref(), &payload.updates, clock::now).await;

    let failed = results.iter().filter(|r| !r.success).count();
    info!(total = results.len(), failed, "Bulk attendance processed");

    Ok(HttpResponse::Ok().json(BulkAttendanceResponse { results }))
}

/// Count doctors per attendance status
#[utoipa::path(
    get,
    path = "/api/doctors/attendance-summary",
    responses(
        (status = 200, description = "Attendance summary", body = AttendanceSummary),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn attendance_summary(pool: web::Data<MySqlPool>) -> Result<HttpResponse, ApiError> {
    let summary = load_attendance_summary(pool.get_ref()).await?;
    Ok(HttpResponse::Ok().json(summary))
}

/// List doctors currently in the given attendance status
#[utoipa::path(
    get,
    path = "/api/doctors/attendance/{status}",
    params(
        ("status" = String, Path, description = "present, absent, on_leave or off_duty")
    ),
    responses(
        (status = 200, description = "Doctors with that status", body = [Doctor]),
        (status = 400, description = "Invalid status")
    ),
    tag = "Attendance"
)]
pub async fn doctors_by_status(
    pool: web::Data<MySqlPool>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let status = AttendanceStatus::parse(&path.into_inner())?;
    let doctors = pool.get_ref().list_doctors_by_status(status).await?;
    Ok(HttpResponse::Ok().json(doctors))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::doctor::{Contact, DoctorProfile, Schedule};
    use crate::repo::memory::MemoryStore;
    use chrono::{Duration, TimeZone};
    use std::cell::Cell;

    fn t(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 10, 9, minute, 0).unwrap()
    }

    fn profile(name: &str) -> DoctorProfile {
        DoctorProfile {
            name: name.to_string(),
            specialization: "Cardiology".to_string(),
            experience: 10,
            contact: Contact::default(),
            schedule: Schedule::default(),
        }
    }

    async fn store_with(names: &[&str]) -> (MemoryStore, Vec<u64>) {
        let store = MemoryStore::new();
        let mut ids = Vec::new();
        for name in names {
            ids.push(store.insert_doctor(&profile(name), t(0)).await.unwrap().id);
        }
        (store, ids)
    }

    #[actix_web::test]
    async fn present_then_present_keeps_first_check_in() {
        let (store, ids) = store_with(&["Dr. A"]).await;

        let first = apply_attendance_update(&store, ids[0], "present", None, t(1)).await.unwrap();
        assert_eq!(first.attendance.check_in_time, Some(t(1)));
        assert_eq!(first.attendance.check_out_time, None);

        let second = apply_attendance_update(&store, ids[0], "present", None, t(2)).await.unwrap();
        assert_eq!(second.attendance.check_in_time, Some(t(1)));

        let stored = store.find_doctor(ids[0]).await.unwrap().unwrap();
        assert_eq!(stored.attendance, second.attendance);
    }

    #[actix_web::test]
    async fn response_timestamps_match_stored_precision() {
        let (store, ids) = store_with(&["Dr. A"]).await;

        let doctor = apply_attendance_update(&store, ids[0], "present", None, clock::now())
            .await
            .unwrap();

        let check_in = doctor.attendance.check_in_time.unwrap();
        assert_eq!(check_in.timestamp_subsec_nanos() % 1_000_000, 0);
        assert_eq!(doctor.attendance.last_updated, check_in);
        assert_eq!(doctor.updated_at, check_in);
    }

    #[actix_web::test]
    async fn invalid_status_is_rejected_before_lookup() {
        let (store, ids) = store_with(&["Dr. A"]).await;
        let before = store.find_doctor(ids[0]).await.unwrap().unwrap();

        let err = apply_attendance_update(&store, ids[0], "vacation", None, t(1)).await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidStatus(_)));

        // also wins over a missing doctor
        let err = apply_attendance_update(&store, 999, "vacation", None, t(1)).await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidStatus(_)));

        let after = store.find_doctor(ids[0]).await.unwrap().unwrap();
        assert_eq!(before, after);
    }

    #[actix_web::test]
    async fn missing_doctor_is_not_found() {
        let store = MemoryStore::new();
        let err = apply_attendance_update(&store, 42, "present", None, t(1)).await.unwrap_err();
        assert!(matches!(err, ApiError::DoctorNotFound));
    }

    #[actix_web::test]
    async fn bulk_isolates_failures() {
        let (store, ids) = store_with(&["Dr. A", "Dr. B"]).await;

        let items = vec![
            BulkAttendanceItem { doctor_id: ids[0], status: "present".into(), notes: None },
            BulkAttendanceItem { doctor_id: ids[1], status: "bogus".into(), notes: None },
            BulkAttendanceItem { doctor_id: 999, status: "absent".into(), notes: None },
        ];

        let results = apply_bulk_attendance(&store, &items, || t(5)).await;

        assert_eq!(
            results,
            vec![
                BulkAttendanceResult {
                    doctor_id: ids[0],
                    success: true,
                    doctor: Some("Dr. A".into()),
                    error: None,
                },
                BulkAttendanceResult {
                    doctor_id: ids[1],
                    success: false,
                    doctor: None,
                    error: Some("Invalid status".into()),
                },
                BulkAttendanceResult {
                    doctor_id: 999,
                    success: false,
                    doctor: None,
                    error: Some("Doctor not found".into()),
                },
            ]
        );

        let a = store.find_doctor(ids[0]).await.unwrap().unwrap();
        assert_eq!(a.attendance.status, AttendanceStatus::Present);
        let b = store.find_doctor(ids[1]).await.unwrap().unwrap();
        assert_eq!(b.attendance.status, AttendanceStatus::Absent);
    }

    #[actix_web::test]
    async fn bulk_reports_storage_errors_and_carries_on() {
        let (store, ids) = store_with(&["Dr. A", "Dr. B"]).await;
        store.break_attendance_saves(ids[0]);

        let items = vec![
            BulkAttendanceItem { doctor_id: ids[0], status: "present".into(), notes: None },
            BulkAttendanceItem { doctor_id: ids[1], status: "off_duty".into(), notes: Some("night".into()) },
        ];

        let results = apply_bulk_attendance(&store, &items, || t(5)).await;
        assert!(!results[0].success);
        assert_eq!(results[0].error, Some(sqlx::Error::PoolTimedOut.to_string()));
        assert!(results[1].success);

        let b = store.find_doctor(ids[1]).await.unwrap().unwrap();
        assert_eq!(b.attendance.notes, "night");
        assert_eq!(b.attendance.check_out_time, Some(t(5)));
    }

    #[actix_web::test]
    async fn bulk_runs_items_in_order_with_fresh_timestamps() {
        let (store, ids) = store_with(&["Dr. A"]).await;
        let tick = Cell::new(0i64);
        let clock = || {
            tick.set(tick.get() + 1);
            t(0) + Duration::minutes(tick.get())
        };

        let items = vec![
            BulkAttendanceItem { doctor_id: ids[0], status: "absent".into(), notes: None },
            BulkAttendanceItem { doctor_id: ids[0], status: "absent".into(), notes: None },
        ];
        apply_bulk_attendance(&store, &items, clock).await;

        let doctor = store.find_doctor(ids[0]).await.unwrap().unwrap();
        assert_eq!(doctor.attendance.check_out_time, Some(t(2)));
    }

    #[actix_web::test]
    async fn summary_counts_every_status() {
        let (store, ids) = store_with(&["A", "B", "C", "D"]).await;
        apply_attendance_update(&store, ids[0], "present", None, t(1)).await.unwrap();
        apply_attendance_update(&store, ids[1], "present", None, t(1)).await.unwrap();
        apply_attendance_update(&store, ids[2], "on_leave", None, t(1)).await.unwrap();

        let summary = load_attendance_summary(&store).await.unwrap();
        assert_eq!(
            summary,
            AttendanceSummary { present: 2, absent: 1, on_leave: 1, off_duty: 0, total: 4 }
        );
    }

    #[actix_web::test]
    async fn empty_summary_is_all_zero() {
        let store = MemoryStore::new();
        assert_eq!(load_attendance_summary(&store).await.unwrap(), AttendanceSummary::default());
    }

    #[test]
    fn bulk_result_omits_empty_fields() {
        let ok = BulkAttendanceResult { doctor_id: 1, success: true, doctor: Some("Dr. A".into()), error: None };
        let json = serde_json::to_value(&ok).unwrap();
        assert_eq!(json, serde_json::json!({"doctor_id": 1, "success": true, "doctor": "Dr. A"}));
    }
}
