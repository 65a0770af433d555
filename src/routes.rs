use crate::{
    api::{appointment, attendance, doctor, patient},
    config::Config,
    error::ApiError,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::web;
use std::sync::Arc;

// Helper to build per-route limiter
fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
    let per_ms = if requests_per_min == 0 {
        1
    } else {
        60_000 / requests_per_min as u64
    };
    let cfg = GovernorConfigBuilder::default()
        .milliseconds_per_request(per_ms.max(1))
        .burst_size(requests_per_min.max(1))
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .expect("rate limit period and burst are non-zero");
    Governor::new(&cfg)
}

/// Malformed JSON bodies and non-numeric ids answer in the same shape as every other error.
pub fn extractor_config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| ApiError::Validation(err.to_string()).into()),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|err, _req| ApiError::Validation(format!("Invalid ID: {}", err)).into()),
    );
}

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    let api_limiter = Arc::new(build_limiter(config.rate_api_per_min));
    let bulk_limiter = Arc::new(build_limiter(config.rate_bulk_per_min));

    extractor_config(cfg);

    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(api_limiter) // rate limiting
            .service(
                web::scope("/doctors")
                    // /doctors
                    .service(web::resource("").route(web::get().to(doctor::list_doctors)))
                    // /doctors/add
                    .service(web::resource("/add").route(web::post().to(doctor::create_doctor)))
                    // /doctors/update/{id}
                    .service(
                        web::resource("/update/{id}").route(web::post().to(doctor::update_doctor)),
                    )
                    // /doctors/delete/{id}
                    .service(
                        web::resource("/delete/{id}")
                            .route(web::delete().to(doctor::delete_doctor)),
                    )
                    // /doctors/attendance-summary
                    .service(
                        web::resource("/attendance-summary")
                            .route(web::get().to(attendance::attendance_summary)),
                    )
                    // /doctors/attendance/{id} (POST) and /doctors/attendance/{status} (GET)
                    .service(
                        web::resource("/attendance/{key}")
                            .route(web::post().to(attendance::update_attendance))
                            .route(web::get().to(attendance::doctors_by_status)),
                    )
                    // /doctors/bulk-attendance
                    .service(
                        web::resource("/bulk-attendance")
                            .wrap(bulk_limiter)
                            .route(web::post().to(attendance::bulk_attendance)),
                    ),
            )
            .service(
                web::scope("/patients")
                    // /patients
                    .service(web::resource("").route(web::get().to(patient::list_patients)))
                    // /patients/add
                    .service(web::resource("/add").route(web::post().to(patient::create_patient)))
                    // /patients/update/{id}
                    .service(
                        web::resource("/update/{id}")
                            .route(web::post().to(patient::update_patient)),
                    )
                    // /patients/delete/{id}
                    .service(
                        web::resource("/delete/{id}")
                            .route(web::delete().to(patient::delete_patient)),
                    ),
            )
            .service(
                web::scope("/appointments")
                    // /appointments
                    .service(
                        web::resource("").route(web::get().to(appointment::list_appointments)),
                    )
                    // /appointments/add
                    .service(
                        web::resource("/add").route(web::post().to(appointment::create_appointment)),
                    )
                    // /appointments/arrival/{id}
                    .service(
                        web::resource("/arrival/{id}")
                            .route(web::post().to(appointment::mark_arrival)),
                    )
                    // /appointments/update/{id}
                    .service(
                        web::resource("/update/{id}")
                            .route(web::post().to(appointment::update_appointment)),
                    )
                    // /appointments/delete/{id}
                    .service(
                        web::resource("/delete/{id}")
                            .route(web::delete().to(appointment::delete_appointment)),
                    ),
            ),
    );
}
