use std::env;
use dotenvy::dotenv;
use chrono::FixedOffset;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub server_addr: String,

    // Rate limiting
    pub rate_api_per_min: u32,
    pub rate_bulk_per_min: u32,

    pub api_prefix: String,

    /// Offset (in minutes east of UTC) the clinic's wall-clock appointment times are in
    pub clinic_utc_offset_minutes: i32,

    pub log_dir: String,
    pub run_migrations: bool,
    pub seed_sample_doctors: bool,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        Self {
            server_addr: env::var("SERVER_ADDR").expect("SERVER_ADDR must be set"),
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),

            rate_api_per_min: env::var("RATE_API_PER_MIN")
                .unwrap_or_else(|_| "1000".to_string())
                .parse()
                .expect("RATE_API_PER_MIN must be a number"),
            rate_bulk_per_min: env::var("RATE_BULK_PER_MIN")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .expect("RATE_BULK_PER_MIN must be a number"),

            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api".to_string()),

            clinic_utc_offset_minutes: env::var("CLINIC_UTC_OFFSET_MINUTES")
                .unwrap_or_else(|_| "0".to_string())
                .parse()
                .expect("CLINIC_UTC_OFFSET_MINUTES must be a number of minutes"),

            log_dir: env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string()),
            run_migrations: parse_flag(env::var("RUN_MIGRATIONS").ok().as_deref(), true),
            seed_sample_doctors: parse_flag(env::var("SEED_SAMPLE_DOCTORS").ok().as_deref(), false),
        }
    }

    /// The clinic time zone; falls back to UTC for out-of-range offsets.
    pub fn clinic_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.clinic_utc_offset_minutes * 60)
            .unwrap_or_else(|| FixedOffset::east_opt(0).expect("zero offset is valid"))
    }
}

fn parse_flag(value: Option<&str>, default: bool) -> bool {
    match value.map(|v| v.trim().to_ascii_lowercase()) {
        Some(v) if matches!(v.as_str(), "1" | "true" | "yes" | "on") => true,
        Some(v) if matches!(v.as_str(), "0" | "false" | "no" | "off") => false,
        _ => default,
    }
}

#[cfg(test)]
pub(crate) fn test_config() -> Config {
    Config {
        database_url: "mysql://localhost/hms_test".to_string(),
        server_addr: "127.0.0.1:0".to_string(),
        rate_api_per_min: 1000,
        rate_bulk_per_min: 60,
        api_prefix: "/api".to_string(),
        clinic_utc_offset_minutes: 0,
        log_dir: "logs".to_string(),
        run_migrations: false,
        seed_sample_doctors: false,
    }
}
