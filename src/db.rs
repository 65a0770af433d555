use anyhow::Context;
use chrono::{DateTime, Utc};
use sqlx::MySqlPool;

use crate::model::doctor::{Contact, DoctorProfile, Schedule};
use crate::repo::DoctorRepository;

pub async fn init_db(database_url: &str) -> anyhow::Result<MySqlPool> {
    MySqlPool::connect(database_url)
        .await
        .context("Failed to connect to database")
}

pub async fn run_migrations(pool: &MySqlPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("Failed to run database migrations")
}

/// Demo doctors for a fresh install.
pub fn sample_doctors() -> Vec<DoctorProfile> {
    let doctor = |name: &str, specialization: &str, experience, email: &str, phone: &str, emergency: &str| {
        DoctorProfile {
            name: name.to_string(),
            specialization: specialization.to_string(),
            experience,
            contact: Contact {
                email: Some(email.to_string()),
                phone: Some(phone.to_string()),
                emergency_contact: Some(emergency.to_string()),
            },
            schedule: Schedule::default(),
        }
    };

    vec![
        doctor("Dr. John Smith", "Cardiology", 10, "john.smith@example.com", "1234567890", "9876543210"),
        doctor("Dr. Emily Brown", "Neurology", 8, "emily.brown@example.com", "2345678901", "8765432109"),
        doctor("Dr. Michael Lee", "Orthopedics", 12, "michael.lee@example.com", "3456789012", "7654321098"),
    ]
}

/// Inserts `profiles` only when there are no doctors yet. Returns how many were added.
pub async fn seed_doctors<R>(
    repo: &R,
    profiles: &[DoctorProfile],
    now: DateTime<Utc>,
) -> anyhow::Result<usize>
where
    R: DoctorRepository + ?Sized,
{
    if !repo.list_doctors().await?.is_empty() {
        return Ok(0);
    }

    for profile in profiles {
        repo.insert_doctor(profile, now)
            .await
            .with_context(|| format!("Failed to seed {}", profile.name))?;
    }

    Ok(profiles.len())
}
