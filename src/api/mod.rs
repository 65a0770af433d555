pub mod appointment;
pub mod attendance;
pub mod doctor;
pub mod patient;
