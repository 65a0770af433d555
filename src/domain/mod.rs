//! Pure business rules. Nothing in here touches the database or the network;
//! callers fetch records, run them through these functions and persist the result.

pub mod arrival;
pub mod attendance;
