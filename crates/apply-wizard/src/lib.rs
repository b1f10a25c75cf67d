pub mod config;
pub mod error;
pub mod roles;
pub mod telemetry;
pub mod wizard;
