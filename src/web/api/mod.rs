pub mod commands;
pub mod error;
pub mod scene;
pub mod telemetry;
