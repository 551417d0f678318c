pub mod config;
pub mod pipeline;
pub mod present;
pub mod report;
pub mod telemetry;
