pub mod domain;
pub mod notify;
pub mod telemetry;
pub mod transformation;
pub mod transformer;
