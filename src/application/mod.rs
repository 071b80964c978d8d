// Application layer - Use cases and collaborator traits
pub mod error;
pub mod forecast_service;
pub mod forecast_source;
pub mod report_service;
pub mod sinks;

#[cfg(test)]
pub mod fakes;
