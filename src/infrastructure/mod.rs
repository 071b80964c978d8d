// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod http_response;
pub mod object_photo_store;
pub mod postgres_reports;
pub mod retry;
pub mod surfline_client;
