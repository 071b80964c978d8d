// Sink traits for report photos and report rows
use crate::domain::report::SurfReport;
use async_trait::async_trait;
use bytes::Bytes;

#[async_trait]
pub trait PhotoStore: Send + Sync {
    /// Store raw image bytes under `key`
    async fn put_photo(&self, key: &str, image: Bytes) -> anyhow::Result<()>;
}

#[async_trait]
pub trait ReportRepository: Send + Sync {
    /// Persist one report row
    async fn insert_report(&self, report: &SurfReport) -> anyhow::Result<()>;
}
