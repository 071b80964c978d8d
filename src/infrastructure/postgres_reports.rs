// Report persistence - Postgres `reports` table
use crate::application::sinks::ReportRepository;
use crate::domain::forecast::ForecastRecord;
use crate::domain::report::SurfReport;
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};

const INSERT_REPORT: &str = r#"
    INSERT INTO reports (longitude, latitude, photo_key, waves, wind, tide, weather, report)
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
"#;

#[derive(Debug, Clone)]
pub struct PostgresReportRepository {
    pool: PgPool,
}

impl PostgresReportRepository {
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await
            .context("Failed to connect to Postgres")?;
        Ok(Self { pool })
    }
}

/// Data columns hold JSON-serialized arrays of records
fn records_json(records: &[ForecastRecord]) -> Result<String> {
    serde_json::to_string(records).context("Failed to serialize report records")
}

#[async_trait]
impl ReportRepository for PostgresReportRepository {
    async fn insert_report(&self, report: &SurfReport) -> Result<()> {
        sqlx::query(INSERT_REPORT)
            .bind(report.longitude)
            .bind(report.latitude)
            .bind(&report.photo_key)
            .bind(records_json(&report.waves)?)
            .bind(records_json(&report.wind)?)
            .bind(records_json(&report.tide)?)
            .bind(records_json(&report.weather)?)
            .bind(records_json(&report.report)?)
            .execute(&self.pool)
            .await
            .context("Failed to insert report")?;

        tracing::debug!(photo_key = %report.photo_key, "Inserted report row");
        Ok(())
    }
}

/// Used when no database is configured: reports are logged and dropped.
#[derive(Debug, Clone, Default)]
pub struct LoggingReportRepository;

#[async_trait]
impl ReportRepository for LoggingReportRepository {
    async fn insert_report(&self, report: &SurfReport) -> Result<()> {
        tracing::info!(
            photo_key = %report.photo_key,
            waves = report.waves.len(),
            "No database configured; report not persisted"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::spot::SpotId;

    #[test]
    fn test_records_json_is_array() {
        let records = vec![ForecastRecord::new(1700000000, &SpotId::new("abc"))];
        let parsed: serde_json::Value = serde_json::from_str(&records_json(&records).unwrap()).unwrap();
        assert_eq!(
            parsed,
            serde_json::json!([{"surf_location": "abc", "timestamp": 1700000000}])
        );
        assert_eq!(records_json(&[]).unwrap(), "[]");
    }

    #[tokio::test]
    async fn test_logging_repository_accepts_reports() {
        let report = SurfReport {
            longitude: 144.28,
            latitude: -38.37,
            photo_key: "144.28_-38.37.jpeg".to_string(),
            waves: vec![],
            wind: vec![],
            tide: vec![],
            weather: vec![],
            report: vec![],
        };
        assert!(LoggingReportRepository.insert_report(&report).await.is_ok());
    }
}
