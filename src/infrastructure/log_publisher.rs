// Report publisher that only writes the record to the log
use crate::application::ports::ReportPublisher;
use crate::domain::report::ReportRecord;
use async_trait::async_trait;

#[derive(Debug, Clone, Default)]
pub struct LogPublisher;

#[async_trait]
impl ReportPublisher for LogPublisher {
    async fn publish(&self, record: &ReportRecord) -> anyhow::Result<()> {
        let json = serde_json::to_string(record)?;
        tracing::info!("REPORT DATA: {}", json);
        Ok(())
    }
}
