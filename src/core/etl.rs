use crate::domain::ports::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;
use tracing::info;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    pub async fn run(&self) -> Result<String> {
        info!("Starting media mention scan");

        // Extract
        let collected = self.pipeline.extract().await?;
        let candidates: usize = collected.iter().map(|c| c.candidates.len()).sum();
        info!(persons = collected.len(), candidates, "Search phase finished");
        self.monitor.log_stats("extract");

        // Transform
        let result = self.pipeline.transform(collected).await?;
        info!(
            mentions = result.summary.total_mentions,
            persons_with_mentions = result.summary.persons_with_mentions,
            rows = result.rows.len(),
            "Aggregation finished"
        );
        self.monitor.log_stats("transform");

        // Load
        let output_path = self.pipeline.load(result).await?;
        info!(output = %output_path, "Reports written");
        self.monitor.log_final_stats();

        Ok(output_path)
    }
}
