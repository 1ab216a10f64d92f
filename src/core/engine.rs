use crate::core::{BatchReport, InputRecord, Pipeline};
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub report: BatchReport,
    pub output_path: Option<String>,
}

pub struct CodingEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> CodingEngine<P> {
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

    pub async fn run(&self) -> Result<RunOutcome> {
        tracing::info!("🚀 Starting ICD-10 coding run");

        // 載入並驗證欄位，失敗時整批不執行
        let records = self.pipeline.extract().await?;
        tracing::info!("📋 Loaded {} records", records.len());
        self.monitor.log_stats("Load");

        let report = self.pipeline.transform(records).await?;
        tracing::info!(
            "🩺 Generated codes for {} records ({} ok, {} failed)",
            report.results.len(),
            report.succeeded(),
            report.failed()
        );
        self.monitor.log_stats("Generate");

        let output_path = self.pipeline.load(&report).await?;
        if let Some(path) = &output_path {
            tracing::info!("📁 Results saved to: {}", path);
        }
        self.monitor.log_stats("Report");
        self.monitor.log_final_stats();

        Ok(RunOutcome {
            report,
            output_path,
        })
    }

    /// 只載入與驗證輸入，不呼叫模型
    pub async fn preview(&self) -> Result<Vec<InputRecord>> {
        let records = self.pipeline.extract().await?;
        tracing::info!("🔍 Dry run: {} records would be processed", records.len());
        Ok(records)
    }
}
