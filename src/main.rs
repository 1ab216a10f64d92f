use clap::Parser;
use icd_coder::config::{build_client, build_session, output_settings};
use icd_coder::utils::error::ErrorSeverity;
use icd_coder::utils::{logger, validation::Validate};
use icd_coder::{
    build_icd_prompt, CliConfig, CodingEngine, CodingPipeline, CoderError, ConsoleProgress,
    LocalStorage, TomlConfig,
};
use std::sync::Arc;

fn exit_with(e: &CoderError) -> ! {
    tracing::error!(
        "❌ Run failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}

#[tokio::main]
async fn main() {
    let mut config = CliConfig::parse();

    // 初始化日誌
    if config.json_logs {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting icd-coder");

    if let Some(path) = config.config.clone() {
        tracing::info!("📁 Loading configuration from: {}", path);
        match TomlConfig::from_file(&path) {
            Ok(file) => config = config.merge_file(file),
            Err(e) => exit_with(&e),
        }
    }
    tracing::debug!("Effective config: {:?}", config);

    // 驗證配置
    if let Err(e) = config.validate() {
        exit_with(&e);
    }

    let session = match build_session(&config) {
        Ok(session) => session,
        Err(e) => exit_with(&e),
    };
    let client = match build_client(&config) {
        Ok(client) => client,
        Err(e) => exit_with(&e),
    };

    tracing::info!(
        "🤖 Model: {} @ {}",
        session.model_id,
        client.endpoint()
    );

    let pipeline = CodingPipeline::new(LocalStorage::new("."), client, session)
        .with_output(output_settings(&config))
        .with_progress(Arc::new(ConsoleProgress::stdout()));
    let engine = CodingEngine::new_with_monitoring(pipeline, config.monitor);

    if config.dry_run {
        match engine.preview().await {
            Ok(records) => {
                println!("🔍 {} records ready for model {}", records.len(), engine.pipeline().session().model_id);
                if let Some(first) = records.first() {
                    println!("First prompt (ID: {}):\n{}", first.id, build_icd_prompt(&first.text));
                }
            }
            Err(e) => exit_with(&e),
        }
        return;
    }

    match engine.run().await {
        Ok(outcome) => {
            println!(
                "✅ Processing completed. {} ok, {} failed.",
                outcome.report.succeeded(),
                outcome.report.failed()
            );
            if let Some(path) = outcome.output_path {
                println!("📁 Results saved to: {}", path);
            }
        }
        Err(e) => exit_with(&e),
    }
}
