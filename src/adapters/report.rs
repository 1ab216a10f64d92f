use crate::domain::model::{BatchReport, OutputFormat};
use crate::utils::error::{CoderError, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct ResultRow<'a> {
    id: &'a str,
    icd10_codes: &'a str,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    model: &'a str,
    generated_at: DateTime<Utc>,
    succeeded: usize,
    failed: usize,
    results: Vec<ResultRow<'a>>,
}

fn rows(report: &BatchReport) -> Vec<ResultRow<'_>> {
    report
        .results
        .iter()
        .map(|r| ResultRow {
            id: r.id.as_str(),
            icd10_codes: r.output(),
            status: if r.is_success() { "ok" } else { "error" },
            error: r.error().map(|e| e.to_string()),
        })
        .collect()
}

pub fn render(report: &BatchReport, format: OutputFormat) -> Result<Vec<u8>> {
    match format {
        OutputFormat::Csv => render_csv(report),
        OutputFormat::Json => render_json(report, Utc::now()),
    }
}

/// `id,icd10_codes,status,error`，一列一筆結果
pub fn render_csv(report: &BatchReport) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["id", "icd10_codes", "status", "error"])?;
    for row in rows(report) {
        let error = row.error.unwrap_or_default();
        writer.write_record([row.id, row.icd10_codes, row.status, error.as_str()])?;
    }
    writer.into_inner().map_err(|e| CoderError::ProcessingError {
        message: format!("Failed to flush CSV output: {}", e),
    })
}

pub fn render_json(report: &BatchReport, generated_at: DateTime<Utc>) -> Result<Vec<u8>> {
    let doc = JsonReport {
        model: &report.model_id,
        generated_at,
        succeeded: report.succeeded(),
        failed: report.failed(),
        results: rows(report),
    };
    Ok(serde_json::to_vec_pretty(&doc)?)
}
