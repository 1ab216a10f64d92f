use crate::domain::model::{ColumnSchema, InputRecord, RecordId};
use crate::utils::error::{CoderError, Result};

/// 解析上傳的 CSV，欄位不齊時整批拒絕
pub fn parse_records(data: &[u8], schema: &ColumnSchema) -> Result<Vec<InputRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(data);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .enumerate()
        .map(|(i, h)| {
            // Excel 匯出的 CSV 常帶 BOM
            if i == 0 {
                h.trim_start_matches('\u{feff}').to_string()
            } else {
                h.to_string()
            }
        })
        .collect();

    let position = |name: &str| headers.iter().position(|h| h == name);
    let (id_index, text_index) = match (position(&schema.id_column), position(&schema.text_column)) {
        (Some(id), Some(text)) => (id, text),
        (id, text) => {
            let mut missing = Vec::new();
            if id.is_none() {
                missing.push(schema.id_column.clone());
            }
            if text.is_none() {
                missing.push(schema.text_column.clone());
            }
            tracing::debug!("Available columns: {:?}", headers);
            return Err(CoderError::SchemaValidationError {
                required: schema.required(),
                missing,
            });
        }
    };

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let id = row.get(id_index).unwrap_or_default();
        let text = row.get(text_index).unwrap_or_default();
        records.push(InputRecord {
            id: RecordId::new(id),
            text: text.to_string(),
        });
    }

    tracing::debug!("Parsed {} records from CSV", records.len());
    Ok(records)
}
