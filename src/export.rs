use serde_json::{Map, Value};
use std::str::FromStr;

use crate::services::{WidgetError, WidgetResult};

pub type Record = Map<String, Value>;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Json => "application/json",
        }
    }

    pub fn filename(self) -> &'static str {
        match self {
            ExportFormat::Csv => "export.csv",
            ExportFormat::Json => "export.json",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = WidgetError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => Err(WidgetError::ValidationFailure(format!(
                "unsupported export format {other:?}"
            ))),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ExportFile {
    pub filename: &'static str,
    pub mime_type: &'static str,
    pub contents: String,
}

pub fn export_records(records: &[Record], format: ExportFormat) -> WidgetResult<ExportFile> {
    let contents = match format {
        ExportFormat::Csv => to_csv(records),
        ExportFormat::Json => serde_json::to_string_pretty(records)
            .map_err(|err| WidgetError::ParseFailure(format!("json export: {err}")))?,
    };
    Ok(ExportFile {
        filename: format.filename(),
        mime_type: format.mime_type(),
        contents,
    })
}

/// Header row from the first record's keys, then one line per record with
/// every field JSON-encoded. Falsy values become `""`.
pub fn to_csv(records: &[Record]) -> String {
    let headers: Vec<&String> = records
        .first()
        .map(|record| record.keys().collect())
        .unwrap_or_default();
    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(
        headers
            .iter()
            .map(|header| header.as_str())
            .collect::<Vec<_>>()
            .join(","),
    );
    for record in records {
        let fields: Vec<String> = headers
            .iter()
            .map(|header| encode_field(record.get(header.as_str())))
            .collect();
        lines.push(fields.join(","));
    }
    lines.join("\n")
}

fn encode_field(value: Option<&Value>) -> String {
    match value {
        Some(value) if is_truthy(value) => {
            serde_json::to_string(value).unwrap_or_else(|_| "\"\"".into())
        }
        _ => "\"\"".into(),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().map(|n| n != 0.0).unwrap_or(true),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn records() -> Vec<Record> {
        let rows = json!([
            {"title": "Intro", "views": 120, "published": true},
            {"title": "Say \"hi\", world", "views": 0, "published": false},
            {"title": "", "views": 7}
        ]);
        rows.as_array()
            .unwrap()
            .iter()
            .map(|row| row.as_object().unwrap().clone())
            .collect()
    }

    #[test]
    fn csv_uses_first_record_keys_and_json_fields() {
        let csv = to_csv(&records());
        assert_eq!(
            csv,
            "title,views,published\n\
             \"Intro\",120,true\n\
             \"Say \\\"hi\\\", world\",\"\",\"\"\n\
             \"\",7,\"\""
        );
    }

    #[test]
    fn empty_collection_exports_empty_header() {
        assert_eq!(to_csv(&[]), "");
    }

    #[test]
    fn json_export_is_indented() {
        let file = export_records(&records()[..1], ExportFormat::Json).unwrap();
        assert_eq!(file.filename, "export.json");
        assert_eq!(file.mime_type, "application/json");
        assert_eq!(
            file.contents,
            "[\n  {\n    \"title\": \"Intro\",\n    \"views\": 120,\n    \"published\": true\n  }\n]"
        );
    }

    #[test]
    fn format_parsing() {
        assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!(ExportFormat::Csv.mime_type(), "text/csv");
        assert!("xml".parse::<ExportFormat>().is_err());
    }
}
