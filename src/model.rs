use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use csv::Writer;
use serde_json::Value;

use crate::format::{FormattingError, OutputFormat, OutputFormatter};

/// An account, location, invitation, review, category or attribute exactly as
/// the service returned it.
pub type Record = Value;

/// Column used for records that are not JSON objects.
const VALUE_COLUMN: &str = "value";

/// The resource name (`accounts/123`, `locations/456`, ...) of a record.
pub fn resource_name(record: &Record) -> Option<&str> {
    record.get("name").and_then(Value::as_str)
}

/// A list of records as printed by the list actions.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecordList {
    records: Vec<Record>,
}

impl RecordList {
    /// Top-level keys of all records, in the order they are first seen.
    pub fn columns(&self) -> Vec<String> {
        let mut columns: Vec<String> = Vec::new();
        for record in &self.records {
            match record {
                Value::Object(map) => {
                    for key in map.keys() {
                        if !columns.iter().any(|c| c == key) {
                            columns.push(key.clone());
                        }
                    }
                }
                _ => {
                    if !columns.iter().any(|c| c == VALUE_COLUMN) {
                        columns.push(VALUE_COLUMN.to_string());
                    }
                }
            }
        }
        columns
    }

    fn rows(&self, columns: &[String]) -> Vec<Vec<String>> {
        self.records
            .iter()
            .map(|record| {
                columns
                    .iter()
                    .map(|column| match record {
                        Value::Object(map) => cell_text(map.get(column)),
                        other if column == VALUE_COLUMN => cell_text(Some(other)),
                        _ => String::new(),
                    })
                    .collect()
            })
            .collect()
    }

    fn to_csv(&self, with_headers: bool) -> Result<String, FormattingError> {
        let columns = self.columns();
        let mut wtr = Writer::from_writer(vec![]);
        if with_headers {
            wtr.write_record(&columns)?;
        }
        for row in self.rows(&columns) {
            wtr.write_record(&row)?;
        }
        Ok(String::from_utf8(wtr.into_inner()?)?)
    }

    fn to_table(&self) -> String {
        let columns = self.columns();
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(columns.iter().map(Cell::new));
        for row in self.rows(&columns) {
            table.add_row(row);
        }
        table.to_string()
    }
}

/// Strings print bare, nested values as compact JSON, absent values as nothing.
fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

impl From<Vec<Record>> for RecordList {
    fn from(records: Vec<Record>) -> Self {
        RecordList { records }
    }
}

impl OutputFormatter for RecordList {
    fn format(&self, format: &OutputFormat) -> Result<String, FormattingError> {
        match format {
            OutputFormat::Json(options) => {
                if options.pretty {
                    Ok(serde_json::to_string_pretty(&self.records)?)
                } else {
                    Ok(serde_json::to_string(&self.records)?)
                }
            }
            OutputFormat::Csv(options) => self.to_csv(options.with_headers),
            OutputFormat::Table(_) => Ok(self.to_table()),
        }
    }
}
