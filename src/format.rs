//! Formatting utilities for the gmb client.
//!
//! This module provides functionality for formatting output in various formats
//! including JSON, CSV, and table representations.

use std::fmt;
use std::str::FromStr;
use strum::EnumIter;

pub const JSON: &str = "json";
pub const CSV: &str = "csv";
pub const TABLE: &str = "table";

/// Error types that can occur during formatting operations
#[derive(Debug, thiserror::Error)]
pub enum FormattingError {
    /// Error when an unsupported output format is requested
    #[error("invalid output format {0}")]
    UnsupportedOutputFormat(String),
    /// Error specific to CSV operations
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    /// Error when converting bytes to UTF-8 string
    #[error("UTF-8 conversion error: {0}")]
    Utf8Error(#[from] std::string::FromUtf8Error),

    #[error("JSON serialization error: {0}")]
    JsonSerializationError(#[from] serde_json::Error),

    #[error("CSV writer into inner error: {0}")]
    CsvIntoInnerError(#[from] csv::IntoInnerError<csv::Writer<Vec<u8>>>),
}

#[derive(Debug, Clone, Default, PartialEq, PartialOrd)]
pub struct OutputFormatOptions {
    pub with_headers: bool,
    pub pretty: bool,
}

/// Enum representing the supported output formats
#[derive(Debug, Clone, PartialEq, PartialOrd, EnumIter)]
pub enum OutputFormat {
    /// CSV (Comma-Separated Values) format
    Csv(OutputFormatOptions),
    /// JSON (JavaScript Object Notation) format
    Json(OutputFormatOptions),
    /// Human readable table
    Table(OutputFormatOptions),
}

impl OutputFormat {
    /// Returns a vector of all supported format names as strings
    pub fn names() -> Vec<&'static str> {
        vec![JSON, CSV, TABLE]
    }

    pub fn from_string_with_options(
        format_str: &str,
        options: OutputFormatOptions,
    ) -> Result<OutputFormat, FormattingError> {
        let normalized_format = format_str.to_lowercase();
        match normalized_format.as_str() {
            JSON => Ok(OutputFormat::Json(options)),
            CSV => Ok(OutputFormat::Csv(options)),
            TABLE => Ok(OutputFormat::Table(options)),
            _ => Err(FormattingError::UnsupportedOutputFormat(normalized_format)),
        }
    }

    pub fn options(&self) -> &OutputFormatOptions {
        match self {
            OutputFormat::Csv(options) | OutputFormat::Json(options) | OutputFormat::Table(options) => options,
        }
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        OutputFormat::Json(OutputFormatOptions::default())
    }
}

impl fmt::Display for OutputFormat {
    /// Formats the OutputFormat enum as a string for display purposes
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            OutputFormat::Csv(_) => write!(f, "{}", CSV),
            OutputFormat::Json(_) => write!(f, "{}", JSON),
            OutputFormat::Table(_) => write!(f, "{}", TABLE),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = FormattingError;

    /// Parses a string into an OutputFormat enum variant
    fn from_str(format_str: &str) -> Result<OutputFormat, FormattingError> {
        Self::from_string_with_options(format_str, OutputFormatOptions::default())
    }
}

/// Trait for formatting data in different output formats
pub trait OutputFormatter {
    /// Format the data according to the specified output format
    fn format(&self, format: &OutputFormat) -> Result<String, FormattingError>;
}
