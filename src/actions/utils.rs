use std::io::Write;

use tracing::warn;

use crate::{
    actions::CliActionError,
    api::{ApiError, BusinessApiClient},
    format::{OutputFormat, OutputFormatter},
    model::{resource_name, Record, RecordList},
};

/// Resource names of the given records; records without one are skipped.
pub fn resource_names<'a>(kind: &str, records: &'a [Record]) -> Vec<&'a str> {
    records
        .iter()
        .filter_map(|record| {
            let name = resource_name(record);
            if name.is_none() {
                warn!("Skipping {} without a resource name: {}", kind, record);
            }
            name
        })
        .collect()
}

/// Resource names of every account the service account can see.
pub async fn account_names(api: &BusinessApiClient) -> Result<Vec<String>, ApiError> {
    let accounts = api.list_accounts().await?;
    Ok(resource_names("account", &accounts)
        .into_iter()
        .map(str::to_string)
        .collect())
}

/// Resource names of the locations of one account.
pub async fn location_names(api: &BusinessApiClient, account: &str) -> Result<Vec<String>, ApiError> {
    let locations = api.list_locations(account).await?;
    Ok(resource_names("location", &locations)
        .into_iter()
        .map(str::to_string)
        .collect())
}

/// Formats the records and writes them on their own line(s).
pub fn write_records<W: Write>(
    out: &mut W,
    records: Vec<Record>,
    format: &OutputFormat,
) -> Result<(), CliActionError> {
    let output = RecordList::from(records).format(format)?;
    if output.ends_with('\n') {
        write!(out, "{}", output)?;
    } else {
        writeln!(out, "{}", output)?;
    }
    Ok(())
}
