use std::io::Write;

use tracing::trace;

use crate::{
    actions::{utils::write_records, CliActionError},
    api::BusinessApiClient,
    format::OutputFormat,
};

/// Prints the business categories for the configured region and language.
pub async fn list_categories<W: Write>(
    api: &BusinessApiClient,
    format: &OutputFormat,
    out: &mut W,
) -> Result<(), CliActionError> {
    trace!("Executing 'categories-list' action");

    let categories = api.list_categories().await?;
    if !categories.is_empty() {
        write_records(out, categories, format)?;
    }
    Ok(())
}
