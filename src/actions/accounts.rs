use std::io::Write;

use tracing::trace;

use crate::{
    actions::{utils::write_records, CliActionError},
    api::BusinessApiClient,
    format::OutputFormat,
};

/// Prints every account the service account has access to.
pub async fn list_accounts<W: Write>(
    api: &BusinessApiClient,
    format: &OutputFormat,
    out: &mut W,
) -> Result<(), CliActionError> {
    trace!("Executing 'accounts-list' action");

    let accounts = api.list_accounts().await?;
    write_records(out, accounts, format)
}
