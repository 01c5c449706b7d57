use std::io::Write;

use tracing::{debug, trace};

use crate::{
    actions::{
        utils::{account_names, write_records},
        CliActionError,
    },
    api::BusinessApiClient,
    format::OutputFormat,
};

/// Prints the locations of every account, one list per account.
///
/// Accounts without locations print nothing.
pub async fn list_locations<W: Write>(
    api: &BusinessApiClient,
    format: &OutputFormat,
    out: &mut W,
) -> Result<(), CliActionError> {
    trace!("Executing 'locations-list' action");

    for account in account_names(api).await? {
        let locations = api.list_locations(&account).await?;
        if locations.is_empty() {
            debug!("Account {} has no locations", account);
            continue;
        }
        write_records(out, locations, format)?;
    }
    Ok(())
}
