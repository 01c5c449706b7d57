use std::io::Write;

use tracing::{debug, trace};

use crate::{
    actions::{
        utils::{account_names, location_names, write_records},
        CliActionError,
    },
    api::BusinessApiClient,
    format::OutputFormat,
};

/// Prints the reviews of every location, one list per location.
pub async fn list_reviews<W: Write>(
    api: &BusinessApiClient,
    format: &OutputFormat,
    out: &mut W,
) -> Result<(), CliActionError> {
    trace!("Executing 'reviews-list' action");

    for account in account_names(api).await? {
        for location in location_names(api, &account).await? {
            let reviews = api.list_reviews(&account, &location).await?;
            if reviews.is_empty() {
                debug!("Location {} has no reviews", location);
                continue;
            }
            write_records(out, reviews, format)?;
        }
    }
    Ok(())
}
