use std::io::Write;

use futures::future::try_join_all;
use tracing::{debug, info, trace};

use crate::{
    actions::{
        utils::{account_names, resource_names, write_records},
        CliActionError,
    },
    api::{ApiError, BusinessApiClient},
    format::OutputFormat,
};

/// Prints the pending invitations of every account, one list per account.
pub async fn list_invitations<W: Write>(
    api: &BusinessApiClient,
    format: &OutputFormat,
    out: &mut W,
) -> Result<(), CliActionError> {
    trace!("Executing 'list-invitations' action");

    for account in account_names(api).await? {
        let invitations = api.list_invitations(&account).await?;
        if invitations.is_empty() {
            debug!("Account {} has no pending invitations", account);
            continue;
        }
        write_records(out, invitations, format)?;
    }
    Ok(())
}

/// Accepts every pending invitation of every account.
///
/// Accounts are processed concurrently and so are the invitations of each
/// account. Nothing is reported until every accept call has finished; the
/// first failure fails the whole action. Returns the number of accepted
/// invitations.
pub async fn accept_invitations<W: Write>(
    api: &BusinessApiClient,
    out: &mut W,
) -> Result<usize, CliActionError> {
    trace!("Executing 'accept-invitations' action");

    let accounts = account_names(api).await?;
    let accepted = try_join_all(
        accounts
            .iter()
            .map(|account| accept_account_invitations(api, account)),
    )
    .await?;

    let total: usize = accepted.iter().sum();
    writeln!(out, "Invitations accepted: {}", total)?;
    Ok(total)
}

async fn accept_account_invitations(api: &BusinessApiClient, account: &str) -> Result<usize, ApiError> {
    let invitations = api.list_invitations(account).await?;
    let names = resource_names("invitation", &invitations);

    let responses = try_join_all(names.iter().map(|name| async move {
        let response = api.accept_invitation(name).await?;
        info!("Accepted invitation {}", name);
        Ok::<_, ApiError>(response)
    }))
    .await?;

    debug!("Accepted {} invitation(s) for {}", responses.len(), account);
    Ok(responses.len())
}
