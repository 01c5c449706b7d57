//! Command execution: wires configuration, credentials and the API client
//! together and runs the selected action.

use std::io::Write;
use std::sync::Arc;

use chrono::Duration;
use clap::ArgMatches;
use tracing::debug;

use crate::{
    actions::{accounts, attributes, categories, invitations, locations, reviews},
    api::BusinessApiClient,
    auth::ServiceAccountAuthenticator,
    commands::{
        COMMAND_ACCEPT_INVITATIONS, COMMAND_ACCOUNTS_LIST, COMMAND_ATTRIBUTES_LIST,
        COMMAND_CATEGORIES_LIST, COMMAND_LIST_INVITATIONS, COMMAND_LOCATIONS_LIST,
        COMMAND_REVIEWS_LIST, PARAMETER_FORMAT, PARAMETER_HEADERS, PARAMETER_PRETTY,
    },
    configuration::Configuration,
    credential::ServiceCredential,
    error::CliError,
    format::{OutputFormat, OutputFormatOptions, JSON, TABLE},
    http_utils::{HttpClient, HttpRequestConfig},
    token_cache::CredentialCache,
};

/// Runs the action selected on the command line, writing results to stdout.
pub async fn execute_command(matches: &ArgMatches) -> Result<(), CliError> {
    let Some((action, sub_matches)) = matches.subcommand() else {
        return Err(CliError::UsageError("error: no action given".to_string()));
    };

    let configuration = Configuration::load_default()?;
    let api = create_api_client(&configuration)?;

    let mut stdout = std::io::stdout();
    run_action(&api, action, sub_matches, &mut stdout).await
}

/// Builds the API client described by the configuration.
///
/// The token exchange shares the connection pool of the API client.
pub fn create_api_client(configuration: &Configuration) -> Result<BusinessApiClient, CliError> {
    let credential = ServiceCredential::load_from_file(configuration.key_file())?;
    let http = HttpClient::new(HttpRequestConfig::from_configuration(configuration))
        .map_err(CliError::HttpClientError)?;

    let authenticator = ServiceAccountAuthenticator::new(http.inner(), credential)
        .with_subject(configuration.subject().map(str::to_string))
        .with_token_uri(configuration.token_uri().map(str::to_string));
    debug!(
        "Authenticating as {} via {}",
        authenticator.subject(),
        authenticator.token_uri()
    );

    let credentials = CredentialCache::new(Arc::new(authenticator), configuration.token_cache())
        .with_skew(Duration::seconds(configuration.token_skew() as i64));
    debug!(
        "Token cache: {:?}, skew {}s",
        credentials.policy(),
        configuration.token_skew()
    );

    Ok(BusinessApiClient::new(
        http,
        Arc::new(credentials),
        configuration.endpoint_table(),
    ))
}

/// Dispatches one action against the given client.
pub async fn run_action<W: Write>(
    api: &BusinessApiClient,
    action: &str,
    sub_matches: &ArgMatches,
    out: &mut W,
) -> Result<(), CliError> {
    match action {
        COMMAND_ACCOUNTS_LIST => {
            let format = output_format(sub_matches, TABLE)?;
            accounts::list_accounts(api, &format, out).await?;
        }
        COMMAND_LOCATIONS_LIST => {
            let format = output_format(sub_matches, JSON)?;
            locations::list_locations(api, &format, out).await?;
        }
        COMMAND_CATEGORIES_LIST => {
            let format = output_format(sub_matches, JSON)?;
            categories::list_categories(api, &format, out).await?;
        }
        COMMAND_REVIEWS_LIST => {
            let format = output_format(sub_matches, JSON)?;
            reviews::list_reviews(api, &format, out).await?;
        }
        COMMAND_LIST_INVITATIONS => {
            let format = output_format(sub_matches, JSON)?;
            invitations::list_invitations(api, &format, out).await?;
        }
        COMMAND_ACCEPT_INVITATIONS => {
            invitations::accept_invitations(api, out).await?;
        }
        COMMAND_ATTRIBUTES_LIST => {
            let format = output_format(sub_matches, JSON)?;
            attributes::list_attributes(api, &format, out).await?;
        }
        other => {
            return Err(CliError::UsageError(format!(
                "error: unrecognized action '{}'",
                other
            )))
        }
    }
    Ok(())
}

/// Output format from the format flags, or `default_format` when none was given.
pub fn output_format(matches: &ArgMatches, default_format: &str) -> Result<OutputFormat, CliError> {
    let format_str = matches
        .get_one::<String>(PARAMETER_FORMAT)
        .map(String::as_str)
        .unwrap_or(default_format);

    let options = OutputFormatOptions {
        with_headers: matches.get_flag(PARAMETER_HEADERS),
        pretty: matches.get_flag(PARAMETER_PRETTY),
    };

    Ok(OutputFormat::from_string_with_options(format_str, options)?)
}
