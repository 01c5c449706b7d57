//! CLI command definitions and argument parsing.
//!
//! This module defines the CLI actions and their arguments using the clap crate.

use clap::Command;

pub mod params;

pub use params::{
    ACTIONS, COMMAND_ACCEPT_INVITATIONS, COMMAND_ACCOUNTS_LIST, COMMAND_ATTRIBUTES_LIST,
    COMMAND_CATEGORIES_LIST, COMMAND_LIST_INVITATIONS, COMMAND_LOCATIONS_LIST,
    COMMAND_REVIEWS_LIST, PARAMETER_FORMAT, PARAMETER_HEADERS, PARAMETER_PRETTY,
    PARAMETER_VERBOSE,
};

/// Create and configure all CLI actions and their arguments.
///
/// The action is optional at the clap level so that a missing action is
/// reported through the same usage error path as an unknown one.
pub fn create_cli_commands() -> Command {
    Command::new(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .propagate_version(true)
        .arg(params::verbose_parameter())
        .arg(params::format_parameter())
        .arg(params::format_pretty_parameter())
        .arg(params::format_with_headers_parameter())
        .subcommand(
            Command::new(COMMAND_ACCOUNTS_LIST)
                .about("List the accounts the service account can manage (table by default)"),
        )
        .subcommand(
            Command::new(COMMAND_LOCATIONS_LIST)
                .about("List the locations of every account, one JSON array per account"),
        )
        .subcommand(
            Command::new(COMMAND_REVIEWS_LIST)
                .about("List the reviews of every location of every account"),
        )
        .subcommand(
            Command::new(COMMAND_CATEGORIES_LIST).about("List the business categories (it/IT)"),
        )
        .subcommand(
            Command::new(COMMAND_LIST_INVITATIONS)
                .about("List the pending invitations of every account"),
        )
        .subcommand(
            Command::new(COMMAND_ACCEPT_INVITATIONS)
                .about("Accept every pending invitation of every account"),
        )
        .subcommand(
            Command::new(COMMAND_ATTRIBUTES_LIST)
                .about("List the attributes available to every location"),
        )
}

/// The short usage message printed when the action is missing or unknown.
pub fn usage() -> String {
    format!(
        "Usage: {} <action>\n  action: {}",
        env!("CARGO_PKG_NAME"),
        ACTIONS.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn command_definition_is_valid() {
        create_cli_commands().debug_assert();
    }

    #[test]
    fn every_action_parses() {
        for action in ACTIONS {
            let matches = create_cli_commands()
                .try_get_matches_from(["gmb", action])
                .unwrap();
            assert_eq!(matches.subcommand_name(), Some(action));
        }
    }

    #[test]
    fn missing_action_parses_without_subcommand() {
        let matches = create_cli_commands().try_get_matches_from(["gmb"]).unwrap();
        assert!(matches.subcommand_name().is_none());
    }

    #[test]
    fn unknown_action_is_rejected() {
        let error = create_cli_commands()
            .try_get_matches_from(["gmb", "delete-everything"])
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InvalidSubcommand);
    }

    #[test]
    fn global_options_after_action() {
        let matches = create_cli_commands()
            .try_get_matches_from(["gmb", "accounts-list", "--format", "csv", "--headers"])
            .unwrap();
        let (_, sub_matches) = matches.subcommand().unwrap();
        assert_eq!(
            sub_matches.get_one::<String>(PARAMETER_FORMAT).map(String::as_str),
            Some("csv")
        );
        assert!(sub_matches.get_flag(PARAMETER_HEADERS));
    }

    #[test]
    fn usage_lists_every_action() {
        let usage = usage();
        for action in ACTIONS {
            assert!(usage.contains(action));
        }
    }
}
