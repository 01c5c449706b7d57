//! Shared command parameters for all CLI commands.
//!
//! This module defines the action names and the common parameters used by
//! every action. It provides a centralized place to define parameter names
//! and common argument configurations.

use crate::format::OutputFormat;
use clap::{Arg, ArgAction};

// Actions
pub const COMMAND_ACCOUNTS_LIST: &str = "accounts-list";
pub const COMMAND_LOCATIONS_LIST: &str = "locations-list";
pub const COMMAND_REVIEWS_LIST: &str = "reviews-list";
pub const COMMAND_CATEGORIES_LIST: &str = "categories-list";
pub const COMMAND_LIST_INVITATIONS: &str = "list-invitations";
pub const COMMAND_ACCEPT_INVITATIONS: &str = "accept-invitations";
pub const COMMAND_ATTRIBUTES_LIST: &str = "attributes-list";

/// Every action, in the order they are listed in the usage message.
pub const ACTIONS: [&str; 7] = [
    COMMAND_ACCEPT_INVITATIONS,
    COMMAND_ACCOUNTS_LIST,
    COMMAND_LOCATIONS_LIST,
    COMMAND_REVIEWS_LIST,
    COMMAND_CATEGORIES_LIST,
    COMMAND_LIST_INVITATIONS,
    COMMAND_ATTRIBUTES_LIST,
];

// Parameter names
pub const PARAMETER_FORMAT: &str = "format";
pub const PARAMETER_PRETTY: &str = "pretty";
pub const PARAMETER_HEADERS: &str = "headers";
pub const PARAMETER_VERBOSE: &str = "verbose";

/// Create the global format parameter.
///
/// There is no default value: each action picks its own when the flag is absent.
pub fn format_parameter() -> Arg {
    Arg::new(PARAMETER_FORMAT)
        .short('f')
        .long(PARAMETER_FORMAT)
        .num_args(1)
        .required(false)
        .env("GMB_FORMAT")
        .global(true)
        .help("Output data format")
        .value_parser(OutputFormat::names())
}

/// This parameter flag is used across all actions for output formatting.
pub fn format_pretty_parameter() -> Arg {
    Arg::new(PARAMETER_PRETTY)
        .long(PARAMETER_PRETTY)
        .action(ArgAction::SetTrue)
        .required(false)
        .global(true)
        .help("Format the output pretty")
}

/// This parameter flag is used across all actions for output formatting.
pub fn format_with_headers_parameter() -> Arg {
    Arg::new(PARAMETER_HEADERS)
        .long(PARAMETER_HEADERS)
        .action(ArgAction::SetTrue)
        .required(false)
        .env("GMB_HEADERS")
        .global(true)
        .help("Format the CSV output with headers")
}

pub fn verbose_parameter() -> Arg {
    Arg::new(PARAMETER_VERBOSE)
        .short('v')
        .long(PARAMETER_VERBOSE)
        .action(ArgAction::SetTrue)
        .global(true)
        .help("Enable verbose output for debugging")
}
