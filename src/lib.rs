//! A command-line client for the Google Business Profile APIs.
//!
//! This crate authenticates with a service-account key, then lists accounts,
//! locations, reviews, categories, attributes and invitations, or accepts
//! pending invitations.
//!
//! # Modules
//!
//! - `actions`: Implementations of the CLI actions
//! - `api`: Business Profile API client
//! - `auth`: Service-account token exchange
//! - `cli`: Wiring and dispatch of the selected action
//! - `commands`: CLI command parsing
//! - `configuration`: Configuration management
//! - `credential`: Service-account key file
//! - `endpoints`: Resource URLs of every API operation
//! - `format`: Output formats
//! - `model`: Records returned by the service and their formatting
//! - `token_cache`: Access token lifecycle

pub mod actions;
pub mod api;
pub mod auth;
pub mod cli;
pub mod commands;
pub mod configuration;
pub mod credential;
pub mod endpoints;
pub mod error;
pub mod error_utils;
pub mod exit_codes;
pub mod format;
pub mod http_utils;
pub mod model;
pub mod token_cache;

#[cfg(test)]
pub(crate) mod test_support;
