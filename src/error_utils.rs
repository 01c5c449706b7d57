//! Error reporting for the gmb application.
//!
//! Errors are reported once, by the top-level handler in `main`, so the
//! user sees a uniform message and the process exits with the mapped code.

use reqwest::StatusCode;
use tracing::error;

use crate::{api::ApiError, commands, error::CliError};

/// Report an error on standard error.
///
/// Usage errors are followed by the usage message; API errors with a
/// well-known status get a hint on what to check.
pub fn report_error(error: &CliError) {
    match error {
        CliError::UsageError(message) => {
            if !message.is_empty() {
                eprintln!("{}", message);
            }
            eprintln!("{}", commands::usage());
        }
        other => {
            error!("{:?}", other);
            eprintln!("ERROR: {}", other);
            if let Some(hint) = other.api_error().and_then(hint_for) {
                eprintln!("{}", hint);
            }
        }
    }
}

/// A user-friendly hint for common remote failures
pub fn hint_for(error: &ApiError) -> Option<&'static str> {
    match error {
        ApiError::UnexpectedStatus { status, .. } => match *status {
            StatusCode::UNAUTHORIZED => Some(
                "The access token was rejected. Check that the service account key is still valid.",
            ),
            StatusCode::FORBIDDEN => Some(
                "The service account has no access to this resource. Pending invitations can be accepted with 'gmb accept-invitations'.",
            ),
            StatusCode::TOO_MANY_REQUESTS => {
                Some("The API quota was exceeded. Wait a moment before trying again.")
            }
            _ => None,
        },
        ApiError::AuthError(_) => Some(
            "Authentication failed. Check the client_email and private_key of the key file and the impersonation subject.",
        ),
        _ => None,
    }
}
