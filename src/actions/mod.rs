//! Implementations of the CLI actions.
//!
//! Every action takes the API client, the output format and the writer the
//! results go to, so that tests can capture the output.

use thiserror::Error;

use crate::api::ApiError;
use crate::format::FormattingError;

pub mod accounts;
pub mod attributes;
pub mod categories;
pub mod invitations;
pub mod locations;
pub mod reviews;
pub mod utils;

#[derive(Debug, Error)]
pub enum CliActionError {
    #[error("{0}")]
    ApiError(#[from] ApiError),

    #[error("{0}")]
    FormattingError(#[from] FormattingError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
