use thiserror::Error;

use crate::{
    actions::CliActionError, api::ApiError, configuration::ConfigurationError,
    credential::CredentialError, exit_codes::GmbExitCode, format::FormattingError,
};

/// Error types that can occur during CLI command execution
#[derive(Debug, Error)]
pub enum CliError {
    /// Missing, unknown or malformed action or option
    #[error("{0}")]
    UsageError(String),
    /// Error related to configuration loading
    #[error("Configuration error: {0}")]
    ConfigurationError(#[from] ConfigurationError),
    /// Error related to the service-account key file
    #[error("Key file error: {0}")]
    CredentialError(#[from] CredentialError),
    /// Error related to data formatting
    #[error("Formatting error: {0}")]
    FormattingError(#[from] FormattingError),
    /// The HTTP client could not be created
    #[error("Failed to create the HTTP client: {0}")]
    HttpClientError(reqwest::Error),

    #[error("{0}")]
    ActionError(#[from] CliActionError),
}

impl CliError {
    /// Get the appropriate exit code for this error
    ///
    /// Returns the corresponding `GmbExitCode` based on the error type:
    /// - `UsageError` for a missing or unknown action
    /// - `ConfigError` for configuration and key file errors
    /// - `DataError` for formatting errors
    /// - `AuthError`, `NetworkError` or `ApiError` for failed API calls
    pub fn exit_code(&self) -> GmbExitCode {
        match self {
            CliError::UsageError(_) => GmbExitCode::UsageError,
            CliError::ConfigurationError(_) => GmbExitCode::ConfigError,
            CliError::CredentialError(_) => GmbExitCode::ConfigError,
            CliError::FormattingError(_) => GmbExitCode::DataError,
            CliError::HttpClientError(_) => GmbExitCode::SoftwareError,
            CliError::ActionError(CliActionError::ApiError(e)) => api_exit_code(e),
            CliError::ActionError(CliActionError::FormattingError(_)) => GmbExitCode::DataError,
            CliError::ActionError(CliActionError::IoError(_)) => GmbExitCode::IoError,
        }
    }

    /// The underlying API error, if any.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            CliError::ActionError(CliActionError::ApiError(e)) => Some(e),
            _ => None,
        }
    }
}

fn api_exit_code(error: &ApiError) -> GmbExitCode {
    match error {
        ApiError::AuthError(_) => GmbExitCode::AuthError,
        ApiError::HttpError(_) => GmbExitCode::NetworkError,
        ApiError::EndpointError(_) => GmbExitCode::ConfigError,
        ApiError::JsonError(_) | ApiError::UnexpectedStatus { .. } | ApiError::UnexpectedPayload { .. } => {
            GmbExitCode::ApiError
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthError;

    #[test]
    fn usage_errors_exit_with_one() {
        let error = CliError::UsageError("no action".to_string());
        assert_eq!(error.exit_code().code(), 1);
    }

    #[test]
    fn auth_failures_map_to_auth_exit_code() {
        let error = CliError::from(CliActionError::from(ApiError::from(AuthError::AuthFailed(
            "HTTP 400".to_string(),
        ))));
        assert_eq!(error.exit_code(), GmbExitCode::AuthError);
    }

    #[test]
    fn remote_errors_map_to_api_exit_code() {
        let error = CliError::from(CliActionError::from(ApiError::UnexpectedStatus {
            status: reqwest::StatusCode::NOT_FOUND,
            url: "https://example.com".to_string(),
            body: String::new(),
        }));
        assert_eq!(error.exit_code(), GmbExitCode::ApiError);
        assert!(error.api_error().is_some());
    }

    #[test]
    fn configuration_errors_map_to_config_exit_code() {
        let error = CliError::from(ConfigurationError::FailedToFindConfigurationDirectory);
        assert_eq!(error.exit_code(), GmbExitCode::ConfigError);
    }
}
