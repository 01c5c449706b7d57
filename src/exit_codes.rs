//! Custom exit codes for the gmb application
//!
//! This module defines specific exit codes for different error conditions
//! to make scripting and automation easier.

/// Custom exit codes for gmb
///
/// These codes follow the BSD sysexits.h conventions where possible:
/// - 0: Success
/// - 1: Command line usage error (no action or an unknown one)
/// - 64-78: Standard exit codes from sysexits.h
/// - 100+: Custom application-specific codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum GmbExitCode {
    /// Command line usage error (1) - Missing or unrecognized action
    UsageError = 1,

    /// Data format error (65) - Output could not be produced from the response data
    DataError = exitcode::DATAERR,

    /// Internal software error (70) - Unexpected application error
    SoftwareError = exitcode::SOFTWARE,

    /// I/O error (74) - Writing the output failed
    IoError = exitcode::IOERR,

    /// Configuration error (78) - Configuration or key file issue
    ConfigError = exitcode::CONFIG,

    /// Authentication error (100) - Token exchange failed
    AuthError = 100,

    /// Network error (101) - Connection or communication issues
    NetworkError = 101,

    /// API error (102) - Remote API returned an error or an unexpected payload
    ApiError = 102,
}

impl GmbExitCode {
    /// Convert to numeric exit code
    pub fn code(&self) -> i32 {
        *self as i32
    }
}

impl From<GmbExitCode> for i32 {
    fn from(code: GmbExitCode) -> Self {
        code.code()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usage_error_is_one() {
        assert_eq!(GmbExitCode::UsageError.code(), 1);
    }

    #[test]
    fn sysexits_values_are_used() {
        assert_eq!(i32::from(GmbExitCode::ConfigError), 78);
        assert_eq!(i32::from(GmbExitCode::DataError), 65);
        assert_eq!(GmbExitCode::AuthError.code(), 100);
    }
}
