//! CLI-level errors (wraps infrastructure errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;
use crate::infrastructure::InfraError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Infra(#[from] InfraError),

    #[error("{0}")]
    Usage(String),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::Infra(e) => match e {
                InfraError::Io { .. } => crate::exitcode::IOERR,
                InfraError::Command { .. } => crate::exitcode::UNAVAILABLE,
                InfraError::Archive { .. } => crate::exitcode::CANTCREAT,
                InfraError::Application(app) => match app {
                    ApplicationError::Config { .. } => crate::exitcode::CONFIG,
                    ApplicationError::Domain(DomainError::Validation { .. })
                    | ApplicationError::ItemOutOfRange { .. }
                    | ApplicationError::ChildAlreadyPresent { .. } => crate::exitcode::DATAERR,
                    ApplicationError::OperationFailed { .. } => crate::exitcode::IOERR,
                    ApplicationError::Domain(_) => crate::exitcode::SOFTWARE,
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(
            CliError::Usage("x".into()).exit_code(),
            crate::exitcode::USAGE
        );
        let config = CliError::from(InfraError::from(ApplicationError::Config {
            message: "bad".into(),
        }));
        assert_eq!(config.exit_code(), crate::exitcode::CONFIG);

        let validation = CliError::from(InfraError::from(ApplicationError::from(
            DomainError::Validation {
                field: "mod".into(),
                allowed: vec!["shift".into()],
                value: "dummy".into(),
            },
        )));
        assert_eq!(validation.exit_code(), crate::exitcode::DATAERR);
    }
}
