//! CLI-level errors (wraps infrastructure errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;
use crate::exitcode;
use crate::infrastructure::InfraError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Infra(#[from] InfraError),

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("{0}")]
    Usage(String),
}

impl From<ApplicationError> for CliError {
    fn from(e: ApplicationError) -> Self {
        CliError::Infra(InfraError::Application(e))
    }
}

impl From<DomainError> for CliError {
    fn from(e: DomainError) -> Self {
        CliError::from(ApplicationError::Domain(e))
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidArgs(_) | CliError::Usage(_) => exitcode::USAGE,
            CliError::Infra(e) => match e {
                InfraError::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound => {
                    exitcode::NOINPUT
                }
                InfraError::Io { .. } => exitcode::IOERR,
                InfraError::Format { .. } => exitcode::DATAERR,
                InfraError::Application(e) => application_exit_code(e),
            },
        }
    }
}

fn application_exit_code(e: &ApplicationError) -> i32 {
    match e {
        ApplicationError::Domain(DomainError::SlugTaken(_)) => exitcode::CANTCREAT,
        ApplicationError::Domain(
            DomainError::InvalidSlug { .. } | DomainError::InvalidCourse { .. },
        ) => exitcode::DATAERR,
        ApplicationError::Domain(_) => exitcode::SOFTWARE,
        ApplicationError::NotAuthenticated => exitcode::NOPERM,
        ApplicationError::RegistryUnavailable { .. } => exitcode::UNAVAILABLE,
        ApplicationError::Config { .. } => exitcode::CONFIG,
        ApplicationError::OperationFailed { .. } => exitcode::IOERR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_taken_slug_then_cantcreat() {
        let err = CliError::from(DomainError::SlugTaken("ABC-42".into()));
        assert_eq!(err.exit_code(), exitcode::CANTCREAT);
    }

    #[test]
    fn given_missing_input_then_noinput() {
        let err = CliError::Infra(InfraError::io(
            "read course",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        ));
        assert_eq!(err.exit_code(), exitcode::NOINPUT);
    }

    #[test]
    fn given_no_user_then_noperm() {
        let err = CliError::from(ApplicationError::NotAuthenticated);
        assert_eq!(err.exit_code(), exitcode::NOPERM);
    }
}
