//! CLI error handling

use std::fmt;
use std::path::PathBuf;

use banker_errors::UserFacingError;

/// CLI-specific error type
#[derive(Debug)]
pub enum CliError {
    /// Configuration or evaluation error
    Core(banker_errors::Error),
    /// A snapshot file could not be read or validated
    Input {
        path: PathBuf,
        source: banker_errors::Error,
    },
    /// I/O error
    Io(std::io::Error),
}

impl CliError {
    /// Stable error code, when one exists
    pub fn code(&self) -> Option<&'static str> {
        match self {
            CliError::Core(e) | CliError::Input { source: e, .. } => e.user_code(),
            CliError::Io(_) => Some("error.io"),
        }
    }
}

fn write_user_facing(f: &mut fmt::Formatter<'_>, e: &banker_errors::Error) -> fmt::Result {
    write!(f, "{}", e.user_message())?;
    if let Some(code) = e.user_code() {
        write!(f, "\n  Code: {code}")?;
    }
    if let Some(hint) = e.user_hint() {
        write!(f, "\n  Hint: {hint}")?;
    }
    if e.is_retryable() {
        write!(f, "\n  Retry: safe to retry this operation.")?;
    }
    Ok(())
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Core(e) => write_user_facing(f, e),
            CliError::Input { path, source } => {
                write!(f, "{}: ", path.display())?;
                write_user_facing(f, source)
            }
            CliError::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Core(e) | CliError::Input { source: e, .. } => Some(e),
            CliError::Io(e) => Some(e),
        }
    }
}

impl From<banker_errors::Error> for CliError {
    fn from(e: banker_errors::Error) -> Self {
        CliError::Core(e)
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e)
    }
}
