use crate::Error;
use thiserror::Error;

/// Driver independent classification of a failure, used by the dialects to decide about reconnects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The database or the link to it is not working (dropped connection, server gone, locked).
    Operational,
    /// The statement is wrong: syntax, missing table or column, wrong parameter count.
    Programming,
    /// A constraint was violated.
    Integrity,
    /// The client library was misused.
    Interface,
    Other,
}

/// Error produced by the connections, wrapping the native driver failure.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct DriverError {
    pub kind: ErrorKind,
    pub code: Option<i64>,
    pub message: String,
}

impl DriverError {
    pub fn new(kind: ErrorKind, code: Option<i64>, message: impl Into<String>) -> Self {
        Self {
            kind,
            code,
            message: message.into(),
        }
    }
    pub fn operational(code: Option<i64>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Operational, code, message)
    }
    pub fn programming(code: Option<i64>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Programming, code, message)
    }
    /// First `DriverError` found in the error, either as context or as a source.
    pub fn find(error: &Error) -> Option<&DriverError> {
        error
            .downcast_ref::<DriverError>()
            .or_else(|| error.chain().find_map(|e| e.downcast_ref::<DriverError>()))
    }
}

/// Stage of the executor that gave up, attached as context to the propagated error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Failure {
    #[error("Could not establish the connection")]
    ConnectFailed,
    #[error("The statement failed again after reconnecting:\n{statement}")]
    ReconnectExhausted { statement: String },
    #[error("The statement failed:\n{statement}")]
    StatementFailed { statement: String },
}

impl Failure {
    pub fn find(error: &Error) -> Option<&Failure> {
        error.downcast_ref::<Failure>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_through_context() {
        let error = Error::new(DriverError::operational(Some(2006), "gone away"))
            .context("While running the query")
            .context(Failure::StatementFailed {
                statement: "SELECT 1".into(),
            });
        let driver = DriverError::find(&error).expect("driver error should be reachable");
        assert_eq!(driver.kind, ErrorKind::Operational);
        assert_eq!(driver.code, Some(2006));
        assert!(matches!(
            Failure::find(&error),
            Some(Failure::StatementFailed { .. })
        ));
    }

    #[test]
    fn find_nothing() {
        let error = Error::msg("plain");
        assert!(DriverError::find(&error).is_none());
        assert!(Failure::find(&error).is_none());
    }
}
