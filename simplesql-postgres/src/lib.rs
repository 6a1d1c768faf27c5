mod connection;
mod value_holder;

pub use connection::*;
pub(crate) use value_holder::*;

use simplesql_core::{DriverError, ErrorKind};

/// Classification of a SQLSTATE code by its class.
pub fn error_kind(sqlstate: &str) -> ErrorKind {
    match sqlstate.get(..2) {
        Some("08" | "53" | "57" | "58") => ErrorKind::Operational,
        Some("23") => ErrorKind::Integrity,
        Some("42" | "22" | "0A") => ErrorKind::Programming,
        _ => ErrorKind::Operational,
    }
}

pub(crate) fn driver_error(error: &tokio_postgres::Error) -> DriverError {
    if let Some(db) = error.as_db_error() {
        let state = db.code().code();
        return DriverError::new(
            error_kind(state),
            None,
            format!("{} (SQLSTATE {})", db.message(), state),
        );
    }
    let kind = if error.is_closed() {
        ErrorKind::Operational
    } else if let Some(state) = error.code() {
        error_kind(state.code())
    } else {
        ErrorKind::Programming
    };
    DriverError::new(kind, None, error.to_string())
}
