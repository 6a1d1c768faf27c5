mod bind;
mod cbox;
mod connection;
mod extract;

pub(crate) use cbox::*;
pub use connection::*;

use libsqlite3_sys::{
    SQLITE_CONSTRAINT, SQLITE_MISUSE, SQLITE_RANGE, sqlite3, sqlite3_errmsg, sqlite3_errstr,
};
use simplesql_core::{DriverError, ErrorKind};
use std::{
    ffi::{CStr, c_char, c_int},
    ptr,
};

pub(crate) fn error_message_from_ptr(ptr: &'_ *const c_char) -> &'_ str {
    unsafe {
        if *ptr != ptr::null() {
            CStr::from_ptr(*ptr)
                .to_str()
                .unwrap_or("Unknown error (the error message was not a valid C string)")
        } else {
            "Unknown error (could not extract the error message)"
        }
    }
}

/// Classification of a sqlite result code, extended codes included. Anything that is not a
/// constraint or an API misuse is operational.
pub fn error_kind(rc: c_int) -> ErrorKind {
    match rc & 0xff {
        SQLITE_CONSTRAINT => ErrorKind::Integrity,
        SQLITE_RANGE | SQLITE_MISUSE => ErrorKind::Programming,
        _ => ErrorKind::Operational,
    }
}

/// Error for `rc`, with the message of the last failure on `db` if there is a handle.
pub(crate) fn driver_error(db: *mut sqlite3, rc: c_int) -> DriverError {
    let message = unsafe {
        if db.is_null() {
            error_message_from_ptr(&sqlite3_errstr(rc)).to_string()
        } else {
            error_message_from_ptr(&sqlite3_errmsg(db)).to_string()
        }
    };
    DriverError::new(error_kind(rc), Some(rc as i64), message)
}
