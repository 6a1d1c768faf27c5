use crate::driver_error;
use libsqlite3_sys::*;
use rust_decimal::prelude::ToPrimitive;
use simplesql_core::{DriverError, Error, Result, Value};
use std::{
    ffi::c_int,
    os::raw::{c_char, c_void},
};

/// Bind `value` to the one based parameter `index` of `statement`.
pub(crate) fn bind_value(statement: *mut sqlite3_stmt, index: c_int, value: &Value) -> Result<()> {
    unsafe {
        let rc = match value {
            Value::Null => sqlite3_bind_null(statement, index),
            Value::Boolean(v) => sqlite3_bind_int(statement, index, *v as c_int),
            Value::Int64(v) => sqlite3_bind_int64(statement, index, *v),
            Value::UInt64(v) => {
                let Ok(v) = sqlite3_int64::try_from(*v) else {
                    return Err(Error::new(DriverError::programming(
                        None,
                        format!(
                            "Cannot bind the value `{}` into a sqlite integer because it's out of bounds",
                            v
                        ),
                    )));
                };
                sqlite3_bind_int64(statement, index, v)
            }
            Value::Float64(v) => sqlite3_bind_double(statement, index, *v),
            Value::Decimal(v) => sqlite3_bind_double(
                statement,
                index,
                v.to_f64().ok_or_else(|| {
                    Error::msg(format!("Cannot convert the Decimal value `{}` to f64", v))
                })?,
            ),
            Value::Varchar(v) => sqlite3_bind_text(
                statement,
                index,
                v.as_ptr() as *const c_char,
                v.len() as c_int,
                SQLITE_TRANSIENT(),
            ),
            Value::Blob(v) => sqlite3_bind_blob(
                statement,
                index,
                v.as_ptr() as *const c_void,
                v.len() as c_int,
                SQLITE_TRANSIENT(),
            ),
        };
        if rc != SQLITE_OK {
            let error = Error::new(driver_error(sqlite3_db_handle(statement), rc))
                .context(format!("Cannot bind parameter {} ({})", index, value));
            return Err(error);
        }
        Ok(())
    }
}
