mod connection;
mod row_wrap;
mod value_wrap;

pub use connection::*;
pub(crate) use row_wrap::*;
pub(crate) use value_wrap::*;

use simplesql_core::{DriverError, ErrorKind, SERVER_GONE_ERROR};

/// Classification of a MySQL server error number.
pub fn error_kind(code: u16) -> ErrorKind {
    match code {
        // Lost connection, server gone, connection refused, too many connections
        2002 | 2003 | 2006 | 2013 | 1040 | 1053 => ErrorKind::Operational,
        // Duplicate entry, foreign key, null in a not null column
        1048 | 1062 | 1169 | 1216 | 1217 | 1451 | 1452 => ErrorKind::Integrity,
        // Syntax, unknown table or column, wrong value count
        1054 | 1064 | 1146 | 1149 | 1136 | 1210 => ErrorKind::Programming,
        _ => ErrorKind::Operational,
    }
}

pub(crate) fn driver_error(error: &mysql_async::Error) -> DriverError {
    match error {
        mysql_async::Error::Server(e) => {
            DriverError::new(error_kind(e.code), Some(e.code as i64), e.message.clone())
        }
        // The socket is unusable, report it like the server went away
        mysql_async::Error::Io(e) => DriverError::operational(Some(SERVER_GONE_ERROR), e.to_string()),
        mysql_async::Error::Driver(mysql_async::DriverError::ConnectionClosed) => {
            DriverError::operational(Some(SERVER_GONE_ERROR), error.to_string())
        }
        mysql_async::Error::Driver(e) => {
            DriverError::new(ErrorKind::Interface, None, e.to_string())
        }
        mysql_async::Error::Url(e) => DriverError::new(ErrorKind::Interface, None, e.to_string()),
        _ => DriverError::new(ErrorKind::Other, None, error.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification() {
        assert_eq!(error_kind(2006), ErrorKind::Operational);
        assert_eq!(error_kind(1062), ErrorKind::Integrity);
        assert_eq!(error_kind(1452), ErrorKind::Integrity);
        assert_eq!(error_kind(1064), ErrorKind::Programming);
        assert_eq!(error_kind(1146), ErrorKind::Programming);
        assert_eq!(error_kind(1205), ErrorKind::Operational);
    }

    #[test]
    fn closed_connection_is_server_gone() {
        let error = driver_error(&mysql_async::Error::Driver(
            mysql_async::DriverError::ConnectionClosed,
        ));
        assert_eq!(error.kind, ErrorKind::Operational);
        assert_eq!(error.code, Some(SERVER_GONE_ERROR));
        let error = driver_error(&mysql_async::Error::from(std::io::Error::from(
            std::io::ErrorKind::BrokenPipe,
        )));
        assert_eq!(error.code, Some(SERVER_GONE_ERROR));
    }
}
