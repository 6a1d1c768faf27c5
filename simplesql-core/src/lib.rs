mod connection;
mod cursor;
mod dialect;
mod error;
mod executor;
mod logger;
mod query;
mod row;
mod sql_writer;
mod util;
mod value;

pub use ::anyhow::Context;
pub use connection::*;
pub use cursor::*;
pub use dialect::*;
pub use error::*;
pub use executor::*;
pub use logger::*;
pub use query::*;
pub use row::*;
pub use sql_writer::*;
pub use util::*;
pub use value::*;
pub use ::futures::future;

pub type Result<T> = anyhow::Result<T>;
pub type Error = anyhow::Error;
