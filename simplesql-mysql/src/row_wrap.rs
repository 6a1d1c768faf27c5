use crate::ValueWrap;
use mysql_async::FromRowError;
use simplesql_core::Value;

/// Decoded values of one row, the labels are shared by the whole result set.
pub(crate) struct RowWrap(pub(crate) Box<[Value]>);

impl mysql_async::prelude::FromRow for RowWrap {
    fn from_row_opt(mut row: mysql_async::Row) -> Result<Self, FromRowError>
    where
        Self: Sized,
    {
        let mut values = Vec::with_capacity(row.len());
        for i in 0..row.len() {
            match row.take_opt::<ValueWrap, _>(i) {
                Some(Ok(v)) => values.push(v.0),
                // Already taken or not decodable
                _ => return Err(FromRowError(row)),
            }
        }
        Ok(RowWrap(values.into()))
    }
}
