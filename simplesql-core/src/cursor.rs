use crate::{Row, RowNames};
use std::collections::VecDeque;

/// Outcome of one executed statement.
///
/// Rows are fully buffered by the connection, `fetch_one` and `fetch_all` consume them in order.
#[derive(Default, Debug, Clone)]
pub struct Cursor {
    statement: String,
    labels: RowNames,
    rows: VecDeque<Row>,
    rows_affected: u64,
    last_insert_id: Option<u64>,
}

impl Cursor {
    /// Result of a statement returning rows. The affected count is the number of rows.
    pub fn with_rows(statement: impl Into<String>, labels: RowNames, rows: Vec<Row>) -> Self {
        Self {
            statement: statement.into(),
            labels,
            rows_affected: rows.len() as u64,
            rows: rows.into(),
            last_insert_id: None,
        }
    }

    /// Result of a statement that only modifies data.
    pub fn affected(
        statement: impl Into<String>,
        rows_affected: u64,
        last_insert_id: Option<u64>,
    ) -> Self {
        Self {
            statement: statement.into(),
            labels: RowNames::default(),
            rows: VecDeque::new(),
            rows_affected,
            last_insert_id,
        }
    }

    /// Statement text as it was sent to the driver.
    pub fn statement(&self) -> &str {
        &self.statement
    }
    /// Column labels of the result set, empty for statements without rows.
    pub fn labels(&self) -> &RowNames {
        &self.labels
    }
    pub fn rows_affected(&self) -> u64 {
        self.rows_affected
    }
    pub fn last_insert_id(&self) -> Option<u64> {
        self.last_insert_id
    }
    pub fn fetch_one(&mut self) -> Option<Row> {
        self.rows.pop_front()
    }
    pub fn fetch_all(&mut self) -> Vec<Row> {
        self.rows.drain(..).collect()
    }
}
