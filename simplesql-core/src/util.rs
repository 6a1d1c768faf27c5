use std::fmt::{self, Display};

/// Appends every value through `f`, writing `separator` between values that produced output.
pub fn separated_by<T, F>(
    out: &mut String,
    values: impl IntoIterator<Item = T>,
    mut f: F,
    separator: &str,
) where
    F: FnMut(&mut String, T),
{
    let mut len = out.len();
    for v in values {
        if out.len() > len {
            out.push_str(separator);
        }
        len = out.len();
        f(out, v);
    }
}

/// Rewrites the format style `%s` markers of `sql`.
///
/// `f` receives the output buffer and the zero based index of the parameter. A doubled `%%` is
/// written as a single `%`, any other `%` is copied as is.
pub fn rewrite_placeholders(sql: &str, mut f: impl FnMut(&mut String, usize)) -> String {
    let mut out = String::with_capacity(sql.len() + 16);
    let mut index = 0;
    let mut rest = sql;
    while let Some(position) = rest.find('%') {
        out.push_str(&rest[..position]);
        let tail = &rest[position + 1..];
        if let Some(tail) = tail.strip_prefix('s') {
            f(&mut out, index);
            index += 1;
            rest = tail;
        } else if let Some(tail) = tail.strip_prefix('%') {
            out.push('%');
            rest = tail;
        } else {
            out.push('%');
            rest = tail;
        }
    }
    out.push_str(rest);
    out
}

/// Cuts the query at about 500 bytes so it can be printed in logs and error contexts.
pub fn truncate_query(query: &str) -> Truncated<'_> {
    Truncated(query)
}

pub struct Truncated<'a>(&'a str);

impl Display for Truncated<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const LIMIT: usize = 497;
        if self.0.len() <= LIMIT {
            return f.write_str(self.0.trim_end());
        }
        let mut end = LIMIT;
        while !self.0.is_char_boundary(end) {
            end -= 1;
        }
        write!(f, "{}...", self.0[..end].trim_end())
    }
}

#[macro_export]
macro_rules! truncate_long {
    ($query:expr) => {
        $crate::truncate_query(&$query)
    };
}
