use rust_decimal::{Decimal, prelude::ToPrimitive};
use std::{
    borrow::Cow,
    fmt::{self, Display, Write},
};

/// A scalar travelling between the caller and the database, either as a bound parameter or as a
/// column of a fetched row.
#[derive(Default, Debug, Clone, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Boolean(bool),
    Int64(i64),
    UInt64(u64),
    Float64(f64),
    Decimal(Decimal),
    Varchar(String),
    Blob(Box<[u8]>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Varchar(v) => Some(v),
            _ => None,
        }
    }

    /// Integer view of the value. Decimals without a fractional part and numeric strings are
    /// accepted because some drivers return aggregates that way.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Boolean(v) => Some(*v as i64),
            Value::Int64(v) => Some(*v),
            Value::UInt64(v) => i64::try_from(*v).ok(),
            Value::Decimal(v) if v.fract().is_zero() => v.to_i64(),
            Value::Varchar(v) => v.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int64(v) => Some(*v as f64),
            Value::UInt64(v) => Some(*v as f64),
            Value::Float64(v) => Some(*v),
            Value::Decimal(v) => v.to_f64(),
            Value::Varchar(v) => v.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(v) => Some(*v),
            Value::Int64(v) => Some(*v != 0),
            Value::UInt64(v) => Some(*v != 0),
            _ => None,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::Boolean(v) => write!(f, "{}", v),
            Value::Int64(v) => write!(f, "{}", v),
            Value::UInt64(v) => write!(f, "{}", v),
            Value::Float64(v) => write!(f, "{}", v),
            Value::Decimal(v) => write!(f, "{}", v),
            Value::Varchar(v) => {
                f.write_char('\'')?;
                for c in v.chars() {
                    if c == '\'' {
                        f.write_char('\'')?;
                    }
                    f.write_char(c)?;
                }
                f.write_char('\'')
            }
            Value::Blob(v) => {
                f.write_str("X'")?;
                for b in v.iter() {
                    write!(f, "{:02X}", b)?;
                }
                f.write_char('\'')
            }
        }
    }
}

macro_rules! impl_from {
    ($variant:ident, $target:ty, $($source:ty),+) => {
        $(
            impl From<$source> for Value {
                fn from(value: $source) -> Self {
                    Value::$variant(value as $target)
                }
            }
        )+
    };
}

impl_from!(Int64, i64, i8, i16, i32, i64, isize);
impl_from!(UInt64, u64, u8, u16, u32, u64, usize);
impl_from!(Float64, f64, f32, f64);

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<Decimal> for Value {
    fn from(value: Decimal) -> Self {
        Value::Decimal(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Varchar(value.into())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Varchar(value)
    }
}

impl From<&String> for Value {
    fn from(value: &String) -> Self {
        Value::Varchar(value.clone())
    }
}

impl From<Cow<'_, str>> for Value {
    fn from(value: Cow<'_, str>) -> Self {
        Value::Varchar(value.into_owned())
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::Blob(value.into())
    }
}

impl From<&[u8]> for Value {
    fn from(value: &[u8]) -> Self {
        Value::Blob(value.into())
    }
}

impl From<&Value> for Value {
    fn from(value: &Value) -> Self {
        value.clone()
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

/// Prints a parameter list as `[1, 'a', NULL]`.
pub struct DisplayParams<'a>(pub &'a [Value]);

impl Display for DisplayParams<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char('[')?;
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", v)?;
        }
        f.write_char(']')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversions() {
        assert_eq!(Value::from(2), Value::Int64(2));
        assert_eq!(Value::from(2u8), Value::UInt64(2));
        assert_eq!(Value::from("a"), Value::Varchar("a".into()));
        assert_eq!(Value::from(None::<i32>), Value::Null);
        assert_eq!(Value::from(Some(1.5f32)), Value::Float64(1.5));
    }

    #[test]
    fn integer_view() {
        assert_eq!(Value::Varchar("6".into()).as_i64(), Some(6));
        assert_eq!(Value::Decimal(Decimal::new(60, 1)).as_i64(), Some(6));
        assert_eq!(Value::Decimal(Decimal::new(61, 1)).as_i64(), None);
        assert_eq!(Value::UInt64(u64::MAX).as_i64(), None);
    }

    #[test]
    fn display() {
        assert_eq!(Value::from("it's").to_string(), "'it''s'");
        assert_eq!(Value::from(vec![1u8, 171]).to_string(), "X'01AB'");
        assert_eq!(
            DisplayParams(&[1.into(), Value::Null, "x".into()]).to_string(),
            "[1, NULL, 'x']"
        );
    }
}
