use simplesql_core::Value;

pub(crate) struct ValueWrap(pub(crate) Value);

impl From<Value> for ValueWrap {
    fn from(value: Value) -> Self {
        Self(value)
    }
}
impl From<ValueWrap> for Value {
    fn from(value: ValueWrap) -> Self {
        value.0
    }
}

impl mysql_async::prelude::FromValue for ValueWrap {
    type Intermediate = ValueWrap;
}

impl TryFrom<mysql_async::Value> for ValueWrap {
    type Error = mysql_async::FromValueError;

    /// The text protocol delivers every column as bytes, those that are valid utf8 become text.
    fn try_from(value: mysql_async::Value) -> Result<Self, Self::Error> {
        Ok(match value {
            mysql_async::Value::NULL => Value::Null,
            mysql_async::Value::Bytes(v) => match String::from_utf8(v) {
                Ok(v) => Value::Varchar(v),
                Err(e) => Value::Blob(e.into_bytes().into()),
            },
            mysql_async::Value::Int(v) => Value::Int64(v),
            mysql_async::Value::UInt(v) => Value::UInt64(v),
            mysql_async::Value::Float(v) => Value::Float64(v as f64),
            mysql_async::Value::Double(v) => Value::Float64(v),
            mysql_async::Value::Date(year, month, day, hour, minute, second, micro) => {
                let mut v = format!(
                    "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
                    year, month, day, hour, minute, second
                );
                if micro != 0 {
                    v.push_str(&format!(".{:06}", micro));
                }
                Value::Varchar(v)
            }
            mysql_async::Value::Time(negative, days, hours, minutes, seconds, micro) => {
                let mut v = format!(
                    "{}{:02}:{:02}:{:02}",
                    if negative { "-" } else { "" },
                    days * 24 + hours as u32,
                    minutes,
                    seconds
                );
                if micro != 0 {
                    v.push_str(&format!(".{:06}", micro));
                }
                Value::Varchar(v)
            }
        }
        .into())
    }
}

impl From<ValueWrap> for mysql_async::Value {
    fn from(value: ValueWrap) -> Self {
        type MySQLValue = mysql_async::Value;
        match value.0 {
            Value::Null => MySQLValue::NULL,
            Value::Boolean(v) => MySQLValue::Int(v as i64),
            Value::Int64(v) => MySQLValue::Int(v),
            Value::UInt64(v) => MySQLValue::UInt(v),
            Value::Float64(v) => MySQLValue::Double(v),
            // Sent as text, the server converts it to the column's precision
            Value::Decimal(v) => MySQLValue::Bytes(v.to_string().into_bytes()),
            Value::Varchar(v) => MySQLValue::Bytes(v.into_bytes()),
            Value::Blob(v) => MySQLValue::Bytes(v.into_vec()),
        }
    }
}
