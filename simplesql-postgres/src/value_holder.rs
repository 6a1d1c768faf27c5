use bytes::BytesMut;
use postgres_types::{FromSql, IsNull, ToSql, Type, to_sql_checked};
use rust_decimal::{
    Decimal,
    prelude::{FromPrimitive, ToPrimitive},
};
use simplesql_core::Value;
use std::error::Error;

type BoxError = Box<dyn Error + Sync + Send>;

/// Bridge between [`Value`] and the postgres wire types.
///
/// Parameters are converted to the type the server inferred for the placeholder, so an integer can
/// be bound to any integer, float, numeric or text column.
#[derive(Debug)]
pub(crate) struct ValueHolder(pub(crate) Value);

impl From<Value> for ValueHolder {
    fn from(value: Value) -> Self {
        ValueHolder(value)
    }
}

impl<'a> FromSql<'a> for ValueHolder {
    fn from_sql(ty: &Type, raw: &'a [u8]) -> Result<Self, BoxError> {
        let value = match *ty {
            Type::BOOL => Value::Boolean(bool::from_sql(ty, raw)?),
            Type::CHAR => Value::Int64(i8::from_sql(ty, raw)? as i64),
            Type::INT2 => Value::Int64(i16::from_sql(ty, raw)? as i64),
            Type::INT4 => Value::Int64(i32::from_sql(ty, raw)? as i64),
            Type::INT8 => Value::Int64(i64::from_sql(ty, raw)?),
            Type::OID => Value::UInt64(u32::from_sql(ty, raw)? as u64),
            Type::FLOAT4 => Value::Float64(f32::from_sql(ty, raw)? as f64),
            Type::FLOAT8 => Value::Float64(f64::from_sql(ty, raw)?),
            Type::NUMERIC => Value::Decimal(Decimal::from_sql(ty, raw)?),
            Type::VARCHAR | Type::TEXT | Type::NAME | Type::BPCHAR | Type::UNKNOWN => {
                Value::Varchar(String::from_sql(ty, raw)?)
            }
            Type::BYTEA => Value::Blob(Vec::<u8>::from_sql(ty, raw)?.into()),
            _ => match std::str::from_utf8(raw) {
                Ok(v) => Value::Varchar(v.into()),
                Err(..) => {
                    return Err(format!("Cannot decode sql type: `{}`", ty).into());
                }
            },
        };
        Ok(value.into())
    }

    fn from_sql_null(_ty: &Type) -> Result<Self, BoxError> {
        Ok(Value::Null.into())
    }

    fn accepts(_ty: &Type) -> bool {
        true
    }
}

fn integer_to_sql(v: i64, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
    match *ty {
        Type::BOOL => (v != 0).to_sql(ty, out),
        Type::CHAR => i8::try_from(v)?.to_sql(ty, out),
        Type::INT2 => i16::try_from(v)?.to_sql(ty, out),
        Type::INT4 => i32::try_from(v)?.to_sql(ty, out),
        Type::OID => u32::try_from(v)?.to_sql(ty, out),
        Type::FLOAT4 => (v as f32).to_sql(ty, out),
        Type::FLOAT8 => (v as f64).to_sql(ty, out),
        Type::NUMERIC => Decimal::from(v).to_sql(ty, out),
        Type::VARCHAR | Type::TEXT | Type::BPCHAR | Type::NAME => v.to_string().to_sql(ty, out),
        _ => v.to_sql(ty, out),
    }
}

fn float_to_sql(v: f64, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
    match *ty {
        Type::FLOAT4 => (v as f32).to_sql(ty, out),
        Type::NUMERIC => Decimal::from_f64(v)
            .ok_or_else(|| format!("Cannot convert `{}` to numeric", v))?
            .to_sql(ty, out),
        Type::VARCHAR | Type::TEXT | Type::BPCHAR => v.to_string().to_sql(ty, out),
        _ => v.to_sql(ty, out),
    }
}

impl ToSql for ValueHolder {
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError>
    where
        Self: Sized,
    {
        match &self.0 {
            Value::Null => Ok(IsNull::Yes),
            Value::Boolean(v) => match *ty {
                Type::BOOL => v.to_sql(ty, out),
                _ => integer_to_sql(*v as i64, ty, out),
            },
            Value::Int64(v) => integer_to_sql(*v, ty, out),
            Value::UInt64(v) => match *ty {
                Type::NUMERIC => Decimal::from(*v).to_sql(ty, out),
                _ => integer_to_sql(i64::try_from(*v)?, ty, out),
            },
            Value::Float64(v) => float_to_sql(*v, ty, out),
            Value::Decimal(v) => match *ty {
                Type::NUMERIC => v.to_sql(ty, out),
                Type::FLOAT4 | Type::FLOAT8 => float_to_sql(
                    v.to_f64()
                        .ok_or_else(|| format!("Cannot convert `{}` to float", v))?,
                    ty,
                    out,
                ),
                Type::VARCHAR | Type::TEXT | Type::BPCHAR => v.to_string().to_sql(ty, out),
                _ => integer_to_sql(
                    v.to_i64()
                        .filter(|_| v.fract().is_zero())
                        .ok_or_else(|| format!("Cannot convert `{}` to an integer", v))?,
                    ty,
                    out,
                ),
            },
            Value::Varchar(v) => match *ty {
                Type::BOOL => v.parse::<bool>()?.to_sql(ty, out),
                Type::CHAR | Type::INT2 | Type::INT4 | Type::INT8 | Type::OID => {
                    integer_to_sql(v.trim().parse()?, ty, out)
                }
                Type::FLOAT4 | Type::FLOAT8 => float_to_sql(v.trim().parse()?, ty, out),
                Type::NUMERIC => v.trim().parse::<Decimal>()?.to_sql(ty, out),
                Type::BYTEA => v.as_bytes().to_sql(ty, out),
                _ => v.as_str().to_sql(ty, out),
            },
            Value::Blob(v) => (&**v).to_sql(ty, out),
        }
    }

    fn accepts(_ty: &Type) -> bool
    where
        Self: Sized,
    {
        true
    }

    to_sql_checked!();
}
