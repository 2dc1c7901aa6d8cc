//! Dynamically-typed scalar cells produced by query execution.

use std::fmt;

use super::column::Datatype;

/// A single result cell.
///
/// Variants mirror the scalar kinds VOTable can describe; 8-bit signed
/// integers are widened to [`Value::Short`].
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Boolean(bool),
    Short(i16),
    UnsignedByte(u8),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    FloatComplex(f32, f32),
    DoubleComplex(f64, f64),
    Text(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Semantic type of the cell, or `None` for null.
    pub fn datatype(&self) -> Option<Datatype> {
        let datatype = match self {
            Value::Null => return None,
            Value::Boolean(_) => Datatype::Boolean,
            Value::Short(_) => Datatype::Short,
            Value::UnsignedByte(_) => Datatype::UnsignedByte,
            Value::Int(_) => Datatype::Int,
            Value::Long(_) => Datatype::Long,
            Value::Float(_) => Datatype::Float,
            Value::Double(_) => Datatype::Double,
            Value::FloatComplex(..) => Datatype::FloatComplex,
            Value::DoubleComplex(..) => Datatype::DoubleComplex,
            Value::Text(_) => Datatype::Char,
        };
        Some(datatype)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Boolean(value) => write!(f, "{value}"),
            Value::Short(value) => write!(f, "{value}"),
            Value::UnsignedByte(value) => write!(f, "{value}"),
            Value::Int(value) => write!(f, "{value}"),
            Value::Long(value) => write!(f, "{value}"),
            Value::Float(value) => f.write_str(&float32_text(*value)),
            Value::Double(value) => f.write_str(&float64_text(*value)),
            Value::FloatComplex(re, im) => write_complex(f, float32_text(*re), float32_text(*im)),
            Value::DoubleComplex(re, im) => {
                write_complex(f, float64_text(*re), float64_text(*im))
            }
            Value::Text(value) => f.write_str(value),
        }
    }
}

fn write_complex(f: &mut fmt::Formatter<'_>, re: String, im: String) -> fmt::Result {
    let sign = if im.starts_with(['-', '+']) { "" } else { "+" };
    write!(f, "({re}{sign}{im}i)")
}

fn float32_text(value: f32) -> String {
    float_text(
        value.is_nan(),
        value.is_infinite(),
        value.is_sign_negative(),
        &format!("{:e}", value.abs()),
    )
}

fn float64_text(value: f64) -> String {
    float_text(
        value.is_nan(),
        value.is_infinite(),
        value.is_sign_negative(),
        &format!("{:e}", value.abs()),
    )
}

/// Shortest round-trip digits in `%g` layout: exponent form when the decimal
/// exponent is below -4 or at least 6, infinities as `+Inf`/`-Inf`.
fn float_text(nan: bool, infinite: bool, negative: bool, scientific: &str) -> String {
    if nan {
        return "NaN".to_string();
    }
    if infinite {
        return if negative { "-Inf" } else { "+Inf" }.to_string();
    }

    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((scientific, "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();

    let mut out = String::with_capacity(digits.len() + 8);
    if negative {
        out.push('-');
    }

    if !(-4..6).contains(&exponent) {
        out.push_str(&digits[..1]);
        if digits.len() > 1 {
            out.push('.');
            out.push_str(&digits[1..]);
        }
        let sign = if exponent < 0 { '-' } else { '+' };
        out.push_str(&format!("e{sign}{:02}", exponent.unsigned_abs()));
    } else if exponent < 0 {
        out.push_str("0.");
        out.extend(std::iter::repeat_n('0', (-exponent - 1) as usize));
        out.push_str(&digits);
    } else {
        let whole = exponent as usize + 1;
        if digits.len() <= whole {
            out.push_str(&digits);
            out.extend(std::iter::repeat_n('0', whole - digits.len()));
        } else {
            out.push_str(&digits[..whole]);
            out.push('.');
            out.push_str(&digits[whole..]);
        }
    }
    out
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<i8> for Value {
    fn from(value: i8) -> Self {
        Value::Short(i16::from(value))
    }
}

impl From<i16> for Value {
    fn from(value: i16) -> Self {
        Value::Short(value)
    }
}

impl From<u8> for Value {
    fn from(value: u8) -> Self {
        Value::UnsignedByte(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Long(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Double(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}
