//! Per-column type and width inference.

use std::fmt;

use super::error::DomainError;
use super::value::Value;

/// Semantic column type, ordered by widening precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Datatype {
    Boolean,
    Short,
    UnsignedByte,
    Int,
    Long,
    Float,
    Double,
    FloatComplex,
    DoubleComplex,
    Char,
}

impl Datatype {
    /// Type assumed for columns that hold no non-null value.
    pub const DEFAULT: Datatype = Datatype::Double;

    /// VOTable `datatype` attribute value.
    pub fn as_str(self) -> &'static str {
        match self {
            Datatype::Boolean => "boolean",
            Datatype::Short => "short",
            Datatype::UnsignedByte => "unsignedByte",
            Datatype::Int => "int",
            Datatype::Long => "long",
            Datatype::Float => "float",
            Datatype::Double => "double",
            Datatype::FloatComplex => "floatComplex",
            Datatype::DoubleComplex => "doubleComplex",
            Datatype::Char => "char",
        }
    }
}

impl fmt::Display for Datatype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inferred metadata for one result column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor {
    pub name: String,
    pub datatype: Datatype,
    /// Fixed character width; only set for [`Datatype::Char`] columns.
    pub width: Option<usize>,
    /// Type of the first non-null value, if any.
    pub base: Option<Datatype>,
    /// First later type that differed from `base`.
    pub conflict: Option<Datatype>,
}

impl ColumnDescriptor {
    /// Scan a column and derive its descriptor.
    ///
    /// The first non-null value fixes the base type. A later value of another
    /// type widens the datatype to the highest precedence seen and marks the
    /// column as mixed. Character width is the longest textual form plus one.
    pub fn infer<'a, I>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = &'a Value>,
    {
        let mut base: Option<Datatype> = None;
        let mut conflict: Option<Datatype> = None;
        let mut widest: Option<Datatype> = None;
        let mut longest = 0usize;

        for value in values {
            let Some(datatype) = value.datatype() else {
                continue;
            };
            match base {
                None => base = Some(datatype),
                Some(first) if first != datatype && conflict.is_none() => {
                    conflict = Some(datatype)
                }
                Some(_) => {}
            }
            widest = widest.max(Some(datatype));
            longest = longest.max(text_len(value));
        }

        let datatype = widest.unwrap_or(Datatype::DEFAULT);
        let width = (datatype == Datatype::Char).then_some(longest + 1);

        Self {
            name: name.into(),
            datatype,
            width,
            base,
            conflict,
        }
    }

    /// Set when non-null values of more than one type were observed.
    pub fn is_mixed(&self) -> bool {
        self.conflict.is_some()
    }

    /// Fail when the column cannot be stored with a single fixed type.
    pub fn ensure_uniform(&self) -> Result<(), DomainError> {
        match (self.base, self.conflict) {
            (Some(expected), Some(found)) => Err(DomainError::InconsistentColumn {
                column: self.name.clone(),
                expected,
                found,
            }),
            _ => Ok(()),
        }
    }
}

fn text_len(value: &Value) -> usize {
    match value {
        Value::Text(text) => text.len(),
        other => other.to_string().len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_non_null_value_sets_type() {
        let values = [Value::Null, Value::Long(30), Value::Long(25)];
        let column = ColumnDescriptor::infer("age", &values);
        assert_eq!(column.datatype, Datatype::Long);
        assert_eq!(column.width, None);
        assert!(!column.is_mixed());
    }

    #[test]
    fn char_width_is_longest_value_plus_one() {
        let values = [Value::from("Alice"), Value::from("Bob")];
        let column = ColumnDescriptor::infer("name", &values);
        assert_eq!(column.datatype, Datatype::Char);
        assert_eq!(column.width, Some(6));
    }

    #[test]
    fn all_null_column_defaults_to_double() {
        let values = [Value::Null, Value::Null];
        let column = ColumnDescriptor::infer("missing", &values);
        assert_eq!(column.datatype, Datatype::Double);
        assert_eq!(column.width, None);
    }

    #[test]
    fn empty_column_defaults_to_double() {
        let column = ColumnDescriptor::infer("nothing", std::iter::empty());
        assert_eq!(column.datatype, Datatype::Double);
    }

    #[test]
    fn mixed_values_widen_by_precedence() {
        let values = [Value::Int(1), Value::Double(2.5), Value::Short(3)];
        let column = ColumnDescriptor::infer("x", &values);
        assert_eq!(column.datatype, Datatype::Double);
        assert!(column.is_mixed());
    }

    #[test]
    fn mixed_column_is_not_uniform() {
        let values = [Value::Long(1), Value::from("x")];
        let column = ColumnDescriptor::infer("x", &values);
        let err = column.ensure_uniform().expect_err("mixed column");
        assert!(err.to_string().starts_with("inconsistent column type in `x`"));

        let column = ColumnDescriptor::infer("y", &[Value::Null, Value::Long(2)]);
        assert!(column.ensure_uniform().is_ok());
    }

    #[test]
    fn inconsistency_names_the_differing_type() {
        let values = [Value::Double(1.5), Value::Int(2), Value::from("z")];
        let column = ColumnDescriptor::infer("x", &values);
        assert_eq!(column.datatype, Datatype::Char);
        assert_eq!(column.conflict, Some(Datatype::Int));
        let err = column.ensure_uniform().expect_err("mixed column");
        assert_eq!(
            err.to_string(),
            "inconsistent column type in `x`: expected double, found int"
        );
    }

    #[test]
    fn mixed_into_char_measures_textual_form() {
        let values = [Value::Long(123456), Value::from("ab")];
        let column = ColumnDescriptor::infer("x", &values);
        assert_eq!(column.datatype, Datatype::Char);
        assert_eq!(column.width, Some(7));
    }

    #[test]
    fn precedence_order_follows_votable_widening() {
        assert!(Datatype::Boolean < Datatype::Short);
        assert!(Datatype::UnsignedByte < Datatype::Int);
        assert!(Datatype::Double < Datatype::FloatComplex);
        assert!(Datatype::DoubleComplex < Datatype::Char);
    }
}
