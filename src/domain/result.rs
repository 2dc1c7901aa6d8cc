//! Format-agnostic representation of a query result.

use std::collections::{BTreeMap, BTreeSet};

use super::column::ColumnDescriptor;
use super::value::Value;

/// Immutable rectangular result table.
///
/// Columns are the alphabetically sorted union of every record's keys. A
/// record that omits a key holds [`Value::Null`] in that column. Row order is
/// the order records were supplied in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl ResultSet {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a result from keyed records. A repeated key keeps its last value.
    pub fn from_records<I, R, K>(records: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let keyed: Vec<BTreeMap<String, Value>> = records
            .into_iter()
            .map(|record| {
                record
                    .into_iter()
                    .map(|(key, value)| (key.into(), value))
                    .collect()
            })
            .collect();

        let columns: Vec<String> = keyed
            .iter()
            .flat_map(|record| record.keys().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let rows = keyed
            .into_iter()
            .map(|mut record| {
                columns
                    .iter()
                    .map(|column| record.remove(column).unwrap_or_default())
                    .collect()
            })
            .collect();

        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Values of one column, top to bottom.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &Value> + '_ {
        self.rows.iter().map(move |row| &row[index])
    }

    /// Run type inference over every column.
    pub fn descriptors(&self) -> Vec<ColumnDescriptor> {
        self.columns
            .iter()
            .enumerate()
            .map(|(index, name)| ColumnDescriptor::infer(name.as_str(), self.column_values(index)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::column::Datatype;

    fn people() -> ResultSet {
        ResultSet::from_records(vec![
            vec![("name", Value::from("Alice")), ("age", Value::Long(30))],
            vec![("name", Value::from("Bob")), ("age", Value::Long(25))],
        ])
    }

    #[test]
    fn columns_are_sorted_alphabetically() {
        assert_eq!(people().columns(), ["age", "name"]);
    }

    #[test]
    fn rows_follow_column_order_and_input_order() {
        let result = people();
        assert_eq!(result.rows()[0], vec![Value::Long(30), Value::from("Alice")]);
        assert_eq!(result.rows()[1], vec![Value::Long(25), Value::from("Bob")]);
    }

    #[test]
    fn columns_are_union_of_all_record_keys() {
        let result = ResultSet::from_records(vec![
            vec![("b", Value::Int(1))],
            vec![("a", Value::Int(2)), ("c", Value::Int(3))],
        ]);
        assert_eq!(result.columns(), ["a", "b", "c"]);
        assert_eq!(result.rows()[0], vec![Value::Null, Value::Int(1), Value::Null]);
        assert_eq!(result.rows()[1], vec![Value::Int(2), Value::Null, Value::Int(3)]);
    }

    #[test]
    fn repeated_key_keeps_last_value() {
        let result = ResultSet::from_records(vec![vec![("a", Value::Int(1)), ("a", Value::Int(2))]]);
        assert_eq!(result.columns(), ["a"]);
        assert_eq!(result.rows()[0], vec![Value::Int(2)]);
    }

    #[test]
    fn empty_input_yields_no_columns() {
        let result = ResultSet::from_records(Vec::<Vec<(String, Value)>>::new());
        assert!(result.is_empty());
        assert!(result.columns().is_empty());
        assert!(result.descriptors().is_empty());
    }

    #[test]
    fn descriptors_follow_column_order() {
        let descriptors = people().descriptors();
        assert_eq!(descriptors[0].name, "age");
        assert_eq!(descriptors[0].datatype, Datatype::Long);
        assert_eq!(descriptors[1].name, "name");
        assert_eq!(descriptors[1].width, Some(6));
    }
}
