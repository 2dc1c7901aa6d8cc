//! FITS binary-table output on top of `fitsio-pure`.
//!
//! Callers hand over fully-typed rows that must match the declared column
//! formats; null handling and format selection live with the encoder.

use std::fmt;

use fitsio_pure::{
    bintable::{
        BinaryColumnData, BinaryColumnDescriptor, BinaryColumnType, binary_type_byte_size,
        build_binary_table_cards, serialize_binary_table,
    },
    header::{Card, serialize_header},
    primary::build_primary_header,
    value::Value as CardValue,
};
use thiserror::Error;

use crate::domain::{Datatype, Value};

pub use fitsio_pure::BLOCK_SIZE;

/// Binary-table column format (`TFORMn`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TForm {
    Logical,
    UnsignedByte,
    Short,
    Int,
    Long,
    Float,
    Double,
    FloatComplex,
    DoubleComplex,
    Chars(usize),
}

impl TForm {
    /// Cell type a column of this format stores.
    pub fn datatype(self) -> Datatype {
        match self {
            TForm::Logical => Datatype::Boolean,
            TForm::UnsignedByte => Datatype::UnsignedByte,
            TForm::Short => Datatype::Short,
            TForm::Int => Datatype::Int,
            TForm::Long => Datatype::Long,
            TForm::Float => Datatype::Float,
            TForm::Double => Datatype::Double,
            TForm::FloatComplex => Datatype::FloatComplex,
            TForm::DoubleComplex => Datatype::DoubleComplex,
            TForm::Chars(_) => Datatype::Char,
        }
    }

    fn descriptor(self, name: &str) -> BinaryColumnDescriptor {
        let (repeat, col_type) = match self {
            TForm::Logical => (1, BinaryColumnType::Logical),
            TForm::UnsignedByte => (1, BinaryColumnType::Byte),
            TForm::Short => (1, BinaryColumnType::Short),
            TForm::Int => (1, BinaryColumnType::Int),
            TForm::Long => (1, BinaryColumnType::Long),
            TForm::Float => (1, BinaryColumnType::Float),
            TForm::Double => (1, BinaryColumnType::Double),
            TForm::FloatComplex => (1, BinaryColumnType::ComplexFloat),
            TForm::DoubleComplex => (1, BinaryColumnType::ComplexDouble),
            TForm::Chars(width) => (width, BinaryColumnType::Ascii),
        };
        BinaryColumnDescriptor {
            name: Some(name.to_string()),
            repeat,
            col_type,
            byte_width: repeat * binary_type_byte_size(&col_type),
            tdim: None,
        }
    }

    fn empty_data(self) -> BinaryColumnData {
        match self {
            TForm::Logical => BinaryColumnData::Logical(Vec::new()),
            TForm::UnsignedByte => BinaryColumnData::Byte(Vec::new()),
            TForm::Short => BinaryColumnData::Short(Vec::new()),
            TForm::Int => BinaryColumnData::Int(Vec::new()),
            TForm::Long => BinaryColumnData::Long(Vec::new()),
            TForm::Float => BinaryColumnData::Float(Vec::new()),
            TForm::Double => BinaryColumnData::Double(Vec::new()),
            TForm::FloatComplex => BinaryColumnData::ComplexFloat(Vec::new()),
            TForm::DoubleComplex => BinaryColumnData::ComplexDouble(Vec::new()),
            TForm::Chars(_) => BinaryColumnData::Ascii(Vec::new()),
        }
    }
}

impl fmt::Display for TForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TForm::Logical => f.write_str("L"),
            TForm::UnsignedByte => f.write_str("B"),
            TForm::Short => f.write_str("I"),
            TForm::Int => f.write_str("J"),
            TForm::Long => f.write_str("K"),
            TForm::Float => f.write_str("E"),
            TForm::Double => f.write_str("D"),
            TForm::FloatComplex => f.write_str("C"),
            TForm::DoubleComplex => f.write_str("M"),
            TForm::Chars(width) => write!(f, "{width}A"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableColumn {
    pub name: String,
    pub format: TForm,
}

#[derive(Debug, Error)]
pub enum FitsError {
    #[error("row {row} has {found} cells but the table declares {expected} columns")]
    Arity {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("row {row}, column `{column}`: cell does not match format {format}")]
    CellMismatch {
        row: usize,
        column: String,
        format: TForm,
    },
    #[error("header keyword `{keyword}` cannot hold value: {reason}")]
    InvalidCard { keyword: String, reason: String },
    #[error("fits layout: {0}")]
    Layout(#[from] fitsio_pure::Error),
}

/// Accumulates rows of one binary-table extension column by column.
#[derive(Debug)]
pub struct BinTableWriter {
    extname: String,
    columns: Vec<TableColumn>,
    data: Vec<BinaryColumnData>,
    rows_written: usize,
}

impl BinTableWriter {
    pub fn new(extname: impl Into<String>, columns: Vec<TableColumn>) -> Self {
        let data = columns.iter().map(|column| column.format.empty_data()).collect();
        Self {
            extname: extname.into(),
            columns,
            data,
            rows_written: 0,
        }
    }

    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    /// Append one row. Nothing is stored when any cell is rejected.
    pub fn write_row(&mut self, cells: &[Value]) -> Result<(), FitsError> {
        let row = self.rows_written;
        if cells.len() != self.columns.len() {
            return Err(FitsError::Arity {
                row,
                expected: self.columns.len(),
                found: cells.len(),
            });
        }

        if let Some(column) = self
            .columns
            .iter()
            .zip(cells)
            .find_map(|(column, cell)| (!accepts(column.format, cell)).then_some(column))
        {
            return Err(FitsError::CellMismatch {
                row,
                column: column.name.clone(),
                format: column.format,
            });
        }

        for (data, cell) in self.data.iter_mut().zip(cells) {
            push_cell(data, cell);
        }
        self.rows_written += 1;
        Ok(())
    }

    /// Serialize the primary HDU, then the extension header and data.
    pub fn finish(self) -> Result<Vec<u8>, FitsError> {
        let mut primary = build_primary_header(8, &[])?;
        primary.push(Card::new("EXTEND", CardValue::Logical(true))?);

        let descriptors: Vec<BinaryColumnDescriptor> = self
            .columns
            .iter()
            .enumerate()
            .map(|(index, column)| {
                ascii_card_value(&format!("TTYPE{}", index + 1), &column.name)
                    .map(|name| column.format.descriptor(name))
            })
            .collect::<Result<_, _>>()?;

        let mut extension = build_binary_table_cards(&descriptors, self.rows_written, 0)?;
        let extname = ascii_card_value("EXTNAME", &self.extname)?;
        extension.push(Card::new("EXTNAME", CardValue::String(extname.to_string()))?);

        let mut out = serialize_header(&primary)?;
        out.extend(serialize_header(&extension)?);
        out.extend(serialize_binary_table(&descriptors, &self.data, self.rows_written)?);
        Ok(out)
    }
}

fn accepts(format: TForm, cell: &Value) -> bool {
    match (format, cell) {
        (TForm::Chars(width), Value::Text(text)) => text.len() <= width,
        _ => cell.datatype() == Some(format.datatype()),
    }
}

fn push_cell(data: &mut BinaryColumnData, cell: &Value) {
    match (data, cell) {
        (BinaryColumnData::Logical(values), Value::Boolean(flag)) => values.push(*flag),
        (BinaryColumnData::Byte(values), Value::UnsignedByte(value)) => values.push(*value),
        (BinaryColumnData::Short(values), Value::Short(value)) => values.push(*value),
        (BinaryColumnData::Int(values), Value::Int(value)) => values.push(*value),
        (BinaryColumnData::Long(values), Value::Long(value)) => values.push(*value),
        (BinaryColumnData::Float(values), Value::Float(value)) => values.push(*value),
        (BinaryColumnData::Double(values), Value::Double(value)) => values.push(*value),
        (BinaryColumnData::ComplexFloat(values), Value::FloatComplex(re, im)) => {
            values.push((*re, *im))
        }
        (BinaryColumnData::ComplexDouble(values), Value::DoubleComplex(re, im)) => {
            values.push((*re, *im))
        }
        (BinaryColumnData::Ascii(values), Value::Text(text)) => values.push(text.clone()),
        // `accepts` has already matched every cell against its column.
        _ => {}
    }
}

fn ascii_card_value<'a>(keyword: &str, value: &'a str) -> Result<&'a str, FitsError> {
    match value.chars().find(|c| !(' '..='~').contains(c)) {
        Some(bad) => Err(FitsError::InvalidCard {
            keyword: keyword.to_string(),
            reason: format!("character {bad:?} is not printable ASCII"),
        }),
        None => Ok(value),
    }
}
