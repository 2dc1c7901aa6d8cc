//! FITS encoder: column format selection and null substitution on top of the
//! binary-table writer.

use crate::{
    application::error::TapError,
    domain::{ColumnDescriptor, Datatype, ResultSet, Value},
    infra::fits::{BinTableWriter, TForm, TableColumn},
};

pub const EXTNAME: &str = "results";

/// Binary-table format for an inferred column.
pub fn tform_for(column: &ColumnDescriptor) -> TForm {
    match column.datatype {
        Datatype::Boolean => TForm::Logical,
        Datatype::Short => TForm::Short,
        Datatype::UnsignedByte => TForm::UnsignedByte,
        Datatype::Int => TForm::Int,
        Datatype::Long => TForm::Long,
        Datatype::Float => TForm::Float,
        Datatype::Double => TForm::Double,
        Datatype::FloatComplex => TForm::FloatComplex,
        Datatype::DoubleComplex => TForm::DoubleComplex,
        Datatype::Char => TForm::Chars(column.width.unwrap_or(1)),
    }
}

/// Value written in place of a null cell.
pub fn zero_value(format: TForm) -> Value {
    match format {
        TForm::Logical => Value::Boolean(false),
        TForm::UnsignedByte => Value::UnsignedByte(0),
        TForm::Short => Value::Short(0),
        TForm::Int => Value::Int(0),
        TForm::Long => Value::Long(0),
        TForm::Float => Value::Float(0.0),
        TForm::Double => Value::Double(0.0),
        TForm::FloatComplex => Value::FloatComplex(0.0, 0.0),
        TForm::DoubleComplex => Value::DoubleComplex(0.0, 0.0),
        TForm::Chars(width) => Value::Text(" ".repeat(width)),
    }
}

pub fn encode(result: &ResultSet) -> Result<Vec<u8>, TapError> {
    let mut columns = Vec::with_capacity(result.columns().len());
    for descriptor in result.descriptors() {
        descriptor.ensure_uniform()?;
        let format = tform_for(&descriptor);
        columns.push(TableColumn {
            name: descriptor.name,
            format,
        });
    }

    let zeros: Vec<Value> = columns.iter().map(|column| zero_value(column.format)).collect();
    let mut writer = BinTableWriter::new(EXTNAME, columns);

    let mut cells = Vec::with_capacity(zeros.len());
    for row in result.rows() {
        cells.clear();
        cells.extend(row.iter().zip(&zeros).map(|(cell, zero)| {
            if cell.is_null() {
                zero.clone()
            } else {
                cell.clone()
            }
        }));
        writer.write_row(&cells)?;
    }

    if writer.rows_written() != result.len() {
        return Err(TapError::Serialization(format!(
            "row count mismatch: wrote {} of {} rows",
            writer.rows_written(),
            result.len()
        )));
    }

    Ok(writer.finish()?)
}
