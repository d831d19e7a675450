//! Parquet export via Arrow record batches (`parquet` feature).

use std::sync::Arc;

use arrow::array::{ArrayRef, BooleanArray, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use log::debug;
use parquet::arrow::ArrowWriter;

use crate::error::Result;
use crate::inference::infer_column_types;
use crate::input::{Cell, Dataset};
use crate::schema::ColumnType;

/// One row group holding the whole dataset.
///
/// Number columns become Int64 when every present value is integral and
/// Float64 otherwise; booleans stay boolean; everything else is UTF-8 text.
pub fn to_parquet(data: &Dataset) -> Result<Vec<u8>> {
    let types = infer_column_types(data);

    let mut fields = Vec::with_capacity(types.len());
    let mut arrays: Vec<ArrayRef> = Vec::with_capacity(types.len());
    for (name, column_type) in &types {
        let values: Vec<Option<&Cell>> = data
            .column_values(name)
            .map(|c| c.filter(|c| !c.is_missing()))
            .collect();

        let (data_type, array): (DataType, ArrayRef) = match column_type {
            ColumnType::Number if values.iter().flatten().all(|c| is_integral(c)) => (
                DataType::Int64,
                Arc::new(Int64Array::from(
                    values.iter().map(|c| c.map(|c| c.to_number() as i64)).collect::<Vec<_>>(),
                )),
            ),
            ColumnType::Number => (
                DataType::Float64,
                Arc::new(Float64Array::from(
                    values.iter().map(|c| c.map(Cell::to_number)).collect::<Vec<_>>(),
                )),
            ),
            ColumnType::Boolean => (
                DataType::Boolean,
                Arc::new(BooleanArray::from(
                    values
                        .iter()
                        .map(|c| match c {
                            Some(Cell::Bool(b)) => Some(*b),
                            _ => None,
                        })
                        .collect::<Vec<_>>(),
                )),
            ),
            ColumnType::Date | ColumnType::String => (
                DataType::Utf8,
                Arc::new(StringArray::from(
                    values.iter().map(|c| c.map(|c| c.to_string())).collect::<Vec<_>>(),
                )),
            ),
        };
        fields.push(Field::new(name.as_str(), data_type, true));
        arrays.push(array);
    }

    let schema = Arc::new(Schema::new(fields));
    let batch = RecordBatch::try_new(schema.clone(), arrays)?;

    let mut writer = ArrowWriter::try_new(Vec::new(), schema, None)?;
    writer.write(&batch)?;
    debug!("wrote parquet batch of {} rows", batch.num_rows());
    Ok(writer.into_inner()?)
}

fn is_integral(cell: &Cell) -> bool {
    let n = cell.to_number();
    n.is_finite() && n.fract() == 0.0 && n.abs() < i64::MAX as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use parquet::file::reader::{FileReader, SerializedFileReader};
    use std::io::Write;

    #[test]
    fn test_parquet_round_trips_row_count_and_schema() {
        let data = Dataset::from_columns(
            &["id", "score", "name", "active"],
            vec![
                vec![Cell::Number(1.0), Cell::Number(0.5), Cell::text("Ann"), Cell::Bool(true)],
                vec![Cell::Number(2.0), Cell::Null, Cell::text(""), Cell::Bool(false)],
                vec![Cell::Number(3.0), Cell::Number(2.0), Cell::text("Cy"), Cell::Null],
            ],
        );
        let bytes = to_parquet(&data).unwrap();
        assert_eq!(&bytes[..4], b"PAR1");

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&bytes).unwrap();
        let reader = SerializedFileReader::new(file.reopen().unwrap()).unwrap();
        let metadata = reader.metadata().file_metadata();
        assert_eq!(metadata.num_rows(), 3);

        let columns: Vec<String> = metadata
            .schema_descr()
            .columns()
            .iter()
            .map(|c| c.name().to_string())
            .collect();
        assert_eq!(columns, vec!["id", "score", "name", "active"]);
    }
}
