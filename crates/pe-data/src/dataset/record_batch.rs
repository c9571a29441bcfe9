//! Conversion from Arrow record batches

use arrow::array::{Array, Float64Array, StringArray};
use arrow::compute::cast;
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;

use super::{Column, Dataset};
use crate::DataError;

impl Dataset {
    /// Build a dataset from an Arrow record batch.
    ///
    /// Integer, unsigned and floating-point fields become numeric columns;
    /// string and boolean fields become categorical columns. Arrow nulls are
    /// missing cells.
    pub fn from_record_batch(batch: &RecordBatch) -> Result<Self, DataError> {
        let schema = batch.schema();
        let mut columns = Vec::with_capacity(batch.num_columns());

        for (idx, field) in schema.fields().iter().enumerate() {
            let array = batch.column(idx);
            let column = match field.data_type() {
                DataType::Float64 | DataType::Float32 | DataType::Float16 |
                DataType::Int64 | DataType::Int32 |
                DataType::Int16 | DataType::Int8 |
                DataType::UInt64 | DataType::UInt32 |
                DataType::UInt16 | DataType::UInt8 => {
                    let converted = cast(array.as_ref(), &DataType::Float64)?;
                    let floats = converted
                        .as_any()
                        .downcast_ref::<Float64Array>()
                        .ok_or_else(|| unsupported(field.name(), field.data_type()))?;
                    let values = (0..floats.len())
                        .map(|i| if floats.is_valid(i) { Some(floats.value(i)) } else { None })
                        .collect();
                    Column::numeric(field.name().clone(), values)
                }
                DataType::Utf8 | DataType::LargeUtf8 | DataType::Boolean => {
                    let converted = cast(array.as_ref(), &DataType::Utf8)?;
                    let strings = converted
                        .as_any()
                        .downcast_ref::<StringArray>()
                        .ok_or_else(|| unsupported(field.name(), field.data_type()))?;
                    let values = (0..strings.len())
                        .map(|i| if strings.is_valid(i) { Some(strings.value(i).to_string()) } else { None })
                        .collect();
                    Column::categorical(field.name().clone(), values)
                }
                other => return Err(unsupported(field.name(), other)),
            };
            columns.push(column);
        }

        Dataset::new(columns)
    }
}

fn unsupported(column: &str, data_type: &DataType) -> DataError {
    DataError::UnsupportedType {
        column: column.to_string(),
        data_type: data_type.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use arrow::array::{ArrayRef, BooleanArray, Date32Array, Int64Array};
    use arrow::datatypes::{Field, Schema};

    use super::*;
    use crate::dataset::ColumnKind;

    #[test]
    fn test_record_batch_conversion() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("age", DataType::Int64, true),
            Field::new("dept", DataType::Utf8, true),
            Field::new("active", DataType::Boolean, false),
        ]));
        let columns: Vec<ArrayRef> = vec![
            Arc::new(Int64Array::from(vec![Some(30), None, Some(45)])),
            Arc::new(StringArray::from(vec![Some("Sales"), Some("HR"), None])),
            Arc::new(BooleanArray::from(vec![true, false, true])),
        ];
        let batch = RecordBatch::try_new(schema, columns).unwrap();

        let dataset = Dataset::from_record_batch(&batch).unwrap();
        assert_eq!(dataset.row_count(), 3);

        let age = dataset.column("age").unwrap();
        assert_eq!(age.kind(), ColumnKind::Numeric);
        assert_eq!(age.as_numeric().unwrap(), &[Some(30.0), None, Some(45.0)]);

        let dept = dataset.column("dept").unwrap();
        assert_eq!(dept.kind(), ColumnKind::Categorical);
        assert_eq!(dept.missing_count(), 1);

        let active = dataset.column("active").unwrap();
        assert_eq!(active.as_categorical().unwrap()[0].as_deref(), Some("true"));
    }

    #[test]
    fn test_unsupported_arrow_type() {
        let schema = Arc::new(Schema::new(vec![Field::new("day", DataType::Date32, false)]));
        let columns: Vec<ArrayRef> = vec![Arc::new(Date32Array::from(vec![1, 2]))];
        let batch = RecordBatch::try_new(schema, columns).unwrap();

        let result = Dataset::from_record_batch(&batch);
        assert!(matches!(result, Err(DataError::UnsupportedType { column, .. }) if column == "day"));
    }
}
