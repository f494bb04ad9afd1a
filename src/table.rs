use std::{collections::HashMap, sync::Arc};

use arrow::{
    array::{Array, ArrayRef, BooleanArray},
    compute::kernels::filter::filter,
    datatypes::{Field, Schema, SchemaRef},
    record_batch::RecordBatch,
};
use sieve_predicate::{ChunkedColumn, ColumnRef};

use crate::{Slicer, TableError};

/// Named chunked columns of equal length.
#[derive(Clone, Debug)]
pub struct Table {
    schema: SchemaRef,
    columns: Vec<ColumnRef>,
    by_name: HashMap<Arc<str>, usize>,
    num_rows: usize,
}

impl Table {
    /// Builds a table from chunked columns, deriving a nullable schema.
    ///
    /// # Errors
    ///
    /// Fails when names repeat or row counts differ.
    pub fn try_new(columns: Vec<ChunkedColumn>) -> Result<Self, TableError> {
        let fields: Vec<Field> = columns
            .iter()
            .map(|column| Field::new(column.name(), column.data_type().clone(), true))
            .collect();
        Self::assemble(Arc::new(Schema::new(fields)), columns)
    }

    /// Builds a table where every batch contributes one chunk to each column.
    ///
    /// # Errors
    ///
    /// Fails when a batch does not match `schema` or field names repeat.
    pub fn try_from_batches<I>(schema: SchemaRef, batches: I) -> Result<Self, TableError>
    where
        I: IntoIterator<Item = RecordBatch>,
    {
        let width = schema.fields().len();
        let mut chunks: Vec<Vec<ArrayRef>> = vec![Vec::new(); width];
        for batch in batches {
            if batch.num_columns() != width {
                return Err(TableError::ColumnCount {
                    expected: width,
                    actual: batch.num_columns(),
                });
            }
            for ((field, array), column_chunks) in schema
                .fields()
                .iter()
                .zip(batch.columns())
                .zip(chunks.iter_mut())
            {
                if array.data_type() != field.data_type() {
                    return Err(TableError::SchemaMismatch {
                        field: field.name().clone(),
                        expected: field.data_type().clone(),
                        actual: array.data_type().clone(),
                    });
                }
                column_chunks.push(Arc::clone(array));
            }
        }

        let columns = schema
            .fields()
            .iter()
            .zip(chunks)
            .map(|(field, column_chunks)| {
                ChunkedColumn::try_new(
                    field.name().as_str(),
                    field.data_type().clone(),
                    column_chunks,
                )
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::assemble(schema, columns)
    }

    fn assemble(schema: SchemaRef, columns: Vec<ChunkedColumn>) -> Result<Self, TableError> {
        let num_rows = columns.first().map_or(0, ChunkedColumn::len);
        let mut by_name = HashMap::with_capacity(columns.len());
        let mut refs = Vec::with_capacity(columns.len());
        for (index, column) in columns.into_iter().enumerate() {
            if column.len() != num_rows {
                return Err(TableError::ColumnLength {
                    column: column.name().to_owned(),
                    expected: num_rows,
                    actual: column.len(),
                });
            }
            if by_name
                .insert(Arc::<str>::from(column.name()), index)
                .is_some()
            {
                return Err(TableError::DuplicateColumn(column.name().to_owned()));
            }
            refs.push(ColumnRef::new(column));
        }
        Ok(Self {
            schema,
            columns: refs,
            by_name,
            num_rows,
        })
    }

    /// Table schema.
    pub fn schema(&self) -> &SchemaRef {
        &self.schema
    }

    /// Number of rows shared by every column.
    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    /// Number of columns.
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Columns in schema order.
    pub fn columns(&self) -> &[ColumnRef] {
        &self.columns
    }

    /// Looks up a column by name.
    pub fn column(&self, name: &str) -> Option<&ColumnRef> {
        self.by_name.get(name).map(|&index| &self.columns[index])
    }

    /// Column names in schema order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.columns.iter().map(|column| column.name())
    }

    /// Entry point for building conditions over this table.
    pub fn slicer(&self) -> Slicer<'_> {
        Slicer::new(self)
    }

    /// Keeps the rows whose mask entry is true; NULL entries drop their row.
    ///
    /// Each column keeps its own chunk layout, minus the dropped rows.
    ///
    /// # Errors
    ///
    /// Fails when the mask length differs from the row count.
    pub fn filter(&self, mask: &BooleanArray) -> Result<Table, TableError> {
        if mask.len() != self.num_rows {
            return Err(TableError::MaskLength {
                expected: self.num_rows,
                actual: mask.len(),
            });
        }
        let columns = self
            .columns
            .iter()
            .map(|column| filter_column(column, mask))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Table {
            schema: Arc::clone(&self.schema),
            columns,
            by_name: self.by_name.clone(),
            num_rows: mask.true_count(),
        })
    }
}

fn filter_column(column: &ChunkedColumn, mask: &BooleanArray) -> Result<ColumnRef, TableError> {
    let mut offset = 0;
    let mut chunks = Vec::with_capacity(column.num_chunks());
    for chunk in column.chunks() {
        let chunk_mask = mask.slice(offset, chunk.len());
        offset += chunk.len();
        chunks.push(filter(chunk.as_ref(), &chunk_mask)?);
    }
    let filtered = ChunkedColumn::try_new(column.name(), column.data_type().clone(), chunks)?;
    Ok(ColumnRef::new(filtered))
}
