use std::{fmt, sync::Arc};

use arrow::{
    array::{Array, ArrayRef},
    datatypes::DataType,
};

use super::ColumnError;

/// A named column whose rows are stored as an ordered sequence of Arrow chunks.
#[derive(Clone, Debug)]
pub struct ChunkedColumn {
    name: Arc<str>,
    data_type: DataType,
    chunks: Vec<ArrayRef>,
    len: usize,
}

impl ChunkedColumn {
    /// Creates a column from chunks that all carry `data_type`.
    ///
    /// # Errors
    ///
    /// Returns [`ColumnError::ChunkType`] when a chunk's type differs from `data_type`.
    pub fn try_new<N>(
        name: N,
        data_type: DataType,
        chunks: Vec<ArrayRef>,
    ) -> Result<Self, ColumnError>
    where
        N: Into<Arc<str>>,
    {
        let name = name.into();
        if let Some((index, chunk)) = chunks
            .iter()
            .enumerate()
            .find(|(_, chunk)| chunk.data_type() != &data_type)
        {
            return Err(ColumnError::ChunkType {
                column: name.to_string(),
                chunk: index,
                expected: data_type,
                actual: chunk.data_type().clone(),
            });
        }
        let len = chunks.iter().map(|chunk| chunk.len()).sum();
        Ok(Self {
            name,
            data_type,
            chunks,
            len,
        })
    }

    /// Creates a single-chunk column.
    #[must_use]
    pub fn from_array<N>(name: N, array: ArrayRef) -> Self
    where
        N: Into<Arc<str>>,
    {
        Self {
            name: name.into(),
            data_type: array.data_type().clone(),
            len: array.len(),
            chunks: vec![array],
        }
    }

    /// Column name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared Arrow type shared by every chunk.
    #[must_use]
    pub fn data_type(&self) -> &DataType {
        &self.data_type
    }

    /// Chunks in row order.
    #[must_use]
    pub fn chunks(&self) -> &[ArrayRef] {
        &self.chunks
    }

    /// Number of chunks.
    #[must_use]
    pub fn num_chunks(&self) -> usize {
        self.chunks.len()
    }

    /// Total number of rows across all chunks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true when the column holds no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of null rows across all chunks.
    #[must_use]
    pub fn null_count(&self) -> usize {
        self.chunks.iter().map(|chunk| chunk.null_count()).sum()
    }
}

/// Shared handle to a [`ChunkedColumn`] held by conditions.
///
/// Equality is identity: two handles are equal when they point at the same column.
#[derive(Clone)]
pub struct ColumnRef(Arc<ChunkedColumn>);

impl ColumnRef {
    /// Wraps a column into a shareable handle.
    #[must_use]
    pub fn new(column: ChunkedColumn) -> Self {
        Self(Arc::new(column))
    }

    /// Column name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.0.name()
    }
}

impl std::ops::Deref for ColumnRef {
    type Target = ChunkedColumn;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<ChunkedColumn> for ColumnRef {
    fn from(column: ChunkedColumn) -> Self {
        Self::new(column)
    }
}

impl From<Arc<ChunkedColumn>> for ColumnRef {
    fn from(column: Arc<ChunkedColumn>) -> Self {
        Self(column)
    }
}

impl PartialEq for ColumnRef {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for ColumnRef {}

impl fmt::Debug for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnRef")
            .field("name", &self.0.name())
            .field("data_type", self.0.data_type())
            .field("len", &self.0.len())
            .field("chunks", &self.0.num_chunks())
            .finish()
    }
}
