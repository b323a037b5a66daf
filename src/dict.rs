use crate::constant::IndexFlags;
use crate::dtype::DataType;

/// Column definition from the data dictionary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub dtype: DataType,
    /// Declared length in bytes
    pub len: u32,
}

impl Column {
    pub fn new(name: impl Into<String>, dtype: DataType, len: u32) -> Self {
        Self {
            name: name.into(),
            dtype,
            len,
        }
    }
}

/// Index definition: ordered columns, the unique prefix length, and type flags
#[derive(Debug, Clone)]
pub struct Index {
    pub name: String,
    pub columns: Vec<Column>,
    /// Number of leading columns that identify an entry
    pub n_unique: usize,
    pub flags: IndexFlags,
}

impl Index {
    pub fn new(
        name: impl Into<String>,
        columns: Vec<Column>,
        n_unique: usize,
        flags: IndexFlags,
    ) -> Self {
        debug_assert!(n_unique <= columns.len());
        Self {
            name: name.into(),
            columns,
            n_unique,
            flags,
        }
    }

    pub fn n_fields(&self) -> usize {
        self.columns.len()
    }

    pub fn nth_col(&self, n: usize) -> Option<&Column> {
        self.columns.get(n)
    }

    pub fn is_unique(&self) -> bool {
        self.flags.contains(IndexFlags::UNIQUE)
    }

    pub fn is_clustered(&self) -> bool {
        self.flags.contains(IndexFlags::CLUSTERED)
    }

    /// The insert buffer tree, whose fields are all compared as binary
    pub fn is_universal(&self) -> bool {
        self.flags.contains(IndexFlags::UNIVERSAL)
    }

    /// Type the `n`th field of a record of this index is compared as
    pub fn field_type(&self, n: usize) -> Option<DataType> {
        if self.is_universal() {
            return Some(DataType::universal());
        }
        self.nth_col(n).map(|col| col.dtype)
    }
}
