use thiserror::Error;

pub use color_eyre::eyre::eyre;

/// Failures of a comparison
///
/// Every variant except `BadConfigError` is fatal for the operation that hit it:
/// it means a caller broke a contract or the data is corrupt, and continuing would
/// risk persisting a broken index order.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Unknown data type number {0}")]
    UnknownMainType(u8),

    #[error("Unable to find charset-collation {0}")]
    UnknownCollation(u16),

    #[error("Externally stored field {field} reached during comparison")]
    ExternalField { field: usize },

    #[error("Field {field} out of range for a record of {n_fields} fields")]
    FieldOutOfRange { field: usize, n_fields: usize },

    #[error("Index {index} contains two entries equal in every column")]
    DuplicateEntries { index: String },

    #[error("Corrupt record: {0}")]
    CorruptRecord(String),

    #[error("Bad config error: {0}")]
    BadConfigError(String),

    #[error("Library bug: {0}")]
    LibraryBug(color_eyre::Report),
}

pub type Result<T> = std::result::Result<T, Error>;
