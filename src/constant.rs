//! Type tags, precise-type flags and record info bits shared by every comparator.

/// Length sentinel denoting SQL NULL
pub const SQL_NULL: u32 = u32::MAX;

/// Collation id of the `binary` charset
pub const BINARY_CHARSET_COLL: u16 = 63;

/// Collation ids of the collations registered by `CollationRegistry::with_builtins`
pub const LATIN1_SWEDISH_CI: u16 = 8;
pub const UTF8MB4_GENERAL_CI: u16 = 45;
pub const UTF8MB4_BIN: u16 = 46;
pub const LATIN1_BIN: u16 = 47;
pub const UTF8MB3_BIN: u16 = 83;

/// Largest collation id that fits in a precise type
pub const MAX_CHAR_COLL_NUM: u16 = 0x7FFF;

/// Space: the pad byte of every paddable type
pub const PAD_SPACE: u8 = 0x20;

/// Byte length of `DB_ROW_ID` and `DB_TRX_ID`
pub const SYS_ID_LEN: usize = 6;

/// Byte length of `DB_ROLL_PTR`
pub const ROLL_PTR_LEN: usize = 7;

/// Main type of a column, the `mtype` of the data dictionary
///
/// The set is closed: a raw tag outside of it is rejected by [`MainType::from_u8`]
/// and never reaches a comparator.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MainType {
    /// Variable-length latin1 string without a MySQL collation
    VarChar = 1,
    /// Fixed-length latin1 string without a MySQL collation
    Char = 2,
    /// Fixed-length binary string
    FixBinary = 3,
    /// Variable-length binary string
    Binary = 4,
    /// BLOB or TEXT; binary unless `PrtypeFlags::BINARY_TYPE` is clear
    Blob = 5,
    /// Integer stored big-endian with the sign bit flipped
    Int = 6,
    /// Child page number in node pointer records
    SysChild = 7,
    /// Internal system column (`DB_ROW_ID`, `DB_TRX_ID`, `DB_ROLL_PTR`)
    Sys = 8,
    Float = 9,
    Double = 10,
    /// Decimal number stored as an ASCII string
    Decimal = 11,
    /// Variable-length string compared by a MySQL collation
    VarMysql = 12,
    /// Fixed-length string compared by a MySQL collation
    Mysql = 13,
    Geometry = 14,
}

impl MainType {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::VarChar),
            2 => Some(Self::Char),
            3 => Some(Self::FixBinary),
            4 => Some(Self::Binary),
            5 => Some(Self::Blob),
            6 => Some(Self::Int),
            7 => Some(Self::SysChild),
            8 => Some(Self::Sys),
            9 => Some(Self::Float),
            10 => Some(Self::Double),
            11 => Some(Self::Decimal),
            12 => Some(Self::VarMysql),
            13 => Some(Self::Mysql),
            14 => Some(Self::Geometry),
            _ => None,
        }
    }

    /// String types: every type up to `Blob`, plus the MySQL string types
    pub fn is_string(self) -> bool {
        (self as u8) <= (Self::Blob as u8) || matches!(self, Self::Mysql | Self::VarMysql)
    }
}

impl TryFrom<u8> for MainType {
    type Error = crate::error::Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_u8(value).ok_or_else(|| {
            tracing::error!(mtype = value, "unknown data type number");
            crate::error::Error::UnknownMainType(value)
        })
    }
}

bitflags::bitflags! {
    /// Flags stored in bits 8..16 of a precise type
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PrtypeFlags: u32 {
        const NOT_NULL = 0x0100;
        const UNSIGNED = 0x0200;
        /// Binary string or BLOB; never compared through a collation
        const BINARY_TYPE = 0x0400;
        const GIS_MBR = 0x0800;
        /// VARCHAR with a two-byte length prefix in the MySQL row format
        const LONG_TRUE_VARCHAR = 0x1000;
    }
}

/// Mask of the MySQL field type in the low byte of a precise type
pub const PRTYPE_MYSQL_TYPE_MASK: u32 = 0xFF;

/// Shift of the charset-collation id inside a precise type
pub const PRTYPE_CHARSET_COLL_SHIFT: u32 = 16;

/// Low-byte codes of a precise type for `MainType::Sys` columns
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SysColumn {
    RowId = 0,
    TrxId = 1,
    RollPtr = 2,
}

impl SysColumn {
    /// Fixed byte length of the column
    pub fn stored_len(self) -> usize {
        match self {
            Self::RowId | Self::TrxId => SYS_ID_LEN,
            Self::RollPtr => ROLL_PTR_LEN,
        }
    }
}

bitflags::bitflags! {
    /// Info bits in the header of a physical record (and of a tuple)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct InfoBits: u8 {
        /// Leftmost node pointer record on the leftmost page of a level
        const MIN_REC = 0x10;
        const DELETED = 0x20;
    }
}

bitflags::bitflags! {
    /// Index type flags of the data dictionary
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct IndexFlags: u8 {
        const CLUSTERED = 0x01;
        const UNIQUE = 0x02;
        /// Insert buffer tree: every field compares as raw binary
        const UNIVERSAL = 0x04;
    }
}

/// MySQL field types, found in the low byte of a precise type
#[allow(non_camel_case_types)]
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    MYSQL_TYPE_DECIMAL = 0x00,
    MYSQL_TYPE_TINY = 0x01,
    MYSQL_TYPE_SHORT = 0x02,
    MYSQL_TYPE_LONG = 0x03,
    MYSQL_TYPE_FLOAT = 0x04,
    MYSQL_TYPE_DOUBLE = 0x05,
    MYSQL_TYPE_NULL = 0x06,
    MYSQL_TYPE_TIMESTAMP = 0x07,
    MYSQL_TYPE_LONGLONG = 0x08,
    MYSQL_TYPE_INT24 = 0x09,
    MYSQL_TYPE_DATE = 0x0a,
    MYSQL_TYPE_TIME = 0x0b,
    MYSQL_TYPE_DATETIME = 0x0c,
    MYSQL_TYPE_YEAR = 0x0d,
    MYSQL_TYPE_NEWDATE = 0x0e,
    MYSQL_TYPE_VARCHAR = 0x0f,
    MYSQL_TYPE_BIT = 0x10,
    MYSQL_TYPE_TIMESTAMP2 = 0x11,
    MYSQL_TYPE_DATETIME2 = 0x12,
    MYSQL_TYPE_TIME2 = 0x13,
    MYSQL_TYPE_JSON = 0xf5,
    MYSQL_TYPE_NEWDECIMAL = 0xf6,
    MYSQL_TYPE_ENUM = 0xf7,
    MYSQL_TYPE_SET = 0xf8,
    MYSQL_TYPE_TINY_BLOB = 0xf9,
    MYSQL_TYPE_MEDIUM_BLOB = 0xfa,
    MYSQL_TYPE_LONG_BLOB = 0xfb,
    MYSQL_TYPE_BLOB = 0xfc,
    MYSQL_TYPE_VAR_STRING = 0xfd,
    MYSQL_TYPE_STRING = 0xfe,
    MYSQL_TYPE_GEOMETRY = 0xff,
}

impl ColumnType {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x00 => Some(Self::MYSQL_TYPE_DECIMAL),
            0x01 => Some(Self::MYSQL_TYPE_TINY),
            0x02 => Some(Self::MYSQL_TYPE_SHORT),
            0x03 => Some(Self::MYSQL_TYPE_LONG),
            0x04 => Some(Self::MYSQL_TYPE_FLOAT),
            0x05 => Some(Self::MYSQL_TYPE_DOUBLE),
            0x06 => Some(Self::MYSQL_TYPE_NULL),
            0x07 => Some(Self::MYSQL_TYPE_TIMESTAMP),
            0x08 => Some(Self::MYSQL_TYPE_LONGLONG),
            0x09 => Some(Self::MYSQL_TYPE_INT24),
            0x0a => Some(Self::MYSQL_TYPE_DATE),
            0x0b => Some(Self::MYSQL_TYPE_TIME),
            0x0c => Some(Self::MYSQL_TYPE_DATETIME),
            0x0d => Some(Self::MYSQL_TYPE_YEAR),
            0x0e => Some(Self::MYSQL_TYPE_NEWDATE),
            0x0f => Some(Self::MYSQL_TYPE_VARCHAR),
            0x10 => Some(Self::MYSQL_TYPE_BIT),
            0x11 => Some(Self::MYSQL_TYPE_TIMESTAMP2),
            0x12 => Some(Self::MYSQL_TYPE_DATETIME2),
            0x13 => Some(Self::MYSQL_TYPE_TIME2),
            0xf5 => Some(Self::MYSQL_TYPE_JSON),
            0xf6 => Some(Self::MYSQL_TYPE_NEWDECIMAL),
            0xf7 => Some(Self::MYSQL_TYPE_ENUM),
            0xf8 => Some(Self::MYSQL_TYPE_SET),
            0xf9 => Some(Self::MYSQL_TYPE_TINY_BLOB),
            0xfa => Some(Self::MYSQL_TYPE_MEDIUM_BLOB),
            0xfb => Some(Self::MYSQL_TYPE_LONG_BLOB),
            0xfc => Some(Self::MYSQL_TYPE_BLOB),
            0xfd => Some(Self::MYSQL_TYPE_VAR_STRING),
            0xfe => Some(Self::MYSQL_TYPE_STRING),
            0xff => Some(Self::MYSQL_TYPE_GEOMETRY),
            _ => None,
        }
    }

    /// Field types whose values may be handed to a MySQL collation
    pub fn is_collatable(self) -> bool {
        matches!(
            self,
            Self::MYSQL_TYPE_BIT
                | Self::MYSQL_TYPE_STRING
                | Self::MYSQL_TYPE_VAR_STRING
                | Self::MYSQL_TYPE_TINY_BLOB
                | Self::MYSQL_TYPE_MEDIUM_BLOB
                | Self::MYSQL_TYPE_BLOB
                | Self::MYSQL_TYPE_LONG_BLOB
                | Self::MYSQL_TYPE_VARCHAR
        )
    }
}
