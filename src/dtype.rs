//! Column type descriptors: a main type plus a precise type.

use crate::constant::{
    BINARY_CHARSET_COLL, ColumnType, MAX_CHAR_COLL_NUM, MainType, PAD_SPACE,
    PRTYPE_CHARSET_COLL_SHIFT, PRTYPE_MYSQL_TYPE_MASK, PrtypeFlags, SysColumn,
};

/// Type of a field value
///
/// `prtype` packs the MySQL field type (bits 0..8), [`PrtypeFlags`] (bits 8..16)
/// and the charset-collation id (bits 16..31).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DataType {
    pub mtype: MainType,
    pub prtype: u32,
}

impl DataType {
    pub const fn new(mtype: MainType, prtype: u32) -> Self {
        Self { mtype, prtype }
    }

    /// Build a precise type from its parts
    pub fn form_prtype(mysql_type: ColumnType, flags: PrtypeFlags, charset_coll: u16) -> u32 {
        debug_assert!(charset_coll <= MAX_CHAR_COLL_NUM);
        u32::from(mysql_type as u8)
            | flags.bits()
            | (u32::from(charset_coll) << PRTYPE_CHARSET_COLL_SHIFT)
    }

    /// The type every field of the insert buffer tree is compared as
    pub const fn universal() -> Self {
        Self::new(MainType::Binary, 0)
    }

    pub fn int(flags: PrtypeFlags) -> Self {
        Self::new(
            MainType::Int,
            Self::form_prtype(ColumnType::MYSQL_TYPE_LONG, flags, 0),
        )
    }

    /// A hidden system column of the clustered index
    pub fn sys(col: SysColumn) -> Self {
        Self::new(
            MainType::Sys,
            u32::from(col as u8) | PrtypeFlags::NOT_NULL.bits(),
        )
    }

    /// `VARCHAR` with the given collation
    pub fn varchar(charset_coll: u16) -> Self {
        Self::new(
            MainType::VarMysql,
            Self::form_prtype(
                ColumnType::MYSQL_TYPE_VARCHAR,
                PrtypeFlags::LONG_TRUE_VARCHAR,
                charset_coll,
            ),
        )
    }

    /// `CHAR` with the given collation
    pub fn char(charset_coll: u16) -> Self {
        Self::new(
            MainType::Mysql,
            Self::form_prtype(ColumnType::MYSQL_TYPE_STRING, PrtypeFlags::empty(), charset_coll),
        )
    }

    /// `VARBINARY`
    pub fn varbinary() -> Self {
        Self::new(
            MainType::Binary,
            Self::form_prtype(
                ColumnType::MYSQL_TYPE_VARCHAR,
                PrtypeFlags::BINARY_TYPE,
                BINARY_CHARSET_COLL,
            ),
        )
    }

    pub fn blob() -> Self {
        Self::new(
            MainType::Blob,
            Self::form_prtype(
                ColumnType::MYSQL_TYPE_BLOB,
                PrtypeFlags::BINARY_TYPE,
                BINARY_CHARSET_COLL,
            ),
        )
    }

    /// `TEXT` with the given collation
    pub fn text(charset_coll: u16) -> Self {
        Self::new(
            MainType::Blob,
            Self::form_prtype(ColumnType::MYSQL_TYPE_BLOB, PrtypeFlags::empty(), charset_coll),
        )
    }

    pub fn flags(&self) -> PrtypeFlags {
        PrtypeFlags::from_bits_truncate(self.prtype)
    }

    pub fn is_unsigned(&self) -> bool {
        self.flags().contains(PrtypeFlags::UNSIGNED)
    }

    pub fn is_binary_type(&self) -> bool {
        self.flags().contains(PrtypeFlags::BINARY_TYPE)
    }

    pub fn charset_coll(&self) -> u16 {
        // 15 bits after the shift; the cast cannot truncate
        ((self.prtype >> PRTYPE_CHARSET_COLL_SHIFT) & u32::from(MAX_CHAR_COLL_NUM)) as u16
    }

    /// The MySQL field type in the low byte, if it is a known one
    pub fn mysql_type(&self) -> Option<ColumnType> {
        ColumnType::from_u8((self.prtype & PRTYPE_MYSQL_TYPE_MASK) as u8)
    }

    /// A string type that is compared as text
    pub fn is_non_binary_string(&self) -> bool {
        self.mtype.is_string() && !self.is_binary_string()
    }

    pub fn is_binary_string(&self) -> bool {
        match self.mtype {
            MainType::FixBinary | MainType::Binary => true,
            MainType::Blob => self.is_binary_type(),
            _ => false,
        }
    }

    /// Pad byte for values of this type, or `None` if the type is not paddable
    ///
    /// `BINARY`/`VARBINARY` in the binary charset are not padded; every other
    /// character or text type pads with a space.
    pub fn pad_char(&self) -> Option<u8> {
        match self.mtype {
            MainType::FixBinary | MainType::Binary => {
                (self.charset_coll() != BINARY_CHARSET_COLL).then_some(PAD_SPACE)
            }
            MainType::Char | MainType::VarChar | MainType::Mysql | MainType::VarMysql => {
                Some(PAD_SPACE)
            }
            MainType::Blob => (!self.is_binary_type()).then_some(PAD_SPACE),
            MainType::Int
            | MainType::SysChild
            | MainType::Sys
            | MainType::Float
            | MainType::Double
            | MainType::Decimal
            | MainType::Geometry => None,
        }
    }
}
