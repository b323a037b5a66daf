//! Logical tuples: search keys built in memory before they are encoded.

use crate::constant::{InfoBits, SQL_NULL};
use crate::dtype::DataType;
use crate::primitive::{write_double, write_float, write_int};

/// A field value: bytes, or SQL NULL
///
/// NULL has no bytes; its length is the [`SQL_NULL`] sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Datum<'a>(Option<&'a [u8]>);

impl<'a> Datum<'a> {
    pub const NULL: Self = Self(None);

    pub const fn new(bytes: &'a [u8]) -> Self {
        Self(Some(bytes))
    }

    pub fn is_null(&self) -> bool {
        self.0.is_none()
    }

    /// Length in bytes, or [`SQL_NULL`]
    pub fn len(&self) -> u32 {
        // field lengths are bounded by the page size
        self.0.map_or(SQL_NULL, |bytes| bytes.len() as u32)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_some_and(<[u8]>::is_empty)
    }

    pub fn bytes(&self) -> Option<&'a [u8]> {
        self.0
    }
}

impl<'a> From<&'a [u8]> for Datum<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Self::new(bytes)
    }
}

impl<'a> From<Option<&'a [u8]>> for Datum<'a> {
    fn from(bytes: Option<&'a [u8]>) -> Self {
        Self(bytes)
    }
}

/// One field of a tuple, typed by its own descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TupleField<'a> {
    pub data: Datum<'a>,
    pub dtype: DataType,
}

/// A search key or row projection, ordered like the columns of its index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tuple<'a> {
    fields: Vec<TupleField<'a>>,
    n_fields_cmp: usize,
    info_bits: InfoBits,
}

impl<'a> Tuple<'a> {
    pub fn new(fields: Vec<TupleField<'a>>) -> Self {
        let n_fields_cmp = fields.len();
        Self {
            fields,
            n_fields_cmp,
            info_bits: InfoBits::empty(),
        }
    }

    pub fn with_capacity(n: usize) -> Self {
        Self::new(Vec::with_capacity(n))
    }

    /// Append a field; the compared prefix grows with it
    pub fn push(&mut self, data: Datum<'a>, dtype: DataType) -> &mut Self {
        self.fields.push(TupleField { data, dtype });
        self.n_fields_cmp = self.fields.len();
        self
    }

    pub fn n_fields(&self) -> usize {
        self.fields.len()
    }

    pub fn n_fields_cmp(&self) -> usize {
        self.n_fields_cmp
    }

    /// Restrict comparisons to the first `n` fields (clamped to the field count)
    pub fn set_n_fields_cmp(&mut self, n: usize) {
        self.n_fields_cmp = n.min(self.fields.len());
    }

    pub fn info_bits(&self) -> InfoBits {
        self.info_bits
    }

    pub fn set_info_bits(&mut self, info_bits: InfoBits) {
        self.info_bits = info_bits;
    }

    pub fn field(&self, n: usize) -> Option<&TupleField<'a>> {
        self.fields.get(n)
    }

    pub fn fields(&self) -> &[TupleField<'a>] {
        &self.fields
    }
}

/// Owned encoded field bytes that a tuple can borrow from
///
/// Collects sign-adjusted integers and IEEE values so tests and callers can
/// build typed keys without hand-encoding them.
#[derive(Debug, Clone, Default)]
pub struct FieldBuf(Vec<u8>);

impl FieldBuf {
    pub fn int(value: i64, len: usize, unsigned: bool) -> Self {
        let mut out = Vec::with_capacity(len);
        write_int(&mut out, value, len, unsigned);
        Self(out)
    }

    pub fn float(value: f32) -> Self {
        let mut out = Vec::with_capacity(4);
        write_float(&mut out, value);
        Self(out)
    }

    pub fn double(value: f64) -> Self {
        let mut out = Vec::with_capacity(8);
        write_double(&mut out, value);
        Self(out)
    }

    pub fn bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn datum(&self) -> Datum<'_> {
        Datum::new(&self.0)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}
