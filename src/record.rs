//! Field access for physical records.
//!
//! Comparators never parse a record themselves: they ask a [`RecordFields`]
//! implementation for field `n`. This module also provides a compact reference
//! encoding with a precomputed offsets array, used by the tests and by callers
//! that do not bring their own decoder.
//!
//! Layout of a reference record:
//!
//! | bytes | content |
//! |-------|---------|
//! | 1 | info bits |
//! | 2 | number of fields, little-endian |
//! | 2 × n | end offset of each field relative to the data area, little-endian; bit 15 = SQL NULL, bit 14 = stored externally |
//! | ... | field data |

use auto_impl::auto_impl;
use zerocopy::byteorder::little_endian::U16 as U16LE;
use zerocopy::{FromBytes, Immutable, KnownLayout};

use crate::constant::InfoBits;
use crate::error::{Error, Result};
use crate::tuple::Datum;

/// End offset flag: the field is SQL NULL
pub const OFFS_SQL_NULL: u16 = 0x8000;

/// End offset flag: the field is stored off-page
pub const OFFS_EXTERNAL: u16 = 0x4000;

const OFFS_MASK: u16 = 0x3FFF;

/// Largest data area a reference record can address
pub const MAX_DATA_LEN: usize = OFFS_MASK as usize;

/// One decoded field of a physical record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecField<'a> {
    pub data: Datum<'a>,
    /// The payload lives off-page; `data` holds only the local prefix
    pub external: bool,
}

/// Access to the fields of a physical record through its offsets array
#[auto_impl(&, Box)]
pub trait RecordFields {
    fn n_fields(&self) -> usize;

    fn info_bits(&self) -> InfoBits;

    /// Field `n`, or `None` past the last field
    fn field(&self, n: usize) -> Option<RecField<'_>>;
}

#[repr(C, packed)]
#[derive(Debug, Clone, Copy, FromBytes, KnownLayout, Immutable)]
struct RecordHeader {
    info_bits: u8,
    n_fields: U16LE,
}

const HEADER_LEN: usize = size_of::<RecordHeader>();

/// Decoded end offsets of a reference record, the `rec_get_offsets` of this format
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordOffsets {
    info_bits: InfoBits,
    /// Raw end offsets including the flag bits
    ends: Vec<u16>,
    data_start: usize,
}

impl RecordOffsets {
    /// Validate the header and offsets of `rec`
    pub fn new(rec: &[u8]) -> Result<Self> {
        let (header, rest) = RecordHeader::ref_from_prefix(rec).map_err(|_| {
            Error::CorruptRecord(format!("header needs {HEADER_LEN} bytes, got {}", rec.len()))
        })?;
        let n_fields = usize::from(header.n_fields.get());
        let info_bits = InfoBits::from_bits(header.info_bits).ok_or_else(|| {
            Error::CorruptRecord(format!("unknown info bits 0x{:02X}", header.info_bits))
        })?;

        let (raw_ends, data) =
            <[U16LE]>::ref_from_prefix_with_elems(rest, n_fields).map_err(|_| {
                Error::CorruptRecord(format!("offsets array of {n_fields} fields truncated"))
            })?;

        let mut ends = Vec::with_capacity(n_fields);
        let mut prev = 0u16;
        for (n, raw) in raw_ends.iter().enumerate() {
            let raw = raw.get();
            let end = raw & OFFS_MASK;
            if end < prev {
                return Err(Error::CorruptRecord(format!(
                    "field {n} ends at {end} before the previous field end {prev}"
                )));
            }
            if raw & OFFS_SQL_NULL != 0 && (end != prev || raw & OFFS_EXTERNAL != 0) {
                return Err(Error::CorruptRecord(format!("NULL field {n} has a payload")));
            }
            prev = end;
            ends.push(raw);
        }
        if usize::from(prev) > data.len() {
            return Err(Error::CorruptRecord(format!(
                "data area of {} bytes, offsets need {prev}",
                data.len()
            )));
        }

        Ok(Self {
            info_bits,
            ends,
            data_start: HEADER_LEN + n_fields * size_of::<U16LE>(),
        })
    }

    pub fn n_fields(&self) -> usize {
        self.ends.len()
    }

    pub fn info_bits(&self) -> InfoBits {
        self.info_bits
    }

    pub fn is_null(&self, n: usize) -> bool {
        self.ends.get(n).is_some_and(|raw| raw & OFFS_SQL_NULL != 0)
    }

    pub fn is_external(&self, n: usize) -> bool {
        self.ends.get(n).is_some_and(|raw| raw & OFFS_EXTERNAL != 0)
    }

    /// Byte range of field `n` within the record, or `None` for NULL
    fn range(&self, n: usize) -> Option<std::ops::Range<usize>> {
        let raw = *self.ends.get(n)?;
        if raw & OFFS_SQL_NULL != 0 {
            return None;
        }
        let start = match n {
            0 => 0,
            _ => usize::from(self.ends[n - 1] & OFFS_MASK),
        };
        let end = usize::from(raw & OFFS_MASK);
        Some(self.data_start + start..self.data_start + end)
    }

    /// Field `n` of `rec`, which must be the record these offsets were computed from
    pub fn field<'a>(&self, rec: &'a [u8], n: usize) -> Option<RecField<'a>> {
        if n >= self.n_fields() {
            return None;
        }
        let data = match self.range(n) {
            Some(range) => Datum::new(rec.get(range)?),
            None => Datum::NULL,
        };
        Some(RecField {
            data,
            external: self.is_external(n),
        })
    }
}

/// A reference record together with its offsets
#[derive(Debug, Clone, Copy)]
pub struct PhysicalRecord<'a> {
    bytes: &'a [u8],
    offsets: &'a RecordOffsets,
}

impl<'a> PhysicalRecord<'a> {
    /// Pair `bytes` with offsets computed from the same bytes by [`RecordOffsets::new`]
    pub fn new(bytes: &'a [u8], offsets: &'a RecordOffsets) -> Self {
        Self { bytes, offsets }
    }

    pub fn offsets(&self) -> &'a RecordOffsets {
        self.offsets
    }
}

impl RecordFields for PhysicalRecord<'_> {
    fn n_fields(&self) -> usize {
        self.offsets.n_fields()
    }

    fn info_bits(&self) -> InfoBits {
        self.offsets.info_bits()
    }

    fn field(&self, n: usize) -> Option<RecField<'_>> {
        self.offsets.field(self.bytes, n)
    }
}

/// An encoded reference record that owns its bytes and offsets
#[derive(Debug, Clone)]
pub struct OwnedRecord {
    bytes: Vec<u8>,
    offsets: RecordOffsets,
}

impl OwnedRecord {
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        let offsets = RecordOffsets::new(&bytes)?;
        Ok(Self { bytes, offsets })
    }

    pub fn as_record(&self) -> PhysicalRecord<'_> {
        PhysicalRecord::new(&self.bytes, &self.offsets)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl RecordFields for OwnedRecord {
    fn n_fields(&self) -> usize {
        self.offsets.n_fields()
    }

    fn info_bits(&self) -> InfoBits {
        self.offsets.info_bits()
    }

    fn field(&self, n: usize) -> Option<RecField<'_>> {
        self.offsets.field(&self.bytes, n)
    }
}

/// Encodes reference records field by field
#[derive(Debug, Clone, Default)]
pub struct RecordBuilder {
    info_bits: InfoBits,
    ends: Vec<u16>,
    data: Vec<u8>,
}

impl RecordBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn info_bits(mut self, info_bits: InfoBits) -> Self {
        self.info_bits = info_bits;
        self
    }

    pub fn push(mut self, bytes: &[u8]) -> Self {
        self.data.extend_from_slice(bytes);
        self.ends.push(self.data_end());
        self
    }

    pub fn push_null(mut self) -> Self {
        let end = self.data_end();
        self.ends.push(end | OFFS_SQL_NULL);
        self
    }

    /// Append a field whose payload is stored off-page; `local` is the in-record prefix
    pub fn push_external(mut self, local: &[u8]) -> Self {
        self.data.extend_from_slice(local);
        let end = self.data_end();
        self.ends.push(end | OFFS_EXTERNAL);
        self
    }

    pub fn push_datum(self, datum: Datum<'_>) -> Self {
        match datum.bytes() {
            Some(bytes) => self.push(bytes),
            None => self.push_null(),
        }
    }

    /// Clamped so an oversized record fails validation instead of wrapping
    fn data_end(&self) -> u16 {
        u16::try_from(self.data.len().min(MAX_DATA_LEN + 1)).unwrap_or(u16::MAX)
    }

    pub fn build(self) -> Result<OwnedRecord> {
        if self.data.len() > MAX_DATA_LEN {
            return Err(Error::CorruptRecord(format!(
                "record data of {} bytes exceeds {MAX_DATA_LEN}",
                self.data.len()
            )));
        }
        let n_fields = u16::try_from(self.ends.len())
            .map_err(|_| Error::CorruptRecord(format!("{} fields", self.ends.len())))?;
        let mut bytes =
            Vec::with_capacity(HEADER_LEN + self.ends.len() * size_of::<u16>() + self.data.len());
        bytes.push(self.info_bits.bits());
        bytes.extend_from_slice(&n_fields.to_le_bytes());
        for end in &self.ends {
            bytes.extend_from_slice(&end.to_le_bytes());
        }
        bytes.extend_from_slice(&self.data);
        OwnedRecord::from_bytes(bytes)
    }
}
