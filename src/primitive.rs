//! On-disk field encodings whose byte order is the comparison order.
//!
//! Integers are stored big-endian with the sign bit flipped for signed columns,
//! so `memcmp` sorts them numerically. Floating point values are stored as
//! little-endian IEEE 754 and must be decoded before comparing.

use crate::constant::SYS_ID_LEN;
use crate::error::{Error, Result};
use zerocopy::FromBytes;
use zerocopy::byteorder::little_endian::{F32 as F32LE, F64 as F64LE};

/// Write an integer column value of `len` bytes (1..=8)
pub fn write_int(out: &mut Vec<u8>, value: i64, len: usize, unsigned: bool) {
    debug_assert!((1..=8).contains(&len));
    let mut bits = value as u64;
    if !unsigned {
        bits ^= 1 << (len * 8 - 1);
    }
    out.extend_from_slice(&bits.to_be_bytes()[8 - len..]);
}

/// Read an integer column value written by [`write_int`]
pub fn read_int(data: &[u8], unsigned: bool) -> Result<i64> {
    let len = data.len();
    if !(1..=8).contains(&len) {
        return Err(Error::CorruptRecord(format!(
            "integer field of {len} bytes"
        )));
    }
    let mut buf = [0u8; 8];
    buf[8 - len..].copy_from_slice(data);
    let mut bits = u64::from_be_bytes(buf);
    if unsigned {
        return Ok(bits as i64);
    }
    let shift = 64 - len * 8;
    bits ^= 1 << (len * 8 - 1);
    // sign-extend from the column width
    Ok(((bits << shift) as i64) >> shift)
}

/// Write a 6-byte `DB_ROW_ID` or `DB_TRX_ID`
pub fn write_sys_id(out: &mut Vec<u8>, id: u64) {
    out.extend_from_slice(&id.to_be_bytes()[8 - SYS_ID_LEN..]);
}

pub fn write_float(out: &mut Vec<u8>, value: f32) {
    out.extend_from_slice(&value.to_le_bytes());
}

pub fn write_double(out: &mut Vec<u8>, value: f64) {
    out.extend_from_slice(&value.to_le_bytes());
}

/// Read a `FLOAT` field; only the first 4 bytes are significant
pub fn read_float(data: &[u8]) -> Result<f32> {
    let bytes = data.get(..4).ok_or_else(|| {
        Error::CorruptRecord(format!("FLOAT field of {} bytes", data.len()))
    })?;
    let value = F32LE::ref_from_bytes(bytes)
        .map_err(|_| Error::CorruptRecord("misaligned FLOAT field".to_string()))?;
    Ok(value.get())
}

/// Read a `DOUBLE` field; only the first 8 bytes are significant
pub fn read_double(data: &[u8]) -> Result<f64> {
    let bytes = data.get(..8).ok_or_else(|| {
        Error::CorruptRecord(format!("DOUBLE field of {} bytes", data.len()))
    })?;
    let value = F64LE::ref_from_bytes(bytes)
        .map_err(|_| Error::CorruptRecord("misaligned DOUBLE field".to_string()))?;
    Ok(value.get())
}
