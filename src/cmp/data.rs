//! Comparison of two field values of the same type.
//!
//! Records sort as follows: let F be the first field where two records disagree.
//! If the fields differ at some byte position, that byte (after the collation
//! transform, for text) decides. Otherwise the fields differ only in length:
//! a paddable type extends the shorter one with its pad byte, any other type
//! considers the longer one greater. SQL NULL is smaller than every value.

use std::cmp::Ordering;

use crate::collation::{CollationResolver, compare_pad_space_by};
use crate::constant::{ColumnType, MainType};
use crate::dtype::DataType;
use crate::error::{Error, Result, eyre};
use crate::primitive::{read_double, read_float};
use crate::tuple::Datum;

/// Compare two values of type `ty`
///
/// NULL is the smallest value and equal to itself, for every type.
pub fn compare_data<C>(
    collations: &C,
    ty: &DataType,
    a: Datum<'_>,
    b: Datum<'_>,
) -> Result<Ordering>
where
    C: CollationResolver + ?Sized,
{
    let (a, b) = match (a.bytes(), b.bytes()) {
        (None, None) => return Ok(Ordering::Equal),
        (None, Some(_)) => return Ok(Ordering::Less),
        (Some(_), None) => return Ok(Ordering::Greater),
        (Some(a), Some(b)) => (a, b),
    };

    match ty.mtype {
        MainType::FixBinary
        | MainType::Binary
        | MainType::Int
        | MainType::SysChild
        | MainType::Sys => Ok(compare_binary(a, b, ty.pad_char())),
        MainType::Blob if ty.is_binary_type() => Ok(compare_binary(a, b, ty.pad_char())),
        _ => compare_whole_field(collations, ty, a, b),
    }
}

/// `memcmp` of the common prefix, then the pad rule on the longer tail
pub fn compare_binary(a: &[u8], b: &[u8], pad: Option<u8>) -> Ordering {
    let len = a.len().min(b.len());
    match a[..len].cmp(&b[..len]) {
        Ordering::Equal => {}
        ord => return ord,
    }
    if a.len() == b.len() {
        return Ordering::Equal;
    }
    let Some(pad) = pad else {
        return a.len().cmp(&b.len());
    };

    let first_difference = |tail: &[u8]| {
        tail.iter()
            .map(|byte| byte.cmp(&pad))
            .find(|ord| ord.is_ne())
            .unwrap_or(Ordering::Equal)
    };
    if a.len() > len {
        first_difference(&a[len..])
    } else {
        first_difference(&b[len..]).reverse()
    }
}

/// Types that must be compared as a whole value rather than byte by byte
fn compare_whole_field<C>(collations: &C, ty: &DataType, a: &[u8], b: &[u8]) -> Result<Ordering>
where
    C: CollationResolver + ?Sized,
{
    match ty.mtype {
        MainType::Decimal => Ok(compare_decimal(a, b)),
        MainType::Double => Ok(compare_floating(read_double(a)?, read_double(b)?)),
        MainType::Float => Ok(compare_floating(read_float(a)?, read_float(b)?)),
        // latin1 columns without a MySQL collation: binary-safe, trailing spaces ignored
        MainType::Char | MainType::VarChar => Ok(compare_pad_space_by(a, b, |byte| byte)),
        MainType::Blob if ty.is_binary_type() => {
            tracing::error!(
                prtype = ty.prtype,
                "comparing a binary BLOB using a character set collation"
            );
            Err(Error::LibraryBug(eyre!(
                "binary BLOB (prtype 0x{:08X}) routed to a collation",
                ty.prtype
            )))
        }
        MainType::Blob | MainType::VarMysql | MainType::Mysql => {
            compare_collated(collations, ty, a, b)
        }
        MainType::Geometry => Ok(Ordering::Equal),
        MainType::FixBinary
        | MainType::Binary
        | MainType::Int
        | MainType::SysChild
        | MainType::Sys => Err(Error::LibraryBug(eyre!(
            "{:?} is compared byte by byte, not as a whole field",
            ty.mtype
        ))),
    }
}

/// Delegate to the MySQL collation stored in the precise type
fn compare_collated<C>(collations: &C, ty: &DataType, a: &[u8], b: &[u8]) -> Result<Ordering>
where
    C: CollationResolver + ?Sized,
{
    debug_assert!(
        ty.mysql_type().is_some_and(ColumnType::is_collatable),
        "prtype 0x{:08X} is not a collatable MySQL type",
        ty.prtype
    );
    let id = ty.charset_coll();
    let Some(collation) = collations.resolve(id) else {
        tracing::error!(charset_coll = id, "unable to find charset-collation");
        return Err(Error::UnknownCollation(id));
    };
    Ok(collation.compare_pad_space(a, b))
}

/// Numeric comparison; NaN compares equal to every value
fn compare_floating<T: PartialOrd>(a: T, b: T) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// Compare two decimals stored as ASCII text such as `"  -0012.50"`
pub fn compare_decimal(a: &[u8], b: &[u8]) -> Ordering {
    let mut a = trim_start(a, |c| c == b' ');
    let mut b = trim_start(b, |c| c == b' ');

    let negative = match (a.first(), b.first()) {
        (Some(b'-'), Some(b'-')) => {
            a = &a[1..];
            b = &b[1..];
            true
        }
        (Some(b'-'), _) => return Ordering::Less,
        (_, Some(b'-')) => return Ordering::Greater,
        _ => false,
    };

    let a = trim_start(a, |c| c == b'+' || c == b'0');
    let b = trim_start(b, |c| c == b'+' || c == b'0');

    // without leading zeros a longer integer part is a larger magnitude
    let magnitude = a.len().cmp(&b.len()).then_with(|| a.cmp(b));
    if negative {
        magnitude.reverse()
    } else {
        magnitude
    }
}

fn trim_start(bytes: &[u8], strip: impl Fn(u8) -> bool) -> &[u8] {
    let start = bytes.iter().position(|&c| !strip(c)).unwrap_or(bytes.len());
    &bytes[start..]
}
