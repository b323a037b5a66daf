use crate::constant::MainType;
use crate::dict::Column;

/// Whether values of `col1` and `col2` can be ordered against each other
///
/// Used when altering a table to decide if an index can be kept as is.
/// Non-binary strings need the same collation when `check_charsets` is set.
pub fn columns_compatible(col1: &Column, col2: &Column, check_charsets: bool) -> bool {
    let (t1, t2) = (&col1.dtype, &col2.dtype);

    if t1.is_non_binary_string() && t2.is_non_binary_string() {
        return !check_charsets || t1.charset_coll() == t2.charset_coll();
    }

    if t1.is_binary_string() && t2.is_binary_string() {
        return true;
    }

    if t1.mtype != t2.mtype {
        return false;
    }

    // signed integers are stored with the sign bit flipped, unsigned ones are not
    if t1.mtype == MainType::Int && t1.is_unsigned() != t2.is_unsigned() {
        return false;
    }

    t1.mtype != MainType::Int || col1.len == col2.len
}
