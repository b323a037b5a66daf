use std::cmp::Ordering;

use crate::cmp::data::compare_data;
use crate::cmp::{fetch_field, min_rec_order};
use crate::collation::CollationResolver;
use crate::error::{Error, Result, eyre};
use crate::record::RecordFields;
use crate::tuple::Tuple;

/// Compare the first `n_cmp` fields of `tuple` with `rec`
///
/// `matched_fields` holds the number of leading fields already known to be
/// equal; comparison resumes there, and on return it holds the number of
/// leading fields found equal. `rec` must either differ from `tuple` within the
/// compared fields or have at least `n_cmp` fields.
///
/// Returns the order of `tuple` relative to `rec`.
pub fn compare_tuple_prefix<C, R>(
    collations: &C,
    tuple: &Tuple<'_>,
    rec: &R,
    n_cmp: usize,
    matched_fields: &mut usize,
) -> Result<Ordering>
where
    C: CollationResolver + ?Sized,
    R: RecordFields + ?Sized,
{
    if n_cmp == 0 || n_cmp > tuple.n_fields() {
        return Err(Error::LibraryBug(eyre!(
            "comparing {n_cmp} fields of a tuple with {} fields",
            tuple.n_fields()
        )));
    }
    let start = *matched_fields;
    if start > n_cmp {
        return Err(Error::LibraryBug(eyre!(
            "{start} fields already matched, only {n_cmp} compared"
        )));
    }

    if start == 0 {
        if let Some(ord) = min_rec_order(tuple.info_bits(), rec.info_bits()) {
            return Ok(ord);
        }
    }

    for (cur_field, field) in tuple.fields()[..n_cmp].iter().enumerate().skip(start) {
        // Only clustered index leaf records store fields externally, and their
        // primary key prefix differs before any such field is reached.
        let rec_field = fetch_field(rec, cur_field)?;
        let ord = compare_data(collations, &field.dtype, field.data, rec_field.data)?;
        if ord.is_ne() {
            *matched_fields = cur_field;
            return Ok(ord);
        }
    }

    *matched_fields = n_cmp;
    Ok(Ordering::Equal)
}

/// Compare the `n_fields_cmp` leading fields of `tuple` with `rec`
pub fn compare_tuple<C, R>(
    collations: &C,
    tuple: &Tuple<'_>,
    rec: &R,
    matched_fields: &mut usize,
) -> Result<Ordering>
where
    C: CollationResolver + ?Sized,
    R: RecordFields + ?Sized,
{
    compare_tuple_prefix(collations, tuple, rec, tuple.n_fields_cmp(), matched_fields)
}

/// [`compare_tuple`] without a known matched prefix
pub fn compare_tuple_rec<C, R>(collations: &C, tuple: &Tuple<'_>, rec: &R) -> Result<Ordering>
where
    C: CollationResolver + ?Sized,
    R: RecordFields + ?Sized,
{
    let mut matched_fields = 0;
    compare_tuple(collations, tuple, rec, &mut matched_fields)
}

/// Whether every field of `tuple` equals the corresponding leading field of `rec`
pub fn tuple_is_prefix_of<C, R>(collations: &C, tuple: &Tuple<'_>, rec: &R) -> Result<bool>
where
    C: CollationResolver + ?Sized,
    R: RecordFields + ?Sized,
{
    let n_fields = tuple.n_fields();
    if n_fields > rec.n_fields() {
        return Ok(false);
    }
    if n_fields == 0 {
        return Ok(true);
    }

    let mut matched_fields = 0;
    compare_tuple_prefix(collations, tuple, rec, n_fields, &mut matched_fields)?;
    Ok(matched_fields == n_fields)
}
