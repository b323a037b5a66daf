use std::cmp::Ordering;

use crate::cmp::data::compare_data;
use crate::cmp::{fetch_field, field_type, min_rec_order};
use crate::collation::CollationResolver;
use crate::dict::Index;
use crate::error::{Error, Result};
use crate::handler::DuplicateSink;
use crate::record::RecordFields;

/// Compare two physical records of `index`
///
/// Only the fields present in both records are compared; if they all match
/// the records are equal. `matched_fields` is set to the number of leading
/// fields found equal.
///
/// With `nulls_unequal`, two NULLs make `rec1` the smaller record. This is
/// only meant for cardinality estimation, where every NULL counts as distinct.
pub fn compare_records<C, R1, R2>(
    collations: &C,
    rec1: &R1,
    rec2: &R2,
    index: &Index,
    nulls_unequal: bool,
    matched_fields: &mut usize,
) -> Result<Ordering>
where
    C: CollationResolver + ?Sized,
    R1: RecordFields + ?Sized,
    R2: RecordFields + ?Sized,
{
    *matched_fields = 0;
    if let Some(ord) = min_rec_order(rec1.info_bits(), rec2.info_bits()) {
        return Ok(ord);
    }

    let n_fields = rec1.n_fields().min(rec2.n_fields());
    for cur_field in 0..n_fields {
        let ty = field_type(index, cur_field)?;
        let f1 = fetch_field(rec1, cur_field)?;
        let f2 = fetch_field(rec2, cur_field)?;

        let ord = if nulls_unequal && f1.data.is_null() && f2.data.is_null() {
            Ordering::Less
        } else {
            compare_data(collations, &ty, f1.data, f2.data)?
        };
        if ord.is_ne() {
            *matched_fields = cur_field;
            return Ok(ord);
        }
    }

    *matched_fields = n_fields;
    Ok(Ordering::Equal)
}

/// Compare two records of the same length while inserting into `index`
///
/// When the unique columns match and none of them is NULL, the index is
/// unique and a sink is given, `rec1` is reported as a duplicate and the
/// records are considered equal. Otherwise the remaining columns decide; two
/// entries equal in every column mean the index is corrupt.
pub fn compare_records_unique<C>(
    collations: &C,
    rec1: &dyn RecordFields,
    rec2: &dyn RecordFields,
    index: &Index,
    sink: Option<&mut dyn DuplicateSink>,
) -> Result<Ordering>
where
    C: CollationResolver + ?Sized,
{
    let mut null_eq = false;
    for cur_field in 0..index.n_unique {
        let ty = field_type(index, cur_field)?;
        let f1 = fetch_field(rec1, cur_field)?;
        let f2 = fetch_field(rec2, cur_field)?;
        if f1.data.is_null() && f2.data.is_null() {
            null_eq = true;
            continue;
        }

        let ord = compare_data(collations, &ty, f1.data, f2.data)?;
        if ord.is_ne() {
            return Ok(ord);
        }
    }

    if !null_eq && index.is_unique() {
        if let Some(sink) = sink {
            sink.report_duplicate(index, rec1);
            return Ok(Ordering::Equal);
        }
    }

    for cur_field in index.n_unique..index.n_fields() {
        let ty = field_type(index, cur_field)?;
        let f1 = fetch_field(rec1, cur_field)?;
        let f2 = fetch_field(rec2, cur_field)?;

        let ord = compare_data(collations, &ty, f1.data, f2.data)?;
        if ord.is_ne() {
            return Ok(ord);
        }
    }

    tracing::error!(index = %index.name, "two index entries are equal in every column");
    Err(Error::DuplicateEntries {
        index: index.name.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collation::CollationRegistry;
    use crate::constant::{IndexFlags, InfoBits, PrtypeFlags, UTF8MB4_GENERAL_CI};
    use crate::dict::Column;
    use crate::dtype::DataType;
    use crate::handler::{DuplicateCollector, DuplicateCounter};
    use crate::record::{OwnedRecord, RecordBuilder};
    use crate::tuple::FieldBuf;

    /// `(a INT, b VARCHAR)` with a unique key on `a`, plus the row id
    fn index(flags: IndexFlags) -> Index {
        Index::new(
            "uk_a",
            vec![
                Column::new("a", DataType::int(PrtypeFlags::empty()), 4),
                Column::new("b", DataType::varchar(UTF8MB4_GENERAL_CI), 40),
            ],
            1,
            flags,
        )
    }

    fn rec(a: Option<i64>, b: &[u8]) -> OwnedRecord {
        let builder = match a {
            Some(a) => RecordBuilder::new().push(FieldBuf::int(a, 4, false).as_bytes()),
            None => RecordBuilder::new().push_null(),
        };
        builder.push(b).build().unwrap()
    }

    #[test]
    fn test_compare_records_counts_matched_fields() {
        let registry = CollationRegistry::with_builtins();
        let index = index(IndexFlags::empty());
        let mut matched = 0;

        let ord = compare_records(
            &registry,
            &rec(Some(5), b"foo"),
            &rec(Some(5), b"bar"),
            &index,
            false,
            &mut matched,
        )
        .unwrap();
        assert_eq!((ord, matched), (Ordering::Greater, 1));

        let ord = compare_records(
            &registry,
            &rec(Some(-5), b"foo"),
            &rec(Some(5), b"foo"),
            &index,
            false,
            &mut matched,
        )
        .unwrap();
        assert_eq!((ord, matched), (Ordering::Less, 0));

        // case-insensitive collation
        let ord = compare_records(
            &registry,
            &rec(Some(5), b"FOO"),
            &rec(Some(5), b"foo  "),
            &index,
            false,
            &mut matched,
        )
        .unwrap();
        assert_eq!((ord, matched), (Ordering::Equal, 2));
    }

    #[test]
    fn test_compare_records_stops_at_shorter_record() {
        let registry = CollationRegistry::with_builtins();
        let index = index(IndexFlags::empty());
        let short = RecordBuilder::new()
            .push(FieldBuf::int(5, 4, false).as_bytes())
            .build()
            .unwrap();
        let mut matched = 0;
        let ord =
            compare_records(&registry, &short, &rec(Some(5), b"x"), &index, false, &mut matched)
                .unwrap();
        assert_eq!((ord, matched), (Ordering::Equal, 1));
    }

    #[test]
    fn test_nulls_unequal() {
        let registry = CollationRegistry::with_builtins();
        let index = index(IndexFlags::empty());
        let (r1, r2) = (rec(None, b"a"), rec(None, b"a"));
        let mut matched = 0;

        let ord = compare_records(&registry, &r1, &r2, &index, false, &mut matched).unwrap();
        assert_eq!((ord, matched), (Ordering::Equal, 2));

        let ord = compare_records(&registry, &r1, &r2, &index, true, &mut matched).unwrap();
        assert_eq!((ord, matched), (Ordering::Less, 0));
        let ord = compare_records(&registry, &r2, &r1, &index, true, &mut matched).unwrap();
        assert_eq!(ord, Ordering::Less);
    }

    #[test]
    fn test_min_rec_is_symmetric() {
        let registry = CollationRegistry::with_builtins();
        let index = index(IndexFlags::empty());
        let min = RecordBuilder::new()
            .info_bits(InfoBits::MIN_REC)
            .push(FieldBuf::int(100, 4, false).as_bytes())
            .push(b"z")
            .build()
            .unwrap();
        let other = rec(Some(1), b"a");
        let mut matched = 7;

        let ord = compare_records(&registry, &min, &other, &index, false, &mut matched).unwrap();
        assert_eq!((ord, matched), (Ordering::Less, 0));
        let ord = compare_records(&registry, &other, &min, &index, false, &mut matched).unwrap();
        assert_eq!(ord, Ordering::Greater);
        let ord = compare_records(&registry, &min, &min, &index, false, &mut matched).unwrap();
        assert_eq!((ord, matched), (Ordering::Equal, 2));
    }

    #[test]
    fn test_universal_index_ignores_column_types() {
        let registry = CollationRegistry::with_builtins();
        let universal = index(IndexFlags::UNIVERSAL);
        let typed = index(IndexFlags::empty());
        let (r1, r2) = (rec(Some(5), b"Foo"), rec(Some(5), b"foo"));
        let mut matched = 0;

        let ord = compare_records(&registry, &r1, &r2, &typed, false, &mut matched).unwrap();
        assert_eq!(ord, Ordering::Equal);
        let ord = compare_records(&registry, &r1, &r2, &universal, false, &mut matched).unwrap();
        assert_eq!((ord, matched), (Ordering::Less, 1));
    }

    #[test]
    fn test_unique_reports_duplicate() {
        let registry = CollationRegistry::with_builtins();
        let index = index(IndexFlags::UNIQUE);
        let (r1, r2) = (rec(Some(5), b"foo"), rec(Some(5), b"bar"));

        let mut collector = DuplicateCollector::new();
        let ord =
            compare_records_unique(&registry, &r1, &r2, &index, Some(&mut collector)).unwrap();
        assert_eq!(ord, Ordering::Equal);
        assert_eq!(collector.count(), 1);
        assert_eq!(collector.first().unwrap().key, vec![Some(vec![0x80, 0, 0, 5])]);

        // without a sink the rest of the columns decide
        let ord = compare_records_unique(&registry, &r1, &r2, &index, None).unwrap();
        assert_eq!(ord, Ordering::Greater);
    }

    #[test]
    fn test_unique_null_key_is_never_duplicate() {
        let registry = CollationRegistry::with_builtins();
        let index = index(IndexFlags::UNIQUE);
        let mut counter = DuplicateCounter::default();

        let ord = compare_records_unique(
            &registry,
            &rec(None, b"a"),
            &rec(None, b"b"),
            &index,
            Some(&mut counter),
        )
        .unwrap();
        assert_eq!(ord, Ordering::Less);
        assert_eq!(counter.count(), 0);
    }

    #[test]
    fn test_non_unique_index_keeps_comparing() {
        let registry = CollationRegistry::with_builtins();
        let index = index(IndexFlags::empty());
        let mut counter = DuplicateCounter::default();
        let ord = compare_records_unique(
            &registry,
            &rec(Some(1), b"b"),
            &rec(Some(1), b"a"),
            &index,
            Some(&mut counter),
        )
        .unwrap();
        assert_eq!(ord, Ordering::Greater);
        assert_eq!(counter.count(), 0);
    }

    #[test]
    fn test_identical_entries_are_fatal() {
        let registry = CollationRegistry::with_builtins();
        let index = index(IndexFlags::empty());
        let r = rec(None, b"same");
        let result = compare_records_unique(&registry, &r, &r, &index, None);
        assert!(matches!(result, Err(Error::DuplicateEntries { index }) if index == "uk_a"));
    }
}
