//! Property tests for the scalar comparator
//!
//! Every main type must give a total order over its encoded values, with
//! SQL NULL below everything and trailing pad bytes ignored where the type pads.

use std::cmp::Ordering;

use innocmp::Comparator;
use innocmp::cmp::compare_decimal;
use innocmp::constant::{LATIN1_BIN, LATIN1_SWEDISH_CI, MainType, PrtypeFlags, UTF8MB4_GENERAL_CI};
use innocmp::dtype::DataType;
use innocmp::tuple::{Datum, FieldBuf};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn cmp_bytes(ty: &DataType, a: &[u8], b: &[u8]) -> Ordering {
    Comparator::default()
        .compare_scalar(ty, Datum::new(a), Datum::new(b))
        .unwrap()
}

/// Types paired with a strategy producing valid encodings for them
fn typed_values() -> impl Strategy<Value = (DataType, Vec<Vec<u8>>)> {
    let values = |s: BoxedStrategy<Vec<u8>>| proptest::collection::vec(s, 3);

    prop_oneof![
        values(
            any::<i32>()
                .prop_map(|v| FieldBuf::int(i64::from(v), 4, false).as_bytes().to_vec())
                .boxed()
        )
        .prop_map(|v| (DataType::int(PrtypeFlags::empty()), v)),
        values(
            any::<u16>()
                .prop_map(|v| FieldBuf::int(i64::from(v), 2, true).as_bytes().to_vec())
                .boxed()
        )
        .prop_map(|v| (DataType::int(PrtypeFlags::UNSIGNED), v)),
        values(
            (-1e9_f64..1e9)
                .prop_map(|v| FieldBuf::double(v).as_bytes().to_vec())
                .boxed()
        )
        .prop_map(|v| (DataType::new(MainType::Double, 0), v)),
        values(
            (-1e6_f32..1e6)
                .prop_map(|v| FieldBuf::float(v).as_bytes().to_vec())
                .boxed()
        )
        .prop_map(|v| (DataType::new(MainType::Float, 0), v)),
        values(bytes().boxed()).prop_map(|v| (DataType::varbinary(), v)),
        values(bytes().boxed()).prop_map(|v| (DataType::blob(), v)),
        values(bytes().boxed()).prop_map(|v| (DataType::new(MainType::FixBinary, 0), v)),
        values(bytes().boxed()).prop_map(|v| (DataType::new(MainType::Char, 0), v)),
        values(bytes().boxed()).prop_map(|v| (DataType::char(LATIN1_BIN), v)),
        values(bytes().boxed()).prop_map(|v| (DataType::char(LATIN1_SWEDISH_CI), v)),
        values(utf8_text().boxed()).prop_map(|v| (DataType::varchar(UTF8MB4_GENERAL_CI), v)),
        values(utf8_text().boxed()).prop_map(|v| (DataType::text(UTF8MB4_GENERAL_CI), v)),
        values(decimal_text().boxed()).prop_map(|v| (DataType::new(MainType::Decimal, 0), v)),
    ]
}

/// Short byte strings, mostly around the pad byte
fn bytes() -> impl Strategy<Value = Vec<u8>> {
    let byte = prop_oneof![
        proptest::sample::select(b"aAbB \t".to_vec()),
        any::<u8>(),
    ];
    proptest::collection::vec(byte, 0..6)
}

/// Values of a UTF-8 column; stored bytes are not guaranteed to be well formed
fn utf8_text() -> impl Strategy<Value = Vec<u8>> {
    prop_oneof![
        "[aAbB\u{e9}\u{c9}\u{df}\t ]{0,5}".prop_map(String::into_bytes),
        any::<String>().prop_map(String::into_bytes),
        bytes(),
        // a well-formed prefix followed by stray bytes
        ("[a\u{e9}\u{c9} ]{0,3}", bytes()).prop_map(|(s, tail)| {
            let mut v = s.into_bytes();
            v.extend(tail);
            v
        }),
    ]
}

/// A decimal string with optional leading spaces, sign and zeros
fn decimal_text() -> impl Strategy<Value = Vec<u8>> {
    (any::<i16>(), 0_usize..3, 0_usize..3, any::<bool>())
        .prop_map(|(v, spaces, zeros, plus)| decimal(i64::from(v), spaces, zeros, plus))
}

fn decimal(v: i64, spaces: usize, zeros: usize, plus: bool) -> Vec<u8> {
    let sign = if v < 0 {
        "-"
    } else if plus {
        "+"
    } else {
        ""
    };
    format!(
        "{}{sign}{}{}",
        " ".repeat(spaces),
        "0".repeat(zeros),
        v.unsigned_abs()
    )
    .into_bytes()
}

proptest! {
    #[test]
    fn test_antisymmetric((ty, values) in typed_values()) {
        let (a, b) = (&values[0], &values[1]);
        prop_assert_eq!(cmp_bytes(&ty, a, b), cmp_bytes(&ty, b, a).reverse());
        prop_assert_eq!(cmp_bytes(&ty, a, a), Ordering::Equal);
    }

    #[test]
    fn test_transitive((ty, mut values) in typed_values()) {
        values.sort_by(|a, b| cmp_bytes(&ty, a, b));
        let (a, b, c) = (&values[0], &values[1], &values[2]);
        prop_assert_ne!(cmp_bytes(&ty, a, b), Ordering::Greater);
        prop_assert_ne!(cmp_bytes(&ty, b, c), Ordering::Greater);
        prop_assert_ne!(cmp_bytes(&ty, a, c), Ordering::Greater);
    }

    #[test]
    fn test_null_is_smallest((ty, values) in typed_values()) {
        let cmp = Comparator::default();
        let value = Datum::new(&values[0]);
        prop_assert_eq!(cmp.compare_scalar(&ty, Datum::NULL, value).unwrap(), Ordering::Less);
        prop_assert_eq!(cmp.compare_scalar(&ty, value, Datum::NULL).unwrap(), Ordering::Greater);
        prop_assert_eq!(cmp.compare_scalar(&ty, Datum::NULL, Datum::NULL).unwrap(), Ordering::Equal);
    }

    #[test]
    fn test_decimal_matches_numeric_order(
        x in any::<i32>(),
        y in any::<i32>(),
        (sx, zx, px) in (0_usize..3, 0_usize..4, any::<bool>()),
        (sy, zy, py) in (0_usize..3, 0_usize..4, any::<bool>()),
    ) {
        let a = decimal(i64::from(x), sx, zx, px);
        let b = decimal(i64::from(y), sy, zy, py);
        prop_assert_eq!(compare_decimal(&a, &b), x.cmp(&y));
    }

    #[test]
    fn test_trailing_spaces_ignored_when_padded(
        value in prop_oneof![bytes(), utf8_text()],
        pad in 1_usize..4,
    ) {
        let mut padded = value.clone();
        padded.resize(value.len() + pad, b' ');

        for ty in [
            DataType::new(MainType::Char, 0),
            DataType::new(MainType::FixBinary, 0),
            DataType::char(LATIN1_BIN),
            DataType::varchar(UTF8MB4_GENERAL_CI),
            DataType::text(UTF8MB4_GENERAL_CI),
        ] {
            prop_assert_eq!(cmp_bytes(&ty, &value, &padded), Ordering::Equal);
        }
        for ty in [DataType::varbinary(), DataType::blob()] {
            prop_assert_eq!(cmp_bytes(&ty, &value, &padded), Ordering::Less);
        }
    }
}

#[test]
fn test_decimal_normalization() {
    let cases: [(&[u8], &[u8], Ordering); 7] = [
        (b"-007", b"-7", Ordering::Equal),
        (b"+7", b"7", Ordering::Equal),
        (b"  12", b"12", Ordering::Equal),
        (b"-7", b"0", Ordering::Less),
        (b"0", b"7", Ordering::Less),
        (b"-12", b"-9", Ordering::Less),
        (b"100", b"99", Ordering::Greater),
    ];
    for (a, b, expected) in cases {
        assert_eq!(compare_decimal(a, b), expected, "{a:?} vs {b:?}");
    }
}

#[test]
fn test_case_insensitive_collation() {
    let ty = DataType::varchar(UTF8MB4_GENERAL_CI);
    assert_eq!(cmp_bytes(&ty, b"Foo", b"fOO  "), Ordering::Equal);
    assert_eq!(cmp_bytes(&ty, b"foo", b"bar"), Ordering::Greater);
    assert_eq!(cmp_bytes(&ty, "stra\u{df}e".as_bytes(), b"STRASSE"), Ordering::Greater);
    // control bytes sort below the implicit padding
    assert_eq!(cmp_bytes(&ty, b"a\t", b"a"), Ordering::Less);
}

#[test]
fn test_case_insensitive_collation_with_malformed_utf8() {
    let ty = DataType::varchar(UTF8MB4_GENERAL_CI);
    let (x, y, z): (&[u8], &[u8], &[u8]) =
        ("\u{e9}".as_bytes(), "\u{c9}".as_bytes(), b"\xC3\x89\xFF");
    assert_eq!(cmp_bytes(&ty, x, y), Ordering::Equal);
    assert_eq!(cmp_bytes(&ty, y, z), Ordering::Less);
    assert_eq!(cmp_bytes(&ty, x, z), Ordering::Less);
}
