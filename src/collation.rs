//! Collation collaborator: resolves a charset-collation id to a comparison rule.
//!
//! The registry ships with a handful of simple collations. Locale-aware
//! collations are expected to be registered by the embedding server.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use auto_impl::auto_impl;

use crate::constant::{
    BINARY_CHARSET_COLL, LATIN1_BIN, LATIN1_SWEDISH_CI, PAD_SPACE, UTF8MB3_BIN,
    UTF8MB4_BIN, UTF8MB4_GENERAL_CI,
};

pub static GLOBAL_COLLATIONS: LazyLock<Arc<CollationRegistry>> =
    LazyLock::new(|| Arc::new(CollationRegistry::with_builtins()));

/// A character string ordering
pub trait Collation: Send + Sync {
    fn id(&self) -> u16;

    fn name(&self) -> &str;

    /// Compare two strings, ignoring trailing spaces where the collation pads
    fn compare_pad_space(&self, a: &[u8], b: &[u8]) -> Ordering;
}

/// Looks up collations by id
///
/// Implementations must be safe for concurrent readers.
#[auto_impl(&, Box, Arc)]
pub trait CollationResolver {
    fn resolve(&self, id: u16) -> Option<&dyn Collation>;
}

/// Compare two weight sequences, extending the shorter one with spaces
///
/// `weight` maps a byte to its sort weight; the pad is weighed the same way.
pub fn compare_pad_space_by(a: &[u8], b: &[u8], weight: impl Fn(u8) -> u8) -> Ordering {
    let common = a.len().min(b.len());
    for (x, y) in a[..common].iter().zip(&b[..common]) {
        match weight(*x).cmp(&weight(*y)) {
            Ordering::Equal => {}
            ord => return ord,
        }
    }
    let pad = weight(PAD_SPACE);
    if a.len() > common {
        for x in &a[common..] {
            match weight(*x).cmp(&pad) {
                Ordering::Equal => {}
                ord => return ord,
            }
        }
    } else {
        for y in &b[common..] {
            match pad.cmp(&weight(*y)) {
                Ordering::Equal => {}
                ord => return ord,
            }
        }
    }
    Ordering::Equal
}

/// The `binary` collation: plain byte order, longer is greater
#[derive(Debug, Clone, Copy)]
pub struct BinaryCollation;

impl Collation for BinaryCollation {
    fn id(&self) -> u16 {
        BINARY_CHARSET_COLL
    }

    fn name(&self) -> &str {
        "binary"
    }

    fn compare_pad_space(&self, a: &[u8], b: &[u8]) -> Ordering {
        a.cmp(b)
    }
}

/// A `*_bin` collation of a pad-space charset: byte order, trailing spaces ignored
///
/// For UTF-8 charsets byte order is code point order.
#[derive(Debug, Clone)]
pub struct PadSpaceBin {
    id: u16,
    name: String,
}

impl PadSpaceBin {
    pub fn new(id: u16, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

impl Collation for PadSpaceBin {
    fn id(&self) -> u16 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn compare_pad_space(&self, a: &[u8], b: &[u8]) -> Ordering {
        compare_pad_space_by(a, b, |byte| byte)
    }
}

/// A case-insensitive pad-space collation folding ASCII letters to upper case
///
/// In a multi-byte charset the input is decoded as UTF-8 and every character
/// weighs as its simple upper-case mapping. Bytes that are not valid UTF-8
/// weigh as themselves above every character.
#[derive(Debug, Clone)]
pub struct CaseFoldCollation {
    id: u16,
    name: String,
    multibyte: bool,
}

impl CaseFoldCollation {
    pub fn new(id: u16, name: impl Into<String>, multibyte: bool) -> Self {
        Self {
            id,
            name: name.into(),
            multibyte,
        }
    }
}

impl Collation for CaseFoldCollation {
    fn id(&self) -> u16 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn compare_pad_space(&self, a: &[u8], b: &[u8]) -> Ordering {
        if self.multibyte {
            compare_weights_pad_space(Utf8Weights::new(a), Utf8Weights::new(b), fold_char(' '))
        } else {
            compare_pad_space_by(a, b, |byte| byte.to_ascii_uppercase())
        }
    }
}

/// Base weight of a malformed byte; one past the last code point
const INVALID_BYTE_WEIGHT: u32 = 0x11_0000;

fn fold_char(c: char) -> u32 {
    let mut upper = c.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(u), None) => u32::from(u),
        // multi-character expansions keep the original code point
        _ => u32::from(c),
    }
}

/// [`compare_pad_space_by`] over precomputed weight sequences
fn compare_weights_pad_space(
    mut a: impl Iterator<Item = u32>,
    mut b: impl Iterator<Item = u32>,
    pad: u32,
) -> Ordering {
    loop {
        let ord = match (a.next(), b.next()) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(x), None) => x.cmp(&pad),
            (None, Some(y)) => pad.cmp(&y),
            (None, None) => return Ordering::Equal,
        };
        if ord.is_ne() {
            return ord;
        }
    }
}

/// Case-folded weights of a possibly malformed UTF-8 string
struct Utf8Weights<'a> {
    chars: std::str::Chars<'a>,
    invalid: &'a [u8],
    rest: &'a [u8],
}

impl<'a> Utf8Weights<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self {
            chars: "".chars(),
            invalid: &[],
            rest: bytes,
        }
    }

    /// Split the next valid run and the invalid bytes after it off `rest`
    fn decode_next_run(&mut self) {
        match simdutf8::compat::from_utf8(self.rest) {
            Ok(valid) => {
                self.chars = valid.chars();
                self.rest = &[];
            }
            Err(e) => {
                let (valid, after) = self.rest.split_at(e.valid_up_to());
                let (invalid, rest) = after.split_at(e.error_len().unwrap_or(after.len()));
                // everything before `valid_up_to` is well formed
                self.chars = simdutf8::compat::from_utf8(valid)
                    .unwrap_or_default()
                    .chars();
                self.invalid = invalid;
                self.rest = rest;
            }
        }
    }
}

impl Iterator for Utf8Weights<'_> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        loop {
            if let Some(c) = self.chars.next() {
                return Some(fold_char(c));
            }
            if let Some((&byte, invalid)) = self.invalid.split_first() {
                self.invalid = invalid;
                return Some(INVALID_BYTE_WEIGHT + u32::from(byte));
            }
            if self.rest.is_empty() {
                return None;
            }
            self.decode_next_run();
        }
    }
}

/// Collations by id
#[derive(Clone, Default)]
pub struct CollationRegistry {
    collations: HashMap<u16, Arc<dyn Collation>>,
}

impl std::fmt::Debug for CollationRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut ids: Vec<_> = self.collations.keys().copied().collect();
        ids.sort_unstable();
        f.debug_struct("CollationRegistry").field("ids", &ids).finish()
    }
}

impl CollationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with `binary`, the `*_bin` collations and the ASCII case-folding ones
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(BinaryCollation));
        registry.register(Arc::new(PadSpaceBin::new(LATIN1_BIN, "latin1_bin")));
        registry.register(Arc::new(PadSpaceBin::new(UTF8MB4_BIN, "utf8mb4_bin")));
        registry.register(Arc::new(PadSpaceBin::new(UTF8MB3_BIN, "utf8mb3_bin")));
        registry.register(Arc::new(CaseFoldCollation::new(
            LATIN1_SWEDISH_CI,
            "latin1_swedish_ci",
            false,
        )));
        registry.register(Arc::new(CaseFoldCollation::new(
            UTF8MB4_GENERAL_CI,
            "utf8mb4_general_ci",
            true,
        )));
        registry
    }

    /// Add a collation, replacing any previous one with the same id
    pub fn register(&mut self, collation: Arc<dyn Collation>) -> Option<Arc<dyn Collation>> {
        self.collations.insert(collation.id(), collation)
    }

    pub fn len(&self) -> usize {
        self.collations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collations.is_empty()
    }
}

impl CollationResolver for CollationRegistry {
    fn resolve(&self, id: u16) -> Option<&dyn Collation> {
        self.collations.get(&id).map(|c| c.as_ref())
    }
}
