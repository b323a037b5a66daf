use auto_impl::auto_impl;

use crate::dict::Index;
use crate::record::RecordFields;

/// Receives duplicate keys found by `compare_records_unique`
///
/// A duplicate is an expected outcome, not a comparison failure: the sink is
/// where it gets surfaced as a duplicate-key error to the user.
#[auto_impl(&mut, Box)]
pub trait DuplicateSink {
    /// `rec` is equal to another entry of `index` in every unique column, none of them NULL
    fn report_duplicate(&mut self, index: &Index, rec: &dyn RecordFields);
}

/// A duplicate key captured by [`DuplicateCollector`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateKey {
    pub index: String,
    /// Copies of the unique columns of the offending record
    pub key: Vec<Option<Vec<u8>>>,
}

/// A sink that keeps every reported duplicate
///
/// Useful for bulk index builds that report all violations after the sort.
#[derive(Debug, Default)]
pub struct DuplicateCollector {
    duplicates: Vec<DuplicateKey>,
}

impl DuplicateCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of duplicates reported so far
    pub fn count(&self) -> usize {
        self.duplicates.len()
    }

    pub fn duplicates(&self) -> &[DuplicateKey] {
        &self.duplicates
    }

    pub fn first(&self) -> Option<&DuplicateKey> {
        self.duplicates.first()
    }
}

impl DuplicateSink for DuplicateCollector {
    fn report_duplicate(&mut self, index: &Index, rec: &dyn RecordFields) {
        let n_unique = index.n_unique.min(rec.n_fields());
        let key = (0..n_unique)
            .map(|n| {
                rec.field(n)
                    .and_then(|f| f.data.bytes())
                    .map(<[u8]>::to_vec)
            })
            .collect();
        tracing::debug!(index = %index.name, "duplicate key");
        self.duplicates.push(DuplicateKey {
            index: index.name.clone(),
            key,
        });
    }
}

/// A sink that only counts duplicates
#[derive(Debug, Default, Clone, Copy)]
pub struct DuplicateCounter {
    count: usize,
}

impl DuplicateCounter {
    pub fn count(&self) -> usize {
        self.count
    }
}

impl DuplicateSink for DuplicateCounter {
    fn report_duplicate(&mut self, _: &Index, _: &dyn RecordFields) {
        self.count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constant::{IndexFlags, PrtypeFlags};
    use crate::dict::Column;
    use crate::dtype::DataType;
    use crate::record::RecordBuilder;

    #[test]
    fn test_collector_copies_unique_prefix() {
        let index = Index::new(
            "uk",
            vec![
                Column::new("a", DataType::int(PrtypeFlags::empty()), 4),
                Column::new("b", DataType::varbinary(), 8),
            ],
            1,
            IndexFlags::UNIQUE,
        );
        let rec = RecordBuilder::new().push(b"k").push(b"v").build().unwrap();

        let mut collector = DuplicateCollector::new();
        collector.report_duplicate(&index, &rec);
        assert_eq!(collector.count(), 1);
        assert_eq!(
            collector.first(),
            Some(&DuplicateKey {
                index: "uk".to_string(),
                key: vec![Some(b"k".to_vec())],
            })
        );

        let mut counter = DuplicateCounter::default();
        {
            let sink: &mut dyn DuplicateSink = &mut counter;
            sink.report_duplicate(&index, &rec);
        }
        assert_eq!(counter.count(), 1);
    }
}
