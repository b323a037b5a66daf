//! Total order between search tuples and physical records.
//!
//! The free functions take the collation resolver explicitly. [`Comparator`]
//! bundles a resolver with the configured policies for callers that compare
//! many records against the same setup.

mod cols;
mod data;
mod rec;
mod tuple;

use std::cmp::Ordering;
use std::sync::Arc;

pub use cols::columns_compatible;
pub use data::{compare_binary, compare_data, compare_decimal};
pub use rec::{compare_records, compare_records_unique};
pub use tuple::{compare_tuple, compare_tuple_prefix, compare_tuple_rec, tuple_is_prefix_of};

use crate::collation::{CollationRegistry, CollationResolver, GLOBAL_COLLATIONS};
use crate::constant::InfoBits;
use crate::dict::{Column, Index};
use crate::dtype::DataType;
use crate::error::{Error, Result, eyre};
use crate::handler::DuplicateSink;
use crate::opts::{Opts, StatsMethod};
use crate::record::{RecField, RecordFields};
use crate::tuple::{Datum, Tuple};

/// Order decided by the minimum record marker alone
///
/// Exactly one side carrying the marker makes it the smaller one. Both or
/// neither leave the decision to the fields.
fn min_rec_order(left: InfoBits, right: InfoBits) -> Option<Ordering> {
    match (
        left.contains(InfoBits::MIN_REC),
        right.contains(InfoBits::MIN_REC),
    ) {
        (true, false) => Some(Ordering::Less),
        (false, true) => Some(Ordering::Greater),
        _ => None,
    }
}

/// Field `n` of `rec`, which must exist and be stored locally
fn fetch_field<R>(rec: &R, n: usize) -> Result<RecField<'_>>
where
    R: RecordFields + ?Sized,
{
    let Some(field) = rec.field(n) else {
        let n_fields = rec.n_fields();
        tracing::error!(field = n, n_fields, "field out of range");
        return Err(Error::FieldOutOfRange { field: n, n_fields });
    };
    if field.external {
        tracing::error!(field = n, "externally stored field reached during comparison");
        return Err(Error::ExternalField { field: n });
    }
    Ok(field)
}

fn field_type(index: &Index, n: usize) -> Result<DataType> {
    index.field_type(n).ok_or_else(|| {
        Error::LibraryBug(eyre!(
            "index {} has {} columns, field {n} requested",
            index.name,
            index.n_fields()
        ))
    })
}

/// Compares tuples and records with a fixed collation resolver and policy
///
/// ```rs
/// let cmp = Comparator::default();
/// let ord = cmp.compare_tuple_rec(&search_key, &record)?;
///
/// let opts = Opts::try_from("innocmp://?stats_method=nulls_unequal")?;
/// let cmp = Comparator::from(&opts);
/// ```
#[derive(Debug, Clone)]
pub struct Comparator<C = Arc<CollationRegistry>> {
    collations: C,
    stats_method: StatsMethod,
    check_charsets: bool,
}

impl Default for Comparator {
    fn default() -> Self {
        Self::new(Arc::clone(&GLOBAL_COLLATIONS))
    }
}

impl From<&Opts> for Comparator {
    fn from(opts: &Opts) -> Self {
        Self {
            collations: Arc::clone(&opts.collations),
            stats_method: opts.stats_method,
            check_charsets: opts.check_charsets,
        }
    }
}

impl<C: CollationResolver> Comparator<C> {
    /// A comparator with the default policies
    pub fn new(collations: C) -> Self {
        Self {
            collations,
            stats_method: StatsMethod::default(),
            check_charsets: true,
        }
    }

    pub fn collations(&self) -> &C {
        &self.collations
    }

    pub fn stats_method(&self) -> StatsMethod {
        self.stats_method
    }

    /// See [`compare_data`]
    pub fn compare_scalar(&self, ty: &DataType, a: Datum<'_>, b: Datum<'_>) -> Result<Ordering> {
        compare_data(&self.collations, ty, a, b)
    }

    /// See [`columns_compatible`]; the charset check follows the configuration
    pub fn columns_compatible(&self, col1: &Column, col2: &Column) -> bool {
        columns_compatible(col1, col2, self.check_charsets)
    }

    /// See [`compare_tuple_prefix`]
    #[tracing::instrument(level = "trace", skip_all, fields(n_cmp = n_cmp))]
    pub fn compare_tuple_prefix<R>(
        &self,
        tuple: &Tuple<'_>,
        rec: &R,
        n_cmp: usize,
        matched_fields: &mut usize,
    ) -> Result<Ordering>
    where
        R: RecordFields + ?Sized,
    {
        let ord = compare_tuple_prefix(&self.collations, tuple, rec, n_cmp, matched_fields)?;
        tracing::trace!(?ord, matched_fields = *matched_fields);
        Ok(ord)
    }

    /// See [`compare_tuple`]
    pub fn compare_tuple<R>(
        &self,
        tuple: &Tuple<'_>,
        rec: &R,
        matched_fields: &mut usize,
    ) -> Result<Ordering>
    where
        R: RecordFields + ?Sized,
    {
        self.compare_tuple_prefix(tuple, rec, tuple.n_fields_cmp(), matched_fields)
    }

    /// See [`compare_tuple_rec`]
    pub fn compare_tuple_rec<R>(&self, tuple: &Tuple<'_>, rec: &R) -> Result<Ordering>
    where
        R: RecordFields + ?Sized,
    {
        let mut matched_fields = 0;
        self.compare_tuple(tuple, rec, &mut matched_fields)
    }

    /// See [`tuple_is_prefix_of`]
    pub fn tuple_is_prefix_of<R>(&self, tuple: &Tuple<'_>, rec: &R) -> Result<bool>
    where
        R: RecordFields + ?Sized,
    {
        tuple_is_prefix_of(&self.collations, tuple, rec)
    }

    /// See [`compare_records`]
    #[tracing::instrument(level = "trace", skip_all, fields(index = %index.name))]
    pub fn compare_records<R1, R2>(
        &self,
        rec1: &R1,
        rec2: &R2,
        index: &Index,
        nulls_unequal: bool,
        matched_fields: &mut usize,
    ) -> Result<Ordering>
    where
        R1: RecordFields + ?Sized,
        R2: RecordFields + ?Sized,
    {
        let ord = compare_records(
            &self.collations,
            rec1,
            rec2,
            index,
            nulls_unequal,
            matched_fields,
        )?;
        tracing::trace!(?ord, matched_fields = *matched_fields);
        Ok(ord)
    }

    /// [`compare_records`] with the NULL policy of the configured statistics method
    pub fn compare_records_for_stats<R1, R2>(
        &self,
        rec1: &R1,
        rec2: &R2,
        index: &Index,
        matched_fields: &mut usize,
    ) -> Result<Ordering>
    where
        R1: RecordFields + ?Sized,
        R2: RecordFields + ?Sized,
    {
        let nulls_unequal = self.stats_method.nulls_unequal();
        self.compare_records(rec1, rec2, index, nulls_unequal, matched_fields)
    }

    /// See [`compare_records_unique`]
    #[tracing::instrument(level = "trace", skip_all, fields(index = %index.name))]
    pub fn compare_records_unique(
        &self,
        rec1: &dyn RecordFields,
        rec2: &dyn RecordFields,
        index: &Index,
        sink: Option<&mut dyn DuplicateSink>,
    ) -> Result<Ordering> {
        let ord = compare_records_unique(&self.collations, rec1, rec2, index, sink)?;
        tracing::trace!(?ord);
        Ok(ord)
    }
}
