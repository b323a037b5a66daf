use std::str::FromStr;
use std::sync::Arc;

use smart_default::SmartDefault;

use crate::collation::{CollationRegistry, GLOBAL_COLLATIONS};
use crate::error::Error;

/// How NULLs are treated when estimating index cardinality
///
/// Mirrors the `innodb_stats_method` server variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatsMethod {
    /// All NULLs in a column form one group
    #[default]
    NullsEqual,
    /// Every NULL is its own group
    NullsUnequal,
    /// NULLs are left out of the estimate
    NullsIgnored,
}

impl StatsMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NullsEqual => "nulls_equal",
            Self::NullsUnequal => "nulls_unequal",
            Self::NullsIgnored => "nulls_ignored",
        }
    }

    /// Whether two NULLs should count as different values
    ///
    /// Ignored NULLs are skipped by the caller, so they never need to be equal.
    pub fn nulls_unequal(&self) -> bool {
        !matches!(self, Self::NullsEqual)
    }
}

impl TryFrom<&str> for StatsMethod {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "nulls_equal" => Ok(Self::NullsEqual),
            "nulls_unequal" => Ok(Self::NullsUnequal),
            "nulls_ignored" => Ok(Self::NullsIgnored),
            _ => Err(Error::BadConfigError(format!(
                "Invalid stats_method '{value}', expected nulls_equal, nulls_unequal or nulls_ignored"
            ))),
        }
    }
}

impl FromStr for StatsMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s)
    }
}

/// A configuration for comparators
///
/// ```rs
/// let mut opts1 = Opts::default();
/// opts1.check_charsets = false;
///
/// let opts2 = Opts::try_from("innocmp://?stats_method=nulls_unequal&check_charsets=false")?;
/// let cmp = Comparator::from(&opts2);
/// ```
#[derive(Debug, Clone, SmartDefault)]
pub struct Opts {
    /// NULL policy of `Comparator::compare_records_for_stats`
    pub stats_method: StatsMethod,

    /// Require non-binary string columns to share a collation to be compatible
    #[default(true)]
    pub check_charsets: bool,

    #[default(Arc::clone(&GLOBAL_COLLATIONS))]
    pub collations: Arc<CollationRegistry>,
}

impl TryFrom<&str> for Opts {
    type Error = Error;

    fn try_from(url: &str) -> Result<Self, Self::Error> {
        let parsed = url::Url::parse(url)
            .map_err(|e| Error::BadConfigError(format!("Failed to parse URL: {}", e)))?;

        if parsed.scheme() != "innocmp" {
            return Err(Error::BadConfigError(format!(
                "Invalid URL scheme '{}', expected 'innocmp'",
                parsed.scheme()
            )));
        }

        let mut opts = Self::default();
        for (key, value) in parsed.query_pairs() {
            match key.as_ref() {
                "stats_method" => opts.stats_method = value.parse()?,
                "check_charsets" => {
                    opts.check_charsets = value.parse().map_err(|e| {
                        Error::BadConfigError(format!("Invalid check_charsets '{value}': {e}"))
                    })?;
                }
                _ => {
                    return Err(Error::BadConfigError(format!(
                        "Unknown option '{key}'"
                    )));
                }
            }
        }
        Ok(opts)
    }
}
