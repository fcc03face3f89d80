//! Frequency distributions over discrete values.
//!
//! # Examples
//!
//! ```
//! use drawstat_stats::frequency::FrequencyTable;
//!
//! let table = FrequencyTable::from_values([4, 1, 4, 2, 4, 1]);
//!
//! assert_eq!(table.count(&4), 3);
//! assert_eq!(table.count(&9), 0);
//! assert_eq!(table.relative(&1), 2.0 / 6.0);
//! assert_eq!(table.most_common(2), vec![(4, 3), (1, 2)]);
//! ```

use std::collections::BTreeMap;

/// Occurrence counts per distinct value, kept in ascending key order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable<K> {
    counts: BTreeMap<K, usize>,
    total: usize,
}

impl<K> Default for FrequencyTable<K> {
    fn default() -> Self {
        Self {
            counts: BTreeMap::new(),
            total: 0,
        }
    }
}

impl<K> FrequencyTable<K>
where
    K: Ord + Copy,
{
    #[must_use]
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = K>,
    {
        let mut table = Self::default();
        table.extend(values);
        table
    }

    /// Creates a table with every key in `keys` present at zero count.
    ///
    /// Useful when the domain is known up front and unseen values should
    /// still be reported.
    #[must_use]
    pub fn with_keys<I>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
    {
        Self {
            counts: keys.into_iter().map(|k| (k, 0)).collect(),
            total: 0,
        }
    }

    pub fn insert(&mut self, value: K) {
        *self.counts.entry(value).or_insert(0) += 1;
        self.total += 1;
    }

    #[must_use]
    pub fn count(&self, value: &K) -> usize {
        self.counts.get(value).copied().unwrap_or(0)
    }

    /// Fraction of all observations equal to `value`; `0.0` for an empty table.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn relative(&self, value: &K) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.count(value) as f64 / self.total as f64
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.total
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Iterates `(value, count)` pairs in ascending value order.
    pub fn iter(&self) -> impl Iterator<Item = (K, usize)> + '_ {
        self.counts.iter().map(|(k, c)| (*k, *c))
    }

    /// Returns up to `n` entries by descending count; equal counts keep ascending value order.
    #[must_use]
    pub fn most_common(&self, n: usize) -> Vec<(K, usize)> {
        let mut entries = self.iter().collect::<Vec<_>>();
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        entries.truncate(n);
        entries
    }
}

impl<K> Extend<K> for FrequencyTable<K>
where
    K: Ord + Copy,
{
    fn extend<I>(&mut self, values: I)
    where
        I: IntoIterator<Item = K>,
    {
        for value in values {
            self.insert(value);
        }
    }
}
