//! Fixed-width range buckets for drawn numbers
//!
//! A number `v` falls into bucket `floor(v / width)` when `0 <= v < domain_max`.
//! Buckets are half-open, so a value on a boundary belongs to the bucket that
//! starts there. Values at or above `domain_max` have no bucket; that outcome
//! is `None`, never clamped into the last bucket.
//!
//! # Examples
//!
//! ```
//! use drawstat_analysis::bucket::{range_bucket, BucketSpec};
//!
//! assert_eq!(range_bucket(9, 10, 100), Some(0));
//! assert_eq!(range_bucket(10, 10, 100), Some(1));
//! assert_eq!(range_bucket(100, 10, 100), None);
//!
//! let spec = BucketSpec::default();
//! assert_eq!(spec.bucket(42), Some(4));
//! ```

use serde::{Deserialize, Serialize};

pub const DEFAULT_BUCKET_WIDTH: u32 = 10;
pub const DEFAULT_DOMAIN_MAX: u32 = 100;

/// Bucket index of `value`, or `None` if it lies outside `[0, domain_max)`.
#[must_use]
pub fn range_bucket(value: u32, bucket_width: u32, domain_max: u32) -> Option<u32> {
    if bucket_width == 0 || value >= domain_max {
        return None;
    }
    Some(value / bucket_width)
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum BucketSpecError {
    #[display("bucket width must be positive")]
    ZeroWidth,
    #[display("bucket domain maximum must be positive")]
    EmptyDomain,
}

#[derive(Debug, Deserialize)]
struct BucketSpecDef {
    width: u32,
    domain_max: u32,
}

/// Bucket width and domain bound used by the enricher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "BucketSpecDef")]
pub struct BucketSpec {
    width: u32,
    domain_max: u32,
}

impl Default for BucketSpec {
    fn default() -> Self {
        Self {
            width: DEFAULT_BUCKET_WIDTH,
            domain_max: DEFAULT_DOMAIN_MAX,
        }
    }
}

impl BucketSpec {
    pub fn new(width: u32, domain_max: u32) -> Result<Self, BucketSpecError> {
        if width == 0 {
            return Err(BucketSpecError::ZeroWidth);
        }
        if domain_max == 0 {
            return Err(BucketSpecError::EmptyDomain);
        }
        Ok(Self { width, domain_max })
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn domain_max(&self) -> u32 {
        self.domain_max
    }

    /// Number of buckets covering `[0, domain_max)`; the last may be narrower.
    #[must_use]
    pub fn bucket_count(&self) -> u32 {
        self.domain_max.div_ceil(self.width)
    }

    #[must_use]
    pub fn bucket(&self, value: u32) -> Option<u32> {
        range_bucket(value, self.width, self.domain_max)
    }
}

impl TryFrom<BucketSpecDef> for BucketSpec {
    type Error = BucketSpecError;

    fn try_from(def: BucketSpecDef) -> Result<Self, Self::Error> {
        Self::new(def.width, def.domain_max)
    }
}
