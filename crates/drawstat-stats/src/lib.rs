//! Statistical utilities for lottery draw analysis.
//!
//! This crate provides the numeric kernels used by the analysis pipeline:
//!
//! - **Descriptive statistics**: minimum, maximum, mean, median, variance and standard deviation
//! - **Linear regression**: ordinary least-squares fit with Pearson's correlation coefficient
//! - **Frequency tables**: occurrence counts over discrete values
//!
//! # Modules
//!
//! - [`descriptive`]: Descriptive statistics for summarizing a numeric column
//! - [`regression`]: Two-variable least-squares regression and Pearson's r
//! - [`frequency`]: Frequency distributions over ordered keys
//!
//! # Examples
//!
//! ## Computing descriptive statistics
//!
//! ```
//! use drawstat_stats::descriptive::DescriptiveStats;
//!
//! let values = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let stats = DescriptiveStats::new(values).unwrap();
//! assert_eq!(stats.mean, 3.0);
//! ```
//!
//! ## Measuring linear correlation
//!
//! ```
//! use drawstat_stats::regression::LinearRegression;
//!
//! let xs = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let ys = [5.0, 4.0, 3.0, 2.0, 1.0];
//! let fit = LinearRegression::fit(&xs, &ys).unwrap();
//! assert!((fit.r + 1.0).abs() < 1e-9);
//! ```
//!
//! ## Counting occurrences
//!
//! ```
//! use drawstat_stats::frequency::FrequencyTable;
//!
//! let table = FrequencyTable::from_values([3, 7, 3, 3, 9]);
//! assert_eq!(table.count(&3), 3);
//! assert_eq!(table.total(), 5);
//! ```

pub mod descriptive;
pub mod frequency;
pub mod regression;
