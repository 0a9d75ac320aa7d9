//! airwave_core
//!
//! Client-side aggregation for the Airwave dashboards. Raw upstream rows go
//! in, chart-shaped tables come out:
//!
//! - **Aggregator**: multi-valued category explosion and day bucketing
//! - **Top-N selector**: stable ranking by all-time total, zero-filled rows
//! - **Group partitioner**: one independently ranked series per group key
//! - **Distributions**: percentage-of-total entries for demographic rows
//!
//! Every function here is pure over its inputs; only [`fetch`] touches the
//! upstream, and only through the [`UpstreamSource`] trait.
//!
//! # Example
//!
//! ```rust
//! use std::num::NonZeroUsize;
//! use airwave_core::{aggregate, select_top_n, sort_by_date, RawEvent};
//!
//! let events = vec![
//!     RawEvent::new("2024-01-01T00:00:00Z", ["X", "Y"], "g1"),
//!     RawEvent::new("2024-01-02T00:00:00Z", ["Y"], "g1"),
//! ];
//! let rows = sort_by_date(select_top_n(&aggregate(&events), NonZeroUsize::new(1).unwrap()));
//! assert_eq!(rows[0].count("Y"), 1);
//! assert_eq!(rows[1].count("Y"), 1);
//! ```

pub mod aggregate;
pub mod demographics;
pub mod distribution;
pub mod error;
pub mod event;
pub mod fetch;
pub mod order;
pub mod partition;
pub mod rank;
pub mod rows;
pub mod venue;

pub use aggregate::{aggregate, explode};
pub use demographics::{DemographicKeys, DemographicSummary};
pub use distribution::{percentages_of, round_half_up, DistributionEntry};
pub use error::{DistributionError, PipelineError, Result, UpstreamError};
pub use event::{RawEvent, Record, Timestamp};
pub use fetch::{fetch_all, FetchRequest, UpstreamSource};
pub use order::sort_by_date;
pub use partition::{partition_by_group, ranked_series, summarize_airplay};
pub use rank::{ranked_categories, select_top_n};
pub use rows::{heatmap_cells, AirplaySummary, Dated, DayBucketRow, HeatmapCell, RankedRow, SeriesGroup};
pub use venue::CapacityTier;
