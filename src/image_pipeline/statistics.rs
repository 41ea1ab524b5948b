//! Cluster statistics module
//!
//! Summarizes a density image per segmentation class: pixel count, physical
//! area and mean density of every cluster index.

mod aggregator;
pub mod types;

pub use aggregator::{ClusterAggregator, LabelImage, aggregate};
pub use types::{ClusterReport, ClusterStatistic};
