//! Per-cluster aggregation of a density image.

use tracing::{debug, instrument};

use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::common::image::Image;
use crate::image_pipeline::common::roi::Roi;
use crate::image_pipeline::statistics::types::ClusterStatistic;

/// Segmentation output: one cluster index per pixel.
pub type LabelImage = Image<i32>;

/// Computes count, area and mean density of every cluster in `[0, cluster_count)`.
///
/// Only pixels inside `roi` (whole image when `None`) are scanned. The result
/// holds one entry per cluster index in ascending order, empty clusters
/// included; their mean density is NaN.
#[instrument(skip(labels, density), fields(width = labels.width(), height = labels.height()))]
pub fn aggregate<D>(
    labels: &LabelImage,
    density: &Image<D>,
    cluster_count: usize,
    pixel_area_mm2: f64,
    roi: Option<Roi>,
) -> Result<Vec<ClusterStatistic>>
where
    D: Copy + Into<f64>,
{
    if labels.dimensions() != density.dimensions() {
        return Err(PipelineError::DimensionMismatch {
            label: labels.dimensions(),
            density: density.dimensions(),
        });
    }

    let (width, height) = labels.dimensions();
    let roi = roi.unwrap_or_else(|| Roi::full(width, height));
    roi.validate(width, height)?;

    let mut counts = vec![0.0f64; cluster_count];
    let mut sums = vec![0.0f64; cluster_count];

    for (x, y) in roi.coordinates() {
        let idx = labels.index(x, y);
        let label = labels.data()[idx];
        let cluster = usize::try_from(label)
            .ok()
            .filter(|&c| c < cluster_count)
            .ok_or_else(|| PipelineError::InvalidClusterIndex {
                label: i64::from(label),
                cluster_count,
            })?;

        counts[cluster] += 1.0;
        sums[cluster] += density.data()[idx].into();
    }

    let statistics: Vec<ClusterStatistic> = counts
        .iter()
        .zip(&sums)
        .enumerate()
        .map(|(cluster_index, (&pixel_count, &sum))| ClusterStatistic {
            cluster_index,
            pixel_count,
            area_mm2: pixel_count * pixel_area_mm2,
            // 0/0 yields NaN for an empty cluster
            mean_density: sum / pixel_count,
        })
        .collect();

    debug!(
        clusters = cluster_count,
        empty = statistics.iter().filter(|s| s.is_empty()).count(),
        "Aggregation complete"
    );
    Ok(statistics)
}

/// Aggregation stage holding the cluster count and pixel area.
#[derive(Debug, Clone, Copy)]
pub struct ClusterAggregator {
    pub cluster_count: usize,
    pub pixel_area_mm2: f64,
}

impl ClusterAggregator {
    pub fn new(cluster_count: usize, pixel_area_mm2: f64) -> Self {
        Self {
            cluster_count,
            pixel_area_mm2,
        }
    }

    pub fn aggregate<D: Copy + Into<f64>>(
        &self,
        labels: &LabelImage,
        density: &Image<D>,
        roi: Option<Roi>,
    ) -> Result<Vec<ClusterStatistic>> {
        aggregate(labels, density, self.cluster_count, self.pixel_area_mm2, roi)
    }
}
