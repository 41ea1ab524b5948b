//! Cluster statistics result types

use std::fmt;

use crate::image_pipeline::common::error::{PipelineError, Result};

/// Summary of one cluster index.
///
/// A cluster without pixels has `pixel_count == 0`, `area_mm2 == 0` and a NaN
/// `mean_density`; use [`ClusterStatistic::mean_density_checked`] to get an
/// error instead.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClusterStatistic {
    pub cluster_index: usize,
    pub pixel_count: f64,
    pub area_mm2: f64,
    pub mean_density: f64,
}

impl ClusterStatistic {
    pub fn is_empty(&self) -> bool {
        self.pixel_count == 0.0
    }

    /// Mean density, failing with `EmptyCluster` when no pixel carries this label.
    pub fn mean_density_checked(&self) -> Result<f64> {
        if self.is_empty() {
            Err(PipelineError::EmptyCluster(self.cluster_index))
        } else {
            Ok(self.mean_density)
        }
    }
}

impl fmt::Display for ClusterStatistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Cluster #{} stats: area =  [{}px, {:.2} mm^2], average density = {:.3}",
            self.cluster_index, self.pixel_count, self.area_mm2, self.mean_density
        )
    }
}

/// Per-cluster statistics of one subject, ordered by cluster index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClusterReport {
    pub subject: String,
    pub statistics: Vec<ClusterStatistic>,
}

impl ClusterReport {
    pub fn new(subject: impl Into<String>, statistics: Vec<ClusterStatistic>) -> Self {
        Self {
            subject: subject.into(),
            statistics,
        }
    }

    pub fn cluster(&self, index: usize) -> Option<&ClusterStatistic> {
        self.statistics.get(index)
    }

    pub fn total_area_mm2(&self) -> f64 {
        self.statistics.iter().map(|s| s.area_mm2).sum()
    }

    /// One text line per cluster, prefixed by the subject line.
    pub fn lines(&self) -> Vec<String> {
        std::iter::once(format!("Subject: {}", self.subject))
            .chain(self.statistics.iter().map(ToString::to_string))
            .collect()
    }
}

impl fmt::Display for ClusterReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.lines() {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stat(index: usize, count: f64, mean: f64) -> ClusterStatistic {
        ClusterStatistic {
            cluster_index: index,
            pixel_count: count,
            area_mm2: count * 0.64,
            mean_density: mean,
        }
    }

    #[test]
    fn empty_cluster_mean_is_an_error_when_checked() {
        let empty = stat(3, 0.0, f64::NAN);
        assert!(matches!(
            empty.mean_density_checked(),
            Err(PipelineError::EmptyCluster(3))
        ));
        assert_eq!(stat(1, 2.0, 250.0).mean_density_checked().unwrap(), 250.0);
    }

    #[test]
    fn display_lists_area_and_density() {
        let line = stat(0, 2.0, 250.0).to_string();
        assert_eq!(
            line,
            "Cluster #0 stats: area =  [2px, 1.28 mm^2], average density = 250.000"
        );
    }

    #[test]
    fn report_lines_start_with_subject() {
        let report = ClusterReport::new("I0036038.M01", vec![stat(0, 1.0, 5.0), stat(1, 3.0, 7.0)]);
        let lines = report.lines();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "Subject: I0036038.M01");
        assert!(lines[2].starts_with("Cluster #1"));
        assert!((report.total_area_mm2() - 2.56).abs() < 1e-9);
    }
}
