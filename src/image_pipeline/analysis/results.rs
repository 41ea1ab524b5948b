use std::path::Path;

use tracing::info;

use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::statistics::ClusterReport;

/// Accumulated quantification text, one entry per line.
#[derive(Debug, Clone, Default)]
pub struct ResultsLog {
    lines: Vec<String>,
}

impl ResultsLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append_lines<I, S>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lines.extend(lines.into_iter().map(Into::into));
    }

    pub fn append_report(&mut self, report: &ClusterReport) {
        self.append_lines(report.lines());
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn text(&self) -> String {
        self.lines.iter().map(|l| format!("{l}\n")).collect()
    }

    /// Writes the log to `path`, replacing any existing file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.text())?;
        info!(path = %path.display(), lines = self.lines.len(), "Saved quantification results");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_pipeline::statistics::ClusterStatistic;

    #[test]
    fn save_overwrites_previous_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.txt");
        std::fs::write(&path, "stale content that is longer than the new one\n").unwrap();

        let mut log = ResultsLog::new();
        log.append_lines(["first", "second"]);
        log.save(&path).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "first\nsecond\n");
    }

    #[test]
    fn reports_are_appended_line_by_line() {
        let mut log = ResultsLog::new();
        let report = ClusterReport::new(
            "I0036038.M01",
            vec![ClusterStatistic {
                cluster_index: 0,
                pixel_count: 1.0,
                area_mm2: 0.64,
                mean_density: 12.0,
            }],
        );

        log.append_report(&report);
        assert_eq!(log.lines().len(), 2);

        log.clear();
        assert!(log.is_empty());
    }
}
