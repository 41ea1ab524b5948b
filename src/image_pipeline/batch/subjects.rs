//! Subject list files.
//!
//! The first line names the data directory, every following non-empty line
//! names one image file inside it.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::image_pipeline::common::error::{PipelineError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectList {
    data_dir: PathBuf,
    subjects: Vec<String>,
}

impl SubjectList {
    pub fn new(data_dir: impl Into<PathBuf>, subjects: Vec<String>) -> Self {
        Self {
            data_dir: data_dir.into(),
            subjects,
        }
    }

    pub fn parse(text: &str) -> Result<Self> {
        let mut lines = text.lines().map(str::trim);
        let data_dir = lines
            .next()
            .filter(|line| !line.is_empty())
            .ok_or_else(|| PipelineError::SubjectList("first line must name the data directory".to_string()))?;

        let subjects: Vec<String> = lines.filter(|l| !l.is_empty()).map(str::to_owned).collect();
        debug!(data_dir, subjects = subjects.len(), "Parsed subject list");

        Ok(Self::new(data_dir, subjects))
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| PipelineError::from_io(path, e))?;
        Self::parse(&text)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn subjects(&self) -> &[String] {
        &self.subjects
    }

    pub fn len(&self) -> usize {
        self.subjects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }

    /// Full path of every subject image, in list order.
    pub fn paths(&self) -> Vec<PathBuf> {
        self.subjects.iter().map(|s| self.data_dir.join(s)).collect()
    }
}
