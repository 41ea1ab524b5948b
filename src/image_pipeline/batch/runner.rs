use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::image_pipeline::analysis::{AnalysisOutcome, NativeAnalyzer, Workflow};
use crate::image_pipeline::batch::subjects::SubjectList;
use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::quantification::{QuantificationPipeline, Segmenter};
use crate::image_pipeline::raw::PqctImageReader;
use crate::image_pipeline::statistics::ClusterReport;
use crate::image_pipeline::tiff::TiffWriter;

/// Result of processing one subject.
#[derive(Debug)]
pub struct SubjectOutcome<T> {
    pub subject: String,
    pub path: PathBuf,
    pub result: Result<T>,
}

/// Outcomes of a batch, in subject list order.
#[derive(Debug)]
pub struct BatchSummary<T> {
    outcomes: Vec<SubjectOutcome<T>>,
}

impl<T> BatchSummary<T> {
    pub fn outcomes(&self) -> &[SubjectOutcome<T>] {
        &self.outcomes
    }

    pub fn into_outcomes(self) -> Vec<SubjectOutcome<T>> {
        self.outcomes
    }

    pub fn succeeded(&self) -> impl Iterator<Item = (&str, &T)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok().map(|v| (o.subject.as_str(), v)))
    }

    pub fn failed(&self) -> impl Iterator<Item = &SubjectOutcome<T>> {
        self.outcomes.iter().filter(|o| o.result.is_err())
    }

    pub fn failure_count(&self) -> usize {
        self.failed().count()
    }
}

fn run_subject<T, F>(subject: &str, path: PathBuf, task: &F) -> SubjectOutcome<T>
where
    F: Fn(&Path) -> Result<T>,
{
    let result = task(&path);
    if let Err(e) = &result {
        warn!(subject, error = %e, "Subject failed, continuing with the rest of the batch");
    }
    SubjectOutcome {
        subject: subject.to_owned(),
        path,
        result,
    }
}

/// Runs `task` on every subject image and collects the outcomes.
///
/// Subjects share no state, so with the `rayon` feature they run in parallel.
pub fn run_batch<T, F>(subjects: &SubjectList, task: F) -> BatchSummary<T>
where
    T: Send,
    F: Fn(&Path) -> Result<T> + Sync,
{
    let jobs: Vec<(&String, PathBuf)> = subjects.subjects().iter().zip(subjects.paths()).collect();
    info!(subjects = jobs.len(), "Starting batch");

    #[cfg(feature = "rayon")]
    let outcomes: Vec<SubjectOutcome<T>> = {
        use rayon::prelude::*;
        jobs.into_par_iter()
            .map(|(subject, path)| run_subject(subject, path, &task))
            .collect()
    };

    #[cfg(not(feature = "rayon"))]
    let outcomes: Vec<SubjectOutcome<T>> = jobs
        .into_iter()
        .map(|(subject, path)| run_subject(subject, path, &task))
        .collect();

    let summary = BatchSummary { outcomes };
    info!(
        subjects = summary.outcomes.len(),
        failed = summary.failure_count(),
        "Batch finished"
    );
    summary
}

/// Quantifies every subject. With `density_dir` set, each density image is
/// written there as `<subject>.Density.tiff`.
pub fn quantify_subjects<R, W>(
    pipeline: &QuantificationPipeline<R, W>,
    subjects: &SubjectList,
    segmenter: &(dyn Segmenter + Sync),
    density_dir: Option<&Path>,
) -> BatchSummary<ClusterReport>
where
    R: PqctImageReader + Sync,
    W: TiffWriter + Sync,
{
    run_batch(subjects, |path| {
        let density_path = density_dir.zip(path.file_name()).map(|(dir, name)| {
            let mut file_name = name.to_os_string();
            file_name.push(".Density.tiff");
            dir.join(file_name)
        });
        pipeline.quantify_file(path, segmenter, density_path.as_deref())
    })
}

/// Runs the native analysis executable on every subject.
pub fn analyze_subjects(
    analyzer: &NativeAnalyzer,
    subjects: &SubjectList,
    workflow: Workflow,
) -> BatchSummary<AnalysisOutcome> {
    run_batch(subjects, |path| analyzer.run(path, workflow))
}
