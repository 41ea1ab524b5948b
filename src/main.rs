use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow, bail};
use pqct_quant_rs::image_pipeline::{
    BatchSummary, LabelFileSegmenter, NativeAnalyzer, QuantificationConfig, QuantificationPipeline, ResultsLog,
    SubjectList, Workflow,
    batch::{analyze_subjects, quantify_subjects},
};
use pqct_quant_rs::logger;

use tracing::{error, info};

const USAGE: &str = "usage:
  pqct_quant quantify <subject-list> <workflow-id> <labels-dir> [--density-dir <dir>] [--results <file>]
  pqct_quant analyze <subject-list> <workflow-id> <program> <parameter-file> <output-dir> [--results <file>]

workflow ids: 0 = 4% tibia, 1 = 38% tibia, 2 = 66% tibia, 3 = CT mid-thigh, 4 = anonymize";

#[derive(Debug, PartialEq)]
enum Mode {
    Quantify {
        labels_dir: PathBuf,
        density_dir: Option<PathBuf>,
    },
    Analyze {
        program: PathBuf,
        parameter_file: PathBuf,
        output_dir: PathBuf,
    },
}

#[derive(Debug, PartialEq)]
struct Invocation {
    subject_list: PathBuf,
    workflow: Workflow,
    mode: Mode,
    results: Option<PathBuf>,
}

fn parse_workflow(arg: &str) -> anyhow::Result<Workflow> {
    let id: u16 = arg.parse().with_context(|| format!("invalid workflow id {arg:?}"))?;
    Ok(Workflow::try_from(id)?)
}

fn parse_args(args: &[String]) -> anyhow::Result<Invocation> {
    let mut positional = Vec::new();
    let mut density_dir = None;
    let mut results = None;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--density-dir" | "--results" => {
                let value = iter
                    .next()
                    .map(PathBuf::from)
                    .ok_or_else(|| anyhow!("{arg} needs a value\n{USAGE}"))?;
                if arg == "--results" {
                    results = Some(value);
                } else {
                    density_dir = Some(value);
                }
            }
            _ => positional.push(arg.as_str()),
        }
    }

    let (mode, subject_list, workflow) = match positional.as_slice() {
        ["quantify", list, workflow, labels] => (
            Mode::Quantify {
                labels_dir: PathBuf::from(labels),
                density_dir: density_dir.take(),
            },
            list,
            workflow,
        ),
        ["analyze", list, workflow, program, params, output] => (
            Mode::Analyze {
                program: PathBuf::from(program),
                parameter_file: PathBuf::from(params),
                output_dir: PathBuf::from(output),
            },
            list,
            workflow,
        ),
        _ => bail!(USAGE),
    };
    if density_dir.is_some() {
        bail!("--density-dir only applies to quantify\n{USAGE}");
    }

    let workflow = parse_workflow(workflow)?;
    if matches!(mode, Mode::Quantify { .. }) && workflow == Workflow::Anonymize {
        bail!("workflow {workflow} produces no label images to quantify");
    }

    Ok(Invocation {
        subject_list: PathBuf::from(subject_list),
        workflow,
        mode,
        results,
    })
}

/// Appends each subject's lines, or a failure line, in subject list order.
fn collect_results<T>(summary: &BatchSummary<T>, lines_of: impl Fn(&T) -> Vec<String>) -> ResultsLog {
    let mut results = ResultsLog::new();
    for outcome in summary.outcomes() {
        match &outcome.result {
            Ok(value) => results.append_lines(lines_of(value)),
            Err(e) => {
                error!("{}: {}", outcome.subject, e);
                results.append_lines([format!("{}: failed ({})", outcome.subject, e)]);
            }
        }
    }
    results
}

fn quantify(
    subjects: &SubjectList,
    workflow: Workflow,
    labels_dir: &Path,
    density_dir: Option<&Path>,
) -> anyhow::Result<(ResultsLog, usize)> {
    if let Some(dir) = density_dir {
        std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }

    let config = QuantificationConfig::default();
    info!(
        "Calibration: slope {} intercept {}, {} clusters, pixel area {} mm^2",
        config.calibration.slope,
        config.calibration.intercept,
        config.cluster_count,
        config.pixel_area_mm2()
    );
    let pipeline = QuantificationPipeline::new(config);
    let segmenter = LabelFileSegmenter::new(labels_dir, workflow);

    let summary = quantify_subjects(&pipeline, subjects, &segmenter, density_dir);
    Ok((collect_results(&summary, |report| report.lines()), summary.failure_count()))
}

fn analyze(
    subjects: &SubjectList,
    workflow: Workflow,
    program: &Path,
    parameter_file: &Path,
    output_dir: &Path,
) -> anyhow::Result<(ResultsLog, usize)> {
    std::fs::create_dir_all(output_dir).with_context(|| format!("creating {}", output_dir.display()))?;

    let analyzer = NativeAnalyzer::new(program, parameter_file, output_dir);
    let summary = analyze_subjects(&analyzer, subjects, workflow);
    Ok((collect_results(&summary, |outcome| outcome.lines.clone()), summary.failure_count()))
}

fn main() -> anyhow::Result<()> {
    logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let invocation = parse_args(&args)?;

    info!("Starting pqct_quant...");
    info!("Workflow: {} ({})", invocation.workflow, invocation.workflow.id());

    let subjects = SubjectList::from_path(&invocation.subject_list)
        .with_context(|| format!("reading subject list {}", invocation.subject_list.display()))?;

    let (results, failures) = match &invocation.mode {
        Mode::Quantify { labels_dir, density_dir } => {
            quantify(&subjects, invocation.workflow, labels_dir, density_dir.as_deref())?
        }
        Mode::Analyze { program, parameter_file, output_dir } => {
            analyze(&subjects, invocation.workflow, program, parameter_file, output_dir)?
        }
    };

    print!("{}", results.text());
    if let Some(path) = &invocation.results {
        results
            .save(path)
            .with_context(|| format!("saving results to {}", path.display()))?;
    }

    info!("Processed {} of {} subjects", subjects.len() - failures, subjects.len());
    Ok(())
}
