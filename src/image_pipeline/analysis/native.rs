//! External analysis executable.
//!
//! The executable is called as
//! `<program> [leading args] <input> <workflow id> <parameter file> <output dir>`
//! and is expected to write `<subject>_<level>.Quantification.txt` into the
//! output directory. The report content is not interpreted.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info, instrument, warn};

use crate::image_pipeline::analysis::workflow::Workflow;
use crate::image_pipeline::common::error::{PipelineError, Result};

/// Parameter file shipped next to the native library.
pub const DEFAULT_PARAMETER_FILE: &str = "PQCT_Analysis_Params.txt";

/// Result of one native analysis run.
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub workflow: Workflow,
    /// Report read back from the output directory, `None` for anonymization
    pub report_path: Option<PathBuf>,
    /// Report lines, verbatim
    pub lines: Vec<String>,
    /// Captured standard output of the executable
    pub stdout: String,
    pub exit_code: Option<i32>,
}

/// Statically configured launcher for the native analysis executable.
#[derive(Debug, Clone)]
pub struct NativeAnalyzer {
    program: PathBuf,
    leading_args: Vec<OsString>,
    parameter_file: PathBuf,
    output_dir: PathBuf,
}

impl NativeAnalyzer {
    pub fn new(
        program: impl Into<PathBuf>,
        parameter_file: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            program: program.into(),
            leading_args: Vec::new(),
            parameter_file: parameter_file.into(),
            output_dir: output_dir.into(),
        }
    }

    /// Arguments placed before the standard ones, e.g. a script for an interpreter.
    pub fn with_leading_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.leading_args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn parameter_file(&self) -> &Path {
        &self.parameter_file
    }

    /// Runs the executable on `input` and collects its report.
    #[instrument(skip(self), fields(program = %self.program.display()))]
    pub fn run(&self, input: &Path, workflow: Workflow) -> Result<AnalysisOutcome> {
        let file_name = input
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| PipelineError::NativeAnalysis(format!("no file name in {}", input.display())))?;

        info!(input = %input.display(), %workflow, "Running native analysis");

        let output = Command::new(&self.program)
            .args(&self.leading_args)
            .arg(input)
            .arg(workflow.id().to_string())
            .arg(&self.parameter_file)
            .arg(&self.output_dir)
            .output()
            .map_err(|e| {
                PipelineError::NativeAnalysis(format!("failed to launch {}: {}", self.program.display(), e))
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!(status = %output.status, "Native analysis failed");
            return Err(PipelineError::NativeAnalysis(format!(
                "{} exited with {}: {}",
                self.program.display(),
                output.status,
                stderr.trim()
            )));
        }
        debug!(stdout_bytes = stdout.len(), "Native analysis finished");

        let (report_path, lines) = match workflow.report_file_name(file_name) {
            Some(name) => {
                let path = self.output_dir.join(name);
                let lines = read_report(&path)?;
                (Some(path), lines)
            }
            None => (None, vec![format!("{file_name} was anonymized.")]),
        };

        Ok(AnalysisOutcome {
            workflow,
            report_path,
            lines,
            stdout,
            exit_code: output.status.code(),
        })
    }
}

fn read_report(path: &Path) -> Result<Vec<String>> {
    let text = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => PipelineError::ReportNotFound(path.to_path_buf()),
        _ => PipelineError::Io(e),
    })?;
    Ok(text.lines().map(str::to_owned).collect())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    /// Analyzer running `script` through `sh`, so the test never executes a freshly written file.
    fn scripted(dir: &Path, script: &str) -> NativeAnalyzer {
        let script_path = dir.join("analysis.sh");
        std::fs::write(&script_path, script).unwrap();
        NativeAnalyzer::new("sh", dir.join(DEFAULT_PARAMETER_FILE), dir).with_leading_args([script_path])
    }

    const WRITES_REPORT: &str = r#"
name=$(basename "$1")
case "$2" in
  0) level=4pct ;;
  1) level=38pct ;;
  2) level=66pct ;;
esac
printf 'Workflow %s\nParams %s\n' "$2" "$(basename "$3")" > "$4/${name}_${level}.Quantification.txt"
echo done
"#;

    #[test]
    fn collects_report_lines() {
        let dir = tempfile::tempdir().unwrap();
        let analyzer = scripted(dir.path(), WRITES_REPORT);

        let outcome = analyzer
            .run(Path::new("/data/I0036038.M01"), Workflow::ThirtyEightPctTibia)
            .unwrap();

        assert_eq!(outcome.lines, vec!["Workflow 1", "Params PQCT_Analysis_Params.txt"]);
        assert_eq!(
            outcome.report_path.unwrap(),
            dir.path().join("I0036038.M01_38pct.Quantification.txt")
        );
        assert_eq!(outcome.stdout.trim(), "done");
        assert_eq!(outcome.exit_code, Some(0));
    }

    #[test]
    fn anonymization_reports_a_single_line() {
        let dir = tempfile::tempdir().unwrap();
        let analyzer = scripted(dir.path(), "exit 0\n");

        let outcome = analyzer.run(Path::new("/data/I0036038.M01"), Workflow::Anonymize).unwrap();

        assert_eq!(outcome.lines, vec!["I0036038.M01 was anonymized."]);
        assert!(outcome.report_path.is_none());
    }

    #[test]
    fn missing_report_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let analyzer = scripted(dir.path(), "exit 0\n");

        let result = analyzer.run(Path::new("/data/I0036038.M01"), Workflow::SixtySixPctTibia);

        assert!(matches!(result, Err(PipelineError::ReportNotFound(_))));
    }

    #[test]
    fn non_zero_exit_is_a_failure() {
        let dir = tempfile::tempdir().unwrap();
        let analyzer = scripted(dir.path(), "echo broken >&2\nexit 3\n");

        let result = analyzer.run(Path::new("/data/I0036038.M01"), Workflow::FourPctTibia);

        match result {
            Err(PipelineError::NativeAnalysis(msg)) => assert!(msg.contains("broken")),
            other => panic!("expected native analysis failure, got {other:?}"),
        }
    }

    #[test]
    fn missing_program_is_a_failure() {
        let dir = tempfile::tempdir().unwrap();
        let analyzer = NativeAnalyzer::new(dir.path().join("no-such-binary"), "params.txt", dir.path());

        let result = analyzer.run(Path::new("I0036038.M01"), Workflow::FourPctTibia);

        assert!(matches!(result, Err(PipelineError::NativeAnalysis(_))));
    }
}
