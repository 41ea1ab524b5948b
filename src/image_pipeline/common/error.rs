use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Label image is {}x{} but density image is {}x{}", .label.0, .label.1, .density.0, .density.1)]
    DimensionMismatch {
        label: (usize, usize),
        density: (usize, usize),
    },

    #[error("Label value {label} outside of [0, {cluster_count})")]
    InvalidClusterIndex { label: i64, cluster_count: usize },

    #[error("Cluster #{0} has no pixels, mean density is undefined")]
    EmptyCluster(usize),

    #[error("Invalid image dimensions: width={0}, height={1}")]
    InvalidDimensions(usize, usize),

    #[error("ROI {roi:?} does not fit inside a {width}x{height} image")]
    RoiOutOfBounds {
        roi: crate::image_pipeline::common::roi::Roi,
        width: usize,
        height: usize,
    },

    #[error("Failed to decode image: {0}")]
    DecodeError(String),

    #[error("Failed to encode TIFF image: {0}")]
    EncodeError(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid subject list: {0}")]
    SubjectList(String),

    #[error("Unknown workflow id: {0}")]
    UnknownWorkflow(u16),

    #[error("Native analysis failed: {0}")]
    NativeAnalysis(String),

    #[error("Quantification report not found: {}", .0.display())]
    ReportNotFound(PathBuf),
}

pub type Result<T> = std::result::Result<T, PipelineError>;

impl PipelineError {
    /// Maps an open/read failure on `path`, keeping "not found" distinct from other IO errors.
    pub(crate) fn from_io(path: &std::path::Path, err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            PipelineError::FileNotFound(path.to_path_buf())
        } else {
            PipelineError::Io(err)
        }
    }
}
