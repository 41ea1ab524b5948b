//! pQCT image processing pipeline module
//!
//! This module decodes raw pQCT images, calibrates them to density, and
//! summarizes the density per cluster of an externally produced segmentation.
//! Batch processing and the native analysis executable sit on top.

pub mod raw;
pub mod calibration;
pub mod statistics;
pub mod tiff;
pub mod quantification;
pub mod analysis;
pub mod batch;
pub mod common;

pub use common::{
    Image,
    PipelineError,
    Result,
    Roi,
};

pub use raw::{
    FixedHeaderReader,
    PixelBuffer,
    PqctImageReader,
    RawImageDescriptor,
    decode,
};

pub use calibration::{
    CalibrationParameters,
    DensityCalibrator,
    DensityImage,
    calibrate,
};

pub use statistics::{
    ClusterAggregator,
    ClusterReport,
    ClusterStatistic,
    LabelImage,
    aggregate,
};

pub use self::tiff::{
    StandardTiffWriter,
    TiffCompression,
    TiffConfig,
    TiffWriter,
};

pub use quantification::{
    Denoiser,
    LabelFileSegmenter,
    QuantificationConfig,
    QuantificationPipeline,
    Segmenter,
};

pub use analysis::{
    NativeAnalyzer,
    ResultsLog,
    Workflow,
};

pub use batch::{
    BatchSummary,
    SubjectList,
};
