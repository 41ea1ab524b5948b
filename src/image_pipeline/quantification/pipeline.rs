use std::io::Write;
use std::path::Path;

use tracing::{info, instrument, warn};

use crate::image_pipeline::{
    calibration::{DensityImage, calibrate},
    common::error::{PipelineError, Result},
    quantification::{
        PipelineTimings, QuantificationConfig, Timer,
        collaborators::{Denoiser, PassthroughDenoiser, Segmenter},
    },
    raw::{FixedHeaderReader, PqctImageReader},
    statistics::{ClusterReport, aggregate},
    tiff::{StandardTiffWriter, TiffWriter},
};

pub struct QuantificationPipeline<R: PqctImageReader, W: TiffWriter> {
    reader: R,
    writer: W,
    denoiser: Box<dyn Denoiser + Send + Sync>,
    config: QuantificationConfig,
}

impl QuantificationPipeline<FixedHeaderReader, StandardTiffWriter> {
    pub fn new(config: QuantificationConfig) -> Self {
        Self {
            reader: FixedHeaderReader::new(config.descriptor),
            writer: StandardTiffWriter,
            denoiser: Box::new(PassthroughDenoiser),
            config,
        }
    }
}

impl<R: PqctImageReader, W: TiffWriter> QuantificationPipeline<R, W> {
    pub fn with_custom(reader: R, writer: W, config: QuantificationConfig) -> Self {
        Self {
            reader,
            writer,
            denoiser: Box::new(PassthroughDenoiser),
            config,
        }
    }

    /// Replaces the filter run between calibration and aggregation.
    pub fn with_denoiser(mut self, denoiser: impl Denoiser + Send + Sync + 'static) -> Self {
        self.denoiser = Box::new(denoiser);
        self
    }

    fn validate_dimensions(&self, width: usize, height: usize) -> Result<()> {
        if !self.config.validate_dimensions {
            return Ok(());
        }

        if width == 0 || height == 0 {
            return Err(PipelineError::InvalidDimensions(width, height));
        }

        if let Some(max) = self.config.max_dimension {
            if width > max || height > max {
                warn!("Image dimensions {}x{} exceed maximum {}", width, height, max);
                return Err(PipelineError::InvalidDimensions(width, height));
            }
        }

        Ok(())
    }

    /// Decodes `input_data` and returns the calibrated, denoised density image.
    pub fn density(&self, input_data: &[u8]) -> Result<DensityImage> {
        let mut timings = PipelineTimings::new();
        self.density_with_timings(input_data, &mut timings)
    }

    fn density_with_timings(&self, input_data: &[u8], timings: &mut PipelineTimings) -> Result<DensityImage> {
        let timer = Timer::start("decode_raw");
        let pixels = {
            let _span = tracing::info_span!("decode_raw").entered();
            self.reader.read_pqct(input_data)?
        };
        timings.record(timer);

        let timer = Timer::start("validate_dimensions");
        self.validate_dimensions(pixels.width(), pixels.height())?;
        timings.record(timer);

        let timer = Timer::start("calibrate");
        let density = {
            let _span = tracing::info_span!("calibrate").entered();
            calibrate(&pixels, self.config.roi, &self.config.calibration)?
        };
        timings.record(timer);

        let timer = Timer::start("denoise");
        let density = {
            let _span = tracing::info_span!("denoise").entered();
            self.denoiser.denoise(density)?
        };
        timings.record(timer);

        Ok(density)
    }

    pub fn quantify(
        &self,
        subject: &str,
        input_data: &[u8],
        segmenter: &dyn Segmenter,
        density_output: Option<&mut dyn Write>,
    ) -> Result<ClusterReport> {
        self.quantify_with_timings(subject, input_data, segmenter, density_output)
            .map(|(report, _)| report)
    }

    #[instrument(skip(self, input_data, segmenter, density_output), fields(input_size = input_data.len()))]
    pub fn quantify_with_timings(
        &self,
        subject: &str,
        input_data: &[u8],
        segmenter: &dyn Segmenter,
        density_output: Option<&mut dyn Write>,
    ) -> Result<(ClusterReport, PipelineTimings)> {
        let mut timings = PipelineTimings::new();
        info!("Starting pQCT quantification");

        let density = self.density_with_timings(input_data, &mut timings)?;

        if let Some(output) = density_output {
            let timer = Timer::start("encode_tiff");
            let _span = tracing::info_span!("encode_tiff").entered();
            self.writer.write_density(&density, output, &self.config.tiff)?;
            timings.record(timer);
        }

        let timer = Timer::start("segment");
        let labels = {
            let _span = tracing::info_span!("segment").entered();
            segmenter.segment(subject, &density)?
        };
        timings.record(timer);

        let timer = Timer::start("aggregate");
        let statistics = {
            let _span = tracing::info_span!("aggregate").entered();
            aggregate(
                &labels,
                &density,
                self.config.cluster_count,
                self.config.pixel_area_mm2(),
                self.config.roi,
            )?
        };
        timings.record(timer);

        info!(
            width = density.width(),
            height = density.height(),
            clusters = statistics.len(),
            "Quantification complete in {:.3}ms",
            timings.total_duration().as_secs_f64() * 1000.0
        );
        Ok((ClusterReport::new(subject, statistics), timings))
    }

    /// Quantifies the file at `input_path`, named in the report by its file name.
    ///
    /// When `density_path` is given the density image is also written there as TIFF,
    /// once quantification has succeeded.
    #[instrument(skip_all, fields(input = %input_path.as_ref().display()))]
    pub fn quantify_file<P: AsRef<Path>>(
        &self,
        input_path: P,
        segmenter: &dyn Segmenter,
        density_path: Option<&Path>,
    ) -> Result<ClusterReport> {
        let input_path = input_path.as_ref();
        let subject = input_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| PipelineError::FileNotFound(input_path.to_path_buf()))?;

        let input_data = {
            let _span = tracing::info_span!("read_input_file").entered();
            std::fs::read(input_path).map_err(|e| PipelineError::from_io(input_path, e))?
        };

        match density_path {
            Some(path) => {
                // nothing reaches disk unless the whole subject succeeds
                let mut encoded = Vec::new();
                let report = self.quantify(&subject, &input_data, segmenter, Some(&mut encoded as &mut dyn Write))?;
                let _span = tracing::info_span!("write_output_file").entered();
                std::fs::write(path, encoded)?;
                Ok(report)
            }
            None => self.quantify(&subject, &input_data, segmenter, None),
        }
    }

    pub fn config(&self) -> &QuantificationConfig {
        &self.config
    }
}
