//! Anatomical analysis profiles and their file naming.

use std::fmt;

use crate::image_pipeline::common::error::PipelineError;

/// Suffix of the report written by the native analysis for a subject.
pub const REPORT_SUFFIX: &str = ".Quantification.txt";

/// Suffix of label images produced by the clustering step.
pub const LABEL_SUFFIX: &str = ".Labels.tiff";

/// Analysis profile, numbered as the native executable expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Workflow {
    FourPctTibia = 0,
    ThirtyEightPctTibia = 1,
    SixtySixPctTibia = 2,
    MidThigh = 3,
    Anonymize = 4,
}

impl Workflow {
    pub const ALL: [Workflow; 5] = [
        Workflow::FourPctTibia,
        Workflow::ThirtyEightPctTibia,
        Workflow::SixtySixPctTibia,
        Workflow::MidThigh,
        Workflow::Anonymize,
    ];

    pub fn id(self) -> u16 {
        self as u16
    }

    /// Level tag used in output file names, `None` for anonymization.
    pub fn level_label(self) -> Option<&'static str> {
        match self {
            Workflow::FourPctTibia => Some("4pct"),
            Workflow::ThirtyEightPctTibia => Some("38pct"),
            Workflow::SixtySixPctTibia => Some("66pct"),
            Workflow::MidThigh => Some("MidThigh"),
            Workflow::Anonymize => None,
        }
    }

    /// Subject part of output names. CT mid-thigh inputs drop their extension,
    /// pQCT inputs keep the full file name.
    pub fn subject_stem(self, file_name: &str) -> &str {
        match self {
            Workflow::MidThigh => file_name.rfind('.').map_or(file_name, |dot| &file_name[..dot]),
            _ => file_name,
        }
    }

    /// `<subject>_<level>.Quantification.txt`
    pub fn report_file_name(self, file_name: &str) -> Option<String> {
        self.output_name(file_name, REPORT_SUFFIX)
    }

    /// `<subject>_<level>.Labels.tiff`
    pub fn label_file_name(self, file_name: &str) -> Option<String> {
        self.output_name(file_name, LABEL_SUFFIX)
    }

    fn output_name(self, file_name: &str, suffix: &str) -> Option<String> {
        let level = self.level_label()?;
        Some(format!("{}_{}{}", self.subject_stem(file_name), level, suffix))
    }
}

impl TryFrom<u16> for Workflow {
    type Error = PipelineError;

    fn try_from(id: u16) -> Result<Self, Self::Error> {
        Workflow::ALL
            .into_iter()
            .find(|w| w.id() == id)
            .ok_or(PipelineError::UnknownWorkflow(id))
    }
}

impl fmt::Display for Workflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Workflow::FourPctTibia => "pQCT 4% Tibia",
            Workflow::ThirtyEightPctTibia => "pQCT 38% Tibia",
            Workflow::SixtySixPctTibia => "pQCT 66% Tibia",
            Workflow::MidThigh => "CT Middle Thigh",
            Workflow::Anonymize => "pQCT Anonymization",
        };
        f.write_str(name)
    }
}
