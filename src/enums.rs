use std::fmt;

use serde::Deserialize;

/// Why a group of single-frame images cannot (fully) be reconstructed into a
/// volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReconstructionIssue {
    VaryingImagesDimensions,
    VaryingImagesComponents,
    VaryingImagesOrientation,
    IrregularSpacing,
    MissingFrames,
    Dataset4D,
}

impl ReconstructionIssue {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VaryingImagesDimensions => "VARYING_IMAGESDIMENSIONS",
            Self::VaryingImagesComponents => "VARYING_IMAGESCOMPONENTS",
            Self::VaryingImagesOrientation => "VARYING_IMAGESORIENTATION",
            Self::IrregularSpacing => "IRREGULAR_SPACING",
            Self::MissingFrames => "MISSING_FRAMES",
            Self::Dataset4D => "DATASET_4D",
        }
    }
}

impl fmt::Display for ReconstructionIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Volume loader the renderer should use for a display set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VolumeLoaderScheme {
    #[default]
    Standard,
    Dynamic,
}

impl VolumeLoaderScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "cornerstoneStreamingImageVolume",
            Self::Dynamic => "cornerstoneStreamingDynamicImageVolume",
        }
    }
}

impl fmt::Display for VolumeLoaderScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    /// InstanceNumber when every instance has a distinct one, otherwise
    /// ImagePositionPatient.
    #[default]
    Auto,
    ImagePositionPatient,
    InstanceNumber,
    None,
}
