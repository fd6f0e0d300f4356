//! Attribute lookup by keyword, and layered fallback across metadata sources.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::instance::Instance;

/// Attributes of an [`Instance`] addressable by their DICOM keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    SopInstanceUid,
    SopClassUid,
    StudyInstanceUid,
    SeriesInstanceUid,
    Modality,
    SeriesNumber,
    SeriesDescription,
    SeriesDate,
    SeriesTime,
    InstanceNumber,
    NumberOfFrames,
    Rows,
    Columns,
    SamplesPerPixel,
    ImageOrientationPatient,
    ImagePositionPatient,
    PixelSpacing,
    FrameTime,
    AcquisitionDateTime,
    TemporalPositionIdentifier,
    ImageType,
}

impl Attribute {
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::SopInstanceUid => "SOPInstanceUID",
            Self::SopClassUid => "SOPClassUID",
            Self::StudyInstanceUid => "StudyInstanceUID",
            Self::SeriesInstanceUid => "SeriesInstanceUID",
            Self::Modality => "Modality",
            Self::SeriesNumber => "SeriesNumber",
            Self::SeriesDescription => "SeriesDescription",
            Self::SeriesDate => "SeriesDate",
            Self::SeriesTime => "SeriesTime",
            Self::InstanceNumber => "InstanceNumber",
            Self::NumberOfFrames => "NumberOfFrames",
            Self::Rows => "Rows",
            Self::Columns => "Columns",
            Self::SamplesPerPixel => "SamplesPerPixel",
            Self::ImageOrientationPatient => "ImageOrientationPatient",
            Self::ImagePositionPatient => "ImagePositionPatient",
            Self::PixelSpacing => "PixelSpacing",
            Self::FrameTime => "FrameTime",
            Self::AcquisitionDateTime => "AcquisitionDateTime",
            Self::TemporalPositionIdentifier => "TemporalPositionIdentifier",
            Self::ImageType => "ImageType",
        }
    }

    const ALL: [Attribute; 21] = [
        Self::SopInstanceUid,
        Self::SopClassUid,
        Self::StudyInstanceUid,
        Self::SeriesInstanceUid,
        Self::Modality,
        Self::SeriesNumber,
        Self::SeriesDescription,
        Self::SeriesDate,
        Self::SeriesTime,
        Self::InstanceNumber,
        Self::NumberOfFrames,
        Self::Rows,
        Self::Columns,
        Self::SamplesPerPixel,
        Self::ImageOrientationPatient,
        Self::ImagePositionPatient,
        Self::PixelSpacing,
        Self::FrameTime,
        Self::AcquisitionDateTime,
        Self::TemporalPositionIdentifier,
        Self::ImageType,
    ];
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown attribute keyword `{0}`")]
pub struct UnknownAttribute(pub String);

impl FromStr for Attribute {
    type Err = UnknownAttribute;

    fn from_str(keyword: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|attribute| attribute.keyword() == keyword)
            .ok_or_else(|| UnknownAttribute(keyword.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Text(String),
    Texts(Vec<String>),
    Int(i64),
    Float(f64),
    Floats(Vec<f64>),
}

impl AttributeValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Texts(texts) => f.write_str(&texts.join("\\")),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Floats(values) => {
                for (i, x) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str("\\")?;
                    }
                    write!(f, "{x}")?;
                }
                Ok(())
            }
        }
    }
}

impl Instance {
    pub fn attribute(&self, attribute: Attribute) -> Option<AttributeValue> {
        use AttributeValue::*;

        let text = |value: &Option<String>| value.clone().map(Text);
        match attribute {
            Attribute::SopInstanceUid => text(&self.sop_instance_uid),
            Attribute::SopClassUid => text(&self.sop_class_uid),
            Attribute::StudyInstanceUid => text(&self.study_instance_uid),
            Attribute::SeriesInstanceUid => text(&self.series_instance_uid),
            Attribute::Modality => text(&self.modality),
            Attribute::SeriesNumber => self.series_number.map(|n| Int(n.into())),
            Attribute::SeriesDescription => text(&self.series_description),
            Attribute::SeriesDate => text(&self.series_date),
            Attribute::SeriesTime => text(&self.series_time),
            Attribute::InstanceNumber => self.instance_number.map(|n| Int(n.into())),
            Attribute::NumberOfFrames => self.number_of_frames.map(|n| Int(n.into())),
            Attribute::Rows => self.rows.map(|n| Int(n.into())),
            Attribute::Columns => self.columns.map(|n| Int(n.into())),
            Attribute::SamplesPerPixel => self.samples_per_pixel.map(|n| Int(n.into())),
            Attribute::ImageOrientationPatient => {
                self.image_orientation_patient.map(|v| Floats(v.to_vec()))
            }
            Attribute::ImagePositionPatient => {
                self.image_position_patient.map(|v| Floats(v.to_vec()))
            }
            Attribute::PixelSpacing => self.pixel_spacing.map(|v| Floats(v.to_vec())),
            Attribute::FrameTime => self.frame_time.map(Float),
            Attribute::AcquisitionDateTime => text(&self.acquisition_date_time),
            Attribute::TemporalPositionIdentifier => {
                self.temporal_position_identifier.map(|n| Int(n.into()))
            }
            Attribute::ImageType => {
                (!self.image_type.is_empty()).then(|| Texts(self.image_type.clone()))
            }
        }
    }
}

/// Resolves attributes from an instance first, then from a parent record
/// (typically series level metadata), then from a shared record (study
/// level).
#[derive(Debug, Clone, Copy)]
pub struct MetadataLayers<'a> {
    pub instance: &'a Instance,
    pub parent: Option<&'a Instance>,
    pub shared: Option<&'a Instance>,
}

impl<'a> MetadataLayers<'a> {
    pub fn new(instance: &'a Instance) -> Self {
        Self {
            instance,
            parent: None,
            shared: None,
        }
    }

    pub fn with_parent(self, parent: Option<&'a Instance>) -> Self {
        Self { parent, ..self }
    }

    pub fn with_shared(self, shared: Option<&'a Instance>) -> Self {
        Self { shared, ..self }
    }

    pub fn resolve(&self, attribute: Attribute) -> Option<AttributeValue> {
        [Some(self.instance), self.parent, self.shared]
            .into_iter()
            .flatten()
            .find_map(|layer| layer.attribute(attribute))
    }

    pub fn resolve_text(&self, attribute: Attribute) -> Option<String> {
        match self.resolve(attribute)? {
            AttributeValue::Text(text) => Some(text),
            other => Some(other.to_string()),
        }
    }

    pub fn resolve_int(&self, attribute: Attribute) -> Option<i64> {
        self.resolve(attribute)?.as_int()
    }
}
