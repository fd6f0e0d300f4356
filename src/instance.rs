use dicom::core::Tag;
use dicom::object::InMemDicomObject;
use dicom_dictionary_std::tags;

use crate::sop_class;

/// Naturalized metadata of a single DICOM instance.
///
/// Every attribute is optional: metadata providers regularly omit tags and
/// the display set pipeline degrades instead of failing when they do. Only
/// `image_id`, the opaque handle the renderer loads pixels through, is always
/// present.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Instance {
    pub image_id: String,
    pub sop_instance_uid: Option<String>,
    pub sop_class_uid: Option<String>,
    pub study_instance_uid: Option<String>,
    pub series_instance_uid: Option<String>,
    pub modality: Option<String>,
    pub series_number: Option<i32>,
    pub series_description: Option<String>,
    pub series_date: Option<String>,
    pub series_time: Option<String>,
    pub instance_number: Option<i32>,
    pub number_of_frames: Option<u32>,
    pub rows: Option<u16>,
    pub columns: Option<u16>,
    pub samples_per_pixel: Option<u16>,
    pub image_orientation_patient: Option<[f64; 6]>,
    pub image_position_patient: Option<[f64; 3]>,
    pub pixel_spacing: Option<[f64; 2]>,
    pub frame_time: Option<f64>,
    pub acquisition_date_time: Option<String>,
    pub temporal_position_identifier: Option<i32>,
    pub image_type: Vec<String>,
}

impl Instance {
    pub fn new(image_id: impl Into<String>) -> Self {
        Self {
            image_id: image_id.into(),
            ..Default::default()
        }
    }

    /// Read the attributes the display set pipeline needs from a DICOM object
    ///
    /// Attributes that are missing, unparsable or have the wrong number of
    /// values are left as `None`.
    pub fn from_dicom_object(dicom_object: &InMemDicomObject, image_id: impl Into<String>) -> Self {
        Self {
            image_id: image_id.into(),
            sop_instance_uid: text(dicom_object, tags::SOP_INSTANCE_UID),
            sop_class_uid: text(dicom_object, tags::SOP_CLASS_UID),
            study_instance_uid: text(dicom_object, tags::STUDY_INSTANCE_UID),
            series_instance_uid: text(dicom_object, tags::SERIES_INSTANCE_UID),
            modality: text(dicom_object, tags::MODALITY),
            series_number: int(dicom_object, tags::SERIES_NUMBER)
                .and_then(|n| i32::try_from(n).ok()),
            series_description: text(dicom_object, tags::SERIES_DESCRIPTION),
            series_date: text(dicom_object, tags::SERIES_DATE),
            series_time: text(dicom_object, tags::SERIES_TIME),
            instance_number: int(dicom_object, tags::INSTANCE_NUMBER)
                .and_then(|n| i32::try_from(n).ok()),
            number_of_frames: int(dicom_object, tags::NUMBER_OF_FRAMES)
                .and_then(|n| u32::try_from(n).ok()),
            rows: int(dicom_object, tags::ROWS).and_then(|n| u16::try_from(n).ok()),
            columns: int(dicom_object, tags::COLUMNS).and_then(|n| u16::try_from(n).ok()),
            samples_per_pixel: int(dicom_object, tags::SAMPLES_PER_PIXEL)
                .and_then(|n| u16::try_from(n).ok()),
            image_orientation_patient: floats(dicom_object, tags::IMAGE_ORIENTATION_PATIENT),
            image_position_patient: floats(dicom_object, tags::IMAGE_POSITION_PATIENT),
            pixel_spacing: floats(dicom_object, tags::PIXEL_SPACING),
            frame_time: dicom_object
                .element(tags::FRAME_TIME)
                .ok()
                .and_then(|element| element.to_float64().ok()),
            acquisition_date_time: text(dicom_object, tags::ACQUISITION_DATE_TIME),
            temporal_position_identifier: int(dicom_object, tags::TEMPORAL_POSITION_IDENTIFIER)
                .and_then(|n| i32::try_from(n).ok()),
            image_type: text(dicom_object, tags::IMAGE_TYPE)
                .map(|value| value.split('\\').map(|s| s.trim().to_string()).collect())
                .unwrap_or_default(),
        }
    }

    pub fn is_multi_frame(&self) -> bool {
        self.number_of_frames.is_some_and(|frames| frames > 1)
    }

    /// Number of frames, counting single-frame objects (and objects without
    /// NumberOfFrames) as one.
    pub fn frame_count(&self) -> u32 {
        self.number_of_frames.unwrap_or(1).max(1)
    }

    pub fn has_geometry(&self) -> bool {
        self.image_orientation_patient.is_some() && self.image_position_patient.is_some()
    }

    /// Whether this object carries pixels: an image storage SOP class, or any
    /// object with Rows. Reports and presentation states are not images.
    pub fn is_image(&self) -> bool {
        self.rows.is_some() || self.sop_class_uid.as_deref().is_some_and(sop_class::is_image)
    }
}

fn text(dicom_object: &InMemDicomObject, tag: Tag) -> Option<String> {
    dicom_object
        .element(tag)
        .ok()?
        .to_str()
        .ok()
        .map(|value| value.trim_matches(|c: char| c.is_whitespace() || c == '\0').to_string())
        .filter(|value| !value.is_empty())
}

fn int(dicom_object: &InMemDicomObject, tag: Tag) -> Option<i64> {
    dicom_object.element(tag).ok()?.to_int::<i64>().ok()
}

fn floats<const N: usize>(dicom_object: &InMemDicomObject, tag: Tag) -> Option<[f64; N]> {
    let values = dicom_object.element(tag).ok()?.to_multi_float64().ok()?;
    <[f64; N]>::try_from(values.as_slice()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use dicom::core::{DataElement, PrimitiveValue, VR, dicom_value};

    fn ct_object() -> InMemDicomObject {
        InMemDicomObject::from_element_iter([
            DataElement::new(tags::SOP_INSTANCE_UID, VR::UI, PrimitiveValue::from("1.2.3.4.1")),
            DataElement::new(tags::SERIES_INSTANCE_UID, VR::UI, PrimitiveValue::from("1.2.3.4")),
            DataElement::new(tags::MODALITY, VR::CS, PrimitiveValue::from("CT")),
            DataElement::new(tags::INSTANCE_NUMBER, VR::IS, PrimitiveValue::from("7")),
            DataElement::new(tags::ROWS, VR::US, PrimitiveValue::from(512_u16)),
            DataElement::new(tags::COLUMNS, VR::US, PrimitiveValue::from(256_u16)),
            DataElement::new(
                tags::IMAGE_ORIENTATION_PATIENT,
                VR::DS,
                dicom_value!(Strs, ["1", "0", "0", "0", "1", "0"]),
            ),
            DataElement::new(
                tags::IMAGE_POSITION_PATIENT,
                VR::DS,
                dicom_value!(Strs, ["-125", "-125", "42.5"]),
            ),
            DataElement::new(tags::PIXEL_SPACING, VR::DS, dicom_value!(Strs, ["0.5"])),
            DataElement::new(
                tags::IMAGE_TYPE,
                VR::CS,
                dicom_value!(Strs, ["ORIGINAL", "PRIMARY", "AXIAL"]),
            ),
        ])
    }

    #[test]
    fn reads_typed_attributes() {
        let instance = Instance::from_dicom_object(&ct_object(), "dicom:1.2.3.4.1");

        assert_eq!(instance.image_id, "dicom:1.2.3.4.1");
        assert_eq!(instance.modality.as_deref(), Some("CT"));
        assert_eq!(instance.instance_number, Some(7));
        assert_eq!(instance.rows, Some(512));
        assert_eq!(instance.columns, Some(256));
        assert_eq!(instance.image_position_patient, Some([-125.0, -125.0, 42.5]));
        assert_eq!(
            instance.image_orientation_patient,
            Some([1.0, 0.0, 0.0, 0.0, 1.0, 0.0])
        );
        assert_eq!(instance.image_type, vec!["ORIGINAL", "PRIMARY", "AXIAL"]);
    }

    #[test]
    fn wrong_arity_is_treated_as_missing() {
        let instance = Instance::from_dicom_object(&ct_object(), "x");
        assert_eq!(instance.pixel_spacing, None);
        assert_eq!(instance.number_of_frames, None);
        assert!(!instance.is_multi_frame());
        assert_eq!(instance.frame_count(), 1);
    }
}
