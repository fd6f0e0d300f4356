//! User facing warnings attached to display sets.

use std::{fmt, sync::Arc};

use crate::{
    config::DisplaySetConfig, enums::ReconstructionIssue, instance::Instance,
    reconstructability::Reconstructability,
};

/// Warning codes understood by the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DisplaySetMessage {
    NoValidInstances = 1,
    NoPositionInformation = 2,
    NotReconstructable = 3,
    MultiframeNoPixelMeasurements = 4,
    MultiframeNoOrientation = 5,
    MultiframeNoPositionInformation = 6,
    MissingFrames = 7,
    IrregularSpacing = 8,
    InconsistentDimensions = 9,
    InconsistentComponents = 10,
    InconsistentOrientations = 11,
    InconsistentPositionInformation = 12,
    UnsupportedDisplaySet = 13,
}

impl DisplaySetMessage {
    pub fn code(&self) -> u8 {
        *self as u8
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoValidInstances => "NO_VALID_INSTANCES",
            Self::NoPositionInformation => "NO_POSITION_INFORMATION",
            Self::NotReconstructable => "NOT_RECONSTRUCTABLE",
            Self::MultiframeNoPixelMeasurements => "MULTIFRAME_NO_PIXEL_MEASUREMENTS",
            Self::MultiframeNoOrientation => "MULTIFRAME_NO_ORIENTATION",
            Self::MultiframeNoPositionInformation => "MULTIFRAME_NO_POSITION_INFORMATION",
            Self::MissingFrames => "MISSING_FRAMES",
            Self::IrregularSpacing => "IRREGULAR_SPACING",
            Self::InconsistentDimensions => "INCONSISTENT_DIMENSIONS",
            Self::InconsistentComponents => "INCONSISTENT_COMPONENTS",
            Self::InconsistentOrientations => "INCONSISTENT_ORIENTATIONS",
            Self::InconsistentPositionInformation => "INCONSISTENT_POSITION_INFORMATION",
            Self::UnsupportedDisplaySet => "UNSUPPORTED_DISPLAYSET",
        }
    }
}

impl fmt::Display for DisplaySetMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<ReconstructionIssue> for DisplaySetMessage {
    fn from(issue: ReconstructionIssue) -> Self {
        match issue {
            ReconstructionIssue::VaryingImagesDimensions => Self::InconsistentDimensions,
            ReconstructionIssue::VaryingImagesComponents => Self::InconsistentComponents,
            ReconstructionIssue::VaryingImagesOrientation => Self::InconsistentOrientations,
            ReconstructionIssue::Dataset4D => Self::InconsistentPositionInformation,
            ReconstructionIssue::MissingFrames => Self::MissingFrames,
            ReconstructionIssue::IrregularSpacing => Self::IrregularSpacing,
        }
    }
}

/// Ordered set of messages; adding a message twice keeps the first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplaySetMessageList {
    messages: Vec<DisplaySetMessage>,
}

impl DisplaySetMessageList {
    pub fn add(&mut self, message: DisplaySetMessage) {
        if !self.messages.contains(&message) {
            self.messages.push(message);
        }
    }

    pub fn contains(&self, message: DisplaySetMessage) -> bool {
        self.messages.contains(&message)
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = DisplaySetMessage> + '_ {
        self.messages.iter().copied()
    }

    pub fn codes(&self) -> Vec<u8> {
        self.iter().map(|message| message.code()).collect()
    }
}

/// Collect the warnings the viewer shows for a display set
///
/// Dynamic volumes, localizers and modalities that are never reconstructed
/// carry no messages. `instances` should already be in display order.
pub fn get_display_set_messages(
    instances: &[Arc<Instance>],
    reconstructability: &Reconstructability,
    is_dynamic_volume: bool,
    config: &DisplaySetConfig,
) -> DisplaySetMessageList {
    let mut messages = DisplaySetMessageList::default();
    if is_dynamic_volume {
        return messages;
    }

    let Some(first) = instances.first() else {
        messages.add(DisplaySetMessage::NoValidInstances);
        return messages;
    };

    if !instances.iter().any(|instance| instance.is_image()) {
        messages.add(DisplaySetMessage::UnsupportedDisplaySet);
        return messages;
    }

    if first.image_type.iter().any(|value| value == "LOCALIZER")
        || !config.is_reconstructable_modality(first.modality.as_deref())
    {
        return messages;
    }

    if first.is_multi_frame() {
        check_multi_frame(first, &mut messages);
    } else {
        if !instances
            .iter()
            .all(|instance| instance.image_position_patient.is_some())
        {
            messages.add(DisplaySetMessage::NoPositionInformation);
        }
        if instances.len() > 2 {
            for issue in &reconstructability.reconstruction_issues {
                messages.add((*issue).into());
            }
        }
    }

    if !reconstructability.value {
        messages.add(DisplaySetMessage::NotReconstructable);
    }

    messages
}

fn check_multi_frame(instance: &Instance, messages: &mut DisplaySetMessageList) {
    if instance.pixel_spacing.is_none() {
        messages.add(DisplaySetMessage::MultiframeNoPixelMeasurements);
    }
    if instance.image_orientation_patient.is_none() {
        messages.add(DisplaySetMessage::MultiframeNoOrientation);
    }
    if instance.image_position_patient.is_none() {
        messages.add(DisplaySetMessage::MultiframeNoPositionInformation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ct(id: &str) -> Instance {
        Instance {
            modality: Some("CT".into()),
            rows: Some(64),
            columns: Some(64),
            ..Instance::new(id)
        }
    }

    fn positioned(ids: &[&str]) -> Vec<Arc<Instance>> {
        ids.iter()
            .map(|id| {
                Arc::new(Instance {
                    image_position_patient: Some([0.0, 0.0, 0.0]),
                    ..ct(id)
                })
            })
            .collect()
    }

    fn not_reconstructable(issues: &[ReconstructionIssue]) -> Reconstructability {
        Reconstructability {
            reconstruction_issues: issues.to_vec(),
            ..Default::default()
        }
    }

    #[test]
    fn empty_group_has_no_valid_instances() {
        let messages = get_display_set_messages(
            &[],
            &Reconstructability::default(),
            false,
            &DisplaySetConfig::default(),
        );
        assert_eq!(messages.codes(), [1]);
    }

    #[test]
    fn dynamic_volumes_and_localizers_are_silent() {
        let config = DisplaySetConfig::default();
        let instances = [Arc::new(ct("a"))];
        let verdict = Reconstructability::default();
        assert!(get_display_set_messages(&instances, &verdict, true, &config).is_empty());

        let localizer = [Arc::new(Instance {
            image_type: vec!["ORIGINAL".into(), "PRIMARY".into(), "LOCALIZER".into()],
            ..ct("loc")
        })];
        assert!(get_display_set_messages(&localizer, &verdict, false, &config).is_empty());
    }

    #[test]
    fn non_image_group_is_unsupported() {
        let report = [Arc::new(Instance {
            sop_class_uid: Some("1.2.840.10008.5.1.4.1.1.88.33".into()),
            modality: Some("SR".into()),
            ..Instance::new("sr")
        })];
        let messages = get_display_set_messages(
            &report,
            &Reconstructability::default(),
            false,
            &DisplaySetConfig::default(),
        );
        assert!(messages.contains(DisplaySetMessage::UnsupportedDisplaySet));
    }

    #[test]
    fn multi_frame_without_geometry() {
        let cine = [Arc::new(Instance {
            number_of_frames: Some(20),
            ..ct("cine")
        })];
        let messages = get_display_set_messages(
            &cine,
            &Reconstructability::default(),
            false,
            &DisplaySetConfig::default(),
        );
        assert_eq!(messages.codes(), [4, 5, 6, 3]);
    }

    #[test]
    fn single_frame_issues_are_mapped() {
        let instances: Vec<_> = ["a", "b", "c"].map(|id| Arc::new(ct(id))).to_vec();
        let verdict = not_reconstructable(&[ReconstructionIssue::VaryingImagesDimensions]);
        let messages =
            get_display_set_messages(&instances, &verdict, false, &DisplaySetConfig::default());
        assert!(messages.contains(DisplaySetMessage::NoPositionInformation));
        assert!(messages.contains(DisplaySetMessage::InconsistentDimensions));
        assert!(messages.contains(DisplaySetMessage::NotReconstructable));
        assert_eq!(messages.len(), 3);
    }

    #[test]
    fn spacing_and_position_issues_are_mapped() {
        let config = DisplaySetConfig::default();
        let instances = positioned(&["a", "b", "c"]);
        let cases = [
            (
                ReconstructionIssue::Dataset4D,
                DisplaySetMessage::InconsistentPositionInformation,
            ),
            (
                ReconstructionIssue::IrregularSpacing,
                DisplaySetMessage::IrregularSpacing,
            ),
            (
                ReconstructionIssue::VaryingImagesComponents,
                DisplaySetMessage::InconsistentComponents,
            ),
            (
                ReconstructionIssue::VaryingImagesOrientation,
                DisplaySetMessage::InconsistentOrientations,
            ),
        ];

        for (issue, expected) in cases {
            let verdict = not_reconstructable(&[issue]);
            let messages = get_display_set_messages(&instances, &verdict, false, &config);
            assert_eq!(
                messages.iter().collect::<Vec<_>>(),
                [expected, DisplaySetMessage::NotReconstructable]
            );
        }
    }

    #[test]
    fn missing_frames_keep_the_set_reconstructable() {
        let verdict = Reconstructability {
            value: true,
            reconstruction_issues: vec![ReconstructionIssue::MissingFrames],
            missing_frames: Some(2),
            average_spacing_between_frames: Some(1.0),
        };
        let messages = get_display_set_messages(
            &positioned(&["a", "b", "c"]),
            &verdict,
            false,
            &DisplaySetConfig::default(),
        );
        assert_eq!(messages.codes(), [7]);
    }

    #[test]
    fn two_instance_sets_skip_issue_messages() {
        let verdict = not_reconstructable(&[ReconstructionIssue::IrregularSpacing]);
        let messages = get_display_set_messages(
            &positioned(&["a", "b"]),
            &verdict,
            false,
            &DisplaySetConfig::default(),
        );
        assert_eq!(messages.codes(), [3]);
    }
}
