use std::sync::Arc;

use thiserror::Error;

use crate::{
    dynamic_volume::DynamicVolumeInfo,
    enums::{ReconstructionIssue, VolumeLoaderScheme},
    instance::Instance,
    messages::DisplaySetMessageList,
};

#[derive(Debug, Error)]
pub enum DisplaySetError {
    #[error("No instances were provided")]
    NoInstances,
}

/// Counts over the instances of one split group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeriesInfo {
    pub instance_count: usize,
    pub frame_count: u64,
    /// Objects that are neither an image storage class nor carry Rows,
    /// e.g. structured reports or presentation states.
    pub non_image_count: usize,
}

impl SeriesInfo {
    pub fn from_instances(instances: &[Arc<Instance>]) -> Self {
        instances.iter().fold(Self::default(), |mut info, instance| {
            info.instance_count += 1;
            info.frame_count += u64::from(instance.frame_count());
            if !instance.is_image() {
                info.non_image_count += 1;
            }
            info
        })
    }
}

/// A group of instances shown together as one stack or volume.
#[derive(Debug, Clone, Default)]
pub struct DisplaySet {
    pub display_set_instance_uid: String,
    pub split_key: String,
    pub split_rule_id: String,
    pub study_instance_uid: Option<String>,
    pub series_instance_uid: Option<String>,
    pub sop_class_uid: Option<String>,
    pub sop_class_uids: Vec<String>,
    pub series_number: i64,
    pub series_description: String,
    pub series_date: Option<String>,
    pub series_time: Option<String>,
    pub modality: Option<String>,
    pub frame_rate: Option<f64>,
    pub instance_number: Option<i32>,
    pub acquisition_date_time: Option<String>,
    pub instances: Vec<Arc<Instance>>,
    pub num_image_frames: u64,
    pub series_info: SeriesInfo,
    pub is_multi_frame: bool,
    pub is_reconstructable: bool,
    pub reconstruction_issues: Vec<ReconstructionIssue>,
    pub missing_frames: Option<u32>,
    pub average_spacing_between_frames: Option<f64>,
    pub is_dynamic_volume: bool,
    pub dynamic_volume_info: DynamicVolumeInfo,
    pub volume_loader_scheme: VolumeLoaderScheme,
    pub messages: DisplaySetMessageList,
    pub thumbnail_url: Option<String>,
}

impl DisplaySet {
    pub fn image_ids(&self) -> impl Iterator<Item = &str> {
        self.instances.iter().map(|instance| instance.image_id.as_str())
    }

    pub fn first_instance(&self) -> Option<&Arc<Instance>> {
        self.instances.first()
    }
}
