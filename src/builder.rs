use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use log::debug;
use uuid::Uuid;

use crate::{
    config::{ConfigError, DisplaySetConfig},
    display_set::{DisplaySet, DisplaySetError, SeriesInfo},
    dynamic_volume::{DynamicVolumeDetector, StaticVolumes},
    enums::VolumeLoaderScheme,
    instance::Instance,
    messages::get_display_set_messages,
    metadata::{Attribute, MetadataLayers},
    reconstructability::is_display_set_reconstructable,
    sorting::order_instances,
    split_rules::{SplitGroup, SplitRule, split_instances},
};

/// Produces the thumbnail URL of a display set from its first instance.
pub trait ThumbnailUrlResolver: Send + Sync {
    fn thumbnail_url(&self, instance: &Instance) -> Option<String>;
}

impl<F> ThumbnailUrlResolver for F
where
    F: Fn(&Instance) -> Option<String> + Send + Sync,
{
    fn thumbnail_url(&self, instance: &Instance) -> Option<String> {
        self(instance)
    }
}

/// Everything display set construction depends on besides the instances.
#[derive(Clone)]
pub struct BuildContext {
    pub config: DisplaySetConfig,
    pub split_rules: Vec<SplitRule>,
    pub dynamic_volume_detector: Arc<dyn DynamicVolumeDetector>,
    pub thumbnail_resolver: Option<Arc<dyn ThumbnailUrlResolver>>,
    /// Series level attributes used when the instances lack them.
    pub series_metadata: Option<Arc<Instance>>,
    /// Study level attributes, consulted after `series_metadata`.
    pub study_metadata: Option<Arc<Instance>>,
}

impl Default for BuildContext {
    fn default() -> Self {
        let config = DisplaySetConfig::default();
        Self {
            split_rules: SplitRule::default_rules(&config.single_image_modalities),
            config,
            dynamic_volume_detector: Arc::new(StaticVolumes),
            thumbnail_resolver: None,
            series_metadata: None,
            study_metadata: None,
        }
    }
}

impl BuildContext {
    /// Context using the split rules of `config`.
    pub fn new(config: DisplaySetConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            split_rules: config.split_rules()?,
            config,
            ..Default::default()
        })
    }

    pub fn with_split_rules(self, split_rules: Vec<SplitRule>) -> Self {
        Self {
            split_rules,
            ..self
        }
    }

    pub fn with_dynamic_volume_detector(
        self,
        detector: impl DynamicVolumeDetector + 'static,
    ) -> Self {
        Self {
            dynamic_volume_detector: Arc::new(detector),
            ..self
        }
    }

    pub fn with_thumbnail_resolver(self, resolver: impl ThumbnailUrlResolver + 'static) -> Self {
        Self {
            thumbnail_resolver: Some(Arc::new(resolver)),
            ..self
        }
    }

    pub fn with_series_metadata(self, series_metadata: Instance) -> Self {
        Self {
            series_metadata: Some(Arc::new(series_metadata)),
            ..self
        }
    }

    pub fn with_study_metadata(self, study_metadata: Instance) -> Self {
        Self {
            study_metadata: Some(Arc::new(study_metadata)),
            ..self
        }
    }
}

/// Build the display sets of one series
///
/// Instances are split with the context's rules and every group becomes one
/// display set, in the order the groups were first seen.
///
/// # Errors
///
/// Returns [`DisplaySetError::NoInstances`] if `instances` is empty.
pub fn get_display_sets_from_series(
    instances: &[Arc<Instance>],
    context: &BuildContext,
) -> Result<Vec<DisplaySet>, DisplaySetError> {
    let groups = split_instances(instances, &context.split_rules)?;
    let sop_class_uids = distinct_sop_class_uids(instances);

    Ok(groups
        .into_iter()
        .map(|group| make_display_set(group, &sop_class_uids, context))
        .collect())
}

fn make_display_set(
    group: SplitGroup,
    sop_class_uids: &[String],
    context: &BuildContext,
) -> DisplaySet {
    let config = &context.config;
    let instances = order_instances(&group.instances, config.sort_by);
    // split groups always hold at least one instance
    let representative = Arc::clone(&instances[0]);

    let dynamic_volume_info = context.dynamic_volume_detector.detect(&instances);
    let is_dynamic_volume = dynamic_volume_info.is_dynamic_volume;
    let reconstructability = if is_dynamic_volume {
        let first_time_point =
            first_time_point_instances(&instances, &dynamic_volume_info.time_points);
        is_display_set_reconstructable(&first_time_point, config)
    } else {
        is_display_set_reconstructable(&instances, config)
    };
    let messages =
        get_display_set_messages(&instances, &reconstructability, is_dynamic_volume, config);

    let layers = MetadataLayers::new(&representative)
        .with_parent(context.series_metadata.as_deref())
        .with_shared(context.study_metadata.as_deref());

    let single_instance = instances.len() == 1;
    let num_image_frames = if single_instance && representative.is_multi_frame() {
        u64::from(representative.frame_count())
    } else {
        instances.len() as u64
    };

    let thumbnail_url = context
        .thumbnail_resolver
        .as_ref()
        .and_then(|resolver| resolver.thumbnail_url(&representative));

    let display_set = DisplaySet {
        display_set_instance_uid: Uuid::new_v5(&Uuid::NAMESPACE_OID, group.key.as_bytes())
            .to_string(),
        split_rule_id: group.rule_id,
        study_instance_uid: layers.resolve_text(Attribute::StudyInstanceUid),
        series_instance_uid: layers.resolve_text(Attribute::SeriesInstanceUid),
        sop_class_uid: layers.resolve_text(Attribute::SopClassUid),
        sop_class_uids: sop_class_uids.to_vec(),
        series_number: layers.resolve_int(Attribute::SeriesNumber).unwrap_or(0),
        series_description: layers
            .resolve_text(Attribute::SeriesDescription)
            .unwrap_or_default(),
        series_date: layers.resolve_text(Attribute::SeriesDate),
        series_time: layers.resolve_text(Attribute::SeriesTime),
        modality: layers.resolve_text(Attribute::Modality),
        frame_rate: representative.frame_time,
        instance_number: single_instance
            .then_some(representative.instance_number)
            .flatten(),
        acquisition_date_time: single_instance
            .then(|| representative.acquisition_date_time.clone())
            .flatten(),
        num_image_frames,
        series_info: SeriesInfo::from_instances(&instances),
        is_multi_frame: representative.is_multi_frame(),
        is_reconstructable: reconstructability.value,
        reconstruction_issues: reconstructability.reconstruction_issues,
        missing_frames: reconstructability.missing_frames,
        average_spacing_between_frames: reconstructability.average_spacing_between_frames,
        is_dynamic_volume,
        volume_loader_scheme: if is_dynamic_volume {
            VolumeLoaderScheme::Dynamic
        } else {
            VolumeLoaderScheme::Standard
        },
        dynamic_volume_info,
        messages,
        thumbnail_url,
        split_key: group.key,
        instances,
    };

    debug!(
        "display set {} ({}): {} instances, reconstructable: {}",
        display_set.display_set_instance_uid,
        display_set.split_key,
        display_set.instances.len(),
        display_set.is_reconstructable
    );

    display_set
}

fn first_time_point_instances(
    instances: &[Arc<Instance>],
    time_points: &[Vec<String>],
) -> Vec<Arc<Instance>> {
    let by_image_id: HashMap<&str, &Arc<Instance>> = instances
        .iter()
        .map(|instance| (instance.image_id.as_str(), instance))
        .collect();

    time_points
        .first()
        .map(|image_ids| {
            image_ids
                .iter()
                .filter_map(|image_id| by_image_id.get(image_id.as_str()))
                .map(|&instance| Arc::clone(instance))
                .collect()
        })
        .unwrap_or_default()
}

fn distinct_sop_class_uids(instances: &[Arc<Instance>]) -> Vec<String> {
    let mut seen = HashSet::new();
    instances
        .iter()
        .filter_map(|instance| instance.sop_class_uid.as_deref())
        .filter(|uid| seen.insert(*uid))
        .map(String::from)
        .collect()
}
