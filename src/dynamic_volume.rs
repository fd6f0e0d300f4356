use std::{collections::BTreeMap, sync::Arc};

use crate::instance::Instance;

/// Split of a group of instances into time points.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DynamicVolumeInfo {
    pub is_dynamic_volume: bool,
    /// Image ids per time point, in acquisition order.
    pub time_points: Vec<Vec<String>>,
}

/// Classifies a group of instances as a static or a dynamic (4D) volume.
///
/// The renderer owns this decision; implementations bridge to whatever it
/// uses.
pub trait DynamicVolumeDetector: Send + Sync {
    fn detect(&self, instances: &[Arc<Instance>]) -> DynamicVolumeInfo;
}

impl<F> DynamicVolumeDetector for F
where
    F: Fn(&[Arc<Instance>]) -> DynamicVolumeInfo + Send + Sync,
{
    fn detect(&self, instances: &[Arc<Instance>]) -> DynamicVolumeInfo {
        self(instances)
    }
}

/// Treats every group as a static volume.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticVolumes;

impl DynamicVolumeDetector for StaticVolumes {
    fn detect(&self, _instances: &[Arc<Instance>]) -> DynamicVolumeInfo {
        DynamicVolumeInfo::default()
    }
}

/// Splits by TemporalPositionIdentifier
///
/// A group is dynamic when every instance carries the attribute, there are at
/// least two distinct values and every time point holds the same number of
/// instances.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemporalPositionDetector;

impl DynamicVolumeDetector for TemporalPositionDetector {
    fn detect(&self, instances: &[Arc<Instance>]) -> DynamicVolumeInfo {
        let mut by_time_point: BTreeMap<i32, Vec<String>> = BTreeMap::new();
        for instance in instances {
            let Some(time_point) = instance.temporal_position_identifier else {
                return DynamicVolumeInfo::default();
            };
            by_time_point
                .entry(time_point)
                .or_default()
                .push(instance.image_id.clone());
        }

        let time_points: Vec<Vec<String>> = by_time_point.into_values().collect();
        let uniform = time_points
            .windows(2)
            .all(|pair| pair[0].len() == pair[1].len());

        if time_points.len() < 2 || !uniform {
            return DynamicVolumeInfo::default();
        }

        DynamicVolumeInfo {
            is_dynamic_volume: true,
            time_points,
        }
    }
}
