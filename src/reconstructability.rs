use std::sync::Arc;

use log::debug;

use crate::{
    config::DisplaySetConfig, enums::ReconstructionIssue, geometry::Geometry,
    instance::Instance, sorting::sort_instances_by_position,
};

/// Verdict on whether a group of instances can be resampled into a volume.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reconstructability {
    pub value: bool,
    pub reconstruction_issues: Vec<ReconstructionIssue>,
    /// Frames missing from an otherwise regular grid.
    pub missing_frames: Option<u32>,
    pub average_spacing_between_frames: Option<f64>,
}

impl Reconstructability {
    fn rejected(issue: ReconstructionIssue) -> Self {
        Self {
            value: false,
            reconstruction_issues: vec![issue],
            ..Default::default()
        }
    }

    pub fn has_issue(&self, issue: ReconstructionIssue) -> bool {
        self.reconstruction_issues.contains(&issue)
    }
}

enum SpacingIssue {
    MissingFrames(u32),
    Irregular,
}

/// Check whether `instances` form a geometrically consistent volume
///
/// Missing geometry, unsupported modalities and lone single-frame images are
/// not reconstructable without any issue being reported. Multi-frame objects
/// are never reconstructable for now.
pub fn is_display_set_reconstructable(
    instances: &[Arc<Instance>],
    config: &DisplaySetConfig,
) -> Reconstructability {
    let Some(first) = instances.first() else {
        return Reconstructability::default();
    };

    if !config.is_reconstructable_modality(first.modality.as_deref()) {
        return Reconstructability::default();
    }

    if first.is_multi_frame() {
        return process_multi_frame(first);
    }

    if instances.len() < 2 || !instances.iter().all(|instance| instance.has_geometry()) {
        return Reconstructability::default();
    }

    let sorted = sort_instances_by_position(instances);
    process_single_frames(&sorted, config)
}

// TODO: read per-frame functional groups so enhanced multi-frame objects can
// be checked the same way as single-frame stacks.
fn process_multi_frame(_instance: &Instance) -> Reconstructability {
    Reconstructability::default()
}

fn process_single_frames(
    instances: &[Arc<Instance>],
    config: &DisplaySetConfig,
) -> Reconstructability {
    let first = &instances[0];
    let (Some(first_orientation), Some(first_position)) = (
        first.image_orientation_patient.as_ref(),
        first.image_position_patient.as_ref(),
    ) else {
        return Reconstructability::default();
    };

    if let Some(issue) = find_consistency_issue(first, first_orientation, instances, config) {
        debug!("{:?} is not reconstructable: {issue}", first.series_instance_uid);
        return Reconstructability::rejected(issue);
    }

    if has_duplicate_positions(instances, config.position_tolerance) {
        debug!(
            "{:?} repeats slice positions, treating it as a 4D dataset",
            first.series_instance_uid
        );
        return Reconstructability::rejected(ReconstructionIssue::Dataset4D);
    }

    let Some(last_position) = instances[instances.len() - 1].image_position_patient.as_ref()
    else {
        return Reconstructability::default();
    };

    let normal = Geometry::scan_axis_normal(first_orientation);
    let first_position = Geometry::position(first_position);
    let average_spacing = Geometry::projected_distance(
        &first_position,
        &Geometry::position(last_position),
        &normal,
    ) / (instances.len() - 1) as f64;

    if average_spacing <= f64::EPSILON {
        return Reconstructability::rejected(ReconstructionIssue::IrregularSpacing);
    }

    let mut missing_frames = 0;
    let mut previous_position = first_position;
    for instance in &instances[1..] {
        let Some(position) = instance.image_position_patient.as_ref() else {
            return Reconstructability::default();
        };
        let position = Geometry::position(position);
        let spacing = Geometry::projected_distance(&position, &previous_position, &normal);

        match spacing_issue(spacing, average_spacing, config.spacing_tolerance) {
            Some(SpacingIssue::MissingFrames(count)) => missing_frames += count,
            Some(SpacingIssue::Irregular) => {
                debug!(
                    "{:?} has irregular spacing: {spacing} against an average of {average_spacing}",
                    first.series_instance_uid
                );
                return Reconstructability::rejected(ReconstructionIssue::IrregularSpacing);
            }
            None => {}
        }
        previous_position = position;
    }

    let mut result = Reconstructability {
        value: true,
        average_spacing_between_frames: Some(average_spacing),
        ..Default::default()
    };
    if missing_frames > 0 {
        result
            .reconstruction_issues
            .push(ReconstructionIssue::MissingFrames);
        result.missing_frames = Some(missing_frames);
    }
    result
}

/// First difference in dimensions, components or orientation against the
/// first instance.
fn find_consistency_issue(
    first: &Instance,
    first_orientation: &[f64; 6],
    instances: &[Arc<Instance>],
    config: &DisplaySetConfig,
) -> Option<ReconstructionIssue> {
    instances[1..].iter().find_map(|instance| {
        if instance.rows != first.rows || instance.columns != first.columns {
            Some(ReconstructionIssue::VaryingImagesDimensions)
        } else if instance.samples_per_pixel != first.samples_per_pixel {
            Some(ReconstructionIssue::VaryingImagesComponents)
        } else if !instance.image_orientation_patient.is_some_and(|orientation| {
            Geometry::is_same_orientation(
                &orientation,
                first_orientation,
                config.orientation_tolerance,
            )
        }) {
            Some(ReconstructionIssue::VaryingImagesOrientation)
        } else {
            None
        }
    })
}

/// Two slices at the same position usually mean several time points were
/// acquired at one location. Temporal tags are not always available, so this
/// stays a heuristic.
fn has_duplicate_positions(instances: &[Arc<Instance>], tolerance: f64) -> bool {
    let positions: Vec<&[f64; 3]> = instances
        .iter()
        .filter_map(|instance| instance.image_position_patient.as_ref())
        .collect();

    positions.iter().enumerate().any(|(i, a)| {
        positions[i + 1..]
            .iter()
            .any(|b| Geometry::is_same_position(a, b, tolerance))
    })
}

fn spacing_issue(spacing: f64, average_spacing: f64, tolerance: f64) -> Option<SpacingIssue> {
    if (spacing - average_spacing).abs() < average_spacing * tolerance {
        return None;
    }

    let number_of_spacings = (spacing / average_spacing).round();
    if number_of_spacings < 1.0 {
        return Some(SpacingIssue::Irregular);
    }

    let error_per_spacing =
        (spacing - number_of_spacings * average_spacing).abs() / number_of_spacings;
    if error_per_spacing < tolerance * average_spacing {
        Some(SpacingIssue::MissingFrames(number_of_spacings as u32 - 1))
    } else {
        Some(SpacingIssue::Irregular)
    }
}
