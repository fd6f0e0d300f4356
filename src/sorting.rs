use std::{cmp::Ordering, collections::HashSet, sync::Arc};

use crate::{enums::SortBy, geometry::Geometry, instance::Instance};

/// Order instances along the scan axis
///
/// The middle instance is the spatial reference, which keeps a scout image
/// at the start of a series from defining the axis. Every instance with an
/// ImagePositionPatient is projected onto the normal of the reference plane
/// and the instances are ordered by descending distance
/// `dot(reference - position, normal)`, which for an axial acquisition puts
/// the lowest z first.
///
/// Instances without a position keep their slot in the list; when the
/// reference has no orientation or position the input order is returned.
pub fn sort_instances_by_position(instances: &[Arc<Instance>]) -> Vec<Arc<Instance>> {
    if instances.len() <= 1 {
        return instances.to_vec();
    }

    let reference = &instances[instances.len() / 2];
    let (Some(reference_position), Some(orientation)) = (
        reference.image_position_patient.as_ref(),
        reference.image_orientation_patient.as_ref(),
    ) else {
        return instances.to_vec();
    };

    let normal = Geometry::scan_axis_normal(orientation);
    let reference_position = Geometry::position(reference_position);

    let mut positioned: Vec<(f64, &Arc<Instance>)> = instances
        .iter()
        .filter_map(|instance| {
            let position = Geometry::position(instance.image_position_patient.as_ref()?);
            let distance =
                Geometry::distance_to_reference(&reference_position, &position, &normal);
            Some((distance, instance))
        })
        .collect();

    positioned.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));

    let mut sorted = positioned.into_iter().map(|(_, instance)| instance);
    instances
        .iter()
        .map(|instance| {
            let next = if instance.image_position_patient.is_some() {
                sorted.next()
            } else {
                None
            };
            Arc::clone(next.unwrap_or(instance))
        })
        .collect()
}

/// Order by InstanceNumber, treating a missing number as 0.
pub fn sort_instances_by_number(instances: &[Arc<Instance>]) -> Vec<Arc<Instance>> {
    let mut sorted = instances.to_vec();
    sorted.sort_by_key(|instance| instance.instance_number.unwrap_or(0));
    sorted
}

/// Whether every instance carries an InstanceNumber and no two share one.
pub fn has_distinct_instance_numbers(instances: &[Arc<Instance>]) -> bool {
    let mut seen = HashSet::with_capacity(instances.len());
    instances
        .iter()
        .all(|instance| instance.instance_number.is_some_and(|n| seen.insert(n)))
}

pub fn order_instances(instances: &[Arc<Instance>], sort_by: SortBy) -> Vec<Arc<Instance>> {
    match sort_by {
        SortBy::Auto if has_distinct_instance_numbers(instances) => {
            sort_instances_by_number(instances)
        }
        SortBy::Auto | SortBy::ImagePositionPatient => sort_instances_by_position(instances),
        SortBy::InstanceNumber => sort_instances_by_number(instances),
        SortBy::None => instances.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const AXIAL: [f64; 6] = [1.0, 0.0, 0.0, 0.0, 1.0, 0.0];

    fn slice(id: &str, z: Option<f64>, instance_number: Option<i32>) -> Arc<Instance> {
        Arc::new(Instance {
            image_orientation_patient: Some(AXIAL),
            image_position_patient: z.map(|z| [0.0, 0.0, z]),
            instance_number,
            ..Instance::new(id)
        })
    }

    fn ids(instances: &[Arc<Instance>]) -> Vec<&str> {
        instances.iter().map(|i| i.image_id.as_str()).collect()
    }

    #[test]
    fn sorts_ascending_along_axial_normal() {
        let shuffled = [
            slice("z2", Some(2.0), None),
            slice("z0", Some(0.0), None),
            slice("z1", Some(1.0), None),
        ];
        let sorted = sort_instances_by_position(&shuffled);
        assert_eq!(ids(&sorted), ["z0", "z1", "z2"]);

        let again = sort_instances_by_position(&sorted);
        assert_eq!(ids(&again), ids(&sorted));
    }

    #[test]
    fn single_instance_is_unchanged() {
        let one = [slice("only", Some(5.0), None)];
        assert_eq!(ids(&sort_instances_by_position(&one)), ["only"]);
        assert!(sort_instances_by_position(&[]).is_empty());
    }

    #[test]
    fn missing_reference_geometry_keeps_input_order() {
        let instances = [
            slice("a", Some(3.0), None),
            slice("b", None, None),
            slice("c", Some(1.0), None),
        ];
        assert_eq!(ids(&sort_instances_by_position(&instances)), ["a", "b", "c"]);
    }

    #[test]
    fn instances_without_position_keep_their_slot() {
        let instances = [
            slice("z3", Some(3.0), None),
            slice("none", None, None),
            slice("z1", Some(1.0), None),
            slice("z2", Some(2.0), None),
        ];
        assert_eq!(
            ids(&sort_instances_by_position(&instances)),
            ["z1", "none", "z2", "z3"]
        );
    }

    #[test]
    fn auto_prefers_distinct_instance_numbers() {
        let instances = [
            slice("second", Some(0.0), Some(2)),
            slice("first", Some(1.0), Some(1)),
        ];
        assert_eq!(ids(&order_instances(&instances, SortBy::Auto)), ["first", "second"]);
    }

    #[test]
    fn auto_falls_back_to_position_for_duplicate_numbers() {
        let instances = [
            slice("z1", Some(1.0), Some(1)),
            slice("z0", Some(0.0), Some(1)),
        ];
        assert!(!has_distinct_instance_numbers(&instances));
        assert_eq!(ids(&order_instances(&instances, SortBy::Auto)), ["z0", "z1"]);
        assert_eq!(ids(&order_instances(&instances, SortBy::None)), ["z1", "z0"]);
    }

    #[test]
    fn instance_number_sort_is_stable_and_treats_missing_as_zero() {
        let instances = [
            slice("three", Some(0.0), Some(3)),
            slice("unnumbered", Some(1.0), None),
            slice("one-a", Some(2.0), Some(1)),
            slice("zero", Some(3.0), Some(0)),
            slice("one-b", Some(4.0), Some(1)),
        ];
        assert_eq!(
            ids(&order_instances(&instances, SortBy::InstanceNumber)),
            ["unnumbered", "zero", "one-a", "one-b", "three"]
        );
        assert_eq!(
            ids(&order_instances(&instances, SortBy::ImagePositionPatient)),
            ["three", "unnumbered", "one-a", "zero", "one-b"]
        );
    }
}
