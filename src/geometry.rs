use nalgebra::Vector3;

pub(crate) struct Geometry;

impl Geometry {
    #[inline]
    pub(crate) fn position(image_position_patient: &[f64; 3]) -> Vector3<f64> {
        Vector3::from_column_slice(image_position_patient)
    }

    /// Normal of the image plane: row cosines x column cosines.
    pub(crate) fn scan_axis_normal(image_orientation_patient: &[f64; 6]) -> Vector3<f64> {
        let row = Vector3::from_column_slice(&image_orientation_patient[..3]);
        let column = Vector3::from_column_slice(&image_orientation_patient[3..]);
        row.cross(&column)
    }

    /// Signed distance of `position` from the plane through `reference`.
    /// Positive when `position` lies behind the reference along `normal`.
    #[inline]
    pub(crate) fn distance_to_reference(
        reference: &Vector3<f64>,
        position: &Vector3<f64>,
        normal: &Vector3<f64>,
    ) -> f64 {
        (reference - position).dot(normal)
    }

    /// Unsigned distance between two positions along `normal`.
    #[inline]
    pub(crate) fn projected_distance(
        a: &Vector3<f64>,
        b: &Vector3<f64>,
        normal: &Vector3<f64>,
    ) -> f64 {
        (a - b).dot(normal).abs()
    }

    pub(crate) fn is_same_orientation(a: &[f64; 6], b: &[f64; 6], tolerance: f64) -> bool {
        a.iter().zip(b).all(|(x, y)| (x - y).abs() < tolerance)
    }

    pub(crate) fn is_same_position(a: &[f64; 3], b: &[f64; 3], tolerance: f64) -> bool {
        a.iter().zip(b).all(|(x, y)| (x - y).abs() < tolerance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const AXIAL: [f64; 6] = [1.0, 0.0, 0.0, 0.0, 1.0, 0.0];

    #[test]
    fn axial_normal_points_along_z() {
        let normal = Geometry::scan_axis_normal(&AXIAL);
        assert_eq!(normal, Vector3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn sagittal_normal_points_along_x() {
        let normal = Geometry::scan_axis_normal(&[0.0, 1.0, 0.0, 0.0, 0.0, -1.0]);
        assert_eq!(normal, Vector3::new(-1.0, 0.0, 0.0));
    }

    #[test]
    fn projected_distance_ignores_in_plane_offsets() {
        let normal = Geometry::scan_axis_normal(&AXIAL);
        let a = Geometry::position(&[10.0, -4.0, 2.5]);
        let b = Geometry::position(&[0.0, 0.0, 0.0]);
        assert!((Geometry::projected_distance(&a, &b, &normal) - 2.5).abs() < 1e-12);
    }

    #[test]
    fn orientation_tolerance_is_exclusive() {
        let tilted = [1.0, 0.0, 0.0, 0.0, 1.0, 0.01];
        assert!(!Geometry::is_same_orientation(&AXIAL, &tilted, 0.01));
        assert!(Geometry::is_same_orientation(&AXIAL, &tilted, 0.02));
    }
}
