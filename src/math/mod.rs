/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// Color and displacement sample: `(r, g, b, displacement)`.
pub type Texel = nalgebra::Vector4<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Tolerance for checking that interpolation weights sum to one.
pub const WEIGHT_TOLERANCE: f64 = 1e-9;

/// Linearly interpolates two points.
#[must_use]
pub fn lerp_point(a: &Point3, b: &Point3, t: f64) -> Point3 {
    a + (b - a) * t
}

/// Normalizes `v`, returning `None` when it is (near) zero-length.
#[must_use]
pub fn try_normalize(v: &Vector3) -> Option<Vector3> {
    v.try_normalize(TOLERANCE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lerp_midpoint() {
        let m = lerp_point(&Point3::new(0.0, 0.0, 0.0), &Point3::new(2.0, 4.0, -2.0), 0.5);
        assert!((m - Point3::new(1.0, 2.0, -1.0)).norm() < TOLERANCE);
    }

    #[test]
    fn zero_vector_does_not_normalize() {
        assert!(try_normalize(&Vector3::zeros()).is_none());
        let n = try_normalize(&Vector3::new(0.0, 3.0, 0.0));
        assert!(n.is_some_and(|n| (n.y - 1.0).abs() < TOLERANCE));
    }
}
