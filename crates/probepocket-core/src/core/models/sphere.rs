use nalgebra::Point3;

/// A sphere in Cartesian space, in Angstroms.
///
/// Atoms (center + van der Waals radius) and probes share this representation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    /// The sphere center.
    pub center: Point3<f64>,
    /// The sphere radius.
    pub radius: f64,
}

impl Sphere {
    pub const fn new(center: Point3<f64>, radius: f64) -> Self {
        Self { center, radius }
    }

    pub const fn from_coords(x: f64, y: f64, z: f64, radius: f64) -> Self {
        Self {
            center: Point3::new(x, y, z),
            radius,
        }
    }

    #[inline]
    pub fn distance_squared_to(&self, point: &Point3<f64>) -> f64 {
        (self.center - point).norm_squared()
    }

    /// Returns `true` if a sphere of radius `inflation` centered at `point`
    /// overlaps this sphere (strict inequality, touching is not overlap).
    #[inline]
    pub fn overlaps(&self, point: &Point3<f64>, inflation: f64) -> bool {
        let limit = self.radius + inflation;
        self.distance_squared_to(point) < limit * limit
    }

    /// Reason this sphere cannot take part in a run, if any.
    pub fn invalid_reason(&self) -> Option<&'static str> {
        if !(self.center.x.is_finite() && self.center.y.is_finite() && self.center.z.is_finite())
        {
            Some("center has non-finite coordinates")
        } else if !self.radius.is_finite() {
            Some("radius is not finite")
        } else if self.radius <= 0.0 {
            Some("radius must be positive")
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlap_is_strict_at_contact_distance() {
        let atom = Sphere::from_coords(0.0, 0.0, 0.0, 1.5);
        assert!(!atom.overlaps(&Point3::new(3.0, 0.0, 0.0), 1.5));
        assert!(atom.overlaps(&Point3::new(2.99, 0.0, 0.0), 1.5));
    }

    #[test]
    fn distance_squared_matches_coordinates() {
        let sphere = Sphere::from_coords(1.0, 2.0, 3.0, 1.0);
        assert_eq!(sphere.distance_squared_to(&Point3::new(1.0, 4.0, 3.0)), 4.0);
    }

    #[test]
    fn invalid_reason_flags_bad_spheres() {
        assert!(Sphere::from_coords(0.0, 0.0, 0.0, 1.7).invalid_reason().is_none());
        assert_eq!(
            Sphere::from_coords(f64::NAN, 0.0, 0.0, 1.7).invalid_reason(),
            Some("center has non-finite coordinates")
        );
        assert_eq!(
            Sphere::from_coords(0.0, 0.0, 0.0, 0.0).invalid_reason(),
            Some("radius must be positive")
        );
        assert_eq!(
            Sphere::from_coords(0.0, 0.0, 0.0, f64::INFINITY).invalid_reason(),
            Some("radius is not finite")
        );
    }
}
