use nalgebra::Point3;

const COLLINEAR_TOLERANCE: f64 = 1e-12;
const SINGLE_CONTACT_TOLERANCE: f64 = 1e-9;

/// Places a probe sphere in simultaneous contact with three spheres.
///
/// Implementations return the 0, 1 or 2 probe centers whose distance to
/// `centers[i]` equals `radii[i] + probe_radius` for all three spheres.
pub trait TriplePlacer: Send + Sync {
    fn place(
        &self,
        centers: &[Point3<f64>; 3],
        radii: &[f64; 3],
        probe_radius: f64,
    ) -> Vec<Point3<f64>>;
}

/// The classic three-sphere probe construction.
///
/// The probe center lies on the line where the two radical planes of the
/// inflated spheres intersect; its position along that line is fixed by the
/// contact distance to the first sphere. When two centers exist, the one on the
/// positive side of `(c1 - c0) x (c2 - c0)` comes first.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProbeTriplePlacer;

impl TriplePlacer for ProbeTriplePlacer {
    fn place(
        &self,
        centers: &[Point3<f64>; 3],
        radii: &[f64; 3],
        probe_radius: f64,
    ) -> Vec<Point3<f64>> {
        let reach = radii.map(|r| r + probe_radius);
        let u = centers[1] - centers[0];
        let v = centers[2] - centers[0];

        let normal = u.cross(&v);
        let normal_sq = normal.norm_squared();
        if normal_sq < COLLINEAR_TOLERANCE {
            return Vec::new();
        }

        let uu = u.norm_squared();
        let vv = v.norm_squared();
        let uv = u.dot(&v);
        let reach0_sq = reach[0] * reach[0];
        let a = 0.5 * (reach0_sq - reach[1] * reach[1] + uu);
        let b = 0.5 * (reach0_sq - reach[2] * reach[2] + vv);

        let alpha = (a * vv - b * uv) / normal_sq;
        let beta = (b * uu - a * uv) / normal_sq;
        let in_plane = u * alpha + v * beta;

        let height_sq = reach0_sq - in_plane.norm_squared();
        if height_sq < 0.0 {
            return Vec::new();
        }

        let foot = centers[0] + in_plane;
        let height = height_sq.sqrt();
        if height < SINGLE_CONTACT_TOLERANCE {
            return vec![foot];
        }

        let lift = normal * (height / normal_sq.sqrt());
        vec![foot + lift, foot - lift]
    }
}
