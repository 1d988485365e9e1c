use super::sphere::Sphere;
use nalgebra::Point3;

/// A probe sphere placed during a detection run.
///
/// Probes are owned by exactly one run. Layer 0 probes carry the solvent probe
/// radius; probes grown by accretion carry the accretion radius.
#[derive(Debug, Clone, PartialEq)]
pub struct Probe {
    /// Position and current radius of the probe.
    pub sphere: Sphere,
    /// Number of atoms whose centers lie within the burial radius of the probe center.
    pub burial_count: usize,
    /// Placement layer: 0 for triplets of atoms, `n >= 1` for the n-th accretion pass.
    pub layer: usize,
    clipping: Option<Vec<usize>>,
}

impl Probe {
    pub fn new(center: Point3<f64>, radius: f64, burial_count: usize, layer: usize) -> Self {
        Self {
            sphere: Sphere::new(center, radius),
            burial_count,
            layer,
            clipping: None,
        }
    }

    #[inline]
    pub fn center(&self) -> &Point3<f64> {
        &self.sphere.center
    }

    /// Indices of probes that clip this one, empty until the first is recorded.
    pub fn clipping(&self) -> &[usize] {
        self.clipping.as_deref().unwrap_or(&[])
    }

    pub fn add_clipping(&mut self, probe_index: usize) {
        self.clipping.get_or_insert_with(Vec::new).push(probe_index);
    }
}
