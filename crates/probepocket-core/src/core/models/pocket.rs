use super::probe::Probe;
use nalgebra::Point3;

/// A reported pocket pseudo-atom.
#[derive(Debug, Clone, PartialEq)]
pub struct PocketSphere {
    /// Center of the selected probe.
    pub center: Point3<f64>,
    /// Always the solvent probe radius, whatever layer the probe came from.
    pub radius: f64,
    /// Burial count recomputed at emission time.
    pub score: usize,
    /// Indices (into the same pocket-sphere list) of spheres overlapping this one.
    pub clipping: Vec<usize>,
}

impl From<Probe> for PocketSphere {
    fn from(probe: Probe) -> Self {
        let clipping = probe.clipping().to_vec();
        Self {
            center: probe.sphere.center,
            radius: probe.sphere.radius,
            score: probe.burial_count,
            clipping,
        }
    }
}

/// A connected group of pocket spheres.
#[derive(Debug, Clone, PartialEq)]
pub struct Pocket {
    /// 1-based rank; 1 is the largest pocket.
    pub rank: usize,
    /// Indices into the pocket-sphere list, ascending.
    pub sphere_indices: Vec<usize>,
    /// Unweighted mean of member sphere centers.
    pub centroid: Point3<f64>,
    /// Sum of member scores.
    pub total_burial: usize,
    /// Highest member score.
    pub max_burial: usize,
    /// Indices of atoms in contact with any member sphere, ascending and unique.
    pub lining_atoms: Vec<usize>,
}

impl Pocket {
    pub fn sphere_count(&self) -> usize {
        self.sphere_indices.len()
    }

    pub fn mean_burial(&self) -> f64 {
        if self.sphere_indices.is_empty() {
            0.0
        } else {
            self.total_burial as f64 / self.sphere_indices.len() as f64
        }
    }
}
