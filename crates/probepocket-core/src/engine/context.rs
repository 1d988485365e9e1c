use super::config::PocketConfig;
use super::progress::ProgressReporter;
use super::spatial::SpatialIndex;
use crate::core::geometry::triple_placer::TriplePlacer;
use crate::core::models::sphere::Sphere;
use nalgebra::Point3;

/// Read-only state shared by every task of one detection run.
#[derive(Clone, Copy)]
pub struct DetectionContext<'a, P>
where
    P: TriplePlacer,
{
    pub atoms: &'a [Sphere],
    pub config: &'a PocketConfig,
    pub index: &'a SpatialIndex,
    pub placer: &'a P,
    pub reporter: &'a ProgressReporter<'a>,
    pub max_atom_radius: f64,
}

impl<'a, P> DetectionContext<'a, P>
where
    P: TriplePlacer,
{
    pub fn new(
        atoms: &'a [Sphere],
        config: &'a PocketConfig,
        index: &'a SpatialIndex,
        placer: &'a P,
        reporter: &'a ProgressReporter<'a>,
    ) -> Self {
        Self {
            atoms,
            config,
            index,
            placer,
            reporter,
            max_atom_radius: atoms.iter().map(|a| a.radius).fold(0.0, f64::max),
        }
    }

    /// Number of atom centers strictly within the burial radius of `point`.
    #[inline]
    pub fn burial_count(&self, point: &Point3<f64>) -> usize {
        self.index
            .count_within(point, self.config.burial.radius, self.atoms)
    }

    /// Whether a solvent probe centered at `point` would overlap an atom.
    #[inline]
    pub fn clashes_with_atoms(&self, point: &Point3<f64>) -> bool {
        self.index
            .any_overlap(point, self.config.probe_radius, self.atoms)
    }
}
