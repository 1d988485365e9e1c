use crate::core::models::sphere::Sphere;
use nalgebra::Point3;
use std::collections::HashMap;

type CellKey = [i64; 3];

/// Uniform cubic grid over point ids.
///
/// `query_near` returns every id stored in the 27 cells surrounding the query
/// point's cell, so any stored point closer than one cell edge is included.
/// Results are candidates only; callers re-check the exact distance.
#[derive(Debug, Clone)]
pub struct SpatialIndex {
    cell_size: f64,
    cells: HashMap<CellKey, Vec<usize>>,
}

impl SpatialIndex {
    pub fn new(cell_size: f64) -> Self {
        debug_assert!(cell_size.is_finite() && cell_size > 0.0);
        Self {
            cell_size,
            cells: HashMap::new(),
        }
    }

    /// Builds the index over an atom set with the cell size the placement and
    /// burial queries need: `2 * max_radius + 2 * probe_radius`, widened to at
    /// least `burial_radius`.
    pub fn for_atoms(atoms: &[Sphere], probe_radius: f64, burial_radius: f64) -> Self {
        let max_radius = atoms.iter().map(|a| a.radius).fold(0.0_f64, f64::max);
        let cell_size = (2.0 * max_radius + 2.0 * probe_radius).max(burial_radius);

        let mut index = Self::new(cell_size);
        for (id, atom) in atoms.iter().enumerate() {
            index.insert(id, &atom.center);
        }
        index
    }

    #[inline]
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    pub fn insert(&mut self, id: usize, point: &Point3<f64>) {
        self.cells.entry(self.key(point)).or_default().push(id);
    }

    pub fn query_near(&self, point: &Point3<f64>) -> Vec<usize> {
        let mut ids = Vec::new();
        self.visit_within(point, self.cell_size, |id| ids.push(id));
        ids
    }

    /// Number of `atoms` whose centers lie strictly within `radius` of `point`.
    pub fn count_within(&self, point: &Point3<f64>, radius: f64, atoms: &[Sphere]) -> usize {
        let radius_sq = radius * radius;
        let mut count = 0;
        self.visit_within(point, radius, |id| {
            if atoms[id].distance_squared_to(point) < radius_sq {
                count += 1;
            }
        });
        count
    }

    /// Whether a sphere of radius `inflation` at `point` overlaps any of `atoms`.
    ///
    /// Only the 27 surrounding cells are scanned, so `atom.radius + inflation`
    /// must not exceed the cell size. [`SpatialIndex::for_atoms`] guarantees this
    /// for any inflation up to the probe radius.
    pub fn any_overlap(&self, point: &Point3<f64>, inflation: f64, atoms: &[Sphere]) -> bool {
        let mut hit = false;
        self.visit_within(point, self.cell_size, |id| {
            hit = hit || atoms[id].overlaps(point, inflation);
        });
        hit
    }

    /// Calls `visit` for every id stored in the cells that could hold a point
    /// within `reach` of `point`. The visit is conservative; distances are not checked.
    pub fn visit_within(&self, point: &Point3<f64>, reach: f64, mut visit: impl FnMut(usize)) {
        let span = (reach / self.cell_size).ceil().max(1.0) as i64;
        let [cx, cy, cz] = self.key(point);
        for dx in -span..=span {
            for dy in -span..=span {
                for dz in -span..=span {
                    if let Some(ids) = self.cells.get(&[cx + dx, cy + dy, cz + dz]) {
                        ids.iter().copied().for_each(&mut visit);
                    }
                }
            }
        }
    }

    #[inline]
    fn key(&self, point: &Point3<f64>) -> CellKey {
        [
            (point.x / self.cell_size).floor() as i64,
            (point.y / self.cell_size).floor() as i64,
            (point.z / self.cell_size).floor() as i64,
        ]
    }
}
