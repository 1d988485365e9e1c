use crate::core::geometry::triple_placer::TriplePlacer;
use crate::core::models::pocket::PocketSphere;
use crate::core::models::probe::Probe;
use crate::engine::context::DetectionContext;
use itertools::Itertools;
use tracing::{debug, info, instrument};

/// Keeps the probes that sit inside locally dense clusters and re-tags them as
/// pocket spheres.
///
/// A probe is kept when at least `min_dense_neighbors` of its cutoff neighbors
/// themselves have at least `min_dense_neighbors` cutoff neighbors. Kept probes
/// take the solvent probe radius and a freshly computed burial count, and
/// record which other kept spheres overlap them.
#[instrument(skip_all, name = "pocket_selection_task")]
pub fn run<P: TriplePlacer>(probes: Vec<Probe>, context: &DetectionContext<P>) -> Vec<PocketSphere> {
    let selection = &context.config.selection;
    let cutoff_sq = selection.cutoff * selection.cutoff;
    let min_neighbors = selection.min_dense_neighbors;

    let close_pairs: Vec<(usize, usize)> = (0..probes.len())
        .tuple_combinations()
        .filter(|&(a, b)| probes[a].sphere.distance_squared_to(probes[b].center()) < cutoff_sq)
        .collect();

    let mut neighbor_counts = vec![0usize; probes.len()];
    for &(a, b) in &close_pairs {
        neighbor_counts[a] += 1;
        neighbor_counts[b] += 1;
    }

    let mut dense_counts = vec![0usize; probes.len()];
    for &(a, b) in &close_pairs {
        if neighbor_counts[a] >= min_neighbors && neighbor_counts[b] >= min_neighbors {
            dense_counts[a] += 1;
            dense_counts[b] += 1;
        }
    }

    let probe_radius = context.config.probe_radius;
    let mut selected: Vec<Probe> = probes
        .into_iter()
        .zip(dense_counts)
        .filter(|(_, dense)| *dense >= min_neighbors)
        .map(|(probe, _)| {
            let burial_count = context.burial_count(probe.center());
            Probe::new(*probe.center(), probe_radius, burial_count, probe.layer)
        })
        .collect();

    debug!(
        close_pairs = close_pairs.len(),
        selected = selected.len(),
        "Density filter applied."
    );

    let contact_sq = (2.0 * probe_radius) * (2.0 * probe_radius);
    let overlapping: Vec<(usize, usize)> = (0..selected.len())
        .tuple_combinations()
        .filter(|&(a, b)| selected[a].sphere.distance_squared_to(selected[b].center()) < contact_sq)
        .collect();
    for (a, b) in overlapping {
        selected[a].add_clipping(b);
        selected[b].add_clipping(a);
    }

    info!(pocket_spheres = selected.len(), "Pocket sphere selection complete.");
    selected.into_iter().map(PocketSphere::from).collect()
}
