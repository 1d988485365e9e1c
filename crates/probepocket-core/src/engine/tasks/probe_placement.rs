use super::{Candidate, evaluate_triplets};
use crate::core::geometry::triple_placer::TriplePlacer;
use crate::core::models::sphere::Sphere;
use crate::engine::context::DetectionContext;
use crate::engine::neighbors::NeighborGraph;
use crate::engine::probe_set::{ProbeSet, WeedOutcome};
use nalgebra::Point3;
use tracing::{debug, info, instrument};

/// Places the layer-0 probes: solvent spheres touching three mutually
/// neighboring atoms without overlapping any other atom.
#[instrument(skip_all, name = "probe_placement_task")]
pub fn run<P: TriplePlacer>(context: &DetectionContext<P>) -> ProbeSet {
    let config = context.config;
    let probe_radius = config.probe_radius;

    let graph = NeighborGraph::build(context.atoms, probe_radius);
    let triplets = graph.triplets();
    info!(
        atoms = context.atoms.len(),
        edges = graph.edge_count(),
        max_neighbors = graph.max_count(),
        triplets = triplets.len(),
        "Placing layer-0 probes."
    );

    let candidates = evaluate_triplets(&triplets, context.reporter, |triplet, out| {
        let [i, j, k] = triplet;
        let centers = [
            context.atoms[i].center,
            context.atoms[j].center,
            context.atoms[k].center,
        ];
        let radii = [
            context.atoms[i].radius,
            context.atoms[j].radius,
            context.atoms[k].radius,
        ];

        for center in context.placer.place(&centers, &radii, probe_radius) {
            if is_obscured(context.atoms, &graph, triplet, &center, probe_radius) {
                continue;
            }
            let burial_count = context.burial_count(&center);
            if burial_count < config.burial.threshold {
                continue;
            }
            out.push(Candidate {
                center,
                burial_count,
                triplet,
            });
        }
    });

    let mut probes = ProbeSet::new(config.weed_distance_sq);
    let (mut replaced, mut retired) = (0, 0);
    for candidate in &candidates {
        let outcome =
            probes.weed_insert(candidate.center, candidate.burial_count, probe_radius, 0);
        if matches!(outcome, WeedOutcome::Replaced { .. }) {
            replaced += 1;
            retired += outcome.retired();
        }
    }

    debug!(
        candidates = candidates.len(),
        replaced, retired, "Weeded layer-0 candidates."
    );
    info!(probes = probes.len(), "Layer-0 placement complete.");
    probes
}

/// Whether a probe at `center` overlaps any atom adjacent to the generating
/// triplet, checking the neighbors of `k`, then `i`, then `j`.
fn is_obscured(
    atoms: &[Sphere],
    graph: &NeighborGraph,
    [i, j, k]: [usize; 3],
    center: &Point3<f64>,
    probe_radius: f64,
) -> bool {
    [k, i, j].into_iter().any(|owner| {
        graph
            .neighbors(owner)
            .iter()
            .filter(|&&m| m != i && m != j && m != k)
            .any(|&m| atoms[m].overlaps(center, probe_radius))
    })
}
