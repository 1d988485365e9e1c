use crate::core::geometry::triple_placer::TriplePlacer;
use crate::core::models::pocket::{Pocket, PocketSphere};
use crate::engine::context::DetectionContext;
use itertools::Itertools;
use nalgebra::{Point3, Vector3};
use std::cmp::Reverse;
use std::collections::{BTreeSet, VecDeque};
use tracing::{debug, info, instrument};

/// Groups pocket spheres into pockets by single linkage at the selection
/// cutoff and ranks them, largest first.
#[instrument(skip_all, name = "pocket_clustering_task")]
pub fn run<P: TriplePlacer>(spheres: &[PocketSphere], context: &DetectionContext<P>) -> Vec<Pocket> {
    let cutoff_sq = context.config.selection.cutoff.powi(2);

    let mut adjacency = vec![Vec::new(); spheres.len()];
    for (a, b) in (0..spheres.len()).tuple_combinations() {
        if (spheres[a].center - spheres[b].center).norm_squared() < cutoff_sq {
            adjacency[a].push(b);
            adjacency[b].push(a);
        }
    }

    let components = connected_components(&adjacency);
    debug!(components = components.len(), "Pocket spheres clustered.");

    let mut pockets: Vec<Pocket> = components
        .into_iter()
        .map(|members| describe_pocket(members, spheres, context))
        .collect();

    pockets.sort_by_key(|p| {
        (
            Reverse(p.sphere_count()),
            Reverse(p.total_burial),
            p.sphere_indices.first().copied(),
        )
    });
    for (position, pocket) in pockets.iter_mut().enumerate() {
        pocket.rank = position + 1;
    }

    if let Some(largest) = pockets.first() {
        info!(
            pockets = pockets.len(),
            largest_spheres = largest.sphere_count(),
            largest_lining_atoms = largest.lining_atoms.len(),
            "Pockets ranked."
        );
    }
    pockets
}

/// Breadth-first components, each sorted ascending, in order of their lowest member.
fn connected_components(adjacency: &[Vec<usize>]) -> Vec<Vec<usize>> {
    let mut visited = vec![false; adjacency.len()];
    let mut components = Vec::new();

    for seed in 0..adjacency.len() {
        if visited[seed] {
            continue;
        }
        visited[seed] = true;
        let mut members = vec![seed];
        let mut queue = VecDeque::from([seed]);
        while let Some(current) = queue.pop_front() {
            for &next in &adjacency[current] {
                if !visited[next] {
                    visited[next] = true;
                    members.push(next);
                    queue.push_back(next);
                }
            }
        }
        members.sort_unstable();
        components.push(members);
    }
    components
}

fn describe_pocket<P: TriplePlacer>(
    members: Vec<usize>,
    spheres: &[PocketSphere],
    context: &DetectionContext<P>,
) -> Pocket {
    let sum: Vector3<f64> = members.iter().map(|&i| spheres[i].center.coords).sum();
    let centroid = Point3::from(sum / members.len() as f64);
    let total_burial = members.iter().map(|&i| spheres[i].score).sum();
    let max_burial = members.iter().map(|&i| spheres[i].score).max().unwrap_or(0);

    let margin = context.config.probe_radius + context.config.selection.lining_margin;
    let reach = context.max_atom_radius + margin;
    let mut lining = BTreeSet::new();
    for &i in &members {
        let center = &spheres[i].center;
        context.index.visit_within(center, reach, |atom| {
            if context.atoms[atom].overlaps(center, margin) {
                lining.insert(atom);
            }
        });
    }

    Pocket {
        rank: 0,
        sphere_indices: members,
        centroid,
        total_burial,
        max_burial,
        lining_atoms: lining.into_iter().collect(),
    }
}
