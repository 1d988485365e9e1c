use crate::core::models::sphere::Sphere;
use std::cmp::Ordering;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Proximity graph over a fixed set of spheres in compressed sparse row layout.
///
/// `j` is a neighbor of `i` when `i != j` and
/// `distance²(i, j) < (r_i + 2 * inflation + r_j)²`. The criterion is symmetric,
/// so every edge is stored from both endpoints. Neighbor lists are ascending.
#[derive(Debug, Clone, Default)]
pub struct NeighborGraph {
    first: Vec<usize>,
    count: Vec<usize>,
    nn: Vec<usize>,
    max_count: usize,
}

impl NeighborGraph {
    pub fn build(spheres: &[Sphere], inflation: f64) -> Self {
        let within_reach = |i: usize| -> Vec<usize> {
            let a = &spheres[i];
            spheres
                .iter()
                .enumerate()
                .filter(|&(j, b)| {
                    let limit = a.radius + 2.0 * inflation + b.radius;
                    j != i && a.distance_squared_to(&b.center) < limit * limit
                })
                .map(|(j, _)| j)
                .collect()
        };

        #[cfg(not(feature = "parallel"))]
        let rows: Vec<Vec<usize>> = (0..spheres.len()).map(within_reach).collect();

        #[cfg(feature = "parallel")]
        let rows: Vec<Vec<usize>> = (0..spheres.len()).into_par_iter().map(within_reach).collect();

        let mut graph = Self {
            first: Vec::with_capacity(rows.len()),
            count: Vec::with_capacity(rows.len()),
            nn: Vec::with_capacity(rows.iter().map(Vec::len).sum()),
            max_count: 0,
        };
        for row in rows {
            graph.first.push(graph.nn.len());
            graph.count.push(row.len());
            graph.max_count = graph.max_count.max(row.len());
            graph.nn.extend(row);
        }
        graph
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.first.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.first.is_empty()
    }

    #[inline]
    pub fn neighbors(&self, i: usize) -> &[usize] {
        &self.nn[self.first[i]..self.first[i] + self.count[i]]
    }

    /// Largest neighbor count of any sphere; bounds every common-neighbor list.
    #[inline]
    pub fn max_count(&self) -> usize {
        self.max_count
    }

    #[inline]
    pub fn edge_count(&self) -> usize {
        self.nn.len() / 2
    }

    /// Writes the common neighbors of `i` and `j` into `out` (cleared first), ascending.
    pub fn common_neighbors_into(&self, i: usize, j: usize, out: &mut Vec<usize>) {
        out.clear();
        let (a, b) = (self.neighbors(i), self.neighbors(j));
        let (mut x, mut y) = (0, 0);
        while x < a.len() && y < b.len() {
            match a[x].cmp(&b[y]) {
                Ordering::Less => x += 1,
                Ordering::Greater => y += 1,
                Ordering::Equal => {
                    out.push(a[x]);
                    x += 1;
                    y += 1;
                }
            }
        }
    }

    /// Every mutually adjacent triple `[i, j, k]` with `i < j < k`, in
    /// lexicographic order.
    pub fn triplets(&self) -> Vec<[usize; 3]> {
        let mut scratch = Vec::with_capacity(self.max_count);
        let mut triplets = Vec::new();
        for i in 0..self.len() {
            for &j in self.neighbors(i).iter().filter(|&&j| j > i) {
                self.common_neighbors_into(i, j, &mut scratch);
                triplets.extend(scratch.iter().filter(|&&k| k > j).map(|&k| [i, j, k]));
            }
        }
        triplets
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spheres(coords: &[(f64, f64, f64)], radius: f64) -> Vec<Sphere> {
        coords
            .iter()
            .map(|&(x, y, z)| Sphere::from_coords(x, y, z, radius))
            .collect()
    }

    #[test]
    fn edges_follow_inflated_contact_distance() {
        // Reach between unit spheres with inflation 0.5 is 3.0.
        let s = spheres(&[(0.0, 0.0, 0.0), (2.9, 0.0, 0.0), (6.0, 0.0, 0.0)], 1.0);
        let graph = NeighborGraph::build(&s, 0.5);

        assert_eq!(graph.neighbors(0), &[1]);
        assert_eq!(graph.neighbors(1), &[0]);
        assert!(graph.neighbors(2).is_empty());
        assert_eq!(graph.max_count(), 1);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn adjacency_is_symmetric_for_mixed_radii() {
        let s = vec![
            Sphere::from_coords(0.0, 0.0, 0.0, 1.2),
            Sphere::from_coords(4.1, 0.3, 0.0, 1.9),
            Sphere::from_coords(1.0, 3.9, 0.2, 1.5),
            Sphere::from_coords(-3.0, -2.5, 1.0, 1.7),
            Sphere::from_coords(7.5, 1.0, -1.0, 1.1),
        ];
        let graph = NeighborGraph::build(&s, 1.4);
        for i in 0..s.len() {
            for &j in graph.neighbors(i) {
                assert!(graph.neighbors(j).contains(&i), "edge {i}->{j} has no reverse");
            }
        }
    }

    #[test]
    fn common_neighbors_are_the_sorted_intersection() {
        let s = spheres(
            &[
                (0.0, 0.0, 0.0),
                (1.0, 0.0, 0.0),
                (0.5, 1.0, 0.0),
                (0.5, -1.0, 0.0),
                (10.0, 0.0, 0.0),
            ],
            0.5,
        );
        let graph = NeighborGraph::build(&s, 0.5);
        let mut out = vec![42];
        graph.common_neighbors_into(0, 1, &mut out);
        assert_eq!(out, vec![2, 3]);

        graph.common_neighbors_into(0, 4, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn triplets_are_ordered_and_mutually_adjacent() {
        let s = spheres(
            &[
                (0.0, 0.0, 0.0),
                (1.0, 0.0, 0.0),
                (0.5, 1.0, 0.0),
                (0.5, 0.5, 1.0),
                (10.0, 0.0, 0.0),
            ],
            0.5,
        );
        let graph = NeighborGraph::build(&s, 0.5);
        assert_eq!(
            graph.triplets(),
            vec![[0, 1, 2], [0, 1, 3], [0, 2, 3], [1, 2, 3]]
        );
    }

    #[test]
    fn empty_input_builds_an_empty_graph() {
        let graph = NeighborGraph::build(&[], 1.4);
        assert!(graph.is_empty());
        assert_eq!(graph.max_count(), 0);
        assert!(graph.triplets().is_empty());
    }
}
