use super::progress::{Progress, ProgressReporter};
use nalgebra::Point3;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

pub mod accretion;
pub mod pocket_clustering;
pub mod pocket_selection;
pub mod probe_placement;

const PROGRESS_CHUNK: usize = 256;

/// A probe position that survived the per-triplet checks of a layer and still
/// has to go through weeding.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Candidate {
    pub center: Point3<f64>,
    pub burial_count: usize,
    pub triplet: [usize; 3],
}

/// Runs `evaluate` over every triplet and concatenates the emitted candidates
/// in triplet order, whether or not the evaluation ran in parallel.
pub(crate) fn evaluate_triplets<F>(
    triplets: &[[usize; 3]],
    reporter: &ProgressReporter,
    evaluate: F,
) -> Vec<Candidate>
where
    F: Fn([usize; 3], &mut Vec<Candidate>) + Sync,
{
    reporter.report(Progress::TaskStart {
        total_steps: triplets.len() as u64,
    });

    let run_chunk = |chunk: &[[usize; 3]]| {
        let mut emitted = Vec::new();
        for &triplet in chunk {
            evaluate(triplet, &mut emitted);
        }
        reporter.report(Progress::TaskAdvance {
            steps: chunk.len() as u64,
        });
        emitted
    };

    #[cfg(not(feature = "parallel"))]
    let iterator = triplets.chunks(PROGRESS_CHUNK);

    #[cfg(feature = "parallel")]
    let iterator = triplets.par_chunks(PROGRESS_CHUNK);

    let batches: Vec<Vec<Candidate>> = iterator.map(run_chunk).collect();

    reporter.report(Progress::TaskFinish);
    batches.into_iter().flatten().collect()
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::core::models::sphere::Sphere;
    use crate::engine::config::{PocketConfig, PocketConfigBuilder};

    /// Atoms on a Fibonacci sphere: a closed cage with a hollow interior.
    pub fn fibonacci_cage(count: usize, cage_radius: f64, atom_radius: f64) -> Vec<Sphere> {
        let golden_angle = std::f64::consts::PI * (3.0 - 5.0_f64.sqrt());
        (0..count)
            .map(|i| {
                let y = 1.0 - (i as f64 + 0.5) * 2.0 / count as f64;
                let ring = (1.0 - y * y).sqrt();
                let theta = golden_angle * i as f64;
                Sphere::from_coords(
                    cage_radius * ring * theta.cos(),
                    cage_radius * y,
                    cage_radius * ring * theta.sin(),
                    atom_radius,
                )
            })
            .collect()
    }

    /// Detection settings for a 60-atom cage of radius 7.
    pub fn cage_config() -> PocketConfig {
        PocketConfigBuilder::new()
            .probe_radius(1.4)
            .burial_threshold(30)
            .burial_radius(9.0)
            .weed_distance_sq(1.0)
            .accretion_radius(0.8)
            .build()
            .unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn candidates_keep_triplet_order_across_chunks() {
        let triplets: Vec<[usize; 3]> = (0..1000).map(|i| [i, i + 1, i + 2]).collect();
        let steps = Mutex::new(0u64);
        let reporter = ProgressReporter::with_callback(Box::new(|event: Progress| {
            if let Progress::TaskAdvance { steps: n } = event {
                *steps.lock().unwrap() += n;
            }
        }));

        let candidates = evaluate_triplets(&triplets, &reporter, |triplet, out| {
            if triplet[0] % 3 == 0 {
                out.push(Candidate {
                    center: Point3::origin(),
                    burial_count: triplet[0],
                    triplet,
                });
            }
        });
        drop(reporter);

        let order: Vec<usize> = candidates.iter().map(|c| c.burial_count).collect();
        let expected: Vec<usize> = (0..1000).filter(|i| i % 3 == 0).collect();
        assert_eq!(order, expected);
        assert_eq!(steps.into_inner().unwrap(), 1000);
    }
}
