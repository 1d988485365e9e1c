use super::{Candidate, evaluate_triplets};
use crate::core::geometry::triple_placer::TriplePlacer;
use crate::engine::context::DetectionContext;
use crate::engine::error::EngineError;
use crate::engine::neighbors::NeighborGraph;
use crate::engine::probe_set::{ProbeSet, WeedOutcome};
use crate::engine::progress::Progress;
use tracing::{debug, info, instrument, warn};

/// Counters for a single accretion pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassOutcome {
    pub triplets: usize,
    pub candidates: usize,
    pub inserted: usize,
    pub replaced: usize,
    /// Probes removed because a replacement outranked several of them.
    pub retired: usize,
}

impl PassOutcome {
    /// Whether the pass modified the probe set. A pass that did not is a fixed point.
    #[inline]
    pub fn changed(&self) -> bool {
        self.inserted > 0 || self.replaced > 0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccretionSummary {
    /// Passes run, including the final pass that changed nothing.
    pub passes: usize,
    /// Probes inserted by each pass, in order.
    pub inserted_per_pass: Vec<usize>,
    /// Probes removed by replacements across all passes.
    pub retired: usize,
}

/// Grows satellite probes between existing ones until a pass leaves the set unchanged.
#[instrument(skip_all, name = "accretion_task")]
pub fn run<P: TriplePlacer>(
    probes: &mut ProbeSet,
    context: &DetectionContext<P>,
) -> Result<AccretionSummary, EngineError> {
    let max_passes = context.config.accretion.max_passes;
    info!(
        initial_probes = probes.len(),
        accretion_radius = context.config.accretion.radius,
        max_passes,
        "Starting accretion."
    );

    let mut summary = AccretionSummary::default();
    for layer in 1..=max_passes {
        let outcome = pass(probes, context, layer);
        debug!(
            pass = layer,
            triplets = outcome.triplets,
            candidates = outcome.candidates,
            inserted = outcome.inserted,
            replaced = outcome.replaced,
            retired = outcome.retired,
            total = probes.len(),
            "Accretion pass finished."
        );
        context.reporter.report(Progress::AccretionPass {
            pass: layer,
            inserted: outcome.inserted,
            total_probes: probes.len(),
        });

        summary.passes = layer;
        summary.inserted_per_pass.push(outcome.inserted);
        summary.retired += outcome.retired;

        if !outcome.changed() {
            context.reporter.report(Progress::Message(format!(
                "Accretion converged after {layer} passes with {} probes.",
                probes.len()
            )));
            info!(
                passes = layer,
                probes = probes.len(),
                "Accretion reached a fixed point."
            );
            return Ok(summary);
        }
    }

    warn!(
        max_passes,
        probes = probes.len(),
        "Accretion did not converge."
    );
    Err(EngineError::Convergence {
        iterations: max_passes,
    })
}

/// Runs accretion pass `layer` over the probes the previous layer produced.
///
/// Triplets come from a snapshot of the layer `layer - 1` probes (layer 0 seeds
/// the first pass). The self-cluster test and weeding look at the whole live
/// set, so probes inserted earlier in the pass are taken into account.
pub fn pass<P: TriplePlacer>(
    probes: &mut ProbeSet,
    context: &DetectionContext<P>,
    layer: usize,
) -> PassOutcome {
    let accretion_radius = context.config.accretion.radius;
    let threshold = context.config.burial.threshold;

    let (members, snapshot) = probes.layer_snapshot(layer.saturating_sub(1));
    let graph = NeighborGraph::build(&snapshot, accretion_radius);
    let triplets = graph.triplets();
    let radii = [accretion_radius; 3];

    let candidates = evaluate_triplets(&triplets, context.reporter, |triplet, out| {
        let [i, j, k] = triplet;
        let centers = [snapshot[i].center, snapshot[j].center, snapshot[k].center];

        for center in context.placer.place(&centers, &radii, accretion_radius) {
            if context.clashes_with_atoms(&center) {
                continue;
            }
            let burial_count = context.burial_count(&center);
            if burial_count < threshold {
                continue;
            }
            out.push(Candidate {
                center,
                burial_count,
                triplet: [members[i], members[j], members[k]],
            });
        }
    });

    let mut outcome = PassOutcome {
        triplets: triplets.len(),
        candidates: candidates.len(),
        ..PassOutcome::default()
    };

    for candidate in candidates {
        if probes.any_within(&candidate.center, 2.0 * accretion_radius, &candidate.triplet) {
            continue;
        }
        match probes.weed_insert(
            candidate.center,
            candidate.burial_count,
            accretion_radius,
            layer,
        ) {
            WeedOutcome::Inserted(_) => outcome.inserted += 1,
            WeedOutcome::Replaced { retired, .. } => {
                outcome.replaced += 1;
                outcome.retired += retired;
            }
            WeedOutcome::Dropped(_) => {}
        }
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::triple_placer::ProbeTriplePlacer;
    use crate::engine::config::PocketConfigBuilder;
    use crate::engine::progress::ProgressReporter;
    use crate::engine::spatial::SpatialIndex;
    use crate::engine::tasks::probe_placement;
    use crate::engine::tasks::test_support::{cage_config, fibonacci_cage};

    #[test]
    fn cage_converges_and_an_extra_pass_changes_nothing() {
        let atoms = fibonacci_cage(60, 7.0, 1.7);
        let config = cage_config();
        let index = SpatialIndex::for_atoms(&atoms, config.probe_radius, config.burial.radius);
        let reporter = ProgressReporter::new();
        let placer = ProbeTriplePlacer;
        let context = DetectionContext::new(&atoms, &config, &index, &placer, &reporter);

        let mut probes = probe_placement::run(&context);
        let initial = probes.len();
        let summary = run(&mut probes, &context).unwrap();

        assert!(summary.passes >= 2, "the cage interior should accrete");
        assert_eq!(summary.inserted_per_pass.len(), summary.passes);
        assert_eq!(summary.inserted_per_pass.last(), Some(&0));
        assert_eq!(
            probes.len() + summary.retired,
            initial + summary.inserted_per_pass.iter().sum::<usize>()
        );

        let before = probes.clone().into_probes();
        let extra = pass(&mut probes, &context, summary.passes + 1);
        assert_eq!(extra.inserted, 0);
        assert!(!extra.changed());
        assert_eq!(probes.into_probes(), before);
    }

    #[test]
    fn each_pass_grows_only_from_the_previous_layer() {
        let atoms = fibonacci_cage(60, 7.0, 1.7);
        let config = cage_config();
        let index = SpatialIndex::for_atoms(&atoms, config.probe_radius, config.burial.radius);
        let reporter = ProgressReporter::new();
        let placer = ProbeTriplePlacer;
        let context = DetectionContext::new(&atoms, &config, &index, &placer, &reporter);
        let radius = config.accretion.radius;

        let mut probes = probe_placement::run(&context);
        let mut layer = 1;
        loop {
            let (_, previous) = probes.layer_snapshot(layer - 1);
            let expected = NeighborGraph::build(&previous, radius).triplets().len();
            let all: Vec<_> = probes.probes().map(|p| p.sphere).collect();
            let everything = NeighborGraph::build(&all, radius).triplets().len();

            let outcome = pass(&mut probes, &context, layer);
            assert_eq!(outcome.triplets, expected, "pass {layer}");
            if layer >= 2 && !previous.is_empty() {
                assert!(expected < everything, "pass {layer} reads older layers");
            }
            assert!(probes.probes().all(|p| p.layer <= layer));
            if !outcome.changed() {
                break;
            }
            layer += 1;
            assert!(layer <= config.accretion.max_passes);
        }
        assert!(layer >= 3, "the cage should accrete for more than one pass");
    }

    #[test]
    fn accreted_probes_keep_their_layer_and_radius() {
        let atoms = fibonacci_cage(60, 7.0, 1.7);
        let config = cage_config();
        let index = SpatialIndex::for_atoms(&atoms, config.probe_radius, config.burial.radius);
        let reporter = ProgressReporter::new();
        let placer = ProbeTriplePlacer;
        let context = DetectionContext::new(&atoms, &config, &index, &placer, &reporter);

        let mut probes = probe_placement::run(&context);
        let summary = run(&mut probes, &context).unwrap();

        for probe in probes.probes() {
            assert!(probe.burial_count >= config.burial.threshold);
            assert!(probe.layer <= summary.passes);
            let expected = if probe.layer == 0 {
                config.probe_radius
            } else {
                config.accretion.radius
            };
            assert_eq!(probe.sphere.radius, expected);
        }
        let live: Vec<_> = probes.probes().collect();
        for (a, probe) in live.iter().enumerate() {
            for other in &live[a + 1..] {
                assert!(probe.sphere.distance_squared_to(other.center()) >= config.weed_distance_sq);
            }
        }
    }

    #[test]
    fn pass_cap_is_reported_as_convergence_failure() {
        let atoms = fibonacci_cage(60, 7.0, 1.7);
        let config = PocketConfigBuilder::new()
            .probe_radius(1.4)
            .burial_threshold(30)
            .burial_radius(9.0)
            .weed_distance_sq(1.0)
            .accretion_radius(0.8)
            .max_accretion_passes(1)
            .build()
            .unwrap();
        let index = SpatialIndex::for_atoms(&atoms, config.probe_radius, config.burial.radius);
        let reporter = ProgressReporter::new();
        let placer = ProbeTriplePlacer;
        let context = DetectionContext::new(&atoms, &config, &index, &placer, &reporter);

        let mut probes = probe_placement::run(&context);
        let err = run(&mut probes, &context).unwrap_err();
        assert!(matches!(err, EngineError::Convergence { iterations: 1 }));
    }

    #[test]
    fn empty_probe_set_is_already_a_fixed_point() {
        let atoms = fibonacci_cage(60, 7.0, 1.7);
        let config = cage_config();
        let index = SpatialIndex::for_atoms(&atoms, config.probe_radius, config.burial.radius);
        let reporter = ProgressReporter::new();
        let placer = ProbeTriplePlacer;
        let context = DetectionContext::new(&atoms, &config, &index, &placer, &reporter);

        let mut probes = ProbeSet::new(config.weed_distance_sq);
        let summary = run(&mut probes, &context).unwrap();
        assert_eq!(summary.passes, 1);
        assert_eq!(summary.inserted_per_pass, vec![0]);
        assert!(probes.is_empty());
    }
}
