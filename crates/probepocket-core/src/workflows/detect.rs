use crate::core::geometry::triple_placer::{ProbeTriplePlacer, TriplePlacer};
use crate::core::models::pocket::{Pocket, PocketSphere};
use crate::core::models::sphere::Sphere;
use crate::engine::config::PocketConfig;
use crate::engine::context::DetectionContext;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::spatial::SpatialIndex;
use crate::engine::tasks;
use tracing::{info, instrument, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetectionStats {
    pub atom_count: usize,
    /// Probes accepted by layer-0 placement.
    pub initial_probes: usize,
    /// Accretion passes run, including the final one that changed nothing.
    pub accretion_passes: usize,
    /// Probes inserted by each accretion pass.
    pub probes_per_pass: Vec<usize>,
    /// Probes removed during accretion when one replacement outranked several.
    pub retired_probes: usize,
    /// Probes in the set once accretion converged.
    pub final_probes: usize,
    /// Probes that passed the density filter.
    pub selected: usize,
}

#[derive(Debug, Clone, Default)]
pub struct DetectionResult {
    pub pocket_spheres: Vec<PocketSphere>,
    /// Pockets in rank order; `sphere_indices` refer to `pocket_spheres`.
    pub pockets: Vec<Pocket>,
    pub stats: DetectionStats,
}

/// Detects pockets in `atoms` using the default three-sphere probe placer.
#[instrument(skip_all, name = "detection_workflow")]
pub fn run(
    atoms: &[Sphere],
    config: &PocketConfig,
    reporter: &ProgressReporter,
) -> Result<DetectionResult, EngineError> {
    run_with_placer(atoms, config, &ProbeTriplePlacer, reporter)
}

/// Detects pockets in `atoms` with a caller-supplied [`TriplePlacer`].
pub fn run_with_placer<P: TriplePlacer>(
    atoms: &[Sphere],
    config: &PocketConfig,
    placer: &P,
    reporter: &ProgressReporter,
) -> Result<DetectionResult, EngineError> {
    // === Phase 0: Validation and indexing ===
    validate_atoms(atoms)?;
    if atoms.is_empty() {
        warn!("No atoms supplied; nothing to detect.");
        return Ok(DetectionResult::default());
    }

    info!(
        atoms = atoms.len(),
        probe_radius = config.probe_radius,
        burial_threshold = config.burial.threshold,
        burial_radius = config.burial.radius,
        accretion_radius = config.accretion.radius,
        "Starting pocket detection."
    );

    let index = SpatialIndex::for_atoms(atoms, config.probe_radius, config.burial.radius);
    let context = DetectionContext::new(atoms, config, &index, placer, reporter);
    let mut stats = DetectionStats {
        atom_count: atoms.len(),
        ..DetectionStats::default()
    };

    // === Phase 1: Layer-0 probes ===
    reporter.report(Progress::PhaseStart {
        name: "Probe Placement",
    });
    let mut probes = tasks::probe_placement::run(&context);
    stats.initial_probes = probes.len();
    reporter.report(Progress::PhaseFinish);

    // === Phase 2: Accretion ===
    reporter.report(Progress::PhaseStart { name: "Accretion" });
    let summary = tasks::accretion::run(&mut probes, &context)?;
    stats.accretion_passes = summary.passes;
    stats.probes_per_pass = summary.inserted_per_pass;
    stats.retired_probes = summary.retired;
    stats.final_probes = probes.len();
    reporter.report(Progress::PhaseFinish);

    // === Phase 3: Density selection ===
    reporter.report(Progress::PhaseStart {
        name: "Pocket Selection",
    });
    let pocket_spheres = tasks::pocket_selection::run(probes.into_probes(), &context);
    stats.selected = pocket_spheres.len();
    reporter.report(Progress::PhaseFinish);

    // === Phase 4: Clustering and ranking ===
    reporter.report(Progress::PhaseStart {
        name: "Pocket Clustering",
    });
    let pockets = tasks::pocket_clustering::run(&pocket_spheres, &context);
    reporter.report(Progress::PhaseFinish);

    info!(
        pocket_spheres = pocket_spheres.len(),
        pockets = pockets.len(),
        "Pocket detection complete."
    );
    Ok(DetectionResult {
        pocket_spheres,
        pockets,
        stats,
    })
}

fn validate_atoms(atoms: &[Sphere]) -> Result<(), EngineError> {
    atoms
        .iter()
        .enumerate()
        .find_map(|(index, atom)| {
            atom.invalid_reason()
                .map(|reason| EngineError::InvalidAtom { index, reason })
        })
        .map_or(Ok(()), Err)
}
