use crate::cli::{DetectArgs, OutputFormat};
use crate::config::PartialDetectionConfig;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use probepocket::{
    core::io::{
        pdb::PdbFile,
        traits::{AtomSource, PocketSink},
        xyzr::XyzrFile,
    },
    engine::progress::ProgressReporter,
    workflows::{self, detect::DetectionResult},
};
use std::fmt::Write as _;
use std::path::Path;
use tracing::{info, warn};

const SUMMARY_ROWS: usize = 10;

pub fn run(args: DetectArgs) -> Result<()> {
    let partial_config = match &args.config {
        Some(path) => PartialDetectionConfig::from_file(path)?,
        None => PartialDetectionConfig::default(),
    };
    info!("Merging configuration from file and CLI arguments...");
    let config = partial_config.merge_with_cli(&args)?;

    info!("Loading atom spheres from {:?}", &args.input);
    let atoms = XyzrFile::read_from_path(&args.input).map_err(|e| CliError::FileParsing {
        path: args.input.clone(),
        source: e.into(),
    })?;
    println!("Loaded {} atoms from {}", atoms.len(), args.input.display());

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    info!("Invoking the pocket detection workflow...");
    let result = workflows::detect::run(&atoms, &config, &reporter)?;

    if result.pocket_spheres.is_empty() {
        warn!("Detection completed but selected no pocket spheres.");
        println!("Warning: no pockets were found.");
    }

    write_output(&result, &args.output, args.output_format())?;
    println!(
        "✓ {} pocket sphere(s) in {} pocket(s) written to: {}",
        result.pocket_spheres.len(),
        result.pockets.len(),
        args.output.display()
    );
    print!("{}", format_summary(&result));

    Ok(())
}

fn write_output(result: &DetectionResult, path: &Path, format: OutputFormat) -> Result<()> {
    info!(?format, "Writing pocket spheres to {:?}", path);
    let outcome = match format {
        OutputFormat::Pdb => {
            PdbFile::write_to_path(&result.pocket_spheres, &result.pockets, path)
                .map_err(anyhow::Error::from)
        }
        OutputFormat::Xyzr => {
            XyzrFile::write_to_path(&result.pocket_spheres, &result.pockets, path)
                .map_err(anyhow::Error::from)
        }
    };
    outcome.map_err(|source| CliError::FileWriting {
        path: path.to_path_buf(),
        source,
    })
}

fn format_summary(result: &DetectionResult) -> String {
    let stats = &result.stats;
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Probes: {} placed, {} after {} accretion pass(es), {} selected",
        stats.initial_probes, stats.final_probes, stats.accretion_passes, stats.selected
    );
    if result.pockets.is_empty() {
        return out;
    }

    let _ = writeln!(
        out,
        "{:>4}  {:>7}  {:>10}  {:>6}  {:>6}  {:>26}",
        "Rank", "Spheres", "Mean burial", "Max", "Atoms", "Centroid"
    );
    for pocket in result.pockets.iter().take(SUMMARY_ROWS) {
        let _ = writeln!(
            out,
            "{:>4}  {:>7}  {:>10.1}  {:>6}  {:>6}  ({:>7.2}, {:>7.2}, {:>7.2})",
            pocket.rank,
            pocket.sphere_count(),
            pocket.mean_burial(),
            pocket.max_burial,
            pocket.lining_atoms.len(),
            pocket.centroid.x,
            pocket.centroid.y,
            pocket.centroid.z
        );
    }
    if result.pockets.len() > SUMMARY_ROWS {
        let _ = writeln!(
            out,
            "  ... {} more pocket(s)",
            result.pockets.len() - SUMMARY_ROWS
        );
    }
    out
}
