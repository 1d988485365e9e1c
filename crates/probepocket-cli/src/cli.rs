use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "Tony Kan, Ted Yu, William A. Goddard III, Victor Wai Tak Kam",
    version,
    about = "probepocket - Detect candidate ligand-binding pockets by packing probe spheres into buried regions of a molecular surface.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads for parallel computation.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Detect pockets in a set of atom spheres and write the pocket spheres.
    Detect(DetectArgs),
}

/// Output format for pocket spheres.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// PDB HETATM pseudo-atoms, B-factor = burial score, residue number = pocket rank.
    Pdb,
    /// Plain `x y z r score pocket` columns.
    Xyzr,
}

/// Arguments for the `detect` subcommand.
#[derive(Args, Debug)]
pub struct DetectArgs {
    // --- Core Arguments ---
    /// Path to the input atom spheres (whitespace-separated `x y z r` per line).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Path for the output pocket spheres.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Output format. Inferred from the output extension when omitted (`.xyzr` or PDB).
    #[arg(short, long, value_enum, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    // --- Parameter Overrides ---
    /// Solvent probe radius in Angstroms.
    #[arg(long, value_name = "FLOAT")]
    pub probe_radius: Option<f64>,

    /// Minimum number of atoms around a probe for it to count as buried.
    #[arg(long, value_name = "INT")]
    pub burial_threshold: Option<usize>,

    /// Radius around a probe center within which atoms are counted.
    #[arg(long, value_name = "FLOAT")]
    pub burial_radius: Option<f64>,

    /// Squared distance under which two probes are treated as duplicates.
    #[arg(long, value_name = "FLOAT")]
    pub weed_distance_sq: Option<f64>,

    /// Radius of the satellite probes grown during accretion.
    #[arg(long, value_name = "FLOAT")]
    pub accretion_radius: Option<f64>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S selection.cutoff=3.0
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

impl DetectArgs {
    pub fn output_format(&self) -> OutputFormat {
        self.format.unwrap_or_else(|| format_for_path(&self.output))
    }
}

fn format_for_path(path: &Path) -> OutputFormat {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("xyzr") => OutputFormat::Xyzr,
        _ => OutputFormat::Pdb,
    }
}
