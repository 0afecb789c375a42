use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "Tony Kan",
    version,
    about = "polymd - Prepares amorphous polymer melts for molecular dynamics: builds the structure, normalizes the data file, and writes the MD inputs and job script.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Number of samples to prepare concurrently.
    /// Samples are prepared one after another unless this is given.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Prepare one run directory per polymer described in a configuration file.
    Prepare(PrepareArgs),
    /// Normalize the atom types of an existing builder data file.
    Normalize(NormalizeArgs),
    /// Print the exact mass of a repeat unit and the resulting chain length.
    Mass(MassArgs),
}

/// Arguments for the `prepare` subcommand.
#[derive(Args, Debug)]
pub struct PrepareArgs {
    /// Path to the configuration file in TOML format.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub config: PathBuf,

    /// Override the directory under which sample directories are created.
    #[arg(short, long, value_name = "PATH")]
    pub output_root: Option<PathBuf>,

    /// Prepare only the configured polymers with this repeat unit.
    /// Can be used multiple times.
    #[arg(long = "smiles", value_name = "SMILES")]
    pub smiles: Vec<String>,

    /// Keep the builder's intermediate files, overriding the config file.
    #[arg(long)]
    pub no_cleanup: bool,

    /// Stop a sample as soon as an external tool fails, overriding the config file.
    #[arg(long)]
    pub strict: bool,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S simulation.t-init=500
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `normalize` subcommand.
#[derive(Args, Debug)]
pub struct NormalizeArgs {
    /// Path to the data file written by the structure builder.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Where to write the normalized file. The input is rewritten in place if omitted.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

/// Arguments for the `mass` subcommand.
#[derive(Args, Debug)]
pub struct MassArgs {
    /// Repeat unit SMILES, with `*` marking the connection points.
    #[arg(short, long, required = true, value_name = "SMILES")]
    pub smiles: String,

    /// Target chain molecular weight in g/mol; prints the chain length when given.
    #[arg(short = 'm', long, value_name = "FLOAT")]
    pub target_mw: Option<f64>,
}
