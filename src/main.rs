//! Command line front end
//!
//! Usage:
//!   meshbasis compare <basis-dir>
//!   meshbasis condense <basis-dir> --tolerance 1e-7
//!   meshbasis combine <basis-dir> --weights 0.02,0.035,0.1 --output fort.13
use clap::{Parser, Subcommand};
use meshbasis::compare::compare_basis_dir;
use meshbasis::io::read_table;
use meshbasis::landuse::{combine_basis_dir, condense_basis_folders};
use meshbasis::{BasisConfig, Result, WorkerContext};
use ndarray::Array1;
use std::path::PathBuf;
use std::process;
use tracing::error;

#[derive(Parser, Debug)]
#[command(
    name = "meshbasis",
    about = "Combine, condense and compare land classification basis vectors"
)]
struct Cli {
    /// Configuration file (toml), command line arguments take precedence
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Reconstruct the reference run and write diagnostics to hdf5
    Compare {
        /// Directory with `landuse_*` folders
        basis_dir: Option<PathBuf>,
        /// Output file (hdf5)
        #[arg(long)]
        output: Option<PathBuf>,
        /// Fail if sparse and dense combination differ by more than this
        #[arg(long)]
        check: Option<f64>,
    },
    /// Drop near-zero values from every basis vector (in place)
    Condense {
        /// Directory with `landuse_*` folders
        basis_dir: Option<PathBuf>,
        /// Values not above this are dropped
        #[arg(long)]
        tolerance: Option<f64>,
    },
    /// Combine basis vectors and write the field into an attribute file
    Combine {
        /// Directory with `landuse_*` folders
        basis_dir: Option<PathBuf>,
        /// Comma separated weights, one per basis vector
        #[arg(long, value_delimiter = ',', conflicts_with = "table")]
        weights: Option<Vec<f64>>,
        /// Land use table providing the weights
        #[arg(long)]
        table: Option<PathBuf>,
        /// Template attribute file, defaults to the reference file
        #[arg(long)]
        template: Option<PathBuf>,
        /// Output attribute file
        #[arg(long)]
        output: PathBuf,
    },
}

fn load_config(path: Option<&PathBuf>, basis_dir: Option<PathBuf>) -> Result<BasisConfig> {
    let mut config = match path {
        Some(p) => BasisConfig::from_file(p)?,
        None => BasisConfig::default(),
    };
    if let Some(dir) = basis_dir {
        config.basis_dir = dir;
    }
    Ok(config)
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Compare {
            basis_dir,
            output,
            check,
        } => {
            let mut config = load_config(cli.config.as_ref(), basis_dir)?;
            if let Some(output) = output {
                config.output = output;
            }
            let cmp = compare_basis_dir(&config)?;
            cmp.write(&config.output)?;
            if let Some(tol) = check {
                if !cmp.is_consistent(tol) {
                    error!(
                        "Sparse and dense combination differ by {:e} > {:e}",
                        cmp.max_abs_diff_com(),
                        tol
                    );
                    process::exit(2);
                }
            }
        }
        Commands::Condense {
            basis_dir,
            tolerance,
        } => {
            let mut config = load_config(cli.config.as_ref(), basis_dir)?;
            if let Some(tol) = tolerance {
                config.tolerance = tol;
            }
            condense(&config)?;
        }
        Commands::Combine {
            basis_dir,
            weights,
            table,
            template,
            output,
        } => {
            let config = load_config(cli.config.as_ref(), basis_dir)?;
            let weights = match (weights, table) {
                (Some(w), _) => Some(Array1::from(w)),
                (None, Some(t)) => Some(read_table(t)?.weights()),
                (None, None) => None,
            };
            combine_basis_dir(&config, weights, template.as_deref(), &output)?;
        }
    }
    Ok(())
}

#[cfg(not(feature = "mpi"))]
fn condense(config: &BasisConfig) -> Result<()> {
    condense_basis_folders(&WorkerContext::serial(), config)?;
    Ok(())
}

#[cfg(feature = "mpi")]
fn condense(config: &BasisConfig) -> Result<()> {
    let universe = match meshbasis::worker::initialize() {
        Some(universe) => universe,
        None => {
            error!("mpi is already initialized");
            process::exit(1);
        }
    };
    let ctx = WorkerContext::from_universe(&universe);
    condense_basis_folders(&ctx, config)?;
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        error!("{}", e);
        process::exit(1);
    }
}
