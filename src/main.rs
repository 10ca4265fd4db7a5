//! effdi binary — command-line front end for the dispersion pipeline.
//!
//! Purpose
//! -------
//! Drive the two workflow stages from the command line:
//! `precompute-weights` discretizes the configured delay distributions and
//! caches them in the two-row weight store; `compute` loads cached kernels
//! and the cumulative incidence table, derives the infection-potential and
//! infection-activity series per country, runs the dispersion estimator,
//! and writes one JSON result artifact per country.
//!
//! Conventions
//! -----------
//! - Distribution, model-shape, and family names are parsed with the
//!   library `FromStr` impls, so the CLI accepts exactly the names the
//!   library documents (`delta`/`gamma`/`skewnorm`, `c`/`t`/`st`,
//!   `gamma`/`NB`).
//! - Log verbosity follows the `RUST_LOG` environment variable and
//!   defaults to `info`.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use effdi::config::{KernelConfig, RunConfig};
use effdi::dispersion::{estimate, ModelShape, SecondaryFamily};
use effdi::io::{read_kernel, write_kernel, IncidenceTable, ResultArtifact};
use effdi::kernel::{Direction, DistributionKind, Kernel};
use effdi::level_set::extract_level_sets;
use effdi::series::apply_kernel;

#[derive(Debug, Parser)]
#[command(name = "effdi", about = "Time-varying effective dispersion index estimation")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Discretize the delay distributions and cache them in the weight store.
    PrecomputeWeights(PrecomputeArgs),
    /// Run the dispersion pipeline for one or more countries.
    Compute(ComputeArgs),
}

#[derive(Debug, Args)]
struct PrecomputeArgs {
    /// Forward (activity) distribution: delta, gamma, or skewnorm.
    #[arg(long, default_value = "delta")]
    fwd_distribution: String,

    /// Inverse (potential) distribution: delta, gamma, or skewnorm.
    #[arg(long, default_value = "gamma")]
    inv_distribution: String,

    /// Directory the weight files are written into.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
}

#[derive(Debug, Args)]
struct ComputeArgs {
    /// Cumulative incidence table (JHU-style CSV).
    #[arg(long)]
    data_file: PathBuf,

    /// Forward weight-store file produced by precompute-weights.
    #[arg(long, default_value = "fwd_weights.csv")]
    fwd_weights: PathBuf,

    /// Inverse weight-store file produced by precompute-weights.
    #[arg(long, default_value = "inv_weights.csv")]
    inv_weights: PathBuf,

    /// Directory the result artifacts are written into.
    #[arg(long, default_value = "results")]
    out_dir: PathBuf,

    /// Local reproduction-number model shape: c, t, or st.
    #[arg(long, default_value = "st")]
    mode: String,

    /// Fitting-window half-widths (left right).
    #[arg(long, num_args = 2, value_names = ["LEFT", "RIGHT"], default_values_t = [6, 7])]
    tau: Vec<usize>,

    /// Base-10 exponent bounds of the dispersion grid (min max).
    #[arg(long, num_args = 2, allow_negative_numbers = true,
          value_names = ["LOG10_MIN", "LOG10_MAX"], default_values_t = [-1.0, 4.0])]
    k_range: Vec<f64>,

    /// Number of log-spaced dispersion grid points.
    #[arg(long, default_value_t = 300)]
    k_samp: usize,

    /// Monte-Carlo samples per (day, kappa) cell.
    #[arg(long, default_value_t = 500)]
    n: usize,

    /// Secondary-infection family: gamma or NB.
    #[arg(long, default_value = "gamma")]
    distribution: String,

    /// Level-set probability thresholds.
    #[arg(long, num_args = 1.., default_values_t = [0.8, 0.85, 0.9, 0.95])]
    p0s: Vec<f64>,

    /// Base RNG seed; every (day, kappa) cell derives its own stream.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Countries to process; names containing a space may be given as
    /// separate tokens ("United Kingdom" as two arguments).
    #[arg(required = true)]
    countries: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match Cli::parse().command {
        Command::PrecomputeWeights(args) => precompute_weights(args),
        Command::Compute(args) => compute(args),
    }
}

fn precompute_weights(args: PrecomputeArgs) -> anyhow::Result<()> {
    let config = KernelConfig::default();
    let fwd_kind: DistributionKind = args.fwd_distribution.parse()?;
    let inv_kind: DistributionKind = args.inv_distribution.parse()?;

    let fwd = Kernel::build(fwd_kind, Direction::Forward, &config)?;
    let inv = Kernel::build(inv_kind, Direction::Inverse, &config)?;

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("creating {}", args.out_dir.display()))?;
    let fwd_path = args.out_dir.join("fwd_weights.csv");
    let inv_path = args.out_dir.join("inv_weights.csv");
    write_kernel(&fwd_path, &fwd)?;
    write_kernel(&inv_path, &inv)?;

    tracing::info!(
        distribution = %args.fwd_distribution,
        window = ?(fwd.window_left(), fwd.window_right()),
        path = %fwd_path.display(),
        "forward weights written"
    );
    tracing::info!(
        distribution = %args.inv_distribution,
        window = ?(inv.window_left(), inv.window_right()),
        path = %inv_path.display(),
        "inverse weights written"
    );
    Ok(())
}

fn compute(args: ComputeArgs) -> anyhow::Result<()> {
    let shape: ModelShape = args.mode.parse()?;
    let family: SecondaryFamily = args.distribution.parse()?;

    let fwd = read_kernel(&args.fwd_weights)
        .with_context(|| format!("loading {}", args.fwd_weights.display()))?;
    let inv = read_kernel(&args.inv_weights)
        .with_context(|| format!("loading {}", args.inv_weights.display()))?;

    let table = IncidenceTable::from_path(&args.data_file)
        .with_context(|| format!("loading {}", args.data_file.display()))?;
    let countries = table.resolve_countries(&args.countries);
    if countries.is_empty() {
        anyhow::bail!("none of the requested countries are present in the incidence table");
    }

    let run = RunConfig {
        shape,
        tau_left: args.tau[0],
        tau_right: args.tau[1],
        kappa_log10_min: args.k_range[0],
        kappa_log10_max: args.k_range[1],
        kappa_samples: args.k_samp,
        n_samples: args.n,
        family,
        p0s: args.p0s.clone(),
        seed: args.seed,
    };
    let grid = run.grid()?;
    let estimator = run.estimator();

    for country in &countries {
        tracing::info!(country = %country, mode = %args.mode, "starting country run");

        let daily = table.series(country)?.daily_from_cumulative();
        let activity = apply_kernel(daily.values(), &fwd)?.to_vec();
        let potential = apply_kernel(daily.values(), &inv)?.to_vec();

        let outcome = estimate(&potential, &activity, &grid, &estimator)?;
        let curves = extract_level_sets(&outcome.pvals, &grid, &run.p0s);

        let artifact =
            ResultArtifact::assemble(&daily, &potential, &activity, &grid, &outcome, &curves);
        let path = ResultArtifact::artifact_path(&args.out_dir, country, &args.mode);
        artifact.write_json(&path)?;

        tracing::info!(country = %country, path = %path.display(), "result artifact written");
    }
    Ok(())
}
