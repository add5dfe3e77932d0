//! `gp-lite-estimate`: predicts the evaluation count, wall time, and cost of
//! a run without executing it.
//!
//! Reads a base [`Config`] from an optional JSON file, applies any CLI flag
//! overrides on top, then prints a [`RunEstimate`] as either a short
//! human-readable report or JSON.

use std::fs;
use std::process::ExitCode;

use clap::Parser;
use gp_lite::{estimate, format::format_estimate, Config, UnitCosts};
use serde::Deserialize;

/// CLI flags use camelCase long names (`--popSize`, `--cxProb`, ...) to
/// match spec.md §6's external flag contract verbatim, rather than clap's
/// default kebab-case derivation.
#[derive(Parser, Debug)]
#[command(name = "gp-lite-estimate", version, about, rename_all = "camelCase")]
struct Cli {
    /// Path to a JSON file holding a base `Config`. Fields absent from the
    /// file fall back to `Config::default()`.
    #[arg(long)]
    config: Option<String>,

    #[arg(long)]
    pop_size: Option<usize>,

    #[arg(long)]
    generations: Option<usize>,

    #[arg(long)]
    elite: Option<usize>,

    #[arg(long)]
    cx_prob: Option<f64>,

    #[arg(long)]
    mut_prob: Option<f64>,

    #[arg(long)]
    immigration: Option<f64>,

    #[arg(long)]
    tournament: Option<usize>,

    #[arg(long)]
    stall: Option<usize>,

    #[arg(long)]
    target_fitness: Option<f64>,

    #[arg(long)]
    max_wall_ms: Option<u64>,

    #[arg(long)]
    max_evaluations: Option<u64>,

    #[arg(long)]
    seed: Option<u32>,

    /// Overrides `config.generations` for the `evaluations.expected_total`
    /// figure only (e.g. to compare against a prior run's actual
    /// generation count).
    #[arg(long)]
    expected_generations: Option<u64>,

    /// Estimated wall-clock milliseconds per fitness evaluation.
    #[arg(long)]
    per_evaluation_ms: Option<f64>,

    /// Estimated fixed wall-clock overhead per generation.
    #[arg(long)]
    per_generation_overhead_ms: Option<f64>,

    /// Estimated fixed wall-clock overhead for the whole run.
    #[arg(long)]
    per_run_overhead_ms: Option<f64>,

    /// Estimated monetary cost per fitness evaluation.
    #[arg(long)]
    per_evaluation_cost: Option<f64>,

    /// Print the estimate as JSON instead of a human-readable report.
    #[arg(long)]
    json: bool,
}

/// On-disk shape for `--config`: a base [`Config`], optional [`UnitCosts`],
/// and an optional `expected_generations` override, all overridable by CLI
/// flags after load.
#[derive(Deserialize, Default)]
#[serde(default)]
struct ConfigFile {
    config: Config,
    units: UnitCosts,
    expected_generations: Option<u64>,
}

enum CliError {
    /// The `--config` file could not be read.
    ConfigUnreadable(String),
    /// Anything else: malformed JSON, invalid numeric flag, invalid config.
    Runtime(String),
}

impl CliError {
    fn exit_code(&self) -> u8 {
        match self {
            CliError::ConfigUnreadable(_) => 2,
            CliError::Runtime(_) => 1,
        }
    }

    fn message(&self) -> &str {
        match self {
            CliError::ConfigUnreadable(m) | CliError::Runtime(m) => m,
        }
    }
}

fn load_config_file(path: &Option<String>) -> Result<ConfigFile, CliError> {
    match path {
        None => Ok(ConfigFile::default()),
        Some(path) => {
            let text = fs::read_to_string(path)
                .map_err(|e| CliError::ConfigUnreadable(format!("failed to read {path}: {e}")))?;
            serde_json::from_str(&text)
                .map_err(|e| CliError::Runtime(format!("failed to parse {path}: {e}")))
        }
    }
}

fn apply_config_overrides(mut config: Config, cli: &Cli) -> Config {
    if let Some(v) = cli.pop_size {
        config = config.with_pop_size(v);
    }
    if let Some(v) = cli.generations {
        config = config.with_generations(v);
    }
    if let Some(v) = cli.elite {
        config = config.with_elite(v);
    }
    if let Some(v) = cli.cx_prob {
        config = config.with_cx_prob(v);
    }
    if let Some(v) = cli.mut_prob {
        config = config.with_mut_prob(v);
    }
    if let Some(v) = cli.immigration {
        config = config.with_immigration(v);
    }
    if let Some(v) = cli.tournament {
        config = config.with_tournament(v);
    }
    if let Some(v) = cli.stall {
        config = config.with_stall(v);
    }
    if let Some(v) = cli.target_fitness {
        config = config.with_target_fitness(v);
    }
    if let Some(v) = cli.max_wall_ms {
        config = config.with_max_wall_ms(v);
    }
    if let Some(v) = cli.max_evaluations {
        config = config.with_max_evaluations(v);
    }
    if let Some(v) = cli.seed {
        config = config.with_seed(v);
    }
    config
}

fn apply_unit_overrides(mut units: UnitCosts, cli: &Cli) -> UnitCosts {
    if let Some(v) = cli.per_evaluation_ms {
        units.ms_per_evaluation = v;
    }
    if let Some(v) = cli.per_generation_overhead_ms {
        units.per_generation_overhead_ms = v;
    }
    if let Some(v) = cli.per_run_overhead_ms {
        units.per_run_overhead_ms = v;
    }
    if let Some(v) = cli.per_evaluation_cost {
        units.cost_per_evaluation = v;
    }
    units
}

fn run() -> Result<String, CliError> {
    let cli = Cli::parse();
    let file = load_config_file(&cli.config)?;

    let config = apply_config_overrides(file.config, &cli);
    let costs = apply_unit_overrides(file.units, &cli);
    let expected_generations = cli.expected_generations.or(file.expected_generations);

    let estimate = estimate(&config, costs, expected_generations)
        .map_err(|e| CliError::Runtime(e.to_string()))?;

    if cli.json {
        serde_json::to_string_pretty(&estimate).map_err(|e| CliError::Runtime(e.to_string()))
    } else {
        Ok(format_estimate(&estimate))
    }
}

fn main() -> ExitCode {
    env_logger::init();

    match run() {
        Ok(report) => {
            println!("{report}");
            ExitCode::from(0)
        }
        Err(err) => {
            eprintln!("gp-lite-estimate: {}", err.message());
            ExitCode::from(err.exit_code())
        }
    }
}
