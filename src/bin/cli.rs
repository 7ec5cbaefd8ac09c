//! Command-line interface for the metabolic MCEM library
//!
//! This binary runs pathway simulations and parameter estimations from the shell:
//! - Simulating a pathway or synthesizing (noisy) observation files
//! - Estimating rate-law parameters with MCEM
//! - Listing parameters and printing JSON schemas of the input files
//!
//! # Usage
//!
//! ```bash
//! # Create a synthetic TCA observation with 5 % noise
//! metabolic-mcem simulate tca --t-end 10 --points 11 --observe CIT,OAA --noise 0.05 -o obs.json
//!
//! # Estimate the default free TCA parameters
//! metabolic-mcem estimate tca --path obs.json --mode fast --chains 4
//!
//! # List parameters with their literature values
//! metabolic-mcem parameters glycolysis
//! ```

use std::{collections::HashMap, path::PathBuf, process::ExitCode};

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use metabolic_mcem::{
    estimation::{simulate_pathway, synthesize_observation, Estimation, PathwayKind},
    io::{load_config, load_observation, load_parameters, save_report},
    mcem::{McemConfigBuilder, ModePreset},
    objective::ObservationFile,
    simulation::SolverSetup,
};
use tabled::{builder::Builder, settings::Style};

/// Main CLI configuration struct
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum PathwayArg {
    Glycolysis,
    Tca,
}

impl From<PathwayArg> for PathwayKind {
    fn from(arg: PathwayArg) -> Self {
        match arg {
            PathwayArg::Glycolysis => PathwayKind::Glycolysis,
            PathwayArg::Tca => PathwayKind::Tca,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum SchemaKind {
    Observation,
    Config,
}

/// Available CLI commands
#[derive(Subcommand)]
enum Commands {
    /// Simulate a pathway, optionally writing an observation file
    Simulate {
        pathway: PathwayArg,

        /// Comma-separated observation times, overrides --t-end and --points
        #[arg(short, long, value_delimiter = ',')]
        times: Vec<f64>,

        /// End time of an evenly spaced grid starting at 0
        #[arg(long, default_value_t = 10.0)]
        t_end: f64,

        /// Number of points of the evenly spaced grid
        #[arg(long, default_value_t = 21)]
        points: usize,

        /// Metabolites to observe; without it the full trajectory is printed
        #[arg(long, value_delimiter = ',')]
        observe: Vec<String>,

        /// JSON map of parameter overrides
        #[arg(short, long)]
        parameters: Option<PathBuf>,

        /// Relative standard deviation of multiplicative noise
        #[arg(long, default_value_t = 0.0)]
        noise: f64,

        #[arg(long, default_value_t = 0)]
        seed: u64,

        /// Output path, stdout if omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Estimate free parameters from an observation file
    Estimate {
        pathway: PathwayArg,

        /// Path to the observation file
        #[arg(short, long)]
        path: PathBuf,

        /// Mode preset (fast, balanced, precise, test)
        #[arg(short, long, default_value = "balanced")]
        mode: String,

        /// JSON MCEM configuration, overrides the preset
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Comma-separated free parameter names, defaults per pathway
        #[arg(long, value_delimiter = ',')]
        free: Vec<String>,

        #[arg(long, default_value_t = 1)]
        chains: usize,

        #[arg(long)]
        seed: Option<u64>,

        /// Write the report JSON here
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List the parameters of a pathway
    Parameters { pathway: PathwayArg },
    /// Print the JSON schema of an input file
    Schema { kind: SchemaKind },
}

/// Main entry point for the CLI application
pub fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e}", "Error:".bold().red());
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Simulate {
            pathway,
            times,
            t_end,
            points,
            observe,
            parameters,
            noise,
            seed,
            output,
        } => {
            let times = if times.is_empty() {
                even_grid(t_end, points)
            } else {
                times
            };

            let overrides = match parameters {
                Some(path) => load_parameters(path)?,
                None => HashMap::new(),
            };

            let json = if observe.is_empty() {
                let record =
                    simulate_pathway(pathway.into(), &overrides, &times, SolverSetup::default())?;
                serde_json::to_string_pretty(&record)?
            } else {
                let file =
                    synthesize_observation(pathway.into(), &overrides, &times, &observe, noise, seed)?;
                serde_json::to_string_pretty(&file)?
            };

            match output {
                Some(path) => {
                    std::fs::write(&path, json)?;
                    println!("{} {}", "Wrote".bold().green(), path.display());
                }
                None => println!("{json}"),
            }
        }
        Commands::Estimate {
            pathway,
            path,
            mode,
            config,
            free,
            chains,
            seed,
            output,
        } => {
            let kind: PathwayKind = pathway.into();
            let observation = load_observation(path, kind)?;

            let mut config = match config {
                Some(path) => load_config(path)?,
                None => McemConfigBuilder::default()
                    .preset(mode.parse::<ModePreset>()?)
                    .build()?,
            };
            if let Some(seed) = seed {
                config.seed = seed;
            }

            let estimation = Estimation::builder()
                .kind(kind)
                .config(config)
                .maybe_free_parameters((!free.is_empty()).then_some(free))
                .chains(chains)
                .build();

            let report = estimation.run(&observation)?;
            println!("{report}");

            if !report.converged {
                println!("{}", "MCEM did not converge within max_iters".bold().yellow());
            }

            if let Some(path) = output {
                save_report(&path, &report)?;
                println!("{} {}", "Wrote".bold().green(), path.display());
            }
        }
        Commands::Parameters { pathway } => {
            let kind: PathwayKind = pathway.into();
            let free = kind.default_free_parameters();

            let mut builder = Builder::default();
            builder.push_record(vec!["Parameter", "Literature value", "Free by default"]);
            for (name, value) in kind.literature_parameters() {
                let is_free = if free.iter().any(|f| *f == name) { "yes" } else { "" };
                builder.push_record(vec![name, value.to_string(), is_free.to_string()]);
            }

            let mut table = builder.build();
            table.with(Style::rounded());
            println!("{table}");
        }
        Commands::Schema { kind } => {
            let schema = match kind {
                SchemaKind::Observation => schemars::schema_for!(ObservationFile),
                SchemaKind::Config => schemars::schema_for!(metabolic_mcem::mcem::McemConfig),
            };
            println!("{}", serde_json::to_string_pretty(&schema)?);
        }
    }

    Ok(())
}

fn even_grid(t_end: f64, points: usize) -> Vec<f64> {
    match points {
        0 => vec![],
        1 => vec![0.0],
        n => (0..n)
            .map(|i| t_end * i as f64 / (n - 1) as f64)
            .collect(),
    }
}
