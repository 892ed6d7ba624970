use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use dispersal_core::config::CoreConfig;
use dispersal_core::mortality::MortalityModel;
use dispersal_core::particle::{Particle, Position};
use dispersal_core::projection::{Coordinate, Projection};
use serde::Serialize;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Parser)]
#[command(name = "dispersal")]
#[command(about = "Larval dispersal survival and projection tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Age a cohort of particles under the configured mortality and print its survival curve
    Cohort {
        /// Path to config file (JSON); defaults are used when omitted
        #[arg(long)]
        config: Option<PathBuf>,

        /// Number of particles released
        #[arg(long, default_value_t = 10_000)]
        particles: usize,

        /// Number of mortality intervals to simulate
        #[arg(long, default_value_t = 360)]
        steps: usize,

        /// Number of workers, each with its own mortality stream
        #[arg(long, default_value_t = 4)]
        workers: usize,

        /// Write the curve to this file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Project a point between degrees and metres
    Project {
        /// Path to config file (JSON); defaults are used when omitted
        #[arg(long)]
        config: Option<PathBuf>,

        /// Longitude (degrees) or planar x (metres with --inverse)
        #[arg(long, allow_hyphen_values = true)]
        x: f64,

        /// Latitude (degrees) or planar y (metres with --inverse)
        #[arg(long, allow_hyphen_values = true)]
        y: f64,

        /// Depth, passed through unchanged
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        z: f64,

        /// Map metres back to degrees
        #[arg(long)]
        inverse: bool,
    },
    /// Dump the default configuration to stdout
    DumpDefaultConfig,
}

#[derive(Debug, Serialize)]
struct SurvivalCurve {
    interval_ms: i64,
    released: usize,
    /// Survivors after each interval; entry 0 is the release count.
    survivors: Vec<usize>,
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_config(path: Option<&Path>) -> Result<CoreConfig> {
    let Some(path) = path else {
        return Ok(CoreConfig::default());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let config = CoreConfig::from_json(&json).context("config validation error")?;
    info!(path = %path.display(), "loaded config");
    Ok(config)
}

/// Run one worker's share of the cohort and return its survivor counts.
fn run_partition(
    mut model: MortalityModel,
    first_id: u64,
    count: usize,
    steps: usize,
    interval_ms: i64,
) -> Vec<usize> {
    let mut particles: Vec<Particle> = (0..count as u64)
        .map(|i| Particle::new(first_id + i, Position::default()))
        .collect();
    let mut survivors = Vec::with_capacity(steps + 1);
    survivors.push(count);
    for _ in 0..steps {
        for p in particles.iter_mut().filter(|p| p.alive) {
            p.advance_age(interval_ms);
            model.apply(p, interval_ms);
        }
        survivors.push(particles.iter().filter(|p| p.alive).count());
    }
    survivors
}

fn run_cohort(
    config: &CoreConfig,
    particles: usize,
    steps: usize,
    workers: usize,
) -> Result<SurvivalCurve> {
    let workers = workers.clamp(1, particles.max(1));
    let interval_ms = config.mortality.interval_ms;
    let base = particles / workers;
    let extra = particles % workers;

    let mut models = Vec::with_capacity(workers);
    for w in 0..workers {
        models.push(
            config
                .mortality_model(w as u64)
                .context("failed to build mortality model")?,
        );
    }

    let partials = std::thread::scope(|scope| {
        let mut first_id = 0u64;
        let handles: Vec<_> = models
            .into_iter()
            .enumerate()
            .map(|(w, model)| {
                let count = base + usize::from(w < extra);
                let start = first_id;
                first_id += count as u64;
                debug!(worker = w, seed = model.seed(), count, "starting partition");
                scope.spawn(move || run_partition(model, start, count, steps, interval_ms))
            })
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().map_err(|_| anyhow!("cohort worker panicked")))
            .collect::<Result<Vec<Vec<usize>>>>()
    })?;

    let mut survivors = vec![0usize; steps + 1];
    for partial in &partials {
        for (total, n) in survivors.iter_mut().zip(partial) {
            *total += n;
        }
    }
    Ok(SurvivalCurve {
        interval_ms,
        released: particles,
        survivors,
    })
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::DumpDefaultConfig => {
            let config = CoreConfig::default();
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        Commands::Cohort {
            config,
            particles,
            steps,
            workers,
            out,
        } => {
            let config = load_config(config.as_deref())?;
            info!(
                particles,
                steps,
                workers,
                kind = ?config.mortality.kind,
                "simulating cohort"
            );
            let curve = run_cohort(&config, particles, steps, workers)?;
            let last = curve.survivors.last().copied().unwrap_or(0);
            info!(survivors = last, "cohort complete");

            if let Some(path) = out {
                let file = File::create(&path).context("failed to create output file")?;
                serde_json::to_writer_pretty(file, &curve).context("failed to write curve")?;
                println!("Survival curve saved to {:?}", path);
            } else {
                println!("{}", serde_json::to_string_pretty(&curve)?);
            }
        }
        Commands::Project {
            config,
            x,
            y,
            z,
            inverse,
        } => {
            let config = load_config(config.as_deref())?;
            let projection = config
                .projection
                .build()
                .context("invalid projection parameters")?;
            let input = Coordinate::new(x, y, z);
            let output = if inverse {
                projection.inverse(input)
            } else {
                projection.forward(input)
            };
            println!("{}", serde_json::to_string(&output)?);
        }
    }
    Ok(())
}
