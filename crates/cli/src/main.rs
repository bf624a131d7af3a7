#![deny(unsafe_code)]
//! CLI binary for raster-synth.
//!
//! Subcommands:
//! - `run <rule>`: run an automaton N generations over an image, write PNG/JPEG
//! - `list`: print available rules and topologies

mod error;

use clap::{Args, Parser, Subcommand};
use error::CliError;
use raster_synth_automata::{Automaton, AutomatonConfig, RuleKind, TOPOLOGY_NAMES};
use raster_synth_core::{
    Argb, DoubleBuffer, ImageFormat, JsonContext, PixelBuffer, RasterError, Xorshift64,
};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "raster-synth", about = "Cellular-automaton image synthesis CLI")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Log progress at info level. `RUST_LOG` takes precedence.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a rule for N generations and write the resulting image.
    Run(RunArgs),
    /// List available rules and topologies.
    List,
}

#[derive(Args)]
struct RunArgs {
    /// Rule name (e.g. "life"). Overrides the rule in `--config`.
    rule: Option<String>,

    /// Start image. Without it, a seeded black/white noise image is used.
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Width of the generated start image.
    #[arg(short = 'W', long, default_value_t = 256)]
    width: usize,

    /// Height of the generated start image.
    #[arg(short = 'H', long, default_value_t = 256)]
    height: usize,

    /// Fraction of white cells in the generated start image.
    #[arg(long, default_value_t = 0.5)]
    density: f32,

    /// Number of generations.
    #[arg(short, long, default_value_t = 100)]
    steps: usize,

    /// PRNG seed for the automaton and the start image.
    #[arg(long)]
    seed: Option<u64>,

    /// Neighborhood topology (e.g. "moore", "hourglass").
    #[arg(short, long)]
    topology: Option<String>,

    /// Automaton configuration as a JSON file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Rule parameters as a JSON object, merged over the config's params.
    #[arg(long)]
    params: Option<String>,

    /// Reference image for targeted mode.
    #[arg(long)]
    target: Option<PathBuf>,

    /// Output file path (.png or .jpg).
    #[arg(short, long, default_value = "output.png")]
    output: PathBuf,

    /// JPEG quality, 1-100.
    #[arg(short, long, default_value_t = 90)]
    quality: u8,
}

/// Combines the config file and command-line overrides.
fn resolve_config(args: &RunArgs) -> Result<AutomatonConfig, CliError> {
    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .map_err(|e| CliError::Input(format!("cannot read {}: {e}", path.display())))?;
            AutomatonConfig::from_json_str(&text)
                .map_err(|e| CliError::Input(format!("invalid config {}: {e}", path.display())))?
        }
        None => match &args.rule {
            Some(rule) => AutomatonConfig::for_rule(rule),
            None => return Err(CliError::Input("no rule given (pass a rule or --config)".into())),
        },
    };
    if let Some(rule) = &args.rule {
        config.rule = rule.clone();
    }
    if let Some(topology) = &args.topology {
        config.topology = Some(topology.clone());
        config.live_topology = None;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(params) = &args.params {
        let overrides: Value = serde_json::from_str(params)
            .map_err(|e| CliError::Input(format!("invalid --params JSON: {e}")))?;
        let Value::Object(overrides) = overrides else {
            return Err(CliError::Input("--params must be a JSON object".into()));
        };
        match &mut config.params {
            Value::Object(map) => map.extend(overrides),
            other => *other = Value::Object(overrides),
        }
    }
    Ok(config)
}

/// Black image with each cell white with probability `density`.
fn seed_image(
    width: usize,
    height: usize,
    density: f32,
    seed: u64,
) -> Result<PixelBuffer<Argb>, RasterError> {
    let mut image = PixelBuffer::filled(width, height, Argb::BLACK)?;
    let mut rng = Xorshift64::new(seed);
    for cell in image.data_mut() {
        if rng.chance(density) {
            *cell = Argb::WHITE;
        }
    }
    Ok(image)
}

fn output_format(path: &Path) -> Result<ImageFormat, CliError> {
    ImageFormat::from_path(path).ok_or_else(|| {
        CliError::Input(format!(
            "cannot infer image format from {} (use .png or .jpg)",
            path.display()
        ))
    })
}

#[tracing::instrument(skip_all, fields(rule = %config.rule, steps = args.steps))]
fn run_automaton(args: &RunArgs, config: &AutomatonConfig) -> Result<PixelBuffer<Argb>, CliError> {
    let format = output_format(&args.output)?;
    let start = match &args.input {
        Some(path) => PixelBuffer::<Argb>::create_from_file(path)?,
        None => seed_image(args.width, args.height, args.density, config.seed)?,
    };
    let mut automaton = match &args.target {
        Some(path) => {
            let target = PixelBuffer::<Argb>::create_from_file(path)?;
            Automaton::<Argb, RuleKind<Argb>>::from_config_with_target(config, target)?
        }
        None => Automaton::<Argb, RuleKind<Argb>>::from_config(config)?,
    };
    tracing::info!(width = start.width(), height = start.height(), "starting run");

    let mut buffers = DoubleBuffer::new(start);
    let mut ctx = JsonContext::new(config.params.clone());
    for i in 0..args.steps {
        ctx.set_time(i as f64);
        automaton.step(&mut buffers, &ctx)?;
    }

    let image = buffers
        .into_front()
        .ok_or(CliError::Config(RasterError::MissingBuffer("front")))?;
    image.write_file(&args.output, format, args.quality)?;
    tracing::info!(output = %args.output.display(), "wrote image");
    Ok(image)
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::List => {
            let rules = RuleKind::<Argb>::list_rules();
            if cli.json {
                let info = serde_json::json!({
                    "rules": rules,
                    "topologies": TOPOLOGY_NAMES,
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("Rules:");
                for name in rules {
                    println!("  {name}");
                }
                println!("Topologies:");
                println!("  {}", TOPOLOGY_NAMES.join(", "));
            }
        }
        Command::Run(args) => {
            let config = resolve_config(&args)?;
            let image = run_automaton(&args, &config)?;
            let (width, height) = image.dim();
            if cli.json {
                let info = serde_json::json!({
                    "rule": config.rule,
                    "topology": config.topology,
                    "width": width,
                    "height": height,
                    "steps": args.steps,
                    "seed": config.seed,
                    "output": args.output.display().to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                eprintln!(
                    "ran {} ({width}x{height}, {} steps, seed {}) -> {}",
                    config.rule,
                    args.steps,
                    config.seed,
                    args.output.display()
                );
            }
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    // A subscriber may already be installed when embedded; keep it.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}
