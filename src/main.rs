//! terrain-preview: headless terrain generation from a generator config.
//!
//! Usage: terrain-preview [config-path] [--json] [--survey N]

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

use terrain_core::config::GeneratorConfig;
use terrain_core::logging;
use terrain_core::survey::{run_survey, SurveyConfig};
use terrain_core::world::WorldGenerator;

const DEFAULT_CONFIG_PATH: &str = "config/generator.json";

#[derive(Debug, Default)]
struct Args {
    config_path: Option<PathBuf>,
    json: bool,
    survey: Option<u64>,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Args> {
    let mut parsed = Args::default();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--json" => parsed.json = true,
            "--survey" => {
                let count = args.next().context("--survey needs a build count")?;
                parsed.survey = Some(
                    count
                        .parse()
                        .with_context(|| format!("invalid survey count: {}", count))?,
                );
            }
            flag if flag.starts_with("--") => bail!("unknown flag: {}", flag),
            path => parsed.config_path = Some(PathBuf::from(path)),
        }
    }
    Ok(parsed)
}

fn load_config(path: Option<&Path>) -> Result<GeneratorConfig> {
    match path {
        Some(path) => GeneratorConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
            Ok(GeneratorConfig::load(DEFAULT_CONFIG_PATH)?)
        }
        None => Ok(GeneratorConfig::default()),
    }
}

fn main() -> Result<()> {
    let args = parse_args(std::env::args().skip(1))?;
    let config = load_config(args.config_path.as_deref())?;
    logging::init_tracing(&config.tracing);

    let seed = config.seed;
    let mut generator = WorldGenerator::new(config)?;

    if let Some(build_count) = args.survey {
        let report = run_survey(
            &generator,
            &SurveyConfig {
                build_count,
                base_seed: seed,
            },
        );
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let map = generator.generate();
    if args.json {
        println!("{}", map.summary().to_json());
    } else {
        print!("{}", map.fine());
        let outcome = map.outcome().map(|o| o.as_str()).unwrap_or("aborted");
        println!(
            "seed {} attempt {}: {} after {} steps",
            map.seed(),
            map.attempt(),
            outcome,
            map.steps()
        );
    }
    Ok(())
}
