//! Boss-rush batch simulator CLI.
//!
//! Usage:
//!   cargo run --bin simulate -- [OPTIONS]
//!
//! Examples:
//!   cargo run --bin simulate                          # 100 random episodes
//!   cargo run --bin simulate -- --policy greedy -e 10
//!   cargo run --bin simulate -- --seed 7 --json       # Reproducible, saves JSON

use bossrush::build_info;
use bossrush::catalog::Catalog;
use bossrush::core::EngineConfig;
use bossrush::policy::PolicyKind;
use bossrush::simulator::{run_simulation, SimConfig};
use std::env;
use std::error::Error;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

struct CliOptions {
    config: SimConfig,
    // Engine overrides, applied on top of --config
    seed: Option<u64>,
    steps: Option<u64>,
    agents: Option<usize>,
    config_path: Option<String>,
    catalog_path: Option<String>,
    save_json: bool,
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();
    let options = match parse_args(&args) {
        Ok(Some(options)) => options,
        Ok(None) => return ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {}", message);
            eprintln!("Run with --help for usage.");
            return ExitCode::from(2);
        }
    };

    init_tracing(options.config.verbosity);

    match run(options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbosity: u8) {
    let default_level = match verbosity {
        0 => "error",
        1 => "warn",
        _ => "info",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(options: CliOptions) -> Result<(), Box<dyn Error>> {
    let CliOptions {
        mut config,
        seed,
        steps,
        agents,
        config_path,
        catalog_path,
        save_json,
    } = options;

    if let Some(path) = config_path {
        config.engine = EngineConfig::from_path(&path)?;
        config.seed = config.engine.seed;
    }
    if let Some(seed) = seed {
        config.seed = seed;
        config.engine.seed = seed;
    }
    if let Some(steps) = steps {
        config.engine.step_budget = steps;
    }
    if let Some(agents) = agents {
        config.engine.num_agents = agents;
    }

    let catalog = match catalog_path {
        Some(path) => Catalog::from_json_str(&std::fs::read_to_string(&path)?)?,
        None => Catalog::standard(),
    };

    if config.verbosity >= 1 {
        print_banner(&config);
    }

    let report = run_simulation(&config, catalog)?;

    if config.verbosity >= 1 {
        println!("{}", report.to_text());
    }

    if save_json {
        let filename = format!(
            "sim_report_{}.json",
            chrono::Utc::now().format("%Y%m%d_%H%M%S")
        );
        std::fs::write(&filename, report.to_json()?)?;
        println!("JSON report saved to: {}", filename);
    }

    Ok(())
}

fn print_banner(config: &SimConfig) {
    println!("╔═══════════════════════════════════════════════════════════════╗");
    println!("║                  BOSS RUSH SIMULATOR                          ║");
    println!("╚═══════════════════════════════════════════════════════════════╝");
    println!();
    println!("Configuration:");
    println!("  Episodes:       {}", config.episodes);
    println!("  Agents:         {}", config.engine.num_agents);
    println!("  Step Budget:    {}", config.engine.step_budget);
    println!("  Policy:         {:?}", config.policy);
    println!("  Seed:           {}", config.seed);
    println!();
    println!("Running simulation...");
    println!();
}

fn value<'a>(args: &'a [String], i: usize, flag: &str) -> Result<&'a str, String> {
    args.get(i + 1)
        .map(String::as_str)
        .ok_or_else(|| format!("{} needs a value", flag))
}

fn number<T: std::str::FromStr>(args: &[String], i: usize, flag: &str) -> Result<T, String> {
    let raw = value(args, i, flag)?;
    raw.parse()
        .map_err(|_| format!("{} expects a number, got '{}'", flag, raw))
}

/// `Ok(None)` means the invocation was fully handled (help or version).
fn parse_args(args: &[String]) -> Result<Option<CliOptions>, String> {
    let mut options = CliOptions {
        config: SimConfig::default(),
        seed: None,
        steps: None,
        agents: None,
        config_path: None,
        catalog_path: None,
        save_json: false,
    };

    let mut i = 1;
    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "-e" | "--episodes" => {
                options.config.episodes = number(args, i, flag)?;
                i += 1;
            }
            "-s" | "--seed" => {
                options.seed = Some(number(args, i, flag)?);
                i += 1;
            }
            "-t" | "--steps" => {
                options.steps = Some(number(args, i, flag)?);
                i += 1;
            }
            "-a" | "--agents" => {
                options.agents = Some(number(args, i, flag)?);
                i += 1;
            }
            "-p" | "--policy" => {
                let raw = value(args, i, flag)?;
                options.config.policy = PolicyKind::parse(raw)
                    .ok_or_else(|| format!("unknown policy '{}'", raw))?;
                i += 1;
            }
            "--config" => {
                options.config_path = Some(value(args, i, flag)?.to_string());
                i += 1;
            }
            "--catalog" => {
                options.catalog_path = Some(value(args, i, flag)?.to_string());
                i += 1;
            }
            "--json" => options.save_json = true,
            "-v" | "--verbose" => options.config.verbosity = 2,
            "-q" | "--quiet" => options.config.verbosity = 0,
            "-V" | "--version" => {
                println!("{}", build_info::version_string());
                return Ok(None);
            }
            "-h" | "--help" => {
                print_help();
                return Ok(None);
            }
            other => return Err(format!("unknown argument '{}'", other)),
        }
        i += 1;
    }

    Ok(Some(options))
}

fn print_help() {
    println!("Boss Rush Simulator");
    println!();
    println!("USAGE:");
    println!("    cargo run --bin simulate -- [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -e, --episodes <N>   Number of episodes (default: 100)");
    println!("    -s, --seed <S>       Base seed; episode i uses S + i (default: 42)");
    println!("    -t, --steps <T>      Step budget per episode (default: 200)");
    println!("    -a, --agents <A>     Agents per episode (default: 2)");
    println!("    -p, --policy <P>     random | greedy | llm | fixed:<code> (default: random)");
    println!("    --config <FILE>      Engine config JSON");
    println!("    --catalog <FILE>     Boss/weapon catalog JSON");
    println!("    --json               Save JSON report");
    println!("    -v, --verbose        Per-episode lines and info logs");
    println!("    -q, --quiet          No report on stdout");
    println!("    -V, --version        Print version and build info");
    println!("    -h, --help           Show this help");
    println!();
    println!("The llm policy reads GOOGLE_API_KEY. RUST_LOG overrides log filtering.");
}
