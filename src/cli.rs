use std::env;
use std::path::PathBuf;

/// Parsed command-line options.
#[derive(Debug, Default)]
pub struct CliOptions {
    pub scenario: Option<PathBuf>,
    pub preset: Option<String>,
    pub seed: Option<u64>,
    pub episodes: Option<usize>,
    pub q_table_in: Option<PathBuf>,
    pub q_table_out: Option<PathBuf>,
    pub telemetry_out: Option<PathBuf>,
    pub training_out: Option<PathBuf>,
    pub help: bool,
}

pub fn parse_args() -> Result<CliOptions, String> {
    let args: Vec<String> = env::args().skip(1).collect();
    parse_args_from(args)
}

/// Parses arguments (without the program name).
///
/// With neither `--scenario` nor `--preset`, the `household` preset is used.
pub fn parse_args_from(args: Vec<String>) -> Result<CliOptions, String> {
    let mut opts = CliOptions::default();
    let mut i = 0usize;

    while i < args.len() {
        match args[i].as_str() {
            "--scenario" => {
                i += 1;
                let path = args.next_or_err(
                    i,
                    "missing value for --scenario (expected a TOML file path)",
                )?;
                set_once(&mut opts.scenario, PathBuf::from(path), "--scenario")?;
            }
            "--preset" => {
                i += 1;
                let name =
                    args.next_or_err(i, "missing value for --preset (expected a preset name)")?;
                set_once(&mut opts.preset, name.to_string(), "--preset")?;
            }
            "--seed" => {
                i += 1;
                let raw = args.next_or_err(i, "missing value for --seed (expected a u64)")?;
                let seed = raw
                    .parse::<u64>()
                    .map_err(|_| format!("--seed value \"{raw}\" is not a valid u64"))?;
                set_once(&mut opts.seed, seed, "--seed")?;
            }
            "--episodes" => {
                i += 1;
                let raw = args.next_or_err(i, "missing value for --episodes (expected a count)")?;
                let n = raw
                    .parse::<usize>()
                    .map_err(|_| format!("--episodes value \"{raw}\" is not a valid count"))?;
                set_once(&mut opts.episodes, n, "--episodes")?;
            }
            "--q-table-in" => {
                i += 1;
                let path = args.next_or_err(
                    i,
                    "missing value for --q-table-in (expected a JSON file path)",
                )?;
                set_once(&mut opts.q_table_in, PathBuf::from(path), "--q-table-in")?;
            }
            "--q-table-out" => {
                i += 1;
                let path = args.next_or_err(
                    i,
                    "missing value for --q-table-out (expected a JSON file path)",
                )?;
                set_once(&mut opts.q_table_out, PathBuf::from(path), "--q-table-out")?;
            }
            "--telemetry-out" => {
                i += 1;
                let path = args.next_or_err(
                    i,
                    "missing value for --telemetry-out (expected a file path)",
                )?;
                set_once(&mut opts.telemetry_out, PathBuf::from(path), "--telemetry-out")?;
            }
            "--training-out" => {
                i += 1;
                let path = args.next_or_err(
                    i,
                    "missing value for --training-out (expected a file path)",
                )?;
                set_once(&mut opts.training_out, PathBuf::from(path), "--training-out")?;
            }
            "--help" | "-h" => {
                opts.help = true;
                return Ok(opts);
            }
            other => return Err(format!("unknown argument: {other}")),
        }
        i += 1;
    }

    if opts.scenario.is_some() && opts.preset.is_some() {
        return Err(
            "arguments `--scenario` and `--preset` are mutually exclusive; choose one source"
                .to_string(),
        );
    }

    if opts.scenario.is_none() && opts.preset.is_none() {
        opts.preset = Some("household".to_string());
    }

    Ok(opts)
}

fn set_once<T>(slot: &mut Option<T>, value: T, flag: &str) -> Result<(), String> {
    if slot.replace(value).is_some() {
        return Err(format!("{flag} provided more than once"));
    }
    Ok(())
}

trait SliceArgExt {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String>;
}

impl SliceArgExt for [String] {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String> {
        self.get(index)
            .map(String::as_str)
            .ok_or_else(|| err.to_string())
    }
}

pub fn print_usage() {
    eprintln!("home-energy-rl: learn an hourly on/off schedule for household appliances");
    eprintln!();
    eprintln!("Usage: home-energy-rl [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --scenario <path>        Load scenario from TOML config file");
    eprintln!("  --preset <name>          Use a built-in preset (household, night_owl, comfort)");
    eprintln!("  --seed <u64>             Override random seed");
    eprintln!("  --episodes <n>           Override number of training episodes");
    eprintln!("  --q-table-in <path>      Start from a saved value table (JSON)");
    eprintln!("  --q-table-out <path>     Save the learned value table (JSON)");
    eprintln!("  --telemetry-out <path>   Export the simulated day to CSV");
    eprintln!("  --training-out <path>    Export per-episode totals to CSV");
    eprintln!("  --help                   Show this help message");
    eprintln!();
    eprintln!("If no --scenario or --preset is given, the household preset is used.");
    eprintln!("Set RUST_LOG (e.g. RUST_LOG=debug) to control log output.");
}
