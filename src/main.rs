//! Household energy scheduler entry point: CLI wiring, training and reporting.

use std::path::Path;
use std::process;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use home_energy_rl::agent::progress::TracingSink;
use home_energy_rl::cli::{self, CliOptions};
use home_energy_rl::config::ScenarioConfig;
use home_energy_rl::io::export::{export_simulation_csv, export_training_csv};
use home_energy_rl::io::qtable::{load_q_table, save_q_table};
use home_energy_rl::runner::run_scenario;

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_scenario(cli: &CliOptions) -> ScenarioConfig {
    let loaded = if let Some(ref path) = cli.scenario {
        ScenarioConfig::from_toml_file(path)
    } else {
        ScenarioConfig::from_preset(cli.preset.as_deref().unwrap_or("household"))
    };
    match loaded {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    }
}

fn main() {
    let cli = match cli::parse_args() {
        Ok(opts) => opts,
        Err(e) => {
            eprintln!("error: {e}");
            cli::print_usage();
            process::exit(2);
        }
    };
    if cli.help {
        cli::print_usage();
        return;
    }

    init_tracing();

    let mut scenario = load_scenario(&cli);

    // Apply overrides
    if let Some(seed) = cli.seed {
        scenario.agent.seed = seed;
    }
    if let Some(episodes) = cli.episodes {
        scenario.agent.episodes = episodes;
    }

    let errors = scenario.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    let table = cli.q_table_in.as_deref().map(|path| {
        load_q_table(path).unwrap_or_else(|e| {
            eprintln!("error: failed to load value table from {}: {e}", path.display());
            process::exit(1);
        })
    });

    let (agent, run) = match run_scenario(&scenario, table, &mut TracingSink) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    };

    // Per-hour trace
    for h in &run.trace.hours {
        println!("{h}");
    }
    println!();
    for (name, states) in &run.trace.device_states {
        let row: String = states.iter().map(|&s| if s != 0 { '#' } else { '.' }).collect();
        println!("{name:<20} {row}");
    }

    println!("\n{}", run.training_report);
    println!("\n{}", run.simulation_report);

    if let Some(ref path) = cli.telemetry_out {
        write_or_exit(export_simulation_csv(&run.trace, path), path, "simulation CSV");
    }
    if let Some(ref path) = cli.training_out {
        write_or_exit(
            export_training_csv(
                &run.training.episode_rewards,
                &run.training.episode_consumptions,
                path,
            ),
            path,
            "training CSV",
        );
    }
    if let Some(ref path) = cli.q_table_out {
        write_or_exit(save_q_table(agent.q_table(), path), path, "value table");
    }
}

fn write_or_exit<E: std::fmt::Display>(result: Result<(), E>, path: &Path, what: &str) {
    if let Err(e) = result {
        eprintln!("error: failed to write {what}: {e}");
        process::exit(1);
    }
    eprintln!("{what} written to {}", path.display());
}
