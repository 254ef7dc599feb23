//! # Cube Stress
//!
//! Random rotations and snapshots from many threads, every snapshot checked
//! against a sequential replay.
//!
//! Usage: `cube_stress [config.toml] [--threads N] [--duration-ms N] [--size N]`

use std::fmt::Display;
use std::str::FromStr;

use cube_cli::stress::{self, StressConfig};
use cube_cli::{render, CliError, CliResult};

fn parse_value<T>(flag: &str, value: &str) -> CliResult<T>
where
    T: FromStr,
    T::Err: Display,
{
    value
        .parse()
        .map_err(|e| CliError::Usage(format!("{flag} {value}: {e}")))
}

fn parse_args(args: &[String]) -> CliResult<StressConfig> {
    let mut config = StressConfig::default();
    let mut i = 0;

    if let Some(first) = args.first().filter(|a| !a.starts_with("--")) {
        config = StressConfig::load(first)?;
        i = 1;
    }

    while i < args.len() {
        let flag = args[i].as_str();
        let value = args
            .get(i + 1)
            .ok_or_else(|| CliError::Usage(format!("{flag} needs a value")))?;
        match flag {
            "--threads" => config.threads = parse_value(flag, value)?,
            "--duration-ms" => config.duration_ms = parse_value(flag, value)?,
            "--size" => config.cube.size = parse_value(flag, value)?,
            "--seed" => config.seed = parse_value(flag, value)?,
            other => return Err(CliError::Usage(format!("unknown option {other}"))),
        }
        i += 2;
    }

    config.validate()?;
    Ok(config)
}

fn main() {
    if let Err(e) = cube_cli::logging::init("info") {
        eprintln!("Error: {e}");
        std::process::exit(2);
    }

    println!("╔══════════════════════════════════════════════════════════════════╗");
    println!("║         CONCURRENT CUBE - STRESS RUN                             ║");
    println!("║         Every snapshot replayed against a sequential model       ║");
    println!("╚══════════════════════════════════════════════════════════════════╝");
    println!();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "--help") {
        println!("Usage: cube_stress [config.toml] [options]");
        println!();
        println!("Options:");
        println!("  --threads <n>       Worker threads");
        println!("  --duration-ms <n>   Wall-clock budget");
        println!("  --size <n>          Cube edge length");
        println!("  --seed <n>          Base random seed");
        return;
    }

    let config = match parse_args(&args) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(2);
        }
    };

    let report = match stress::run(&config) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(2);
        }
    };

    println!("┌─ RESULTS ────────────────────────────────────────────────────────");
    println!("│ Threads:            {}", config.threads);
    println!("│ Cube size:          {}", config.cube.size);
    println!("│ Elapsed:            {:.2?}", report.elapsed);
    println!("│ Rotations:          {}", report.rotations());
    println!("│ Snapshots:          {}", report.shows());
    println!("│ Mismatched:         {}", report.mismatches());
    println!("│ Final state replay: {}", if report.final_state_matches { "match" } else { "DIFFERS" });
    println!("│ Colors balanced:    {}", report.color_balanced);
    for worker in &report.workers {
        println!(
            "│  - worker {:>2}: {} rotations, {} snapshots",
            worker.worker, worker.rotations, worker.shows
        );
    }
    println!("└──────────────────────────────────────────────────────────────────");
    println!();

    if let Ok(net) = render::net(&report.final_state, config.cube.size) {
        println!("{net}");
    }

    if report.passed() {
        println!("✓ Every snapshot matched the replay");
    } else {
        println!("✗ Linearizability violated");
        std::process::exit(1);
    }
}
