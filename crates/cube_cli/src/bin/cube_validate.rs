//! # Cube Validate
//!
//! Runs the known rotation sequences on a fresh cube and prints each final
//! state as an unfolded net.
//!
//! Exit code 0 when every sequence matches, 1 otherwise.

use cube_cli::render;
use cube_cli::validate::KNOWN_SEQUENCES;

fn main() {
    if let Err(e) = cube_cli::logging::init("warn") {
        eprintln!("Error: {e}");
        std::process::exit(2);
    }

    println!("╔══════════════════════════════════════════════════════════════════╗");
    println!("║         CONCURRENT CUBE - KNOWN SEQUENCE VALIDATION              ║");
    println!("╚══════════════════════════════════════════════════════════════════╝");
    println!();

    let mut all_passed = true;
    for sequence in &KNOWN_SEQUENCES {
        let verdict = match sequence.run() {
            Ok(v) => v,
            Err(e) => {
                eprintln!("Error: {}: {e}", sequence.name);
                std::process::exit(2);
            }
        };

        println!("┌─ {} ", sequence.name);
        println!("│ Size:      {}", sequence.size);
        println!("│ Moves:     {:?}", sequence.moves);
        println!("│ Cube:      {}", verdict.shown);
        println!("│ Model:     {}", verdict.model);
        println!("│ Expected:  {}", sequence.expected);
        println!("│ Result:    {}", if verdict.passed { "PASS" } else { "FAIL" });
        println!("└──────────────────────────────────────────────────────────────────");

        match render::net(&verdict.shown, sequence.size) {
            Ok(net) => println!("{net}"),
            Err(e) => eprintln!("Error: {e}"),
        }
        all_passed &= verdict.passed;
    }

    if all_passed {
        println!("✓ All sequences match");
    } else {
        println!("✗ Some sequences differ from their expected state");
        std::process::exit(1);
    }
}
