//! Memory-management simulator - Main Entry Point
//!
//! Usage: memsim [OPTIONS] <scenario_file>
//!
//! The scenario file drives one engine through allocations, page accesses,
//! deallocations, reports and exports (see `memsim::io` for the format).
//! Engine-level failures (a full memory, an out-of-range page) are
//! reported and the run continues, the way an interactive session would;
//! unreadable or malformed scenarios abort.

use std::env;
use std::fs;
use std::path::PathBuf;
use std::process;

use log::LevelFilter;

use memsim::MemoryManager;
use memsim::io::{Command, Scenario, ScenarioError};
use memsim::report;

mod logger;

/// Defaults used until the scenario issues its own `init`.
const DEFAULT_MEMORY_SIZE: usize = 1024;
const DEFAULT_FRAME_SIZE: usize = 64;

/// Command-line configuration
struct Config {
    scenario_file: String,
    verbose: bool,
}

fn main() {
    let config = match parse_args() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    };

    logger::init(if config.verbose { LevelFilter::Debug } else { LevelFilter::Warn });

    if let Err(e) = run(&config) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn print_help(program: &str) {
    eprintln!("Memory-management simulator - paging, segmentation, FIFO/LRU replacement");
    eprintln!();
    eprintln!("Usage: {program} [OPTIONS] <scenario_file>");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  scenario_file - Script of simulator commands, one per line");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -v, --verbose  Print each command's outcome and engine debug logs");
    eprintln!("  -h, --help     Print this help message");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  {program} demo.sim");
    eprintln!("  {program} -v demo.sim");
}

fn parse_args() -> Result<Config, String> {
    let args: Vec<String> = env::args().collect();
    let program = &args[0];

    let mut verbose = false;
    let mut positional: Vec<&String> = Vec::new();

    for arg in &args[1..] {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help(program);
                process::exit(0);
            }
            "-v" | "--verbose" => {
                verbose = true;
            }
            _ if arg.starts_with('-') => {
                return Err(format!("Unknown option: {arg}\nUse --help for usage information."));
            }
            _ => {
                positional.push(arg);
            }
        }
    }

    if positional.len() != 1 {
        print_help(program);
        return Err(format!("\nError: Expected 1 argument, got {}", positional.len()));
    }

    Ok(Config { scenario_file: positional[0].clone(), verbose })
}

fn run(config: &Config) -> Result<(), ScenarioError> {
    let scenario = Scenario::from_file(&config.scenario_file)?;

    let mut manager = MemoryManager::new(DEFAULT_MEMORY_SIZE, DEFAULT_FRAME_SIZE)?;
    let mut failures = 0usize;

    for command in &scenario.commands {
        match execute(&mut manager, command, config.verbose) {
            Ok(()) => {}
            // Engine rejections are survivable; the run keeps going the way
            // an interactive session shrugs off a failed form submission.
            Err(ScenarioError::Sim(e)) => {
                failures += 1;
                eprintln!("error: {e}");
            }
            Err(e) => return Err(e),
        }
    }

    if config.verbose {
        let snap = manager.snapshot();
        eprintln!();
        eprintln!("=== Summary ===");
        eprintln!("Commands run:  {}", scenario.commands.len());
        eprintln!("Failed:        {failures}");
        eprintln!("Processes:     {}", snap.process_ids.len());
        eprintln!("Frames in use: {}/{}", snap.used_frames(), snap.total_frames());
        eprintln!("Fault log:     {} entries", snap.fault_count());
        for line in &snap.fault_log {
            eprintln!("  {line}");
        }
    }

    Ok(())
}

fn execute(
    manager: &mut MemoryManager,
    command: &Command,
    verbose: bool,
) -> Result<(), ScenarioError> {
    match command {
        Command::Init { memory_size, frame_size } => {
            *manager = MemoryManager::new(*memory_size, *frame_size)?;
            if verbose {
                eprintln!(
                    "init: {memory_size} bytes, {frame_size}-byte frames, {} total",
                    manager.total_frames()
                );
            }
        }
        Command::Paging { pid, size } => {
            let table = manager.allocate_paging(pid, *size)?;
            if verbose {
                let resident = table.iter().filter(|e| e.resident()).count();
                eprintln!("paging {pid}: {} pages, {resident} resident", table.len());
            }
        }
        Command::Segmentation { pid, requests } => {
            let segments = manager.allocate_segmentation(pid, requests)?;
            if verbose {
                for segment in &segments {
                    eprintln!(
                        "seg {pid}: {} at [{}, {})",
                        segment.name,
                        segment.base,
                        segment.base + segment.limit
                    );
                }
            }
        }
        Command::Access { pid, page, algorithm } => {
            let outcome = manager.access_page(pid, *page, algorithm)?;
            if verbose {
                match &outcome.replacement {
                    Some(message) => eprintln!("access {pid} page {page} -> {message}"),
                    None if outcome.fault => {
                        eprintln!("access {pid} page {page} -> fault, loaded free frame");
                    }
                    None => eprintln!("access {pid} page {page} -> hit"),
                }
            }
        }
        Command::Touch { pid, algorithm } => {
            let faults = manager.access_all(pid, algorithm)?;
            if verbose {
                eprintln!("touch {pid}: {faults} faults");
            }
        }
        Command::Free { pid } => {
            manager.deallocate(pid);
            if verbose {
                eprintln!("free {pid}");
            }
        }
        Command::Reset => {
            manager.reset();
            if verbose {
                eprintln!("reset");
            }
        }
        Command::Report => {
            print!("{}", report::render_report(&manager.snapshot(), &manager.process_stats()));
        }
        Command::Export { path } => {
            let json = report::export_json(&manager.snapshot(), &manager.process_stats())?;
            fs::write(path, json).map_err(|source| ScenarioError::Write {
                path: PathBuf::from(path),
                source,
            })?;
            if verbose {
                eprintln!("export: wrote {path}");
            }
        }
    }
    Ok(())
}
