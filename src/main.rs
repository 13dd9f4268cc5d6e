//! Page replacement simulator - Main Entry Point
//!
//! Usage: page-replacement [OPTIONS] <INIT_FILE> <TRACE_FILE>
//!
//! Arguments:
//!   INIT_FILE  - Frame pool, paging algorithm and process definitions
//!   TRACE_FILE - One access per line: `<pid> <vpage> [clock]`

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::info;

use page_replacement::dump::{dump_process, ProcessDump};
use page_replacement::io::{read_trace, report_json, write_results, InitData};
use page_replacement::{Algorithm, ConfigError, VmManager};

/// Simulate demand paging with FIFO, LRU, CLOCK or COUNT page replacement
#[derive(Parser)]
#[command(name = "page-replacement")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Initialization file with frame pool and process definitions
    #[arg(value_name = "INIT_FILE")]
    init_file: PathBuf,

    /// File of virtual page accesses
    #[arg(value_name = "TRACE_FILE")]
    trace_file: PathBuf,

    /// Replacement algorithm (fifo, lru, clock, count); overrides the init file
    #[arg(short, long)]
    algorithm: Option<Algorithm>,

    /// Write the frame used by each access (-1 for failures) to this file
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Print every process's page table at the end of the run
    #[arg(long)]
    dump: bool,

    /// Print the statistics report as JSON
    #[arg(long)]
    json: bool,

    /// Log every load and eviction
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), ConfigError> {
    let init_data = InitData::from_file(&cli.init_file)?;
    let mut vm = init_data.build(cli.algorithm)?;
    let events = read_trace(&cli.trace_file)?;

    info!(
        "simulating {} accesses over {} processes with {} ({} free frames)",
        events.len(),
        init_data.processes.len(),
        vm.kernel().algorithm,
        vm.kernel().frames.free_count()
    );

    let results = vm.run_trace(&events);

    if let Some(path) = &cli.output {
        write_results(path, &results)?;
        info!("results written to {}", path.display());
    }

    if cli.dump {
        for prc in vm.processes() {
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&ProcessDump::capture(prc))?);
            } else {
                println!("{}", dump_process(prc));
            }
        }
    }

    print_report(&vm, cli.json)
}

fn print_report(vm: &VmManager, json: bool) -> Result<(), ConfigError> {
    let report = vm.report();
    if json {
        println!("{}", report_json(&report)?);
        return Ok(());
    }

    println!("=== {} Summary ===", report.algorithm);
    for p in &report.processes {
        println!(
            "Process {}: {} accesses, {} hits, {} faults ({} replacements, {} unresolved), \
             fault rate {:.3}, frames {}/{}{}",
            p.pid,
            p.stats.accesses,
            p.stats.hits,
            p.stats.faults,
            p.stats.replacements,
            p.stats.unresolved,
            p.fault_rate,
            p.frames,
            p.max_frames,
            if p.halted { " [HALTED]" } else { "" }
        );
    }
    println!("Free frames left: {}", report.free_frames);
    Ok(())
}
