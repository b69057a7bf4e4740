//! Demand paging simulator - Main Entry Point
//!
//! Usage: demand-pager [OPTIONS] <INPUT> <OUTPUT>
//!
//! Reads a trace of process ids, serves each as a request for that
//! process's next page, and writes the final page tables and frame
//! contents to OUTPUT.

use std::path::PathBuf;
use std::process;

use clap::Parser;
use log::{Level, info};

use demand_pager::constants::*;
use demand_pager::io::{read_requests, write_report};
use demand_pager::{SimConfig, Simulation, logging};

#[derive(Parser)]
#[command(name = "demand-pager")]
#[command(about = "Simulates demand paging with process-local-first LRU replacement")]
#[command(version)]
struct Cli {
    /// File containing process ids (whitespace-separated)
    input: PathBuf,

    /// Output file for the page tables and frame contents
    output: PathBuf,

    /// Physical memory size in slots
    #[arg(long, default_value_t = RAM_SIZE)]
    ram_slots: usize,

    /// Slots per page
    #[arg(long, default_value_t = PAGE_SIZE)]
    page_size: usize,

    /// Number of processes
    #[arg(long, default_value_t = PROCESSES)]
    processes: usize,

    /// Pages owned by each process
    #[arg(long, default_value_t = PAGES_PER_PROCESS)]
    pages_per_process: usize,

    /// Print diagnostics to stderr (repeat for more detail)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    // Run the simulation and handle any errors
    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Main logic separated from main() for cleaner error handling
fn run(cli: &Cli) -> demand_pager::Result<()> {
    // Step 1: Validate sizes
    let config = SimConfig::new(cli.ram_slots, cli.page_size, cli.processes, cli.pages_per_process)?;

    // Step 2: Read the whole trace before creating any output
    let requests = read_requests(&cli.input)?;
    info!("Read {} requests from {}", requests.len(), cli.input.display());

    // Step 3: Replay the trace
    let mut sim = Simulation::new(config)?;
    sim.run(&requests)?;

    if logging::is_enabled(Level::Info) {
        let stats = sim.stats();
        info!("=== Summary ===");
        info!("Requests:  {}", stats.requests);
        info!("Hits:      {}", stats.hits);
        info!("Faults:    {}", stats.faults);
        info!("Evictions: {}", stats.evictions);
    }

    // Step 4: Write the final state
    write_report(&cli.output, &sim)?;
    info!("Results written to: {}", cli.output.display());

    Ok(())
}
