//! Program runner CLI.
//!
//! Loads a program file, runs it to completion, and prints the final
//! machine state.
//!
//! # Usage
//! ```text
//! accvm <program> [OPTIONS]
//! ```
//!
//! # Arguments
//! - `program`: Program source file to execute
//!
//! # Options
//! - `--mem <cells>`: Comma-separated initial data memory (e.g., `3,0,-7`)
//! - `--limit <n>`: Abort after `n` evaluated instructions
//! - `--no-data`: Omit the data memory listing from the final state
//! - `--no-code`: Omit the instruction listing from the final state
//! - `--quiet`: Suppress info-level log messages
//!
//! # Exit codes
//! - `0`: the program halted normally (or was empty)
//! - `1`: usage error or unreadable program file
//! - `2`: the machine errored

use accvm::output::Console;
use accvm::status::MachineStatus;
use accvm::utils::log::VERBOSE;
use accvm::vm::Machine;
use accvm::{error, info};
use std::env;
use std::process;
use std::sync::atomic::Ordering;

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        print_usage(&args[0]);
        process::exit(if args.len() < 2 { 1 } else { 0 });
    }

    let program_path = &args[1];
    let mut initial_memory: Vec<i64> = Vec::new();
    let mut step_limit: Option<u64> = None;
    let mut show_data = true;
    let mut show_code = true;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--mem" => {
                i += 1;
                if i >= args.len() {
                    error!("--mem requires an argument");
                    process::exit(1);
                }
                initial_memory = parse_memory(&args[i]).unwrap_or_else(|token| {
                    error!("Invalid memory cell: '{token}' is not a valid integer");
                    process::exit(1);
                });
                i += 1;
            }
            "--limit" => {
                i += 1;
                if i >= args.len() {
                    error!("--limit requires an argument");
                    process::exit(1);
                }
                let limit = args[i].parse::<u64>().unwrap_or_else(|_| {
                    error!("Invalid step limit: '{}' is not a valid number", args[i]);
                    process::exit(1);
                });
                step_limit = Some(limit);
                i += 1;
            }
            "--no-data" => {
                show_data = false;
                i += 1;
            }
            "--no-code" => {
                show_code = false;
                i += 1;
            }
            "--quiet" => {
                VERBOSE.store(false, Ordering::Relaxed);
                i += 1;
            }
            other => {
                error!("Unexpected argument: {}", other);
                print_usage(&args[0]);
                process::exit(1);
            }
        }
    }

    let mut machine = Machine::new();
    machine.set_step_limit(step_limit);

    let status = match machine.load_file(program_path, initial_memory) {
        Ok(status) => status,
        Err(e) => {
            error!("{e}");
            process::exit(1);
        }
    };

    match status {
        MachineStatus::Ready => {}
        MachineStatus::Waiting => {
            info!("{program_path} contains no instructions; nothing to run");
            print!("{}", machine.render(show_data, show_code));
            process::exit(0);
        }
        _ => {
            print!("{}", machine.render(show_data, show_code));
            process::exit(2);
        }
    }

    info!("Running {program_path}");
    let status = machine.run(&mut Console);
    print!("{}", machine.render(show_data, show_code));

    process::exit(match status {
        MachineStatus::Errored => 2,
        _ => 0,
    });
}

/// Parses a comma-separated list of integers, returning the bad token on failure.
fn parse_memory(list: &str) -> Result<Vec<i64>, String> {
    if list.trim().is_empty() {
        return Ok(Vec::new());
    }
    list.split(',')
        .map(|token| {
            let token = token.trim();
            token.parse::<i64>().map_err(|_| token.to_string())
        })
        .collect()
}

const USAGE: &str = "\
Accumulator VM

USAGE:
    {program} <program> [OPTIONS]

ARGS:
    <program>    Program source file to execute

OPTIONS:
    --mem <cells>    Comma-separated initial data memory (e.g., 3,0,-7)
    --limit <n>      Abort after n evaluated instructions
    --no-data        Omit the data memory listing from the final state
    --no-code        Omit the instruction listing from the final state
    --quiet          Suppress info-level log messages
    -h, --help       Print this help message

EXAMPLES:
    # Run a program with an empty data memory
    {program} countdown.avm

    # Run with three initial cells and a step budget
    {program} countdown.avm --mem 10,0,0 --limit 10000
";

/// Prints usage information.
fn print_usage(program: &str) {
    info!("{}", USAGE.replace("{program}", program));
}
