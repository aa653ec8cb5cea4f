mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::property::{AnalyzeArgs, ScheduleArgs};
use commands::scenarios::{MatrixArgs, SensitivityArgs};

/// Rental property investment analysis
#[derive(Parser)]
#[command(
    name = "rentcalc",
    version,
    about = "Rental property investment analysis",
    long_about = "A CLI for analysing rental property investments with decimal precision. \
                  Computes cash flow, cap rate, cash-on-cash return, DSCR and a 5-year \
                  projection, plus one-way and price x rent sensitivity tables."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Cash flow, return metrics and 5-year projection for one property
    Analyze(AnalyzeArgs),
    /// One-way sensitivity table for a single input
    Sensitivity(SensitivityArgs),
    /// Cash-on-cash return over a 7x7 price x rent grid
    Matrix(MatrixArgs),
    /// Year-by-year loan amortization schedule
    Schedule(ScheduleArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Analyze(args) => commands::property::run_analyze(args),
        Commands::Sensitivity(args) => commands::scenarios::run_sensitivity(args),
        Commands::Matrix(args) => commands::scenarios::run_matrix(args),
        Commands::Schedule(args) => commands::property::run_schedule(args),
        Commands::Version => {
            println!("rentcalc {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
