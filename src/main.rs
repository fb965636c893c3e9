//! Sumar CLI - verified parallel row reduction
//!
//! # Commands
//!
//! - `run` - generate inputs, reduce both ways, verify, report timings
//! - `info` - show device capabilities

use clap::{Parser, Subcommand};
use sumar::device::Device;
use sumar::error::Result;
use sumar::grid::LaunchConfig;
use sumar::harness::{run, RunConfig, RunReport};
use sumar::matrix::{dump_matrix, dump_weights, random_weights, Matrix};

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Sumar - verified parallel row reduction
///
/// Computes a cube-weighted row reduction with a sequential reference and
/// a grid-stride parallel kernel, and checks that they agree exactly.
#[derive(Parser)]
#[command(name = "sumar")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the reference-vs-parallel comparison
    ///
    /// Examples:
    ///   sumar run
    ///   sumar run -n 2048 --seed 7
    ///   sumar run --groups 16 --group-size 64 --format json
    Run {
        /// Matrix dimension N
        #[arg(short = 'n', long, default_value = "16384")]
        size: usize,

        /// Worker groups in the launch grid
        #[arg(long, default_value = "240")]
        groups: u32,

        /// Workers per group
        #[arg(long, default_value = "32")]
        group_size: u32,

        /// Seed for input generation
        #[arg(long, default_value = "0")]
        seed: u64,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: String,

        /// Print the generated matrix and weights (small sizes only)
        #[arg(long)]
        show_inputs: bool,
    },
    /// Show device capabilities
    Info,
}

fn main() {
    let cli = Cli::parse();

    let outcome = match cli.command {
        Commands::Run {
            size,
            groups,
            group_size,
            seed,
            format,
            show_inputs,
        } => run_comparison(size, groups, group_size, seed, &format, show_inputs),
        Commands::Info => show_info(),
    };

    match outcome {
        Ok(passed) => {
            if !passed {
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(2);
        }
    }
}

fn run_comparison(
    size: usize,
    groups: u32,
    group_size: u32,
    seed: u64,
    format: &str,
    show_inputs: bool,
) -> Result<bool> {
    let device = Device::probe()?;
    let config = RunConfig::new(size)
        .with_launch(LaunchConfig::new(groups, group_size))
        .with_seed(seed);

    if show_inputs {
        print_inputs(&device, &config)?;
    }

    let report = run(&device, &config)?;

    if format == "json" {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).expect("report serializes")
        );
    } else {
        print_text_report(&report);
    }

    Ok(report.verdict.passed())
}

fn print_text_report(report: &RunReport) {
    println!(
        "Time elapsed on initialization with size {} = {:.3} ms",
        report.n, report.init_ms
    );
    println!(
        "Time elapsed on sequential reference with size {} = {:.3} ms",
        report.n, report.reference_ms
    );
    println!(
        "Time elapsed on parallel reduction ({} workers) with size {} = {:.3} ms",
        report.workers, report.n, report.parallel_ms
    );
    println!();
    println!("{}", report.verdict);
}

/// Regenerate the inputs from the seed and dump them
///
/// Generation is deterministic for a fixed seed, so the dump matches what
/// the comparison run will see.
fn print_inputs(device: &Device, config: &RunConfig) -> Result<()> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let matrix = Matrix::random(device, config.n, &mut rng)?;
    let weights = random_weights(device, config.n, &mut rng)?;

    let mut text = String::new();
    dump_matrix(&matrix, &mut text).expect("string sink");
    dump_weights(&weights, &mut text).expect("string sink");
    print!("{text}");
    Ok(())
}

fn show_info() -> Result<bool> {
    let device = Device::probe()?;
    println!("{}", device.props());
    Ok(true)
}
