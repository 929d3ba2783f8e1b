use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

use gridsearch::io::{create_spinner, format_grid, format_result};
use gridsearch::parallel::DEFAULT_POOL_WORKERS;
use gridsearch::{generate_grid, search_with_baseline, Strategy};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Method {
    /// Divide and conquer with work stealing
    Stealing,
    /// One task per row on a fixed worker pool
    Dealing,
}

#[derive(Parser, Debug)]
#[command(name = "gridsearch")]
#[command(about = "Find the first cell whose value equals row + col", long_about = None)]
#[command(allow_negative_numbers = true)]
struct Args {
    /// Number of rows
    rows: usize,

    /// Number of columns
    cols: usize,

    /// Smallest generated value (inclusive)
    min: i64,

    /// Largest generated value (inclusive)
    max: i64,

    /// Search method
    #[arg(short, long, value_enum, default_value_t = Method::Stealing)]
    strategy: Method,

    /// Number of worker threads (stealing: CPU cores, dealing: 4)
    #[arg(short = 'j', long)]
    threads: Option<usize>,

    /// Largest row range scanned without splitting (stealing only)
    #[arg(long, default_value_t = 1)]
    threshold: usize,

    /// Seed for reproducible grids
    #[arg(long)]
    seed: Option<u64>,

    /// Print the generated grid
    #[arg(long)]
    print_grid: bool,

    /// Disable the progress spinner
    #[arg(short, long)]
    quiet: bool,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&args.log_level))
        .context("Invalid log level")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let grid = generate_grid(args.rows, args.cols, args.min, args.max, args.seed)
        .context("Failed to generate grid")?;

    if args.print_grid {
        println!("Generated array:");
        print!("{}", format_grid(&grid));
    }

    let strategy = match args.strategy {
        Method::Stealing => Strategy::DivideAndConquer {
            threshold: args.threshold,
            workers: args.threads,
        },
        Method::Dealing => Strategy::PartitionedPool {
            workers: args.threads.unwrap_or(DEFAULT_POOL_WORKERS),
        },
    };

    let progress = if !args.quiet {
        Some(create_spinner("Searching"))
    } else {
        None
    };

    let start_time = Instant::now();
    let outcome = search_with_baseline(&grid, &strategy);
    let elapsed = start_time.elapsed();

    if let Some(ref pb) = progress {
        pb.finish_and_clear();
    }

    let result = outcome.context("Search failed")?;

    println!("Result: {}", format_result(&result));
    println!("Execution time: {:.3} ms", elapsed.as_secs_f64() * 1e3);

    Ok(())
}
