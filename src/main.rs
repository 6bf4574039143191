use anyhow::{Context, Result};
use clap::Parser;
use order_grid::{request, solve_with, PuzzleFormat};
use std::io::{self, Read};
use tracing_subscriber::EnvFilter;

/// Resolve a partial relation grid into a strict total order.
#[derive(Parser)]
#[command(name = "order-grid", version, about)]
struct Args {
    /// Puzzle string, e.g. "ABCD A=>-- B-=>- C--=> D---=" (read from stdin if omitted).
    puzzle: Option<String>,

    /// Number of entities in the grid.
    #[arg(long, default_value_t = 4)]
    entities: usize,

    /// Treat the input as a raw request parameter: strip the question prefix
    /// and flatten line breaks before parsing.
    #[arg(long)]
    request: bool,

    /// Print the solution as JSON instead of a labeled grid.
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let input = match args.puzzle {
        Some(p) => p,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf).context("reading puzzle from stdin")?;
            buf
        }
    };
    let raw = if args.request {
        request::extract_puzzle(&input)
    } else {
        input.split_whitespace().collect::<Vec<_>>().join(" ")
    };

    let solution = solve_with(&raw, &PuzzleFormat::new(args.entities))
        .with_context(|| format!("solving {raw:?}"))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&solution)?);
    } else {
        println!("{solution}");
    }
    Ok(())
}
