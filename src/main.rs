//! Tetromino Stacking Optimizer
//!
//! Drops a sequence of tetromino pieces onto a fixed-width grid, searching
//! every column and rotation choice for the stacking with the lowest final
//! height, and prints the winning arrangement.

use std::time::Instant;

use clap::{Parser, Subcommand};

use stacker::space::Space;
use stacker::{grid, pieces, solve, solver, Sequence};

/// Finds the lowest-stacking drop columns and rotations for a piece sequence.
#[derive(Parser)]
#[command(name = "stacker")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Solve a sequence and print the best arrangement.
    Solve {
        /// Piece letters in drop order, e.g. "ZOZS".
        sequence: String,
        /// Allow rotated drops (90-degree anticlockwise steps).
        #[arg(short, long)]
        rotate: bool,
        /// Grid width in columns.
        #[arg(long, default_value_t = 6)]
        width: usize,
        /// Number of parallel workers.
        #[arg(long, default_value_t = solver::DEFAULT_WORKERS)]
        workers: usize,
    },
    /// Print the size of a sequence's drop permutation space.
    Count {
        /// Piece letters in drop order.
        sequence: String,
        /// Allow rotated drops.
        #[arg(short, long)]
        rotate: bool,
        /// Grid width in columns.
        #[arg(long, default_value_t = 6)]
        width: usize,
    },
}

fn main() -> anyhow::Result<()> {
    match Cli::parse().command {
        Command::Solve {
            sequence,
            rotate,
            width,
            workers,
        } => run_solve(&sequence, rotate, width, workers),
        Command::Count {
            sequence,
            rotate,
            width,
        } => run_count(&sequence, rotate, width),
    }
}

/// Solves a sequence and prints the resulting stack, placements, and timing.
fn run_solve(text: &str, rotate: bool, width: usize, workers: usize) -> anyhow::Result<()> {
    let sequence = Sequence::parse(text, rotate)?;

    println!("Puzzle: {sequence}");
    println!("Solving...");

    let start = Instant::now();
    let solution = solve(&sequence, width, workers)?;
    let total = Space::new(&sequence, width)?.total();

    println!();
    print!(
        "{}",
        grid::render(&sequence, &solution.columns, &solution.rotations, width)
    );
    println!();

    print!("Best piece placements:");
    for (index, kind) in sequence.pieces().iter().enumerate() {
        print!(
            " {}:{}({}°)",
            kind.symbol(),
            solution.columns[index],
            solution.rotations[index] * 90
        );
    }
    println!();
    println!();

    println!("Tried all {total} permutations");
    println!("Minimum stack height: {}", solution.stack_height);
    println!("Elapsed time: {}s", start.elapsed().as_secs());
    Ok(())
}

/// Prints the permutation count for a sequence.
fn run_count(text: &str, rotate: bool, width: usize) -> anyhow::Result<()> {
    anyhow::ensure!(
        width >= pieces::MAX_PIECE_EXTENT,
        "grid width {width} is narrower than the widest piece ({} columns)",
        pieces::MAX_PIECE_EXTENT
    );
    let sequence = Sequence::parse(text, rotate)?;
    let space = Space::new(&sequence, width)?;
    println!("{} permutations", space.total());
    Ok(())
}
