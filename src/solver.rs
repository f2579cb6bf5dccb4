//! Branch-and-bound search over the drop permutation space.
//!
//! The coordinator splits the space into near-equal contiguous ranges, one
//! per worker. Each worker owns its own counter, column heights, prefix
//! cache, and best result; workers never share mutable state, so they run on
//! independent threads (or synchronously, with identical results) and are
//! merged only after the join.

use std::thread;
use std::time::Instant;

use thiserror::Error;

use crate::counter::{Advance, Counter};
use crate::grid;
use crate::pieces::MAX_PIECE_EXTENT;
use crate::sequence::Sequence;
use crate::space::{Overflow, Space};

/// Permutations between progress lines.
const PROGRESS_INTERVAL: u64 = 10_000_000;

/// Default number of parallel workers.
pub const DEFAULT_WORKERS: usize = 10;

/// Reasons a solve cannot run.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SolveError {
    #[error(transparent)]
    Overflow(#[from] Overflow),

    #[error("grid width {width} is narrower than the widest piece ({required} columns)")]
    GridTooNarrow { width: usize, required: usize },

    #[error("worker count must be at least 1")]
    NoWorkers,
}

/// The best placement found: per-piece drop columns and rotations, and the
/// stack height they produce.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Solution {
    pub stack_height: u32,
    pub columns: Vec<usize>,
    pub rotations: Vec<usize>,
}

/// One search worker: owns a contiguous range of the permutation space.
struct Worker {
    id: usize,
    counter: Counter,
    /// Current column heights.
    heights: Vec<u32>,
    /// Column heights saved after dropping each prefix of the sequence,
    /// indexed by piece; the last piece is never cached.
    saved: Vec<Vec<u32>>,
    /// Earliest piece whose counters differ from the previous permutation;
    /// prefixes before it can be restored from `saved`.
    last_changed: usize,
    best_height: u32,
    best_columns: Vec<usize>,
    best_rotations: Vec<usize>,
    /// Permutations consumed so far (evaluated or skipped).
    consumed: u64,
    assigned: u64,
}

impl Worker {
    fn new(id: usize, counter: Counter, assigned: u64, space: &Space, ceiling: u32) -> Self {
        let len = space.sequence().len();
        Self {
            id,
            counter,
            heights: vec![0; space.grid_width()],
            saved: vec![vec![0; space.grid_width()]; len.saturating_sub(1)],
            last_changed: 0,
            best_height: ceiling,
            best_columns: vec![0; len],
            best_rotations: vec![0; len],
            consumed: 0,
            assigned,
        }
    }

    #[inline]
    fn finished(&self) -> bool {
        self.consumed >= self.assigned
    }

    /// Runs the worker to exhaustion of its assigned range.
    fn run(&mut self, space: &Space) {
        let start = Instant::now();
        let mut next_report = 1;

        while self.consumed < self.assigned {
            if let Some(height) = self.try_permutation(space) {
                if height < self.best_height {
                    self.best_height = height;
                    self.best_columns = self.counter.columns();
                    self.best_rotations = self.counter.rotations();
                    // cached prefixes predate the new pruning bound
                    self.last_changed = 0;
                    self.counter.advance_one(space);
                } else {
                    self.last_changed = match self.counter.advance_one(space) {
                        Advance::Changed(index) => index,
                        Advance::Exhausted => 0,
                    };
                }
                self.consumed += 1;
            }

            if self.consumed / PROGRESS_INTERVAL >= next_report {
                self.report_progress(start);
                next_report = self.consumed / PROGRESS_INTERVAL + 1;
            }
        }
    }

    /// Stacks the current permutation. Returns its stack height, or `None`
    /// when an intermediate prefix could not beat the current best and the
    /// whole subtree sharing it was skipped.
    fn try_permutation(&mut self, space: &Space) -> Option<u32> {
        let sequence = space.sequence();
        let len = sequence.len();

        // reload the longest still-valid prefix
        if self.last_changed > 0 {
            self.heights
                .copy_from_slice(&self.saved[self.last_changed - 1]);
        } else {
            self.heights.fill(0);
        }

        for piece in self.last_changed..len - 1 {
            let variant = sequence.kind(piece).variant(self.counter.rotation(piece));
            grid::drop_piece(variant, self.counter.column(piece), &mut self.heights);
            self.saved[piece].copy_from_slice(&self.heights);

            if grid::stack_height(&self.heights) >= self.best_height {
                self.skip_determined(space, piece);
                return None;
            }
        }

        let last = len - 1;
        let variant = sequence.kind(last).variant(self.counter.rotation(last));
        grid::drop_piece(variant, self.counter.column(last), &mut self.heights);

        Some(grid::stack_height(&self.heights))
    }

    /// Skips the current permutation and every later one sharing its prefix
    /// up to `piece`: jumps to the next permutation whose prefix differs,
    /// counting the skipped block against this worker's range.
    fn skip_determined(&mut self, space: &Space, piece: usize) {
        let mut skipped = space.weight(piece);

        for later in piece + 1..space.sequence().len() {
            let weight = space.weight(later);
            skipped -= weight * self.counter.column(later) as u64;
            for rotation in 0..self.counter.rotation(later) {
                skipped -= weight * space.column_count(later, rotation) as u64;
            }
        }

        self.last_changed = self.counter.advance_by(space, skipped);
        self.consumed += skipped;
    }

    fn report_progress(&self, start: Instant) {
        eprintln!(
            "solver {}: {} / {} permutations ({:.2}%) {}s",
            self.id,
            self.consumed,
            self.assigned,
            100.0 * self.consumed as f64 / self.assigned as f64,
            start.elapsed().as_secs()
        );
    }
}

/// Highest stack any permutation of `sequence` can produce; the initial
/// best-height bound.
fn height_ceiling(sequence: &Sequence) -> u32 {
    (sequence.len() * MAX_PIECE_EXTENT) as u32
}

/// Splits the space into near-equal contiguous ranges, seeding each worker's
/// starting counter by walking a shared cursor forward. Workers left without
/// permutations (more workers than permutations) are created idle.
fn partition(space: &Space, worker_count: usize) -> Vec<Worker> {
    let ceiling = height_ceiling(space.sequence());
    let mut cursor = Counter::first(space);
    let mut remaining = space.total();
    let mut workers = Vec::with_capacity(worker_count);

    for id in 0..worker_count {
        let share = remaining / (worker_count - id) as u64;
        if share == 0 {
            workers.push(Worker::new(id, cursor.clone(), 0, space, ceiling));
            continue;
        }

        workers.push(Worker::new(id, cursor.clone(), share, space, ceiling));
        cursor.advance_by(space, share);
        remaining -= share;
    }

    workers
}

/// Runs every worker to completion, one thread per worker.
///
/// A worker whose thread cannot be started is reported and left untouched;
/// after the join, any range not yet exhausted is executed synchronously on
/// the calling thread. Either way the results are identical: workers share
/// nothing mutable.
fn run_all(workers: &mut [Worker], space: &Space) {
    thread::scope(|scope| {
        for worker in workers.iter_mut() {
            let id = worker.id;
            let spawned = thread::Builder::new()
                .name(format!("solver-{id}"))
                .spawn_scoped(scope, move || worker.run(space));
            if spawned.is_err() {
                eprintln!("could not start thread for solver {id}, running it on the main thread");
            }
        }
    });

    for worker in workers.iter_mut() {
        if !worker.finished() {
            worker.run(space);
        }
    }
}

/// Picks the worker with the lowest recorded stack height; the earliest
/// worker (lowest range) wins ties.
fn reduce(workers: Vec<Worker>, ceiling: u32) -> Solution {
    let mut best: Option<&Worker> = None;
    let mut overall = ceiling;

    for worker in &workers {
        if worker.best_height < overall {
            overall = worker.best_height;
            best = Some(worker);
        }
    }

    let winner = best.unwrap_or(&workers[0]);
    Solution {
        stack_height: winner.best_height,
        columns: winner.best_columns.clone(),
        rotations: winner.best_rotations.clone(),
    }
}

/// Finds the per-piece drop columns and rotations minimizing the final stack
/// height, searching the whole permutation space across `worker_count`
/// parallel workers.
///
/// The result is deterministic in `worker_count`: among equal-height
/// placements the first in permutation order is returned.
pub fn solve(
    sequence: &Sequence,
    grid_width: usize,
    worker_count: usize,
) -> Result<Solution, SolveError> {
    if worker_count == 0 {
        return Err(SolveError::NoWorkers);
    }
    if grid_width < MAX_PIECE_EXTENT {
        return Err(SolveError::GridTooNarrow {
            width: grid_width,
            required: MAX_PIECE_EXTENT,
        });
    }
    if sequence.is_empty() {
        // nothing to drop: resolve without invoking any worker
        return Ok(Solution {
            stack_height: 0,
            columns: Vec::new(),
            rotations: Vec::new(),
        });
    }

    let space = Space::new(sequence, grid_width)?;
    let mut workers = partition(&space, worker_count);
    run_all(&mut workers, &space);
    Ok(reduce(workers, height_ceiling(sequence)))
}
