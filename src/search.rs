//! Game-tree search over the legal-move tree.
//!
//! Depth is counted in half-plies: every recursive call removes one half-ply
//! and hands the move to the other side, so a depth of `2.0` moves explores
//! four half-plies before the leaf evaluation.

use crate::errors::{EngineError, Result};
use crate::evaluation::Evaluator;
use crate::game::GameState;
use chess::{ChessMove, Color};
use log::{debug, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Initial alpha, below any real evaluation
pub const ALPHA_FLOOR: f32 = -1000.0;
/// Initial beta, above any real evaluation
pub const BETA_CEILING: f32 = 1000.0;

/// Search depth in half-plies
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Depth(u32);

impl Depth {
    pub const ZERO: Depth = Depth(0);
    pub const HALF_PLY: Depth = Depth(1);

    pub const fn half_plies(count: u32) -> Self {
        Self(count)
    }

    /// `1.0` is one move by each side, `0.5` a single half-ply
    pub fn from_moves(moves: f32) -> Self {
        Self((moves * 2.0).round().max(0.0) as u32)
    }

    pub fn count(self) -> u32 {
        self.0
    }

    pub fn as_moves(self) -> f32 {
        self.0 as f32 / 2.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    fn next(self) -> Self {
        Self(self.0.saturating_sub(1))
    }

    /// One half-ply shallower, never below a single half-ply
    pub fn shallower(self) -> Self {
        Self(self.0.saturating_sub(1).max(1))
    }
}

impl fmt::Display for Depth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}", self.as_moves())
    }
}

/// Which algorithm `Searcher::search` runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum SearchMode {
    /// Plain minimax, the correctness baseline
    Minimax,
    /// Alpha-beta from the root at the full depth
    AlphaBeta,
    /// Alpha-beta with an insurance move and a root-level deadline
    TimeLimited,
    /// Root moves spread over a worker pool, one board copy per task
    Parallel,
}

/// Search configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub mode: SearchMode,
    /// Target depth in moves; `2.0` is four half-plies
    pub depth: f32,
    /// Soft budget, checked before each root move
    pub time_limit_secs: f64,
    /// Worker threads for parallel mode
    pub threads: usize,
    /// Fixed seed for reproducible move choices
    pub seed: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            mode: SearchMode::TimeLimited,
            depth: 2.0,
            time_limit_secs: 15.0,
            threads: num_cpus::get(),
            seed: None,
        }
    }
}

impl SearchConfig {
    /// Shallow alpha-beta for quick replies
    pub fn fast() -> Self {
        Self {
            mode: SearchMode::AlphaBeta,
            depth: 1.0,
            time_limit_secs: 2.0,
            ..Self::default()
        }
    }

    /// Full-depth root-parallel search using every core
    pub fn parallel() -> Self {
        Self {
            mode: SearchMode::Parallel,
            ..Self::default()
        }
    }

    pub fn depth(&self) -> Depth {
        Depth::from_moves(self.depth)
    }

    /// Budget as a `Duration`; negative or NaN is zero, too large saturates
    pub fn time_limit(&self) -> Duration {
        Duration::try_from_secs_f64(self.time_limit_secs.max(0.0)).unwrap_or(Duration::MAX)
    }
}

/// Work counters threaded through one search
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub nodes: u64,
    pub evaluations: u64,
}

impl SearchStats {
    pub fn merge(&mut self, other: SearchStats) {
        self.nodes += other.nodes;
        self.evaluations += other.evaluations;
    }
}

/// Chosen move plus diagnostics for one turn
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub best_move: ChessMove,
    pub score: f32,
    pub depth_reached: Depth,
    pub elapsed: Duration,
    pub evaluations: u64,
    pub nodes: u64,
    /// The deadline cut the full-depth pass short
    pub timed_out: bool,
}

impl fmt::Display for SearchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "move {} score {:.2} depth {} time {:.2}s evaluations {} nodes {}",
            self.best_move,
            self.score,
            self.depth_reached,
            self.elapsed.as_secs_f64(),
            self.evaluations,
            self.nodes
        )
    }
}

/// Fail-hard alpha-beta scored for one fixed side.
///
/// Holds no mutable state, so parallel workers can share it while each
/// searches its own copy of the board.
#[derive(Debug, Clone, Copy)]
struct AlphaBeta<'a> {
    evaluator: &'a Evaluator,
    perspective: Color,
}

impl AlphaBeta<'_> {
    fn search(
        &self,
        state: &mut GameState,
        depth: Depth,
        maximizing: bool,
        mut alpha: f32,
        mut beta: f32,
        stats: &mut SearchStats,
    ) -> f32 {
        stats.nodes += 1;
        if depth.is_zero() || state.is_terminal() {
            stats.evaluations += 1;
            return self.evaluator.evaluate(state, self.perspective);
        }

        if maximizing {
            for mv in state.legal_moves() {
                let value = state.with_move(mv, |child| {
                    self.search(child, depth.next(), false, alpha, beta, stats)
                });
                alpha = alpha.max(value);
                if alpha >= beta {
                    return alpha;
                }
            }
            alpha
        } else {
            for mv in state.legal_moves() {
                let value = state.with_move(mv, |child| {
                    self.search(child, depth.next(), true, alpha, beta, stats)
                });
                beta = beta.min(value);
                if beta <= alpha {
                    return beta;
                }
            }
            beta
        }
    }

    /// Value of playing `mv` at the root with a fresh window
    fn root_move(
        &self,
        state: &mut GameState,
        mv: ChessMove,
        depth: Depth,
        stats: &mut SearchStats,
    ) -> f32 {
        state.with_move(mv, |child| {
            self.search(child, depth.next(), false, ALPHA_FLOOR, BETA_CEILING, stats)
        })
    }
}

/// Keep the first move seen with the strictly highest value
fn pick_best(best: &mut Option<(ChessMove, f32)>, mv: ChessMove, value: f32) {
    if best.map_or(true, |(_, best_value)| value > best_value) {
        *best = Some((mv, value));
    }
}

fn no_legal_moves(state: &GameState) -> EngineError {
    EngineError::NoLegalMoves {
        fen: state.board().to_string(),
    }
}

/// Move search engine
pub struct Searcher {
    config: SearchConfig,
    evaluator: Evaluator,
    rng: StdRng,
    pool: Option<Arc<ThreadPool>>,
}

impl Searcher {
    /// Create a searcher; the worker pool is started up front in parallel mode
    pub fn new(config: SearchConfig, evaluator: Evaluator) -> Result<Self> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut searcher = Self {
            config,
            evaluator,
            rng,
            pool: None,
        };
        if searcher.config.mode == SearchMode::Parallel {
            searcher.worker_pool()?;
        }
        Ok(searcher)
    }

    /// Create with default configuration and piece values
    pub fn new_default() -> Result<Self> {
        Self::new(SearchConfig::default(), Evaluator::default())
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    pub(crate) fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// Run the configured search mode for the side to move
    pub fn search(&mut self, state: &mut GameState) -> Result<SearchResult> {
        let depth = self.config.depth();
        match self.config.mode {
            SearchMode::Minimax => self.search_minimax(state, depth),
            SearchMode::AlphaBeta => self.search_from_root(state, depth),
            SearchMode::TimeLimited => {
                let budget = self.config.time_limit();
                self.search_with_time_limit(state, depth, budget)
            }
            SearchMode::Parallel => self.search_parallel(state, depth),
        }
    }

    /// Plain minimax. Equal-valued moves are collected and one is drawn
    /// uniformly at random.
    pub fn search_minimax(&mut self, state: &mut GameState, depth: Depth) -> Result<SearchResult> {
        let start = Instant::now();
        let depth = depth.max(Depth::HALF_PLY);
        if state.legal_moves().is_empty() {
            return Err(no_legal_moves(state));
        }

        let perspective = state.side_to_move();
        let mut stats = SearchStats {
            nodes: 1,
            evaluations: 0,
        };
        let (best_move, score) = self.expand(state, depth, true, perspective, &mut stats);
        let best_move = best_move.ok_or_else(|| no_legal_moves(state))?;

        let result = SearchResult {
            best_move,
            score,
            depth_reached: depth,
            elapsed: start.elapsed(),
            evaluations: stats.evaluations,
            nodes: stats.nodes,
            timed_out: false,
        };
        debug!("minimax: {}", result);
        Ok(result)
    }

    fn minimax(
        &mut self,
        state: &mut GameState,
        depth: Depth,
        maximizing: bool,
        perspective: Color,
        stats: &mut SearchStats,
    ) -> f32 {
        stats.nodes += 1;
        if depth.is_zero() || state.is_terminal() {
            stats.evaluations += 1;
            return self.evaluator.evaluate(state, perspective);
        }
        self.expand(state, depth, maximizing, perspective, stats).1
    }

    /// Try every legal move and keep the best for the side in charge
    fn expand(
        &mut self,
        state: &mut GameState,
        depth: Depth,
        maximizing: bool,
        perspective: Color,
        stats: &mut SearchStats,
    ) -> (Option<ChessMove>, f32) {
        let mut best_value = if maximizing { ALPHA_FLOOR } else { BETA_CEILING };
        let mut tied: Vec<ChessMove> = Vec::new();

        for mv in state.legal_moves() {
            let value = state.with_move(mv, |child| {
                self.minimax(child, depth.next(), !maximizing, perspective, stats)
            });
            let improves = if maximizing {
                value > best_value
            } else {
                value < best_value
            };
            if improves {
                best_value = value;
                tied.clear();
                tied.push(mv);
            } else if value == best_value {
                tied.push(mv);
            }
        }

        (tied.choose(&mut self.rng).copied(), best_value)
    }

    /// Alpha-beta over shuffled root moves at the full depth
    pub fn search_from_root(&mut self, state: &mut GameState, depth: Depth) -> Result<SearchResult> {
        let start = Instant::now();
        let depth = depth.max(Depth::HALF_PLY);
        let mut moves = state.legal_moves();
        moves.shuffle(&mut self.rng);

        let search = AlphaBeta {
            evaluator: &self.evaluator,
            perspective: state.side_to_move(),
        };
        let mut stats = SearchStats::default();
        let mut best = None;
        for mv in moves {
            let value = search.root_move(state, mv, depth, &mut stats);
            pick_best(&mut best, mv, value);
        }
        let (best_move, score) = best.ok_or_else(|| no_legal_moves(state))?;

        let result = SearchResult {
            best_move,
            score,
            depth_reached: depth,
            elapsed: start.elapsed(),
            evaluations: stats.evaluations,
            nodes: stats.nodes,
            timed_out: false,
        };
        debug!("alpha-beta: {}", result);
        Ok(result)
    }

    /// Alpha-beta bounded by a soft deadline.
    ///
    /// An insurance result one half-ply shallower is computed first. The
    /// deadline is checked before each root move of the full-depth pass; once
    /// it has passed, the insurance result is returned with its reduced depth.
    /// Evaluation counts cover both passes.
    ///
    /// A single half-ply cannot be reduced further, so at that depth the
    /// insurance pass is the full search and a timeout reports the requested
    /// depth with `timed_out` set.
    pub fn search_with_time_limit(
        &mut self,
        state: &mut GameState,
        depth: Depth,
        budget: Duration,
    ) -> Result<SearchResult> {
        let start = Instant::now();
        let depth = depth.max(Depth::HALF_PLY);
        let insurance = self.search_from_root(state, depth.shallower())?;

        let mut moves = state.legal_moves();
        moves.shuffle(&mut self.rng);

        let search = AlphaBeta {
            evaluator: &self.evaluator,
            perspective: state.side_to_move(),
        };
        let mut stats = SearchStats {
            nodes: insurance.nodes,
            evaluations: insurance.evaluations,
        };
        let mut best = None;
        for mv in moves {
            let elapsed = start.elapsed();
            if elapsed > budget {
                warn!(
                    "time budget of {:.2}s exceeded, playing insurance move {} from depth {}",
                    budget.as_secs_f64(),
                    insurance.best_move,
                    insurance.depth_reached
                );
                return Ok(SearchResult {
                    elapsed,
                    evaluations: stats.evaluations,
                    nodes: stats.nodes,
                    timed_out: true,
                    ..insurance
                });
            }

            let value = search.root_move(state, mv, depth, &mut stats);
            pick_best(&mut best, mv, value);
        }
        let (best_move, score) = best.ok_or_else(|| no_legal_moves(state))?;

        let result = SearchResult {
            best_move,
            score,
            depth_reached: depth,
            elapsed: start.elapsed(),
            evaluations: stats.evaluations,
            nodes: stats.nodes,
            timed_out: false,
        };
        debug!("time-limited: {}", result);
        Ok(result)
    }

    /// Root moves explored in parallel, each task on its own board copy.
    ///
    /// Workers do not share an alpha-beta window; the best score wins after
    /// the pool has joined.
    pub fn search_parallel(&mut self, state: &GameState, depth: Depth) -> Result<SearchResult> {
        let start = Instant::now();
        let depth = depth.max(Depth::HALF_PLY);
        let mut moves = state.legal_moves();
        if moves.is_empty() {
            return Err(no_legal_moves(state));
        }
        moves.shuffle(&mut self.rng);

        let pool = self.worker_pool()?;
        let search = AlphaBeta {
            evaluator: &self.evaluator,
            perspective: state.side_to_move(),
        };

        let scored: Vec<(ChessMove, f32, SearchStats)> = pool.install(|| {
            moves
                .into_par_iter()
                .map(|mv| {
                    let mut board = state.clone();
                    let mut stats = SearchStats::default();
                    let value = search.root_move(&mut board, mv, depth, &mut stats);
                    (mv, value, stats)
                })
                .collect()
        });

        let mut stats = SearchStats::default();
        let mut best = None;
        for (mv, value, worker_stats) in scored {
            stats.merge(worker_stats);
            pick_best(&mut best, mv, value);
        }
        let (best_move, score) = best.ok_or_else(|| no_legal_moves(state))?;

        let result = SearchResult {
            best_move,
            score,
            depth_reached: depth,
            elapsed: start.elapsed(),
            evaluations: stats.evaluations,
            nodes: stats.nodes,
            timed_out: false,
        };
        debug!(
            "parallel ({} threads): {}",
            pool.current_num_threads(),
            result
        );
        Ok(result)
    }

    fn worker_pool(&mut self) -> Result<Arc<ThreadPool>> {
        if let Some(pool) = &self.pool {
            return Ok(Arc::clone(pool));
        }
        let pool = Arc::new(
            ThreadPoolBuilder::new()
                .num_threads(self.config.threads)
                .thread_name(|index| format!("search-worker-{index}"))
                .build()?,
        );
        self.pool = Some(Arc::clone(&pool));
        Ok(pool)
    }
}
