use chess_search_engine::{
    Depth, EngineConfig, EngineError, Evaluator, GameState, SearchMode, Searcher,
};
use clap::Parser;
use std::path::PathBuf;
use std::process;

/// Search a single position and print the diagnostics
#[derive(Parser, Debug)]
#[command(name = "analyze", version)]
struct Args {
    /// Position to analyse
    #[arg(default_value = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1")]
    fen: String,

    /// JSON engine configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Search algorithm
    #[arg(long, value_enum)]
    mode: Option<SearchMode>,

    /// Depth in moves (0.5 steps)
    #[arg(long)]
    depth: Option<f32>,

    /// Time budget in seconds for time-limited search
    #[arg(long)]
    time_limit: Option<f64>,

    /// Seed for reproducible tie-breaks
    #[arg(long)]
    seed: Option<u64>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run(Args::parse()) {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

fn run(args: Args) -> Result<(), EngineError> {
    let mut config = match &args.config {
        Some(path) => EngineConfig::from_file(path)?,
        None => EngineConfig::default(),
    };
    if let Some(mode) = args.mode {
        config.search.mode = mode;
    }
    if let Some(depth) = args.depth {
        config.search.depth = depth;
    }
    if let Some(limit) = args.time_limit {
        config.search.time_limit_secs = limit;
    }
    if args.seed.is_some() {
        config.search.seed = args.seed;
    }

    let mut state = GameState::from_fen(&args.fen)?;
    println!("{state}");
    println!("Side to move: {:?}", state.side_to_move());

    let evaluator = Evaluator::new(config.piece_values);
    let perspective = state.side_to_move();
    println!(
        "Static evaluation: {:.2}",
        evaluator.evaluate(&state, perspective)
    );

    if let Some(outcome) = state.outcome() {
        println!("Game over: {outcome:?}");
        return Ok(());
    }

    let mut searcher = Searcher::new(config.search.clone(), evaluator)?;
    let result = searcher.search(&mut state)?;

    let depth: Depth = config.search.depth();
    println!("Mode: {:?}", config.search.mode);
    println!("Move: {}", result.best_move);
    println!("Expected move value: {:.2}", result.score);
    println!("Depth reached: {} of {}", result.depth_reached, depth);
    println!("Time elapsed: {:.2}s", result.elapsed.as_secs_f64());
    println!("Static evaluations: {}", result.evaluations);
    println!("Nodes: {}", result.nodes);
    if result.timed_out {
        println!(
            "Budget of {:.2}s ran out; insurance move played",
            config.search.time_limit().as_secs_f64()
        );
    }

    Ok(())
}
