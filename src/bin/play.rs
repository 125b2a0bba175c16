use chess::Color;
use chess_search_engine::{
    EngineConfig, EngineError, EnginePlayer, GameState, HumanPlayer, MoveChoice, MoveSelector,
    Outcome, Player, SearchMode,
};
use clap::{Parser, ValueEnum};
use std::io;
use std::path::PathBuf;
use std::process;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Controller {
    Human,
    Engine,
}

/// Play a game of chess between any mix of humans and engines
#[derive(Parser, Debug)]
#[command(name = "play", version)]
struct Args {
    /// Who plays white
    #[arg(long, value_enum, default_value = "human")]
    white: Controller,

    /// Who plays black
    #[arg(long, value_enum, default_value = "engine")]
    black: Controller,

    /// JSON engine configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Opening book file (list of {"n": name, "m": moves})
    #[arg(long)]
    openings: Option<PathBuf>,

    /// Search algorithm
    #[arg(long, value_enum)]
    mode: Option<SearchMode>,

    /// Depth in moves (0.5 steps)
    #[arg(long)]
    depth: Option<f32>,

    /// Time budget per engine move in seconds
    #[arg(long)]
    time_limit: Option<f64>,

    /// Seed for reproducible engine games
    #[arg(long)]
    seed: Option<u64>,

    /// Start from this position instead of the initial one
    #[arg(long)]
    fen: Option<String>,
}

fn report(engine: &EnginePlayer) {
    match engine.last_choice() {
        Some(MoveChoice::Book { opening, .. }) => println!("Opening: {opening}"),
        Some(MoveChoice::Search(result)) => {
            println!("Expected move value: {:.2}", result.score);
            println!("Depth reached: {}", result.depth_reached);
            println!("Time elapsed: {:.2}s", result.elapsed.as_secs_f64());
            println!("Static evaluations: {}", result.evaluations);
        }
        None => {}
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run(Args::parse()) {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

fn engine_config(args: &Args) -> Result<EngineConfig, EngineError> {
    let mut config = match &args.config {
        Some(path) => EngineConfig::from_file(path)?,
        None => EngineConfig::default(),
    };
    if args.openings.is_some() {
        config.openings_path = args.openings.clone();
    }
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
    Ok(config)
}

fn engine(
    controller: Controller,
    config: &EngineConfig,
    seed_offset: u64,
) -> Result<Option<EnginePlayer>, EngineError> {
    if controller == Controller::Human {
        return Ok(None);
    }
    let mut config = config.clone();
    // Two seeded engines should not mirror each other's tie-breaks
    config.search.seed = config.search.seed.map(|seed| seed.wrapping_add(seed_offset));
    Ok(Some(EnginePlayer::new(MoveSelector::from_config(&config)?)))
}

fn print_board(state: &GameState) {
    println!("\n     BLACK");
    print!("{state}");
    println!("     WHITE");
}

fn run(args: Args) -> Result<(), EngineError> {
    let config = engine_config(&args)?;
    let mut state = match &args.fen {
        Some(fen) => GameState::from_fen(fen)?,
        None => GameState::new(),
    };

    // Both seats share one stdin lock when two humans play
    let mut human = HumanPlayer::new(io::stdin().lock(), io::stdout());
    let mut white = engine(args.white, &config, 0)?;
    let mut black = engine(args.black, &config, 1)?;
    print_board(&state);

    while !state.is_terminal() {
        let side = state.side_to_move();
        let seat = match side {
            Color::White => white.as_mut(),
            Color::Black => black.as_mut(),
        };
        println!("\n\n{} TURN:", if side == Color::White { "WHITE" } else { "BLACK" });

        let mv = match seat {
            Some(engine) => {
                let mv = engine.next_move(&state)?;
                println!("Move: {mv}");
                report(engine);
                mv
            }
            None => human.next_move(&state)?,
        };
        state.play(mv)?;
        print_board(&state);
    }

    println!();
    match state.outcome() {
        Some(Outcome::Winner(Color::White)) => println!("WHITE VICTORY"),
        Some(Outcome::Winner(Color::Black)) => println!("BLACK VICTORY"),
        _ => println!("DRAW"),
    }
    println!("Moves: {}", state.history_notation().join(" "));
    Ok(())
}
