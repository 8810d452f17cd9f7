use std::error::Error;
use std::io::{self, BufRead, Write};

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use pawnstorm::engines::engine_iterative::{Difficulty, IterativeEngine};
use pawnstorm::engines::engine_trait::Engine;
use pawnstorm::game::match_session::{play_match, GameSession};
use pawnstorm::game_state::chess_types::{Board, Color, GameOutcome};
use pawnstorm::utils::coordinates::parse_move_text;
use pawnstorm::utils::render_board::render_board;

#[derive(Parser, Debug)]
#[command(name = "pawnstorm")]
#[command(about = "Play chess against the Pawnstorm engine", long_about = None)]
struct Args {
    /// Engine strength preset: easy, medium or hard
    #[arg(short, long, default_value = "medium")]
    difficulty: Difficulty,

    /// Override the preset's search depth
    #[arg(long)]
    depth: Option<u8>,

    /// Override the preset's per-move budget (0 = unlimited)
    #[arg(long)]
    movetime_ms: Option<u64>,

    /// Side the engine plays
    #[arg(long, default_value = "black", value_parser = parse_color)]
    engine_color: Color,

    /// Start from this FEN instead of the standard position
    #[arg(short, long)]
    fen: Option<String>,

    /// Let the engine play both sides
    #[arg(long)]
    self_play: bool,

    /// Ply limit for self-play
    #[arg(long, default_value_t = 200)]
    max_plies: u16,

    /// Log filter when RUST_LOG is unset
    #[arg(long, default_value = "warn")]
    log: String,
}

fn parse_color(text: &str) -> Result<Color, String> {
    match text.to_ascii_lowercase().as_str() {
        "white" | "w" => Ok(Color::White),
        "black" | "b" => Ok(Color::Black),
        _ => Err(format!("expected 'white' or 'black', got '{text}'")),
    }
}

fn build_engine(args: &Args, color: Color) -> Result<IterativeEngine, Box<dyn Error>> {
    let mut engine = IterativeEngine::new(args.difficulty, color);
    if let Some(depth) = args.depth {
        engine.set_option("Depth", &depth.to_string())?;
    }
    if let Some(ms) = args.movetime_ms {
        engine.set_option("MoveTime", &ms.to_string())?;
    }
    Ok(engine)
}

fn print_position(board: &Board) {
    println!("{}", render_board(board));
    println!("FEN: {}", board.to_fen());
}

fn describe_outcome(outcome: GameOutcome) -> Option<String> {
    match outcome {
        GameOutcome::InProgress => None,
        GameOutcome::Checkmate { winner } => Some(format!("Checkmate: {winner} wins")),
        GameOutcome::Stalemate => Some("Stalemate: draw".to_owned()),
    }
}

fn run_self_play(args: &Args, start: Board) -> Result<(), Box<dyn Error>> {
    let mut white = build_engine(args, Color::White)?;
    let mut black = build_engine(args, Color::Black)?;
    let result = play_match(&mut white, &mut black, start, args.max_plies)?;

    println!("{}", result.played_moves.join(" "));
    println!(
        "{:?} after {} plies (white {} ms, black {} ms)",
        result.outcome,
        result.played_moves.len(),
        result.white_total_time_ms,
        result.black_total_time_ms
    );
    print_position(&Board::from_fen(&result.final_fen)?);
    Ok(())
}

fn run_interactive(args: &Args, start: Board) -> Result<(), Box<dyn Error>> {
    let mut session = GameSession::from_board(start, build_engine(args, args.engine_color)?);
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print_position(session.board());
        if let Some(text) = describe_outcome(session.outcome()) {
            println!("{text}");
            return Ok(());
        }

        if session.is_engine_turn() {
            match session.play_engine_turn() {
                Some(mv) => println!("engine plays {mv}"),
                None => return Err("engine produced no move".into()),
            }
            continue;
        }

        print!("your move> ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else {
            return Ok(());
        };
        let line = line?;
        match line.trim() {
            "" => continue,
            "quit" | "exit" => return Ok(()),
            "undo" => {
                session.undo_last_move();
                session.undo_last_move();
            }
            text => match parse_move_text(text) {
                Ok(mv) if session.play_human_move(mv.from, mv.to) => {}
                Ok(_) => println!("illegal move: {text}"),
                Err(err) => println!("{err}"),
            },
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let start = match &args.fen {
        Some(fen) => Board::from_fen(fen)?,
        None => Board::new_game(),
    };
    start.validate_kings()?;
    info!(difficulty = %args.difficulty, engine_color = %args.engine_color, "starting");

    if args.self_play {
        run_self_play(&args, start)
    } else {
        run_interactive(&args, start)
    }
}
