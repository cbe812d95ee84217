//! # chess_core — demonstration CLI
//!
//! This binary is a thin demonstration shell around the `chess_core`
//! library: a terminal game against the engine, and a `bench` command
//! that runs the searcher once and reports timing. It parses nothing
//! beyond bare coordinate squares — the core explicitly doesn't parse
//! move notation, and neither does this binary.
//!
//! ## Usage
//!
//! ```bash
//! # Play a game against the engine in the terminal.
//! chess_core play
//!
//! # Run the engine's reply for the standard opening move 1.e4, once,
//! # and print the chosen move plus timing.
//! chess_core bench
//! ```

mod terminal;

use clap::{Parser, Subcommand};
use std::time::Instant;

use chess_core::movegen;
use chess_core::mutate;
use chess_core::search;
use chess_core::types::{PieceType, Position, Square};

/// chess_core — a deterministic chess engine core with a bounded-depth
/// alpha-beta opponent.
#[derive(Parser, Debug)]
#[command(name = "chess_core")]
#[command(about = "Deterministic chess rules engine and alpha-beta opponent")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Play an interactive game in the terminal: you play White, the
    /// engine plays Black.
    Play,

    /// Run the searcher on the position after 1.e4 and report the chosen
    /// reply and how long the search took.
    Bench,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Play => terminal::run_terminal_game(),
        Commands::Bench => run_bench(),
    }
}

fn run_bench() {
    let mut pos = Position::new_game(0);
    let mv = movegen::is_legal(
        &pos,
        Square::from_algebraic("e2").unwrap(),
        Square::from_algebraic("e4").unwrap(),
        PieceType::Empty,
    )
    .expect("1.e4 is always legal from the starting position");
    mutate::apply(&mut pos, mv);

    log::info!("searching depth {} after 1.e4", search::SEARCH_DEPTH);
    let start = Instant::now();
    let reply = search::choose_reply(&pos).expect("Active position always has a legal reply");
    let elapsed = start.elapsed();

    println!("engine reply: {reply}");
    println!("elapsed: {:.3}s", elapsed.as_secs_f64());
}
