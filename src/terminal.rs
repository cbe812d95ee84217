//! Terminal interface for the demonstration CLI.
//!
//! This is not part of the core: it is a thin human-facing shell around
//! [`chess_core::store::PositionStore`] that plays one human-vs-engine game, a single
//! stand-in for whatever presentation layer a real deployment provides.
//! Move notation parsing lives here rather than in the core for the same
//! reason — the specification calls it out as an external collaborator's
//! job.

use colored::Colorize;
use std::io::{self, Write};

use chess_core::store::{OwnerId, PositionStore};
use chess_core::types::{PieceType, Position, Square, Status};

/// Renders the board to the terminal from White's perspective (rank 8 on
/// top), with Unicode-free ASCII piece letters — uppercase for White,
/// lowercase for Black — colored by side.
pub fn print_board(pos: &Position) {
    println!();
    println!("  +---+---+---+---+---+---+---+---+");

    for rank in (0..8u8).rev() {
        print!("{} ", rank + 1);
        for file in 0..8u8 {
            let sq = Square::from_file_rank(file, rank);
            let piece = pos.board[sq.index()];
            let is_dark_square = (file + rank) % 2 == 0;

            let piece_str = if piece.is_empty() {
                if is_dark_square {
                    "·".dimmed().to_string()
                } else {
                    " ".to_string()
                }
            } else {
                let symbol = piece_letter(piece.kind(), piece.is_white());
                if piece.is_white() {
                    symbol.white().bold().to_string()
                } else {
                    symbol.blue().bold().to_string()
                }
            };

            print!("| {} ", piece_str);
        }
        println!("|");
        println!("  +---+---+---+---+---+---+---+---+");
    }
    println!("    a   b   c   d   e   f   g   h");
    println!();
}

fn piece_letter(kind: PieceType, is_white: bool) -> String {
    let c = kind.to_fen_char();
    if is_white {
        c.to_string()
    } else {
        c.to_ascii_lowercase().to_string()
    }
}

/// Prints side to move, move count, check status, and half-move clock.
pub fn print_status(pos: &Position) {
    let turn_str = if pos.white_to_move {
        "White".white().bold()
    } else {
        "Black".blue().bold()
    };
    print!("{} to move (ply {})", turn_str, pos.move_count);
    if pos.is_in_check(pos.white_to_move) {
        print!("  {}", "CHECK".red().bold());
    }
    println!("  [half-move clock: {}]", pos.half_move_clock);
    println!();
}

/// Prints the result banner once a game's status is terminal.
pub fn print_game_result(pos: &Position) {
    let message = match pos.status {
        Status::WhiteWin => "White wins",
        Status::BlackWin => "Black wins",
        Status::Draw => "Draw",
        Status::Stalemate => "Draw by stalemate",
        Status::Active => return,
    };
    println!();
    println!("{}", "═══════════════════════════════════".yellow());
    println!("  {}", message.green().bold());
    println!("{}", "═══════════════════════════════════".yellow());
    println!();
}

fn print_help() {
    println!("{}", "Commands:".yellow().bold());
    println!("  {}      - submit a move, e.g. e2e4 (append a promotion letter: e7e8q)", "e2e4".green());
    println!("  {}    - resign the game", "resign".green());
    println!("  {}      - claim a draw (fifty-move rule / insufficient material)", "draw".green());
    println!("  {}   - show move history", "history".green());
    println!("  {}      - show the board again", "board".green());
    println!("  {}      - show this help text", "help".green());
    println!("  {}      - quit", "quit".green());
    println!();
}

fn print_history(pos: &Position) {
    if pos.history.is_empty() {
        println!("No moves yet.");
        return;
    }
    println!("{}", "Move history:".yellow().bold());
    for (i, mv) in pos.history.iter().enumerate() {
        let side = if i % 2 == 0 { "White" } else { "Black" };
        println!("  {}. {} {}", i + 1, side, mv);
    }
    println!();
}

/// Parses a move string like `"e2e4"` or `"e7e8q"` into squares plus an
/// optional promotion piece type.
fn parse_move_input(input: &str) -> Option<(Square, Square, PieceType)> {
    let input = input.replace(' ', "");
    if input.len() < 4 || input.len() > 5 {
        return None;
    }
    let from = Square::from_algebraic(&input[0..2])?;
    let to = Square::from_algebraic(&input[2..4])?;
    let promotion = if input.len() == 5 {
        match input.chars().nth(4)?.to_ascii_lowercase() {
            'q' => PieceType::Queen,
            'r' => PieceType::Rook,
            'b' => PieceType::Bishop,
            'n' => PieceType::Knight,
            _ => return None,
        }
    } else {
        PieceType::Empty
    };
    Some((from, to, promotion))
}

/// Runs one interactive human-vs-engine game: the human plays White,
/// typing coordinate moves; the engine replies automatically as Black
/// after every legal human move.
pub fn run_terminal_game() {
    const OWNER: OwnerId = OwnerId(1);
    let store = PositionStore::new();
    store.new_game(OWNER);

    println!();
    println!("{}", "╔═══════════════════════════════════════╗".cyan());
    println!("{}", "║              chess_core                ║".cyan());
    println!("{}", "║     you play White, the engine Black    ║".cyan());
    println!("{}", "╚═══════════════════════════════════════╝".cyan());
    println!();

    print_help();
    print_board(&store.position(OWNER).unwrap());
    print_status(&store.position(OWNER).unwrap());

    loop {
        let pos = store.position(OWNER).unwrap();
        if pos.status.is_terminal() {
            print_game_result(&pos);
            break;
        }

        print!("White > ");
        io::stdout().flush().ok();

        let mut input = String::new();
        if io::stdin().read_line(&mut input).is_err() {
            println!("failed to read input");
            continue;
        }
        let input = input.trim().to_lowercase();
        if input.is_empty() {
            continue;
        }

        match input.as_str() {
            "quit" | "exit" | "q" => {
                println!("goodbye");
                break;
            }
            "help" | "h" | "?" => print_help(),
            "board" | "b" => {
                let pos = store.position(OWNER).unwrap();
                print_board(&pos);
                print_status(&pos);
            }
            "history" => print_history(&store.position(OWNER).unwrap()),
            "resign" | "r" => match store.resign(OWNER) {
                Ok(()) => {
                    print_game_result(&store.position(OWNER).unwrap());
                    break;
                }
                Err(e) => println!("{}: {}", "error".red().bold(), e),
            },
            "draw" | "d" => match store.claim_draw(OWNER) {
                Ok(()) => {
                    print_game_result(&store.position(OWNER).unwrap());
                    break;
                }
                Err(e) => println!("{}: {}", "error".red().bold(), e),
            },
            _ => match parse_move_input(&input) {
                Some((from, to, promotion)) => match store.make_move(OWNER, from, to, promotion) {
                    Ok(_) => {
                        let pos = store.position(OWNER).unwrap();
                        print_board(&pos);
                        print_status(&pos);
                        if pos.status.is_terminal() {
                            print_game_result(&pos);
                            break;
                        }
                    }
                    Err(e) => println!("{}: {}", "illegal move".red().bold(), e),
                },
                None => println!("unrecognized input, type 'help' for commands"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_move() {
        let (from, to, promo) = parse_move_input("e2e4").unwrap();
        assert_eq!(from, Square::from_algebraic("e2").unwrap());
        assert_eq!(to, Square::from_algebraic("e4").unwrap());
        assert_eq!(promo, PieceType::Empty);
    }

    #[test]
    fn parses_promotion_move() {
        let (_, _, promo) = parse_move_input("e7e8q").unwrap();
        assert_eq!(promo, PieceType::Queen);
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(parse_move_input("abc").is_none());
        assert!(parse_move_input("z9z9").is_none());
        assert!(parse_move_input("e2e4x").is_none());
    }
}
