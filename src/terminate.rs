//! Termination detection, per §4.5.
//!
//! Re-evaluated from scratch after every mutation: a position is either
//! `Active`, a win for whichever side just delivered checkmate, a
//! stalemate draw, or a draw by the fifty-move rule or insufficient
//! material. Threefold repetition is a deliberate non-goal (the crate
//! keeps move history for display purposes, not for repetition counting).

use crate::movegen::{generate_legal_moves, is_insufficient_material};
use crate::types::{Position, Status};

/// Computes the status that should hold for `pos` given its current
/// board, side to move, half-move clock, and material — based on the side
/// about to move.
pub fn detect(pos: &Position) -> Status {
    let to_move = pos.white_to_move;
    let has_legal_move = !generate_legal_moves(pos, to_move).is_empty();

    if !has_legal_move {
        return if pos.is_in_check(to_move) {
            if to_move {
                Status::BlackWin
            } else {
                Status::WhiteWin
            }
        } else {
            Status::Stalemate
        };
    }

    if pos.half_move_clock >= 100 {
        return Status::Draw;
    }

    if is_insufficient_material(&pos.board) {
        return Status::Draw;
    }

    Status::Active
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Piece, PieceType, Square, EMPTY};

    #[test]
    fn fools_mate_is_black_win() {
        // 1. f3 e5 2. g4 Qh4#
        let mut pos = Position::new_game(0);
        let moves = [("f2", "f3"), ("e7", "e5"), ("g2", "g4"), ("d8", "h4")];
        for (from, to) in moves {
            let mv = crate::movegen::is_legal(
                &pos,
                Square::from_algebraic(from).unwrap(),
                Square::from_algebraic(to).unwrap(),
                PieceType::Empty,
            )
            .unwrap();
            crate::mutate::apply(&mut pos, mv);
        }
        assert_eq!(pos.status, Status::BlackWin);
    }

    #[test]
    fn bare_kings_is_a_draw() {
        let mut board = [EMPTY; 64];
        board[Square::from_file_rank(4, 0).index()] = Piece::new(PieceType::King, true);
        board[Square::from_file_rank(4, 7).index()] = Piece::new(PieceType::King, false);
        let mut pos = Position::new_game(0);
        pos.board = board;
        pos.white_king_sq = Square::from_file_rank(4, 0);
        pos.black_king_sq = Square::from_file_rank(4, 7);
        assert_eq!(detect(&pos), Status::Draw);
    }

    #[test]
    fn fifty_move_rule_draw_takes_priority_over_active() {
        let mut pos = Position::new_game(0);
        pos.half_move_clock = 100;
        assert_eq!(detect(&pos), Status::Draw);
    }

    #[test]
    fn stalemate_with_no_check_is_not_a_win() {
        // Classic stalemate: Black king on a8, White king on c7, White
        // queen on b6; Black to move with no legal moves and not in check.
        let mut board = [EMPTY; 64];
        board[Square::from_algebraic("a8").unwrap().index()] = Piece::new(PieceType::King, false);
        board[Square::from_algebraic("c7").unwrap().index()] = Piece::new(PieceType::King, true);
        board[Square::from_algebraic("b6").unwrap().index()] = Piece::new(PieceType::Queen, true);
        let mut pos = Position::new_game(0);
        pos.board = board;
        pos.white_king_sq = Square::from_algebraic("c7").unwrap();
        pos.black_king_sq = Square::from_algebraic("a8").unwrap();
        pos.white_to_move = false;
        assert_eq!(detect(&pos), Status::Stalemate);
    }
}
