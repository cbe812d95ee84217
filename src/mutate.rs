//! The position mutator: applies one already-validated move to a
//! `Position`, updating every derived field per §4.3.

use crate::movegen::apply_to_board;
use crate::terminate;
use crate::types::{MoveRecord, PieceType, Position, Square, NO_SQUARE};

/// Applies `mv` (as returned by [`crate::movegen::is_legal`] or
/// [`crate::movegen::generate_legal_moves`]) to `pos`, mutating it in
/// place: board, king squares, en-passant target, half-move clock,
/// history, move count, side to move, and status.
///
/// The caller is responsible for having validated `mv` against `pos`
/// first — this function performs no legality checking of its own.
pub fn apply(pos: &mut Position, mv: MoveRecord) {
    let white_moving = pos.white_to_move;
    let moving_piece = pos.board[mv.from.index()];

    apply_to_board(&mut pos.board, &mv, white_moving);

    if moving_piece.kind() == PieceType::King {
        if white_moving {
            pos.white_king_sq = mv.to;
        } else {
            pos.black_king_sq = mv.to;
        }
    }

    pos.en_passant_target = double_push_target(&mv, moving_piece);

    if moving_piece.kind() == PieceType::Pawn || mv.captured_type != PieceType::Empty {
        pos.half_move_clock = 0;
    } else {
        pos.half_move_clock += 1;
    }

    pos.history.push(mv);
    pos.move_count += 1;
    pos.white_to_move = !white_moving;
    pos.status = terminate::detect(pos);
}

fn double_push_target(mv: &MoveRecord, moving_piece: crate::types::Piece) -> Square {
    if moving_piece.kind() != PieceType::Pawn {
        return NO_SQUARE;
    }
    let rank_delta = mv.to.rank() as i8 - mv.from.rank() as i8;
    if rank_delta.abs() == 2 {
        Square::from_file_rank(mv.from.file(), (mv.from.rank() + mv.to.rank()) / 2)
    } else {
        NO_SQUARE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movegen::is_legal;
    use crate::types::{Piece, Status, EMPTY};

    fn mv(pos: &Position, from: &str, to: &str) -> MoveRecord {
        is_legal(
            pos,
            Square::from_algebraic(from).unwrap(),
            Square::from_algebraic(to).unwrap(),
            PieceType::Empty,
        )
        .unwrap()
    }

    #[test]
    fn double_push_sets_en_passant_target() {
        let mut pos = Position::new_game(0);
        let m = mv(&pos, "e2", "e4");
        apply(&mut pos, m);
        assert_eq!(pos.en_passant_target, Square::from_algebraic("e3").unwrap());
        assert!(!pos.white_to_move);
    }

    #[test]
    fn en_passant_target_clears_after_the_next_move() {
        let mut pos = Position::new_game(0);
        let m1 = mv(&pos, "e2", "e4");
        apply(&mut pos, m1);
        let m2 = mv(&pos, "a7", "a6");
        apply(&mut pos, m2);
        assert_eq!(pos.en_passant_target, NO_SQUARE);
    }

    #[test]
    fn capture_resets_half_move_clock() {
        let mut pos = Position::new_game(0);
        pos.half_move_clock = 12;
        pos.board = [EMPTY; 64];
        pos.board[Square::from_file_rank(4, 0).index()] = Piece::new(PieceType::King, true);
        pos.board[Square::from_file_rank(4, 7).index()] = Piece::new(PieceType::King, false);
        pos.board[Square::from_file_rank(3, 3).index()] = Piece::new(PieceType::Rook, true);
        pos.board[Square::from_file_rank(3, 6).index()] = Piece::new(PieceType::Pawn, false);
        pos.white_king_sq = Square::from_file_rank(4, 0);
        pos.black_king_sq = Square::from_file_rank(4, 7);

        let m = is_legal(
            &pos,
            Square::from_file_rank(3, 3),
            Square::from_file_rank(3, 6),
            PieceType::Empty,
        )
        .unwrap();
        apply(&mut pos, m);
        assert_eq!(pos.half_move_clock, 0);
    }

    #[test]
    fn king_move_updates_tracked_king_square() {
        let mut pos = Position::new_game(0);
        pos.board = [EMPTY; 64];
        pos.board[Square::from_file_rank(4, 0).index()] = Piece::new(PieceType::King, true);
        pos.board[Square::from_file_rank(4, 7).index()] = Piece::new(PieceType::King, false);
        pos.white_king_sq = Square::from_file_rank(4, 0);
        pos.black_king_sq = Square::from_file_rank(4, 7);

        let m = is_legal(
            &pos,
            Square::from_file_rank(4, 0),
            Square::from_file_rank(4, 1),
            PieceType::Empty,
        )
        .unwrap();
        apply(&mut pos, m);
        assert_eq!(pos.white_king_sq, Square::from_file_rank(4, 1));
    }

    #[test]
    fn history_and_move_count_stay_in_sync() {
        let mut pos = Position::new_game(0);
        let m = mv(&pos, "g1", "f3");
        apply(&mut pos, m);
        assert_eq!(pos.history.len() as u64, pos.move_count);
        assert_eq!(pos.status, Status::Active);
    }

    #[test]
    fn pawn_promotes_to_a_moved_queen_on_the_last_rank() {
        let mut pos = Position::new_game(0);
        pos.board = [EMPTY; 64];
        pos.board[Square::from_algebraic("a7").unwrap().index()] = Piece::new(PieceType::Pawn, true);
        pos.board[Square::from_file_rank(4, 0).index()] = Piece::new(PieceType::King, true);
        pos.board[Square::from_file_rank(4, 7).index()] = Piece::new(PieceType::King, false);
        pos.white_king_sq = Square::from_file_rank(4, 0);
        pos.black_king_sq = Square::from_file_rank(4, 7);

        let m = is_legal(
            &pos,
            Square::from_algebraic("a7").unwrap(),
            Square::from_algebraic("a8").unwrap(),
            PieceType::Queen,
        )
        .unwrap();
        let move_count_before = pos.move_count;
        apply(&mut pos, m);

        let promoted = pos.board[Square::from_algebraic("a8").unwrap().index()];
        assert_eq!(promoted.kind(), PieceType::Queen);
        assert!(promoted.is_white());
        assert!(promoted.has_moved());
        assert_eq!(pos.move_count, move_count_before + 1);
    }

    #[test]
    fn kingside_castle_moves_both_king_and_rook_and_marks_them_moved() {
        let mut pos = Position::new_game(0);
        pos.board = [EMPTY; 64];
        pos.board[Square::from_file_rank(4, 0).index()] = Piece::new(PieceType::King, true);
        pos.board[Square::from_file_rank(7, 0).index()] = Piece::new(PieceType::Rook, true);
        pos.board[Square::from_file_rank(4, 7).index()] = Piece::new(PieceType::King, false);
        pos.white_king_sq = Square::from_file_rank(4, 0);
        pos.black_king_sq = Square::from_file_rank(4, 7);

        let m = is_legal(
            &pos,
            Square::from_file_rank(4, 0),
            Square::from_file_rank(6, 0),
            PieceType::Empty,
        )
        .unwrap();
        apply(&mut pos, m);

        let king = pos.board[Square::from_file_rank(6, 0).index()];
        let rook = pos.board[Square::from_file_rank(5, 0).index()];
        assert_eq!(king.kind(), PieceType::King);
        assert!(king.has_moved());
        assert_eq!(rook.kind(), PieceType::Rook);
        assert!(rook.has_moved());
        assert_eq!(pos.white_king_sq, Square::from_file_rank(6, 0));
        assert!(pos.board[Square::from_file_rank(4, 0).index()].is_empty());
        assert!(pos.board[Square::from_file_rank(7, 0).index()].is_empty());
    }

    #[test]
    fn en_passant_capture_removes_the_passed_pawn() {
        let mut pos = Position::new_game(0);
        pos.board = [EMPTY; 64];
        pos.board[Square::from_algebraic("e5").unwrap().index()] = Piece::new(PieceType::Pawn, true);
        pos.board[Square::from_algebraic("d5").unwrap().index()] = Piece::new(PieceType::Pawn, false);
        pos.board[Square::from_file_rank(4, 0).index()] = Piece::new(PieceType::King, true);
        pos.board[Square::from_file_rank(4, 7).index()] = Piece::new(PieceType::King, false);
        pos.white_king_sq = Square::from_file_rank(4, 0);
        pos.black_king_sq = Square::from_file_rank(4, 7);
        pos.en_passant_target = Square::from_algebraic("d6").unwrap();

        let m = is_legal(
            &pos,
            Square::from_algebraic("e5").unwrap(),
            Square::from_algebraic("d6").unwrap(),
            PieceType::Empty,
        )
        .unwrap();
        assert!(m.is_en_passant);
        assert_eq!(m.captured_type, PieceType::Pawn);
        apply(&mut pos, m);

        assert!(pos.board[Square::from_algebraic("d5").unwrap().index()].is_empty());
        assert_eq!(pos.board[Square::from_algebraic("d6").unwrap().index()].kind(), PieceType::Pawn);
    }
}
