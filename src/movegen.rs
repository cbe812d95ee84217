//! Move legality and move generation.
//!
//! Two independent code paths satisfy §4.2 and §4.4 of the specification:
//!
//! - [`is_legal`] answers "is this one candidate move legal?" by running
//!   the pseudo-legal geometry check for the piece on `from`, then
//!   simulating the move to confirm it doesn't leave the mover's own king
//!   attacked. Used to validate a human-supplied move, including
//!   underpromotion.
//! - [`generate_legal_moves`] / [`generate_legal_captures`] enumerate every
//!   legal move for a side, piece-centric, queen-promotion only (the
//!   engine never searches underpromotions). Used by the termination
//!   detector and the searcher.
//!
//! Both paths share the same king-safety simulation ([`king_safe_after`])
//! and the same board mutation primitive ([`apply_to_board`]), so they
//! cannot silently disagree about what "legal" means even though they
//! enumerate moves differently.

use crate::attacks::{self, BISHOP_DIRS, ROOK_DIRS};
use crate::error::{EngineError, InvalidMoveReason};
use crate::types::{MoveRecord, Piece, PieceType, Position, Square, EMPTY, NO_SQUARE};

// ---------------------------------------------------------------------------
// Shared board mutation primitive
// ---------------------------------------------------------------------------

/// Applies `mv` to a raw board array, following spec §4.3 steps 1-3: moves
/// (and promotes) the piece, relocates the castling rook, and removes an
/// en-passant-captured pawn. Does not touch any `Position` field besides
/// `board` — callers own the king-square/en-passant/clock bookkeeping.
pub(crate) fn apply_to_board(board: &mut [Piece; 64], mv: &MoveRecord, white_moving: bool) {
    let piece = board[mv.from.index()];
    board[mv.from.index()] = EMPTY;

    if mv.is_castling {
        let rank = mv.from.rank();
        let (rook_from_file, rook_to_file) = if mv.to.file() == 6 { (7, 5) } else { (0, 3) };
        let rook_from = Square::from_file_rank(rook_from_file, rank);
        let rook_to = Square::from_file_rank(rook_to_file, rank);
        let rook = board[rook_from.index()];
        board[rook_from.index()] = EMPTY;
        board[rook_to.index()] = rook.moved();
    }

    if mv.is_en_passant {
        let captured_rank = if white_moving { mv.to.rank() - 1 } else { mv.to.rank() + 1 };
        board[Square::from_file_rank(mv.to.file(), captured_rank).index()] = EMPTY;
    }

    let placed = if mv.promotion_type != PieceType::Empty {
        Piece::new(mv.promotion_type, white_moving).moved()
    } else {
        piece.moved()
    };
    board[mv.to.index()] = placed;
}

/// `true` if, after applying `mv`, the mover's own king (of color `white`)
/// is not attacked.
fn king_safe_after(pos: &Position, mv: &MoveRecord, white: bool) -> bool {
    let mut board = pos.board;
    let moving_piece = pos.board[mv.from.index()];
    apply_to_board(&mut board, mv, white);
    let king_sq = if moving_piece.kind() == PieceType::King {
        mv.to
    } else {
        pos.king_sq(white)
    };
    !attacks::is_square_attacked(&board, king_sq, !white)
}

// ---------------------------------------------------------------------------
// is_legal: single-candidate pseudo-legal + king-safety check
// ---------------------------------------------------------------------------

/// Validates one candidate human move and, on success, returns the fully
/// populated [`MoveRecord`] ready for [`crate::mutate::apply`].
pub fn is_legal(pos: &Position, from: Square, to: Square, promotion: PieceType) -> Result<MoveRecord, EngineError> {
    if !from.is_on_board() || !to.is_on_board() {
        return Err(EngineError::InvalidSquare);
    }

    let piece = pos.board[from.index()];
    if piece.is_empty() {
        return Err(EngineError::NoPiece);
    }
    let white = pos.white_to_move;
    if piece.is_white() != white {
        return Err(EngineError::WrongColor);
    }

    let dest = pos.board[to.index()];
    if !dest.is_empty() && dest.is_white() == white {
        return Err(EngineError::InvalidMove(InvalidMoveReason::Blocked));
    }

    let mv = shape_move(pos, from, to, promotion, piece, white)?;

    if !king_safe_after(pos, &mv, white) {
        return Err(EngineError::InvalidMove(InvalidMoveReason::WouldBeInCheck));
    }

    Ok(mv)
}

/// Checks piece-specific geometry for the candidate move and, if it
/// matches, returns the populated move record (promotion/capture/castling/
/// en-passant flags) without yet checking king safety.
fn shape_move(
    pos: &Position,
    from: Square,
    to: Square,
    promotion: PieceType,
    piece: Piece,
    white: bool,
) -> Result<MoveRecord, EngineError> {
    let dest = pos.board[to.index()];
    let df = to.file() as i8 - from.file() as i8;
    let dr = to.rank() as i8 - from.rank() as i8;

    match piece.kind() {
        PieceType::Pawn => shape_pawn_move(pos, from, to, promotion, white, df, dr, dest),
        PieceType::Knight => {
            if [(-2i8, -1i8), (-2, 1), (-1, -2), (-1, 2), (1, -2), (1, 2), (2, -1), (2, 1)]
                .contains(&(df, dr))
            {
                no_promotion(promotion)?;
                Ok(simple_move(from, to, dest.kind()))
            } else {
                Err(bad_geometry())
            }
        }
        PieceType::Bishop => {
            if df.abs() == dr.abs() && df != 0 && attacks::diagonal_clear(&pos.board, from, to) {
                no_promotion(promotion)?;
                Ok(simple_move(from, to, dest.kind()))
            } else {
                Err(bad_geometry())
            }
        }
        PieceType::Rook => {
            if (df == 0) != (dr == 0) && attacks::line_clear(&pos.board, from, to) {
                no_promotion(promotion)?;
                Ok(simple_move(from, to, dest.kind()))
            } else {
                Err(bad_geometry())
            }
        }
        PieceType::Queen => {
            let diag = df.abs() == dr.abs() && df != 0 && attacks::diagonal_clear(&pos.board, from, to);
            let straight = (df == 0) != (dr == 0) && attacks::line_clear(&pos.board, from, to);
            if diag || straight {
                no_promotion(promotion)?;
                Ok(simple_move(from, to, dest.kind()))
            } else {
                Err(bad_geometry())
            }
        }
        PieceType::King => shape_king_move(pos, from, to, promotion, white, df, dr),
        PieceType::Empty => unreachable!("empty piece cannot be the mover"),
    }
}

fn shape_pawn_move(
    pos: &Position,
    from: Square,
    to: Square,
    promotion: PieceType,
    white: bool,
    df: i8,
    dr: i8,
    dest: Piece,
) -> Result<MoveRecord, EngineError> {
    let dir: i8 = if white { 1 } else { -1 };
    let start_rank = if white { 1 } else { 6 };
    let promo_rank = if white { 7 } else { 0 };

    let double_push_clear = from.offset(0, dir).map(|mid| pos.board[mid.index()].is_empty());

    let (is_en_passant, captured_type) = if df == 0 && dr == dir && dest.is_empty() {
        (false, PieceType::Empty)
    } else if df == 0
        && dr == 2 * dir
        && from.rank() == start_rank
        && dest.is_empty()
        && double_push_clear == Some(true)
    {
        (false, PieceType::Empty)
    } else if df.abs() == 1 && dr == dir && !dest.is_empty() && dest.is_white() != white {
        (false, dest.kind())
    } else if df.abs() == 1 && dr == dir && dest.is_empty() && to == pos.en_passant_target {
        (true, PieceType::Pawn)
    } else {
        return Err(bad_geometry());
    };

    let reaches_last_rank = to.rank() == promo_rank;
    if reaches_last_rank {
        if !matches!(
            promotion,
            PieceType::Knight | PieceType::Bishop | PieceType::Rook | PieceType::Queen
        ) {
            return Err(EngineError::InvalidPromotion);
        }
    } else {
        no_promotion(promotion)?;
    }

    Ok(MoveRecord {
        from,
        to,
        promotion_type: if reaches_last_rank { promotion } else { PieceType::Empty },
        captured_type,
        is_castling: false,
        is_en_passant,
    })
}

fn shape_king_move(
    pos: &Position,
    from: Square,
    to: Square,
    promotion: PieceType,
    white: bool,
    df: i8,
    dr: i8,
) -> Result<MoveRecord, EngineError> {
    let dest = pos.board[to.index()];
    if df.abs() <= 1 && dr.abs() <= 1 {
        no_promotion(promotion)?;
        return Ok(simple_move(from, to, dest.kind()));
    }

    if dr == 0 && df.abs() == 2 {
        let home = Square::from_file_rank(4, if white { 0 } else { 7 });
        if from != home {
            return Err(bad_geometry());
        }
        no_promotion(promotion)?;
        let kingside = df == 2;
        if castling_legal(pos, white, kingside) {
            return Ok(MoveRecord {
                from,
                to,
                promotion_type: PieceType::Empty,
                captured_type: PieceType::Empty,
                is_castling: true,
                is_en_passant: false,
            });
        }
        return Err(EngineError::InvalidMove(InvalidMoveReason::CastlingBlocked));
    }

    Err(bad_geometry())
}

fn simple_move(from: Square, to: Square, captured: PieceType) -> MoveRecord {
    MoveRecord {
        from,
        to,
        promotion_type: PieceType::Empty,
        captured_type: captured,
        is_castling: false,
        is_en_passant: false,
    }
}

fn no_promotion(promotion: PieceType) -> Result<(), EngineError> {
    if promotion == PieceType::Empty {
        Ok(())
    } else {
        Err(EngineError::InvalidPromotion)
    }
}

fn bad_geometry() -> EngineError {
    EngineError::InvalidMove(InvalidMoveReason::BadGeometry)
}

/// Checks every precondition for kingside (`kingside = true`) or queenside
/// castling for `white`: king/rook unmoved, clear path, king not currently
/// in check, and the squares it passes through (and lands on) unattacked.
fn castling_legal(pos: &Position, white: bool, kingside: bool) -> bool {
    let rank = if white { 0 } else { 7 };
    let king_sq = Square::from_file_rank(4, rank);
    let king = pos.board[king_sq.index()];
    if king.kind() != PieceType::King || king.has_moved() {
        return false;
    }

    let (rook_file, path_files, king_path): (u8, &[u8], &[u8]) = if kingside {
        (7, &[5, 6], &[5, 6])
    } else {
        (0, &[1, 2, 3], &[2, 3])
    };

    let rook_sq = Square::from_file_rank(rook_file, rank);
    let rook = pos.board[rook_sq.index()];
    if rook.kind() != PieceType::Rook || rook.is_white() != white || rook.has_moved() {
        return false;
    }

    for &file in path_files {
        if !pos.board[Square::from_file_rank(file, rank).index()].is_empty() {
            return false;
        }
    }

    if pos.is_in_check(white) {
        return false;
    }

    for &file in king_path {
        if attacks::is_square_attacked(&pos.board, Square::from_file_rank(file, rank), !white) {
            return false;
        }
    }

    true
}

// ---------------------------------------------------------------------------
// Full legal move generation (piece-centric, queen-promotion only)
// ---------------------------------------------------------------------------

/// Generates every legal move for `white`, ordered captures-first and
/// MVV-first within captures, per §4.4. Only queen promotions are
/// generated (underpromotion search is a deliberate non-goal).
pub fn generate_legal_moves(pos: &Position, white: bool) -> Vec<MoveRecord> {
    let mut moves = Vec::with_capacity(48);

    for idx in 0..64u8 {
        let from = Square(idx);
        let piece = pos.board[from.index()];
        if piece.is_empty() || piece.is_white() != white {
            continue;
        }
        match piece.kind() {
            PieceType::Pawn => generate_pawn_moves(pos, from, white, &mut moves),
            PieceType::Knight => generate_leaper_moves(
                pos,
                from,
                white,
                &[(-2, -1), (-2, 1), (-1, -2), (-1, 2), (1, -2), (1, 2), (2, -1), (2, 1)],
                &mut moves,
            ),
            PieceType::King => {
                generate_leaper_moves(
                    pos,
                    from,
                    white,
                    &[(-1, -1), (-1, 0), (-1, 1), (0, -1), (0, 1), (1, -1), (1, 0), (1, 1)],
                    &mut moves,
                );
                generate_castling_moves(pos, from, white, &mut moves);
            }
            PieceType::Bishop => generate_sliding_moves(pos, from, white, &BISHOP_DIRS, &mut moves),
            PieceType::Rook => generate_sliding_moves(pos, from, white, &ROOK_DIRS, &mut moves),
            PieceType::Queen => {
                generate_sliding_moves(pos, from, white, &BISHOP_DIRS, &mut moves);
                generate_sliding_moves(pos, from, white, &ROOK_DIRS, &mut moves);
            }
            PieceType::Empty => {}
        }
    }

    moves.retain(|mv| king_safe_after(pos, mv, white));
    order_moves(&mut moves);
    moves
}

/// Captures-only subset of [`generate_legal_moves`], for quiescence search.
pub fn generate_legal_captures(pos: &Position, white: bool) -> Vec<MoveRecord> {
    generate_legal_moves(pos, white)
        .into_iter()
        .filter(|mv| mv.captured_type != PieceType::Empty)
        .collect()
}

fn generate_leaper_moves(pos: &Position, from: Square, white: bool, offsets: &[(i8, i8)], moves: &mut Vec<MoveRecord>) {
    for &(df, dr) in offsets {
        if let Some(to) = from.offset(df, dr) {
            let dest = pos.board[to.index()];
            if dest.is_empty() || dest.is_white() != white {
                moves.push(simple_move(from, to, dest.kind()));
            }
        }
    }
}

fn generate_sliding_moves(pos: &Position, from: Square, white: bool, dirs: &[(i8, i8)], moves: &mut Vec<MoveRecord>) {
    for &(df, dr) in dirs {
        let mut cur = from;
        loop {
            match cur.offset(df, dr) {
                None => break,
                Some(to) => {
                    let dest = pos.board[to.index()];
                    if dest.is_empty() {
                        moves.push(simple_move(from, to, PieceType::Empty));
                        cur = to;
                    } else {
                        if dest.is_white() != white {
                            moves.push(simple_move(from, to, dest.kind()));
                        }
                        break;
                    }
                }
            }
        }
    }
}

fn generate_pawn_moves(pos: &Position, from: Square, white: bool, moves: &mut Vec<MoveRecord>) {
    let dir: i8 = if white { 1 } else { -1 };
    let start_rank = if white { 1 } else { 6 };
    let promo_rank = if white { 7 } else { 0 };

    let push = |to: Square, captured: PieceType, is_en_passant: bool, moves: &mut Vec<MoveRecord>| {
        let promotion_type = if to.rank() == promo_rank { PieceType::Queen } else { PieceType::Empty };
        moves.push(MoveRecord {
            from,
            to,
            promotion_type,
            captured_type: captured,
            is_castling: false,
            is_en_passant,
        });
    };

    if let Some(one) = from.offset(0, dir) {
        if pos.board[one.index()].is_empty() {
            push(one, PieceType::Empty, false, moves);

            if from.rank() == start_rank {
                if let Some(two) = from.offset(0, dir * 2) {
                    if pos.board[two.index()].is_empty() {
                        push(two, PieceType::Empty, false, moves);
                    }
                }
            }
        }
    }

    for df in [-1i8, 1] {
        if let Some(to) = from.offset(df, dir) {
            let dest = pos.board[to.index()];
            if !dest.is_empty() && dest.is_white() != white {
                push(to, dest.kind(), false, moves);
            } else if dest.is_empty() && pos.en_passant_target != NO_SQUARE && to == pos.en_passant_target {
                push(to, PieceType::Pawn, true, moves);
            }
        }
    }
}

fn generate_castling_moves(pos: &Position, from: Square, white: bool, moves: &mut Vec<MoveRecord>) {
    let rank = from.rank();
    if castling_legal(pos, white, true) {
        moves.push(MoveRecord {
            from,
            to: Square::from_file_rank(6, rank),
            promotion_type: PieceType::Empty,
            captured_type: PieceType::Empty,
            is_castling: true,
            is_en_passant: false,
        });
    }
    if castling_legal(pos, white, false) {
        moves.push(MoveRecord {
            from,
            to: Square::from_file_rank(2, rank),
            promotion_type: PieceType::Empty,
            captured_type: PieceType::Empty,
            is_castling: true,
            is_en_passant: false,
        });
    }
}

/// Captures precede non-captures; among captures, queen/rook victims
/// precede minor-piece victims. Stable, so insertion order survives within
/// a tier — this ordering is the search's only source of move choice.
fn order_moves(moves: &mut [MoveRecord]) {
    moves.sort_by_key(|mv| capture_tier(mv.captured_type));
}

fn capture_tier(captured: PieceType) -> u8 {
    match captured {
        PieceType::Queen | PieceType::Rook => 0,
        PieceType::Empty => 2,
        _ => 1,
    }
}

/// Checks whether `board` has insufficient material to deliver checkmate,
/// per §4.5: bare kings, or a lone king against a king plus one minor
/// piece.
pub fn is_insufficient_material(board: &[Piece; 64]) -> bool {
    let mut white_minor = 0u8;
    let mut black_minor = 0u8;
    for &piece in board.iter() {
        match piece.kind() {
            PieceType::Empty | PieceType::King => {}
            PieceType::Knight | PieceType::Bishop => {
                if piece.is_white() {
                    white_minor += 1;
                } else {
                    black_minor += 1;
                }
            }
            _ => return false,
        }
    }
    matches!((white_minor, black_minor), (0, 0) | (0, 1) | (1, 0))
}
