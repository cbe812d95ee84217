//! Core data model for the chess engine: squares, packed pieces, the
//! position record, and move records.
//!
//! The board and piece encodings follow the wire contract in the
//! specification byte-for-byte — a `Position`'s board is a flat 64-byte
//! array, and a `Piece` is a single packed byte — so a read-only snapshot
//! can be handed to a caller with no translation step. Ergonomic accessors
//! (`Square::rank`, `Piece::kind`, ...) are layered on top the way the
//! teacher crate's `Square`/`Piece` structs read, without widening the
//! underlying storage.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Square
// ---------------------------------------------------------------------------

/// A board coordinate in `[0, 64)`. Index = `rank * 8 + file`; rank 0 is
/// White's first rank, file 0 is the a-file. [`NO_SQUARE`] (255) is the
/// sentinel for "no square."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Square(pub u8);

/// The sentinel value meaning "no square" (e.g. no en passant target).
pub const NO_SQUARE: Square = Square(255);

impl Square {
    /// Builds a square from 0-based file and rank.
    pub fn from_file_rank(file: u8, rank: u8) -> Self {
        debug_assert!(file < 8 && rank < 8, "square out of bounds");
        Square(rank * 8 + file)
    }

    /// Returns `true` for any of the 64 on-board indices (excludes
    /// [`NO_SQUARE`] and anything `>= 64`).
    pub fn is_on_board(self) -> bool {
        self.0 < 64
    }

    /// 0-based file (a=0..h=7). Only meaningful when `is_on_board()`.
    pub fn file(self) -> u8 {
        self.0 % 8
    }

    /// 0-based rank (rank 1 = 0 .. rank 8 = 7). Only meaningful when
    /// `is_on_board()`.
    pub fn rank(self) -> u8 {
        self.0 / 8
    }

    /// Flat index into a 64-element board array.
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Returns the square offset by `(df, dr)` files/ranks, or `None` if the
    /// result falls off the board.
    pub fn offset(self, df: i8, dr: i8) -> Option<Square> {
        if !self.is_on_board() {
            return None;
        }
        let f = self.file() as i8 + df;
        let r = self.rank() as i8 + dr;
        if (0..8).contains(&f) && (0..8).contains(&r) {
            Some(Square::from_file_rank(f as u8, r as u8))
        } else {
            None
        }
    }

    /// Parses algebraic notation (e.g. `"e4"`) into a square.
    pub fn from_algebraic(s: &str) -> Option<Square> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return None;
        }
        let file = bytes[0].wrapping_sub(b'a');
        let rank = bytes[1].wrapping_sub(b'1');
        if file < 8 && rank < 8 {
            Some(Square::from_file_rank(file, rank))
        } else {
            None
        }
    }

    /// Renders the square as algebraic notation (e.g. `"e4"`).
    pub fn to_algebraic(self) -> String {
        format!("{}{}", (b'a' + self.file()) as char, self.rank() + 1)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_on_board() {
            write!(f, "{}", self.to_algebraic())
        } else {
            write!(f, "-")
        }
    }
}

// ---------------------------------------------------------------------------
// Piece
// ---------------------------------------------------------------------------

/// A piece type, independent of color. The discriminants match the packed
/// encoding's low 3 bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum PieceType {
    Empty = 0,
    Pawn = 1,
    Knight = 2,
    Bishop = 3,
    Rook = 4,
    Queen = 5,
    King = 6,
}

impl PieceType {
    fn from_bits(bits: u8) -> PieceType {
        match bits {
            0 => PieceType::Empty,
            1 => PieceType::Pawn,
            2 => PieceType::Knight,
            3 => PieceType::Bishop,
            4 => PieceType::Rook,
            5 => PieceType::Queen,
            6 => PieceType::King,
            _ => PieceType::Empty,
        }
    }

    /// Material value in centipawns, per the evaluator's table.
    pub fn material_value(self) -> i32 {
        match self {
            PieceType::Empty => 0,
            PieceType::Pawn => 100,
            PieceType::Knight => 320,
            PieceType::Bishop => 330,
            PieceType::Rook => 500,
            PieceType::Queen => 900,
            PieceType::King => 20_000,
        }
    }

    pub fn to_fen_char(self) -> char {
        match self {
            PieceType::Empty => '.',
            PieceType::Pawn => 'P',
            PieceType::Knight => 'N',
            PieceType::Bishop => 'B',
            PieceType::Rook => 'R',
            PieceType::Queen => 'Q',
            PieceType::King => 'K',
        }
    }
}

const TYPE_MASK: u8 = 0b0000_0111;
const COLOR_BIT: u8 = 0b0000_1000;
const MOVED_BIT: u8 = 0b0001_0000;

/// A packed 8-bit piece. Low 3 bits carry [`PieceType`]; bit 3 carries color
/// (0 = white, 1 = black); bit 4 is the has-moved flag (used for castling
/// eligibility); bits 5-7 are reserved zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece(pub u8);

/// The empty-square encoding.
pub const EMPTY: Piece = Piece(0);

impl Piece {
    /// Builds a piece of the given type and color, with the has-moved flag
    /// clear.
    pub fn new(kind: PieceType, is_white: bool) -> Piece {
        let color_bit = if is_white { 0 } else { COLOR_BIT };
        Piece(kind as u8 | color_bit)
    }

    pub fn is_empty(self) -> bool {
        self.kind() == PieceType::Empty
    }

    pub fn kind(self) -> PieceType {
        PieceType::from_bits(self.0 & TYPE_MASK)
    }

    /// `true` for White pieces. Meaningless on an empty square.
    pub fn is_white(self) -> bool {
        self.0 & COLOR_BIT == 0
    }

    pub fn has_moved(self) -> bool {
        self.0 & MOVED_BIT != 0
    }

    /// Returns a copy of this piece with the has-moved flag set.
    pub fn moved(self) -> Piece {
        Piece(self.0 | MOVED_BIT)
    }

    /// Returns a copy of this piece with its type replaced (used for
    /// promotion), preserving color and the has-moved flag.
    pub fn with_kind(self, kind: PieceType) -> Piece {
        Piece((self.0 & (COLOR_BIT | MOVED_BIT)) | kind as u8)
    }

    pub fn to_fen_char(self) -> char {
        let c = self.kind().to_fen_char();
        if self.is_white() {
            c
        } else {
            c.to_ascii_lowercase()
        }
    }
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// The game's termination state. Transitions only `Active` -> terminal;
/// terminal states are frozen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Active,
    WhiteWin,
    BlackWin,
    Draw,
    Stalemate,
}

impl Status {
    pub fn is_terminal(self) -> bool {
        !matches!(self, Status::Active)
    }
}

// ---------------------------------------------------------------------------
// MoveRecord
// ---------------------------------------------------------------------------

/// An immutable record of one applied half-move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub from: Square,
    pub to: Square,
    /// [`PieceType::Empty`] when this move is not a promotion.
    pub promotion_type: PieceType,
    /// The type of the captured piece, or [`PieceType::Empty`] if the move
    /// was not a capture. Pawn for en passant.
    pub captured_type: PieceType,
    pub is_castling: bool,
    pub is_en_passant: bool,
}

impl fmt::Display for MoveRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if self.promotion_type != PieceType::Empty {
            write!(f, "={}", self.promotion_type.to_fen_char())?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// The complete game state for one side's stored game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    #[serde(with = "board_serde")]
    pub board: [Piece; 64],
    pub white_to_move: bool,
    pub status: Status,
    pub move_count: u64,
    pub history: Vec<MoveRecord>,
    pub white_king_sq: Square,
    pub black_king_sq: Square,
    pub en_passant_target: Square,
    pub half_move_clock: u64,
    pub created_at: u64,
}

/// Serializes the 64-element board as a JSON array rather than relying on
/// serde's generic array support, matching the 64-byte wire format of §6.
mod board_serde {
    use super::Piece;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(board: &[Piece; 64], s: S) -> Result<S::Ok, S::Error> {
        board.to_vec().serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<[Piece; 64], D::Error> {
        let v: Vec<Piece> = Vec::deserialize(d)?;
        v.try_into()
            .map_err(|_| serde::de::Error::custom("board must have exactly 64 squares"))
    }
}

impl Position {
    /// Builds the standard starting position: White to move, Active status,
    /// empty history.
    pub fn new_game(now: u64) -> Position {
        let mut board = [EMPTY; 64];

        let back_rank: [PieceType; 8] = [
            PieceType::Rook,
            PieceType::Knight,
            PieceType::Bishop,
            PieceType::Queen,
            PieceType::King,
            PieceType::Bishop,
            PieceType::Knight,
            PieceType::Rook,
        ];

        for (file, kind) in back_rank.into_iter().enumerate() {
            board[Square::from_file_rank(file as u8, 0).index()] = Piece::new(kind, true);
            board[Square::from_file_rank(file as u8, 7).index()] = Piece::new(kind, false);
        }
        for file in 0..8u8 {
            board[Square::from_file_rank(file, 1).index()] = Piece::new(PieceType::Pawn, true);
            board[Square::from_file_rank(file, 6).index()] = Piece::new(PieceType::Pawn, false);
        }

        Position {
            board,
            white_to_move: true,
            status: Status::Active,
            move_count: 0,
            history: Vec::new(),
            white_king_sq: Square::from_file_rank(4, 0),
            black_king_sq: Square::from_file_rank(4, 7),
            en_passant_target: NO_SQUARE,
            half_move_clock: 0,
            created_at: now,
        }
    }

    pub fn king_sq(&self, white: bool) -> Square {
        if white {
            self.white_king_sq
        } else {
            self.black_king_sq
        }
    }

    pub fn is_in_check(&self, white: bool) -> bool {
        crate::attacks::is_square_attacked(&self.board, self.king_sq(white), !white)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_round_trips_algebraic() {
        for file in 0..8u8 {
            for rank in 0..8u8 {
                let sq = Square::from_file_rank(file, rank);
                let alg = sq.to_algebraic();
                assert_eq!(Square::from_algebraic(&alg), Some(sq));
            }
        }
    }

    #[test]
    fn no_square_sentinel_is_255() {
        assert_eq!(NO_SQUARE.0, 255);
        assert!(!NO_SQUARE.is_on_board());
    }

    #[test]
    fn piece_packs_type_color_and_moved_flag() {
        let p = Piece::new(PieceType::Knight, false);
        assert_eq!(p.kind(), PieceType::Knight);
        assert!(!p.is_white());
        assert!(!p.has_moved());
        let moved = p.moved();
        assert!(moved.has_moved());
        assert_eq!(moved.kind(), PieceType::Knight);
        assert!(!moved.is_white());
    }

    #[test]
    fn promotion_preserves_color_and_moved_flag() {
        let pawn = Piece::new(PieceType::Pawn, true).moved();
        let queen = pawn.with_kind(PieceType::Queen);
        assert_eq!(queen.kind(), PieceType::Queen);
        assert!(queen.is_white());
        assert!(queen.has_moved());
    }

    #[test]
    fn new_game_has_one_king_per_side_and_is_active() {
        let pos = Position::new_game(0);
        assert_eq!(pos.status, Status::Active);
        assert_eq!(pos.board[pos.white_king_sq.index()].kind(), PieceType::King);
        assert_eq!(pos.board[pos.black_king_sq.index()].kind(), PieceType::King);
        let king_count = pos.board.iter().filter(|p| p.kind() == PieceType::King).count();
        assert_eq!(king_count, 2);
    }

    #[test]
    fn position_round_trips_through_json() {
        let pos = Position::new_game(1_700_000_000);
        let json = serde_json::to_string(&pos).unwrap();
        let restored: Position = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.board, pos.board);
        assert_eq!(restored.white_king_sq, pos.white_king_sq);
        assert_eq!(restored.created_at, pos.created_at);
    }
}
