//! The owner-keyed position store and the four mutating operations of
//! §6: `new_game`, `make_move`, `resign`, `claim_draw`, plus the
//! read-only snapshot queries.
//!
//! This is the seam the specification's design notes call out: the
//! core's observable surface is terminal status and [`MoveRecord`]s, and
//! everything stats/leaderboard/persistence-shaped stays on the other
//! side of it. [`PositionStore`] holds nothing but positions — no
//! storage format, no transport, no player statistics — so it can be
//! embedded behind whatever the calling system uses for those concerns.
//!
//! The store never manufactures an owner's identity; it only indexes by
//! whatever [`OwnerId`] the caller supplies. Authentication, wallets, and
//! transport are explicitly out of scope (§1) and live entirely on the
//! caller's side of this module.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::EngineError;
use crate::movegen::{self, is_legal};
use crate::mutate;
use crate::search::{self, EngineConfig};
use crate::types::{MoveRecord, PieceType, Position, Square, Status};

/// An opaque, caller-supplied identity under which one [`Position`] is
/// stored. The store treats this as a bare key — it carries no meaning
/// of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OwnerId(pub u64);

/// The outcome of a single [`PositionStore::make_move`] call: the
/// validated human move, and the engine's reply if the game was still
/// active afterward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOutcome {
    pub human_move: MoveRecord,
    pub engine_reply: Option<MoveRecord>,
    pub status: Status,
}

fn now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// An in-memory store of one [`Position`] per [`OwnerId`], implementing
/// the operations of §6. A single `RwLock` gives "read concurrently,
/// write exclusively" isolation per §5 without a per-owner lock: distinct
/// owners' positions are logically independent, but the store only ever
/// needs read access (snapshot queries) or write access (the four
/// mutating operations) at a time, never both.
#[derive(Debug)]
pub struct PositionStore {
    games: RwLock<HashMap<OwnerId, Position>>,
    config: EngineConfig,
}

impl Default for PositionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PositionStore {
    pub fn new() -> Self {
        PositionStore {
            games: RwLock::new(HashMap::new()),
            config: EngineConfig::default(),
        }
    }

    /// Builds a store whose searcher uses a non-default [`EngineConfig`]
    /// (e.g. a shallower depth for a faster but weaker opponent).
    pub fn with_config(config: EngineConfig) -> Self {
        PositionStore { games: RwLock::new(HashMap::new()), config }
    }

    /// Initializes or replaces `owner`'s position to the standard
    /// starting layout, Active status, empty history.
    pub fn new_game(&self, owner: OwnerId) {
        let mut games = self.games.write().expect("position store lock poisoned");
        games.insert(owner, Position::new_game(now()));
        log::info!("new game created for {owner:?}");
    }

    /// Validates and applies a human move for `owner`. If the resulting
    /// position is still Active, computes and applies the engine's reply
    /// in the same call. Either both halves commit (human move, and if
    /// applicable the engine reply) or the position is left unchanged.
    ///
    /// The human side is always White: the specification's gameplay flow
    /// runs the search only for Black, so `make_move` is only ever
    /// invoked with White to move.
    pub fn make_move(
        &self,
        owner: OwnerId,
        from: Square,
        to: Square,
        promotion: PieceType,
    ) -> Result<MoveOutcome, EngineError> {
        let mut games = self.games.write().expect("position store lock poisoned");
        let existing = games.get(&owner).ok_or(EngineError::GameNotFound)?;

        if existing.status.is_terminal() {
            return Err(EngineError::GameOver);
        }
        if !existing.white_to_move {
            return Err(EngineError::NotYourTurn);
        }

        // All of the following runs against a private clone, never the
        // stored position directly, so that a failure anywhere below
        // (an illegal human move, or the searcher's fatal
        // `NoLegalMoves`) leaves the owner's stored game untouched. The
        // clone is only written back once every fallible step below has
        // already succeeded.
        let mut pos = existing.clone();

        let human_move = is_legal(&pos, from, to, promotion)?;
        mutate::apply(&mut pos, human_move);

        let engine_reply = if !pos.status.is_terminal() {
            let reply = search::choose_reply_with_config(&pos, self.config)?;
            mutate::apply(&mut pos, reply);
            Some(reply)
        } else {
            None
        };

        let status = pos.status;
        games.insert(owner, pos);

        if status.is_terminal() {
            log::info!("game for {owner:?} ended: {status:?}");
        }

        Ok(MoveOutcome {
            human_move,
            engine_reply,
            status,
        })
    }

    /// Sets `owner`'s status to the opponent's win. The human side is
    /// always White, so resigning always yields [`Status::BlackWin`].
    pub fn resign(&self, owner: OwnerId) -> Result<(), EngineError> {
        let mut games = self.games.write().expect("position store lock poisoned");
        let pos = games.get_mut(&owner).ok_or(EngineError::GameNotFound)?;
        if pos.status.is_terminal() {
            return Err(EngineError::GameOver);
        }
        pos.status = Status::BlackWin;
        log::info!("game for {owner:?} ended by resignation: BlackWin");
        Ok(())
    }

    /// Succeeds iff the fifty-move rule or insufficient material holds,
    /// setting status to [`Status::Draw`].
    pub fn claim_draw(&self, owner: OwnerId) -> Result<(), EngineError> {
        let mut games = self.games.write().expect("position store lock poisoned");
        let pos = games.get_mut(&owner).ok_or(EngineError::GameNotFound)?;
        if pos.status.is_terminal() {
            return Err(EngineError::GameOver);
        }
        let fifty_move = pos.half_move_clock >= 100;
        let insufficient = movegen::is_insufficient_material(&pos.board);
        if !fifty_move && !insufficient {
            return Err(EngineError::CannotClaimDraw);
        }
        pos.status = Status::Draw;
        Ok(())
    }

    /// Returns a read-only snapshot of `owner`'s position, if one exists.
    pub fn position(&self, owner: OwnerId) -> Option<Position> {
        let games = self.games.read().expect("position store lock poisoned");
        games.get(&owner).cloned()
    }

    pub fn exists(&self, owner: OwnerId) -> bool {
        let games = self.games.read().expect("position store lock poisoned");
        games.contains_key(&owner)
    }
}

/// Replays `pos.history` from a fresh starting position and confirms the
/// replay lands on the same board as `pos`. Not part of the external
/// interface; a test-tooling helper for confirming `history` stayed
/// self-consistent with the rules, the way `checkai::game::GameManager`
/// replays persisted games on startup and warns when a stored game
/// doesn't reload cleanly.
pub fn verify_replay(pos: &Position) -> bool {
    let mut replay = Position::new_game(pos.created_at);
    for recorded in &pos.history {
        match is_legal(&replay, recorded.from, recorded.to, recorded.promotion_type) {
            Ok(mv) => mutate::apply(&mut replay, mv),
            Err(e) => {
                log::warn!(
                    "replay mismatch: move {recorded} is not legal when replayed from scratch ({e})"
                );
                return false;
            }
        }
    }
    replay.board == pos.board
}
