//! # chess_core
//!
//! A deterministic chess rules engine and bounded-depth alpha-beta
//! opponent, meant to be embedded by an external game server.
//!
//! The crate owns two things: a complete chess rules implementation
//! ([`types`], [`attacks`], [`movegen`], [`mutate`], [`terminate`]) and a
//! bounded-depth search that produces the engine's reply ([`eval`],
//! [`search`]). [`store`] ties both halves together behind the
//! owner-keyed operations a caller actually invokes — `new_game`,
//! `make_move`, `resign`, `claim_draw`.
//!
//! Everything outside that surface — presentation, persistence, a
//! leaderboard, move notation parsing, authentication — is explicitly out
//! of scope; this crate does not know such things exist.
//!
//! ## Example
//!
//! ```
//! use chess_core::store::{OwnerId, PositionStore};
//! use chess_core::types::{PieceType, Square};
//!
//! let store = PositionStore::new();
//! store.new_game(OwnerId(1));
//! let outcome = store
//!     .make_move(OwnerId(1), Square::from_algebraic("e2").unwrap(), Square::from_algebraic("e4").unwrap(), PieceType::Empty)
//!     .unwrap();
//! assert!(outcome.engine_reply.is_some());
//! ```

pub mod attacks;
pub mod error;
pub mod eval;
pub mod movegen;
pub mod mutate;
pub mod search;
pub mod store;
pub mod terminate;
pub mod types;
