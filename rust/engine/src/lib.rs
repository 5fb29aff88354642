//! # headsup-engine: Heads-Up Hold'em Match Engine
//!
//! A deterministic No-Limit Texas Hold'em betting engine for exactly
//! two players: blind posting, legal-action clamping, street
//! progression, all-in runouts, showdown resolution and Monte Carlo
//! equity estimation, with reproducible RNG throughout.
//!
//! ## Core Modules
//!
//! - [`cards`] - Card representation (Suit, Rank, Card) and deck views
//! - [`deck`] - Deterministic deck shuffling with ChaCha20 RNG
//! - [`engine`] - The betting state machine driving a match
//! - [`equity`] - Monte Carlo win-probability estimation
//! - [`hand`] - Hand evaluation behind the [`hand::HandEvaluator`] seam
//! - [`player`] - Player state and betting actions
//! - [`sink`] - Presentation snapshots and the bounded match log
//! - [`logger`] - Hand history records and JSONL serialization
//! - [`errors`] - Error types for structural failures
//!
//! ## Quick Start
//!
//! ```rust
//! use headsup_engine::engine::Engine;
//! use headsup_engine::player::PlayerAction;
//!
//! let mut engine = Engine::new(Some(42));
//! engine.start_hand().expect("fresh deck");
//!
//! // the small blind acts first preflop
//! let sb = engine.turn();
//! engine.apply_action(sb, PlayerAction::Call).expect("legal");
//! engine.apply_action(sb ^ 1, PlayerAction::Check).expect("legal");
//! assert_eq!(engine.board().len(), 3); // flop dealt
//! ```
//!
//! ## Deterministic Gameplay
//!
//! All match outcomes are reproducible from the seed:
//!
//! ```rust
//! use headsup_engine::deck::Deck;
//!
//! // Same seed produces same shuffle
//! let deck1 = Deck::new_with_seed(42);
//! let deck2 = Deck::new_with_seed(42);
//! // deck1 and deck2 will have identical card order
//! ```
//!
//! Out-of-turn and currently-illegal inputs are dropped silently
//! (`Ok(false)`), never applied partially: stale or duplicate inputs
//! from an interactive host cannot corrupt match state.

pub mod cards;
pub mod deck;
pub mod engine;
pub mod equity;
pub mod errors;
pub mod hand;
pub mod logger;
pub mod player;
pub mod sink;
