//! # headsup-ai: Autonomous Opponent for Heads-Up Hold'em
//!
//! Decision-making for the match engine's autonomous opponent: Monte
//! Carlo equity estimation feeding a fixed threshold policy, plus the
//! driver loop that keeps the table moving whenever the pending actor
//! is a bot.
//!
//! ## Core Components
//!
//! - [`Opponent`] - Trait for action selection against a live engine
//! - [`bot::EquityBot`] - Equity-sampling opponent with seeded RNG
//! - [`policy`] - The threshold decision function, pure and testable
//! - [`run_bot_turns`] - Feeds bot actions back into the engine until
//!   a human is up or the hand resolves
//!
//! ## Quick Start
//!
//! ```rust
//! use headsup_ai::{create_ai, run_bot_turns};
//! use headsup_engine::engine::Engine;
//!
//! let mut engine = Engine::new(Some(42));
//! engine.start_hand().expect("fresh deck");
//!
//! // seat 1 is the bot; it acts whenever the turn lands on it
//! let mut ai = create_ai("equity", 7);
//! run_bot_turns(&mut engine, ai.as_mut(), 1).expect("engine ok");
//! assert_ne!(engine.turn(), 1);
//! ```

use headsup_engine::engine::Engine;
use headsup_engine::errors::GameError;
use headsup_engine::player::PlayerAction;

pub mod bot;
pub mod policy;

/// An autonomous opponent. Implementations read the engine state and
/// return the action to feed back into [`Engine::apply_action`];
/// they never mutate the engine themselves.
pub trait Opponent: Send {
    /// Choose an action for `seat` given the current match state.
    fn act(&mut self, engine: &Engine, seat: usize) -> PlayerAction;

    /// Identifier for logs and match reports.
    fn name(&self) -> &str;
}

/// Factory for opponents by type string. Currently `"equity"` is the
/// only strategy.
///
/// # Panics
///
/// Panics if an unknown opponent type is requested.
pub fn create_ai(kind: &str, seed: u64) -> Box<dyn Opponent> {
    match kind {
        "equity" => Box::new(bot::EquityBot::new(seed)),
        _ => panic!("Unknown AI type: {}", kind),
    }
}

/// Applies bot actions until the pending actor is no longer `seat` or
/// no betting round is live. Folds, showdowns and the automatic next
/// hand all happen inside the engine, so one call settles everything
/// the bot can settle — the turn never stalls waiting on it.
pub fn run_bot_turns(
    engine: &mut Engine,
    ai: &mut dyn Opponent,
    seat: usize,
) -> Result<(), GameError> {
    while engine.stage().is_betting() && engine.turn() == seat {
        let action = ai.act(engine, seat);
        engine.apply_action(seat, action)?;
    }
    Ok(())
}
