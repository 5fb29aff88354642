//! Equity-driven autonomous opponent.
//!
//! Estimates win probability by Monte Carlo sampling of the remaining
//! streets, then feeds the result through the threshold policy. The
//! sampler is seeded per bot instance so matches replay exactly.

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use headsup_engine::engine::Engine;
use headsup_engine::equity::{self, POLICY_ITERATIONS};
use headsup_engine::player::PlayerAction;

use crate::policy::{self, Situation};
use crate::Opponent;

/// Autonomous opponent combining Monte Carlo equity estimation with
/// the fixed threshold policy.
///
/// The estimator sees both players' hole cards: it measures true
/// equity against the actual holding, not range-vs-range equity.
#[derive(Debug)]
pub struct EquityBot {
    rng: ChaCha20Rng,
    iterations: u32,
}

impl EquityBot {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
            iterations: POLICY_ITERATIONS,
        }
    }

    pub fn with_iterations(seed: u64, iterations: u32) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
            iterations,
        }
    }
}

impl Opponent for EquityBot {
    fn act(&mut self, engine: &Engine, seat: usize) -> PlayerAction {
        let me = &engine.players()[seat];
        let opp = &engine.players()[seat ^ 1];
        let to_call = engine.current_bet().saturating_sub(me.bet());

        let holes = match (
            engine.players()[0].hole_cards(),
            engine.players()[1].hole_cards(),
        ) {
            (Some(a), Some(b)) => [a, b],
            // no live hand to reason about: take the free option
            _ => {
                return if to_call == 0 {
                    PlayerAction::Check
                } else {
                    PlayerAction::Fold
                };
            }
        };

        let eq = equity::estimate(
            engine.evaluator(),
            engine.board(),
            &holes,
            seat,
            self.iterations,
            &mut self.rng,
        );
        let board_best = equity::best_board_class(engine.evaluator(), engine.board());

        policy::decide(&Situation {
            to_call,
            win_rate: eq.win_rates[seat],
            strong_hand: policy::strong_hand(eq.avg_class_rank, board_best),
            opponent_all_in: opp.chips() == 0,
            current_bet: engine.current_bet(),
            big_blind: engine.big_blind(),
            stack_total: me.bet() + me.chips(),
        })
    }

    fn name(&self) -> &str {
        "EquityBot"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bot_checks_or_folds_without_a_live_hand() {
        let engine = Engine::new(Some(42));
        // no hand started: no hole cards anywhere
        let mut bot = EquityBot::new(1);
        let action = bot.act(&engine, 0);
        assert!(matches!(
            action,
            PlayerAction::Check | PlayerAction::Fold
        ));
    }

    #[test]
    fn bot_acts_once_a_hand_is_live() {
        let mut engine = Engine::new(Some(43));
        engine.start_hand().expect("deal ok");
        let mut bot = EquityBot::with_iterations(2, 50);
        let seat = engine.turn();
        let action = bot.act(&engine, seat);
        assert!(matches!(
            action,
            PlayerAction::Fold
                | PlayerAction::Check
                | PlayerAction::Call
                | PlayerAction::Raise { .. }
                | PlayerAction::AllIn
        ));
    }
}
