//! Monte Carlo equity estimation over the unseen portion of the deck.
//!
//! Each trial completes the board with a random draw from the cards not
//! on the board or in either hand, evaluates both hands, and tallies
//! the outcome. Results are stochastic; callers needing reproducibility
//! inject a seeded RNG.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::cards::{unseen_cards, Card};
use crate::hand::{HandClass, HandEvaluator, HandScore};

/// Trials used by the autonomous opponent before deciding.
pub const POLICY_ITERATIONS: u32 = 300;
/// Trials used for the win-odds lines logged during an all-in runout.
pub const RUNOUT_ITERATIONS: u32 = 500;

/// Result of an equity estimation run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Equity {
    /// Per-seat probability of winning the pot, ties counted half.
    pub win_rates: [f64; 2],
    /// Mean coarse class rank (1 = Straight Flush .. 9 = High Card)
    /// observed for the focus seat across trials.
    pub avg_class_rank: f64,
}

/// Estimates both players' equity by sampling board completions.
///
/// A complete board leaves nothing to draw, so the run short-circuits
/// to a single deterministic trial regardless of `iterations`.
pub fn estimate<R: Rng + ?Sized>(
    eval: &dyn HandEvaluator,
    board: &[Card],
    holes: &[[Card; 2]; 2],
    focus: usize,
    iterations: u32,
    rng: &mut R,
) -> Equity {
    let known: Vec<Card> = board
        .iter()
        .chain(holes[0].iter())
        .chain(holes[1].iter())
        .copied()
        .collect();
    let mut pool = unseen_cards(&known);
    let need = 5 - board.len();
    let iterations = if need == 0 { 1 } else { iterations.max(1) };

    let mut wins = [0u32; 2];
    let mut ties = 0u32;
    let mut rank_sum = 0u64;
    let mut trial_board: Vec<Card> = Vec::with_capacity(5);
    for _ in 0..iterations {
        trial_board.clear();
        trial_board.extend_from_slice(board);
        let (drawn, _) = pool.partial_shuffle(rng, need);
        trial_board.extend_from_slice(drawn);

        let s0 = eval.evaluate(&holes[0], &trial_board);
        let s1 = eval.evaluate(&holes[1], &trial_board);
        if s0 < s1 {
            wins[0] += 1;
        } else if s1 < s0 {
            wins[1] += 1;
        } else {
            ties += 1;
        }
        let focus_score = if focus == 0 { s0 } else { s1 };
        rank_sum += focus_score.class().rank() as u64;
    }

    let n = iterations as f64;
    let half_ties = ties as f64 / 2.0;
    Equity {
        win_rates: [
            (wins[0] as f64 + half_ties) / n,
            (wins[1] as f64 + half_ties) / n,
        ],
        avg_class_rank: rank_sum as f64 / n,
    }
}

/// Class rank of the best two-card hand possible against a complete
/// board, found by exhaustively trying every remaining pair of cards.
/// While the board is incomplete there is no meaningful upper bound
/// yet, and the weakest class rank is returned.
pub fn best_board_class(eval: &dyn HandEvaluator, board: &[Card]) -> u8 {
    if board.len() < 5 {
        return HandClass::HighCard.rank();
    }
    let pool = unseen_cards(board);
    let mut best: Option<HandScore> = None;
    for i in 0..pool.len() {
        for j in i + 1..pool.len() {
            let score = eval.evaluate(&[pool[i], pool[j]], board);
            if best.is_none_or(|b| score < b) {
                best = Some(score);
            }
        }
    }
    best.map_or(HandClass::HighCard.rank(), |s| s.class().rank())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Rank, Suit};
    use crate::hand::StandardEvaluator;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn card(rank: Rank, suit: Suit) -> Card {
        Card { suit, rank }
    }

    #[test]
    fn complete_board_is_deterministic() {
        let eval = StandardEvaluator;
        // board makes player 0 a king-high straight, player 1 two pair
        let board = [
            card(Rank::King, Suit::Spades),
            card(Rank::Queen, Suit::Spades),
            card(Rank::Jack, Suit::Spades),
            card(Rank::Ten, Suit::Hearts),
            card(Rank::Two, Suit::Hearts),
        ];
        let holes = [
            [card(Rank::Ace, Suit::Hearts), card(Rank::Nine, Suit::Clubs)],
            [card(Rank::Two, Suit::Clubs), card(Rank::Ten, Suit::Diamonds)],
        ];
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let eq = estimate(&eval, &board, &holes, 0, 10_000, &mut rng);
        assert_eq!(eq.win_rates[0], 1.0);
        assert_eq!(eq.win_rates[1], 0.0);
        assert_eq!(eq.avg_class_rank, HandClass::Straight.rank() as f64);
    }

    #[test]
    fn tied_board_splits_equity() {
        let eval = StandardEvaluator;
        // both players play the board: a broadway straight
        let board = [
            card(Rank::Ace, Suit::Spades),
            card(Rank::King, Suit::Diamonds),
            card(Rank::Queen, Suit::Spades),
            card(Rank::Jack, Suit::Hearts),
            card(Rank::Ten, Suit::Hearts),
        ];
        let holes = [
            [card(Rank::Two, Suit::Clubs), card(Rank::Three, Suit::Clubs)],
            [card(Rank::Four, Suit::Diamonds), card(Rank::Five, Suit::Clubs)],
        ];
        let mut rng = ChaCha20Rng::seed_from_u64(2);
        let eq = estimate(&eval, &board, &holes, 1, 300, &mut rng);
        assert_eq!(eq.win_rates, [0.5, 0.5]);
    }

    #[test]
    fn dominating_hand_wins_most_trials() {
        let eval = StandardEvaluator;
        let holes = [
            [card(Rank::Ace, Suit::Spades), card(Rank::Ace, Suit::Hearts)],
            [card(Rank::Seven, Suit::Clubs), card(Rank::Two, Suit::Diamonds)],
        ];
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        let eq = estimate(&eval, &[], &holes, 0, 400, &mut rng);
        // aces against seven-deuce run roughly 87%; allow a wide band
        assert!(eq.win_rates[0] > 0.78, "got {}", eq.win_rates[0]);
        assert!(eq.win_rates[0] < 0.97, "got {}", eq.win_rates[0]);
        assert!((eq.win_rates[0] + eq.win_rates[1] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn best_board_class_finds_the_nuts() {
        let eval = StandardEvaluator;
        let board = [
            card(Rank::King, Suit::Spades),
            card(Rank::Queen, Suit::Spades),
            card(Rank::Jack, Suit::Spades),
            card(Rank::Seven, Suit::Hearts),
            card(Rank::Two, Suit::Diamonds),
        ];
        // holding A♠T♠ would make a royal flush
        assert_eq!(
            best_board_class(&eval, &board),
            HandClass::StraightFlush.rank()
        );
    }

    #[test]
    fn incomplete_board_has_no_upper_bound() {
        let eval = StandardEvaluator;
        let board = [
            card(Rank::King, Suit::Spades),
            card(Rank::Queen, Suit::Spades),
            card(Rank::Jack, Suit::Spades),
        ];
        assert_eq!(best_board_class(&eval, &board), HandClass::HighCard.rank());
    }
}
