use serde::{Deserialize, Serialize};

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::cards::{format_cards, Card};
use crate::deck::Deck;
use crate::equity::{self, RUNOUT_ITERATIONS};
use crate::errors::GameError;
use crate::hand::{HandEvaluator, StandardEvaluator};
use crate::logger::{format_hand_id, ActionRecord, HandRecord, ShowdownInfo};
use crate::player::{Player, PlayerAction};
use crate::sink::{LogBuffer, NullSink, PlayerView, Sink, Snapshot};

/// Default seed when the host does not supply one.
const DEFAULT_SEED: u64 = 0xA1A2_A3A4;

/// Lifecycle stage of the match. `Showdown` and `HandOver` only exist
/// inside a transition; between engine calls the observable stage is a
/// betting street or `GameOver`.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub enum Stage {
    /// Hole cards dealt, blinds posted
    Preflop,
    /// Three community cards
    Flop,
    /// Fourth community card
    Turn,
    /// Fifth community card
    River,
    /// Hands revealed, pot being resolved
    Showdown,
    /// Between hands
    HandOver,
    /// A stack reached zero; terminal
    GameOver,
}

impl Stage {
    pub fn is_betting(self) -> bool {
        matches!(
            self,
            Stage::Preflop | Stage::Flop | Stage::Turn | Stage::River
        )
    }
}

/// Host-overridable match parameters.
#[derive(Debug, Clone)]
pub struct MatchConfig {
    pub starting_chips: u32,
    pub small_blind: u32,
    pub big_blind: u32,
    pub names: [String; 2],
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            starting_chips: 50_000,
            small_blind: 500,
            big_blind: 1_000,
            names: ["Player 1".to_string(), "Player 2".to_string()],
        }
    }
}

// normalized form of a player input after clamping
enum Resolved {
    Fold,
    Check,
    Call,
    Raise(u32),
}

/// Heads-up no-limit hold'em match engine: blind posting, legal-action
/// clamping, street progression, all-in runouts and showdown
/// resolution for exactly two players.
///
/// Street bets live on the players and sweep into the pot when a
/// street completes, so `chips + bets + pot` is conserved at every
/// step until a pot is awarded.
pub struct Engine {
    deck: Deck,
    players: [Player; 2],
    board: Vec<Card>,
    pot: u32,
    current_bet: u32,
    dealer: usize,
    turn: usize,
    stage: Stage,
    small_blind: u32,
    big_blind: u32,
    evaluator: Box<dyn HandEvaluator>,
    equity_rng: ChaCha20Rng,
    log: LogBuffer,
    summary: Vec<String>,
    sink: Box<dyn Sink>,
    seed: Option<u64>,
    hand_seq: u32,
    actions: Vec<ActionRecord>,
    records: Vec<HandRecord>,
}

impl Engine {
    pub fn new(seed: Option<u64>) -> Self {
        Self::with_config(MatchConfig::default(), seed)
    }

    pub fn with_config(config: MatchConfig, seed: Option<u64>) -> Self {
        let seed_v = seed.unwrap_or(DEFAULT_SEED);
        Self::build(config, Deck::new_with_seed(seed_v), seed)
    }

    /// Engine over a caller-supplied deck. Used with [`Deck::stacked`]
    /// for scripted deals (tests, replays).
    pub fn with_deck(config: MatchConfig, deck: Deck) -> Self {
        Self::build(config, deck, None)
    }

    fn build(config: MatchConfig, deck: Deck, seed: Option<u64>) -> Self {
        let seed_v = seed.unwrap_or(DEFAULT_SEED);
        let [n0, n1] = config.names;
        Self {
            deck,
            players: [
                Player::new(n0, config.starting_chips),
                Player::new(n1, config.starting_chips),
            ],
            board: Vec::with_capacity(5),
            pot: 0,
            current_bet: 0,
            dealer: 0,
            turn: 0,
            stage: Stage::HandOver,
            small_blind: config.small_blind,
            big_blind: config.big_blind,
            evaluator: Box::new(StandardEvaluator),
            equity_rng: ChaCha20Rng::seed_from_u64(seed_v.wrapping_add(1)),
            log: LogBuffer::default(),
            summary: Vec::new(),
            sink: Box::new(NullSink),
            seed,
            hand_seq: 0,
            actions: Vec::new(),
            records: Vec::new(),
        }
    }

    pub fn set_sink(&mut self, sink: Box<dyn Sink>) {
        self.sink = sink;
    }

    pub fn set_evaluator(&mut self, evaluator: Box<dyn HandEvaluator>) {
        self.evaluator = evaluator;
    }

    pub fn players(&self) -> &[Player; 2] {
        &self.players
    }
    pub fn board(&self) -> &[Card] {
        &self.board
    }
    /// Chips swept from completed streets, not yet awarded.
    pub fn pot(&self) -> u32 {
        self.pot
    }
    /// Everything committed to the table: pot plus live street bets.
    pub fn total_pot(&self) -> u32 {
        self.pot + self.players[0].bet() + self.players[1].bet()
    }
    pub fn current_bet(&self) -> u32 {
        self.current_bet
    }
    pub fn dealer(&self) -> usize {
        self.dealer
    }
    /// Seat whose action the hand is waiting on.
    pub fn turn(&self) -> usize {
        self.turn
    }
    pub fn stage(&self) -> Stage {
        self.stage
    }
    pub fn small_blind(&self) -> u32 {
        self.small_blind
    }
    pub fn big_blind(&self) -> u32 {
        self.big_blind
    }
    pub fn hands_played(&self) -> u32 {
        self.hand_seq
    }
    pub fn evaluator(&self) -> &dyn HandEvaluator {
        self.evaluator.as_ref()
    }
    pub fn log_lines(&self) -> Vec<String> {
        self.log.to_vec()
    }

    /// Finished hand records accumulated since the last drain.
    pub fn drain_records(&mut self) -> Vec<HandRecord> {
        std::mem::take(&mut self.records)
    }

    pub fn snapshot(&self) -> Snapshot {
        let view = |p: &Player| PlayerView {
            name: p.name().to_string(),
            chips: p.chips(),
            bet: p.bet(),
        };
        Snapshot {
            pot: self.total_pot(),
            board: self.board.clone(),
            players: [view(&self.players[0]), view(&self.players[1])],
            stage: self.stage,
            to_act: self.stage.is_betting().then_some(self.turn),
            log: self.log.to_vec(),
            summary: self.summary.clone(),
        }
    }

    /// Begins the next hand: reshuffles, alternates the dealer, deals
    /// hole cards, posts blinds (partial all-in blinds allowed) and
    /// hands the action to the small blind. No-op once the match is
    /// over.
    pub fn start_hand(&mut self) -> Result<(), GameError> {
        if self.stage == Stage::GameOver {
            return Ok(());
        }
        self.deck.shuffle();
        self.board.clear();
        self.summary.clear();
        self.actions.clear();
        self.pot = 0;
        self.current_bet = 0;
        for p in &mut self.players {
            p.reset_for_hand();
        }
        self.hand_seq += 1;
        self.dealer ^= 1;
        self.log.push("--- New hand ---");

        // two rounds of one card each, in seat order
        let c0 = self.deal_one()?;
        let c1 = self.deal_one()?;
        let c2 = self.deal_one()?;
        let c3 = self.deal_one()?;
        self.players[0].set_hole([c0, c2]);
        self.players[1].set_hole([c1, c3]);

        self.stage = Stage::Preflop;
        let sb = self.dealer;
        self.post_blind(sb, self.small_blind);
        self.post_blind(sb ^ 1, self.big_blind);
        self.turn = sb;
        self.publish();
        Ok(())
    }

    fn deal_one(&mut self) -> Result<Card, GameError> {
        self.deck.deal_card().ok_or(GameError::DeckExhausted)
    }

    fn post_blind(&mut self, seat: usize, amount: u32) {
        let p = &mut self.players[seat];
        let blind = amount.min(p.chips());
        p.commit(blind);
        let line = format!("{} posts {}", p.name(), blind);
        self.current_bet = self.current_bet.max(self.players[seat].bet());
        self.log.push(line);
    }

    /// Applies one betting action for `actor`. Out-of-turn or
    /// currently-illegal inputs are dropped without touching state and
    /// reported as `Ok(false)`; well-formed actions are always clamped
    /// to what the stack affords, never rejected.
    pub fn apply_action(&mut self, actor: usize, action: PlayerAction) -> Result<bool, GameError> {
        if !self.stage.is_betting() || actor != self.turn {
            return Ok(false);
        }
        let opp = actor ^ 1;
        let resolved = match self.resolve(actor, action) {
            Some(r) => r,
            None => return Ok(false),
        };

        let street = self.stage;
        match resolved {
            Resolved::Fold => {
                self.players[actor].fold();
                self.log
                    .push(format!("{} folds", self.players[actor].name()));
                self.record(actor, street, PlayerAction::Fold);
                self.award(opp, None)?;
                return Ok(true);
            }
            Resolved::Check => {
                self.players[actor].set_acted(true);
                self.log
                    .push(format!("{} checks", self.players[actor].name()));
                self.record(actor, street, PlayerAction::Check);
            }
            Resolved::Call => {
                let to_call = self.current_bet - self.players[actor].bet();
                let amount = to_call.min(self.players[actor].chips());
                self.players[actor].commit(amount);
                self.players[actor].set_acted(true);
                if amount < to_call {
                    // short all-in call: the uncallable excess goes back
                    let diff = to_call - amount;
                    self.players[opp].refund(diff);
                    self.current_bet = self.players[actor].bet();
                    self.log
                        .push(format!("{} gets back {}", self.players[opp].name(), diff));
                }
                self.log
                    .push(format!("{} calls {}", self.players[actor].name(), amount));
                self.record(actor, street, PlayerAction::Call);
            }
            Resolved::Raise(target) => {
                let amount = (target - self.players[actor].bet()).min(self.players[actor].chips());
                self.players[actor].commit(amount);
                self.current_bet = self.players[actor].bet();
                self.players[actor].set_acted(true);
                self.players[opp].set_acted(false);
                self.log.push(format!(
                    "{} raises to {}",
                    self.players[actor].name(),
                    self.players[actor].bet()
                ));
                if self.players[actor].chips() == 0 {
                    self.log
                        .push(format!("{} is all-in!", self.players[actor].name()));
                }
                self.record(
                    actor,
                    street,
                    PlayerAction::Raise {
                        to: Some(self.players[actor].bet()),
                    },
                );
            }
        }

        // a player with nothing behind has no further decisions
        if self.players[actor].is_all_in() {
            self.players[actor].set_acted(true);
        }
        if self.players[opp].folded() {
            self.award(actor, None)?;
            return Ok(true);
        }

        let settled = self.players.iter().all(|p| p.acted())
            && self.players[0].bet() == self.players[1].bet();
        if settled {
            let hand = self.hand_seq;
            self.advance_street()?;
            if self.stage.is_betting()
                && self.hand_seq == hand
                && self.players.iter().any(|p| p.is_all_in())
            {
                self.auto_runout()?;
                return Ok(true);
            }
        } else {
            self.turn = opp;
        }
        self.publish();
        Ok(true)
    }

    // Clamp an input to what the stack and the opponent afford.
    // `None` means the input is currently illegal and is dropped.
    fn resolve(&self, actor: usize, action: PlayerAction) -> Option<Resolved> {
        let p = &self.players[actor];
        let opp = &self.players[actor ^ 1];
        let target = match action {
            PlayerAction::Fold => return Some(Resolved::Fold),
            PlayerAction::Check => {
                if p.bet() == self.current_bet {
                    return Some(Resolved::Check);
                }
                return None;
            }
            PlayerAction::Call => return Some(Resolved::Call),
            PlayerAction::Raise { to } => {
                to.unwrap_or_else(|| self.current_bet.saturating_add(self.big_blind))
            }
            PlayerAction::AllIn => p.bet() + p.chips(),
        };
        // raising a player who cannot respond, raising short of the
        // current bet, or raising with at most a call behind: all calls
        if opp.chips() == 0
            || p.bet() + p.chips() <= self.current_bet
            || target <= self.current_bet
        {
            return Some(Resolved::Call);
        }
        Some(Resolved::Raise(target.min(p.bet() + p.chips())))
    }

    fn record(&mut self, seat: usize, street: Stage, action: PlayerAction) {
        self.actions.push(ActionRecord {
            player_id: seat,
            street,
            action,
        });
    }

    fn sweep_bets(&mut self) {
        for seat in 0..2 {
            self.pot += self.players[seat].sweep_bet();
        }
        self.current_bet = 0;
    }

    fn advance_street(&mut self) -> Result<(), GameError> {
        self.sweep_bets();
        for p in &mut self.players {
            p.reset_for_street();
        }
        let (next, deal) = match self.stage {
            Stage::Preflop => (Stage::Flop, 3),
            Stage::Flop => (Stage::Turn, 1),
            Stage::Turn => (Stage::River, 1),
            Stage::River => {
                return self.showdown();
            }
            _ => return Err(GameError::NoHandInProgress),
        };
        self.deck.burn_card();
        for _ in 0..deal {
            let c = self.deal_one()?;
            self.board.push(c);
        }
        self.stage = next;
        self.turn = self.dealer ^ 1;
        let label = match next {
            Stage::Flop => "Flop",
            Stage::Turn => "Turn",
            _ => "River",
        };
        self.log
            .push(format!("{}: {}", label, format_cards(&self.board)));
        Ok(())
    }

    /// Runs the remaining streets with no further betting input once a
    /// live player is all-in, logging win odds at each dealt street.
    fn auto_runout(&mut self) -> Result<(), GameError> {
        let (h0, h1) = match (self.players[0].hole_cards(), self.players[1].hole_cards()) {
            (Some(a), Some(b)) => (a, b),
            _ => return Err(GameError::NoHandInProgress),
        };
        self.log.push(format!(
            "All-in! {}: {} vs {}: {}",
            self.players[0].name(),
            format_cards(&h0),
            self.players[1].name(),
            format_cards(&h1),
        ));
        self.log_win_odds();
        self.publish();
        let hand = self.hand_seq;
        while self.stage.is_betting() && self.hand_seq == hand {
            self.advance_street()?;
            if self.stage.is_betting() && self.hand_seq == hand {
                self.log_win_odds();
                self.publish();
            }
        }
        Ok(())
    }

    fn log_win_odds(&mut self) {
        let holes = match (self.players[0].hole_cards(), self.players[1].hole_cards()) {
            (Some(a), Some(b)) => [a, b],
            _ => return,
        };
        let eq = equity::estimate(
            self.evaluator.as_ref(),
            &self.board,
            &holes,
            0,
            RUNOUT_ITERATIONS,
            &mut self.equity_rng,
        );
        self.log.push(format!(
            "Win odds: {} {:.1}% - {} {:.1}%",
            self.players[0].name(),
            eq.win_rates[0] * 100.0,
            self.players[1].name(),
            eq.win_rates[1] * 100.0,
        ));
    }

    fn showdown(&mut self) -> Result<(), GameError> {
        self.stage = Stage::Showdown;
        let (h0, h1) = match (self.players[0].hole_cards(), self.players[1].hole_cards()) {
            (Some(a), Some(b)) => (a, b),
            _ => return Err(GameError::NoHandInProgress),
        };
        self.log.push(format!(
            "Showdown! {}: {} vs {}: {}",
            self.players[0].name(),
            format_cards(&h0),
            self.players[1].name(),
            format_cards(&h1),
        ));
        let s0 = self.evaluator.evaluate(&h0, &self.board);
        let s1 = self.evaluator.evaluate(&h1, &self.board);
        self.summary = vec![
            format!(
                "{}: {} ({})",
                self.players[0].name(),
                format_cards(&h0),
                self.evaluator.class_of(s0)
            ),
            format!(
                "{}: {} ({})",
                self.players[1].name(),
                format_cards(&h1),
                self.evaluator.class_of(s1)
            ),
        ];
        if s0 < s1 {
            self.award(0, Some(ShowdownInfo::winners(vec![0])))
        } else if s1 < s0 {
            self.award(1, Some(ShowdownInfo::winners(vec![1])))
        } else {
            self.split_pot()
        }
    }

    // tie: half each, odd chip to the non-dealer
    fn split_pot(&mut self) -> Result<(), GameError> {
        self.sweep_bets();
        let pot = std::mem::take(&mut self.pot);
        let half = pot / 2;
        let remainder = pot % 2;
        self.players[0].add_chips(half);
        self.players[1].add_chips(half);
        if remainder > 0 {
            self.players[self.dealer ^ 1].add_chips(remainder);
        }
        self.stage = Stage::HandOver;
        self.log.push("It's a tie!".to_string());
        self.finish_record(
            "split pot".to_string(),
            Some(ShowdownInfo {
                winners: vec![0, 1],
                notes: Some("split pot".to_string()),
            }),
        );
        self.publish();
        self.check_game_end()
    }

    fn award(&mut self, winner: usize, showdown: Option<ShowdownInfo>) -> Result<(), GameError> {
        self.sweep_bets();
        let pot = std::mem::take(&mut self.pot);
        self.players[winner].add_chips(pot);
        self.stage = Stage::HandOver;
        let line = format!(
            "{} wins {} with board {}",
            self.players[winner].name(),
            pot,
            format_cards(&self.board)
        );
        self.log.push(line);
        self.finish_record(
            format!("{} wins {}", self.players[winner].name(), pot),
            showdown,
        );
        self.publish();
        self.check_game_end()
    }

    fn finish_record(&mut self, result: String, showdown: Option<ShowdownInfo>) {
        self.records.push(HandRecord {
            hand_id: format_hand_id(self.hand_seq),
            seed: self.seed,
            actions: std::mem::take(&mut self.actions),
            board: self.board.clone(),
            result: Some(result),
            ts: None,
            showdown,
        });
    }

    fn check_game_end(&mut self) -> Result<(), GameError> {
        let losers: Vec<&str> = self
            .players
            .iter()
            .filter(|p| p.chips() == 0)
            .map(|p| p.name())
            .collect();
        if losers.is_empty() {
            return self.start_hand();
        }
        let names = losers.join(", ");
        self.stage = Stage::GameOver;
        self.log
            .push(format!("Game over! {} ran out of chips.", names));
        self.publish();
        Ok(())
    }

    fn publish(&mut self) {
        let snapshot = self.snapshot();
        self.sink.publish(&snapshot);
    }
}
