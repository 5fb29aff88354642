use std::fmt;

use crate::cards::{Card, Suit};

/// Coarse hand class, ordered by the conventional class rank where
/// 1 is the strongest (Straight Flush) and 9 the weakest (High Card).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd)]
pub enum HandClass {
    StraightFlush = 1,
    FourOfAKind = 2,
    FullHouse = 3,
    Flush = 4,
    Straight = 5,
    ThreeOfAKind = 6,
    TwoPair = 7,
    OnePair = 8,
    HighCard = 9,
}

impl HandClass {
    pub fn rank(self) -> u8 {
        self as u8
    }

    pub fn from_rank(rank: u8) -> HandClass {
        match rank {
            1 => HandClass::StraightFlush,
            2 => HandClass::FourOfAKind,
            3 => HandClass::FullHouse,
            4 => HandClass::Flush,
            5 => HandClass::Straight,
            6 => HandClass::ThreeOfAKind,
            7 => HandClass::TwoPair,
            8 => HandClass::OnePair,
            _ => HandClass::HighCard,
        }
    }
}

impl fmt::Display for HandClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            HandClass::StraightFlush => "Straight Flush",
            HandClass::FourOfAKind => "Four of a Kind",
            HandClass::FullHouse => "Full House",
            HandClass::Flush => "Flush",
            HandClass::Straight => "Straight",
            HandClass::ThreeOfAKind => "Three of a Kind",
            HandClass::TwoPair => "Two Pair",
            HandClass::OnePair => "Pair",
            HandClass::HighCard => "High Card",
        };
        f.write_str(label)
    }
}

/// Totally ordered hand strength; a strictly lower score is a strictly
/// better hand. The class rank occupies the top bits, so the coarse
/// class is recoverable from the score alone.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct HandScore(u32);

impl HandScore {
    // kickers ordered high -> low; absent slots are zero
    fn pack(class: HandClass, kickers: [u8; 5]) -> HandScore {
        let mut v = (class.rank() as u32) << 20;
        for (i, &k) in kickers.iter().enumerate() {
            v |= ((15 - k as u32) & 0xF) << (16 - 4 * i);
        }
        HandScore(v)
    }

    pub fn class(self) -> HandClass {
        HandClass::from_rank((self.0 >> 20) as u8)
    }
}

/// Capability seam for hand strength evaluation. Implementations must
/// order scores consistently across calls within one process.
pub trait HandEvaluator: Send + Sync {
    /// Strength of the best hand formed from two hole cards plus
    /// 0..=5 board cards. Lower is strictly better.
    fn evaluate(&self, hole: &[Card; 2], board: &[Card]) -> HandScore;

    fn class_of(&self, score: HandScore) -> HandClass {
        score.class()
    }
}

/// Default evaluator: rank/suit counting with bitmask straight
/// detection over the combined 2..=7 cards.
#[derive(Debug, Default, Clone, Copy)]
pub struct StandardEvaluator;

impl HandEvaluator for StandardEvaluator {
    fn evaluate(&self, hole: &[Card; 2], board: &[Card]) -> HandScore {
        let mut cards: Vec<Card> = Vec::with_capacity(7);
        cards.extend_from_slice(hole);
        cards.extend_from_slice(board);
        let (class, kickers) = strength(&cards);
        HandScore::pack(class, kickers)
    }
}

fn strength(cards: &[Card]) -> (HandClass, [u8; 5]) {
    let mut rank_counts = [0u8; 15]; // 2..14 used
    let mut suit_counts = [0u8; 4];
    let mut rank_mask: u16 = 0;
    let mut by_suit_mask: [u16; 4] = [0; 4];
    let mut by_suit: [Vec<u8>; 4] = [vec![], vec![], vec![], vec![]];
    for &c in cards {
        let r = c.rank as u8;
        let s = suit_index(c.suit);
        rank_counts[r as usize] += 1;
        suit_counts[s] += 1;
        rank_mask |= 1 << r;
        by_suit_mask[s] |= 1 << r;
        by_suit[s].push(r);
    }

    let flush_suit = (0..4).find(|&s| suit_counts[s] >= 5);

    if let Some(s) = flush_suit {
        if let Some(high) = straight_high_from_mask(by_suit_mask[s]) {
            return (HandClass::StraightFlush, [high, 0, 0, 0, 0]);
        }
    }

    if let Some((quad, kicker)) = detect_quads(&rank_counts) {
        return (HandClass::FourOfAKind, [quad, kicker, 0, 0, 0]);
    }

    if let Some((trip, pair)) = detect_full_house(&rank_counts) {
        return (HandClass::FullHouse, [trip, pair, 0, 0, 0]);
    }

    if let Some(s) = flush_suit {
        let mut ranks = by_suit[s].clone();
        ranks.sort_unstable_by(|a, b| b.cmp(a));
        let mut k = [0u8; 5];
        k.copy_from_slice(&ranks[..5]);
        return (HandClass::Flush, k);
    }

    if let Some(high) = straight_high_from_mask(rank_mask) {
        return (HandClass::Straight, [high, 0, 0, 0, 0]);
    }

    let (trip_ranks, pair_ranks, singles) = classify_multiples(&rank_counts);
    if let Some(t) = trip_ranks.first().copied() {
        // trips + two highest kickers
        let mut remain: Vec<u8> = pair_ranks.iter().chain(singles.iter()).copied().collect();
        remain.sort_unstable_by(|a, b| b.cmp(a));
        let mut k = [t, 0, 0, 0, 0];
        k[1] = remain.first().copied().unwrap_or(0);
        k[2] = remain.get(1).copied().unwrap_or(0);
        return (HandClass::ThreeOfAKind, k);
    }
    if pair_ranks.len() >= 2 {
        // pair ranks are collected high -> low already
        let high = pair_ranks[0];
        let low = pair_ranks[1];
        let mut rest: Vec<u8> = pair_ranks[2..].iter().chain(singles.iter()).copied().collect();
        rest.sort_unstable_by(|a, b| b.cmp(a));
        let mut k = [high, low, 0, 0, 0];
        k[2] = rest.first().copied().unwrap_or(0);
        return (HandClass::TwoPair, k);
    }
    if let Some(p) = pair_ranks.first().copied() {
        let mut rest = singles.clone();
        rest.sort_unstable_by(|a, b| b.cmp(a));
        let mut k = [p, 0, 0, 0, 0];
        for i in 0..3 {
            k[i + 1] = rest.get(i).copied().unwrap_or(0);
        }
        return (HandClass::OnePair, k);
    }

    let mut highs = singles;
    highs.sort_unstable_by(|a, b| b.cmp(a));
    let mut k = [0u8; 5];
    for (i, slot) in k.iter_mut().enumerate() {
        *slot = highs.get(i).copied().unwrap_or(0);
    }
    (HandClass::HighCard, k)
}

fn suit_index(s: Suit) -> usize {
    match s {
        Suit::Clubs => 0,
        Suit::Diamonds => 1,
        Suit::Hearts => 2,
        Suit::Spades => 3,
    }
}

fn straight_high_from_mask(mask: u16) -> Option<u8> {
    let mut m = mask;
    // Ace also plays low
    if (m & (1 << 14)) != 0 {
        m |= 1 << 1;
    }
    for high in (5..=14u8).rev() {
        let window = 0b11111u16 << (high - 4);
        if (m & window) == window {
            return Some(high);
        }
    }
    None
}

fn detect_quads(rank_counts: &[u8; 15]) -> Option<(u8, u8)> {
    let quad = (2..=14u8).rev().find(|&r| rank_counts[r as usize] == 4)?;
    let kicker = (2..=14u8)
        .rev()
        .find(|&r| r != quad && rank_counts[r as usize] > 0)
        .unwrap_or(0);
    Some((quad, kicker))
}

fn detect_full_house(rank_counts: &[u8; 15]) -> Option<(u8, u8)> {
    let mut trips: Vec<u8> = vec![];
    let mut pairs: Vec<u8> = vec![];
    for r in (2..=14u8).rev() {
        match rank_counts[r as usize] {
            3 => trips.push(r),
            2 => pairs.push(r),
            _ => {}
        }
    }
    match (trips.first(), trips.get(1), pairs.first()) {
        (Some(&t), Some(&second_trips), pair) => {
            // two sets of trips: the lower one fills the pair slot
            let p = pair.map_or(second_trips, |&p| p.max(second_trips));
            Some((t, p))
        }
        (Some(&t), None, Some(&p)) => Some((t, p)),
        _ => None,
    }
}

// returns (trips, pairs, singles), each high -> low
fn classify_multiples(rank_counts: &[u8; 15]) -> (Vec<u8>, Vec<u8>, Vec<u8>) {
    let mut trips = vec![];
    let mut pairs = vec![];
    let mut singles = vec![];
    for r in (2..=14u8).rev() {
        match rank_counts[r as usize] {
            3 => trips.push(r),
            2 => pairs.push(r),
            1 => singles.push(r),
            _ => {}
        }
    }
    (trips, pairs, singles)
}

/// Reference evaluator for cross-checking: scores every 5-card subset
/// directly and keeps the best. Slow, but independent of the counting
/// logic above.
#[derive(Debug, Default, Clone, Copy)]
pub struct NaiveEvaluator;

impl HandEvaluator for NaiveEvaluator {
    fn evaluate(&self, hole: &[Card; 2], board: &[Card]) -> HandScore {
        let mut cards: Vec<Card> = Vec::with_capacity(7);
        cards.extend_from_slice(hole);
        cards.extend_from_slice(board);
        if cards.len() < 5 {
            let (class, kickers) = strength(&cards);
            return HandScore::pack(class, kickers);
        }
        let mut best: Option<HandScore> = None;
        let n = cards.len();
        for a in 0..n {
            for b in a + 1..n {
                for c in b + 1..n {
                    for d in c + 1..n {
                        for e in d + 1..n {
                            let five = [cards[a], cards[b], cards[c], cards[d], cards[e]];
                            let (class, kickers) = score_five(&five);
                            let score = HandScore::pack(class, kickers);
                            if best.is_none_or(|s| score < s) {
                                best = Some(score);
                            }
                        }
                    }
                }
            }
        }
        best.expect("at least one 5-card subset")
    }
}

fn score_five(cards: &[Card; 5]) -> (HandClass, [u8; 5]) {
    let mut ranks: Vec<u8> = cards.iter().map(|c| c.rank as u8).collect();
    ranks.sort_unstable_by(|a, b| b.cmp(a));
    let flush = cards.iter().all(|c| c.suit == cards[0].suit);

    let distinct = {
        let mut d = ranks.clone();
        d.dedup();
        d
    };
    let straight_high = if distinct.len() == 5 {
        if ranks[0] - ranks[4] == 4 {
            Some(ranks[0])
        } else if ranks == [14, 5, 4, 3, 2] {
            Some(5) // wheel
        } else {
            None
        }
    } else {
        None
    };

    if let Some(high) = straight_high {
        let class = if flush {
            HandClass::StraightFlush
        } else {
            HandClass::Straight
        };
        return (class, [high, 0, 0, 0, 0]);
    }
    if flush {
        let mut k = [0u8; 5];
        k.copy_from_slice(&ranks);
        return (HandClass::Flush, k);
    }

    // group (count, rank) pairs, highest count first, then rank
    let mut groups: Vec<(u8, u8)> = vec![];
    for &r in &distinct {
        let count = ranks.iter().filter(|&&x| x == r).count() as u8;
        groups.push((count, r));
    }
    groups.sort_unstable_by(|a, b| b.cmp(a));

    let mut k = [0u8; 5];
    for (i, &(_, r)) in groups.iter().enumerate().take(5) {
        k[i] = r;
    }
    let class = match (groups[0].0, groups.get(1).map(|g| g.0)) {
        (4, _) => HandClass::FourOfAKind,
        (3, Some(2)) => HandClass::FullHouse,
        (3, _) => HandClass::ThreeOfAKind,
        (2, Some(2)) => HandClass::TwoPair,
        (2, _) => HandClass::OnePair,
        _ => HandClass::HighCard,
    };
    (class, k)
}
