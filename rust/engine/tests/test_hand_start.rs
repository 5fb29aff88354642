use headsup_engine::engine::{Engine, MatchConfig, Stage};
use headsup_engine::player::PlayerAction;

fn config(chips: u32) -> MatchConfig {
    MatchConfig {
        starting_chips: chips,
        ..MatchConfig::default()
    }
}

#[test]
fn blinds_posted_and_small_blind_acts_first() {
    let mut eng = Engine::new(Some(1));
    eng.start_hand().expect("deal ok");

    // the dealer alternates before dealing, so the first hand's dealer
    // is seat 1, who posts the small blind
    assert_eq!(eng.dealer(), 1);
    assert_eq!(eng.turn(), 1);
    assert_eq!(eng.stage(), Stage::Preflop);
    assert_eq!(eng.players()[1].bet(), 500);
    assert_eq!(eng.players()[0].bet(), 1_000);
    assert_eq!(eng.current_bet(), 1_000);
    assert_eq!(eng.total_pot(), 1_500);
    assert!(eng
        .players()
        .iter()
        .all(|p| p.hole_cards().is_some()));
}

#[test]
fn dealer_alternates_every_hand() {
    let mut eng = Engine::new(Some(2));
    eng.start_hand().expect("deal ok");
    assert_eq!(eng.dealer(), 1);
    let sb = eng.turn();
    // sb folds: the next hand starts automatically with the button moved
    eng.apply_action(sb, PlayerAction::Fold).expect("legal");
    assert_eq!(eng.stage(), Stage::Preflop);
    assert_eq!(eng.hands_played(), 2);
    assert_eq!(eng.dealer(), 0);
    assert_eq!(eng.turn(), 0);
}

#[test]
fn short_stack_posts_partial_blind_all_in() {
    let mut eng = Engine::with_config(config(300), Some(3));
    eng.start_hand().expect("deal ok");

    // both stacks are below the blinds: sb posts 300 of 500, bb 300 of 1000
    assert_eq!(eng.players()[1].bet(), 300);
    assert_eq!(eng.players()[1].chips(), 0);
    assert_eq!(eng.players()[0].bet(), 300);
    assert_eq!(eng.players()[0].chips(), 0);
    assert_eq!(eng.current_bet(), 300);
}

#[test]
fn hole_cards_are_distinct_across_seats() {
    let mut eng = Engine::new(Some(4));
    eng.start_hand().expect("deal ok");
    let h0 = eng.players()[0].hole_cards().unwrap();
    let h1 = eng.players()[1].hole_cards().unwrap();
    let mut all = vec![h0[0], h0[1], h1[0], h1[1]];
    all.sort();
    all.dedup();
    assert_eq!(all.len(), 4);
}

#[test]
fn start_hand_is_noop_after_game_over() {
    // equal micro stacks: the blinds put both players all-in and the
    // runout resolves the match within a hand or two
    let mut eng = Engine::with_config(config(500), Some(5));
    eng.start_hand().expect("deal ok");
    let mut guard = 0;
    while eng.stage().is_betting() && guard < 32 {
        let t = eng.turn();
        eng.apply_action(t, PlayerAction::Call).expect("legal");
        guard += 1;
    }
    if eng.stage() == Stage::GameOver {
        let chips_before: Vec<u32> = eng.players().iter().map(|p| p.chips()).collect();
        eng.start_hand().expect("noop");
        assert_eq!(eng.stage(), Stage::GameOver);
        let chips_after: Vec<u32> = eng.players().iter().map(|p| p.chips()).collect();
        assert_eq!(chips_before, chips_after);
    }
}
