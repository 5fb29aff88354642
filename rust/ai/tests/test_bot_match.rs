use headsup_ai::bot::EquityBot;
use headsup_ai::{run_bot_turns, Opponent};
use headsup_engine::engine::{Engine, Stage};

fn table_total(eng: &Engine) -> u32 {
    let players: u32 = eng.players().iter().map(|p| p.chips() + p.bet()).sum();
    players + eng.pot()
}

#[test]
fn bot_vs_bot_match_conserves_chips_and_stays_legal() {
    let mut eng = Engine::new(Some(7));
    let mut bots = [
        EquityBot::with_iterations(1, 60),
        EquityBot::with_iterations(2, 60),
    ];
    eng.start_hand().expect("deal ok");

    let mut steps = 0;
    while eng.stage().is_betting() && eng.hands_played() < 40 && steps < 4_000 {
        let seat = eng.turn();
        let action = bots[seat].act(&eng, seat);
        // the policy only emits actions that are legal right now
        let applied = eng.apply_action(seat, action).expect("engine ok");
        assert!(applied, "bot produced a dropped action: {:?}", action);
        assert_eq!(table_total(&eng), 100_000);
        steps += 1;
    }
    assert!(
        eng.stage() == Stage::GameOver || eng.hands_played() >= 40,
        "match stalled after {} steps at stage {:?}",
        steps,
        eng.stage()
    );
    if eng.stage() == Stage::GameOver {
        assert!(eng.players().iter().any(|p| p.chips() == 0));
    }
}

#[test]
fn driver_runs_the_bot_until_a_human_is_up() {
    let mut eng = Engine::new(Some(8));
    let mut bot = EquityBot::with_iterations(3, 60);
    eng.start_hand().expect("deal ok");

    run_bot_turns(&mut eng, &mut bot, 1).expect("engine ok");
    if eng.stage().is_betting() {
        assert_eq!(eng.turn(), 0);
    }
    // whatever happened, nothing leaked out of the table
    assert_eq!(table_total(&eng), 100_000);
}

#[test]
fn same_seed_replays_the_same_decision() {
    let mut eng_a = Engine::new(Some(9));
    let mut eng_b = Engine::new(Some(9));
    eng_a.start_hand().expect("deal ok");
    eng_b.start_hand().expect("deal ok");

    let mut bot_a = EquityBot::with_iterations(4, 120);
    let mut bot_b = EquityBot::with_iterations(4, 120);
    let seat = eng_a.turn();
    assert_eq!(bot_a.act(&eng_a, seat), bot_b.act(&eng_b, seat));
}
