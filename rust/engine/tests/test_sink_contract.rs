use std::sync::{Arc, Mutex};

use headsup_engine::engine::{Engine, Stage};
use headsup_engine::player::PlayerAction;
use headsup_engine::sink::{Sink, Snapshot};

#[derive(Default)]
struct CollectSink(Arc<Mutex<Vec<Snapshot>>>);

impl Sink for CollectSink {
    fn publish(&mut self, snapshot: &Snapshot) {
        self.0.lock().unwrap().push(snapshot.clone());
    }
}

#[test]
fn engine_publishes_after_every_state_change() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let mut eng = Engine::new(Some(51));
    eng.set_sink(Box::new(CollectSink(seen.clone())));

    eng.start_hand().expect("deal ok");
    assert_eq!(seen.lock().unwrap().len(), 1);
    let first = seen.lock().unwrap().last().cloned().unwrap();
    assert_eq!(first.pot, 1_500);
    assert_eq!(first.stage, Stage::Preflop);
    assert_eq!(first.to_act, Some(1));

    let sb = eng.turn();
    eng.apply_action(sb, PlayerAction::Call).expect("legal");
    assert_eq!(seen.lock().unwrap().len(), 2);

    // a dropped input publishes nothing
    eng.apply_action(sb, PlayerAction::Check).expect("ok");
    assert_eq!(seen.lock().unwrap().len(), 2);

    eng.apply_action(sb ^ 1, PlayerAction::Check).expect("legal");
    let snap = seen.lock().unwrap().last().cloned().unwrap();
    assert_eq!(snap.stage, Stage::Flop);
    assert_eq!(snap.board.len(), 3);
    assert_eq!(snap.to_act, Some(eng.dealer() ^ 1));
}

#[test]
fn snapshot_log_is_bounded() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let mut eng = Engine::new(Some(52));
    eng.set_sink(Box::new(CollectSink(seen.clone())));
    eng.start_hand().expect("deal ok");

    // keep folding hands; the rolling log must stay under its cap
    for _ in 0..60 {
        if !eng.stage().is_betting() {
            break;
        }
        let t = eng.turn();
        eng.apply_action(t, PlayerAction::Fold).expect("legal");
        let snap = seen.lock().unwrap().last().cloned().unwrap();
        let joined: usize = snap.log.iter().map(|l| l.chars().count()).sum();
        assert!(joined <= 1_100, "log grew to {} chars", joined);
    }
}

#[test]
fn snapshot_hides_hole_cards() {
    let mut eng = Engine::new(Some(53));
    eng.start_hand().expect("deal ok");
    let snap = eng.snapshot();
    // a snapshot exposes only public seat state
    for (view, player) in snap.players.iter().zip(eng.players()) {
        assert_eq!(view.name, player.name());
        assert_eq!(view.chips, player.chips());
        assert_eq!(view.bet, player.bet());
    }
    let json = serde_json::to_string(&snap).expect("serializable");
    assert!(json.contains("\"pot\""));
}
