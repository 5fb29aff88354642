use headsup_cli::handle_sim;
use headsup_engine::logger::HandRecord;

#[test]
fn sim_reports_stacks_and_completed_hands() {
    let mut out = Vec::new();
    handle_sim(5, Some(11), None, &mut out).expect("sim ok");
    let text = String::from_utf8(out).expect("utf8");
    assert!(text.contains("sim: hands=5 seed=11"));
    assert!(text.contains("hands completed:"));
    assert!(text.contains("Bot A:"));
    assert!(text.contains("Bot B:"));
}

#[test]
fn sim_rejects_zero_hands() {
    let mut out = Vec::new();
    let err = handle_sim(0, Some(1), None, &mut out).unwrap_err();
    assert!(err.to_string().contains("hands must be >= 1"));
}

#[test]
fn sim_writes_parseable_jsonl_history() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("history.jsonl");
    let mut out = Vec::new();
    handle_sim(3, Some(12), Some(&path), &mut out).expect("sim ok");

    let text = std::fs::read_to_string(&path).expect("history file");
    let mut count = 0;
    for line in text.lines() {
        let record: HandRecord = serde_json::from_str(line).expect("valid record");
        assert!(record.hand_id.starts_with("H-"));
        assert_eq!(record.seed, Some(12));
        assert!(record.ts.is_some());
        assert!(!record.actions.is_empty());
        count += 1;
    }
    assert!(count >= 1);
}
