use super::helpers::test_config;
use crate::Engine;

#[test]
fn stat_reports_zero_counts_on_fresh_engine() {
    let (config, _dir) = test_config();
    let engine = Engine::new(config).unwrap();

    let stat = engine.stat();
    assert_eq!(stat.key_count, 0);
    assert_eq!(stat.set_count, 0);
    assert_eq!(stat.get_count, 0);
    assert_eq!(stat.getprefix_count, 0);
    assert_eq!(stat.total_requests, 0);
    assert!(!stat.server_start_time.is_empty());
}

#[test]
fn stat_server_start_time_is_stable_across_calls() {
    let (config, _dir) = test_config();
    let engine = Engine::new(config).unwrap();

    let first = engine.stat().server_start_time;
    engine.set(b"k", b"v").unwrap();
    let second = engine.stat().server_start_time;
    assert_eq!(first, second);
}

#[test]
fn stat_counts_all_operation_kinds_independently() {
    let (config, _dir) = test_config();
    let engine = Engine::new(config).unwrap();

    engine.set(b"a", b"1").unwrap();
    engine.set(b"b", b"2").unwrap();
    engine.get(b"a").unwrap();
    engine.get_prefix(b"", 0);
    engine.get_prefix(b"", 0);
    engine.get_prefix(b"", 0);

    let stat = engine.stat();
    assert_eq!(stat.set_count, 2);
    assert_eq!(stat.get_count, 1);
    assert_eq!(stat.getprefix_count, 3);
    assert_eq!(stat.total_requests, 6);
    assert_eq!(stat.key_count, 2);
}

#[test]
fn stat_does_not_itself_advance_any_counter() {
    let (config, _dir) = test_config();
    let engine = Engine::new(config).unwrap();

    engine.set(b"a", b"1").unwrap();
    let before = engine.stat();
    let after = engine.stat();
    assert_eq!(before, after);
}
