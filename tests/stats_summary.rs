use usmap_rs::stats::summarize;
use usmap_rs::{MapPlotter, RawTable, ValidatedEntry};

fn entry(code: &str, name: &str, value: f64) -> ValidatedEntry {
    ValidatedEntry {
        code: code.into(),
        name: name.into(),
        value,
    }
}

#[test]
fn summary_of_three_states() {
    let s = summarize(&[
        entry("CA", "California", 100.0),
        entry("TX", "Texas", 200.0),
        entry("NY", "New York", 300.0),
    ]);
    assert_eq!(s.count, 3);
    assert_eq!(s.mean, Some(200.0));
    assert_eq!(s.median, Some(200.0));
    assert_eq!(s.min, Some(100.0));
    assert_eq!(s.max, Some(300.0));
    assert!((s.std - 100.0).abs() < 1e-9);
    assert_eq!(s.total_states, 51);
    assert_eq!(s.missing_states.len(), 48);
    assert!(!s.missing_states.contains("CA"));
}

#[test]
fn statistics_follow_the_loaded_entries() {
    let t = RawTable::from_pairs("st", "n", &[("WA", 1.0), ("OR", 3.0), ("XX", 1000.0)]);
    let p = MapPlotter::from_table(&t).unwrap();
    let s = p.statistics();
    assert_eq!(s.count, 2);
    assert_eq!(s.mean, Some(2.0));
    assert!((s.coverage() - 2.0 / 51.0).abs() < 1e-12);
}
