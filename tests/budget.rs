//! Budget calculator tests.

use subreflow::{
    SizeMetric, SourceBlock,
    budget::{assign_capacities, capacity, expansion_factor, fair_share},
};

fn block(timestamp: &str, text: &str) -> SourceBlock {
    SourceBlock::new(timestamp, timestamp, vec![text.to_string()])
}

// ── Expansion factor ───────────────────────────────────────────────

#[test]
fn factor_by_characters() {
    let sources = vec![block("1", "abcd"), block("2", "abcdef")];
    let translations = vec!["abcdefghijklmno".to_string()];

    let factor = expansion_factor(&sources, &translations, SizeMetric::Characters);

    assert!((factor - 1.5).abs() < f64::EPSILON, "Expected 1.5, got {factor}");
}

#[test]
fn factor_by_words() {
    let sources = vec![block("1", "one two"), block("2", "three four five six")];
    let translations = vec!["a b", "c"];

    let factor = expansion_factor(&sources, &translations, SizeMetric::Words);

    assert!((factor - 0.5).abs() < f64::EPSILON, "Expected 0.5, got {factor}");
}

#[test]
fn factor_with_empty_source_is_neutral() {
    let sources = vec![SourceBlock::new("1", "1", Vec::new())];
    let translations = vec!["anything"];

    let factor = expansion_factor(&sources, &translations, SizeMetric::Characters);

    assert_eq!(factor, 1.0);
}

#[test]
fn characters_count_unicode_scalars() {
    assert_eq!(SizeMetric::Characters.measure("déjà vu"), 7);
    assert_eq!(SizeMetric::Words.measure("  déjà   vu "), 2);
}

// ── Capacities ─────────────────────────────────────────────────────

#[test]
fn capacities_round_up() {
    let sources = vec![block("1", "abcd"), block("2", "abcdef")];

    let targets = assign_capacities(&sources, 1.5, SizeMetric::Characters);

    assert_eq!(targets.len(), 2);
    assert_eq!(targets[0].capacity, 6);
    assert_eq!(targets[1].capacity, 9);
    assert_eq!(capacity(&block("3", "abc"), 1.1, SizeMetric::Characters), 4);
}

#[test]
fn capacities_by_words() {
    let sources = vec![block("1", "one two"), block("2", "three four five six")];

    let targets = assign_capacities(&sources, 0.5, SizeMetric::Words);

    assert_eq!(targets[0].capacity, 1);
    assert_eq!(targets[1].capacity, 2);
}

#[test]
fn targets_copy_label_and_timestamp() {
    let sources = vec![SourceBlock::new(
        "7",
        "00:00:01,000 --> 00:00:02,000",
        vec!["Hallo".to_string()],
    )];

    let targets = assign_capacities(&sources, 1.0, SizeMetric::Characters);

    assert_eq!(targets[0].index, "7");
    assert_eq!(targets[0].timestamp, sources[0].timestamp);
    assert!(targets[0].lines.is_empty());
}

// ── Fair share ─────────────────────────────────────────────────────

#[test]
fn fair_share_spreads_capacity_over_lines() {
    assert_eq!(fair_share(10, 2), 5.0);
    assert_eq!(fair_share(7, 2), 3.5);
}

#[test]
fn fair_share_with_zero_lines_uses_whole_capacity() {
    assert_eq!(fair_share(10, 0), 10.0);
}
