//! Configuration and option-resolution tests.

use subreflow::{Formality, ReflowError, ReflowOptions, SizeMetric, SourceBlock};

fn blocks() -> Vec<SourceBlock> {
    vec![
        SourceBlock::new("1", "00:00:01,000", vec!["Kort".to_string()]),
        SourceBlock::new(
            "2",
            "00:00:02,000",
            vec!["Een wat langere regel".to_string(), "en nog een".to_string()],
        ),
    ]
}

#[test]
fn default_options() {
    let options = ReflowOptions::new();

    assert_eq!(options.source_language(), "NL");
    assert_eq!(options.target_language(), "FR");
    assert_eq!(options.metric(), SizeMetric::Characters);

    let debug = format!("{options:?}");
    assert!(debug.contains("ReflowOptions"));
    assert!(debug.contains("Default"), "Formality should show: {debug}");
}

#[test]
fn language_codes_are_uppercased() {
    let options = ReflowOptions::new()
        .with_source_language("en")
        .with_target_language("pt-br");

    assert_eq!(options.source_language(), "EN");
    assert_eq!(options.target_language(), "PT-BR");
}

#[test]
fn limits_default_to_source_maximum() {
    let limits = ReflowOptions::new()
        .resolve_limits(&blocks())
        .expect("Failed to resolve limits");

    assert_eq!(limits.max_lines, 2);
    assert_eq!(limits.max_line_length, 21);
    assert_eq!(limits.metric, SizeMetric::Characters);
}

#[test]
fn explicit_limits_win() {
    let limits = ReflowOptions::new()
        .with_max_lines(3)
        .with_max_line_length(42)
        .with_metric(SizeMetric::Words)
        .resolve_limits(&blocks())
        .expect("Failed to resolve limits");

    assert_eq!(limits.max_lines, 3);
    assert_eq!(limits.max_line_length, 42);
    assert_eq!(limits.metric, SizeMetric::Words);
}

#[test]
fn zero_limits_are_rejected() {
    let lines = ReflowOptions::new().with_max_lines(0).resolve_limits(&blocks());
    assert!(matches!(lines, Err(ReflowError::InvalidConfiguration(_))));

    let length = ReflowOptions::new()
        .with_max_line_length(0)
        .resolve_limits(&blocks());
    assert!(matches!(length, Err(ReflowError::InvalidConfiguration(_))));
}

#[test]
fn unset_limits_need_source_blocks() {
    let result = ReflowOptions::new().resolve_limits(&[]);

    assert!(matches!(result, Err(ReflowError::InvalidConfiguration(_))));

    let explicit = ReflowOptions::new()
        .with_max_lines(2)
        .with_max_line_length(40)
        .resolve_limits(&[]);
    assert!(explicit.is_ok());
}

#[test]
fn formality_parameters() {
    assert_eq!(Formality::default(), Formality::Default);
    assert_eq!(Formality::Default.as_parameter(), "default");
    assert_eq!(Formality::More.as_parameter(), "prefer_more");
    assert_eq!(Formality::Less.as_parameter(), "prefer_less");
    assert_eq!(Formality::More.to_string(), "more");
}
