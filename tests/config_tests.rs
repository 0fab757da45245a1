use std::collections::HashMap;

use polyreport::{
    ReportConfig, ReportError,
    config::{MARGIN_ENV, PRECISION_ENV},
};

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn test_defaults_match_published_reports() {
    let config = ReportConfig::from_lookup(lookup(&[])).unwrap();
    assert_eq!(config, ReportConfig::default());
    assert_eq!(config.margin, 1.2);
    assert_eq!(config.precision, 2);
    assert_eq!(config.improvement_symbol, "\\texttimes");
}

#[test]
fn test_env_overrides_margin_and_precision() {
    let config =
        ReportConfig::from_lookup(lookup(&[(MARGIN_ENV, " 1.5 "), (PRECISION_ENV, "3")])).unwrap();
    assert_eq!(config.margin, 1.5);
    assert_eq!(config.precision, 3);
    let opts = config.compare_options(64.0);
    assert_eq!(opts.margin, 1.5);
    assert_eq!(opts.min_independent_value, 64.0);
}

#[test]
fn test_invalid_margin_is_rejected() {
    for raw in ["abc", "0", "-2"] {
        let err = ReportConfig::from_lookup(lookup(&[(MARGIN_ENV, raw)])).unwrap_err();
        assert!(matches!(err, ReportError::InvalidInput(_)), "{raw}");
    }
}

#[test]
fn test_config_serializes_to_json() {
    let json = serde_json::to_value(ReportConfig::default()).unwrap();
    assert_eq!(json["margin"], 1.2);
    assert_eq!(json["precision"], 2);
}
