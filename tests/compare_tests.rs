use polyreport::{
    CompareOptions, Measurement, ReportError, Series,
    bench_utils::generate_crossing_pair,
    compare::{compare, compare_all, first_crossing, format_ratio, ratio_series, sustained_from},
};

const NS: [f64; 4] = [16.0, 32.0, 64.0, 128.0];

fn series(label: &str, values: &[f64]) -> Series {
    Series::from_values(label, &NS, values).unwrap()
}

fn opts() -> CompareOptions {
    CompareOptions {
        margin: 1.2,
        min_independent_value: 16.0,
    }
}

#[test]
fn test_compare_end_to_end_scenario() {
    let a = series("A", &[100.0, 100.0, 100.0, 100.0]);
    let b = series("B", &[90.0, 150.0, 200.0, 300.0]);
    let cmp = compare(&a, &b, &opts()).unwrap();

    assert_eq!(cmp.winner, "A");
    assert_eq!(cmp.loser, "B");
    assert!(!cmp.swapped);
    let rounded: Vec<Option<f64>> = cmp.ratios.iter().map(|p| p.rounded()).collect();
    assert_eq!(rounded, vec![Some(0.9), Some(1.5), Some(2.0), Some(3.0)]);
    let crossing = cmp.first_crossing.unwrap();
    assert_eq!(crossing.key, 32.0);
    assert_eq!(crossing.ratio, 1.5);
    assert_eq!(cmp.sustained_from.unwrap().key, 32.0);
}

#[test]
fn test_compare_ratio_ladder_covers_every_point() {
    let a = series("A", &[1.0, 2.0, 3.0, 4.0]);
    let b = series("B", &[4.0, 3.0, 2.0, 1.0]);
    let cmp = compare(&a, &b, &opts()).unwrap();
    assert_eq!(cmp.ratios.len(), NS.len());
    let keys: Vec<f64> = cmp.ratios.iter().map(|p| p.key).collect();
    assert_eq!(keys, NS.to_vec());
}

#[test]
fn test_compare_swaps_when_second_is_smaller() {
    let a = series("slow", &[200.0, 300.0, 400.0, 500.0]);
    let b = series("fast", &[100.0, 100.0, 100.0, 100.0]);
    let cmp = compare(&a, &b, &opts()).unwrap();
    assert_eq!(cmp.winner, "fast");
    assert_eq!(cmp.loser, "slow");
    assert!(cmp.swapped);

    let reversed = compare(&b, &a, &opts()).unwrap();
    assert_eq!(reversed.winner, "fast");
    assert!(!reversed.swapped);
    assert_eq!(reversed.ratios, cmp.ratios);
}

#[test]
fn test_compare_equal_sums_keep_first_as_winner() {
    let a = series("A", &[10.0, 20.0, 30.0, 40.0]);
    let b = series("B", &[40.0, 30.0, 20.0, 10.0]);
    let cmp = compare(&a, &b, &opts()).unwrap();
    assert_eq!(cmp.winner, "A");
    assert!(!cmp.swapped);
}

#[test]
fn test_compare_reports_absent_threshold() {
    let a = series("A", &[100.0, 100.0, 100.0, 100.0]);
    let b = series("B", &[110.0, 115.0, 119.0, 120.0]);
    let cmp = compare(&a, &b, &opts()).unwrap();
    assert!(!cmp.has_crossover());
    assert_eq!(cmp.first_crossing, None);
    assert_eq!(cmp.sustained_from, None);
    assert!(cmp.summary().contains("never beats"));
}

#[test]
fn test_compare_ignores_points_at_or_below_minimum() {
    let a = series("A", &[100.0, 100.0, 100.0, 100.0]);
    let b = series("B", &[500.0, 110.0, 110.0, 110.0]);
    let cmp = compare(&a, &b, &opts()).unwrap();
    // n = 16 has ratio 5.0 but is not past the minimum
    assert_eq!(cmp.first_crossing, None);
}

#[test]
fn test_first_crossing_and_sustained_from_differ_on_regression() {
    let a = series("A", &[100.0, 100.0, 100.0, 100.0]);
    let b = series("B", &[100.0, 150.0, 110.0, 300.0]);
    let cmp = compare(&a, &b, &opts()).unwrap();
    assert_eq!(cmp.first_crossing.unwrap().key, 32.0);
    assert_eq!(cmp.sustained_from.unwrap().key, 128.0);
}

#[test]
fn test_unmeasured_points_are_skipped() {
    let a = Series::new(
        "A",
        vec![
            (16.0, Measurement::Value(100.0)),
            (32.0, Measurement::Unmeasured),
            (64.0, Measurement::Value(100.0)),
            (128.0, Measurement::Value(100.0)),
        ],
    )
    .unwrap();
    let b = series("B", &[100.0, 1_000.0, 200.0, 300.0]);
    let cmp = compare(&a, &b, &opts()).unwrap();
    assert_eq!(cmp.ratios[1].ratio, None);
    assert_eq!(cmp.ratios[1].display("x"), None);
    assert_eq!(cmp.first_crossing.unwrap().key, 64.0);
    assert_eq!(cmp.sustained_from.unwrap().key, 64.0);
}

#[test]
fn test_zero_cost_winner_is_infinitely_ahead() {
    let keys = [16.0, 32.0, 64.0];
    let a = Series::from_values("A", &keys, &[0.0, 0.0, 0.0]).unwrap();
    let b = Series::from_values("B", &keys, &[5.0, 10.0, 20.0]).unwrap();
    let cmp = compare(&a, &b, &CompareOptions::default()).unwrap();

    assert_eq!(cmp.winner, "A");
    assert!(cmp.ratios.iter().all(|p| p.ratio == Some(f64::INFINITY)));
    let crossing = cmp.first_crossing.unwrap();
    assert_eq!(crossing.key, 32.0);
    assert_eq!(cmp.sustained_from.unwrap().key, 32.0);
    assert_eq!(cmp.ratios[1].display("x").as_deref(), Some("infx"));

    let json = serde_json::to_value(&cmp).unwrap();
    assert_eq!(json["ratios"][0]["ratio"], "inf");
    assert_eq!(json["first_crossing"]["ratio"], "inf");
}

#[test]
fn test_zero_over_zero_has_no_ratio() {
    let keys = [16.0, 32.0];
    let a = Series::from_values("A", &keys, &[0.0, 1.0]).unwrap();
    let b = Series::from_values("B", &keys, &[0.0, 2.0]).unwrap();
    let cmp = compare(&a, &b, &opts()).unwrap();
    assert_eq!(cmp.ratios[0].ratio, None);
    assert_eq!(cmp.ratios[1].ratio, Some(2.0));

    let json = serde_json::to_value(&cmp).unwrap();
    assert!(json["ratios"][0]["ratio"].is_null());
    assert_eq!(json["ratios"][1]["ratio"], 2.0);
}

#[test]
fn test_misaligned_series_are_rejected() {
    let a = series("A", &[1.0, 2.0, 3.0, 4.0]);
    let b = Series::from_values("B", &[16.0, 32.0, 64.0], &[1.0, 2.0, 3.0]).unwrap();
    let err = compare(&a, &b, &opts()).unwrap_err();
    assert!(matches!(err, ReportError::MisalignedSeries { .. }));

    let c = Series::from_values("C", &[16.0, 32.0, 64.0, 256.0], &[1.0, 2.0, 3.0, 4.0]).unwrap();
    let err = compare(&a, &c, &opts()).unwrap_err();
    assert!(matches!(err, ReportError::MisalignedSeries { .. }));
}

#[test]
fn test_self_comparison_is_an_invariant_error() {
    let a = series("A", &[1.0, 2.0, 3.0, 4.0]);
    let err = compare(&a, &a, &opts()).unwrap_err();
    assert!(matches!(err, ReportError::Invariant(_)));
}

#[test]
fn test_compare_all_visits_each_pair_once() {
    let all = vec![
        series("A", &[1.0, 1.0, 1.0, 1.0]),
        series("B", &[2.0, 2.0, 2.0, 2.0]),
        series("C", &[3.0, 3.0, 3.0, 3.0]),
    ];
    let cmps = compare_all(&all, &opts()).unwrap();
    let pairs: Vec<(&str, &str)> = cmps
        .iter()
        .map(|c| (c.winner.as_str(), c.loser.as_str()))
        .collect();
    assert_eq!(pairs, vec![("A", "B"), ("A", "C"), ("B", "C")]);
}

#[test]
fn test_ratio_series_keeps_direction() {
    let naive = series("naive", &[10.0, 40.0, 160.0, 640.0]);
    let fast = series("fast", &[20.0, 20.0, 20.0, 20.0]);
    let ratios = ratio_series(&naive, &fast).unwrap();
    let rounded: Vec<Option<f64>> = ratios.iter().map(|p| p.rounded()).collect();
    assert_eq!(rounded, vec![Some(0.5), Some(2.0), Some(8.0), Some(32.0)]);
    let crossing = first_crossing(&ratios, &opts().with_min(32.0)).unwrap();
    assert_eq!(crossing.key, 64.0);
    assert_eq!(sustained_from(&ratios, &opts()).unwrap().key, 32.0);
}

#[test]
fn test_ratio_display_matches_float_repr() {
    assert_eq!(format_ratio(2.0), "2.0");
    assert_eq!(format_ratio(1.5), "1.5");
    assert_eq!(format_ratio(1.23), "1.23");
    assert_eq!(format_ratio(f64::INFINITY), "inf");
}

#[test]
fn test_synthetic_pair_crosses_over() {
    let (baseline, contender) = generate_crossing_pair(12, 7).unwrap();
    let cmp = compare(&baseline, &contender, &CompareOptions::default()).unwrap();
    assert_eq!(cmp.winner, "amt");
    assert!(cmp.swapped);
    let crossing = cmp.first_crossing.unwrap();
    assert!(crossing.key > 16.0);
    assert!(cmp.sustained_from.is_some());
}
