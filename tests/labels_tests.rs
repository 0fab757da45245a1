use polyreport::LabelMap;

#[test]
fn test_lookup_is_single_pass() {
    // chained entries must not cascade: feld -> jf, never jf -> something else
    let labels = LabelMap::from_pairs([("feld", "jf"), ("jf", "legacy")]);
    assert_eq!(labels.canonical("feld"), "jf");
    assert_eq!(labels.canonical("jf"), "legacy");
}

#[test]
fn test_unknown_labels_pass_through() {
    let labels = LabelMap::dkg_macros();
    assert_eq!(labels.canonical("amt"), "amt");
    assert_eq!(labels.canonical(""), "");
}

#[test]
fn test_macro_presets() {
    assert_eq!(LabelMap::dkg_macros().canonical("kate"), "ejf");
    assert_eq!(LabelMap::vss_macros().canonical("kate"), "evss");
    assert_eq!(LabelMap::vss_macros().canonical("feld"), "jf");
}

#[test]
fn test_legend_presets() {
    let dkg = LabelMap::dkg_legend();
    assert_eq!(dkg.canonical("feld"), "JF-DKG");
    assert_eq!(dkg.canonical("old-amt"), "Old AMT DKG");
    assert_eq!(LabelMap::vss_legend().canonical("fk"), "FK VSS");
    assert_eq!(LabelMap::bandwidth_legend().canonical("Kate et al"), "eJF-DKG");
    assert_eq!(
        LabelMap::interpolation_legend().canonical("fft-eval"),
        "Fast Lagrange"
    );
}

#[test]
fn test_builder_overrides_entry() {
    let labels = LabelMap::new().with("feld", "jf").with("feld", "JF");
    assert_eq!(labels.len(), 1);
    assert_eq!(labels.canonical("feld"), "JF");
    assert!(LabelMap::new().is_empty());
}
