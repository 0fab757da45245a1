use ahash::AHashMap;

/// Raw dataset label to display label, applied once at ingestion.
///
/// A single lookup per value; unlike chained find/replace, one mapping can
/// never rewrite the output of another.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LabelMap {
    entries: AHashMap<String, String>,
}

impl LabelMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let entries = pairs
            .into_iter()
            .map(|(raw, canonical)| (raw.to_string(), canonical.to_string()))
            .collect();
        Self { entries }
    }

    pub fn with<R: Into<String>, C: Into<String>>(mut self, raw: R, canonical: C) -> Self {
        self.entries.insert(raw.into(), canonical.into());
        self
    }

    pub fn canonical<'a>(&'a self, raw: &'a str) -> &'a str {
        self.entries.get(raw).map(String::as_str).unwrap_or(raw)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// DKG labels used as macro-name prefixes in `.tex` reports.
    pub fn dkg_macros() -> Self {
        Self::from_pairs([("feld", "jf"), ("kate", "ejf")])
    }

    /// VSS labels used as macro-name prefixes in `.tex` reports.
    pub fn vss_macros() -> Self {
        Self::from_pairs([("feld", "jf"), ("kate", "evss")])
    }

    pub fn dkg_legend() -> Self {
        Self::from_pairs([
            ("feld", "JF-DKG"),
            ("kate", "eJF-DKG"),
            ("amt", "AMT DKG"),
            ("fk", "FK DKG"),
            ("old-feld", "Old JF-DKG"),
            ("old-kate", "Old eJF-DKG"),
            ("old-amt", "Old AMT DKG"),
        ])
    }

    pub fn vss_legend() -> Self {
        Self::from_pairs([
            ("feld", "Feldman VSS"),
            ("kate", "eVSS"),
            ("amt", "AMT VSS"),
            ("fk", "FK VSS"),
        ])
    }

    /// Deal times are shared between the DKG and VSS benchmarks.
    pub fn deal_legend() -> Self {
        Self::from_pairs([
            ("feld", "Feldman DKG/VSS"),
            ("kate", "eVSS / eJF-DKG"),
            ("amt", "AMT DKG/VSS"),
        ])
    }

    pub fn bandwidth_legend() -> Self {
        Self::from_pairs([
            ("Feldman", "JF-DKG"),
            ("Kate et al", "eJF-DKG"),
            ("AMT", "AMT DKG"),
        ])
    }

    pub fn interpolation_legend() -> Self {
        Self::from_pairs([
            ("multi-eval-1-to-n", "Old Fast Lagrange"),
            ("naive-lagr-1-to-n", "Old Naive Lagrange"),
            ("fft-eval", "Fast Lagrange"),
            ("naive-lagr-wnk", "Naive Lagrange"),
        ])
    }
}
