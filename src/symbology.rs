use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Barcode symbology selected for a generation run.
///
/// Resolution from a user-facing label happens once, when the run
/// configuration is put together, not per row. An unknown label is a
/// configuration error, reported before any row is processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Symbology {
    Ean13,
    Ean8,
    UpcA,
    Code39,
    Code128,
    Pzn,
    Isbn13,
    Issn,
    Codabar,
    Code93,
}

/// All supported symbologies, in menu order.
pub const ALL_SYMBOLOGIES: [Symbology; 10] = [
    Symbology::Ean13,
    Symbology::Ean8,
    Symbology::UpcA,
    Symbology::Code39,
    Symbology::Code128,
    Symbology::Pzn,
    Symbology::Isbn13,
    Symbology::Issn,
    Symbology::Codabar,
    Symbology::Code93,
];

// Lookup table from normalized label to symbology. Labels are compared
// lowercased with spaces, dashes and underscores removed, so "EAN-13",
// "ean13" and "EAN 13" all resolve to the same variant.
const LABELS: [(&str, Symbology); 12] = [
    ("ean13", Symbology::Ean13),
    ("ean8", Symbology::Ean8),
    ("upca", Symbology::UpcA),
    ("upc", Symbology::UpcA),
    ("code39", Symbology::Code39),
    ("code128", Symbology::Code128),
    ("pzn", Symbology::Pzn),
    ("isbn13", Symbology::Isbn13),
    ("isbn", Symbology::Isbn13),
    ("issn", Symbology::Issn),
    ("codabar", Symbology::Codabar),
    ("code93", Symbology::Code93),
];

impl Symbology {
    /// Canonical display label, as shown in the symbology picker.
    pub fn label(&self) -> &'static str {
        match self {
            Symbology::Ean13 => "EAN-13",
            Symbology::Ean8 => "EAN-8",
            Symbology::UpcA => "UPC-A",
            Symbology::Code39 => "Code39",
            Symbology::Code128 => "Code128",
            Symbology::Pzn => "PZN",
            Symbology::Isbn13 => "ISBN-13",
            Symbology::Issn => "ISSN",
            Symbology::Codabar => "Codabar",
            Symbology::Code93 => "Code93",
        }
    }

    /// Resolve a user-facing label to a symbology, if recognized.
    pub fn resolve(label: &str) -> Option<Symbology> {
        let key: String = label
            .chars()
            .filter(|c| !matches!(*c, ' ' | '-' | '_'))
            .collect::<String>()
            .to_lowercase();
        LABELS
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, sym)| *sym)
    }
}

impl fmt::Display for Symbology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Symbology {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Symbology::resolve(s).ok_or_else(|| format!("unknown symbology: '{}'", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_canonical_labels() {
        for sym in ALL_SYMBOLOGIES {
            assert_eq!(Symbology::resolve(sym.label()), Some(sym));
        }
    }

    #[test]
    fn resolution_ignores_case_and_separators() {
        assert_eq!(Symbology::resolve("ean-13"), Some(Symbology::Ean13));
        assert_eq!(Symbology::resolve("EAN 13"), Some(Symbology::Ean13));
        assert_eq!(Symbology::resolve("code_128"), Some(Symbology::Code128));
        assert_eq!(Symbology::resolve("UPC"), Some(Symbology::UpcA));
    }

    #[test]
    fn unknown_label_is_rejected() {
        assert_eq!(Symbology::resolve("qr"), None);
        assert!("datamatrix".parse::<Symbology>().is_err());
    }
}
