//! Packaging quantity normalization
//!
//! Pulls an "amount + unit" token such as `500 mg` or `2.5µmol/ml` out of
//! free-form packaging text. The unit set is closed; anything else yields no
//! token.

use regex::Regex;

use super::{ParsingError, ParsingResult};

/// Recognised units. Compound units come before their prefixes so the longest
/// unit wins at a given position (`mg/ml` over `mg`).
pub const QUANTITY_UNITS: &[&str] = &[
    "µmol/ml", "mmol/ml", "µmol/g", "mmol/g", "µg/ml", "mg/ml", "µg/g", "mg/g",
    "µmol", "mmol", "µg", "µl", "mg", "ml", "g",
];

#[derive(Debug, Clone)]
pub struct QuantityMatcher {
    pattern: Regex,
}

impl QuantityMatcher {
    pub fn new() -> ParsingResult<Self> {
        let units = QUANTITY_UNITS
            .iter()
            .map(|unit| regex::escape(unit))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = Regex::new(&format!(r"\d+(?:\.\d+)?\s*(?:{units})"))
            .map_err(|e| ParsingError::invalid_pattern("quantity", &e.to_string()))?;

        Ok(Self { pattern })
    }

    /// First quantity token in `text`, verbatim.
    pub fn normalize(&self, text: &str) -> Option<String> {
        self.pattern.find(text).map(|m| m.as_str().to_string())
    }
}
