//! # Quality Ranges
//!
//! Recipes describe a quality check's expected value as free text. When the
//! text is a numeric range (`"6.5-7.5"`, `"-18--12"`) it can be parsed into a
//! [`ValueRange`] and used to judge a measured value.

use crate::error::ValidationError;
use crate::types::QualityOutcome;

/// Inclusive numeric range parsed from `"min-max"`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    /// Parses `"min-max"`.
    ///
    /// Returns `None` when the text is not a numeric range at all (plain free
    /// text such as `"golden brown"`). Bounds may be negative or decimal; a
    /// comma is accepted as decimal separator.
    ///
    /// ```rust
    /// use prodtrack_core::quality::ValueRange;
    ///
    /// let range = ValueRange::parse("6.5-7.5").unwrap();
    /// assert!(range.contains(7.0));
    /// assert!(ValueRange::parse("golden brown").is_none());
    /// ```
    pub fn parse(text: &str) -> Option<ValueRange> {
        let text = text.trim();
        // Skip a leading sign so "-18--12" splits on the separator, not the sign.
        let search_from = usize::from(text.starts_with('-'));
        let sep = text[search_from..].find('-')? + search_from;

        let min = parse_number(&text[..sep])?;
        let max = parse_number(&text[sep + 1..])?;
        Some(ValueRange { min, max })
    }

    /// Checks that `min <= max`.
    pub fn validate(&self, field: &str) -> Result<(), ValidationError> {
        if self.min > self.max {
            return Err(ValidationError::InvalidFormat {
                field: field.to_string(),
                reason: format!("range minimum {} is above maximum {}", self.min, self.max),
            });
        }
        Ok(())
    }

    #[inline]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Judges a measured value written by an operator.
    ///
    /// Unparseable measurements stay `non-testé`.
    pub fn evaluate(&self, actual: &str) -> QualityOutcome {
        match parse_number(actual) {
            Some(v) if self.contains(v) => QualityOutcome::Conforme,
            Some(_) => QualityOutcome::NonConforme,
            None => QualityOutcome::NonTeste,
        }
    }
}

fn parse_number(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    s.replace(',', ".").parse::<f64>().ok().filter(|v| v.is_finite())
}
