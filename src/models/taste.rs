use serde::{Deserialize, Deserializer, Serialize};

use crate::models::number_or;

pub const NEUTRAL_LEVEL: f64 = 3.0;

fn neutral() -> f64 {
    NEUTRAL_LEVEL
}

/// `null` components read as neutral, the same as absent ones.
fn level_or_neutral<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<f64>::deserialize(deserializer)?;
    Ok(number_or(raw, NEUTRAL_LEVEL))
}

/// Flavour profile on the spice/oil/sweet axes, conventionally 0..=10.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TasteVector {
    #[serde(default = "neutral", deserialize_with = "level_or_neutral")]
    pub spice: f64,
    #[serde(default = "neutral", deserialize_with = "level_or_neutral")]
    pub oil: f64,
    #[serde(default = "neutral", deserialize_with = "level_or_neutral")]
    pub sweet: f64,
}

impl Default for TasteVector {
    fn default() -> Self {
        Self::new(NEUTRAL_LEVEL, NEUTRAL_LEVEL, NEUTRAL_LEVEL)
    }
}

impl TasteVector {
    pub const fn new(spice: f64, oil: f64, sweet: f64) -> Self {
        Self { spice, oil, sweet }
    }

    /// The vector a scoring function is allowed to see: absent vectors become
    /// neutral and non-finite components fall back to the neutral level.
    pub fn normalize(raw: Option<&TasteVector>) -> Self {
        let raw = raw.copied().unwrap_or_default();
        Self {
            spice: number_or(Some(raw.spice), NEUTRAL_LEVEL),
            oil: number_or(Some(raw.oil), NEUTRAL_LEVEL),
            sweet: number_or(Some(raw.sweet), NEUTRAL_LEVEL),
        }
    }

    pub fn components(&self) -> [f64; 3] {
        [self.spice, self.oil, self.sweet]
    }
}

#[cfg(test)]
mod tests {
    use super::TasteVector;

    #[test]
    fn missing_fields_deserialize_as_neutral() {
        let taste: TasteVector = serde_json::from_str(r#"{"spice": 7}"#).unwrap();
        assert_eq!(taste, TasteVector::new(7.0, 3.0, 3.0));
    }

    #[test]
    fn null_components_deserialize_as_neutral() {
        let taste: TasteVector =
            serde_json::from_str(r#"{"spice": null, "oil": 2, "sweet": 1}"#).unwrap();
        assert_eq!(taste, TasteVector::new(3.0, 2.0, 1.0));
    }

    #[test]
    fn normalize_replaces_nan_components() {
        let raw = TasteVector::new(f64::NAN, 5.0, f64::NEG_INFINITY);
        assert_eq!(
            TasteVector::normalize(Some(&raw)),
            TasteVector::new(3.0, 5.0, 3.0)
        );
        assert_eq!(TasteVector::normalize(None), TasteVector::default());
    }
}
