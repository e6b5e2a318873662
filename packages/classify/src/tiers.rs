//! Keyword configuration and the category classifier.
//!
//! The built-in keyword lists live in `tiers.toml`, baked into the binary at
//! compile time via [`include_str!`]. A user-supplied TOML file with the same
//! shape replaces them wholesale.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::TiersError;
use crate::severity::{SeverityLevel, Tier};

/// Built-in keyword configuration.
const DEFAULT_TIERS_TOML: &str = include_str!("../tiers.toml");

/// A phrase that forces a tier regardless of the keyword lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierOverride {
    /// Phrase matched case-insensitively as a substring of the label.
    pub phrase: String,
    /// Tier assigned when the phrase matches.
    pub tier: Tier,
}

/// Keyword lists for each matchable tier.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct KeywordTiers {
    /// High severity keywords.
    #[serde(default)]
    pub high: Vec<String>,
    /// Medium severity keywords.
    #[serde(default)]
    pub medium: Vec<String>,
    /// Low severity property and public-order keywords.
    #[serde(default)]
    pub property: Vec<String>,
    /// Low severity traffic keywords.
    #[serde(default)]
    pub traffic: Vec<String>,
    /// Informational keywords.
    #[serde(default)]
    pub informational: Vec<String>,
    /// Phrases checked before any tier.
    #[serde(default)]
    pub overrides: Vec<TierOverride>,
}

impl KeywordTiers {
    /// Returns the built-in keyword configuration.
    ///
    /// # Panics
    ///
    /// Panics if the embedded `tiers.toml` is malformed, which is a build
    /// defect rather than a runtime condition.
    #[must_use]
    pub fn builtin() -> Self {
        Self::from_toml(DEFAULT_TIERS_TOML).expect("embedded tiers.toml is valid")
    }

    /// Parses a keyword configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`TiersError::Toml`] if the text is not valid TOML or does not
    /// match the expected shape.
    pub fn from_toml(text: &str) -> Result<Self, TiersError> {
        Ok(toml::from_str(text)?)
    }

    /// Reads and parses a keyword configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`TiersError::Io`] if the file cannot be read, or
    /// [`TiersError::Toml`] if it cannot be parsed.
    pub fn from_path(path: &Path) -> Result<Self, TiersError> {
        let text = std::fs::read_to_string(path)?;
        let tiers = Self::from_toml(&text)?;
        log::info!("Loaded keyword tiers from {}", path.display());
        Ok(tiers)
    }

    fn keywords(&self, tier: Tier) -> &[String] {
        match tier {
            Tier::High => &self.high,
            Tier::Medium => &self.medium,
            Tier::Property => &self.property,
            Tier::Traffic => &self.traffic,
            Tier::Informational => &self.informational,
            Tier::Default => &[],
        }
    }
}

/// The outcome of classifying one category label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    /// Matched keyword tier.
    pub tier: Tier,
    /// Severity derived from the tier.
    pub severity: SeverityLevel,
    /// Display color derived from the tier.
    pub color: &'static str,
}

impl From<Tier> for Classification {
    fn from(tier: Tier) -> Self {
        Self {
            tier,
            severity: tier.severity(),
            color: tier.color(),
        }
    }
}

/// Classifies category labels by case-insensitive keyword matching.
///
/// Keywords are lowercased once at construction. Classification is total:
/// a label matching nothing lands in [`Tier::Default`].
#[derive(Debug, Clone)]
pub struct Classifier {
    overrides: Vec<(String, Tier)>,
    tiers: Vec<(Tier, Vec<String>)>,
}

impl Classifier {
    /// Builds a classifier from a keyword configuration.
    #[must_use]
    pub fn new(config: &KeywordTiers) -> Self {
        let overrides = config
            .overrides
            .iter()
            .map(|o| (o.phrase.to_lowercase(), o.tier))
            .filter(|(phrase, _)| !phrase.is_empty())
            .collect();

        let tiers = Tier::KEYWORD_ORDER
            .iter()
            .map(|&tier| {
                let keywords = config
                    .keywords(tier)
                    .iter()
                    .map(|k| k.to_lowercase())
                    .filter(|k| !k.is_empty())
                    .collect();
                (tier, keywords)
            })
            .collect();

        Self { overrides, tiers }
    }

    /// Returns the tier for a category label.
    #[must_use]
    pub fn tier(&self, label: &str) -> Tier {
        let lower = label.to_lowercase();

        if let Some((_, tier)) = self
            .overrides
            .iter()
            .find(|(phrase, _)| lower.contains(phrase.as_str()))
        {
            return *tier;
        }

        self.tiers
            .iter()
            .find(|(_, keywords)| contains_any(&lower, keywords))
            .map_or(Tier::Default, |(tier, _)| *tier)
    }

    /// Classifies a category label into its tier, severity, and color.
    #[must_use]
    pub fn classify(&self, label: &str) -> Classification {
        self.tier(label).into()
    }

    /// Returns the severity level for a category label.
    #[must_use]
    pub fn severity(&self, label: &str) -> SeverityLevel {
        self.tier(label).severity()
    }

    /// Returns the display color for a category label.
    #[must_use]
    pub fn color(&self, label: &str) -> &'static str {
        self.tier(label).color()
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(&KeywordTiers::builtin())
    }
}

/// Checks if `haystack` contains any of the given `needles`.
fn contains_any(haystack: &str, needles: &[String]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle.as_str()))
}
