//! Category derivation, color mapping, and legend construction.
//!
//! Categories are not stored anywhere; they are derived from whatever
//! incidents are loaded. Every function here is pure and deterministic, so
//! callers may memoize results and only recompute when the incident
//! collection changes.

use std::collections::{BTreeMap, BTreeSet};

use incident_map_incident_models::Incident;
use serde::Serialize;

use crate::severity::{DEFAULT_COLOR, SeverityLevel};
use crate::tiers::Classifier;

/// Derives the distinct, non-empty category labels from `incidents`.
///
/// Labels are sorted by severity (most severe first) and alphabetically
/// within a severity level. Incidents without a category contribute
/// nothing.
#[must_use]
pub fn derive_categories(incidents: &[Incident], classifier: &Classifier) -> Vec<String> {
    let distinct: BTreeSet<&str> = incidents.iter().filter_map(Incident::category).collect();

    // BTreeSet iteration is alphabetical and `sort_by_cached_key` is stable,
    // so ties within a severity keep alphabetical order.
    let mut categories: Vec<String> = distinct.into_iter().map(str::to_string).collect();
    categories.sort_by_cached_key(|label| classifier.severity(label));
    categories
}

/// Mapping from derived category label to its display color.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategoryColorMap {
    colors: BTreeMap<String, &'static str>,
}

impl CategoryColorMap {
    /// Builds the color map for a derived category list.
    #[must_use]
    pub fn build(categories: &[String], classifier: &Classifier) -> Self {
        let colors = categories
            .iter()
            .map(|label| (label.clone(), classifier.color(label)))
            .collect();
        Self { colors }
    }

    /// Returns the color for `label`, or [`DEFAULT_COLOR`] if the label is
    /// not part of the derived category set.
    #[must_use]
    pub fn color_for(&self, label: Option<&str>) -> &'static str {
        label
            .and_then(|label| self.colors.get(label.trim()))
            .copied()
            .unwrap_or(DEFAULT_COLOR)
    }

    /// Returns the marker color for an incident.
    #[must_use]
    pub fn incident_color(&self, incident: &Incident) -> &'static str {
        self.color_for(incident.category())
    }

    /// Returns whether `label` has an explicit entry.
    #[must_use]
    pub fn contains(&self, label: &str) -> bool {
        self.colors.contains_key(label)
    }

    /// Number of mapped categories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Returns `true` if no categories are mapped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

/// One row of the map legend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegendEntry {
    /// Category label.
    pub category: String,
    /// Severity level of the category.
    pub severity: SeverityLevel,
    /// Swatch color.
    pub color: &'static str,
    /// Number of loaded incidents with this category.
    pub count: u64,
}

/// Builds legend rows for `categories` in the order given.
#[must_use]
pub fn build_legend(
    incidents: &[Incident],
    categories: &[String],
    classifier: &Classifier,
) -> Vec<LegendEntry> {
    let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
    for label in incidents.iter().filter_map(Incident::category) {
        *counts.entry(label).or_default() += 1;
    }

    categories
        .iter()
        .map(|category| {
            let classification = classifier.classify(category);
            LegendEntry {
                category: category.clone(),
                severity: classification.severity,
                color: classification.color,
                count: counts.get(category.as_str()).copied().unwrap_or_default(),
            }
        })
        .collect()
}
