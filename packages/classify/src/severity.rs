//! Severity levels and color tiers.
//!
//! A category label is classified into exactly one [`Tier`]. The tier fixes
//! both the [`SeverityLevel`] used for legend ordering and the color used
//! for markers and legend swatches, so the two can never disagree.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Color used for any label that does not appear in the derived category
/// set (including incidents with no category at all).
pub const DEFAULT_COLOR: &str = "#636363";

/// Severity of an offense category, ordered from most to least severe.
///
/// The derived `Ord` is the legend sort order: `High < Medium < Low <
/// Informational < Default`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum SeverityLevel {
    /// Violent and weapon-related offenses, robbery, burglary
    High = 1,
    /// Theft, fraud, vehicle and narcotics offenses
    Medium = 2,
    /// Property damage, disturbances, and traffic
    Low = 3,
    /// Administrative and informational reports
    Informational = 4,
    /// Anything not matched by a keyword
    Default = 5,
}

impl SeverityLevel {
    /// Returns the sort rank of this level (1 = most severe).
    #[must_use]
    pub const fn rank(self) -> u8 {
        self as u8
    }

    /// Returns a human-readable label for display.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
            Self::Informational => "Informational/Other",
            Self::Default => "Default",
        }
    }
}

/// Keyword tier a category label falls into.
///
/// `Property` and `Traffic` share [`SeverityLevel::Low`] but have distinct
/// colors.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Tier {
    /// High severity keywords
    High,
    /// Medium severity keywords
    Medium,
    /// Low severity, property and public-order keywords
    Property,
    /// Low severity, traffic keywords
    Traffic,
    /// Informational and miscellaneous keywords
    Informational,
    /// No keyword matched
    Default,
}

impl Tier {
    /// Tiers in matching priority order. [`Tier::Default`] is the fallback
    /// and is not matched by keyword.
    pub const KEYWORD_ORDER: &[Self] = &[
        Self::High,
        Self::Medium,
        Self::Property,
        Self::Traffic,
        Self::Informational,
    ];

    /// Returns the severity level for this tier.
    #[must_use]
    pub const fn severity(self) -> SeverityLevel {
        match self {
            Self::High => SeverityLevel::High,
            Self::Medium => SeverityLevel::Medium,
            Self::Property | Self::Traffic => SeverityLevel::Low,
            Self::Informational => SeverityLevel::Informational,
            Self::Default => SeverityLevel::Default,
        }
    }

    /// Returns the display color for this tier as a CSS hex code.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::High => "#d7301f",
            Self::Medium => "#fc8d59",
            Self::Property => "#fdcc8a",
            Self::Traffic => "#6baed6",
            Self::Informational => "#969696",
            Self::Default => DEFAULT_COLOR,
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::High,
            Self::Medium,
            Self::Property,
            Self::Traffic,
            Self::Informational,
            Self::Default,
        ]
    }
}
