//! Place search-result types, bound to the backend wire contract.
//!
//! Rust field names are provider-neutral (primary/secondary/corrected); serde
//! renames carry the wire names the backend actually serves. A [`Place`] is
//! deserialized wholesale from one search response and never field-patched;
//! each new search replaces the previous value atomically.

use serde::{Deserialize, Serialize};

use crate::coords::{haversine_m, Coordinate};

/// Reported correction distances further than this from the computed
/// great-circle value are logged as a discrepancy.
const DISTANCE_DRIFT_TOLERANCE_M: f64 = 5.0;

/// Categorical existence-confidence judgement for a place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    /// The secondary provider corroborates the place at its stated location.
    #[serde(rename = "verified")]
    Confirmed,
    /// The providers disagree; the place may have moved.
    #[serde(rename = "warning")]
    Uncertain,
    /// The secondary provider has no trace of the place; likely closed.
    #[serde(rename = "not_found")]
    LikelyGone,
}

/// Matched-listing metadata from the secondary provider.
///
/// All fields are optional on the wire. A response carrying metadata without
/// a secondary coordinate is malformed; [`Place::normalized`] strips the
/// metadata in that case so consumers never see one without the other.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SecondaryMatch {
    #[serde(rename = "naver_name", default)]
    pub name: Option<String>,
    #[serde(rename = "naver_category", default)]
    pub category: Option<String>,
    #[serde(rename = "naver_phone", default)]
    pub phone: Option<String>,
    #[serde(rename = "naver_link", default)]
    pub link: Option<String>,
    /// Name similarity between the two providers' listings, 0.0–1.0.
    #[serde(rename = "name_similarity", default)]
    pub name_similarity: Option<f64>,
}

impl SecondaryMatch {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.category.is_none()
            && self.phone.is_none()
            && self.link.is_none()
            && self.name_similarity.is_none()
    }
}

/// Immutable snapshot of one search result with competing coordinate
/// readings and a verification verdict.
///
/// `verdict` and its companions are optional because older backend variants
/// do not serve them; absence selects the neutral marker style downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub name: String,
    pub address: String,
    #[serde(rename = "place_id")]
    pub id: String,
    #[serde(rename = "types", default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    /// Raw reading from the primary provider; may be stale.
    #[serde(rename = "original")]
    pub primary: Coordinate,
    /// Provider-independent best-estimate location.
    pub corrected: Coordinate,
    /// Reading from the secondary provider; `None` means "not matched".
    #[serde(rename = "naver_location")]
    pub secondary: Option<Coordinate>,
    /// Cross-provider agreement score, 0.0–1.0.
    #[serde(rename = "sync_score", default)]
    pub agreement_score: Option<f64>,
    /// Great-circle distance between `primary` and `corrected`, in meters.
    pub correction_distance_m: f64,
    /// Confidence in the corrected coordinate, 0.0–1.0.
    pub confidence: f64,
    /// Which correction strategy produced the estimate (e.g. `"ml"`).
    #[serde(default)]
    pub method: Option<String>,
    #[serde(rename = "status", default)]
    pub verdict: Option<Verdict>,
    #[serde(rename = "status_confidence", default)]
    pub verdict_confidence: Option<f64>,
    #[serde(rename = "status_reason", default)]
    pub verdict_reason: Option<String>,
    #[serde(flatten)]
    pub secondary_match: SecondaryMatch,
}

impl Place {
    /// Enforce wire-level consistency on a freshly deserialized place.
    ///
    /// Strips secondary-match metadata when no secondary coordinate is
    /// present, and logs (never rejects) a reported correction distance that
    /// drifts from the computed great-circle value. The distance is a
    /// display-only contract owned by the backend.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        if self.secondary.is_none() && !self.secondary_match.is_empty() {
            tracing::debug!(
                place = %self.id,
                "dropping secondary-match metadata without a secondary coordinate"
            );
            self.secondary_match = SecondaryMatch::default();
        }

        let computed = haversine_m(self.primary, self.corrected);
        if (computed - self.correction_distance_m).abs() > DISTANCE_DRIFT_TOLERANCE_M {
            tracing::debug!(
                place = %self.id,
                reported_m = self.correction_distance_m,
                computed_m = computed,
                "reported correction distance drifts from computed value"
            );
        }

        self
    }

    /// The coordinate the secondary surface should display: the secondary
    /// provider's reading when matched, else the corrected estimate. The
    /// returned flag is `true` only for a genuine secondary reading, so a
    /// fallback is never presented as provider-verified.
    #[must_use]
    pub fn secondary_display(&self) -> (Coordinate, bool) {
        match self.secondary {
            Some(coord) => (coord, true),
            None => (self.corrected, false),
        }
    }
}

/// One autocomplete suggestion. Ephemeral: regenerated on every debounce
/// tick, discarded on commit or on the next keystroke.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionItem {
    #[serde(rename = "main_text")]
    pub label: String,
    #[serde(rename = "description")]
    pub full_description: String,
    #[serde(rename = "place_id")]
    pub id: String,
}

#[cfg(test)]
#[path = "place_test.rs"]
mod tests;
