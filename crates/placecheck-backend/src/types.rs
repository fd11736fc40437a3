//! Wire envelopes for the backend's JSON responses.
//!
//! Every endpoint wraps its payload in a small envelope; the domain types
//! inside (`Place`, `SuggestionItem`) live in `placecheck-core`. Envelope
//! fields default so older backend variants with sparser responses still
//! deserialize.

use serde::Deserialize;

use placecheck_core::{Place, SuggestionItem};

/// `GET /search/autocomplete` → `{ "predictions": [...] }`.
#[derive(Debug, Deserialize)]
pub struct AutocompleteResponse {
    #[serde(default)]
    pub predictions: Vec<SuggestionItem>,
}

/// `POST /search` → `{ "places": [...] }`.
///
/// The backend reports recoverable problems (missing query, unconfigured
/// upstream key) as an `error` string alongside an empty `places` list.
/// That is an empty result, not a transport failure.
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub places: Vec<Place>,
    #[serde(default)]
    pub error: Option<String>,
}

/// `GET /maps-keys` → `{ "success": bool, "data": { ... } }`.
#[derive(Debug, Deserialize)]
pub struct MapsKeysResponse {
    pub success: bool,
    #[serde(default)]
    pub data: Option<ProviderKeys>,
}

/// Provider credentials provisioned once at session start. Either key may be
/// absent; a provider without credentials simply never signals ready.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderKeys {
    #[serde(default)]
    pub google_maps_key: Option<String>,
    #[serde(default)]
    pub naver_client_id: Option<String>,
}
