//! Discrete events driving the session.
//!
//! All state transitions happen on one logical thread in response to these
//! events; timers and network completions are events like any other. Stale
//! completions carry the generation or epoch they were spawned under so the
//! session can detect and drop them.

use placecheck_core::{Place, SuggestionItem};

use crate::readiness::ProviderSide;

#[derive(Debug)]
pub enum Event {
    /// A keystroke updated the raw input text.
    InputChanged(String),
    /// The debounce quiet period elapsed for the given generation.
    DebounceElapsed { generation: u64 },
    /// An autocomplete request finished. Failures arrive as an empty list.
    SuggestionsLoaded {
        generation: u64,
        items: Vec<SuggestionItem>,
    },
    /// The user picked a suggestion from the list.
    SuggestionPicked(SuggestionItem),
    /// The user committed a search: explicit text, or the held input when
    /// `None`.
    SearchRequested { text: Option<String> },
    /// An authoritative search finished. `place` is `None` on empty results
    /// and on swallowed transport failures.
    SearchCompleted { epoch: u64, place: Option<Place> },
    /// The user toggled the correction overlay.
    CorrectionToggled,
    /// The user cleared the current selection.
    SelectionCleared,
    /// A provider's SDK script finished loading.
    SdkLoaded(ProviderSide),
    /// A provider's container element appeared in the render tree.
    ContainerMounted(ProviderSide),
    /// A provider's container element left the render tree.
    ContainerUnmounted(ProviderSide),
}
