//! Debounced suggestion stream and the authoritative search action.
//!
//! The debounce is a cancellable deferred task plus a monotonically
//! increasing generation token. Aborting the task kills a timer that has not
//! fired; the token catches everything the abort cannot, i.e. a timer event
//! or autocomplete response already sitting in the channel when the input
//! moved on. Committing a search always cancels the pending debounce first, so a
//! stale suggestion response can never repopulate the list under a result
//! the user already selected.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

use placecheck_backend::BackendClient;
use placecheck_core::SuggestionItem;

use crate::event::Event;

/// Owns the raw input text, the suggestion list, and the in-flight request
/// bookkeeping. Driven by the session; never touches surfaces or selection.
pub struct QueryController {
    text: String,
    suggestions: Vec<SuggestionItem>,
    /// Bumped on every input change and commit; spawned work carries the
    /// value it was started under.
    generation: u64,
    debounce: Option<JoinHandle<()>>,
    inflight_searches: u32,
}

impl Default for QueryController {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryController {
    #[must_use]
    pub fn new() -> Self {
        Self {
            text: String::new(),
            suggestions: Vec::new(),
            generation: 0,
            debounce: None,
            inflight_searches: 0,
        }
    }

    /// Record a keystroke. Short inputs clear the suggestion list and
    /// suppress any pending debounce; anything else (re)starts the quiet
    /// period.
    pub fn input_changed(
        &mut self,
        text: String,
        min_chars: usize,
        debounce: Duration,
        events: &UnboundedSender<Event>,
    ) {
        self.text = text;
        self.cancel_debounce();

        if self.text.chars().count() < min_chars {
            self.suggestions.clear();
            return;
        }

        let generation = self.generation;
        let tx = events.clone();
        self.debounce = Some(tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            let _ = tx.send(Event::DebounceElapsed { generation });
        }));
    }

    /// The quiet period elapsed: issue the autocomplete request, unless the
    /// input has already moved on.
    pub fn debounce_elapsed(
        &mut self,
        generation: u64,
        backend: &Arc<BackendClient>,
        events: &UnboundedSender<Event>,
    ) {
        if generation != self.generation {
            return;
        }

        let text = self.text.clone();
        let backend = Arc::clone(backend);
        let tx = events.clone();
        tokio::spawn(async move {
            // Autocomplete failures are swallowed: an empty list, never an
            // error state.
            let items = match backend.autocomplete(&text).await {
                Ok(items) => items,
                Err(error) => {
                    tracing::debug!(%error, "autocomplete request failed");
                    Vec::new()
                }
            };
            let _ = tx.send(Event::SuggestionsLoaded { generation, items });
        });
    }

    /// Replace the suggestion list with a completed response, unless stale.
    pub fn suggestions_loaded(&mut self, generation: u64, items: Vec<SuggestionItem>) {
        if generation == self.generation {
            self.suggestions = items;
        }
    }

    /// Issue the authoritative search. Returns `false` (and does nothing)
    /// for blank input.
    ///
    /// The pending debounce is always cancelled before the request fires;
    /// that ordering must never be violated.
    pub fn commit(
        &mut self,
        text: Option<String>,
        epoch: u64,
        backend: &Arc<BackendClient>,
        events: &UnboundedSender<Event>,
    ) -> bool {
        let query = text.unwrap_or_else(|| self.text.clone());
        if query.trim().is_empty() {
            return false;
        }

        self.cancel_debounce();
        self.suggestions.clear();
        self.inflight_searches += 1;

        let backend = Arc::clone(backend);
        let tx = events.clone();
        tokio::spawn(async move {
            let place = match backend.search(&query).await {
                Ok(mut places) if !places.is_empty() => Some(places.remove(0)),
                Ok(_) => {
                    tracing::warn!(query, "search returned no places");
                    None
                }
                Err(error) => {
                    tracing::warn!(query, %error, "search request failed");
                    None
                }
            };
            let _ = tx.send(Event::SearchCompleted { epoch, place });
        });

        true
    }

    /// Bookkeeping for a finished search, stale or not: the loading flag
    /// tracks arrivals, while epoch filtering is the session's concern.
    pub fn search_finished(&mut self) {
        self.inflight_searches = self.inflight_searches.saturating_sub(1);
    }

    /// Reset text and suggestions when the session is cleared.
    pub fn reset(&mut self) {
        self.cancel_debounce();
        self.text.clear();
        self.suggestions.clear();
    }

    pub fn set_text(&mut self, text: String) {
        self.text = text;
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn suggestions(&self) -> &[SuggestionItem] {
        &self.suggestions
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.inflight_searches > 0
    }

    fn cancel_debounce(&mut self) {
        self.generation += 1;
        if let Some(task) = self.debounce.take() {
            task.abort();
        }
    }
}
