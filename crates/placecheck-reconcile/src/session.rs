//! The reconciliation session: one event loop, one selected place, two
//! independently ready surfaces.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use placecheck_backend::BackendClient;
use placecheck_core::{AppConfig, Place};

use crate::event::Event;
use crate::query::QueryController;
use crate::readiness::{ProviderSide, ReadinessGate};
use crate::render;
use crate::selection::PlaceSelection;
use crate::surface::{SurfaceBinding, SurfaceFactory};

/// Session-level knobs. Zoom and padding are fixed surface constants; only
/// the input-side behavior is configurable.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub debounce: Duration,
    pub min_query_chars: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(300),
            min_query_chars: 2,
        }
    }
}

impl SessionConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            debounce: Duration::from_millis(config.debounce_ms),
            min_query_chars: config.min_query_chars,
        }
    }
}

/// Coarse session state, derived from the in-flight search count and the
/// selection. `Empty → Loading` on commit; `Loading → Result` on a
/// non-empty response; `Loading → Empty` when a first search fails;
/// `Result → Loading` on a re-search with no intermediate `Empty`;
/// `Result → Empty` only on explicit clear. A failed re-search keeps the
/// previous selection, so it lands back in `Result`. There is no terminal
/// state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Empty,
    Loading,
    Result,
}

/// The orchestrator. Owns the query controller, the selection, both
/// readiness gates, and both surface bindings; consumes [`Event`]s one at a
/// time and re-renders both sides after every state change.
///
/// Timers and network requests are spawned tasks that complete by sending
/// events back into the session's channel, so all mutation happens on one
/// logical thread.
pub struct Session {
    config: SessionConfig,
    backend: Arc<BackendClient>,
    events: UnboundedSender<Event>,
    query: QueryController,
    selection: PlaceSelection,
    primary_gate: ReadinessGate,
    secondary_gate: ReadinessGate,
    primary_surface: SurfaceBinding,
    secondary_surface: SurfaceBinding,
    /// Bumped on every clear. A search response carrying an older epoch
    /// belongs to a torn-down session and is dropped, so a late arrival can
    /// never resurrect a stale render.
    epoch: u64,
}

impl Session {
    /// Build a session and the receiving half of its event channel. The
    /// caller drives the loop: `recv()` an event, [`Session::process`] it.
    pub fn new(
        backend: Arc<BackendClient>,
        primary_factory: Box<dyn SurfaceFactory>,
        secondary_factory: Box<dyn SurfaceFactory>,
        config: SessionConfig,
    ) -> (Self, UnboundedReceiver<Event>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let session = Self {
            config,
            backend,
            events: tx,
            query: QueryController::new(),
            selection: PlaceSelection::default(),
            primary_gate: ReadinessGate::default(),
            secondary_gate: ReadinessGate::default(),
            primary_surface: SurfaceBinding::new(primary_factory),
            secondary_surface: SurfaceBinding::new(secondary_factory),
            epoch: 0,
        };
        (session, rx)
    }

    /// A sender for feeding events from outside the loop (user actions, SDK
    /// bootstrap signals).
    #[must_use]
    pub fn sender(&self) -> UnboundedSender<Event> {
        self.events.clone()
    }

    /// Apply one event, then reconcile both surfaces against the resulting
    /// state.
    pub fn process(&mut self, event: Event) {
        match event {
            Event::InputChanged(text) => {
                self.query.input_changed(
                    text,
                    self.config.min_query_chars,
                    self.config.debounce,
                    &self.events,
                );
            }
            Event::DebounceElapsed { generation } => {
                self.query
                    .debounce_elapsed(generation, &self.backend, &self.events);
            }
            Event::SuggestionsLoaded { generation, items } => {
                self.query.suggestions_loaded(generation, items);
            }
            Event::SuggestionPicked(item) => {
                // The picked label becomes the visible input and the list
                // clears synchronously, before the async search completes.
                self.query.set_text(item.label);
                self.query.commit(
                    Some(item.full_description),
                    self.epoch,
                    &self.backend,
                    &self.events,
                );
            }
            Event::SearchRequested { text } => {
                self.query
                    .commit(text, self.epoch, &self.backend, &self.events);
            }
            Event::SearchCompleted { epoch, place } => {
                self.search_completed(epoch, place);
            }
            Event::CorrectionToggled => self.selection.toggle_correction(),
            Event::SelectionCleared => self.clear(),
            Event::SdkLoaded(side) => self.gate_mut(side).signal_sdk_loaded(),
            Event::ContainerMounted(side) => self.gate_mut(side).set_container_mounted(true),
            Event::ContainerUnmounted(side) => {
                // A binding must never be reused against a new container;
                // discard it here and rebuild on the next mount.
                self.gate_mut(side).set_container_mounted(false);
                self.binding_mut(side).release();
            }
        }

        self.reconcile();
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        if self.query.is_loading() {
            SessionPhase::Loading
        } else if self.selection.place().is_some() {
            SessionPhase::Result
        } else {
            SessionPhase::Empty
        }
    }

    #[must_use]
    pub fn selection(&self) -> &PlaceSelection {
        &self.selection
    }

    #[must_use]
    pub fn query(&self) -> &QueryController {
        &self.query
    }

    #[must_use]
    pub fn surface_created(&self, side: ProviderSide) -> bool {
        match side {
            ProviderSide::Primary => self.primary_surface.is_created(),
            ProviderSide::Secondary => self.secondary_surface.is_created(),
        }
    }

    fn search_completed(&mut self, epoch: u64, place: Option<Place>) {
        self.query.search_finished();

        if epoch != self.epoch {
            tracing::debug!("dropping search response from a torn-down session");
            return;
        }

        // Within an epoch the last response to arrive wins, even when the
        // network reorders two in-flight commits.
        if let Some(place) = place {
            tracing::info!(place = %place.id, verdict = ?place.verdict, "selection updated");
            self.selection.set(place);
        }
    }

    fn clear(&mut self) {
        self.selection.clear();
        self.query.reset();
        self.epoch += 1;
    }

    /// Deterministic re-render over the full state: selection, view flag,
    /// and the two readiness gates. Evaluated per side; a provider that
    /// never becomes ready leaves its surface uncreated without blocking the
    /// other.
    fn reconcile(&mut self) {
        let Some((place, correction_revealed)) = self.selection.view() else {
            // No place: release both in-memory instances so a future
            // re-mount builds fresh ones against fresh containers.
            self.primary_surface.release();
            self.secondary_surface.release();
            return;
        };

        if self.primary_gate.ready() {
            render::render_primary(&mut self.primary_surface, place, correction_revealed);
        }
        if self.secondary_gate.ready() {
            render::render_secondary(&mut self.secondary_surface, place);
        }
    }

    fn gate_mut(&mut self, side: ProviderSide) -> &mut ReadinessGate {
        match side {
            ProviderSide::Primary => &mut self.primary_gate,
            ProviderSide::Secondary => &mut self.secondary_gate,
        }
    }

    fn binding_mut(&mut self, side: ProviderSide) -> &mut SurfaceBinding {
        match side {
            ProviderSide::Primary => &mut self.primary_surface,
            ProviderSide::Secondary => &mut self.secondary_surface,
        }
    }
}
