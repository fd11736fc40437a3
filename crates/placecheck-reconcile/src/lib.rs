//! Dual-surface map reconciliation.
//!
//! This crate owns the one piece of the system with real state-machine and
//! race-condition concerns: a [`Session`] holds the selected place, a
//! debounced suggestion stream, readiness gates for two independently
//! initialized map providers, and two [`SurfaceBinding`]s it deterministically
//! re-renders whenever any input changes. Map SDKs sit behind the
//! [`MapSurface`]/[`SurfaceFactory`] seam so the whole controller runs (and
//! tests) without a browser or a provider script.

pub mod event;
pub mod query;
pub mod readiness;
pub mod render;
pub mod selection;
pub mod session;
pub mod surface;

pub use event::Event;
pub use query::QueryController;
pub use readiness::{ProviderSide, ReadinessGate};
pub use selection::PlaceSelection;
pub use session::{Session, SessionConfig, SessionPhase};
pub use surface::{
    MapSurface, Marker, MarkerStyle, SurfaceBinding, SurfaceFactory, DEFAULT_ZOOM, FIT_PADDING_PX,
    MAX_FIT_ZOOM,
};
