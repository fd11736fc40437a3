//! Domain types, geometry, and configuration for placecheck.
//!
//! A [`Place`] is one search result carrying competing coordinate readings
//! from two independent map providers plus a verification verdict. Everything
//! downstream (the backend client, the reconciliation controller, the CLI)
//! consumes these types; nothing here performs I/O except config loading.

mod app_config;

pub mod config;
pub mod coords;
pub mod deeplink;
pub mod place;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env, ConfigError};
pub use coords::{haversine_m, Coordinate};
pub use deeplink::directions_url;
pub use place::{Place, SecondaryMatch, SuggestionItem, Verdict};
