//! Typed HTTP client for the placecheck backend.
//!
//! The backend owns search, autocomplete, and provider-key provisioning; this
//! crate consumes that contract as a black box and hands normalized domain
//! types to the controller. Geocoding, ML correction, and verdict scoring all
//! happen server-side; nothing here computes, it only fetches and decodes.

pub mod client;
pub mod error;
pub mod types;

pub use client::BackendClient;
pub use error::BackendError;
pub use types::ProviderKeys;
