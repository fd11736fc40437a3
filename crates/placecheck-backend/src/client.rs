//! HTTP client for the placecheck backend REST API.
//!
//! Wraps `reqwest` with typed response deserialization and backend-specific
//! error handling. Endpoints never surface backend-reported soft errors as
//! `Err`: an empty result list is a first-class outcome the controller
//! handles, not a failure.

use std::time::Duration;

use reqwest::{Client, Url};

use placecheck_core::{AppConfig, Place, SuggestionItem};

use crate::error::BackendError;
use crate::types::{AutocompleteResponse, MapsKeysResponse, ProviderKeys, SearchResponse};

/// Client for the placecheck backend REST API.
///
/// Use [`BackendClient::new`] with the application config for production or
/// [`BackendClient::with_base_url`] to point at a mock server in tests.
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: Client,
    base_url: Url,
}

impl BackendClient {
    /// Creates a client from the application config.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`BackendError::InvalidBaseUrl`] if the
    /// configured API base does not parse.
    pub fn new(config: &AppConfig) -> Result<Self, BackendError> {
        Self::with_base_url(
            &config.api_base,
            config.request_timeout_secs,
            &config.user_agent,
        )
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`BackendError::InvalidBaseUrl`] if
    /// `base_url` is not a valid URL.
    pub fn with_base_url(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Normalise: ensure the base URL ends with exactly one slash so that
        // Url::join treats the API prefix as a directory rather than
        // replacing its last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| BackendError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self { client, base_url })
    }

    /// Fetches autocomplete suggestions for a partial query.
    ///
    /// Calls `GET /search/autocomplete?q=<text>` and returns the prediction
    /// list, which may be empty.
    ///
    /// # Errors
    ///
    /// - [`BackendError::Http`] on network failure.
    /// - [`BackendError::UnexpectedStatus`] on a non-2xx response.
    /// - [`BackendError::Deserialize`] if the response does not match the
    ///   expected shape.
    pub async fn autocomplete(&self, text: &str) -> Result<Vec<SuggestionItem>, BackendError> {
        let mut url = self.endpoint_url("search/autocomplete");
        url.query_pairs_mut().append_pair("q", text);

        let body = self.get_json(url).await?;
        let envelope: AutocompleteResponse =
            serde_json::from_value(body).map_err(|e| BackendError::Deserialize {
                context: format!("autocomplete(q={text})"),
                source: e,
            })?;

        Ok(envelope.predictions)
    }

    /// Runs an authoritative place search.
    ///
    /// Calls `POST /search` with `{ "query": ... }`. Each returned place is
    /// normalized at this boundary (secondary-match metadata without a
    /// secondary coordinate is stripped). A backend-reported soft error
    /// yields an empty list, not an `Err`.
    ///
    /// # Errors
    ///
    /// - [`BackendError::Http`] on network failure.
    /// - [`BackendError::UnexpectedStatus`] on a non-2xx response.
    /// - [`BackendError::Deserialize`] if the response does not match the
    ///   expected shape.
    pub async fn search(&self, query: &str) -> Result<Vec<Place>, BackendError> {
        let url = self.endpoint_url("search");

        let response = self
            .client
            .post(url.clone())
            .json(&serde_json::json!({ "query": query }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body: serde_json::Value = response.json().await?;
        let envelope: SearchResponse =
            serde_json::from_value(body).map_err(|e| BackendError::Deserialize {
                context: format!("search(query={query})"),
                source: e,
            })?;

        if let Some(reason) = envelope.error {
            tracing::debug!(query, reason, "backend reported a soft search error");
        }

        Ok(envelope.places.into_iter().map(Place::normalized).collect())
    }

    /// Fetches provider credentials, consumed once at session start.
    ///
    /// An unsuccessful envelope degrades to empty keys; a provider without
    /// credentials never signals ready, which the controller tolerates.
    ///
    /// # Errors
    ///
    /// - [`BackendError::Http`] on network failure.
    /// - [`BackendError::UnexpectedStatus`] on a non-2xx response.
    /// - [`BackendError::Deserialize`] if the response does not match the
    ///   expected shape.
    pub async fn maps_keys(&self) -> Result<ProviderKeys, BackendError> {
        let url = self.endpoint_url("maps-keys");
        let body = self.get_json(url).await?;
        let envelope: MapsKeysResponse =
            serde_json::from_value(body).map_err(|e| BackendError::Deserialize {
                context: "maps-keys".to_owned(),
                source: e,
            })?;

        if !envelope.success {
            tracing::debug!("key provisioning unsuccessful; continuing without credentials");
            return Ok(ProviderKeys::default());
        }

        Ok(envelope.data.unwrap_or_default())
    }

    /// Resolve an endpoint path against the normalized base URL.
    fn endpoint_url(&self, path: &str) -> Url {
        // The base URL always ends with a slash, so join cannot fail for the
        // fixed relative paths used here.
        self.base_url
            .join(path)
            .unwrap_or_else(|_| self.base_url.clone())
    }

    async fn get_json(&self, url: Url) -> Result<serde_json::Value, BackendError> {
        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response.json().await?)
    }
}
