//! Command handlers for the CLI.
//!
//! Each handler builds what it needs from the loaded config, drives the
//! reconciliation session (or the backend client directly), and prints the
//! outcome. Backend soft failures follow the product's error model: degrade
//! and report, never abort with a stack trace.

use std::sync::Arc;
use std::time::Duration;

use placecheck_backend::BackendClient;
use placecheck_core::{directions_url, AppConfig, Place};
use placecheck_reconcile::{Event, ProviderSide, Session, SessionConfig, SessionPhase};

use crate::console::ConsoleFactory;

/// How long to wait for a suggestion round trip before giving up.
const SUGGEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Search for a place, render both surfaces, and print the verdict card.
pub(crate) async fn run_search(
    config: &AppConfig,
    query: &str,
    reveal: bool,
) -> anyhow::Result<()> {
    let backend = Arc::new(BackendClient::new(config)?);

    // Key provisioning happens once at session start. The console surfaces
    // need no credentials, so missing keys are reported but do not stop the
    // comparison the way an unprovisioned embedded SDK would.
    match backend.maps_keys().await {
        Ok(keys) => {
            tracing::info!(
                primary_provisioned = keys.google_maps_key.is_some(),
                secondary_provisioned = keys.naver_client_id.is_some(),
                "provider credentials fetched"
            );
        }
        Err(error) => tracing::warn!(%error, "key provisioning failed; continuing without"),
    }

    let (mut session, mut rx) = Session::new(
        Arc::clone(&backend),
        Box::new(ConsoleFactory::new(ProviderSide::Primary)),
        Box::new(ConsoleFactory::new(ProviderSide::Secondary)),
        SessionConfig::from_app_config(config),
    );

    for side in [ProviderSide::Primary, ProviderSide::Secondary] {
        session.process(Event::SdkLoaded(side));
        session.process(Event::ContainerMounted(side));
    }

    session.process(Event::SearchRequested {
        text: Some(query.to_owned()),
    });
    while session.phase() == SessionPhase::Loading {
        let Some(event) = rx.recv().await else { break };
        session.process(event);
    }

    let Some(place) = session.selection().place().cloned() else {
        println!("no result for \"{query}\"");
        return Ok(());
    };

    print_verdict_card(&place);

    if reveal {
        println!("correction overlay:");
        session.process(Event::CorrectionToggled);
    }

    println!("directions: {}", directions_url(&place));
    Ok(())
}

/// Fetch autocomplete suggestions through the session's debounce path.
pub(crate) async fn run_suggest(config: &AppConfig, text: &str) -> anyhow::Result<()> {
    let backend = Arc::new(BackendClient::new(config)?);
    let (mut session, mut rx) = Session::new(
        backend,
        Box::new(ConsoleFactory::new(ProviderSide::Primary)),
        Box::new(ConsoleFactory::new(ProviderSide::Secondary)),
        SessionConfig::from_app_config(config),
    );

    session.process(Event::InputChanged(text.to_owned()));

    let deadline = tokio::time::Instant::now() + SUGGEST_TIMEOUT;
    loop {
        let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
        if remaining.is_zero() {
            break;
        }
        match tokio::time::timeout(remaining, rx.recv()).await {
            Ok(Some(event)) => {
                let finished = matches!(event, Event::SuggestionsLoaded { .. });
                session.process(event);
                if finished {
                    break;
                }
            }
            Ok(None) | Err(_) => break,
        }
    }

    let suggestions = session.query().suggestions();
    if suggestions.is_empty() {
        println!("no suggestions for \"{text}\"");
        return Ok(());
    }
    for item in suggestions {
        println!("{}\t{}", item.label, item.full_description);
    }
    Ok(())
}

/// Report which provider credentials the backend provisions.
pub(crate) async fn run_keys(config: &AppConfig) -> anyhow::Result<()> {
    let backend = BackendClient::new(config)?;
    let keys = backend.maps_keys().await?;

    let describe = |present: bool| if present { "provisioned" } else { "absent" };
    println!("primary provider key:   {}", describe(keys.google_maps_key.is_some()));
    println!(
        "secondary provider id:  {}",
        describe(keys.naver_client_id.is_some())
    );
    Ok(())
}

fn print_verdict_card(place: &Place) {
    println!("{}", place.name);
    println!("{}", place.address);

    if let Some(verdict) = place.verdict {
        let label = match verdict {
            placecheck_core::Verdict::Confirmed => "confirmed open",
            placecheck_core::Verdict::Uncertain => "possibly moved",
            placecheck_core::Verdict::LikelyGone => "likely closed",
        };
        let confidence = place
            .verdict_confidence
            .map_or(String::new(), |c| format!(" ({:.0}%)", c * 100.0));
        println!("verdict: {label}{confidence}");
        if let Some(reason) = &place.verdict_reason {
            println!("reason:  {reason}");
        }
    } else {
        println!("verdict: unavailable");
    }

    println!("primary:   {}", place.primary);
    println!(
        "corrected: {}  ({:.1} m off, confidence {:.0}%)",
        place.corrected,
        place.correction_distance_m,
        place.confidence * 100.0
    );

    match place.secondary {
        Some(coord) => {
            let similarity = place
                .secondary_match
                .name_similarity
                .map_or(String::new(), |s| format!(" (similarity {:.0}%)", s * 100.0));
            let matched = place
                .secondary_match
                .name
                .as_deref()
                .map_or(String::new(), |n| format!("  matched \"{n}\"{similarity}"));
            println!("secondary: {coord}{matched}");
        }
        None => println!("secondary: not matched"),
    }
}
