//! End-to-end tests for the reconciliation session: a wiremock backend, two
//! recording surfaces, and the real event loop with real timers.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc::UnboundedReceiver;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use placecheck_backend::BackendClient;
use placecheck_core::Coordinate;
use placecheck_reconcile::{
    Event, MapSurface, Marker, MarkerStyle, ProviderSide, Session, SessionConfig, SessionPhase,
    SurfaceFactory, DEFAULT_ZOOM, MAX_FIT_ZOOM,
};

const DEBOUNCE: Duration = Duration::from_millis(25);

/// One recorded surface operation.
#[derive(Debug, Clone, PartialEq)]
enum Op {
    Create { center: Coordinate, zoom: u8 },
    Recenter { center: Coordinate, zoom: Option<u8> },
    SetMarkers(Vec<Marker>),
    SetPath(Coordinate, Coordinate),
    ClearPath,
    FitBounds(Vec<Coordinate>, u32),
    SetZoom(u8),
}

struct RecordingSurface {
    ops: Arc<Mutex<Vec<Op>>>,
    zoom: u8,
}

impl RecordingSurface {
    fn record(&self, op: Op) {
        self.ops.lock().unwrap().push(op);
    }
}

impl MapSurface for RecordingSurface {
    fn recenter(&mut self, center: Coordinate, zoom: Option<u8>) {
        if let Some(z) = zoom {
            self.zoom = z;
        }
        self.record(Op::Recenter { center, zoom });
    }
    fn zoom(&self) -> u8 {
        self.zoom
    }
    fn set_zoom(&mut self, zoom: u8) {
        self.zoom = zoom;
        self.record(Op::SetZoom(zoom));
    }
    fn set_markers(&mut self, markers: &[Marker]) {
        self.record(Op::SetMarkers(markers.to_vec()));
    }
    fn set_path(&mut self, from: Coordinate, to: Coordinate) {
        self.record(Op::SetPath(from, to));
    }
    fn clear_path(&mut self) {
        self.record(Op::ClearPath);
    }
    fn fit_bounds(&mut self, points: &[Coordinate], padding_px: u32) {
        // Model an SDK that over-zooms when fitting near-identical points.
        self.zoom = 21;
        self.record(Op::FitBounds(points.to_vec(), padding_px));
    }
}

struct RecordingFactory {
    ops: Arc<Mutex<Vec<Op>>>,
    created: Arc<AtomicU32>,
}

impl SurfaceFactory for RecordingFactory {
    fn create(&self, center: Coordinate, zoom: u8) -> Box<dyn MapSurface> {
        self.created.fetch_add(1, Ordering::SeqCst);
        self.ops.lock().unwrap().push(Op::Create { center, zoom });
        Box::new(RecordingSurface {
            ops: Arc::clone(&self.ops),
            zoom,
        })
    }
}

struct Harness {
    session: Session,
    rx: UnboundedReceiver<Event>,
    server: MockServer,
    primary_ops: Arc<Mutex<Vec<Op>>>,
    secondary_ops: Arc<Mutex<Vec<Op>>>,
    primary_created: Arc<AtomicU32>,
    secondary_created: Arc<AtomicU32>,
}

impl Harness {
    async fn new() -> Self {
        let server = MockServer::start().await;
        let backend = BackendClient::with_base_url(&server.uri(), 5, "placecheck-test/0.1")
            .expect("client construction should not fail");

        let primary_ops = Arc::new(Mutex::new(Vec::new()));
        let secondary_ops = Arc::new(Mutex::new(Vec::new()));
        let primary_created = Arc::new(AtomicU32::new(0));
        let secondary_created = Arc::new(AtomicU32::new(0));

        let (session, rx) = Session::new(
            Arc::new(backend),
            Box::new(RecordingFactory {
                ops: Arc::clone(&primary_ops),
                created: Arc::clone(&primary_created),
            }),
            Box::new(RecordingFactory {
                ops: Arc::clone(&secondary_ops),
                created: Arc::clone(&secondary_created),
            }),
            SessionConfig {
                debounce: DEBOUNCE,
                min_query_chars: 2,
            },
        );

        Self {
            session,
            rx,
            server,
            primary_ops,
            secondary_ops,
            primary_created,
            secondary_created,
        }
    }

    /// Signal both SDKs loaded and both containers mounted.
    fn ready_both(&mut self) {
        for side in [ProviderSide::Primary, ProviderSide::Secondary] {
            self.session.process(Event::SdkLoaded(side));
            self.session.process(Event::ContainerMounted(side));
        }
    }

    /// Feed completion events back into the session until `total` elapses.
    async fn pump_for(&mut self, total: Duration) {
        let deadline = tokio::time::Instant::now() + total;
        loop {
            let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
            if remaining.is_zero() {
                break;
            }
            match tokio::time::timeout(remaining, self.rx.recv()).await {
                Ok(Some(event)) => self.session.process(event),
                Ok(None) | Err(_) => break,
            }
        }
    }

    fn primary_ops(&self) -> Vec<Op> {
        self.primary_ops.lock().unwrap().clone()
    }

    fn secondary_ops(&self) -> Vec<Op> {
        self.secondary_ops.lock().unwrap().clone()
    }
}

fn place_body(id: &str, with_secondary: bool, status: &str) -> serde_json::Value {
    let mut place = serde_json::json!({
        "name": "천상가옥",
        "address": "서울 성동구 연무장길 43",
        "place_id": id,
        "original": { "lat": 37.5440, "lng": 127.0550 },
        "corrected": { "lat": 37.5443, "lng": 127.0563 },
        "naver_location": null,
        "correction_distance_m": 119.4,
        "confidence": 0.92,
        "status": status,
        "status_confidence": 0.9,
        "status_reason": "교차검증 결과"
    });
    if with_secondary {
        place["naver_location"] = serde_json::json!({ "lat": 37.5444, "lng": 127.0565 });
        place["naver_name"] = serde_json::json!("천상가옥");
    }
    serde_json::json!({ "places": [place] })
}

async fn mount_search(server: &MockServer, needle: &str, body: serde_json::Value, delay: Duration) {
    Mock::given(method("POST"))
        .and(path("/search"))
        .and(body_string_contains(needle))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body).set_delay(delay))
        .mount(server)
        .await;
}

async fn mount_autocomplete(server: &MockServer) {
    let body = serde_json::json!({
        "predictions": [{
            "description": "천상가옥, 서울 성동구",
            "place_id": "ChIJ-abc",
            "main_text": "천상가옥"
        }]
    });
    Mock::given(method("GET"))
        .and(path("/search/autocomplete"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(server)
        .await;
}

async fn autocomplete_request_count(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.url.path() == "/search/autocomplete")
        .count()
}

#[tokio::test]
async fn short_input_clears_suggestions_and_issues_no_request() {
    let mut h = Harness::new().await;
    mount_autocomplete(&h.server).await;

    h.session.process(Event::InputChanged("천".to_owned()));
    h.pump_for(Duration::from_millis(150)).await;

    assert!(h.session.query().suggestions().is_empty());
    assert_eq!(autocomplete_request_count(&h.server).await, 0);
}

#[tokio::test]
async fn debounced_input_populates_suggestions() {
    let mut h = Harness::new().await;
    mount_autocomplete(&h.server).await;

    h.session.process(Event::InputChanged("천상".to_owned()));
    h.pump_for(Duration::from_millis(300)).await;

    assert_eq!(h.session.query().suggestions().len(), 1);
    assert_eq!(h.session.query().suggestions()[0].label, "천상가옥");
}

#[tokio::test]
async fn rapid_keystrokes_issue_a_single_request() {
    let mut h = Harness::new().await;
    mount_autocomplete(&h.server).await;

    // Three keystrokes inside one quiet period: only the last text fires.
    h.session.process(Event::InputChanged("천상".to_owned()));
    h.session.process(Event::InputChanged("천상가".to_owned()));
    h.session.process(Event::InputChanged("천상가옥".to_owned()));
    h.pump_for(Duration::from_millis(300)).await;

    assert_eq!(autocomplete_request_count(&h.server).await, 1);
    let requests = h.server.received_requests().await.unwrap();
    let query = requests
        .iter()
        .find(|r| r.url.path() == "/search/autocomplete")
        .and_then(|r| r.url.query_pairs().find(|(k, _)| k == "q").map(|(_, v)| v.into_owned()))
        .unwrap();
    assert_eq!(query, "천상가옥");
}

#[tokio::test]
async fn shrinking_below_min_chars_suppresses_pending_debounce() {
    let mut h = Harness::new().await;
    mount_autocomplete(&h.server).await;

    h.session.process(Event::InputChanged("천상".to_owned()));
    h.session.process(Event::InputChanged("천".to_owned()));
    h.pump_for(Duration::from_millis(300)).await;

    assert!(h.session.query().suggestions().is_empty());
    assert_eq!(autocomplete_request_count(&h.server).await, 0);
}

#[tokio::test]
async fn commit_cancels_pending_debounce() {
    let mut h = Harness::new().await;
    mount_autocomplete(&h.server).await;
    mount_search(
        &h.server,
        "천상",
        place_body("ChIJ-abc", true, "verified"),
        Duration::ZERO,
    )
    .await;

    // Commit lands while the debounce is still pending; its autocomplete
    // request must never be issued.
    h.session.process(Event::InputChanged("천상".to_owned()));
    h.session.process(Event::SearchRequested { text: None });
    h.pump_for(Duration::from_millis(300)).await;

    assert_eq!(autocomplete_request_count(&h.server).await, 0);
    assert_eq!(h.session.phase(), SessionPhase::Result);
    assert!(h.session.query().suggestions().is_empty());
}

#[tokio::test]
async fn blank_commit_is_a_noop() {
    let mut h = Harness::new().await;

    h.session.process(Event::SearchRequested {
        text: Some("   ".to_owned()),
    });
    assert_eq!(h.session.phase(), SessionPhase::Empty);

    h.pump_for(Duration::from_millis(100)).await;
    assert!(h.server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn search_renders_both_ready_surfaces() {
    let mut h = Harness::new().await;
    mount_search(
        &h.server,
        "천상가옥",
        place_body("ChIJ-abc", true, "verified"),
        Duration::ZERO,
    )
    .await;

    h.ready_both();
    h.session.process(Event::SearchRequested {
        text: Some("천상가옥".to_owned()),
    });
    assert_eq!(h.session.phase(), SessionPhase::Loading);
    h.pump_for(Duration::from_millis(300)).await;

    assert_eq!(h.session.phase(), SessionPhase::Result);
    assert_eq!(h.primary_created.load(Ordering::SeqCst), 1);
    assert_eq!(h.secondary_created.load(Ordering::SeqCst), 1);

    // Primary surface: created on the primary coordinate, one verdict-styled
    // point, no path while the correction is hidden.
    let primary = h.primary_ops();
    assert!(primary.contains(&Op::Create {
        center: Coordinate::new(37.5440, 127.0550),
        zoom: DEFAULT_ZOOM,
    }));
    assert!(primary.contains(&Op::SetMarkers(vec![Marker {
        position: Coordinate::new(37.5440, 127.0550),
        style: MarkerStyle::PrimaryOk,
    }])));
    assert!(!primary.iter().any(|op| matches!(op, Op::SetPath(..))));

    // Secondary surface: the provider-verified point.
    let secondary = h.secondary_ops();
    assert!(secondary.contains(&Op::SetMarkers(vec![Marker {
        position: Coordinate::new(37.5444, 127.0565),
        style: MarkerStyle::Verified,
    }])));
}

#[tokio::test]
async fn missing_secondary_coordinate_falls_back_with_distinct_style() {
    let mut h = Harness::new().await;
    mount_search(
        &h.server,
        "복순도가",
        place_body("ChIJ-fb", false, "warning"),
        Duration::ZERO,
    )
    .await;

    h.ready_both();
    h.session.process(Event::SearchRequested {
        text: Some("복순도가".to_owned()),
    });
    h.pump_for(Duration::from_millis(300)).await;

    let secondary = h.secondary_ops();
    assert!(secondary.contains(&Op::Create {
        center: Coordinate::new(37.5443, 127.0563),
        zoom: DEFAULT_ZOOM,
    }));
    assert!(
        secondary.contains(&Op::SetMarkers(vec![Marker {
            position: Coordinate::new(37.5443, 127.0563),
            style: MarkerStyle::Fallback,
        }])),
        "fallback must not be styled as provider-verified: {secondary:?}"
    );
}

#[tokio::test]
async fn correction_toggle_draws_and_clears_the_overlay() {
    let mut h = Harness::new().await;
    mount_search(
        &h.server,
        "천상가옥",
        place_body("ChIJ-abc", true, "warning"),
        Duration::ZERO,
    )
    .await;

    h.ready_both();
    h.session.process(Event::SearchRequested {
        text: Some("천상가옥".to_owned()),
    });
    h.pump_for(Duration::from_millis(300)).await;

    let primary = Coordinate::new(37.5440, 127.0550);
    let corrected = Coordinate::new(37.5443, 127.0563);

    h.primary_ops.lock().unwrap().clear();
    h.session.process(Event::CorrectionToggled);

    let revealed = h.primary_ops();
    assert!(revealed.contains(&Op::SetMarkers(vec![
        Marker {
            position: primary,
            style: MarkerStyle::PrimaryWarn,
        },
        Marker {
            position: corrected,
            style: MarkerStyle::Corrected,
        },
    ])));
    assert!(revealed.contains(&Op::SetPath(primary, corrected)));
    assert!(revealed
        .iter()
        .any(|op| matches!(op, Op::FitBounds(points, _) if points == &vec![primary, corrected])));
    // The recording SDK over-zooms on fit; the binding must clamp once.
    assert!(revealed.contains(&Op::SetZoom(MAX_FIT_ZOOM)));

    h.primary_ops.lock().unwrap().clear();
    h.session.process(Event::CorrectionToggled);

    let hidden = h.primary_ops();
    assert!(hidden.contains(&Op::SetMarkers(vec![Marker {
        position: primary,
        style: MarkerStyle::PrimaryWarn,
    }])));
    assert!(hidden.contains(&Op::ClearPath));
    assert!(
        hidden.contains(&Op::Recenter {
            center: primary,
            zoom: Some(DEFAULT_ZOOM),
        }),
        "hiding the correction must re-center at the default zoom: {hidden:?}"
    );
}

#[tokio::test]
async fn new_place_resets_the_correction_reveal() {
    let mut h = Harness::new().await;
    mount_search(
        &h.server,
        "천상가옥",
        place_body("ChIJ-abc", true, "verified"),
        Duration::ZERO,
    )
    .await;
    mount_search(
        &h.server,
        "복순도가",
        place_body("ChIJ-next", true, "verified"),
        Duration::ZERO,
    )
    .await;

    h.session.process(Event::SearchRequested {
        text: Some("천상가옥".to_owned()),
    });
    h.pump_for(Duration::from_millis(200)).await;
    h.session.process(Event::CorrectionToggled);
    assert!(h.session.selection().correction_revealed());

    h.session.process(Event::SearchRequested {
        text: Some("복순도가".to_owned()),
    });
    h.pump_for(Duration::from_millis(200)).await;

    assert_eq!(h.session.selection().place().unwrap().id, "ChIJ-next");
    assert!(!h.session.selection().correction_revealed());
}

#[tokio::test]
async fn out_of_order_responses_last_arrival_wins() {
    let mut h = Harness::new().await;
    // A responds slowly, B instantly: A's response arrives last and wins,
    // even though B was the later commit.
    mount_search(
        &h.server,
        "AAA",
        place_body("ChIJ-slow-a", true, "verified"),
        Duration::from_millis(250),
    )
    .await;
    mount_search(
        &h.server,
        "BBB",
        place_body("ChIJ-fast-b", true, "verified"),
        Duration::ZERO,
    )
    .await;

    h.session.process(Event::SearchRequested {
        text: Some("AAA".to_owned()),
    });
    h.session.process(Event::SearchRequested {
        text: Some("BBB".to_owned()),
    });
    h.pump_for(Duration::from_millis(700)).await;

    assert_eq!(h.session.phase(), SessionPhase::Result);
    assert_eq!(h.session.selection().place().unwrap().id, "ChIJ-slow-a");
}

#[tokio::test]
async fn response_after_clear_is_dropped() {
    let mut h = Harness::new().await;
    mount_search(
        &h.server,
        "천상가옥",
        place_body("ChIJ-late", true, "verified"),
        Duration::from_millis(250),
    )
    .await;

    h.ready_both();
    h.session.process(Event::SearchRequested {
        text: Some("천상가옥".to_owned()),
    });
    h.session.process(Event::SelectionCleared);
    h.pump_for(Duration::from_millis(600)).await;

    // The response belongs to a torn-down session: no resurrection.
    assert!(h.session.selection().place().is_none());
    assert_eq!(h.session.phase(), SessionPhase::Empty);
    assert!(!h.session.surface_created(ProviderSide::Primary));
    assert!(!h.session.surface_created(ProviderSide::Secondary));
}

#[tokio::test]
async fn clear_and_remount_builds_fresh_surface_instances() {
    let mut h = Harness::new().await;
    mount_search(
        &h.server,
        "천상가옥",
        place_body("ChIJ-abc", true, "verified"),
        Duration::ZERO,
    )
    .await;

    h.ready_both();
    h.session.process(Event::SearchRequested {
        text: Some("천상가옥".to_owned()),
    });
    h.pump_for(Duration::from_millis(300)).await;
    assert_eq!(h.primary_created.load(Ordering::SeqCst), 1);
    assert_eq!(h.secondary_created.load(Ordering::SeqCst), 1);

    // Clearing unmounts the result view; both containers go away.
    h.session.process(Event::SelectionCleared);
    h.session
        .process(Event::ContainerUnmounted(ProviderSide::Primary));
    h.session
        .process(Event::ContainerUnmounted(ProviderSide::Secondary));
    assert!(!h.session.surface_created(ProviderSide::Primary));

    h.session
        .process(Event::ContainerMounted(ProviderSide::Primary));
    h.session
        .process(Event::ContainerMounted(ProviderSide::Secondary));
    h.session.process(Event::SearchRequested {
        text: Some("천상가옥".to_owned()),
    });
    h.pump_for(Duration::from_millis(300)).await;

    assert_eq!(
        h.primary_created.load(Ordering::SeqCst),
        2,
        "remount must build a fresh instance, not reuse the old one"
    );
    assert_eq!(h.secondary_created.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn unready_provider_never_blocks_the_other() {
    let mut h = Harness::new().await;
    mount_search(
        &h.server,
        "천상가옥",
        place_body("ChIJ-abc", true, "verified"),
        Duration::ZERO,
    )
    .await;

    // Only the secondary provider ever becomes ready.
    h.session.process(Event::SdkLoaded(ProviderSide::Secondary));
    h.session
        .process(Event::ContainerMounted(ProviderSide::Secondary));
    h.session.process(Event::SearchRequested {
        text: Some("천상가옥".to_owned()),
    });
    h.pump_for(Duration::from_millis(300)).await;

    assert!(!h.session.surface_created(ProviderSide::Primary));
    assert!(h.session.surface_created(ProviderSide::Secondary));

    // The primary catching up later renders without a new search.
    h.session.process(Event::SdkLoaded(ProviderSide::Primary));
    h.session
        .process(Event::ContainerMounted(ProviderSide::Primary));
    assert!(h.session.surface_created(ProviderSide::Primary));
}

#[tokio::test]
async fn picking_a_suggestion_clears_the_list_synchronously() {
    let mut h = Harness::new().await;
    mount_autocomplete(&h.server).await;
    mount_search(
        &h.server,
        "천상가옥",
        place_body("ChIJ-abc", true, "verified"),
        Duration::from_millis(100),
    )
    .await;

    h.session.process(Event::InputChanged("천상".to_owned()));
    h.pump_for(Duration::from_millis(300)).await;
    assert_eq!(h.session.query().suggestions().len(), 1);

    let item = h.session.query().suggestions()[0].clone();
    h.session.process(Event::SuggestionPicked(item));

    // Cleared before the search response lands.
    assert!(h.session.query().suggestions().is_empty());
    assert_eq!(h.session.query().text(), "천상가옥");
    assert_eq!(h.session.phase(), SessionPhase::Loading);

    h.pump_for(Duration::from_millis(300)).await;
    assert_eq!(h.session.phase(), SessionPhase::Result);
    assert_eq!(h.session.selection().place().unwrap().id, "ChIJ-abc");
}

#[tokio::test]
async fn failed_follow_up_search_keeps_previous_result() {
    let mut h = Harness::new().await;
    mount_search(
        &h.server,
        "천상가옥",
        place_body("ChIJ-keep", true, "verified"),
        Duration::ZERO,
    )
    .await;
    mount_search(
        &h.server,
        "없는가게",
        serde_json::json!({ "places": [] }),
        Duration::ZERO,
    )
    .await;

    h.session.process(Event::SearchRequested {
        text: Some("천상가옥".to_owned()),
    });
    h.pump_for(Duration::from_millis(200)).await;
    assert_eq!(h.session.phase(), SessionPhase::Result);

    h.session.process(Event::SearchRequested {
        text: Some("없는가게".to_owned()),
    });
    assert_eq!(h.session.phase(), SessionPhase::Loading);
    h.pump_for(Duration::from_millis(200)).await;

    // Empty response: no selection change, back to the previous result.
    assert_eq!(h.session.phase(), SessionPhase::Result);
    assert_eq!(h.session.selection().place().unwrap().id, "ChIJ-keep");
}
