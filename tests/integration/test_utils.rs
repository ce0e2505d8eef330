use std::sync::Arc;

use gapwatch::audio::{Cue, RecordingBackend};
use gapwatch::config::EngineConfig;
use gapwatch::{DashboardView, MarketEngine};
use tokio::sync::watch;
use tokio::time::{sleep, timeout, Duration, Instant};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const GAP_PATH: &str = "/api/brecha";

/// Engine wired to a recording audio backend.
#[allow(dead_code)]
pub struct TestEngine {
    pub engine: MarketEngine,
    pub audio: RecordingBackend,
}

impl TestEngine {
    pub fn new(config: EngineConfig) -> Self {
        let audio = RecordingBackend::new();
        let engine = MarketEngine::with_http_source(config, Arc::new(audio.clone()));
        Self { engine, audio }
    }

    /// Wait until `count` cues have finished playing.
    #[allow(dead_code)]
    pub async fn wait_for_cues(&self, count: usize) -> Vec<Cue> {
        let deadline = Instant::now() + Duration::from_secs(5);
        while self.audio.played().len() < count && Instant::now() < deadline {
            sleep(Duration::from_millis(10)).await;
        }
        self.audio.played()
    }
}

/// Wait for a view matching `predicate`.
#[allow(dead_code)]
pub async fn wait_for_view<F>(rx: &mut watch::Receiver<DashboardView>, predicate: F) -> DashboardView
where
    F: Fn(&DashboardView) -> bool,
{
    timeout(Duration::from_secs(5), async {
        loop {
            {
                let view = rx.borrow_and_update();
                if predicate(&view) {
                    return view.clone();
                }
            }
            rx.changed().await.expect("engine dropped");
        }
    })
    .await
    .expect("timed out waiting for view")
}

pub fn gap_body(gap_percent: &str) -> serde_json::Value {
    serde_json::json!({
        "analisis": {
            "precio_pivote_bcv": "36,52",
            "precio_paralelo_usdt": "41,10",
            "brecha_bs": "4,58",
            "brecha_porcentaje": gap_percent
        },
        "timestamp": "17/10/2026 09:30"
    })
}

pub async fn mock_gap(server: &MockServer, gap_percent: &str) {
    Mock::given(method("GET"))
        .and(path(GAP_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(gap_body(gap_percent)))
        .mount(server)
        .await;
}

pub fn endpoint(server: &MockServer) -> String {
    format!("{}{}", server.uri(), GAP_PATH)
}
