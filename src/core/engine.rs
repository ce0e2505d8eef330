//! Market state engine: the handle the presentation layer talks to.
//!
//! The engine owns the session, the acquisition pipeline and the scheduler.
//! Presentation never awaits an acquisition; it watches [`DashboardView`]
//! through [`MarketEngine::subscribe`] and calls the actions below.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex as StdMutex, Weak};

use tokio::sync::{watch, Mutex, RwLock};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::audio::backend::AudioBackend;
use crate::audio::synth::ToneSynthesizer;
use crate::audio::voice::Cue;
use crate::config::EngineConfig;
use crate::core::scheduler::MarketScheduler;
use crate::core::session::{EngineSession, SessionMode};
use crate::error::{AcquisitionError, EngineError};
use crate::models::snapshot::{MarketSnapshot, MarketState};
use crate::services::demo::DemoCycle;
use crate::services::gap_api::GapApiClient;
use crate::services::market_data::SnapshotSource;
use crate::signals::transition::TransitionDetector;

/// Everything the presentation layer renders.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub mode: SessionMode,
    pub endpoint: Option<String>,
    /// Last good snapshot. A failed acquisition never clears it.
    pub snapshot: Option<MarketSnapshot>,
    pub error: Option<AcquisitionError>,
    pub loading: bool,
    pub audio_enabled: bool,
}

impl Default for DashboardView {
    fn default() -> Self {
        Self {
            mode: SessionMode::Idle,
            endpoint: None,
            snapshot: None,
            error: None,
            loading: false,
            audio_enabled: false,
        }
    }
}

impl DashboardView {
    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(AcquisitionError::category)
    }

    pub fn state(&self) -> Option<MarketState> {
        self.snapshot.as_ref().map(|s| s.state)
    }
}

/// Acquisition state guarded by one lock: holding it is what makes an
/// acquisition "in flight".
struct Pipeline {
    source: Arc<dyn SnapshotSource>,
    detector: TransitionDetector,
    demo: DemoCycle,
}

struct EngineInner {
    config: EngineConfig,
    session: RwLock<EngineSession>,
    pipeline: Mutex<Pipeline>,
    synth: ToneSynthesizer,
    scheduler: MarketScheduler,
    tasks: StdMutex<JoinSet<()>>,
    view: watch::Sender<DashboardView>,
    torn_down: AtomicBool,
}

#[derive(Clone)]
pub struct MarketEngine {
    inner: Arc<EngineInner>,
}

impl MarketEngine {
    pub fn new(
        config: EngineConfig,
        source: Arc<dyn SnapshotSource>,
        backend: Arc<dyn AudioBackend>,
    ) -> Self {
        let (view, _) = watch::channel(DashboardView::default());
        Self {
            inner: Arc::new(EngineInner {
                config,
                session: RwLock::new(EngineSession::new()),
                pipeline: Mutex::new(Pipeline {
                    source,
                    detector: TransitionDetector::new(),
                    demo: DemoCycle::new(),
                }),
                synth: ToneSynthesizer::new(backend),
                scheduler: MarketScheduler::new(),
                tasks: StdMutex::new(JoinSet::new()),
                view,
                torn_down: AtomicBool::new(false),
            }),
        }
    }

    /// Engine backed by the HTTP source, using the configured timeout.
    pub fn with_http_source(config: EngineConfig, backend: Arc<dyn AudioBackend>) -> Self {
        let source = GapApiClient::with_client(reqwest::Client::new(), config.request_timeout);
        Self::new(config, Arc::new(source), backend)
    }

    pub fn config(&self) -> EngineConfig {
        self.inner.config
    }

    pub fn view(&self) -> DashboardView {
        self.inner.view.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<DashboardView> {
        self.inner.view.subscribe()
    }

    pub async fn mode(&self) -> SessionMode {
        self.inner.session.read().await.mode()
    }

    pub fn audio_enabled(&self) -> bool {
        self.inner.synth.is_enabled()
    }

    pub fn set_audio_enabled(&self, enabled: bool) {
        self.inner.synth.set_enabled(enabled);
        self.inner.view.send_modify(|v| v.audio_enabled = enabled);
        info!(enabled, "MarketEngine: audio toggled");
    }

    /// Configure the live endpoint. Rejected once the session has started.
    pub async fn set_endpoint(&self, endpoint: &str) -> Result<(), EngineError> {
        let mut session = self.inner.session.write().await;
        session.set_endpoint(endpoint)?;
        let endpoint = session.endpoint().map(str::to_string);
        drop(session);

        info!(endpoint = ?endpoint, "MarketEngine: endpoint configured");
        self.inner.view.send_modify(|v| v.endpoint = endpoint);
        Ok(())
    }

    /// Consent action: start polling the configured endpoint.
    pub async fn start_live(&self) -> Result<(), EngineError> {
        self.begin(SessionMode::Live).await?;
        let period = self.inner.config.poll_interval;
        let weak = Arc::downgrade(&self.inner);
        self.inner
            .scheduler
            .start("live-poll", period, move || {
                let engine = upgrade(&weak);
                async move {
                    if let Some(engine) = engine {
                        engine.acquire().await;
                    }
                }
            })
            .await;
        Ok(())
    }

    /// Consent action: loop over the demo scenarios instead of the network.
    pub async fn start_demo(&self) -> Result<(), EngineError> {
        self.begin(SessionMode::Demo).await?;
        let period = self.inner.config.demo_interval;
        let weak = Arc::downgrade(&self.inner);
        self.inner
            .scheduler
            .start("demo-cycle", period, move || {
                let engine = upgrade(&weak);
                async move {
                    if let Some(engine) = engine {
                        engine.advance_demo().await;
                    }
                }
            })
            .await;
        Ok(())
    }

    async fn begin(&self, mode: SessionMode) -> Result<(), EngineError> {
        if self.is_shut_down() {
            return Err(EngineError::ShutDown);
        }
        self.inner.session.write().await.begin(mode)?;

        info!(mode = ?mode, "MarketEngine: session started");
        self.inner.synth.set_enabled(true);
        self.inner.view.send_modify(|v| {
            v.mode = mode;
            v.audio_enabled = true;
        });
        self.spawn_cue(Cue::Welcome);
        Ok(())
    }

    /// Manual retry: acquire now, off the interval, without blocking the
    /// caller. Skipped if an acquisition is already in flight.
    pub async fn retry(&self) -> Result<(), EngineError> {
        match self.mode().await {
            SessionMode::Idle => Err(EngineError::NotStarted),
            SessionMode::Demo => {
                debug!("MarketEngine: retry ignored in demo mode");
                Ok(())
            }
            SessionMode::Live => {
                let engine = self.clone();
                self.spawn_task(async move {
                    match engine.inner.pipeline.try_lock() {
                        Ok(pipeline) => engine.acquire_with(pipeline).await,
                        Err(_) => debug!("MarketEngine: acquisition in flight, retry skipped"),
                    }
                });
                Ok(())
            }
        }
    }

    /// Acquire now and wait for the result to be published.
    pub async fn refresh(&self) -> Result<(), EngineError> {
        match self.mode().await {
            SessionMode::Idle => Err(EngineError::NotStarted),
            SessionMode::Demo => Ok(()),
            SessionMode::Live => {
                self.acquire().await;
                Ok(())
            }
        }
    }

    /// Teardown: stops the scheduler and aborts pending cues and retries.
    /// Acquisitions already waiting on the pipeline are dropped unfetched.
    pub async fn shutdown(&self) {
        if self.inner.torn_down.swap(true, Ordering::SeqCst) {
            return;
        }
        self.inner.scheduler.stop().await;
        if let Ok(mut tasks) = self.inner.tasks.lock() {
            tasks.abort_all();
        }
        self.inner.view.send_modify(|v| v.loading = false);
        info!("MarketEngine: shut down");
    }

    pub fn is_shut_down(&self) -> bool {
        self.inner.torn_down.load(Ordering::SeqCst)
    }

    async fn acquire(&self) {
        let pipeline = self.inner.pipeline.lock().await;
        self.acquire_with(pipeline).await;
    }

    async fn acquire_with(&self, mut pipeline: tokio::sync::MutexGuard<'_, Pipeline>) {
        // A caller may have been waiting on the lock across teardown.
        if self.is_shut_down() {
            debug!("MarketEngine: torn down, acquisition dropped");
            return;
        }
        let endpoint = match self.inner.session.read().await.endpoint() {
            Some(endpoint) => endpoint.to_string(),
            None => return,
        };

        self.inner.view.send_modify(|v| v.loading = true);
        let result = pipeline.source.fetch_snapshot(&endpoint).await;

        if self.is_shut_down() {
            drop(pipeline);
            debug!("MarketEngine: torn down during fetch, result discarded");
            self.inner.view.send_modify(|v| v.loading = false);
            return;
        }

        match result {
            Ok(snapshot) => {
                let cue = pipeline.detector.on_snapshot(&snapshot);
                drop(pipeline);
                self.publish(snapshot, cue);
            }
            Err(e) => {
                drop(pipeline);
                warn!(
                    endpoint = %endpoint,
                    error = %e,
                    "MarketEngine: acquisition failed, keeping last snapshot"
                );
                self.inner.view.send_modify(|v| {
                    v.error = Some(e);
                    v.loading = false;
                });
            }
        }
    }

    async fn advance_demo(&self) {
        let mut pipeline = self.inner.pipeline.lock().await;
        if self.is_shut_down() {
            return;
        }
        let snapshot = pipeline.demo.next_snapshot();
        let cue = pipeline.detector.on_snapshot(&snapshot);
        drop(pipeline);
        self.publish(snapshot, cue);
    }

    fn publish(&self, snapshot: MarketSnapshot, cue: Option<Cue>) {
        debug!(
            gap = %snapshot.gap_percent,
            state = %snapshot.state,
            "MarketEngine: snapshot published"
        );
        self.inner.view.send_modify(|v| {
            v.snapshot = Some(snapshot);
            v.error = None;
            v.loading = false;
        });
        if let Some(cue) = cue {
            self.spawn_cue(cue);
        }
    }

    fn spawn_cue(&self, cue: Cue) {
        let synth = self.inner.synth.clone();
        self.spawn_task(async move { synth.play(cue).await });
    }

    fn spawn_task<F>(&self, task: F)
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        match self.inner.tasks.lock() {
            Ok(mut tasks) => {
                // Checked under the lock so `shutdown` cannot abort the set
                // between the check and the spawn.
                if self.is_shut_down() {
                    return;
                }
                while tasks.try_join_next().is_some() {}
                tasks.spawn(task);
            }
            Err(e) => warn!(error = %e, "MarketEngine: task set poisoned"),
        }
    }
}

fn upgrade(weak: &Weak<EngineInner>) -> Option<MarketEngine> {
    weak.upgrade().map(|inner| MarketEngine { inner })
}
