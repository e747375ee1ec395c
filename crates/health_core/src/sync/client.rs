//! Cliente de sincronização: mantém o snapshot exibido o mais recente
//! possível usando o feed ao vivo, com polling periódico como fallback.

use super::runtime::{LinkId, RequestId, SyncError, SyncEvent, SyncRuntime, TimerId};
use super::state::{transition, ConnectionState, LiveAction, LiveEvent};
use crate::config::{AppConfig, HealthThresholds};
use crate::protocol::{decode_snapshot, ProtocolError};
use crate::status::{assess, HealthReport, OverallStatus};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info, warn};

/// De onde veio uma atualização.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateSource {
    Live,
    Poll,
    Manual,
}

/// O que o callback de exibição recebe.
#[derive(Debug, Clone, PartialEq)]
pub struct HealthUpdate {
    pub source: UpdateSource,
    pub outcome: Result<HealthReport, SyncError>,
}

impl HealthUpdate {
    /// `Healthy`/`Degraded` do snapshot, ou `Error` se a leitura falhou.
    pub fn status(&self) -> OverallStatus {
        match &self.outcome {
            Ok(report) => report.status,
            Err(_) => OverallStatus::Error,
        }
    }

    pub fn report(&self) -> Option<&HealthReport> {
        self.outcome.as_ref().ok()
    }
}

/// Parâmetros já resolvidos do cliente.
#[derive(Debug, Clone)]
pub struct SyncSettings {
    pub feed_url: String,
    pub health_url: String,
    pub poll_interval: Duration,
    pub reconnect_delay: Duration,
    pub max_reconnect_attempts: u32,
    pub thresholds: HealthThresholds,
}

impl SyncSettings {
    pub fn from_config(config: &AppConfig) -> Result<Self, ProtocolError> {
        Ok(Self {
            feed_url: config.server.feed_url()?,
            health_url: config.server.health_url()?,
            poll_interval: config.sync.poll_interval(),
            reconnect_delay: config.sync.reconnect_delay(),
            max_reconnect_attempts: config.sync.max_reconnect_attempts,
            thresholds: config.thresholds.clone(),
        })
    }
}

type SnapshotCallback = Box<dyn FnMut(HealthUpdate) + Send>;

/// Cliente do feed de telemetria.
///
/// Todos os eventos passam por [`handle`](Self::handle), um de cada vez;
/// como tudo exige `&mut self`, o callback nunca é reentrado.
pub struct TelemetrySyncClient<R: SyncRuntime> {
    settings: SyncSettings,
    runtime: R,
    state: ConnectionState,
    running: bool,
    next_id: u64,
    link: Option<LinkId>,
    retry_timer: Option<TimerId>,
    poll_timer: Option<TimerId>,
    pending_pulls: HashMap<RequestId, UpdateSource>,
    on_snapshot: Option<SnapshotCallback>,
}

impl<R: SyncRuntime> TelemetrySyncClient<R> {
    pub fn new(settings: SyncSettings, runtime: R) -> Self {
        Self {
            settings,
            runtime,
            state: ConnectionState::Disconnected,
            running: false,
            next_id: 0,
            link: None,
            retry_timer: None,
            poll_timer: None,
            pending_pulls: HashMap::new(),
            on_snapshot: None,
        }
    }

    /// Registra o callback chamado a cada snapshot (feed ou polling).
    pub fn on_snapshot<F>(&mut self, callback: F)
    where
        F: FnMut(HealthUpdate) + Send + 'static,
    {
        self.on_snapshot = Some(Box::new(callback));
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn runtime(&self) -> &R {
        &self.runtime
    }

    /// Abre o feed, inicia o timer de polling e faz a primeira leitura.
    /// Chamadas repetidas não fazem nada.
    pub fn start(&mut self) {
        if self.running {
            return;
        }
        self.running = true;
        info!("Iniciando sincronização com {}", self.settings.feed_url);

        self.apply(LiveEvent::Start);
        self.schedule_poll();
        self.pull(UpdateSource::Poll);
    }

    /// Fecha o feed e cancela todos os timers. Pode ser chamado várias vezes.
    pub fn stop(&mut self) {
        self.apply(LiveEvent::Stop);
        if let Some(timer) = self.poll_timer.take() {
            self.runtime.cancel(timer);
        }
        self.pending_pulls.clear();
        if self.running {
            info!("Sincronização parada");
        }
        self.running = false;
    }

    /// Leitura manual avulsa; o resultado chega ao callback como o polling.
    pub fn refresh(&mut self) {
        self.pull(UpdateSource::Manual);
    }

    /// Processa um evento do runtime.
    pub fn handle(&mut self, event: SyncEvent) {
        match event {
            SyncEvent::FeedOpened(link) if self.is_current(link) => {
                info!("Feed ao vivo conectado");
                self.apply(LiveEvent::Opened);
            }
            SyncEvent::FeedMessage(link, text) if self.is_current(link) => {
                match decode_snapshot(&text) {
                    Ok(snapshot) => {
                        let report = assess(snapshot, &self.settings.thresholds);
                        self.emit(UpdateSource::Live, Ok(report));
                    }
                    Err(e) => warn!("Mensagem inválida no feed descartada: {e}"),
                }
            }
            SyncEvent::FeedClosed(link) if self.is_current(link) => {
                info!("Feed ao vivo desconectado");
                self.link = None;
                self.apply(LiveEvent::Lost);
            }
            SyncEvent::FeedError(link, e) if self.is_current(link) => {
                warn!("Erro no feed ao vivo: {e}");
                self.link = None;
                self.apply(LiveEvent::Lost);
            }
            SyncEvent::TimerFired(timer) if self.retry_timer == Some(timer) => {
                self.retry_timer = None;
                if let ConnectionState::Reconnecting(n) = self.state {
                    info!(
                        "Reconectando... ({n}/{})",
                        self.settings.max_reconnect_attempts
                    );
                }
                self.apply(LiveEvent::RetryDue);
            }
            SyncEvent::TimerFired(timer) if self.poll_timer == Some(timer) => {
                self.schedule_poll();
                self.pull(UpdateSource::Poll);
            }
            SyncEvent::PullCompleted(request, result) => {
                let Some(source) = self.pending_pulls.remove(&request) else {
                    debug!("Resposta de polling descartada ({request:?})");
                    return;
                };
                let outcome = result
                    .and_then(|body| decode_snapshot(&body).map_err(SyncError::from))
                    .map(|snapshot| assess(snapshot, &self.settings.thresholds));
                if let Err(e) = &outcome {
                    warn!("Falha ao buscar saúde: {e}");
                }
                self.emit(source, outcome);
            }
            other => debug!("Evento obsoleto ignorado: {other:?}"),
        }
    }

    fn is_current(&self, link: LinkId) -> bool {
        self.link == Some(link)
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn apply(&mut self, event: LiveEvent) {
        let max = self.settings.max_reconnect_attempts;
        let previous = self.state;
        let t = transition(previous, event, max);
        self.state = t.state;

        if previous != t.state {
            debug!("Feed: {previous:?} → {:?} ({event:?})", t.state);
        }
        if event == LiveEvent::Lost && t.state == ConnectionState::Disconnected {
            warn!("Feed ao vivo indisponível após {max} tentativas; usando só polling");
        }

        for action in t.actions {
            match action {
                LiveAction::OpenFeed => {
                    if let Some(old) = self.link.take() {
                        self.runtime.close_feed(old);
                    }
                    let link = LinkId(self.next_id());
                    self.runtime.open_feed(link, &self.settings.feed_url);
                    self.link = Some(link);
                }
                LiveAction::CloseFeed => {
                    if let Some(link) = self.link.take() {
                        self.runtime.close_feed(link);
                    }
                }
                LiveAction::ScheduleRetry => {
                    let timer = TimerId(self.next_id());
                    self.runtime.schedule(timer, self.settings.reconnect_delay);
                    self.retry_timer = Some(timer);
                }
                LiveAction::CancelRetry => {
                    if let Some(timer) = self.retry_timer.take() {
                        self.runtime.cancel(timer);
                    }
                }
            }
        }
    }

    fn schedule_poll(&mut self) {
        let timer = TimerId(self.next_id());
        self.runtime.schedule(timer, self.settings.poll_interval);
        self.poll_timer = Some(timer);
    }

    fn pull(&mut self, source: UpdateSource) {
        let request = RequestId(self.next_id());
        self.pending_pulls.insert(request, source);
        self.runtime.fetch(request, &self.settings.health_url);
    }

    fn emit(&mut self, source: UpdateSource, outcome: Result<HealthReport, SyncError>) {
        if let Some(callback) = self.on_snapshot.as_mut() {
            callback(HealthUpdate { source, outcome });
        }
    }
}
