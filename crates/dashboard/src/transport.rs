//! Runtime de threads para o cliente de sincronização.
//!
//! Cada efeito roda numa thread auxiliar (leitor do WebSocket, um timer,
//! um GET) e só devolve [`SyncEvent`] no channel da thread de
//! sincronização, que os entrega ao cliente um de cada vez.

use crossbeam_channel::{bounded, RecvTimeoutError, Sender};
use health_core::sync::{LinkId, RequestId, SyncError, SyncEvent, SyncRuntime, TimerId};
use std::collections::HashMap;
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;
use tracing::{debug, error};
use tungstenite::client::IntoClientRequest;
use tungstenite::stream::MaybeTlsStream;
use tungstenite::{Message, WebSocket};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

type FeedSocket = WebSocket<MaybeTlsStream<TcpStream>>;

/// Estado compartilhado entre o runtime e a thread leitora de um feed.
#[derive(Default)]
struct FeedShared {
    /// Fechamento pedido pelo cliente
    closed: AtomicBool,
    /// Thread leitora terminou
    finished: AtomicBool,
    /// Clone do socket TCP, usado para destravar a leitura no fechamento
    socket: Mutex<Option<TcpStream>>,
}

impl FeedShared {
    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        if let Ok(guard) = self.socket.lock() {
            if let Some(sock) = guard.as_ref() {
                let _ = sock.shutdown(Shutdown::Both);
            }
        }
    }
}

struct TimerHandle {
    /// Dropar o sender acorda a thread do timer sem disparar
    _cancel: Sender<()>,
    finished: Arc<AtomicBool>,
}

/// Implementação real de [`SyncRuntime`] com threads do sistema.
pub struct ThreadRuntime {
    events: Sender<SyncEvent>,
    http: reqwest::blocking::Client,
    feeds: HashMap<LinkId, Arc<FeedShared>>,
    timers: HashMap<TimerId, TimerHandle>,
}

impl ThreadRuntime {
    pub fn new(events: Sender<SyncEvent>, request_timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::blocking::Client::builder()
            .timeout(request_timeout)
            .build()?;

        Ok(Self {
            events,
            http,
            feeds: HashMap::new(),
            timers: HashMap::new(),
        })
    }

    fn report(&self, event: SyncEvent) {
        // Channel sem limite; só falha se a thread de sincronização acabou
        let _ = self.events.send(event);
    }
}

impl SyncRuntime for ThreadRuntime {
    fn open_feed(&mut self, link: LinkId, url: &str) {
        self.feeds.retain(|_, f| !f.finished.load(Ordering::SeqCst));

        let shared = Arc::new(FeedShared::default());
        let tx = self.events.clone();
        let url = url.to_string();
        let thread_shared = Arc::clone(&shared);

        let spawned = thread::Builder::new()
            .name(format!("feed-{}", link.0))
            .spawn(move || {
                feed_loop(link, &url, &thread_shared, &tx);
                thread_shared.finished.store(true, Ordering::SeqCst);
            });

        match spawned {
            Ok(_) => {
                self.feeds.insert(link, shared);
            }
            Err(e) => {
                error!("Falha ao criar thread do feed: {e}");
                self.report(SyncEvent::FeedError(link, e.to_string()));
            }
        }
    }

    fn close_feed(&mut self, link: LinkId) {
        if let Some(shared) = self.feeds.remove(&link) {
            debug!("Fechando feed {}", link.0);
            shared.close();
        }
    }

    fn schedule(&mut self, timer: TimerId, after: Duration) {
        self.timers.retain(|_, t| !t.finished.load(Ordering::SeqCst));

        let (cancel_tx, cancel_rx) = bounded::<()>(0);
        let finished = Arc::new(AtomicBool::new(false));
        let thread_finished = Arc::clone(&finished);
        let tx = self.events.clone();

        let spawned = thread::Builder::new()
            .name(format!("timer-{}", timer.0))
            .spawn(move || {
                // Cancelamento = sender dropado → Disconnected, sem disparo
                if let Err(RecvTimeoutError::Timeout) = cancel_rx.recv_timeout(after) {
                    let _ = tx.send(SyncEvent::TimerFired(timer));
                }
                thread_finished.store(true, Ordering::SeqCst);
            });

        match spawned {
            Ok(_) => {
                self.timers.insert(
                    timer,
                    TimerHandle {
                        _cancel: cancel_tx,
                        finished,
                    },
                );
            }
            Err(e) => error!("Falha ao criar thread de timer: {e}"),
        }
    }

    fn cancel(&mut self, timer: TimerId) {
        self.timers.remove(&timer);
    }

    fn fetch(&mut self, request: RequestId, url: &str) {
        let http = self.http.clone();
        let tx = self.events.clone();
        let url = url.to_string();

        let spawned = thread::Builder::new()
            .name(format!("pull-{}", request.0))
            .spawn(move || {
                let result = pull(&http, &url);
                let _ = tx.send(SyncEvent::PullCompleted(request, result));
            });

        if let Err(e) = spawned {
            error!("Falha ao criar thread de polling: {e}");
            self.report(SyncEvent::PullCompleted(
                request,
                Err(SyncError::Transport(e.to_string())),
            ));
        }
    }
}

impl Drop for ThreadRuntime {
    fn drop(&mut self) {
        for shared in self.feeds.values() {
            shared.close();
        }
        self.timers.clear();
    }
}

/// GET do endpoint de saúde. Qualquer status fora de 2xx é falha.
fn pull(http: &reqwest::blocking::Client, url: &str) -> Result<String, SyncError> {
    let response = http
        .get(url)
        .send()
        .map_err(|e| SyncError::Transport(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(SyncError::HttpStatus(status.as_u16()));
    }

    response
        .text()
        .map_err(|e| SyncError::Transport(e.to_string()))
}

/// Conecta e faz o handshake. O clone do TCP fica em `shared` para que
/// `close_feed` consiga interromper a thread a qualquer momento.
fn connect_feed(url: &str, shared: &FeedShared) -> Result<FeedSocket, String> {
    let request = url.into_client_request().map_err(|e| e.to_string())?;

    let uri = request.uri();
    let host = uri.host().ok_or_else(|| format!("URL sem host: {url}"))?;
    let default_port = if uri.scheme_str() == Some("wss") { 443 } else { 80 };
    let port = uri.port_u16().unwrap_or(default_port);

    let addr = (host, port)
        .to_socket_addrs()
        .map_err(|e| format!("Falha ao resolver {host}: {e}"))?
        .next()
        .ok_or_else(|| format!("Nenhum endereço para {host}"))?;

    let stream = TcpStream::connect_timeout(&addr, CONNECT_TIMEOUT).map_err(|e| e.to_string())?;
    let control = stream.try_clone().map_err(|e| e.to_string())?;
    if let Ok(mut guard) = shared.socket.lock() {
        *guard = Some(control);
    }
    if shared.is_closed() {
        let _ = stream.shutdown(Shutdown::Both);
        return Err("Conexão cancelada".into());
    }

    let (socket, _response) = tungstenite::client_tls(request, stream).map_err(|e| e.to_string())?;
    Ok(socket)
}

/// Thread leitora: um `FeedOpened`, N `FeedMessage` e no máximo um evento
/// de encerramento. Depois de `close_feed` não reporta nada.
fn feed_loop(link: LinkId, url: &str, shared: &FeedShared, tx: &Sender<SyncEvent>) {
    let mut socket = match connect_feed(url, shared) {
        Ok(socket) => socket,
        Err(e) => {
            if !shared.is_closed() {
                let _ = tx.send(SyncEvent::FeedError(link, e));
            }
            return;
        }
    };

    if shared.is_closed() {
        let _ = socket.close(None);
        return;
    }
    debug!("WebSocket conectado: {url}");
    let _ = tx.send(SyncEvent::FeedOpened(link));

    loop {
        match socket.read() {
            Ok(Message::Text(text)) => {
                if tx.send(SyncEvent::FeedMessage(link, text)).is_err() {
                    break;
                }
            }
            Ok(Message::Close(_)) => {
                if !shared.is_closed() {
                    let _ = tx.send(SyncEvent::FeedClosed(link));
                }
                break;
            }
            Ok(_) => {
                // Binário, ping, pong: nada a fazer
            }
            Err(tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed) => {
                if !shared.is_closed() {
                    let _ = tx.send(SyncEvent::FeedClosed(link));
                }
                break;
            }
            Err(e) => {
                if !shared.is_closed() {
                    let _ = tx.send(SyncEvent::FeedError(link, e.to_string()));
                }
                break;
            }
        }
    }
}
