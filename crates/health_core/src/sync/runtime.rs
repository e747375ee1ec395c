//! Interface de capacidades usada pelo cliente: abrir/fechar o feed,
//! agendar/cancelar timers e fazer o GET de polling.
//!
//! O runtime executa os efeitos e devolve os resultados como [`SyncEvent`],
//! que o dono do cliente entrega em ordem a
//! [`TelemetrySyncClient::handle`](super::TelemetrySyncClient::handle).

use crate::protocol::ProtocolError;
use std::time::Duration;

/// Identifica uma conexão do feed ao vivo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LinkId(pub u64);

/// Identifica um timer agendado.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

/// Identifica uma requisição de polling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(pub u64);

/// Erros de sincronização entregues ao callback.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SyncError {
    #[error("Falha de transporte: {0}")]
    Transport(String),

    #[error("Servidor respondeu HTTP {0}")]
    HttpStatus(u16),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

/// Eventos produzidos pelo runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncEvent {
    FeedOpened(LinkId),
    /// Mensagem de texto recebida no feed.
    FeedMessage(LinkId, String),
    FeedClosed(LinkId),
    FeedError(LinkId, String),
    TimerFired(TimerId),
    /// Corpo da resposta 2xx, ou o erro.
    PullCompleted(RequestId, Result<String, SyncError>),
}

/// Efeitos colaterais do cliente.
///
/// Todas as chamadas retornam imediatamente; o resultado chega depois como
/// [`SyncEvent`]. `close_feed` e `cancel` com ids desconhecidos são no-op.
pub trait SyncRuntime {
    /// Começa a abrir o feed. Resulta em `FeedOpened` ou `FeedError`/`FeedClosed`.
    fn open_feed(&mut self, link: LinkId, url: &str);

    /// Fecha o feed. Eventos de `link` ainda na fila são ignorados pelo cliente.
    fn close_feed(&mut self, link: LinkId);

    /// Agenda `TimerFired(timer)` para daqui a `after`.
    fn schedule(&mut self, timer: TimerId, after: Duration);

    /// Cancela o timer; ele não dispara mais.
    fn cancel(&mut self, timer: TimerId);

    /// Faz `GET url`. Resulta em `PullCompleted(request, ..)`.
    fn fetch(&mut self, request: RequestId, url: &str);
}
