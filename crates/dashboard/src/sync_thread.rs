//! Thread de sincronização: dona do [`TelemetrySyncClient`], processa os
//! eventos do runtime em ordem e envia as atualizações para a UI via channel.

use crate::transport::ThreadRuntime;
use crossbeam_channel::{bounded, select, unbounded, Receiver, Sender, TrySendError};
use health_core::sync::{ConnectionState, HealthUpdate, SyncSettings, TelemetrySyncClient};
use std::thread::JoinHandle;
use std::time::Duration;
use tracing::{debug, error, info};

/// Lado da UI: atualizações de saúde e o estado do feed ao vivo.
///
/// `connection` tem capacidade 1 e guarda sempre o estado mais recente.
pub struct SyncReceivers {
    pub updates: Receiver<HealthUpdate>,
    pub connection: Receiver<ConnectionState>,
}

impl SyncReceivers {
    /// Receivers que nunca entregam nada (sincronização indisponível).
    pub fn never() -> Self {
        Self {
            updates: crossbeam_channel::never(),
            connection: crossbeam_channel::never(),
        }
    }
}

/// Lado da thread: cada sender guarda um clone do receiver para descartar
/// a mensagem mais antiga quando a UI atrasa.
struct UiSenders {
    updates: (Sender<HealthUpdate>, Receiver<HealthUpdate>),
    connection: (Sender<ConnectionState>, Receiver<ConnectionState>),
}

enum Command {
    Refresh,
    Shutdown,
}

/// Controle da thread. Dropar o handle para o cliente e espera a thread.
pub struct SyncHandle {
    commands: Sender<Command>,
    thread: Option<JoinHandle<()>>,
}

impl SyncHandle {
    /// Pede uma leitura manual.
    pub fn refresh(&self) {
        let _ = self.commands.send(Command::Refresh);
    }
}

impl Drop for SyncHandle {
    fn drop(&mut self) {
        let _ = self.commands.send(Command::Shutdown);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

/// Inicia a thread de sincronização. Retorna o handle e os receivers da UI.
pub fn spawn_sync_thread(
    settings: SyncSettings,
    request_timeout: Duration,
) -> std::io::Result<(SyncHandle, SyncReceivers)> {
    let (update_tx, update_rx) = bounded::<HealthUpdate>(64); // Buffer de 64 leituras
    let (conn_tx, conn_rx) = bounded::<ConnectionState>(1);
    let (cmd_tx, cmd_rx) = unbounded::<Command>();

    let senders = UiSenders {
        updates: (update_tx, update_rx.clone()),
        connection: (conn_tx, conn_rx.clone()),
    };

    let thread = std::thread::Builder::new()
        .name("health-sync".into())
        .spawn(move || {
            sync_loop(settings, request_timeout, senders, &cmd_rx);
        })?;

    Ok((
        SyncHandle {
            commands: cmd_tx,
            thread: Some(thread),
        },
        SyncReceivers {
            updates: update_rx,
            connection: conn_rx,
        },
    ))
}

/// Envia sem bloquear. Com o channel cheio, descarta a mensagem mais antiga:
/// a mais nova sempre entra, já que esta thread é o único produtor.
fn send_latest<T>(channel: &(Sender<T>, Receiver<T>), msg: T) {
    let (tx, drain) = channel;
    match tx.try_send(msg) {
        Ok(()) => {}
        Err(TrySendError::Full(msg)) => {
            debug!("UI atrasada, descartando mensagem mais antiga");
            let _ = drain.try_recv();
            let _ = tx.try_send(msg);
        }
        Err(TrySendError::Disconnected(_)) => {}
    }
}

fn sync_loop(
    settings: SyncSettings,
    request_timeout: Duration,
    senders: UiSenders,
    cmd_rx: &Receiver<Command>,
) {
    let (event_tx, event_rx) = unbounded();
    let runtime = match ThreadRuntime::new(event_tx, request_timeout) {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Falha ao criar cliente HTTP: {e}");
            return;
        }
    };

    let UiSenders { updates, connection } = senders;
    let mut client = TelemetrySyncClient::new(settings, runtime);
    client.on_snapshot(move |update| send_latest(&updates, update));

    client.start();
    let mut last_state = client.state();
    send_latest(&connection, last_state);

    loop {
        select! {
            recv(event_rx) -> event => match event {
                Ok(event) => client.handle(event),
                Err(_) => break,
            },
            recv(cmd_rx) -> cmd => match cmd {
                Ok(Command::Refresh) => client.refresh(),
                Ok(Command::Shutdown) | Err(_) => break,
            },
        }

        let state = client.state();
        if state != last_state {
            last_state = state;
            send_latest(&connection, state);
        }
    }

    client.stop();
    info!("Thread de sincronização encerrada");
}
