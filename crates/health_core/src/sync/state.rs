//! Máquina de estados do feed ao vivo.
//!
//! Função pura: dado o estado atual e um evento, devolve o novo estado e as
//! ações que o cliente deve executar no runtime. Nada aqui toca em socket ou
//! timer.

/// Estado da conexão ao vivo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    /// Tentativa de reconexão `n` (1..=max) agendada ou em andamento.
    Reconnecting(u32),
}

impl ConnectionState {
    pub fn label(self) -> String {
        match self {
            ConnectionState::Disconnected => "Desconectado".into(),
            ConnectionState::Connecting => "Conectando".into(),
            ConnectionState::Connected => "Conectado".into(),
            ConnectionState::Reconnecting(n) => format!("Reconectando ({n})"),
        }
    }
}

/// Eventos que movem a máquina.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiveEvent {
    Start,
    Opened,
    /// Fechamento ou erro da conexão atual (inclusive falha ao abrir).
    Lost,
    /// Timer de reconexão disparou.
    RetryDue,
    Stop,
}

/// Efeitos pedidos ao runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiveAction {
    OpenFeed,
    CloseFeed,
    ScheduleRetry,
    CancelRetry,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: ConnectionState,
    pub actions: Vec<LiveAction>,
}

impl Transition {
    fn to(state: ConnectionState, actions: Vec<LiveAction>) -> Self {
        Self { state, actions }
    }

    fn stay(state: ConnectionState) -> Self {
        Self::to(state, Vec::new())
    }
}

/// Calcula a transição. `max_attempts` limita as reconexões; esgotadas,
/// o feed fica em `Disconnected` e só o polling continua.
pub fn transition(state: ConnectionState, event: LiveEvent, max_attempts: u32) -> Transition {
    use ConnectionState::*;
    use LiveAction::*;

    match (state, event) {
        (_, LiveEvent::Stop) => Transition::to(Disconnected, vec![CancelRetry, CloseFeed]),

        (Disconnected, LiveEvent::Start) => Transition::to(Connecting, vec![OpenFeed]),
        (_, LiveEvent::Start) => Transition::stay(state),

        (Connecting | Reconnecting(_), LiveEvent::Opened) => Transition::stay(Connected),
        (_, LiveEvent::Opened) => Transition::stay(state),

        (Connecting | Connected, LiveEvent::Lost) => {
            if max_attempts == 0 {
                Transition::stay(Disconnected)
            } else {
                Transition::to(Reconnecting(1), vec![ScheduleRetry])
            }
        }
        (Reconnecting(n), LiveEvent::Lost) => {
            if n < max_attempts {
                Transition::to(Reconnecting(n + 1), vec![ScheduleRetry])
            } else {
                Transition::stay(Disconnected)
            }
        }
        (Disconnected, LiveEvent::Lost) => Transition::stay(state),

        (Reconnecting(_), LiveEvent::RetryDue) => Transition::to(state, vec![OpenFeed]),
        (_, LiveEvent::RetryDue) => Transition::stay(state),
    }
}

#[cfg(test)]
mod tests {
    use super::ConnectionState::*;
    use super::*;

    #[test]
    fn start_opens_once() {
        assert_eq!(
            transition(Disconnected, LiveEvent::Start, 5),
            Transition::to(Connecting, vec![LiveAction::OpenFeed])
        );
        assert_eq!(transition(Connecting, LiveEvent::Start, 5), Transition::stay(Connecting));
        assert_eq!(transition(Connected, LiveEvent::Start, 5), Transition::stay(Connected));
    }

    #[test]
    fn open_success_connects() {
        assert_eq!(transition(Connecting, LiveEvent::Opened, 5).state, Connected);
        assert_eq!(transition(Reconnecting(4), LiveEvent::Opened, 5).state, Connected);
    }

    #[test]
    fn loss_schedules_first_retry() {
        for from in [Connecting, Connected] {
            assert_eq!(
                transition(from, LiveEvent::Lost, 5),
                Transition::to(Reconnecting(1), vec![LiveAction::ScheduleRetry])
            );
        }
    }

    #[test]
    fn retries_count_up_to_max_then_stop() {
        let mut state = Connected;
        let mut scheduled = 0;
        loop {
            let t = transition(state, LiveEvent::Lost, 3);
            state = t.state;
            if t.actions.contains(&LiveAction::ScheduleRetry) {
                scheduled += 1;
                let retry = transition(state, LiveEvent::RetryDue, 3);
                assert_eq!(retry.actions, vec![LiveAction::OpenFeed]);
            } else {
                break;
            }
        }
        assert_eq!(scheduled, 3);
        assert_eq!(state, Disconnected);
        // Esgotado: nada mais acontece sozinho
        assert_eq!(transition(state, LiveEvent::Lost, 3), Transition::stay(Disconnected));
        assert_eq!(transition(state, LiveEvent::RetryDue, 3), Transition::stay(Disconnected));
    }

    #[test]
    fn zero_attempts_never_retries() {
        assert_eq!(transition(Connected, LiveEvent::Lost, 0), Transition::stay(Disconnected));
    }

    #[test]
    fn stop_always_cleans_up() {
        for from in [Disconnected, Connecting, Connected, Reconnecting(2)] {
            let t = transition(from, LiveEvent::Stop, 5);
            assert_eq!(t.state, Disconnected);
            assert_eq!(t.actions, vec![LiveAction::CancelRetry, LiveAction::CloseFeed]);
        }
    }

    #[test]
    fn stray_events_are_ignored() {
        assert_eq!(transition(Disconnected, LiveEvent::Opened, 5), Transition::stay(Disconnected));
        assert_eq!(transition(Connected, LiveEvent::RetryDue, 5), Transition::stay(Connected));
    }
}
