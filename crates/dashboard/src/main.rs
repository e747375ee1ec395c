//! # Health Dashboard
//!
//! Painel de saúde do sistema em tempo real com GUI acelerada por GPU via
//! eframe/egui.
//!
//! Recebe snapshots do servidor pelo WebSocket `/ws/system-stream` e, como
//! fallback, consulta `/api/v1/health` periodicamente.
//!
//! ## Atalhos
//! - `R`: Leitura manual
//! - `F` / `F11`: Fullscreen
//! - `G`: Toggle gráficos
//! - `T`: Alternar tema
//! - `Q` / `Esc`: Sair

mod dashboard;
mod panels;
mod sync_thread;
mod theme_egui;
mod transport;

use dashboard::HealthDashboard;
use health_core::config::AppConfig;
use health_core::sync::SyncSettings;
use tracing::{error, warn};

fn main() -> eframe::Result<()> {
    // ── Logging ──
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    // ── Config ──
    let config_path = AppConfig::default_path();
    let mut config = AppConfig::load(&config_path);

    if !config_path.exists() {
        if let Err(e) = config.save(&config_path) {
            warn!("Não foi possível salvar config padrão: {e}");
        }
    }

    let errors = config.validate();
    for e in &errors {
        warn!("Config inválida: {e}");
    }
    if !errors.is_empty() {
        warn!("Usando configuração padrão");
        config = AppConfig::default();
    }

    // ── Sincronização ──
    let (sync, rx) = match SyncSettings::from_config(&config) {
        Ok(settings) => {
            match sync_thread::spawn_sync_thread(settings, config.server.request_timeout()) {
                Ok((handle, rx)) => (Some(handle), rx),
                Err(e) => {
                    error!("Falha ao criar thread de sincronização: {e}");
                    (None, sync_thread::SyncReceivers::never())
                }
            }
        }
        Err(e) => {
            error!("Endereço do servidor inválido: {e}");
            (None, sync_thread::SyncReceivers::never())
        }
    };

    // ── Janela eframe ──
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_title("⚡ System Health ⚡")
            .with_inner_size([1366.0, 768.0])
            .with_min_inner_size([1024.0, 600.0]),
        ..Default::default()
    };

    eframe::run_native(
        "System Health",
        options,
        Box::new(move |cc| Ok(Box::new(HealthDashboard::new(cc, config, sync, rx)))),
    )
}
