//! # Health Core
//!
//! Crate compartilhada do dashboard de saúde: estruturas do snapshot de
//! telemetria, protocolo JSON do feed, avaliação de saúde, formatação para
//! exibição, configuração TOML e o cliente de sincronização.
//!
//! ## Módulos
//! - [`types`] – Snapshot de telemetria (CPU, memória, temperatura, disco…)
//! - [`protocol`] – Decode JSON e URLs dos endpoints
//! - [`status`] – Status geral (Healthy/Degraded/Error) e problemas de tensão
//! - [`display`] – Formatação dos valores para os painéis
//! - [`config`] – Configuração unificada via TOML
//! - [`theme`] – Definição de temas (Dark, Light, High Contrast)
//! - [`sync`] – Máquina de estados do feed ao vivo + polling

pub mod types;
pub mod protocol;
pub mod status;
pub mod display;
pub mod config;
pub mod theme;
pub mod sync;

// Re-exports convenientes
pub use types::TelemetrySnapshot;
pub use protocol::{decode_snapshot, ProtocolError};
pub use status::{assess, HealthReport, OverallStatus};
pub use config::{AppConfig, HealthThresholds, ServerConfig, SyncConfig};
pub use sync::{ConnectionState, HealthUpdate, SyncRuntime, TelemetrySyncClient};
