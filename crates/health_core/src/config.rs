//! Configuração unificada via TOML.
//!
//! Um único `config.toml` ao lado do executável. Campos ausentes usam o
//! valor padrão.

use crate::protocol::{self, DEFAULT_FEED_PATH, DEFAULT_HEALTH_PATH};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(4);
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);
const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_secs(3);

/// Maior intervalo aceito em qualquer campo de tempo (segundos).
const MAX_SECS: f64 = 3600.0;

/// Segundos → `Duration`. NaN, infinito, negativo ou grande demais usa `fallback`.
fn secs_or(value: f64, fallback: Duration) -> Duration {
    Duration::try_from_secs_f64(value).unwrap_or(fallback)
}

/// Erros ao persistir a configuração.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Erro de I/O em {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Erro ao serializar configuração: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Onde encontrar o servidor de saúde.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// URL base (ex: "http://raspberrypi.local:8000"); o feed usa ws/wss conforme o esquema
    pub base_url: String,
    /// Caminho do feed ao vivo
    pub feed_path: String,
    /// Caminho do endpoint de polling
    pub health_path: String,
    /// Timeout de cada requisição de polling (segundos)
    pub request_timeout_secs: f64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".into(),
            feed_path: DEFAULT_FEED_PATH.into(),
            health_path: DEFAULT_HEALTH_PATH.into(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT.as_secs_f64(),
        }
    }
}

impl ServerConfig {
    pub fn feed_url(&self) -> Result<String, protocol::ProtocolError> {
        protocol::feed_url(&self.base_url, &self.feed_path)
    }

    pub fn health_url(&self) -> Result<String, protocol::ProtocolError> {
        protocol::health_url(&self.base_url, &self.health_path)
    }

    pub fn request_timeout(&self) -> Duration {
        secs_or(self.request_timeout_secs, DEFAULT_REQUEST_TIMEOUT).max(Duration::from_millis(100))
    }
}

/// Temporização do feed ao vivo e do polling.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Intervalo do polling de fallback (segundos)
    pub poll_interval_secs: f64,
    /// Espera antes de cada tentativa de reconexão (segundos)
    pub reconnect_delay_secs: f64,
    /// Tentativas de reconexão antes de desistir do feed ao vivo
    pub max_reconnect_attempts: u32,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: DEFAULT_POLL_INTERVAL.as_secs_f64(),
            reconnect_delay_secs: DEFAULT_RECONNECT_DELAY.as_secs_f64(),
            max_reconnect_attempts: 5,
        }
    }
}

impl SyncConfig {
    pub fn poll_interval(&self) -> Duration {
        secs_or(self.poll_interval_secs, DEFAULT_POLL_INTERVAL).max(Duration::from_millis(500))
    }

    pub fn reconnect_delay(&self) -> Duration {
        secs_or(self.reconnect_delay_secs, DEFAULT_RECONNECT_DELAY)
    }
}

/// Limites acima dos quais o status vira `Degraded` (comparação estrita `>`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HealthThresholds {
    pub temperature_celsius: f64,
    pub cpu_percent: f64,
    pub memory_percent: f64,
}

impl Default for HealthThresholds {
    fn default() -> Self {
        Self {
            temperature_celsius: 80.0,
            cpu_percent: 95.0,
            memory_percent: 95.0,
        }
    }
}

/// Preferências da janela.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Tema: "dark", "light", "high_contrast"
    pub theme: String,
    /// Quantidade de leituras guardadas para os gráficos
    pub history_size: usize,
    /// Mostrar gráficos ao abrir
    pub show_graphs: bool,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            theme: "dark".into(),
            history_size: 120,
            show_graphs: false,
        }
    }
}

/// Configuração raiz do aplicativo.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub sync: SyncConfig,
    pub thresholds: HealthThresholds,
    pub dashboard: DashboardConfig,
}

impl AppConfig {
    /// Carrega configuração de um arquivo TOML.
    pub fn load(path: &Path) -> Self {
        if path.exists() {
            match std::fs::read_to_string(path) {
                Ok(content) => match toml::from_str::<AppConfig>(&content) {
                    Ok(config) => {
                        info!("Configuração carregada de {}", path.display());
                        return config;
                    }
                    Err(e) => {
                        warn!("Erro ao parsear {}: {}", path.display(), e);
                    }
                },
                Err(e) => {
                    warn!("Erro ao ler {}: {}", path.display(), e);
                }
            }
        }

        info!("Usando configuração padrão");
        AppConfig::default()
    }

    /// Salva configuração em arquivo TOML.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Configuração salva em {}", path.display());
        Ok(())
    }

    /// Retorna o caminho padrão do config.toml.
    pub fn default_path() -> PathBuf {
        let exe_dir = std::env::current_exe()
            .map(|p| p.parent().unwrap_or(Path::new(".")).to_path_buf())
            .unwrap_or_else(|_| PathBuf::from("."));
        exe_dir.join("config.toml")
    }

    /// Valida a configuração e retorna lista de erros.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if let Err(e) = self.server.feed_url() {
            errors.push(e.to_string());
        }
        let timeout = self.server.request_timeout_secs;
        if !(timeout > 0.0 && timeout <= MAX_SECS) {
            errors.push(format!("Timeout de requisição inválido: {timeout} (0–{MAX_SECS})"));
        }
        let poll = self.sync.poll_interval_secs;
        if !(0.5..=MAX_SECS).contains(&poll) {
            errors.push(format!("Intervalo de polling inválido: {poll} (0.5–{MAX_SECS})"));
        }
        let delay = self.sync.reconnect_delay_secs;
        if !(0.0..=MAX_SECS).contains(&delay) {
            errors.push(format!("Atraso de reconexão inválido: {delay} (0–{MAX_SECS})"));
        }
        if self.sync.max_reconnect_attempts == 0 {
            errors.push("max_reconnect_attempts deve ser pelo menos 1".into());
        }
        let th = &self.thresholds;
        for (name, value) in [
            ("temperature_celsius", th.temperature_celsius),
            ("cpu_percent", th.cpu_percent),
            ("memory_percent", th.memory_percent),
        ] {
            if !(value.is_finite() && value > 0.0) {
                errors.push(format!("Threshold {name} deve ser positivo: {value}"));
            }
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        let errors = config.validate();
        assert!(errors.is_empty(), "Erros: {:?}", errors);
    }

    #[test]
    fn defaults_match_dashboard_behaviour() {
        let config = AppConfig::default();
        assert_eq!(config.sync.poll_interval(), Duration::from_secs(5));
        assert_eq!(config.sync.reconnect_delay(), Duration::from_secs(3));
        assert_eq!(config.sync.max_reconnect_attempts, 5);
        assert_eq!(config.thresholds.temperature_celsius, 80.0);
        assert_eq!(
            config.server.feed_url().unwrap(),
            "ws://127.0.0.1:8000/ws/system-stream"
        );
    }

    #[test]
    fn roundtrip_toml() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(config.server.base_url, parsed.server.base_url);
        assert_eq!(config.thresholds, parsed.thresholds);
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let partial = r#"
[sync]
max_reconnect_attempts = 2

[thresholds]
cpu_percent = 90.0
"#;
        let config: AppConfig = toml::from_str(partial).unwrap();
        assert_eq!(config.sync.max_reconnect_attempts, 2);
        assert_eq!(config.sync.poll_interval_secs, 5.0);
        assert_eq!(config.thresholds.cpu_percent, 90.0);
        assert_eq!(config.thresholds.memory_percent, 95.0);
        assert_eq!(config.dashboard.theme, "dark");
    }

    #[test]
    fn validate_reports_bad_values() {
        let mut config = AppConfig::default();
        config.server.base_url = "raspberrypi.local".into();
        config.sync.max_reconnect_attempts = 0;
        config.thresholds.cpu_percent = 0.0;
        let errors = config.validate();
        assert_eq!(errors.len(), 3, "Erros: {:?}", errors);
    }

    #[test]
    fn validate_rejects_non_finite_and_huge_values() {
        let mut config = AppConfig::default();
        config.sync.poll_interval_secs = f64::NAN;
        assert_eq!(config.validate().len(), 1);

        let mut config = AppConfig::default();
        config.sync.reconnect_delay_secs = f64::INFINITY;
        assert_eq!(config.validate().len(), 1);

        let mut config = AppConfig::default();
        config.server.request_timeout_secs = 1e30;
        assert_eq!(config.validate().len(), 1);

        let mut config = AppConfig::default();
        config.thresholds.cpu_percent = f64::NAN;
        assert_eq!(config.validate().len(), 1);
    }

    #[test]
    fn toml_nan_is_caught_by_validate() {
        let config: AppConfig = toml::from_str("[sync]\npoll_interval_secs = nan\n").unwrap();
        assert!(config.sync.poll_interval_secs.is_nan());
        assert!(!config.validate().is_empty());
    }

    #[test]
    fn durations_never_panic_on_bad_values() {
        let mut config = AppConfig::default();
        config.sync.poll_interval_secs = f64::NAN;
        config.sync.reconnect_delay_secs = f64::INFINITY;
        config.server.request_timeout_secs = 1e30;
        assert_eq!(config.sync.poll_interval(), Duration::from_secs(5));
        assert_eq!(config.sync.reconnect_delay(), Duration::from_secs(3));
        assert_eq!(config.server.request_timeout(), Duration::from_secs(4));

        // Polling nunca vira laço apertado
        config.sync.poll_interval_secs = 0.0;
        assert_eq!(config.sync.poll_interval(), Duration::from_millis(500));
    }

    #[test]
    fn load_missing_file_falls_back_to_default() {
        let config = AppConfig::load(Path::new("/nonexistent/health/config.toml"));
        assert_eq!(config.sync.max_reconnect_attempts, 5);
    }
}
