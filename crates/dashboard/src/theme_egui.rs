//! Conversão de temas para `egui::Color32`.

use egui::Color32;
use health_core::status::{OverallStatus, Severity};
use health_core::theme::{self, Theme};

/// Tema convertido para tipos egui.
#[derive(Clone)]
pub struct EguiTheme {
    pub name: String,
    pub bg: Color32,
    pub panel: Color32,
    pub text: Color32,
    pub dim: Color32,
    pub title: Color32,
    pub system: Color32,
    pub cpu: Color32,
    pub memory: Color32,
    pub temperature: Color32,
    pub disk: Color32,
    pub network: Color32,
    pub voltage: Color32,
    healthy: Color32,
    degraded: Color32,
    error: Color32,
}

impl EguiTheme {
    /// Converte um [`Theme`] do core para [`EguiTheme`].
    pub fn from_core(t: &Theme) -> Self {
        Self {
            name: t.name.clone(),
            bg: hex_color(&t.bg),
            panel: hex_color(&t.panel),
            text: hex_color(&t.text),
            dim: hex_color(&t.dim),
            title: hex_color(&t.title),
            system: hex_color(&t.system),
            cpu: hex_color(&t.cpu),
            memory: hex_color(&t.memory),
            temperature: hex_color(&t.temperature),
            disk: hex_color(&t.disk),
            network: hex_color(&t.network),
            voltage: hex_color(&t.voltage),
            healthy: hex_color(t.status_color(OverallStatus::Healthy)),
            degraded: hex_color(t.status_color(OverallStatus::Degraded)),
            error: hex_color(t.status_color(OverallStatus::Error)),
        }
    }

    pub fn status_color(&self, status: OverallStatus) -> Color32 {
        match status {
            OverallStatus::Healthy => self.healthy,
            OverallStatus::Degraded => self.degraded,
            OverallStatus::Error => self.error,
        }
    }

    pub fn severity_color(&self, severity: Severity) -> Color32 {
        match severity {
            Severity::High => self.error,
            Severity::Medium => self.degraded,
        }
    }

    /// Cor de um valor contra o limite de `Degraded` (estritamente maior).
    pub fn limit_color(&self, value: Option<f64>, limit: f64) -> Color32 {
        match value {
            Some(v) if v > limit => self.degraded,
            Some(_) => self.text,
            None => self.dim,
        }
    }
}

fn hex_color(hex: &str) -> Color32 {
    let (r, g, b) = theme::hex_to_rgb(hex);
    Color32::from_rgb(r, g, b)
}

/// Carrega todos os temas disponíveis.
pub fn all_themes() -> Vec<EguiTheme> {
    theme::theme_names()
        .iter()
        .map(|name| EguiTheme::from_core(&theme::get_theme(name)))
        .collect()
}
