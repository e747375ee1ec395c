//! Definição de temas visuais para o dashboard.

use crate::status::{OverallStatus, Severity};
use serde::{Deserialize, Serialize};

/// Cor em formato hex string (ex: "#00ff88") para serialização.
/// A conversão para `egui::Color32` é feita no dashboard.
pub type ColorHex = String;

/// Definição completa de um tema de cores.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    // Fundo e texto
    pub bg: ColorHex,
    pub panel: ColorHex,
    pub text: ColorHex,
    pub dim: ColorHex,
    pub title: ColorHex,
    // Cores por cartão
    pub system: ColorHex,
    pub cpu: ColorHex,
    pub memory: ColorHex,
    pub temperature: ColorHex,
    pub disk: ColorHex,
    pub network: ColorHex,
    pub voltage: ColorHex,
    // Status
    pub healthy: ColorHex,
    pub degraded: ColorHex,
    pub error: ColorHex,
}

impl Theme {
    /// Cor do indicador de status geral.
    pub fn status_color(&self, status: OverallStatus) -> &str {
        match status {
            OverallStatus::Healthy => &self.healthy,
            OverallStatus::Degraded => &self.degraded,
            OverallStatus::Error => &self.error,
        }
    }

    /// Cor de um problema de tensão ativo.
    pub fn severity_color(&self, severity: Severity) -> &str {
        match severity {
            Severity::High => &self.error,
            Severity::Medium => &self.degraded,
        }
    }
}

/// Converte uma string hex "#RRGGBB" para tupla (r, g, b).
pub fn hex_to_rgb(hex: &str) -> (u8, u8, u8) {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return (255, 255, 255); // fallback branco
    }
    let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(255);
    let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(255);
    let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(255);
    (r, g, b)
}

/// Tema Escuro (padrão).
pub fn dark_theme() -> Theme {
    Theme {
        name: "dark".into(),
        bg: "#1a1a1a".into(),
        panel: "#252525".into(),
        text: "#ffffff".into(),
        dim: "#777777".into(),
        title: "#00d9ff".into(),
        system: "#bb86fc".into(),
        cpu: "#00ff88".into(),
        memory: "#ffa500".into(),
        temperature: "#ff6b6b".into(),
        disk: "#4fc3f7".into(),
        network: "#00d9ff".into(),
        voltage: "#ffd54f".into(),
        healthy: "#00ff88".into(),
        degraded: "#ffcc00".into(),
        error: "#ff3333".into(),
    }
}

/// Tema Claro.
pub fn light_theme() -> Theme {
    Theme {
        name: "light".into(),
        bg: "#f5f5f5".into(),
        panel: "#ffffff".into(),
        text: "#333333".into(),
        dim: "#888888".into(),
        title: "#0066cc".into(),
        system: "#7744aa".into(),
        cpu: "#00aa55".into(),
        memory: "#cc7700".into(),
        temperature: "#cc4444".into(),
        disk: "#1e88e5".into(),
        network: "#0066cc".into(),
        voltage: "#b8860b".into(),
        healthy: "#00aa55".into(),
        degraded: "#cc9900".into(),
        error: "#cc2222".into(),
    }
}

/// Tema High Contrast (acessibilidade).
pub fn high_contrast_theme() -> Theme {
    Theme {
        name: "high_contrast".into(),
        bg: "#000000".into(),
        panel: "#1a1a1a".into(),
        text: "#ffffff".into(),
        dim: "#cccccc".into(),
        title: "#00ffff".into(),
        system: "#ff00ff".into(),
        cpu: "#00ff00".into(),
        memory: "#ffff00".into(),
        temperature: "#ff6600".into(),
        disk: "#00ffff".into(),
        network: "#00ffff".into(),
        voltage: "#ffff00".into(),
        healthy: "#00ff00".into(),
        degraded: "#ffff00".into(),
        error: "#ff0000".into(),
    }
}

/// Retorna tema pelo nome.
pub fn get_theme(name: &str) -> Theme {
    match name.to_lowercase().as_str() {
        "light" => light_theme(),
        "high_contrast" => high_contrast_theme(),
        _ => dark_theme(),
    }
}

/// Nomes de temas disponíveis.
pub fn theme_names() -> Vec<&'static str> {
    vec!["dark", "light", "high_contrast"]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_to_rgb_valid() {
        assert_eq!(hex_to_rgb("#ff0000"), (255, 0, 0));
        assert_eq!(hex_to_rgb("#00ff88"), (0, 255, 136));
        assert_eq!(hex_to_rgb("1a1a1a"), (26, 26, 26));
        assert_eq!(hex_to_rgb("#abc"), (255, 255, 255));
    }

    #[test]
    fn all_themes_load() {
        for name in theme_names() {
            let t = get_theme(name);
            assert_eq!(t.name, name);
        }
    }

    #[test]
    fn unknown_theme_returns_dark() {
        assert_eq!(get_theme("cyberpunk").name, "dark");
    }

    #[test]
    fn status_colors_are_distinct() {
        let t = dark_theme();
        assert_ne!(t.status_color(OverallStatus::Healthy), t.status_color(OverallStatus::Degraded));
        assert_eq!(t.status_color(OverallStatus::Error), t.severity_color(Severity::High));
    }
}
