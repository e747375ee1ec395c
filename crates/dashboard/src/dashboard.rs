//! Dashboard principal – App eframe/egui.

use crate::panels;
use crate::sync_thread::{SyncHandle, SyncReceivers};
use crate::theme_egui::{self, EguiTheme};
use egui::{Color32, RichText};
use egui_plot::{Line, Plot, PlotPoints};
use health_core::config::AppConfig;
use health_core::status::{HealthReport, OverallStatus};
use health_core::sync::{ConnectionState, HealthUpdate, UpdateSource};
use std::collections::VecDeque;
use std::time::Instant;
use tracing::info;

/// Estado do dashboard.
pub struct HealthDashboard {
    config: AppConfig,
    theme: EguiTheme,
    theme_index: usize,
    all_themes: Vec<EguiTheme>,

    // Sincronização
    sync: Option<SyncHandle>,
    rx: SyncReceivers,
    connection: ConnectionState,

    // Dados
    current: Option<HealthReport>,
    status: Option<OverallStatus>,
    last_error: Option<String>,
    last_update: Option<(Instant, UpdateSource)>,

    // Histórico para gráficos
    history: HistoryData,

    // UI state
    show_graphs: bool,
    is_fullscreen: bool,
}

struct HistoryData {
    capacity: usize,
    cpu_usage: VecDeque<f64>,
    memory: VecDeque<f64>,
    temperature: VecDeque<f64>,
}

impl HistoryData {
    fn new(capacity: usize) -> Self {
        let capacity = capacity.max(2);
        Self {
            capacity,
            cpu_usage: VecDeque::with_capacity(capacity),
            memory: VecDeque::with_capacity(capacity),
            temperature: VecDeque::with_capacity(capacity),
        }
    }

    /// Só registra valores presentes; sensor ausente não vira zero no gráfico.
    fn push(&mut self, report: &HealthReport) {
        let s = &report.snapshot;
        Self::push_deque(&mut self.cpu_usage, s.cpu_usage(), self.capacity);
        Self::push_deque(&mut self.memory, s.memory_percent(), self.capacity);
        Self::push_deque(&mut self.temperature, s.temperature_celsius(), self.capacity);
    }

    fn push_deque(deque: &mut VecDeque<f64>, val: Option<f64>, capacity: usize) {
        let Some(val) = val else { return };
        if deque.len() >= capacity {
            deque.pop_front();
        }
        deque.push_back(val);
    }
}

impl HealthDashboard {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        config: AppConfig,
        sync: Option<SyncHandle>,
        rx: SyncReceivers,
    ) -> Self {
        // Carrega tema
        let all_themes = theme_egui::all_themes();
        let theme_index = all_themes
            .iter()
            .position(|t| t.name == config.dashboard.theme)
            .unwrap_or(0);
        let theme = all_themes[theme_index].clone();
        let history = HistoryData::new(config.dashboard.history_size);
        let show_graphs = config.dashboard.show_graphs;

        Self {
            config,
            theme,
            theme_index,
            all_themes,
            sync,
            rx,
            connection: ConnectionState::Disconnected,
            current: None,
            status: None,
            last_error: None,
            last_update: None,
            history,
            show_graphs,
            is_fullscreen: false,
        }
    }

    /// Processa mensagens pendentes da thread de sincronização.
    fn poll_sync(&mut self) {
        while let Ok(update) = self.rx.updates.try_recv() {
            self.apply_update(update);
        }
        if let Some(state) = self.rx.connection.try_iter().last() {
            self.connection = state;
        }
    }

    fn apply_update(&mut self, update: HealthUpdate) {
        self.status = Some(update.status());
        self.last_update = Some((Instant::now(), update.source));
        match update.outcome {
            Ok(report) => {
                self.history.push(&report);
                self.current = Some(report);
                self.last_error = None;
            }
            // Mantém o último snapshot na tela (dados antigos > tela vazia)
            Err(e) => self.last_error = Some(e.to_string()),
        }
    }

    fn render_header(&self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui: &mut egui::Ui| {
            ui.label(
                RichText::new("⚡ SYSTEM HEALTH ⚡")
                    .color(self.theme.title)
                    .size(22.0)
                    .strong()
                    .monospace(),
            );

            let (text, color) = match self.status {
                Some(status) => (status.label(), self.theme.status_color(status)),
                None => ("Aguardando dados...", self.theme.dim),
            };
            ui.label(RichText::new(format!("● {text}")).color(color).size(16.0).strong().monospace());

            let live_color = match self.connection {
                ConnectionState::Connected => self.theme.status_color(OverallStatus::Healthy),
                ConnectionState::Disconnected => self.theme.dim,
                _ => self.theme.status_color(OverallStatus::Degraded),
            };
            let mut line = format!("Feed ao vivo: {}", self.connection.label());
            if let Some((at, source)) = self.last_update {
                let source = match source {
                    UpdateSource::Live => "feed",
                    UpdateSource::Poll => "polling",
                    UpdateSource::Manual => "manual",
                };
                line.push_str(&format!(
                    " | última leitura via {source}, {:.0}s atrás",
                    at.elapsed().as_secs_f64()
                ));
            }
            ui.label(RichText::new(line).color(live_color).monospace());

            // Limites ultrapassados no snapshot exibido
            if let Some(report) = self.current.as_ref().filter(|_| self.last_error.is_none()) {
                let degraded = self.theme.status_color(OverallStatus::Degraded);
                for breach in &report.breaches {
                    ui.label(RichText::new(format!("▲ {}", breach.describe())).color(degraded).monospace());
                }
            }

            if let Some(err) = &self.last_error {
                ui.label(RichText::new(err).color(self.theme.status_color(OverallStatus::Error)).monospace());
            }
        });
    }

    /// Renderiza os gráficos de histórico.
    fn render_graphs(&self, ui: &mut egui::Ui) {
        let available_width = ui.available_width();
        let plot_height = 120.0;
        let w = (available_width / 3.0) - 8.0;

        ui.horizontal_wrapped(|ui: &mut egui::Ui| {
            ui.vertical(|ui: &mut egui::Ui| {
                self.mini_plot(ui, "CPU %", &self.history.cpu_usage, self.theme.cpu, w, plot_height, 100.0);
            });
            ui.vertical(|ui: &mut egui::Ui| {
                self.mini_plot(ui, "RAM %", &self.history.memory, self.theme.memory, w, plot_height, 100.0);
            });
            ui.vertical(|ui: &mut egui::Ui| {
                self.mini_plot(ui, "Temp °C", &self.history.temperature, self.theme.temperature, w, plot_height, 100.0);
            });
        });
    }

    #[allow(clippy::too_many_arguments)]
    fn mini_plot(
        &self,
        ui: &mut egui::Ui,
        label: &str,
        data: &VecDeque<f64>,
        color: Color32,
        width: f32,
        height: f32,
        y_max: f64,
    ) {
        ui.label(RichText::new(label).color(color).monospace().size(11.0));

        let points: PlotPoints = data
            .iter()
            .enumerate()
            .map(|(i, &v)| [i as f64, v])
            .collect();

        let line = Line::new(points).color(color).width(1.5);

        Plot::new(format!("plot_{label}"))
            .height(height)
            .width(width)
            .show_axes(false)
            .show_grid(false)
            .allow_drag(false)
            .allow_zoom(false)
            .allow_scroll(false)
            .allow_boxed_zoom(false)
            .include_y(0.0)
            .include_y(y_max)
            .show(ui, |plot_ui| {
                plot_ui.line(line);
            });
    }
}

impl eframe::App for HealthDashboard {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ── Mensagens da sincronização ──
        self.poll_sync();

        // Atualiza a idade da última leitura sem depender de eventos
        ctx.request_repaint_after(std::time::Duration::from_millis(250));

        // ── Configurar estilo visual baseado no tema ──
        let mut visuals = if self.theme.name == "light" {
            egui::Visuals::light()
        } else {
            egui::Visuals::dark()
        };
        visuals.panel_fill = self.theme.bg;
        visuals.window_fill = self.theme.panel;
        visuals.override_text_color = Some(self.theme.text);
        ctx.set_visuals(visuals);

        // ── Atalhos de teclado ──
        let (refresh, graphs, next_theme, quit, fullscreen) = ctx.input(|i: &egui::InputState| {
            (
                i.key_pressed(egui::Key::R),
                i.key_pressed(egui::Key::G),
                i.key_pressed(egui::Key::T),
                i.key_pressed(egui::Key::Q) || i.key_pressed(egui::Key::Escape),
                i.key_pressed(egui::Key::F) || i.key_pressed(egui::Key::F11),
            )
        });
        if refresh {
            if let Some(sync) = &self.sync {
                info!("Leitura manual solicitada");
                sync.refresh();
            }
        }
        if graphs {
            self.show_graphs = !self.show_graphs;
        }
        if next_theme {
            self.theme_index = (self.theme_index + 1) % self.all_themes.len();
            self.theme = self.all_themes[self.theme_index].clone();
            info!("Tema: {}", self.theme.name);
        }
        if quit {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
        if fullscreen {
            self.is_fullscreen = !self.is_fullscreen;
            ctx.send_viewport_cmd(egui::ViewportCommand::Fullscreen(self.is_fullscreen));
        }

        // ── Painel central ──
        egui::CentralPanel::default().show(ctx, |ui: &mut egui::Ui| {
            self.render_header(ui);
            ui.add_space(8.0);

            if let Some(report) = &self.current {
                let s = &report.snapshot;
                let th = &self.config.thresholds;

                // ── Row 1: SYSTEM | CPU | MEMÓRIA | TEMPERATURA ──
                ui.columns(4, |cols| {
                    panels::render_system(&mut cols[0], s.system.as_ref(), &self.theme);
                    panels::render_cpu(&mut cols[1], s.cpu.as_ref(), &self.theme, th);
                    panels::render_memory(&mut cols[2], s.memory.as_ref(), &self.theme, th);
                    panels::render_temperature(&mut cols[3], s.temperature.as_ref(), &self.theme, th);
                });

                ui.add_space(6.0);

                // ── Row 2: DISCO | NETWORK | TENSÃO | PROCESSOS ──
                ui.columns(4, |cols| {
                    panels::render_disk(&mut cols[0], s.disk.as_ref(), &self.theme);
                    panels::render_network(&mut cols[1], s.network.as_ref(), &self.theme);
                    panels::render_voltage(&mut cols[2], &report.voltage, &self.theme);
                    panels::render_processes(&mut cols[3], s.process_count.as_ref(), s.cpu.as_ref(), &self.theme);
                });

                // ── Gráficos ──
                if self.show_graphs {
                    ui.add_space(8.0);
                    ui.separator();
                    self.render_graphs(ui);
                }
            }

            // ── Help bar (fundo) ──
            ui.with_layout(egui::Layout::bottom_up(egui::Align::Center), |ui: &mut egui::Ui| {
                ui.label(
                    RichText::new("[R] Refresh | [F] Fullscreen | [G] Graphs | [T] Theme | [Q/Esc] Quit")
                        .color(self.theme.dim)
                        .monospace()
                        .size(10.0),
                );
            });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use health_core::config::HealthThresholds;
    use health_core::protocol::decode_snapshot;
    use health_core::status::assess;

    fn report(json: &str) -> HealthReport {
        assess(decode_snapshot(json).unwrap(), &HealthThresholds::default())
    }

    #[test]
    fn history_skips_missing_values() {
        let mut h = HistoryData::new(10);
        h.push(&report(r#"{"cpu":{"usage_percent":10},"temperature":{"celsius":null}}"#));
        h.push(&report(r#"{"cpu":{"usage_percent":20},"memory":{"percent":30}}"#));
        assert_eq!(h.cpu_usage, VecDeque::from(vec![10.0, 20.0]));
        assert_eq!(h.memory, VecDeque::from(vec![30.0]));
        assert!(h.temperature.is_empty());
    }

    #[test]
    fn history_is_bounded() {
        let mut h = HistoryData::new(3);
        for i in 0..5 {
            h.push(&report(&format!(r#"{{"cpu":{{"usage_percent":{i}}}}}"#)));
        }
        assert_eq!(h.cpu_usage, VecDeque::from(vec![2.0, 3.0, 4.0]));
    }
}
