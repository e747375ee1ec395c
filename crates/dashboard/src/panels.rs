//! Painéis individuais de saúde renderizados com egui.

use crate::theme_egui::EguiTheme;
use egui::{Color32, RichText, Ui};
use health_core::config::HealthThresholds;
use health_core::display::{self, TemperatureBand};
use health_core::status::VoltageReport;
use health_core::types::*;

// ──────────────────────────────────────────
// Helpers
// ──────────────────────────────────────────

fn metric_row(ui: &mut Ui, label: &str, value: &str, color: Color32, dim: Color32) {
    ui.horizontal(|ui: &mut Ui| {
        ui.label(RichText::new(format!("{label}:")).color(dim).monospace());
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui: &mut Ui| {
            ui.label(RichText::new(value).color(color).monospace().strong());
        });
    });
}

fn usage_bar(ui: &mut Ui, percent: Option<f64>, color: Color32) {
    let fraction = percent.map_or(0.0, |p| (p / 100.0).clamp(0.0, 1.0)) as f32;
    ui.add(egui::ProgressBar::new(fraction).fill(color));
}

fn no_data(ui: &mut Ui, theme: &EguiTheme) {
    ui.label(RichText::new("Sem dados").color(theme.dim).monospace());
}

fn panel_frame(
    ui: &mut Ui,
    title: &str,
    accent: Color32,
    theme: &EguiTheme,
    add_body: impl FnOnce(&mut Ui),
) {
    egui::Frame::new()
        .fill(theme.panel)
        .stroke(egui::Stroke::new(2.0, accent))
        .corner_radius(4.0)
        .inner_margin(8.0)
        .show(ui, |ui: &mut Ui| {
            ui.vertical_centered(|ui: &mut Ui| {
                ui.label(
                    RichText::new(format!("── {title} ──"))
                        .color(accent)
                        .strong()
                        .monospace()
                        .size(13.0),
                );
            });
            ui.add_space(4.0);
            add_body(ui);
        });
}

// ──────────────────────────────────────────
// System Panel
// ──────────────────────────────────────────

pub fn render_system(ui: &mut Ui, system: Option<&SystemInfo>, theme: &EguiTheme) {
    panel_frame(ui, "SYSTEM", theme.system, theme, |ui: &mut Ui| {
        let Some(system) = system else {
            return no_data(ui, theme);
        };
        metric_row(ui, "Plataforma", &display::platform(system), theme.text, theme.dim);
        metric_row(ui, "Host", &display::text(system.hostname.as_deref()), theme.text, theme.dim);
        metric_row(ui, "Arch", &display::text(system.architecture.as_deref()), theme.text, theme.dim);
    });
}

// ──────────────────────────────────────────
// CPU Panel
// ──────────────────────────────────────────

pub fn render_cpu(ui: &mut Ui, cpu: Option<&CpuInfo>, theme: &EguiTheme, th: &HealthThresholds) {
    panel_frame(ui, "CPU", theme.cpu, theme, |ui: &mut Ui| {
        let Some(cpu) = cpu else {
            return no_data(ui, theme);
        };
        let usage_color = theme.limit_color(cpu.usage_percent, th.cpu_percent);
        metric_row(ui, "Uso", &display::percent(cpu.usage_percent), usage_color, theme.dim);
        usage_bar(ui, cpu.usage_percent, theme.cpu);
        metric_row(ui, "Clock", &display::frequency_ghz(cpu.frequency_mhz), theme.text, theme.dim);
        let cores = display::core_count(cpu);
        if !cores.is_empty() {
            metric_row(ui, "Núcleos", &cores, theme.text, theme.dim);
        }
        if let Some(err) = &cpu.error {
            ui.label(RichText::new(err).color(theme.dim).small());
        }
    });
}

// ──────────────────────────────────────────
// Memory Panel
// ──────────────────────────────────────────

pub fn render_memory(ui: &mut Ui, mem: Option<&MemoryInfo>, theme: &EguiTheme, th: &HealthThresholds) {
    panel_frame(ui, "MEMÓRIA", theme.memory, theme, |ui: &mut Ui| {
        let Some(mem) = mem else {
            return no_data(ui, theme);
        };
        let color = theme.limit_color(mem.percent, th.memory_percent);
        metric_row(ui, "Uso", &display::percent(mem.percent), color, theme.dim);
        usage_bar(ui, mem.percent, theme.memory);
        metric_row(ui, "Usada", &display::megabytes(mem.used_mb), theme.text, theme.dim);
        metric_row(ui, "Total", &display::megabytes(mem.total_mb), theme.text, theme.dim);
    });
}

// ──────────────────────────────────────────
// Temperature Panel
// ──────────────────────────────────────────

pub fn render_temperature(
    ui: &mut Ui,
    temp: Option<&TemperatureInfo>,
    theme: &EguiTheme,
    th: &HealthThresholds,
) {
    panel_frame(ui, "TEMPERATURA", theme.temperature, theme, |ui: &mut Ui| {
        let Some(temp) = temp else {
            return no_data(ui, theme);
        };
        let color = theme.limit_color(temp.celsius, th.temperature_celsius);
        metric_row(ui, "CPU", &display::temperature(temp), color, theme.dim);
        let band = TemperatureBand::from_celsius(temp.celsius);
        let band_color = match band {
            TemperatureBand::High => theme.temperature,
            TemperatureBand::Unavailable => theme.dim,
            _ => theme.text,
        };
        metric_row(ui, "Status", band.label(), band_color, theme.dim);
    });
}

// ──────────────────────────────────────────
// Disk Panel
// ──────────────────────────────────────────

pub fn render_disk(ui: &mut Ui, disk: Option<&DiskInfo>, theme: &EguiTheme) {
    panel_frame(ui, "DISCO", theme.disk, theme, |ui: &mut Ui| {
        let Some(disk) = disk else {
            return no_data(ui, theme);
        };
        if let Some(root) = &disk.root {
            metric_row(ui, "Uso", &display::percent(root.percent), theme.text, theme.dim);
            usage_bar(ui, root.percent, theme.disk);
            metric_row(ui, "Usado", &display::gigabytes(root.used_gb), theme.text, theme.dim);
            metric_row(ui, "Total", &display::gigabytes(root.total_gb), theme.text, theme.dim);
        }
        let (read, write) = display::disk_io(disk.io.as_ref());
        metric_row(ui, "Leitura", &read, theme.text, theme.dim);
        metric_row(ui, "Escrita", &write, theme.text, theme.dim);
    });
}

// ──────────────────────────────────────────
// Network Panel
// ──────────────────────────────────────────

pub fn render_network(ui: &mut Ui, net: Option<&NetworkInfo>, theme: &EguiTheme) {
    panel_frame(ui, "NETWORK", theme.network, theme, |ui: &mut Ui| {
        let Some(net) = net else {
            return no_data(ui, theme);
        };
        metric_row(ui, "↑ Up", &display::throughput(net.mbps_sent), theme.text, theme.dim);
        metric_row(ui, "↓ Down", &display::throughput(net.mbps_recv), theme.text, theme.dim);
        let errors = net.errin.unwrap_or(0) + net.errout.unwrap_or(0);
        let drops = net.dropin.unwrap_or(0) + net.dropout.unwrap_or(0);
        if errors > 0 || drops > 0 {
            metric_row(ui, "Erros/Drops", &format!("{errors}/{drops}"), theme.text, theme.dim);
        }
    });
}

// ──────────────────────────────────────────
// Voltage Panel
// ──────────────────────────────────────────

pub fn render_voltage(ui: &mut Ui, report: &VoltageReport, theme: &EguiTheme) {
    panel_frame(ui, "TENSÃO / THROTTLE", theme.voltage, theme, |ui: &mut Ui| match report {
        VoltageReport::Ok => {
            metric_row(ui, "Status", "OK", theme.text, theme.dim);
            ui.label(RichText::new("No throttling detected").color(theme.dim).monospace());
        }
        VoltageReport::Warning { active, history } => {
            metric_row(ui, "Status", "WARNING", theme.voltage, theme.dim);
            if active.is_empty() {
                ui.label(RichText::new("No active issues").color(theme.dim).monospace());
            } else {
                ui.label(
                    RichText::new(format!("{} active issue(s)", active.len()))
                        .color(theme.text)
                        .strong(),
                );
            }
            for issue in active {
                ui.label(
                    RichText::new(format!("⚠ {}", issue.name))
                        .color(theme.severity_color(issue.severity))
                        .monospace()
                        .strong(),
                );
                ui.label(RichText::new(issue.description).color(theme.dim).small());
            }
            if !history.is_empty() {
                ui.add_space(2.0);
                ui.label(
                    RichText::new(format!("History: {}", history.join(", ")))
                        .color(theme.dim)
                        .small(),
                );
            }
        }
        VoltageReport::WarningWithoutDetails => {
            metric_row(ui, "Status", "WARNING", theme.voltage, theme.dim);
            ui.label(
                RichText::new("Status: WARNING (details unavailable)")
                    .color(theme.dim)
                    .monospace(),
            );
        }
        VoltageReport::Unavailable(status) => {
            metric_row(ui, "Status", status, theme.dim, theme.dim);
            ui.label(RichText::new("Status unavailable").color(theme.dim).monospace());
        }
    });
}

// ──────────────────────────────────────────
// Processes Panel
// ──────────────────────────────────────────

pub fn render_processes(
    ui: &mut Ui,
    processes: Option<&ProcessCount>,
    cpu: Option<&CpuInfo>,
    theme: &EguiTheme,
) {
    panel_frame(ui, "PROCESSOS", theme.system, theme, |ui: &mut Ui| {
        let (count, detail) = display::process_count(processes, cpu);
        ui.vertical_centered(|ui: &mut Ui| {
            ui.label(RichText::new(count).color(theme.text).monospace().size(20.0).strong());
            ui.label(RichText::new(detail).color(theme.dim).monospace());
        });
    });
}
