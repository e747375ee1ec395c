//! Avaliação de saúde – status geral e problemas de tensão/throttling.

use crate::config::HealthThresholds;
use crate::types::{TelemetrySnapshot, VoltageInfo};
use serde::{Deserialize, Serialize};

/// Status geral exibido no cabeçalho.
///
/// `Error` só aparece quando o feed ou o polling falham; um snapshot
/// válido produz sempre `Healthy` ou `Degraded`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverallStatus {
    Healthy,
    Degraded,
    Error,
}

impl OverallStatus {
    pub fn label(self) -> &'static str {
        match self {
            OverallStatus::Healthy => "Healthy",
            OverallStatus::Degraded => "Degraded",
            OverallStatus::Error => "Error",
        }
    }
}

/// Um limite ultrapassado.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Breach {
    VoltageWarning,
    Temperature(f64),
    CpuUsage(f64),
    MemoryUsage(f64),
}

impl Breach {
    pub fn describe(&self) -> String {
        match self {
            Breach::VoltageWarning => "Tensão/throttling em WARNING".into(),
            Breach::Temperature(c) => format!("Temperatura alta: {c:.1}°C"),
            Breach::CpuUsage(p) => format!("CPU em {p:.1}%"),
            Breach::MemoryUsage(p) => format!("Memória em {p:.1}%"),
        }
    }
}

/// Gravidade de um problema de tensão ativo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Medium,
    High,
}

/// Problema de tensão ativo no momento.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoltageIssue {
    pub name: &'static str,
    pub description: &'static str,
    pub severity: Severity,
}

/// Detalhe do status de tensão.
#[derive(Debug, Clone, PartialEq)]
pub enum VoltageReport {
    /// Status "OK": nenhum throttling.
    Ok,
    /// Status "WARNING" com flags. `history` lista só flags que ocorreram
    /// no passado e não estão mais ativas.
    Warning {
        active: Vec<VoltageIssue>,
        history: Vec<&'static str>,
    },
    /// Status "WARNING" sem o objeto de flags.
    WarningWithoutDetails,
    /// Qualquer outro status, ou seção ausente.
    Unavailable(String),
}

/// Problema e texto de histórico de cada flag, na ordem de
/// [`ThrottleFlags::pairs`].
const FLAG_RULES: [(VoltageIssue, &str); 4] = [
    (
        VoltageIssue {
            name: "Under Voltage",
            description: "System voltage is below safe threshold. Performance may be reduced.",
            severity: Severity::High,
        },
        "Under voltage occurred in past",
    ),
    (
        VoltageIssue {
            name: "CPU Throttled",
            description: "CPU frequency reduced due to thermal or power constraints.",
            severity: Severity::High,
        },
        "Throttling occurred in past",
    ),
    (
        VoltageIssue {
            name: "Frequency Capped",
            description: "CPU frequency limited to prevent overheating.",
            severity: Severity::Medium,
        },
        "Frequency capping occurred in past",
    ),
    (
        VoltageIssue {
            name: "Soft Temp Limit",
            description: "Temperature protection active, performance reduced.",
            severity: Severity::Medium,
        },
        "Soft temp limit occurred in past",
    ),
];

/// Resultado da avaliação de um snapshot válido.
#[derive(Debug, Clone, PartialEq)]
pub struct HealthReport {
    pub snapshot: TelemetrySnapshot,
    pub status: OverallStatus,
    pub breaches: Vec<Breach>,
    pub voltage: VoltageReport,
}

/// Lista os limites ultrapassados. Valores ausentes nunca ultrapassam.
pub fn evaluate_breaches(snapshot: &TelemetrySnapshot, thresholds: &HealthThresholds) -> Vec<Breach> {
    let mut breaches = Vec::new();

    if snapshot.voltage_status() == Some("WARNING") {
        breaches.push(Breach::VoltageWarning);
    }
    if let Some(c) = snapshot.temperature_celsius().filter(|c| *c > thresholds.temperature_celsius) {
        breaches.push(Breach::Temperature(c));
    }
    if let Some(p) = snapshot.cpu_usage().filter(|p| *p > thresholds.cpu_percent) {
        breaches.push(Breach::CpuUsage(p));
    }
    if let Some(p) = snapshot.memory_percent().filter(|p| *p > thresholds.memory_percent) {
        breaches.push(Breach::MemoryUsage(p));
    }

    breaches
}

/// `Degraded` se qualquer limite foi ultrapassado, senão `Healthy`.
pub fn overall_status(snapshot: &TelemetrySnapshot, thresholds: &HealthThresholds) -> OverallStatus {
    if evaluate_breaches(snapshot, thresholds).is_empty() {
        OverallStatus::Healthy
    } else {
        OverallStatus::Degraded
    }
}

/// Separa as flags em problemas ativos e histórico.
pub fn voltage_report(voltage: Option<&VoltageInfo>) -> VoltageReport {
    let Some(voltage) = voltage else {
        return VoltageReport::Unavailable("N/A".into());
    };

    match voltage.status.as_deref() {
        Some("OK") => VoltageReport::Ok,
        Some("WARNING") => match &voltage.flags {
            Some(flags) => {
                let mut active = Vec::new();
                let mut history = Vec::new();
                for ((current, occurred), (issue, past)) in flags.pairs().into_iter().zip(FLAG_RULES) {
                    if current {
                        active.push(issue);
                    } else if occurred {
                        history.push(past);
                    }
                }
                VoltageReport::Warning { active, history }
            }
            None => VoltageReport::WarningWithoutDetails,
        },
        Some(other) => VoltageReport::Unavailable(other.to_string()),
        None => VoltageReport::Unavailable("N/A".into()),
    }
}

/// Avalia um snapshot completo.
pub fn assess(snapshot: TelemetrySnapshot, thresholds: &HealthThresholds) -> HealthReport {
    let breaches = evaluate_breaches(&snapshot, thresholds);
    let status = if breaches.is_empty() {
        OverallStatus::Healthy
    } else {
        OverallStatus::Degraded
    };
    let voltage = voltage_report(snapshot.voltage.as_ref());

    HealthReport {
        snapshot,
        status,
        breaches,
        voltage,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::decode_snapshot;
    use crate::types::*;

    fn snapshot(voltage_warning: bool, temp: f64, cpu: f64, mem: f64) -> TelemetrySnapshot {
        TelemetrySnapshot {
            cpu: Some(CpuInfo {
                usage_percent: Some(cpu),
                ..Default::default()
            }),
            memory: Some(MemoryInfo {
                percent: Some(mem),
                ..Default::default()
            }),
            temperature: Some(TemperatureInfo {
                celsius: Some(temp),
                ..Default::default()
            }),
            voltage: Some(VoltageInfo {
                status: Some(if voltage_warning { "WARNING" } else { "OK" }.into()),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn degraded_iff_any_condition_holds() {
        let th = HealthThresholds::default();
        for mask in 0u8..16 {
            let volt = mask & 1 != 0;
            let temp = if mask & 2 != 0 { 81.0 } else { 50.0 };
            let cpu = if mask & 4 != 0 { 96.0 } else { 20.0 };
            let mem = if mask & 8 != 0 { 99.0 } else { 30.0 };
            let expected = if mask == 0 {
                OverallStatus::Healthy
            } else {
                OverallStatus::Degraded
            };
            assert_eq!(
                overall_status(&snapshot(volt, temp, cpu, mem), &th),
                expected,
                "mask {mask:04b}"
            );
        }
    }

    #[test]
    fn cpu_breach_alone_degrades() {
        let s = decode_snapshot(
            r#"{"cpu":{"usage_percent":97},"memory":{"percent":40},
                "temperature":{"celsius":50},"voltage":{"status":"OK"}}"#,
        )
        .unwrap();
        let report = assess(s, &HealthThresholds::default());
        assert_eq!(report.status, OverallStatus::Degraded);
        assert_eq!(report.breaches, vec![Breach::CpuUsage(97.0)]);
        assert_eq!(report.voltage, VoltageReport::Ok);
    }

    #[test]
    fn breaches_describe_the_reading() {
        let report = assess(snapshot(true, 85.3, 97.0, 10.0), &HealthThresholds::default());
        let lines: Vec<_> = report.breaches.iter().map(Breach::describe).collect();
        assert_eq!(
            lines,
            vec!["Tensão/throttling em WARNING", "Temperatura alta: 85.3°C", "CPU em 97.0%"]
        );
    }

    #[test]
    fn thresholds_are_strict() {
        let th = HealthThresholds::default();
        assert_eq!(overall_status(&snapshot(false, 80.0, 95.0, 95.0), &th), OverallStatus::Healthy);
        assert_eq!(overall_status(&snapshot(false, 80.1, 95.0, 95.0), &th), OverallStatus::Degraded);
    }

    #[test]
    fn missing_sensors_never_degrade() {
        let s = TelemetrySnapshot {
            temperature: Some(TemperatureInfo {
                raw: Some("N/A".into()),
                celsius: None,
                available: Some(false),
            }),
            ..Default::default()
        };
        assert_eq!(overall_status(&s, &HealthThresholds::default()), OverallStatus::Healthy);
    }

    #[test]
    fn custom_thresholds_apply() {
        let th = HealthThresholds {
            cpu_percent: 50.0,
            ..Default::default()
        };
        assert_eq!(overall_status(&snapshot(false, 40.0, 60.0, 10.0), &th), OverallStatus::Degraded);
    }

    #[test]
    fn active_and_historical_issues_are_partitioned() {
        let s = decode_snapshot(
            r#"{"voltage":{"status":"WARNING","flags":{
                "under_voltage":false,"under_voltage_occurred":true,
                "throttled":true,"throttled_occurred":true}}}"#,
        )
        .unwrap();
        let report = assess(s, &HealthThresholds::default());
        assert_eq!(report.status, OverallStatus::Degraded);
        match report.voltage {
            VoltageReport::Warning { active, history } => {
                let names: Vec<_> = active.iter().map(|i| i.name).collect();
                assert_eq!(names, vec!["CPU Throttled"]);
                assert_eq!(active[0].severity, Severity::High);
                assert_eq!(history, vec!["Under voltage occurred in past"]);
            }
            other => panic!("esperado Warning, veio {other:?}"),
        }
    }

    #[test]
    fn soft_limits_are_medium_severity() {
        let flags = ThrottleFlags {
            frequency_capped: true,
            soft_temp_limit: true,
            ..Default::default()
        };
        let v = VoltageInfo {
            status: Some("WARNING".into()),
            flags: Some(flags),
            ..Default::default()
        };
        let VoltageReport::Warning { active, history } = voltage_report(Some(&v)) else {
            panic!("esperado Warning");
        };
        assert!(active.iter().all(|i| i.severity == Severity::Medium));
        assert!(history.is_empty());
    }

    #[test]
    fn warning_without_flags() {
        let v = VoltageInfo {
            status: Some("WARNING".into()),
            ..Default::default()
        };
        assert_eq!(voltage_report(Some(&v)), VoltageReport::WarningWithoutDetails);
    }

    #[test]
    fn unknown_voltage_status_is_unavailable() {
        let v = VoltageInfo {
            status: Some("N/A".into()),
            available: Some(false),
            ..Default::default()
        };
        assert_eq!(voltage_report(Some(&v)), VoltageReport::Unavailable("N/A".into()));
        assert_eq!(voltage_report(None), VoltageReport::Unavailable("N/A".into()));
    }
}
