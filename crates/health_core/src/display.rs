//! Formatação dos valores do snapshot para os painéis.
//!
//! Valor ausente vira "N/A"; nunca mostramos zero para um sensor que não
//! respondeu.

use crate::types::{CpuInfo, DiskIoInfo, ProcessCount, SystemInfo, TemperatureInfo};

pub const NOT_AVAILABLE: &str = "N/A";
const MISSING: &str = "--";
const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Faixa de temperatura mostrada ao lado da leitura.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemperatureBand {
    Normal,
    Warm,
    High,
    Unavailable,
}

impl TemperatureBand {
    pub fn from_celsius(celsius: Option<f64>) -> Self {
        match celsius {
            Some(c) if c > 80.0 => TemperatureBand::High,
            Some(c) if c > 60.0 => TemperatureBand::Warm,
            Some(_) => TemperatureBand::Normal,
            None => TemperatureBand::Unavailable,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TemperatureBand::Normal => "Normal",
            TemperatureBand::Warm => "Warm",
            TemperatureBand::High => "High",
            TemperatureBand::Unavailable => "Unavailable",
        }
    }
}

pub fn percent(value: Option<f64>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.into(), |v| format!("{v:.1}%"))
}

/// Frequência em GHz a partir de MHz.
pub fn frequency_ghz(mhz: Option<f64>) -> String {
    match mhz {
        Some(m) if m > 0.0 => format!("{:.2} GHz", m / 1000.0),
        _ => NOT_AVAILABLE.into(),
    }
}

pub fn core_count(cpu: &CpuInfo) -> String {
    cpu.count.map_or_else(String::new, |n| format!("{n} cores"))
}

pub fn megabytes(value: Option<f64>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.into(), |v| format!("{v:.0} MB"))
}

pub fn gigabytes(value: Option<f64>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.into(), |v| format!("{v:.1} GB"))
}

pub fn temperature(temp: &TemperatureInfo) -> String {
    temp.celsius
        .map_or_else(|| NOT_AVAILABLE.into(), |c| format!("{c:.1}°C"))
}

/// Vazão de rede; o servidor manda o valor em "mbps" e a UI divide por 1024.
pub fn throughput(value: Option<f64>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.into(), |v| format!("{:.2} MB/s", v / 1024.0))
}

/// Leitura e escrita acumuladas, em MB.
pub fn disk_io(io: Option<&DiskIoInfo>) -> (String, String) {
    let fmt = |bytes: Option<u64>| {
        bytes.map_or_else(
            || NOT_AVAILABLE.to_string(),
            |b| format!("{:.2} MB", b as f64 / BYTES_PER_MB),
        )
    };
    match io {
        Some(io) => (fmt(io.read_bytes), fmt(io.write_bytes)),
        None => (NOT_AVAILABLE.into(), NOT_AVAILABLE.into()),
    }
}

/// Contagem de processos e a linha de detalhe.
pub fn process_count(processes: Option<&ProcessCount>, cpu: Option<&CpuInfo>) -> (String, String) {
    let Some(p) = processes else {
        return (MISSING.into(), MISSING.into());
    };
    match (p.available, p.count) {
        (Some(true), Some(count)) => {
            let detail = match cpu.and_then(|c| c.count) {
                Some(cores) => format!("Running on {cores} cores"),
                None => "Active processes".into(),
            };
            (count.to_string(), detail)
        }
        _ => (NOT_AVAILABLE.into(), "Unavailable".into()),
    }
}

/// Linha "Linux 6.1.21-v8+".
pub fn platform(system: &SystemInfo) -> String {
    match (&system.platform, &system.platform_release) {
        (Some(p), Some(r)) => format!("{p} {r}"),
        (Some(p), None) => p.clone(),
        _ => NOT_AVAILABLE.into(),
    }
}

/// Campo de texto opcional.
pub fn text(value: Option<&str>) -> String {
    value.unwrap_or(NOT_AVAILABLE).to_string()
}
