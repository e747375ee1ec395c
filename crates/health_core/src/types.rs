//! Definição de tipos/structs do snapshot de telemetria.
//!
//! Espelha o JSON enviado pelo servidor em `/ws/system-stream` e
//! `/api/v1/health`. Todo campo é opcional: ausência significa
//! "desconhecido", nunca zero.

use serde::{Deserialize, Serialize};

// ──────────────────────────────────────────────
// Sistema
// ──────────────────────────────────────────────

/// Identificação da máquina monitorada.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SystemInfo {
    pub platform: Option<String>,
    pub platform_release: Option<String>,
    pub platform_version: Option<String>,
    pub architecture: Option<String>,
    pub hostname: Option<String>,
}

// ──────────────────────────────────────────────
// CPU
// ──────────────────────────────────────────────

/// Uso e frequência da CPU.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CpuInfo {
    /// Uso total (0–100%)
    pub usage_percent: Option<f64>,
    /// Número de núcleos lógicos
    pub count: Option<u32>,
    /// Frequência atual (MHz)
    pub frequency_mhz: Option<f64>,
    pub frequency_min_mhz: Option<f64>,
    pub frequency_max_mhz: Option<f64>,
    /// Erro de coleta reportado pelo servidor
    pub error: Option<String>,
}

// ──────────────────────────────────────────────
// Memória
// ──────────────────────────────────────────────

/// Uso de memória RAM.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MemoryInfo {
    pub total_bytes: Option<u64>,
    pub available_bytes: Option<u64>,
    pub used_bytes: Option<u64>,
    /// Percentual de uso (0–100%)
    pub percent: Option<f64>,
    pub total_mb: Option<f64>,
    pub available_mb: Option<f64>,
    pub used_mb: Option<f64>,
    pub error: Option<String>,
}

// ──────────────────────────────────────────────
// Temperatura
// ──────────────────────────────────────────────

/// Temperatura da CPU. `celsius` é `null` quando o sensor não existe.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TemperatureInfo {
    /// Leitura bruta (ex: "temp=48.3'C")
    pub raw: Option<String>,
    pub celsius: Option<f64>,
    pub available: Option<bool>,
}

// ──────────────────────────────────────────────
// Tensão / Throttling
// ──────────────────────────────────────────────

/// Flags de throttling (bits do `vcgencmd get_throttled`).
///
/// Flag ausente conta como `false`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ThrottleFlags {
    pub under_voltage: bool,
    pub frequency_capped: bool,
    pub throttled: bool,
    pub soft_temp_limit: bool,
    pub under_voltage_occurred: bool,
    pub frequency_capped_occurred: bool,
    pub throttled_occurred: bool,
    pub soft_temp_limit_occurred: bool,
}

impl ThrottleFlags {
    /// Pares (ativo agora, ocorreu no passado): under-voltage, throttled,
    /// frequency-capped, soft-temp-limit.
    pub fn pairs(&self) -> [(bool, bool); 4] {
        [
            (self.under_voltage, self.under_voltage_occurred),
            (self.throttled, self.throttled_occurred),
            (self.frequency_capped, self.frequency_capped_occurred),
            (self.soft_temp_limit, self.soft_temp_limit_occurred),
        ]
    }
}

/// Status de tensão e throttling.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct VoltageInfo {
    pub raw: Option<String>,
    pub hex_value: Option<String>,
    pub flags: Option<ThrottleFlags>,
    /// "OK", "WARNING" ou outro valor (ex: "N/A")
    pub status: Option<String>,
    pub available: Option<bool>,
}

// ──────────────────────────────────────────────
// Rede
// ──────────────────────────────────────────────

/// Contadores de rede.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NetworkInfo {
    pub bytes_sent: Option<u64>,
    pub bytes_recv: Option<u64>,
    pub packets_sent: Option<u64>,
    pub packets_recv: Option<u64>,
    pub errin: Option<u64>,
    pub errout: Option<u64>,
    pub dropin: Option<u64>,
    pub dropout: Option<u64>,
    pub mbps_sent: Option<f64>,
    pub mbps_recv: Option<f64>,
    pub error: Option<String>,
}

// ──────────────────────────────────────────────
// Disco
// ──────────────────────────────────────────────

/// Uso da partição raiz.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DiskRootInfo {
    pub total_bytes: Option<u64>,
    pub used_bytes: Option<u64>,
    pub free_bytes: Option<u64>,
    pub percent: Option<f64>,
    pub total_gb: Option<f64>,
    pub used_gb: Option<f64>,
    pub free_gb: Option<f64>,
}

/// Contadores de I/O de disco.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DiskIoInfo {
    pub read_bytes: Option<u64>,
    pub write_bytes: Option<u64>,
    pub read_count: Option<u64>,
    pub write_count: Option<u64>,
}

/// Uso e I/O de disco.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DiskInfo {
    pub root: Option<DiskRootInfo>,
    pub io: Option<DiskIoInfo>,
    pub error: Option<String>,
}

// ──────────────────────────────────────────────
// Processos
// ──────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProcessCount {
    pub count: Option<u64>,
    pub available: Option<bool>,
    pub error: Option<String>,
}

// ──────────────────────────────────────────────
// Snapshot completo
// ──────────────────────────────────────────────

/// Uma leitura completa de telemetria, recebida do feed ou do polling.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TelemetrySnapshot {
    pub system: Option<SystemInfo>,
    pub cpu: Option<CpuInfo>,
    pub memory: Option<MemoryInfo>,
    pub temperature: Option<TemperatureInfo>,
    pub voltage: Option<VoltageInfo>,
    pub network: Option<NetworkInfo>,
    pub disk: Option<DiskInfo>,
    pub process_count: Option<ProcessCount>,
}

impl TelemetrySnapshot {
    /// Uso de CPU, se informado.
    pub fn cpu_usage(&self) -> Option<f64> {
        self.cpu.as_ref().and_then(|c| c.usage_percent)
    }

    /// Uso de memória, se informado.
    pub fn memory_percent(&self) -> Option<f64> {
        self.memory.as_ref().and_then(|m| m.percent)
    }

    /// Temperatura em °C, se o sensor estiver disponível.
    pub fn temperature_celsius(&self) -> Option<f64> {
        self.temperature.as_ref().and_then(|t| t.celsius)
    }

    /// Status de tensão cru ("OK", "WARNING"…), se informado.
    pub fn voltage_status(&self) -> Option<&str> {
        self.voltage.as_ref().and_then(|v| v.status.as_deref())
    }
}

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_snapshot_is_unknown() {
        let s = TelemetrySnapshot::default();
        assert_eq!(s.cpu_usage(), None);
        assert_eq!(s.memory_percent(), None);
        assert_eq!(s.temperature_celsius(), None);
        assert_eq!(s.voltage_status(), None);
    }

    #[test]
    fn full_server_payload_parses() {
        let json = r##"{
            "system": {"platform": "Linux", "platform_release": "6.1.21-v8+",
                       "platform_version": "#1642", "architecture": "aarch64",
                       "hostname": "baja-pi"},
            "cpu": {"usage_percent": 12.5, "count": 4, "frequency_mhz": 1500.0,
                    "frequency_min_mhz": 600.0, "frequency_max_mhz": 1500.0},
            "memory": {"total_bytes": 4000000000, "available_bytes": 3000000000,
                       "used_bytes": 1000000000, "percent": 25.0,
                       "total_mb": 3814.7, "available_mb": 2861.0, "used_mb": 953.7},
            "temperature": {"raw": "temp=48.3'C", "celsius": 48.3, "available": true},
            "voltage": {"raw": "throttled=0x50005", "hex_value": "0x50005",
                        "flags": {"under_voltage": true, "throttled": true,
                                  "under_voltage_occurred": true, "throttled_occurred": true},
                        "status": "WARNING", "available": true},
            "network": {"bytes_sent": 1, "bytes_recv": 2, "packets_sent": 3,
                        "packets_recv": 4, "errin": 0, "errout": 0, "dropin": 0,
                        "dropout": 0, "mbps_sent": 0.5, "mbps_recv": 1.5},
            "disk": {"root": {"total_bytes": 10, "used_bytes": 5, "free_bytes": 5,
                              "percent": 50.0, "total_gb": 29.1, "used_gb": 14.5,
                              "free_gb": 14.6},
                     "io": {"read_bytes": 1048576, "write_bytes": 2097152,
                            "read_count": 10, "write_count": 20}},
            "process_count": {"count": 182, "available": true}
        }"##;
        let s: TelemetrySnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(s.cpu_usage(), Some(12.5));
        assert_eq!(s.temperature_celsius(), Some(48.3));
        assert_eq!(s.voltage_status(), Some("WARNING"));
        let flags = s.voltage.unwrap().flags.unwrap();
        assert!(flags.under_voltage);
        assert!(!flags.frequency_capped);
        assert_eq!(s.process_count.unwrap().count, Some(182));
    }

    #[test]
    fn null_temperature_stays_unknown() {
        let s: TelemetrySnapshot =
            serde_json::from_str(r#"{"temperature": {"raw": "N/A", "celsius": null, "available": false}}"#)
                .unwrap();
        assert!(s.temperature.is_some());
        assert_eq!(s.temperature_celsius(), None);
    }

    #[test]
    fn section_error_is_kept() {
        let s: TelemetrySnapshot =
            serde_json::from_str(r#"{"cpu": {"error": "psutil failed"}}"#).unwrap();
        let cpu = s.cpu.unwrap();
        assert_eq!(cpu.error.as_deref(), Some("psutil failed"));
        assert_eq!(cpu.usage_percent, None);
    }
}
