//! Protocolo de comunicação com o servidor de saúde.
//!
//! Dois canais, mesmo formato:
//!
//! ```text
//! WS  {ws|wss}://host/ws/system-stream   → mensagens texto, 1 snapshot JSON cada
//! GET {http|https}://host/api/v1/health  → corpo JSON com 1 snapshot
//! ```
//!
//! O esquema do feed acompanha o esquema da URL base: `http` → `ws`,
//! `https` → `wss`.

use crate::types::TelemetrySnapshot;

/// Caminho padrão do feed ao vivo.
pub const DEFAULT_FEED_PATH: &str = "/ws/system-stream";

/// Caminho padrão do endpoint de polling.
pub const DEFAULT_HEALTH_PATH: &str = "/api/v1/health";

/// Erros do protocolo.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProtocolError {
    #[error("Mensagem não é um objeto JSON")]
    NotAnObject,

    #[error("JSON malformado: {0}")]
    Malformed(String),

    #[error("URL base inválida: {0} (esperado http:// ou https://)")]
    InvalidBaseUrl(String),
}

/// Decodifica uma mensagem de texto (feed ou corpo HTTP) em [`TelemetrySnapshot`].
///
/// Qualquer coisa que não seja um objeto com os tipos esperados é rejeitada.
pub fn decode_snapshot(text: &str) -> Result<TelemetrySnapshot, ProtocolError> {
    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|e| ProtocolError::Malformed(e.to_string()))?;

    if !value.is_object() {
        return Err(ProtocolError::NotAnObject);
    }

    serde_json::from_value(value).map_err(|e| ProtocolError::Malformed(e.to_string()))
}

/// Separa `scheme://resto` validando que o esquema é HTTP(S).
fn split_base(base_url: &str) -> Result<(bool, &str), ProtocolError> {
    let base = base_url.trim().trim_end_matches('/');
    let (secure, rest) = if let Some(rest) = base.strip_prefix("https://") {
        (true, rest)
    } else if let Some(rest) = base.strip_prefix("http://") {
        (false, rest)
    } else {
        return Err(ProtocolError::InvalidBaseUrl(base_url.to_string()));
    };

    if rest.is_empty() {
        return Err(ProtocolError::InvalidBaseUrl(base_url.to_string()));
    }
    Ok((secure, rest))
}

fn join_path(rest: &str, path: &str) -> String {
    if path.starts_with('/') {
        format!("{rest}{path}")
    } else {
        format!("{rest}/{path}")
    }
}

/// URL do feed ao vivo, com `ws://` ou `wss://` conforme a URL base.
pub fn feed_url(base_url: &str, path: &str) -> Result<String, ProtocolError> {
    let (secure, rest) = split_base(base_url)?;
    let scheme = if secure { "wss" } else { "ws" };
    Ok(format!("{scheme}://{}", join_path(rest, path)))
}

/// URL do endpoint de polling.
pub fn health_url(base_url: &str, path: &str) -> Result<String, ProtocolError> {
    let (secure, rest) = split_base(base_url)?;
    let scheme = if secure { "https" } else { "http" };
    Ok(format!("{scheme}://{}", join_path(rest, path)))
}

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_partial_snapshot() {
        let s = decode_snapshot(r#"{"cpu": {"usage_percent": 97}, "memory": {"percent": 40}}"#).unwrap();
        assert_eq!(s.cpu_usage(), Some(97.0));
        assert_eq!(s.memory_percent(), Some(40.0));
        assert!(s.disk.is_none());
    }

    #[test]
    fn empty_object_is_valid() {
        assert_eq!(decode_snapshot("{}").unwrap(), TelemetrySnapshot::default());
    }

    #[test]
    fn rejects_non_object() {
        assert_eq!(decode_snapshot("[1, 2]"), Err(ProtocolError::NotAnObject));
        assert_eq!(decode_snapshot("42"), Err(ProtocolError::NotAnObject));
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(decode_snapshot("not json"), Err(ProtocolError::Malformed(_))));
    }

    #[test]
    fn rejects_wrong_field_types() {
        assert!(matches!(
            decode_snapshot(r#"{"cpu": {"usage_percent": "high"}}"#),
            Err(ProtocolError::Malformed(_))
        ));
    }

    #[test]
    fn feed_scheme_mirrors_base() {
        assert_eq!(
            feed_url("http://10.0.0.5:8000", DEFAULT_FEED_PATH).unwrap(),
            "ws://10.0.0.5:8000/ws/system-stream"
        );
        assert_eq!(
            feed_url("https://bench.local/", DEFAULT_FEED_PATH).unwrap(),
            "wss://bench.local/ws/system-stream"
        );
    }

    #[test]
    fn health_url_joins_path() {
        assert_eq!(
            health_url("http://localhost:8000/", "api/v1/health").unwrap(),
            "http://localhost:8000/api/v1/health"
        );
    }

    #[test]
    fn rejects_unknown_scheme() {
        assert!(matches!(
            feed_url("ftp://host", DEFAULT_FEED_PATH),
            Err(ProtocolError::InvalidBaseUrl(_))
        ));
        assert!(matches!(
            health_url("http://", DEFAULT_HEALTH_PATH),
            Err(ProtocolError::InvalidBaseUrl(_))
        ));
    }
}
