use std::time::Duration;

use crate::validation::FieldErrors;

/// Every way a call into the data-access layer can fail.
///
/// `Display` is the single human-readable message a caller shows to the user.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Input was rejected locally; no request was sent.
    #[error("Dados inválidos: {0}")]
    ValidationFailed(FieldErrors),

    /// No response arrived before the deadline. The request was abandoned
    /// locally, so the server may still have applied it.
    #[error("Tempo limite de {}ms excedido em {endpoint}", timeout.as_millis())]
    Timeout { endpoint: String, timeout: Duration },

    /// Non-2xx response. `message` is already normalized from the error body.
    #[error("{message}")]
    Http { status: u16, message: String },

    /// 2xx response whose body could not be decoded.
    #[error("Resposta inválida de {endpoint}: {source}")]
    MalformedResponse {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    /// Failure below HTTP: refused connection, DNS, broken body stream.
    #[error("Falha de rede ao acessar {endpoint}: {source}")]
    Network {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server sent a `dataHora` that is not an instant.
    #[error("Data e hora inválidas recebidas do servidor: {value:?}")]
    InvalidTimestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    /// A validated payload could not be turned into JSON.
    #[error("Falha ao montar o corpo da requisição para {endpoint}: {source}")]
    Encode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("URL inválida: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// HTTP status for `Http` errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True when a mutation may or may not have reached the server.
    /// Callers must not report such a failure as "nothing happened".
    pub fn is_outcome_unknown(&self) -> bool {
        matches!(self, ApiError::Timeout { .. })
    }

    /// Field errors carried by a local validation failure.
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            ApiError::ValidationFailed(errors) => Some(errors),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_error_displays_only_the_server_message() {
        let err = ApiError::Http {
            status: 422,
            message: "must be <= 100".to_owned(),
        };
        assert_eq!(err.to_string(), "must be <= 100");
        assert_eq!(err.status(), Some(422));
    }

    #[test]
    fn only_timeouts_are_outcome_unknown() {
        let timeout = ApiError::Timeout {
            endpoint: "Leitura".to_owned(),
            timeout: Duration::from_millis(30_000),
        };
        assert!(timeout.is_outcome_unknown());
        assert!(timeout.to_string().contains("30000ms"));

        let http = ApiError::Http {
            status: 500,
            message: "Erro 500: Internal Server Error".to_owned(),
        };
        assert!(!http.is_outcome_unknown());
        assert!(http.field_errors().is_none());
    }
}
