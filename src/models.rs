use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::api::dto::{format_instant, SensorDto};

/// A named, located temperature probe.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sensor {
    pub id: i64,
    pub nome: String,
    pub localizacao: String,
}

impl From<SensorDto> for Sensor {
    fn from(dto: SensorDto) -> Self {
        Self {
            id: dto.id,
            nome: dto.nome,
            localizacao: dto.localizacao,
        }
    }
}

/// One timestamped temperature observation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reading {
    pub id: i64,
    pub data_hora: DateTime<Utc>,
    /// Degrees Celsius
    pub temperatura: f64,
    pub sensor_id: i64,
    pub nome_sensor: Option<String>,
}

// ---------------------------------------------------------------------------
// Drafts: unvalidated input as a form holds it
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SensorDraft {
    pub nome: String,
    pub localizacao: String,
}

impl SensorDraft {
    pub fn new(nome: impl Into<String>, localizacao: impl Into<String>) -> Self {
        Self {
            nome: nome.into(),
            localizacao: localizacao.into(),
        }
    }
}

impl From<&Sensor> for SensorDraft {
    fn from(s: &Sensor) -> Self {
        Self::new(s.nome.clone(), s.localizacao.clone())
    }
}

/// Reading form input. Every field is raw text; `None` means the field was
/// never filled in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReadingDraft {
    pub data_hora: Option<String>,
    pub temperatura: Option<String>,
    pub sensor_id: Option<String>,
}

impl ReadingDraft {
    pub fn new(
        data_hora: impl Into<String>,
        temperatura: impl Into<String>,
        sensor_id: impl Into<String>,
    ) -> Self {
        Self {
            data_hora: Some(data_hora.into()),
            temperatura: Some(temperatura.into()),
            sensor_id: Some(sensor_id.into()),
        }
    }

    /// Draft from already-typed values, e.g. a date picker and a numeric field.
    pub fn from_values(data_hora: DateTime<Utc>, temperatura: f64, sensor_id: i64) -> Self {
        Self::new(
            format_instant(&data_hora),
            temperatura.to_string(),
            sensor_id.to_string(),
        )
    }
}

impl From<&Reading> for ReadingDraft {
    fn from(r: &Reading) -> Self {
        Self::from_values(r.data_hora, r.temperatura, r.sensor_id)
    }
}

// ---------------------------------------------------------------------------
// Payloads: what validation hands to the services
// ---------------------------------------------------------------------------

/// Validated sensor input, strings already trimmed.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorPayload {
    pub nome: String,
    pub localizacao: String,
}

/// Validated and parsed reading input.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadingPayload {
    pub data_hora: DateTime<Utc>,
    pub temperatura: f64,
    pub sensor_id: i64,
}
