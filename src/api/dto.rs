use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{ReadingPayload, SensorPayload};

// ---------------------------------------------------------------------------
// Sensor: /Sensor, /Sensor/{id}
// ---------------------------------------------------------------------------

/// Sensor as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorDto {
    pub id: i64,
    pub nome: String,
    pub localizacao: String,
}

/// Body of `POST /Sensor` and `PUT /Sensor/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorWriteDto {
    pub nome: String,
    pub localizacao: String,
}

impl From<SensorPayload> for SensorWriteDto {
    fn from(p: SensorPayload) -> Self {
        Self {
            nome: p.nome,
            localizacao: p.localizacao,
        }
    }
}

// ---------------------------------------------------------------------------
// Leitura: /Leitura, /Leitura/{id}, /Leitura/temperaturas-altas,
//          /Leitura/por-periodo
// ---------------------------------------------------------------------------

/// Reading as returned by the API. `data_hora` stays a string here; turning
/// it into an instant is the service's job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingDto {
    pub id: i64,
    pub data_hora: String,
    pub temperatura: f64,
    pub sensor_id: i64,
    /// Denormalized sensor name, present on read responses only.
    #[serde(default)]
    pub nome_sensor: Option<String>,
}

/// Body of `POST /Leitura` and `PUT /Leitura/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingWriteDto {
    /// ISO-8601, millisecond precision, `Z` suffix.
    pub data_hora: String,
    pub temperatura: f64,
    pub sensor_id: i64,
}

impl From<ReadingPayload> for ReadingWriteDto {
    fn from(p: ReadingPayload) -> Self {
        Self {
            data_hora: format_instant(&p.data_hora),
            temperatura: p.temperatura,
            sensor_id: p.sensor_id,
        }
    }
}

// ---------------------------------------------------------------------------
// Timestamps
// ---------------------------------------------------------------------------

/// `2024-01-15T10:30:00.000Z`
///
/// Truncated to milliseconds, so a round trip through [`parse_instant`] is
/// exact only down to the millisecond.
pub fn format_instant(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse an instant sent by the server or typed by a user.
///
/// RFC 3339 is preferred. The backend also emits offset-less timestamps
/// (`2024-01-15T10:30:00` or with fractional seconds); those are taken as
/// UTC. On failure the RFC 3339 error is returned.
pub fn parse_instant(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    let raw = raw.trim();
    match DateTime::parse_from_rfc3339(raw) {
        Ok(dt) => Ok(dt.with_timezone(&Utc)),
        Err(rfc_err) => NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .map(|naive| naive.and_utc())
            .map_err(|_| rfc_err),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Timelike};
    use serde_json::json;

    use super::*;

    #[test]
    fn instant_survives_wire_round_trip() {
        let original = Utc.with_ymd_and_hms(2024, 3, 9, 17, 45, 12).unwrap();
        let wire = format_instant(&original);
        assert_eq!(wire, "2024-03-09T17:45:12.000Z");
        assert_eq!(parse_instant(&wire).unwrap(), original);
    }

    #[test]
    fn sub_millisecond_precision_is_dropped_on_the_wire() {
        let original = Utc
            .with_ymd_and_hms(2024, 3, 9, 17, 45, 12)
            .unwrap()
            .with_nanosecond(123_456_789)
            .unwrap();
        let wire = format_instant(&original);
        assert_eq!(wire, "2024-03-09T17:45:12.123Z");

        let back = parse_instant(&wire).unwrap();
        assert_eq!(back.timestamp(), original.timestamp());
        assert_eq!(back.timestamp_subsec_millis(), 123);
        assert_ne!(back, original);
    }

    #[test]
    fn offsets_are_normalized_to_utc() {
        let parsed = parse_instant("2024-03-09T14:45:12-03:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 3, 9, 17, 45, 12).unwrap());
    }

    #[test]
    fn offset_less_server_timestamps_are_utc() {
        let parsed = parse_instant("2024-03-09T17:45:12.1234567").unwrap();
        assert_eq!(parsed.hour(), 17);
        assert_eq!(parsed.nanosecond(), 123_456_700);

        let whole = parse_instant("2024-03-09T17:45:12").unwrap();
        assert_eq!(whole, Utc.with_ymd_and_hms(2024, 3, 9, 17, 45, 12).unwrap());
    }

    #[test]
    fn garbage_is_not_an_instant() {
        assert!(parse_instant("ontem à tarde").is_err());
        assert!(parse_instant("").is_err());
        assert!(parse_instant("2024-13-40T99:00:00Z").is_err());
    }

    #[test]
    fn reading_dto_uses_camel_case_on_the_wire() {
        let dto: ReadingDto = serde_json::from_value(json!({
            "id": 7,
            "dataHora": "2024-03-09T17:45:12Z",
            "temperatura": 41.5,
            "sensorId": 2,
            "nomeSensor": "Câmara fria 2"
        }))
        .unwrap();
        assert_eq!(dto.sensor_id, 2);
        assert_eq!(dto.nome_sensor.as_deref(), Some("Câmara fria 2"));

        let write = ReadingWriteDto {
            data_hora: "2024-03-09T17:45:12.000Z".to_owned(),
            temperatura: 21.0,
            sensor_id: 2,
        };
        assert_eq!(
            serde_json::to_value(&write).unwrap(),
            json!({ "dataHora": "2024-03-09T17:45:12.000Z", "temperatura": 21.0, "sensorId": 2 })
        );
    }

    #[test]
    fn reading_dto_tolerates_missing_sensor_name() {
        let dto: ReadingDto = serde_json::from_value(json!({
            "id": 1,
            "dataHora": "2024-03-09T17:45:12Z",
            "temperatura": 20,
            "sensorId": 1
        }))
        .unwrap();
        assert_eq!(dto.nome_sensor, None);
        assert_eq!(dto.temperatura, 20.0);
    }
}
