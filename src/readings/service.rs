use chrono::{DateTime, Utc};
use tracing::error;

use crate::{
    api::{
        dto::{format_instant, parse_instant, ReadingDto, ReadingWriteDto},
        ApiError, RequestOptions, Transport,
    },
    models::{Reading, ReadingDraft},
    resource::{Resource, ResourceService},
    validation::{self, FieldErrors},
};

const HIGH_TEMPERATURES_PATH: &str = "Leitura/temperaturas-altas";
const BY_PERIOD_PATH: &str = "Leitura/por-periodo";

/// `/Leitura`
pub struct ReadingResource;

impl Resource for ReadingResource {
    const PATH: &'static str = "Leitura";
    const NAME: &'static str = "reading";

    type Wire = ReadingDto;
    type Item = Reading;
    type Draft = ReadingDraft;
    type Payload = ReadingWriteDto;

    fn prepare(draft: &ReadingDraft) -> Result<ReadingWriteDto, FieldErrors> {
        validation::check_reading(draft).map(ReadingWriteDto::from)
    }

    fn into_item(wire: ReadingDto) -> Result<Reading, ApiError> {
        let data_hora = parse_instant(&wire.data_hora).map_err(|source| {
            ApiError::InvalidTimestamp {
                value: wire.data_hora.clone(),
                source,
            }
        })?;

        Ok(Reading {
            id: wire.id,
            data_hora,
            temperatura: wire.temperatura,
            sensor_id: wire.sensor_id,
            nome_sensor: wire.nome_sensor,
        })
    }
}

pub type ReadingService<T> = ResourceService<ReadingResource, T>;

impl<T: Transport> ResourceService<ReadingResource, T> {
    /// Readings the server flags as high temperature. No threshold is applied
    /// on this side.
    pub async fn get_high_temperatures(&self) -> Result<Vec<Reading>, ApiError> {
        self.fetch_many(HIGH_TEMPERATURES_PATH, RequestOptions::new())
            .await
            .inspect_err(|e| error!(error = %e, "Failed to fetch high temperatures"))
    }

    /// Readings between `start` and `end`.
    ///
    /// Callers must ensure `start <= end`. An inverted range is not checked
    /// here; it is sent to the server exactly as given.
    pub async fn get_by_period(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Reading>, ApiError> {
        let options = RequestOptions::new()
            .query("inicio", Some(format_instant(&start)))
            .query("fim", Some(format_instant(&end)));

        self.fetch_many(BY_PERIOD_PATH, options)
            .await
            .inspect_err(|e| {
                error!(start = %start, end = %end, error = %e, "Failed to fetch readings by period")
            })
    }
}
