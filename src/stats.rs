//! Summaries built on top of the services: the dashboard overview and the
//! per-period temperature report.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, warn};

use crate::{
    api::{ApiError, Transport},
    models::Reading,
    readings::ReadingService,
    sensors::SensorService,
};

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("A data de início não pode ser maior que a data de fim.")]
    InvalidRange {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error(transparent)]
    Api(#[from] ApiError),
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub total_sensores: usize,
    pub total_leituras: usize,
    pub temperaturas_altas: usize,
    /// Mean of every reading, one decimal. 0 with no readings.
    pub temperatura_media: f64,
    pub ultima_leitura: Option<Reading>,
}

impl DashboardStats {
    /// Fetches sensors, readings and high temperatures concurrently.
    /// Any single failure fails the whole load.
    pub async fn load<T: Transport>(
        sensors: &SensorService<T>,
        readings: &ReadingService<T>,
    ) -> Result<Self, ApiError> {
        let (all_sensors, all_readings, high) = tokio::try_join!(
            sensors.list(),
            readings.list(),
            readings.get_high_temperatures(),
        )?;

        let stats = Self::from_parts(all_sensors.len(), &all_readings, high.len());
        debug!(
            sensores = stats.total_sensores,
            leituras = stats.total_leituras,
            altas = stats.temperaturas_altas,
            "Dashboard loaded"
        );
        Ok(stats)
    }

    /// The latest reading is the one with the greatest `dataHora`; on a tie the
    /// earliest in `readings` wins.
    pub fn from_parts(
        total_sensores: usize,
        readings: &[Reading],
        temperaturas_altas: usize,
    ) -> Self {
        let temperatura_media = mean(readings).map(round1).unwrap_or(0.0);
        let ultima_leitura = readings
            .iter()
            .reduce(|latest, r| if r.data_hora > latest.data_hora { r } else { latest })
            .cloned();

        Self {
            total_sensores,
            total_leituras: readings.len(),
            temperaturas_altas,
            temperatura_media,
            ultima_leitura,
        }
    }
}

// ---------------------------------------------------------------------------
// Period report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PeriodSummary {
    pub total: usize,
    pub minima: f64,
    pub maxima: f64,
    pub media: f64,
}

impl PeriodSummary {
    /// `None` for an empty slice.
    pub fn of(readings: &[Reading]) -> Option<Self> {
        let media = mean(readings)?;
        let (minima, maxima) = readings.iter().map(|r| r.temperatura).fold(
            (f64::INFINITY, f64::NEG_INFINITY),
            |(lo, hi), t| (lo.min(t), hi.max(t)),
        );

        Some(Self {
            total: readings.len(),
            minima: round1(minima),
            maxima: round1(maxima),
            media: round1(media),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodReport {
    pub inicio: DateTime<Utc>,
    pub fim: DateTime<Utc>,
    pub leituras: Vec<Reading>,
    pub resumo: Option<PeriodSummary>,
}

impl PeriodReport {
    /// Rejects `start > end` without touching the network.
    pub async fn generate<T: Transport>(
        readings: &ReadingService<T>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Self, ReportError> {
        if start > end {
            warn!(start = %start, end = %end, "Rejected inverted report range");
            return Err(ReportError::InvalidRange { start, end });
        }

        let leituras = readings.get_by_period(start, end).await?;
        let resumo = PeriodSummary::of(&leituras);

        Ok(Self {
            inicio: start,
            fim: end,
            leituras,
            resumo,
        })
    }
}

fn mean(readings: &[Reading]) -> Option<f64> {
    if readings.is_empty() {
        return None;
    }
    let sum: f64 = readings.iter().map(|r| r.temperatura).sum();
    Some(sum / readings.len() as f64)
}

/// Half-up to one decimal.
pub fn round1(value: f64) -> f64 {
    (value * 10.0 + 0.5).floor() / 10.0
}
