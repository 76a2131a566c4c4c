//! Command-line argument definitions.

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};

use thermoguard_client::{api::dto::parse_instant, models::ReadingDraft};

#[derive(Debug, Parser)]
#[command(name = "thermoguard", version, about = "ThermoGuard temperature monitoring client")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Reading form fields, kept as raw text until validation.
#[derive(Debug, Clone, PartialEq, clap::Args)]
pub struct ReadingFields {
    /// Instant of the reading (RFC 3339)
    pub data_hora: String,

    /// Temperature in degrees Celsius
    #[arg(allow_hyphen_values = true)]
    pub temperatura: String,

    /// Id of the sensor that took the reading
    pub sensor_id: String,
}

impl From<ReadingFields> for ReadingDraft {
    fn from(f: ReadingFields) -> Self {
        ReadingDraft::new(f.data_hora, f.temperatura, f.sensor_id)
    }
}

#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum Command {
    /// List every sensor
    Sensors,

    /// Show one sensor
    Sensor {
        #[arg(value_parser = clap::value_parser!(i64).range(1..))]
        id: i64,
    },

    /// Register a sensor
    AddSensor { nome: String, localizacao: String },

    /// Replace a sensor's name and location
    EditSensor {
        #[arg(value_parser = clap::value_parser!(i64).range(1..))]
        id: i64,
        nome: String,
        localizacao: String,
    },

    /// Remove a sensor
    DeleteSensor {
        #[arg(value_parser = clap::value_parser!(i64).range(1..))]
        id: i64,
    },

    /// List every reading, colored by band
    Readings,

    /// Show one reading
    Reading {
        #[arg(value_parser = clap::value_parser!(i64).range(1..))]
        id: i64,
    },

    /// Record a reading
    AddReading {
        #[command(flatten)]
        fields: ReadingFields,
    },

    /// Replace a reading
    EditReading {
        #[arg(value_parser = clap::value_parser!(i64).range(1..))]
        id: i64,
        #[command(flatten)]
        fields: ReadingFields,
    },

    /// Remove a reading
    DeleteReading {
        #[arg(value_parser = clap::value_parser!(i64).range(1..))]
        id: i64,
    },

    /// Readings the server flags as high temperature
    High,

    /// Readings and min/max/mean between two instants
    Report {
        #[arg(value_parser = parse_date)]
        inicio: DateTime<Utc>,
        #[arg(value_parser = parse_date)]
        fim: DateTime<Utc>,
    },

    /// Totals, mean temperature and latest reading
    Dashboard,
}

/// RFC 3339, or an offset-less `YYYY-MM-DDTHH:MM:SS` read as UTC.
fn parse_date(s: &str) -> Result<DateTime<Utc>, String> {
    parse_instant(s.trim()).map_err(|e| format!("'{s}' is not a valid date: {e}"))
}
