//! Client core for the ThermoGuard temperature API.
//!
//! [`api::HttpTransport`] talks to the server, the per-resource services in
//! [`sensors`] and [`readings`] validate input and map wire shapes to
//! [`models`], and [`bands`] classifies temperatures for display.

pub mod api;
pub mod bands;
pub mod config;
pub mod models;
pub mod readings;
pub mod resource;
pub mod sensors;
pub mod stats;
pub mod validation;

pub use api::{ApiError, HttpTransport, Transport};
pub use config::Config;
pub use readings::ReadingService;
pub use sensors::SensorService;
