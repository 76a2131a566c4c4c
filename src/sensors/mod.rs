pub mod service;

pub use service::{SensorResource, SensorService};
