pub mod service;

pub use service::{ReadingResource, ReadingService};
