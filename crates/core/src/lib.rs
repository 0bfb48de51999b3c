pub mod catalog;
pub mod config;
pub mod error;
pub mod types;

pub use catalog::{Catalog, SimulationRequest};
pub use config::AppConfig;
pub use error::{SimError, SimResult};
