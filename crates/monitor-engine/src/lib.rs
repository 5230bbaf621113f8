//! Ward Monitoring Engine
//!
//! Ties the threshold evaluator, alert synthesizer, dedup store, and
//! amendment ledger together behind one facade, and drives the periodic
//! refresh loop that re-pulls source data and republishes active alerts.

use tracing::Level;
use tracing_subscriber::FmtSubscriber;

mod config;
mod engine;
mod error;
mod source;

pub use config::EngineConfig;
pub use engine::MonitorEngine;
pub use error::EngineError;
pub use source::{DataSource, FetchError, InMemorySource};

/// Initialize logging
pub fn init_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
}
