//! Ward Monitor - Main Entry Point
//!
//! Wires the engine to an in-memory data source with sample ward data and
//! drives the refresh loop until interrupted.

use monitor_engine::{init_logging, EngineConfig, InMemorySource, MonitorEngine};
use std::collections::BTreeMap;
use std::sync::Arc;
use threshold_eval::{FieldDataType, ThresholdConfig};
use tracing::info;
use ward_model::{BedOccupancy, CriticalPatient, Reading, VitalSign};

fn demo_source() -> InMemorySource {
    let source = InMemorySource::new();

    source.set_thresholds(vec![
        ThresholdConfig {
            name: "heart_rate".to_string(),
            label: "Heart Rate".to_string(),
            unit: "bpm".to_string(),
            normal_min: Some(60.0),
            normal_max: Some(100.0),
            data_type: FieldDataType::Integer,
            is_active: true,
            display_order: 1,
        },
        ThresholdConfig {
            name: "spo2".to_string(),
            label: "SpO2".to_string(),
            unit: "%".to_string(),
            normal_min: Some(95.0),
            normal_max: Some(100.0),
            data_type: FieldDataType::Integer,
            is_active: true,
            display_order: 2,
        },
    ]);

    let mut values = BTreeMap::new();
    values.insert(VitalSign::HeartRate, 132.0);
    values.insert(VitalSign::Spo2, 91.0);
    source.set_patients(vec![CriticalPatient {
        patient_id: "p-1001".to_string(),
        patient_name: "Sample Patient".to_string(),
        bed_number: "B-12".to_string(),
        latest_reading: Reading::new("p-1001", values, "nurse-demo"),
    }]);

    source.set_occupancy(BedOccupancy {
        total_beds: 10,
        occupied_beds: 9,
    });

    source
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    info!("=== Ward Monitor v{} ===", env!("CARGO_PKG_VERSION"));

    let config = EngineConfig::load(None)?;
    let engine = Arc::new(MonitorEngine::new(config, Arc::new(demo_source())));

    let active = engine.refresh()?;
    info!(active, "initial refresh complete");
    for alert in engine.get_active_alerts() {
        info!("{}", serde_json::to_string(&alert)?);
    }

    let loop_task = {
        let engine = engine.clone();
        tokio::spawn(async move { engine.run().await })
    };

    tokio::signal::ctrl_c().await?;
    info!("shutting down");
    engine.stop();
    loop_task.abort();

    Ok(())
}
