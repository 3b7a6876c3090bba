//! Sensor anomaly detection.

use egm_core::{Dataset, EgmResult, SensorKind};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

/// A reading is anomalous when its deviation fraction
/// `|measured - expected| / |expected|` exceeds this threshold.
pub const ANOMALY_DEVIATION_THRESHOLD: f64 = 0.3;

/// One flagged reading.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorAnomaly {
    pub sensor_id: String,
    pub equipment_id: String,
    pub kind: SensorKind,
    pub measurement_value: f64,
    pub expected_value: f64,
    /// Deviation fraction relative to the expected baseline
    pub deviation: f64,
}

/// Anomaly profile for one sensor kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorKindStats {
    pub reading_count: usize,
    pub anomaly_count: usize,
    /// Mean deviation fraction across this kind's anomalies (0 when none)
    pub mean_deviation: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorResults {
    /// Flagged readings in dataset order
    pub anomalies: Vec<SensorAnomaly>,
    pub by_kind: BTreeMap<SensorKind, SensorKindStats>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorSummary {
    pub total_readings: usize,
    pub anomaly_count: usize,
    pub anomaly_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorReport {
    pub results: SensorResults,
    pub summary: SensorSummary,
}

fn deviation_fraction(measured: f64, expected: f64) -> f64 {
    if expected == 0.0 {
        // No baseline to compare against; report the raw magnitude.
        measured.abs()
    } else {
        (measured - expected).abs() / expected.abs()
    }
}

fn is_anomalous(measured: f64, expected: f64) -> bool {
    if expected == 0.0 {
        measured != 0.0
    } else {
        deviation_fraction(measured, expected) > ANOMALY_DEVIATION_THRESHOLD
    }
}

/// Flag readings deviating from their expected baseline beyond the fixed
/// threshold and profile anomalies per sensor kind.
pub fn sensor_anomalies(dataset: &Dataset) -> EgmResult<SensorReport> {
    debug!(readings = dataset.sensors.len(), "scanning sensor readings for anomalies");
    let mut anomalies = Vec::new();
    let mut by_kind: BTreeMap<SensorKind, (usize, usize, f64)> = BTreeMap::new();

    for sensor in &dataset.sensors {
        let entry = by_kind.entry(sensor.kind).or_insert((0, 0, 0.0));
        entry.0 += 1;

        if is_anomalous(sensor.measurement_value, sensor.expected_value) {
            let deviation = deviation_fraction(sensor.measurement_value, sensor.expected_value);
            entry.1 += 1;
            entry.2 += deviation;
            anomalies.push(SensorAnomaly {
                sensor_id: sensor.id.clone(),
                equipment_id: sensor.equipment_id.clone(),
                kind: sensor.kind,
                measurement_value: sensor.measurement_value,
                expected_value: sensor.expected_value,
                deviation,
            });
        }
    }

    let by_kind: BTreeMap<SensorKind, SensorKindStats> = by_kind
        .into_iter()
        .map(|(kind, (reading_count, anomaly_count, deviation_sum))| {
            (
                kind,
                SensorKindStats {
                    reading_count,
                    anomaly_count,
                    mean_deviation: if anomaly_count == 0 {
                        0.0
                    } else {
                        deviation_sum / anomaly_count as f64
                    },
                },
            )
        })
        .collect();

    let total_readings = dataset.sensors.len();
    let anomaly_count = anomalies.len();
    let summary = SensorSummary {
        total_readings,
        anomaly_count,
        anomaly_rate: if total_readings == 0 {
            0.0
        } else {
            anomaly_count as f64 / total_readings as f64
        },
    };

    Ok(SensorReport {
        results: SensorResults { anomalies, by_kind },
        summary,
    })
}
