//! Risk assessment: bucket equipment by risk score and profile the
//! high-risk fleet.

use chrono::NaiveDate;
use egm_core::{Dataset, EgmResult, Equipment, EquipmentKind};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

/// Risk score at or above which equipment lands in the high bucket.
pub const HIGH_RISK_CUTOFF: f64 = 8.0;
/// Risk score at or above which equipment lands in at least the medium bucket.
pub const MEDIUM_RISK_CUTOFF: f64 = 5.0;

/// A high-risk equipment record with its maintenance rollup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HighRiskEquipment {
    pub equipment: Equipment,
    pub maintenance_count: usize,
    pub total_downtime_hours: f64,
    pub total_cost: f64,
    pub last_maintenance_date: Option<NaiveDate>,
}

/// Per-kind risk profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskByKind {
    pub count: usize,
    pub average_risk_score: f64,
    pub high_risk_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskResults {
    /// Full records for the high bucket, highest risk first
    pub high_risk_equipment: Vec<HighRiskEquipment>,
    pub risk_by_kind: BTreeMap<EquipmentKind, RiskByKind>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskSummary {
    pub high_risk: usize,
    pub medium_risk: usize,
    pub low_risk: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskReport {
    pub results: RiskResults,
    pub summary: RiskSummary,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Bucket equipment into high (risk >= 8), medium (5 <= risk < 8), and
/// low (< 5); return per-bucket counts and full records for the high
/// bucket, enriched with their maintenance history rollups.
pub fn risk_assessment(dataset: &Dataset) -> EgmResult<RiskReport> {
    debug!(equipment = dataset.equipment.len(), "bucketing equipment by risk score");
    let mut summary = RiskSummary {
        high_risk: 0,
        medium_risk: 0,
        low_risk: 0,
    };
    let mut high_risk_equipment = Vec::new();
    let mut by_kind: BTreeMap<EquipmentKind, (usize, f64, usize)> = BTreeMap::new();

    for eq in &dataset.equipment {
        let is_high = eq.risk_score >= HIGH_RISK_CUTOFF;
        if is_high {
            summary.high_risk += 1;
        } else if eq.risk_score >= MEDIUM_RISK_CUTOFF {
            summary.medium_risk += 1;
        } else {
            summary.low_risk += 1;
        }

        let entry = by_kind.entry(eq.kind).or_insert((0, 0.0, 0));
        entry.0 += 1;
        entry.1 += eq.risk_score;
        if is_high {
            entry.2 += 1;
        }

        if is_high {
            let history = dataset.maintenance_for(&eq.id);
            high_risk_equipment.push(HighRiskEquipment {
                maintenance_count: history.len(),
                total_downtime_hours: history.iter().map(|r| r.downtime_hours).sum(),
                total_cost: history.iter().map(|r| r.cost).sum(),
                last_maintenance_date: history.iter().map(|r| r.date).max(),
                equipment: eq.clone(),
            });
        }
    }

    high_risk_equipment.sort_by(|a, b| {
        b.equipment
            .risk_score
            .partial_cmp(&a.equipment.risk_score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.equipment.id.cmp(&b.equipment.id))
    });

    let risk_by_kind = by_kind
        .into_iter()
        .map(|(kind, (count, risk_sum, high_count))| {
            (
                kind,
                RiskByKind {
                    count,
                    average_risk_score: round2(risk_sum / count as f64),
                    high_risk_count: high_count,
                },
            )
        })
        .collect();

    Ok(RiskReport {
        results: RiskResults {
            high_risk_equipment,
            risk_by_kind,
        },
        summary,
    })
}
