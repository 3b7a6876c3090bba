//! Vibration-issue search: the canned stand-in for the "equipment with
//! vibration-related maintenance" graph query.

use egm_core::{Dataset, EgmResult, MaintenanceRecord};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

/// Case-insensitive substring every matching description must contain.
pub const VIBRATION_KEYWORD: &str = "vibration";

/// One equipment item with its vibration-related maintenance history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EquipmentVibrationIssues {
    pub equipment_id: String,
    pub equipment_name: String,
    pub issue_count: usize,
    pub total_downtime_hours: f64,
    pub total_cost: f64,
    /// Matching records, most recent first
    pub records: Vec<MaintenanceRecord>,
}

/// How often a particular issue description occurred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueFrequency {
    pub description: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VibrationSummary {
    pub total_equipment_affected: usize,
    pub total_vibration_issues: usize,
    pub total_downtime_hours: f64,
    pub total_cost: f64,
    /// Five most frequent issue descriptions
    pub common_issues: Vec<IssueFrequency>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VibrationReport {
    pub results: Vec<EquipmentVibrationIssues>,
    pub summary: VibrationSummary,
}

/// Collect, per equipment, all maintenance records whose description
/// contains "vibration" (case-insensitive), most recent first, with
/// per-equipment and dataset-wide totals. Equipment is ordered by issue
/// count descending, ties by id.
pub fn vibration_search(dataset: &Dataset) -> EgmResult<VibrationReport> {
    debug!(records = dataset.maintenance_records.len(), "searching maintenance records for vibration issues");
    let mut frequencies: BTreeMap<&str, usize> = BTreeMap::new();
    let mut results = Vec::new();

    for eq in &dataset.equipment {
        let mut records: Vec<MaintenanceRecord> = dataset
            .maintenance_records
            .iter()
            .filter(|record| {
                record.equipment_id == eq.id
                    && record.description.to_lowercase().contains(VIBRATION_KEYWORD)
            })
            .cloned()
            .collect();
        if records.is_empty() {
            continue;
        }
        records.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.id.cmp(&b.id)));

        results.push(EquipmentVibrationIssues {
            equipment_id: eq.id.clone(),
            equipment_name: eq.name.clone(),
            issue_count: records.len(),
            total_downtime_hours: records.iter().map(|r| r.downtime_hours).sum(),
            total_cost: records.iter().map(|r| r.cost).sum(),
            records,
        });
    }

    results.sort_by(|a, b| {
        b.issue_count
            .cmp(&a.issue_count)
            .then_with(|| a.equipment_id.cmp(&b.equipment_id))
    });

    for entry in &results {
        for record in &entry.records {
            *frequencies.entry(record.description.as_str()).or_insert(0) += 1;
        }
    }
    let mut common_issues: Vec<IssueFrequency> = frequencies
        .into_iter()
        .map(|(description, count)| IssueFrequency {
            description: description.to_string(),
            count,
        })
        .collect();
    common_issues.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.description.cmp(&b.description))
    });
    common_issues.truncate(5);

    let summary = VibrationSummary {
        total_equipment_affected: results.len(),
        total_vibration_issues: results.iter().map(|r| r.issue_count).sum(),
        total_downtime_hours: results.iter().map(|r| r.total_downtime_hours).sum(),
        total_cost: results.iter().map(|r| r.total_cost).sum(),
        common_issues,
    };

    Ok(VibrationReport { results, summary })
}
