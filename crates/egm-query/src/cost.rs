//! Maintenance cost analysis: aggregation by equipment kind and by month,
//! plus the costliest equipment ranking.

use egm_core::{Dataset, EgmResult, EquipmentKind};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Default size of the costliest-equipment ranking.
pub const DEFAULT_TOP_N: usize = 5;

/// Budget headroom applied on top of observed cost.
const BUDGET_BUFFER: f64 = 1.2;

/// Cost rollup for one equipment kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostByKind {
    pub maintenance_count: usize,
    pub total_cost: f64,
    pub average_cost: f64,
    pub total_downtime_hours: f64,
    /// Cost per downtime hour; 0 when no downtime was recorded
    pub cost_per_downtime_hour: f64,
}

/// Cost rollup for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyCost {
    /// Month key in `YYYY-MM` form
    pub month: String,
    pub total_cost: f64,
    pub maintenance_count: usize,
}

/// One entry of the costliest-equipment ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EquipmentCost {
    pub equipment_id: String,
    pub equipment_name: String,
    pub total_cost: f64,
    pub maintenance_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostResults {
    pub by_kind: BTreeMap<EquipmentKind, CostByKind>,
    /// Months in ascending order
    pub by_month: Vec<MonthlyCost>,
    /// Costliest equipment first
    pub top_equipment: Vec<EquipmentCost>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostSummary {
    pub total_cost: f64,
    pub maintenance_count: usize,
    pub month_count: usize,
    /// Observed total plus a 20% planning buffer
    pub recommended_annual_budget: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostReport {
    pub results: CostResults,
    pub summary: CostSummary,
}

/// Aggregate maintenance cost by equipment kind and by month, and rank
/// the `top_n` costliest equipment items (ties broken by id).
pub fn cost_analysis(dataset: &Dataset, top_n: usize) -> EgmResult<CostReport> {
    debug!(records = dataset.maintenance_records.len(), top_n, "aggregating maintenance costs");
    let kind_of: HashMap<&str, EquipmentKind> = dataset
        .equipment
        .iter()
        .map(|eq| (eq.id.as_str(), eq.kind))
        .collect();
    let name_of: HashMap<&str, &str> = dataset
        .equipment
        .iter()
        .map(|eq| (eq.id.as_str(), eq.name.as_str()))
        .collect();

    let mut by_kind: BTreeMap<EquipmentKind, (usize, f64, f64)> = BTreeMap::new();
    let mut by_month: BTreeMap<String, (f64, usize)> = BTreeMap::new();
    let mut by_equipment: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    let mut total_cost = 0.0;

    for record in &dataset.maintenance_records {
        total_cost += record.cost;

        if let Some(kind) = kind_of.get(record.equipment_id.as_str()) {
            let entry = by_kind.entry(*kind).or_insert((0, 0.0, 0.0));
            entry.0 += 1;
            entry.1 += record.cost;
            entry.2 += record.downtime_hours;
        }

        let month = record.date.format("%Y-%m").to_string();
        let entry = by_month.entry(month).or_insert((0.0, 0));
        entry.0 += record.cost;
        entry.1 += 1;

        let entry = by_equipment
            .entry(record.equipment_id.as_str())
            .or_insert((0.0, 0));
        entry.0 += record.cost;
        entry.1 += 1;
    }

    let by_kind: BTreeMap<EquipmentKind, CostByKind> = by_kind
        .into_iter()
        .map(|(kind, (count, cost, downtime))| {
            (
                kind,
                CostByKind {
                    maintenance_count: count,
                    total_cost: cost,
                    average_cost: cost / count as f64,
                    total_downtime_hours: downtime,
                    cost_per_downtime_hour: if downtime > 0.0 { cost / downtime } else { 0.0 },
                },
            )
        })
        .collect();

    let by_month: Vec<MonthlyCost> = by_month
        .into_iter()
        .map(|(month, (cost, count))| MonthlyCost {
            month,
            total_cost: cost,
            maintenance_count: count,
        })
        .collect();

    let mut top_equipment: Vec<EquipmentCost> = by_equipment
        .into_iter()
        .map(|(id, (cost, count))| EquipmentCost {
            equipment_id: id.to_string(),
            equipment_name: name_of.get(id).unwrap_or(&id).to_string(),
            total_cost: cost,
            maintenance_count: count,
        })
        .collect();
    top_equipment.sort_by(|a, b| {
        b.total_cost
            .partial_cmp(&a.total_cost)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.equipment_id.cmp(&b.equipment_id))
    });
    top_equipment.truncate(top_n);

    let summary = CostSummary {
        total_cost,
        maintenance_count: dataset.maintenance_records.len(),
        month_count: by_month.len(),
        recommended_annual_budget: total_cost * BUDGET_BUFFER,
    };

    Ok(CostReport {
        results: CostResults {
            by_kind,
            by_month,
            top_equipment,
        },
        summary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use egm_core::{
        Equipment, EquipmentStatus, MaintenanceKind, MaintenanceRecord, MaintenanceStatus, Region,
    };

    fn equipment(id: &str, kind: EquipmentKind) -> Equipment {
        Equipment {
            id: id.to_string(),
            name: format!("Equipment {id}"),
            kind,
            location: Region::North,
            installation_date: NaiveDate::from_ymd_opt(2019, 1, 1).unwrap(),
            capacity: None,
            voltage: Some(110),
            status: EquipmentStatus::Operational,
            risk_score: 2.0,
            last_maintenance: None,
        }
    }

    fn record(id: &str, equipment_id: &str, date: (i32, u32, u32), cost: f64, downtime: f64) -> MaintenanceRecord {
        MaintenanceRecord {
            id: id.to_string(),
            equipment_id: equipment_id.to_string(),
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            kind: MaintenanceKind::Preventive,
            description: "Cooling system maintenance".to_string(),
            description_en: "Cooling system maintenance".to_string(),
            root_cause: None,
            downtime_hours: downtime,
            cost,
            technician: "Tech_05".to_string(),
            status: MaintenanceStatus::Completed,
        }
    }

    fn fixture() -> Dataset {
        Dataset {
            equipment: vec![
                equipment("generator_001", EquipmentKind::Generator),
                equipment("bus_001", EquipmentKind::Bus),
            ],
            maintenance_records: vec![
                record("maint_0001", "generator_001", (2023, 1, 10), 4000.0, 8.0),
                record("maint_0002", "generator_001", (2023, 1, 20), 6000.0, 2.0),
                record("maint_0003", "bus_001", (2023, 2, 5), 1500.0, 0.0),
            ],
            ..Dataset::default()
        }
    }

    #[test]
    fn aggregates_by_kind() {
        let report = cost_analysis(&fixture(), DEFAULT_TOP_N).unwrap();
        let generators = &report.results.by_kind[&EquipmentKind::Generator];
        assert_eq!(generators.maintenance_count, 2);
        assert!((generators.total_cost - 10000.0).abs() < 1e-9);
        assert!((generators.average_cost - 5000.0).abs() < 1e-9);
        assert!((generators.cost_per_downtime_hour - 1000.0).abs() < 1e-9);

        let buses = &report.results.by_kind[&EquipmentKind::Bus];
        assert!((buses.cost_per_downtime_hour - 0.0).abs() < 1e-12);
    }

    #[test]
    fn aggregates_by_month_in_order() {
        let report = cost_analysis(&fixture(), DEFAULT_TOP_N).unwrap();
        let months: Vec<&str> = report
            .results
            .by_month
            .iter()
            .map(|m| m.month.as_str())
            .collect();
        assert_eq!(months, vec!["2023-01", "2023-02"]);
        assert!((report.results.by_month[0].total_cost - 10000.0).abs() < 1e-9);
    }

    #[test]
    fn ranks_costliest_equipment() {
        let report = cost_analysis(&fixture(), 1).unwrap();
        assert_eq!(report.results.top_equipment.len(), 1);
        assert_eq!(report.results.top_equipment[0].equipment_id, "generator_001");
    }

    #[test]
    fn summary_totals_and_budget() {
        let report = cost_analysis(&fixture(), DEFAULT_TOP_N).unwrap();
        assert!((report.summary.total_cost - 11500.0).abs() < 1e-9);
        assert_eq!(report.summary.maintenance_count, 3);
        assert_eq!(report.summary.month_count, 2);
        assert!((report.summary.recommended_annual_budget - 13800.0).abs() < 1e-9);
    }

    #[test]
    fn empty_dataset_yields_empty_report() {
        let report = cost_analysis(&Dataset::default(), DEFAULT_TOP_N).unwrap();
        assert!(report.results.by_kind.is_empty());
        assert!(report.results.by_month.is_empty());
        assert!(report.results.top_equipment.is_empty());
        assert!((report.summary.total_cost - 0.0).abs() < 1e-12);
    }
}
