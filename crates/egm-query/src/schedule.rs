//! Two-week maintenance schedule planning.

use chrono::{Duration, NaiveDate};
use egm_core::{Dataset, EgmError, EgmResult, Equipment, EquipmentKind, MaintenanceKind};
use serde::Serialize;
use tracing::debug;

/// Risk score at or above which equipment is always high priority.
pub const HIGH_RISK_CUTOFF: f64 = 8.0;
/// Risk score at or above which equipment is at least medium priority.
pub const MEDIUM_RISK_CUTOFF: f64 = 5.0;
/// Days since maintenance beyond which equipment is high priority.
pub const HIGH_OVERDUE_DAYS: i64 = 365;
/// Lower bound of the medium-priority overdue window.
pub const MEDIUM_OVERDUE_DAYS: i64 = 180;
/// Low-priority equipment only gets a routine task past this window.
pub const ROUTINE_INSPECTION_DAYS: i64 = 90;

/// Task priority; variant order is scheduling order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleOptions {
    /// Date the two-week window opens
    pub as_of: NaiveDate,
    /// Restrict the schedule to one equipment item; unknown ids fail
    /// with [`EgmError::NotFound`]
    pub equipment_id: Option<String>,
}

impl ScheduleOptions {
    pub fn new(as_of: NaiveDate) -> Self {
        Self {
            as_of,
            equipment_id: None,
        }
    }

    pub fn for_equipment(as_of: NaiveDate, equipment_id: impl Into<String>) -> Self {
        Self {
            as_of,
            equipment_id: Some(equipment_id.into()),
        }
    }
}

/// One planned maintenance intervention.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaintenanceTask {
    pub equipment_id: String,
    pub equipment_name: String,
    pub equipment_kind: EquipmentKind,
    pub priority: Priority,
    pub maintenance_kind: MaintenanceKind,
    pub scheduled_date: NaiveDate,
    pub estimated_duration_hours: f64,
    pub estimated_cost: f64,
    pub days_since_maintenance: i64,
    pub risk_score: f64,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleResults {
    pub week_1: Vec<MaintenanceTask>,
    pub week_2: Vec<MaintenanceTask>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleSummary {
    pub total_tasks: usize,
    pub week_1_tasks: usize,
    pub week_2_tasks: usize,
    pub high_priority_tasks: usize,
    pub medium_priority_tasks: usize,
    pub low_priority_tasks: usize,
    pub total_estimated_cost: f64,
    pub total_estimated_duration_hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleReport {
    pub results: ScheduleResults,
    pub summary: ScheduleSummary,
}

/// Base effort per equipment kind: (duration hours, cost) at medium
/// priority. High doubles the base, low halves it.
fn base_effort(kind: EquipmentKind) -> (f64, f64) {
    match kind {
        EquipmentKind::Generator => (8.0, 4000.0),
        EquipmentKind::Transformer => (6.0, 3000.0),
        EquipmentKind::Bus => (4.0, 1500.0),
        EquipmentKind::Link => (3.0, 1200.0),
        EquipmentKind::Switch => (2.0, 800.0),
    }
}

fn priority_multiplier(priority: Priority) -> f64 {
    match priority {
        Priority::High => 2.0,
        Priority::Medium => 1.0,
        Priority::Low => 0.5,
    }
}

fn classify(equipment: &Equipment, days_since: i64) -> Priority {
    if days_since > HIGH_OVERDUE_DAYS || equipment.risk_score >= HIGH_RISK_CUTOFF {
        Priority::High
    } else if (MEDIUM_OVERDUE_DAYS..=HIGH_OVERDUE_DAYS).contains(&days_since)
        || equipment.risk_score >= MEDIUM_RISK_CUTOFF
    {
        Priority::Medium
    } else {
        Priority::Low
    }
}

fn needs_attention(priority: Priority, days_since: i64) -> bool {
    match priority {
        Priority::High | Priority::Medium => true,
        Priority::Low => days_since >= ROUTINE_INSPECTION_DAYS,
    }
}

fn reason_for(priority: Priority) -> &'static str {
    match priority {
        Priority::High => "High risk equipment requiring immediate attention",
        Priority::Medium => "Scheduled preventive maintenance",
        Priority::Low => "Routine inspection",
    }
}

/// Day offsets inside the two-week window, cycled per priority class so
/// tasks spread over the class's slot without any randomness.
fn scheduled_offset(priority: Priority, index_in_class: usize) -> i64 {
    match priority {
        Priority::High => 1 + (index_in_class % 3) as i64,
        Priority::Medium => 4 + (index_in_class % 4) as i64,
        Priority::Low => 8 + (index_in_class % 7) as i64,
    }
}

/// Compute the maintenance schedule for the two weeks following
/// `opts.as_of`: one task per equipment item needing attention, grouped
/// into weekly buckets, ordered priority-first then soonest-due.
pub fn maintenance_schedule(dataset: &Dataset, opts: &ScheduleOptions) -> EgmResult<ScheduleReport> {
    debug!(as_of = %opts.as_of, equipment = ?opts.equipment_id, "planning two-week maintenance schedule");
    let candidates: Vec<&Equipment> = match &opts.equipment_id {
        Some(id) => {
            let eq = dataset
                .equipment_by_id(id)
                .ok_or_else(|| EgmError::NotFound(format!("equipment '{}'", id)))?;
            vec![eq]
        }
        None => dataset.equipment.iter().collect(),
    };

    let mut tasks = Vec::new();
    let mut class_counts = [0usize; 3];
    for eq in candidates {
        let days_since = eq.days_since_maintenance(opts.as_of);
        let priority = classify(eq, days_since);
        if !needs_attention(priority, days_since) {
            continue;
        }

        let index_in_class = class_counts[priority as usize];
        class_counts[priority as usize] += 1;

        let (base_duration, base_cost) = base_effort(eq.kind);
        let multiplier = priority_multiplier(priority);
        let maintenance_kind = match priority {
            Priority::High => MaintenanceKind::Corrective,
            _ => MaintenanceKind::Preventive,
        };

        tasks.push(MaintenanceTask {
            equipment_id: eq.id.clone(),
            equipment_name: eq.name.clone(),
            equipment_kind: eq.kind,
            priority,
            maintenance_kind,
            scheduled_date: opts.as_of + Duration::days(scheduled_offset(priority, index_in_class)),
            estimated_duration_hours: base_duration * multiplier,
            estimated_cost: base_cost * multiplier,
            days_since_maintenance: days_since,
            risk_score: eq.risk_score,
            reason: reason_for(priority).to_string(),
        });
    }

    tasks.sort_by(|a, b| {
        a.priority
            .cmp(&b.priority)
            .then_with(|| a.scheduled_date.cmp(&b.scheduled_date))
            .then_with(|| a.equipment_id.cmp(&b.equipment_id))
    });

    let summary = ScheduleSummary {
        total_tasks: tasks.len(),
        week_1_tasks: 0,
        week_2_tasks: 0,
        high_priority_tasks: tasks.iter().filter(|t| t.priority == Priority::High).count(),
        medium_priority_tasks: tasks
            .iter()
            .filter(|t| t.priority == Priority::Medium)
            .count(),
        low_priority_tasks: tasks.iter().filter(|t| t.priority == Priority::Low).count(),
        total_estimated_cost: tasks.iter().map(|t| t.estimated_cost).sum(),
        total_estimated_duration_hours: tasks.iter().map(|t| t.estimated_duration_hours).sum(),
    };

    let week_boundary = opts.as_of + Duration::days(7);
    let (week_1, week_2): (Vec<MaintenanceTask>, Vec<MaintenanceTask>) = tasks
        .into_iter()
        .partition(|task| task.scheduled_date <= week_boundary);

    let summary = ScheduleSummary {
        week_1_tasks: week_1.len(),
        week_2_tasks: week_2.len(),
        ..summary
    };

    Ok(ScheduleReport {
        results: ScheduleResults { week_1, week_2 },
        summary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use egm_core::{EquipmentStatus, Region};

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    fn equipment(id: &str, risk: f64, last_maintenance_days_ago: i64) -> Equipment {
        Equipment {
            id: id.to_string(),
            name: format!("Equipment {id}"),
            kind: EquipmentKind::Transformer,
            location: Region::South,
            installation_date: as_of() - Duration::days(2000),
            capacity: Some(400.0),
            voltage: Some(380),
            status: EquipmentStatus::Operational,
            risk_score: risk,
            last_maintenance: Some(as_of() - Duration::days(last_maintenance_days_ago)),
        }
    }

    fn dataset(equipment: Vec<Equipment>) -> Dataset {
        Dataset {
            equipment,
            ..Dataset::default()
        }
    }

    #[test]
    fn overdue_equipment_is_high_priority() {
        let ds = dataset(vec![equipment("transformer_001", 2.0, 400)]);
        let report = maintenance_schedule(&ds, &ScheduleOptions::new(as_of())).unwrap();
        assert_eq!(report.summary.high_priority_tasks, 1);
        assert_eq!(report.results.week_1[0].priority, Priority::High);
    }

    #[test]
    fn high_risk_score_is_high_priority_even_when_recent() {
        let ds = dataset(vec![equipment("transformer_001", 8.0, 10)]);
        let report = maintenance_schedule(&ds, &ScheduleOptions::new(as_of())).unwrap();
        assert_eq!(report.summary.high_priority_tasks, 1);
    }

    #[test]
    fn medium_window_boundaries() {
        // Exactly 180 and exactly 365 days both land in the medium window.
        for days in [180, 365] {
            let ds = dataset(vec![equipment("transformer_001", 2.0, days)]);
            let report = maintenance_schedule(&ds, &ScheduleOptions::new(as_of())).unwrap();
            assert_eq!(report.summary.medium_priority_tasks, 1, "days={days}");
        }
    }

    #[test]
    fn medium_risk_cutoff_is_inclusive() {
        let ds = dataset(vec![equipment("transformer_001", 5.0, 10)]);
        let report = maintenance_schedule(&ds, &ScheduleOptions::new(as_of())).unwrap();
        assert_eq!(report.summary.medium_priority_tasks, 1);
    }

    #[test]
    fn fresh_low_risk_equipment_gets_no_task() {
        let ds = dataset(vec![equipment("transformer_001", 1.0, 30)]);
        let report = maintenance_schedule(&ds, &ScheduleOptions::new(as_of())).unwrap();
        assert_eq!(report.summary.total_tasks, 0);
    }

    #[test]
    fn low_priority_routine_window() {
        let ds = dataset(vec![equipment("transformer_001", 1.0, 120)]);
        let report = maintenance_schedule(&ds, &ScheduleOptions::new(as_of())).unwrap();
        assert_eq!(report.summary.low_priority_tasks, 1);
        // Low tasks land in week 2.
        assert_eq!(report.summary.week_2_tasks, 1);
    }

    #[test]
    fn effort_scales_with_kind_and_priority() {
        let mut eq = equipment("generator_001", 9.0, 10);
        eq.kind = EquipmentKind::Generator;
        let ds = dataset(vec![eq]);
        let report = maintenance_schedule(&ds, &ScheduleOptions::new(as_of())).unwrap();
        let task = &report.results.week_1[0];
        assert!((task.estimated_duration_hours - 16.0).abs() < 1e-9);
        assert!((task.estimated_cost - 8000.0).abs() < 1e-9);
        assert_eq!(task.maintenance_kind, MaintenanceKind::Corrective);
    }

    #[test]
    fn tasks_ordered_priority_first_then_due_date() {
        let ds = dataset(vec![
            equipment("a_low", 1.0, 120),
            equipment("b_high", 9.0, 10),
            equipment("c_medium", 6.0, 10),
        ]);
        let report = maintenance_schedule(&ds, &ScheduleOptions::new(as_of())).unwrap();
        let all: Vec<&MaintenanceTask> = report
            .results
            .week_1
            .iter()
            .chain(report.results.week_2.iter())
            .collect();
        let ids: Vec<&str> = all.iter().map(|t| t.equipment_id.as_str()).collect();
        assert_eq!(ids, vec!["b_high", "c_medium", "a_low"]);
    }

    #[test]
    fn unknown_equipment_fails_not_found() {
        let ds = dataset(vec![equipment("transformer_001", 2.0, 30)]);
        let err = maintenance_schedule(
            &ds,
            &ScheduleOptions::for_equipment(as_of(), "transformer_404"),
        )
        .unwrap_err();
        assert!(matches!(err, EgmError::NotFound(_)));
    }

    #[test]
    fn single_equipment_filter() {
        let ds = dataset(vec![
            equipment("transformer_001", 9.0, 10),
            equipment("transformer_002", 9.0, 10),
        ]);
        let report = maintenance_schedule(
            &ds,
            &ScheduleOptions::for_equipment(as_of(), "transformer_002"),
        )
        .unwrap();
        assert_eq!(report.summary.total_tasks, 1);
        assert_eq!(report.results.week_1[0].equipment_id, "transformer_002");
    }

    #[test]
    fn never_maintained_equipment_uses_installation_age() {
        let mut eq = equipment("transformer_001", 1.0, 0);
        eq.last_maintenance = None;
        // Installed 2000 days ago, never maintained: overdue, high priority.
        let ds = dataset(vec![eq]);
        let report = maintenance_schedule(&ds, &ScheduleOptions::new(as_of())).unwrap();
        assert_eq!(report.summary.high_priority_tasks, 1);
    }
}
