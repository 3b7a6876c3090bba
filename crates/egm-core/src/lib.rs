//! # egm-core: Energy Grid Management Data Core
//!
//! Provides the typed entity records and the dataset container shared by the
//! mock-data generators, the persistence layer, and the query-simulation
//! layer.
//!
//! ## Design Philosophy
//!
//! The live application keeps this data in a graph database; for testing and
//! demos the same records live in one in-memory [`Dataset`]:
//! - **Entities**: Equipment, MaintenanceRecord, Sensor, Alert, Customer,
//!   Installation — flat records with enumerated fields, validated at
//!   assembly time rather than duck-typed at access time.
//! - **Topology**: equipment-to-equipment feed edges and
//!   equipment-to-installation attachments live in a separate
//!   [`topology::TopologyEdges`] structure (a petgraph `DiGraph` once built),
//!   mirroring the relationships the graph database would hold.
//!
//! Entities are created once at generation time and are immutable within a
//! run; the assembler owns the collections and consumers receive read-only
//! views, so concurrent reads need no locking.
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::NaiveDate;
//! use egm_core::*;
//!
//! let equipment = Equipment {
//!     id: "generator_001".to_string(),
//!     name: "Generator 1".to_string(),
//!     kind: EquipmentKind::Generator,
//!     location: Region::North,
//!     installation_date: NaiveDate::from_ymd_opt(2020, 3, 14).unwrap(),
//!     capacity: Some(180.0),
//!     voltage: Some(380),
//!     status: EquipmentStatus::Operational,
//!     risk_score: 4.2,
//!     last_maintenance: NaiveDate::from_ymd_opt(2023, 11, 2),
//! };
//!
//! let dataset = Dataset {
//!     equipment: vec![equipment],
//!     ..Dataset::default()
//! };
//! assert_eq!(dataset.stats().num_equipment, 1);
//! ```
//!
//! ## Modules
//!
//! - [`diagnostics`] - Validation issue collection and reporting
//! - [`error`] - Unified [`EgmError`] taxonomy
//! - [`topology`] - Dependency graph over equipment feed edges
//! - [`dates`] - Serde format for second-resolution timestamps

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub mod dates;
pub mod diagnostics;
pub mod error;
pub mod topology;

pub use diagnostics::{DiagnosticIssue, Diagnostics, Severity};
pub use error::{EgmError, EgmResult};
pub use topology::{DependencyGraph, EquipmentLink, InstallationLink, TopologyEdges};

/// Schema version written into persisted datasets. Loading any other
/// version fails with [`EgmError::Serialization`].
pub const SCHEMA_VERSION: u32 = 1;

/// Kind of grid infrastructure an equipment record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EquipmentKind {
    Generator,
    Transformer,
    Bus,
    Link,
    Switch,
}

impl EquipmentKind {
    pub const ALL: [EquipmentKind; 5] = [
        EquipmentKind::Generator,
        EquipmentKind::Transformer,
        EquipmentKind::Bus,
        EquipmentKind::Link,
        EquipmentKind::Switch,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EquipmentKind::Generator => "Generator",
            EquipmentKind::Transformer => "Transformer",
            EquipmentKind::Bus => "Bus",
            EquipmentKind::Link => "Link",
            EquipmentKind::Switch => "Switch",
        }
    }

    /// Lowercase prefix used when forming equipment identifiers
    /// (`generator_001`, `switch_017`, ...).
    pub fn id_prefix(&self) -> &'static str {
        match self {
            EquipmentKind::Generator => "generator",
            EquipmentKind::Transformer => "transformer",
            EquipmentKind::Bus => "bus",
            EquipmentKind::Link => "link",
            EquipmentKind::Switch => "switch",
        }
    }

    /// Position in the feed chain Generator -> Bus -> Transformer -> Link
    /// -> Switch, used when synthesizing topology edges.
    pub fn feed_rank(&self) -> usize {
        match self {
            EquipmentKind::Generator => 0,
            EquipmentKind::Bus => 1,
            EquipmentKind::Transformer => 2,
            EquipmentKind::Link => 3,
            EquipmentKind::Switch => 4,
        }
    }
}

impl std::fmt::Display for EquipmentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Service region an entity belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Region {
    North,
    South,
    East,
    West,
    Central,
}

impl Region {
    pub const ALL: [Region; 5] = [
        Region::North,
        Region::South,
        Region::East,
        Region::West,
        Region::Central,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Region::North => "North",
            Region::South => "South",
            Region::East => "East",
            Region::West => "West",
            Region::Central => "Central",
        }
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operational status of a piece of equipment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EquipmentStatus {
    Operational,
    Maintenance,
    Faulty,
}

/// A piece of grid infrastructure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    /// Unique identifier across the dataset (e.g. `transformer_007`)
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: EquipmentKind,
    pub location: Region,
    pub installation_date: NaiveDate,
    /// Rated capacity in MW; only generators and transformers carry one
    pub capacity: Option<f64>,
    /// Nominal voltage in kV
    pub voltage: Option<u32>,
    pub status: EquipmentStatus,
    /// Failure-likelihood scalar in [0, 10]
    pub risk_score: f64,
    pub last_maintenance: Option<NaiveDate>,
}

impl Equipment {
    /// Age in whole days at the given reference date.
    pub fn age_days(&self, as_of: NaiveDate) -> i64 {
        (as_of - self.installation_date).num_days()
    }

    /// Days since the last maintenance at the given reference date, falling
    /// back to the installation date for never-maintained equipment.
    pub fn days_since_maintenance(&self, as_of: NaiveDate) -> i64 {
        let anchor = self.last_maintenance.unwrap_or(self.installation_date);
        (as_of - anchor).num_days()
    }
}

/// Kind of maintenance intervention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaintenanceKind {
    Preventive,
    Corrective,
    Emergency,
}

impl MaintenanceKind {
    pub const ALL: [MaintenanceKind; 3] = [
        MaintenanceKind::Preventive,
        MaintenanceKind::Corrective,
        MaintenanceKind::Emergency,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaintenanceStatus {
    Scheduled,
    Completed,
}

/// A logged service event tied to one equipment item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceRecord {
    pub id: String,
    /// Owning equipment identifier; must reference an existing record
    pub equipment_id: String,
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub kind: MaintenanceKind,
    pub description: String,
    /// English rendering of the description (source data is bilingual)
    pub description_en: String,
    pub root_cause: Option<String>,
    pub downtime_hours: f64,
    pub cost: f64,
    pub technician: String,
    pub status: MaintenanceStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SensorKind {
    Temperature,
    Vibration,
    Pressure,
    Current,
    Voltage,
}

impl SensorKind {
    pub const ALL: [SensorKind; 5] = [
        SensorKind::Temperature,
        SensorKind::Vibration,
        SensorKind::Pressure,
        SensorKind::Current,
        SensorKind::Voltage,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SensorKind::Temperature => "Temperature",
            SensorKind::Vibration => "Vibration",
            SensorKind::Pressure => "Pressure",
            SensorKind::Current => "Current",
            SensorKind::Voltage => "Voltage",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SensorStatus {
    Active,
    Inactive,
    Faulty,
}

/// A single sensor reading attached to one equipment item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sensor {
    pub id: String,
    pub equipment_id: String,
    #[serde(rename = "type")]
    pub kind: SensorKind,
    pub measurement_value: f64,
    /// Expected baseline for this reading; anomaly detection compares
    /// measured against this value
    pub expected_value: f64,
    #[serde(with = "dates::timestamp")]
    pub measurement_date: NaiveDateTime,
    pub status: SensorStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlertKind {
    #[serde(rename = "High Temperature")]
    HighTemperature,
    #[serde(rename = "Vibration Alert")]
    VibrationAlert,
    #[serde(rename = "Pressure Warning")]
    PressureWarning,
    Overload,
}

impl AlertKind {
    pub const ALL: [AlertKind; 4] = [
        AlertKind::HighTemperature,
        AlertKind::VibrationAlert,
        AlertKind::PressureWarning,
        AlertKind::Overload,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AlertSeverity {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    Active,
    Acknowledged,
    Resolved,
}

/// An operational alert raised against one equipment item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: String,
    pub equipment_id: String,
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub severity: AlertSeverity,
    #[serde(with = "dates::timestamp")]
    pub date: NaiveDateTime,
    pub description: String,
    pub status: AlertStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CustomerKind {
    Residential,
    Commercial,
    Industrial,
}

impl CustomerKind {
    pub const ALL: [CustomerKind; 3] = [
        CustomerKind::Residential,
        CustomerKind::Commercial,
        CustomerKind::Industrial,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CustomerKind::Residential => "Residential",
            CustomerKind::Commercial => "Commercial",
            CustomerKind::Industrial => "Industrial",
        }
    }
}

/// A supplied customer, linked 1:1 to an installation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: CustomerKind,
    pub region: Region,
    pub installation_id: String,
}

/// A metered installation connecting a customer to the grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Installation {
    pub id: String,
    pub installation_number: String,
    pub customer_id: String,
    pub installation_date: NaiveDate,
    #[serde(rename = "type")]
    pub kind: CustomerKind,
    pub region: Region,
    pub consumption_value: f64,
}

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

/// The complete in-memory collection of all entity types for one
/// generation run. List order is insertion order and round-trips through
/// persistence unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default = "default_schema_version")]
    pub version: u32,
    pub equipment: Vec<Equipment>,
    pub maintenance_records: Vec<MaintenanceRecord>,
    pub sensors: Vec<Sensor>,
    pub alerts: Vec<Alert>,
    pub customers: Vec<Customer>,
    pub installations: Vec<Installation>,
}

impl Default for Dataset {
    fn default() -> Self {
        Self {
            version: SCHEMA_VERSION,
            equipment: Vec::new(),
            maintenance_records: Vec::new(),
            sensors: Vec::new(),
            alerts: Vec::new(),
            customers: Vec::new(),
            installations: Vec::new(),
        }
    }
}

impl Dataset {
    pub fn equipment_by_id(&self, id: &str) -> Option<&Equipment> {
        self.equipment.iter().find(|eq| eq.id == id)
    }

    pub fn contains_equipment(&self, id: &str) -> bool {
        self.equipment_by_id(id).is_some()
    }

    /// Maintenance records owned by the given equipment, in insertion order.
    pub fn maintenance_for(&self, equipment_id: &str) -> Vec<&MaintenanceRecord> {
        self.maintenance_records
            .iter()
            .filter(|record| record.equipment_id == equipment_id)
            .collect()
    }

    /// Compute basic statistics about the dataset
    pub fn stats(&self) -> DatasetStats {
        let mut stats = DatasetStats {
            num_equipment: self.equipment.len(),
            num_maintenance_records: self.maintenance_records.len(),
            num_sensors: self.sensors.len(),
            num_alerts: self.alerts.len(),
            num_customers: self.customers.len(),
            num_installations: self.installations.len(),
            ..DatasetStats::default()
        };

        for record in &self.maintenance_records {
            stats.total_maintenance_cost += record.cost;
            stats.total_downtime_hours += record.downtime_hours;
        }
        if !self.equipment.is_empty() {
            stats.mean_risk_score = self.equipment.iter().map(|eq| eq.risk_score).sum::<f64>()
                / self.equipment.len() as f64;
        }
        stats
    }

    /// Validate dataset invariants, populating the provided `Diagnostics`
    /// with any warnings/errors found. This is the preferred validation
    /// entry point; assembly and load both call it.
    pub fn validate_into(&self, diag: &mut Diagnostics) {
        let mut equipment_ids = HashSet::new();
        for eq in &self.equipment {
            if !equipment_ids.insert(eq.id.as_str()) {
                diag.add_error_with_entity(
                    "uniqueness",
                    &format!("duplicate equipment id '{}'", eq.id),
                    &eq.id,
                );
            }
            if !(0.0..=10.0).contains(&eq.risk_score) {
                diag.add_error_with_entity(
                    "range",
                    &format!("risk score {} outside [0, 10]", eq.risk_score),
                    &eq.id,
                );
            }
        }

        let mut customer_ids = HashSet::new();
        for customer in &self.customers {
            if !customer_ids.insert(customer.id.as_str()) {
                diag.add_error_with_entity(
                    "uniqueness",
                    &format!("duplicate customer id '{}'", customer.id),
                    &customer.id,
                );
            }
        }
        let mut installation_ids = HashSet::new();
        for installation in &self.installations {
            if !installation_ids.insert(installation.id.as_str()) {
                diag.add_error_with_entity(
                    "uniqueness",
                    &format!("duplicate installation id '{}'", installation.id),
                    &installation.id,
                );
            }
        }

        for record in &self.maintenance_records {
            if !equipment_ids.contains(record.equipment_id.as_str()) {
                diag.add_error_with_entity(
                    "reference",
                    &format!("unknown equipment_id '{}'", record.equipment_id),
                    &record.id,
                );
            }
            if record.downtime_hours < 0.0 {
                diag.add_error_with_entity(
                    "range",
                    &format!("negative downtime_hours {}", record.downtime_hours),
                    &record.id,
                );
            }
            if record.cost < 0.0 {
                diag.add_error_with_entity(
                    "range",
                    &format!("negative cost {}", record.cost),
                    &record.id,
                );
            }
        }

        for sensor in &self.sensors {
            if !equipment_ids.contains(sensor.equipment_id.as_str()) {
                diag.add_error_with_entity(
                    "reference",
                    &format!("unknown equipment_id '{}'", sensor.equipment_id),
                    &sensor.id,
                );
            }
        }
        for alert in &self.alerts {
            if !equipment_ids.contains(alert.equipment_id.as_str()) {
                diag.add_error_with_entity(
                    "reference",
                    &format!("unknown equipment_id '{}'", alert.equipment_id),
                    &alert.id,
                );
            }
        }

        for installation in &self.installations {
            if !customer_ids.contains(installation.customer_id.as_str()) {
                diag.add_error_with_entity(
                    "reference",
                    &format!("unknown customer_id '{}'", installation.customer_id),
                    &installation.id,
                );
            }
        }
        for customer in &self.customers {
            if !installation_ids.contains(customer.installation_id.as_str()) {
                diag.add_error_with_entity(
                    "reference",
                    &format!("unknown installation_id '{}'", customer.installation_id),
                    &customer.id,
                );
            }
        }

        if self.equipment.is_empty()
            && (self.maintenance_records.is_empty()
                && self.sensors.is_empty()
                && self.alerts.is_empty())
        {
            diag.add_warning("structure", "dataset has no equipment");
        }
    }
}

/// Statistics about a dataset's size and maintenance totals
#[derive(Debug, Clone, Default)]
pub struct DatasetStats {
    pub num_equipment: usize,
    pub num_maintenance_records: usize,
    pub num_sensors: usize,
    pub num_alerts: usize,
    pub num_customers: usize,
    pub num_installations: usize,
    pub total_maintenance_cost: f64,
    pub total_downtime_hours: f64,
    pub mean_risk_score: f64,
}

impl std::fmt::Display for DatasetStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} equipment, {} maintenance records ({:.0} h downtime, {:.0} cost), {} sensors, {} alerts, {} customers",
            self.num_equipment,
            self.num_maintenance_records,
            self.total_downtime_hours,
            self.total_maintenance_cost,
            self.num_sensors,
            self.num_alerts,
            self.num_customers
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_equipment(id: &str, kind: EquipmentKind) -> Equipment {
        Equipment {
            id: id.to_string(),
            name: format!("{} 1", kind),
            kind,
            location: Region::North,
            installation_date: NaiveDate::from_ymd_opt(2021, 6, 1).unwrap(),
            capacity: Some(120.0),
            voltage: Some(220),
            status: EquipmentStatus::Operational,
            risk_score: 3.5,
            last_maintenance: NaiveDate::from_ymd_opt(2023, 9, 15),
        }
    }

    fn sample_record(id: &str, equipment_id: &str) -> MaintenanceRecord {
        MaintenanceRecord {
            id: id.to_string(),
            equipment_id: equipment_id.to_string(),
            date: NaiveDate::from_ymd_opt(2023, 9, 15).unwrap(),
            kind: MaintenanceKind::Preventive,
            description: "Routine inspection and lubrication".to_string(),
            description_en: "Routine inspection and lubrication".to_string(),
            root_cause: None,
            downtime_hours: 2.0,
            cost: 800.0,
            technician: "Tech_03".to_string(),
            status: MaintenanceStatus::Completed,
        }
    }

    #[test]
    fn test_stats() {
        let dataset = Dataset {
            equipment: vec![
                sample_equipment("generator_001", EquipmentKind::Generator),
                sample_equipment("bus_002", EquipmentKind::Bus),
            ],
            maintenance_records: vec![
                sample_record("maint_0001", "generator_001"),
                sample_record("maint_0002", "bus_002"),
            ],
            ..Dataset::default()
        };

        let stats = dataset.stats();
        assert_eq!(stats.num_equipment, 2);
        assert_eq!(stats.num_maintenance_records, 2);
        assert!((stats.total_maintenance_cost - 1600.0).abs() < 1e-9);
        assert!((stats.total_downtime_hours - 4.0).abs() < 1e-9);
        assert!((stats.mean_risk_score - 3.5).abs() < 1e-9);
    }

    #[test]
    fn test_validate_clean_dataset() {
        let dataset = Dataset {
            equipment: vec![sample_equipment("generator_001", EquipmentKind::Generator)],
            maintenance_records: vec![sample_record("maint_0001", "generator_001")],
            ..Dataset::default()
        };
        let mut diag = Diagnostics::new();
        dataset.validate_into(&mut diag);
        assert!(!diag.has_errors());
    }

    #[test]
    fn test_validate_dangling_equipment_id() {
        let dataset = Dataset {
            equipment: vec![sample_equipment("generator_001", EquipmentKind::Generator)],
            maintenance_records: vec![sample_record("maint_0001", "generator_999")],
            ..Dataset::default()
        };
        let mut diag = Diagnostics::new();
        dataset.validate_into(&mut diag);
        assert!(diag.has_errors());
        assert!(diag.errors().any(|i| i.message.contains("generator_999")));
    }

    #[test]
    fn test_validate_duplicate_equipment_id() {
        let dataset = Dataset {
            equipment: vec![
                sample_equipment("bus_001", EquipmentKind::Bus),
                sample_equipment("bus_001", EquipmentKind::Bus),
            ],
            ..Dataset::default()
        };
        let mut diag = Diagnostics::new();
        dataset.validate_into(&mut diag);
        assert!(diag.errors().any(|i| i.category == "uniqueness"));
    }

    #[test]
    fn test_validate_risk_score_out_of_range() {
        let mut eq = sample_equipment("generator_001", EquipmentKind::Generator);
        eq.risk_score = 11.2;
        let dataset = Dataset {
            equipment: vec![eq],
            ..Dataset::default()
        };
        let mut diag = Diagnostics::new();
        dataset.validate_into(&mut diag);
        assert!(diag.errors().any(|i| i.category == "range"));
    }

    #[test]
    fn test_days_since_maintenance_falls_back_to_installation() {
        let mut eq = sample_equipment("switch_001", EquipmentKind::Switch);
        eq.last_maintenance = None;
        let as_of = NaiveDate::from_ymd_opt(2021, 7, 1).unwrap();
        assert_eq!(eq.days_since_maintenance(as_of), 30);
    }

    #[test]
    fn test_enum_wire_format() {
        let eq = sample_equipment("generator_001", EquipmentKind::Generator);
        let json = serde_json::to_value(&eq).unwrap();
        assert_eq!(json["type"], "Generator");
        assert_eq!(json["status"], "operational");
        assert_eq!(json["installation_date"], "2021-06-01");

        let alert_kind = serde_json::to_value(AlertKind::VibrationAlert).unwrap();
        assert_eq!(alert_kind, "Vibration Alert");
    }

    #[test]
    fn test_dataset_default_version() {
        let dataset = Dataset::default();
        assert_eq!(dataset.version, SCHEMA_VERSION);
        // A file written without a version field deserializes to version 1.
        let parsed: Dataset = serde_json::from_str(
            r#"{"equipment":[],"maintenance_records":[],"sensors":[],"alerts":[],"customers":[],"installations":[]}"#,
        )
        .unwrap();
        assert_eq!(parsed.version, SCHEMA_VERSION);
    }
}
