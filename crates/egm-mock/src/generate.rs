//! Synthetic dataset generation.
//!
//! Every generator draws from fixed value ranges so downstream query paths
//! are always exercised: corrective maintenance descriptions come from a
//! vibration-issue pool (guaranteeing the vibration search is non-empty),
//! sensor readings deliberately overshoot their baselines, and risk scores
//! grow with equipment age.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use egm_core::{
    Alert, AlertKind, AlertSeverity, AlertStatus, Customer, CustomerKind, Dataset, Diagnostics,
    EgmError, EgmResult, Equipment, EquipmentKind, EquipmentLink, EquipmentStatus, Installation,
    InstallationLink, MaintenanceKind, MaintenanceRecord, MaintenanceStatus, Region, Sensor,
    SensorKind, SensorStatus, TopologyEdges, SCHEMA_VERSION,
};
use rand::rngs::StdRng;
use rand::Rng;
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::config::GeneratorConfig;

/// Corrective-maintenance descriptions; every entry mentions vibration so
/// the search scenario always has matches.
const VIBRATION_ISSUES: [&str; 5] = [
    "Excessive vibration detected in bearing assembly",
    "Unbalanced rotor causing vibration issues",
    "Misalignment leading to increased vibration levels",
    "Worn bearings resulting in vibration anomalies",
    "Resonance frequency causing equipment vibration",
];

const MAINTENANCE_SCENARIOS: [&str; 5] = [
    "Routine inspection and lubrication",
    "Bearing replacement due to wear",
    "Electrical component testing",
    "Cooling system maintenance",
    "Safety system verification",
];

const ROOT_CAUSES: [&str; 6] = [
    "Wear and tear",
    "Manufacturing defect",
    "Environmental factors",
    "Operator error",
    "Design flaw",
    "Material fatigue",
];

const EMERGENCY_DESCRIPTION: &str = "Emergency repair due to critical failure";

const COMMON_VOLTAGES: [u32; 4] = [110, 220, 380, 660];
const TRANSFORMER_VOLTAGES: [u32; 5] = [110, 220, 380, 660, 1100];

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn pick<'a, T>(rng: &mut StdRng, items: &'a [T]) -> &'a T {
    &items[rng.gen_range(0..items.len())]
}

fn pick_weighted<T: Copy>(rng: &mut StdRng, choices: &[(T, f64)]) -> T {
    let total: f64 = choices.iter().map(|(_, weight)| weight).sum();
    let mut draw = rng.gen::<f64>() * total;
    for (value, weight) in choices {
        if draw < *weight {
            return *value;
        }
        draw -= weight;
    }
    choices[choices.len() - 1].0
}

fn midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// The source data is bilingual; mock descriptions are already English, so
/// the translation is the identity, kept as a seam for localized pools.
fn translate_to_english(description: &str) -> String {
    description.to_string()
}

pub fn generate_equipment(rng: &mut StdRng, reference: NaiveDate, count: usize) -> Vec<Equipment> {
    let mut equipment = Vec::with_capacity(count);
    for i in 0..count {
        let kind = *pick(rng, &EquipmentKind::ALL);
        let (capacity, voltage) = match kind {
            EquipmentKind::Generator => (
                Some(round2(rng.gen_range(50.0..500.0))),
                Some(*pick(rng, &COMMON_VOLTAGES)),
            ),
            EquipmentKind::Transformer => (
                Some(round2(rng.gen_range(100.0..1000.0))),
                Some(*pick(rng, &TRANSFORMER_VOLTAGES)),
            ),
            _ => (None, Some(*pick(rng, &COMMON_VOLTAGES))),
        };

        let installation_date = reference - Duration::days(rng.gen_range(100..=2000));
        let age_years = (reference - installation_date).num_days() as f64 / 365.0;
        let risk_score = round2((age_years * rng.gen_range(0.5..2.0)).min(10.0));
        let status = pick_weighted(
            rng,
            &[
                (EquipmentStatus::Operational, 0.80),
                (EquipmentStatus::Maintenance, 0.15),
                (EquipmentStatus::Faulty, 0.05),
            ],
        );
        // Clamped so "days since maintenance" is never negative.
        let last_maintenance =
            (installation_date + Duration::days(rng.gen_range(30..=365))).min(reference);

        equipment.push(Equipment {
            id: format!("{}_{:03}", kind.id_prefix(), i + 1),
            name: format!("{} {}", kind, i + 1),
            kind,
            location: *pick(rng, &Region::ALL),
            installation_date,
            capacity,
            voltage,
            status,
            risk_score,
            last_maintenance: Some(last_maintenance),
        });
    }
    equipment
}

pub fn generate_maintenance_records(
    rng: &mut StdRng,
    reference: NaiveDate,
    equipment: &[Equipment],
    count: usize,
) -> EgmResult<Vec<MaintenanceRecord>> {
    if count > 0 && equipment.is_empty() {
        return Err(EgmError::InvalidConfiguration(
            "maintenance records requested with zero equipment".into(),
        ));
    }

    let mut records = Vec::with_capacity(count);
    for i in 0..count {
        let owner = pick(rng, equipment);
        let date = reference - Duration::days(rng.gen_range(1..=365));
        // Every fifth record is forced corrective so the vibration search
        // scenario is guaranteed non-empty even under an unlucky draw.
        let kind = if i % 5 == 0 {
            MaintenanceKind::Corrective
        } else {
            *pick(rng, &MaintenanceKind::ALL)
        };

        let (description, downtime_hours, cost) = match kind {
            MaintenanceKind::Corrective => (
                pick(rng, &VIBRATION_ISSUES).to_string(),
                round2(rng.gen_range(2.0..48.0)),
                round2(rng.gen_range(1000.0..50000.0)),
            ),
            MaintenanceKind::Preventive => (
                pick(rng, &MAINTENANCE_SCENARIOS).to_string(),
                round2(rng.gen_range(0.5..8.0)),
                round2(rng.gen_range(500.0..5000.0)),
            ),
            MaintenanceKind::Emergency => (
                EMERGENCY_DESCRIPTION.to_string(),
                round2(rng.gen_range(4.0..72.0)),
                round2(rng.gen_range(5000.0..100000.0)),
            ),
        };

        let root_cause = match kind {
            MaintenanceKind::Corrective => Some(pick(rng, &ROOT_CAUSES).to_string()),
            _ => None,
        };

        records.push(MaintenanceRecord {
            id: format!("maint_{:04}", i + 1),
            equipment_id: owner.id.clone(),
            date,
            kind,
            description_en: translate_to_english(&description),
            description,
            root_cause,
            downtime_hours,
            cost,
            technician: format!("Tech_{:02}", rng.gen_range(1..=20)),
            status: MaintenanceStatus::Completed,
        });
    }
    Ok(records)
}

pub fn generate_sensors(
    rng: &mut StdRng,
    reference: NaiveDate,
    equipment: &[Equipment],
    count: usize,
) -> EgmResult<Vec<Sensor>> {
    if count > 0 && equipment.is_empty() {
        return Err(EgmError::InvalidConfiguration(
            "sensors requested with zero equipment".into(),
        ));
    }

    let reference_midnight = midnight(reference);
    let mut sensors = Vec::with_capacity(count);
    for i in 0..count {
        let owner = pick(rng, equipment);
        let kind = *pick(rng, &SensorKind::ALL);
        // Per-kind baselines; vibration overshoots the most so anomaly
        // detection always has material to flag.
        let (expected, multiplier) = match kind {
            SensorKind::Vibration => (rng.gen_range(0.1..2.0), rng.gen_range(0.8..3.0)),
            SensorKind::Temperature => (rng.gen_range(40.0..80.0), rng.gen_range(0.9..1.3)),
            SensorKind::Pressure => (rng.gen_range(100.0..500.0), rng.gen_range(0.85..1.2)),
            _ => (rng.gen_range(100.0..1000.0), rng.gen_range(0.9..1.1)),
        };
        let status = pick_weighted(
            rng,
            &[
                (SensorStatus::Active, 0.90),
                (SensorStatus::Inactive, 0.08),
                (SensorStatus::Faulty, 0.02),
            ],
        );

        sensors.push(Sensor {
            id: format!("sensor_{:04}", i + 1),
            equipment_id: owner.id.clone(),
            kind,
            measurement_value: round2(expected * multiplier),
            expected_value: round2(expected),
            measurement_date: reference_midnight - Duration::hours(rng.gen_range(1..=168)),
            status,
        });
    }
    Ok(sensors)
}

pub fn generate_alerts(
    rng: &mut StdRng,
    reference: NaiveDate,
    equipment: &[Equipment],
    count: usize,
) -> EgmResult<Vec<Alert>> {
    if count > 0 && equipment.is_empty() {
        return Err(EgmError::InvalidConfiguration(
            "alerts requested with zero equipment".into(),
        ));
    }

    let reference_midnight = midnight(reference);
    let mut alerts = Vec::with_capacity(count);
    for i in 0..count {
        let owner = pick(rng, equipment);
        let kind = *pick(rng, &AlertKind::ALL);
        let severity = pick_weighted(
            rng,
            &[
                (AlertSeverity::Low, 0.4),
                (AlertSeverity::Medium, 0.3),
                (AlertSeverity::High, 0.2),
                (AlertSeverity::Critical, 0.1),
            ],
        );
        let description = match kind {
            AlertKind::VibrationAlert => "Vibration levels exceeded normal operating range",
            AlertKind::HighTemperature => "Equipment temperature above recommended threshold",
            AlertKind::PressureWarning => "System pressure outside normal operating parameters",
            AlertKind::Overload => "Equipment overload detected",
        };
        let status = pick_weighted(
            rng,
            &[
                (AlertStatus::Active, 0.3),
                (AlertStatus::Acknowledged, 0.4),
                (AlertStatus::Resolved, 0.3),
            ],
        );

        alerts.push(Alert {
            id: format!("alert_{:04}", i + 1),
            equipment_id: owner.id.clone(),
            kind,
            severity,
            date: reference_midnight - Duration::hours(rng.gen_range(1..=168)),
            description: description.to_string(),
            status,
        });
    }
    Ok(alerts)
}

pub fn generate_customers(rng: &mut StdRng, count: usize) -> Vec<Customer> {
    let mut customers = Vec::with_capacity(count);
    for i in 0..count {
        let kind = *pick(rng, &CustomerKind::ALL);
        customers.push(Customer {
            id: format!("customer_{:03}", i + 1),
            name: format!("{} Customer {}", kind.as_str(), i + 1),
            kind,
            region: *pick(rng, &Region::ALL),
            installation_id: format!("install_{:03}", i + 1),
        });
    }
    customers
}

pub fn generate_installations(
    rng: &mut StdRng,
    reference: NaiveDate,
    customers: &[Customer],
    count: usize,
) -> EgmResult<Vec<Installation>> {
    if count > 0 && customers.is_empty() {
        return Err(EgmError::InvalidConfiguration(
            "installations requested with zero customers".into(),
        ));
    }
    if count < customers.len() {
        return Err(EgmError::InvalidConfiguration(format!(
            "installations count {} is below customers count {}",
            count,
            customers.len()
        )));
    }

    let mut installations = Vec::with_capacity(count);
    for i in 0..count {
        // Installations beyond the customer count cycle back; every
        // customer's installation_id still resolves to entry i.
        let customer = &customers[i % customers.len()];
        installations.push(Installation {
            id: format!("install_{:03}", i + 1),
            installation_number: format!("install_{:03}", i + 1),
            customer_id: customer.id.clone(),
            installation_date: reference - Duration::days(rng.gen_range(100..=1000)),
            kind: customer.kind,
            region: customer.region,
            consumption_value: round2(rng.gen_range(100.0..10000.0)),
        });
    }
    Ok(installations)
}

/// Generate the complete mock dataset for one configuration.
///
/// With a seed the output is byte-for-byte reproducible; without one, the
/// RNG comes from entropy and dates anchor on today.
pub fn generate_all_data(config: &GeneratorConfig) -> EgmResult<Dataset> {
    config.counts.validate()?;
    let reference = config.resolved_reference_date();
    let mut rng = config.rng();
    info!(
        seed = ?config.seed,
        reference = %reference,
        "generating mock energy grid dataset"
    );

    let counts = &config.counts;
    let equipment = generate_equipment(&mut rng, reference, counts.equipment);
    let customers = generate_customers(&mut rng, counts.customers);
    let installations =
        generate_installations(&mut rng, reference, &customers, counts.installations)?;
    let maintenance_records =
        generate_maintenance_records(&mut rng, reference, &equipment, counts.maintenance_records)?;
    let sensors = generate_sensors(&mut rng, reference, &equipment, counts.sensors)?;
    let alerts = generate_alerts(&mut rng, reference, &equipment, counts.alerts)?;

    let dataset = Dataset {
        version: SCHEMA_VERSION,
        equipment,
        maintenance_records,
        sensors,
        alerts,
        customers,
        installations,
    };

    // Generators guarantee referential integrity by construction; this
    // check guards against future edits breaking that.
    let mut diag = Diagnostics::new();
    dataset.validate_into(&mut diag);
    if diag.has_errors() {
        return Err(EgmError::Integrity(diag.error_summary()));
    }

    debug!(stats = %dataset.stats(), "mock dataset generated");
    Ok(dataset)
}

/// Synthesize dependency edges for a dataset: within each region, equipment
/// is ranked Generator -> Bus -> Transformer -> Link -> Switch and each rank
/// is fed round-robin from the nearest upstream non-empty rank. Every
/// installation attaches to one equipment item.
pub fn generate_topology(dataset: &Dataset, config: &GeneratorConfig) -> TopologyEdges {
    let mut rng = config.rng();
    let mut by_region: BTreeMap<Region, Vec<&Equipment>> = BTreeMap::new();
    for eq in &dataset.equipment {
        by_region.entry(eq.location).or_default().push(eq);
    }

    let mut equipment_links = Vec::new();
    for members in by_region.values() {
        let mut ranks: [Vec<&str>; 5] = std::array::from_fn(|_| Vec::new());
        for eq in members {
            ranks[eq.kind.feed_rank()].push(eq.id.as_str());
        }
        for rank in 1..ranks.len() {
            if ranks[rank].is_empty() {
                continue;
            }
            let Some(feeders) = ranks[..rank].iter().rev().find(|ids| !ids.is_empty()) else {
                continue;
            };
            for (j, id) in ranks[rank].iter().enumerate() {
                equipment_links.push(EquipmentLink {
                    from_id: feeders[j % feeders.len()].to_string(),
                    to_id: id.to_string(),
                });
            }
        }
    }

    let mut installation_links = Vec::new();
    if !dataset.equipment.is_empty() {
        for installation in &dataset.installations {
            let supplier = pick(&mut rng, &dataset.equipment);
            installation_links.push(InstallationLink {
                equipment_id: supplier.id.clone(),
                installation_id: installation.id.clone(),
            });
        }
    }

    TopologyEdges {
        equipment_links,
        installation_links,
    }
}
