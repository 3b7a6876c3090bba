//! Command handlers for the `egm` binary.

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use egm_core::Diagnostics;
use egm_mock::{generate_all_data, generate_topology, load_config_from_path, GeneratorConfig};
use egm_query::schedule::ScheduleOptions;
use serde_json::to_string_pretty;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::cli::Scenario;

pub struct GenerateArgs {
    pub out: PathBuf,
    pub seed: Option<u64>,
    pub reference_date: Option<NaiveDate>,
    pub config: Option<PathBuf>,
    pub topology: Option<PathBuf>,
    pub equipment: Option<i64>,
    pub maintenance_records: Option<i64>,
    pub sensors: Option<i64>,
    pub alerts: Option<i64>,
    pub customers: Option<i64>,
    pub installations: Option<i64>,
}

/// Reject negative count overrides before they reach the (unsigned)
/// generator configuration.
fn apply_override(target: &mut usize, value: Option<i64>, flag: &str) -> Result<()> {
    if let Some(value) = value {
        if value < 0 {
            bail!("--{flag} must be non-negative, got {value}");
        }
        *target = value as usize;
    }
    Ok(())
}

pub fn generate(args: GenerateArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => load_config_from_path(path)
            .with_context(|| format!("loading generator config '{}'", path.display()))?,
        None => GeneratorConfig::default(),
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if args.reference_date.is_some() {
        config.reference_date = args.reference_date;
    }
    let counts = &mut config.counts;
    apply_override(&mut counts.equipment, args.equipment, "equipment")?;
    apply_override(
        &mut counts.maintenance_records,
        args.maintenance_records,
        "maintenance-records",
    )?;
    apply_override(&mut counts.sensors, args.sensors, "sensors")?;
    apply_override(&mut counts.alerts, args.alerts, "alerts")?;
    apply_override(&mut counts.customers, args.customers, "customers")?;
    apply_override(&mut counts.installations, args.installations, "installations")?;

    let dataset = generate_all_data(&config)?;
    egm_io::save_dataset(&dataset, &args.out)?;
    println!("Wrote {} to {}", dataset.stats(), args.out.display());

    if let Some(topology_path) = &args.topology {
        let edges = generate_topology(&dataset, &config);
        egm_io::save_topology(&edges, topology_path)?;
        println!(
            "Wrote {} feed links and {} installation links to {}",
            edges.equipment_links.len(),
            edges.installation_links.len(),
            topology_path.display()
        );
    }
    Ok(())
}

pub fn validate(data: &Path) -> Result<()> {
    let dataset = egm_io::load_dataset(data)
        .with_context(|| format!("loading dataset '{}'", data.display()))?;

    // Loading already rejects integrity errors; surface warnings too.
    let mut diag = Diagnostics::new();
    dataset.validate_into(&mut diag);
    for warning in diag.warnings() {
        println!("{warning}");
    }
    println!(
        "Dataset '{}' is valid: {}",
        data.display(),
        dataset.stats()
    );
    Ok(())
}

pub fn report(
    scenario: Scenario,
    data: &Path,
    topology: Option<&Path>,
    equipment: Option<&str>,
    as_of: Option<NaiveDate>,
    top: usize,
) -> Result<()> {
    let dataset = egm_io::load_dataset(data)
        .with_context(|| format!("loading dataset '{}'", data.display()))?;
    info!(scenario = ?scenario, stats = %dataset.stats(), "running report");

    let rendered = match scenario {
        Scenario::Vibration => to_string_pretty(&egm_query::vibration_search(&dataset)?)?,
        Scenario::Schedule => {
            let as_of = as_of.unwrap_or_else(|| chrono::Utc::now().date_naive());
            let opts = ScheduleOptions {
                as_of,
                equipment_id: equipment.map(str::to_string),
            };
            to_string_pretty(&egm_query::maintenance_schedule(&dataset, &opts)?)?
        }
        Scenario::Risk => to_string_pretty(&egm_query::risk_assessment(&dataset)?)?,
        Scenario::Impact => {
            let topology_path = topology
                .context("`report impact` requires --topology <file> with the feed edges")?;
            let equipment_id =
                equipment.context("`report impact` requires --equipment <id> to analyze")?;
            let edges = egm_io::load_topology(topology_path)
                .with_context(|| format!("loading topology '{}'", topology_path.display()))?;
            to_string_pretty(&egm_query::impact_analysis(&dataset, &edges, equipment_id)?)?
        }
        Scenario::Sensors => to_string_pretty(&egm_query::sensor_anomalies(&dataset)?)?,
        Scenario::Cost => to_string_pretty(&egm_query::cost_analysis(&dataset, top)?)?,
    };
    println!("{rendered}");
    Ok(())
}
