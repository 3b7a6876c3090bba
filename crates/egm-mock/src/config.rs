//! Generation configuration: entity counts, random seed, reference date.

use chrono::NaiveDate;
use egm_core::{EgmError, EgmResult};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Reference date pinned when a seed is supplied without an explicit date,
/// so seeded runs are byte-for-byte reproducible across days.
pub fn seeded_reference_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).expect("fixed reference date is valid")
}

/// How many records of each entity type to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationCounts {
    #[serde(default = "default_equipment")]
    pub equipment: usize,
    #[serde(default = "default_maintenance_records")]
    pub maintenance_records: usize,
    #[serde(default = "default_sensors")]
    pub sensors: usize,
    #[serde(default = "default_alerts")]
    pub alerts: usize,
    #[serde(default = "default_customers")]
    pub customers: usize,
    #[serde(default = "default_installations")]
    pub installations: usize,
}

fn default_equipment() -> usize {
    50
}
fn default_maintenance_records() -> usize {
    200
}
fn default_sensors() -> usize {
    150
}
fn default_alerts() -> usize {
    50
}
fn default_customers() -> usize {
    30
}
fn default_installations() -> usize {
    30
}

impl Default for GenerationCounts {
    fn default() -> Self {
        Self {
            equipment: default_equipment(),
            maintenance_records: default_maintenance_records(),
            sensors: default_sensors(),
            alerts: default_alerts(),
            customers: default_customers(),
            installations: default_installations(),
        }
    }
}

impl GenerationCounts {
    /// Check cross-count invariants. Zero counts are valid and yield empty
    /// collections; a dependent count without its prerequisite is not,
    /// because the foreign keys could never resolve.
    pub fn validate(&self) -> EgmResult<()> {
        if self.equipment == 0 {
            if self.maintenance_records > 0 {
                return Err(EgmError::InvalidConfiguration(
                    "maintenance records requested with zero equipment".into(),
                ));
            }
            if self.sensors > 0 {
                return Err(EgmError::InvalidConfiguration(
                    "sensors requested with zero equipment".into(),
                ));
            }
            if self.alerts > 0 {
                return Err(EgmError::InvalidConfiguration(
                    "alerts requested with zero equipment".into(),
                ));
            }
        }
        if self.customers == 0 && self.installations > 0 {
            return Err(EgmError::InvalidConfiguration(
                "installations requested with zero customers".into(),
            ));
        }
        if self.customers > 0 && self.installations < self.customers {
            // Each customer references its installation by id, so an
            // installation must exist for every customer.
            return Err(EgmError::InvalidConfiguration(format!(
                "installations count {} is below customers count {}",
                self.installations, self.customers
            )));
        }
        Ok(())
    }
}

/// Configuration for one generation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Seed for reproducible output; entropy-seeded when absent
    #[serde(default)]
    pub seed: Option<u64>,
    /// Anchor for all generated dates; defaults to a fixed date when
    /// seeded, today otherwise
    #[serde(default)]
    pub reference_date: Option<NaiveDate>,
    #[serde(default)]
    pub counts: GenerationCounts,
}

impl GeneratorConfig {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    pub fn rng(&self) -> StdRng {
        self.seed
            .map(StdRng::seed_from_u64)
            .unwrap_or_else(StdRng::from_entropy)
    }

    pub fn resolved_reference_date(&self) -> NaiveDate {
        match (self.reference_date, self.seed) {
            (Some(date), _) => date,
            (None, Some(_)) => seeded_reference_date(),
            (None, None) => chrono::Utc::now().date_naive(),
        }
    }
}

/// Load a generator configuration from a YAML or JSON file, chosen by
/// extension (unknown extensions try YAML first, then JSON).
pub fn load_config_from_path(path: &Path) -> EgmResult<GeneratorConfig> {
    let data = std::fs::read_to_string(path)?;
    let parsed = match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
            serde_yaml::from_str(&data).map_err(|err| err.to_string())
        }
        Some(ext) if ext.eq_ignore_ascii_case("json") => {
            serde_json::from_str(&data).map_err(|err| err.to_string())
        }
        _ => serde_yaml::from_str(&data)
            .map_err(|err| err.to_string())
            .or_else(|_| serde_json::from_str(&data).map_err(|err| err.to_string())),
    };
    let config: GeneratorConfig = parsed.map_err(|err| {
        EgmError::InvalidConfiguration(format!(
            "parsing generator config '{}': {}",
            path.display(),
            err
        ))
    })?;
    config.counts.validate()?;
    Ok(config)
}
