//! # egm-mock: Mock Data Generators
//!
//! Produces configurable-size synthetic datasets that exercise every
//! downstream query path: equipment fleets with age-driven risk scores,
//! maintenance histories with guaranteed vibration-issue coverage, sensor
//! readings with deliberate anomalies, alerts, customers, and
//! installations.
//!
//! Generation is deterministic when seeded ([`GeneratorConfig::with_seed`])
//! and draws from fixed ranges otherwise. See [`generate::generate_all_data`]
//! for the dataset-level entry point and [`generate::generate_topology`]
//! for the synthetic dependency edges used by impact analysis.

pub mod config;
pub mod generate;

pub use config::{load_config_from_path, GenerationCounts, GeneratorConfig};
pub use generate::{generate_all_data, generate_topology};
