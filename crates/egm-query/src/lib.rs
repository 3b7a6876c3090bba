//! # egm-query: Query Simulation over In-Memory Datasets
//!
//! Emulates, over an assembled [`egm_core::Dataset`], the aggregate queries
//! the application would otherwise issue against the graph database. Each
//! operation is a pure function of its inputs, safe to call repeatedly with
//! identical results, and returns a report with exactly two top-level
//! fields — `results` (operation-specific payload) and `summary` (scalar
//! aggregates) — so generic report generation can treat all six uniformly.
//!
//! Function signatures are kept stable so a live graph-database client can
//! replace these implementations without touching callers.
//!
//! | Operation | Module |
//! |---|---|
//! | Vibration-issue search | [`vibration`] |
//! | Two-week maintenance schedule | [`schedule`] |
//! | Risk assessment | [`risk`] |
//! | Dependency / impact analysis | [`impact`] |
//! | Sensor anomaly detection | [`sensors`] |
//! | Cost analysis | [`cost`] |

pub mod cost;
pub mod impact;
pub mod risk;
pub mod schedule;
pub mod sensors;
pub mod vibration;

pub use cost::{cost_analysis, CostReport, DEFAULT_TOP_N};
pub use impact::{impact_analysis, ImpactReport};
pub use risk::{risk_assessment, RiskReport};
pub use schedule::{maintenance_schedule, ScheduleOptions, ScheduleReport};
pub use sensors::{sensor_anomalies, SensorReport, ANOMALY_DEVIATION_THRESHOLD};
pub use vibration::{vibration_search, VibrationReport};
