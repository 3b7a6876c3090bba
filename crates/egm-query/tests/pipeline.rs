//! End-to-end pipeline: generate -> persist -> reload -> analyze.

use egm_core::EgmError;
use egm_mock::{generate_all_data, generate_topology, GeneratorConfig};
use egm_query::schedule::ScheduleOptions;
use egm_query::{
    cost_analysis, impact_analysis, maintenance_schedule, risk_assessment, sensor_anomalies,
    vibration_search, DEFAULT_TOP_N,
};
use tempfile::tempdir;

fn seeded() -> GeneratorConfig {
    GeneratorConfig::with_seed(42)
}

#[test]
fn full_pipeline_round_trip_and_reports() {
    let config = seeded();
    let dataset = generate_all_data(&config).unwrap();
    let topology = generate_topology(&dataset, &config);

    let dir = tempdir().unwrap();
    let data_path = dir.path().join("mock_data.json");
    let topology_path = dir.path().join("topology.json");
    egm_io::save_dataset(&dataset, &data_path).unwrap();
    egm_io::save_topology(&topology, &topology_path).unwrap();

    let reloaded = egm_io::load_dataset(&data_path).unwrap();
    assert_eq!(dataset, reloaded);
    let reloaded_topology = egm_io::load_topology(&topology_path).unwrap();
    assert_eq!(topology, reloaded_topology);

    // The forced corrective records guarantee the vibration search is
    // never empty on a default-size dataset.
    let vibration = vibration_search(&reloaded).unwrap();
    assert!(vibration.summary.total_vibration_issues > 0);
    assert!(vibration.summary.total_equipment_affected > 0);

    let as_of = config.resolved_reference_date();
    let schedule = maintenance_schedule(&reloaded, &ScheduleOptions::new(as_of)).unwrap();
    assert_eq!(
        schedule.summary.total_tasks,
        schedule.summary.week_1_tasks + schedule.summary.week_2_tasks
    );

    let risk = risk_assessment(&reloaded).unwrap();
    assert_eq!(
        risk.summary.high_risk + risk.summary.medium_risk + risk.summary.low_risk,
        reloaded.equipment.len()
    );

    let source = &reloaded.equipment[0].id;
    let impact = impact_analysis(&reloaded, &topology, source).unwrap();
    assert_eq!(impact.results.source_equipment_id, *source);

    let sensors = sensor_anomalies(&reloaded).unwrap();
    assert_eq!(sensors.summary.total_readings, reloaded.sensors.len());

    let cost = cost_analysis(&reloaded, DEFAULT_TOP_N).unwrap();
    assert!(cost.results.top_equipment.len() <= DEFAULT_TOP_N);
    assert!(cost.summary.recommended_annual_budget >= cost.summary.total_cost);
}

#[test]
fn query_operations_are_idempotent() {
    let config = seeded();
    let dataset = generate_all_data(&config).unwrap();
    let topology = generate_topology(&dataset, &config);
    let as_of = config.resolved_reference_date();

    assert_eq!(
        vibration_search(&dataset).unwrap(),
        vibration_search(&dataset).unwrap()
    );
    assert_eq!(
        maintenance_schedule(&dataset, &ScheduleOptions::new(as_of)).unwrap(),
        maintenance_schedule(&dataset, &ScheduleOptions::new(as_of)).unwrap()
    );
    assert_eq!(
        risk_assessment(&dataset).unwrap(),
        risk_assessment(&dataset).unwrap()
    );
    let source = &dataset.equipment[0].id;
    assert_eq!(
        impact_analysis(&dataset, &topology, source).unwrap(),
        impact_analysis(&dataset, &topology, source).unwrap()
    );
    assert_eq!(
        sensor_anomalies(&dataset).unwrap(),
        sensor_anomalies(&dataset).unwrap()
    );
    assert_eq!(
        cost_analysis(&dataset, DEFAULT_TOP_N).unwrap(),
        cost_analysis(&dataset, DEFAULT_TOP_N).unwrap()
    );
}

#[test]
fn unknown_equipment_id_is_not_found_across_operations() {
    let config = seeded();
    let dataset = generate_all_data(&config).unwrap();
    let topology = generate_topology(&dataset, &config);
    let as_of = config.resolved_reference_date();

    let err = maintenance_schedule(
        &dataset,
        &ScheduleOptions::for_equipment(as_of, "generator_9999"),
    )
    .unwrap_err();
    assert!(matches!(err, EgmError::NotFound(_)));

    let err = impact_analysis(&dataset, &topology, "generator_9999").unwrap_err();
    assert!(matches!(err, EgmError::NotFound(_)));
}
