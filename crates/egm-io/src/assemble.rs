//! Dataset assembly with referential-integrity validation.

use egm_core::{
    Alert, Customer, Dataset, Diagnostics, EgmError, EgmResult, Equipment, Installation,
    MaintenanceRecord, Sensor, SCHEMA_VERSION,
};
use tracing::debug;

/// Compose generator outputs into one consistent dataset.
///
/// Fails with [`EgmError::Integrity`] if any maintenance/sensor/alert
/// record references a nonexistent equipment id, or any
/// customer/installation link dangles. On failure nothing is returned;
/// the error message lists every offending entity.
pub fn assemble(
    equipment: Vec<Equipment>,
    maintenance_records: Vec<MaintenanceRecord>,
    sensors: Vec<Sensor>,
    alerts: Vec<Alert>,
    customers: Vec<Customer>,
    installations: Vec<Installation>,
) -> EgmResult<Dataset> {
    let dataset = Dataset {
        version: SCHEMA_VERSION,
        equipment,
        maintenance_records,
        sensors,
        alerts,
        customers,
        installations,
    };

    let mut diag = Diagnostics::new();
    dataset.validate_into(&mut diag);
    if diag.has_errors() {
        return Err(EgmError::Integrity(diag.error_summary()));
    }
    debug!(stats = %dataset.stats(), "dataset assembled");
    Ok(dataset)
}
