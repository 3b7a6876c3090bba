//! Dependency / impact analysis over the equipment feed topology.

use egm_core::{Dataset, DependencyGraph, EgmResult, TopologyEdges};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

/// One downstream equipment item and its hop distance from the source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependentEquipment {
    pub equipment_id: String,
    pub distance: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImpactResults {
    pub source_equipment_id: String,
    /// Transitive downstream dependents, nearest first; equal distances
    /// are ordered lexicographically by id
    pub dependent_equipment: Vec<DependentEquipment>,
    /// Customers served through the source or any dependent, sorted by id
    pub affected_customers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImpactSummary {
    pub dependent_count: usize,
    pub affected_customer_count: usize,
    pub max_depth: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImpactReport {
    pub results: ImpactResults,
    pub summary: ImpactSummary,
}

/// Compute the transitive set of equipment and customers affected when
/// the given equipment fails. Fails with [`egm_core::EgmError::NotFound`]
/// when the id is absent from the dataset and
/// [`egm_core::EgmError::Integrity`] when the edge lists dangle.
pub fn impact_analysis(
    dataset: &Dataset,
    edges: &TopologyEdges,
    equipment_id: &str,
) -> EgmResult<ImpactReport> {
    debug!(equipment_id, "computing downstream impact");
    let graph = DependencyGraph::build(dataset, edges)?;
    let dependents = graph.dependents_of(equipment_id)?;

    let customer_of: HashMap<&str, &str> = dataset
        .installations
        .iter()
        .map(|inst| (inst.id.as_str(), inst.customer_id.as_str()))
        .collect();

    let mut affected: BTreeSet<String> = BTreeSet::new();
    let impacted_ids = std::iter::once(equipment_id).chain(dependents.iter().map(|(id, _)| id.as_str()));
    for id in impacted_ids {
        for installation_id in graph.installations_at(id) {
            if let Some(customer_id) = customer_of.get(installation_id.as_str()) {
                affected.insert((*customer_id).to_string());
            }
        }
    }

    let max_depth = dependents.last().map(|(_, distance)| *distance).unwrap_or(0);
    let dependent_equipment: Vec<DependentEquipment> = dependents
        .into_iter()
        .map(|(equipment_id, distance)| DependentEquipment {
            equipment_id,
            distance,
        })
        .collect();

    let summary = ImpactSummary {
        dependent_count: dependent_equipment.len(),
        affected_customer_count: affected.len(),
        max_depth,
    };

    Ok(ImpactReport {
        results: ImpactResults {
            source_equipment_id: equipment_id.to_string(),
            dependent_equipment,
            affected_customers: affected.into_iter().collect(),
        },
        summary,
    })
}
