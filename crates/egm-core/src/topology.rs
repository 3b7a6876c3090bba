//! Dependency topology over equipment feed edges.
//!
//! The live system stores these relationships in the graph database; here
//! they are carried as explicit edge lists ([`TopologyEdges`]) and compiled
//! into a petgraph `DiGraph` ([`DependencyGraph`]) for traversal. Edges are
//! directed from the feeding element to the fed element, so walking
//! outgoing edges from an equipment item yields everything that loses
//! supply when it fails.

use crate::{Dataset, EgmError, EgmResult};
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};

/// A directed feed edge between two equipment items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentLink {
    pub from_id: String,
    pub to_id: String,
}

/// Attachment of a metered installation to the equipment that supplies it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallationLink {
    pub equipment_id: String,
    pub installation_id: String,
}

/// External graph edges provided alongside a dataset for impact analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopologyEdges {
    #[serde(default)]
    pub equipment_links: Vec<EquipmentLink>,
    #[serde(default)]
    pub installation_links: Vec<InstallationLink>,
}

/// Compiled dependency graph for one dataset.
#[derive(Debug)]
pub struct DependencyGraph {
    graph: DiGraph<String, ()>,
    index_of: HashMap<String, NodeIndex>,
    installations_at: HashMap<String, Vec<String>>,
}

impl DependencyGraph {
    /// Compile the edge lists against a dataset, failing with
    /// [`EgmError::Integrity`] when an edge references an id the dataset
    /// does not contain.
    pub fn build(dataset: &Dataset, edges: &TopologyEdges) -> EgmResult<Self> {
        let mut graph = DiGraph::new();
        let mut index_of = HashMap::with_capacity(dataset.equipment.len());
        for eq in &dataset.equipment {
            let idx = graph.add_node(eq.id.clone());
            index_of.insert(eq.id.clone(), idx);
        }

        for link in &edges.equipment_links {
            let from = *index_of.get(&link.from_id).ok_or_else(|| {
                EgmError::Integrity(format!(
                    "equipment link references unknown equipment '{}'",
                    link.from_id
                ))
            })?;
            let to = *index_of.get(&link.to_id).ok_or_else(|| {
                EgmError::Integrity(format!(
                    "equipment link references unknown equipment '{}'",
                    link.to_id
                ))
            })?;
            graph.add_edge(from, to, ());
        }

        let installation_ids: HashSet<&str> = dataset
            .installations
            .iter()
            .map(|inst| inst.id.as_str())
            .collect();
        let mut installations_at: HashMap<String, Vec<String>> = HashMap::new();
        for link in &edges.installation_links {
            if !index_of.contains_key(&link.equipment_id) {
                return Err(EgmError::Integrity(format!(
                    "installation link references unknown equipment '{}'",
                    link.equipment_id
                )));
            }
            if !installation_ids.contains(link.installation_id.as_str()) {
                return Err(EgmError::Integrity(format!(
                    "installation link references unknown installation '{}'",
                    link.installation_id
                )));
            }
            installations_at
                .entry(link.equipment_id.clone())
                .or_default()
                .push(link.installation_id.clone());
        }

        Ok(Self {
            graph,
            index_of,
            installations_at,
        })
    }

    pub fn contains(&self, equipment_id: &str) -> bool {
        self.index_of.contains_key(equipment_id)
    }

    /// Installations directly attached to the given equipment item.
    pub fn installations_at(&self, equipment_id: &str) -> &[String] {
        self.installations_at
            .get(equipment_id)
            .map(|ids| ids.as_slice())
            .unwrap_or(&[])
    }

    /// Transitive downstream dependents of the given equipment, as
    /// `(equipment_id, distance)` pairs. Traversal is breadth-first one
    /// layer at a time, with each layer sorted lexicographically so equal
    /// distances break ties by id. The source itself is not included.
    pub fn dependents_of(&self, equipment_id: &str) -> EgmResult<Vec<(String, usize)>> {
        let start = *self
            .index_of
            .get(equipment_id)
            .ok_or_else(|| EgmError::NotFound(format!("equipment '{}'", equipment_id)))?;

        let mut visited = HashSet::new();
        visited.insert(start);
        let mut frontier = vec![start];
        let mut result = Vec::new();
        let mut distance = 0usize;

        while !frontier.is_empty() {
            distance += 1;
            // BTreeSet orders the next layer by id before it is emitted.
            let mut next: BTreeSet<String> = BTreeSet::new();
            for &node in &frontier {
                for neighbor in self.graph.neighbors(node) {
                    if !visited.contains(&neighbor) {
                        next.insert(self.graph[neighbor].clone());
                    }
                }
            }
            frontier = next
                .iter()
                .map(|id| self.index_of[id])
                .filter(|idx| visited.insert(*idx))
                .collect();
            for id in next {
                result.push((id, distance));
            }
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Equipment, EquipmentKind, EquipmentStatus, Region};
    use chrono::NaiveDate;

    fn equipment(id: &str) -> Equipment {
        Equipment {
            id: id.to_string(),
            name: id.to_string(),
            kind: EquipmentKind::Bus,
            location: Region::Central,
            installation_date: NaiveDate::from_ymd_opt(2022, 1, 1).unwrap(),
            capacity: None,
            voltage: Some(110),
            status: EquipmentStatus::Operational,
            risk_score: 1.0,
            last_maintenance: None,
        }
    }

    fn dataset(ids: &[&str]) -> Dataset {
        Dataset {
            equipment: ids.iter().map(|id| equipment(id)).collect(),
            ..Dataset::default()
        }
    }

    fn link(from: &str, to: &str) -> EquipmentLink {
        EquipmentLink {
            from_id: from.to_string(),
            to_id: to.to_string(),
        }
    }

    #[test]
    fn dependents_ordered_by_distance_then_id() {
        let dataset = dataset(&["gen_1", "bus_b", "bus_a", "link_1"]);
        let edges = TopologyEdges {
            equipment_links: vec![
                link("gen_1", "bus_b"),
                link("gen_1", "bus_a"),
                link("bus_b", "link_1"),
            ],
            installation_links: vec![],
        };
        let graph = DependencyGraph::build(&dataset, &edges).unwrap();
        let dependents = graph.dependents_of("gen_1").unwrap();
        assert_eq!(
            dependents,
            vec![
                ("bus_a".to_string(), 1),
                ("bus_b".to_string(), 1),
                ("link_1".to_string(), 2),
            ]
        );
    }

    #[test]
    fn cycles_do_not_loop() {
        let dataset = dataset(&["a", "b"]);
        let edges = TopologyEdges {
            equipment_links: vec![link("a", "b"), link("b", "a")],
            installation_links: vec![],
        };
        let graph = DependencyGraph::build(&dataset, &edges).unwrap();
        let dependents = graph.dependents_of("a").unwrap();
        assert_eq!(dependents, vec![("b".to_string(), 1)]);
    }

    #[test]
    fn unknown_equipment_in_edge_fails_integrity() {
        let dataset = dataset(&["a"]);
        let edges = TopologyEdges {
            equipment_links: vec![link("a", "ghost")],
            installation_links: vec![],
        };
        let err = DependencyGraph::build(&dataset, &edges).unwrap_err();
        assert!(matches!(err, EgmError::Integrity(_)));
    }

    #[test]
    fn unknown_start_fails_not_found() {
        let dataset = dataset(&["a"]);
        let graph = DependencyGraph::build(&dataset, &TopologyEdges::default()).unwrap();
        let err = graph.dependents_of("ghost").unwrap_err();
        assert!(matches!(err, EgmError::NotFound(_)));
    }
}
