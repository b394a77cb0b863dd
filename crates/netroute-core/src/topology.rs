//! Topology graph of undirected links between registered devices

use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

use crate::device::DeviceId;
use crate::error::NetworkError;
use crate::registry::DeviceRegistry;

/// Undirected adjacency over device identifiers.
///
/// The graph keeps no reference to the registry. Every call that accepts an
/// external identifier takes the registry it validates against, so the graph
/// can only ever hold ids that were registered at the time of insertion.
/// Neighbor sets are ordered, which pins the tie-break between equal-length
/// routes to the lexicographically smallest neighbor.
#[derive(Debug, Clone, Default)]
pub struct Topology {
    adjacency: BTreeMap<DeviceId, BTreeSet<DeviceId>>,
}

impl Topology {
    /// Create a new empty topology
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a topology with an empty adjacency entry for every registered device
    pub fn from_registry(registry: &DeviceRegistry) -> Self {
        let adjacency = registry
            .ids()
            .map(|id| (id.clone(), BTreeSet::new()))
            .collect();
        Self { adjacency }
    }

    /// Check that an identifier belongs to a registered device
    pub fn is_known_device(registry: &DeviceRegistry, id: &str) -> bool {
        registry.contains(id)
    }

    /// Ensure an adjacency entry exists for a registered device
    pub fn register_device(&mut self, registry: &DeviceRegistry, id: &str) -> Result<(), NetworkError> {
        let device = registry
            .get(id)
            .ok_or_else(|| NetworkError::unknown_device(id))?;

        if !self.adjacency.contains_key(id) {
            self.adjacency.insert(device.id.clone(), BTreeSet::new());
            debug!(device = %device.id, "Device added to topology");
        }
        Ok(())
    }

    /// Add an undirected link between two registered devices
    pub fn add_edge(&mut self, registry: &DeviceRegistry, a: &str, b: &str) -> Result<(), NetworkError> {
        let a_id = registry
            .get(a)
            .map(|d| d.id.clone())
            .ok_or_else(|| NetworkError::unknown_device(a))?;
        let b_id = registry
            .get(b)
            .map(|d| d.id.clone())
            .ok_or_else(|| NetworkError::unknown_device(b))?;

        self.adjacency
            .entry(a_id.clone())
            .or_default()
            .insert(b_id.clone());
        self.adjacency
            .entry(b_id.clone())
            .or_default()
            .insert(a_id.clone());

        info!(a = %a_id, b = %b_id, "Connection added: {} <-> {}", a_id, b_id);
        Ok(())
    }

    /// Drop a device and every link touching it
    pub fn remove_device(&mut self, id: &str) {
        if let Some(neighbors) = self.adjacency.remove(id) {
            for neighbor in &neighbors {
                if let Some(set) = self.adjacency.get_mut(neighbor) {
                    set.remove(id);
                }
            }
            debug!(device = id, links = neighbors.len(), "Device pruned from topology");
        }
    }

    /// Neighbors of a device, in identifier order
    pub fn neighbors(&self, id: &str) -> impl Iterator<Item = &DeviceId> {
        self.adjacency.get(id).into_iter().flatten()
    }

    /// The graph's own copy of an identifier, if the device has an entry
    pub fn device_id(&self, id: &str) -> Option<&DeviceId> {
        self.adjacency.get_key_value(id).map(|(key, _)| key)
    }

    pub fn contains_device(&self, id: &str) -> bool {
        self.adjacency.contains_key(id)
    }

    pub fn contains_edge(&self, a: &str, b: &str) -> bool {
        self.adjacency
            .get(a)
            .map(|set| set.contains(b))
            .unwrap_or(false)
    }

    /// Number of undirected links
    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(BTreeSet::len).sum::<usize>() / 2
    }

    pub fn device_count(&self) -> usize {
        self.adjacency.len()
    }
}
