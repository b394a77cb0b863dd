//! Network service owning the registry and topology together

use std::sync::{Arc, PoisonError, RwLock};
use tracing::info;

use crate::device::{Device, DeviceConfig, DeviceId};
use crate::error::NetworkError;
use crate::registry::DeviceRegistry;
use crate::route::{self, Route};
use crate::topology::Topology;

/// Registry and topology kept consistent behind one API.
///
/// Mutations fail with [`NetworkError::InvalidArgument`] on bad references,
/// while [`Network::shortest_path`] degrades to an empty route instead.
#[derive(Debug, Clone, Default)]
pub struct Network {
    registry: DeviceRegistry,
    topology: Topology,
}

impl Network {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing registry, creating an adjacency entry for each device
    pub fn from_registry(registry: DeviceRegistry) -> Self {
        let topology = Topology::from_registry(&registry);
        Self { registry, topology }
    }

    /// Register (or overwrite) a device and give it a topology entry
    pub fn add_device(
        &mut self,
        id: &str,
        device_type: Option<&str>,
        config: DeviceConfig,
    ) -> Result<DeviceId, NetworkError> {
        let id = self.registry.add_device(id, device_type, config)?;
        self.topology.register_device(&self.registry, id.as_str())?;
        Ok(id)
    }

    /// Remove a device and every link touching it
    pub fn remove_device(&mut self, id: &str) -> Result<Option<Device>, NetworkError> {
        let removed = self.registry.remove_device(id)?;
        if removed.is_some() {
            self.topology.remove_device(id);
        }
        Ok(removed)
    }

    pub fn configure_device(&mut self, id: &str, config: DeviceConfig) -> Result<(), NetworkError> {
        self.registry.configure_device(id, config)
    }

    pub fn add_edge(&mut self, a: &str, b: &str) -> Result<(), NetworkError> {
        self.topology.add_edge(&self.registry, a, b)
    }

    pub fn shortest_path(&self, source: &str, destination: &str) -> Route {
        route::shortest_path(&self.registry, &self.topology, source, destination)
    }

    pub fn is_known_device(&self, id: &str) -> bool {
        Topology::is_known_device(&self.registry, id)
    }

    pub fn list_devices(&self) -> Vec<Device> {
        self.registry.list_devices()
    }

    pub fn neighbors(&self, id: &str) -> Vec<DeviceId> {
        self.topology.neighbors(id).cloned().collect()
    }

    pub fn registry(&self) -> &DeviceRegistry {
        &self.registry
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    /// Log a one-line summary of the current state
    pub fn log_summary(&self) {
        info!(
            devices = self.registry.len(),
            links = self.topology.edge_count(),
            "Network loaded"
        );
    }
}

/// Cloneable handle serializing all access through a single lock.
///
/// Registry and topology share the lock so readers never observe one updated
/// without the other. Every mutation validates before writing, so a poisoned
/// lock still guards consistent state and is recovered rather than propagated.
#[derive(Debug, Clone, Default)]
pub struct SharedNetwork {
    inner: Arc<RwLock<Network>>,
}

impl SharedNetwork {
    pub fn new(network: Network) -> Self {
        Self {
            inner: Arc::new(RwLock::new(network)),
        }
    }

    pub fn add_device(
        &self,
        id: &str,
        device_type: Option<&str>,
        config: DeviceConfig,
    ) -> Result<DeviceId, NetworkError> {
        self.write(|network| network.add_device(id, device_type, config))
    }

    pub fn remove_device(&self, id: &str) -> Result<Option<Device>, NetworkError> {
        self.write(|network| network.remove_device(id))
    }

    pub fn configure_device(&self, id: &str, config: DeviceConfig) -> Result<(), NetworkError> {
        self.write(|network| network.configure_device(id, config))
    }

    pub fn add_edge(&self, a: &str, b: &str) -> Result<(), NetworkError> {
        self.write(|network| network.add_edge(a, b))
    }

    pub fn shortest_path(&self, source: &str, destination: &str) -> Route {
        self.read(|network| network.shortest_path(source, destination))
    }

    pub fn list_devices(&self) -> Vec<Device> {
        self.read(Network::list_devices)
    }

    /// Run a closure with shared access
    pub fn read<T>(&self, f: impl FnOnce(&Network) -> T) -> T {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    /// Run a closure with exclusive access
    pub fn write<T>(&self, f: impl FnOnce(&mut Network) -> T) -> T {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }
}

impl From<Network> for SharedNetwork {
    fn from(network: Network) -> Self {
        Self::new(network)
    }
}
