//! Device registry - the authoritative set of known devices

use std::collections::BTreeMap;
use tracing::{info, warn};

use crate::device::{Device, DeviceConfig, DeviceId};
use crate::error::NetworkError;

/// Canonical store of devices keyed by identifier
#[derive(Debug, Clone, Default)]
pub struct DeviceRegistry {
    devices: BTreeMap<DeviceId, Device>,
}

impl DeviceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a device, replacing any existing entry with the same id
    pub fn add_device(
        &mut self,
        id: &str,
        device_type: Option<&str>,
        config: DeviceConfig,
    ) -> Result<DeviceId, NetworkError> {
        let id = DeviceId::new(id)?;
        let device_type = device_type
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string);
        let device = Device::new(id.clone(), device_type).with_config(config);

        info!(device = %id, "Device added: {}", device);
        if self.devices.insert(id.clone(), device).is_some() {
            info!(device = %id, "Replaced existing registry entry");
        }
        Ok(id)
    }

    /// Remove a device, returning it if it was present
    pub fn remove_device(&mut self, id: &str) -> Result<Option<Device>, NetworkError> {
        if id.trim().is_empty() {
            return Err(NetworkError::InvalidArgument(
                "device id cannot be empty".to_string(),
            ));
        }
        if self.devices.is_empty() {
            return Err(NetworkError::InvalidArgument(
                "no devices to remove".to_string(),
            ));
        }

        match self.devices.remove(id) {
            Some(device) => {
                info!(device = %device.id, "Device removed: {}", device);
                Ok(Some(device))
            }
            None => {
                warn!(device = id, "Remove requested for unknown device");
                Ok(None)
            }
        }
    }

    /// Replace the configuration of a registered device
    pub fn configure_device(&mut self, id: &str, config: DeviceConfig) -> Result<(), NetworkError> {
        let device = self
            .devices
            .get_mut(id)
            .ok_or_else(|| NetworkError::unknown_device(id))?;
        device.config = config;
        info!(device = %device.id, "Device configured: {}", device);
        Ok(())
    }

    /// Snapshot of all devices
    pub fn list_devices(&self) -> Vec<Device> {
        self.devices.values().cloned().collect()
    }

    pub fn get(&self, id: &str) -> Option<&Device> {
        self.devices.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.devices.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &DeviceId> {
        self.devices.keys()
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}
