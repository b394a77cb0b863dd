//! Device types for the registry

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::NetworkError;

/// Unique identifier for a device
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DeviceId(String);

impl DeviceId {
    /// Create a DeviceId, rejecting empty or whitespace-only identifiers
    pub fn new(id: impl Into<String>) -> Result<Self, NetworkError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(NetworkError::InvalidArgument(
                "device id cannot be empty".to_string(),
            ));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for DeviceId {
    type Error = NetworkError;

    fn try_from(id: String) -> Result<Self, Self::Error> {
        Self::new(id)
    }
}

impl From<DeviceId> for String {
    fn from(id: DeviceId) -> Self {
        id.0
    }
}

impl std::borrow::Borrow<str> for DeviceId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Free-form key/value configuration attached to a device
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceConfig(BTreeMap<String, String>);

impl DeviceConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a configuration entry, replacing any previous value for the key
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for DeviceConfig {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl fmt::Display for DeviceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (key, value)) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}={}", key, value)?;
        }
        write!(f, "}}")
    }
}

/// A device known to the registry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    /// Unique device identifier
    pub id: DeviceId,
    /// Type label (router, switch, ...), informational only
    pub device_type: Option<String>,
    /// Device configuration
    pub config: DeviceConfig,
}

impl Device {
    /// Create a new device with an empty configuration
    pub fn new(id: DeviceId, device_type: Option<String>) -> Self {
        Self {
            id,
            device_type,
            config: DeviceConfig::new(),
        }
    }

    pub fn with_config(mut self, config: DeviceConfig) -> Self {
        self.config = config;
        self
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Device[id={}, type={}, config={}]",
            self.id,
            self.device_type.as_deref().unwrap_or("none"),
            self.config
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_id_rejects_empty() {
        assert!(DeviceId::new("").is_err());
        assert!(DeviceId::new("   ").is_err());
        assert_eq!(DeviceId::new("R1").unwrap().as_str(), "R1");
    }

    #[test]
    fn test_device_id_deserialize_validates() {
        let id: DeviceId = serde_json::from_str(r#""R1""#).unwrap();
        assert_eq!(id.as_str(), "R1");
        assert!(serde_json::from_str::<DeviceId>(r#""""#).is_err());
    }

    #[test]
    fn test_config_set_overwrites() {
        let mut config = DeviceConfig::new();
        config.set("ip", "10.0.0.1");
        config.set("ip", "10.0.0.2");
        assert_eq!(config.len(), 1);
        assert_eq!(config.get("ip"), Some("10.0.0.2"));
        assert_eq!(config.get("mask"), None);
    }

    #[test]
    fn test_device_display() {
        let id = DeviceId::new("R1").unwrap();
        let device = Device::new(id.clone(), Some("router".to_string()));
        assert_eq!(device.to_string(), "Device[id=R1, type=router, config={}]");

        let config: DeviceConfig = [("vlan", "10"), ("ip", "10.0.0.1")].into_iter().collect();
        let device = Device::new(id, None).with_config(config);
        assert_eq!(
            device.to_string(),
            "Device[id=R1, type=none, config={ip=10.0.0.1, vlan=10}]"
        );
    }
}
