//! netroute core - device registry, topology graph, and routing
//!
//! This crate provides the building blocks for hop-count routing:
//! - Device registry as the single source of truth for known devices
//! - Undirected topology graph validated against the registry
//! - Breadth-first shortest path search between two devices
//! - Loaders for the line-oriented device and connection files

pub mod device;
pub mod error;
pub mod ingest;
pub mod network;
pub mod registry;
pub mod route;
pub mod topology;

pub use device::{Device, DeviceConfig, DeviceId};
pub use error::NetworkError;
pub use ingest::IngestError;
pub use network::{Network, SharedNetwork};
pub use registry::DeviceRegistry;
pub use route::{shortest_path, Route};
pub use topology::Topology;
