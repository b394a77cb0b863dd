//! Line-oriented device and connection files
//!
//! Devices are listed one per line as `id,type[,config]`, where `config` is
//! either `Config:{key=value;key=value}` or the bare `key=value;key=value`
//! form. Connections are listed as `id,id`. Blank lines and lines starting
//! with `#` are ignored.
//!
//! Loading is not transactional: records before a failing line stay applied.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use crate::device::DeviceConfig;
use crate::error::NetworkError;
use crate::network::Network;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Line {line}: {reason}")]
    Malformed { line: usize, reason: String },
    #[error("Line {line}: {source}")]
    Network {
        line: usize,
        #[source]
        source: NetworkError,
    },
}

/// A parsed device record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceRecord {
    pub id: String,
    pub device_type: String,
    pub config: DeviceConfig,
}

/// Parse a `Config:{a=1;b=2}` (or bare `a=1;b=2`) configuration string.
///
/// Entries without `=` are ignored; values may themselves contain `=`.
pub fn parse_config(text: &str) -> DeviceConfig {
    let text = text.trim();
    let body = text
        .strip_prefix("Config:")
        .map(str::trim_start)
        .unwrap_or(text);
    let body = body.strip_prefix('{').unwrap_or(body);
    let body = body.strip_suffix('}').unwrap_or(body);

    body.split(';')
        .filter_map(|entry| entry.split_once('='))
        .map(|(key, value)| (key.trim(), value.trim()))
        .filter(|(key, _)| !key.is_empty())
        .collect()
}

/// Parse one `id,type[,config]` line. The id is not validated here.
pub fn parse_device_line(line: &str) -> Option<DeviceRecord> {
    let mut parts = line.splitn(3, ',');
    let id = parts.next()?.trim();
    let device_type = parts.next()?.trim();
    let config = parts.next().map(parse_config).unwrap_or_default();

    Some(DeviceRecord {
        id: id.to_string(),
        device_type: device_type.to_string(),
        config,
    })
}

/// Parse one `id,id` line
pub fn parse_connection_line(line: &str) -> Option<(&str, &str)> {
    let mut parts = line.split(',');
    let a = parts.next()?.trim();
    let b = parts.next()?.trim();
    if parts.next().is_some() {
        return None;
    }
    Some((a, b))
}

fn records(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
}

/// Apply device records to the network, returning the number added
pub fn load_devices(network: &mut Network, text: &str) -> Result<usize, IngestError> {
    let mut added = 0;
    for (line_no, line) in records(text) {
        let record = parse_device_line(line).ok_or_else(|| IngestError::Malformed {
            line: line_no,
            reason: format!("invalid device format: {}", line),
        })?;

        let device_type = Some(record.device_type.as_str());
        network
            .add_device(&record.id, device_type, record.config)
            .map_err(|source| IngestError::Network {
                line: line_no,
                source,
            })?;
        added += 1;
    }
    Ok(added)
}

/// Apply connection records to the network, returning the number added.
///
/// Outside strict mode, lines that do not hold exactly two fields or that
/// name unregistered devices are skipped with a warning.
pub fn load_connections(network: &mut Network, text: &str, strict: bool) -> Result<usize, IngestError> {
    let mut added = 0;
    for (line_no, line) in records(text) {
        let Some((a, b)) = parse_connection_line(line) else {
            if strict {
                return Err(IngestError::Malformed {
                    line: line_no,
                    reason: format!("invalid connection format: {}", line),
                });
            }
            warn!(line = line_no, "Skipping malformed connection: {}", line);
            continue;
        };

        if !strict && !(network.is_known_device(a) && network.is_known_device(b)) {
            warn!(
                line = line_no,
                "Skipping connection with unregistered device: {} <-> {}", a, b
            );
            continue;
        }

        network
            .add_edge(a, b)
            .map_err(|source| IngestError::Network {
                line: line_no,
                source,
            })?;
        added += 1;
    }
    Ok(added)
}

fn read(path: &Path) -> Result<String, IngestError> {
    std::fs::read_to_string(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Load devices from a file
pub fn load_devices_file(network: &mut Network, path: &Path) -> Result<usize, IngestError> {
    let added = load_devices(network, &read(path)?)?;
    info!(path = %path.display(), devices = added, "Devices loaded from file");
    Ok(added)
}

/// Load connections from a file
pub fn load_connections_file(network: &mut Network, path: &Path, strict: bool) -> Result<usize, IngestError> {
    let added = load_connections(network, &read(path)?, strict)?;
    info!(path = %path.display(), connections = added, "Connections loaded from file");
    Ok(added)
}
