//! Rendering of query results for the terminal

use netroute_core::{Device, Route};
use serde::Serialize;

/// Result of a single route query
#[derive(Debug, Serialize)]
pub struct RouteReport<'a> {
    pub source: &'a str,
    pub destination: &'a str,
    pub hops: Option<usize>,
    pub route: &'a Route,
}

impl<'a> RouteReport<'a> {
    pub fn new(source: &'a str, destination: &'a str, route: &'a Route) -> Self {
        Self {
            source,
            destination,
            hops: (!route.is_empty()).then(|| route.hops()),
            route,
        }
    }

    pub fn to_text(&self, separator: &str) -> String {
        if self.route.is_empty() {
            format!("No route found from {} to {}", self.source, self.destination)
        } else {
            format!(
                "Optimal route from {} to {}:\n{}",
                self.source,
                self.destination,
                self.route.join(separator)
            )
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// One line per device, in registry order
pub fn device_listing(devices: &[Device]) -> String {
    let mut out = format!("Loaded {} devices:", devices.len());
    for device in devices {
        out.push_str("\n  - ");
        out.push_str(&device.to_string());
    }
    out
}
