//! Hop-count shortest path search over the topology

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;
use tracing::{debug, info, warn};

use crate::device::{Device, DeviceId};
use crate::registry::DeviceRegistry;
use crate::topology::Topology;

/// Ordered sequence of devices from source to destination
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Route(Vec<DeviceId>);

impl Route {
    /// The "no route" result
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of devices in the route
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Number of links traversed
    pub fn hops(&self) -> usize {
        self.0.len().saturating_sub(1)
    }

    pub fn ids(&self) -> &[DeviceId] {
        &self.0
    }

    /// Resolve the route against the registry
    pub fn devices<'a>(&self, registry: &'a DeviceRegistry) -> Vec<&'a Device> {
        self.0.iter().filter_map(|id| registry.get(id.as_str())).collect()
    }

    /// Render the route with a custom separator
    pub fn join(&self, separator: &str) -> String {
        self.0
            .iter()
            .map(DeviceId::as_str)
            .collect::<Vec<_>>()
            .join(separator)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.join(" <-> "))
    }
}

/// Find the route with the fewest hops between two registered devices.
///
/// Unknown endpoints are not an error: the result is an empty route, the same
/// as for two devices in disconnected components. The two cases differ only in
/// the emitted log event.
pub fn shortest_path(
    registry: &DeviceRegistry,
    topology: &Topology,
    source: &str,
    destination: &str,
) -> Route {
    if !(Topology::is_known_device(registry, source) && Topology::is_known_device(registry, destination)) {
        warn!(
            source,
            destination,
            "Source or destination not found in registry"
        );
        return Route::empty();
    }

    match search(topology, source, destination) {
        Some(route) => {
            info!(
                source,
                destination,
                hops = route.hops(),
                "Optimal route found between {} and {}",
                source,
                destination
            );
            route
        }
        None => {
            info!(
                source,
                destination,
                "No route found between {} and {}",
                source,
                destination
            );
            Route::empty()
        }
    }
}

/// Breadth-first search with predecessor tracking
fn search(topology: &Topology, source: &str, destination: &str) -> Option<Route> {
    let source = topology.device_id(source)?;
    let mut visited: HashSet<&DeviceId> = HashSet::new();
    let mut queue: VecDeque<&DeviceId> = VecDeque::new();
    let mut previous: HashMap<&DeviceId, &DeviceId> = HashMap::new();

    visited.insert(source);
    queue.push_back(source);

    while let Some(current) = queue.pop_front() {
        if current.as_str() == destination {
            return Some(reconstruct(&previous, current));
        }

        for neighbor in topology.neighbors(current.as_str()) {
            if visited.insert(neighbor) {
                previous.insert(neighbor, current);
                queue.push_back(neighbor);
            }
        }
    }

    debug!(source = %source, visited = visited.len(), "Search exhausted");
    None
}

/// Walk predecessor links back from the destination
fn reconstruct(previous: &HashMap<&DeviceId, &DeviceId>, destination: &DeviceId) -> Route {
    let mut path = vec![destination.clone()];
    let mut current = destination;
    while let Some(&prior) = previous.get(current) {
        path.push(prior.clone());
        current = prior;
    }
    path.reverse();
    Route(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::DeviceConfig;
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    fn build(ids: &[&str], edges: &[(&str, &str)]) -> (DeviceRegistry, Topology) {
        let mut registry = DeviceRegistry::new();
        for id in ids {
            registry.add_device(id, None, DeviceConfig::new()).unwrap();
        }
        let mut topology = Topology::from_registry(&registry);
        for (a, b) in edges {
            topology.add_edge(&registry, a, b).unwrap();
        }
        (registry, topology)
    }

    fn ids(route: &Route) -> Vec<&str> {
        route.ids().iter().map(DeviceId::as_str).collect()
    }

    #[test]
    fn test_direct_edge_is_preferred() {
        let (registry, topology) = build(&["A", "B", "C"], &[("A", "B"), ("B", "C"), ("A", "C")]);
        let route = shortest_path(&registry, &topology, "A", "C");
        assert_eq!(ids(&route), vec!["A", "C"]);
        assert_eq!(route.hops(), 1);
    }

    #[test]
    fn test_two_hop_route_without_direct_edge() {
        let (registry, topology) = build(&["A", "B", "C"], &[("A", "B"), ("B", "C")]);
        let route = shortest_path(&registry, &topology, "A", "C");
        assert_eq!(ids(&route), vec!["A", "B", "C"]);
        assert_eq!(route.hops(), 2);
    }

    #[test]
    fn test_shorter_branch_beats_longer_alternate() {
        // A-B-C-D-E and A-F-E
        let (registry, topology) = build(
            &["A", "B", "C", "D", "E", "F"],
            &[("A", "B"), ("B", "C"), ("C", "D"), ("D", "E"), ("A", "F"), ("F", "E")],
        );
        let route = shortest_path(&registry, &topology, "A", "E");
        assert_eq!(ids(&route), vec!["A", "F", "E"]);
    }

    #[test]
    fn test_self_path() {
        let (registry, topology) = build(&["A", "B"], &[("A", "B")]);
        let route = shortest_path(&registry, &topology, "A", "A");
        assert_eq!(ids(&route), vec!["A"]);
        assert_eq!(route.hops(), 0);

        let (registry, topology) = build(&["lonely"], &[]);
        assert_eq!(ids(&shortest_path(&registry, &topology, "lonely", "lonely")), vec!["lonely"]);
    }

    #[test]
    fn test_disconnected_components() {
        let (registry, topology) = build(&["A", "B", "C", "D"], &[("A", "B"), ("C", "D")]);
        let route = shortest_path(&registry, &topology, "A", "D");
        assert!(route.is_empty());
        assert_eq!(route.hops(), 0);
    }

    #[test]
    fn test_unknown_device_yields_empty_route() {
        let (registry, topology) = build(&["A"], &[]);
        assert!(shortest_path(&registry, &topology, "ghost", "A").is_empty());
        assert!(shortest_path(&registry, &topology, "A", "ghost").is_empty());
    }

    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn capture_logs(f: impl FnOnce()) -> String {
        let buffer = LogBuffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, f);

        let bytes = buffer.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_unknown_device_and_no_route_log_differently() {
        let (registry, topology) = build(&["A", "B", "C", "D"], &[("A", "B"), ("C", "D")]);

        let logs = capture_logs(|| {
            assert!(shortest_path(&registry, &topology, "ghost", "A").is_empty());
        });
        let line = logs
            .lines()
            .find(|line| line.contains("Source or destination not found"))
            .unwrap();
        assert!(line.contains("WARN"));
        assert!(!logs.contains("No route found"));

        let logs = capture_logs(|| {
            assert!(shortest_path(&registry, &topology, "A", "D").is_empty());
        });
        let line = logs.lines().find(|line| line.contains("No route found")).unwrap();
        assert!(line.contains("INFO"));
        assert!(line.contains("No route found between A and D"));
        assert!(!logs.contains("Source or destination not found"));
        assert!(!logs.contains("WARN"));
    }

    #[test]
    fn test_registered_device_missing_from_topology_has_no_route() {
        let (registry, _) = build(&["A", "B"], &[]);
        let topology = Topology::new();
        assert!(shortest_path(&registry, &topology, "A", "B").is_empty());
        assert!(shortest_path(&registry, &topology, "A", "A").is_empty());
    }

    #[test]
    fn test_route_rendering() {
        let (registry, topology) = build(&["R1", "R2"], &[("R1", "R2")]);
        let route = shortest_path(&registry, &topology, "R1", "R2");
        assert_eq!(route.to_string(), "R1 <-> R2");
        assert_eq!(route.join(" -> "), "R1 -> R2");
        assert_eq!(route.to_json().unwrap(), r#"["R1","R2"]"#);
        assert_eq!(route.devices(&registry).len(), 2);
    }
}
