use netroute_core::{ingest, DeviceConfig, Network, NetworkError};

const DEVICES: &str = "\
R1,router,Config:{ip=10.0.0.1}
R2,router,Config:{ip=10.0.0.2}
R3,router,Config:{ip=10.0.0.3}
R4,router,Config:{ip=10.0.0.4}
";

const CONNECTIONS: &str = "\
R1,R2
R2,R3
R3,R4
R1,R4
";

fn ring() -> Network {
    let mut network = Network::new();
    ingest::load_devices(&mut network, DEVICES).unwrap();
    ingest::load_connections(&mut network, CONNECTIONS, true).unwrap();
    network
}

#[test]
fn ring_route_takes_two_hops() {
    let network = ring();
    let route = network.shortest_path("R1", "R3");

    assert_eq!(route.len(), 3);
    assert_eq!(route.hops(), 2);
    let middle = route.ids()[1].as_str();
    assert!(middle == "R2" || middle == "R4");
}

#[test]
fn ring_tie_break_follows_identifier_order() {
    let network = ring();
    assert_eq!(network.shortest_path("R1", "R3").to_string(), "R1 <-> R2 <-> R3");
    assert_eq!(network.shortest_path("R3", "R1").to_string(), "R3 <-> R2 <-> R1");
}

#[test]
fn every_route_step_is_a_link() {
    let network = ring();
    for source in ["R1", "R2", "R3", "R4"] {
        for destination in ["R1", "R2", "R3", "R4"] {
            let route = network.shortest_path(source, destination);
            assert_eq!(route.ids().first().map(|id| id.as_str()), Some(source));
            assert_eq!(route.ids().last().map(|id| id.as_str()), Some(destination));
            for pair in route.ids().windows(2) {
                assert!(network.topology().contains_edge(pair[0].as_str(), pair[1].as_str()));
            }
            assert!(route.hops() <= 2);
        }
    }
}

#[test]
fn unknown_endpoints_differ_between_queries_and_mutations() {
    let mut network = ring();

    assert!(network.shortest_path("ghost", "R1").is_empty());
    assert!(matches!(
        network.add_edge("R1", "ghost"),
        Err(NetworkError::InvalidArgument(_))
    ));
    assert!(matches!(
        network.configure_device("ghost", DeviceConfig::new()),
        Err(NetworkError::InvalidArgument(_))
    ));
}

#[test]
fn isolated_device_has_no_route() {
    let mut network = ring();
    network.add_device("R5", Some("router"), DeviceConfig::new()).unwrap();

    assert!(network.shortest_path("R1", "R5").is_empty());
    assert_eq!(network.shortest_path("R5", "R5").to_string(), "R5");
}
