use log::debug;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4, TcpStream};
use std::ops::RangeInclusive;
use std::time::Duration;

pub const DEFAULT_PORT_RANGE: RangeInclusive<u16> = 5001..=5003;
pub const DEFAULT_OCTET_OFFSETS: RangeInclusive<u8> = 0..=1;

/// Supplies the current neighbor list of a node
pub trait NeighborDiscovery: Send + Sync {
    fn discover(&self) -> Vec<String>;
}

/// Probe nearby hosts and ports with a TCP connect, keeping the ones that answer.
/// Candidate hosts share the first three octets of our own address and add an
/// offset to the last one.
pub struct PortScanDiscovery {
    host: Ipv4Addr,
    port: u16,
    octet_offsets: RangeInclusive<u8>,
    ports: RangeInclusive<u16>,
    timeout: Duration,
}

impl PortScanDiscovery {
    pub fn new(host: Ipv4Addr, port: u16, timeout: Duration) -> PortScanDiscovery {
        PortScanDiscovery {
            host,
            port,
            octet_offsets: DEFAULT_OCTET_OFFSETS,
            ports: DEFAULT_PORT_RANGE,
            timeout,
        }
    }

    pub fn with_ports(mut self, ports: RangeInclusive<u16>) -> Self {
        self.ports = ports;
        self
    }

    pub fn with_octet_offsets(mut self, offsets: RangeInclusive<u8>) -> Self {
        self.octet_offsets = offsets;
        self
    }

    /// Every `host:port` worth probing, ourselves excluded
    pub fn candidates(&self) -> Vec<SocketAddrV4> {
        let [a, b, c, last] = self.host.octets();
        let own = SocketAddrV4::new(self.host, self.port);
        let mut candidates = vec![];
        for offset in self.octet_offsets.clone() {
            let Some(octet) = last.checked_add(offset) else {
                continue;
            };
            let host = Ipv4Addr::new(a, b, c, octet);
            for port in self.ports.clone() {
                let addr = SocketAddrV4::new(host, port);
                if addr != own {
                    candidates.push(addr);
                }
            }
        }
        candidates
    }

    fn is_found_host(&self, addr: SocketAddrV4) -> bool {
        match TcpStream::connect_timeout(&SocketAddr::V4(addr), self.timeout) {
            Ok(_) => true,
            Err(e) => {
                debug!("Probe {addr} failed: {e}");
                false
            }
        }
    }
}

impl NeighborDiscovery for PortScanDiscovery {
    fn discover(&self) -> Vec<String> {
        self.candidates()
            .into_iter()
            .filter(|addr| self.is_found_host(*addr))
            .map(|addr| addr.to_string())
            .collect()
    }
}

/// A fixed neighbor list, used when peers are configured by hand and in tests
pub struct StaticNeighbors(pub Vec<String>);

impl NeighborDiscovery for StaticNeighbors {
    fn discover(&self) -> Vec<String> {
        self.0.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;

    #[test]
    fn test_candidates_exclude_self() {
        let discovery = PortScanDiscovery::new(
            Ipv4Addr::new(192, 168, 0, 10),
            5001,
            Duration::from_millis(50),
        );
        let candidates: Vec<String> = discovery
            .candidates()
            .iter()
            .map(|addr| addr.to_string())
            .collect();
        assert_eq!(
            candidates,
            vec![
                "192.168.0.10:5002",
                "192.168.0.10:5003",
                "192.168.0.11:5001",
                "192.168.0.11:5002",
                "192.168.0.11:5003",
            ]
        );
    }

    #[test]
    fn test_candidates_stop_at_last_octet() {
        let discovery = PortScanDiscovery::new(
            Ipv4Addr::new(10, 0, 0, 255),
            5001,
            Duration::from_millis(50),
        )
        .with_ports(5001..=5001);
        assert!(discovery.candidates().is_empty());
    }

    #[test]
    fn test_discover_finds_listening_port() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let open = listener.local_addr().unwrap().port();
        let discovery = PortScanDiscovery::new(
            Ipv4Addr::LOCALHOST,
            open.wrapping_add(1),
            Duration::from_millis(200),
        )
        .with_ports(open..=open)
        .with_octet_offsets(0..=0);
        assert_eq!(discovery.discover(), vec![format!("127.0.0.1:{open}")]);
    }

    #[test]
    fn test_static_neighbors() {
        let discovery = StaticNeighbors(vec!["a:1".to_string()]);
        assert_eq!(discovery.discover(), vec!["a:1"]);
    }
}
