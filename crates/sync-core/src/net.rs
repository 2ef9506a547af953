//! Network reachability probe
//!
//! A boolean precondition for the two network phases: if a bounded-timeout
//! connection to a well-known endpoint fails, the phase is skipped — never
//! treated as an error.

use crate::config::NetworkSection;
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

/// Attempt a TCP connection to `host:port` within `timeout`.
///
/// DNS failure, connection refusal, and timeout all count as unreachable.
pub fn probe(host: &str, port: u16, timeout: Duration) -> bool {
    let addrs = match (host, port).to_socket_addrs() {
        Ok(addrs) => addrs,
        Err(_) => return false,
    };

    for addr in addrs {
        if TcpStream::connect_timeout(&addr, timeout).is_ok() {
            return true;
        }
    }
    false
}

/// Probe the endpoint named by a [`NetworkSection`].
pub fn reachable(network: &NetworkSection) -> bool {
    probe(
        &network.probe_host,
        network.probe_port,
        Duration::from_secs(network.timeout_secs),
    )
}
