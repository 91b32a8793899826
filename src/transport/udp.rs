//! UDP datagram transport
//!
//! Sends each formatted line as one unframed datagram to the `ip`/`port`
//! destination named in its config section. No retry, no acknowledgment, no
//! delivery or ordering guarantee beyond what UDP gives.
//!
//! Parameters are validated before any socket is opened, so an invalid `ip`
//! or `port` never leaks a descriptor.

use std::net::{Ipv4Addr, SocketAddrV4, UdpSocket};

use parking_lot::Mutex;
use socket2::{Domain, Protocol, Socket, Type};
use tracing::debug;

use crate::config::SectionRef;
use crate::constants::{UDP_IP_KEY, UDP_PORT_KEY};
use crate::error::{LogError, Result};
use crate::transport::Transport;

/// Datagram transport
#[derive(Default)]
pub struct UdpTransport {
    socket: Mutex<Option<(UdpSocket, SocketAddrV4)>>,
}

impl UdpTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Check the address is digits and exactly three `.` separators, then parse
fn parse_ip(ip: &str) -> Result<Ipv4Addr> {
    for c in ip.chars() {
        if !c.is_ascii_digit() && c != '.' {
            return Err(LogError::InvalidParameter {
                field: UDP_IP_KEY,
                reason: format!("unexpected character {:?} in {:?}", c, ip),
            });
        }
    }

    let dots = ip.chars().filter(|&c| c == '.').count();
    if dots != 3 {
        return Err(LogError::InvalidParameter {
            field: UDP_IP_KEY,
            reason: format!("expected 3 '.' separators in {:?}, found {}", ip, dots),
        });
    }

    ip.parse().map_err(|_| LogError::InvalidParameter {
        field: UDP_IP_KEY,
        reason: format!("{:?} is not an IPv4 address", ip),
    })
}

/// Parse and range-check the destination port (1-65535)
fn parse_port(port: &str) -> Result<u16> {
    match port.parse::<u32>() {
        Ok(value) if (1..=65_535).contains(&value) => Ok(value as u16),
        _ => Err(LogError::InvalidParameter {
            field: UDP_PORT_KEY,
            reason: format!("{:?} is not a port between 1 and 65535", port),
        }),
    }
}

impl Transport for UdpTransport {
    fn name(&self) -> &'static str {
        "udp"
    }

    fn initialize(&self, params: Option<SectionRef<'_>>) -> Result<()> {
        let params = params.ok_or(LogError::InvalidParameter {
            field: UDP_IP_KEY,
            reason: "udp transport selected without a config section".into(),
        })?;

        let mut socket = self.socket.lock();
        if socket.is_some() {
            return Err(LogError::AlreadyInitialized {
                transport: self.name(),
            });
        }

        let ip = params.get(UDP_IP_KEY).ok_or(LogError::InvalidParameter {
            field: UDP_IP_KEY,
            reason: "missing from configuration".into(),
        })?;
        let port = params
            .get(UDP_PORT_KEY)
            .ok_or(LogError::InvalidParameter {
                field: UDP_PORT_KEY,
                reason: "missing from configuration".into(),
            })?;

        let target = SocketAddrV4::new(parse_ip(ip)?, parse_port(port)?);

        let opened = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))
            .map_err(|e| LogError::SocketOpen { source: e })?;

        debug!("output set to udp: {}", target);
        *socket = Some((opened.into(), target));
        Ok(())
    }

    fn terminate(&self) -> Result<()> {
        let mut socket = self.socket.lock();

        if socket.take().is_none() {
            return Err(LogError::AlreadyTerminated { what: self.name() });
        }

        debug!("terminated: udp");
        Ok(())
    }

    fn transmit(&self, line: &[u8]) -> Result<()> {
        if line.is_empty() {
            return Err(LogError::InvalidMessage);
        }

        let guard = self.socket.lock();
        let (socket, target) = guard.as_ref().ok_or(LogError::NotReady)?;

        let sent = socket
            .send_to(line, *target)
            .map_err(|e| LogError::Transmit {
                transport: self.name(),
                source: e,
            })?;

        if sent < line.len() {
            return Err(LogError::PartialWrite {
                transport: self.name(),
                written: sent,
                expected: line.len(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigDocument;

    fn config_with(ip: &str, port: &str) -> ConfigDocument {
        let text = format!("[output=udp]\nip = {}\nport = {}\n", ip, port);
        ConfigDocument::from_bytes(text.as_bytes()).unwrap()
    }

    fn try_initialize(ip: &str, port: &str) -> (UdpTransport, Result<()>) {
        let doc = config_with(ip, port);
        let transport = UdpTransport::new();
        let status = transport.initialize(Some(doc.section("output=udp").unwrap()));
        (transport, status)
    }

    // =========================================================================
    // Validation tests
    // =========================================================================

    #[test]
    fn test_valid_destination() {
        let (transport, status) = try_initialize("127.0.0.1", "9100");
        assert!(status.is_ok());
        transport.terminate().unwrap();
    }

    #[test]
    fn test_ip_with_letters_rejected() {
        let (transport, status) = try_initialize("localhost", "9100");
        assert!(matches!(status, Err(LogError::InvalidParameter { .. })));
        // no socket was opened
        assert!(matches!(
            transport.transmit(b"line"),
            Err(LogError::NotReady)
        ));
    }

    #[test]
    fn test_ip_with_wrong_dot_count_rejected() {
        let (_, status) = try_initialize("127.0.1", "9100");
        assert!(matches!(status, Err(LogError::InvalidParameter { .. })));
    }

    #[test]
    fn test_ip_with_out_of_range_octet_rejected() {
        let (transport, status) = try_initialize("999.1.1.1", "9100");
        assert!(matches!(status, Err(LogError::InvalidParameter { .. })));
        assert!(matches!(
            transport.transmit(b"line"),
            Err(LogError::NotReady)
        ));
    }

    #[test]
    fn test_port_zero_rejected() {
        let (_, status) = try_initialize("127.0.0.1", "0");
        assert!(matches!(status, Err(LogError::InvalidParameter { .. })));
    }

    #[test]
    fn test_port_above_range_rejected() {
        let (_, status) = try_initialize("127.0.0.1", "65536");
        assert!(matches!(status, Err(LogError::InvalidParameter { .. })));
    }

    #[test]
    fn test_port_not_numeric_rejected() {
        let (_, status) = try_initialize("127.0.0.1", "nine");
        assert!(matches!(status, Err(LogError::InvalidParameter { .. })));
    }

    #[test]
    fn test_missing_keys_rejected() {
        let doc = ConfigDocument::from_bytes(b"[output=udp]\nip = 127.0.0.1\n").unwrap();
        let transport = UdpTransport::new();

        assert!(matches!(
            transport.initialize(Some(doc.section("output=udp").unwrap())),
            Err(LogError::InvalidParameter { .. })
        ));
    }

    // =========================================================================
    // Datagram tests
    // =========================================================================

    #[test]
    fn test_transmit_sends_one_datagram_per_line() {
        let receiver = std::net::UdpSocket::bind("127.0.0.1:0").unwrap();
        let port = receiver.local_addr().unwrap().port();
        receiver
            .set_read_timeout(Some(std::time::Duration::from_secs(2)))
            .unwrap();

        let (transport, status) = try_initialize("127.0.0.1", &port.to_string());
        status.unwrap();

        transport.transmit(b"one datagram").unwrap();

        let mut buf = [0u8; 256];
        let (len, _) = receiver.recv_from(&mut buf).unwrap();
        // verbatim payload, no added framing or newline
        assert_eq!(&buf[..len], b"one datagram");

        transport.terminate().unwrap();
    }

    #[test]
    fn test_double_terminate_fails() {
        let (transport, status) = try_initialize("127.0.0.1", "9100");
        status.unwrap();

        transport.terminate().unwrap();
        assert!(matches!(
            transport.terminate(),
            Err(LogError::AlreadyTerminated { .. })
        ));
    }
}
