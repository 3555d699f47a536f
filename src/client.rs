//! Blocking SNMP GET client.
//!
//! A [`Session`] describes the peer. [`SnmpClient::open`] turns it into an
//! open handle that owns one UDP socket; [`SnmpClient::close`] (or dropping
//! the handle) releases it. A closed handle stays closed.

use std::io;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr, ToSocketAddrs, UdpSocket};
use std::time::{Duration, Instant};

use crate::error::{Error, ErrorStatus, Result};
use crate::library;
use crate::oid::{IntoOid, ObjectIdentifier};
use crate::response::{PacketError, Response};
use crate::snmp::{self, PduType, SnmpMessage, Version};
use crate::value::Value;

pub const DEFAULT_PORT: u16 = 161;

// Largest UDP payload; replies are read whole.
const MAX_DATAGRAM: usize = 65_535;

/// Where and how to reach an agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub peer: String,
    pub port: u16,
    pub version: Version,
    pub community: Vec<u8>,
}

impl Session {
    /// A v2c session on port 161.
    pub fn new(peer: impl Into<String>, community: impl AsRef<[u8]>) -> Self {
        Self {
            peer: peer.into(),
            port: DEFAULT_PORT,
            version: Version::V2c,
            community: community.as_ref().to_vec(),
        }
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn version(mut self, version: Version) -> Self {
        self.version = version;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.community.is_empty() {
            return Err(Error::InvalidSession(format!(
                "community must not be empty for SNMPv{}",
                self.version
            )));
        }
        if self.peer.is_empty() {
            return Err(Error::InvalidSession("peer address is empty".to_string()));
        }
        Ok(())
    }

    fn resolve(&self) -> Result<SocketAddr> {
        let connection_error = |source| Error::Connection {
            peer: self.peer.clone(),
            source,
        };
        (self.peer.as_str(), self.port)
            .to_socket_addrs()
            .map_err(connection_error)?
            .next()
            .ok_or_else(|| {
                connection_error(io::Error::new(
                    io::ErrorKind::NotFound,
                    "address resolved to nothing",
                ))
            })
    }
}

/// An open session. Calls to [`get`](Self::get) are serialized by `&mut self`.
#[derive(Debug)]
pub struct SnmpClient {
    session: Session,
    target: SocketAddr,
    socket: Option<UdpSocket>,
}

impl SnmpClient {
    /// Resolves the peer and binds a UDP socket on an ephemeral port.
    pub fn open(session: Session) -> Result<Self> {
        session.validate()?;
        let target = session.resolve()?;

        let local: SocketAddr = if target.is_ipv4() {
            (Ipv4Addr::UNSPECIFIED, 0).into()
        } else {
            (Ipv6Addr::UNSPECIFIED, 0).into()
        };
        let connection_error = |source| Error::Connection {
            peer: session.peer.clone(),
            source,
        };
        let socket = UdpSocket::bind(local).map_err(connection_error)?;
        // Connecting filters datagrams from other sources and surfaces ICMP
        // unreachable errors on the next receive.
        socket.connect(target).map_err(connection_error)?;

        library::ensure_init();
        library::endpoint_opened();
        tracing::debug!(
            target: "snmp_query::client",
            { snmp.peer = %target, snmp.version = %session.version },
            "session opened"
        );

        Ok(Self {
            session,
            target,
            socket: Some(socket),
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The resolved peer address.
    pub fn target(&self) -> SocketAddr {
        self.target
    }

    pub fn is_closed(&self) -> bool {
        self.socket.is_none()
    }

    /// Local address of the socket, or `None` once closed.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.socket.as_ref().and_then(|s| s.local_addr().ok())
    }

    /// Sends one GET for `oids` and blocks until a correlated reply, the
    /// timeout, or a transport failure.
    ///
    /// OID strings are parsed before anything is sent; a malformed one fails
    /// with [`Error::Parse`]. Nothing is retried here.
    pub fn get<I>(&mut self, oids: I, timeout: Duration) -> Result<Response>
    where
        I: IntoIterator,
        I::Item: IntoOid,
    {
        let socket = self.socket.as_ref().ok_or(Error::Closed)?;

        let oids = oids
            .into_iter()
            .map(IntoOid::into_oid)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        if oids.is_empty() {
            return Err(Error::EmptyRequest);
        }
        let deadline = match Instant::now().checked_add(timeout) {
            Some(deadline) if !timeout.is_zero() => deadline,
            _ => return Err(Error::InvalidTimeout),
        };

        let request_id = library::next_request_id();
        let request = SnmpMessage::get_request(
            self.session.version,
            &self.session.community,
            request_id,
            &oids,
        );
        let buf = request.encode();
        if buf.len() > MAX_DATAGRAM {
            return Err(Error::Encode(format!(
                "request is {} bytes, larger than one datagram",
                buf.len()
            )));
        }

        tracing::debug!(
            target: "snmp_query::client",
            { snmp.peer = %self.target, snmp.request_id = request_id, snmp.varbinds = oids.len() },
            "sending GET"
        );
        tracing::trace!(target: "snmp_query::client", "request bytes: {:02x?}", &buf[..]);

        if let Err(e) = socket.send(&buf) {
            return Ok(Response::TransportError(e));
        }

        let mut response = vec![0u8; MAX_DATAGRAM];

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                tracing::debug!(
                    target: "snmp_query::client",
                    { snmp.peer = %self.target, snmp.request_id = request_id },
                    "timed out"
                );
                return Ok(Response::Timeout(timeout));
            }
            if let Err(e) = socket.set_read_timeout(Some(remaining)) {
                return Ok(Response::TransportError(e));
            }

            match socket.recv(&mut response) {
                Ok(len) => {
                    if let Some(outcome) = self.accept(&response[..len], request_id, &oids) {
                        return Ok(outcome);
                    }
                }
                Err(e) if matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut) => {}
                Err(e) => return Ok(Response::TransportError(e)),
            }
        }
    }

    /// Classifies one received datagram. `None` means it does not answer
    /// this request and the wait continues.
    fn accept(&self, data: &[u8], request_id: i32, oids: &[ObjectIdentifier]) -> Option<Response> {
        let message = match snmp::decode_snmp_message(data) {
            Ok(message) => message,
            Err(e) => {
                tracing::debug!(target: "snmp_query::client", error = %e, "dropping undecodable datagram");
                return None;
            }
        };

        if message.version != self.session.version {
            tracing::debug!(
                target: "snmp_query::client",
                { snmp.version = %message.version },
                "dropping reply with mismatched version"
            );
            return None;
        }
        if message.pdu.pdu_type != PduType::GetResponse {
            tracing::debug!(target: "snmp_query::client", pdu = ?message.pdu.pdu_type, "dropping non-response PDU");
            return None;
        }
        if message.pdu.request_id != request_id {
            tracing::debug!(
                target: "snmp_query::client",
                { snmp.request_id = message.pdu.request_id, snmp.expected = request_id },
                "dropping stale reply"
            );
            return None;
        }

        let pdu = message.pdu;
        if pdu.error_status != 0 {
            let index = usize::try_from(pdu.error_index.max(1) - 1).unwrap_or(0);
            let error = PacketError {
                status: ErrorStatus::from_i32(pdu.error_status),
                index,
                oid: oids.get(index).cloned(),
            };
            tracing::debug!(
                target: "snmp_query::client",
                { snmp.error_status = %error.status, snmp.error_index = pdu.error_index },
                "agent reported an error"
            );
            return Some(Response::ErrorInPacket(error));
        }

        if pdu.varbinds.len() != oids.len() {
            return Some(Response::TransportError(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "malformed response: expected {} varbinds, got {}",
                    oids.len(),
                    pdu.varbinds.len()
                ),
            )));
        }

        let values = oids
            .iter()
            .zip(pdu.varbinds)
            .map(|(requested, varbind)| {
                if &varbind.oid != requested {
                    tracing::warn!(
                        target: "snmp_query::client",
                        requested = %requested,
                        returned = %varbind.oid,
                        "agent answered with a different OID"
                    );
                }
                (requested.clone(), Value::from_wire(&varbind.value, varbind.raw))
            })
            .collect();

        Some(Response::Success(values))
    }

    /// Releases the socket. Calling it again does nothing.
    pub fn close(&mut self) {
        if self.socket.take().is_some() {
            library::endpoint_closed();
            tracing::debug!(target: "snmp_query::client", { snmp.peer = %self.target }, "session closed");
        }
    }
}

impl Drop for SnmpClient {
    fn drop(&mut self) {
        self.close();
    }
}
