//! Minimal blocking SNMP agent answering GET requests from an in-memory MIB.
//!
//! Used as the peer in integration tests and by the `snmp-agent` binary.

use crate::oid::ObjectIdentifier;
use crate::snmp::{self, PduType, SnmpMessage, SnmpValue, Varbind, Version};
use anyhow::{Context, Result, anyhow};
use std::collections::HashMap;
use std::net::{SocketAddr, UdpSocket};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use std::thread;
use std::time::Duration;

type MibDB = HashMap<ObjectIdentifier, SnmpValue>;

// How often the receive loop checks the stop flag.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

const NO_SUCH_NAME: i32 = 2;

pub struct SnmpAgent {
    socket: UdpSocket,
    communities: Vec<Vec<u8>>,
    mib: Arc<RwLock<MibDB>>,
    v2_exceptions: bool,
}

impl SnmpAgent {
    pub fn new<C: AsRef<[u8]>>(addr: &str, communities: &[C]) -> Result<Self> {
        let socket = UdpSocket::bind(addr)
            .with_context(|| format!("Failed to bind UDP socket on {}", addr))?;
        socket
            .set_read_timeout(Some(POLL_INTERVAL))
            .context("Failed to set socket timeout")?;

        Ok(Self {
            socket,
            communities: communities.iter().map(|c| c.as_ref().to_vec()).collect(),
            mib: Arc::new(RwLock::new(HashMap::new())),
            v2_exceptions: false,
        })
    }

    /// Answer unknown OIDs in v2c requests with per-variable noSuchObject
    /// instead of a noSuchName error status.
    pub fn with_v2_exceptions(mut self, enabled: bool) -> Self {
        self.v2_exceptions = enabled;
        self
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.socket
            .local_addr()
            .context("Failed to get local address")
    }

    pub fn register_oid(&self, oid: ObjectIdentifier, value: SnmpValue) -> Result<()> {
        self.mib
            .write()
            .map_err(|_| anyhow!("MIB lock poisoned"))?
            .insert(oid, value);
        Ok(())
    }

    // Process an SNMP message; anything that is not a valid GET for a known
    // community is dropped without a reply.
    fn process_message(&self, data: &[u8], src_addr: SocketAddr) -> Result<()> {
        let message = match snmp::decode_snmp_message(data) {
            Ok(msg) => msg,
            Err(e) => {
                tracing::debug!(target: "snmp_query::agent", peer = %src_addr, error = %e, "dropping undecodable message");
                return Ok(());
            }
        };

        if !self.communities.iter().any(|c| c[..] == message.community[..]) {
            tracing::debug!(
                target: "snmp_query::agent",
                peer = %src_addr,
                community = %String::from_utf8_lossy(&message.community),
                "invalid community string"
            );
            return Ok(());
        }

        match message.pdu.pdu_type {
            PduType::GetRequest => self.handle_get_request(&message, src_addr),
            other => {
                tracing::debug!(target: "snmp_query::agent", pdu = ?other, "unsupported PDU type");
                Ok(())
            }
        }
    }

    fn handle_get_request(&self, request: &SnmpMessage, src_addr: SocketAddr) -> Result<()> {
        let response = {
            let mib = self.mib.read().map_err(|_| anyhow!("MIB lock poisoned"))?;
            self.answer_get(request, &mib)
        };

        self.socket
            .send_to(&response.encode(), src_addr)
            .context("Failed to send SNMP response")?;

        Ok(())
    }

    fn answer_get(&self, request: &SnmpMessage, mib: &MibDB) -> SnmpMessage {
        let use_exceptions = self.v2_exceptions && request.version == Version::V2c;
        let mut response_varbinds = Vec::with_capacity(request.pdu.varbinds.len());
        let mut error_index = 0;

        for (i, varbind) in request.pdu.varbinds.iter().enumerate() {
            let value = match mib.get(&varbind.oid) {
                Some(value) => value.clone(),
                None if use_exceptions => SnmpValue::NoSuchObject,
                None => {
                    if error_index == 0 {
                        error_index = (i + 1) as i32;
                    }
                    SnmpValue::Null
                }
            };
            response_varbinds.push(Varbind::new(varbind.oid.clone(), value));
        }

        if error_index != 0 {
            // The failed request is echoed back unchanged.
            let echoed = request.pdu.varbinds.clone();
            return request.response(echoed, NO_SUCH_NAME, error_index);
        }
        request.response(response_varbinds, 0, 0)
    }

    fn run(&self, stop: &AtomicBool) -> Result<()> {
        tracing::info!(
            target: "snmp_query::agent",
            addr = %self.local_addr()?,
            "SNMP agent running"
        );

        let mut buf = [0u8; 65_535];

        while !stop.load(Ordering::Relaxed) {
            match self.socket.recv_from(&mut buf) {
                Ok((size, src_addr)) => {
                    if let Err(e) = self.process_message(&buf[..size], src_addr) {
                        tracing::warn!(target: "snmp_query::agent", error = %e, "error processing message");
                    }
                }
                Err(e)
                    if matches!(
                        e.kind(),
                        std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut
                    ) =>
                {
                    continue;
                }
                Err(e) => return Err(e).context("Error receiving data"),
            }
        }

        Ok(())
    }

    /// Serve on the current thread until the process exits.
    pub fn serve_forever(&self) -> Result<()> {
        self.run(&AtomicBool::new(false))
    }

    /// Run the agent in a separate thread.
    pub fn spawn(self) -> Result<RunningAgent> {
        let addr = self.local_addr()?;
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);
        let thread = thread::Builder::new()
            .name("snmp-agent".to_string())
            .spawn(move || self.run(&flag))
            .context("Failed to spawn agent thread")?;

        Ok(RunningAgent {
            addr,
            stop,
            thread: Some(thread),
        })
    }
}

/// Handle to an agent running on a background thread. Dropping it stops the
/// agent and waits for the thread to finish.
pub struct RunningAgent {
    addr: SocketAddr,
    stop: Arc<AtomicBool>,
    thread: Option<thread::JoinHandle<Result<()>>>,
}

impl RunningAgent {
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn stop(&mut self) -> Result<()> {
        self.stop.store(true, Ordering::Relaxed);
        match self.thread.take() {
            Some(thread) => thread
                .join()
                .map_err(|_| anyhow!("agent thread panicked"))?,
            None => Ok(()),
        }
    }
}

impl Drop for RunningAgent {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            tracing::warn!(target: "snmp_query::agent", error = %e, "agent stopped with an error");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn oid(s: &str) -> ObjectIdentifier {
        ObjectIdentifier::parse(s).unwrap()
    }

    fn agent() -> SnmpAgent {
        let agent = SnmpAgent::new("127.0.0.1:0", &["public"]).unwrap();
        agent
            .register_oid(oid("1.3.6.1.2.1.1.5.0"), "test-host".into())
            .unwrap();
        agent
    }

    fn answer(agent: &SnmpAgent, request: &SnmpMessage) -> SnmpMessage {
        let mib = agent.mib.read().unwrap();
        agent.answer_get(request, &mib)
    }

    #[test]
    fn known_oid_is_answered() {
        let agent = agent();
        let request =
            SnmpMessage::get_request(Version::V2c, b"public", 5, &[oid("1.3.6.1.2.1.1.5.0")]);
        let response = answer(&agent, &request);

        assert_eq!(response.pdu.pdu_type, PduType::GetResponse);
        assert_eq!(response.pdu.request_id, 5);
        assert_eq!(response.pdu.error_status, 0);
        assert_eq!(response.pdu.varbinds[0].value, SnmpValue::from("test-host"));
    }

    #[test]
    fn first_missing_oid_sets_error_index() {
        let agent = agent();
        let request = SnmpMessage::get_request(
            Version::V1,
            b"public",
            6,
            &[oid("1.3.6.1.2.1.1.5.0"), oid("1.3.6.1.9"), oid("1.3.6.1.8")],
        );
        let response = answer(&agent, &request);

        assert_eq!(response.version, Version::V1);
        assert_eq!(response.pdu.error_status, NO_SUCH_NAME);
        assert_eq!(response.pdu.error_index, 2);
        assert_eq!(response.pdu.varbinds, request.pdu.varbinds);
    }

    #[test]
    fn v2_exceptions_replace_the_error_status() {
        let agent = agent().with_v2_exceptions(true);
        let request = SnmpMessage::get_request(Version::V2c, b"public", 7, &[oid("1.3.6.1.9")]);
        let response = answer(&agent, &request);

        assert_eq!(response.pdu.error_status, 0);
        assert_eq!(response.pdu.varbinds[0].value, SnmpValue::NoSuchObject);
    }

    #[test]
    fn v1_ignores_the_exception_setting() {
        let agent = agent().with_v2_exceptions(true);
        let request = SnmpMessage::get_request(Version::V1, b"public", 8, &[oid("1.3.6.1.9")]);
        let response = answer(&agent, &request);

        assert_eq!(response.pdu.error_status, NO_SUCH_NAME);
        assert_eq!(response.pdu.error_index, 1);
    }

    #[test]
    fn spawned_agent_stops_on_request() {
        let mut running = agent().spawn().unwrap();
        assert_ne!(running.addr().port(), 0);
        running.stop().unwrap();
        running.stop().unwrap();
    }
}
