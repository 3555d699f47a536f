//! Shared test infrastructure: an in-process agent serving a small system MIB.

#![allow(dead_code)]

use snmp_query::snmp::SnmpValue;
use snmp_query::{ObjectIdentifier, RunningAgent, Session, SnmpAgent};

pub const SYS_DESCR: &str = "1.3.6.1.2.1.1.1.0";
pub const SYS_UPTIME: &str = "1.3.6.1.2.1.1.3.0";
pub const SYS_CONTACT: &str = "1.3.6.1.2.1.1.4.0";
pub const SYS_NAME: &str = "1.3.6.1.2.1.1.5.0";

pub fn oid(s: &str) -> ObjectIdentifier {
    ObjectIdentifier::parse(s).unwrap()
}

/// An agent bound to `addr` with community `public` and the system group
/// registered. Not started yet.
pub fn system_agent(addr: &str) -> SnmpAgent {
    let agent = SnmpAgent::new(addr, &["public"]).unwrap();
    agent
        .register_oid(oid(SYS_DESCR), "Test SNMP Agent".into())
        .unwrap();
    agent
        .register_oid(oid(SYS_UPTIME), SnmpValue::TimeTicks(12345))
        .unwrap();
    agent
        .register_oid(oid(SYS_CONTACT), "admin@example.com".into())
        .unwrap();
    agent
        .register_oid(oid(SYS_NAME), "test-host".into())
        .unwrap();
    agent
}

/// A running system agent on an ephemeral loopback port.
pub fn start_agent() -> RunningAgent {
    system_agent("127.0.0.1:0").spawn().unwrap()
}

/// A v2c session with community `public` pointing at `agent`.
pub fn session_for(agent: &RunningAgent) -> Session {
    Session::new("127.0.0.1", "public").port(agent.addr().port())
}
