//! GET round-trips against the in-process agent.

mod common;

use common::{SYS_CONTACT, SYS_DESCR, SYS_NAME, SYS_UPTIME, oid, session_for, start_agent};
use snmp_query::{
    Error, ErrorStatus, Response, Session, SnmpClient, Status, ValueKind, VarError, Version,
    library,
};
use std::net::UdpSocket;
use std::time::{Duration, Instant};

const WAIT: Duration = Duration::from_secs(2);

/// A local socket that never answers, standing in for an unreachable agent.
fn silent_peer() -> (UdpSocket, Session) {
    let socket = UdpSocket::bind("127.0.0.1:0").unwrap();
    let port = socket.local_addr().unwrap().port();
    (socket, Session::new("127.0.0.1", "public").port(port))
}

#[test]
fn get_sys_name_from_fixed_port() {
    let _agent = common::system_agent("127.0.0.1:1610").spawn().unwrap();

    let session = Session::new("127.0.0.1", "public")
        .port(1610)
        .version(Version::V2c);
    let mut client = SnmpClient::open(session).unwrap();

    let response = client.get([SYS_NAME], WAIT).unwrap();

    assert_eq!(response.status(), Status::Success);
    assert_eq!(response.values().len(), 1);
    let value = response.get(&oid(SYS_NAME)).unwrap().as_ref().unwrap();
    assert_eq!(value.kind, ValueKind::String);
    assert_eq!(value.display, "test-host");
}

#[test]
fn unknown_oid_reports_no_such_name() {
    let agent = start_agent();
    let mut client = SnmpClient::open(session_for(&agent)).unwrap();

    let response = client.get(["9.9.9.9.9.9"], WAIT).unwrap();

    assert_eq!(response.status(), Status::ErrorInPacket);
    let err = response.packet_error().unwrap();
    assert_eq!(err.status, ErrorStatus::NoSuchName);
    assert_eq!(err.index, 0);
    assert!(err.reason().contains("noSuchName"), "reason: {}", err.reason());
    assert_eq!(err.oid, Some(oid("9.9.9.9.9.9")));
}

#[test]
fn error_index_points_at_the_failing_oid() {
    let agent = start_agent();
    let mut client = SnmpClient::open(session_for(&agent)).unwrap();

    let response = client
        .get([SYS_DESCR, SYS_NAME, "1.3.6.1.2.1.1.99.0"], WAIT)
        .unwrap();

    let err = response.packet_error().unwrap();
    assert_eq!(err.index, 2);
    assert_eq!(err.oid, Some(oid("1.3.6.1.2.1.1.99.0")));
}

#[test]
fn multiple_oids_keep_request_order() {
    let agent = start_agent();
    let mut client = SnmpClient::open(session_for(&agent)).unwrap();

    let requested = [SYS_NAME, SYS_DESCR, SYS_UPTIME, SYS_CONTACT];
    let response = client.get(requested, WAIT).unwrap();

    let values = response.values();
    assert_eq!(values.len(), requested.len());
    for ((returned, _), wanted) in values.iter().zip(requested) {
        assert_eq!(returned, &oid(wanted));
    }

    let uptime = values[2].1.as_ref().unwrap();
    assert_eq!(uptime.kind, ValueKind::TimeTicks);
    assert_eq!(uptime.display, "(12345) 0:02:03.45");
    assert_eq!(values[1].1.as_ref().unwrap().as_str(), Some("Test SNMP Agent"));
}

#[test]
fn v1_session_is_answered() {
    let agent = start_agent();
    let session = session_for(&agent).version(Version::V1);
    let mut client = SnmpClient::open(session).unwrap();

    let response = client.get([SYS_DESCR], WAIT).unwrap();

    assert!(response.is_success());
    let value = response.values()[0].1.as_ref().unwrap();
    assert_eq!(value.display, "Test SNMP Agent");
}

#[test]
fn v2_exceptions_are_per_variable() {
    let agent = common::system_agent("127.0.0.1:0")
        .with_v2_exceptions(true)
        .spawn()
        .unwrap();
    let mut client = SnmpClient::open(session_for(&agent)).unwrap();

    let response = client.get([SYS_NAME, "1.3.6.1.2.1.1.99.0"], WAIT).unwrap();

    assert!(response.is_success());
    let values = response.values();
    assert_eq!(values[0].1.as_ref().unwrap().display, "test-host");
    assert_eq!(values[1].1, Err(VarError::NoSuchObject));
}

#[test]
fn wrong_community_times_out() {
    let agent = start_agent();
    let session = Session::new("127.0.0.1", "private").port(agent.addr().port());
    let mut client = SnmpClient::open(session).unwrap();

    let response = client
        .get([SYS_NAME], Duration::from_millis(300))
        .unwrap();

    assert!(matches!(response, Response::Timeout(_)));
}

#[test]
fn timeout_is_bounded() {
    let (_peer, session) = silent_peer();
    let mut client = SnmpClient::open(session).unwrap();
    let timeout = Duration::from_millis(250);

    let start = Instant::now();
    let response = client.get([SYS_NAME], timeout).unwrap();
    let elapsed = start.elapsed();

    assert_eq!(response.status(), Status::Timeout);
    assert!(elapsed >= timeout, "returned early after {:?}", elapsed);
    assert!(elapsed < timeout + Duration::from_secs(1), "took {:?}", elapsed);
}

#[test]
fn malformed_oid_fails_before_sending() {
    let (peer, session) = silent_peer();
    peer.set_read_timeout(Some(Duration::from_millis(200)))
        .unwrap();
    let mut client = SnmpClient::open(session).unwrap();

    let result = client.get([SYS_NAME, "1.3.six.1"], WAIT);

    assert!(matches!(result, Err(Error::Parse(_))));
    let mut buf = [0u8; 512];
    assert!(peer.recv(&mut buf).is_err(), "a request was sent");
}

#[test]
fn get_after_close_fails() {
    let agent = start_agent();
    let mut client = SnmpClient::open(session_for(&agent)).unwrap();
    client.close();

    assert!(client.is_closed());
    assert!(matches!(client.get([SYS_NAME], WAIT), Err(Error::Closed)));
    assert!(matches!(client.get([SYS_NAME], WAIT), Err(Error::Closed)));
}

#[test]
fn handle_can_be_reused() {
    let agent = start_agent();
    let mut client = SnmpClient::open(session_for(&agent)).unwrap();

    for _ in 0..3 {
        let response = client.get([SYS_NAME], WAIT).unwrap();
        assert!(response.is_success());
    }
}

#[test]
fn handles_survive_shutdown() {
    let agent = start_agent();
    let mut client = SnmpClient::open(session_for(&agent)).unwrap();

    library::shutdown();
    let response = client.get([SYS_NAME], WAIT).unwrap();

    assert!(response.is_success());
}

#[test]
fn unrepresentable_timeout_is_an_error() {
    let agent = start_agent();
    let mut client = SnmpClient::open(session_for(&agent)).unwrap();

    let result = client.get([SYS_NAME], Duration::MAX);

    assert!(matches!(result, Err(Error::InvalidTimeout)));
    assert!(client.get([SYS_NAME], WAIT).unwrap().is_success());
}

#[cfg(target_os = "linux")]
#[test]
fn closed_port_is_a_transport_error() {
    let (peer, session) = silent_peer();
    drop(peer);
    let mut client = SnmpClient::open(session).unwrap();

    let response = client.get([SYS_NAME], WAIT).unwrap();

    assert_eq!(response.status(), Status::TransportError);
}
