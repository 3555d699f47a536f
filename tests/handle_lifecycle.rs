//! Handle lifecycle. The endpoint counter is process-wide, so this binary
//! holds a single test and nothing else opens handles alongside it.

mod common;

use common::{session_for, start_agent};
use snmp_query::{Error, Session, SnmpClient, library};
use std::time::{Duration, Instant};

#[test]
fn open_and_close_release_endpoints() {
    let agent = start_agent();
    let baseline = library::open_endpoints();

    let start = Instant::now();
    for _ in 0..200 {
        let mut client = SnmpClient::open(session_for(&agent)).unwrap();
        assert_eq!(library::open_endpoints(), baseline + 1);
        client.close();
        client.close();
        assert_eq!(library::open_endpoints(), baseline);
    }
    assert!(start.elapsed() < Duration::from_secs(5));

    {
        let _a = SnmpClient::open(session_for(&agent)).unwrap();
        let _b = SnmpClient::open(session_for(&agent)).unwrap();
        assert_eq!(library::open_endpoints(), baseline + 2);
    }
    assert_eq!(library::open_endpoints(), baseline);

    let err = SnmpClient::open(Session::new("no such host.invalid", "public")).unwrap_err();
    assert!(matches!(err, Error::Connection { .. }));
    assert_eq!(library::open_endpoints(), baseline);
}
