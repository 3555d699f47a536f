//! Synchronous SNMP v1/v2c GET client.
//!
//! ```no_run
//! use std::time::Duration;
//! use snmp_query::{Session, SnmpClient};
//!
//! let mut client = SnmpClient::open(Session::new("127.0.0.1", "public"))?;
//! let response = client.get(["1.3.6.1.2.1.1.5.0"], Duration::from_secs(2))?;
//! for (oid, value) in response.values() {
//!     println!("{} = {:?}", oid, value);
//! }
//! # Ok::<(), snmp_query::Error>(())
//! ```

pub mod agent;
pub mod asn1;
pub mod cli;
pub mod client;
pub mod error;
pub mod library;
pub mod oid;
pub mod response;
pub mod snmp;
pub mod value;

pub use agent::{RunningAgent, SnmpAgent};
pub use client::{DEFAULT_PORT, Session, SnmpClient};
pub use error::{Error, ErrorStatus, Result};
pub use oid::{IntoOid, ObjectIdentifier, ParseError};
pub use response::{PacketError, Response, Status};
pub use snmp::Version;
pub use value::{Value, ValueKind, VarError, VarResult};
