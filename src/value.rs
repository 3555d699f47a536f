//! Decoded values handed back to callers of [`SnmpClient::get`](crate::SnmpClient::get).

use crate::snmp::SnmpValue;
use bytes::Bytes;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Integer,
    String,
    ObjectIdentifier,
    IpAddress,
    Counter32,
    Gauge32,
    TimeTicks,
    Opaque,
    Counter64,
    Null,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Integer => "INTEGER",
            ValueKind::String => "STRING",
            ValueKind::ObjectIdentifier => "OID",
            ValueKind::IpAddress => "IpAddress",
            ValueKind::Counter32 => "Counter32",
            ValueKind::Gauge32 => "Gauge32",
            ValueKind::TimeTicks => "Timeticks",
            ValueKind::Opaque => "OPAQUE",
            ValueKind::Counter64 => "Counter64",
            ValueKind::Null => "NULL",
        };
        f.write_str(name)
    }
}

/// SNMPv2 exception returned in place of a value for one variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum VarError {
    #[error("No Such Object available on this agent at this OID")]
    NoSuchObject,
    #[error("No Such Instance currently exists at this OID")]
    NoSuchInstance,
    #[error("No more variables left in this MIB View (It is past the end of the MIB tree)")]
    EndOfMibView,
}

/// Outcome for a single requested OID.
pub type VarResult = Result<Value, VarError>;

/// A scalar value: its kind, the content octets as received, and the
/// rendering printed after `Value: `.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Value {
    pub kind: ValueKind,
    pub raw: Bytes,
    pub display: String,
}

impl Value {
    /// Converts a decoded wire value. Exceptions become [`VarError`].
    pub fn from_wire(value: &SnmpValue, raw: Bytes) -> VarResult {
        let (kind, display) = match value {
            SnmpValue::Integer(v) => (ValueKind::Integer, v.to_string()),
            SnmpValue::OctetString(data) => (ValueKind::String, display_octets(data)),
            SnmpValue::Null => (ValueKind::Null, "NULL".to_string()),
            SnmpValue::ObjectIdentifier(oid) => (ValueKind::ObjectIdentifier, oid.to_string()),
            SnmpValue::IpAddress(a) => (
                ValueKind::IpAddress,
                format!("{}.{}.{}.{}", a[0], a[1], a[2], a[3]),
            ),
            SnmpValue::Counter32(v) => (ValueKind::Counter32, v.to_string()),
            SnmpValue::Gauge32(v) => (ValueKind::Gauge32, v.to_string()),
            SnmpValue::TimeTicks(v) => (ValueKind::TimeTicks, display_timeticks(*v)),
            SnmpValue::Opaque(data) => (ValueKind::Opaque, hex(data)),
            SnmpValue::Counter64(v) => (ValueKind::Counter64, v.to_string()),
            SnmpValue::NoSuchObject => return Err(VarError::NoSuchObject),
            SnmpValue::NoSuchInstance => return Err(VarError::NoSuchInstance),
            SnmpValue::EndOfMibView => return Err(VarError::EndOfMibView),
        };
        Ok(Value { kind, raw, display })
    }

    /// The raw octets interpreted as UTF-8, for string values.
    pub fn as_str(&self) -> Option<&str> {
        match self.kind {
            ValueKind::String => std::str::from_utf8(&self.raw).ok(),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display)
    }
}

// Printable text is shown as-is, anything else as hex octets.
fn display_octets(data: &[u8]) -> String {
    match std::str::from_utf8(data) {
        Ok(s) if s.chars().all(|c| !c.is_control() || matches!(c, '\t' | '\r' | '\n')) => {
            s.to_string()
        }
        _ => hex(data),
    }
}

fn hex(data: &[u8]) -> String {
    data.iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

/// `(ticks) [N day(s), ]h:mm:ss.cc`
fn display_timeticks(ticks: u32) -> String {
    let centis = ticks % 100;
    let secs = ticks / 100;
    let days = secs / 86400;
    let hours = (secs % 86400) / 3600;
    let mins = (secs % 3600) / 60;
    let s = secs % 60;

    let clock = format!("{}:{:02}:{:02}.{:02}", hours, mins, s, centis);
    match days {
        0 => format!("({}) {}", ticks, clock),
        1 => format!("({}) 1 day, {}", ticks, clock),
        n => format!("({}) {} days, {}", ticks, n, clock),
    }
}
