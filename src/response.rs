use crate::error::ErrorStatus;
use crate::oid::ObjectIdentifier;
use crate::value::VarResult;
use std::fmt;
use std::io;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    ErrorInPacket,
    Timeout,
    TransportError,
}

/// The agent answered but rejected the whole request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacketError {
    pub status: ErrorStatus,
    /// Zero-based position of the offending OID in the request. The wire
    /// field is 1-based; a zero there maps to 0 as well.
    pub index: usize,
    /// The requested OID at `index`, when the index is in range.
    pub oid: Option<ObjectIdentifier>,
}

impl PacketError {
    pub fn reason(&self) -> String {
        self.status.reason()
    }
}

impl fmt::Display for PacketError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.status.reason())?;
        if let Some(oid) = &self.oid {
            write!(f, " (failed object: {})", oid)?;
        }
        Ok(())
    }
}

/// Result of one GET round-trip.
#[derive(Debug)]
pub enum Response {
    /// One entry per requested OID, in request order.
    Success(Vec<(ObjectIdentifier, VarResult)>),
    ErrorInPacket(PacketError),
    /// No correlated reply arrived within the configured wait.
    Timeout(Duration),
    TransportError(io::Error),
}

impl Response {
    pub fn status(&self) -> Status {
        match self {
            Response::Success(_) => Status::Success,
            Response::ErrorInPacket(_) => Status::ErrorInPacket,
            Response::Timeout(_) => Status::Timeout,
            Response::TransportError(_) => Status::TransportError,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Response::Success(_))
    }

    /// Decoded entries; empty for anything but `Success`.
    pub fn values(&self) -> &[(ObjectIdentifier, VarResult)] {
        match self {
            Response::Success(values) => values,
            _ => &[],
        }
    }

    /// The first entry for `oid`.
    pub fn get(&self, oid: &ObjectIdentifier) -> Option<&VarResult> {
        self.values()
            .iter()
            .find(|(requested, _)| requested == oid)
            .map(|(_, result)| result)
    }

    pub fn packet_error(&self) -> Option<&PacketError> {
        match self {
            Response::ErrorInPacket(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Value, ValueKind, VarError};
    use bytes::Bytes;

    fn oid(s: &str) -> ObjectIdentifier {
        ObjectIdentifier::parse(s).unwrap()
    }

    #[test]
    fn lookup_by_oid() {
        let value = Value {
            kind: ValueKind::Integer,
            raw: Bytes::from_static(&[0x07]),
            display: "7".to_string(),
        };
        let response = Response::Success(vec![
            (oid("1.3.6.1.2.1.1.7.0"), Ok(value.clone())),
            (oid("1.3.6.1.2.1.1.9.0"), Err(VarError::NoSuchInstance)),
        ]);

        assert_eq!(response.status(), Status::Success);
        assert_eq!(response.get(&oid("1.3.6.1.2.1.1.7.0")), Some(&Ok(value)));
        assert_eq!(
            response.get(&oid("1.3.6.1.2.1.1.9.0")),
            Some(&Err(VarError::NoSuchInstance))
        );
        assert_eq!(response.get(&oid("1.3.6.1.2.1.1.1.0")), None);
    }

    #[test]
    fn failures_carry_no_values() {
        let response = Response::Timeout(Duration::from_secs(1));
        assert_eq!(response.status(), Status::Timeout);
        assert!(response.values().is_empty());
        assert!(response.packet_error().is_none());
    }

    #[test]
    fn packet_error_display_includes_reason_and_oid() {
        let err = PacketError {
            status: ErrorStatus::NoSuchName,
            index: 0,
            oid: Some(oid("9.9.9.9.9.9")),
        };
        let text = err.to_string();
        assert!(text.contains("noSuchName"));
        assert!(text.contains("9.9.9.9.9.9"));
    }
}
