//! BER primitives for the subset of ASN.1 that SNMP v1/v2c messages use.

pub mod decode;
pub mod encode;

pub use decode::Asn1Error;
