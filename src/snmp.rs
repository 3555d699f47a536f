//! SNMP v1/v2c message model and its BER encoding.

use crate::asn1::decode::{self, Asn1Error};
use crate::asn1::encode;
use crate::oid::ObjectIdentifier;
use bytes::{Buf, BufMut, Bytes, BytesMut};
use std::fmt;

/// Protocol version carried in the message header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Version {
    V1,
    #[default]
    V2c,
}

impl Version {
    pub fn to_wire(self) -> i32 {
        match self {
            Version::V1 => 0,
            Version::V2c => 1,
        }
    }

    pub fn from_wire(value: i32) -> Option<Self> {
        match value {
            0 => Some(Version::V1),
            1 => Some(Version::V2c),
            _ => None,
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Version::V1 => write!(f, "1"),
            Version::V2c => write!(f, "2c"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PduType {
    GetRequest,
    GetNextRequest,
    GetResponse,
}

impl PduType {
    pub fn to_tag(self) -> u8 {
        match self {
            PduType::GetRequest => encode::GET_REQUEST_TAG,
            PduType::GetNextRequest => encode::GET_NEXT_REQUEST_TAG,
            PduType::GetResponse => encode::GET_RESPONSE_TAG,
        }
    }

    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            encode::GET_REQUEST_TAG => Some(PduType::GetRequest),
            encode::GET_NEXT_REQUEST_TAG => Some(PduType::GetNextRequest),
            encode::GET_RESPONSE_TAG => Some(PduType::GetResponse),
            _ => None,
        }
    }
}

/// A value as it travels in a varbind.
#[derive(Debug, Clone, PartialEq)]
pub enum SnmpValue {
    Integer(i32),
    OctetString(Bytes),
    Null,
    ObjectIdentifier(ObjectIdentifier),
    IpAddress([u8; 4]),
    Counter32(u32),
    Gauge32(u32),
    TimeTicks(u32),
    Opaque(Bytes),
    Counter64(u64),
    NoSuchObject,
    NoSuchInstance,
    EndOfMibView,
}

impl SnmpValue {
    /// Decodes a value from its tag and content octets.
    pub fn from_tlv(tag: u8, content: &Bytes) -> Result<Self, Asn1Error> {
        let value = match tag {
            encode::INTEGER_TAG => SnmpValue::Integer(decode::integer_from_content(content)?),
            encode::OCTET_STRING_TAG => SnmpValue::OctetString(content.clone()),
            encode::NULL_TAG => {
                if !content.is_empty() {
                    return Err(Asn1Error::InvalidLength);
                }
                SnmpValue::Null
            }
            encode::OBJECT_IDENTIFIER_TAG => {
                let arcs = decode::oid_from_content(content)?;
                let oid = ObjectIdentifier::from_arcs(&arcs)
                    .ok_or(Asn1Error::InvalidValue("empty OBJECT IDENTIFIER"))?;
                SnmpValue::ObjectIdentifier(oid)
            }
            encode::IP_ADDRESS_TAG => {
                let octets = <[u8; 4]>::try_from(&content[..])
                    .map_err(|_| Asn1Error::InvalidValue("IpAddress must be 4 octets"))?;
                SnmpValue::IpAddress(octets)
            }
            encode::COUNTER32_TAG => SnmpValue::Counter32(unsigned32(content)?),
            encode::GAUGE32_TAG => SnmpValue::Gauge32(unsigned32(content)?),
            encode::TIMETICKS_TAG => SnmpValue::TimeTicks(unsigned32(content)?),
            encode::OPAQUE_TAG => SnmpValue::Opaque(content.clone()),
            encode::COUNTER64_TAG => {
                SnmpValue::Counter64(decode::unsigned_from_content(content, 8)?)
            }
            encode::NO_SUCH_OBJECT_TAG => SnmpValue::NoSuchObject,
            encode::NO_SUCH_INSTANCE_TAG => SnmpValue::NoSuchInstance,
            encode::END_OF_MIB_VIEW_TAG => SnmpValue::EndOfMibView,
            other => return Err(Asn1Error::InvalidTag(other)),
        };
        Ok(value)
    }

    pub fn encode(&self, buf: &mut BytesMut) {
        match self {
            SnmpValue::Integer(val) => encode::encode_integer(*val, buf),
            SnmpValue::OctetString(val) => encode::encode_octet_string(val, buf),
            SnmpValue::Null => encode::encode_null(buf),
            SnmpValue::ObjectIdentifier(val) => encode::encode_oid(val.arcs(), buf),
            SnmpValue::IpAddress(octets) => {
                encode::encode_tagged_bytes(encode::IP_ADDRESS_TAG, octets, buf)
            }
            SnmpValue::Counter32(val) => {
                encode::encode_unsigned(encode::COUNTER32_TAG, u64::from(*val), buf)
            }
            SnmpValue::Gauge32(val) => {
                encode::encode_unsigned(encode::GAUGE32_TAG, u64::from(*val), buf)
            }
            SnmpValue::TimeTicks(val) => {
                encode::encode_unsigned(encode::TIMETICKS_TAG, u64::from(*val), buf)
            }
            SnmpValue::Opaque(val) => encode::encode_tagged_bytes(encode::OPAQUE_TAG, val, buf),
            SnmpValue::Counter64(val) => encode::encode_unsigned(encode::COUNTER64_TAG, *val, buf),
            SnmpValue::NoSuchObject => encode::encode_empty(encode::NO_SUCH_OBJECT_TAG, buf),
            SnmpValue::NoSuchInstance => encode::encode_empty(encode::NO_SUCH_INSTANCE_TAG, buf),
            SnmpValue::EndOfMibView => encode::encode_empty(encode::END_OF_MIB_VIEW_TAG, buf),
        }
    }
}

impl From<&str> for SnmpValue {
    fn from(s: &str) -> Self {
        SnmpValue::OctetString(Bytes::copy_from_slice(s.as_bytes()))
    }
}

impl From<i32> for SnmpValue {
    fn from(v: i32) -> Self {
        SnmpValue::Integer(v)
    }
}

fn unsigned32(content: &Bytes) -> Result<u32, Asn1Error> {
    decode::unsigned_from_content(content, 4).map(|v| v as u32)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Varbind {
    pub oid: ObjectIdentifier,
    pub value: SnmpValue,
    /// Content octets of the value as received. Empty for locally built
    /// varbinds.
    pub raw: Bytes,
}

impl Varbind {
    pub fn new(oid: ObjectIdentifier, value: SnmpValue) -> Self {
        Self {
            oid,
            value,
            raw: Bytes::new(),
        }
    }

    /// A request varbind: the OID paired with NULL.
    pub fn null(oid: ObjectIdentifier) -> Self {
        Self::new(oid, SnmpValue::Null)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SnmpPdu {
    pub pdu_type: PduType,
    pub request_id: i32,
    pub error_status: i32,
    pub error_index: i32,
    pub varbinds: Vec<Varbind>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SnmpMessage {
    pub version: Version,
    pub community: Bytes,
    pub pdu: SnmpPdu,
}

impl SnmpMessage {
    /// A GetRequest for `oids` with NULL placeholders.
    pub fn get_request(
        version: Version,
        community: &[u8],
        request_id: i32,
        oids: &[ObjectIdentifier],
    ) -> Self {
        Self {
            version,
            community: Bytes::copy_from_slice(community),
            pdu: SnmpPdu {
                pdu_type: PduType::GetRequest,
                request_id,
                error_status: 0,
                error_index: 0,
                varbinds: oids.iter().cloned().map(Varbind::null).collect(),
            },
        }
    }

    /// The GetResponse answering this message, echoing version, community and
    /// request id.
    pub fn response(&self, varbinds: Vec<Varbind>, error_status: i32, error_index: i32) -> Self {
        Self {
            version: self.version,
            community: self.community.clone(),
            pdu: SnmpPdu {
                pdu_type: PduType::GetResponse,
                request_id: self.pdu.request_id,
                error_status,
                error_index,
                varbinds,
            },
        }
    }

    pub fn encode(&self) -> BytesMut {
        let mut buf = BytesMut::new();
        build_snmp_msg(self, &mut buf);
        buf
    }
}

pub fn build_varbind(varbind: &Varbind, buf: &mut BytesMut) {
    let mut varbind_buf = BytesMut::new();

    encode::encode_oid(varbind.oid.arcs(), &mut varbind_buf);
    varbind.value.encode(&mut varbind_buf);

    encode::encode_sequence(&varbind_buf, encode::SEQUENCE_TAG, buf);
}

pub fn build_varbind_list(varbinds: &[Varbind], buf: &mut BytesMut) {
    let mut varbind_list_buf = BytesMut::new();
    for varbind in varbinds {
        build_varbind(varbind, &mut varbind_list_buf);
    }

    encode::encode_sequence(&varbind_list_buf, encode::SEQUENCE_TAG, buf);
}

pub fn build_pdu(pdu: &SnmpPdu, buf: &mut BytesMut) {
    let mut pdu_buf = BytesMut::new();

    encode::encode_integer(pdu.request_id, &mut pdu_buf);
    encode::encode_integer(pdu.error_status, &mut pdu_buf);
    encode::encode_integer(pdu.error_index, &mut pdu_buf);
    build_varbind_list(&pdu.varbinds, &mut pdu_buf);

    encode::encode_sequence(&pdu_buf, pdu.pdu_type.to_tag(), buf);
}

pub fn build_snmp_msg(message: &SnmpMessage, buf: &mut BytesMut) {
    let mut msg_buf = BytesMut::new();

    encode::encode_integer(message.version.to_wire(), &mut msg_buf);
    encode::encode_octet_string(&message.community, &mut msg_buf);

    let mut pdu_buf = BytesMut::new();
    build_pdu(&message.pdu, &mut pdu_buf);
    msg_buf.put_slice(&pdu_buf);

    encode::encode_sequence(&msg_buf, encode::SEQUENCE_TAG, buf);
}

pub fn decode_varbind(buf: &mut Bytes) -> Result<Varbind, Asn1Error> {
    let mut seq_data = decode::decode_sequence(buf, encode::SEQUENCE_TAG)?;

    let arcs = decode::decode_oid(&mut seq_data)?;
    let oid = ObjectIdentifier::from_arcs(&arcs)
        .ok_or(Asn1Error::InvalidValue("empty OBJECT IDENTIFIER"))?;

    let (tag, raw) = decode::decode_tlv(&mut seq_data)?;
    let value = SnmpValue::from_tlv(tag, &raw)?;

    if seq_data.has_remaining() {
        return Err(Asn1Error::InvalidValue("trailing data in varbind"));
    }

    Ok(Varbind { oid, value, raw })
}

pub fn decode_varbind_list(buf: &mut Bytes) -> Result<Vec<Varbind>, Asn1Error> {
    let mut seq_data = decode::decode_sequence(buf, encode::SEQUENCE_TAG)?;

    let mut varbinds = Vec::new();
    while seq_data.has_remaining() {
        varbinds.push(decode_varbind(&mut seq_data)?);
    }

    Ok(varbinds)
}

pub fn decode_pdu(buf: &mut Bytes) -> Result<SnmpPdu, Asn1Error> {
    let tag = decode::peek_tag(buf)?;
    let pdu_type = PduType::from_tag(tag).ok_or(Asn1Error::InvalidTag(tag))?;

    let mut pdu_data = decode::decode_sequence(buf, tag)?;

    let request_id = decode::decode_integer(&mut pdu_data)?;
    let error_status = decode::decode_integer(&mut pdu_data)?;
    let error_index = decode::decode_integer(&mut pdu_data)?;
    let varbinds = decode_varbind_list(&mut pdu_data)?;

    Ok(SnmpPdu {
        pdu_type,
        request_id,
        error_status,
        error_index,
        varbinds,
    })
}

pub fn decode_snmp_message(data: &[u8]) -> Result<SnmpMessage, Asn1Error> {
    let mut buf = Bytes::copy_from_slice(data);
    let mut msg_data = decode::decode_sequence(&mut buf, encode::SEQUENCE_TAG)?;

    let version = decode::decode_integer(&mut msg_data)?;
    let version =
        Version::from_wire(version).ok_or(Asn1Error::UnsupportedEncoding("SNMP version"))?;

    let community = decode::decode_octet_string(&mut msg_data)?;
    let pdu = decode_pdu(&mut msg_data)?;

    Ok(SnmpMessage {
        version,
        community,
        pdu,
    })
}
