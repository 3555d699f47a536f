use bytes::{BufMut, BytesMut};

// ASN.1 BER tag constants
pub const INTEGER_TAG: u8 = 0x02;
pub const OCTET_STRING_TAG: u8 = 0x04;
pub const NULL_TAG: u8 = 0x05;
pub const OBJECT_IDENTIFIER_TAG: u8 = 0x06;
pub const SEQUENCE_TAG: u8 = 0x30;

// SNMP application tags (RFC 2578)
pub const IP_ADDRESS_TAG: u8 = 0x40;
pub const COUNTER32_TAG: u8 = 0x41;
pub const GAUGE32_TAG: u8 = 0x42;
pub const TIMETICKS_TAG: u8 = 0x43;
pub const OPAQUE_TAG: u8 = 0x44;
pub const COUNTER64_TAG: u8 = 0x46;

// SNMPv2 exception values (RFC 3416)
pub const NO_SUCH_OBJECT_TAG: u8 = 0x80;
pub const NO_SUCH_INSTANCE_TAG: u8 = 0x81;
pub const END_OF_MIB_VIEW_TAG: u8 = 0x82;

// PDU tags
pub const GET_REQUEST_TAG: u8 = 0xA0;
pub const GET_NEXT_REQUEST_TAG: u8 = 0xA1;
pub const GET_RESPONSE_TAG: u8 = 0xA2;

// use Definite Form
pub fn encode_length(len: usize, buf: &mut BytesMut) {
    if len < 0x80 {
        //short form - one byte
        buf.put_u8(len as u8);
    } else {
        //long form - mutiple bytes
        let mut bytes = Vec::new();
        let mut temp_len = len;

        while temp_len > 0 {
            bytes.push((temp_len & 0xFF) as u8);
            temp_len >>= 8;
        }

        buf.put_u8(0x80 | bytes.len() as u8);

        for i in bytes.iter().rev() {
            buf.put_u8(*i);
        }
    }
}

/// Encodes an ASN.1 INTEGER into the buffer using the minimal
/// two's-complement form.
pub fn encode_integer(value: i32, buf: &mut BytesMut) {
    buf.put_u8(INTEGER_TAG);

    let mut temp = value;
    let mut len = 1;

    while !(-128..=127).contains(&temp) {
        temp >>= 8;
        len += 1;
    }

    encode_length(len, buf);

    for i in (0..len).rev() {
        let shift = i * 8;
        buf.put_u8(((value >> shift) & 0xFF) as u8);
    }
}

/// Encodes an unsigned application type (Counter32, Gauge32, TimeTicks,
/// Counter64). A leading zero octet is added when the high bit is set so the
/// value is not read back as negative.
pub fn encode_unsigned(tag: u8, value: u64, buf: &mut BytesMut) {
    buf.put_u8(tag);

    let bytes = value.to_be_bytes();
    let skip = bytes.iter().take(7).take_while(|&&b| b == 0).count();
    let content = &bytes[skip..];
    let pad = content[0] & 0x80 != 0;

    encode_length(content.len() + usize::from(pad), buf);
    if pad {
        buf.put_u8(0x00);
    }
    buf.put_slice(content);
}

pub fn encode_octet_string(data: &[u8], buf: &mut BytesMut) {
    encode_tagged_bytes(OCTET_STRING_TAG, data, buf);
}

/// Writes a primitive TLV with arbitrary content (IpAddress, Opaque and
/// friends share the OCTET STRING layout).
pub fn encode_tagged_bytes(tag: u8, data: &[u8], buf: &mut BytesMut) {
    buf.put_u8(tag);
    encode_length(data.len(), buf);
    buf.put_slice(data);
}

pub fn encode_null(buf: &mut BytesMut) {
    encode_empty(NULL_TAG, buf);
}

/// Writes a zero-length TLV. Used for NULL and the SNMPv2 exceptions.
pub fn encode_empty(tag: u8, buf: &mut BytesMut) {
    buf.put_u8(tag);
    buf.put_u8(0x00);
}

/// Encodes content as an ASN.1 sequence with the given tag.
///
/// This function writes a tag byte, encodes the length of the content,
/// and then appends the content itself to the buffer. PDUs are constructed
/// sequences with a context tag, so the same routine serves both.
///
/// # Arguments
///
/// * `content` - A slice of bytes representing the content to be encoded.
/// * `tag` - The ASN.1 tag to be used for the sequence.
/// * `buf` - A mutable reference to a `BytesMut` buffer where the encoded
///   sequence will be written.
pub fn encode_sequence(content: &[u8], tag: u8, buf: &mut BytesMut) {
    buf.put_u8(tag);
    encode_length(content.len(), buf);
    buf.put_slice(content);
}

fn encode_subidentifier(value: u64, buf: &mut BytesMut) {
    let mut bytes = Vec::new();
    let mut temp = value;
    bytes.push((temp & 0x7F) as u8);
    temp >>= 7;

    while temp > 0 {
        bytes.push(((temp & 0x7F) | 0x80) as u8);
        temp >>= 7;
    }

    for b in bytes.iter().rev() {
        buf.put_u8(*b);
    }
}

/// Encodes an OBJECT IDENTIFIER.
///
/// The first two arcs collapse into one subidentifier `40 * a + b`. A lone
/// arc `n` is written as `40 * n`, the way net-snmp builds single-arc OIDs.
/// First arcs above 2 are not rejected here; they produce a subidentifier
/// that decodes back under arc 2.
pub fn encode_oid(oid: &[u32], buf: &mut BytesMut) {
    buf.put_u8(OBJECT_IDENTIFIER_TAG);

    let mut oid_buf = BytesMut::new();

    match oid {
        [] => {}
        [first] => encode_subidentifier(40 * u64::from(*first), &mut oid_buf),
        [first, second, rest @ ..] => {
            encode_subidentifier(40 * u64::from(*first) + u64::from(*second), &mut oid_buf);
            for &num in rest {
                encode_subidentifier(u64::from(num), &mut oid_buf);
            }
        }
    }

    encode_length(oid_buf.len(), buf);
    buf.put_slice(&oid_buf);
}
