use crate::asn1::encode;
use bytes::{Buf, Bytes};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Asn1Error {
    #[error("expected tag 0x{expected:02x}, got 0x{actual:02x}")]
    UnexpectedTag { expected: u8, actual: u8 },
    #[error("invalid tag: 0x{0:02x}")]
    InvalidTag(u8),
    #[error("invalid length")]
    InvalidLength,
    #[error("invalid value: {0}")]
    InvalidValue(&'static str),
    #[error("unexpected end of data")]
    UnexpectedEndOfData,
    #[error("unsupported encoding: {0}")]
    UnsupportedEncoding(&'static str),
}

pub type Result<T> = std::result::Result<T, Asn1Error>;

fn ensure_remaining(buf: &Bytes, len: usize) -> Result<()> {
    if buf.remaining() < len {
        return Err(Asn1Error::UnexpectedEndOfData);
    }
    Ok(())
}

pub fn peek_tag(buf: &Bytes) -> Result<u8> {
    ensure_remaining(buf, 1)?;
    Ok(buf[0])
}

pub fn decode_tag(buf: &mut Bytes) -> Result<u8> {
    ensure_remaining(buf, 1)?;
    Ok(buf.get_u8())
}

fn expect_tag(buf: &mut Bytes, expected: u8) -> Result<()> {
    let actual = decode_tag(buf)?;
    if actual != expected {
        return Err(Asn1Error::UnexpectedTag { expected, actual });
    }
    Ok(())
}

pub fn decode_length(buf: &mut Bytes) -> Result<usize> {
    ensure_remaining(buf, 1)?;

    let first_byte = buf.get_u8();

    if first_byte < 0x80 {
        // Short form
        return Ok(first_byte as usize);
    }

    // Long form
    let num_bytes = (first_byte & 0x7F) as usize;
    if num_bytes == 0 {
        return Err(Asn1Error::UnsupportedEncoding("indefinite length"));
    }
    if num_bytes > 4 {
        return Err(Asn1Error::InvalidLength);
    }

    ensure_remaining(buf, num_bytes)?;

    let mut length: usize = 0;
    for _ in 0..num_bytes {
        length = (length << 8) | (buf.get_u8() as usize);
    }

    Ok(length)
}

/// Reads a tag and length, then splits off exactly `length` content bytes.
pub fn decode_tlv(buf: &mut Bytes) -> Result<(u8, Bytes)> {
    let tag = decode_tag(buf)?;
    let length = decode_length(buf)?;
    ensure_remaining(buf, length)?;
    Ok((tag, buf.split_to(length)))
}

fn decode_content(buf: &mut Bytes, expected: u8) -> Result<Bytes> {
    let (actual, content) = decode_tlv(buf)?;
    if actual != expected {
        return Err(Asn1Error::UnexpectedTag { expected, actual });
    }
    Ok(content)
}

/// Decodes a constructed value with the given tag (SEQUENCE or a PDU tag) and
/// returns its content.
pub fn decode_sequence(buf: &mut Bytes, tag: u8) -> Result<Bytes> {
    decode_content(buf, tag)
}

pub fn decode_integer(buf: &mut Bytes) -> Result<i32> {
    let content = decode_content(buf, encode::INTEGER_TAG)?;
    integer_from_content(&content)
}

pub(crate) fn integer_from_content(content: &[u8]) -> Result<i32> {
    if content.is_empty() {
        return Err(Asn1Error::InvalidValue("zero-length INTEGER"));
    }
    if content.len() > 4 {
        return Err(Asn1Error::InvalidValue("INTEGER wider than 32 bits"));
    }

    // Handle sign bit
    let mut value: i32 = if content[0] & 0x80 != 0 { -1 } else { 0 };
    for &b in content {
        value = (value << 8) | i32::from(b);
    }
    Ok(value)
}

/// Decodes the content of an unsigned application type. One leading zero
/// octet beyond `width` bytes is tolerated.
pub(crate) fn unsigned_from_content(content: &[u8], width: usize) -> Result<u64> {
    if content.is_empty() {
        return Err(Asn1Error::InvalidValue("zero-length unsigned"));
    }
    let digits = if content.len() == width + 1 && content[0] == 0 {
        &content[1..]
    } else {
        content
    };
    if digits.len() > width {
        return Err(Asn1Error::InvalidValue("unsigned value overflows its type"));
    }

    let mut value: u64 = 0;
    for &b in digits {
        value = (value << 8) | u64::from(b);
    }
    Ok(value)
}

pub fn decode_octet_string(buf: &mut Bytes) -> Result<Bytes> {
    decode_content(buf, encode::OCTET_STRING_TAG)
}

pub fn decode_null(buf: &mut Bytes) -> Result<()> {
    let content = decode_content(buf, encode::NULL_TAG)?;
    if !content.is_empty() {
        return Err(Asn1Error::InvalidLength);
    }
    Ok(())
}

// Decode an OBJECT IDENTIFIER
pub fn decode_oid(buf: &mut Bytes) -> Result<Vec<u32>> {
    expect_tag(buf, encode::OBJECT_IDENTIFIER_TAG)?;
    let length = decode_length(buf)?;
    ensure_remaining(buf, length)?;
    oid_from_content(&buf.split_to(length))
}

pub(crate) fn oid_from_content(content: &[u8]) -> Result<Vec<u32>> {
    if content.is_empty() {
        return Err(Asn1Error::InvalidValue("empty OBJECT IDENTIFIER"));
    }

    let mut subidentifiers = Vec::new();
    let mut value: u64 = 0;
    let mut in_progress = false;

    // Each component can span multiple bytes
    for &byte in content {
        if !in_progress && byte == 0x80 {
            return Err(Asn1Error::InvalidValue("non-minimal subidentifier"));
        }
        value = (value << 7) | u64::from(byte & 0x7F);
        if value > u64::from(u32::MAX) + 80 {
            return Err(Asn1Error::InvalidValue("subidentifier overflows 32 bits"));
        }
        in_progress = byte & 0x80 != 0;
        if !in_progress {
            subidentifiers.push(value);
            value = 0;
        }
    }
    if in_progress {
        return Err(Asn1Error::UnexpectedEndOfData);
    }

    // The first subidentifier encodes the first two components
    let first = subidentifiers[0];
    let (arc0, arc1) = match first {
        0..=39 => (0, first),
        40..=79 => (1, first - 40),
        _ => (2, first - 80),
    };
    let arc1 = u32::try_from(arc1)
        .map_err(|_| Asn1Error::InvalidValue("subidentifier overflows 32 bits"))?;

    let mut result = Vec::with_capacity(subidentifiers.len() + 1);
    result.push(arc0);
    result.push(arc1);
    for &sub in &subidentifiers[1..] {
        let arc = u32::try_from(sub)
            .map_err(|_| Asn1Error::InvalidValue("subidentifier overflows 32 bits"))?;
        result.push(arc);
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bytes(data: &[u8]) -> Bytes {
        Bytes::copy_from_slice(data)
    }

    #[test]
    fn integer_sign_extension() {
        assert_eq!(decode_integer(&mut bytes(&[0x02, 0x01, 0xFF])), Ok(-1));
        assert_eq!(decode_integer(&mut bytes(&[0x02, 0x02, 0x00, 0x80])), Ok(128));
        assert_eq!(
            decode_integer(&mut bytes(&[0x02, 0x04, 0x80, 0x00, 0x00, 0x00])),
            Ok(i32::MIN)
        );
    }

    #[test]
    fn integer_rejects_wide_and_empty() {
        assert!(decode_integer(&mut bytes(&[0x02, 0x05, 1, 2, 3, 4, 5])).is_err());
        assert!(decode_integer(&mut bytes(&[0x02, 0x00])).is_err());
    }

    #[test]
    fn wrong_tag_is_reported() {
        assert_eq!(
            decode_integer(&mut bytes(&[0x04, 0x01, 0x00])),
            Err(Asn1Error::UnexpectedTag {
                expected: encode::INTEGER_TAG,
                actual: encode::OCTET_STRING_TAG
            })
        );
    }

    #[test]
    fn truncated_content_is_rejected() {
        assert_eq!(
            decode_octet_string(&mut bytes(&[0x04, 0x05, b'a', b'b'])),
            Err(Asn1Error::UnexpectedEndOfData)
        );
        assert_eq!(decode_tag(&mut Bytes::new()), Err(Asn1Error::UnexpectedEndOfData));
    }

    #[test]
    fn long_form_length() {
        let mut data = vec![0x04, 0x81, 0x80];
        data.extend(std::iter::repeat(b'x').take(128));
        let decoded = decode_octet_string(&mut bytes(&data)).unwrap();
        assert_eq!(decoded.len(), 128);
    }

    #[test]
    fn indefinite_and_oversized_lengths_are_rejected() {
        assert!(decode_length(&mut bytes(&[0x80])).is_err());
        assert_eq!(
            decode_length(&mut bytes(&[0x85, 1, 1, 1, 1, 1])),
            Err(Asn1Error::InvalidLength)
        );
    }

    #[test]
    fn oid_decodes_multibyte_arcs() {
        let mut buf = bytes(&[0x06, 0x07, 0x2B, 0x06, 0x01, 0x04, 0x01, 0xEE, 0x63]);
        assert_eq!(decode_oid(&mut buf), Ok(vec![1, 3, 6, 1, 4, 1, 14179]));
    }

    #[test]
    fn oid_large_first_subidentifier_maps_to_arc_two() {
        assert_eq!(oid_from_content(&[0x88, 0x37]), Ok(vec![2, 999]));
    }

    #[test]
    fn oid_rejects_dangling_continuation() {
        assert_eq!(
            oid_from_content(&[0x2B, 0x86]),
            Err(Asn1Error::UnexpectedEndOfData)
        );
        assert!(oid_from_content(&[]).is_err());
    }

    #[test]
    fn unsigned_tolerates_one_padding_octet() {
        assert_eq!(unsigned_from_content(&[0x00, 0xFF, 0xFF, 0xFF, 0xFF], 4), Ok(0xFFFF_FFFF));
        assert!(unsigned_from_content(&[0x01, 0x00, 0x00, 0x00, 0x00], 4).is_err());
    }

    #[test]
    fn null_must_be_empty() {
        assert_eq!(decode_null(&mut bytes(&[0x05, 0x00])), Ok(()));
        assert_eq!(
            decode_null(&mut bytes(&[0x05, 0x01, 0x00])),
            Err(Asn1Error::InvalidLength)
        );
    }
}
