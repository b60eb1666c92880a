//! Field descriptors and the codec that walks them.
//!
//! Every record type is described by an ordered list of [`Field`]s. Packing
//! walks the list alongside the record's [`Value`]s, unpacking walks it to
//! produce them. Adding a record type means writing its field list, never
//! touching this loop.

use crate::bitmap;
use crate::edns::{self, EdnsOption};
use crate::io::{Decoder, Encoder};
use crate::name;
use crate::Error;
use crate::Result;
use std::collections::BTreeSet;
use std::net::{Ipv4Addr, Ipv6Addr};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The kind of one field in a record's RDATA.
///
/// Kinds marked "rest" have no length of their own and consume whatever
/// remains of the RDATA, so they can only appear last.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Field {
    U8,
    U16,
    U32,

    /// A 48 bit integer, as used for TSIG timestamps.
    U48,

    /// A domain name that is never compressed.
    Name,

    /// A domain name that may be compressed (only the RFC 1035 types).
    CompressedName,

    /// A `<character-string>`: one length octet and up to 255 octets.
    CharString,

    /// One or more `<character-string>`s (rest).
    CharStrings,

    /// IPv4 address.
    A,

    /// IPv6 address.
    AAAA,

    /// Raw bytes shown as hex (rest).
    Hex,

    /// Raw bytes shown as base64 (rest).
    Base64,

    /// Raw bytes with a one octet length, shown as base32hex.
    Base32,

    /// Raw bytes with a one octet length, shown as hex.
    SizedHex,

    /// Raw bytes with a two octet length, shown as hex.
    WideHex,

    /// Raw bytes with no interpretation (rest).
    Opaque,

    /// NSEC style windowed type bitmap (rest).
    TypeBitmap,

    /// WKS style port bitmap (rest).
    ServiceBitmap,

    /// EDNS(0) option list (rest).
    Options,
}

impl Field {
    /// Returns true if this field has no length of its own and runs to the
    /// end of the RDATA.
    pub fn is_rest(self) -> bool {
        matches!(
            self,
            Field::CharStrings
                | Field::Hex
                | Field::Base64
                | Field::Opaque
                | Field::TypeBitmap
                | Field::ServiceBitmap
                | Field::Options
        )
    }

    /// Returns true if this field may legitimately be zero octets long. Only
    /// the rest kinds can be.
    pub fn may_be_empty(self) -> bool {
        self.is_rest()
    }
}

/// The value of one field.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Value {
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),

    /// A domain name in text form.
    Name(String),
    Text(Vec<u8>),
    Texts(Vec<Vec<u8>>),
    A(Ipv4Addr),
    AAAA(Ipv6Addr),
    Bytes(Vec<u8>),
    Types(BTreeSet<u16>),
    Options(Vec<EdnsOption>),
}

impl Value {
    /// Name of the variant, for error messages.
    fn kind(&self) -> &'static str {
        match self {
            Value::U8(_) => "u8",
            Value::U16(_) => "u16",
            Value::U32(_) => "u32",
            Value::U64(_) => "u64",
            Value::Name(_) => "name",
            Value::Text(_) => "text",
            Value::Texts(_) => "texts",
            Value::A(_) => "a",
            Value::AAAA(_) => "aaaa",
            Value::Bytes(_) => "bytes",
            Value::Types(_) => "types",
            Value::Options(_) => "options",
        }
    }
}

fn mismatch(field: Field, value: &Value) -> Error {
    Error::UnknownTag(format!(
        "field {:?} can not hold a {} value",
        field,
        value.kind()
    ))
}

fn pack_char_string(s: &[u8], enc: &mut Encoder) -> Result<()> {
    if s.len() > 255 {
        format_error!(
            "character-string",
            enc.offset(),
            "{} octets is longer than 255",
            s.len()
        );
    }
    enc.write_u8(s.len() as u8)?;
    enc.write_bytes(s)
}

fn unpack_char_string(dec: &mut Decoder) -> Result<Vec<u8>> {
    let len = dec.read_u8()?;
    Ok(dec.read_bytes(len.into())?.to_vec())
}

fn pack_sized(bytes: &[u8], field: &'static str, enc: &mut Encoder) -> Result<()> {
    if bytes.len() > 255 {
        format_error!(field, enc.offset(), "{} octets is longer than 255", bytes.len());
    }
    enc.write_u8(bytes.len() as u8)?;
    enc.write_bytes(bytes)
}

fn pack_wide(bytes: &[u8], enc: &mut Encoder) -> Result<()> {
    if bytes.len() > usize::from(u16::MAX) {
        format_error!("hex", enc.offset(), "{} octets is longer than 65535", bytes.len());
    }
    enc.write_u16(bytes.len() as u16)?;
    enc.write_bytes(bytes)
}

fn pack_u48(v: u64, enc: &mut Encoder) -> Result<()> {
    if v >> 48 != 0 {
        format_error!("u48", enc.offset(), "{} does not fit in 48 bits", v);
    }
    enc.write_u16((v >> 32) as u16)?;
    enc.write_u32(v as u32)
}

/// Writes `values`, described by `fields`, at the encoder's offset.
pub(crate) fn pack(
    fields: &[Field],
    values: &[Value],
    enc: &mut Encoder,
    compress: bool,
) -> Result<()> {
    if fields.len() != values.len() {
        return Err(Error::UnknownTag(format!(
            "{} fields described but {} values given",
            fields.len(),
            values.len()
        )));
    }

    for (field, value) in fields.iter().zip(values) {
        match (field, value) {
            (Field::U8, Value::U8(v)) => enc.write_u8(*v)?,
            (Field::U16, Value::U16(v)) => enc.write_u16(*v)?,
            (Field::U32, Value::U32(v)) => enc.write_u32(*v)?,
            (Field::U48, Value::U64(v)) => pack_u48(*v, enc)?,

            (Field::Name, Value::Name(n)) => name::pack(n, enc, false)?,
            (Field::CompressedName, Value::Name(n)) => name::pack(n, enc, compress)?,

            (Field::CharString, Value::Text(s)) => pack_char_string(s, enc)?,
            (Field::CharStrings, Value::Texts(ss)) => {
                for s in ss {
                    pack_char_string(s, enc)?;
                }
            }

            (Field::A, Value::A(ip)) => enc.write_bytes(&ip.octets())?,
            (Field::AAAA, Value::AAAA(ip)) => enc.write_bytes(&ip.octets())?,

            (Field::Hex, Value::Bytes(b))
            | (Field::Base64, Value::Bytes(b))
            | (Field::Opaque, Value::Bytes(b)) => enc.write_bytes(b)?,

            (Field::Base32, Value::Bytes(b)) => pack_sized(b, "base32", enc)?,
            (Field::SizedHex, Value::Bytes(b)) => pack_sized(b, "hex", enc)?,
            (Field::WideHex, Value::Bytes(b)) => pack_wide(b, enc)?,

            (Field::TypeBitmap, Value::Types(t)) => bitmap::pack_types(t, enc)?,
            (Field::ServiceBitmap, Value::Types(t)) => bitmap::pack_services(t, enc)?,
            (Field::Options, Value::Options(o)) => edns::pack_options(o, enc)?,

            (field, value) => return Err(mismatch(*field, value)),
        }
    }

    Ok(())
}

/// Reads one value per field. The decoder must already be bounded to the end
/// of the RDATA.
pub(crate) fn unpack(fields: &[Field], dec: &mut Decoder) -> Result<Vec<Value>> {
    let mut values = Vec::with_capacity(fields.len());

    for field in fields {
        let value = match field {
            Field::U8 => Value::U8(dec.read_u8()?),
            Field::U16 => Value::U16(dec.read_u16()?),
            Field::U32 => Value::U32(dec.read_u32()?),
            Field::U48 => {
                let high = dec.read_u16()?;
                let low = dec.read_u32()?;
                Value::U64((u64::from(high) << 32) | u64::from(low))
            }

            Field::Name | Field::CompressedName => Value::Name(name::unpack(dec)?),

            Field::CharString => Value::Text(unpack_char_string(dec)?),
            Field::CharStrings => {
                let mut texts = Vec::new();
                while dec.remaining() > 0 {
                    texts.push(unpack_char_string(dec)?);
                }
                Value::Texts(texts)
            }

            Field::A => Value::A(dec.read_ipv4()?),
            Field::AAAA => Value::AAAA(dec.read_ipv6()?),

            Field::Hex | Field::Base64 | Field::Opaque => Value::Bytes(dec.read_rest()?.to_vec()),

            Field::Base32 | Field::SizedHex => {
                let len = dec.read_u8()?;
                Value::Bytes(dec.read_bytes(len.into())?.to_vec())
            }
            Field::WideHex => {
                let len = dec.read_u16()?;
                Value::Bytes(dec.read_bytes(len.into())?.to_vec())
            }

            Field::TypeBitmap => Value::Types(bitmap::unpack_types(dec)?),
            Field::ServiceBitmap => Value::Types(bitmap::unpack_services(dec)?),
            Field::Options => Value::Options(edns::unpack_options(dec)?),
        };

        values.push(value);
    }

    Ok(values)
}

/// Hands out decoded values in order, checking each is of the expected kind.
///
/// Used by record types to rebuild themselves from [`unpack`]'s output.
pub struct Values {
    inner: std::vec::IntoIter<Value>,
}

macro_rules! take_value {
    ($fn:ident, $variant:ident, $t:ty) => {
        pub fn $fn(&mut self) -> Result<$t> {
            match self.next()? {
                Value::$variant(v) => Ok(v),
                other => Err(Error::UnknownTag(format!(
                    "expected a {} value, got {}",
                    stringify!($fn),
                    other.kind()
                ))),
            }
        }
    };
}

impl Values {
    pub fn new(values: Vec<Value>) -> Values {
        Values {
            inner: values.into_iter(),
        }
    }

    fn next(&mut self) -> Result<Value> {
        self.inner
            .next()
            .ok_or_else(|| Error::UnknownTag("too few values for record".to_string()))
    }

    take_value!(u8, U8, u8);
    take_value!(u16, U16, u16);
    take_value!(u32, U32, u32);
    take_value!(u64, U64, u64);
    take_value!(name, Name, String);
    take_value!(text, Text, Vec<u8>);
    take_value!(texts, Texts, Vec<Vec<u8>>);
    take_value!(a, A, Ipv4Addr);
    take_value!(aaaa, AAAA, Ipv6Addr);
    take_value!(bytes, Bytes, Vec<u8>);
    take_value!(types, Types, BTreeSet<u16>);
    take_value!(options, Options, Vec<EdnsOption>);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::MAX_MESSAGE_SIZE;
    use pretty_assertions::assert_eq;

    fn pack_all(fields: &[Field], values: &[Value]) -> Result<Vec<u8>> {
        let mut enc = Encoder::new(0, MAX_MESSAGE_SIZE);
        pack(fields, values, &mut enc, true)?;
        Ok(enc.into_bytes())
    }

    #[test]
    fn test_round_trip() {
        let fields = [
            Field::U8,
            Field::U16,
            Field::U32,
            Field::Name,
            Field::CharString,
            Field::A,
            Field::SizedHex,
            Field::Hex,
        ];
        let values = vec![
            Value::U8(1),
            Value::U16(0x0203),
            Value::U32(0x0405_0607),
            Value::Name("a.b.".to_string()),
            Value::Text(b"hi".to_vec()),
            Value::A(Ipv4Addr::new(10, 0, 0, 1)),
            Value::Bytes(vec![0xab, 0xcd]),
            Value::Bytes(vec![1, 2, 3]),
        ];

        let wire = pack_all(&fields, &values).unwrap();
        assert_eq!(
            wire,
            vec![
                1, 2, 3, 4, 5, 6, 7, // integers
                1, b'a', 1, b'b', 0, // name
                2, b'h', b'i', // character-string
                10, 0, 0, 1, // address
                2, 0xab, 0xcd, // sized hex
                1, 2, 3, // hex, runs to the end
            ]
        );

        let mut dec = Decoder::new(&wire);
        assert_eq!(unpack(&fields, &mut dec).unwrap(), values);
        assert_eq!(dec.remaining(), 0);
    }

    #[test]
    fn test_wide_fields() {
        let fields = [Field::U48, Field::WideHex, Field::WideHex];
        let values = vec![
            Value::U64(0x0102_0304_0506),
            Value::Bytes(vec![0xaa, 0xbb]),
            Value::Bytes(vec![]),
        ];

        let wire = pack_all(&fields, &values).unwrap();
        assert_eq!(hex::encode(&wire), concat!("010203040506", "0002aabb", "0000"));

        let mut dec = Decoder::new(&wire);
        assert_eq!(unpack(&fields, &mut dec).unwrap(), values);

        let err = pack_all(&[Field::U48], &[Value::U64(1 << 48)]).unwrap_err();
        assert!(err.is_format(), "{:?}", err);
    }

    #[test]
    fn test_char_strings_fill_record() {
        let wire = [1, b'a', 0, 2, b'b', b'c'];
        let mut dec = Decoder::new(&wire);
        assert_eq!(
            unpack(&[Field::CharStrings], &mut dec).unwrap(),
            vec![Value::Texts(vec![b"a".to_vec(), Vec::new(), b"bc".to_vec()])]
        );
    }

    #[test]
    fn test_char_string_too_long() {
        let err = pack_all(&[Field::CharString], &[Value::Text(vec![b'x'; 256])]).unwrap_err();
        assert!(err.is_format());

        let ok = pack_all(&[Field::CharString], &[Value::Text(vec![b'x'; 255])]).unwrap();
        assert_eq!(ok.len(), 256);
    }

    #[test]
    fn test_implicit_length_respects_bound() {
        let wire = [1, 2, 3, 4, 5];
        let mut dec = Decoder::new(&wire);
        dec.limit(3);
        assert_eq!(
            unpack(&[Field::U8, Field::Opaque], &mut dec).unwrap(),
            vec![Value::U8(1), Value::Bytes(vec![2, 3])]
        );
        assert_eq!(dec.offset(), 3);
    }

    #[test]
    fn test_read_past_bound() {
        let wire = [1, 2, 3, 4];
        let mut dec = Decoder::new(&wire);
        dec.limit(3);
        assert!(matches!(
            unpack(&[Field::U32], &mut dec),
            Err(Error::BufferTooSmall { .. })
        ));
    }

    #[test]
    fn test_mismatch() {
        assert!(matches!(
            pack_all(&[Field::U16], &[Value::U8(1)]),
            Err(Error::UnknownTag(_))
        ));
        assert!(matches!(
            pack_all(&[Field::U16, Field::U16], &[Value::U16(1)]),
            Err(Error::UnknownTag(_))
        ));

        let mut values = Values::new(vec![Value::U8(1)]);
        assert!(matches!(values.u16(), Err(Error::UnknownTag(_))));
        assert!(matches!(values.u8(), Err(Error::UnknownTag(_))));
    }
}
