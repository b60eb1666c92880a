//! Reading and writing questions and resource records.

use crate::fields;
use crate::io::{Decoder, Encoder};
use crate::name;
use crate::registry::Registry;
use crate::resource::Resource;
use crate::types::{Question, Record};
use crate::Error;
use crate::Result;
use log::debug;
use std::convert::TryFrom;
use std::time::Duration;

impl Question {
    pub(crate) fn emit(&self, enc: &mut Encoder, compress: bool) -> Result<()> {
        name::pack(&self.name, enc, compress)?;
        enc.write_u16(self.r#type)?;
        enc.write_u16(self.class)
    }

    pub(crate) fn parse(dec: &mut Decoder) -> Result<Question> {
        Ok(Question {
            name: name::unpack(dec)?,
            r#type: dec.read_u16()?,
            class: dec.read_u16()?,
        })
    }
}

impl Record {
    /// Writes the record, patching in RDLENGTH once the RDATA is written.
    pub(crate) fn emit(&self, enc: &mut Encoder, compress: bool) -> Result<()> {
        let ttl = match u32::try_from(self.ttl.as_secs()) {
            Ok(ttl) => ttl,
            Err(_) => format_error!(
                "ttl",
                enc.offset(),
                "{} seconds does not fit in 32 bits",
                self.ttl.as_secs()
            ),
        };

        name::pack(&self.name, enc, compress)?;
        enc.write_u16(self.r#type())?;
        enc.write_u16(self.class)?;
        enc.write_u32(ttl)?;

        let rdlength_at = enc.reserve_u16()?;
        let start = enc.offset();
        self.resource.emit(enc, compress)?;

        let len = enc.offset() - start;
        match u16::try_from(len) {
            Ok(len) => enc.patch_u16(rdlength_at, len),
            Err(_) => format_error!("rdlength", start, "{} octets of rdata is too long", len),
        }

        Ok(())
    }

    /// Reads one record, decoding its RDATA with the spec `registry` holds for
    /// its type.
    pub(crate) fn parse(dec: &mut Decoder, registry: &Registry) -> Result<Record> {
        let name = name::unpack(dec)?;
        let r#type = dec.read_u16()?;
        let class = dec.read_u16()?;
        let ttl = Duration::from_secs(dec.read_u32()?.into());
        let rdlength = usize::from(dec.read_u16()?);

        let start = dec.offset();
        let end = start + rdlength;
        if end > dec.end() {
            return Err(Error::BufferTooSmall {
                offset: start,
                needed: rdlength,
                available: dec.remaining(),
            });
        }

        let previous = dec.limit(end);
        let resource = match registry.get(r#type) {
            Some(spec) if rdlength == 0 && !spec.may_be_empty() => Resource::Empty(r#type),
            Some(spec) => {
                let values = fields::unpack(&spec.fields, dec)?;
                (spec.build)(spec, values)?
            }
            None => {
                debug!(
                    "record '{}' has unknown type {}, keeping {} octets of rdata",
                    name, r#type, rdlength
                );
                Resource::Unknown {
                    r#type,
                    data: dec.read_rest()?.to_vec(),
                }
            }
        };
        dec.limit(previous);

        if dec.offset() != end {
            format_error!(
                "rdata",
                start,
                "record '{}' type {} should end at offset {} but ended at {}",
                name,
                r#type,
                end,
                dec.offset()
            );
        }

        Ok(Record {
            name,
            class,
            ttl,
            resource,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::MAX_MESSAGE_SIZE;
    use crate::resource::MX;
    use crate::types::Class;
    use pretty_assertions::assert_eq;

    fn emit(record: &Record) -> Result<Vec<u8>> {
        let mut enc = Encoder::new(0, MAX_MESSAGE_SIZE);
        record.emit(&mut enc, true)?;
        Ok(enc.into_bytes())
    }

    fn parse(wire: &[u8]) -> Result<Record> {
        let mut dec = Decoder::new(wire);
        let record = Record::parse(&mut dec, Registry::global())?;
        assert_eq!(dec.remaining(), 0);
        Ok(record)
    }

    #[test_env_log::test]
    fn test_mx() {
        let record = Record {
            name: "example.com.".to_string(),
            class: Class::Internet as u16,
            ttl: Duration::from_secs(300),
            resource: Resource::MX(MX {
                preference: 10,
                exchange: "mail.example.com.".to_string(),
            }),
        };

        let wire = emit(&record).unwrap();
        assert_eq!(
            hex::encode(&wire),
            concat!(
                "076578616d706c6503636f6d00", // example.com.
                "000f0001",                   // MX IN
                "0000012c",                   // 300
                "0009",                       // rdlength
                "000a",                       // preference
                "046d61696cc000",             // mail + pointer to example.com.
            )
        );
        assert_eq!(parse(&wire).unwrap(), record);
    }

    #[test_env_log::test]
    fn test_unknown_type_is_kept() {
        let wire = hex::decode("00ff0000010000000500050102030405").unwrap();
        let record = parse(&wire).unwrap();
        assert_eq!(
            record.resource,
            Resource::Unknown {
                r#type: 65280,
                data: vec![1, 2, 3, 4, 5]
            }
        );
        assert_eq!(emit(&record).unwrap(), wire);
    }

    #[test_env_log::test]
    fn test_empty_rdata() {
        // An A record with no address, as sent in dynamic updates.
        let wire = hex::decode("00000100ff000000000000").unwrap();
        let record = parse(&wire).unwrap();
        assert_eq!(record.resource, Resource::Empty(1));
        assert_eq!(record.class, 255);
        assert_eq!(emit(&record).unwrap(), wire);
    }

    #[test_env_log::test]
    fn test_rdlength_mismatch() {
        // A record claiming 5 octets of rdata.
        let wire = hex::decode("000001000100000000000501020304ff").unwrap();
        let err = parse(&wire).unwrap_err();
        assert!(err.is_format(), "{:?}", err);
    }

    #[test_env_log::test]
    fn test_rdlength_past_end() {
        let wire = hex::decode("00000100010000000000080102").unwrap();
        assert!(matches!(
            parse(&wire),
            Err(Error::BufferTooSmall { .. })
        ));
    }

    #[test_env_log::test]
    fn test_ttl_too_large() {
        let record = Record {
            name: ".".to_string(),
            class: 1,
            ttl: Duration::from_secs(u64::from(u32::MAX) + 1),
            resource: Resource::A("192.0.2.1".parse().unwrap()),
        };
        assert!(emit(&record).unwrap_err().is_format());
    }

    #[test_env_log::test]
    fn test_question() {
        let q = Question {
            name: "example.com.".to_string(),
            r#type: 28,
            class: 1,
        };
        let mut enc = Encoder::new(0, MAX_MESSAGE_SIZE);
        q.emit(&mut enc, true).unwrap();
        let wire = enc.into_bytes();
        assert_eq!(hex::encode(&wire), "076578616d706c6503636f6d00001c0001");

        let mut dec = Decoder::new(&wire);
        assert_eq!(Question::parse(&mut dec).unwrap(), q);
    }
}
