use crate::edns::Extension;
use crate::io::{Decoder, Encoder, MAX_MESSAGE_SIZE};
use crate::registry::Registry;
use crate::resource::Resource;
use crate::types::*;
use crate::util::hexdump;
use crate::Result;
use log::{log_enabled, trace, Level};
use rand::Rng;
use std::convert::TryFrom;

/// Smallest possible question: root name, type and class.
const MIN_QUESTION_LEN: usize = 5;

/// Smallest possible record: root name, type, class, ttl and rdlength.
const MIN_RECORD_LEN: usize = 11;

/// Returns a random message id.
pub fn id() -> u16 {
    rand::thread_rng().gen()
}

// A helper class to hold state while the parsing is happening.
struct MessageParser<'a> {
    dec: Decoder<'a>,
    registry: &'a Registry,

    m: Message,
}

#[derive(Copy, Clone, PartialEq)]
enum RecordSection {
    Answers,
    Authorities,
    Additionals,
}

impl<'a> MessageParser<'a> {
    fn new(buf: &'a [u8], registry: &'a Registry) -> MessageParser<'a> {
        MessageParser {
            dec: Decoder::new(buf),
            registry,
            m: Message::default(),
        }
    }

    /// Consume the MessageParser and returned the resulting Message.
    fn parse(mut self) -> Result<Message> {
        self.m.id = self.dec.read_u16()?;

        let b = self.dec.read_u8()?;
        self.m.qr = QR::from_bool(0b1000_0000 & b != 0);
        self.m.opcode = (0b0111_1000 & b) >> 3;
        self.m.aa = (0b0000_0100 & b) != 0;
        self.m.tc = (0b0000_0010 & b) != 0;
        self.m.rd = (0b0000_0001 & b) != 0;

        let b = self.dec.read_u8()?;
        self.m.ra = (0b1000_0000 & b) != 0;
        self.m.z = (0b0100_0000 & b) != 0; // Unused
        self.m.ad = (0b0010_0000 & b) != 0;
        self.m.cd = (0b0001_0000 & b) != 0;
        self.m.rcode = 0b0000_1111 & b;

        let qd_count = self.dec.read_u16()?;
        let an_count = self.dec.read_u16()?;
        let ns_count = self.dec.read_u16()?;
        let ar_count = self.dec.read_u16()?;

        self.read_questions(qd_count)?;
        self.read_records(an_count, RecordSection::Answers)?;
        self.read_records(ns_count, RecordSection::Authorities)?;
        self.read_records(ar_count, RecordSection::Additionals)?;

        if self.dec.remaining() > 0 {
            format_error!(
                "message",
                self.dec.offset(),
                "finished parsing with {} bytes left over",
                self.dec.remaining()
            );
        }

        Ok(self.m)
    }

    /// Reserves room for `count` entries, but never more than the remaining
    /// bytes could hold.
    fn capacity(&self, count: u16, min_len: usize) -> usize {
        usize::from(count).min(self.dec.remaining() / min_len)
    }

    fn read_questions(&mut self, count: u16) -> Result<()> {
        let capacity = self.capacity(count, MIN_QUESTION_LEN);
        self.m.questions.reserve_exact(capacity);

        for _ in 0..count {
            let question = Question::parse(&mut self.dec)?;
            self.m.questions.push(question);
        }

        Ok(())
    }

    fn read_records(&mut self, count: u16, section: RecordSection) -> Result<()> {
        let capacity = self.capacity(count, MIN_RECORD_LEN);
        let records = match section {
            RecordSection::Answers => &mut self.m.answers,
            RecordSection::Authorities => &mut self.m.authorities,
            RecordSection::Additionals => &mut self.m.additionals,
        };
        records.reserve_exact(capacity);

        for _ in 0..count {
            records.push(Record::parse(&mut self.dec, self.registry)?);
        }

        Ok(())
    }
}

impl Message {
    /// Decodes a message using the built-in record types.
    pub fn from_slice(buf: &[u8]) -> Result<Message> {
        Message::from_slice_with(buf, Registry::global())
    }

    /// Decodes a message using the record types in `registry`. Types it does
    /// not know decode as [`Resource::Unknown`].
    pub fn from_slice_with(buf: &[u8], registry: &Registry) -> Result<Message> {
        MessageParser::new(buf, registry).parse()
    }

    /// Builds a recursive query for one name, with a random id.
    pub fn query(domain: &str, r#type: Type) -> Message {
        let mut m = Message {
            id: id(),
            rd: true,
            ..Default::default()
        };
        m.add_question(domain, r#type, Class::Internet);
        m
    }

    /// Adds a question. `domain` is made fully qualified if it is not already.
    pub fn add_question(&mut self, domain: &str, r#type: Type, class: Class) {
        self.questions.push(Question {
            name: crate::name::fqdn(domain),
            r#type: r#type as u16,
            class: class as u16,
        });
    }

    /// Returns the EDNS(0) extension, read from the first OPT record in the
    /// additional section.
    pub fn extension(&self) -> Option<Extension> {
        self.additionals.iter().find_map(Extension::from_record)
    }

    /// Replaces any OPT records in the additional section with `ext`, or
    /// removes them if `ext` is None.
    pub fn set_extension(&mut self, ext: Option<Extension>) {
        self.additionals
            .retain(|r| !matches!(r.resource, Resource::OPT(_)));

        if let Some(ext) = ext {
            self.additionals.push(ext.to_record());
        }
    }

    /// Returns this DNS Message as a Vec<u8> ready to be sent, as defined by
    /// [rfc1035](https://datatracker.ietf.org/doc/html/rfc1035), with names
    /// compressed.
    pub fn to_vec(&self) -> Result<Vec<u8>> {
        self.pack(true)
    }

    /// Encodes this message, failing if it would be longer than the largest
    /// message DNS can carry.
    pub fn pack(&self, compress: bool) -> Result<Vec<u8>> {
        self.pack_with_limit(compress, MAX_MESSAGE_SIZE)
    }

    /// Encodes this message, failing with [`crate::Error::BufferTooSmall`] if
    /// it would be longer than `limit` bytes.
    pub fn pack_with_limit(&self, compress: bool, limit: usize) -> Result<Vec<u8>> {
        let len = self.packed_len(compress)?;

        let mut enc = Encoder::new(len, limit);
        self.emit(&mut enc, compress)?;
        let buf = enc.into_bytes();

        if log_enabled!(Level::Trace) {
            trace!("packed {} byte message:\n{}", buf.len(), hexdump(&buf));
        }

        Ok(buf)
    }

    /// Returns the exact length this message would be packed to.
    pub fn packed_len(&self, compress: bool) -> Result<usize> {
        let mut enc = Encoder::measure();
        self.emit(&mut enc, compress)?;
        Ok(enc.offset())
    }

    fn emit(&self, enc: &mut Encoder, compress: bool) -> Result<()> {
        enc.write_u16(self.id)?;

        let mut b = 0_u8;
        b |= if self.qr.to_bool() { 0b1000_0000 } else { 0 };
        b |= (self.opcode << 3) & 0b0111_1000;
        b |= if self.aa { 0b0000_0100 } else { 0 };
        b |= if self.tc { 0b0000_0010 } else { 0 };
        b |= if self.rd { 0b0000_0001 } else { 0 };
        enc.write_u8(b)?;

        let mut b = 0_u8;
        b |= if self.ra { 0b1000_0000 } else { 0 };
        b |= if self.z { 0b0100_0000 } else { 0 };
        b |= if self.ad { 0b0010_0000 } else { 0 };
        b |= if self.cd { 0b0001_0000 } else { 0 };
        b |= self.rcode & 0b0000_1111;
        enc.write_u8(b)?;

        enc.write_u16(count("questions", self.questions.len())?)?;
        enc.write_u16(count("answers", self.answers.len())?)?;
        enc.write_u16(count("authorities", self.authorities.len())?)?;
        enc.write_u16(count("additionals", self.additionals.len())?)?;

        for question in &self.questions {
            question.emit(enc, compress)?;
        }

        for record in self
            .answers
            .iter()
            .chain(&self.authorities)
            .chain(&self.additionals)
        {
            record.emit(enc, compress)?;
        }

        Ok(())
    }
}

/// Returns a section's length as a header count.
fn count(section: &'static str, len: usize) -> Result<u16> {
    match u16::try_from(len) {
        Ok(count) => Ok(count),
        Err(_) => format_error!(section, 4, "{} entries do not fit in a header count", len),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::{MX, TXT};
    use crate::Error;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn example_response() -> Message {
        let mut m = Message {
            id: 0xbeef,
            qr: QR::Response,
            rd: true,
            ra: true,
            ..Default::default()
        };
        m.add_question("example.com.", Type::MX, Class::Internet);

        for (preference, exchange) in &[(10, "mx1.example.com."), (20, "mx2.example.com.")] {
            m.answers.push(Record {
                name: "example.com.".to_string(),
                class: Class::Internet as u16,
                ttl: Duration::from_secs(3600),
                resource: Resource::MX(MX {
                    preference: *preference,
                    exchange: exchange.to_string(),
                }),
            });
        }
        m.additionals.push(Record {
            name: "mx1.example.com.".to_string(),
            class: Class::Internet as u16,
            ttl: Duration::from_secs(3600),
            resource: Resource::TXT(TXT::from("hello")),
        });
        m
    }

    #[test_env_log::test]
    fn test_header() {
        let m = Message {
            id: 0x1234,
            qr: QR::Response,
            opcode: Opcode::Update as u8,
            aa: true,
            tc: true,
            rd: true,
            ra: true,
            z: false,
            ad: true,
            cd: true,
            rcode: Rcode::NXDomain as u8,
            ..Default::default()
        };

        let wire = m.pack(false).unwrap();
        assert_eq!(hex::encode(&wire), "1234afb30000000000000000");
        assert_eq!(Message::from_slice(&wire).unwrap(), m);
    }

    #[test_env_log::test]
    fn test_round_trip() {
        let m = example_response();

        let plain = m.pack(false).unwrap();
        let compressed = m.pack(true).unwrap();
        assert!(compressed.len() < plain.len());

        assert_eq!(Message::from_slice(&plain).unwrap(), m);
        assert_eq!(Message::from_slice(&compressed).unwrap(), m);

        assert_eq!(m.packed_len(false).unwrap(), plain.len());
        assert_eq!(m.packed_len(true).unwrap(), compressed.len());
    }

    #[test_env_log::test]
    fn test_pack_with_limit() {
        let m = example_response();
        let len = m.packed_len(true).unwrap();

        assert!(m.pack_with_limit(true, len).is_ok());
        assert!(matches!(
            m.pack_with_limit(true, len - 1),
            Err(Error::BufferTooSmall { .. })
        ));
    }

    #[test_env_log::test]
    fn test_trailing_bytes() {
        let mut wire = Message::default().pack(false).unwrap();
        wire.push(0);
        assert!(Message::from_slice(&wire).unwrap_err().is_format());
    }

    #[test_env_log::test]
    fn test_unassigned_opcode_and_rcode() {
        // Opcode 3 and rcode 12 are unassigned, but still decode so a server
        // can answer them.
        let wire = hex::decode("abcd180c0000000000000000").unwrap();
        let m = Message::from_slice(&wire).unwrap();
        assert_eq!(m.id, 0xabcd);
        assert_eq!(m.opcode, 3);
        assert_eq!(m.rcode, 12);
        assert_eq!(m.pack(false).unwrap(), wire);

        // Every 4 bit value survives.
        for code in 0..16 {
            let m = Message {
                opcode: code,
                rcode: code,
                ..Default::default()
            };
            let got = Message::from_slice(&m.pack(false).unwrap()).unwrap();
            assert_eq!(got, m);
        }
    }

    #[test_env_log::test]
    fn test_huge_counts_with_no_data() {
        let wire = hex::decode("0000000000000000ffffffff").unwrap();
        assert!(matches!(
            Message::from_slice(&wire),
            Err(Error::BufferTooSmall { .. })
        ));
    }

    #[test_env_log::test]
    fn test_query() {
        let m = Message::query("example.com", Type::AAAA);
        assert!(m.rd);
        assert_eq!(
            m.questions,
            vec![Question {
                name: "example.com.".to_string(),
                r#type: 28,
                class: 1,
            }]
        );
    }

    #[test_env_log::test]
    fn test_set_extension() {
        let mut m = example_response();
        assert_eq!(m.extension(), None);

        let ext = Extension {
            payload_size: 1232,
            dnssec_ok: true,
            ..Default::default()
        };
        m.set_extension(Some(ext.clone()));
        m.set_extension(Some(ext.clone()));
        assert_eq!(m.additionals.len(), 2);

        let got = Message::from_slice(&m.to_vec().unwrap()).unwrap();
        assert_eq!(got.extension(), Some(ext));

        m.set_extension(None);
        assert_eq!(m.additionals.len(), 1);
    }
}
