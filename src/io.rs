//! Bounded readers and writers over DNS message buffers.

use crate::Error;
use crate::Result;
use byteorder::{ByteOrder, BE};
use std::collections::HashMap;
use std::net::{Ipv4Addr, Ipv6Addr};

/// Largest message that can be carried by DNS (the TCP length prefix is 16 bits).
pub const MAX_MESSAGE_SIZE: usize = u16::MAX as usize;

/// Reads big-endian fields out of a message.
///
/// The decoder always holds the whole message, as compression pointers may
/// refer to any earlier byte. Reads are additionally bounded by `end`, which
/// is narrowed to the end of the RDATA while a record payload is parsed.
pub(crate) struct Decoder<'a> {
    buf: &'a [u8],
    offset: usize,
    end: usize,
}

impl<'a> Decoder<'a> {
    pub fn new(buf: &'a [u8]) -> Decoder<'a> {
        Decoder {
            buf,
            offset: 0,
            end: buf.len(),
        }
    }

    /// The whole message being decoded.
    pub fn buffer(&self) -> &'a [u8] {
        self.buf
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn set_offset(&mut self, offset: usize) {
        self.offset = offset;
    }

    pub fn end(&self) -> usize {
        self.end
    }

    /// Bounds all following reads to `end`, returning the previous bound so
    /// it can be restored with another call.
    pub fn limit(&mut self, end: usize) -> usize {
        std::mem::replace(&mut self.end, end)
    }

    /// Returns the number of bytes left before the current bound.
    pub fn remaining(&self) -> usize {
        self.end.saturating_sub(self.offset)
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        if len > self.remaining() {
            return Err(Error::BufferTooSmall {
                offset: self.offset,
                needed: len,
                available: self.remaining(),
            });
        }

        let bytes = &self.buf[self.offset..self.offset + len];
        self.offset += len;
        Ok(bytes)
    }

    /// Reads everything up to the current bound.
    pub fn read_rest(&mut self) -> Result<&'a [u8]> {
        self.read_bytes(self.remaining())
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_bytes(1)?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(BE::read_u16(self.read_bytes(2)?))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(BE::read_u32(self.read_bytes(4)?))
    }

    pub fn read_ipv4(&mut self) -> Result<Ipv4Addr> {
        let b = self.read_bytes(4)?;
        Ok(Ipv4Addr::new(b[0], b[1], b[2], b[3]))
    }

    pub fn read_ipv6(&mut self) -> Result<Ipv6Addr> {
        let mut octets = [0_u8; 16];
        octets.copy_from_slice(self.read_bytes(16)?);
        Ok(Ipv6Addr::from(octets))
    }
}

/// Writes big-endian fields into a new message.
///
/// An encoder either writes into its buffer, or (when built with
/// [`Encoder::measure`]) only counts the bytes it would have written. Both
/// run exactly the same code, including name compression, which is what makes
/// the length estimate match the real output.
pub(crate) struct Encoder {
    buf: Vec<u8>,
    offset: usize,
    limit: usize,
    measure: bool,

    /// Name suffix to the offset it was first written at. Lives for one pass.
    compression: HashMap<String, usize>,
}

impl Encoder {
    /// Creates an encoder that fails with [`Error::BufferTooSmall`] once more
    /// than `limit` bytes would be written.
    pub fn new(capacity: usize, limit: usize) -> Encoder {
        Encoder {
            buf: Vec::with_capacity(capacity.min(limit)),
            offset: 0,
            limit,
            measure: false,
            compression: HashMap::new(),
        }
    }

    /// Creates an encoder that only counts bytes.
    pub fn measure() -> Encoder {
        Encoder {
            buf: Vec::new(),
            offset: 0,
            limit: usize::MAX,
            measure: true,
            compression: HashMap::new(),
        }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn compression(&mut self) -> &mut HashMap<String, usize> {
        &mut self.compression
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        if bytes.len() > self.limit.saturating_sub(self.offset) {
            return Err(Error::BufferTooSmall {
                offset: self.offset,
                needed: bytes.len(),
                available: self.limit.saturating_sub(self.offset),
            });
        }

        if !self.measure {
            self.buf.extend_from_slice(bytes);
        }
        self.offset += bytes.len();
        Ok(())
    }

    pub fn write_u8(&mut self, v: u8) -> Result<()> {
        self.write_bytes(&[v])
    }

    pub fn write_u16(&mut self, v: u16) -> Result<()> {
        self.write_bytes(&v.to_be_bytes())
    }

    pub fn write_u32(&mut self, v: u32) -> Result<()> {
        self.write_bytes(&v.to_be_bytes())
    }

    /// Writes a zero u16 to be filled in later by [`Encoder::patch_u16`],
    /// returning where it was written.
    pub fn reserve_u16(&mut self) -> Result<usize> {
        let at = self.offset;
        self.write_u16(0)?;
        Ok(at)
    }

    /// Overwrites a u16 previously written at `at`.
    pub fn patch_u16(&mut self, at: usize, v: u16) {
        if !self.measure {
            BE::write_u16(&mut self.buf[at..at + 2], v);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_decoder_bounds() {
        let buf = [0x12, 0x34, 0x56, 0x78, 0x9a];
        let mut d = Decoder::new(&buf);
        assert_eq!(d.read_u16().unwrap(), 0x1234);

        let previous = d.limit(4);
        assert_eq!(previous, 5);
        assert_eq!(d.read_u16().unwrap(), 0x5678);
        assert_eq!(
            d.read_u8(),
            Err(Error::BufferTooSmall {
                offset: 4,
                needed: 1,
                available: 0
            })
        );

        d.limit(previous);
        assert_eq!(d.read_u8().unwrap(), 0x9a);
        assert_eq!(d.remaining(), 0);
    }

    #[test]
    fn test_encoder_limit_and_patch() {
        let mut e = Encoder::new(0, 6);
        e.write_u16(0xbeef).unwrap();
        let at = e.reserve_u16().unwrap();
        e.write_u8(7).unwrap();
        e.patch_u16(at, 0x0102);

        assert!(matches!(
            e.write_u16(1),
            Err(Error::BufferTooSmall {
                offset: 5,
                needed: 2,
                available: 1
            })
        ));
        assert_eq!(e.into_bytes(), vec![0xbe, 0xef, 0x01, 0x02, 0x07]);
    }

    #[test]
    fn test_measure_counts_without_writing() {
        let mut e = Encoder::measure();
        e.write_u32(1).unwrap();
        let at = e.reserve_u16().unwrap();
        e.patch_u16(at, 99);
        assert_eq!(e.offset(), 6);
        assert!(e.into_bytes().is_empty());
    }
}
