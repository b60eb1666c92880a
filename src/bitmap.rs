//! Bitmaps of type codes (NSEC, NSEC3) and of ports (WKS).

use crate::io::{Decoder, Encoder};
use crate::Result;
use std::collections::{BTreeMap, BTreeSet};

/// Maximum length of one type bitmap window, enough for 256 types.
const MAX_WINDOW_LEN: usize = 32;

/// Sets the bit for `code` in `bitmap`, growing it as needed.
fn set_bit(bitmap: &mut Vec<u8>, code: u16) {
    let index = usize::from(code / 8);
    if bitmap.len() < index + 1 {
        bitmap.resize(index + 1, 0);
    }
    bitmap[index] |= 0b1000_0000_u8 >> (code % 8);
}

/// Calls `f` with `base + n` for every bit n set in `bitmap`.
fn for_each_bit(bitmap: &[u8], base: u32, mut f: impl FnMut(u32)) {
    for (i, byte) in bitmap.iter().enumerate() {
        for bit in 0..8 {
            if byte & (0b1000_0000_u8 >> bit) != 0 {
                f(base + (i as u32) * 8 + bit);
            }
        }
    }
}

/// Writes the type bitmap described in RFC 4034 section 4.1.2.
///
/// The type space is split into 256 windows of 256 types. Only windows with
/// at least one type are written, each as its number, its length, and just
/// enough octets to reach its highest type.
pub(crate) fn pack_types(types: &BTreeSet<u16>, enc: &mut Encoder) -> Result<()> {
    let mut windows: BTreeMap<u8, Vec<u8>> = BTreeMap::new();

    for code in types {
        let window = (code >> 8) as u8;
        set_bit(windows.entry(window).or_default(), code & 0x00FF);
    }

    for (window, bitmap) in windows {
        enc.write_u8(window)?;
        enc.write_u8(bitmap.len() as u8)?;
        enc.write_bytes(&bitmap)?;
    }

    Ok(())
}

/// Reads a type bitmap spanning the rest of the record.
pub(crate) fn unpack_types(dec: &mut Decoder) -> Result<BTreeSet<u16>> {
    let mut types = BTreeSet::new();

    while dec.remaining() > 0 {
        let offset = dec.offset();
        let window = dec.read_u8()?;
        let len = usize::from(dec.read_u8()?);

        if len == 0 || len > MAX_WINDOW_LEN {
            format_error!(
                "type bitmap",
                offset,
                "window {} has length {}, must be 1 to {}",
                window,
                len,
                MAX_WINDOW_LEN
            );
        }

        let bitmap = dec.read_bytes(len)?;
        for_each_bit(bitmap, u32::from(window) << 8, |code| {
            types.insert(code as u16);
        });
    }

    Ok(types)
}

/// Writes a WKS port bitmap. Bit n of the map is port n.
pub(crate) fn pack_services(ports: &BTreeSet<u16>, enc: &mut Encoder) -> Result<()> {
    let mut bitmap = Vec::new();
    for port in ports {
        set_bit(&mut bitmap, *port);
    }
    enc.write_bytes(&bitmap)
}

/// Reads a WKS port bitmap spanning the rest of the record.
pub(crate) fn unpack_services(dec: &mut Decoder) -> Result<BTreeSet<u16>> {
    let offset = dec.offset();
    let bitmap = dec.read_rest()?;

    // 65536 ports fit in 8192 octets.
    if bitmap.len() > 8192 {
        format_error!("service bitmap", offset, "{} octets is too long", bitmap.len());
    }

    let mut ports = BTreeSet::new();
    for_each_bit(bitmap, 0, |port| {
        ports.insert(port as u16);
    });
    Ok(ports)
}
