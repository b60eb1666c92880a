//! Domain names on the wire, with message compression (RFC 1035 section 4.1.4).
//!
//! Names are handled in their textual form, for example `www.example.com.`.
//! Inside a label a literal `.` or `\` is written as `\.` or `\\`, and any
//! byte may be written as `\DDD` (three decimal digits). Octets above 0x7f
//! must be escaped, everything else may appear as itself. Escapes only exist
//! in the text, on the wire every label is a length and its raw octets.
//!
//! Decoding produces the shortest of these forms, so a decoded name packs
//! back to the same octets and decodes to the same text.

use crate::io::{Decoder, Encoder};
use crate::Error;
use crate::Result;
use log::trace;

// Restricts the length of a domain label to 63 characters. [RFC1034]
pub const MAX_LABEL_LEN: usize = 63;

/// Maximum length of a name on the wire, including the length octets.
pub const MAX_NAME_LEN: usize = 255;

/// Maximum number of compression pointers followed while reading one name.
pub const MAX_POINTERS: usize = 10;

/// Pointers are 14 bits, so suffixes written beyond this are never recorded.
pub const MAX_COMPRESSION_OFFSET: usize = 1 << 14;

/// Returns true if `name` ends with an unescaped dot.
pub fn is_fqdn(name: &str) -> bool {
    let trailing = name.strip_suffix('.').map(|rest| {
        rest.bytes().rev().take_while(|b| *b == b'\\').count()
    });

    match trailing {
        Some(backslashes) => backslashes % 2 == 0,
        None => false,
    }
}

/// Returns `name` with a trailing dot added if it does not have one.
pub fn fqdn(name: &str) -> String {
    if name.is_empty() {
        ".".to_string()
    } else if is_fqdn(name) {
        name.to_string()
    } else {
        name.to_string() + "."
    }
}

/// Splits a fully qualified textual name into its raw labels. The root name
/// has no labels.
fn parse_labels(name: &str, offset: usize) -> Result<Vec<Vec<u8>>> {
    if name == "." {
        return Ok(Vec::new());
    }

    let bytes = name.as_bytes();
    let mut labels = Vec::new();
    let mut label = Vec::new();
    let mut terminated = false;
    let mut i = 0;

    while i < bytes.len() {
        terminated = false;
        match bytes[i] {
            b'\\' => {
                let digits = bytes.get(i + 1..i + 4);
                match digits {
                    Some(d) if d.iter().all(u8::is_ascii_digit) => {
                        let v = d
                            .iter()
                            .fold(0_u16, |acc, b| acc * 10 + u16::from(b - b'0'));
                        if v > 255 {
                            format_error!("name", offset, "invalid escape \\{} in '{}'", v, name);
                        }
                        label.push(v as u8);
                        i += 4;
                    }
                    _ => match bytes.get(i + 1) {
                        Some(b) => {
                            label.push(*b);
                            i += 2;
                        }
                        None => format_error!("name", offset, "trailing backslash in '{}'", name),
                    },
                }
            }
            b'.' => {
                if label.is_empty() {
                    format_error!("name", offset, "empty label in '{}'", name);
                }
                if label.len() > MAX_LABEL_LEN {
                    format_error!(
                        "name",
                        offset,
                        "label longer than {} octets in '{}'",
                        MAX_LABEL_LEN,
                        name
                    );
                }
                labels.push(std::mem::take(&mut label));
                terminated = true;
                i += 1;
            }
            b if b.is_ascii() => {
                label.push(b);
                i += 1;
            }
            b => format_error!(
                "name",
                offset,
                "octet {:#04x} must be escaped as \\{:03} in '{}'",
                b,
                b,
                name
            ),
        }
    }

    if !terminated {
        format_error!("name", offset, "name must be fully qualified: '{}'", name);
    }

    Ok(labels)
}

/// Appends `label` to `out`, escaping only what [`parse_labels`] would not
/// read back as the same octets.
fn escape_label(label: &[u8], out: &mut String) {
    for &b in label {
        match b {
            b'.' | b'\\' => {
                out.push('\\');
                out.push(b as char);
            }
            0x00..=0x7f => out.push(b as char),
            _ => out.push_str(&format!("\\{:03}", b)),
        }
    }
}

/// Text form of a run of labels, used as the compression table key.
fn suffix_key(labels: &[Vec<u8>]) -> String {
    let mut key = String::new();
    for label in labels {
        escape_label(label, &mut key);
        key.push('.');
    }
    key
}

/// Writes `name` at the encoder's current offset.
///
/// Every suffix written is recorded in the encoder's compression table (if
/// it is still addressable by a pointer), so later names can refer to it.
/// Only when `compress` is true is a known suffix replaced by a pointer.
pub(crate) fn pack(name: &str, enc: &mut Encoder, compress: bool) -> Result<()> {
    let labels = parse_labels(name, enc.offset())?;

    let wire_len = labels.iter().map(|l| l.len() + 1).sum::<usize>() + 1;
    if wire_len > MAX_NAME_LEN {
        format_error!(
            "name",
            enc.offset(),
            "'{}' is {} octets, longer than {}",
            name,
            wire_len,
            MAX_NAME_LEN
        );
    }

    for (i, label) in labels.iter().enumerate() {
        let suffix = suffix_key(&labels[i..]);
        let offset = enc.offset();

        match enc.compression().get(&suffix).copied() {
            Some(pointer) if compress => {
                trace!("compressed '{}' at {} to pointer {}", suffix, offset, pointer);
                return enc.write_u16(0xC000 | pointer as u16);
            }
            Some(_) => {}
            None => {
                if offset < MAX_COMPRESSION_OFFSET {
                    enc.compression().insert(suffix, offset);
                }
            }
        }

        enc.write_u8(label.len() as u8)?;
        enc.write_bytes(label)?;
    }

    enc.write_u8(0)
}

/// Reads a name at the decoder's current offset.
///
/// Afterwards the decoder sits just past the name as written at this
/// position, which is after the first pointer if the name was compressed.
pub(crate) fn unpack(dec: &mut Decoder) -> Result<String> {
    let buf = dec.buffer();
    let start = dec.offset();

    // Until the first pointer, the name must stay inside the current bound
    // (the record's RDATA). After a jump it may be anywhere in the message.
    let mut end = dec.end();
    let mut offset = start;
    let mut resume = None;
    let mut hops = 0;

    let mut name = String::new();
    let mut wire_len = 1;

    loop {
        if offset >= end {
            return Err(Error::BufferTooSmall {
                offset,
                needed: 1,
                available: 0,
            });
        }

        let len = buf[offset];
        offset += 1;

        match len & 0xC0 {
            0x00 => {
                if len == 0 {
                    break;
                }

                let len = len as usize;
                if offset + len > end {
                    return Err(Error::BufferTooSmall {
                        offset,
                        needed: len,
                        available: end - offset,
                    });
                }

                wire_len += len + 1;
                if wire_len > MAX_NAME_LEN {
                    format_error!("name", start, "name longer than {} octets", MAX_NAME_LEN);
                }

                escape_label(&buf[offset..offset + len], &mut name);
                name.push('.');
                offset += len;
            }

            0xC0 => {
                if offset >= end {
                    return Err(Error::BufferTooSmall {
                        offset,
                        needed: 1,
                        available: 0,
                    });
                }

                let pointer = (usize::from(len & 0x3F) << 8) | usize::from(buf[offset]);
                offset += 1;

                if resume.is_none() {
                    resume = Some(offset);
                    end = buf.len();
                }

                hops += 1;
                if hops > MAX_POINTERS {
                    return Err(Error::Loop { offset: start });
                }

                offset = pointer;
            }

            // 0x40 and 0x80 are reserved.
            _ => format_error!(
                "name",
                offset - 1,
                "illegal label type {:#04b}",
                len >> 6
            ),
        }
    }

    dec.set_offset(resume.unwrap_or(offset));

    if name.is_empty() {
        name.push('.'); // Root domain
    }
    Ok(name)
}
