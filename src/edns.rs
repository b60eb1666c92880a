//! EDNS(0) options and the OPT pseudo-record, as defined in [rfc6891].
//!
//! [rfc6891]: https://datatracker.ietf.org/doc/html/rfc6891

use crate::io::{Decoder, Encoder};
use crate::resource::Resource;
use crate::types::Record;
use crate::Result;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Name Server Identifier option code. See [rfc5001].
///
/// [rfc5001]: https://datatracker.ietf.org/doc/html/rfc5001
pub const NSID: u16 = 3;

/// Client Subnet option code. See [rfc7871].
///
/// [rfc7871]: https://datatracker.ietf.org/doc/html/rfc7871
pub const SUBNET: u16 = 8;

/// A single option carried in an OPT record.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EdnsOption {
    /// Name Server Identifier. Empty in a query, the server's identity in a
    /// response.
    Nsid(Vec<u8>),

    Subnet(ClientSubnet),

    /// Any other option, kept as is so it is re-encoded exactly.
    Unknown(u16, Vec<u8>),
}

/// EDNS Client Subnet option data.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ClientSubnet {
    pub source_prefix: u8,
    pub scope_prefix: u8,

    /// Only the first `source_prefix` bits are sent.
    pub address: IpAddr,
}

impl ClientSubnet {
    fn family(&self) -> u16 {
        match self.address {
            IpAddr::V4(_) => 1,
            IpAddr::V6(_) => 2,
        }
    }

    fn to_vec(&self) -> Vec<u8> {
        let octets = match self.address {
            IpAddr::V4(ip) => ip.octets().to_vec(),
            IpAddr::V6(ip) => ip.octets().to_vec(),
        };
        let len = (usize::from(self.source_prefix) + 7) / 8;

        let mut data = Vec::with_capacity(4 + len);
        data.extend_from_slice(&self.family().to_be_bytes());
        data.push(self.source_prefix);
        data.push(self.scope_prefix);
        data.extend_from_slice(&octets[..len.min(octets.len())]);
        data
    }

    /// Parses the option data. Returns None if it is not a well formed
    /// subnet, in which case the option is kept opaque instead.
    fn from_slice(data: &[u8]) -> Option<ClientSubnet> {
        if data.len() < 4 {
            return None;
        }

        let family = u16::from_be_bytes([data[0], data[1]]);
        let source_prefix = data[2];
        let scope_prefix = data[3];
        let address = &data[4..];

        if address.len() != (usize::from(source_prefix) + 7) / 8 {
            return None;
        }

        let address = match family {
            1 if source_prefix <= 32 => {
                let mut octets = [0_u8; 4];
                octets[..address.len()].copy_from_slice(address);
                IpAddr::V4(Ipv4Addr::from(octets))
            }
            2 if source_prefix <= 128 => {
                let mut octets = [0_u8; 16];
                octets[..address.len()].copy_from_slice(address);
                IpAddr::V6(Ipv6Addr::from(octets))
            }
            _ => return None,
        };

        Some(ClientSubnet {
            source_prefix,
            scope_prefix,
            address,
        })
    }
}

impl EdnsOption {
    pub fn code(&self) -> u16 {
        match self {
            EdnsOption::Nsid(_) => NSID,
            EdnsOption::Subnet(_) => SUBNET,
            EdnsOption::Unknown(code, _) => *code,
        }
    }

    fn data(&self) -> Vec<u8> {
        match self {
            EdnsOption::Nsid(data) => data.clone(),
            EdnsOption::Subnet(subnet) => subnet.to_vec(),
            EdnsOption::Unknown(_, data) => data.clone(),
        }
    }

    fn from_slice(code: u16, data: &[u8]) -> EdnsOption {
        match code {
            NSID => EdnsOption::Nsid(data.to_vec()),
            SUBNET => match ClientSubnet::from_slice(data) {
                Some(subnet) => EdnsOption::Subnet(subnet),
                None => EdnsOption::Unknown(code, data.to_vec()),
            },
            _ => EdnsOption::Unknown(code, data.to_vec()),
        }
    }
}

/// Writes each option as {code, length, data}.
pub(crate) fn pack_options(options: &[EdnsOption], enc: &mut Encoder) -> Result<()> {
    for option in options {
        let data = option.data();
        if data.len() > u16::MAX as usize {
            format_error!(
                "edns option",
                enc.offset(),
                "option {} data is {} octets",
                option.code(),
                data.len()
            );
        }

        enc.write_u16(option.code())?;
        enc.write_u16(data.len() as u16)?;
        enc.write_bytes(&data)?;
    }
    Ok(())
}

/// Reads options until the end of the record.
pub(crate) fn unpack_options(dec: &mut Decoder) -> Result<Vec<EdnsOption>> {
    let mut options = Vec::new();

    while dec.remaining() > 0 {
        let code = dec.read_u16()?;
        let len = dec.read_u16()?;
        let data = dec.read_bytes(len.into())?;

        options.push(EdnsOption::from_slice(code, data));
    }

    Ok(options)
}

/// EDNS(0) extension record as defined in [rfc2671] and [rfc6891].
///
/// This is a view of the OPT pseudo-record found in the additional section,
/// whose class and TTL fields are repurposed.
///
/// [rfc2671]: https://datatracker.ietf.org/doc/html/rfc2671
/// [rfc6891]: https://datatracker.ietf.org/doc/html/rfc6891
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Extension {
    /// Requestor's UDP payload size.
    pub payload_size: u16,

    /// Upper 8 bits of the extended 12-bit rcode.
    pub extend_rcode: u8,
    pub version: u8,

    /// DNSSEC OK bit as defined by [rfc3225].
    ///
    /// [rfc3225]: https://datatracker.ietf.org/doc/html/rfc3225
    pub dnssec_ok: bool,

    pub options: Vec<EdnsOption>,
}

impl Default for Extension {
    fn default() -> Self {
        Extension {
            payload_size: 512, // The min valid size.
            extend_rcode: 0,
            version: 0,
            dnssec_ok: false,
            options: Vec::new(),
        }
    }
}

impl Extension {
    const DNSSEC_OK: u32 = 0x8000;

    /// Reads the extension out of an OPT record. Returns None for any other
    /// record type.
    pub fn from_record(record: &Record) -> Option<Extension> {
        let options = match &record.resource {
            Resource::OPT(options) => options.clone(),
            _ => return None,
        };

        // The TTL is always written from a u32, so this only truncates
        // hand-built records.
        let ttl = record.ttl.as_secs() as u32;

        Some(Extension {
            payload_size: record.class,
            extend_rcode: (ttl >> 24) as u8,
            version: (ttl >> 16) as u8,
            dnssec_ok: ttl & Self::DNSSEC_OK != 0,
            options,
        })
    }

    /// Returns the OPT record carrying this extension.
    pub fn to_record(&self) -> Record {
        let mut ttl = u32::from(self.extend_rcode) << 24 | u32::from(self.version) << 16;
        if self.dnssec_ok {
            ttl |= Self::DNSSEC_OK;
        }

        Record {
            name: ".".to_string(),
            class: self.payload_size,
            ttl: Duration::from_secs(ttl.into()),
            resource: Resource::OPT(self.options.clone()),
        }
    }
}
