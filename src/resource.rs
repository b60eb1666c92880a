//! Typed resource record payloads, and the field tables that describe their
//! wire layout.

use crate::edns::EdnsOption;
use crate::fields::{self, Field, Value, Values};
use crate::io::{Encoder, MAX_MESSAGE_SIZE};
use crate::types::Type;
use crate::Error;
use crate::Result;
use std::collections::BTreeSet;
use std::convert::TryFrom;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

const A_FIELDS: &[Field] = &[Field::A];
const AAAA_FIELDS: &[Field] = &[Field::AAAA];
const COMPRESSED_NAME_FIELDS: &[Field] = &[Field::CompressedName];
const NAME_FIELDS: &[Field] = &[Field::Name];
const TXT_FIELDS: &[Field] = &[Field::CharStrings];
const OPT_FIELDS: &[Field] = &[Field::Options];
const DHCID_FIELDS: &[Field] = &[Field::Base64];
const OPAQUE_FIELDS: &[Field] = &[Field::Opaque];

const SOA_FIELDS: &[Field] = &[
    Field::CompressedName,
    Field::CompressedName,
    Field::U32,
    Field::U32,
    Field::U32,
    Field::U32,
    Field::U32,
];
const MX_FIELDS: &[Field] = &[Field::U16, Field::CompressedName];
const MINFO_FIELDS: &[Field] = &[Field::CompressedName, Field::CompressedName];
const PREFERENCE_NAME_FIELDS: &[Field] = &[Field::U16, Field::Name];
const TALINK_FIELDS: &[Field] = &[Field::Name, Field::Name];
const CERT_FIELDS: &[Field] = &[Field::U16, Field::U16, Field::U8, Field::Base64];
const URI_FIELDS: &[Field] = &[Field::U16, Field::U16, Field::Opaque];
const SRV_FIELDS: &[Field] = &[Field::U16, Field::U16, Field::U16, Field::Name];
const HINFO_FIELDS: &[Field] = &[Field::CharString, Field::CharString];
const NAPTR_FIELDS: &[Field] = &[
    Field::U16,
    Field::U16,
    Field::CharString,
    Field::CharString,
    Field::CharString,
    Field::Name,
];
const WKS_FIELDS: &[Field] = &[Field::A, Field::U8, Field::ServiceBitmap];
const DS_FIELDS: &[Field] = &[Field::U16, Field::U8, Field::U8, Field::Hex];
const SSHFP_FIELDS: &[Field] = &[Field::U8, Field::U8, Field::Hex];
const RRSIG_FIELDS: &[Field] = &[
    Field::U16,
    Field::U8,
    Field::U8,
    Field::U32,
    Field::U32,
    Field::U32,
    Field::U16,
    Field::Name,
    Field::Base64,
];
const NSEC_FIELDS: &[Field] = &[Field::Name, Field::TypeBitmap];
const DNSKEY_FIELDS: &[Field] = &[Field::U16, Field::U8, Field::U8, Field::Base64];
const NSEC3_FIELDS: &[Field] = &[
    Field::U8,
    Field::U8,
    Field::U16,
    Field::SizedHex,
    Field::Base32,
    Field::TypeBitmap,
];
const NSEC3PARAM_FIELDS: &[Field] = &[Field::U8, Field::U8, Field::U16, Field::SizedHex];
const TLSA_FIELDS: &[Field] = &[Field::U8, Field::U8, Field::U8, Field::Hex];
const TKEY_FIELDS: &[Field] = &[
    Field::Name,
    Field::U32,
    Field::U32,
    Field::U16,
    Field::U16,
    Field::WideHex,
    Field::WideHex,
];
const TSIG_FIELDS: &[Field] = &[
    Field::Name,
    Field::U48,
    Field::U16,
    Field::WideHex,
    Field::U16,
    Field::U16,
    Field::WideHex,
];

/// Returns the field table of a built-in record type.
pub(crate) fn builtin_fields(r#type: Type) -> Option<&'static [Field]> {
    let fields = match r#type {
        Type::A => A_FIELDS,
        Type::AAAA => AAAA_FIELDS,
        Type::NS | Type::CNAME | Type::PTR => COMPRESSED_NAME_FIELDS,
        Type::MD | Type::MF | Type::MB | Type::MG | Type::MR => COMPRESSED_NAME_FIELDS,
        Type::MINFO => MINFO_FIELDS,
        Type::RT | Type::KX => PREFERENCE_NAME_FIELDS,
        Type::TALINK => TALINK_FIELDS,
        Type::CERT => CERT_FIELDS,
        Type::URI => URI_FIELDS,
        Type::TKEY => TKEY_FIELDS,
        Type::TSIG => TSIG_FIELDS,
        Type::DNAME => NAME_FIELDS,
        Type::SOA => SOA_FIELDS,
        Type::MX => MX_FIELDS,
        Type::SRV => SRV_FIELDS,
        Type::TXT | Type::SPF => TXT_FIELDS,
        Type::HINFO => HINFO_FIELDS,
        Type::NAPTR => NAPTR_FIELDS,
        Type::WKS => WKS_FIELDS,
        Type::OPT => OPT_FIELDS,
        Type::DS | Type::TA | Type::DLV => DS_FIELDS,
        Type::SSHFP => SSHFP_FIELDS,
        Type::RRSIG => RRSIG_FIELDS,
        Type::NSEC => NSEC_FIELDS,
        Type::DNSKEY => DNSKEY_FIELDS,
        Type::DHCID => DHCID_FIELDS,
        Type::NSEC3 => NSEC3_FIELDS,
        Type::NSEC3PARAM => NSEC3PARAM_FIELDS,
        Type::TLSA => TLSA_FIELDS,

        Type::Reserved | Type::IXFR | Type::AXFR | Type::ANY => return None,
    };
    Some(fields)
}

/// The type-specific payload of a [`crate::Record`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[allow(clippy::upper_case_acronyms)]
pub enum Resource {
    A(Ipv4Addr),
    AAAA(Ipv6Addr),

    NS(String),
    CNAME(String),
    PTR(String),
    DNAME(String),
    MD(String),
    MF(String),
    MB(String),
    MG(String),
    MR(String),

    MX(MX),
    SOA(SOA),
    SRV(SRV),
    TXT(TXT),
    SPF(TXT),
    HINFO(HINFO),
    NAPTR(NAPTR),
    WKS(WKS),
    MINFO(MINFO),
    RT(RT),
    KX(KX),
    CERT(CERT),
    TALINK(TALINK),
    URI(URI),

    /// EDNS(0) options. See [`crate::Extension`] for the rest of the record.
    OPT(Vec<EdnsOption>),

    DS(DS),
    DNSKEY(DNSKEY),
    RRSIG(RRSIG),
    NSEC(NSEC),
    NSEC3(NSEC3),
    NSEC3PARAM(NSEC3PARAM),
    SSHFP(SSHFP),
    TLSA(TLSA),
    DHCID(Vec<u8>),
    TA(DS),
    DLV(DS),

    TKEY(TKEY),
    TSIG(TSIG),

    /// A type added to a [`crate::Registry`] with [`crate::RecordSpec::private`].
    Private(Private),

    /// A type not known to the registry, kept as raw RDATA.
    Unknown { r#type: u16, data: Vec<u8> },

    /// A record with no RDATA whose type normally requires some, as used by
    /// dynamic updates ([rfc2136]) to delete an RRset.
    ///
    /// [rfc2136]: https://datatracker.ietf.org/doc/html/rfc2136
    Empty(u16),
}

/// Mail exchange.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MX {
    pub preference: u16,
    pub exchange: String,
}

/// Start of a zone of authority.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SOA {
    /// The name server that was the original or primary source of data for this zone.
    pub mname: String,

    /// The mailbox of the person responsible for this zone, as a domain name
    /// (`hostmaster.example.com.` for `hostmaster@example.com`).
    pub rname: String,

    pub serial: u32,

    pub refresh: Duration,
    pub retry: Duration,
    pub expire: Duration,
    pub minimum: Duration,
}

/// Service location. See [rfc2782].
///
/// [rfc2782]: https://datatracker.ietf.org/doc/html/rfc2782
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SRV {
    pub priority: u16,
    pub weight: u16,
    pub port: u16,
    pub name: String,
}

/// One or more character strings.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TXT(pub Vec<Vec<u8>>);

impl From<&str> for TXT {
    fn from(txt: &str) -> Self {
        TXT(vec![txt.as_bytes().to_vec()])
    }
}

impl From<&[&str]> for TXT {
    fn from(txts: &[&str]) -> Self {
        TXT(txts.iter().map(|txt| txt.as_bytes().to_vec()).collect())
    }
}

/// Host information.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HINFO {
    pub cpu: Vec<u8>,
    pub os: Vec<u8>,
}

/// Naming authority pointer. See [rfc3403].
///
/// [rfc3403]: https://datatracker.ietf.org/doc/html/rfc3403
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NAPTR {
    pub order: u16,
    pub preference: u16,
    pub flags: Vec<u8>,
    pub service: Vec<u8>,
    pub regexp: Vec<u8>,
    pub replacement: String,
}

/// Well known services.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WKS {
    pub address: Ipv4Addr,
    pub protocol: u8,
    pub ports: BTreeSet<u16>,
}

/// Mailbox or mail list information.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MINFO {
    /// Mailbox responsible for the mailing list.
    pub rmailbx: String,

    /// Mailbox to receive errors about the list.
    pub emailbx: String,
}

/// Route through. See [rfc1183].
///
/// [rfc1183]: https://datatracker.ietf.org/doc/html/rfc1183
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RT {
    pub preference: u16,
    pub host: String,
}

/// Key exchanger. See [rfc2230].
///
/// [rfc2230]: https://datatracker.ietf.org/doc/html/rfc2230
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KX {
    pub preference: u16,
    pub exchanger: String,
}

/// Certificate. See [rfc4398].
///
/// [rfc4398]: https://datatracker.ietf.org/doc/html/rfc4398
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CERT {
    pub cert_type: u16,
    pub key_tag: u16,
    pub algorithm: u8,
    pub certificate: Vec<u8>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TALINK {
    pub previous: String,
    pub next: String,
}

/// Uniform resource identifier. See [rfc7553].
///
/// [rfc7553]: https://datatracker.ietf.org/doc/html/rfc7553
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct URI {
    pub priority: u16,
    pub weight: u16,

    /// Runs to the end of the record, there is no length octet.
    pub target: Vec<u8>,
}

/// Delegation signer. See [rfc4034]. Also the layout of TA and DLV.
///
/// [rfc4034]: https://datatracker.ietf.org/doc/html/rfc4034
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DS {
    pub key_tag: u16,
    pub algorithm: u8,
    pub digest_type: u8,
    pub digest: Vec<u8>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DNSKEY {
    pub flags: u16,
    pub protocol: u8,
    pub algorithm: u8,
    pub public_key: Vec<u8>,
}

/// Resource record signature. The timestamps are seconds since the epoch,
/// modulo 2^32.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RRSIG {
    pub type_covered: u16,
    pub algorithm: u8,
    pub labels: u8,
    pub original_ttl: u32,
    pub expiration: u32,
    pub inception: u32,
    pub key_tag: u16,
    pub signer_name: String,
    pub signature: Vec<u8>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NSEC {
    pub next_domain: String,
    pub types: BTreeSet<u16>,
}

/// Hashed authenticated denial of existence. See [rfc5155].
///
/// [rfc5155]: https://datatracker.ietf.org/doc/html/rfc5155
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NSEC3 {
    pub hash_algorithm: u8,
    pub flags: u8,
    pub iterations: u16,
    pub salt: Vec<u8>,
    pub next_hashed: Vec<u8>,
    pub types: BTreeSet<u16>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NSEC3PARAM {
    pub hash_algorithm: u8,
    pub flags: u8,
    pub iterations: u16,
    pub salt: Vec<u8>,
}

/// SSH key fingerprint. See [rfc4255].
///
/// [rfc4255]: https://datatracker.ietf.org/doc/html/rfc4255
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SSHFP {
    pub algorithm: u8,
    pub fp_type: u8,
    pub fingerprint: Vec<u8>,
}

/// TLS certificate association. See [rfc6698].
///
/// [rfc6698]: https://datatracker.ietf.org/doc/html/rfc6698
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TLSA {
    pub usage: u8,
    pub selector: u8,
    pub matching_type: u8,
    pub data: Vec<u8>,
}

/// Transaction key. See [rfc2930].
///
/// [rfc2930]: https://datatracker.ietf.org/doc/html/rfc2930
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TKEY {
    pub algorithm: String,
    pub inception: u32,
    pub expiration: u32,
    pub mode: u16,
    pub error: u16,
    pub key: Vec<u8>,
    pub other_data: Vec<u8>,
}

/// Transaction signature. See [rfc8945].
///
/// [rfc8945]: https://datatracker.ietf.org/doc/html/rfc8945
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TSIG {
    pub algorithm: String,

    /// Seconds since the epoch, 48 bits on the wire.
    pub time_signed: u64,
    pub fudge: u16,
    pub mac: Vec<u8>,
    pub original_id: u16,
    pub error: u16,
    pub other_data: Vec<u8>,
}

/// A record of a type registered at runtime. It carries its own field table
/// so it can be packed without the registry.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Private {
    pub r#type: u16,
    pub mnemonic: String,
    pub fields: Vec<Field>,
    pub values: Vec<Value>,
}

impl Resource {
    /// Returns the type code of this resource.
    pub fn r#type(&self) -> u16 {
        let t = match self {
            Resource::A(_) => Type::A,
            Resource::AAAA(_) => Type::AAAA,
            Resource::NS(_) => Type::NS,
            Resource::CNAME(_) => Type::CNAME,
            Resource::PTR(_) => Type::PTR,
            Resource::DNAME(_) => Type::DNAME,
            Resource::MD(_) => Type::MD,
            Resource::MF(_) => Type::MF,
            Resource::MB(_) => Type::MB,
            Resource::MG(_) => Type::MG,
            Resource::MR(_) => Type::MR,
            Resource::MINFO(_) => Type::MINFO,
            Resource::RT(_) => Type::RT,
            Resource::KX(_) => Type::KX,
            Resource::CERT(_) => Type::CERT,
            Resource::TALINK(_) => Type::TALINK,
            Resource::URI(_) => Type::URI,
            Resource::TA(_) => Type::TA,
            Resource::DLV(_) => Type::DLV,
            Resource::TKEY(_) => Type::TKEY,
            Resource::TSIG(_) => Type::TSIG,
            Resource::MX(_) => Type::MX,
            Resource::SOA(_) => Type::SOA,
            Resource::SRV(_) => Type::SRV,
            Resource::TXT(_) => Type::TXT,
            Resource::SPF(_) => Type::SPF,
            Resource::HINFO(_) => Type::HINFO,
            Resource::NAPTR(_) => Type::NAPTR,
            Resource::WKS(_) => Type::WKS,
            Resource::OPT(_) => Type::OPT,
            Resource::DS(_) => Type::DS,
            Resource::DNSKEY(_) => Type::DNSKEY,
            Resource::RRSIG(_) => Type::RRSIG,
            Resource::NSEC(_) => Type::NSEC,
            Resource::NSEC3(_) => Type::NSEC3,
            Resource::NSEC3PARAM(_) => Type::NSEC3PARAM,
            Resource::SSHFP(_) => Type::SSHFP,
            Resource::TLSA(_) => Type::TLSA,
            Resource::DHCID(_) => Type::DHCID,

            Resource::Private(p) => return p.r#type,
            Resource::Unknown { r#type, .. } => return *r#type,
            Resource::Empty(r#type) => return *r#type,
        };
        t as u16
    }

    /// Returns the field table describing this resource on the wire.
    pub fn fields(&self) -> &[Field] {
        match self {
            Resource::Private(p) => &p.fields,
            Resource::Unknown { .. } => OPAQUE_FIELDS,
            Resource::Empty(_) => &[],
            _ => match num_traits::FromPrimitive::from_u16(self.r#type()) {
                Some(t) => builtin_fields(t).unwrap_or(&[]),
                None => &[],
            },
        }
    }

    /// Returns the field values, in the order of [`Resource::fields`].
    pub fn values(&self) -> Vec<Value> {
        let name = |n: &String| Value::Name(n.clone());
        // Timers past u32::MAX saturate.
        let secs = |d: &Duration| Value::U32(u32::try_from(d.as_secs()).unwrap_or(u32::MAX));

        match self {
            Resource::A(ip) => vec![Value::A(*ip)],
            Resource::AAAA(ip) => vec![Value::AAAA(*ip)],

            Resource::NS(n)
            | Resource::CNAME(n)
            | Resource::PTR(n)
            | Resource::DNAME(n)
            | Resource::MD(n)
            | Resource::MF(n)
            | Resource::MB(n)
            | Resource::MG(n)
            | Resource::MR(n) => vec![name(n)],
            Resource::MINFO(m) => vec![name(&m.rmailbx), name(&m.emailbx)],
            Resource::RT(rt) => vec![Value::U16(rt.preference), name(&rt.host)],
            Resource::KX(kx) => vec![Value::U16(kx.preference), name(&kx.exchanger)],
            Resource::CERT(cert) => vec![
                Value::U16(cert.cert_type),
                Value::U16(cert.key_tag),
                Value::U8(cert.algorithm),
                Value::Bytes(cert.certificate.clone()),
            ],
            Resource::TALINK(t) => vec![name(&t.previous), name(&t.next)],
            Resource::URI(uri) => vec![
                Value::U16(uri.priority),
                Value::U16(uri.weight),
                Value::Bytes(uri.target.clone()),
            ],

            Resource::MX(mx) => vec![Value::U16(mx.preference), name(&mx.exchange)],
            Resource::SOA(soa) => vec![
                name(&soa.mname),
                name(&soa.rname),
                Value::U32(soa.serial),
                secs(&soa.refresh),
                secs(&soa.retry),
                secs(&soa.expire),
                secs(&soa.minimum),
            ],
            Resource::SRV(srv) => vec![
                Value::U16(srv.priority),
                Value::U16(srv.weight),
                Value::U16(srv.port),
                name(&srv.name),
            ],
            Resource::TXT(txt) | Resource::SPF(txt) => vec![Value::Texts(txt.0.clone())],
            Resource::HINFO(h) => vec![Value::Text(h.cpu.clone()), Value::Text(h.os.clone())],
            Resource::NAPTR(n) => vec![
                Value::U16(n.order),
                Value::U16(n.preference),
                Value::Text(n.flags.clone()),
                Value::Text(n.service.clone()),
                Value::Text(n.regexp.clone()),
                name(&n.replacement),
            ],
            Resource::WKS(w) => vec![
                Value::A(w.address),
                Value::U8(w.protocol),
                Value::Types(w.ports.clone()),
            ],
            Resource::OPT(options) => vec![Value::Options(options.clone())],

            Resource::DS(ds) | Resource::TA(ds) | Resource::DLV(ds) => vec![
                Value::U16(ds.key_tag),
                Value::U8(ds.algorithm),
                Value::U8(ds.digest_type),
                Value::Bytes(ds.digest.clone()),
            ],
            Resource::DNSKEY(key) => vec![
                Value::U16(key.flags),
                Value::U8(key.protocol),
                Value::U8(key.algorithm),
                Value::Bytes(key.public_key.clone()),
            ],
            Resource::RRSIG(sig) => vec![
                Value::U16(sig.type_covered),
                Value::U8(sig.algorithm),
                Value::U8(sig.labels),
                Value::U32(sig.original_ttl),
                Value::U32(sig.expiration),
                Value::U32(sig.inception),
                Value::U16(sig.key_tag),
                name(&sig.signer_name),
                Value::Bytes(sig.signature.clone()),
            ],
            Resource::NSEC(nsec) => vec![name(&nsec.next_domain), Value::Types(nsec.types.clone())],
            Resource::NSEC3(nsec3) => vec![
                Value::U8(nsec3.hash_algorithm),
                Value::U8(nsec3.flags),
                Value::U16(nsec3.iterations),
                Value::Bytes(nsec3.salt.clone()),
                Value::Bytes(nsec3.next_hashed.clone()),
                Value::Types(nsec3.types.clone()),
            ],
            Resource::NSEC3PARAM(p) => vec![
                Value::U8(p.hash_algorithm),
                Value::U8(p.flags),
                Value::U16(p.iterations),
                Value::Bytes(p.salt.clone()),
            ],
            Resource::SSHFP(fp) => vec![
                Value::U8(fp.algorithm),
                Value::U8(fp.fp_type),
                Value::Bytes(fp.fingerprint.clone()),
            ],
            Resource::TLSA(t) => vec![
                Value::U8(t.usage),
                Value::U8(t.selector),
                Value::U8(t.matching_type),
                Value::Bytes(t.data.clone()),
            ],
            Resource::DHCID(data) => vec![Value::Bytes(data.clone())],
            Resource::TKEY(key) => vec![
                name(&key.algorithm),
                Value::U32(key.inception),
                Value::U32(key.expiration),
                Value::U16(key.mode),
                Value::U16(key.error),
                Value::Bytes(key.key.clone()),
                Value::Bytes(key.other_data.clone()),
            ],
            Resource::TSIG(sig) => vec![
                name(&sig.algorithm),
                Value::U64(sig.time_signed),
                Value::U16(sig.fudge),
                Value::Bytes(sig.mac.clone()),
                Value::U16(sig.original_id),
                Value::U16(sig.error),
                Value::Bytes(sig.other_data.clone()),
            ],

            Resource::Private(p) => p.values.clone(),
            Resource::Unknown { data, .. } => vec![Value::Bytes(data.clone())],
            Resource::Empty(_) => Vec::new(),
        }
    }

    /// Builds a built-in resource from values decoded with its field table.
    pub fn from_values(r#type: u16, values: Vec<Value>) -> Result<Resource> {
        let t = match num_traits::FromPrimitive::from_u16(r#type) {
            Some(t) => t,
            None => {
                return Err(Error::UnknownTag(format!(
                    "type {} is not a built-in type",
                    r#type
                )))
            }
        };

        let mut v = Values::new(values);
        let secs = |s: u32| Duration::from_secs(s.into());

        let resource = match t {
            Type::A => Resource::A(v.a()?),
            Type::AAAA => Resource::AAAA(v.aaaa()?),
            Type::NS => Resource::NS(v.name()?),
            Type::CNAME => Resource::CNAME(v.name()?),
            Type::PTR => Resource::PTR(v.name()?),
            Type::DNAME => Resource::DNAME(v.name()?),
            Type::MD => Resource::MD(v.name()?),
            Type::MF => Resource::MF(v.name()?),
            Type::MB => Resource::MB(v.name()?),
            Type::MG => Resource::MG(v.name()?),
            Type::MR => Resource::MR(v.name()?),
            Type::MINFO => Resource::MINFO(MINFO {
                rmailbx: v.name()?,
                emailbx: v.name()?,
            }),
            Type::RT => Resource::RT(RT {
                preference: v.u16()?,
                host: v.name()?,
            }),
            Type::KX => Resource::KX(KX {
                preference: v.u16()?,
                exchanger: v.name()?,
            }),
            Type::CERT => Resource::CERT(CERT {
                cert_type: v.u16()?,
                key_tag: v.u16()?,
                algorithm: v.u8()?,
                certificate: v.bytes()?,
            }),
            Type::TALINK => Resource::TALINK(TALINK {
                previous: v.name()?,
                next: v.name()?,
            }),
            Type::URI => Resource::URI(URI {
                priority: v.u16()?,
                weight: v.u16()?,
                target: v.bytes()?,
            }),

            Type::MX => Resource::MX(MX {
                preference: v.u16()?,
                exchange: v.name()?,
            }),
            Type::SOA => Resource::SOA(SOA {
                mname: v.name()?,
                rname: v.name()?,
                serial: v.u32()?,
                refresh: secs(v.u32()?),
                retry: secs(v.u32()?),
                expire: secs(v.u32()?),
                minimum: secs(v.u32()?),
            }),
            Type::SRV => Resource::SRV(SRV {
                priority: v.u16()?,
                weight: v.u16()?,
                port: v.u16()?,
                name: v.name()?,
            }),
            Type::TXT => Resource::TXT(TXT(v.texts()?)),
            Type::SPF => Resource::SPF(TXT(v.texts()?)),
            Type::HINFO => Resource::HINFO(HINFO {
                cpu: v.text()?,
                os: v.text()?,
            }),
            Type::NAPTR => Resource::NAPTR(NAPTR {
                order: v.u16()?,
                preference: v.u16()?,
                flags: v.text()?,
                service: v.text()?,
                regexp: v.text()?,
                replacement: v.name()?,
            }),
            Type::WKS => Resource::WKS(WKS {
                address: v.a()?,
                protocol: v.u8()?,
                ports: v.types()?,
            }),
            Type::OPT => Resource::OPT(v.options()?),

            Type::DS => Resource::DS(ds(&mut v)?),
            Type::TA => Resource::TA(ds(&mut v)?),
            Type::DLV => Resource::DLV(ds(&mut v)?),
            Type::DNSKEY => Resource::DNSKEY(DNSKEY {
                flags: v.u16()?,
                protocol: v.u8()?,
                algorithm: v.u8()?,
                public_key: v.bytes()?,
            }),
            Type::RRSIG => Resource::RRSIG(RRSIG {
                type_covered: v.u16()?,
                algorithm: v.u8()?,
                labels: v.u8()?,
                original_ttl: v.u32()?,
                expiration: v.u32()?,
                inception: v.u32()?,
                key_tag: v.u16()?,
                signer_name: v.name()?,
                signature: v.bytes()?,
            }),
            Type::NSEC => Resource::NSEC(NSEC {
                next_domain: v.name()?,
                types: v.types()?,
            }),
            Type::NSEC3 => Resource::NSEC3(NSEC3 {
                hash_algorithm: v.u8()?,
                flags: v.u8()?,
                iterations: v.u16()?,
                salt: v.bytes()?,
                next_hashed: v.bytes()?,
                types: v.types()?,
            }),
            Type::NSEC3PARAM => Resource::NSEC3PARAM(NSEC3PARAM {
                hash_algorithm: v.u8()?,
                flags: v.u8()?,
                iterations: v.u16()?,
                salt: v.bytes()?,
            }),
            Type::SSHFP => Resource::SSHFP(SSHFP {
                algorithm: v.u8()?,
                fp_type: v.u8()?,
                fingerprint: v.bytes()?,
            }),
            Type::TLSA => Resource::TLSA(TLSA {
                usage: v.u8()?,
                selector: v.u8()?,
                matching_type: v.u8()?,
                data: v.bytes()?,
            }),
            Type::DHCID => Resource::DHCID(v.bytes()?),
            Type::TKEY => Resource::TKEY(TKEY {
                algorithm: v.name()?,
                inception: v.u32()?,
                expiration: v.u32()?,
                mode: v.u16()?,
                error: v.u16()?,
                key: v.bytes()?,
                other_data: v.bytes()?,
            }),
            Type::TSIG => Resource::TSIG(TSIG {
                algorithm: v.name()?,
                time_signed: v.u64()?,
                fudge: v.u16()?,
                mac: v.bytes()?,
                original_id: v.u16()?,
                error: v.u16()?,
                other_data: v.bytes()?,
            }),

            Type::Reserved | Type::IXFR | Type::AXFR | Type::ANY => {
                return Err(Error::UnknownTag(format!("{} has no record layout", t)))
            }
        };

        Ok(resource)
    }

    /// Writes the RDATA.
    pub(crate) fn emit(&self, enc: &mut Encoder, compress: bool) -> Result<()> {
        fields::pack(self.fields(), &self.values(), enc, compress)
    }

    /// Returns the uncompressed RDATA.
    pub fn rdata(&self) -> Result<Vec<u8>> {
        let mut enc = Encoder::new(0, MAX_MESSAGE_SIZE);
        self.emit(&mut enc, false)?;
        Ok(enc.into_bytes())
    }
}

fn ds(v: &mut Values) -> Result<DS> {
    Ok(DS {
        key_tag: v.u16()?,
        algorithm: v.u8()?,
        digest_type: v.u8()?,
        digest: v.bytes()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::Decoder;
    use pretty_assertions::assert_eq;

    fn round_trip(resource: Resource) {
        let rdata = resource.rdata().unwrap();
        let mut dec = Decoder::new(&rdata);
        let values = fields::unpack(resource.fields(), &mut dec).unwrap();
        assert_eq!(dec.remaining(), 0, "{:?} left bytes behind", resource);

        let got = Resource::from_values(resource.r#type(), values).unwrap();
        assert_eq!(got, resource);
    }

    #[test]
    fn test_builtin_round_trip() {
        let types: BTreeSet<u16> = [1, 2, 46, 47].iter().copied().collect();

        round_trip(Resource::A("192.0.2.1".parse().unwrap()));
        round_trip(Resource::DNAME("example.net.".to_string()));
        round_trip(Resource::SOA(SOA {
            mname: "ns1.example.com.".to_string(),
            rname: "hostmaster.example.com.".to_string(),
            serial: 2021061200,
            refresh: Duration::from_secs(7200),
            retry: Duration::from_secs(3600),
            expire: Duration::from_secs(1209600),
            minimum: Duration::from_secs(300),
        }));
        round_trip(Resource::HINFO(HINFO {
            cpu: b"x86".to_vec(),
            os: b"linux".to_vec(),
        }));
        round_trip(Resource::NAPTR(NAPTR {
            order: 100,
            preference: 10,
            flags: b"U".to_vec(),
            service: b"E2U+sip".to_vec(),
            regexp: b"!^.*$!sip:info@example.com!".to_vec(),
            replacement: ".".to_string(),
        }));
        round_trip(Resource::WKS(WKS {
            address: "192.0.2.1".parse().unwrap(),
            protocol: 6,
            ports: [25, 80].iter().copied().collect(),
        }));
        round_trip(Resource::RRSIG(RRSIG {
            type_covered: 1,
            algorithm: 8,
            labels: 2,
            original_ttl: 3600,
            expiration: 1_700_000_000,
            inception: 1_690_000_000,
            key_tag: 12345,
            signer_name: "example.com.".to_string(),
            signature: vec![1, 2, 3, 4],
        }));
        round_trip(Resource::NSEC(NSEC {
            next_domain: "b.example.com.".to_string(),
            types: types.clone(),
        }));
        round_trip(Resource::NSEC3(NSEC3 {
            hash_algorithm: 1,
            flags: 0,
            iterations: 10,
            salt: vec![0xaa, 0xbb],
            next_hashed: vec![7; 20],
            types,
        }));
        round_trip(Resource::TLSA(TLSA {
            usage: 3,
            selector: 1,
            matching_type: 1,
            data: vec![0xde, 0xad],
        }));
        round_trip(Resource::DHCID(vec![0, 1, 2]));
    }

    #[test]
    fn test_legacy_and_meta_round_trip() {
        round_trip(Resource::MB("mailhost.example.com.".to_string()));
        round_trip(Resource::MR("new.example.com.".to_string()));
        round_trip(Resource::MINFO(MINFO {
            rmailbx: "list-request.example.com.".to_string(),
            emailbx: "owner.example.com.".to_string(),
        }));
        round_trip(Resource::RT(RT {
            preference: 10,
            host: "relay.example.com.".to_string(),
        }));
        round_trip(Resource::KX(KX {
            preference: 10,
            exchanger: "kx.example.com.".to_string(),
        }));
        round_trip(Resource::CERT(CERT {
            cert_type: 1,
            key_tag: 12345,
            algorithm: 8,
            certificate: vec![0x30, 0x82, 0x01],
        }));
        round_trip(Resource::TALINK(TALINK {
            previous: "a.example.".to_string(),
            next: "c.example.".to_string(),
        }));
        round_trip(Resource::URI(URI {
            priority: 10,
            weight: 1,
            target: b"ftp://ftp1.example.com/public".to_vec(),
        }));
        round_trip(Resource::DLV(DS {
            key_tag: 1,
            algorithm: 8,
            digest_type: 2,
            digest: vec![1, 2, 3],
        }));
        round_trip(Resource::TKEY(TKEY {
            algorithm: "gss-tsig.".to_string(),
            inception: 1_690_000_000,
            expiration: 1_700_000_000,
            mode: 3,
            error: 0,
            key: vec![9; 16],
            other_data: vec![],
        }));
        round_trip(Resource::TSIG(TSIG {
            algorithm: "hmac-sha256.".to_string(),
            time_signed: 1_700_000_000,
            fudge: 300,
            mac: vec![0xab; 32],
            original_id: 0xbeef,
            error: 0,
            other_data: vec![],
        }));
    }

    #[test]
    fn test_tsig_wire() {
        let tsig = Resource::TSIG(TSIG {
            algorithm: "h.".to_string(),
            time_signed: 0x0001_0203_0405,
            fudge: 300,
            mac: vec![0xaa, 0xbb],
            original_id: 7,
            error: 18,
            other_data: vec![],
        });
        assert_eq!(tsig.r#type(), 250);
        assert_eq!(
            hex::encode(tsig.rdata().unwrap()),
            concat!(
                "016800",       // h.
                "000102030405", // time signed
                "012c",         // fudge
                "0002aabb",     // mac
                "0007",         // original id
                "0012",         // error
                "0000",         // other data
            )
        );
    }

    #[test]
    fn test_type_codes() {
        assert_eq!(Resource::A(Ipv4Addr::LOCALHOST).r#type(), 1);
        assert_eq!(Resource::SPF(TXT::default()).r#type(), 99);
        assert_eq!(Resource::MD(".".to_string()).r#type(), 3);
        assert_eq!(
            Resource::TA(DS {
                key_tag: 0,
                algorithm: 0,
                digest_type: 0,
                digest: vec![],
            })
            .r#type(),
            32768
        );
        assert_eq!(Resource::Empty(6).r#type(), 6);
        assert_eq!(
            Resource::Unknown {
                r#type: 65280,
                data: vec![]
            }
            .r#type(),
            65280
        );
    }

    #[test]
    fn test_from_values_wrong_kind() {
        assert!(matches!(
            Resource::from_values(1, vec![Value::U32(1)]),
            Err(Error::UnknownTag(_))
        ));
        assert!(matches!(
            Resource::from_values(65280, vec![]),
            Err(Error::UnknownTag(_))
        ));
    }
}
