use crate::resource::Resource;
use num_traits::FromPrimitive;
use std::time::Duration;
use strum_macros::{Display, EnumString};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// DNS Message that serves as the root of all DNS requests and responses.
///
/// # Examples
///
/// For constructing a message, encoding it and decoding it back:
///
/// ```rust
/// use dnswire::Message;
/// use dnswire::types::*;
///
/// // Construct a simple query.
/// let mut m = Message::default();
/// m.add_question("bramp.net.", Type::A, Class::Internet);
///
/// // Encode the query as a Vec<u8>, ready to be sent.
/// let req = m.to_vec().expect("failed to encode DNS request");
///
/// // Take a &[u8] and turn it back into a message.
/// let got = Message::from_slice(&req).expect("invalid message");
/// assert_eq!(got, m);
///
/// // Now do something with `got`, in this case print it!
/// println!("DNS Message:\n{}", got);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Message {
    /// 16-bit identifier assigned by the program that generates any kind of
    /// query. This identifier is copied into the corresponding reply and can be
    /// used by the requester to match up replies to outstanding queries.
    pub id: u16,

    /// Recursion Desired - this bit directs the name server to pursue the query
    /// recursively.
    pub rd: bool,

    /// Truncation - specifies that this message was truncated.
    pub tc: bool,

    /// Authoritative Answer - Specifies that the responding name server is an
    /// authority for the domain name in question section.
    pub aa: bool,

    /// Specifies kind of query in this message, see [`Opcode`]. 0 represents
    /// a standard query. Only the low 4 bits are sent; unassigned values are
    /// kept as they are.
    /// See <https://www.iana.org/assignments/dns-parameters/dns-parameters.xhtml#dns-parameters-5>
    pub opcode: u8,

    /// Specifies whether this message is a query (0), or a response (1).
    pub qr: QR,

    /// Response code, see [`Rcode`]. Only the low 4 bits are sent; the upper
    /// bits of an extended rcode live in the [`crate::Extension`].
    pub rcode: u8,

    /// Checking Disabled. See [RFC4035] and [RFC6840].
    ///
    /// [rfc4035]: https://datatracker.ietf.org/doc/html/rfc4035
    /// [rfc6840]: https://datatracker.ietf.org/doc/html/rfc6840
    pub cd: bool,

    /// Authentic Data. See [RFC4035] and [RFC6840].
    ///
    /// [rfc4035]: https://datatracker.ietf.org/doc/html/rfc4035
    /// [rfc6840]: https://datatracker.ietf.org/doc/html/rfc6840
    pub ad: bool,

    /// Z Reserved for future use. You must set this field to 0.
    pub z: bool,

    /// Recursion Available - this be is set or cleared in a response, and
    /// denotes whether recursive query support is available in the name server.
    pub ra: bool,

    /// The questions.
    pub questions: Vec<Question>,

    /// The answer records.
    pub answers: Vec<Record>,

    /// The authoritive records.
    pub authorities: Vec<Record>,

    /// The additional records, including any OPT pseudo-record.
    pub additionals: Vec<Record>,
}

/// DNS Question.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Question {
    /// A fully qualified domain name.
    pub name: String,

    /// Type code, see [`Type`].
    pub r#type: u16,

    /// Class code, see [`Class`].
    pub class: u16,
}

/// Resource Record (RR)
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Record {
    pub name: String,

    /// Class code, see [`Class`]. OPT records keep the UDP payload size here.
    pub class: u16,

    /// The number of seconds that the resource record may be cached
    /// before the source of the information should again be consulted.
    /// Zero is interpreted to mean that the RR can only be used for the
    /// transaction in progress.
    pub ttl: Duration,

    pub resource: Resource,
}

impl Record {
    /// Returns the type code, taken from the resource.
    pub fn r#type(&self) -> u16 {
        self.resource.r#type()
    }
}

#[derive(Copy, Clone, Debug, EnumString, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum QR {
    Query = 0,
    Response = 1,
}

impl Default for QR {
    fn default() -> Self {
        QR::Query
    }
}

impl QR {
    pub fn from_bool(b: bool) -> QR {
        match b {
            false => QR::Query,
            true => QR::Response,
        }
    }

    pub fn to_bool(self) -> bool {
        match self {
            QR::Query => false,
            QR::Response => true,
        }
    }
}

/// Specifies kind of query in this message. See [rfc1035], [rfc6895] and <https://www.iana.org/assignments/dns-parameters/dns-parameters.xhtml#dns-parameters-5>
///
/// [rfc1035]: https://datatracker.ietf.org/doc/html/rfc1035
/// [rfc6895]: https://datatracker.ietf.org/doc/html/rfc6895
#[derive(Copy, Clone, Debug, Display, EnumString, FromPrimitive, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[allow(clippy::upper_case_acronyms)]
#[repr(u8)] // Really only 4 bits
pub enum Opcode {
    /// Query.
    Query = 0,

    /// Inverse Query (OBSOLETE). See [rfc3425].
    ///
    /// [rfc3425]: https://datatracker.ietf.org/doc/html/rfc3425
    IQuery = 1,
    Status = 2,

    /// See [rfc1996]
    ///
    /// [rfc1996]: https://datatracker.ietf.org/doc/html/rfc1996
    Notify = 4,

    /// See [rfc2136]
    ///
    /// [rfc2136]: https://datatracker.ietf.org/doc/html/rfc2136
    Update = 5,

    /// DNS Stateful Operations (DSO). See [rfc8490]
    ///
    /// [rfc8490]: https://datatracker.ietf.org/doc/html/rfc8490
    DSO = 6,
    // 3 and 7-15 Remain unassigned.
}

impl Default for Opcode {
    fn default() -> Self {
        Opcode::Query
    }
}

impl Opcode {
    /// Returns the name of an opcode, or `RESERVEDn` for an unassigned one.
    pub fn name(code: u8) -> String {
        match Opcode::from_u8(code) {
            Some(o) => o.to_string(),
            None => format!("RESERVED{}", code),
        }
    }
}

/// Response Codes.
/// See [rfc1035] and <https://www.iana.org/assignments/dns-parameters/dns-parameters.xhtml#dns-parameters-6>
///
/// [rfc1035]: https://datatracker.ietf.org/doc/html/rfc1035
#[derive(Copy, Clone, Debug, Display, EnumString, FromPrimitive, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[allow(clippy::upper_case_acronyms)]
#[repr(u16)] // In headers it is 4 bits, in extended OPTS it is 16.
pub enum Rcode {
    /// No Error
    NoError = 0,

    /// Format Error
    FormErr = 1,

    /// Server Failure
    ServFail = 2,

    /// Non-Existent Domain
    NXDomain = 3,

    /// Not Implemented
    NotImp = 4,

    /// Query Refused
    Refused = 5,

    /// Name Exists when it should not. See [rfc2136] and [rfc6672].
    ///
    /// [rfc2136]: https://datatracker.ietf.org/doc/html/rfc2136
    /// [rfc6672]: https://datatracker.ietf.org/doc/html/rfc6672
    YXDomain = 6,

    /// RR Set Exists when it should not. See [rfc2136].
    ///
    /// [rfc2136]: https://datatracker.ietf.org/doc/html/rfc2136
    YXRRSet = 7,

    /// RR Set that should exist does not. See [rfc2136].
    ///
    /// [rfc2136]: https://datatracker.ietf.org/doc/html/rfc2136
    NXRRSet = 8,

    /// Note on error number 9 (NotAuth): This error number means either
    /// "Not Authoritative" [rfc2136] or "Not Authorized" [rfc2845].
    /// If 9 appears as the RCODE in the header of a DNS response without a
    /// TSIG RR or with a TSIG RR having a zero error field, then it means
    /// "Not Authoritative".  If 9 appears as the RCODE in the header of a
    /// DNS response that includes a TSIG RR with a non-zero error field,
    /// then it means "Not Authorized".
    ///
    /// [rfc2136]: https://datatracker.ietf.org/doc/html/rfc2136
    /// [rfc2845]: https://datatracker.ietf.org/doc/html/rfc2845
    NotAuth = 9,

    /// Name not contained in zone. See [rfc2136].
    ///
    /// [rfc2136]: https://datatracker.ietf.org/doc/html/rfc2136
    NotZone = 10,

    /// DSO-TYPE Not Implemented. See [rfc8490].
    ///
    /// [rfc8490]: https://datatracker.ietf.org/doc/html/rfc8490
    DSOTYPENI = 11,
    // 12-15 Unassigned
}

impl Default for Rcode {
    fn default() -> Self {
        Rcode::NoError
    }
}

impl Rcode {
    /// Returns the name of a response code, or `RESERVEDn` for an unassigned
    /// one.
    pub fn name(code: u8) -> String {
        match Rcode::from_u8(code) {
            Some(r) => r.to_string(),
            None => format!("RESERVED{}", code),
        }
    }
}

/// Resource Record Type, for example, A, CNAME or SOA.
///
// When adding a Type, its field table must be added in resource.rs.
#[derive(Copy, Clone, Debug, Display, EnumString, FromPrimitive, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[allow(clippy::upper_case_acronyms)]
#[repr(u16)]
pub enum Type {
    Reserved = 0,

    /// (Default) IPv4 Address.
    A = 1,
    NS = 2,

    /// Mail destination (OBSOLETE, use MX).
    MD = 3,

    /// Mail forwarder (OBSOLETE, use MX).
    MF = 4,

    CNAME = 5,
    SOA = 6,

    /// Mailbox domain name (EXPERIMENTAL).
    MB = 7,

    /// Mail group member (EXPERIMENTAL).
    MG = 8,

    /// Mail rename domain name (EXPERIMENTAL).
    MR = 9,

    /// Well known services.
    WKS = 11,

    /// Domain name pointer.
    PTR = 12,

    /// Host information.
    HINFO = 13,

    /// Mailbox or mail list information.
    MINFO = 14,

    /// Mail exchange.
    MX = 15,

    /// Text strings.
    TXT = 16,

    /// Route through. See [rfc1183].
    ///
    /// [rfc1183]: https://datatracker.ietf.org/doc/html/rfc1183
    RT = 21,

    /// IPv6 Address.
    AAAA = 28,

    /// Server Selection
    SRV = 33,

    /// Naming Authority Pointer. See [rfc3403].
    ///
    /// [rfc3403]: https://datatracker.ietf.org/doc/html/rfc3403
    NAPTR = 35,

    /// Key exchanger. See [rfc2230].
    ///
    /// [rfc2230]: https://datatracker.ietf.org/doc/html/rfc2230
    KX = 36,

    /// Certificate. See [rfc4398].
    ///
    /// [rfc4398]: https://datatracker.ietf.org/doc/html/rfc4398
    CERT = 37,

    /// Delegation name. See [rfc6672].
    ///
    /// [rfc6672]: https://datatracker.ietf.org/doc/html/rfc6672
    DNAME = 39,

    /// EDNS(0) Opt type. See [rfc3225] and [rfc6891].
    ///
    /// [rfc3225]: https://datatracker.ietf.org/doc/html/rfc3225
    /// [rfc6891]: https://datatracker.ietf.org/doc/html/rfc6891
    OPT = 41,

    /// Delegation Signer. See [rfc4034].
    ///
    /// [rfc4034]: https://datatracker.ietf.org/doc/html/rfc4034
    DS = 43,

    /// SSH Key Fingerprint. See [rfc4255].
    ///
    /// [rfc4255]: https://datatracker.ietf.org/doc/html/rfc4255
    SSHFP = 44,

    RRSIG = 46,
    NSEC = 47,
    DNSKEY = 48,

    /// DHCP Identifier. See [rfc4701].
    ///
    /// [rfc4701]: https://datatracker.ietf.org/doc/html/rfc4701
    DHCID = 49,

    NSEC3 = 50,
    NSEC3PARAM = 51,

    /// TLSA certificate association. See [rfc6698].
    ///
    /// [rfc6698]: https://datatracker.ietf.org/doc/html/rfc6698
    TLSA = 52,

    /// Trust anchor link.
    TALINK = 58,

    /// Sender Policy Framework, now obsolete in favour of TXT. See [rfc7208].
    ///
    /// [rfc7208]: https://datatracker.ietf.org/doc/html/rfc7208
    SPF = 99,

    /// Transaction key. See [rfc2930]. Only valid in the additional section.
    ///
    /// [rfc2930]: https://datatracker.ietf.org/doc/html/rfc2930
    TKEY = 249,

    /// Transaction signature. See [rfc8945]. Only valid in the additional
    /// section.
    ///
    /// [rfc8945]: https://datatracker.ietf.org/doc/html/rfc8945
    TSIG = 250,

    /// Incremental zone transfer. Only valid as a Question Type.
    IXFR = 251,

    /// Zone transfer. Only valid as a Question Type.
    AXFR = 252,

    /// Any record type.
    /// Only valid as a Question Type.
    ANY = 255,

    /// Uniform resource identifier. See [rfc7553].
    ///
    /// [rfc7553]: https://datatracker.ietf.org/doc/html/rfc7553
    URI = 256,

    /// DNSSEC trust authority.
    TA = 32768,

    /// DNSSEC lookaside validation (OBSOLETE). See [rfc4431].
    ///
    /// [rfc4431]: https://datatracker.ietf.org/doc/html/rfc4431
    DLV = 32769,
}

impl Default for Type {
    fn default() -> Self {
        Type::A
    }
}

impl Type {
    /// Returns the mnemonic for a type code, or `TYPEnnn` as described in
    /// [rfc3597] when there is none.
    ///
    /// [rfc3597]: https://datatracker.ietf.org/doc/html/rfc3597
    pub fn name(code: u16) -> String {
        match Type::from_u16(code) {
            Some(Type::Reserved) | None => format!("TYPE{}", code),
            Some(t) => t.to_string(),
        }
    }
}

/// Resource Record Class, for example Internet.
#[derive(Copy, Clone, Debug, Display, EnumString, FromPrimitive, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u16)]
pub enum Class {
    /// Reserved per [RFC6895]
    ///
    /// [rfc6895]: https://datatracker.ietf.org/doc/html/rfc6895
    Reserved = 0,

    /// (Default) The Internet (IN), see [rfc1035].
    ///
    /// [rfc1035]: https://datatracker.ietf.org/doc/html/rfc1035
    #[strum(serialize = "IN")]
    Internet = 1,

    /// CSNET (CS), obsolete (used only for examples in some obsolete RFCs).
    #[strum(serialize = "CS")]
    CsNet = 2,

    /// Chaosnet (CH), obsolete LAN protocol created at MIT in the mid-1970s.
    #[strum(serialize = "CH")]
    Chaos = 3,

    /// Hesiod (HS), an information service developed by MIT's Project Athena.
    #[strum(serialize = "HS")]
    Hesiod = 4,

    /// NONE, used by dynamic updates. See [rfc2136].
    ///
    /// [rfc2136]: https://datatracker.ietf.org/doc/html/rfc2136
    #[strum(serialize = "NONE")]
    None = 254,

    /// * (ANY) See [rfc1035]
    ///
    /// [rfc1035]: https://datatracker.ietf.org/doc/html/rfc1035
    #[strum(serialize = "*")]
    Any = 255,
    //     5-253     Unassigned
    //   256-65279   Unassigned
    // 65280-65534   Reserved for Private Use    [RFC6895]
    // 65535         Reserved    [RFC6895]
}

impl Default for Class {
    fn default() -> Self {
        Class::Internet
    }
}

impl Class {
    /// Returns the mnemonic for a class code, or `CLASSnnn` as described in
    /// [rfc3597] when there is none.
    ///
    /// [rfc3597]: https://datatracker.ietf.org/doc/html/rfc3597
    pub fn name(code: u16) -> String {
        match Class::from_u16(code) {
            Some(Class::Reserved) | None => format!("CLASS{}", code),
            Some(c) => c.to_string(),
        }
    }
}
