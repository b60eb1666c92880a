//! Implements the Display trait for the various types, so they output
//! in `dig` style.
// Refer to https://github.com/tigeli/bind-utils/blob/master/bin/dig/dig.c for reference.

use crate::edns::{ClientSubnet, EdnsOption, Extension};
use crate::resource::*;
use crate::types::{Class, Opcode, Rcode, Type};
use crate::util::{to_base32hex, to_base64, to_hex};
use crate::Message;
use crate::Question;
use crate::Record;
use chrono::prelude::*;
use std::collections::BTreeSet;
use std::convert::TryFrom;
use std::fmt;
use std::fmt::Display;

/// Displays this message in a format resembling `dig` output.
impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.fmt_header(f)?;

        // ;; OPT PSEUDOSECTION:
        // ; EDNS: version: 0, flags:; udp: 512
        if let Some(e) = self.extension() {
            writeln!(f, ";; OPT PSEUDOSECTION:")?;
            e.fmt(f)?;
            writeln!(f)?;
        }

        // Always display the question section, but optionally
        // display the other sections.
        writeln!(f, ";; QUESTION SECTION:")?;
        for question in &self.questions {
            question.fmt(f)?;
        }
        writeln!(f)?;

        let sections = [
            ("ANSWER", &self.answers),
            ("AUTHORITY", &self.authorities),
            ("ADDITIONAL", &self.additionals),
        ];

        for (title, records) in sections.iter() {
            // The OPT record was already shown as the pseudosection.
            let records: Vec<&Record> = records
                .iter()
                .filter(|r| !matches!(r.resource, Resource::OPT(_)))
                .collect();

            if !records.is_empty() {
                writeln!(f, ";; {} SECTION:", title)?;
                for record in records {
                    record.fmt(f)?;
                }
                writeln!(f)?;
            }
        }

        Ok(())
    }
}

impl Message {
    fn fmt_header(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(
            f,
            ";; ->>HEADER<<- opcode: {opcode}, status: {rcode}, id: {id}",
            opcode = Opcode::name(self.opcode),
            rcode = Rcode::name(self.rcode),
            id = self.id,
        )?;

        let mut flags = String::new();

        if self.qr.to_bool() {
            flags.push_str(" qr")
        }
        if self.aa {
            flags.push_str(" aa")
        }
        if self.tc {
            flags.push_str(" tc")
        }
        if self.rd {
            flags.push_str(" rd")
        }
        if self.ra {
            flags.push_str(" ra")
        }
        if self.ad {
            flags.push_str(" ad")
        }
        if self.cd {
            flags.push_str(" cd")
        }

        writeln!(f, ";; flags:{flags}; QUERY: {qd_count}, ANSWER: {an_count}, AUTHORITY: {ns_count}, ADDITIONAL: {ar_count}",
            flags = flags,
            qd_count = self.questions.len(),
            an_count = self.answers.len(),
            ns_count = self.authorities.len(),
            ar_count = self.additionals.len(),
        )?;

        writeln!(f)
    }
}

impl fmt::Display for Extension {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(
            f,
            "; EDNS: version: {version}, flags:{flags}; udp: {payload_size}",
            version = self.version,
            flags = if self.dnssec_ok { " do" } else { "" },
            payload_size = self.payload_size,
        )?;

        for option in &self.options {
            writeln!(f, "; {}", option)?;
        }

        Ok(())
    }
}

impl fmt::Display for EdnsOption {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EdnsOption::Nsid(id) => {
                write!(f, "NSID: {}", to_hex(id))?;
                if !id.is_empty() {
                    write!(f, " (")?;
                    fmt_char_string(f, id)?;
                    write!(f, ")")?;
                }
                Ok(())
            }
            EdnsOption::Subnet(subnet) => write!(f, "CLIENT-SUBNET: {}", subnet),
            EdnsOption::Unknown(code, data) => write!(f, "OPT={}: {}", code, to_hex(data)),
        }
    }
}

impl fmt::Display for ClientSubnet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}",
            self.address, self.source_prefix, self.scope_prefix
        )
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(
            f,
            "; {name:<18}      {class:4} {type:6}",
            name = self.name,
            class = Class::name(self.class),
            r#type = Type::name(self.r#type),
        )
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let r#type = match &self.resource {
            Resource::Private(p) => p.mnemonic.clone(),
            resource => Type::name(resource.r#type()),
        };

        writeln!(
            f,
            "{name:<20} {ttl:>4} {class:4} {type:6} {resource}",
            name = self.name,
            ttl = self.ttl.as_secs(),
            class = Class::name(self.class),
            r#type = r#type,
            resource = self.resource,
        )
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::A(ip) => ip.fmt(f),
            Resource::AAAA(ip) => ip.fmt(f),

            Resource::NS(name) => name.fmt(f),
            Resource::CNAME(name) => name.fmt(f),
            Resource::PTR(name) => name.fmt(f),
            Resource::DNAME(name) => name.fmt(f),
            Resource::MD(name) => name.fmt(f),
            Resource::MF(name) => name.fmt(f),
            Resource::MB(name) => name.fmt(f),
            Resource::MG(name) => name.fmt(f),
            Resource::MR(name) => name.fmt(f),

            Resource::SOA(soa) => soa.fmt(f),
            Resource::TXT(txts) | Resource::SPF(txts) => txts.fmt(f),
            Resource::MX(mx) => mx.fmt(f),
            Resource::SRV(srv) => srv.fmt(f),
            Resource::HINFO(hinfo) => hinfo.fmt(f),
            Resource::NAPTR(naptr) => naptr.fmt(f),
            Resource::WKS(wks) => wks.fmt(f),
            Resource::MINFO(minfo) => minfo.fmt(f),
            Resource::RT(rt) => rt.fmt(f),
            Resource::KX(kx) => kx.fmt(f),
            Resource::CERT(cert) => cert.fmt(f),
            Resource::TALINK(talink) => talink.fmt(f),
            Resource::URI(uri) => uri.fmt(f),

            Resource::OPT(options) => {
                let options: Vec<String> = options.iter().map(|o| o.to_string()).collect();
                write!(f, "{}", options.join(", "))
            }

            Resource::DS(ds) | Resource::TA(ds) | Resource::DLV(ds) => ds.fmt(f),
            Resource::DNSKEY(key) => key.fmt(f),
            Resource::RRSIG(sig) => sig.fmt(f),
            Resource::NSEC(nsec) => nsec.fmt(f),
            Resource::NSEC3(nsec3) => nsec3.fmt(f),
            Resource::NSEC3PARAM(param) => param.fmt(f),
            Resource::SSHFP(fp) => fp.fmt(f),
            Resource::TLSA(tlsa) => tlsa.fmt(f),
            Resource::DHCID(data) => write!(f, "{}", to_base64(data)),
            Resource::TKEY(key) => key.fmt(f),
            Resource::TSIG(sig) => sig.fmt(f),

            // RFC 3597 generic form.
            Resource::Private(_) => match self.rdata() {
                Ok(data) => fmt_generic(f, &data),
                Err(err) => write!(f, "; {}", err),
            },
            Resource::Unknown { data, .. } => fmt_generic(f, data),
            Resource::Empty(_) => fmt_generic(f, &[]),
        }
    }
}

fn fmt_generic(f: &mut fmt::Formatter, data: &[u8]) -> fmt::Result {
    if data.is_empty() {
        write!(f, "\\# 0")
    } else {
        write!(f, "\\# {} {}", data.len(), to_hex(data))
    }
}

/// Writes a quoted character-string, escaping quotes, backslashes and
/// anything that is not printable.
fn fmt_char_string(f: &mut fmt::Formatter, s: &[u8]) -> fmt::Result {
    write!(f, "\"")?;
    for b in s {
        match b {
            b'"' | b'\\' => write!(f, "\\{}", *b as char)?,
            0x20..=0x7e => write!(f, "{}", *b as char)?,
            _ => write!(f, "\\{:03}", b)?,
        }
    }
    write!(f, "\"")
}

fn fmt_types(f: &mut fmt::Formatter, types: &BTreeSet<u16>) -> fmt::Result {
    for t in types {
        write!(f, " {}", Type::name(*t))?;
    }
    Ok(())
}

/// Formats a DNSSEC timestamp as YYYYMMDDHHmmSS in UTC.
fn fmt_timestamp(f: &mut fmt::Formatter, secs: i64) -> fmt::Result {
    match Utc.timestamp_opt(secs, 0).single() {
        Some(t) => write!(f, "{}", t.format("%Y%m%d%H%M%S")),
        None => write!(f, "{}", secs),
    }
}

/// Writes a length followed by the bytes in hex, if there are any.
fn fmt_sized_hex(f: &mut fmt::Formatter, data: &[u8]) -> fmt::Result {
    write!(f, "{}", data.len())?;
    if !data.is_empty() {
        write!(f, " {}", to_hex(data))?;
    }
    Ok(())
}

fn fmt_salt(salt: &[u8]) -> String {
    if salt.is_empty() {
        "-".to_string()
    } else {
        to_hex(salt)
    }
}

impl fmt::Display for MX {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // "10 aspmx.l.google.com."
        write!(
            f,
            "{preference} {exchange}",
            preference = self.preference,
            exchange = self.exchange,
        )
    }
}

impl fmt::Display for SOA {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // "ns1.google.com. dns-admin.google.com. 376337657 900 900 1800 60"
        write!(
            f,
            "{mname} {rname} {serial} {refresh} {retry} {expire} {minimum}",
            mname = self.mname,
            rname = self.rname,
            serial = self.serial,
            refresh = self.refresh.as_secs(),
            retry = self.retry.as_secs(),
            expire = self.expire.as_secs(),
            minimum = self.minimum.as_secs(),
        )
    }
}

impl fmt::Display for SRV {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // "5 0 389 ldap.google.com."
        write!(
            f,
            "{priority} {weight} {port} {name}",
            priority = self.priority,
            weight = self.weight,
            port = self.port,
            name = self.name,
        )
    }
}

impl fmt::Display for TXT {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, txt) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            fmt_char_string(f, txt)?;
        }
        Ok(())
    }
}

impl fmt::Display for HINFO {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt_char_string(f, &self.cpu)?;
        write!(f, " ")?;
        fmt_char_string(f, &self.os)
    }
}

impl fmt::Display for NAPTR {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {} ", self.order, self.preference)?;
        fmt_char_string(f, &self.flags)?;
        write!(f, " ")?;
        fmt_char_string(f, &self.service)?;
        write!(f, " ")?;
        fmt_char_string(f, &self.regexp)?;
        write!(f, " {}", self.replacement)
    }
}

impl fmt::Display for WKS {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}", self.address, self.protocol)?;
        for port in &self.ports {
            write!(f, " {}", port)?;
        }
        Ok(())
    }
}

impl fmt::Display for DS {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.key_tag,
            self.algorithm,
            self.digest_type,
            to_hex(&self.digest)
        )
    }
}

impl fmt::Display for DNSKEY {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.flags,
            self.protocol,
            self.algorithm,
            to_base64(&self.public_key)
        )
    }
}

impl fmt::Display for RRSIG {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} ",
            Type::name(self.type_covered),
            self.algorithm,
            self.labels,
            self.original_ttl
        )?;
        fmt_timestamp(f, self.expiration.into())?;
        write!(f, " ")?;
        fmt_timestamp(f, self.inception.into())?;
        write!(
            f,
            " {} {} {}",
            self.key_tag,
            self.signer_name,
            to_base64(&self.signature)
        )
    }
}

impl fmt::Display for NSEC {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.next_domain)?;
        fmt_types(f, &self.types)
    }
}

impl fmt::Display for NSEC3 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {}",
            self.hash_algorithm,
            self.flags,
            self.iterations,
            fmt_salt(&self.salt),
            to_base32hex(&self.next_hashed)
        )?;
        fmt_types(f, &self.types)
    }
}

impl fmt::Display for NSEC3PARAM {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.hash_algorithm,
            self.flags,
            self.iterations,
            fmt_salt(&self.salt)
        )
    }
}

impl fmt::Display for SSHFP {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.algorithm,
            self.fp_type,
            to_hex(&self.fingerprint)
        )
    }
}

impl fmt::Display for TLSA {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.usage,
            self.selector,
            self.matching_type,
            to_hex(&self.data)
        )
    }
}

impl fmt::Display for MINFO {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}", self.rmailbx, self.emailbx)
    }
}

impl fmt::Display for RT {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}", self.preference, self.host)
    }
}

impl fmt::Display for KX {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}", self.preference, self.exchanger)
    }
}

impl fmt::Display for CERT {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.cert_type,
            self.key_tag,
            self.algorithm,
            to_base64(&self.certificate)
        )
    }
}

impl fmt::Display for TALINK {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}", self.previous, self.next)
    }
}

impl fmt::Display for URI {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // "10 1 "ftp://ftp1.example.com/public""
        write!(f, "{} {} ", self.priority, self.weight)?;
        fmt_char_string(f, &self.target)
    }
}

impl fmt::Display for TKEY {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ", self.algorithm)?;
        fmt_timestamp(f, self.inception.into())?;
        write!(f, " ")?;
        fmt_timestamp(f, self.expiration.into())?;
        write!(f, " {} {} ", self.mode, self.error)?;
        fmt_sized_hex(f, &self.key)?;
        write!(f, " ")?;
        fmt_sized_hex(f, &self.other_data)
    }
}

impl fmt::Display for TSIG {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ", self.algorithm)?;
        fmt_timestamp(f, i64::try_from(self.time_signed).unwrap_or(i64::MAX))?;
        write!(f, " {} ", self.fudge)?;
        fmt_sized_hex(f, &self.mac)?;
        write!(f, " {} {} ", self.original_id, self.error)?;
        fmt_sized_hex(f, &self.other_data)
    }
}

#[cfg(test)]
mod tests {
    use crate::fields::{Field, Value};
    use crate::resource::*;
    use crate::types::Record;
    use core::time::Duration;
    use pretty_assertions::assert_eq;

    lazy_static! {
        static ref DISPLAY_TESTS : Vec<(Resource, &'static str)> = {
            vec![
                (
                    Resource::A("172.217.164.100".parse().unwrap()),
                    "172.217.164.100",
                ),
                (
                    Resource::AAAA("2607:f8b0:4005:805::2004".parse().unwrap()),
                    "2607:f8b0:4005:805::2004",
                ),
                (
                    Resource::CNAME("code.l.google.com.".to_string()),
                    "code.l.google.com.",
                ),
                (
                    Resource::NS("ns4.google.com.".to_string()),
                    "ns4.google.com.",
                ),
                (Resource::PTR("dns.google.".to_string()), "dns.google."),
                (
                    Resource::SOA(SOA {
                        mname: "ns1.google.com.".to_string(),
                        rname: "dns-admin.google.com.".to_string(),

                        serial: 379031418,

                        refresh: Duration::from_secs(900),
                        retry: Duration::from_secs(900),
                        expire: Duration::from_secs(1800),
                        minimum: Duration::from_secs(60),
                    }),
                    "ns1.google.com. dns-admin.google.com. 379031418 900 900 1800 60",
                ),
                (
                    Resource::MX(MX {
                        preference: 10,
                        exchange: "aspmx.l.google.com.".to_string(),
                    }),
                    "10 aspmx.l.google.com.",
                ),
                (
                    Resource::SRV(SRV {
                        priority: 5,
                        weight: 0,
                        port: 389,
                        name: "ldap.google.com.".to_string(),
                    }),
                    "5 0 389 ldap.google.com.",
                ),
                (
                    Resource::TXT(TXT::from("v=spf1 include:_spf.google.com ~all")),
                    "\"v=spf1 include:_spf.google.com ~all\"",
                ),
                (
                    Resource::TXT(TXT::from(&["a \"quoted\" word", "tab\there"][..])),
                    "\"a \\\"quoted\\\" word\" \"tab\\009here\"",
                ),
                (
                    Resource::HINFO(HINFO {
                        cpu: b"INTEL-386".to_vec(),
                        os: b"UNIX".to_vec(),
                    }),
                    "\"INTEL-386\" \"UNIX\"",
                ),
                (
                    Resource::WKS(WKS {
                        address: "192.0.2.1".parse().unwrap(),
                        protocol: 6,
                        ports: [25, 80].iter().copied().collect(),
                    }),
                    "192.0.2.1 6 25 80",
                ),
                (
                    Resource::DS(DS {
                        key_tag: 20326,
                        algorithm: 8,
                        digest_type: 2,
                        digest: vec![0xe0, 0x6d, 0x44, 0xb8],
                    }),
                    "20326 8 2 E06D44B8",
                ),
                (
                    Resource::RRSIG(RRSIG {
                        type_covered: 1,
                        algorithm: 8,
                        labels: 2,
                        original_ttl: 300,
                        expiration: 1_700_000_000,
                        inception: 0,
                        key_tag: 1234,
                        signer_name: "example.com.".to_string(),
                        signature: b"foob".to_vec(),
                    }),
                    "A 8 2 300 20231114221320 19700101000000 1234 example.com. Zm9vYg==",
                ),
                (
                    Resource::NSEC(NSEC {
                        next_domain: "b.example.com.".to_string(),
                        types: [1, 46, 47, 65280].iter().copied().collect(),
                    }),
                    "b.example.com. A RRSIG NSEC TYPE65280",
                ),
                (
                    Resource::NSEC3(NSEC3 {
                        hash_algorithm: 1,
                        flags: 1,
                        iterations: 12,
                        salt: vec![0xaa, 0xbb, 0xcc, 0xdd],
                        next_hashed: b"foobar".to_vec(),
                        types: [1, 2].iter().copied().collect(),
                    }),
                    "1 1 12 AABBCCDD CPNMUOJ1E8 A NS",
                ),
                (
                    Resource::NSEC3PARAM(NSEC3PARAM {
                        hash_algorithm: 1,
                        flags: 0,
                        iterations: 0,
                        salt: vec![],
                    }),
                    "1 0 0 -",
                ),
                (
                    Resource::Unknown {
                        r#type: 65280,
                        data: vec![0x0a, 0, 0, 1],
                    },
                    "\\# 4 0A000001",
                ),
                (
                    Resource::Private(Private {
                        r#type: 65281,
                        mnemonic: "EXAMPLE".to_string(),
                        fields: vec![Field::U16],
                        values: vec![Value::U16(258)],
                    }),
                    "\\# 2 0102",
                ),
                (Resource::Empty(1), "\\# 0"),
                (
                    Resource::Private(Private {
                        r#type: 65281,
                        mnemonic: "EXAMPLE".to_string(),
                        fields: vec![Field::U16],
                        values: vec![Value::U8(1)],
                    }),
                    "; unknown field tag: field U16 can not hold a u8 value",
                ),
                (Resource::MB("mail.example.com.".to_string()), "mail.example.com."),
                (
                    Resource::MINFO(MINFO {
                        rmailbx: "list-request.example.com.".to_string(),
                        emailbx: "owner.example.com.".to_string(),
                    }),
                    "list-request.example.com. owner.example.com.",
                ),
                (
                    Resource::KX(KX {
                        preference: 10,
                        exchanger: "kx.example.com.".to_string(),
                    }),
                    "10 kx.example.com.",
                ),
                (
                    Resource::CERT(CERT {
                        cert_type: 1,
                        key_tag: 0,
                        algorithm: 8,
                        certificate: b"foob".to_vec(),
                    }),
                    "1 0 8 Zm9vYg==",
                ),
                (
                    Resource::URI(URI {
                        priority: 10,
                        weight: 1,
                        target: b"ftp://ftp1.example.com/public".to_vec(),
                    }),
                    "10 1 \"ftp://ftp1.example.com/public\"",
                ),
                (
                    Resource::DLV(DS {
                        key_tag: 20326,
                        algorithm: 8,
                        digest_type: 2,
                        digest: vec![0xe0, 0x6d],
                    }),
                    "20326 8 2 E06D",
                ),
                (
                    Resource::TSIG(TSIG {
                        algorithm: "hmac-sha256.".to_string(),
                        time_signed: 1_700_000_000,
                        fudge: 300,
                        mac: vec![0xab, 0xcd],
                        original_id: 4660,
                        error: 0,
                        other_data: vec![],
                    }),
                    "hmac-sha256. 20231114221320 300 2 ABCD 4660 0 0",
                ),
            ]
        };
    }

    #[test]
    fn test_display() {
        for (resource, display) in (*DISPLAY_TESTS).iter() {
            assert_eq!(format!("{}", resource), *display);
        }
    }

    #[test]
    fn test_record() {
        let record = Record {
            name: "example.com.".to_string(),
            class: 4096,
            ttl: Duration::from_secs(60),
            resource: Resource::Unknown {
                r#type: 65280,
                data: vec![1],
            },
        };
        assert_eq!(
            format!("{}", record),
            "example.com.           60 CLASS4096 TYPE65280 \\# 1 01\n"
        );
    }
}
