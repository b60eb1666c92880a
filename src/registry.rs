//! Maps record type codes to the field tables used to decode them.

use crate::fields::{Field, Value};
use crate::resource::{builtin_fields, Private, Resource};
use crate::types::Type;
use crate::Error;
use crate::Result;
use std::collections::HashMap;
use std::fmt;

/// Builds a [`Resource`] from the values decoded with a spec's field table.
pub type Builder = fn(&RecordSpec, Vec<Value>) -> Result<Resource>;

/// Everything needed to decode one record type.
#[derive(Clone)]
pub struct RecordSpec {
    pub r#type: u16,
    pub mnemonic: String,
    pub fields: Vec<Field>,
    pub build: Builder,
}

impl fmt::Debug for RecordSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordSpec")
            .field("type", &self.r#type)
            .field("mnemonic", &self.mnemonic)
            .field("fields", &self.fields)
            .finish()
    }
}

impl RecordSpec {
    /// Describes a record type not built into this crate. Its records decode
    /// into [`Resource::Private`].
    ///
    /// ```rust
    /// use dnswire::{Field, RecordSpec, Registry};
    ///
    /// let mut registry = Registry::builtin();
    /// let spec = RecordSpec::private(65280, "EXAMPLE", vec![Field::U16, Field::Name])?;
    /// registry.register(spec)?;
    ///
    /// // A field that runs to the end of the record must come last.
    /// assert!(RecordSpec::private(65281, "BAD", vec![Field::Opaque, Field::U16]).is_err());
    /// # Ok::<(), dnswire::Error>(())
    /// ```
    pub fn private(r#type: u16, mnemonic: &str, fields: Vec<Field>) -> Result<RecordSpec> {
        let spec = RecordSpec {
            r#type,
            mnemonic: mnemonic.to_string(),
            fields,
            build: |spec, values| {
                Ok(Resource::Private(Private {
                    r#type: spec.r#type,
                    mnemonic: spec.mnemonic.clone(),
                    fields: spec.fields.clone(),
                    values,
                }))
            },
        };
        spec.validate()?;
        Ok(spec)
    }

    /// Checks the field table can be decoded: a field that runs to the end
    /// of the RDATA may only be the last one.
    pub fn validate(&self) -> Result<()> {
        let last = self.fields.len().saturating_sub(1);
        for (i, field) in self.fields.iter().enumerate() {
            if field.is_rest() && i != last {
                return Err(Error::UnknownTag(format!(
                    "{}: field {:?} at position {} runs to the end of the record, so it must be last",
                    self.mnemonic, field, i
                )));
            }
        }
        Ok(())
    }

    /// Returns true if a record of this type can have an empty RDATA.
    pub fn may_be_empty(&self) -> bool {
        self.fields.iter().all(|f| f.may_be_empty())
    }
}

/// Known record types.
///
/// A registry is built once, optionally extended with [`Registry::register`],
/// and then only read. [`Registry::global`] is the shared, immutable copy of
/// the built-in types used by [`crate::Message::from_slice`].
#[derive(Clone, Debug, Default)]
pub struct Registry {
    specs: HashMap<u16, RecordSpec>,
}

const BUILTIN_TYPES: &[Type] = &[
    Type::A,
    Type::NS,
    Type::MD,
    Type::MF,
    Type::CNAME,
    Type::SOA,
    Type::MB,
    Type::MG,
    Type::MR,
    Type::WKS,
    Type::PTR,
    Type::HINFO,
    Type::MINFO,
    Type::MX,
    Type::TXT,
    Type::RT,
    Type::AAAA,
    Type::SRV,
    Type::NAPTR,
    Type::KX,
    Type::CERT,
    Type::DNAME,
    Type::OPT,
    Type::DS,
    Type::SSHFP,
    Type::RRSIG,
    Type::NSEC,
    Type::DNSKEY,
    Type::DHCID,
    Type::NSEC3,
    Type::NSEC3PARAM,
    Type::TLSA,
    Type::TALINK,
    Type::SPF,
    Type::TKEY,
    Type::TSIG,
    Type::URI,
    Type::TA,
    Type::DLV,
];

lazy_static! {
    static ref GLOBAL: Registry = Registry::builtin();
}

impl Registry {
    /// A registry with no types. Every record decodes as [`Resource::Unknown`].
    pub fn empty() -> Registry {
        Registry::default()
    }

    /// A registry holding every built-in type.
    pub fn builtin() -> Registry {
        let mut registry = Registry::empty();

        for t in BUILTIN_TYPES {
            if let Some(fields) = builtin_fields(*t) {
                registry.specs.insert(
                    *t as u16,
                    RecordSpec {
                        r#type: *t as u16,
                        mnemonic: t.to_string(),
                        fields: fields.to_vec(),
                        build: |spec, values| Resource::from_values(spec.r#type, values),
                    },
                );
            }
        }

        registry
    }

    /// The shared built-in registry.
    pub fn global() -> &'static Registry {
        &GLOBAL
    }

    /// Adds or replaces a type, returning the spec it replaced. Fails if the
    /// spec's field table could never be decoded.
    pub fn register(&mut self, spec: RecordSpec) -> Result<Option<RecordSpec>> {
        spec.validate()?;
        Ok(self.specs.insert(spec.r#type, spec))
    }

    pub fn get(&self, r#type: u16) -> Option<&RecordSpec> {
        self.specs.get(&r#type)
    }

    /// Returns the mnemonic of a registered type.
    pub fn mnemonic(&self, r#type: u16) -> Option<&str> {
        self.get(r#type).map(|spec| spec.mnemonic.as_str())
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}
