//! A DNS wire format codec: messages as defined in [rfc1035], with EDNS(0)
//! ([rfc6891]) and the DNSSEC record types ([rfc4034], [rfc5155]).
//!
//! Record payloads are described by tables of [`Field`]s held in a
//! [`Registry`], so new record types can be decoded without changing the
//! codec itself.
//!
//! [rfc1035]: https://datatracker.ietf.org/doc/html/rfc1035
//! [rfc4034]: https://datatracker.ietf.org/doc/html/rfc4034
//! [rfc5155]: https://datatracker.ietf.org/doc/html/rfc5155
//! [rfc6891]: https://datatracker.ietf.org/doc/html/rfc6891

#[macro_use]
mod errors;

mod bitmap;
mod display;
mod dns;
pub mod edns;
pub mod fields;
mod io;
pub mod name;
mod record;
pub mod registry;
pub mod resource;
pub mod sanitize;
pub mod types;
pub mod util;

#[macro_use]
extern crate num_derive;

#[macro_use]
extern crate lazy_static;

pub use crate::types::*;

// Pull up the various types that should be on the front page of the docs.
#[doc(inline)]
pub use crate::types::Message;
#[doc(inline)]
pub use crate::types::Question;
#[doc(inline)]
pub use crate::types::Record;

#[doc(inline)]
pub use crate::types::Class;

#[doc(inline)]
pub use crate::types::Type;

#[doc(inline)]
pub use crate::resource::Resource;

#[doc(inline)]
pub use crate::edns::{EdnsOption, Extension};

#[doc(inline)]
pub use crate::fields::{Field, Value};

#[doc(inline)]
pub use crate::registry::{RecordSpec, Registry};

pub use crate::dns::id;
pub use crate::errors::{Error, Result};
pub use crate::io::MAX_MESSAGE_SIZE;
pub use crate::name::{fqdn, is_fqdn};
