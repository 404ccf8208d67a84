use std::io::Cursor;

use bytes::Bytes;

mod error;
pub use error::DnsError;

mod header;
pub use header::{Flags, Header};

mod name;
pub use name::Name;

mod message;
pub use message::Message;

mod question;
pub use question::{Question, CLASS_IN};

mod resource_record;
pub use resource_record::{RecordData, ResourceRecord};

mod record_type;
pub use record_type::RecordType;

pub mod resolver;
pub use resolver::{Lookup, Resolver, ResolverConfig};

mod wire;

pub trait Networkable: Sized {
    fn to_bytes(&self) -> Bytes;

    /// Reads one value starting at the cursor position. The cursor must wrap
    /// the whole message, since names may point anywhere before them.
    fn from_bytes(bytes: &mut Cursor<&[u8]>) -> Result<Self, DnsError>;
}
