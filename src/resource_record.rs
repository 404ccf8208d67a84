use std::fmt::Display;
use std::io::Cursor;
use std::net::Ipv4Addr;

use bytes::{BufMut, Bytes, BytesMut};
use tracing::instrument;

use super::{Name, Networkable};
use crate::question::CLASS_IN;
use crate::wire::CheckedBuf;
use crate::{DnsError, RecordType};

mod record_data;
pub use record_data::RecordData;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRecord {
    pub name: Name,
    pub class: u16,
    pub ttl: u32,
    pub data: RecordData,
}

impl ResourceRecord {
    pub fn new(name: Name, ttl: u32, data: RecordData) -> Self {
        Self {
            name,
            class: CLASS_IN,
            ttl,
            data,
        }
    }

    pub fn a(name: Name, ttl: u32, addr: Ipv4Addr) -> Self {
        Self::new(name, ttl, RecordData::A(addr))
    }

    pub fn ns(name: Name, ttl: u32, host: Name) -> Self {
        Self::new(name, ttl, RecordData::Ns(host))
    }

    pub fn type_(&self) -> u16 {
        self.data.type_()
    }

    pub fn as_a(&self) -> Option<Ipv4Addr> {
        match self.data {
            RecordData::A(addr) => Some(addr),
            _ => None,
        }
    }

    pub fn as_ns(&self) -> Option<&Name> {
        match &self.data {
            RecordData::Ns(host) => Some(host),
            _ => None,
        }
    }
}

impl Display for ResourceRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.name,
            self.ttl,
            RecordType::mnemonic(self.type_())
        )?;

        match &self.data {
            RecordData::A(addr) => write!(f, " {addr}"),
            RecordData::Ns(host) => write!(f, " {host}"),
            RecordData::Other { data, .. } => write!(f, " ({} bytes)", data.len()),
        }
    }
}

impl Networkable for ResourceRecord {
    #[instrument(level = "trace", skip_all)]
    fn to_bytes(&self) -> Bytes {
        let data = self.data.to_bytes();

        let mut ret = BytesMut::new();
        ret.extend_from_slice(&self.name.to_bytes());
        ret.put_u16(self.type_());
        ret.put_u16(self.class);
        ret.put_u32(self.ttl);
        ret.put_u16(data.len() as u16);
        ret.extend_from_slice(&data);

        ret.into()
    }

    #[instrument(level = "trace", skip_all)]
    fn from_bytes(bytes: &mut Cursor<&[u8]>) -> Result<Self, DnsError> {
        let name = Name::from_bytes(bytes)?;
        let type_ = bytes.read_u16()?;
        let class = bytes.read_u16()?;
        let ttl = bytes.read_u32()?;
        let data_length = bytes.read_u16()?;

        let data = RecordData::from_bytes(type_, data_length, bytes)?;

        Ok(Self {
            name,
            class,
            ttl,
            data,
        })
    }
}
