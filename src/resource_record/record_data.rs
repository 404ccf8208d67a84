use std::io::Cursor;
use std::net::Ipv4Addr;

use bytes::Bytes;
use num_traits::cast::FromPrimitive;
use tracing::warn;

use crate::wire::CheckedBuf;
use crate::{DnsError, Name, Networkable, RecordType};

/// Record payload, tagged by record type. Only A and NS are interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordData {
    A(Ipv4Addr),
    Ns(Name),
    Other { type_: u16, data: Bytes },
}

impl RecordData {
    pub fn type_(&self) -> u16 {
        match self {
            Self::A(_) => RecordType::A as u16,
            Self::Ns(_) => RecordType::Ns as u16,
            Self::Other { type_, .. } => *type_,
        }
    }

    pub fn from_bytes(
        type_: u16,
        rd_length: u16,
        bytes: &mut Cursor<&[u8]>,
    ) -> Result<Self, DnsError> {
        match RecordType::from_u16(type_) {
            Some(RecordType::A) => {
                if rd_length != 4 {
                    return Err(DnsError::InvalidRecordLength {
                        type_,
                        expected: 4,
                        actual: rd_length as usize,
                    });
                }

                Ok(Self::A(bytes.read_u32()?.into()))
            }

            Some(RecordType::Ns) => {
                // May be compressed, so the name decides how much is consumed
                let start = bytes.position();
                let name = Name::from_bytes(bytes)?;
                let consumed = bytes.position() - start;
                if consumed != rd_length as u64 {
                    warn!(consumed, rd_length, "NS data length disagrees with its name");
                }

                Ok(Self::Ns(name))
            }

            _ => Ok(Self::Other {
                type_,
                data: bytes.read_bytes(rd_length as usize)?,
            }),
        }
    }

    pub fn to_bytes(&self) -> Bytes {
        match self {
            Self::A(addr) => Bytes::copy_from_slice(&addr.octets()),
            Self::Ns(name) => name.to_bytes(),
            Self::Other { data, .. } => data.clone(),
        }
    }
}
