use std::net::Ipv4Addr;
use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DnsError {
    #[error("label `{label}` is {len} bytes long, labels are limited to 63")]
    LabelTooLong { label: String, len: usize },

    #[error("empty label in name `{0}`")]
    EmptyLabel(String),

    #[error("truncated message: need {needed} bytes at offset {offset}, {available} available")]
    TruncatedMessage {
        offset: u64,
        needed: usize,
        available: usize,
    },

    /// The header announced fewer records than the message holds. Counted
    /// with `TruncatedMessage` as a section count mismatch.
    #[error("{0} bytes left over after the last section")]
    TrailingBytes(usize),

    #[error("reserved label type in length byte {0:#04x}")]
    ReservedLabelType(u8),

    #[error("type {type_} record declares {actual} bytes of data, expected {expected}")]
    InvalidRecordLength {
        type_: u16,
        expected: usize,
        actual: usize,
    },

    #[error("compression pointer to offset {0} revisits a name already followed")]
    CompressionCycle(u16),

    #[error("compression pointer to offset {offset} is outside the {len} byte message")]
    BadPointer { offset: u16, len: usize },

    #[error("no reply from {server} within {timeout:?}")]
    Timeout { server: Ipv4Addr, timeout: Duration },

    #[error("network error: {0}")]
    Io(#[from] std::io::Error),

    #[error("reply id {got:#06x} does not match query id {expected:#06x}")]
    IdMismatch { expected: u16, got: u16 },

    #[error("reply from {0} has no answer, glue or referral")]
    Unresolvable(Ipv4Addr),

    #[error("delegation walk gave up after {0} hops")]
    TooManyHops(usize),

    #[error("nameserver lookups nested deeper than {0} levels")]
    NestingTooDeep(usize),
}

impl DnsError {
    /// Section counts that disagree with the data, in either direction.
    pub fn is_truncation(&self) -> bool {
        matches!(self, Self::TruncatedMessage { .. } | Self::TrailingBytes(_))
    }

    /// Malformed input on either side of the codec.
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            Self::LabelTooLong { .. }
                | Self::EmptyLabel(_)
                | Self::TruncatedMessage { .. }
                | Self::TrailingBytes(_)
                | Self::ReservedLabelType(_)
                | Self::InvalidRecordLength { .. }
                | Self::BadPointer { .. }
        )
    }
}
