use std::io::Cursor;

use bytes::{BufMut, Bytes, BytesMut};
use num_traits::cast::FromPrimitive;
use tracing::instrument;

use super::{Name, Networkable};
use crate::wire::CheckedBuf;
use crate::{DnsError, RecordType};

/// Internet
pub const CLASS_IN: u16 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub name: Name,
    pub type_: u16,
    pub class: u16,
}

impl Question {
    pub fn new(name: Name, type_: RecordType) -> Self {
        Self {
            name,
            type_: type_ as u16,
            class: CLASS_IN,
        }
    }

    pub fn record_type(&self) -> Option<RecordType> {
        RecordType::from_u16(self.type_)
    }
}

impl Networkable for Question {
    #[instrument(level = "trace", skip_all)]
    fn to_bytes(&self) -> Bytes {
        let mut ret = BytesMut::new();

        ret.extend_from_slice(&self.name.to_bytes());
        ret.put_u16(self.type_);
        ret.put_u16(self.class);

        ret.into()
    }

    #[instrument(level = "trace", skip_all)]
    fn from_bytes(bytes: &mut Cursor<&[u8]>) -> Result<Self, DnsError> {
        let name = Name::from_bytes(bytes)?;
        let type_ = bytes.read_u16()?;
        let class = bytes.read_u16()?;

        Ok(Self { name, type_, class })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::Question;
    use crate::{DnsError, Name, Networkable, RecordType};

    #[test]
    fn encodes_question() {
        let question = Question::new(Name::new("example.com").unwrap(), RecordType::Ns);
        assert_eq!(
            &question.to_bytes()[..],
            b"\x07example\x03com\x00\x00\x02\x00\x01".as_slice()
        );
    }

    #[test]
    fn decodes_question() {
        let data = b"\x03www\x07example\x03com\x00\x00\x01\x00\x01";
        let question = Question::from_bytes(&mut Cursor::new(&data[..])).unwrap();

        assert_eq!(question.name.to_string(), "www.example.com");
        assert_eq!(question.record_type(), Some(RecordType::A));
        assert_eq!(question.class, 1);
    }

    #[test]
    fn keeps_unknown_types() {
        let data = b"\x00\x00\xff\x00\x01";
        let question = Question::from_bytes(&mut Cursor::new(&data[..])).unwrap();

        assert!(question.name.is_root());
        assert_eq!(question.type_, 255);
        assert_eq!(question.record_type(), None);
    }

    #[test]
    fn missing_class_is_truncated() {
        let data = b"\x03com\x00\x00\x01\x00";
        assert!(matches!(
            Question::from_bytes(&mut Cursor::new(&data[..])),
            Err(DnsError::TruncatedMessage { .. })
        ));
    }
}
