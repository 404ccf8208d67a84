use std::collections::HashSet;
use std::fmt::Display;
use std::hash::{Hash, Hasher};
use std::io::Cursor;

use bytes::{BufMut, Bytes, BytesMut};
use itertools::Itertools;
use tracing::instrument;

use super::Networkable;
use crate::wire::CheckedBuf;
use crate::DnsError;

const MAX_LABEL_LEN: usize = 63;
const POINTER_TAG: u8 = 0b1100_0000;

/// A domain name as a sequence of raw labels.
///
/// Labels read off the wire are kept as bytes and never required to be
/// UTF-8. Comparison ignores ASCII case, the way nameservers match names.
#[derive(Debug, Clone, Default)]
pub struct Name {
    labels: Vec<Bytes>,
}

impl Name {
    /// Parses a dotted name such as `www.example.com`. A single trailing dot
    /// is accepted, and both `""` and `"."` mean the root.
    pub fn new(name: &str) -> Result<Self, DnsError> {
        let trimmed = name.strip_suffix('.').unwrap_or(name);
        if trimmed.is_empty() {
            return Ok(Self::root());
        }

        Self::from_labels(trimmed.split('.').map(|s| s.as_bytes().to_vec()))
            .map_err(|e| match e {
                DnsError::EmptyLabel(_) => DnsError::EmptyLabel(name.to_owned()),
                other => other,
            })
    }

    pub fn from_labels<I, L>(labels: I) -> Result<Self, DnsError>
    where
        I: IntoIterator<Item = L>,
        L: Into<Bytes>,
    {
        let labels: Vec<Bytes> = labels.into_iter().map(Into::into).collect();

        for label in &labels {
            if label.is_empty() {
                return Err(DnsError::EmptyLabel(
                    labels.iter().map(|l| String::from_utf8_lossy(l)).join("."),
                ));
            }

            if label.len() > MAX_LABEL_LEN {
                return Err(DnsError::LabelTooLong {
                    label: String::from_utf8_lossy(label).into_owned(),
                    len: label.len(),
                });
            }
        }

        Ok(Self { labels })
    }

    pub fn root() -> Self {
        Self::default()
    }

    pub fn is_root(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn labels(&self) -> impl Iterator<Item = &[u8]> + '_ {
        self.labels.iter().map(|l| l.as_ref())
    }
}

impl PartialEq for Name {
    fn eq(&self, other: &Self) -> bool {
        self.labels.len() == other.labels.len()
            && self
                .labels
                .iter()
                .zip(&other.labels)
                .all(|(a, b)| a.eq_ignore_ascii_case(b))
    }
}

impl Eq for Name {}

impl Hash for Name {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.labels.len());
        for label in &self.labels {
            state.write_usize(label.len());
            for byte in label.iter() {
                state.write_u8(byte.to_ascii_lowercase());
            }
        }
    }
}

impl Display for Name {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_root() {
            return f.write_str(".");
        }

        let text = self
            .labels
            .iter()
            .map(|l| String::from_utf8_lossy(l))
            .join(".");
        f.write_str(&text)
    }
}

impl Networkable for Name {
    /// Never compresses.
    fn to_bytes(&self) -> Bytes {
        let len = self.labels.iter().map(|l| l.len() + 1).sum::<usize>() + 1;
        let mut ret = BytesMut::with_capacity(len);

        for label in &self.labels {
            ret.put_u8(label.len() as u8);
            ret.extend_from_slice(label);
        }

        ret.put_u8(0);

        ret.into()
    }

    /// Follows compression pointers iteratively. Every pointer target is
    /// remembered, so a chain that comes back to one fails instead of
    /// looping. After a pointer the cursor is left just past the first
    /// pointer read, which always ends the name at its original position.
    #[instrument(level = "trace", skip_all)]
    fn from_bytes(bytes: &mut Cursor<&[u8]>) -> Result<Self, DnsError> {
        let mut labels = Vec::new();
        let mut visited = HashSet::new();
        let mut resume_at = None;

        loop {
            let len = bytes.read_u8()?;

            match len & POINTER_TAG {
                0 if len == 0 => break,
                0 => labels.push(bytes.read_bytes(len as usize)?),
                POINTER_TAG => {
                    // Compressed
                    let pointer = (((len & !POINTER_TAG) as u16) << 8) | bytes.read_u8()? as u16;

                    let message_len = bytes.get_ref().len();
                    if pointer as usize >= message_len {
                        return Err(DnsError::BadPointer {
                            offset: pointer,
                            len: message_len,
                        });
                    }

                    if !visited.insert(pointer) {
                        return Err(DnsError::CompressionCycle(pointer));
                    }

                    resume_at.get_or_insert(bytes.position());
                    bytes.set_position(pointer as u64);
                }
                _ => return Err(DnsError::ReservedLabelType(len)),
            }
        }

        if let Some(position) = resume_at {
            bytes.set_position(position);
        }

        Ok(Self { labels })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use crate::{DnsError, Name, Networkable};

    fn decode_at(data: &[u8], position: u64) -> Result<(Name, u64), DnsError> {
        let mut cursor = Cursor::new(data);
        cursor.set_position(position);
        let name = Name::from_bytes(&mut cursor)?;
        Ok((name, cursor.position()))
    }

    #[test]
    fn encodes_labels() {
        let name = Name::new("www.example.com").unwrap();
        assert_eq!(
            &name.to_bytes()[..],
            b"\x03www\x07example\x03com\x00".as_slice()
        );
    }

    #[test]
    fn trailing_dot_and_root() {
        assert_eq!(
            Name::new("example.com.").unwrap(),
            Name::new("example.com").unwrap()
        );
        assert!(Name::new("").unwrap().is_root());
        assert!(Name::new(".").unwrap().is_root());
        assert_eq!(&Name::root().to_bytes()[..], &[0]);
        assert_eq!(Name::root().to_string(), ".");
    }

    #[test]
    fn rejects_bad_labels() {
        let long = "a".repeat(64);
        assert!(matches!(
            Name::new(&format!("{long}.com")),
            Err(DnsError::LabelTooLong { len: 64, .. })
        ));
        assert!(Name::new(&format!("{}.com", "a".repeat(63))).is_ok());

        match Name::new("a..b") {
            Err(DnsError::EmptyLabel(name)) => assert_eq!(name, "a..b"),
            other => panic!("expected empty label error, got {other:?}"),
        }
    }

    #[test]
    fn compares_ignoring_case() {
        let a = Name::new("WWW.Example.COM").unwrap();
        let b = Name::new("www.example.com").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, Name::new("www.example.org").unwrap());

        let set: std::collections::HashSet<Name> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn round_trips_without_compression() {
        for num_labels in [1, 2, 5, 64, 127] {
            for label_len in [1, 2, 31, 63] {
                let labels: Vec<Vec<u8>> = (0..num_labels)
                    .map(|i| vec![b'a' + (i % 26) as u8; label_len])
                    .collect();
                let name = Name::from_labels(labels.clone()).unwrap();

                let bytes = name.to_bytes();
                let (decoded, position) = decode_at(&bytes, 0).unwrap();

                assert_eq!(decoded, name);
                assert_eq!(position as usize, bytes.len());
                let decoded: Vec<&[u8]> = decoded.labels().collect();
                let expected: Vec<&[u8]> = labels.iter().map(|l| l.as_slice()).collect();
                assert_eq!(decoded, expected);
            }
        }
    }

    #[test]
    fn keeps_non_utf8_labels() {
        let data = b"\x02\xff\xfe\x03com\x00";
        let (name, _) = decode_at(data, 0).unwrap();
        let labels: Vec<&[u8]> = name.labels().collect();
        assert_eq!(labels, vec![&b"\xff\xfe"[..], &b"com"[..]]);
        assert_eq!(name.to_string(), "\u{fffd}\u{fffd}.com");
    }

    #[test]
    fn follows_pointer_and_restores_position() {
        // "example.com" at 0, then "www" + pointer to 0, then a u16 marker
        let mut data = b"\x07example\x03com\x00".to_vec();
        let second = data.len() as u64;
        data.extend_from_slice(b"\x03www\xc0\x00");
        data.extend_from_slice(&[0xbe, 0xef]);

        let (direct, _) = decode_at(&data, 0).unwrap();
        let (pointed, position) = decode_at(&data, second + 4).unwrap();
        assert_eq!(pointed, direct);
        assert_eq!(position, second + 6);

        let mut cursor = Cursor::new(&data[..]);
        cursor.set_position(second);
        let name = Name::from_bytes(&mut cursor).unwrap();
        assert_eq!(name.to_string(), "www.example.com");
        assert_eq!(&data[cursor.position() as usize..], &[0xbe, 0xef]);
    }

    #[test]
    fn follows_chained_pointers() {
        // 0: com, 5: example -> 0, 15: www -> 5
        let mut data = b"\x03com\x00".to_vec();
        data.extend_from_slice(b"\x07example\xc0\x00");
        data.extend_from_slice(b"\x03www\xc0\x05");

        let (name, position) = decode_at(&data, 15).unwrap();
        assert_eq!(name, Name::new("www.example.com").unwrap());
        assert_eq!(position as usize, data.len());
    }

    #[test]
    fn detects_pointer_cycles() {
        // pointer to itself
        assert!(matches!(
            decode_at(&[0xc0, 0x00], 0),
            Err(DnsError::CompressionCycle(0))
        ));

        // 0: "a" -> 4, 4: "b" -> 0
        let data = b"\x01a\xc0\x04\x01b\xc0\x00";
        assert!(matches!(
            decode_at(data, 0),
            Err(DnsError::CompressionCycle(_))
        ));
    }

    #[test]
    fn rejects_pointer_outside_message() {
        assert!(matches!(
            decode_at(&[0x01, b'a', 0xc0, 0x40], 0),
            Err(DnsError::BadPointer { offset: 0x40, len: 4 })
        ));
    }

    #[test]
    fn rejects_reserved_label_types() {
        assert!(matches!(
            decode_at(&[0x40, 0x00], 0),
            Err(DnsError::ReservedLabelType(0x40))
        ));
        assert!(matches!(
            decode_at(&[0x80, 0x00], 0),
            Err(DnsError::ReservedLabelType(0x80))
        ));
    }

    #[test]
    fn truncated_label() {
        assert!(matches!(
            decode_at(b"\x07exam", 0),
            Err(DnsError::TruncatedMessage { .. })
        ));
        assert!(matches!(
            decode_at(b"\x03com", 0),
            Err(DnsError::TruncatedMessage { .. })
        ));
    }
}
