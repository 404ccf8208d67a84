use std::io::Cursor;

use bytes::{Buf, Bytes};

use crate::DnsError;

/// Bounds-checked reads. `bytes::Buf` panics on short input, replies come
/// from the network so running out of data has to be an error instead.
pub(crate) trait CheckedBuf {
    fn ensure(&self, needed: usize) -> Result<(), DnsError>;

    fn read_u8(&mut self) -> Result<u8, DnsError>;

    fn read_u16(&mut self) -> Result<u16, DnsError>;

    fn read_u32(&mut self) -> Result<u32, DnsError>;

    fn read_bytes(&mut self, len: usize) -> Result<Bytes, DnsError>;
}

impl CheckedBuf for Cursor<&[u8]> {
    fn ensure(&self, needed: usize) -> Result<(), DnsError> {
        if self.remaining() < needed {
            return Err(DnsError::TruncatedMessage {
                offset: self.position(),
                needed,
                available: self.remaining(),
            });
        }

        Ok(())
    }

    fn read_u8(&mut self) -> Result<u8, DnsError> {
        self.ensure(1)?;
        Ok(self.get_u8())
    }

    fn read_u16(&mut self) -> Result<u16, DnsError> {
        self.ensure(2)?;
        Ok(self.get_u16())
    }

    fn read_u32(&mut self) -> Result<u32, DnsError> {
        self.ensure(4)?;
        Ok(self.get_u32())
    }

    fn read_bytes(&mut self, len: usize) -> Result<Bytes, DnsError> {
        self.ensure(len)?;
        Ok(self.copy_to_bytes(len))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::CheckedBuf;
    use crate::DnsError;

    #[test]
    fn reads_big_endian() {
        let data = [0x12, 0x34, 0xde, 0xad, 0xbe, 0xef, 0x07];
        let mut cursor = Cursor::new(&data[..]);

        assert_eq!(cursor.read_u16().unwrap(), 0x1234);
        assert_eq!(cursor.read_u32().unwrap(), 0xdead_beef);
        assert_eq!(cursor.read_u8().unwrap(), 7);
    }

    #[test]
    fn short_read_reports_offset() {
        let data = [0x00, 0x01, 0x02];
        let mut cursor = Cursor::new(&data[..]);
        cursor.read_u16().unwrap();

        match cursor.read_u32() {
            Err(DnsError::TruncatedMessage {
                offset,
                needed,
                available,
            }) => {
                assert_eq!(offset, 2);
                assert_eq!(needed, 4);
                assert_eq!(available, 1);
            }
            other => panic!("expected truncation, got {other:?}"),
        }

        // nothing was consumed by the failed read
        assert_eq!(cursor.position(), 2);
    }

    #[test]
    fn reads_past_end_after_seek() {
        let data = [0x00];
        let mut cursor = Cursor::new(&data[..]);
        cursor.set_position(10);

        assert!(matches!(
            cursor.read_bytes(1),
            Err(DnsError::TruncatedMessage { available: 0, .. })
        ));
    }
}
