//! Forward-only reader over an immutable byte buffer

use crate::error::CroError;

/// Position into a byte buffer that only moves forward.
///
/// Every read either consumes exactly the requested bytes or fails with
/// [`CroError::TruncatedStream`] and leaves the position unchanged.
#[derive(Debug, Clone, Copy)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    /// Create a cursor at the start of `data`
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Create a cursor at `offset`, failing if it lies past the end
    pub fn at(data: &'a [u8], offset: usize) -> Result<Self, CroError> {
        if offset > data.len() {
            return Err(CroError::truncated(0, offset, data.len()));
        }
        Ok(Self { data, pos: offset })
    }

    /// Current offset from the start of the buffer
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left to read
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn is_at_end(&self) -> bool {
        self.pos == self.data.len()
    }

    /// Read exactly `len` bytes
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], CroError> {
        if len > self.remaining() {
            return Err(CroError::truncated(self.pos, len, self.remaining()));
        }
        let bytes = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }

    /// Read a single byte
    pub fn read_u8(&mut self) -> Result<u8, CroError> {
        Ok(self.read_bytes(1)?[0])
    }

    /// Read a 16-bit little-endian integer
    pub fn read_u16(&mut self) -> Result<u16, CroError> {
        let bytes = self.read_array::<2>()?;
        Ok(u16::from_le_bytes(bytes))
    }

    /// Read a 32-bit little-endian integer
    pub fn read_u32(&mut self) -> Result<u32, CroError> {
        let bytes = self.read_array::<4>()?;
        Ok(u32::from_le_bytes(bytes))
    }

    /// Read bytes up to (not including) a `0x00` terminator, consuming the
    /// terminator. The result is at most `max_len` bytes long.
    pub fn read_until_nul(&mut self, max_len: usize) -> Result<&'a [u8], CroError> {
        let window = &self.data[self.pos..];
        let limit = window.len().min(max_len.saturating_add(1));
        match window[..limit].iter().position(|&b| b == 0) {
            Some(len) => {
                let bytes = &window[..len];
                self.pos += len + 1;
                Ok(bytes)
            }
            None => Err(CroError::truncated(self.pos, limit + 1, limit)),
        }
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], CroError> {
        let mut buf = [0u8; N];
        buf.copy_from_slice(self.read_bytes(N)?);
        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_le_integers() {
        let data = [0x01, 0x34, 0x12, 0x78, 0x56, 0x34, 0x12];
        let mut cursor = ByteCursor::new(&data);
        assert_eq!(cursor.read_u8().unwrap(), 0x01);
        assert_eq!(cursor.read_u16().unwrap(), 0x1234);
        assert_eq!(cursor.read_u32().unwrap(), 0x1234_5678);
        assert!(cursor.is_at_end());
    }

    #[test]
    fn test_short_read_does_not_advance() {
        let data = [0xAA, 0xBB, 0xCC];
        let mut cursor = ByteCursor::new(&data);
        cursor.read_u8().unwrap();

        let err = cursor.read_u32().unwrap_err();
        assert_eq!(
            err,
            CroError::TruncatedStream {
                offset: 1,
                needed: 4,
                available: 2
            }
        );
        assert_eq!(cursor.position(), 1);
        assert_eq!(cursor.remaining(), 2);
    }

    #[test]
    fn test_at_past_end() {
        let data = [0u8; 4];
        assert!(ByteCursor::at(&data, 4).unwrap().is_at_end());
        assert!(matches!(
            ByteCursor::at(&data, 5),
            Err(CroError::TruncatedStream { .. })
        ));
    }

    #[test]
    fn test_read_until_nul() {
        let data = b"NAME\0rest";
        let mut cursor = ByteCursor::new(data);
        assert_eq!(cursor.read_until_nul(64).unwrap(), b"NAME");
        assert_eq!(cursor.position(), 5);

        let mut cursor = ByteCursor::new(b"no terminator");
        assert!(cursor.read_until_nul(64).is_err());
        assert_eq!(cursor.position(), 0);

        let mut cursor = ByteCursor::new(b"LONGNAME\0");
        assert!(cursor.read_until_nul(4).is_err());
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn test_read_until_nul_exact_max_len() {
        let mut cursor = ByteCursor::new(b"ABCD\0");
        assert_eq!(cursor.read_until_nul(4).unwrap(), b"ABCD");
        assert!(cursor.is_at_end());

        let mut cursor = ByteCursor::new(b"ABCD\0");
        assert_eq!(
            cursor.read_until_nul(3).unwrap_err(),
            CroError::TruncatedStream {
                offset: 0,
                needed: 5,
                available: 4
            }
        );
    }
}
