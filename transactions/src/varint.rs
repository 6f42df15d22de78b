//! Variable-length integers and the wire byte reader.
//!
//! VL integers are little-endian base-128: seven value bits per byte, high
//! bit set on every byte except the last.

use strand_types::TxError;

/// Append the VL encoding of `value` to `out`.
pub fn write_vl(out: &mut Vec<u8>, mut value: u64) {
    loop {
        let byte = (value & 0x7F) as u8;
        value >>= 7;
        if value == 0 {
            out.push(byte);
            return;
        }
        out.push(byte | 0x80);
    }
}

/// Append a VL length prefix followed by the bytes themselves.
pub fn write_vl_bytes(out: &mut Vec<u8>, bytes: &[u8]) {
    write_vl(out, bytes.len() as u64);
    out.extend_from_slice(bytes);
}

/// Cursor over wire bytes with bounds-checked primitive reads.
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], TxError> {
        if self.remaining() < len {
            return Err(TxError::malformed("unexpected end of data"));
        }
        let slice = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    pub fn read_u8(&mut self) -> Result<u8, TxError> {
        Ok(self.read_bytes(1)?[0])
    }

    pub fn read_u16_le(&mut self) -> Result<u16, TxError> {
        let bytes = self.read_bytes(2)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    pub fn read_u32_le(&mut self) -> Result<u32, TxError> {
        let bytes = self.read_bytes(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    pub fn read_u64_le(&mut self) -> Result<u64, TxError> {
        let bytes: [u8; 8] = self.read_bytes(8)?.try_into().unwrap_or([0u8; 8]);
        Ok(u64::from_le_bytes(bytes))
    }

    /// Read a VL integer; rejects encodings longer than a u64 can hold.
    pub fn read_vl(&mut self) -> Result<u64, TxError> {
        let mut value: u64 = 0;
        let mut shift = 0u32;
        loop {
            let byte = self.read_u8()?;
            if shift >= 63 && byte > 1 {
                return Err(TxError::malformed("varint overflow"));
            }
            value |= ((byte & 0x7F) as u64) << shift;
            if byte & 0x80 == 0 {
                return Ok(value);
            }
            shift += 7;
        }
    }

    /// Read a VL length prefix, then that many bytes.
    pub fn read_vl_bytes(&mut self) -> Result<&'a [u8], TxError> {
        let len = self.read_vl()?;
        if len > self.remaining() as u64 {
            return Err(TxError::malformed("length prefix exceeds data"));
        }
        self.read_bytes(len as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn encode(value: u64) -> Vec<u8> {
        let mut out = Vec::new();
        write_vl(&mut out, value);
        out
    }

    #[test]
    fn small_values_single_byte() {
        assert_eq!(encode(0), [0x00]);
        assert_eq!(encode(1), [0x01]);
        assert_eq!(encode(127), [0x7F]);
    }

    #[test]
    fn continuation_bit_set() {
        assert_eq!(encode(128), [0x80, 0x01]);
        assert_eq!(encode(300), [0xAC, 0x02]);
    }

    #[test]
    fn truncated_varint_rejected() {
        let mut reader = ByteReader::new(&[0x80]);
        assert!(reader.read_vl().is_err());
    }

    #[test]
    fn vl_bytes_roundtrip() {
        let mut out = Vec::new();
        write_vl_bytes(&mut out, b"hello");
        let mut reader = ByteReader::new(&out);
        assert_eq!(reader.read_vl_bytes().unwrap(), b"hello");
        assert!(reader.is_empty());
    }

    #[test]
    fn length_prefix_beyond_data_rejected() {
        let mut reader = ByteReader::new(&[0x05, 0x01]);
        assert!(reader.read_vl_bytes().is_err());
    }

    #[test]
    fn reads_are_bounds_checked() {
        let mut reader = ByteReader::new(&[1, 2, 3]);
        assert!(reader.read_u32_le().is_err());
        assert_eq!(reader.read_u16_le().unwrap(), 0x0201);
        assert_eq!(reader.remaining(), 1);
    }

    proptest! {
        #[test]
        fn roundtrip_any_u64(value: u64) {
            let bytes = encode(value);
            let mut reader = ByteReader::new(&bytes);
            prop_assert_eq!(reader.read_vl().unwrap(), value);
            prop_assert!(reader.is_empty());
        }
    }
}
