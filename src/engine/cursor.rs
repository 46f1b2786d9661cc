//! Bounds-checked field reads over a header buffer.
//!
//! All multi-byte integers are read most-significant byte first. Every read
//! that would run past the end of the buffer fails with
//! [`DecodeError::TruncatedInput`] tagged with the cursor's layer name.

use super::error::DecodeError;

#[derive(Debug, Clone, Copy)]
pub struct Cursor<'a> {
    layer: &'static str,
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(layer: &'static str, data: &'a [u8]) -> Self {
        Self {
            layer,
            data,
            pos: 0,
        }
    }

    pub fn layer(&self) -> &'static str {
        self.layer
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Fails unless the whole buffer holds at least `len` bytes.
    pub fn require(&self, len: usize) -> Result<(), DecodeError> {
        if len > self.data.len() {
            return Err(self.truncated(len));
        }
        Ok(())
    }

    pub fn advance(&mut self, bytes: usize) -> Result<(), DecodeError> {
        let end = self.end_of(self.pos, bytes)?;
        self.pos = end;
        Ok(())
    }

    pub fn read_u8(&mut self) -> Result<u8, DecodeError> {
        let value = self.u8_at(self.pos)?;
        self.pos += 1;
        Ok(value)
    }

    pub fn read_u16_be(&mut self) -> Result<u16, DecodeError> {
        let value = self.u16_at(self.pos)?;
        self.pos += 2;
        Ok(value)
    }

    pub fn read_u32_be(&mut self) -> Result<u32, DecodeError> {
        let value = self.u32_at(self.pos)?;
        self.pos += 4;
        Ok(value)
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        let value = self.array_at::<N>(self.pos)?;
        self.pos += N;
        Ok(value)
    }

    pub fn read_exact(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
        let out = self.slice_at(self.pos, len)?;
        self.pos += len;
        Ok(out)
    }

    pub fn u8_at(&self, offset: usize) -> Result<u8, DecodeError> {
        let [byte] = self.array_at::<1>(offset)?;
        Ok(byte)
    }

    pub fn u16_at(&self, offset: usize) -> Result<u16, DecodeError> {
        Ok(u16::from_be_bytes(self.array_at::<2>(offset)?))
    }

    pub fn u32_at(&self, offset: usize) -> Result<u32, DecodeError> {
        Ok(u32::from_be_bytes(self.array_at::<4>(offset)?))
    }

    /// Copies a fixed-length field, e.g. a 6-byte MAC or 4-byte IPv4 address.
    pub fn array_at<const N: usize>(&self, offset: usize) -> Result<[u8; N], DecodeError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.slice_at(offset, N)?);
        Ok(out)
    }

    pub fn slice_at(&self, offset: usize, len: usize) -> Result<&'a [u8], DecodeError> {
        let end = self.end_of(offset, len)?;
        Ok(&self.data[offset..end])
    }

    /// Everything from `offset` to the end of the buffer.
    pub fn tail_from(&self, offset: usize) -> Result<&'a [u8], DecodeError> {
        self.data
            .get(offset..)
            .ok_or_else(|| self.truncated(offset))
    }

    pub fn rest(&self) -> &'a [u8] {
        self.data.get(self.pos..).unwrap_or_default()
    }

    fn end_of(&self, offset: usize, len: usize) -> Result<usize, DecodeError> {
        match offset.checked_add(len) {
            Some(end) if end <= self.data.len() => Ok(end),
            Some(end) => Err(self.truncated(end)),
            None => Err(self.truncated(usize::MAX)),
        }
    }

    fn truncated(&self, needed: usize) -> DecodeError {
        DecodeError::truncated(self.layer, needed, self.data.len())
    }
}

/// Extracts `mask` bits of `value` after shifting right by `shift`.
pub fn bit_field(value: u16, shift: u32, mask: u16) -> u16 {
    (value >> shift) & mask
}

pub fn bit_flag(value: u16, bit: u32) -> bool {
    bit_field(value, bit, 1) == 1
}

/// High nibble of a byte.
pub fn high_nibble(byte: u8) -> u8 {
    byte >> 4
}

pub fn low_nibble(byte: u8) -> u8 {
    byte & 0x0f
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_network_byte_order() {
        let data = [0x12, 0x34, 0x56, 0x78, 0x9a];
        let mut cursor = Cursor::new("test", &data);
        assert_eq!(cursor.read_u16_be(), Ok(0x1234));
        assert_eq!(cursor.u32_at(1), Ok(0x3456_789a));
        assert_eq!(cursor.read_u8(), Ok(0x56));
        assert_eq!(cursor.pos(), 3);
        assert_eq!(cursor.rest(), &[0x78, 0x9a]);
    }

    #[test]
    fn reads_fixed_length_addresses() {
        let data = [0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff, 10, 0, 0, 1];
        let mut cursor = Cursor::new("test", &data);
        assert_eq!(
            cursor.read_array::<6>(),
            Ok([0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff])
        );
        assert_eq!(cursor.read_array::<4>(), Ok([10, 0, 0, 1]));
        assert_eq!(cursor.remaining(), 0);
    }

    #[test]
    fn out_of_bounds_reads_are_truncated_input() {
        let data = [0x00, 0x01, 0x02];
        let cursor = Cursor::new("udp", &data);
        assert_eq!(
            cursor.u32_at(0),
            Err(DecodeError::TruncatedInput {
                layer: "udp",
                needed: 4,
                available: 3
            })
        );
        assert!(cursor.u16_at(2).is_err());
        assert!(cursor.slice_at(usize::MAX, 2).is_err());
        assert!(cursor.tail_from(4).is_err());
        assert_eq!(cursor.tail_from(3), Ok(&[][..]));
    }

    #[test]
    fn failed_read_does_not_move_the_cursor() {
        let data = [0x01];
        let mut cursor = Cursor::new("test", &data);
        assert!(cursor.read_u16_be().is_err());
        assert_eq!(cursor.pos(), 0);
        assert!(cursor.advance(2).is_err());
        assert_eq!(cursor.read_u8(), Ok(0x01));
    }

    #[test]
    fn extracts_bit_fields() {
        // data offset 5, SYN only
        let word = 0x5002u16;
        assert_eq!(bit_field(word, 12, 0x0f), 5);
        assert_eq!(bit_field(word, 0, 0x3f), 0b000010);
        assert!(bit_flag(word, 1));
        assert!(!bit_flag(word, 0));
        assert_eq!(high_nibble(0x4f), 4);
        assert_eq!(low_nibble(0x4f), 15);
    }
}
