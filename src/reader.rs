//! Read-side byte cursor.
//!
//! A [`Reader`] walks a borrowed byte slice with an explicit position. All
//! reads are bounds-checked and report the offending offset on exhaustion;
//! nothing here panics on malformed input.

use byteorder::{ByteOrder, LittleEndian};

use crate::error::FormatError;

pub struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(bytes: &'a [u8]) -> Reader<'a> {
        Reader { bytes, pos: 0 }
    }

    // Basic operations --------------------------------------------------------

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    pub fn skip_to(&mut self, pos: usize) {
        self.pos = pos;
    }

    fn eof(&self) -> FormatError {
        FormatError::UnexpectedEof { offset: self.pos }
    }

    pub fn read_u8(&mut self) -> Result<u8, FormatError> {
        match self.bytes.get(self.pos) {
            Some(&byte) => {
                self.pos += 1;
                Ok(byte)
            }
            None => Err(self.eof()),
        }
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], FormatError> {
        if self.remaining() < len {
            return Err(self.eof());
        }
        let slice = &self.bytes[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    // Read and interpret types ------------------------------------------------

    /// Reads a little-endian u32, used for the module magic and version.
    pub fn read_u32(&mut self) -> Result<u32, FormatError> {
        let bytes = self.read_bytes(4)?;
        Ok(LittleEndian::read_u32(bytes))
    }

    /// Reads an unsigned LEB128 value of at most `bits` bits.
    fn read_vu(&mut self, bits: u32) -> Result<u64, FormatError> {
        let start = self.pos;
        let mut result: u64 = 0;
        let mut shift: u32 = 0;
        loop {
            let byte = self.read_u8()?;
            if shift + 7 > bits && byte >> (bits - shift) != 0 {
                return Err(FormatError::LebOverflow { offset: start, bits });
            }
            result |= u64::from(byte & 0x7f) << shift;
            if byte & 0x80 == 0 {
                return Ok(result);
            }
            shift += 7;
            if shift >= bits {
                return Err(FormatError::LebOverflow { offset: start, bits });
            }
        }
    }

    /// Reads a signed LEB128 value of at most `bits` bits, sign-extending
    /// when the final byte has its sign bit (0x40) set.
    fn read_vs(&mut self, bits: u32) -> Result<i64, FormatError> {
        let start = self.pos;
        let mut result: i64 = 0;
        let mut shift: u32 = 0;
        loop {
            let byte = self.read_u8()?;
            result |= i64::from(byte & 0x7f) << shift;
            shift += 7;
            if byte & 0x80 == 0 {
                if shift < 64 && byte & 0x40 != 0 {
                    result |= -1i64 << shift;
                }
                return Ok(result);
            }
            if shift >= bits {
                return Err(FormatError::LebOverflow { offset: start, bits });
            }
        }
    }

    pub fn read_vu32(&mut self) -> Result<u32, FormatError> {
        Ok(self.read_vu(32)? as u32)
    }

    pub fn read_vu64(&mut self) -> Result<u64, FormatError> {
        self.read_vu(64)
    }

    pub fn read_vs32(&mut self) -> Result<i32, FormatError> {
        let start = self.pos;
        let v = self.read_vs(35)?;
        if v < i64::from(i32::MIN) || v > i64::from(i32::MAX) {
            return Err(FormatError::LebOverflow { offset: start, bits: 32 });
        }
        Ok(v as i32)
    }

    pub fn read_vs64(&mut self) -> Result<i64, FormatError> {
        self.read_vs(64)
    }

    pub fn read_f32(&mut self) -> Result<f32, FormatError> {
        let bytes = self.read_bytes(4)?;
        Ok(LittleEndian::read_f32(bytes))
    }

    pub fn read_f64(&mut self) -> Result<f64, FormatError> {
        let bytes = self.read_bytes(8)?;
        Ok(LittleEndian::read_f64(bytes))
    }

    /// Reads a name: vu32 byte length followed by that many UTF-8 bytes.
    pub fn read_name(&mut self) -> Result<String, FormatError> {
        let len = self.read_vu32()? as usize;
        let offset = self.pos;
        let bytes = self.read_bytes(len)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| FormatError::InvalidUtf8 { offset })
    }

    /// Reads a byte vector: vu32 length followed by that many raw bytes.
    pub fn read_u8vec(&mut self) -> Result<Vec<u8>, FormatError> {
        let len = self.read_vu32()? as usize;
        Ok(self.read_bytes(len)?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_u8_and_eof() {
        let mut r = Reader::new(&[0xAB]);
        assert_eq!(r.read_u8(), Ok(0xAB));
        assert_eq!(r.read_u8(), Err(FormatError::UnexpectedEof { offset: 1 }));
    }

    #[test]
    fn read_u32_little_endian() {
        let mut r = Reader::new(&[0x00, 0x61, 0x73, 0x6d]);
        assert_eq!(r.read_u32(), Ok(0x6d73_6100));
    }

    #[test]
    fn read_vu32_vectors() {
        let cases: &[(&[u8], u32)] = &[
            (&[0x00], 0),
            (&[0x01], 1),
            (&[0x7f], 127),
            (&[0x80, 0x01], 128),
            (&[0xe5, 0x8e, 0x26], 624_485),
            (&[0xff, 0xff, 0xff, 0xff, 0x0f], u32::MAX),
        ];
        for (bytes, expected) in cases {
            let mut r = Reader::new(bytes);
            assert_eq!(r.read_vu32(), Ok(*expected), "bytes {:?}", bytes);
            assert_eq!(r.remaining(), 0);
        }
    }

    #[test]
    fn read_vu32_rejects_overflow() {
        // Six continuation bytes can never fit in 32 bits.
        let mut r = Reader::new(&[0xff, 0xff, 0xff, 0xff, 0xff, 0x01]);
        assert!(matches!(
            r.read_vu32(),
            Err(FormatError::LebOverflow { bits: 32, .. })
        ));
    }

    #[test]
    fn read_vu32_rejects_unterminated() {
        let mut r = Reader::new(&[0x80, 0x80]);
        assert_eq!(r.read_vu32(), Err(FormatError::UnexpectedEof { offset: 2 }));
    }

    #[test]
    fn read_vs32_vectors() {
        let cases: &[(&[u8], i32)] = &[
            (&[0x00], 0),
            (&[0x01], 1),
            (&[0x7f], -1),
            (&[0x3f], 63),
            (&[0x40], -64),
            (&[0xc0, 0xbb, 0x78], -123_456),
            (&[0xff, 0xff, 0xff, 0xff, 0x07], i32::MAX),
            (&[0x80, 0x80, 0x80, 0x80, 0x78], i32::MIN),
        ];
        for (bytes, expected) in cases {
            let mut r = Reader::new(bytes);
            assert_eq!(r.read_vs32(), Ok(*expected), "bytes {:?}", bytes);
        }
    }

    #[test]
    fn read_vs64_extremes() {
        let mut r = Reader::new(&[0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x00]);
        assert_eq!(r.read_vs64(), Ok(i64::MAX));
        let mut r = Reader::new(&[0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x7f]);
        assert_eq!(r.read_vs64(), Ok(i64::MIN));
    }

    #[test]
    fn read_floats() {
        let mut r = Reader::new(&[0x00, 0x00, 0x80, 0x3f]);
        assert_eq!(r.read_f32(), Ok(1.0));
        let mut r = Reader::new(&[0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xf0, 0xbf]);
        assert_eq!(r.read_f64(), Ok(-1.0));
    }

    #[test]
    fn read_name_utf8() {
        let mut r = Reader::new(&[0x03, b'a', b'd', b'd']);
        assert_eq!(r.read_name(), Ok("add".to_string()));
        let mut r = Reader::new(&[0x02, 0xff, 0xfe]);
        assert_eq!(r.read_name(), Err(FormatError::InvalidUtf8 { offset: 1 }));
    }

    #[test]
    fn read_name_truncated() {
        let mut r = Reader::new(&[0x05, b'a']);
        assert_eq!(r.read_name(), Err(FormatError::UnexpectedEof { offset: 1 }));
    }
}
