//! Write-side encoding primitives and binary format constants.
//!
//! Provides LEB128 integer encoding, IEEE 754 float encoding, and name/byte
//! vector encoding as specified by the WebAssembly binary format. All
//! functions append directly to a caller-provided `&mut Vec<u8>` buffer; the
//! buffer's written prefix is the output.

use byteorder::{LittleEndian, WriteBytesExt};

// ---------------------------------------------------------------------------
// Binary format constants
// ---------------------------------------------------------------------------

pub const MAGIC: [u8; 4] = *b"\0asm";
pub const VERSION: u32 = 1;

// Section IDs
pub const SECTION_CUSTOM: u8 = 0;
pub const SECTION_TYPE: u8 = 1;
pub const SECTION_IMPORT: u8 = 2;
pub const SECTION_FUNCTION: u8 = 3;
pub const SECTION_TABLE: u8 = 4;
pub const SECTION_MEMORY: u8 = 5;
pub const SECTION_GLOBAL: u8 = 6;
pub const SECTION_EXPORT: u8 = 7;
pub const SECTION_START: u8 = 8;
pub const SECTION_ELEMENT: u8 = 9;
pub const SECTION_CODE: u8 = 10;
pub const SECTION_DATA: u8 = 11;
pub const SECTION_DATA_COUNT: u8 = 12;

// Type constructors
pub const TYPE_FUNC: u8 = 0x60;

// Import/export descriptor kinds
pub const DESC_FUNC: u8 = 0x00;
pub const DESC_TABLE: u8 = 0x01;
pub const DESC_MEMORY: u8 = 0x02;
pub const DESC_GLOBAL: u8 = 0x03;

// Limits flags
pub const LIMITS_MIN: u8 = 0x00;
pub const LIMITS_MIN_MAX: u8 = 0x01;

// Element segment flags.
// 3-bit encoding: bit 0 = non-active mode, bit 1 = explicit table (active)
// or declarative (non-active), bit 2 = expression content.
pub const ELEM_ACTIVE_FUNCS: u32 = 0;
pub const ELEM_PASSIVE_FUNCS: u32 = 1;
pub const ELEM_ACTIVE_TABLE_FUNCS: u32 = 2;
pub const ELEM_DECLARATIVE_FUNCS: u32 = 3;
pub const ELEM_ACTIVE_EXPRS: u32 = 4;
pub const ELEM_PASSIVE_EXPRS: u32 = 5;
pub const ELEM_ACTIVE_TABLE_EXPRS: u32 = 6;
pub const ELEM_DECLARATIVE_EXPRS: u32 = 7;

// Element segment elemkind
pub const ELEMKIND_FUNCREF: u8 = 0x00;

// Data segment flags
pub const DATA_ACTIVE: u32 = 0;
pub const DATA_PASSIVE: u32 = 1;
pub const DATA_ACTIVE_EXPLICIT: u32 = 2;

// Expression structure
pub const OP_ELSE: u8 = 0x05;
pub const OP_END: u8 = 0x0B;
pub const BLOCK_TYPE_EMPTY: u8 = 0x40;

// Opcode prefixes for the extended opcode spaces
pub const PREFIX_MISC: u8 = 0xFC;
pub const PREFIX_SIMD: u8 = 0xFD;

// ---------------------------------------------------------------------------
// Unsigned LEB128
// ---------------------------------------------------------------------------

/// Appends the unsigned LEB128 encoding of a u64 value to `buf`.
fn write_vu(buf: &mut Vec<u8>, mut value: u64) {
    loop {
        let mut byte = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            buf.push(byte);
            break;
        }
        byte |= 0x80;
        buf.push(byte);
    }
}

/// Appends the unsigned LEB128 encoding of a u32 value to `buf`.
pub fn write_vu32(buf: &mut Vec<u8>, v: u32) {
    write_vu(buf, u64::from(v));
}

/// Appends the unsigned LEB128 encoding of a u64 value to `buf`.
pub fn write_vu64(buf: &mut Vec<u8>, v: u64) {
    write_vu(buf, v);
}

// ---------------------------------------------------------------------------
// Signed LEB128
// ---------------------------------------------------------------------------

/// Appends the signed LEB128 encoding of an i64 value to `buf`.
fn write_vs(buf: &mut Vec<u8>, mut value: i64) {
    loop {
        let mut byte = (value & 0x7f) as u8;
        value >>= 7;
        if (value == 0 && (byte & 0x40) == 0) || (value == -1 && (byte & 0x40) != 0) {
            buf.push(byte);
            break;
        }
        byte |= 0x80;
        buf.push(byte);
    }
}

/// Appends the signed LEB128 encoding of an i32 value to `buf`.
pub fn write_vs32(buf: &mut Vec<u8>, v: i32) {
    write_vs(buf, i64::from(v));
}

/// Appends the signed LEB128 encoding of an i64 value to `buf`.
pub fn write_vs64(buf: &mut Vec<u8>, v: i64) {
    write_vs(buf, v);
}

// ---------------------------------------------------------------------------
// Floats, names, byte vectors
// ---------------------------------------------------------------------------

/// Appends the little-endian IEEE 754 encoding of an f32 to `buf`.
pub fn write_f32(buf: &mut Vec<u8>, v: f32) {
    // Vec<u8> as io::Write never fails.
    let _ = buf.write_f32::<LittleEndian>(v);
}

/// Appends the little-endian IEEE 754 encoding of an f64 to `buf`.
pub fn write_f64(buf: &mut Vec<u8>, v: f64) {
    let _ = buf.write_f64::<LittleEndian>(v);
}

/// Appends a name: vu32 byte length followed by UTF-8 bytes.
pub fn write_name(buf: &mut Vec<u8>, name: &str) {
    write_vu32(buf, name.len() as u32);
    buf.extend_from_slice(name.as_bytes());
}

/// Appends a byte vector: vu32 length followed by raw bytes.
pub fn write_u8vec(buf: &mut Vec<u8>, bytes: &[u8]) {
    write_vu32(buf, bytes.len() as u32);
    buf.extend_from_slice(bytes);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::Reader;
    use rand::Rng;

    fn vu32_bytes(v: u32) -> Vec<u8> {
        let mut buf = Vec::new();
        write_vu32(&mut buf, v);
        buf
    }

    fn vs32_bytes(v: i32) -> Vec<u8> {
        let mut buf = Vec::new();
        write_vs32(&mut buf, v);
        buf
    }

    #[test]
    fn vu32_vectors() {
        assert_eq!(vu32_bytes(0), vec![0x00]);
        assert_eq!(vu32_bytes(1), vec![0x01]);
        assert_eq!(vu32_bytes(127), vec![0x7f]);
        assert_eq!(vu32_bytes(128), vec![0x80, 0x01]);
        assert_eq!(vu32_bytes(624_485), vec![0xe5, 0x8e, 0x26]);
        assert_eq!(vu32_bytes(u32::MAX), vec![0xff, 0xff, 0xff, 0xff, 0x0f]);
    }

    #[test]
    fn vs32_vectors() {
        assert_eq!(vs32_bytes(0), vec![0x00]);
        assert_eq!(vs32_bytes(-1), vec![0x7f]);
        assert_eq!(vs32_bytes(63), vec![0x3f]);
        assert_eq!(vs32_bytes(-64), vec![0x40]);
        assert_eq!(vs32_bytes(64), vec![0xc0, 0x00]);
        assert_eq!(vs32_bytes(-123_456), vec![0xc0, 0xbb, 0x78]);
        assert_eq!(vs32_bytes(i32::MAX), vec![0xff, 0xff, 0xff, 0xff, 0x07]);
        assert_eq!(vs32_bytes(i32::MIN), vec![0x80, 0x80, 0x80, 0x80, 0x78]);
    }

    #[test]
    fn vs64_extremes() {
        let mut buf = Vec::new();
        write_vs64(&mut buf, i64::MIN);
        assert_eq!(
            buf,
            vec![0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x7f]
        );
    }

    #[test]
    fn vu32_random_round_trip() {
        let mut rng = rand::thread_rng();
        for _ in 0..1000 {
            let v: u32 = rng.gen();
            let bytes = vu32_bytes(v);
            let mut r = Reader::new(&bytes);
            assert_eq!(r.read_vu32(), Ok(v), "value {v} bytes {}", hex::encode(&bytes));
            assert_eq!(r.remaining(), 0);
        }
    }

    #[test]
    fn vs64_random_round_trip() {
        let mut rng = rand::thread_rng();
        for _ in 0..1000 {
            let v: i64 = rng.gen();
            let mut bytes = Vec::new();
            write_vs64(&mut bytes, v);
            let mut r = Reader::new(&bytes);
            assert_eq!(r.read_vs64(), Ok(v), "value {v} bytes {}", hex::encode(&bytes));
            assert_eq!(r.remaining(), 0);
        }
    }

    #[test]
    fn float_round_trip() {
        for v in [0.0f64, -0.0, 1.5, f64::INFINITY, f64::MIN_POSITIVE].iter() {
            let mut buf = Vec::new();
            write_f64(&mut buf, *v);
            let mut r = Reader::new(&buf);
            assert_eq!(r.read_f64(), Ok(*v));
        }
        let mut buf = Vec::new();
        write_f32(&mut buf, 1.0);
        assert_eq!(buf, vec![0x00, 0x00, 0x80, 0x3f]);
    }

    #[test]
    fn name_encoding() {
        let mut buf = Vec::new();
        write_name(&mut buf, "memory");
        assert_eq!(buf[0], 6);
        assert_eq!(&buf[1..], b"memory");
    }
}
