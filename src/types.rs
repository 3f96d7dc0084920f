//! Value types, limits, and section positions from the binary format.

use crate::error::FormatError;

/// A WebAssembly value type, tagged with its wire byte.
///
/// ```text
/// valtype ::= 0x7F (i32) | 0x7E (i64) | 0x7D (f32) | 0x7C (f64)
///           | 0x7B (v128) | 0x70 (funcref) | 0x6F (externref)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ValType {
    I32 = 0x7F,
    I64 = 0x7E,
    F32 = 0x7D,
    F64 = 0x7C,
    V128 = 0x7B,
    FuncRef = 0x70,
    ExternRef = 0x6F,
}

impl ValType {
    pub fn from_byte(byte: u8) -> Result<ValType, FormatError> {
        match byte {
            0x7F => Ok(ValType::I32),
            0x7E => Ok(ValType::I64),
            0x7D => Ok(ValType::F32),
            0x7C => Ok(ValType::F64),
            0x7B => Ok(ValType::V128),
            0x70 => Ok(ValType::FuncRef),
            0x6F => Ok(ValType::ExternRef),
            _ => Err(FormatError::BadValueType { found: byte }),
        }
    }

    pub fn to_byte(self) -> u8 {
        self as u8
    }
}

/// The reference-type subset of [`ValType`], used by tables and element
/// segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RefType {
    FuncRef = 0x70,
    ExternRef = 0x6F,
}

impl RefType {
    pub fn from_byte(byte: u8) -> Result<RefType, FormatError> {
        match byte {
            0x70 => Ok(RefType::FuncRef),
            0x6F => Ok(RefType::ExternRef),
            _ => Err(FormatError::BadRefType { found: byte }),
        }
    }

    pub fn to_byte(self) -> u8 {
        self as u8
    }
}

impl From<RefType> for ValType {
    fn from(rt: RefType) -> ValType {
        match rt {
            RefType::FuncRef => ValType::FuncRef,
            RefType::ExternRef => ValType::ExternRef,
        }
    }
}

/// Size bounds for a memory (in pages) or a table (in elements).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub min: u32,
    pub max: Option<u32>,
}

impl Limits {
    pub fn new(min: u32, max: Option<u32>) -> Limits {
        Limits { min, max }
    }
}

/// The result type annotation on a `block`, `loop`, or `if`.
///
/// `None` encodes as the empty block type 0x40; `Some` encodes as the value
/// type byte. Type-index block types are out of scope.
pub type BlockType = Option<ValType>;

/// Anchor positions for custom sections: after the header, and after each of
/// the twelve standard sections in wire order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(usize)]
pub enum CustomSectionPosition {
    AfterHeader = 0,
    AfterType = 1,
    AfterImport = 2,
    AfterFunction = 3,
    AfterTable = 4,
    AfterMemory = 5,
    AfterGlobal = 6,
    AfterExport = 7,
    AfterStart = 8,
    AfterElement = 9,
    AfterDataCount = 10,
    AfterCode = 11,
    AfterData = 12,
}

impl CustomSectionPosition {
    pub const COUNT: usize = 13;

    pub fn index(self) -> usize {
        self as usize
    }
}
