//! Error types shared by the decoder, encoder, and object model.
//!
//! Failures fall into four families:
//!
//! - [`FormatError`] -- malformed binary input.
//! - [`IndexError`] -- an entity index that does not resolve in its index
//!   space, or an entity handed to a module that does not own it.
//! - [`ReferenceError`] -- a stale parameter or local-variable handle.
//! - [`StateError`] -- an encoder or decoder used outside its supported
//!   lifecycle.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Any error produced by this crate.
#[derive(Debug, Error, PartialEq)]
pub enum Error {
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error(transparent)]
    Index(#[from] IndexError),
    #[error(transparent)]
    Reference(#[from] ReferenceError),
    #[error(transparent)]
    State(#[from] StateError),
}

/// The index space an entity index resolves in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexSpace {
    Type,
    Function,
    Global,
    Memory,
    Table,
    Element,
    Data,
    Import,
    Param,
    Local,
}

impl std::fmt::Display for IndexSpace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            IndexSpace::Type => "type",
            IndexSpace::Function => "function",
            IndexSpace::Global => "global",
            IndexSpace::Memory => "memory",
            IndexSpace::Table => "table",
            IndexSpace::Element => "element",
            IndexSpace::Data => "data",
            IndexSpace::Import => "import",
            IndexSpace::Param => "parameter",
            IndexSpace::Local => "local",
        };
        f.write_str(name)
    }
}

/// Malformed binary input.
#[derive(Debug, Error, PartialEq)]
pub enum FormatError {
    #[error("unexpected end of input at offset {offset}")]
    UnexpectedEof { offset: usize },
    #[error("LEB128 value at offset {offset} exceeds {bits} bits")]
    LebOverflow { offset: usize, bits: u32 },
    #[error("bad magic number {found:#010x}, expected 0x6d736100 (\"\\0asm\")")]
    BadMagic { found: u32 },
    #[error("unsupported module version {found}, expected 1")]
    BadVersion { found: u32 },
    #[error("unknown value type byte {found:#04x}")]
    BadValueType { found: u8 },
    #[error("unknown reference type byte {found:#04x}")]
    BadRefType { found: u8 },
    #[error("expected function type byte 0x60, found {found:#04x}")]
    BadTypeTag { found: u8 },
    #[error("invalid limits flag {found:#04x}")]
    BadLimitsFlag { found: u8 },
    #[error("unknown import/export description kind {found:#04x}")]
    BadDescKind { found: u8 },
    #[error("unknown opcode {primary:#04x}")]
    UnknownOpcode { primary: u8 },
    #[error("unknown opcode {primary:#04x} {secondary}")]
    UnknownSecondaryOpcode { primary: u8, secondary: u32 },
    #[error("section id {id} out of order or unknown at offset {offset}")]
    UnexpectedSection { id: u8, offset: usize },
    #[error("section {id} declared {declared} bytes but {consumed} were consumed")]
    SectionLengthMismatch { id: u8, declared: usize, consumed: usize },
    #[error("code entry declared {declared} bytes but {consumed} were consumed")]
    CodeSizeMismatch { declared: usize, consumed: usize },
    #[error("code section has {found} entries but the function section declared {expected}")]
    CodeCountMismatch { expected: usize, found: usize },
    #[error("data section has {found} segments but the data count section declared {declared}")]
    DataCountMismatch { declared: usize, found: usize },
    #[error("invalid element segment flags {flags}")]
    BadElementFlags { flags: u32 },
    #[error("invalid data segment flags {flags}")]
    BadDataFlags { flags: u32 },
    #[error("invalid UTF-8 in name at offset {offset}")]
    InvalidUtf8 { offset: usize },
}

/// An entity index that does not resolve.
#[derive(Debug, Error, PartialEq)]
pub enum IndexError {
    #[error("{space} index {index} out of range")]
    OutOfRange { space: IndexSpace, index: u32 },
    #[error("{space} index {index} refers to an import where a definition is required")]
    ImportNotAllowed { space: IndexSpace, index: u32 },
    #[error("{space} is not a part of this module")]
    NotInModule { space: IndexSpace },
}

/// A stale parameter or local-variable handle.
#[derive(Debug, Error, PartialEq)]
pub enum ReferenceError {
    #[error("{space} reference points at an entry that has been removed")]
    Removed { space: IndexSpace },
    #[error("{space} reference was created by a different owner")]
    ForeignOwner { space: IndexSpace },
}

/// Encoder or decoder misuse.
#[derive(Debug, Error, PartialEq)]
pub enum StateError {
    #[error("a module is already being written")]
    AlreadyWriting,
    #[error("index maps are not allocated outside of a write pass")]
    IndexesUnallocated,
    #[error("instruction arguments do not match the payload of `{mnemonic}`")]
    PayloadMismatch { mnemonic: &'static str },
    #[error("local reference used outside a function body")]
    LocalOutsideFunction,
    #[error("data index space is not registered; the module has no data count section")]
    DataIndexesUnregistered,
}
