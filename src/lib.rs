//! A programmatic builder, binary decoder, and binary encoder for
//! WebAssembly modules.
//!
//! wasmloom holds a module as an object graph rather than as index-addressed
//! wire structures: functions, globals, memories, tables, elements, and data
//! segments are created through factory methods on [`Module`] and referred to
//! by typed handles. Numeric wire indices only exist at the binary boundary,
//! where the encoder assigns them import-first and the decoder resolves them
//! back into handles.
//!
//! # Modules
//!
//! - [`module`] -- The object model: [`Module`], its entity definitions, and
//!   the typed references between them.
//! - [`expr`] -- Instructions and instruction sequences.
//! - [`opcode`] -- The opcode registry: every WebAssembly 2.0 instruction
//!   with its wire encoding and immediate shape.
//! - [`encoder`] -- Serialises a [`Module`] to `.wasm` bytes.
//! - [`decoder`] -- Reads `.wasm` bytes into a [`Module`].
//! - [`types`] -- Value types, limits, and custom section positions.
//! - [`error`] -- The error taxonomy shared by every layer.
//!
//! # Example
//!
//! Build a module exporting `add(f64, f64) -> f64`, encode it, and decode
//! the bytes back:
//!
//! ```
//! use wasmloom::{read_module, write_module, Expression, Module, Opcode, ValType};
//!
//! # fn main() -> wasmloom::Result<()> {
//! let mut module = Module::new();
//! let ty = module.create_type(vec![ValType::F64, ValType::F64], vec![ValType::F64]);
//! let a = module.type_def_mut(ty)?.param(0)?;
//! let b = module.type_def_mut(ty)?.param(1)?;
//!
//! let mut body = Expression::new();
//! body.emit_local_get(a);
//! body.emit_local_get(b);
//! body.emit(Opcode::F64_ADD);
//!
//! let func = module.create_function(ty, vec![], body)?;
//! module.export_function("add", func.into())?;
//!
//! let bytes = write_module(&module)?;
//! let decoded = read_module(&bytes)?;
//! assert_eq!(decoded.functions().len(), 1);
//! assert_eq!(decoded.exports()[0].name, "add");
//! # Ok(())
//! # }
//! ```
//!
//! # Specification
//!
//! Targets the [WebAssembly 2.0 specification](https://webassembly.github.io/spec/core/)
//! binary format, including the bulk memory, reference type, and 128-bit SIMD
//! instruction sets.

pub mod decoder;
pub mod encoder;
pub mod error;
pub mod expr;
mod locals;
pub mod module;
pub mod opcode;
pub mod reader;
pub mod types;
pub mod wire;

pub use decoder::read_module;
pub use encoder::{write_module, write_module_with, WriteConfig};
pub use error::{Error, FormatError, IndexError, ReferenceError, Result, StateError};
pub use expr::{Expression, InstrArgs, Instruction, Local, MemArg};
pub use module::{
    CustomSection, DataId, DataMode, DataSegment, Element, ElementContent, ElementId, ElementMode, Export,
    ExportKind, FuncId, FuncRef, FunctionDef, GlobalDef, GlobalId, GlobalRef, Import, ImportId,
    ImportKind, LocalVarRef, MemRef, MemoryDef, MemoryId, Module, ParamRef, TableDef, TableId,
    TableRef, TypeDef, TypeId,
};
pub use opcode::{Opcode, Payload};
pub use types::{BlockType, CustomSectionPosition, Limits, RefType, ValType};
