//! Instructions and instruction sequences.
//!
//! An [`Instruction`] pairs an [`Opcode`] descriptor with an [`InstrArgs`]
//! value carrying its immediates. The argument value must match the opcode's
//! declared [`Payload`](crate::opcode::Payload) shape; the encoder rejects
//! mismatches with a state error.

use crate::module::{
    DataId, ElementId, FuncRef, GlobalRef, LocalVarRef, MemRef, ParamRef, TableRef, TypeId,
};
use crate::opcode::{Opcode, Payload};
use crate::types::{BlockType, RefType, ValType};

/// A memory access immediate: alignment exponent and byte offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MemArg {
    pub align: u32,
    pub offset: u32,
}

impl MemArg {
    pub fn new(align: u32, offset: u32) -> MemArg {
        MemArg { align, offset }
    }
}

/// A local operand: either a raw wire index (as the decoder produces) or a
/// stable handle to a parameter or local variable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Local {
    Index(u32),
    Param(ParamRef),
    Var(LocalVarRef),
}

impl From<u32> for Local {
    fn from(index: u32) -> Local {
        Local::Index(index)
    }
}

impl From<ParamRef> for Local {
    fn from(r: ParamRef) -> Local {
        Local::Param(r)
    }
}

impl From<LocalVarRef> for Local {
    fn from(r: LocalVarRef) -> Local {
        Local::Var(r)
    }
}

/// Immediate arguments of an instruction, one variant per payload shape.
#[derive(Debug, Clone, PartialEq)]
pub enum InstrArgs {
    None,
    Block {
        block_type: BlockType,
        body: Expression,
    },
    IfElse {
        block_type: BlockType,
        consequent: Expression,
        alternate: Option<Expression>,
    },
    Label(u32),
    BrTable {
        labels: Vec<u32>,
        default: u32,
    },
    Func(FuncRef),
    CallIndirect {
        ty: TypeId,
        table: TableRef,
    },
    HeapType(RefType),
    TypeVec(Vec<ValType>),
    Local(Local),
    Global(GlobalRef),
    Table(TableRef),
    ElemTable {
        elem: ElementId,
        table: TableRef,
    },
    Elem(ElementId),
    TableCopy {
        dst: TableRef,
        src: TableRef,
    },
    MemArg(MemArg),
    Memory(MemRef),
    DataMem {
        data: DataId,
        memory: MemRef,
    },
    Data(DataId),
    MemoryCopy {
        dst: MemRef,
        src: MemRef,
    },
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    Bytes16([u8; 16]),
    Lane(u8),
    MemArgLane {
        memarg: MemArg,
        lane: u8,
    },
}

/// A single instruction.
#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    pub opcode: Opcode,
    pub args: InstrArgs,
}

impl Instruction {
    pub fn new(opcode: Opcode, args: InstrArgs) -> Instruction {
        Instruction { opcode, args }
    }

    /// An instruction with no immediates.
    pub fn simple(opcode: Opcode) -> Instruction {
        Instruction {
            opcode,
            args: InstrArgs::None,
        }
    }

    /// Whether the argument value matches the opcode's payload shape.
    pub fn args_match_payload(&self) -> bool {
        matches!(
            (self.opcode.payload, &self.args),
            (Payload::Simple, InstrArgs::None)
                | (Payload::Block, InstrArgs::Block { .. })
                | (Payload::IfElse, InstrArgs::IfElse { .. })
                | (Payload::LabelIdx, InstrArgs::Label(_))
                | (Payload::BrTable, InstrArgs::BrTable { .. })
                | (Payload::FuncIdx, InstrArgs::Func(_))
                | (Payload::CallIndirect, InstrArgs::CallIndirect { .. })
                | (Payload::HeapType, InstrArgs::HeapType(_))
                | (Payload::TypeVec, InstrArgs::TypeVec(_))
                | (Payload::LocalIdx, InstrArgs::Local(_))
                | (Payload::GlobalIdx, InstrArgs::Global(_))
                | (Payload::TableIdx, InstrArgs::Table(_))
                | (Payload::ElemTable, InstrArgs::ElemTable { .. })
                | (Payload::ElemIdx, InstrArgs::Elem(_))
                | (Payload::TableCopy, InstrArgs::TableCopy { .. })
                | (Payload::MemArg, InstrArgs::MemArg(_))
                | (Payload::MemIdx, InstrArgs::Memory(_))
                | (Payload::DataMem, InstrArgs::DataMem { .. })
                | (Payload::DataIdx, InstrArgs::Data(_))
                | (Payload::MemoryCopy, InstrArgs::MemoryCopy { .. })
                | (Payload::ConstI32, InstrArgs::I32(_))
                | (Payload::ConstI64, InstrArgs::I64(_))
                | (Payload::ConstF32, InstrArgs::F32(_))
                | (Payload::ConstF64, InstrArgs::F64(_))
                | (Payload::Bytes16, InstrArgs::Bytes16(_))
                | (Payload::LaneIdx, InstrArgs::Lane(_))
                | (Payload::MemArgLane, InstrArgs::MemArgLane { .. })
        )
    }
}

/// A sequence of instructions: a function body, a block body, or a constant
/// initializer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Expression {
    pub instructions: Vec<Instruction>,
}

impl Expression {
    pub fn new() -> Expression {
        Expression::default()
    }

    pub fn push(&mut self, instr: Instruction) {
        self.instructions.push(instr);
    }

    /// Appends an instruction with no immediates.
    pub fn emit(&mut self, opcode: Opcode) {
        self.push(Instruction::simple(opcode));
    }

    /// Appends an instruction with immediates.
    pub fn emit_with(&mut self, opcode: Opcode, args: InstrArgs) {
        self.push(Instruction::new(opcode, args));
    }

    pub fn emit_local_get(&mut self, local: impl Into<Local>) {
        self.emit_with(Opcode::LOCAL_GET, InstrArgs::Local(local.into()));
    }

    pub fn emit_local_set(&mut self, local: impl Into<Local>) {
        self.emit_with(Opcode::LOCAL_SET, InstrArgs::Local(local.into()));
    }

    pub fn emit_global_get(&mut self, global: GlobalRef) {
        self.emit_with(Opcode::GLOBAL_GET, InstrArgs::Global(global));
    }

    pub fn emit_call(&mut self, func: FuncRef) {
        self.emit_with(Opcode::CALL, InstrArgs::Func(func));
    }

    /// Appends the constant instruction for `ty` carrying `value`, converted
    /// to the target representation.
    pub fn emit_constant(&mut self, ty: ValType, value: f64) {
        match ty {
            ValType::I32 => self.emit_with(Opcode::I32_CONST, InstrArgs::I32(value as i32)),
            ValType::I64 => self.emit_with(Opcode::I64_CONST, InstrArgs::I64(value as i64)),
            ValType::F32 => self.emit_with(Opcode::F32_CONST, InstrArgs::F32(value as f32)),
            _ => self.emit_with(Opcode::F64_CONST, InstrArgs::F64(value)),
        }
    }

    // Single-instruction constant expressions, for offsets and initializers.

    pub fn i32_const(v: i32) -> Expression {
        let mut e = Expression::new();
        e.emit_with(Opcode::I32_CONST, InstrArgs::I32(v));
        e
    }

    pub fn i64_const(v: i64) -> Expression {
        let mut e = Expression::new();
        e.emit_with(Opcode::I64_CONST, InstrArgs::I64(v));
        e
    }

    pub fn f32_const(v: f32) -> Expression {
        let mut e = Expression::new();
        e.emit_with(Opcode::F32_CONST, InstrArgs::F32(v));
        e
    }

    pub fn f64_const(v: f64) -> Expression {
        let mut e = Expression::new();
        e.emit_with(Opcode::F64_CONST, InstrArgs::F64(v));
        e
    }

    pub fn global_get(global: GlobalRef) -> Expression {
        let mut e = Expression::new();
        e.emit_global_get(global);
        e
    }

    /// The constant value of a single-instruction numeric initializer, if
    /// that is what this expression is.
    pub fn const_value(&self) -> Option<f64> {
        if self.instructions.len() != 1 {
            return None;
        }
        match self.instructions[0].args {
            InstrArgs::I32(v) => Some(f64::from(v)),
            InstrArgs::I64(v) => Some(v as f64),
            InstrArgs::F32(v) => Some(f64::from(v)),
            InstrArgs::F64(v) => Some(v),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_shape_check() {
        let ok = Instruction::simple(Opcode::I32_ADD);
        assert!(ok.args_match_payload());

        let bad = Instruction::new(Opcode::I32_CONST, InstrArgs::None);
        assert!(!bad.args_match_payload());

        let memarg = Instruction::new(Opcode::I32_LOAD, InstrArgs::MemArg(MemArg::new(2, 0)));
        assert!(memarg.args_match_payload());
    }

    #[test]
    fn emit_constant_picks_representation() {
        let mut e = Expression::new();
        e.emit_constant(ValType::I32, 7.0);
        e.emit_constant(ValType::F64, 2.5);
        assert_eq!(e.instructions[0].opcode, Opcode::I32_CONST);
        assert_eq!(e.instructions[0].args, InstrArgs::I32(7));
        assert_eq!(e.instructions[1].opcode, Opcode::F64_CONST);
        assert_eq!(e.instructions[1].args, InstrArgs::F64(2.5));
    }

    #[test]
    fn const_value_reads_back() {
        assert_eq!(Expression::i32_const(-5).const_value(), Some(-5.0));
        assert_eq!(Expression::f64_const(1.25).const_value(), Some(1.25));
        assert_eq!(Expression::new().const_value(), None);
    }
}
