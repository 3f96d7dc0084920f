//! The instruction registry.
//!
//! Every supported instruction is described by an [`Opcode`]: a primary byte,
//! an optional secondary opcode for the 0xFC (miscellaneous) and 0xFD (SIMD)
//! prefixed spaces, a mnemonic, and a [`Payload`] naming the shape of its
//! immediate arguments. The encoder and decoder dispatch on the payload shape,
//! so adding an instruction is a single table entry.
//!
//! Lookup is two-level, mirroring the wire encoding:
//!
//! ```text
//! instr ::= primary:u8                  (direct opcode)
//!         | 0xFC secondary:vu32 ...     (miscellaneous space)
//!         | 0xFD secondary:vu32 ...     (SIMD space)
//! ```

use std::collections::HashMap;

use once_cell::sync::Lazy;

/// The immediate-argument shape of an instruction.
///
/// Closed set: the encoder and decoder match exhaustively over it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Payload {
    /// No immediates.
    Simple,
    /// Block type byte + nested expression (`block`, `loop`).
    Block,
    /// Block type byte + consequent, optionally `else` + alternate (`if`).
    IfElse,
    /// Label index (`br`, `br_if`).
    LabelIdx,
    /// Label index vector + default label (`br_table`).
    BrTable,
    /// Function index (`call`, `ref.func`).
    FuncIdx,
    /// Type index + table index (`call_indirect`).
    CallIndirect,
    /// Reference type byte (`ref.null`).
    HeapType,
    /// Value type vector (`select` with type annotation).
    TypeVec,
    /// Local index (`local.get`, `local.set`, `local.tee`).
    LocalIdx,
    /// Global index (`global.get`, `global.set`).
    GlobalIdx,
    /// Table index.
    TableIdx,
    /// Element index + table index (`table.init`).
    ElemTable,
    /// Element index (`elem.drop`).
    ElemIdx,
    /// Destination + source table indices (`table.copy`).
    TableCopy,
    /// Alignment exponent + offset.
    MemArg,
    /// Memory index.
    MemIdx,
    /// Data index + memory index (`memory.init`).
    DataMem,
    /// Data index (`data.drop`).
    DataIdx,
    /// Destination + source memory indices (`memory.copy`).
    MemoryCopy,
    /// SLEB128 i32 immediate.
    ConstI32,
    /// SLEB128 i64 immediate.
    ConstI64,
    /// IEEE 754 f32 immediate.
    ConstF32,
    /// IEEE 754 f64 immediate.
    ConstF64,
    /// 16 raw bytes (`v128.const`, `i8x16.shuffle`).
    Bytes16,
    /// Single lane index byte.
    LaneIdx,
    /// Alignment exponent + offset + lane index byte.
    MemArgLane,
}

/// A single instruction descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opcode {
    pub primary: u8,
    pub secondary: Option<u32>,
    pub mnemonic: &'static str,
    pub payload: Payload,
}

macro_rules! opcodes {
    (@sec) => {
        None
    };
    (@sec $s:literal) => {
        Some($s)
    };
    ($( $name:ident: $mnemonic:literal = $primary:literal $(/ $secondary:literal)? => $payload:ident; )*) => {
        impl Opcode {
            $(
                pub const $name: Opcode = Opcode {
                    primary: $primary,
                    secondary: opcodes!(@sec $($secondary)?),
                    mnemonic: $mnemonic,
                    payload: Payload::$payload,
                };
            )*
        }

        /// Every registered opcode, in declaration order.
        pub static ALL: &[Opcode] = &[ $( Opcode::$name ),* ];
    };
}

opcodes! {
    // Control instructions
    UNREACHABLE: "unreachable" = 0x00 => Simple;
    NOP: "nop" = 0x01 => Simple;
    BLOCK: "block" = 0x02 => Block;
    LOOP: "loop" = 0x03 => Block;
    IF: "if" = 0x04 => IfElse;
    BR: "br" = 0x0C => LabelIdx;
    BR_IF: "br_if" = 0x0D => LabelIdx;
    BR_TABLE: "br_table" = 0x0E => BrTable;
    RETURN: "return" = 0x0F => Simple;
    CALL: "call" = 0x10 => FuncIdx;
    CALL_INDIRECT: "call_indirect" = 0x11 => CallIndirect;

    // Reference instructions
    REF_NULL: "ref.null" = 0xD0 => HeapType;
    REF_IS_NULL: "ref.is_null" = 0xD1 => Simple;
    REF_FUNC: "ref.func" = 0xD2 => FuncIdx;

    // Parametric instructions
    DROP: "drop" = 0x1A => Simple;
    SELECT: "select" = 0x1B => Simple;
    SELECT_T: "select" = 0x1C => TypeVec;

    // Variable instructions
    LOCAL_GET: "local.get" = 0x20 => LocalIdx;
    LOCAL_SET: "local.set" = 0x21 => LocalIdx;
    LOCAL_TEE: "local.tee" = 0x22 => LocalIdx;
    GLOBAL_GET: "global.get" = 0x23 => GlobalIdx;
    GLOBAL_SET: "global.set" = 0x24 => GlobalIdx;

    // Table instructions
    TABLE_GET: "table.get" = 0x25 => TableIdx;
    TABLE_SET: "table.set" = 0x26 => TableIdx;
    TABLE_INIT: "table.init" = 0xFC / 12 => ElemTable;
    ELEM_DROP: "elem.drop" = 0xFC / 13 => ElemIdx;
    TABLE_COPY: "table.copy" = 0xFC / 14 => TableCopy;
    TABLE_GROW: "table.grow" = 0xFC / 15 => TableIdx;
    TABLE_SIZE: "table.size" = 0xFC / 16 => TableIdx;
    TABLE_FILL: "table.fill" = 0xFC / 17 => TableIdx;

    // Memory instructions
    I32_LOAD: "i32.load" = 0x28 => MemArg;
    I64_LOAD: "i64.load" = 0x29 => MemArg;
    F32_LOAD: "f32.load" = 0x2A => MemArg;
    F64_LOAD: "f64.load" = 0x2B => MemArg;
    I32_LOAD8_S: "i32.load8_s" = 0x2C => MemArg;
    I32_LOAD8_U: "i32.load8_u" = 0x2D => MemArg;
    I32_LOAD16_S: "i32.load16_s" = 0x2E => MemArg;
    I32_LOAD16_U: "i32.load16_u" = 0x2F => MemArg;
    I64_LOAD8_S: "i64.load8_s" = 0x30 => MemArg;
    I64_LOAD8_U: "i64.load8_u" = 0x31 => MemArg;
    I64_LOAD16_S: "i64.load16_s" = 0x32 => MemArg;
    I64_LOAD16_U: "i64.load16_u" = 0x33 => MemArg;
    I64_LOAD32_S: "i64.load32_s" = 0x34 => MemArg;
    I64_LOAD32_U: "i64.load32_u" = 0x35 => MemArg;
    I32_STORE: "i32.store" = 0x36 => MemArg;
    I64_STORE: "i64.store" = 0x37 => MemArg;
    F32_STORE: "f32.store" = 0x38 => MemArg;
    F64_STORE: "f64.store" = 0x39 => MemArg;
    I32_STORE8: "i32.store8" = 0x3A => MemArg;
    I32_STORE16: "i32.store16" = 0x3B => MemArg;
    I64_STORE8: "i64.store8" = 0x3C => MemArg;
    I64_STORE16: "i64.store16" = 0x3D => MemArg;
    I64_STORE32: "i64.store32" = 0x3E => MemArg;
    MEMORY_SIZE: "memory.size" = 0x3F => MemIdx;
    MEMORY_GROW: "memory.grow" = 0x40 => MemIdx;
    MEMORY_INIT: "memory.init" = 0xFC / 8 => DataMem;
    DATA_DROP: "data.drop" = 0xFC / 9 => DataIdx;
    MEMORY_COPY: "memory.copy" = 0xFC / 10 => MemoryCopy;
    MEMORY_FILL: "memory.fill" = 0xFC / 11 => MemIdx;

    // Numeric instructions
    I32_CONST: "i32.const" = 0x41 => ConstI32;
    I64_CONST: "i64.const" = 0x42 => ConstI64;
    F32_CONST: "f32.const" = 0x43 => ConstF32;
    F64_CONST: "f64.const" = 0x44 => ConstF64;

    I32_EQZ: "i32.eqz" = 0x45 => Simple;
    I32_EQ: "i32.eq" = 0x46 => Simple;
    I32_NE: "i32.ne" = 0x47 => Simple;
    I32_LT_S: "i32.lt_s" = 0x48 => Simple;
    I32_LT_U: "i32.lt_u" = 0x49 => Simple;
    I32_GT_S: "i32.gt_s" = 0x4A => Simple;
    I32_GT_U: "i32.gt_u" = 0x4B => Simple;
    I32_LE_S: "i32.le_s" = 0x4C => Simple;
    I32_LE_U: "i32.le_u" = 0x4D => Simple;
    I32_GE_S: "i32.ge_s" = 0x4E => Simple;
    I32_GE_U: "i32.ge_u" = 0x4F => Simple;
    I64_EQZ: "i64.eqz" = 0x50 => Simple;
    I64_EQ: "i64.eq" = 0x51 => Simple;
    I64_NE: "i64.ne" = 0x52 => Simple;
    I64_LT_S: "i64.lt_s" = 0x53 => Simple;
    I64_LT_U: "i64.lt_u" = 0x54 => Simple;
    I64_GT_S: "i64.gt_s" = 0x55 => Simple;
    I64_GT_U: "i64.gt_u" = 0x56 => Simple;
    I64_LE_S: "i64.le_s" = 0x57 => Simple;
    I64_LE_U: "i64.le_u" = 0x58 => Simple;
    I64_GE_S: "i64.ge_s" = 0x59 => Simple;
    I64_GE_U: "i64.ge_u" = 0x5A => Simple;
    F32_EQ: "f32.eq" = 0x5B => Simple;
    F32_NE: "f32.ne" = 0x5C => Simple;
    F32_LT: "f32.lt" = 0x5D => Simple;
    F32_GT: "f32.gt" = 0x5E => Simple;
    F32_LE: "f32.le" = 0x5F => Simple;
    F32_GE: "f32.ge" = 0x60 => Simple;
    F64_EQ: "f64.eq" = 0x61 => Simple;
    F64_NE: "f64.ne" = 0x62 => Simple;
    F64_LT: "f64.lt" = 0x63 => Simple;
    F64_GT: "f64.gt" = 0x64 => Simple;
    F64_LE: "f64.le" = 0x65 => Simple;
    F64_GE: "f64.ge" = 0x66 => Simple;

    I32_CLZ: "i32.clz" = 0x67 => Simple;
    I32_CTZ: "i32.ctz" = 0x68 => Simple;
    I32_POPCNT: "i32.popcnt" = 0x69 => Simple;
    I32_ADD: "i32.add" = 0x6A => Simple;
    I32_SUB: "i32.sub" = 0x6B => Simple;
    I32_MUL: "i32.mul" = 0x6C => Simple;
    I32_DIV_S: "i32.div_s" = 0x6D => Simple;
    I32_DIV_U: "i32.div_u" = 0x6E => Simple;
    I32_REM_S: "i32.rem_s" = 0x6F => Simple;
    I32_REM_U: "i32.rem_u" = 0x70 => Simple;
    I32_AND: "i32.and" = 0x71 => Simple;
    I32_OR: "i32.or" = 0x72 => Simple;
    I32_XOR: "i32.xor" = 0x73 => Simple;
    I32_SHL: "i32.shl" = 0x74 => Simple;
    I32_SHR_S: "i32.shr_s" = 0x75 => Simple;
    I32_SHR_U: "i32.shr_u" = 0x76 => Simple;
    I32_ROTL: "i32.rotl" = 0x77 => Simple;
    I32_ROTR: "i32.rotr" = 0x78 => Simple;
    I64_CLZ: "i64.clz" = 0x79 => Simple;
    I64_CTZ: "i64.ctz" = 0x7A => Simple;
    I64_POPCNT: "i64.popcnt" = 0x7B => Simple;
    I64_ADD: "i64.add" = 0x7C => Simple;
    I64_SUB: "i64.sub" = 0x7D => Simple;
    I64_MUL: "i64.mul" = 0x7E => Simple;
    I64_DIV_S: "i64.div_s" = 0x7F => Simple;
    I64_DIV_U: "i64.div_u" = 0x80 => Simple;
    I64_REM_S: "i64.rem_s" = 0x81 => Simple;
    I64_REM_U: "i64.rem_u" = 0x82 => Simple;
    I64_AND: "i64.and" = 0x83 => Simple;
    I64_OR: "i64.or" = 0x84 => Simple;
    I64_XOR: "i64.xor" = 0x85 => Simple;
    I64_SHL: "i64.shl" = 0x86 => Simple;
    I64_SHR_S: "i64.shr_s" = 0x87 => Simple;
    I64_SHR_U: "i64.shr_u" = 0x88 => Simple;
    I64_ROTL: "i64.rotl" = 0x89 => Simple;
    I64_ROTR: "i64.rotr" = 0x8A => Simple;
    F32_ABS: "f32.abs" = 0x8B => Simple;
    F32_NEG: "f32.neg" = 0x8C => Simple;
    F32_CEIL: "f32.ceil" = 0x8D => Simple;
    F32_FLOOR: "f32.floor" = 0x8E => Simple;
    F32_TRUNC: "f32.trunc" = 0x8F => Simple;
    F32_NEAREST: "f32.nearest" = 0x90 => Simple;
    F32_SQRT: "f32.sqrt" = 0x91 => Simple;
    F32_ADD: "f32.add" = 0x92 => Simple;
    F32_SUB: "f32.sub" = 0x93 => Simple;
    F32_MUL: "f32.mul" = 0x94 => Simple;
    F32_DIV: "f32.div" = 0x95 => Simple;
    F32_MIN: "f32.min" = 0x96 => Simple;
    F32_MAX: "f32.max" = 0x97 => Simple;
    F32_COPYSIGN: "f32.copysign" = 0x98 => Simple;
    F64_ABS: "f64.abs" = 0x99 => Simple;
    F64_NEG: "f64.neg" = 0x9A => Simple;
    F64_CEIL: "f64.ceil" = 0x9B => Simple;
    F64_FLOOR: "f64.floor" = 0x9C => Simple;
    F64_TRUNC: "f64.trunc" = 0x9D => Simple;
    F64_NEAREST: "f64.nearest" = 0x9E => Simple;
    F64_SQRT: "f64.sqrt" = 0x9F => Simple;
    F64_ADD: "f64.add" = 0xA0 => Simple;
    F64_SUB: "f64.sub" = 0xA1 => Simple;
    F64_MUL: "f64.mul" = 0xA2 => Simple;
    F64_DIV: "f64.div" = 0xA3 => Simple;
    F64_MIN: "f64.min" = 0xA4 => Simple;
    F64_MAX: "f64.max" = 0xA5 => Simple;
    F64_COPYSIGN: "f64.copysign" = 0xA6 => Simple;

    I32_WRAP_I64: "i32.wrap_i64" = 0xA7 => Simple;
    I32_TRUNC_F32_S: "i32.trunc_f32_s" = 0xA8 => Simple;
    I32_TRUNC_F32_U: "i32.trunc_f32_u" = 0xA9 => Simple;
    I32_TRUNC_F64_S: "i32.trunc_f64_s" = 0xAA => Simple;
    I32_TRUNC_F64_U: "i32.trunc_f64_u" = 0xAB => Simple;
    I64_EXTEND_I32_S: "i64.extend_i32_s" = 0xAC => Simple;
    I64_EXTEND_I32_U: "i64.extend_i32_u" = 0xAD => Simple;
    I64_TRUNC_F32_S: "i64.trunc_f32_s" = 0xAE => Simple;
    I64_TRUNC_F32_U: "i64.trunc_f32_u" = 0xAF => Simple;
    I64_TRUNC_F64_S: "i64.trunc_f64_s" = 0xB0 => Simple;
    I64_TRUNC_F64_U: "i64.trunc_f64_u" = 0xB1 => Simple;
    F32_CONVERT_I32_S: "f32.convert_i32_s" = 0xB2 => Simple;
    F32_CONVERT_I32_U: "f32.convert_i32_u" = 0xB3 => Simple;
    F32_CONVERT_I64_S: "f32.convert_i64_s" = 0xB4 => Simple;
    F32_CONVERT_I64_U: "f32.convert_i64_u" = 0xB5 => Simple;
    F32_DEMOTE_F64: "f32.demote_f64" = 0xB6 => Simple;
    F64_CONVERT_I32_S: "f64.convert_i32_s" = 0xB7 => Simple;
    F64_CONVERT_I32_U: "f64.convert_i32_u" = 0xB8 => Simple;
    F64_CONVERT_I64_S: "f64.convert_i64_s" = 0xB9 => Simple;
    F64_CONVERT_I64_U: "f64.convert_i64_u" = 0xBA => Simple;
    F64_PROMOTE_F32: "f64.promote_f32" = 0xBB => Simple;
    I32_REINTERPRET_F32: "i32.reinterpret_f32" = 0xBC => Simple;
    I64_REINTERPRET_F64: "i64.reinterpret_f64" = 0xBD => Simple;
    F32_REINTERPRET_I32: "f32.reinterpret_i32" = 0xBE => Simple;
    F64_REINTERPRET_I64: "f64.reinterpret_i64" = 0xBF => Simple;

    I32_EXTEND8_S: "i32.extend8_s" = 0xC0 => Simple;
    I32_EXTEND16_S: "i32.extend16_s" = 0xC1 => Simple;
    I64_EXTEND8_S: "i64.extend8_s" = 0xC2 => Simple;
    I64_EXTEND16_S: "i64.extend16_s" = 0xC3 => Simple;
    I64_EXTEND32_S: "i64.extend32_s" = 0xC4 => Simple;

    I32_TRUNC_SAT_F32_S: "i32.trunc_sat_f32_s" = 0xFC / 0 => Simple;
    I32_TRUNC_SAT_F32_U: "i32.trunc_sat_f32_u" = 0xFC / 1 => Simple;
    I32_TRUNC_SAT_F64_S: "i32.trunc_sat_f64_s" = 0xFC / 2 => Simple;
    I32_TRUNC_SAT_F64_U: "i32.trunc_sat_f64_u" = 0xFC / 3 => Simple;
    I64_TRUNC_SAT_F32_S: "i64.trunc_sat_f32_s" = 0xFC / 4 => Simple;
    I64_TRUNC_SAT_F32_U: "i64.trunc_sat_f32_u" = 0xFC / 5 => Simple;
    I64_TRUNC_SAT_F64_S: "i64.trunc_sat_f64_s" = 0xFC / 6 => Simple;
    I64_TRUNC_SAT_F64_U: "i64.trunc_sat_f64_u" = 0xFC / 7 => Simple;

    // Vector instructions
    V128_LOAD: "v128.load" = 0xFD / 0 => MemArg;
    V128_LOAD8X8_S: "v128.load8x8_s" = 0xFD / 1 => MemArg;
    V128_LOAD8X8_U: "v128.load8x8_u" = 0xFD / 2 => MemArg;
    V128_LOAD16X4_S: "v128.load16x4_s" = 0xFD / 3 => MemArg;
    V128_LOAD16X4_U: "v128.load16x4_u" = 0xFD / 4 => MemArg;
    V128_LOAD32X2_S: "v128.load32x2_s" = 0xFD / 5 => MemArg;
    V128_LOAD32X2_U: "v128.load32x2_u" = 0xFD / 6 => MemArg;
    V128_LOAD8_SPLAT: "v128.load8_splat" = 0xFD / 7 => MemArg;
    V128_LOAD16_SPLAT: "v128.load16_splat" = 0xFD / 8 => MemArg;
    V128_LOAD32_SPLAT: "v128.load32_splat" = 0xFD / 9 => MemArg;
    V128_LOAD64_SPLAT: "v128.load64_splat" = 0xFD / 10 => MemArg;
    V128_STORE: "v128.store" = 0xFD / 11 => MemArg;
    V128_CONST: "v128.const" = 0xFD / 12 => Bytes16;
    I8X16_SHUFFLE: "i8x16.shuffle" = 0xFD / 13 => Bytes16;
    I8X16_SWIZZLE: "i8x16.swizzle" = 0xFD / 14 => Simple;
    I8X16_SPLAT: "i8x16.splat" = 0xFD / 15 => Simple;
    I16X8_SPLAT: "i16x8.splat" = 0xFD / 16 => Simple;
    I32X4_SPLAT: "i32x4.splat" = 0xFD / 17 => Simple;
    I64X2_SPLAT: "i64x2.splat" = 0xFD / 18 => Simple;
    F32X4_SPLAT: "f32x4.splat" = 0xFD / 19 => Simple;
    F64X2_SPLAT: "f64x2.splat" = 0xFD / 20 => Simple;
    I8X16_EXTRACT_LANE_S: "i8x16.extract_lane_s" = 0xFD / 21 => LaneIdx;
    I8X16_EXTRACT_LANE_U: "i8x16.extract_lane_u" = 0xFD / 22 => LaneIdx;
    I8X16_REPLACE_LANE: "i8x16.replace_lane" = 0xFD / 23 => LaneIdx;
    I16X8_EXTRACT_LANE_S: "i16x8.extract_lane_s" = 0xFD / 24 => LaneIdx;
    I16X8_EXTRACT_LANE_U: "i16x8.extract_lane_u" = 0xFD / 25 => LaneIdx;
    I16X8_REPLACE_LANE: "i16x8.replace_lane" = 0xFD / 26 => LaneIdx;
    I32X4_EXTRACT_LANE: "i32x4.extract_lane" = 0xFD / 27 => LaneIdx;
    I32X4_REPLACE_LANE: "i32x4.replace_lane" = 0xFD / 28 => LaneIdx;
    I64X2_EXTRACT_LANE: "i64x2.extract_lane" = 0xFD / 29 => LaneIdx;
    I64X2_REPLACE_LANE: "i64x2.replace_lane" = 0xFD / 30 => LaneIdx;
    F32X4_EXTRACT_LANE: "f32x4.extract_lane" = 0xFD / 31 => LaneIdx;
    F32X4_REPLACE_LANE: "f32x4.replace_lane" = 0xFD / 32 => LaneIdx;
    F64X2_EXTRACT_LANE: "f64x2.extract_lane" = 0xFD / 33 => LaneIdx;
    F64X2_REPLACE_LANE: "f64x2.replace_lane" = 0xFD / 34 => LaneIdx;
    I8X16_EQ: "i8x16.eq" = 0xFD / 35 => Simple;
    I8X16_NE: "i8x16.ne" = 0xFD / 36 => Simple;
    I8X16_LT_S: "i8x16.lt_s" = 0xFD / 37 => Simple;
    I8X16_LT_U: "i8x16.lt_u" = 0xFD / 38 => Simple;
    I8X16_GT_S: "i8x16.gt_s" = 0xFD / 39 => Simple;
    I8X16_GT_U: "i8x16.gt_u" = 0xFD / 40 => Simple;
    I8X16_LE_S: "i8x16.le_s" = 0xFD / 41 => Simple;
    I8X16_LE_U: "i8x16.le_u" = 0xFD / 42 => Simple;
    I8X16_GE_S: "i8x16.ge_s" = 0xFD / 43 => Simple;
    I8X16_GE_U: "i8x16.ge_u" = 0xFD / 44 => Simple;
    I16X8_EQ: "i16x8.eq" = 0xFD / 45 => Simple;
    I16X8_NE: "i16x8.ne" = 0xFD / 46 => Simple;
    I16X8_LT_S: "i16x8.lt_s" = 0xFD / 47 => Simple;
    I16X8_LT_U: "i16x8.lt_u" = 0xFD / 48 => Simple;
    I16X8_GT_S: "i16x8.gt_s" = 0xFD / 49 => Simple;
    I16X8_GT_U: "i16x8.gt_u" = 0xFD / 50 => Simple;
    I16X8_LE_S: "i16x8.le_s" = 0xFD / 51 => Simple;
    I16X8_LE_U: "i16x8.le_u" = 0xFD / 52 => Simple;
    I16X8_GE_S: "i16x8.ge_s" = 0xFD / 53 => Simple;
    I16X8_GE_U: "i16x8.ge_u" = 0xFD / 54 => Simple;
    I32X4_EQ: "i32x4.eq" = 0xFD / 55 => Simple;
    I32X4_NE: "i32x4.ne" = 0xFD / 56 => Simple;
    I32X4_LT_S: "i32x4.lt_s" = 0xFD / 57 => Simple;
    I32X4_LT_U: "i32x4.lt_u" = 0xFD / 58 => Simple;
    I32X4_GT_S: "i32x4.gt_s" = 0xFD / 59 => Simple;
    I32X4_GT_U: "i32x4.gt_u" = 0xFD / 60 => Simple;
    I32X4_LE_S: "i32x4.le_s" = 0xFD / 61 => Simple;
    I32X4_LE_U: "i32x4.le_u" = 0xFD / 62 => Simple;
    I32X4_GE_S: "i32x4.ge_s" = 0xFD / 63 => Simple;
    I32X4_GE_U: "i32x4.ge_u" = 0xFD / 64 => Simple;
    F32X4_EQ: "f32x4.eq" = 0xFD / 65 => Simple;
    F32X4_NE: "f32x4.ne" = 0xFD / 66 => Simple;
    F32X4_LT: "f32x4.lt" = 0xFD / 67 => Simple;
    F32X4_GT: "f32x4.gt" = 0xFD / 68 => Simple;
    F32X4_LE: "f32x4.le" = 0xFD / 69 => Simple;
    F32X4_GE: "f32x4.ge" = 0xFD / 70 => Simple;
    F64X2_EQ: "f64x2.eq" = 0xFD / 71 => Simple;
    F64X2_NE: "f64x2.ne" = 0xFD / 72 => Simple;
    F64X2_LT: "f64x2.lt" = 0xFD / 73 => Simple;
    F64X2_GT: "f64x2.gt" = 0xFD / 74 => Simple;
    F64X2_LE: "f64x2.le" = 0xFD / 75 => Simple;
    F64X2_GE: "f64x2.ge" = 0xFD / 76 => Simple;
    V128_NOT: "v128.not" = 0xFD / 77 => Simple;
    V128_AND: "v128.and" = 0xFD / 78 => Simple;
    V128_ANDNOT: "v128.andnot" = 0xFD / 79 => Simple;
    V128_OR: "v128.or" = 0xFD / 80 => Simple;
    V128_XOR: "v128.xor" = 0xFD / 81 => Simple;
    V128_BITSELECT: "v128.bitselect" = 0xFD / 82 => Simple;
    V128_ANY_TRUE: "v128.any_true" = 0xFD / 83 => Simple;
    V128_LOAD8_LANE: "v128.load8_lane" = 0xFD / 84 => MemArgLane;
    V128_LOAD16_LANE: "v128.load16_lane" = 0xFD / 85 => MemArgLane;
    V128_LOAD32_LANE: "v128.load32_lane" = 0xFD / 86 => MemArgLane;
    V128_LOAD64_LANE: "v128.load64_lane" = 0xFD / 87 => MemArgLane;
    V128_STORE8_LANE: "v128.store8_lane" = 0xFD / 88 => MemArgLane;
    V128_STORE16_LANE: "v128.store16_lane" = 0xFD / 89 => MemArgLane;
    V128_STORE32_LANE: "v128.store32_lane" = 0xFD / 90 => MemArgLane;
    V128_STORE64_LANE: "v128.store64_lane" = 0xFD / 91 => MemArgLane;
    V128_LOAD32_ZERO: "v128.load32_zero" = 0xFD / 92 => MemArg;
    V128_LOAD64_ZERO: "v128.load64_zero" = 0xFD / 93 => MemArg;
    F32X4_DEMOTE_F64X2_ZERO: "f32x4.demote_f64x2_zero" = 0xFD / 94 => Simple;
    F64X2_PROMOTE_LOW_F32X4: "f64x2.promote_low_f32x4" = 0xFD / 95 => Simple;
    I8X16_ABS: "i8x16.abs" = 0xFD / 96 => Simple;
    I8X16_NEG: "i8x16.neg" = 0xFD / 97 => Simple;
    I8X16_POPCNT: "i8x16.popcnt" = 0xFD / 98 => Simple;
    I8X16_ALL_TRUE: "i8x16.all_true" = 0xFD / 99 => Simple;
    I8X16_BITMASK: "i8x16.bitmask" = 0xFD / 100 => Simple;
    I8X16_NARROW_I16X8_S: "i8x16.narrow_i16x8_s" = 0xFD / 101 => Simple;
    I8X16_NARROW_I16X8_U: "i8x16.narrow_i16x8_u" = 0xFD / 102 => Simple;
    F32X4_CEIL: "f32x4.ceil" = 0xFD / 103 => Simple;
    F32X4_FLOOR: "f32x4.floor" = 0xFD / 104 => Simple;
    F32X4_TRUNC: "f32x4.trunc" = 0xFD / 105 => Simple;
    F32X4_NEAREST: "f32x4.nearest" = 0xFD / 106 => Simple;
    I8X16_SHL: "i8x16.shl" = 0xFD / 107 => Simple;
    I8X16_SHR_S: "i8x16.shr_s" = 0xFD / 108 => Simple;
    I8X16_SHR_U: "i8x16.shr_u" = 0xFD / 109 => Simple;
    I8X16_ADD: "i8x16.add" = 0xFD / 110 => Simple;
    I8X16_ADD_SAT_S: "i8x16.add_sat_s" = 0xFD / 111 => Simple;
    I8X16_ADD_SAT_U: "i8x16.add_sat_u" = 0xFD / 112 => Simple;
    I8X16_SUB: "i8x16.sub" = 0xFD / 113 => Simple;
    I8X16_SUB_SAT_S: "i8x16.sub_sat_s" = 0xFD / 114 => Simple;
    I8X16_SUB_SAT_U: "i8x16.sub_sat_u" = 0xFD / 115 => Simple;
    F64X2_CEIL: "f64x2.ceil" = 0xFD / 116 => Simple;
    F64X2_FLOOR: "f64x2.floor" = 0xFD / 117 => Simple;
    I8X16_MIN_S: "i8x16.min_s" = 0xFD / 118 => Simple;
    I8X16_MIN_U: "i8x16.min_u" = 0xFD / 119 => Simple;
    I8X16_MAX_S: "i8x16.max_s" = 0xFD / 120 => Simple;
    I8X16_MAX_U: "i8x16.max_u" = 0xFD / 121 => Simple;
    F64X2_TRUNC: "f64x2.trunc" = 0xFD / 122 => Simple;
    I8X16_AVGR_U: "i8x16.avgr_u" = 0xFD / 123 => Simple;
    I16X8_EXTADD_PAIRWISE_I8X16_S: "i16x8.extadd_pairwise_i8x16_s" = 0xFD / 124 => Simple;
    I16X8_EXTADD_PAIRWISE_I8X16_U: "i16x8.extadd_pairwise_i8x16_u" = 0xFD / 125 => Simple;
    I32X4_EXTADD_PAIRWISE_I16X8_S: "i32x4.extadd_pairwise_i16x8_s" = 0xFD / 126 => Simple;
    I32X4_EXTADD_PAIRWISE_I16X8_U: "i32x4.extadd_pairwise_i16x8_u" = 0xFD / 127 => Simple;
    I16X8_ABS: "i16x8.abs" = 0xFD / 128 => Simple;
    I16X8_NEG: "i16x8.neg" = 0xFD / 129 => Simple;
    I16X8_Q15MULR_SAT_S: "i16x8.q15mulr_sat_s" = 0xFD / 130 => Simple;
    I16X8_ALL_TRUE: "i16x8.all_true" = 0xFD / 131 => Simple;
    I16X8_BITMASK: "i16x8.bitmask" = 0xFD / 132 => Simple;
    I16X8_NARROW_I32X4_S: "i16x8.narrow_i32x4_s" = 0xFD / 133 => Simple;
    I16X8_NARROW_I32X4_U: "i16x8.narrow_i32x4_u" = 0xFD / 134 => Simple;
    I16X8_EXTEND_LOW_I8X16_S: "i16x8.extend_low_i8x16_s" = 0xFD / 135 => Simple;
    I16X8_EXTEND_HIGH_I8X16_S: "i16x8.extend_high_i8x16_s" = 0xFD / 136 => Simple;
    I16X8_EXTEND_LOW_I8X16_U: "i16x8.extend_low_i8x16_u" = 0xFD / 137 => Simple;
    I16X8_EXTEND_HIGH_I8X16_U: "i16x8.extend_high_i8x16_u" = 0xFD / 138 => Simple;
    I16X8_SHL: "i16x8.shl" = 0xFD / 139 => Simple;
    I16X8_SHR_S: "i16x8.shr_s" = 0xFD / 140 => Simple;
    I16X8_SHR_U: "i16x8.shr_u" = 0xFD / 141 => Simple;
    I16X8_ADD: "i16x8.add" = 0xFD / 142 => Simple;
    I16X8_ADD_SAT_S: "i16x8.add_sat_s" = 0xFD / 143 => Simple;
    I16X8_ADD_SAT_U: "i16x8.add_sat_u" = 0xFD / 144 => Simple;
    I16X8_SUB: "i16x8.sub" = 0xFD / 145 => Simple;
    I16X8_SUB_SAT_S: "i16x8.sub_sat_s" = 0xFD / 146 => Simple;
    I16X8_SUB_SAT_U: "i16x8.sub_sat_u" = 0xFD / 147 => Simple;
    F64X2_NEAREST: "f64x2.nearest" = 0xFD / 148 => Simple;
    I16X8_MUL: "i16x8.mul" = 0xFD / 149 => Simple;
    I16X8_MIN_S: "i16x8.min_s" = 0xFD / 150 => Simple;
    I16X8_MIN_U: "i16x8.min_u" = 0xFD / 151 => Simple;
    I16X8_MAX_S: "i16x8.max_s" = 0xFD / 152 => Simple;
    I16X8_MAX_U: "i16x8.max_u" = 0xFD / 153 => Simple;
    I16X8_AVGR_U: "i16x8.avgr_u" = 0xFD / 155 => Simple;
    I16X8_EXTMUL_LOW_I8X16_S: "i16x8.extmul_low_i8x16_s" = 0xFD / 156 => Simple;
    I16X8_EXTMUL_HIGH_I8X16_S: "i16x8.extmul_high_i8x16_s" = 0xFD / 157 => Simple;
    I16X8_EXTMUL_LOW_I8X16_U: "i16x8.extmul_low_i8x16_u" = 0xFD / 158 => Simple;
    I16X8_EXTMUL_HIGH_I8X16_U: "i16x8.extmul_high_i8x16_u" = 0xFD / 159 => Simple;
    I32X4_ABS: "i32x4.abs" = 0xFD / 160 => Simple;
    I32X4_NEG: "i32x4.neg" = 0xFD / 161 => Simple;
    I32X4_ALL_TRUE: "i32x4.all_true" = 0xFD / 163 => Simple;
    I32X4_BITMASK: "i32x4.bitmask" = 0xFD / 164 => Simple;
    I32X4_EXTEND_LOW_I16X8_S: "i32x4.extend_low_i16x8_s" = 0xFD / 167 => Simple;
    I32X4_EXTEND_HIGH_I16X8_S: "i32x4.extend_high_i16x8_s" = 0xFD / 168 => Simple;
    I32X4_EXTEND_LOW_I16X8_U: "i32x4.extend_low_i16x8_u" = 0xFD / 169 => Simple;
    I32X4_EXTEND_HIGH_I16X8_U: "i32x4.extend_high_i16x8_u" = 0xFD / 170 => Simple;
    I32X4_SHL: "i32x4.shl" = 0xFD / 171 => Simple;
    I32X4_SHR_S: "i32x4.shr_s" = 0xFD / 172 => Simple;
    I32X4_SHR_U: "i32x4.shr_u" = 0xFD / 173 => Simple;
    I32X4_ADD: "i32x4.add" = 0xFD / 174 => Simple;
    I32X4_SUB: "i32x4.sub" = 0xFD / 177 => Simple;
    I32X4_MUL: "i32x4.mul" = 0xFD / 181 => Simple;
    I32X4_MIN_S: "i32x4.min_s" = 0xFD / 182 => Simple;
    I32X4_MIN_U: "i32x4.min_u" = 0xFD / 183 => Simple;
    I32X4_MAX_S: "i32x4.max_s" = 0xFD / 184 => Simple;
    I32X4_MAX_U: "i32x4.max_u" = 0xFD / 185 => Simple;
    I32X4_DOT_I16X8_S: "i32x4.dot_i16x8_s" = 0xFD / 186 => Simple;
    I32X4_EXTMUL_LOW_I16X8_S: "i32x4.extmul_low_i16x8_s" = 0xFD / 188 => Simple;
    I32X4_EXTMUL_HIGH_I16X8_S: "i32x4.extmul_high_i16x8_s" = 0xFD / 189 => Simple;
    I32X4_EXTMUL_LOW_I16X8_U: "i32x4.extmul_low_i16x8_u" = 0xFD / 190 => Simple;
    I32X4_EXTMUL_HIGH_I16X8_U: "i32x4.extmul_high_i16x8_u" = 0xFD / 191 => Simple;
    I64X2_ABS: "i64x2.abs" = 0xFD / 192 => Simple;
    I64X2_NEG: "i64x2.neg" = 0xFD / 193 => Simple;
    I64X2_ALL_TRUE: "i64x2.all_true" = 0xFD / 195 => Simple;
    I64X2_BITMASK: "i64x2.bitmask" = 0xFD / 196 => Simple;
    I64X2_EXTEND_LOW_I32X4_S: "i64x2.extend_low_i32x4_s" = 0xFD / 199 => Simple;
    I64X2_EXTEND_HIGH_I32X4_S: "i64x2.extend_high_i32x4_s" = 0xFD / 200 => Simple;
    I64X2_EXTEND_LOW_I32X4_U: "i64x2.extend_low_i32x4_u" = 0xFD / 201 => Simple;
    I64X2_EXTEND_HIGH_I32X4_U: "i64x2.extend_high_i32x4_u" = 0xFD / 202 => Simple;
    I64X2_SHL: "i64x2.shl" = 0xFD / 203 => Simple;
    I64X2_SHR_S: "i64x2.shr_s" = 0xFD / 204 => Simple;
    I64X2_SHR_U: "i64x2.shr_u" = 0xFD / 205 => Simple;
    I64X2_ADD: "i64x2.add" = 0xFD / 206 => Simple;
    I64X2_SUB: "i64x2.sub" = 0xFD / 209 => Simple;
    I64X2_MUL: "i64x2.mul" = 0xFD / 213 => Simple;
    I64X2_EQ: "i64x2.eq" = 0xFD / 214 => Simple;
    I64X2_NE: "i64x2.ne" = 0xFD / 215 => Simple;
    I64X2_LT_S: "i64x2.lt_s" = 0xFD / 216 => Simple;
    I64X2_GT_S: "i64x2.gt_s" = 0xFD / 217 => Simple;
    I64X2_LE_S: "i64x2.le_s" = 0xFD / 218 => Simple;
    I64X2_GE_S: "i64x2.ge_s" = 0xFD / 219 => Simple;
    I64X2_EXTMUL_LOW_I32X4_S: "i64x2.extmul_low_i32x4_s" = 0xFD / 220 => Simple;
    I64X2_EXTMUL_HIGH_I32X4_S: "i64x2.extmul_high_i32x4_s" = 0xFD / 221 => Simple;
    I64X2_EXTMUL_LOW_I32X4_U: "i64x2.extmul_low_i32x4_u" = 0xFD / 222 => Simple;
    I64X2_EXTMUL_HIGH_I32X4_U: "i64x2.extmul_high_i32x4_u" = 0xFD / 223 => Simple;
    F32X4_ABS: "f32x4.abs" = 0xFD / 224 => Simple;
    F32X4_NEG: "f32x4.neg" = 0xFD / 225 => Simple;
    F32X4_SQRT: "f32x4.sqrt" = 0xFD / 227 => Simple;
    F32X4_ADD: "f32x4.add" = 0xFD / 228 => Simple;
    F32X4_SUB: "f32x4.sub" = 0xFD / 229 => Simple;
    F32X4_MUL: "f32x4.mul" = 0xFD / 230 => Simple;
    F32X4_DIV: "f32x4.div" = 0xFD / 231 => Simple;
    F32X4_MIN: "f32x4.min" = 0xFD / 232 => Simple;
    F32X4_MAX: "f32x4.max" = 0xFD / 233 => Simple;
    F32X4_PMIN: "f32x4.pmin" = 0xFD / 234 => Simple;
    F32X4_PMAX: "f32x4.pmax" = 0xFD / 235 => Simple;
    F64X2_ABS: "f64x2.abs" = 0xFD / 236 => Simple;
    F64X2_NEG: "f64x2.neg" = 0xFD / 237 => Simple;
    F64X2_SQRT: "f64x2.sqrt" = 0xFD / 239 => Simple;
    F64X2_ADD: "f64x2.add" = 0xFD / 240 => Simple;
    F64X2_SUB: "f64x2.sub" = 0xFD / 241 => Simple;
    F64X2_MUL: "f64x2.mul" = 0xFD / 242 => Simple;
    F64X2_DIV: "f64x2.div" = 0xFD / 243 => Simple;
    F64X2_MIN: "f64x2.min" = 0xFD / 244 => Simple;
    F64X2_MAX: "f64x2.max" = 0xFD / 245 => Simple;
    F64X2_PMIN: "f64x2.pmin" = 0xFD / 246 => Simple;
    F64X2_PMAX: "f64x2.pmax" = 0xFD / 247 => Simple;
    I32X4_TRUNC_SAT_F32X4_S: "i32x4.trunc_sat_f32x4_s" = 0xFD / 248 => Simple;
    I32X4_TRUNC_SAT_F32X4_U: "i32x4.trunc_sat_f32x4_u" = 0xFD / 249 => Simple;
    F32X4_CONVERT_I32X4_S: "f32x4.convert_i32x4_s" = 0xFD / 250 => Simple;
    F32X4_CONVERT_I32X4_U: "f32x4.convert_i32x4_u" = 0xFD / 251 => Simple;
    I32X4_TRUNC_SAT_F64X2_S_ZERO: "i32x4.trunc_sat_f64x2_s_zero" = 0xFD / 252 => Simple;
    I32X4_TRUNC_SAT_F64X2_U_ZERO: "i32x4.trunc_sat_f64x2_u_zero" = 0xFD / 253 => Simple;
    F64X2_CONVERT_LOW_I32X4_S: "f64x2.convert_low_i32x4_s" = 0xFD / 254 => Simple;
    F64X2_CONVERT_LOW_I32X4_U: "f64x2.convert_low_i32x4_u" = 0xFD / 255 => Simple;
}

// ---------------------------------------------------------------------------
// Lookup tables
// ---------------------------------------------------------------------------

/// Result of looking up a primary opcode byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimaryLookup {
    /// No instruction uses this byte.
    Unknown,
    /// A direct, single-byte instruction.
    Direct(Opcode),
    /// A prefix byte; a ULEB128 secondary opcode follows.
    Prefixed,
}

struct Registry {
    primary: [PrimaryLookup; 256],
    secondary: HashMap<(u8, u32), Opcode>,
}

static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let mut primary = [PrimaryLookup::Unknown; 256];
    let mut secondary = HashMap::new();
    for op in ALL {
        match op.secondary {
            None => {
                assert!(
                    matches!(primary[op.primary as usize], PrimaryLookup::Unknown),
                    "duplicate opcode {:#04x}",
                    op.primary
                );
                primary[op.primary as usize] = PrimaryLookup::Direct(*op);
            }
            Some(s) => {
                assert!(
                    !matches!(primary[op.primary as usize], PrimaryLookup::Direct(_)),
                    "prefix byte {:#04x} already taken by a direct opcode",
                    op.primary
                );
                primary[op.primary as usize] = PrimaryLookup::Prefixed;
                let dup = secondary.insert((op.primary, s), *op);
                assert!(dup.is_none(), "duplicate opcode {:#04x} {}", op.primary, s);
            }
        }
    }
    Registry { primary, secondary }
});

/// Looks up a primary opcode byte.
pub fn lookup_primary(byte: u8) -> PrimaryLookup {
    REGISTRY.primary[byte as usize]
}

/// Looks up a secondary opcode under a prefix byte.
pub fn lookup_secondary(prefix: u8, secondary: u32) -> Option<Opcode> {
    REGISTRY.secondary.get(&(prefix, secondary)).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direct_lookup() {
        assert_eq!(lookup_primary(0x6A), PrimaryLookup::Direct(Opcode::I32_ADD));
        assert_eq!(lookup_primary(0x00), PrimaryLookup::Direct(Opcode::UNREACHABLE));
        assert_eq!(lookup_primary(0xD0), PrimaryLookup::Direct(Opcode::REF_NULL));
    }

    #[test]
    fn prefix_lookup() {
        assert_eq!(lookup_primary(0xFC), PrimaryLookup::Prefixed);
        assert_eq!(lookup_primary(0xFD), PrimaryLookup::Prefixed);
        assert_eq!(lookup_secondary(0xFC, 8), Some(Opcode::MEMORY_INIT));
        assert_eq!(lookup_secondary(0xFC, 17), Some(Opcode::TABLE_FILL));
        assert_eq!(lookup_secondary(0xFD, 12), Some(Opcode::V128_CONST));
        assert_eq!(lookup_secondary(0xFD, 214), Some(Opcode::I64X2_EQ));
        assert_eq!(lookup_secondary(0xFD, 255), Some(Opcode::F64X2_CONVERT_LOW_I32X4_U));
    }

    #[test]
    fn unknown_bytes() {
        // 0x05 (else) and 0x0B (end) are structural, not instructions.
        assert_eq!(lookup_primary(0x05), PrimaryLookup::Unknown);
        assert_eq!(lookup_primary(0x0B), PrimaryLookup::Unknown);
        assert_eq!(lookup_primary(0x12), PrimaryLookup::Unknown);
        assert_eq!(lookup_secondary(0xFC, 18), None);
        assert_eq!(lookup_secondary(0xFD, 154), None);
    }

    #[test]
    fn registry_is_duplicate_free() {
        // Building REGISTRY asserts uniqueness internally; force it here.
        let mut direct = 0;
        let mut prefixed = 0;
        for op in ALL {
            match op.secondary {
                None => direct += 1,
                Some(_) => prefixed += 1,
            }
        }
        assert_eq!(direct + prefixed, ALL.len());
        // The two prefixed spaces: 18 miscellaneous ops + the SIMD set.
        let misc = ALL.iter().filter(|op| op.primary == 0xFC).count();
        assert_eq!(misc, 18);
        lookup_primary(0x00);
    }

    #[test]
    fn mnemonics_follow_wire_names() {
        assert_eq!(Opcode::MEMORY_INIT.mnemonic, "memory.init");
        assert_eq!(Opcode::I8X16_SHUFFLE.mnemonic, "i8x16.shuffle");
        assert_eq!(Opcode::I64_TRUNC_SAT_F64_U.mnemonic, "i64.trunc_sat_f64_u");
    }
}
