//! Round-trip tests: decoding encoded bytes reproduces the module, and
//! re-encoding the decoded module reproduces the bytes.

use rstest::rstest;
use wasmloom::{
    read_module, write_module_with, DataMode, Element, ElementContent, ElementMode, Error,
    Expression, FuncRef, IndexError, InstrArgs, Local, MemArg, Module, Opcode, RefType, Result,
    StateError, ValType, WriteConfig,
};

/// Encodes, decodes, re-encodes, and checks byte equality. Type merging is
/// disabled so the type section survives the trip structurally intact.
fn assert_stable(module: &Module) -> Result<Module> {
    let config = WriteConfig { merge_types: false };
    let bytes = write_module_with(module, &config)?;
    let decoded = read_module(&bytes)?;
    let again = write_module_with(&decoded, &config)?;
    assert_eq!(hex::encode(&bytes), hex::encode(&again));
    Ok(decoded)
}

#[test]
fn kitchen_sink_module_is_encode_stable() -> Result<()> {
    let mut module = Module::new();
    let ty_log = module.create_type(vec![ValType::I32], vec![]);
    let ty_run = module.create_type(vec![], vec![]);

    let log = module.import_function("env", "log", ty_log)?;
    let table = module.create_table(RefType::FuncRef, 1, Some(4));
    let memory = module.create_memory(1, None);
    let counter = module.create_global(ValType::I32, true, Expression::i32_const(7));
    module.create_global(ValType::F64, false, Expression::f64_const(2.5));

    let scratch = module.create_data_passive(vec![0xAA, 0xBB]);
    module.create_data_active(memory.into(), Expression::i32_const(8), vec![1, 2, 3])?;

    let mut body = Expression::new();
    // Structured control flow.
    let mut inner = Expression::new();
    inner.emit_with(Opcode::BR, InstrArgs::Label(0));
    body.emit_with(
        Opcode::BLOCK,
        InstrArgs::Block {
            block_type: None,
            body: inner,
        },
    );
    body.emit_with(Opcode::I32_CONST, InstrArgs::I32(1));
    body.emit_with(
        Opcode::IF,
        InstrArgs::IfElse {
            block_type: Some(ValType::I32),
            consequent: Expression::i32_const(1),
            alternate: Some(Expression::i32_const(2)),
        },
    );
    body.emit(Opcode::DROP);
    let mut spin = Expression::new();
    spin.emit_with(Opcode::BR_IF, InstrArgs::Label(0));
    body.emit_with(
        Opcode::LOOP,
        InstrArgs::Block {
            block_type: None,
            body: spin,
        },
    );
    let mut jump = Expression::new();
    jump.emit_with(
        Opcode::BR_TABLE,
        InstrArgs::BrTable {
            labels: vec![0, 0],
            default: 0,
        },
    );
    body.emit_with(
        Opcode::BLOCK,
        InstrArgs::Block {
            block_type: None,
            body: jump,
        },
    );

    // Memory traffic.
    body.emit_with(Opcode::I32_CONST, InstrArgs::I32(0));
    body.emit_with(Opcode::I32_LOAD, InstrArgs::MemArg(MemArg::new(2, 8)));
    body.emit_with(Opcode::I32_CONST, InstrArgs::I32(0));
    body.emit_with(Opcode::I32_STORE, InstrArgs::MemArg(MemArg::new(2, 0)));
    body.emit_with(
        Opcode::MEMORY_INIT,
        InstrArgs::DataMem {
            data: scratch,
            memory: memory.into(),
        },
    );
    body.emit_with(Opcode::DATA_DROP, InstrArgs::Data(scratch));
    body.emit_with(
        Opcode::MEMORY_COPY,
        InstrArgs::MemoryCopy {
            dst: memory.into(),
            src: memory.into(),
        },
    );
    body.emit_with(Opcode::MEMORY_FILL, InstrArgs::Memory(memory.into()));

    // References, tables, SIMD, typed select.
    body.emit_with(Opcode::REF_NULL, InstrArgs::HeapType(RefType::FuncRef));
    body.emit_with(Opcode::REF_FUNC, InstrArgs::Func(log));
    body.emit_with(Opcode::TABLE_SIZE, InstrArgs::Table(table.into()));
    body.emit_with(Opcode::V128_CONST, InstrArgs::Bytes16([9; 16]));
    body.emit_with(Opcode::I8X16_EXTRACT_LANE_S, InstrArgs::Lane(3));
    body.emit_with(Opcode::SELECT_T, InstrArgs::TypeVec(vec![ValType::I32]));
    body.emit_with(Opcode::I32_CONST, InstrArgs::I32(0));
    body.emit_with(
        Opcode::CALL_INDIRECT,
        InstrArgs::CallIndirect {
            ty: ty_log,
            table: table.into(),
        },
    );
    body.emit_global_get(counter.into());
    body.emit_local_get(Local::Index(1));

    let run = module.create_function(ty_run, vec![ValType::I64, ValType::I64, ValType::F32], body)?;
    module.set_start(Some(run.into()))?;

    module.create_element_active(
        table.into(),
        Expression::i32_const(0),
        vec![log, run.into()],
    )?;
    module.create_element_passive(vec![run.into()])?;
    module.create_element_expr_passive(
        RefType::ExternRef,
        vec![{
            let mut e = Expression::new();
            e.emit_with(Opcode::REF_NULL, InstrArgs::HeapType(RefType::ExternRef));
            e
        }],
    )?;
    module.create_element_expr_declarative(RefType::FuncRef, vec![{
        let mut e = Expression::new();
        e.emit_with(Opcode::REF_FUNC, InstrArgs::Func(run.into()));
        e
    }])?;

    module.export_function("run", run.into())?;
    module.export_memory("mem", memory.into())?;
    module.export_table("tbl", table.into())?;
    module.export_global("counter", counter.into())?;

    module.create_custom_section(
        wasmloom::CustomSectionPosition::AfterHeader,
        "producer",
        vec![1, 2, 3],
    );
    module.create_custom_section(wasmloom::CustomSectionPosition::AfterCode, "note", vec![]);

    let decoded = assert_stable(&module)?;
    assert_eq!(decoded.imports().len(), 1);
    assert_eq!(decoded.functions().len(), 1);
    assert_eq!(decoded.globals().len(), 2);
    assert_eq!(decoded.elements().len(), 4);
    assert_eq!(decoded.data().len(), 2);
    assert_eq!(decoded.exports().len(), 4);
    assert!(matches!(decoded.start(), Some(FuncRef::Def(_))));
    assert_eq!(
        decoded.functions()[0].locals(),
        &[ValType::I64, ValType::I64, ValType::F32]
    );
    Ok(())
}

#[test]
fn element_modes_survive_decoding() -> Result<()> {
    let mut module = Module::new();
    let ty = module.create_type(vec![], vec![]);
    let f = module.create_function(ty, vec![], Expression::new())?;
    let table = module.create_table(RefType::FuncRef, 1, None);
    module.create_element_active(table.into(), Expression::i32_const(0), vec![f.into()])?;
    module.create_element_passive(vec![f.into()])?;
    module.create_element_declarative(vec![f.into()])?;

    let decoded = assert_stable(&module)?;
    let modes: Vec<&Element> = decoded.elements().iter().collect();
    assert!(matches!(modes[0].mode, ElementMode::Active { .. }));
    assert!(matches!(modes[1].mode, ElementMode::Passive));
    assert!(matches!(modes[2].mode, ElementMode::Declarative));
    for element in modes {
        assert!(matches!(element.content, ElementContent::Funcs(_)));
    }
    Ok(())
}

#[test]
fn data_modes_survive_decoding() -> Result<()> {
    let mut module = Module::new();
    let memory = module.create_memory(1, Some(2));
    module.create_data_active(memory.into(), Expression::i32_const(16), vec![7, 8])?;
    module.create_data_passive(vec![9]);

    let decoded = assert_stable(&module)?;
    assert!(matches!(decoded.data()[0].mode, DataMode::Active { .. }));
    assert_eq!(decoded.data()[0].bytes, vec![7, 8]);
    assert!(matches!(decoded.data()[1].mode, DataMode::Passive));
    Ok(())
}

#[test]
fn custom_sections_keep_their_positions() -> Result<()> {
    use wasmloom::CustomSectionPosition::{AfterData, AfterHeader};

    let mut module = Module::new();
    module.create_custom_section(AfterHeader, "first", vec![0xDE, 0xAD]);
    module.create_custom_section(AfterHeader, "second", vec![]);
    module.create_custom_section(AfterData, "last", vec![0x01]);

    let decoded = assert_stable(&module)?;
    let head = decoded.custom_sections(AfterHeader);
    assert_eq!(head.len(), 2);
    assert_eq!(head[0].name, "first");
    assert_eq!(head[0].bytes, vec![0xDE, 0xAD]);
    assert_eq!(head[1].name, "second");
    assert_eq!(decoded.custom_sections(AfterData)[0].name, "last");
    Ok(())
}

#[rstest]
#[case::zero(0)]
#[case::one(1)]
#[case::minus_one(-1)]
#[case::max(i32::MAX)]
#[case::min(i32::MIN)]
fn i32_const_round_trips(#[case] value: i32) -> Result<()> {
    let mut module = Module::new();
    let ty = module.create_type(vec![], vec![]);
    let mut body = Expression::new();
    body.emit_with(Opcode::I32_CONST, InstrArgs::I32(value));
    body.emit(Opcode::DROP);
    module.create_function(ty, vec![], body)?;

    let decoded = assert_stable(&module)?;
    assert_eq!(
        decoded.functions()[0].body.instructions[0].args,
        InstrArgs::I32(value)
    );
    Ok(())
}

#[rstest]
#[case::half(0.5)]
#[case::negative(-1024.25)]
#[case::infinity(f64::INFINITY)]
fn f64_const_round_trips(#[case] value: f64) -> Result<()> {
    let mut module = Module::new();
    let ty = module.create_type(vec![], vec![]);
    let mut body = Expression::new();
    body.emit_with(Opcode::F64_CONST, InstrArgs::F64(value));
    body.emit(Opcode::DROP);
    module.create_function(ty, vec![], body)?;

    let decoded = assert_stable(&module)?;
    assert_eq!(
        decoded.functions()[0].body.instructions[0].args,
        InstrArgs::F64(value)
    );
    Ok(())
}

#[test]
fn decoder_rejects_imported_start() -> Result<()> {
    let mut module = Module::new();
    let ty = module.create_type(vec![], vec![]);
    let imported = module.import_function("env", "init", ty)?;
    module.set_start(Some(imported))?;

    let bytes = write_module_with(&module, &WriteConfig::default())?;
    let err = read_module(&bytes).unwrap_err();
    assert!(matches!(
        err,
        Error::Index(IndexError::ImportNotAllowed { .. })
    ));
    Ok(())
}

#[test]
fn decoder_rejects_exported_import() -> Result<()> {
    // Hand-built: one type, an imported function, and an export naming
    // wire index 0 (the import).
    let bytes = [
        b'\0', b'a', b's', b'm', 1, 0, 0, 0, //
        1, 4, 1, 0x60, 0, 0, // type section: () -> ()
        2, 7, 1, 1, b'e', 1, b'f', 0, 0, // import section: func "e"."f" type 0
        7, 5, 1, 1, b'x', 0, 0, // export section: "x" func 0
    ];
    let err = read_module(&bytes).unwrap_err();
    assert!(matches!(
        err,
        Error::Index(IndexError::ImportNotAllowed { .. })
    ));
    Ok(())
}

#[test]
fn memory_init_requires_a_data_count() {
    // A code body using memory.init without a preceding data count section.
    let bytes = [
        b'\0', b'a', b's', b'm', 1, 0, 0, 0, //
        1, 4, 1, 0x60, 0, 0, // type section: () -> ()
        3, 2, 1, 0, // function section
        5, 3, 1, 0, 1, // memory section: min 1, no max
        10, 8, 1, 6, 0, 0xFC, 8, 0, 0, 0x0B, // code: memory.init 0 0
    ];
    let err = read_module(&bytes).unwrap_err();
    assert!(matches!(
        err,
        Error::State(StateError::DataIndexesUnregistered)
    ));
}

#[test]
fn truncated_input_is_rejected() -> Result<()> {
    let mut module = Module::new();
    let ty = module.create_type(vec![], vec![]);
    module.create_function(ty, vec![], Expression::new())?;
    let bytes = write_module_with(&module, &WriteConfig::default())?;
    assert!(read_module(&bytes[..bytes.len() - 1]).is_err());
    Ok(())
}
