//! Builder API tests: factories, index assignment, type merging, and the
//! stable-handle behaviour of parameters and locals.

use wasmloom::{
    read_module, write_module, write_module_with, Error, Expression, FuncRef, InstrArgs,
    Instruction, Local, Module, Opcode, ReferenceError, Result, StateError, ValType, WriteConfig,
};

fn unit_type(module: &mut Module) -> wasmloom::TypeId {
    module.create_type(vec![], vec![])
}

#[test]
fn add_function_exact_bytes() -> Result<()> {
    let mut module = Module::new();
    let ty = module.create_type(vec![ValType::F64, ValType::F64], vec![ValType::F64]);
    let a = module.type_def_mut(ty)?.param(0)?;
    let b = module.type_def_mut(ty)?.param(1)?;

    let mut body = Expression::new();
    body.emit_local_get(a);
    body.emit_local_get(b);
    body.emit(Opcode::F64_ADD);

    let func = module.create_function(ty, vec![], body)?;
    module.export_function("add", func.into())?;

    let bytes = write_module(&module)?;
    assert_eq!(
        hex::encode(&bytes),
        concat!(
            "0061736d01000000",           // magic + version
            "01070160027c7c017c",         // type: (f64, f64) -> f64
            "03020100",                   // function: one func of type 0
            "070701036164640000",         // export: "add" func 0
            "0a0901070020002001a00b",     // code: local.get 0, local.get 1, f64.add
        )
    );

    let decoded = read_module(&bytes)?;
    assert_eq!(decoded.functions().len(), 1);
    assert_eq!(decoded.exports()[0].name, "add");
    let ty = decoded.type_def(decoded.functions()[0].type_id())?;
    assert_eq!(ty.params(), &[ValType::F64, ValType::F64]);
    assert_eq!(ty.results(), &[ValType::F64]);
    let instrs = &decoded.functions()[0].body.instructions;
    assert_eq!(instrs.len(), 3);
    assert_eq!(instrs[0].args, InstrArgs::Local(Local::Index(0)));
    assert_eq!(instrs[1].args, InstrArgs::Local(Local::Index(1)));
    assert_eq!(instrs[2].opcode, Opcode::F64_ADD);
    Ok(())
}

#[test]
fn imports_precede_definitions_in_the_index_space() -> Result<()> {
    let mut module = Module::new();
    let ty = unit_type(&mut module);
    let import_a = module.import_function("env", "a", ty)?;
    let import_b = module.import_function("env", "b", ty)?;
    let def_a = module.create_function(ty, vec![], Expression::new())?;
    module.create_function(ty, vec![], Expression::new())?;

    let caller = module.create_function(ty, vec![], Expression::new())?;
    let mut body = Expression::new();
    body.emit_call(import_a);
    body.emit_call(import_b);
    body.emit_call(def_a.into());
    body.emit_call(caller.into());
    module.func_mut(caller)?.body = body;
    module.export_function("caller", caller.into())?;

    let bytes = write_module(&module)?;
    // Wire indices: imports 0 and 1, then definitions 2 through 4.
    let calls: &[u8] = &[0x10, 0x00, 0x10, 0x01, 0x10, 0x02, 0x10, 0x04];
    assert!(
        bytes.windows(calls.len()).any(|w| w == calls),
        "call sequence not found in {}",
        hex::encode(&bytes)
    );

    let decoded = read_module(&bytes)?;
    assert_eq!(decoded.imports().len(), 2);
    assert_eq!(decoded.functions().len(), 3);
    let caller = &decoded.functions()[2];
    let targets: Vec<&InstrArgs> = caller.body.instructions.iter().map(|i| &i.args).collect();
    assert!(matches!(targets[0], InstrArgs::Func(FuncRef::Import(_))));
    assert!(matches!(targets[1], InstrArgs::Func(FuncRef::Import(_))));
    assert!(matches!(targets[2], InstrArgs::Func(FuncRef::Def(_))));
    assert!(matches!(targets[3], InstrArgs::Func(FuncRef::Def(_))));
    Ok(())
}

#[test]
fn equal_types_merge_by_default() -> Result<()> {
    let mut module = Module::new();
    let ty_a = module.create_type(vec![ValType::I32], vec![ValType::I32]);
    let ty_b = module.create_type(vec![ValType::I32], vec![ValType::I32]);
    module.create_function(ty_a, vec![], Expression::new())?;
    module.create_function(ty_b, vec![], Expression::new())?;

    let merged = read_module(&write_module(&module)?)?;
    assert_eq!(merged.types().len(), 1);
    assert_eq!(
        merged.functions()[0].type_id(),
        merged.functions()[1].type_id()
    );

    let config = WriteConfig { merge_types: false };
    let kept = read_module(&write_module_with(&module, &config)?)?;
    assert_eq!(kept.types().len(), 2);
    Ok(())
}

#[test]
fn types_differing_in_results_do_not_merge() -> Result<()> {
    let mut module = Module::new();
    module.create_type(vec![ValType::I32], vec![]);
    module.create_type(vec![ValType::I32], vec![ValType::I32]);
    // Unreferenced types are still emitted.
    let decoded = read_module(&write_module(&module)?)?;
    assert_eq!(decoded.types().len(), 2);
    Ok(())
}

#[test]
fn parameter_handles_track_splices() -> Result<()> {
    let mut module = Module::new();
    let ty = module.create_type(
        vec![ValType::I32, ValType::I64, ValType::F32],
        vec![],
    );
    let ty_def = module.type_def_mut(ty)?;
    let a = ty_def.param(0)?;
    let b = ty_def.param(1)?;
    let c = ty_def.param(2)?;
    assert_eq!(b.kind(), ValType::I64);

    // Removing the first parameter shifts the survivors down.
    let removed = ty_def.splice_params(0, 1, &[])?;
    assert_eq!(removed, vec![ValType::I32]);
    assert_eq!(ty_def.resolve_param(b)?, 0);
    assert_eq!(ty_def.resolve_param(c)?, 1);

    // Inserting ahead of them shifts them back up.
    ty_def.splice_params(0, 0, &[ValType::F64, ValType::F64])?;
    assert_eq!(ty_def.resolve_param(b)?, 2);

    // The removed parameter's handle is dead, not dangling.
    let err = ty_def.resolve_param(a).unwrap_err();
    assert!(matches!(
        err,
        Error::Reference(ReferenceError::Removed { .. })
    ));
    Ok(())
}

#[test]
fn parameter_handles_are_owner_checked() -> Result<()> {
    let mut module = Module::new();
    let ty_a = module.create_type(vec![ValType::I32], vec![]);
    let ty_b = module.create_type(vec![ValType::I32], vec![]);
    let param = module.type_def_mut(ty_a)?.param(0)?;
    let err = module.type_def(ty_b)?.resolve_param(param).unwrap_err();
    assert!(matches!(
        err,
        Error::Reference(ReferenceError::ForeignOwner { .. })
    ));
    Ok(())
}

#[test]
fn local_handles_account_for_parameters() -> Result<()> {
    let mut module = Module::new();
    let ty = module.create_type(vec![ValType::I32, ValType::I32], vec![]);
    let func = module.create_function(ty, vec![ValType::I64], Expression::new())?;
    let var = module.func_mut(func)?.add_local(ValType::F64);

    let mut body = Expression::new();
    body.emit_local_get(Local::Var(var));
    module.func_mut(func)?.body = body;
    module.export_function("f", func.into())?;

    let bytes = write_module(&module)?;
    // Two parameters and one preceding local put the handle at index 3.
    let decoded = read_module(&bytes)?;
    assert_eq!(
        decoded.functions()[0].body.instructions[0].args,
        InstrArgs::Local(Local::Index(3))
    );
    Ok(())
}

#[test]
fn payload_mismatch_is_rejected_at_encode_time() -> Result<()> {
    let mut module = Module::new();
    let ty = unit_type(&mut module);
    let mut body = Expression::new();
    body.push(Instruction::new(Opcode::I32_CONST, InstrArgs::None));
    module.create_function(ty, vec![], body)?;

    let err = write_module(&module).unwrap_err();
    assert!(matches!(
        err,
        Error::State(StateError::PayloadMismatch { mnemonic: "i32.const" })
    ));
    Ok(())
}

#[test]
fn local_reference_outside_a_function_is_rejected() -> Result<()> {
    let mut module = Module::new();
    let ty = unit_type(&mut module);
    let func = module.create_function(ty, vec![], Expression::new())?;
    let var = module.func_mut(func)?.add_local(ValType::I32);

    // A global initialiser has no local scope to resolve against.
    let mut init = Expression::new();
    init.emit_local_get(Local::Var(var));
    module.create_global(ValType::I32, false, init);

    let err = write_module(&module).unwrap_err();
    assert!(matches!(
        err,
        Error::State(StateError::LocalOutsideFunction)
    ));
    Ok(())
}

#[test]
fn start_function_round_trips() -> Result<()> {
    let mut module = Module::new();
    let ty = unit_type(&mut module);
    let func = module.create_function(ty, vec![], Expression::new())?;
    module.set_start(Some(func.into()))?;

    let decoded = read_module(&write_module(&module)?)?;
    assert!(matches!(decoded.start(), Some(FuncRef::Def(_))));
    Ok(())
}
