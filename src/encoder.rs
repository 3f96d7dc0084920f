//! Encodes a [`Module`] to WebAssembly binary format (`.wasm`).
//!
//! The conceptual inverse of [`crate::decoder::read_module`]. Index maps are
//! allocated before emission: for functions, globals, memories, and tables,
//! imports are numbered first in import order and definitions follow; the
//! type map optionally merges structurally equal types. Each section body is
//! built in a scratch buffer so its byte-length prefix can be written first.
//!
//! ```text
//! module  ::= magic version section*
//! section ::= section_id: u8 | byte_length: vu32 | contents: byte*
//! ```
//!
//! Sections with no entries are omitted. Custom sections are emitted at their
//! recorded anchor positions, interleaved with the standard sections.

use crate::error::{IndexError, IndexSpace, Result, StateError};
use crate::expr::{Expression, InstrArgs, Instruction, Local, MemArg};
use crate::module::{
    DataId, DataMode, ElementContent, ElementId, ElementMode, ExportKind, FuncRef, FunctionDef,
    GlobalRef, ImportKind, MemRef, Module, TableRef, TypeId,
};
use crate::types::{BlockType, CustomSectionPosition, Limits, RefType, ValType};
use crate::wire::{
    write_f32, write_f64, write_name, write_u8vec, write_vs32, write_vs64, write_vu32,
};

/// Encoder configuration.
#[derive(Debug, Clone, Copy)]
pub struct WriteConfig {
    /// Merge structurally equal function types into one emitted entry.
    pub merge_types: bool,
}

impl Default for WriteConfig {
    fn default() -> WriteConfig {
        WriteConfig { merge_types: true }
    }
}

/// Encodes a module with the default configuration.
pub fn write_module(module: &Module) -> Result<Vec<u8>> {
    write_module_with(module, &WriteConfig::default())
}

/// Encodes a module.
pub fn write_module_with(module: &Module, config: &WriteConfig) -> Result<Vec<u8>> {
    ModuleWriter::new(module, *config).write()
}

struct IndexMaps {
    /// Emitted index per type id, after merging.
    type_index: Vec<u32>,
    /// Type ids actually emitted, in order.
    type_order: Vec<u32>,
    /// Per-kind wire index per import id.
    import_index: Vec<u32>,
    func_imports: u32,
    global_imports: u32,
    memory_imports: u32,
    table_imports: u32,
}

/// Stateful encoder: holds the index maps for one write pass.
pub struct ModuleWriter<'m> {
    module: &'m Module,
    config: WriteConfig,
    maps: Option<IndexMaps>,
}

impl<'m> ModuleWriter<'m> {
    pub fn new(module: &'m Module, config: WriteConfig) -> ModuleWriter<'m> {
        ModuleWriter {
            module,
            config,
            maps: None,
        }
    }

    /// Runs a full write pass.
    pub fn write(&mut self) -> Result<Vec<u8>> {
        if self.maps.is_some() {
            return Err(StateError::AlreadyWriting.into());
        }
        self.maps = Some(self.allocate_maps());
        let result = self.write_sections();
        self.maps = None;
        result
    }

    fn write_sections(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        buf.extend_from_slice(&crate::wire::MAGIC);
        buf.extend_from_slice(&crate::wire::VERSION.to_le_bytes());

        self.write_custom_sections(&mut buf, CustomSectionPosition::AfterHeader);

        let mut contents = Vec::new();

        if !self.maps()?.type_order.is_empty() {
            self.encode_type_section(&mut contents)?;
            emit_section(&mut buf, crate::wire::SECTION_TYPE, &contents);
            contents.clear();
        }
        self.write_custom_sections(&mut buf, CustomSectionPosition::AfterType);

        if !self.module.imports().is_empty() {
            self.encode_import_section(&mut contents)?;
            emit_section(&mut buf, crate::wire::SECTION_IMPORT, &contents);
            contents.clear();
        }
        self.write_custom_sections(&mut buf, CustomSectionPosition::AfterImport);

        if !self.module.functions().is_empty() {
            self.encode_function_section(&mut contents)?;
            emit_section(&mut buf, crate::wire::SECTION_FUNCTION, &contents);
            contents.clear();
        }
        self.write_custom_sections(&mut buf, CustomSectionPosition::AfterFunction);

        if !self.module.tables().is_empty() {
            self.encode_table_section(&mut contents);
            emit_section(&mut buf, crate::wire::SECTION_TABLE, &contents);
            contents.clear();
        }
        self.write_custom_sections(&mut buf, CustomSectionPosition::AfterTable);

        if !self.module.memories().is_empty() {
            self.encode_memory_section(&mut contents);
            emit_section(&mut buf, crate::wire::SECTION_MEMORY, &contents);
            contents.clear();
        }
        self.write_custom_sections(&mut buf, CustomSectionPosition::AfterMemory);

        if !self.module.globals().is_empty() {
            self.encode_global_section(&mut contents)?;
            emit_section(&mut buf, crate::wire::SECTION_GLOBAL, &contents);
            contents.clear();
        }
        self.write_custom_sections(&mut buf, CustomSectionPosition::AfterGlobal);

        if !self.module.exports().is_empty() {
            self.encode_export_section(&mut contents)?;
            emit_section(&mut buf, crate::wire::SECTION_EXPORT, &contents);
            contents.clear();
        }
        self.write_custom_sections(&mut buf, CustomSectionPosition::AfterExport);

        if let Some(start) = self.module.start() {
            write_vu32(&mut contents, self.func_index(start)?);
            emit_section(&mut buf, crate::wire::SECTION_START, &contents);
            contents.clear();
        }
        self.write_custom_sections(&mut buf, CustomSectionPosition::AfterStart);

        if !self.module.elements().is_empty() {
            self.encode_element_section(&mut contents)?;
            emit_section(&mut buf, crate::wire::SECTION_ELEMENT, &contents);
            contents.clear();
        }
        self.write_custom_sections(&mut buf, CustomSectionPosition::AfterElement);

        if !self.module.data().is_empty() {
            write_vu32(&mut contents, self.module.data().len() as u32);
            emit_section(&mut buf, crate::wire::SECTION_DATA_COUNT, &contents);
            contents.clear();
        }
        self.write_custom_sections(&mut buf, CustomSectionPosition::AfterDataCount);

        if !self.module.functions().is_empty() {
            self.encode_code_section(&mut contents)?;
            emit_section(&mut buf, crate::wire::SECTION_CODE, &contents);
            contents.clear();
        }
        self.write_custom_sections(&mut buf, CustomSectionPosition::AfterCode);

        if !self.module.data().is_empty() {
            self.encode_data_section(&mut contents)?;
            emit_section(&mut buf, crate::wire::SECTION_DATA, &contents);
            contents.clear();
        }
        self.write_custom_sections(&mut buf, CustomSectionPosition::AfterData);

        Ok(buf)
    }

    // Index maps --------------------------------------------------------------

    fn allocate_maps(&self) -> IndexMaps {
        let types = self.module.types();
        let mut type_index = vec![0u32; types.len()];
        let mut type_order: Vec<u32> = Vec::with_capacity(types.len());
        for (i, ty) in types.iter().enumerate() {
            let merged = if self.config.merge_types {
                type_order.iter().position(|&e| {
                    let other = &types[e as usize];
                    other.params() == ty.params() && other.results() == ty.results()
                })
            } else {
                None
            };
            match merged {
                Some(pos) => type_index[i] = pos as u32,
                None => {
                    type_index[i] = type_order.len() as u32;
                    type_order.push(i as u32);
                }
            }
        }

        let mut import_index = Vec::with_capacity(self.module.imports().len());
        let (mut nf, mut ng, mut nm, mut nt) = (0u32, 0u32, 0u32, 0u32);
        for import in self.module.imports() {
            match import.kind {
                ImportKind::Function(_) => {
                    import_index.push(nf);
                    nf += 1;
                }
                ImportKind::Global { .. } => {
                    import_index.push(ng);
                    ng += 1;
                }
                ImportKind::Memory(_) => {
                    import_index.push(nm);
                    nm += 1;
                }
                ImportKind::Table { .. } => {
                    import_index.push(nt);
                    nt += 1;
                }
            }
        }

        IndexMaps {
            type_index,
            type_order,
            import_index,
            func_imports: nf,
            global_imports: ng,
            memory_imports: nm,
            table_imports: nt,
        }
    }

    fn maps(&self) -> Result<&IndexMaps> {
        match self.maps.as_ref() {
            Some(maps) => Ok(maps),
            None => Err(StateError::IndexesUnallocated.into()),
        }
    }

    fn type_index(&self, id: TypeId) -> Result<u32> {
        let maps = self.maps()?;
        match maps.type_index.get(id.index() as usize) {
            Some(&index) => Ok(index),
            None => Err(IndexError::NotInModule { space: IndexSpace::Type }.into()),
        }
    }

    fn func_index(&self, f: FuncRef) -> Result<u32> {
        self.module.check_func(f)?;
        let maps = self.maps()?;
        Ok(match f {
            FuncRef::Import(id) => maps.import_index[id.index() as usize],
            FuncRef::Def(id) => maps.func_imports + id.index(),
        })
    }

    fn global_index(&self, g: GlobalRef) -> Result<u32> {
        self.module.check_global(g)?;
        let maps = self.maps()?;
        Ok(match g {
            GlobalRef::Import(id) => maps.import_index[id.index() as usize],
            GlobalRef::Def(id) => maps.global_imports + id.index(),
        })
    }

    fn memory_index(&self, m: MemRef) -> Result<u32> {
        self.module.check_memory(m)?;
        let maps = self.maps()?;
        Ok(match m {
            MemRef::Import(id) => maps.import_index[id.index() as usize],
            MemRef::Def(id) => maps.memory_imports + id.index(),
        })
    }

    fn table_index(&self, t: TableRef) -> Result<u32> {
        self.module.check_table(t)?;
        let maps = self.maps()?;
        Ok(match t {
            TableRef::Import(id) => maps.import_index[id.index() as usize],
            TableRef::Def(id) => maps.table_imports + id.index(),
        })
    }

    fn element_index(&self, id: ElementId) -> Result<u32> {
        self.module.element(id)?;
        Ok(id.index())
    }

    fn data_index(&self, id: DataId) -> Result<u32> {
        self.module.data_segment(id)?;
        Ok(id.index())
    }

    // Sections ----------------------------------------------------------------

    fn encode_type_section(&self, buf: &mut Vec<u8>) -> Result<()> {
        let maps = self.maps()?;
        write_vu32(buf, maps.type_order.len() as u32);
        for &i in &maps.type_order {
            let ty = &self.module.types()[i as usize];
            buf.push(crate::wire::TYPE_FUNC);
            write_vu32(buf, ty.params().len() as u32);
            for p in ty.params() {
                buf.push(p.to_byte());
            }
            write_vu32(buf, ty.results().len() as u32);
            for r in ty.results() {
                buf.push(r.to_byte());
            }
        }
        Ok(())
    }

    fn encode_import_section(&self, buf: &mut Vec<u8>) -> Result<()> {
        write_vu32(buf, self.module.imports().len() as u32);
        for import in self.module.imports() {
            write_name(buf, &import.module);
            write_name(buf, &import.name);
            match import.kind {
                ImportKind::Function(ty) => {
                    buf.push(crate::wire::DESC_FUNC);
                    write_vu32(buf, self.type_index(ty)?);
                }
                ImportKind::Table { ref_type, limits } => {
                    buf.push(crate::wire::DESC_TABLE);
                    buf.push(ref_type.to_byte());
                    emit_limits(buf, limits);
                }
                ImportKind::Memory(limits) => {
                    buf.push(crate::wire::DESC_MEMORY);
                    emit_limits(buf, limits);
                }
                ImportKind::Global { ty, mutable } => {
                    buf.push(crate::wire::DESC_GLOBAL);
                    buf.push(ty.to_byte());
                    buf.push(mutable as u8);
                }
            }
        }
        Ok(())
    }

    fn encode_function_section(&self, buf: &mut Vec<u8>) -> Result<()> {
        write_vu32(buf, self.module.functions().len() as u32);
        for func in self.module.functions() {
            write_vu32(buf, self.type_index(func.type_id())?);
        }
        Ok(())
    }

    fn encode_table_section(&self, buf: &mut Vec<u8>) {
        write_vu32(buf, self.module.tables().len() as u32);
        for table in self.module.tables() {
            buf.push(table.ref_type.to_byte());
            emit_limits(buf, table.limits);
        }
    }

    fn encode_memory_section(&self, buf: &mut Vec<u8>) {
        write_vu32(buf, self.module.memories().len() as u32);
        for memory in self.module.memories() {
            emit_limits(buf, memory.limits);
        }
    }

    fn encode_global_section(&self, buf: &mut Vec<u8>) -> Result<()> {
        write_vu32(buf, self.module.globals().len() as u32);
        for global in self.module.globals() {
            buf.push(global.ty.to_byte());
            buf.push(global.mutable as u8);
            self.write_expression(buf, &global.init, None)?;
        }
        Ok(())
    }

    fn encode_export_section(&self, buf: &mut Vec<u8>) -> Result<()> {
        write_vu32(buf, self.module.exports().len() as u32);
        for export in self.module.exports() {
            write_name(buf, &export.name);
            match export.kind {
                ExportKind::Function(f) => {
                    buf.push(crate::wire::DESC_FUNC);
                    write_vu32(buf, self.func_index(f)?);
                }
                ExportKind::Table(t) => {
                    buf.push(crate::wire::DESC_TABLE);
                    write_vu32(buf, self.table_index(t)?);
                }
                ExportKind::Memory(m) => {
                    buf.push(crate::wire::DESC_MEMORY);
                    write_vu32(buf, self.memory_index(m)?);
                }
                ExportKind::Global(g) => {
                    buf.push(crate::wire::DESC_GLOBAL);
                    write_vu32(buf, self.global_index(g)?);
                }
            }
        }
        Ok(())
    }

    fn encode_element_section(&self, buf: &mut Vec<u8>) -> Result<()> {
        write_vu32(buf, self.module.elements().len() as u32);
        for element in self.module.elements() {
            match (&element.content, &element.mode) {
                (ElementContent::Funcs(funcs), ElementMode::Active { table, offset }) => {
                    let table_index = self.table_index(*table)?;
                    if table_index == 0 {
                        write_vu32(buf, crate::wire::ELEM_ACTIVE_FUNCS);
                        self.write_expression(buf, offset, None)?;
                    } else {
                        write_vu32(buf, crate::wire::ELEM_ACTIVE_TABLE_FUNCS);
                        write_vu32(buf, table_index);
                        self.write_expression(buf, offset, None)?;
                        buf.push(crate::wire::ELEMKIND_FUNCREF);
                    }
                    self.write_func_vec(buf, funcs)?;
                }
                (ElementContent::Funcs(funcs), ElementMode::Passive) => {
                    write_vu32(buf, crate::wire::ELEM_PASSIVE_FUNCS);
                    buf.push(crate::wire::ELEMKIND_FUNCREF);
                    self.write_func_vec(buf, funcs)?;
                }
                (ElementContent::Funcs(funcs), ElementMode::Declarative) => {
                    write_vu32(buf, crate::wire::ELEM_DECLARATIVE_FUNCS);
                    buf.push(crate::wire::ELEMKIND_FUNCREF);
                    self.write_func_vec(buf, funcs)?;
                }
                (
                    ElementContent::Exprs { ref_type, exprs },
                    ElementMode::Active { table, offset },
                ) => {
                    let table_index = self.table_index(*table)?;
                    // The compact expression form implies funcref on table 0.
                    if table_index == 0 && *ref_type == RefType::FuncRef {
                        write_vu32(buf, crate::wire::ELEM_ACTIVE_EXPRS);
                        self.write_expression(buf, offset, None)?;
                    } else {
                        write_vu32(buf, crate::wire::ELEM_ACTIVE_TABLE_EXPRS);
                        write_vu32(buf, table_index);
                        self.write_expression(buf, offset, None)?;
                        buf.push(ref_type.to_byte());
                    }
                    self.write_expr_vec(buf, exprs)?;
                }
                (ElementContent::Exprs { ref_type, exprs }, ElementMode::Passive) => {
                    write_vu32(buf, crate::wire::ELEM_PASSIVE_EXPRS);
                    buf.push(ref_type.to_byte());
                    self.write_expr_vec(buf, exprs)?;
                }
                (ElementContent::Exprs { ref_type, exprs }, ElementMode::Declarative) => {
                    write_vu32(buf, crate::wire::ELEM_DECLARATIVE_EXPRS);
                    buf.push(ref_type.to_byte());
                    self.write_expr_vec(buf, exprs)?;
                }
            }
        }
        Ok(())
    }

    fn write_func_vec(&self, buf: &mut Vec<u8>, funcs: &[FuncRef]) -> Result<()> {
        write_vu32(buf, funcs.len() as u32);
        for f in funcs {
            write_vu32(buf, self.func_index(*f)?);
        }
        Ok(())
    }

    fn write_expr_vec(&self, buf: &mut Vec<u8>, exprs: &[Expression]) -> Result<()> {
        write_vu32(buf, exprs.len() as u32);
        for e in exprs {
            self.write_expression(buf, e, None)?;
        }
        Ok(())
    }

    fn encode_code_section(&self, buf: &mut Vec<u8>) -> Result<()> {
        write_vu32(buf, self.module.functions().len() as u32);
        let mut body = Vec::new();
        for func in self.module.functions() {
            body.clear();
            // Local declarations: (count, kind) runs over consecutive equal
            // kinds.
            let mut runs: Vec<(u32, ValType)> = Vec::new();
            for &kind in func.locals() {
                match runs.last_mut() {
                    Some((count, k)) if *k == kind => *count += 1,
                    _ => runs.push((1, kind)),
                }
            }
            write_vu32(&mut body, runs.len() as u32);
            for (count, kind) in &runs {
                write_vu32(&mut body, *count);
                body.push(kind.to_byte());
            }
            self.write_expression(&mut body, &func.body, Some(func))?;
            write_vu32(buf, body.len() as u32);
            buf.extend_from_slice(&body);
        }
        Ok(())
    }

    fn encode_data_section(&self, buf: &mut Vec<u8>) -> Result<()> {
        write_vu32(buf, self.module.data().len() as u32);
        for segment in self.module.data() {
            match &segment.mode {
                DataMode::Active { memory, offset } => {
                    let memory_index = self.memory_index(*memory)?;
                    if memory_index == 0 {
                        write_vu32(buf, crate::wire::DATA_ACTIVE);
                    } else {
                        write_vu32(buf, crate::wire::DATA_ACTIVE_EXPLICIT);
                        write_vu32(buf, memory_index);
                    }
                    self.write_expression(buf, offset, None)?;
                }
                DataMode::Passive => {
                    write_vu32(buf, crate::wire::DATA_PASSIVE);
                }
            }
            write_u8vec(buf, &segment.bytes);
        }
        Ok(())
    }

    fn write_custom_sections(&self, buf: &mut Vec<u8>, position: CustomSectionPosition) {
        let mut contents = Vec::new();
        for section in self.module.custom_sections(position) {
            contents.clear();
            write_name(&mut contents, &section.name);
            contents.extend_from_slice(&section.bytes);
            emit_section(buf, crate::wire::SECTION_CUSTOM, &contents);
        }
    }

    // Expressions -------------------------------------------------------------

    /// Writes the instructions of `expr` followed by `end`. `func` supplies
    /// the local index space for bodies; initializers pass `None`.
    fn write_expression(
        &self,
        buf: &mut Vec<u8>,
        expr: &Expression,
        func: Option<&FunctionDef>,
    ) -> Result<()> {
        for instr in &expr.instructions {
            self.write_instruction(buf, instr, func)?;
        }
        buf.push(crate::wire::OP_END);
        Ok(())
    }

    fn write_block_type(&self, buf: &mut Vec<u8>, block_type: BlockType) {
        buf.push(match block_type {
            Some(vt) => vt.to_byte(),
            None => crate::wire::BLOCK_TYPE_EMPTY,
        });
    }

    fn write_instruction(
        &self,
        buf: &mut Vec<u8>,
        instr: &Instruction,
        func: Option<&FunctionDef>,
    ) -> Result<()> {
        if !instr.args_match_payload() {
            return Err(StateError::PayloadMismatch {
                mnemonic: instr.opcode.mnemonic,
            }
            .into());
        }
        buf.push(instr.opcode.primary);
        if let Some(secondary) = instr.opcode.secondary {
            write_vu32(buf, secondary);
        }
        match &instr.args {
            InstrArgs::None => {}
            InstrArgs::Block { block_type, body } => {
                self.write_block_type(buf, *block_type);
                self.write_expression(buf, body, func)?;
            }
            InstrArgs::IfElse {
                block_type,
                consequent,
                alternate,
            } => {
                self.write_block_type(buf, *block_type);
                for i in &consequent.instructions {
                    self.write_instruction(buf, i, func)?;
                }
                if let Some(alternate) = alternate {
                    buf.push(crate::wire::OP_ELSE);
                    for i in &alternate.instructions {
                        self.write_instruction(buf, i, func)?;
                    }
                }
                buf.push(crate::wire::OP_END);
            }
            InstrArgs::Label(label) => write_vu32(buf, *label),
            InstrArgs::BrTable { labels, default } => {
                write_vu32(buf, labels.len() as u32);
                for label in labels {
                    write_vu32(buf, *label);
                }
                write_vu32(buf, *default);
            }
            InstrArgs::Func(f) => write_vu32(buf, self.func_index(*f)?),
            InstrArgs::CallIndirect { ty, table } => {
                write_vu32(buf, self.type_index(*ty)?);
                write_vu32(buf, self.table_index(*table)?);
            }
            InstrArgs::HeapType(rt) => buf.push(rt.to_byte()),
            InstrArgs::TypeVec(types) => {
                write_vu32(buf, types.len() as u32);
                for t in types {
                    buf.push(t.to_byte());
                }
            }
            InstrArgs::Local(local) => self.write_local_index(buf, local, func)?,
            InstrArgs::Global(g) => write_vu32(buf, self.global_index(*g)?),
            InstrArgs::Table(t) => write_vu32(buf, self.table_index(*t)?),
            InstrArgs::ElemTable { elem, table } => {
                write_vu32(buf, self.element_index(*elem)?);
                write_vu32(buf, self.table_index(*table)?);
            }
            InstrArgs::Elem(e) => write_vu32(buf, self.element_index(*e)?),
            InstrArgs::TableCopy { dst, src } => {
                write_vu32(buf, self.table_index(*dst)?);
                write_vu32(buf, self.table_index(*src)?);
            }
            InstrArgs::MemArg(m) => emit_memarg(buf, *m),
            InstrArgs::Memory(m) => write_vu32(buf, self.memory_index(*m)?),
            InstrArgs::DataMem { data, memory } => {
                write_vu32(buf, self.data_index(*data)?);
                write_vu32(buf, self.memory_index(*memory)?);
            }
            InstrArgs::Data(d) => write_vu32(buf, self.data_index(*d)?),
            InstrArgs::MemoryCopy { dst, src } => {
                write_vu32(buf, self.memory_index(*dst)?);
                write_vu32(buf, self.memory_index(*src)?);
            }
            InstrArgs::I32(v) => write_vs32(buf, *v),
            InstrArgs::I64(v) => write_vs64(buf, *v),
            InstrArgs::F32(v) => write_f32(buf, *v),
            InstrArgs::F64(v) => write_f64(buf, *v),
            InstrArgs::Bytes16(bytes) => buf.extend_from_slice(bytes),
            InstrArgs::Lane(lane) => buf.push(*lane),
            InstrArgs::MemArgLane { memarg, lane } => {
                emit_memarg(buf, *memarg);
                buf.push(*lane);
            }
        }
        Ok(())
    }

    /// Resolves a local operand to its wire index. Parameter handles resolve
    /// through the function's type; local-variable handles are offset by the
    /// parameter count.
    fn write_local_index(
        &self,
        buf: &mut Vec<u8>,
        local: &Local,
        func: Option<&FunctionDef>,
    ) -> Result<()> {
        let index = match local {
            Local::Index(n) => *n,
            Local::Param(r) => {
                let func = func.ok_or(StateError::LocalOutsideFunction)?;
                self.module.type_def(func.type_id())?.resolve_param(*r)?
            }
            Local::Var(r) => {
                let func = func.ok_or(StateError::LocalOutsideFunction)?;
                let params = self.module.type_def(func.type_id())?.params().len() as u32;
                params + func.resolve_local(*r)?
            }
        };
        write_vu32(buf, index);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Section plumbing
// ---------------------------------------------------------------------------

/// Emits a section: id byte, vu32 byte length, contents.
fn emit_section(buf: &mut Vec<u8>, id: u8, contents: &[u8]) {
    buf.push(id);
    write_vu32(buf, contents.len() as u32);
    buf.extend_from_slice(contents);
}

/// Emits limits: flag byte, minimum, optional maximum.
fn emit_limits(buf: &mut Vec<u8>, limits: Limits) {
    match limits.max {
        Some(max) => {
            buf.push(crate::wire::LIMITS_MIN_MAX);
            write_vu32(buf, limits.min);
            write_vu32(buf, max);
        }
        None => {
            buf.push(crate::wire::LIMITS_MIN);
            write_vu32(buf, limits.min);
        }
    }
}

/// Emits a memory access immediate: alignment exponent, then offset.
fn emit_memarg(buf: &mut Vec<u8>, memarg: MemArg) {
    write_vu32(buf, memarg.align);
    write_vu32(buf, memarg.offset);
}
