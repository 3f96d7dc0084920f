//! Decodes WebAssembly binary format (`.wasm`) into a [`Module`].
//!
//! Sections are consumed by a sequential cursor over the fixed wire order,
//! with custom sections accepted at every anchor position. Wire indices are
//! resolved import-first: an index below the per-kind import count names an
//! import, anything above names a definition. Every section's declared byte
//! length is checked against the bytes actually consumed.

use crate::error::{FormatError, IndexError, IndexSpace, Result, StateError};
use crate::expr::{Expression, InstrArgs, Instruction, Local, MemArg};
use crate::module::{
    DataId, DataMode, DataSegment, Element, ElementContent, ElementId, ElementMode, Export,
    ExportKind, FuncId, FuncRef, GlobalId, GlobalRef, ImportId, MemRef, MemoryId, Module, TableId,
    TableRef, TypeId,
};
use crate::opcode::{lookup_primary, lookup_secondary, Opcode, Payload, PrimaryLookup};
use crate::reader::Reader;
use crate::types::{BlockType, CustomSectionPosition, Limits, RefType, ValType};

/// Decodes a module from bytes.
pub fn read_module(bytes: &[u8]) -> Result<Module> {
    ModuleReader::new(bytes).read()
}

struct ModuleReader<'a> {
    r: Reader<'a>,
    module: Module,
    func_imports: Vec<ImportId>,
    global_imports: Vec<ImportId>,
    memory_imports: Vec<ImportId>,
    table_imports: Vec<ImportId>,
    data_count: Option<u32>,
}

macro_rules! standard_section {
    ($self:ident, $next:ident, $id:expr, $handler:ident, $position:ident) => {
        if $next == Some($id) {
            $self.read_standard_section($id, Self::$handler)?;
            $next = $self.peek_section()?;
        }
        $next = $self.read_custom_sections($next, CustomSectionPosition::$position)?;
    };
}

impl<'a> ModuleReader<'a> {
    fn new(bytes: &'a [u8]) -> ModuleReader<'a> {
        ModuleReader {
            r: Reader::new(bytes),
            module: Module::new(),
            func_imports: Vec::new(),
            global_imports: Vec::new(),
            memory_imports: Vec::new(),
            table_imports: Vec::new(),
            data_count: None,
        }
    }

    fn read(mut self) -> Result<Module> {
        let magic = self.r.read_u32()?;
        if magic.to_le_bytes() != crate::wire::MAGIC {
            return Err(FormatError::BadMagic { found: magic }.into());
        }
        let version = self.r.read_u32()?;
        if version != crate::wire::VERSION {
            return Err(FormatError::BadVersion { found: version }.into());
        }

        let mut next = self.peek_section()?;
        next = self.read_custom_sections(next, CustomSectionPosition::AfterHeader)?;
        standard_section!(self, next, crate::wire::SECTION_TYPE, read_type_section, AfterType);
        standard_section!(self, next, crate::wire::SECTION_IMPORT, read_import_section, AfterImport);
        standard_section!(
            self,
            next,
            crate::wire::SECTION_FUNCTION,
            read_function_section,
            AfterFunction
        );
        standard_section!(self, next, crate::wire::SECTION_TABLE, read_table_section, AfterTable);
        standard_section!(self, next, crate::wire::SECTION_MEMORY, read_memory_section, AfterMemory);
        standard_section!(self, next, crate::wire::SECTION_GLOBAL, read_global_section, AfterGlobal);
        standard_section!(self, next, crate::wire::SECTION_EXPORT, read_export_section, AfterExport);
        standard_section!(self, next, crate::wire::SECTION_START, read_start_section, AfterStart);
        standard_section!(
            self,
            next,
            crate::wire::SECTION_ELEMENT,
            read_element_section,
            AfterElement
        );
        standard_section!(
            self,
            next,
            crate::wire::SECTION_DATA_COUNT,
            read_data_count_section,
            AfterDataCount
        );
        standard_section!(self, next, crate::wire::SECTION_CODE, read_code_section, AfterCode);
        standard_section!(self, next, crate::wire::SECTION_DATA, read_data_section, AfterData);

        if let Some(id) = next {
            return Err(FormatError::UnexpectedSection {
                id,
                offset: self.r.pos() - 1,
            }
            .into());
        }

        if let Some(declared) = self.data_count {
            let found = self.module.data().len();
            if found != declared as usize {
                return Err(FormatError::DataCountMismatch {
                    declared: declared as usize,
                    found,
                }
                .into());
            }
        }

        Ok(self.module)
    }

    // Section plumbing --------------------------------------------------------

    /// The next section id, or `None` at end of input.
    fn peek_section(&mut self) -> Result<Option<u8>> {
        if self.r.remaining() == 0 {
            Ok(None)
        } else {
            Ok(Some(self.r.read_u8()?))
        }
    }

    /// Reads one standard section payload, checking its declared length.
    fn read_standard_section(
        &mut self,
        id: u8,
        handler: impl FnOnce(&mut Self) -> Result<()>,
    ) -> Result<()> {
        let declared = self.r.read_vu32()? as usize;
        let start = self.r.pos();
        handler(self)?;
        let consumed = self.r.pos() - start;
        if consumed != declared {
            return Err(FormatError::SectionLengthMismatch { id, declared, consumed }.into());
        }
        Ok(())
    }

    /// Reads every custom section at the cursor, recording them at
    /// `position`. Returns the id of the first non-custom section.
    fn read_custom_sections(
        &mut self,
        mut next: Option<u8>,
        position: CustomSectionPosition,
    ) -> Result<Option<u8>> {
        while next == Some(crate::wire::SECTION_CUSTOM) {
            let declared = self.r.read_vu32()? as usize;
            let start = self.r.pos();
            let name = self.r.read_name()?;
            let consumed = self.r.pos() - start;
            if consumed > declared {
                return Err(FormatError::SectionLengthMismatch {
                    id: crate::wire::SECTION_CUSTOM,
                    declared,
                    consumed,
                }
                .into());
            }
            let bytes = self.r.read_bytes(declared - consumed)?.to_vec();
            self.module
                .create_custom_section(position, &name, bytes);
            next = self.peek_section()?;
        }
        Ok(next)
    }

    // Standard sections -------------------------------------------------------

    fn read_type_section(&mut self) -> Result<()> {
        let count = self.r.read_vu32()?;
        for _ in 0..count {
            let tag = self.r.read_u8()?;
            if tag != crate::wire::TYPE_FUNC {
                return Err(FormatError::BadTypeTag { found: tag }.into());
            }
            let params = self.read_val_types()?;
            let results = self.read_val_types()?;
            self.module.create_type(params, results);
        }
        Ok(())
    }

    fn read_import_section(&mut self) -> Result<()> {
        let count = self.r.read_vu32()?;
        for _ in 0..count {
            let module_name = self.r.read_name()?;
            let name = self.r.read_name()?;
            let desc = self.r.read_u8()?;
            match desc {
                crate::wire::DESC_FUNC => {
                    let ty = self.read_type_index()?;
                    let func = self.module.import_function(&module_name, &name, ty)?;
                    if let FuncRef::Import(id) = func {
                        self.func_imports.push(id);
                    }
                }
                crate::wire::DESC_TABLE => {
                    let ref_type = RefType::from_byte(self.r.read_u8()?)?;
                    let limits = self.read_limits()?;
                    let table =
                        self.module
                            .import_table(&module_name, &name, ref_type, limits.min, limits.max);
                    if let TableRef::Import(id) = table {
                        self.table_imports.push(id);
                    }
                }
                crate::wire::DESC_MEMORY => {
                    let limits = self.read_limits()?;
                    let memory =
                        self.module
                            .import_memory(&module_name, &name, limits.min, limits.max);
                    if let MemRef::Import(id) = memory {
                        self.memory_imports.push(id);
                    }
                }
                crate::wire::DESC_GLOBAL => {
                    let ty = ValType::from_byte(self.r.read_u8()?)?;
                    let mutable = self.r.read_u8()? != 0;
                    let global = self.module.import_global(&module_name, &name, ty, mutable);
                    if let GlobalRef::Import(id) = global {
                        self.global_imports.push(id);
                    }
                }
                _ => return Err(FormatError::BadDescKind { found: desc }.into()),
            }
        }
        Ok(())
    }

    fn read_function_section(&mut self) -> Result<()> {
        let count = self.r.read_vu32()?;
        for _ in 0..count {
            let ty = self.read_type_index()?;
            // Locals and body arrive with the code section.
            self.module.create_function(ty, Vec::new(), Expression::new())?;
        }
        Ok(())
    }

    fn read_table_section(&mut self) -> Result<()> {
        let count = self.r.read_vu32()?;
        for _ in 0..count {
            let ref_type = RefType::from_byte(self.r.read_u8()?)?;
            let limits = self.read_limits()?;
            self.module.create_table(ref_type, limits.min, limits.max);
        }
        Ok(())
    }

    fn read_memory_section(&mut self) -> Result<()> {
        let count = self.r.read_vu32()?;
        for _ in 0..count {
            let limits = self.read_limits()?;
            self.module.create_memory(limits.min, limits.max);
        }
        Ok(())
    }

    fn read_global_section(&mut self) -> Result<()> {
        let count = self.r.read_vu32()?;
        for _ in 0..count {
            let ty = ValType::from_byte(self.r.read_u8()?)?;
            let mutable = self.r.read_u8()? != 0;
            let (init, _) = self.read_expression()?;
            self.module.create_global(ty, mutable, init);
        }
        Ok(())
    }

    fn read_export_section(&mut self) -> Result<()> {
        let count = self.r.read_vu32()?;
        for _ in 0..count {
            let name = self.r.read_name()?;
            let desc = self.r.read_u8()?;
            let kind = match desc {
                crate::wire::DESC_FUNC => ExportKind::Function(self.read_func_index(true)?),
                crate::wire::DESC_TABLE => ExportKind::Table(self.read_table_index(true)?),
                crate::wire::DESC_MEMORY => ExportKind::Memory(self.read_memory_index(true)?),
                crate::wire::DESC_GLOBAL => ExportKind::Global(self.read_global_index(true)?),
                _ => return Err(FormatError::BadDescKind { found: desc }.into()),
            };
            self.module.push_decoded_export(Export { name, kind });
        }
        Ok(())
    }

    fn read_start_section(&mut self) -> Result<()> {
        let func = self.read_func_index(true)?;
        self.module.set_start(Some(func))
    }

    fn read_element_section(&mut self) -> Result<()> {
        let count = self.r.read_vu32()?;
        for _ in 0..count {
            let flags = self.r.read_vu32()?;
            let element = match flags {
                crate::wire::ELEM_ACTIVE_FUNCS => {
                    let (offset, _) = self.read_expression()?;
                    Element {
                        content: ElementContent::Funcs(self.read_func_vec()?),
                        mode: ElementMode::Active {
                            table: self.table_ref_zero()?,
                            offset,
                        },
                    }
                }
                crate::wire::ELEM_PASSIVE_FUNCS => {
                    self.read_elemkind()?;
                    Element {
                        content: ElementContent::Funcs(self.read_func_vec()?),
                        mode: ElementMode::Passive,
                    }
                }
                crate::wire::ELEM_ACTIVE_TABLE_FUNCS => {
                    let table = self.read_table_index(false)?;
                    let (offset, _) = self.read_expression()?;
                    self.read_elemkind()?;
                    Element {
                        content: ElementContent::Funcs(self.read_func_vec()?),
                        mode: ElementMode::Active { table, offset },
                    }
                }
                crate::wire::ELEM_DECLARATIVE_FUNCS => {
                    self.read_elemkind()?;
                    Element {
                        content: ElementContent::Funcs(self.read_func_vec()?),
                        mode: ElementMode::Declarative,
                    }
                }
                crate::wire::ELEM_ACTIVE_EXPRS => {
                    let (offset, _) = self.read_expression()?;
                    Element {
                        content: ElementContent::Exprs {
                            ref_type: RefType::FuncRef,
                            exprs: self.read_expr_vec()?,
                        },
                        mode: ElementMode::Active {
                            table: self.table_ref_zero()?,
                            offset,
                        },
                    }
                }
                crate::wire::ELEM_PASSIVE_EXPRS => {
                    let ref_type = RefType::from_byte(self.r.read_u8()?)?;
                    Element {
                        content: ElementContent::Exprs {
                            ref_type,
                            exprs: self.read_expr_vec()?,
                        },
                        mode: ElementMode::Passive,
                    }
                }
                crate::wire::ELEM_ACTIVE_TABLE_EXPRS => {
                    let table = self.read_table_index(false)?;
                    let (offset, _) = self.read_expression()?;
                    let ref_type = RefType::from_byte(self.r.read_u8()?)?;
                    Element {
                        content: ElementContent::Exprs {
                            ref_type,
                            exprs: self.read_expr_vec()?,
                        },
                        mode: ElementMode::Active { table, offset },
                    }
                }
                crate::wire::ELEM_DECLARATIVE_EXPRS => {
                    let ref_type = RefType::from_byte(self.r.read_u8()?)?;
                    Element {
                        content: ElementContent::Exprs {
                            ref_type,
                            exprs: self.read_expr_vec()?,
                        },
                        mode: ElementMode::Declarative,
                    }
                }
                _ => return Err(FormatError::BadElementFlags { flags }.into()),
            };
            self.module.push_decoded_element(element);
        }
        Ok(())
    }

    fn read_data_count_section(&mut self) -> Result<()> {
        self.data_count = Some(self.r.read_vu32()?);
        Ok(())
    }

    fn read_code_section(&mut self) -> Result<()> {
        let count = self.r.read_vu32()? as usize;
        let expected = self.module.functions().len();
        if count != expected {
            return Err(FormatError::CodeCountMismatch { expected, found: count }.into());
        }
        for i in 0..count {
            let declared = self.r.read_vu32()? as usize;
            let start = self.r.pos();
            let mut locals = Vec::new();
            let runs = self.r.read_vu32()?;
            for _ in 0..runs {
                let n = self.r.read_vu32()?;
                let kind = ValType::from_byte(self.r.read_u8()?)?;
                locals.extend(std::iter::repeat(kind).take(n as usize));
            }
            let (body, _) = self.read_expression()?;
            let consumed = self.r.pos() - start;
            if consumed != declared {
                return Err(FormatError::CodeSizeMismatch { declared, consumed }.into());
            }
            let func = self.module.func_mut(FuncId(i as u32))?;
            func.splice_locals(0, 0, &locals)?;
            func.body = body;
        }
        Ok(())
    }

    fn read_data_section(&mut self) -> Result<()> {
        let count = self.r.read_vu32()?;
        for _ in 0..count {
            let flags = self.r.read_vu32()?;
            let segment = match flags {
                crate::wire::DATA_ACTIVE => {
                    let (offset, _) = self.read_expression()?;
                    DataSegment {
                        mode: DataMode::Active {
                            memory: self.memory_ref_zero()?,
                            offset,
                        },
                        bytes: self.r.read_u8vec()?,
                    }
                }
                crate::wire::DATA_PASSIVE => DataSegment {
                    mode: DataMode::Passive,
                    bytes: self.r.read_u8vec()?,
                },
                crate::wire::DATA_ACTIVE_EXPLICIT => {
                    let memory = self.read_memory_index(false)?;
                    let (offset, _) = self.read_expression()?;
                    DataSegment {
                        mode: DataMode::Active { memory, offset },
                        bytes: self.r.read_u8vec()?,
                    }
                }
                _ => return Err(FormatError::BadDataFlags { flags }.into()),
            };
            self.module.push_decoded_data(segment);
        }
        Ok(())
    }

    // Shared pieces -----------------------------------------------------------

    fn read_val_types(&mut self) -> Result<Vec<ValType>> {
        let count = self.r.read_vu32()?;
        let mut types = Vec::with_capacity(count as usize);
        for _ in 0..count {
            types.push(ValType::from_byte(self.r.read_u8()?)?);
        }
        Ok(types)
    }

    fn read_limits(&mut self) -> Result<Limits> {
        let flag = self.r.read_u8()?;
        match flag {
            crate::wire::LIMITS_MIN => Ok(Limits::new(self.r.read_vu32()?, None)),
            crate::wire::LIMITS_MIN_MAX => {
                let min = self.r.read_vu32()?;
                let max = self.r.read_vu32()?;
                Ok(Limits::new(min, Some(max)))
            }
            _ => Err(FormatError::BadLimitsFlag { found: flag }.into()),
        }
    }

    fn read_elemkind(&mut self) -> Result<()> {
        let kind = self.r.read_u8()?;
        if kind != crate::wire::ELEMKIND_FUNCREF {
            return Err(FormatError::BadRefType { found: kind }.into());
        }
        Ok(())
    }

    fn read_func_vec(&mut self) -> Result<Vec<FuncRef>> {
        let count = self.r.read_vu32()?;
        let mut funcs = Vec::with_capacity(count as usize);
        for _ in 0..count {
            funcs.push(self.read_func_index(false)?);
        }
        Ok(funcs)
    }

    fn read_expr_vec(&mut self) -> Result<Vec<Expression>> {
        let count = self.r.read_vu32()?;
        let mut exprs = Vec::with_capacity(count as usize);
        for _ in 0..count {
            exprs.push(self.read_expression()?.0);
        }
        Ok(exprs)
    }

    // Index spaces ------------------------------------------------------------

    fn read_type_index(&mut self) -> Result<TypeId> {
        let index = self.r.read_vu32()?;
        if (index as usize) >= self.module.types().len() {
            return Err(IndexError::OutOfRange {
                space: IndexSpace::Type,
                index,
            }
            .into());
        }
        Ok(TypeId(index))
    }

    fn read_func_index(&mut self, reject_imports: bool) -> Result<FuncRef> {
        let index = self.r.read_vu32()?;
        let imports = self.func_imports.len() as u32;
        if index < imports {
            if reject_imports {
                return Err(IndexError::ImportNotAllowed {
                    space: IndexSpace::Function,
                    index,
                }
                .into());
            }
            return Ok(FuncRef::Import(self.func_imports[index as usize]));
        }
        let def = index - imports;
        if (def as usize) >= self.module.functions().len() {
            return Err(IndexError::OutOfRange {
                space: IndexSpace::Function,
                index,
            }
            .into());
        }
        Ok(FuncRef::Def(FuncId(def)))
    }

    fn read_global_index(&mut self, reject_imports: bool) -> Result<GlobalRef> {
        let index = self.r.read_vu32()?;
        let imports = self.global_imports.len() as u32;
        if index < imports {
            if reject_imports {
                return Err(IndexError::ImportNotAllowed {
                    space: IndexSpace::Global,
                    index,
                }
                .into());
            }
            return Ok(GlobalRef::Import(self.global_imports[index as usize]));
        }
        let def = index - imports;
        if (def as usize) >= self.module.globals().len() {
            return Err(IndexError::OutOfRange {
                space: IndexSpace::Global,
                index,
            }
            .into());
        }
        Ok(GlobalRef::Def(GlobalId(def)))
    }

    fn read_memory_index(&mut self, reject_imports: bool) -> Result<MemRef> {
        let index = self.r.read_vu32()?;
        let imports = self.memory_imports.len() as u32;
        if index < imports {
            if reject_imports {
                return Err(IndexError::ImportNotAllowed {
                    space: IndexSpace::Memory,
                    index,
                }
                .into());
            }
            return Ok(MemRef::Import(self.memory_imports[index as usize]));
        }
        let def = index - imports;
        if (def as usize) >= self.module.memories().len() {
            return Err(IndexError::OutOfRange {
                space: IndexSpace::Memory,
                index,
            }
            .into());
        }
        Ok(MemRef::Def(MemoryId(def)))
    }

    fn read_table_index(&mut self, reject_imports: bool) -> Result<TableRef> {
        let index = self.r.read_vu32()?;
        let imports = self.table_imports.len() as u32;
        if index < imports {
            if reject_imports {
                return Err(IndexError::ImportNotAllowed {
                    space: IndexSpace::Table,
                    index,
                }
                .into());
            }
            return Ok(TableRef::Import(self.table_imports[index as usize]));
        }
        let def = index - imports;
        if (def as usize) >= self.module.tables().len() {
            return Err(IndexError::OutOfRange {
                space: IndexSpace::Table,
                index,
            }
            .into());
        }
        Ok(TableRef::Def(TableId(def)))
    }

    fn read_element_index(&mut self) -> Result<ElementId> {
        let index = self.r.read_vu32()?;
        if (index as usize) >= self.module.elements().len() {
            return Err(IndexError::OutOfRange {
                space: IndexSpace::Element,
                index,
            }
            .into());
        }
        Ok(ElementId(index))
    }

    fn read_data_index(&mut self) -> Result<DataId> {
        let index = self.r.read_vu32()?;
        match self.data_count {
            None => Err(StateError::DataIndexesUnregistered.into()),
            Some(count) if index >= count => Err(IndexError::OutOfRange {
                space: IndexSpace::Data,
                index,
            }
            .into()),
            Some(_) => Ok(DataId(index)),
        }
    }

    /// The implied table 0 of the compact element forms.
    fn table_ref_zero(&self) -> Result<TableRef> {
        if let Some(&id) = self.table_imports.first() {
            Ok(TableRef::Import(id))
        } else if !self.module.tables().is_empty() {
            Ok(TableRef::Def(TableId(0)))
        } else {
            Err(IndexError::OutOfRange {
                space: IndexSpace::Table,
                index: 0,
            }
            .into())
        }
    }

    /// The implied memory 0 of the compact data form.
    fn memory_ref_zero(&self) -> Result<MemRef> {
        if let Some(&id) = self.memory_imports.first() {
            Ok(MemRef::Import(id))
        } else if !self.module.memories().is_empty() {
            Ok(MemRef::Def(MemoryId(0)))
        } else {
            Err(IndexError::OutOfRange {
                space: IndexSpace::Memory,
                index: 0,
            }
            .into())
        }
    }

    // Expressions -------------------------------------------------------------

    /// Reads instructions until a terminator (`end` or `else`), returning the
    /// expression and the terminator byte.
    fn read_expression(&mut self) -> Result<(Expression, u8)> {
        let mut expr = Expression::new();
        loop {
            let byte = self.r.read_u8()?;
            if byte == crate::wire::OP_END || byte == crate::wire::OP_ELSE {
                return Ok((expr, byte));
            }
            let opcode = match lookup_primary(byte) {
                PrimaryLookup::Unknown => {
                    return Err(FormatError::UnknownOpcode { primary: byte }.into());
                }
                PrimaryLookup::Direct(op) => op,
                PrimaryLookup::Prefixed => {
                    let secondary = self.r.read_vu32()?;
                    match lookup_secondary(byte, secondary) {
                        Some(op) => op,
                        None => {
                            return Err(FormatError::UnknownSecondaryOpcode {
                                primary: byte,
                                secondary,
                            }
                            .into());
                        }
                    }
                }
            };
            let args = self.read_instr_args(opcode)?;
            expr.push(Instruction::new(opcode, args));
        }
    }

    fn read_block_type(&mut self) -> Result<BlockType> {
        let byte = self.r.read_u8()?;
        if byte == crate::wire::BLOCK_TYPE_EMPTY {
            Ok(None)
        } else {
            Ok(Some(ValType::from_byte(byte)?))
        }
    }

    fn read_memarg(&mut self) -> Result<MemArg> {
        let align = self.r.read_vu32()?;
        let offset = self.r.read_vu32()?;
        Ok(MemArg::new(align, offset))
    }

    fn read_instr_args(&mut self, opcode: Opcode) -> Result<InstrArgs> {
        Ok(match opcode.payload {
            Payload::Simple => InstrArgs::None,
            Payload::Block => {
                let block_type = self.read_block_type()?;
                let (body, _) = self.read_expression()?;
                InstrArgs::Block { block_type, body }
            }
            Payload::IfElse => {
                let block_type = self.read_block_type()?;
                let (consequent, terminator) = self.read_expression()?;
                let alternate = if terminator == crate::wire::OP_ELSE {
                    Some(self.read_expression()?.0)
                } else {
                    None
                };
                InstrArgs::IfElse {
                    block_type,
                    consequent,
                    alternate,
                }
            }
            Payload::LabelIdx => InstrArgs::Label(self.r.read_vu32()?),
            Payload::BrTable => {
                let count = self.r.read_vu32()?;
                let mut labels = Vec::with_capacity(count as usize);
                for _ in 0..count {
                    labels.push(self.r.read_vu32()?);
                }
                InstrArgs::BrTable {
                    labels,
                    default: self.r.read_vu32()?,
                }
            }
            Payload::FuncIdx => InstrArgs::Func(self.read_func_index(false)?),
            Payload::CallIndirect => {
                let ty = self.read_type_index()?;
                let table = self.read_table_index(false)?;
                InstrArgs::CallIndirect { ty, table }
            }
            Payload::HeapType => InstrArgs::HeapType(RefType::from_byte(self.r.read_u8()?)?),
            Payload::TypeVec => InstrArgs::TypeVec(self.read_val_types()?),
            Payload::LocalIdx => InstrArgs::Local(Local::Index(self.r.read_vu32()?)),
            Payload::GlobalIdx => InstrArgs::Global(self.read_global_index(false)?),
            Payload::TableIdx => InstrArgs::Table(self.read_table_index(false)?),
            Payload::ElemTable => {
                let elem = self.read_element_index()?;
                let table = self.read_table_index(false)?;
                InstrArgs::ElemTable { elem, table }
            }
            Payload::ElemIdx => InstrArgs::Elem(self.read_element_index()?),
            Payload::TableCopy => {
                let dst = self.read_table_index(false)?;
                let src = self.read_table_index(false)?;
                InstrArgs::TableCopy { dst, src }
            }
            Payload::MemArg => InstrArgs::MemArg(self.read_memarg()?),
            Payload::MemIdx => InstrArgs::Memory(self.read_memory_index(false)?),
            Payload::DataMem => {
                let data = self.read_data_index()?;
                let memory = self.read_memory_index(false)?;
                InstrArgs::DataMem { data, memory }
            }
            Payload::DataIdx => InstrArgs::Data(self.read_data_index()?),
            Payload::MemoryCopy => {
                let dst = self.read_memory_index(false)?;
                let src = self.read_memory_index(false)?;
                InstrArgs::MemoryCopy { dst, src }
            }
            Payload::ConstI32 => InstrArgs::I32(self.r.read_vs32()?),
            Payload::ConstI64 => InstrArgs::I64(self.r.read_vs64()?),
            Payload::ConstF32 => InstrArgs::F32(self.r.read_f32()?),
            Payload::ConstF64 => InstrArgs::F64(self.r.read_f64()?),
            Payload::Bytes16 => {
                let mut bytes = [0u8; 16];
                bytes.copy_from_slice(self.r.read_bytes(16)?);
                InstrArgs::Bytes16(bytes)
            }
            Payload::LaneIdx => InstrArgs::Lane(self.r.read_u8()?),
            Payload::MemArgLane => {
                let memarg = self.read_memarg()?;
                let lane = self.r.read_u8()?;
                InstrArgs::MemArgLane { memarg, lane }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn rejects_bad_magic() {
        let err = read_module(b"0asm\x01\x00\x00\x00").unwrap_err();
        assert!(matches!(err, Error::Format(FormatError::BadMagic { .. })));
    }

    #[test]
    fn rejects_bad_version() {
        let err = read_module(b"\0asm\x02\x00\x00\x00").unwrap_err();
        assert!(matches!(
            err,
            Error::Format(FormatError::BadVersion { found: 2 })
        ));
    }

    #[test]
    fn empty_module() {
        let module = read_module(b"\0asm\x01\x00\x00\x00").unwrap();
        assert!(module.types().is_empty());
        assert!(module.functions().is_empty());
        assert!(module.start().is_none());
    }

    #[test]
    fn rejects_out_of_order_section() {
        // Function section (3) before type section (1).
        let bytes = [
            b'\0', b'a', b's', b'm', 1, 0, 0, 0, //
            3, 1, 0, // function section, empty
            1, 1, 0, // type section, empty
        ];
        let err = read_module(&bytes).unwrap_err();
        assert!(matches!(
            err,
            Error::Format(FormatError::UnexpectedSection { id: 1, .. })
        ));
    }

    #[test]
    fn rejects_section_length_mismatch() {
        // Type section claims 3 bytes but holds an empty vec (1 byte).
        let bytes = [b'\0', b'a', b's', b'm', 1, 0, 0, 0, 1, 3, 0, 0, 0];
        let err = read_module(&bytes).unwrap_err();
        assert!(matches!(
            err,
            Error::Format(FormatError::SectionLengthMismatch { id: 1, .. })
        ));
    }

    #[test]
    fn reads_custom_section_at_header() {
        // custom section: name "note", bytes [1, 2]
        let bytes = [
            b'\0', b'a', b's', b'm', 1, 0, 0, 0, //
            0, 7, 4, b'n', b'o', b't', b'e', 1, 2,
        ];
        let module = read_module(&bytes).unwrap();
        let sections = module.custom_sections(CustomSectionPosition::AfterHeader);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].name, "note");
        assert_eq!(sections[0].bytes, vec![1, 2]);
    }

    #[test]
    fn data_count_mismatch_rejected() {
        // data count declares 1 segment, data section is absent.
        let bytes = [b'\0', b'a', b's', b'm', 1, 0, 0, 0, 12, 1, 1];
        let err = read_module(&bytes).unwrap_err();
        assert!(matches!(
            err,
            Error::Format(FormatError::DataCountMismatch { declared: 1, found: 0 })
        ));
    }
}
