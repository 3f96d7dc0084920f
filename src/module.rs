//! The in-memory module representation.
//!
//! A [`Module`] is an arena: it owns dense vectors of every entity kind, and
//! entities point at each other through small copyable ids. Imported
//! functions, globals, memories, and tables live in the import list and are
//! addressed through the two-variant `*Ref` enums, so a single reference type
//! covers both halves of each index space (imports are numbered first on the
//! wire, then local definitions).

use crate::error::{IndexError, IndexSpace, ReferenceError, Result};
use crate::expr::Expression;
use crate::locals::SlotList;
use crate::types::{CustomSectionPosition, Limits, RefType, ValType};

macro_rules! id_types {
    ($( $(#[$meta:meta])* $name:ident; )*) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
            pub struct $name(pub(crate) u32);

            impl $name {
                /// Position in the owning module's vector for this kind.
                pub fn index(self) -> u32 {
                    self.0
                }
            }
        )*
    };
}

id_types! {
    /// A function type in [`Module::types`].
    TypeId;
    /// A function definition.
    FuncId;
    /// A global definition.
    GlobalId;
    /// A memory definition.
    MemoryId;
    /// A table definition.
    TableId;
    /// An element segment.
    ElementId;
    /// A data segment.
    DataId;
    /// An entry in the import list.
    ImportId;
}

/// A function: either an import or a local definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FuncRef {
    Import(ImportId),
    Def(FuncId),
}

/// A global: either an import or a local definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlobalRef {
    Import(ImportId),
    Def(GlobalId),
}

/// A memory: either an import or a local definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemRef {
    Import(ImportId),
    Def(MemoryId),
}

/// A table: either an import or a local definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableRef {
    Import(ImportId),
    Def(TableId),
}

impl From<FuncId> for FuncRef {
    fn from(id: FuncId) -> FuncRef {
        FuncRef::Def(id)
    }
}

impl From<GlobalId> for GlobalRef {
    fn from(id: GlobalId) -> GlobalRef {
        GlobalRef::Def(id)
    }
}

impl From<MemoryId> for MemRef {
    fn from(id: MemoryId) -> MemRef {
        MemRef::Def(id)
    }
}

impl From<TableId> for TableRef {
    fn from(id: TableId) -> TableRef {
        TableRef::Def(id)
    }
}

/// A stable handle to a parameter of a [`TypeDef`]. Stays valid across
/// parameter splices until its own entry is removed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamRef {
    pub(crate) owner: TypeId,
    pub(crate) slot: u32,
    kind: ValType,
}

impl ParamRef {
    pub fn kind(self) -> ValType {
        self.kind
    }
}

/// A stable handle to a local variable of a [`FunctionDef`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalVarRef {
    pub(crate) owner: FuncId,
    pub(crate) slot: u32,
    kind: ValType,
}

impl LocalVarRef {
    pub fn kind(self) -> ValType {
        self.kind
    }
}

// ---------------------------------------------------------------------------
// Entities
// ---------------------------------------------------------------------------

/// A function type: parameter and result sequences.
#[derive(Debug, Clone)]
pub struct TypeDef {
    id: TypeId,
    params: SlotList,
    results: Vec<ValType>,
}

impl TypeDef {
    fn new(id: TypeId, params: Vec<ValType>, results: Vec<ValType>) -> TypeDef {
        TypeDef {
            id,
            params: SlotList::new(IndexSpace::Param, params),
            results,
        }
    }

    pub fn params(&self) -> &[ValType] {
        self.params.kinds()
    }

    pub fn results(&self) -> &[ValType] {
        &self.results
    }

    /// Appends a parameter and returns a stable handle to it.
    pub fn add_param(&mut self, kind: ValType) -> ParamRef {
        let slot = self.params.push(kind);
        ParamRef {
            owner: self.id,
            slot,
            kind,
        }
    }

    /// Returns a stable handle to the parameter at `index`.
    pub fn param(&mut self, index: usize) -> Result<ParamRef> {
        let (slot, kind) = self.params.handle_at(index)?;
        Ok(ParamRef {
            owner: self.id,
            slot,
            kind,
        })
    }

    /// Resolves a parameter handle to its current index.
    pub fn resolve_param(&self, r: ParamRef) -> Result<u32> {
        if r.owner != self.id {
            return Err(ReferenceError::ForeignOwner {
                space: IndexSpace::Param,
            }
            .into());
        }
        Ok(self.params.resolve(r.slot)?)
    }

    /// Removes `delete_count` parameters at `start`, inserts `insert`, and
    /// returns the removed kinds. Handles of removed parameters become
    /// invalid; later handles keep tracking their parameters.
    pub fn splice_params(
        &mut self,
        start: usize,
        delete_count: usize,
        insert: &[ValType],
    ) -> Result<Vec<ValType>> {
        Ok(self.params.splice(start, delete_count, insert)?)
    }
}

/// A function definition: its type, local variables, and body.
#[derive(Debug, Clone)]
pub struct FunctionDef {
    id: FuncId,
    type_id: TypeId,
    locals: SlotList,
    pub body: Expression,
}

impl FunctionDef {
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn locals(&self) -> &[ValType] {
        self.locals.kinds()
    }

    /// Appends a local variable and returns a stable handle to it.
    pub fn add_local(&mut self, kind: ValType) -> LocalVarRef {
        let slot = self.locals.push(kind);
        LocalVarRef {
            owner: self.id,
            slot,
            kind,
        }
    }

    /// Returns a stable handle to the local variable at `index` (not
    /// counting parameters).
    pub fn local(&mut self, index: usize) -> Result<LocalVarRef> {
        let (slot, kind) = self.locals.handle_at(index)?;
        Ok(LocalVarRef {
            owner: self.id,
            slot,
            kind,
        })
    }

    /// Resolves a local-variable handle to its index among the locals (not
    /// counting parameters).
    pub fn resolve_local(&self, r: LocalVarRef) -> Result<u32> {
        if r.owner != self.id {
            return Err(ReferenceError::ForeignOwner {
                space: IndexSpace::Local,
            }
            .into());
        }
        Ok(self.locals.resolve(r.slot)?)
    }

    /// Removes `delete_count` locals at `start`, inserts `insert`, and
    /// returns the removed kinds.
    pub fn splice_locals(
        &mut self,
        start: usize,
        delete_count: usize,
        insert: &[ValType],
    ) -> Result<Vec<ValType>> {
        Ok(self.locals.splice(start, delete_count, insert)?)
    }
}

/// A global definition.
#[derive(Debug, Clone)]
pub struct GlobalDef {
    pub ty: ValType,
    pub mutable: bool,
    pub init: Expression,
}

/// A memory definition.
#[derive(Debug, Clone, Copy)]
pub struct MemoryDef {
    pub limits: Limits,
}

/// A table definition.
#[derive(Debug, Clone, Copy)]
pub struct TableDef {
    pub ref_type: RefType,
    pub limits: Limits,
}

/// What an element segment contains.
#[derive(Debug, Clone)]
pub enum ElementContent {
    /// A list of function references (funcref segments).
    Funcs(Vec<FuncRef>),
    /// Per-element constant expressions of a declared reference type.
    Exprs {
        ref_type: RefType,
        exprs: Vec<Expression>,
    },
}

/// How an element segment is applied.
#[derive(Debug, Clone)]
pub enum ElementMode {
    Active { table: TableRef, offset: Expression },
    Passive,
    Declarative,
}

/// An element segment.
#[derive(Debug, Clone)]
pub struct Element {
    pub content: ElementContent,
    pub mode: ElementMode,
}

/// How a data segment is applied.
#[derive(Debug, Clone)]
pub enum DataMode {
    Active { memory: MemRef, offset: Expression },
    Passive,
}

/// A data segment.
#[derive(Debug, Clone)]
pub struct DataSegment {
    pub mode: DataMode,
    pub bytes: Vec<u8>,
}

/// What an import provides.
#[derive(Debug, Clone, Copy)]
pub enum ImportKind {
    Function(TypeId),
    Global { ty: ValType, mutable: bool },
    Memory(Limits),
    Table { ref_type: RefType, limits: Limits },
}

/// An import: module/name pair plus the imported entity's description.
#[derive(Debug, Clone)]
pub struct Import {
    pub module: String,
    pub name: String,
    pub kind: ImportKind,
}

/// What an export exposes.
#[derive(Debug, Clone, Copy)]
pub enum ExportKind {
    Function(FuncRef),
    Table(TableRef),
    Memory(MemRef),
    Global(GlobalRef),
}

/// An export.
#[derive(Debug, Clone)]
pub struct Export {
    pub name: String,
    pub kind: ExportKind,
}

/// A custom section: an uninterpreted name/bytes pair anchored at one of the
/// thirteen positions.
#[derive(Debug, Clone)]
pub struct CustomSection {
    pub name: String,
    pub bytes: Vec<u8>,
}

// ---------------------------------------------------------------------------
// Module
// ---------------------------------------------------------------------------

/// A WebAssembly module under construction or decoded from bytes.
#[derive(Debug, Clone, Default)]
pub struct Module {
    types: Vec<TypeDef>,
    functions: Vec<FunctionDef>,
    globals: Vec<GlobalDef>,
    memories: Vec<MemoryDef>,
    tables: Vec<TableDef>,
    elements: Vec<Element>,
    data: Vec<DataSegment>,
    imports: Vec<Import>,
    exports: Vec<Export>,
    custom_sections: [Vec<CustomSection>; CustomSectionPosition::COUNT],
    start: Option<FuncRef>,
}

impl Module {
    pub fn new() -> Module {
        Module::default()
    }

    // Accessors ---------------------------------------------------------------

    pub fn types(&self) -> &[TypeDef] {
        &self.types
    }

    pub fn functions(&self) -> &[FunctionDef] {
        &self.functions
    }

    pub fn globals(&self) -> &[GlobalDef] {
        &self.globals
    }

    pub fn memories(&self) -> &[MemoryDef] {
        &self.memories
    }

    pub fn tables(&self) -> &[TableDef] {
        &self.tables
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn data(&self) -> &[DataSegment] {
        &self.data
    }

    pub fn imports(&self) -> &[Import] {
        &self.imports
    }

    pub fn exports(&self) -> &[Export] {
        &self.exports
    }

    pub fn start(&self) -> Option<FuncRef> {
        self.start
    }

    pub fn custom_sections(&self, position: CustomSectionPosition) -> &[CustomSection] {
        &self.custom_sections[position.index()]
    }

    pub fn type_def(&self, id: TypeId) -> Result<&TypeDef> {
        self.types
            .get(id.0 as usize)
            .ok_or_else(|| IndexError::NotInModule { space: IndexSpace::Type }.into())
    }

    pub fn type_def_mut(&mut self, id: TypeId) -> Result<&mut TypeDef> {
        self.types
            .get_mut(id.0 as usize)
            .ok_or_else(|| IndexError::NotInModule { space: IndexSpace::Type }.into())
    }

    pub fn func(&self, id: FuncId) -> Result<&FunctionDef> {
        self.functions
            .get(id.0 as usize)
            .ok_or_else(|| IndexError::NotInModule { space: IndexSpace::Function }.into())
    }

    pub fn func_mut(&mut self, id: FuncId) -> Result<&mut FunctionDef> {
        self.functions
            .get_mut(id.0 as usize)
            .ok_or_else(|| IndexError::NotInModule { space: IndexSpace::Function }.into())
    }

    pub fn global(&self, id: GlobalId) -> Result<&GlobalDef> {
        self.globals
            .get(id.0 as usize)
            .ok_or_else(|| IndexError::NotInModule { space: IndexSpace::Global }.into())
    }

    pub fn global_mut(&mut self, id: GlobalId) -> Result<&mut GlobalDef> {
        self.globals
            .get_mut(id.0 as usize)
            .ok_or_else(|| IndexError::NotInModule { space: IndexSpace::Global }.into())
    }

    pub fn memory(&self, id: MemoryId) -> Result<&MemoryDef> {
        self.memories
            .get(id.0 as usize)
            .ok_or_else(|| IndexError::NotInModule { space: IndexSpace::Memory }.into())
    }

    pub fn table(&self, id: TableId) -> Result<&TableDef> {
        self.tables
            .get(id.0 as usize)
            .ok_or_else(|| IndexError::NotInModule { space: IndexSpace::Table }.into())
    }

    pub fn element(&self, id: ElementId) -> Result<&Element> {
        self.elements
            .get(id.0 as usize)
            .ok_or_else(|| IndexError::NotInModule { space: IndexSpace::Element }.into())
    }

    pub fn data_segment(&self, id: DataId) -> Result<&DataSegment> {
        self.data
            .get(id.0 as usize)
            .ok_or_else(|| IndexError::NotInModule { space: IndexSpace::Data }.into())
    }

    pub fn import(&self, id: ImportId) -> Result<&Import> {
        self.imports
            .get(id.0 as usize)
            .ok_or_else(|| IndexError::NotInModule { space: IndexSpace::Import }.into())
    }

    // Factories ---------------------------------------------------------------

    /// Adds a function type.
    pub fn create_type(&mut self, params: Vec<ValType>, results: Vec<ValType>) -> TypeId {
        let id = TypeId(self.types.len() as u32);
        self.types.push(TypeDef::new(id, params, results));
        id
    }

    /// Adds a function definition with the given type, locals, and body.
    pub fn create_function(
        &mut self,
        ty: TypeId,
        locals: Vec<ValType>,
        body: Expression,
    ) -> Result<FuncId> {
        self.type_def(ty)?;
        let id = FuncId(self.functions.len() as u32);
        self.functions.push(FunctionDef {
            id,
            type_id: ty,
            locals: SlotList::new(IndexSpace::Local, locals),
            body,
        });
        Ok(id)
    }

    /// Adds a global definition.
    pub fn create_global(&mut self, ty: ValType, mutable: bool, init: Expression) -> GlobalId {
        let id = GlobalId(self.globals.len() as u32);
        self.globals.push(GlobalDef { ty, mutable, init });
        id
    }

    /// Adds a memory definition with `min` pages and an optional maximum.
    pub fn create_memory(&mut self, min: u32, max: Option<u32>) -> MemoryId {
        let id = MemoryId(self.memories.len() as u32);
        self.memories.push(MemoryDef {
            limits: Limits::new(min, max),
        });
        id
    }

    /// Adds a table definition.
    pub fn create_table(&mut self, ref_type: RefType, min: u32, max: Option<u32>) -> TableId {
        let id = TableId(self.tables.len() as u32);
        self.tables.push(TableDef {
            ref_type,
            limits: Limits::new(min, max),
        });
        id
    }

    fn push_element(&mut self, element: Element) -> Result<ElementId> {
        match &element.content {
            ElementContent::Funcs(funcs) => {
                for f in funcs {
                    self.check_func(*f)?;
                }
            }
            ElementContent::Exprs { .. } => {}
        }
        if let ElementMode::Active { table, .. } = &element.mode {
            self.check_table(*table)?;
        }
        let id = ElementId(self.elements.len() as u32);
        self.elements.push(element);
        Ok(id)
    }

    /// Adds an active funcref element segment.
    pub fn create_element_active(
        &mut self,
        table: TableRef,
        offset: Expression,
        funcs: Vec<FuncRef>,
    ) -> Result<ElementId> {
        self.push_element(Element {
            content: ElementContent::Funcs(funcs),
            mode: ElementMode::Active { table, offset },
        })
    }

    /// Adds a passive funcref element segment.
    pub fn create_element_passive(&mut self, funcs: Vec<FuncRef>) -> Result<ElementId> {
        self.push_element(Element {
            content: ElementContent::Funcs(funcs),
            mode: ElementMode::Passive,
        })
    }

    /// Adds a declarative funcref element segment.
    pub fn create_element_declarative(&mut self, funcs: Vec<FuncRef>) -> Result<ElementId> {
        self.push_element(Element {
            content: ElementContent::Funcs(funcs),
            mode: ElementMode::Declarative,
        })
    }

    /// Adds an active element segment with per-element expressions.
    pub fn create_element_expr_active(
        &mut self,
        table: TableRef,
        offset: Expression,
        ref_type: RefType,
        exprs: Vec<Expression>,
    ) -> Result<ElementId> {
        self.push_element(Element {
            content: ElementContent::Exprs { ref_type, exprs },
            mode: ElementMode::Active { table, offset },
        })
    }

    /// Adds a passive element segment with per-element expressions.
    pub fn create_element_expr_passive(
        &mut self,
        ref_type: RefType,
        exprs: Vec<Expression>,
    ) -> Result<ElementId> {
        self.push_element(Element {
            content: ElementContent::Exprs { ref_type, exprs },
            mode: ElementMode::Passive,
        })
    }

    /// Adds a declarative element segment with per-element expressions.
    pub fn create_element_expr_declarative(
        &mut self,
        ref_type: RefType,
        exprs: Vec<Expression>,
    ) -> Result<ElementId> {
        self.push_element(Element {
            content: ElementContent::Exprs { ref_type, exprs },
            mode: ElementMode::Declarative,
        })
    }

    /// Adds an active data segment applied to `memory` at `offset`.
    pub fn create_data_active(
        &mut self,
        memory: MemRef,
        offset: Expression,
        bytes: Vec<u8>,
    ) -> Result<DataId> {
        self.check_memory(memory)?;
        let id = DataId(self.data.len() as u32);
        self.data.push(DataSegment {
            mode: DataMode::Active { memory, offset },
            bytes,
        });
        Ok(id)
    }

    /// Adds a passive data segment.
    pub fn create_data_passive(&mut self, bytes: Vec<u8>) -> DataId {
        let id = DataId(self.data.len() as u32);
        self.data.push(DataSegment {
            mode: DataMode::Passive,
            bytes,
        });
        id
    }

    // Imports -----------------------------------------------------------------

    fn push_import(&mut self, module: &str, name: &str, kind: ImportKind) -> ImportId {
        let id = ImportId(self.imports.len() as u32);
        self.imports.push(Import {
            module: module.to_string(),
            name: name.to_string(),
            kind,
        });
        id
    }

    /// Imports a function with the given type.
    pub fn import_function(&mut self, module: &str, name: &str, ty: TypeId) -> Result<FuncRef> {
        self.type_def(ty)?;
        Ok(FuncRef::Import(self.push_import(
            module,
            name,
            ImportKind::Function(ty),
        )))
    }

    /// Imports a global.
    pub fn import_global(
        &mut self,
        module: &str,
        name: &str,
        ty: ValType,
        mutable: bool,
    ) -> GlobalRef {
        GlobalRef::Import(self.push_import(module, name, ImportKind::Global { ty, mutable }))
    }

    /// Imports a memory.
    pub fn import_memory(&mut self, module: &str, name: &str, min: u32, max: Option<u32>) -> MemRef {
        MemRef::Import(self.push_import(module, name, ImportKind::Memory(Limits::new(min, max))))
    }

    /// Imports a table.
    pub fn import_table(
        &mut self,
        module: &str,
        name: &str,
        ref_type: RefType,
        min: u32,
        max: Option<u32>,
    ) -> TableRef {
        TableRef::Import(self.push_import(
            module,
            name,
            ImportKind::Table {
                ref_type,
                limits: Limits::new(min, max),
            },
        ))
    }

    // Exports -----------------------------------------------------------------

    /// Exports a function under `name`.
    pub fn export_function(&mut self, name: &str, func: FuncRef) -> Result<()> {
        self.check_func(func)?;
        self.exports.push(Export {
            name: name.to_string(),
            kind: ExportKind::Function(func),
        });
        Ok(())
    }

    /// Exports a global under `name`.
    pub fn export_global(&mut self, name: &str, global: GlobalRef) -> Result<()> {
        self.check_global(global)?;
        self.exports.push(Export {
            name: name.to_string(),
            kind: ExportKind::Global(global),
        });
        Ok(())
    }

    /// Exports a memory under `name`.
    pub fn export_memory(&mut self, name: &str, memory: MemRef) -> Result<()> {
        self.check_memory(memory)?;
        self.exports.push(Export {
            name: name.to_string(),
            kind: ExportKind::Memory(memory),
        });
        Ok(())
    }

    /// Exports a table under `name`.
    pub fn export_table(&mut self, name: &str, table: TableRef) -> Result<()> {
        self.check_table(table)?;
        self.exports.push(Export {
            name: name.to_string(),
            kind: ExportKind::Table(table),
        });
        Ok(())
    }

    /// Adds a custom section at `position`.
    pub fn create_custom_section(
        &mut self,
        position: CustomSectionPosition,
        name: &str,
        bytes: Vec<u8>,
    ) {
        self.custom_sections[position.index()].push(CustomSection {
            name: name.to_string(),
            bytes,
        });
    }

    /// Sets the start function.
    pub fn set_start(&mut self, func: Option<FuncRef>) -> Result<()> {
        if let Some(f) = func {
            self.check_func(f)?;
        }
        self.start = func;
        Ok(())
    }

    // Reference checks --------------------------------------------------------

    pub(crate) fn check_func(&self, f: FuncRef) -> Result<()> {
        match f {
            FuncRef::Def(id) => self.func(id).map(|_| ()),
            FuncRef::Import(id) => match self.import(id)?.kind {
                ImportKind::Function(_) => Ok(()),
                _ => Err(IndexError::NotInModule { space: IndexSpace::Function }.into()),
            },
        }
    }

    pub(crate) fn check_global(&self, g: GlobalRef) -> Result<()> {
        match g {
            GlobalRef::Def(id) => self.global(id).map(|_| ()),
            GlobalRef::Import(id) => match self.import(id)?.kind {
                ImportKind::Global { .. } => Ok(()),
                _ => Err(IndexError::NotInModule { space: IndexSpace::Global }.into()),
            },
        }
    }

    pub(crate) fn check_memory(&self, m: MemRef) -> Result<()> {
        match m {
            MemRef::Def(id) => self.memory(id).map(|_| ()),
            MemRef::Import(id) => match self.import(id)?.kind {
                ImportKind::Memory(_) => Ok(()),
                _ => Err(IndexError::NotInModule { space: IndexSpace::Memory }.into()),
            },
        }
    }

    pub(crate) fn check_table(&self, t: TableRef) -> Result<()> {
        match t {
            TableRef::Def(id) => self.table(id).map(|_| ()),
            TableRef::Import(id) => match self.import(id)?.kind {
                ImportKind::Table { .. } => Ok(()),
                _ => Err(IndexError::NotInModule { space: IndexSpace::Table }.into()),
            },
        }
    }

    // Decoder construction ----------------------------------------------------

    pub(crate) fn push_decoded_import(&mut self, import: Import) -> ImportId {
        let id = ImportId(self.imports.len() as u32);
        self.imports.push(import);
        id
    }

    pub(crate) fn push_decoded_export(&mut self, export: Export) {
        self.exports.push(export);
    }

    pub(crate) fn push_decoded_element(&mut self, element: Element) -> ElementId {
        let id = ElementId(self.elements.len() as u32);
        self.elements.push(element);
        id
    }

    pub(crate) fn push_decoded_data(&mut self, segment: DataSegment) -> DataId {
        let id = DataId(self.data.len() as u32);
        self.data.push(segment);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn parameter_reference_stability() {
        let mut module = Module::new();
        let ty = module.create_type(
            vec![ValType::I32, ValType::I64, ValType::F32],
            vec![],
        );
        let t = module.type_def_mut(ty).unwrap();
        let b = t.param(1).unwrap();
        assert_eq!(t.resolve_param(b).unwrap(), 1);

        // Remove the first parameter: the handle follows its entry.
        let removed = t.splice_params(0, 1, &[]).unwrap();
        assert_eq!(removed, vec![ValType::I32]);
        assert_eq!(t.resolve_param(b).unwrap(), 0);

        // Remove the referenced parameter: resolution now fails.
        t.splice_params(0, 1, &[]).unwrap();
        assert!(matches!(
            t.resolve_param(b),
            Err(Error::Reference(ReferenceError::Removed { .. }))
        ));
    }

    #[test]
    fn foreign_parameter_reference_rejected() {
        let mut module = Module::new();
        let a = module.create_type(vec![ValType::I32], vec![]);
        let b = module.create_type(vec![ValType::I32], vec![]);
        let r = module.type_def_mut(a).unwrap().param(0).unwrap();
        assert!(matches!(
            module.type_def(b).unwrap().resolve_param(r),
            Err(Error::Reference(ReferenceError::ForeignOwner { .. }))
        ));
    }

    #[test]
    fn local_handles_track_splices() {
        let mut module = Module::new();
        let ty = module.create_type(vec![], vec![]);
        let f = module
            .create_function(ty, vec![ValType::I32], Expression::new())
            .unwrap();
        let func = module.func_mut(f).unwrap();
        let v = func.add_local(ValType::F64);
        assert_eq!(func.resolve_local(v).unwrap(), 1);
        func.splice_locals(0, 1, &[]).unwrap();
        assert_eq!(func.resolve_local(v).unwrap(), 0);
    }

    #[test]
    fn create_function_validates_type() {
        let mut module = Module::new();
        let err = module.create_function(TypeId(3), vec![], Expression::new());
        assert!(matches!(
            err,
            Err(Error::Index(IndexError::NotInModule { .. }))
        ));
    }

    #[test]
    fn export_checks_import_kind() {
        let mut module = Module::new();
        let mem = module.import_memory("env", "mem", 1, None);
        let id = match mem {
            MemRef::Import(id) => id,
            MemRef::Def(_) => unreachable!(),
        };
        // A memory import is not a function.
        assert!(module.export_function("f", FuncRef::Import(id)).is_err());
        assert!(module.export_memory("m", mem).is_ok());
    }

    #[test]
    fn start_must_resolve() {
        let mut module = Module::new();
        assert!(module.set_start(Some(FuncRef::Def(FuncId(0)))).is_err());
        let ty = module.create_type(vec![], vec![]);
        let f = module.create_function(ty, vec![], Expression::new()).unwrap();
        assert!(module.set_start(Some(FuncRef::Def(f))).is_ok());
        assert_eq!(module.start(), Some(FuncRef::Def(f)));
    }
}
