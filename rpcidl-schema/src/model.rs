//! Finished interface model handed to code generators.

use crate::functions::{Function, FunctionKey};
use crate::types::{Enum, EnumElement, Struct, StructRef};
use indexmap::IndexMap;
use std::sync::Arc;

/// Name of the enum synthesized from all declared functions.
pub const FUNCTION_ID_ENUM: &str = "FunctionID";

/// Name of the predeclared request/response/notification enum.
pub const MESSAGE_TYPE_ENUM: &str = "messageType";

/// Immutable, fully cross-referenced interface model.
///
/// The model owns every struct; [`StructRef`] handles inside members and
/// params resolve through [`Model::resolve_struct`] while it is alive.
#[derive(Debug)]
pub struct Model {
    params: IndexMap<String, String>,
    enums: IndexMap<String, Arc<Enum>>,
    structs: IndexMap<String, Arc<Struct>>,
    functions: IndexMap<FunctionKey, Function>,
}

impl Model {
    pub(crate) fn new(
        params: IndexMap<String, String>,
        enums: IndexMap<String, Arc<Enum>>,
        structs: IndexMap<String, Arc<Struct>>,
        functions: IndexMap<FunctionKey, Function>,
    ) -> Self {
        Self {
            params,
            enums,
            structs,
            functions,
        }
    }

    /// Document and interface level metadata.
    #[must_use]
    pub fn params(&self) -> &IndexMap<String, String> {
        &self.params
    }

    /// All enums, including `FunctionID` and `messageType`.
    #[must_use]
    pub fn enums(&self) -> &IndexMap<String, Arc<Enum>> {
        &self.enums
    }

    /// All structs in declaration order.
    #[must_use]
    pub fn structs(&self) -> &IndexMap<String, Arc<Struct>> {
        &self.structs
    }

    /// All functions keyed by (function id, message type).
    #[must_use]
    pub fn functions(&self) -> &IndexMap<FunctionKey, Function> {
        &self.functions
    }

    /// Looks up an enum by its registered name.
    #[must_use]
    pub fn enum_named(&self, name: &str) -> Option<&Arc<Enum>> {
        self.enums.get(name)
    }

    /// Looks up a struct by its registered name.
    #[must_use]
    pub fn struct_named(&self, name: &str) -> Option<&Arc<Struct>> {
        self.structs.get(name)
    }

    /// Returns the struct a handle points at, if it belongs to this model.
    #[must_use]
    pub fn resolve_struct(&self, handle: &StructRef) -> Option<&Arc<Struct>> {
        self.structs
            .get(handle.name())
            .filter(|struct_def| handle.ptr_eq(struct_def))
    }

    /// Looks up a FunctionID element, e.g. `interface1.Function1`.
    #[must_use]
    pub fn function_id(&self, name: &str) -> Option<&Arc<EnumElement>> {
        self.enums.get(FUNCTION_ID_ENUM)?.element(name)
    }

    /// Looks up a messageType element.
    #[must_use]
    pub fn message_type(&self, name: &str) -> Option<&Arc<EnumElement>> {
        self.enums.get(MESSAGE_TYPE_ENUM)?.element(name)
    }

    /// Looks up a function by key.
    #[must_use]
    pub fn get_function(&self, key: &FunctionKey) -> Option<&Function> {
        self.functions.get(key)
    }

    /// Looks up a function by FunctionID and messageType element names.
    #[must_use]
    pub fn function(&self, function_id: &str, message_type: &str) -> Option<&Function> {
        let key = FunctionKey::new(
            Arc::clone(self.function_id(function_id)?),
            Arc::clone(self.message_type(message_type)?),
        );
        self.functions.get(&key)
    }
}
