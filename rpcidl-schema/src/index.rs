//! Cross-reference index for one parse.
//!
//! Maps declared enum and struct names to the shared objects so that type
//! references resolve to the same instance wherever they appear, whatever
//! the declaration order.

use crate::error::ParseError;
use crate::types::{Enum, ParamType, Struct, StructRef};
use std::collections::HashMap;
use std::sync::Arc;

/// Entry in the type namespace.
#[derive(Debug, Clone)]
pub enum TypeEntry {
    /// A fully built enum.
    Enum(Arc<Enum>),
    /// A struct, possibly still a shell.
    Struct(Arc<Struct>),
}

/// Registry of enum and struct names, local to one parse.
#[derive(Debug, Default)]
pub struct TypeIndex {
    entries: HashMap<String, TypeEntry>,
}

impl TypeIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an enum under its name.
    ///
    /// # Errors
    /// Returns `ParseError::DuplicateName` if the name is already taken by an
    /// enum or a struct.
    pub fn register_enum(&mut self, enum_def: Arc<Enum>) -> Result<(), ParseError> {
        let name = enum_def.name().to_string();
        self.insert(name, TypeEntry::Enum(enum_def))
    }

    /// Registers a struct (usually an empty shell) under its name.
    ///
    /// # Errors
    /// Returns `ParseError::DuplicateName` if the name is already taken.
    pub fn register_struct(&mut self, struct_def: Arc<Struct>) -> Result<(), ParseError> {
        let name = struct_def.name().to_string();
        self.insert(name, TypeEntry::Struct(struct_def))
    }

    /// Resolves a registered name to a parameter type holding the shared
    /// object.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<ParamType> {
        self.entries.get(name).map(|entry| match entry {
            TypeEntry::Enum(e) => ParamType::Enum(Arc::clone(e)),
            TypeEntry::Struct(s) => ParamType::Struct(StructRef::new(s)),
        })
    }

    /// Returns the entry registered under a name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&TypeEntry> {
        self.entries.get(name)
    }

    /// Returns true if the name is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Returns the number of registered names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert(&mut self, name: String, entry: TypeEntry) -> Result<(), ParseError> {
        if self.entries.contains_key(&name) {
            return Err(ParseError::duplicate("type", name, "document"));
        }
        tracing::debug!("Registered {} '{}'", entry.kind(), name);
        self.entries.insert(name, entry);
        Ok(())
    }
}

impl TypeEntry {
    /// Returns "enum" or "struct".
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Enum(_) => "enum",
            Self::Struct(_) => "struct",
        }
    }
}
