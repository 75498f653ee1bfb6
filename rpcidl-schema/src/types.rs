//! Schema type definitions.
//!
//! This module contains the data structures representing interface schema
//! entities: enums, structs and the parameter types that reference them.
//! Enums are shared through `Arc`, so every site that names one holds the
//! identical object. Structs are owned by the model and referenced through
//! [`StructRef`], a weak handle, since struct graphs may be cyclic.

use indexmap::IndexMap;
use std::fmt;
use std::sync::{Arc, LazyLock, OnceLock, Weak};

/// Members reported for a shell whose body is not built yet.
static NO_MEMBERS: LazyLock<IndexMap<String, StructMember>> = LazyLock::new(IndexMap::new);

/// Documentation and metadata shared by every named entity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BaseItem {
    /// Entity name.
    pub name: String,
    /// Description paragraphs, empty ones included.
    pub description: Vec<String>,
    /// Design description paragraphs.
    pub design_description: Vec<String>,
    /// Known issues.
    pub issues: Vec<Issue>,
    /// Open work items.
    pub todos: Vec<String>,
    /// Target platform.
    pub platform: Option<String>,
}

impl BaseItem {
    /// Creates metadata with only a name set.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// An issue attached to an entity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Issue {
    /// Who raised it.
    pub creator: String,
    /// Issue text.
    pub value: String,
}

/// Enumeration definition.
#[derive(Debug)]
pub struct Enum {
    /// Name and documentation.
    pub base: BaseItem,
    /// Internal scope.
    pub internal_scope: Option<String>,
    /// Elements in declaration order.
    pub elements: IndexMap<String, Arc<EnumElement>>,
}

impl Enum {
    /// Creates an enum with no elements.
    #[must_use]
    pub fn new(base: BaseItem) -> Self {
        Self {
            base,
            internal_scope: None,
            elements: IndexMap::new(),
        }
    }

    /// Returns the enum name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.base.name
    }

    /// Looks up an element by name.
    #[must_use]
    pub fn element(&self, name: &str) -> Option<&Arc<EnumElement>> {
        self.elements.get(name)
    }
}

/// Element of an enumeration.
#[derive(Debug)]
pub struct EnumElement {
    /// Name and documentation.
    pub base: BaseItem,
    /// Name used by generated code, if different.
    pub internal_name: Option<String>,
    /// Explicit integer value.
    pub value: Option<i64>,
}

impl EnumElement {
    /// Creates an element with no internal name and no value.
    #[must_use]
    pub fn new(base: BaseItem) -> Self {
        Self {
            base,
            internal_name: None,
            value: None,
        }
    }

    /// Returns the element name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.base.name
    }

    /// Returns the internal name when declared, otherwise the name.
    #[must_use]
    pub fn primary_name(&self) -> &str {
        self.internal_name.as_deref().unwrap_or(&self.base.name)
    }
}

/// Structure definition.
///
/// Structs are registered as empty shells before any body is built, so the
/// member table is set exactly once after the shell is already shared.
#[derive(Debug)]
pub struct Struct {
    /// Name and documentation.
    pub base: BaseItem,
    members: OnceLock<IndexMap<String, StructMember>>,
}

impl Struct {
    /// Creates a shell whose members are not built yet.
    #[must_use]
    pub fn shell(base: BaseItem) -> Self {
        Self {
            base,
            members: OnceLock::new(),
        }
    }

    /// Returns the struct name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.base.name
    }

    /// Returns the members in declaration order, or none for an unbuilt
    /// shell. Reading never sets the body.
    #[must_use]
    pub fn members(&self) -> &IndexMap<String, StructMember> {
        self.members.get().unwrap_or(&*NO_MEMBERS)
    }

    /// Looks up a member by name.
    #[must_use]
    pub fn member(&self, name: &str) -> Option<&StructMember> {
        self.members().get(name)
    }

    /// Returns true once the body has been built.
    #[must_use]
    pub fn is_filled(&self) -> bool {
        self.members.get().is_some()
    }

    /// Sets the member table. Returns the table back if already set.
    pub(crate) fn fill(
        &self,
        members: IndexMap<String, StructMember>,
    ) -> Result<(), IndexMap<String, StructMember>> {
        self.members.set(members)
    }
}

/// Member of a struct.
#[derive(Debug, Clone)]
pub struct StructMember {
    /// Name and documentation.
    pub base: BaseItem,
    /// Whether the member must be present.
    pub is_mandatory: bool,
    /// Member type.
    pub param_type: ParamType,
    /// Default element for enum-typed members.
    pub default_value: Option<DefaultValue>,
}

impl StructMember {
    /// Returns the member name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.base.name
    }
}

/// Weak handle to a struct owned by a [`Model`](crate::Model).
///
/// Members and params refer to structs through this handle, so mutually
/// referencing structs do not keep each other alive. The handle resolves
/// only while the owning model exists. `Debug` prints only the name.
#[derive(Clone)]
pub struct StructRef {
    name: String,
    target: Weak<Struct>,
}

impl StructRef {
    /// Creates a handle to a shared struct.
    #[must_use]
    pub fn new(target: &Arc<Struct>) -> Self {
        Self {
            name: target.name().to_string(),
            target: Arc::downgrade(target),
        }
    }

    /// Returns the name of the referenced struct.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the struct if its model is still alive.
    #[must_use]
    pub fn upgrade(&self) -> Option<Arc<Struct>> {
        self.target.upgrade()
    }

    /// Returns true if this handle points at `other`.
    #[must_use]
    pub fn ptr_eq(&self, other: &Arc<Struct>) -> bool {
        std::ptr::eq(self.target.as_ptr(), Arc::as_ptr(other))
    }
}

impl fmt::Debug for StructRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("StructRef").field(&self.name).finish()
    }
}

/// Parameter type variants.
#[derive(Debug, Clone)]
pub enum ParamType {
    /// Boolean value.
    Boolean(BooleanType),
    /// Integer value.
    Integer(IntegerType),
    /// Floating point value.
    Float(FloatType),
    /// String value.
    String(StringType),
    /// Array of another parameter type.
    Array(ArrayType),
    /// Any element of an enum.
    Enum(Arc<Enum>),
    /// Listed elements of an enum.
    EnumSubset(EnumSubset),
    /// A struct.
    Struct(StructRef),
}

impl ParamType {
    /// Returns a short name for the variant.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Boolean(_) => "Boolean",
            Self::Integer(_) => "Integer",
            Self::Float(_) => "Float",
            Self::String(_) => "String",
            Self::Array(_) => "Array",
            Self::Enum(_) => "Enum",
            Self::EnumSubset(_) => "EnumSubset",
            Self::Struct(_) => "Struct",
        }
    }

    /// Returns true if this is an array type.
    #[must_use]
    pub const fn is_array(&self) -> bool {
        matches!(self, Self::Array(_))
    }

    /// Returns the element type for arrays, otherwise `self`.
    #[must_use]
    pub fn base_type(&self) -> &ParamType {
        match self {
            Self::Array(array) => &array.element_type,
            other => other,
        }
    }

    /// Returns the referenced enum for enum and enum subset types.
    #[must_use]
    pub fn as_enum(&self) -> Option<&Arc<Enum>> {
        match self {
            Self::Enum(e) => Some(e),
            Self::EnumSubset(subset) => Some(&subset.enum_ref),
            _ => None,
        }
    }

    /// Returns the referenced struct for struct types.
    #[must_use]
    pub fn as_struct(&self) -> Option<&StructRef> {
        match self {
            Self::Struct(s) => Some(s),
            _ => None,
        }
    }
}

/// Boolean parameter type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BooleanType {
    /// Default value.
    pub default_value: Option<bool>,
}

/// Integer parameter type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IntegerType {
    /// Minimum valid value.
    pub min_value: Option<i64>,
    /// Maximum valid value.
    pub max_value: Option<i64>,
    /// Default value.
    pub default_value: Option<i64>,
}

/// Floating point parameter type.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FloatType {
    /// Minimum valid value.
    pub min_value: Option<f64>,
    /// Maximum valid value.
    pub max_value: Option<f64>,
    /// Default value.
    pub default_value: Option<f64>,
}

/// String parameter type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringType {
    /// Minimum length.
    pub min_length: Option<u64>,
    /// Maximum length.
    pub max_length: Option<u64>,
    /// Default value.
    pub default_value: Option<String>,
}

/// Array parameter type.
#[derive(Debug, Clone)]
pub struct ArrayType {
    /// Type of each element.
    pub element_type: Box<ParamType>,
    /// Minimum number of elements.
    pub min_size: Option<u64>,
    /// Maximum number of elements.
    pub max_size: Option<u64>,
}

/// Enum restricted to an allow-list of its elements.
#[derive(Debug, Clone)]
pub struct EnumSubset {
    /// Name of the declaring parameter.
    pub name: String,
    /// Referenced enum.
    pub enum_ref: Arc<Enum>,
    /// Allowed elements, each the same object held by `enum_ref`.
    pub allowed_elements: IndexMap<String, Arc<EnumElement>>,
}

/// Default element declared on an enum or enum subset typed parameter.
///
/// Primitive defaults live in the type's own `default_value` slot.
#[derive(Debug, Clone)]
pub struct DefaultValue {
    /// The declared element, identical to the one held by the enum.
    pub element: Arc<EnumElement>,
}

impl DefaultValue {
    /// Wraps a shared enum element.
    #[must_use]
    pub fn new(element: Arc<EnumElement>) -> Self {
        Self { element }
    }

    /// Returns the default element.
    #[must_use]
    pub fn element(&self) -> &Arc<EnumElement> {
        &self.element
    }
}
