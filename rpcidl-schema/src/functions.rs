//! Function definitions for interface schemas.
//!
//! A function is identified by the pair of its FunctionID element and its
//! messageType element; [`FunctionKey`] compares those by identity.

use crate::types::{BaseItem, DefaultValue, EnumElement, ParamType};
use indexmap::IndexMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Function definition.
#[derive(Debug, Clone)]
pub struct Function {
    /// Name and documentation.
    pub base: BaseItem,
    /// Name of the owning interface.
    pub interface: String,
    /// FunctionID element.
    pub function_id: Arc<EnumElement>,
    /// messageType element.
    pub message_type: Arc<EnumElement>,
    /// Parameters in declaration order.
    pub params: IndexMap<String, FunctionParam>,
}

impl Function {
    /// Returns the function name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.base.name
    }

    /// Returns the key this function is stored under.
    #[must_use]
    pub fn key(&self) -> FunctionKey {
        FunctionKey::new(
            Arc::clone(&self.function_id),
            Arc::clone(&self.message_type),
        )
    }

    /// Looks up a parameter by name.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&FunctionParam> {
        self.params.get(name)
    }
}

/// Function parameter.
#[derive(Debug, Clone)]
pub struct FunctionParam {
    /// Name and documentation.
    pub base: BaseItem,
    /// Whether the parameter must be present.
    pub is_mandatory: bool,
    /// Parameter type.
    pub param_type: ParamType,
    /// Parameter-level default, separate from any default in `param_type`.
    pub default_value: Option<DefaultValue>,
}

impl FunctionParam {
    /// Returns the parameter name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.base.name
    }
}

/// Composite (function id, message type) key.
///
/// Equality and hashing use the addresses of the two elements, never their
/// contents.
#[derive(Clone)]
pub struct FunctionKey {
    function_id: Arc<EnumElement>,
    message_type: Arc<EnumElement>,
}

impl FunctionKey {
    /// Creates a key from the two elements.
    #[must_use]
    pub fn new(function_id: Arc<EnumElement>, message_type: Arc<EnumElement>) -> Self {
        Self {
            function_id,
            message_type,
        }
    }

    /// Returns the FunctionID element.
    #[must_use]
    pub fn function_id(&self) -> &Arc<EnumElement> {
        &self.function_id
    }

    /// Returns the messageType element.
    #[must_use]
    pub fn message_type(&self) -> &Arc<EnumElement> {
        &self.message_type
    }
}

impl PartialEq for FunctionKey {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.function_id, &other.function_id)
            && Arc::ptr_eq(&self.message_type, &other.message_type)
    }
}

impl Eq for FunctionKey {}

impl Hash for FunctionKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Arc::as_ptr(&self.function_id).hash(state);
        Arc::as_ptr(&self.message_type).hash(state);
    }
}

impl fmt::Debug for FunctionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FunctionKey")
            .field(&self.function_id.name())
            .field(&self.message_type.name())
            .finish()
    }
}
