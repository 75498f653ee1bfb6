//! Error types for document reading and model building.

use thiserror::Error;

/// Error type for schema parsing operations.
///
/// Every variant is fatal: the builder stops at the first one and no partial
/// model is returned.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Structurally invalid source document.
    #[error("malformed document: {message}")]
    MalformedDocument {
        /// What the reader rejected.
        message: String,
    },

    /// Type attribute names neither a primitive nor a declared enum/struct.
    #[error("unknown type '{type_name}' referenced by '{item}' in '{scope}'")]
    UnknownType {
        /// Type name as written.
        type_name: String,
        /// Referencing member or param.
        item: String,
        /// Enclosing struct or function.
        scope: String,
    },

    /// Element name missing from the enum it must belong to.
    #[error("'{element}' is not an element of enum '{enum_name}' (referenced by '{item}')")]
    UnknownEnumElement {
        /// Enum searched.
        enum_name: String,
        /// Element name as written.
        element: String,
        /// Referencing param or function.
        item: String,
    },

    /// Two declarations share one name within a scope.
    #[error("duplicate {kind} '{name}' in '{scope}'")]
    DuplicateName {
        /// Kind of declaration (enum element, struct member, type, ...).
        kind: String,
        /// Colliding name.
        name: String,
        /// Scope the name must be unique in.
        scope: String,
    },

    /// Two functions share one (function id, message type) key.
    #[error("duplicate function signature ({function_id}, {message_type}) for '{function}'")]
    DuplicateFunctionSignature {
        /// Second function declared under the key.
        function: String,
        /// FunctionID element name.
        function_id: String,
        /// messageType element name.
        message_type: String,
    },

    /// Malformed numeric literal or inconsistent bounds.
    #[error("invalid bound '{attribute}' on '{item}': {reason}")]
    InvalidBound {
        /// Declaring item.
        item: String,
        /// Offending attribute.
        attribute: String,
        /// What is wrong with it.
        reason: String,
    },

    /// Missing required attribute.
    #[error("missing required attribute '{attribute}' on element '{element}'")]
    MissingAttribute {
        /// Element tag or item name.
        element: String,
        /// Attribute name.
        attribute: String,
    },

    /// Attribute value outside its literal set.
    #[error("invalid value '{value}' for attribute '{attribute}' on '{element}'")]
    InvalidAttribute {
        /// Element tag or item name.
        element: String,
        /// Attribute name.
        attribute: String,
        /// Invalid value.
        value: String,
    },

    /// Child element not allowed in its context.
    #[error("unexpected element '{element}' in '{context}'")]
    UnexpectedElement {
        /// Element tag.
        element: String,
        /// Parent context.
        context: String,
    },

    /// Unknown attribute, rejected in strict mode.
    #[error("unexpected attribute '{attribute}' on '{element}'")]
    UnexpectedAttribute {
        /// Element tag or item name.
        element: String,
        /// Attribute name.
        attribute: String,
    },

    /// IO error while reading the document.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ParseError {
    /// Creates a malformed document error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedDocument {
            message: message.into(),
        }
    }

    /// Creates a missing attribute error.
    pub fn missing_attr(element: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self::MissingAttribute {
            element: element.into(),
            attribute: attribute.into(),
        }
    }

    /// Creates an invalid attribute error.
    pub fn invalid_attr(
        element: impl Into<String>,
        attribute: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::InvalidAttribute {
            element: element.into(),
            attribute: attribute.into(),
            value: value.into(),
        }
    }

    /// Creates an unexpected element error.
    pub fn unexpected_element(element: impl Into<String>, context: impl Into<String>) -> Self {
        Self::UnexpectedElement {
            element: element.into(),
            context: context.into(),
        }
    }

    /// Creates a duplicate name error.
    pub fn duplicate(
        kind: impl Into<String>,
        name: impl Into<String>,
        scope: impl Into<String>,
    ) -> Self {
        Self::DuplicateName {
            kind: kind.into(),
            name: name.into(),
            scope: scope.into(),
        }
    }

    /// Creates an invalid bound error.
    pub fn invalid_bound(
        item: impl Into<String>,
        attribute: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidBound {
            item: item.into(),
            attribute: attribute.into(),
            reason: reason.into(),
        }
    }

    /// Creates an unknown enum element error.
    pub fn unknown_element(
        enum_name: impl Into<String>,
        element: impl Into<String>,
        item: impl Into<String>,
    ) -> Self {
        Self::UnknownEnumElement {
            enum_name: enum_name.into(),
            element: element.into(),
            item: item.into(),
        }
    }

    /// Returns true for errors caused by the document content rather than by
    /// reading it.
    #[must_use]
    pub const fn is_content_error(&self) -> bool {
        !matches!(self, Self::Io(_))
    }
}

impl From<quick_xml::Error> for ParseError {
    fn from(err: quick_xml::Error) -> Self {
        Self::malformed(format!("XML parsing error: {err}"))
    }
}

impl From<quick_xml::events::attributes::AttrError> for ParseError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Self::malformed(format!("attribute error: {err}"))
    }
}

impl From<quick_xml::escape::EscapeError> for ParseError {
    fn from(err: quick_xml::escape::EscapeError) -> Self {
        Self::malformed(format!("escape error: {err}"))
    }
}

impl From<std::str::Utf8Error> for ParseError {
    fn from(err: std::str::Utf8Error) -> Self {
        Self::malformed(format!("UTF-8 error: {err}"))
    }
}
