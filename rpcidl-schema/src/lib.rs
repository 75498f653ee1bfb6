//! # rpcidl Schema
//!
//! Interface definition document parser and model builder.
//!
//! This crate provides:
//! - A read-only element tree over XML interface documents
//! - Type definitions for enums, structs, functions and parameter types
//! - Two-phase reference resolution through a per-parse type index
//! - Validation of the constraints the schema declares
//!
//! ```ignore
//! let model = rpcidl_schema::parse_file("interfaces.xml")?;
//! let function = model.function("interface1.Function1", "request");
//! ```

pub mod document;
pub mod error;
pub mod functions;
pub mod index;
mod metadata;
pub mod model;
mod params;
pub mod parser;
pub mod types;
pub mod validation;

pub use document::{Document, Element};
pub use error::ParseError;
pub use functions::{Function, FunctionKey, FunctionParam};
pub use index::{TypeEntry, TypeIndex};
pub use metadata::parse_bool;
pub use model::{FUNCTION_ID_ENUM, MESSAGE_TYPE_ENUM, Model};
pub use parser::{Parser, parse_file, parse_str};
pub use types::{
    ArrayType, BaseItem, BooleanType, DefaultValue, Enum, EnumElement, EnumSubset, FloatType,
    IntegerType, Issue, ParamType, StringType, Struct, StructMember, StructRef,
};
pub use validation::validate_model;
