//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types.
//!
//! ```ignore
//! use rpcidl::prelude::*;
//! ```

// Entry points
pub use rpcidl_schema::{Document, Element, ParseError, Parser, parse_file, parse_str};

// Model types
pub use rpcidl_schema::{
    BaseItem, DefaultValue, Enum, EnumElement, EnumSubset, Function, FunctionKey, FunctionParam,
    Issue, Model, ParamType, Struct, StructMember, StructRef,
};
