//! # rpcidl
//!
//! Front end of an RPC interface toolchain.
//!
//! Reads an XML interface definition document and produces an immutable,
//! fully cross-referenced [`Model`] for code generators to consume: enums,
//! structs and functions with every type reference resolved to the shared
//! object it names.
//!
//! ## Quick Start
//!
//! ```ignore
//! use rpcidl::prelude::*;
//!
//! let model = Parser::new().strict_attributes(true).parse_file("interfaces.xml")?;
//! for function in model.functions().values() {
//!     println!("{} ({})", function.name(), function.message_type.name());
//! }
//! ```
//!
//! ## Crate Organization
//!
//! - [`schema`] - Document reading, model types, parsing and validation
//! - [`summary`] - Plain-text overview of a parsed model

pub mod prelude;
pub mod summary;

/// Document reading, model types, parsing and validation.
pub mod schema {
    pub use rpcidl_schema::*;
}

// Re-export commonly used items at the crate root
pub use rpcidl_schema::{Model, ParseError, Parser, parse_file, parse_str};
