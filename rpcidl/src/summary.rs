//! Plain-text overview of a parsed model.
//!
//! Used by the `rpcidl` binary to show what a document resolved to.

use rpcidl_schema::{Model, ParamType};
use std::fmt::Write;

/// Renders a short, human-readable description of a parameter type.
#[must_use]
pub fn describe_type(param_type: &ParamType) -> String {
    match param_type {
        ParamType::Boolean(_) => "Boolean".to_string(),
        ParamType::Integer(t) => with_range("Integer", t.min_value, t.max_value),
        ParamType::Float(t) => with_range("Float", t.min_value, t.max_value),
        ParamType::String(t) => with_range("String", t.min_length, t.max_length),
        ParamType::Array(array) => {
            let inner = describe_type(&array.element_type);
            with_range(&format!("Array<{inner}>"), array.min_size, array.max_size)
        }
        ParamType::Enum(e) => format!("enum {}", e.name()),
        ParamType::EnumSubset(subset) => {
            let allowed: Vec<&str> = subset
                .allowed_elements
                .keys()
                .map(String::as_str)
                .collect();
            format!("enum {} {{{}}}", subset.enum_ref.name(), allowed.join(", "))
        }
        ParamType::Struct(s) => format!("struct {}", s.name()),
    }
}

fn with_range<T: std::fmt::Display>(name: &str, min: Option<T>, max: Option<T>) -> String {
    match (min, max) {
        (None, None) => name.to_string(),
        (min, max) => format!(
            "{name}[{}..{}]",
            min.map(|v| v.to_string()).unwrap_or_default(),
            max.map(|v| v.to_string()).unwrap_or_default()
        ),
    }
}

/// Renders every enum, struct and function of a model.
#[must_use]
pub fn render(model: &Model) -> String {
    let mut out = String::new();

    for (key, value) in model.params() {
        let _ = writeln!(out, "param {key} = {value}");
    }

    for enum_def in model.enums().values() {
        let _ = writeln!(out, "enum {} ({} elements)", enum_def.name(), enum_def.elements.len());
        for element in enum_def.elements.values() {
            match element.value {
                Some(value) => {
                    let _ = writeln!(out, "    {} = {}", element.primary_name(), value);
                }
                None => {
                    let _ = writeln!(out, "    {}", element.primary_name());
                }
            }
        }
    }

    for struct_def in model.structs().values() {
        let _ = writeln!(out, "struct {}", struct_def.name());
        for member in struct_def.members().values() {
            let optional = if member.is_mandatory { "" } else { "?" };
            let _ = writeln!(
                out,
                "    {}{}: {}",
                member.name(),
                optional,
                describe_type(&member.param_type)
            );
        }
    }

    for function in model.functions().values() {
        let _ = writeln!(
            out,
            "function {} [{} / {}]",
            function.name(),
            function.function_id.name(),
            function.message_type.name()
        );
        for param in function.params.values() {
            let optional = if param.is_mandatory { "" } else { "?" };
            let _ = writeln!(
                out,
                "    {}{}: {}",
                param.name(),
                optional,
                describe_type(&param.param_type)
            );
        }
    }

    out
}
