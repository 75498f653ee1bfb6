//! Parameter type construction.
//!
//! Builds [`ParamType`] values from `param` elements: primitive types from
//! their attributes, enum and struct references through the [`TypeIndex`],
//! arrays around either, and enum subsets from `element` children.

use crate::document::Element;
use crate::error::ParseError;
use crate::index::TypeIndex;
use crate::metadata::{Attributes, parse_base_item, parse_bool};
use crate::types::{
    ArrayType, BaseItem, BooleanType, DefaultValue, EnumElement, EnumSubset, FloatType,
    IntegerType, ParamType, StringType,
};
use crate::validation::{check_range, parse_float, parse_number, parse_size};
use indexmap::IndexMap;
use std::sync::Arc;

/// Where a parameter is declared and how to resolve its type names.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ParamContext<'a> {
    pub(crate) index: &'a TypeIndex,
    /// Name of the interface the declaration belongs to.
    pub(crate) interface: &'a str,
    /// Enclosing struct or function name.
    pub(crate) scope: &'a str,
    pub(crate) strict: bool,
}

/// Everything a struct member or function param is built from.
#[derive(Debug)]
pub(crate) struct ParamParts {
    pub(crate) base: BaseItem,
    pub(crate) is_mandatory: bool,
    pub(crate) param_type: ParamType,
    pub(crate) default_value: Option<DefaultValue>,
}

/// Parses a `param` element.
pub(crate) fn parse_param(
    element: &Element,
    ctx: ParamContext<'_>,
) -> Result<ParamParts, ParseError> {
    let parts = parse_base_item(element, "")?;
    let base = parts.base;
    let mut attributes = parts.attributes;
    let item = base.name.clone();

    let is_mandatory = attributes.take_bool("mandatory")?.unwrap_or(true);
    let type_name = attributes.require("type")?;
    let mut base_type = build_base_type(type_name, &item, &mut attributes, ctx)?;

    let mut allowed = Vec::new();
    for child in parts.children {
        if child.tag() != "element" {
            return Err(ParseError::unexpected_element(child.tag(), item.as_str()));
        }
        allowed.push(child);
    }
    if !allowed.is_empty() {
        base_type = build_enum_subset(&item, base_type, &allowed)?;
    }

    let default_value = match attributes.take("defvalue") {
        Some(value) => Some(resolve_reference_default(&item, &base_type, value)?),
        None => None,
    };

    let param_type = match attributes.take_bool("array")? {
        Some(true) => {
            let min_size = take_size(&mut attributes, &item, "minsize")?;
            let max_size = take_size(&mut attributes, &item, "maxsize")?;
            check_range(&item, "maxsize", min_size, max_size)?;
            ParamType::Array(ArrayType {
                element_type: Box::new(base_type),
                min_size,
                max_size,
            })
        }
        _ => base_type,
    };

    attributes.finish(ctx.strict)?;

    Ok(ParamParts {
        base,
        is_mandatory,
        param_type,
        default_value,
    })
}

/// Builds the non-array type named by `type_name`.
///
/// Primitive defaults are consumed here and stored in the type itself.
fn build_base_type(
    type_name: &str,
    item: &str,
    attributes: &mut Attributes<'_>,
    ctx: ParamContext<'_>,
) -> Result<ParamType, ParseError> {
    let param_type = match type_name {
        "Boolean" => ParamType::Boolean(BooleanType {
            default_value: attributes
                .take("defvalue")
                .map(|value| parse_bool(item, "defvalue", value))
                .transpose()?,
        }),
        "Integer" => {
            let mut take = |name: &str| {
                attributes
                    .take(name)
                    .map(|value| parse_number::<i64>(item, name, value))
                    .transpose()
            };
            let integer = IntegerType {
                min_value: take("minvalue")?,
                max_value: take("maxvalue")?,
                default_value: take("defvalue")?,
            };
            check_range(item, "maxvalue", integer.min_value, integer.max_value)?;
            ParamType::Integer(integer)
        }
        "Float" | "Double" => {
            let mut take = |name: &str| {
                attributes
                    .take(name)
                    .map(|value| parse_float(item, name, value))
                    .transpose()
            };
            let float = FloatType {
                min_value: take("minvalue")?,
                max_value: take("maxvalue")?,
                default_value: take("defvalue")?,
            };
            check_range(item, "maxvalue", float.min_value, float.max_value)?;
            ParamType::Float(float)
        }
        "String" => {
            let min_length = take_size(attributes, item, "minlength")?;
            let max_length = take_size(attributes, item, "maxlength")?;
            check_range(item, "maxlength", min_length, max_length)?;
            ParamType::String(StringType {
                min_length,
                max_length,
                default_value: attributes.take("defvalue").map(str::to_string),
            })
        }
        _ => resolve_named_type(type_name, item, ctx)?,
    };
    Ok(param_type)
}

/// Resolves an enum or struct name through the index.
///
/// `iface.Name` refers to `iface_Name`; a bare name refers to the current
/// interface first and to the name as written otherwise.
fn resolve_named_type(
    type_name: &str,
    item: &str,
    ctx: ParamContext<'_>,
) -> Result<ParamType, ParseError> {
    let resolved = if type_name.matches('.').count() == 1 {
        ctx.index.lookup(&type_name.replace('.', "_"))
    } else {
        ctx.index
            .lookup(&format!("{}_{type_name}", ctx.interface))
            .or_else(|| ctx.index.lookup(type_name))
    };

    resolved.ok_or_else(|| ParseError::UnknownType {
        type_name: type_name.to_string(),
        item: item.to_string(),
        scope: ctx.scope.to_string(),
    })
}

/// Restricts an enum type to the elements named by `element` children.
fn build_enum_subset(
    item: &str,
    base_type: ParamType,
    elements: &[&Element],
) -> Result<ParamType, ParseError> {
    let ParamType::Enum(enum_ref) = base_type else {
        return Err(ParseError::unexpected_element("element", item));
    };

    let mut allowed_elements: IndexMap<String, Arc<EnumElement>> = IndexMap::new();
    for element in elements {
        let name = element
            .attribute("name")
            .ok_or_else(|| ParseError::missing_attr(format!("element of '{item}'"), "name"))?;
        if allowed_elements.contains_key(name) {
            return Err(ParseError::duplicate("allowed element", name, item));
        }
        let full = enum_ref
            .element(name)
            .ok_or_else(|| ParseError::unknown_element(enum_ref.name(), name, item))?;
        allowed_elements.insert(name.to_string(), Arc::clone(full));
    }

    Ok(ParamType::EnumSubset(EnumSubset {
        name: item.to_string(),
        enum_ref,
        allowed_elements,
    }))
}

/// Resolves `defvalue` on an enum, enum subset or struct typed param.
fn resolve_reference_default(
    item: &str,
    base_type: &ParamType,
    value: &str,
) -> Result<DefaultValue, ParseError> {
    let element = match base_type {
        ParamType::Enum(enum_ref) => enum_ref.element(value),
        ParamType::EnumSubset(subset) => subset.allowed_elements.get(value),
        _ => return Err(ParseError::invalid_attr(item, "defvalue", value)),
    };
    let enum_name = base_type.as_enum().map_or("", |e| e.name());
    element
        .map(|element| DefaultValue::new(Arc::clone(element)))
        .ok_or_else(|| ParseError::unknown_element(enum_name, value, item))
}

fn take_size(
    attributes: &mut Attributes<'_>,
    item: &str,
    name: &str,
) -> Result<Option<u64>, ParseError> {
    attributes
        .take(name)
        .map(|value| parse_size(item, name, value))
        .transpose()
}
