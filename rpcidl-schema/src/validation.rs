//! Schema validation utilities.
//!
//! Literal and bound checks used while building, and a consistency pass over
//! a finished model.

use crate::error::ParseError;
use crate::model::Model;
use crate::types::ParamType;
use std::fmt::Display;
use std::str::FromStr;
use std::sync::Arc;

/// Parses a numeric attribute value.
///
/// # Errors
/// Returns `ParseError::InvalidBound` if the value is not a number.
pub fn parse_number<T: FromStr>(item: &str, attribute: &str, value: &str) -> Result<T, ParseError> {
    value.trim().parse().map_err(|_| {
        ParseError::invalid_bound(item, attribute, format!("'{value}' is not a valid number"))
    })
}

/// Parses a finite floating point attribute value.
///
/// # Errors
/// Returns `ParseError::InvalidBound` if the value is not a finite number.
pub fn parse_float(item: &str, attribute: &str, value: &str) -> Result<f64, ParseError> {
    let number: f64 = parse_number(item, attribute, value)?;
    if !number.is_finite() {
        return Err(ParseError::invalid_bound(
            item,
            attribute,
            format!("'{value}' is not a finite number"),
        ));
    }
    Ok(number)
}

/// Parses a length or size attribute value.
///
/// # Errors
/// Returns `ParseError::InvalidBound` if the value is not an integer or is
/// negative.
pub fn parse_size(item: &str, attribute: &str, value: &str) -> Result<u64, ParseError> {
    let number: i64 = parse_number(item, attribute, value)?;
    u64::try_from(number).map_err(|_| {
        ParseError::invalid_bound(item, attribute, format!("{number} must not be negative"))
    })
}

/// Checks that a declared minimum does not exceed a declared maximum.
///
/// # Errors
/// Returns `ParseError::InvalidBound` naming the maximum attribute.
pub fn check_range<T: PartialOrd + Display>(
    item: &str,
    max_attribute: &str,
    min: Option<T>,
    max: Option<T>,
) -> Result<(), ParseError> {
    match (min, max) {
        (Some(min), Some(max)) if min > max => Err(ParseError::invalid_bound(
            item,
            max_attribute,
            format!("maximum {max} is less than minimum {min}"),
        )),
        _ => Ok(()),
    }
}

/// Validates a finished model.
///
/// # Errors
/// Returns `ParseError` if a struct body was never built, a struct handle
/// points outside the model, an enum subset is not a subset of its enum, or
/// declared bounds are inconsistent.
pub fn validate_model(model: &Model) -> Result<(), ParseError> {
    for struct_def in model.structs().values() {
        if !struct_def.is_filled() {
            return Err(ParseError::malformed(format!(
                "struct '{}' was registered but never built",
                struct_def.name()
            )));
        }
        for member in struct_def.members().values() {
            validate_param_type(model, member.name(), &member.param_type)?;
        }
    }

    for function in model.functions().values() {
        for param in function.params.values() {
            validate_param_type(model, param.name(), &param.param_type)?;
        }
    }

    Ok(())
}

fn validate_param_type(
    model: &Model,
    item: &str,
    param_type: &ParamType,
) -> Result<(), ParseError> {
    match param_type {
        ParamType::Integer(t) => check_range(item, "maxvalue", t.min_value, t.max_value),
        ParamType::Float(t) => check_range(item, "maxvalue", t.min_value, t.max_value),
        ParamType::String(t) => check_range(item, "maxlength", t.min_length, t.max_length),
        ParamType::Array(array) => {
            check_range(item, "maxsize", array.min_size, array.max_size)?;
            validate_param_type(model, item, &array.element_type)
        }
        ParamType::EnumSubset(subset) => {
            for (name, allowed) in &subset.allowed_elements {
                let same = subset
                    .enum_ref
                    .element(name)
                    .is_some_and(|full| Arc::ptr_eq(full, allowed));
                if !same {
                    return Err(ParseError::unknown_element(
                        subset.enum_ref.name(),
                        name.as_str(),
                        item,
                    ));
                }
            }
            Ok(())
        }
        ParamType::Struct(handle) => match model.resolve_struct(handle) {
            Some(_) => Ok(()),
            None => Err(ParseError::UnknownType {
                type_name: handle.name().to_string(),
                item: item.to_string(),
                scope: "model".to_string(),
            }),
        },
        ParamType::Boolean(_) | ParamType::Enum(_) => Ok(()),
    }
}
