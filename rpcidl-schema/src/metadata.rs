//! Shared parsing of names, documentation children and attributes.

use crate::document::Element;
use crate::error::ParseError;
use crate::types::{BaseItem, Issue};

/// Lifecycle attributes accepted everywhere and not modelled.
const IGNORED_ATTRIBUTES: &[&str] = &["scope", "since", "until", "deprecated", "removed", "history"];

/// Attributes of one element, consumed as the builders recognise them.
#[derive(Debug)]
pub(crate) struct Attributes<'a> {
    context: String,
    remaining: Vec<(&'a str, &'a str)>,
}

impl<'a> Attributes<'a> {
    pub(crate) fn of(element: &'a Element) -> Self {
        Self {
            context: element.tag().to_string(),
            remaining: element.attributes().collect(),
        }
    }

    /// Names the owning item in later error messages.
    pub(crate) fn set_context(&mut self, context: impl Into<String>) {
        self.context = context.into();
    }

    pub(crate) fn context(&self) -> &str {
        &self.context
    }

    /// Removes and returns an attribute value.
    pub(crate) fn take(&mut self, name: &str) -> Option<&'a str> {
        let position = self.remaining.iter().position(|(key, _)| *key == name)?;
        Some(self.remaining.remove(position).1)
    }

    /// Removes and returns a required attribute value.
    pub(crate) fn require(&mut self, name: &str) -> Result<&'a str, ParseError> {
        self.take(name)
            .ok_or_else(|| ParseError::missing_attr(self.context.as_str(), name))
    }

    /// Removes and parses a boolean attribute.
    pub(crate) fn take_bool(&mut self, name: &str) -> Result<Option<bool>, ParseError> {
        self.take(name)
            .map(|value| parse_bool(&self.context, name, value))
            .transpose()
    }

    /// Reports attributes nobody consumed.
    pub(crate) fn finish(self, strict: bool) -> Result<(), ParseError> {
        for (name, value) in self.remaining {
            if IGNORED_ATTRIBUTES.contains(&name) {
                continue;
            }
            if strict {
                return Err(ParseError::UnexpectedAttribute {
                    element: self.context,
                    attribute: name.to_string(),
                });
            }
            tracing::warn!(
                "Ignoring unknown attribute '{}'='{}' on '{}'",
                name,
                value,
                self.context
            );
        }
        Ok(())
    }
}

/// Parses a boolean literal.
///
/// # Errors
/// Returns `ParseError::InvalidAttribute` for anything but `true`, `1`,
/// `false` and `0`.
pub fn parse_bool(element: &str, attribute: &str, value: &str) -> Result<bool, ParseError> {
    match value.trim() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(ParseError::invalid_attr(element, attribute, value)),
    }
}

/// Name, documentation and the still unparsed rest of an element.
#[derive(Debug)]
pub(crate) struct ItemParts<'a> {
    pub(crate) base: BaseItem,
    pub(crate) attributes: Attributes<'a>,
    pub(crate) children: Vec<&'a Element>,
}

/// Extracts the name (with `prefix` prepended) and the documentation
/// children of any named element.
pub(crate) fn parse_base_item<'a>(
    element: &'a Element,
    prefix: &str,
) -> Result<ItemParts<'a>, ParseError> {
    let mut attributes = Attributes::of(element);
    let name = format!("{prefix}{}", attributes.require("name")?);
    attributes.set_context(name.as_str());

    let mut base = BaseItem::named(name);
    base.platform = attributes.take("platform").map(str::to_string);

    let mut children = Vec::new();
    for child in element.children() {
        match child.tag() {
            "description" => base.description.push(child.text().to_string()),
            "designdescription" => base.design_description.push(child.text().to_string()),
            "todo" => base.todos.push(child.text().to_string()),
            "issue" => base.issues.push(parse_issue(child)),
            "platform" => base.platform = Some(child.text().to_string()),
            _ => children.push(child),
        }
    }

    Ok(ItemParts {
        base,
        attributes,
        children,
    })
}

fn parse_issue(element: &Element) -> Issue {
    Issue {
        creator: element.attribute("creator").unwrap_or_default().to_string(),
        value: element.text().to_string(),
    }
}
