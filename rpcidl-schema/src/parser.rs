//! Interface document parser.
//!
//! This module turns an interface document into a [`Model`]. The document is
//! read into an element tree first; the model is then built in passes over
//! all interfaces so that every type reference resolves whatever the
//! declaration order:
//!
//! 1. enums, registered in the [`TypeIndex`],
//! 2. struct shells, registered by name,
//! 3. struct bodies,
//! 4. functions, with FunctionID elements synthesized on the way.

use crate::document::{Document, Element};
use crate::error::ParseError;
use crate::functions::{Function, FunctionKey, FunctionParam};
use crate::index::TypeIndex;
use crate::metadata::parse_base_item;
use crate::model::{FUNCTION_ID_ENUM, MESSAGE_TYPE_ENUM, Model};
use crate::params::{ParamContext, parse_param};
use crate::types::{BaseItem, Enum, EnumElement, Struct, StructMember};
use crate::validation::{parse_number, validate_model};
use indexmap::IndexMap;
use std::path::Path;
use std::sync::Arc;

/// Elements of the predeclared messageType enum, in value order.
const MESSAGE_TYPES: [&str; 3] = ["request", "response", "notification"];

/// Parses an interface document from a string with default settings.
///
/// # Errors
/// Returns `ParseError` if the document is malformed or violates the schema.
pub fn parse_str(xml: &str) -> Result<Model, ParseError> {
    Parser::new().parse_str(xml)
}

/// Reads and parses an interface document with default settings.
///
/// # Errors
/// Returns `ParseError::Io` if the file cannot be read, otherwise as
/// [`parse_str`].
pub fn parse_file(path: impl AsRef<Path>) -> Result<Model, ParseError> {
    Parser::new().parse_file(path)
}

/// Configurable interface document parser.
#[derive(Debug, Clone, Copy, Default)]
pub struct Parser {
    strict_attributes: bool,
}

impl Parser {
    /// Creates a parser with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects unknown attributes instead of logging and ignoring them.
    #[must_use]
    pub fn strict_attributes(mut self, strict: bool) -> Self {
        self.strict_attributes = strict;
        self
    }

    /// Parses a document from a string.
    ///
    /// # Errors
    /// Returns `ParseError` if the document is malformed or violates the
    /// schema.
    pub fn parse_str(&self, xml: &str) -> Result<Model, ParseError> {
        self.parse_document(&Document::parse_str(xml)?)
    }

    /// Reads and parses a document from a file.
    ///
    /// # Errors
    /// Returns `ParseError::Io` if the file cannot be read, otherwise as
    /// [`Parser::parse_str`].
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<Model, ParseError> {
        let path = path.as_ref();
        tracing::debug!("Reading interface document {}", path.display());
        self.parse_document(&Document::read(path)?)
    }

    /// Builds a model from an already read document.
    ///
    /// # Errors
    /// Returns the first schema violation found.
    pub fn parse_document(&self, document: &Document) -> Result<Model, ParseError> {
        let root = document.root();
        if root.tag() != "interfaces" {
            return Err(ParseError::unexpected_element(root.tag(), "document"));
        }

        let mut builder = ModelBuilder::new(self.strict_attributes)?;
        for (name, value) in root.attributes() {
            builder.add_param(name.to_string(), value)?;
        }

        let interfaces = builder.collect_interfaces(root)?;
        for interface in &interfaces {
            builder.build_enums(interface)?;
        }
        let mut shells = Vec::new();
        for interface in &interfaces {
            shells.extend(builder.register_struct_shells(interface)?);
        }
        for shell in &shells {
            builder.fill_struct(shell)?;
        }
        for interface in &interfaces {
            builder.build_functions(interface)?;
        }

        builder.finish()
    }
}

/// One `interface` element and the prefix its items are registered under.
#[derive(Debug)]
struct InterfaceDecl<'d> {
    name: &'d str,
    prefix: String,
    element: &'d Element,
}

impl<'d> InterfaceDecl<'d> {
    fn items(&self, tag: &'static str) -> impl Iterator<Item = &'d Element> {
        self.element
            .children()
            .iter()
            .filter(move |child| child.tag() == tag)
    }
}

/// A registered struct waiting for its body.
#[derive(Debug)]
struct StructShell<'d> {
    interface: &'d str,
    struct_def: Arc<Struct>,
    members: Vec<&'d Element>,
}

/// Parse-local state: the type index plus everything built so far.
#[derive(Debug)]
struct ModelBuilder {
    strict: bool,
    index: TypeIndex,
    params: IndexMap<String, String>,
    message_type: Arc<Enum>,
    enums: IndexMap<String, Arc<Enum>>,
    structs: IndexMap<String, Arc<Struct>>,
    function_ids: IndexMap<String, Arc<EnumElement>>,
    functions: IndexMap<FunctionKey, Function>,
}

impl ModelBuilder {
    fn new(strict: bool) -> Result<Self, ParseError> {
        let message_type = Arc::new(message_type_enum());
        let mut index = TypeIndex::new();
        index.register_enum(Arc::clone(&message_type))?;

        Ok(Self {
            strict,
            index,
            params: IndexMap::new(),
            message_type,
            enums: IndexMap::new(),
            structs: IndexMap::new(),
            function_ids: IndexMap::new(),
            functions: IndexMap::new(),
        })
    }

    fn add_param(&mut self, key: String, value: &str) -> Result<(), ParseError> {
        if self.params.contains_key(&key) {
            return Err(ParseError::duplicate("interface parameter", key, "interfaces"));
        }
        self.params.insert(key, value.to_string());
        Ok(())
    }

    /// Checks the interface elements and records their attributes and
    /// documentation as params.
    fn collect_interfaces<'d>(
        &mut self,
        root: &'d Element,
    ) -> Result<Vec<InterfaceDecl<'d>>, ParseError> {
        let mut interfaces: Vec<InterfaceDecl<'d>> = Vec::new();

        for element in root.children() {
            if element.tag() != "interface" {
                return Err(ParseError::unexpected_element(element.tag(), "interfaces"));
            }
            let name = element
                .attribute("name")
                .ok_or_else(|| ParseError::missing_attr("interface", "name"))?;
            if interfaces.iter().any(|existing| existing.name == name) {
                return Err(ParseError::duplicate("interface", name, "interfaces"));
            }

            for (attribute, value) in element.attributes() {
                if !matches!(attribute, "name" | "platform") {
                    self.add_param(format!("{name}_{attribute}"), value)?;
                }
            }
            let parts = parse_base_item(element, "")?;
            self.add_interface_metadata(name, &parts.base)?;
            if let Some(child) = parts
                .children
                .iter()
                .find(|child| !matches!(child.tag(), "enum" | "struct" | "function"))
            {
                return Err(ParseError::unexpected_element(child.tag(), name));
            }

            interfaces.push(InterfaceDecl {
                name,
                prefix: format!("{name}_"),
                element,
            });
        }

        Ok(interfaces)
    }

    /// Stores interface documentation as `<interface>_<field>` params, one
    /// line per entry. Empty fields are skipped.
    fn add_interface_metadata(
        &mut self,
        interface: &str,
        base: &BaseItem,
    ) -> Result<(), ParseError> {
        if let Some(platform) = &base.platform {
            self.add_param(format!("{interface}_platform"), platform)?;
        }
        let issues: Vec<String> = base.issues.iter().map(|issue| issue.value.clone()).collect();
        let fields = [
            ("description", &base.description),
            ("design_description", &base.design_description),
            ("issues", &issues),
            ("todos", &base.todos),
        ];
        for (field, lines) in fields {
            if !lines.is_empty() {
                self.add_param(format!("{interface}_{field}"), &lines.join("\n"))?;
            }
        }
        Ok(())
    }

    fn build_enums(&mut self, interface: &InterfaceDecl<'_>) -> Result<(), ParseError> {
        for element in interface.items("enum") {
            let enum_def = Arc::new(self.build_enum(element, &interface.prefix)?);
            self.index.register_enum(Arc::clone(&enum_def))?;
            tracing::debug!(
                "Built enum '{}' with {} elements",
                enum_def.name(),
                enum_def.elements.len()
            );
            self.enums.insert(enum_def.name().to_string(), enum_def);
        }
        Ok(())
    }

    fn build_enum(&self, element: &Element, prefix: &str) -> Result<Enum, ParseError> {
        let parts = parse_base_item(element, prefix)?;
        let mut attributes = parts.attributes;
        let mut enum_def = Enum::new(parts.base);
        enum_def.internal_scope = attributes.take("internal_scope").map(str::to_string);
        attributes.finish(self.strict)?;

        for child in parts.children {
            if child.tag() != "element" {
                return Err(ParseError::unexpected_element(child.tag(), enum_def.name()));
            }
            let enum_element = self.build_enum_element(child)?;
            if enum_def.elements.contains_key(enum_element.name()) {
                return Err(ParseError::duplicate(
                    "enum element",
                    enum_element.name(),
                    enum_def.name(),
                ));
            }
            enum_def
                .elements
                .insert(enum_element.name().to_string(), Arc::new(enum_element));
        }

        Ok(enum_def)
    }

    /// Builds one enum element. `value` is set only when declared.
    fn build_enum_element(&self, element: &Element) -> Result<EnumElement, ParseError> {
        let parts = parse_base_item(element, "")?;
        let mut attributes = parts.attributes;
        let mut enum_element = EnumElement::new(parts.base);

        enum_element.internal_name = attributes.take("internal_name").map(str::to_string);
        enum_element.value = attributes
            .take("value")
            .map(|value| parse_number::<i64>(enum_element.name(), "value", value))
            .transpose()?;
        attributes.finish(self.strict)?;

        if let Some(child) = parts.children.first() {
            return Err(ParseError::unexpected_element(
                child.tag(),
                enum_element.name(),
            ));
        }

        Ok(enum_element)
    }

    /// Registers every struct of an interface as an empty shell.
    fn register_struct_shells<'d>(
        &mut self,
        interface: &InterfaceDecl<'d>,
    ) -> Result<Vec<StructShell<'d>>, ParseError> {
        let mut shells = Vec::new();

        for element in interface.items("struct") {
            let parts = parse_base_item(element, &interface.prefix)?;
            parts.attributes.finish(self.strict)?;

            let struct_def = Arc::new(Struct::shell(parts.base));
            self.index.register_struct(Arc::clone(&struct_def))?;
            self.structs
                .insert(struct_def.name().to_string(), Arc::clone(&struct_def));

            shells.push(StructShell {
                interface: interface.name,
                struct_def,
                members: parts.children,
            });
        }

        Ok(shells)
    }

    fn fill_struct(&self, shell: &StructShell<'_>) -> Result<(), ParseError> {
        let struct_name = shell.struct_def.name();
        let ctx = ParamContext {
            index: &self.index,
            interface: shell.interface,
            scope: struct_name,
            strict: self.strict,
        };

        let mut members: IndexMap<String, StructMember> = IndexMap::new();
        for element in &shell.members {
            if element.tag() != "param" {
                return Err(ParseError::unexpected_element(element.tag(), struct_name));
            }
            let parts = parse_param(element, ctx)?;
            let member = StructMember {
                base: parts.base,
                is_mandatory: parts.is_mandatory,
                param_type: parts.param_type,
                default_value: parts.default_value,
            };
            if members.contains_key(member.name()) {
                return Err(ParseError::duplicate(
                    "struct member",
                    member.name(),
                    struct_name,
                ));
            }
            members.insert(member.name().to_string(), member);
        }

        let count = members.len();
        shell.struct_def.fill(members).map_err(|_| {
            ParseError::duplicate("struct body", struct_name, shell.interface)
        })?;
        tracing::debug!("Built struct '{}' with {} members", struct_name, count);
        Ok(())
    }

    fn build_functions(&mut self, interface: &InterfaceDecl<'_>) -> Result<(), ParseError> {
        for element in interface.items("function") {
            let function = self.build_function(element, interface)?;
            let key = function.key();
            if self.functions.contains_key(&key) {
                return Err(ParseError::DuplicateFunctionSignature {
                    function: function.name().to_string(),
                    function_id: function.function_id.name().to_string(),
                    message_type: function.message_type.name().to_string(),
                });
            }
            tracing::debug!(
                "Built function '{}' ({}) with {} params",
                function.name(),
                function.message_type.name(),
                function.params.len()
            );
            self.functions.insert(key, function);
        }
        Ok(())
    }

    fn build_function(
        &mut self,
        element: &Element,
        interface: &InterfaceDecl<'_>,
    ) -> Result<Function, ParseError> {
        let parts = parse_base_item(element, &interface.prefix)?;
        let mut attributes = parts.attributes;
        let name = parts.base.name.clone();

        let message_type_name = match attributes.take("messagetype") {
            Some(value) => value,
            None => attributes.require("messageType")?,
        };
        let message_type = self
            .message_type
            .element(message_type_name)
            .cloned()
            .ok_or_else(|| {
                ParseError::unknown_element(MESSAGE_TYPE_ENUM, message_type_name, name.as_str())
            })?;
        attributes.finish(self.strict)?;

        let short_name = &name[interface.prefix.len()..];
        let function_id = self.provide_function_id(interface.name, short_name);

        let ctx = ParamContext {
            index: &self.index,
            interface: interface.name,
            scope: &name,
            strict: self.strict,
        };
        let mut params: IndexMap<String, FunctionParam> = IndexMap::new();
        for child in parts.children {
            if child.tag() != "param" {
                return Err(ParseError::unexpected_element(child.tag(), name.as_str()));
            }
            let parts = parse_param(child, ctx)?;
            let param = FunctionParam {
                base: parts.base,
                is_mandatory: parts.is_mandatory,
                param_type: parts.param_type,
                default_value: parts.default_value,
            };
            if params.contains_key(param.name()) {
                return Err(ParseError::duplicate(
                    "function parameter",
                    param.name(),
                    name.as_str(),
                ));
            }
            params.insert(param.name().to_string(), param);
        }

        Ok(Function {
            base: parts.base,
            interface: interface.name.to_string(),
            function_id,
            message_type,
            params,
        })
    }

    /// Returns the FunctionID element `interface.name`, creating it on first
    /// use with internal name `interface_name`.
    fn provide_function_id(&mut self, interface: &str, name: &str) -> Arc<EnumElement> {
        let qualified = format!("{interface}.{name}");
        let element = self.function_ids.entry(qualified).or_insert_with_key(|qualified| {
            tracing::trace!("Synthesized FunctionID element '{}'", qualified);
            let mut element = EnumElement::new(BaseItem::named(qualified.as_str()));
            element.internal_name = Some(format!("{interface}_{name}"));
            Arc::new(element)
        });
        Arc::clone(element)
    }

    fn finish(self) -> Result<Model, ParseError> {
        let mut function_id = Enum::new(BaseItem::named(FUNCTION_ID_ENUM));
        function_id.elements = self.function_ids;

        let mut enums = IndexMap::with_capacity(self.enums.len() + 2);
        enums.insert(FUNCTION_ID_ENUM.to_string(), Arc::new(function_id));
        enums.insert(MESSAGE_TYPE_ENUM.to_string(), self.message_type);
        enums.extend(self.enums);

        let model = Model::new(self.params, enums, self.structs, self.functions);
        validate_model(&model)?;

        tracing::info!(
            "Parsed interface model: {} enums, {} structs, {} functions",
            model.enums().len(),
            model.structs().len(),
            model.functions().len()
        );
        Ok(model)
    }
}

/// The request/response/notification enum shared by every function.
fn message_type_enum() -> Enum {
    let mut enum_def = Enum::new(BaseItem::named(MESSAGE_TYPE_ENUM));
    for (value, name) in (0_i64..).zip(MESSAGE_TYPES) {
        let mut element = EnumElement::new(BaseItem::named(name));
        element.value = Some(value);
        enum_def.elements.insert(name.to_string(), Arc::new(element));
    }
    enum_def
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DefaultValue, ParamType};

    const INTERFACES: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<interfaces attr1="v1" attr2="v2">
    <interface name="interface1" attribute1="value1" attribute2="value2">
        <designdescription>dd</designdescription>
        <issue creator="creator1">Issue1</issue>
        <issue creator="creator2">Issue2</issue>
        <struct name="struct1">
            <description>Struct description</description>
            <issue creator="creator1">Issue1</issue>
            <param name="member1" type="Integer" minvalue="11" maxvalue="100" array="true"/>
            <param name="member2" type="struct2" mandatory="false"/>
            <param name="member3" type="struct2" array="true" minsize="1" maxsize="5"/>
            <param name="member4" type="enum1" defvalue="element3"/>
        </struct>
        <enum name="enum1" internal_scope="scope">
            <description>Enum description</description>
            <todo>Todo1</todo>
            <element name="element1" internal_name="InternalName1" value="10"/>
            <element name="element2" value="11">
                <description>Element description</description>
            </element>
            <element name="element3" internal_name="InternalName3"/>
        </enum>
        <struct name="struct2">
            <param name="member1" type="interface2.struct3"/>
        </struct>
        <function name="Function1" messagetype="request">
            <description>Function description</description>
            <param name="param1" type="enum1">
                <element name="element1"/>
                <element name="element3"/>
            </param>
            <param name="param2" type="String" maxlength="20" defvalue="abc" mandatory="false"/>
            <param name="param3" type="interface2.enum2" defvalue="A"/>
        </function>
        <function name="Function1" messagetype="response">
            <param name="success" type="Boolean"/>
        </function>
    </interface>
    <interface name="interface2" attribute="value">
        <description>Interface2 description</description>
        <todo>i2 todo</todo>
        <enum name="enum2">
            <element name="A"/>
            <element name="B"/>
        </enum>
        <struct name="struct3">
            <param name="back" type="interface1.struct1" array="true"/>
        </struct>
        <function name="Function2" messagetype="notification"/>
    </interface>
</interfaces>"#;

    fn parse_fixture() -> Model {
        parse_str(INTERFACES).expect("Failed to parse interfaces")
    }

    #[test]
    fn test_params() {
        let model = parse_fixture();
        let params: Vec<_> = model
            .params()
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        assert_eq!(
            params,
            vec![
                ("attr1", "v1"),
                ("attr2", "v2"),
                ("interface1_attribute1", "value1"),
                ("interface1_attribute2", "value2"),
                ("interface1_design_description", "dd"),
                ("interface1_issues", "Issue1\nIssue2"),
                ("interface2_attribute", "value"),
                ("interface2_description", "Interface2 description"),
                ("interface2_todos", "i2 todo"),
            ]
        );
    }

    #[test]
    fn test_interface_platform_param() {
        let xml = r#"<interfaces>
            <interface name="i" platform="attr">
                <platform>android</platform>
            </interface>
            <interface name="j" platform="ios"/>
        </interfaces>"#;
        let model = parse_str(xml).expect("Failed to parse interfaces");
        assert_eq!(model.params().get("i_platform").map(String::as_str), Some("android"));
        assert_eq!(model.params().get("j_platform").map(String::as_str), Some("ios"));
        assert!(!model.params().contains_key("i_description"));
    }

    #[test]
    fn test_cyclic_structs_freed_with_model() {
        let xml = r#"<interfaces>
            <interface name="i">
                <struct name="a"><param name="b" type="b" mandatory="false"/></struct>
                <struct name="b"><param name="a" type="a" array="true"/></struct>
                <function name="f" messagetype="request"><param name="a" type="a"/></function>
            </interface>
        </interfaces>"#;
        let model = parse_str(xml).expect("Failed to parse interfaces");
        let a = model.struct_named("i_a").expect("struct a");
        let b = model.struct_named("i_b").expect("struct b");
        assert!(a.member("b").and_then(|m| m.param_type.as_struct()).expect("ref").ptr_eq(b));
        assert_eq!(Arc::strong_count(a), 1);
        assert_eq!(Arc::strong_count(b), 1);

        let weak_a = Arc::downgrade(a);
        let weak_b = Arc::downgrade(b);
        let handle = model
            .function("i.f", "request")
            .and_then(|f| f.param("a"))
            .and_then(|p| p.param_type.as_struct())
            .cloned()
            .expect("struct param");
        drop(model);

        assert!(weak_a.upgrade().is_none());
        assert!(weak_b.upgrade().is_none());
        assert!(handle.upgrade().is_none());
    }

    #[test]
    fn test_enums() {
        let model = parse_fixture();
        assert_eq!(
            model.enums().keys().collect::<Vec<_>>(),
            vec![
                "FunctionID",
                "messageType",
                "interface1_enum1",
                "interface2_enum2"
            ]
        );

        let enum1 = model.enum_named("interface1_enum1").expect("enum1");
        assert_eq!(enum1.internal_scope.as_deref(), Some("scope"));
        assert_eq!(enum1.base.description, vec!["Enum description"]);
        assert_eq!(enum1.base.todos, vec!["Todo1"]);

        let element1 = &enum1.elements["element1"];
        assert_eq!(element1.internal_name.as_deref(), Some("InternalName1"));
        assert_eq!(element1.value, Some(10));
        let element2 = &enum1.elements["element2"];
        assert_eq!(element2.internal_name, None);
        assert_eq!(element2.value, Some(11));
        assert_eq!(element2.base.description, vec!["Element description"]);
        let element3 = &enum1.elements["element3"];
        assert_eq!(element3.internal_name.as_deref(), Some("InternalName3"));
        assert_eq!(element3.value, None);

        let message_type = model.enum_named("messageType").expect("messageType");
        let values: Vec<_> = message_type
            .elements
            .values()
            .map(|e| (e.name(), e.value))
            .collect();
        assert_eq!(
            values,
            vec![
                ("request", Some(0)),
                ("response", Some(1)),
                ("notification", Some(2))
            ]
        );
    }

    #[test]
    fn test_struct_members() {
        let model = parse_fixture();
        assert_eq!(
            model.structs().keys().collect::<Vec<_>>(),
            vec!["interface1_struct1", "interface1_struct2", "interface2_struct3"]
        );

        let struct1 = model.struct_named("interface1_struct1").expect("struct1");
        assert_eq!(struct1.base.description, vec!["Struct description"]);
        assert_eq!(struct1.base.issues[0].creator, "creator1");
        assert_eq!(struct1.base.issues[0].value, "Issue1");

        let member1 = struct1.member("member1").expect("member1");
        assert!(member1.is_mandatory);
        let ParamType::Array(array) = &member1.param_type else {
            panic!("expected array");
        };
        assert_eq!((array.min_size, array.max_size), (None, None));
        let ParamType::Integer(integer) = array.element_type.as_ref() else {
            panic!("expected integer");
        };
        assert_eq!((integer.min_value, integer.max_value), (Some(11), Some(100)));

        let member2 = struct1.member("member2").expect("member2");
        assert!(!member2.is_mandatory);

        let member3 = struct1.member("member3").expect("member3");
        let ParamType::Array(array) = &member3.param_type else {
            panic!("expected array");
        };
        assert_eq!((array.min_size, array.max_size), (Some(1), Some(5)));

        let member4 = struct1.member("member4").expect("member4");
        let enum1 = model.enum_named("interface1_enum1").expect("enum1");
        let default = member4
            .default_value
            .as_ref()
            .map(DefaultValue::element)
            .expect("enum default");
        assert!(Arc::ptr_eq(default, &enum1.elements["element3"]));
    }

    #[test]
    fn test_forward_and_backward_references_share_identity() {
        let model = parse_fixture();
        let struct1 = model.struct_named("interface1_struct1").expect("struct1");
        let struct2 = model.struct_named("interface1_struct2").expect("struct2");
        let struct3 = model.struct_named("interface2_struct3").expect("struct3");

        let plain = struct1.member("member2").expect("member2");
        let in_array = struct1.member("member3").expect("member3");
        assert!(plain.param_type.as_struct().expect("struct").ptr_eq(struct2));
        assert!(
            in_array
                .param_type
                .base_type()
                .as_struct()
                .expect("struct")
                .ptr_eq(struct2)
        );

        let forward = struct2.member("member1").expect("member1");
        assert!(forward.param_type.as_struct().expect("struct").ptr_eq(struct3));

        let back = struct3.member("back").expect("back");
        let back_ref = back.param_type.base_type().as_struct().expect("struct");
        assert!(back_ref.ptr_eq(struct1));
        let resolved = model.resolve_struct(back_ref).expect("resolved struct");
        assert_eq!(resolved.members().len(), 4);
    }

    #[test]
    fn test_functions() {
        let model = parse_fixture();
        assert_eq!(model.functions().len(), 3);

        let function_id = model.function_id("interface1.Function1").expect("function id");
        assert_eq!(
            function_id.internal_name.as_deref(),
            Some("interface1_Function1")
        );
        let request = model.message_type("request").expect("request");
        let key = FunctionKey::new(Arc::clone(function_id), Arc::clone(request));
        let function = model.get_function(&key).expect("function");
        assert_eq!(function.name(), "interface1_Function1");
        assert_eq!(function.interface, "interface1");
        assert_eq!(function.base.description, vec!["Function description"]);

        let response = model
            .function("interface1.Function1", "response")
            .expect("response");
        assert!(Arc::ptr_eq(&response.function_id, function_id));
        assert!(model.function("interface1.Function1", "notification").is_none());
        assert!(model.function("interface2.Function2", "notification").is_some());

        let function_ids = model.enum_named("FunctionID").expect("FunctionID");
        assert_eq!(
            function_ids.elements.keys().collect::<Vec<_>>(),
            vec!["interface1.Function1", "interface2.Function2"]
        );
    }

    #[test]
    fn test_function_params() {
        let model = parse_fixture();
        let function = model
            .function("interface1.Function1", "request")
            .expect("function");
        let enum1 = model.enum_named("interface1_enum1").expect("enum1");

        let param1 = function.param("param1").expect("param1");
        assert!(param1.is_mandatory);
        let ParamType::EnumSubset(subset) = &param1.param_type else {
            panic!("expected enum subset");
        };
        assert!(Arc::ptr_eq(&subset.enum_ref, enum1));
        assert_eq!(
            subset.allowed_elements.keys().collect::<Vec<_>>(),
            vec!["element1", "element3"]
        );
        assert!(Arc::ptr_eq(
            &subset.allowed_elements["element1"],
            &enum1.elements["element1"]
        ));
        assert!(Arc::ptr_eq(
            &subset.allowed_elements["element3"],
            &enum1.elements["element3"]
        ));

        let param2 = function.param("param2").expect("param2");
        assert!(!param2.is_mandatory);
        assert!(param2.default_value.is_none());
        let ParamType::String(string) = &param2.param_type else {
            panic!("expected string");
        };
        assert_eq!(string.max_length, Some(20));
        assert_eq!(string.default_value.as_deref(), Some("abc"));

        let param3 = function.param("param3").expect("param3");
        let enum2 = model.enum_named("interface2_enum2").expect("enum2");
        let default = param3
            .default_value
            .as_ref()
            .map(DefaultValue::element)
            .expect("enum default");
        assert!(Arc::ptr_eq(default, &enum2.elements["A"]));
    }

    #[test]
    fn test_duplicate_function_signature() {
        let xml = r#"<interfaces>
            <interface name="interface1">
                <function name="Function1" messagetype="request"/>
                <function name="Function1" messagetype="request"/>
            </interface>
        </interfaces>"#;
        let result = parse_str(xml);
        assert!(matches!(
            result,
            Err(ParseError::DuplicateFunctionSignature { ref function_id, ref message_type, .. })
                if function_id == "interface1.Function1" && message_type == "request"
        ));
    }

    #[test]
    fn test_duplicate_names() {
        let cases = [
            r#"<interfaces><interface name="i">
                <enum name="e"><element name="a"/><element name="a"/></enum>
            </interface></interfaces>"#,
            r#"<interfaces><interface name="i">
                <struct name="s"><param name="m" type="Integer"/><param name="m" type="String"/></struct>
            </interface></interfaces>"#,
            r#"<interfaces><interface name="i">
                <enum name="x"/><struct name="x"/>
            </interface></interfaces>"#,
            r#"<interfaces><interface name="i">
                <function name="f" messagetype="request">
                    <param name="p" type="Integer"/><param name="p" type="Integer"/>
                </function>
            </interface></interfaces>"#,
            r#"<interfaces i_a="1"><interface name="i" a="2"/></interfaces>"#,
        ];
        for xml in cases {
            let result = parse_str(xml);
            assert!(
                matches!(result, Err(ParseError::DuplicateName { .. })),
                "expected duplicate name for {xml}, got {result:?}"
            );
        }
    }

    #[test]
    fn test_schema_errors() {
        let unknown_type = r#"<interfaces><interface name="i">
            <struct name="s"><param name="m" type="Missing"/></struct>
        </interface></interfaces>"#;
        assert!(matches!(
            parse_str(unknown_type),
            Err(ParseError::UnknownType { ref type_name, ref scope, .. })
                if type_name == "Missing" && scope == "i_s"
        ));

        let bad_message_type = r#"<interfaces><interface name="i">
            <function name="f" messagetype="event"/>
        </interface></interfaces>"#;
        assert!(matches!(
            parse_str(bad_message_type),
            Err(ParseError::UnknownEnumElement { .. })
        ));

        let missing_message_type = r#"<interfaces><interface name="i">
            <function name="f"/>
        </interface></interfaces>"#;
        assert!(matches!(
            parse_str(missing_message_type),
            Err(ParseError::MissingAttribute { .. })
        ));

        let bad_value = r#"<interfaces><interface name="i">
            <enum name="e"><element name="a" value="ten"/></enum>
        </interface></interfaces>"#;
        assert!(matches!(
            parse_str(bad_value),
            Err(ParseError::InvalidBound { .. })
        ));

        let wrong_root = "<interface name=\"i\"/>";
        assert!(matches!(
            parse_str(wrong_root),
            Err(ParseError::UnexpectedElement { .. })
        ));

        let stray_child = r#"<interfaces><interface name="i"><typedef name="t"/></interface></interfaces>"#;
        assert!(matches!(
            parse_str(stray_child),
            Err(ParseError::UnexpectedElement { .. })
        ));

        let malformed = "<interfaces><interface name=\"i\"></interfaces>";
        assert!(matches!(
            parse_str(malformed),
            Err(ParseError::MalformedDocument { .. })
        ));
    }

    #[test]
    fn test_strict_attributes() {
        let xml = r#"<interfaces><interface name="i">
            <enum name="e" color="blue"><element name="a"/></enum>
        </interface></interfaces>"#;
        assert!(parse_str(xml).is_ok());
        assert!(matches!(
            Parser::new().strict_attributes(true).parse_str(xml),
            Err(ParseError::UnexpectedAttribute { .. })
        ));
    }

    #[test]
    fn test_independent_parses() {
        let first = parse_fixture();
        let second = parse_fixture();
        let a = first.struct_named("interface1_struct1").expect("struct1");
        let b = second.struct_named("interface1_struct1").expect("struct1");
        assert!(!Arc::ptr_eq(a, b));

        let handle = a
            .member("member2")
            .and_then(|member| member.param_type.as_struct())
            .expect("struct member");
        assert!(first.resolve_struct(handle).is_some());
        assert!(second.resolve_struct(handle).is_none());
    }

    #[test]
    fn test_parse_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("interfaces.xml");
        std::fs::write(&path, INTERFACES).expect("write fixture");
        let model = parse_file(&path).expect("Failed to parse file");
        assert_eq!(model.functions().len(), 3);

        let missing = parse_file(dir.path().join("missing.xml"));
        assert!(matches!(missing, Err(ParseError::Io(_))));
    }
}
