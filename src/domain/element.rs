//! Declarative element model
//!
//! Node types are declared once into a [`Schema`], which validates the
//! declaration before registering it. Instances of a declared type carry
//! optional text, one stored value per declared attribute and an ordered list
//! of exclusively owned children.
//!
//! ```ignore
//! let mut schema = Schema::new();
//! let author = schema.declare(ElementDecl::new("Author", "author"))?;
//! let book = schema.declare(
//!     ElementDecl::new("Book", "book")
//!         .attribute("name")
//!         .attribute("price")
//!         .child("Author"),
//! )?;
//!
//! let mut b = Element::construct(&book, None, &[("name", "learning rust".into())])?;
//! b.append(Element::with_text(&author, "aaa")?)?;
//! // <book name="learning rust"><author>aaa</author></book>
//! let xml = b.build().to_xml_string()?;
//! ```

use std::fmt;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::xml::XmlNode;

/// Value handed to an attribute setter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrValue {
    Str(String),
    Bool(bool),
}

impl AttrValue {
    /// Empty strings and `false` are falsy, everything else is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            AttrValue::Str(s) => !s.is_empty(),
            AttrValue::Bool(b) => *b,
        }
    }

    /// Rendering used by the pass-through setter.
    pub fn render(&self) -> String {
        match self {
            AttrValue::Str(s) => s.clone(),
            AttrValue::Bool(b) => b.to_string(),
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        AttrValue::Str(s.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        AttrValue::Str(s)
    }
}

impl From<bool> for AttrValue {
    fn from(b: bool) -> Self {
        AttrValue::Bool(b)
    }
}

/// Attribute setter: maps an incoming value (or absence) to the stored form.
///
/// Returning `Ok(None)` leaves the attribute absent, so it is not serialized.
pub type Setter = Arc<dyn Fn(Option<AttrValue>) -> DomainResult<Option<String>> + Send + Sync>;

fn pass_through() -> Setter {
    Arc::new(|value: Option<AttrValue>| Ok(value.map(|v| v.render())))
}

/// Declaration of a single attribute.
pub struct AttributeDecl {
    name: String,
    setter: Option<Setter>,
}

impl AttributeDecl {
    /// Attribute with the default pass-through setter.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            setter: None,
        }
    }

    /// Replace the pass-through setter with a custom one.
    pub fn with_setter<F>(mut self, setter: F) -> Self
    where
        F: Fn(Option<AttrValue>) -> DomainResult<Option<String>> + Send + Sync + 'static,
    {
        self.setter = Some(Arc::new(setter));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Declaration of a node type, validated by [`Schema::declare`].
pub struct ElementDecl {
    type_name: String,
    element_name: String,
    attributes: Vec<AttributeDecl>,
    children: Vec<String>,
}

impl ElementDecl {
    /// `type_name` identifies the type in messages and child whitelists,
    /// `element_name` is the serialized tag.
    pub fn new(type_name: impl Into<String>, element_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            element_name: element_name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Add an attribute with the pass-through setter.
    pub fn attribute(self, name: impl Into<String>) -> Self {
        self.attribute_decl(AttributeDecl::new(name))
    }

    pub fn attribute_decl(mut self, decl: AttributeDecl) -> Self {
        self.attributes.push(decl);
        self
    }

    /// Permit children of an already declared type.
    pub fn child(mut self, type_name: impl Into<String>) -> Self {
        self.children.push(type_name.into());
        self
    }
}

struct Attribute {
    name: String,
    setter: Setter,
}

/// A validated node type. Only obtainable through [`Schema::declare`].
pub struct ElementType {
    type_name: String,
    element_name: String,
    attributes: Vec<Attribute>,
    children: Vec<Arc<ElementType>>,
}

impl ElementType {
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn element_name(&self) -> &str {
        &self.element_name
    }

    /// Declared attribute names in declaration order.
    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.attributes.iter().map(|a| a.name.as_str())
    }

    pub fn allowed_children(&self) -> &[Arc<ElementType>] {
        &self.children
    }

    /// Exact membership test against the whitelist.
    pub fn allows(&self, child: &Arc<ElementType>) -> bool {
        self.children.iter().any(|allowed| Arc::ptr_eq(allowed, child))
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.attributes.iter().position(|a| a.name == name)
    }
}

impl fmt::Debug for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementType")
            .field("type_name", &self.type_name)
            .field("element_name", &self.element_name)
            .field("attributes", &self.attribute_names().collect::<Vec<_>>())
            .field(
                "children",
                &self
                    .children
                    .iter()
                    .map(|c| c.type_name())
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// `[A-Za-z_][A-Za-z0-9._-]*`; colons are rejected since namespaces are unsupported.
fn is_xml_name(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_'))
        }
        _ => false,
    }
}

/// Registry of declared node types.
#[derive(Debug, Default)]
pub struct Schema {
    types: Vec<Arc<ElementType>>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate `decl` and register it.
    ///
    /// Child whitelist entries must name types already declared in this
    /// schema. On error nothing is registered.
    pub fn declare(&mut self, decl: ElementDecl) -> DomainResult<Arc<ElementType>> {
        let ElementDecl {
            type_name,
            element_name,
            attributes,
            children,
        } = decl;

        let fail = |reason: String| DomainError::Definition {
            type_name: type_name.clone(),
            reason,
        };

        if type_name.is_empty() {
            return Err(fail("type name must not be empty".into()));
        }
        if self.get(&type_name).is_some() {
            return Err(fail("type name already declared".into()));
        }
        if !is_xml_name(&element_name) {
            return Err(fail(format!(
                "element name must be an xml name: {element_name:?}"
            )));
        }

        let mut resolved_attrs: Vec<Attribute> = Vec::with_capacity(attributes.len());
        for attr in attributes {
            if !is_xml_name(&attr.name) {
                return Err(fail(format!(
                    "attribute name must be an xml name: {:?}",
                    attr.name
                )));
            }
            if resolved_attrs.iter().any(|a| a.name == attr.name) {
                return Err(fail(format!("duplicate attribute: {:?}", attr.name)));
            }
            resolved_attrs.push(Attribute {
                setter: attr.setter.unwrap_or_else(pass_through),
                name: attr.name,
            });
        }

        let mut resolved_children: Vec<Arc<ElementType>> = Vec::with_capacity(children.len());
        for child in &children {
            let ty = self
                .get(child)
                .ok_or_else(|| fail(format!("child is not a declared element type: {child:?}")))?;
            if !resolved_children.iter().any(|c| Arc::ptr_eq(c, &ty)) {
                resolved_children.push(ty);
            }
        }

        let ty = Arc::new(ElementType {
            type_name,
            element_name,
            attributes: resolved_attrs,
            children: resolved_children,
        });
        debug!("declare: {:?}", ty);
        self.types.push(Arc::clone(&ty));
        Ok(ty)
    }

    /// Look up a declared type by its type name.
    pub fn get(&self, type_name: &str) -> Option<Arc<ElementType>> {
        self.types
            .iter()
            .find(|t| t.type_name == type_name)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// An instance of a declared node type.
pub struct Element {
    ty: Arc<ElementType>,
    text: Option<String>,
    values: Vec<Option<String>>,
    children: Vec<Element>,
}

impl Element {
    /// Instance without text or attribute values.
    ///
    /// Setters still run (with absent values), so defaults such as generated
    /// identifiers are applied.
    pub fn new(ty: &Arc<ElementType>) -> DomainResult<Self> {
        Self::construct(ty, None, &[])
    }

    pub fn with_text(ty: &Arc<ElementType>, text: impl Into<String>) -> DomainResult<Self> {
        let text = text.into();
        Self::construct(ty, Some(&text), &[])
    }

    /// Create an instance, routing every declared attribute through its setter.
    ///
    /// Keys in `values` that are not declared attributes are ignored. When a
    /// key repeats, the last value wins.
    pub fn construct(
        ty: &Arc<ElementType>,
        text: Option<&str>,
        values: &[(&str, AttrValue)],
    ) -> DomainResult<Self> {
        let mut stored = Vec::with_capacity(ty.attributes.len());
        for attr in &ty.attributes {
            let supplied = values
                .iter()
                .rev()
                .find(|(name, _)| *name == attr.name)
                .map(|(_, v)| v.clone());
            stored.push((attr.setter)(supplied)?);
        }
        for (name, _) in values {
            if ty.position(name).is_none() {
                trace!("construct: {} ignores unknown key {:?}", ty.type_name, name);
            }
        }

        Ok(Self {
            ty: Arc::clone(ty),
            text: text.map(str::to_string),
            values: stored,
            children: Vec::new(),
        })
    }

    pub fn element_type(&self) -> &Arc<ElementType> {
        &self.ty
    }

    /// Whether this instance is of exactly the given type.
    pub fn is_a(&self, ty: &Arc<ElementType>) -> bool {
        Arc::ptr_eq(&self.ty, ty)
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// Mutable access to a direct child by position.
    pub fn child_mut(&mut self, index: usize) -> Option<&mut Element> {
        self.children.get_mut(index)
    }

    pub fn has_child_of(&self, ty: &Arc<ElementType>) -> bool {
        self.children.iter().any(|c| c.is_a(ty))
    }

    /// Stored value of a declared attribute, `None` when absent or undeclared.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.ty
            .position(name)
            .and_then(|i| self.values[i].as_deref())
    }

    /// Assign an attribute through its setter. On error the stored value is unchanged.
    pub fn set(&mut self, name: &str, value: Option<AttrValue>) -> DomainResult<()> {
        let idx = self
            .ty
            .position(name)
            .ok_or_else(|| DomainError::UnknownAttribute {
                element: self.ty.type_name.clone(),
                name: name.to_string(),
            })?;
        self.values[idx] = (self.ty.attributes[idx].setter)(value)?;
        Ok(())
    }

    /// Present attributes in declaration order.
    pub fn attributes(&self) -> Vec<(&str, &str)> {
        self.ty
            .attributes
            .iter()
            .zip(&self.values)
            .filter_map(|(attr, value)| value.as_deref().map(|v| (attr.name.as_str(), v)))
            .collect()
    }

    /// Append a child of an allowed type; returns `self` for chaining.
    pub fn append(&mut self, child: Element) -> DomainResult<&mut Self> {
        if !self.ty.allows(&child.ty) {
            debug!(
                "append: {} rejects child {}",
                self.ty.type_name, child.ty.type_name
            );
            return Err(DomainError::ChildNotAllowed {
                parent: self.ty.type_name.clone(),
                allowed: self
                    .ty
                    .children
                    .iter()
                    .map(|c| c.type_name.clone())
                    .collect(),
                got: child.ty.type_name.clone(),
            });
        }
        self.children.push(child);
        Ok(self)
    }

    /// Build a detached tree rooted at this element.
    pub fn build(&self) -> XmlNode {
        let mut node = XmlNode::new(&self.ty.element_name);
        self.fill(&mut node);
        node
    }

    /// Build this element as the last child of `parent`.
    pub fn build_into<'a>(&self, parent: &'a mut XmlNode) -> &'a mut XmlNode {
        let node = parent.push_child(XmlNode::new(&self.ty.element_name));
        self.fill(node);
        node
    }

    fn fill(&self, node: &mut XmlNode) {
        for (name, value) in self.attributes() {
            node.attributes.push((name.to_string(), value.to_string()));
        }
        if let Some(text) = self.text.as_deref().filter(|t| !t.is_empty()) {
            node.text = Some(text.to_string());
        }
        for child in &self.children {
            child.build_into(node);
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let attrs = self
            .attributes()
            .iter()
            .map(|(k, v)| format!("{k:?}: {v:?}"))
            .collect::<Vec<_>>()
            .join(", ");
        write!(
            f,
            "<{} (name=\"{}\" text=\"{}\" attributes=\"{{{}}}\")>",
            self.ty.type_name,
            self.ty.element_name,
            self.text.as_deref().unwrap_or("None"),
            attrs
        )
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("type_name", &self.ty.type_name)
            .field("text", &self.text)
            .field("attributes", &self.attributes())
            .field("children", &self.children)
            .finish()
    }
}
