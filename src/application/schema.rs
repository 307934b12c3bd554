//! Script-filter result vocabulary
//!
//! Declares the fixed node types of a result list on top of the generic
//! element model:
//!
//! ```text
//! items
//! └── item (uid, arg, valid, autocomplete, type)
//!     ├── title
//!     ├── subtitle (mod)
//!     ├── icon (type)
//!     └── text (type)
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::domain::{
    AttrValue, AttributeDecl, DomainError, DomainResult, Element, ElementDecl, ElementType, Schema,
};
use crate::infrastructure::traits::UidGenerator;

/// Modifier key a subtitle variant is shown for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Modifier {
    Shift,
    Fn,
    Ctrl,
    Alt,
    Cmd,
}

impl Modifier {
    pub const ALL: [Modifier; 5] = [
        Modifier::Shift,
        Modifier::Fn,
        Modifier::Ctrl,
        Modifier::Alt,
        Modifier::Cmd,
    ];
    pub const NAMES: &'static [&'static str] = &["shift", "fn", "ctrl", "alt", "cmd"];

    pub fn as_str(self) -> &'static str {
        match self {
            Modifier::Shift => "shift",
            Modifier::Fn => "fn",
            Modifier::Ctrl => "ctrl",
            Modifier::Alt => "alt",
            Modifier::Cmd => "cmd",
        }
    }
}

/// How an icon path is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IconType {
    /// Use the icon of the file at the path.
    FileIcon,
    /// Use the icon of a uniform type identifier.
    FileType,
}

impl IconType {
    pub const NAMES: &'static [&'static str] = &["fileicon", "filetype"];

    pub fn as_str(self) -> &'static str {
        match self {
            IconType::FileIcon => "fileicon",
            IconType::FileType => "filetype",
        }
    }
}

/// Where an item's text is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextType {
    Copy,
    LargeType,
}

impl TextType {
    pub const NAMES: &'static [&'static str] = &["copy", "largetype"];

    pub fn as_str(self) -> &'static str {
        match self {
            TextType::Copy => "copy",
            TextType::LargeType => "largetype",
        }
    }
}

fn rejected(field: &str, allowed: &[&str], value: AttrValue) -> DomainError {
    DomainError::Validation {
        field: field.to_string(),
        allowed: allowed.iter().map(|s| s.to_string()).collect(),
        value: value.render(),
    }
}

macro_rules! impl_closed_enum {
    ($ty:ty, $field:literal, [$($variant:expr),+ $(,)?]) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                [$($variant),+]
                    .into_iter()
                    .find(|v| v.as_str() == s)
                    .ok_or_else(|| rejected($field, <$ty>::NAMES, AttrValue::from(s)))
            }
        }
    };
}

impl_closed_enum!(Modifier, "mod", [
    Modifier::Shift,
    Modifier::Fn,
    Modifier::Ctrl,
    Modifier::Alt,
    Modifier::Cmd,
]);
impl_closed_enum!(IconType, "type", [IconType::FileIcon, IconType::FileType]);
impl_closed_enum!(TextType, "type", [TextType::Copy, TextType::LargeType]);

/// Setter accepting absence or one of `allowed`.
fn enumerated(
    field: &'static str,
    allowed: &'static [&'static str],
) -> impl Fn(Option<AttrValue>) -> DomainResult<Option<String>> + Send + Sync + 'static {
    move |value| match value {
        None => Ok(None),
        Some(AttrValue::Str(s)) if allowed.contains(&s.as_str()) => Ok(Some(s)),
        Some(other) => Err(rejected(field, allowed, other)),
    }
}

/// `true` is stored as `YES`, `false` as `no`.
fn validity(value: Option<AttrValue>) -> DomainResult<Option<String>> {
    match value {
        None => Ok(None),
        Some(AttrValue::Bool(true)) => Ok(Some("YES".to_string())),
        Some(AttrValue::Bool(false)) => Ok(Some("no".to_string())),
        Some(other) => Err(rejected("valid", &["true", "false"], other)),
    }
}

/// Attribute values of a result item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemAttrs {
    /// Generated when absent or empty.
    pub uid: Option<String>,
    pub arg: Option<String>,
    /// Tri-state: `Some(true)`, `Some(false)` or absent.
    pub valid: Option<bool>,
    pub autocomplete: Option<String>,
    pub item_type: Option<String>,
}

impl ItemAttrs {
    fn to_values(&self) -> Vec<(&'static str, AttrValue)> {
        let mut values = Vec::new();
        if let Some(uid) = &self.uid {
            values.push(("uid", AttrValue::from(uid.as_str())));
        }
        if let Some(arg) = &self.arg {
            values.push(("arg", AttrValue::from(arg.as_str())));
        }
        if let Some(valid) = self.valid {
            values.push(("valid", AttrValue::from(valid)));
        }
        if let Some(autocomplete) = &self.autocomplete {
            values.push(("autocomplete", AttrValue::from(autocomplete.as_str())));
        }
        if let Some(item_type) = &self.item_type {
            values.push(("type", AttrValue::from(item_type.as_str())));
        }
        values
    }
}

/// The declared result-list vocabulary.
pub struct ResultSchema {
    schema: Schema,
    items: Arc<ElementType>,
    item: Arc<ElementType>,
    title: Arc<ElementType>,
    subtitle: Arc<ElementType>,
    icon: Arc<ElementType>,
    text: Arc<ElementType>,
}

impl ResultSchema {
    /// Declare the vocabulary; `uid` supplies identifiers for items without one.
    pub fn new(uid: Arc<dyn UidGenerator>) -> DomainResult<Self> {
        let mut schema = Schema::new();

        let title = schema.declare(ElementDecl::new("Title", "title"))?;
        let subtitle = schema.declare(
            ElementDecl::new("SubTitle", "subtitle").attribute_decl(
                AttributeDecl::new("mod").with_setter(enumerated("mod", Modifier::NAMES)),
            ),
        )?;
        let icon = schema.declare(
            ElementDecl::new("Icon", "icon").attribute_decl(
                AttributeDecl::new("type").with_setter(enumerated("type", IconType::NAMES)),
            ),
        )?;
        let text = schema.declare(
            ElementDecl::new("Text", "text").attribute_decl(
                AttributeDecl::new("type").with_setter(enumerated("type", TextType::NAMES)),
            ),
        )?;
        let item = schema.declare(
            ElementDecl::new("Item", "item")
                .attribute_decl(AttributeDecl::new("uid").with_setter(move |value| {
                    Ok(Some(match value {
                        Some(v) if v.is_truthy() => v.render(),
                        _ => uid.generate(),
                    }))
                }))
                .attribute("arg")
                .attribute_decl(AttributeDecl::new("valid").with_setter(validity))
                .attribute("autocomplete")
                .attribute("type")
                .child("Title")
                .child("SubTitle")
                .child("Icon")
                .child("Text"),
        )?;
        let items = schema.declare(ElementDecl::new("Items", "items").child("Item"))?;

        Ok(Self {
            schema,
            items,
            item,
            title,
            subtitle,
            icon,
            text,
        })
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn items_type(&self) -> &Arc<ElementType> {
        &self.items
    }

    pub fn item_type(&self) -> &Arc<ElementType> {
        &self.item
    }

    pub fn title_type(&self) -> &Arc<ElementType> {
        &self.title
    }

    pub fn subtitle_type(&self) -> &Arc<ElementType> {
        &self.subtitle
    }

    pub fn icon_type(&self) -> &Arc<ElementType> {
        &self.icon
    }

    pub fn text_type(&self) -> &Arc<ElementType> {
        &self.text
    }

    pub fn items(&self) -> DomainResult<Element> {
        Element::new(&self.items)
    }

    pub fn item(&self, attrs: &ItemAttrs) -> DomainResult<Element> {
        Element::construct(&self.item, None, &attrs.to_values())
    }

    pub fn title(&self, text: &str) -> DomainResult<Element> {
        Element::with_text(&self.title, text)
    }

    pub fn subtitle(&self, text: &str, modifier: Option<Modifier>) -> DomainResult<Element> {
        let values: Vec<(&str, AttrValue)> = modifier
            .map(|m| ("mod", AttrValue::from(m.as_str())))
            .into_iter()
            .collect();
        Element::construct(&self.subtitle, Some(text), &values)
    }

    pub fn icon(&self, text: &str, kind: Option<IconType>) -> DomainResult<Element> {
        let values: Vec<(&str, AttrValue)> = kind
            .map(|k| ("type", AttrValue::from(k.as_str())))
            .into_iter()
            .collect();
        Element::construct(&self.icon, Some(text), &values)
    }

    pub fn text(&self, text: &str, kind: Option<TextType>) -> DomainResult<Element> {
        let values: Vec<(&str, AttrValue)> = kind
            .map(|k| ("type", AttrValue::from(k.as_str())))
            .into_iter()
            .collect();
        Element::construct(&self.text, Some(text), &values)
    }
}
