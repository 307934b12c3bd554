//! Result list façade
//!
//! Builds one `items` document incrementally: add items, then attach
//! subtitle variants and texts to them by index, then serialize.

use std::sync::Arc;

use tracing::debug;

use crate::application::schema::{IconType, ItemAttrs, Modifier, ResultSchema, TextType};
use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{Element, XmlNode};

/// Parameters of [`ResultListBuilder::add_item`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewItem {
    pub title: String,
    /// Icon path, file-type identifier or image name.
    pub icon: String,
    pub icon_type: Option<IconType>,
    pub subtitle: Option<String>,
    pub attrs: ItemAttrs,
}

impl NewItem {
    pub fn new(title: impl Into<String>, icon: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            icon: icon.into(),
            ..Default::default()
        }
    }

    pub fn subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn uid(mut self, uid: impl Into<String>) -> Self {
        self.attrs.uid = Some(uid.into());
        self
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.attrs.arg = Some(arg.into());
        self
    }

    pub fn valid(mut self, valid: bool) -> Self {
        self.attrs.valid = Some(valid);
        self
    }

    pub fn autocomplete(mut self, autocomplete: impl Into<String>) -> Self {
        self.attrs.autocomplete = Some(autocomplete.into());
        self
    }

    pub fn item_type(mut self, item_type: impl Into<String>) -> Self {
        self.attrs.item_type = Some(item_type.into());
        self
    }

    pub fn icon_type(mut self, icon_type: IconType) -> Self {
        self.icon_type = Some(icon_type);
        self
    }
}

/// Parameters of [`ResultListBuilder::add_subtitle_variants`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubtitleVariants {
    plain: Option<String>,
    /// Indexed like `Modifier::ALL`.
    modified: [Option<String>; 5],
}

impl SubtitleVariants {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subtitle shown without a modifier key.
    pub fn subtitle(mut self, text: impl Into<String>) -> Self {
        self.plain = Some(text.into());
        self
    }

    /// Subtitle shown while `modifier` is held.
    pub fn modifier(mut self, modifier: Modifier, text: impl Into<String>) -> Self {
        self.modified[modifier as usize] = Some(text.into());
        self
    }

    /// Plain subtitle first, then modifiers in `Modifier::ALL` order.
    fn entries(&self) -> impl Iterator<Item = (Option<Modifier>, &str)> {
        let plain = self.plain.as_deref().map(|t| (None, t));
        let modified = Modifier::ALL
            .into_iter()
            .zip(&self.modified)
            .filter_map(|(m, t)| t.as_deref().map(|t| (Some(m), t)));
        plain.into_iter().chain(modified)
    }
}

/// Parameters of [`ResultListBuilder::add_text`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextVariants {
    copy: Option<String>,
    largetype: Option<String>,
}

impl TextVariants {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text used when the item is copied.
    pub fn copy(mut self, text: impl Into<String>) -> Self {
        self.copy = Some(text.into());
        self
    }

    /// Text shown in large type.
    pub fn largetype(mut self, text: impl Into<String>) -> Self {
        self.largetype = Some(text.into());
        self
    }

    fn entries(&self) -> impl Iterator<Item = (TextType, &str)> {
        let copy = self.copy.as_deref().map(|t| (TextType::Copy, t));
        let large = self.largetype.as_deref().map(|t| (TextType::LargeType, t));
        copy.into_iter().chain(large)
    }
}

/// Incrementally constructs one result list.
pub struct ResultListBuilder {
    schema: Arc<ResultSchema>,
    root: Element,
}

impl ResultListBuilder {
    pub fn new(schema: Arc<ResultSchema>) -> ApplicationResult<Self> {
        let root = schema.items()?;
        Ok(Self { schema, root })
    }

    pub fn schema(&self) -> &ResultSchema {
        &self.schema
    }

    /// Number of items added so far.
    pub fn len(&self) -> usize {
        self.root.children().len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.children().is_empty()
    }

    /// Item at `index` in insertion order.
    pub fn item(&self, index: usize) -> ApplicationResult<&Element> {
        let len = self.len();
        self.root
            .children()
            .get(index)
            .ok_or(ApplicationError::ItemOutOfRange { index, len })
    }

    fn item_mut(&mut self, index: usize) -> ApplicationResult<&mut Element> {
        let len = self.len();
        self.root
            .child_mut(index)
            .ok_or(ApplicationError::ItemOutOfRange { index, len })
    }

    /// Add an item with a title, an optional subtitle and an icon.
    ///
    /// Returns the index of the new item.
    pub fn add_item(&mut self, new: NewItem) -> ApplicationResult<usize> {
        let mut item = self.schema.item(&new.attrs)?;
        item.append(self.schema.title(&new.title)?)?;
        if let Some(subtitle) = &new.subtitle {
            item.append(self.schema.subtitle(subtitle, None)?)?;
        }
        item.append(self.schema.icon(&new.icon, new.icon_type)?)?;

        debug!("add_item: {}", item);
        self.root.append(item)?;
        Ok(self.len() - 1)
    }

    /// Attach subtitles to an item that has none yet.
    pub fn add_subtitle_variants(
        &mut self,
        index: usize,
        variants: SubtitleVariants,
    ) -> ApplicationResult<()> {
        let subtitle_type = Arc::clone(self.schema.subtitle_type());
        if self.item(index)?.has_child_of(&subtitle_type) {
            return Err(ApplicationError::ChildAlreadyPresent {
                index,
                kind: "subtitle",
            });
        }

        let children = variants
            .entries()
            .map(|(modifier, text)| self.schema.subtitle(text, modifier))
            .collect::<Result<Vec<_>, _>>()?;
        debug!("add_subtitle_variants: index={} count={}", index, children.len());

        let item = self.item_mut(index)?;
        for child in children {
            item.append(child)?;
        }
        Ok(())
    }

    /// Attach copy/large-type texts to an item that has none yet.
    pub fn add_text(&mut self, index: usize, texts: TextVariants) -> ApplicationResult<()> {
        let text_type = Arc::clone(self.schema.text_type());
        if self.item(index)?.has_child_of(&text_type) {
            return Err(ApplicationError::ChildAlreadyPresent {
                index,
                kind: "text",
            });
        }

        let children = texts
            .entries()
            .map(|(kind, text)| self.schema.text(text, Some(kind)))
            .collect::<Result<Vec<_>, _>>()?;
        debug!("add_text: index={} count={}", index, children.len());

        let item = self.item_mut(index)?;
        for child in children {
            item.append(child)?;
        }
        Ok(())
    }

    /// The built `items` tree.
    pub fn build(&self) -> XmlNode {
        self.root.build()
    }

    /// XML text of the list, without a declaration.
    pub fn serialize(&self) -> ApplicationResult<String> {
        Ok(self.build().to_xml_string()?)
    }

    /// XML text of the list, with a declaration.
    pub fn serialize_document(&self) -> ApplicationResult<String> {
        Ok(self.build().to_xml_document()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subtitle_entries_order() {
        let v = SubtitleVariants::new()
            .modifier(Modifier::Cmd, "c")
            .subtitle("plain")
            .modifier(Modifier::Shift, "s");
        let entries: Vec<_> = v.entries().collect();
        assert_eq!(
            entries,
            vec![
                (None, "plain"),
                (Some(Modifier::Shift), "s"),
                (Some(Modifier::Cmd), "c")
            ]
        );
    }

    #[test]
    fn test_text_entries_order() {
        let t = TextVariants::new().largetype("big").copy("clip");
        let entries: Vec<_> = t.entries().collect();
        assert_eq!(
            entries,
            vec![(TextType::Copy, "clip"), (TextType::LargeType, "big")]
        );
    }

    #[test]
    fn test_empty_variants_have_no_entries() {
        assert_eq!(SubtitleVariants::new().entries().count(), 0);
        assert_eq!(TextVariants::new().entries().count(), 0);
    }
}
