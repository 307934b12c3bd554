//! Domain layer: the declarative element model
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod element;
pub mod error;
pub mod xml;

pub use element::{AttrValue, AttributeDecl, Element, ElementDecl, ElementType, Schema, Setter};
pub use error::{DomainError, DomainResult};
pub use xml::XmlNode;
