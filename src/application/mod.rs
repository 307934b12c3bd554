//! Application layer: result-list vocabulary and services
//!
//! This layer builds on the element model and depends on I/O boundary traits.

pub mod error;
pub mod error_ext;
pub mod schema;
pub mod services;

pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;
pub use schema::{IconType, ItemAttrs, Modifier, ResultSchema, TextType};
