//! # Pagecraft Document
//!
//! Data model for landing pages built in the pagecraft editor.
//!
//! - [`PageDocument`]: an ordered list of [`ComponentInstance`] blocks
//! - [`PropPath`]: dot-path addressing into a block's prop tree
//! - [`SchemaRegistry`]: where default props for new blocks come from
//!
//! Props are kept as a dynamic JSON tree rather than one struct per
//! `(type, variant)`. The properties panel edits every variant through the
//! same schema-driven form, so the editor never needs to know the shape.

mod error;
mod page;
mod prop_path;
mod schema;

pub use error::{DocumentError, PathError};
pub use page::{ComponentId, ComponentInstance, ComponentType, PageDocument};
pub use prop_path::PropPath;
pub use schema::{SchemaRegistry, StaticSchemaRegistry};

pub use serde_json::Value;
