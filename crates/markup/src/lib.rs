//! Markup source for the trellis compiler.
//!
//! A markup tree is immutable once built. Every [`Element`] carries a
//! [`NodeId`] that is unique for the lifetime of the process, which is what
//! compile passes key their per-node caches on.

mod document;
mod element;
mod error;
mod load;

pub use document::Document;
pub use element::{Attribute, Descendants, Element, ElementBuilder, NodeId};
pub use error::MarkupError;
