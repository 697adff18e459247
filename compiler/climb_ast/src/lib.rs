//! Parse trees for the climb expression parser.
//!
//! This crate defines the binary [`ParseTree`] produced by the parser, the left
//! and right [`Weight`] of a subtree, a stack-based [`Folder`] traversal, and the
//! nested-list and S-expression forms handed to formatters.

pub mod sexpr;
pub mod tree;
pub mod visit;

// Re-export commonly used types
pub use sexpr::{from_nested_list, NestedList, TreeError};
pub use tree::{InOrder, Leaf, OperatorNode, ParseTree, TreeItem, Weight};
pub use visit::Folder;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A result type for serialization helpers.
#[cfg(feature = "serde")]
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Serializes a tree (or any serializable value) to pretty JSON.
#[cfg(feature = "serde")]
pub fn to_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Deserializes a value from JSON.
#[cfg(feature = "serde")]
pub fn from_json<T: for<'de> Deserialize<'de>>(json: &str) -> Result<T> {
    Ok(serde_json::from_str(json)?)
}
