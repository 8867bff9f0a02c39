//! json-tree: a self-contained JSON value-tree library.
//!
//! Parses UTF-8 text into an in-memory tree of typed values, renders trees
//! back to compact or pretty text, and edits trees structurally without ever
//! leaving a dangling link. The crate knows nothing about what the documents
//! mean; it only produces and consumes generic trees.
//!
//! # Architecture
//!
//! All nodes live in a [`Tree`] arena and are addressed by [`NodeId`], so
//! ownership questions are settled by the arena rather than by raw links,
//! and two trees never share state:
//!
//! - [`node`] - Node and number types
//! - [`tree`] - The arena: construction, lookup, removal
//! - [`parser`] - Recursive descent text-to-tree decoding
//! - [`printer`] - Tree-to-text rendering, compact and pretty
//! - [`edit`] - Append, detach, replace, alias, duplicate
//! - [`minify`] - Standalone whitespace/comment stripping
//! - [`error`] - Error taxonomy shared by all of the above
//!
//! The grammar accepted is a permissive superset of JSON (stray control
//! bytes are whitespace, malformed `\u` escapes are dropped rather than
//! fatal) and the printer emits a strict subset, so print-then-parse is
//! structurally lossless while arbitrary third-party text may not
//! round-trip byte-identically.
//!
//! # Example
//!
//! ```
//! use json_tree::Tree;
//!
//! let mut tree = Tree::new();
//! let root = tree.parse(r#"{"name": "widget", "sizes": [1, 2, 3]}"#)?;
//!
//! let sizes = tree.get_by_key(root, "sizes").expect("sizes present");
//! let four = tree.number(4.0);
//! tree.append_to_array(sizes, four)?;
//!
//! assert_eq!(
//!     tree.print(root, false)?,
//!     r#"{"name":"widget","sizes":[1,2,3,4]}"#
//! );
//! # Ok::<(), json_tree::Error>(())
//! ```

// Library code must not panic; everything fallible returns a Result.
// Tests are checked separately with `cargo test`.
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(missing_docs)]

pub mod edit;
pub mod error;
pub mod minify;
pub mod node;
pub mod parser;
pub mod printer;
mod scanner;
pub mod tree;

// Re-export commonly used types
pub use error::{Error, Result};
pub use minify::minify;
pub use node::{Member, Node, NodeId, Number};
pub use tree::Tree;
