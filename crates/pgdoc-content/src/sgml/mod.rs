//! Lenient SGML reading.
//!
//! The PostgreSQL documentation sources are DocBook SGML/XML fragments: one
//! file per chapter or reference page, full of entity references that are
//! only resolved by the documentation build. A validating parser rejects
//! them, so this module reads them the way a forgiving HTML parser would.
//!
//! - [`lexer`]: tokens (start tags, end tags, text)
//! - [`tree`]: arena-backed [`Document`] with traversal and editing
//! - [`entities`]: character reference decoding

pub mod entities;
pub mod lexer;
pub mod tree;

pub use entities::decode_entities;
pub use lexer::{Lexer, Token, parse_attributes};
pub use tree::{Descendants, Document, NodeId, NodeKind, is_empty_element};
