//! Data model of the interop preparation pass.
//!
//! This crate contains everything the pass reads and rewrites:
//! - Spans for source locations
//! - Interned names and identifier decoding
//! - The symbol table (symbols, flags, annotations, subclass queries)
//! - Resolved types and literal constants
//! - Well-known library definitions
//! - The typed tree and its child-mapping traversal
//!
//! # Ownership
//!
//! The symbol table is built once per compilation and shared read-mostly
//! between units. Trees are owned per unit and rewritten by value.

mod definitions;
mod interner;
pub mod name;
mod span;
mod symbol;
mod tree;
mod ty;

pub use definitions::Definitions;
pub use interner::{SharedInterner, StringInterner};
pub use name::{decode_name, getter_name, Name};
pub use span::Span;
pub use symbol::{Annotation, Symbol, SymbolFlags, SymbolId, SymbolKind, SymbolTable};
pub use tree::{ExportKind, Tree, TreeKind};
pub use ty::{Constant, Ty};
