//! Data model shared by the registry and the simulator.
//!
//! Declarations arrive here already compiled: the external MIB compiler
//! hands over one [`CompiledModule`] per successfully parsed definition
//! file, and everything downstream works off the [`SymbolTable`] built from
//! those. Nothing in this module reads files or parses MIB grammar.

mod decl;
mod oid;
mod syntax;

pub use decl::{
    CompileError, CompiledModule, DeclKind, NotificationDecl, ObjectDecl, ObjectRef, SymbolTable,
};
pub use oid::Oid;
pub use syntax::{Access, Status, SyntaxKind};
