/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the untyped AST structure
///
/// Submodules:
/// - ast: Program root and literal definitions
/// - expressions: Definitions for expression nodes and operators
/// - statements: Definitions for statement and declaration nodes
/// - types: The closed source-language type enumeration
pub mod ast;
pub mod expressions;
pub mod statements;
pub mod types;
