//! # OpenSCAD AST
//!
//! Abstract Syntax Tree types for OpenSCAD, built from the pure-Rust CST
//! produced by `openscad-parser`.
//!
//! ## Architecture
//!
//! ```text
//! CST (openscad-parser) → AST (this crate) → IR (openscad-eval)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use openscad_ast::parse;
//!
//! let ast = parse("cube(10);").unwrap();
//! assert_eq!(ast.statements.len(), 1);
//! ```

pub mod ast;
pub mod diagnostic;
pub mod error;
pub mod lower;
pub mod printer;
pub mod span;

pub use ast::{
    Argument, Ast, BinaryOp, Expression, ModifierKind, Parameter, Statement, UnaryOp,
};
pub use diagnostic::{Diagnostic, Severity};
pub use error::AstError;
pub use printer::{print, unparse};
pub use span::Span;

/// Parse OpenSCAD source directly into an [`Ast`].
///
/// Runs the pure-Rust lexer/parser from `openscad-parser` and lowers the
/// resulting CST. A CST with parse errors is reported as [`AstError::ParseError`]
/// rather than lowered partially.
///
/// ## Example
///
/// ```rust
/// use openscad_ast::parse;
///
/// let ast = parse("translate([1,2,3]) cube(5);").unwrap();
/// assert_eq!(ast.statements.len(), 1);
/// ```
pub fn parse(source: &str) -> Result<Ast, AstError> {
    let cst = openscad_parser::parse(source);
    lower::lower_cst(&cst)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_source() {
        let ast = parse("cube(10);").unwrap();
        assert_eq!(ast.statements.len(), 1);
    }

    #[test]
    fn surfaces_parse_errors() {
        assert!(parse("cube(;").is_err());
    }
}
