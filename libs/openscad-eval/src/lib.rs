//! # OpenSCAD Eval
//!
//! AST evaluation and geometry IR generation.
//!
//! ## Architecture
//!
//! ```text
//! Source → openscad-ast (AST) → openscad-eval (GeometryNode) → openscad-mesh
//! ```
//!
//! ## Example
//!
//! ```rust
//! use openscad_eval::evaluate;
//!
//! let result = evaluate("cube(10);").unwrap();
//! // result.geometry is a GeometryNode::Cube
//! ```

pub mod geometry;
pub mod error;
pub mod colors;
pub mod plugin;
pub mod scope;
pub mod visitor;
pub mod value;

// Re-export public API
pub use geometry::{GeometryNode, GeometryMeta, ModifierTag, EvaluatedAst};
pub use error::EvalError;
pub use plugin::PluginResolver;
pub use scope::Scope;
pub use value::Value;
pub use visitor::EvalContext;

// =============================================================================
// PUBLIC API
// =============================================================================

/// Evaluate OpenSCAD source code to geometry.
///
/// This is the main entry point for the evaluator.
///
/// ## Parameters
///
/// - `source`: OpenSCAD source code string
///
/// ## Returns
///
/// `Result<EvaluatedAst, EvalError>` - Evaluated geometry on success
///
/// ## Example
///
/// ```rust
/// use openscad_eval::evaluate;
///
/// let result = evaluate("cube(10);").unwrap();
/// ```
pub fn evaluate(source: &str) -> Result<EvaluatedAst, EvalError> {
    // Parse to AST using openscad-ast
    let ast = openscad_ast::parse(source)
        .map_err(|e| EvalError::ParseError(e.to_string()))?;

    // Evaluate AST to geometry
    visitor::evaluate_ast(&ast)
}

/// Evaluate OpenSCAD source code against a caller-supplied [`EvalContext`].
///
/// Unlike [`evaluate`], this reuses `ctx` instead of creating a fresh one —
/// callers that attach a [`plugin::PluginResolver`] (via
/// [`visitor::EvalContext::with_plugins`]) or that want to inspect warnings
/// alongside a pre-seeded scope use this entry point.
pub fn evaluate_with_context(
    source: &str,
    ctx: &mut visitor::EvalContext,
) -> Result<EvaluatedAst, EvalError> {
    let ast = openscad_ast::parse(source)
        .map_err(|e| EvalError::ParseError(e.to_string()))?;
    visitor::evaluate_ast_with_context(&ast, ctx)
}

// =============================================================================
// TESTS
// =============================================================================
