//! # Evaluator Context
//!
//! Core evaluator state and statement evaluation logic.
//!
//! ## Responsibilities
//!
//! - Maintains variable scope for lexical scoping
//! - Collects warnings during evaluation
//! - Evaluates statements (assignments, blocks, loops, conditionals)
//!
//! ## Example
//!
//! ```rust,ignore
//! use crate::visitor::context::EvalContext;
//!
//! let mut ctx = EvalContext::new();
//! ctx.scope.define("x", Value::Number(10.0));
//! ```

use crate::error::EvalError;
use crate::geometry::{GeometryMeta, GeometryNode, ModifierTag};
use crate::plugin::PluginResolver;
use crate::scope::Scope;
use crate::value::Value;
use openscad_ast::{Statement, Expression, Argument, ModifierKind};
use openscad_ast::ast::Parameter;
use std::collections::HashMap;
use std::sync::Arc;

use super::expressions::eval_expr;
use super::primitives::{
    eval_cube, eval_sphere, eval_cylinder, eval_cone, eval_polyhedron, eval_pyramid,
    eval_circle, eval_square, eval_polygon, eval_text, eval_surface,
};
use super::boolean::{eval_union, eval_difference, eval_intersection, eval_hull, eval_minkowski};
use super::transforms::{eval_translate, eval_rotate, eval_scale, eval_mirror, eval_multmatrix, eval_resize, eval_color};
use super::extrusions::{eval_linear_extrude, eval_rotate_extrude};
use super::ops_2d::{eval_offset, eval_projection};

// =============================================================================
// USER-DEFINED FUNCTIONS
// =============================================================================

/// A user-defined function.
///
/// Stores the function's parameters and body expression for later evaluation.
///
/// ## Example
///
/// ```text
/// function double(x) = x * 2;
/// // Stored as: FunctionDef { params: [x], body: x * 2 }
/// ```
#[derive(Debug, Clone)]
pub struct FunctionDef {
    /// Function parameters.
    pub params: Vec<Parameter>,
    /// Body expression.
    pub body: Expression,
}

// =============================================================================
// USER-DEFINED MODULES
// =============================================================================

/// A user-defined module.
///
/// Stores the module's parameters (with optional defaults) and body
/// statements for later evaluation at each call site.
#[derive(Debug, Clone)]
pub struct ModuleDef {
    /// Module parameters.
    pub params: Vec<Parameter>,
    /// Body statements.
    pub body: Vec<Statement>,
}

// =============================================================================
// EVALUATOR CONTEXT
// =============================================================================

/// Evaluation context maintaining state during AST traversal.
///
/// ## Fields
///
/// - `warnings`: Collected warnings during evaluation
/// - `scope`: Variable scope for lexical scoping
/// - `functions`: User-defined functions
pub struct EvalContext {
    /// Collected warnings (undefined variables, unknown modules, etc.).
    pub warnings: Vec<String>,
    /// Variable scope for lexical scoping.
    pub scope: Scope,
    /// User-defined functions.
    pub functions: HashMap<String, FunctionDef>,
    /// User-defined modules.
    pub modules: HashMap<String, ModuleDef>,
    /// Stack of evaluated call-site children, one frame per active
    /// user-defined module call, consulted by the `children()` builtin.
    children_stack: Vec<Vec<GeometryNode>>,
    /// Host-registered extension resolver (§4.7), consulted after built-ins
    /// and user-defined modules fail to match a call.
    pub plugins: Option<Arc<dyn PluginResolver>>,
}

impl EvalContext {
    /// Create new evaluation context with default settings.
    ///
    /// ## Example
    ///
    /// ```rust,ignore
    /// let ctx = EvalContext::new();
    /// assert!(ctx.warnings.is_empty());
    /// ```
    pub fn new() -> Self {
        Self {
            warnings: Vec::new(),
            scope: Scope::new(),
            functions: HashMap::new(),
            modules: HashMap::new(),
            children_stack: Vec::new(),
            plugins: None,
        }
    }

    /// Attach a plugin resolver consulted for module calls that match
    /// neither a built-in nor a user-defined module.
    pub fn with_plugins(mut self, plugins: Arc<dyn PluginResolver>) -> Self {
        self.plugins = Some(plugins);
        self
    }

    /// Define a user-defined function.
    ///
    /// ## Parameters
    ///
    /// - `name`: Function name
    /// - `params`: Function parameters
    /// - `body`: Body expression
    ///
    /// ## Example
    ///
    /// ```rust,ignore
    /// ctx.define_function("double", vec![param("x")], expr);
    /// ```
    pub fn define_function(&mut self, name: String, params: Vec<Parameter>, body: Expression) {
        self.functions.insert(name, FunctionDef { params, body });
    }

    /// Get a user-defined function by name.
    pub fn get_function(&self, name: &str) -> Option<&FunctionDef> {
        self.functions.get(name)
    }

    /// Define a user-defined module.
    pub fn define_module(&mut self, name: String, params: Vec<Parameter>, body: Vec<Statement>) {
        self.modules.insert(name, ModuleDef { params, body });
    }

    /// Get a user-defined module by name.
    pub fn get_module(&self, name: &str) -> Option<&ModuleDef> {
        self.modules.get(name)
    }

    /// Calculate number of fragments for circular shapes.
    ///
    /// Delegates to scope which handles $fn/$fa/$fs calculation.
    ///
    /// ## Parameters
    ///
    /// - `radius`: Radius of the circular shape
    ///
    /// ## Returns
    ///
    /// Number of segments to use (minimum 3)
    pub fn calculate_fragments(&self, radius: f64) -> u32 {
        self.scope.calculate_fragments(radius)
    }

    /// Add a warning message.
    ///
    /// ## Parameters
    ///
    /// - `msg`: Warning message to add
    pub fn warn(&mut self, msg: String) {
        self.warnings.push(msg);
    }
}

impl Default for EvalContext {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// STATEMENT EVALUATION
// =============================================================================

/// Evaluate a list of statements.
///
/// ## Parameters
///
/// - `ctx`: Evaluation context
/// - `statements`: Statements to evaluate
///
/// ## Returns
///
/// Combined geometry from all statements
pub fn evaluate_statements(
    ctx: &mut EvalContext,
    statements: &[Statement],
) -> Result<GeometryNode, EvalError> {
    let mut children = Vec::new();

    for stmt in statements {
        if let Some(node) = evaluate_statement(ctx, stmt)? {
            // A `!` (root) modifier short-circuits its siblings: only the
            // rendered subtree survives, as if it were the sole statement.
            if let GeometryNode::Tagged { meta, .. } = &node {
                if meta.modifier == Some(ModifierTag::Root) {
                    return Ok(node);
                }
            }
            if !node.is_empty() {
                children.push(node);
            }
        }
    }

    match children.len() {
        0 => Ok(GeometryNode::Empty),
        1 => Ok(children.remove(0)),
        _ => Ok(GeometryNode::Group { children }),
    }
}

/// Evaluate a single statement.
///
/// ## Parameters
///
/// - `ctx`: Evaluation context
/// - `stmt`: Statement to evaluate
///
/// ## Returns
///
/// Optional geometry node (assignments return None)
pub fn evaluate_statement(
    ctx: &mut EvalContext,
    stmt: &Statement,
) -> Result<Option<GeometryNode>, EvalError> {
    match stmt {
        Statement::ModuleCall { name, args, children, .. } => {
            evaluate_module_call(ctx, name, args, children)
        }
        Statement::Block { statements, .. } => {
            // Block creates a new scope
            ctx.scope.push();
            let result = evaluate_statements(ctx, statements)?;
            ctx.scope.pop();
            Ok(Some(result))
        }
        Statement::Assignment { name, value, .. } => {
            // Evaluate the value and store in scope
            let val = eval_expr(ctx, value)?;
            ctx.scope.define(name, val);
            Ok(None)
        }
        Statement::ForLoop { assignments, body, .. } => {
            evaluate_for_loop(ctx, assignments, body)
        }
        Statement::IfElse { condition, then_body, else_body, .. } => {
            evaluate_if_else(ctx, condition, then_body, else_body.as_deref())
        }
        Statement::FunctionDeclaration { name, params, body, .. } => {
            // Register the function for later evaluation
            ctx.define_function(name.clone(), params.clone(), body.clone());
            Ok(None)
        }
        Statement::ModuleDeclaration { name, params, body, .. } => {
            ctx.define_module(name.clone(), params.clone(), body.clone());
            Ok(None)
        }
        Statement::Let { assignments, body, .. } => {
            ctx.scope.push();
            for (name, expr) in assignments {
                let val = eval_expr(ctx, expr)?;
                ctx.scope.define(name, val);
            }
            let result = evaluate_statement(ctx, body)?;
            ctx.scope.pop();
            Ok(result)
        }
        Statement::Echo { args, .. } => {
            let rendered: Result<Vec<String>, EvalError> = args
                .iter()
                .map(|arg| {
                    let expr = match arg {
                        Argument::Positional(e) => e,
                        Argument::Named { value, .. } => value,
                    };
                    Ok(format_value(&eval_expr(ctx, expr)?))
                })
                .collect();
            ctx.warn(format!("ECHO: {}", rendered?.join(", ")));
            Ok(None)
        }
        Statement::Assert { args, .. } => {
            let mut iter = args.iter();
            let condition = iter
                .next()
                .map(|arg| match arg {
                    Argument::Positional(e) => e,
                    Argument::Named { value, .. } => value,
                })
                .ok_or_else(|| EvalError::InvalidArgument("assert() requires a condition".to_string()))?;
            let cond_val = eval_expr(ctx, condition)?;
            if !cond_val.as_boolean() {
                let message = iter
                    .next()
                    .map(|arg| {
                        let expr = match arg {
                            Argument::Positional(e) => e,
                            Argument::Named { value, .. } => value,
                        };
                        eval_expr(ctx, expr).map(|v| format_value(&v))
                    })
                    .transpose()?
                    .unwrap_or_else(|| "Assertion failed".to_string());
                return Err(EvalError::InvalidArgument(message));
            }
            Ok(None)
        }
        Statement::Include { .. } => {
            // Textual inlining of `include <path>` happens before this AST
            // is evaluated (the parser/lowering stage resolves the path and
            // splices the included file's statements in place). By the time
            // evaluation reaches here nothing further needs doing.
            Ok(None)
        }
        Statement::Use { .. } => {
            // `use <path>` only pulls in module/function definitions, which
            // are spliced in ahead of evaluation the same way `include` is;
            // it never contributes geometry at its own call site.
            Ok(None)
        }
        Statement::Modifier { kind, statement, .. } => evaluate_modifier(ctx, *kind, statement),
    }
}

/// Render a value for `echo()`/`assert()` messages.
fn format_value(value: &Value) -> String {
    match value {
        Value::Undef => "undef".to_string(),
        Value::Boolean(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => format!("\"{}\"", s),
        Value::List(items) => {
            let inner: Vec<String> = items.iter().map(format_value).collect();
            format!("[{}]", inner.join(", "))
        }
        Value::Range { start, end, step } => match step {
            Some(s) => format!("[{}:{}:{}]", start, s, end),
            None => format!("[{}:{}]", start, end),
        },
    }
}

/// Evaluate a `*`/`!`/`#`/`%`-prefixed statement.
///
/// `*` drops the subtree entirely; the others evaluate the statement
/// normally and attach the modifier as `GeometryMeta` so later stages
/// (CSG adapter, renderer, export) can honor it.
fn evaluate_modifier(
    ctx: &mut EvalContext,
    kind: ModifierKind,
    statement: &Statement,
) -> Result<Option<GeometryNode>, EvalError> {
    if kind == ModifierKind::Disable {
        return Ok(None);
    }

    let tag = match kind {
        ModifierKind::Disable => unreachable!(),
        ModifierKind::Root => ModifierTag::Root,
        ModifierKind::Debug => ModifierTag::Debug,
        ModifierKind::Background => ModifierTag::Background,
    };

    match evaluate_statement(ctx, statement)? {
        Some(node) => Ok(Some(GeometryNode::Tagged {
            meta: GeometryMeta::with_modifier(tag),
            child: Box::new(node),
        })),
        None => Ok(None),
    }
}

/// Evaluate a module call.
///
/// Dispatches to the appropriate primitive, boolean, transform, or extrusion evaluator.
///
/// ## Parameters
///
/// - `ctx`: Evaluation context
/// - `name`: Module name (e.g., "cube", "translate")
/// - `args`: Module arguments
/// - `children`: Child statements
fn evaluate_module_call(
    ctx: &mut EvalContext,
    name: &str,
    args: &[Argument],
    children: &[Statement],
) -> Result<Option<GeometryNode>, EvalError> {
    match name {
        // 3D Primitives
        "cube" => Ok(Some(eval_cube(ctx, args)?)),
        "sphere" => Ok(Some(eval_sphere(ctx, args)?)),
        "cylinder" => Ok(Some(eval_cylinder(ctx, args)?)),
        "cone" => Ok(Some(eval_cone(ctx, args)?)),
        "polyhedron" => Ok(Some(eval_polyhedron(ctx, args)?)),
        "pyramid" => Ok(Some(eval_pyramid(ctx, args)?)),

        // 2D Primitives
        "circle" => Ok(Some(eval_circle(ctx, args)?)),
        "square" => Ok(Some(eval_square(ctx, args)?)),
        "polygon" => Ok(Some(eval_polygon(ctx, args)?)),
        "text" => Ok(Some(eval_text(ctx, args)?)),
        "surface" => Ok(Some(eval_surface(ctx, args)?)),

        // Boolean operations
        "union" => Ok(Some(eval_union(ctx, children)?)),
        "difference" => Ok(Some(eval_difference(ctx, children)?)),
        "intersection" => Ok(Some(eval_intersection(ctx, children)?)),
        "hull" => Ok(Some(eval_hull(ctx, children)?)),
        "minkowski" => Ok(Some(eval_minkowski(ctx, children)?)),

        // Transforms
        "translate" => Ok(Some(eval_translate(ctx, args, children)?)),
        "rotate" => Ok(Some(eval_rotate(ctx, args, children)?)),
        "scale" => Ok(Some(eval_scale(ctx, args, children)?)),
        "mirror" => Ok(Some(eval_mirror(ctx, args, children)?)),
        "multmatrix" => Ok(Some(eval_multmatrix(ctx, args, children)?)),
        "resize" => Ok(Some(eval_resize(ctx, args, children)?)),
        "color" => Ok(Some(eval_color(ctx, args, children)?)),

        // Extrusions
        "linear_extrude" => Ok(Some(eval_linear_extrude(ctx, args, children)?)),
        "rotate_extrude" => Ok(Some(eval_rotate_extrude(ctx, args, children)?)),

        // 2D operations
        "offset" => Ok(Some(eval_offset(ctx, args, children)?)),
        "projection" => Ok(Some(eval_projection(ctx, args, children)?)),

        // children() / children(i) — only meaningful inside a user module body
        "children" => Ok(eval_children(ctx, args)?),

        // User-defined modules, then plugin-registered extensions, then "unknown"
        _ => {
            if let Some(module) = ctx.get_module(name).cloned() {
                return evaluate_user_module_call(ctx, &module, args, children);
            }
            if let Some(resolver) = ctx.plugins.clone() {
                let values = args
                    .iter()
                    .map(|arg| {
                        let expr = match arg {
                            Argument::Positional(e) => e,
                            Argument::Named { value, .. } => value,
                        };
                        eval_expr(ctx, expr)
                    })
                    .collect::<Result<Vec<Value>, EvalError>>()?;
                if let Some(node) = resolver.resolve(name, &values) {
                    return Ok(Some(node));
                }
            }
            ctx.warn(format!("Unknown module: {}", name));
            Ok(None)
        }
    }
}

/// Resolve `children()`/`children(i)` against the innermost active
/// user-module call frame.
fn eval_children(
    ctx: &mut EvalContext,
    args: &[Argument],
) -> Result<Option<GeometryNode>, EvalError> {
    let index = match args.first() {
        Some(Argument::Positional(expr)) => Some(eval_expr(ctx, expr)?.as_number()? as usize),
        Some(Argument::Named { value, .. }) => Some(eval_expr(ctx, value)?.as_number()? as usize),
        None => None,
    };

    let frame = match ctx.children_stack.last() {
        Some(frame) => frame,
        None => return Ok(None),
    };

    match index {
        Some(i) => Ok(frame.get(i).cloned()),
        None => match frame.len() {
            0 => Ok(None),
            1 => Ok(Some(frame[0].clone())),
            _ => Ok(Some(GeometryNode::Group { children: frame.clone() })),
        },
    }
}

/// Call a user-defined module: bind arguments to parameters in a fresh
/// scope, make the call-site children available to `children()`, and
/// evaluate the module body.
fn evaluate_user_module_call(
    ctx: &mut EvalContext,
    module: &ModuleDef,
    args: &[Argument],
    children: &[Statement],
) -> Result<Option<GeometryNode>, EvalError> {
    // Call-site children are evaluated in the caller's scope, before the
    // module's own parameter scope is pushed.
    let evaluated_children = flatten_statements(ctx, children)?;

    ctx.scope.push();

    for (i, param) in module.params.iter().enumerate() {
        let value = match args.get(i) {
            Some(Argument::Positional(expr)) => Some(eval_expr(ctx, expr)?),
            _ => None,
        };
        let value = match value {
            Some(v) => Some(v),
            None => args.iter().find_map(|a| match a {
                Argument::Named { name, value } if name == &param.name => {
                    Some(eval_expr(ctx, value))
                }
                _ => None,
            }).transpose()?,
        };
        let value = match value {
            Some(v) => v,
            None => match &param.default {
                Some(default_expr) => eval_expr(ctx, default_expr)?,
                None => Value::Undef,
            },
        };
        ctx.scope.define(&param.name, value);
    }

    ctx.children_stack.push(evaluated_children);
    // A user-defined module recursing on itself (directly or through a
    // chain of calls) grows the native stack one frame per call; `stacker`
    // transparently moves us onto a fresh segment before that overflows.
    let result = stacker::maybe_grow(
        config::constants::STACKER_STACK_SIZE_BYTES,
        config::constants::STACKER_STACK_SIZE_BYTES,
        || evaluate_statements(&mut *ctx, &module.body),
    );
    ctx.children_stack.pop();
    ctx.scope.pop();

    result.map(Some)
}

/// Evaluate a list of statements into a flat list of geometry nodes,
/// expanding a lone `Block` wrapper the same way boolean operations do.
fn flatten_statements(
    ctx: &mut EvalContext,
    statements: &[Statement],
) -> Result<Vec<GeometryNode>, EvalError> {
    let mut result = Vec::new();
    for stmt in statements {
        match stmt {
            Statement::Block { statements, .. } => {
                for inner in statements {
                    if let Some(node) = evaluate_statement(ctx, inner)? {
                        if !node.is_empty() {
                            result.push(node);
                        }
                    }
                }
            }
            _ => {
                if let Some(node) = evaluate_statement(ctx, stmt)? {
                    if !node.is_empty() {
                        result.push(node);
                    }
                }
            }
        }
    }
    Ok(result)
}

// =============================================================================
// CONTROL FLOW
// =============================================================================

/// Evaluate a for loop.
///
/// Each iteration creates a new scope with the loop variable.
///
/// ## Parameters
///
/// - `ctx`: Evaluation context
/// - `assignments`: Loop variable assignments
/// - `body`: Loop body statements
///
/// ## Example
///
/// ```text
/// for (i = [0:2]) cube(i);  // Creates 3 cubes
/// ```
fn evaluate_for_loop(
    ctx: &mut EvalContext,
    assignments: &[(String, Expression)],
    body: &[Statement],
) -> Result<Option<GeometryNode>, EvalError> {
    let mut children = Vec::new();

    // Handle single assignment (most common case)
    if let Some((var_name, range_expr)) = assignments.first() {
        let range_val = eval_expr(ctx, range_expr)?;
        
        // Get iteration values
        let values = match range_val {
            Value::List(items) => items,
            Value::Range { start, end, step } => {
                let mut vals = Vec::new();
                let mut current = start;
                let step_val = step.unwrap_or(1.0);
                if step_val > 0.0 {
                    while current <= end {
                        vals.push(Value::Number(current));
                        current += step_val;
                    }
                } else if step_val < 0.0 {
                    while current >= end {
                        vals.push(Value::Number(current));
                        current += step_val;
                    }
                }
                vals
            }
            _ => vec![range_val],
        };

        // Iterate
        for val in values {
            ctx.scope.push();
            ctx.scope.define(var_name, val);
            
            if let Ok(node) = evaluate_statements(ctx, body) {
                if !node.is_empty() {
                    children.push(node);
                }
            }
            
            ctx.scope.pop();
        }
    }

    match children.len() {
        0 => Ok(None),
        1 => Ok(Some(children.remove(0))),
        _ => Ok(Some(GeometryNode::Group { children })),
    }
}

/// Evaluate an if/else statement.
///
/// ## Parameters
///
/// - `ctx`: Evaluation context
/// - `condition`: Condition expression
/// - `then_body`: Statements if condition is true
/// - `else_body`: Optional statements if condition is false
fn evaluate_if_else(
    ctx: &mut EvalContext,
    condition: &Expression,
    then_body: &[Statement],
    else_body: Option<&[Statement]>,
) -> Result<Option<GeometryNode>, EvalError> {
    let cond_val = eval_expr(ctx, condition)?;
    
    if cond_val.as_boolean() {
        ctx.scope.push();
        let result = evaluate_statements(ctx, then_body)?;
        ctx.scope.pop();
        Ok(Some(result))
    } else if let Some(else_stmts) = else_body {
        ctx.scope.push();
        let result = evaluate_statements(ctx, else_stmts)?;
        ctx.scope.pop();
        Ok(Some(result))
    } else {
        Ok(None)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_new() {
        let ctx = EvalContext::new();
        assert!(ctx.warnings.is_empty());
    }

    #[test]
    fn test_context_warn() {
        let mut ctx = EvalContext::new();
        ctx.warn("Test warning".to_string());
        assert_eq!(ctx.warnings.len(), 1);
    }

    #[test]
    fn test_context_fragments() {
        let ctx = EvalContext::new();
        let fragments = ctx.calculate_fragments(10.0);
        assert!(fragments >= 3);
    }

    struct TestResolver;
    impl crate::plugin::PluginResolver for TestResolver {
        fn resolve(&self, name: &str, args: &[Value]) -> Option<GeometryNode> {
            if name != "tetra" {
                return None;
            }
            let size = args.first().and_then(|v| v.as_number().ok()).unwrap_or(1.0);
            Some(GeometryNode::Polyhedron {
                points: vec![
                    [0.0, 0.0, 0.0],
                    [size, 0.0, 0.0],
                    [0.0, size, 0.0],
                    [0.0, 0.0, size],
                ],
                faces: vec![vec![0, 1, 2], vec![0, 2, 3], vec![0, 3, 1], vec![1, 3, 2]],
            })
        }
    }

    #[test]
    fn test_plugin_resolver_handles_unknown_module() {
        let mut ctx = EvalContext::new().with_plugins(std::sync::Arc::new(TestResolver));
        let result = evaluate_module_call(&mut ctx, "tetra", &[], &[]).unwrap();
        assert!(matches!(result, Some(GeometryNode::Polyhedron { .. })));
        assert!(ctx.warnings.is_empty());
    }

    #[test]
    fn test_plugin_resolver_falls_through_to_warning() {
        let mut ctx = EvalContext::new().with_plugins(std::sync::Arc::new(TestResolver));
        let result = evaluate_module_call(&mut ctx, "not_registered", &[], &[]).unwrap();
        assert!(result.is_none());
        assert_eq!(ctx.warnings.len(), 1);
    }

    fn count_leaves(node: &GeometryNode) -> usize {
        match node {
            GeometryNode::Group { children } => children.iter().map(count_leaves).sum(),
            GeometryNode::Empty => 0,
            _ => 1,
        }
    }

    #[test]
    fn test_dispatch_reaches_new_primitives_and_transforms() {
        let mut ctx = EvalContext::new();
        for name in ["polyhedron", "polygon", "cone", "pyramid", "multmatrix", "resize"] {
            let result = evaluate_module_call(&mut ctx, name, &[], &[]).unwrap();
            assert!(result.is_some(), "{name} should not fall through to Unknown module");
        }
        assert!(
            ctx.warnings.iter().all(|w| !w.starts_with("Unknown module")),
            "unexpected unknown-module warnings: {:?}",
            ctx.warnings
        );
    }

    #[test]
    fn test_recursive_module_call_does_not_overflow_stack() {
        let source = "
            module countdown(n) {
                if (n > 0) {
                    translate([n, 0, 0]) cube(1);
                    countdown(n - 1);
                }
            }
            countdown(64);
        ";
        let ast = openscad_ast::parse(source).unwrap();
        let mut ctx = EvalContext::new();
        let geometry = evaluate_statements(&mut ctx, &ast.statements).unwrap();
        assert_eq!(count_leaves(&geometry), 64);
    }
}
