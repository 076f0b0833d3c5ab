//! # CST → AST Lowering
//!
//! Walks the parser's `CstNode` tree and builds the typed [`crate::ast::Ast`].
//!
//! The CST preserves every syntactic detail (including nodes that don't carry
//! semantic weight, like bare `;` statements); lowering is where that detail
//! gets thrown away and the tree gains real types.

use openscad_parser::{CstNode, NodeKind};

use crate::ast::{Argument, Ast, BinaryOp, Expression, ModifierKind, Parameter, Statement, UnaryOp};
use crate::error::AstError;

/// Lower a parsed [`openscad_parser::Cst`] into an [`Ast`].
///
/// Collected parse errors are treated as fatal: a CST with errors in it does
/// not have a well-formed enough shape to lower node by node.
pub fn lower_cst(cst: &openscad_parser::Cst) -> Result<Ast, AstError> {
    if !cst.errors.is_empty() {
        let messages: Vec<String> = cst.errors.iter().map(|e| e.to_string()).collect();
        return Err(AstError::ParseError(messages.join("; ")));
    }

    let statements = cst
        .root
        .children
        .iter()
        .map(lower_statement)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Ast::with_statements(statements))
}

// =============================================================================
// STATEMENTS
// =============================================================================

fn lower_statement(node: &CstNode) -> Result<Statement, AstError> {
    match node.kind {
        NodeKind::ModuleCall => lower_module_call(node),
        NodeKind::Assignment => lower_assignment(node),
        NodeKind::ModuleDeclaration => lower_module_declaration(node),
        NodeKind::FunctionDeclaration => lower_function_declaration(node),
        NodeKind::ForBlock => lower_for_block(node),
        NodeKind::IfBlock => lower_if_block(node),
        NodeKind::LetBlock => lower_let_statement(node),
        NodeKind::IncludeStatement => Ok(Statement::Include {
            path: node.text_or_empty().to_string(),
            span: node.span,
        }),
        NodeKind::UseStatement => Ok(Statement::Use {
            path: node.text_or_empty().to_string(),
            span: node.span,
        }),
        NodeKind::EchoStatement => Ok(Statement::Echo {
            args: lower_arguments(child(node, 0)?)?,
            span: node.span,
        }),
        NodeKind::AssertStatement => Ok(Statement::Assert {
            args: lower_arguments(child(node, 0)?)?,
            span: node.span,
        }),
        NodeKind::Block => Ok(Statement::Block {
            statements: node.children.iter().map(lower_statement).collect::<Result<_, _>>()?,
            span: node.span,
        }),
        NodeKind::Modifier => lower_modifier_statement(node),
        NodeKind::Semicolon => Ok(Statement::Block { statements: Vec::new(), span: node.span }),
        other => Err(AstError::UnsupportedNode(format!("{:?} as statement", other))),
    }
}

fn lower_module_call(node: &CstNode) -> Result<Statement, AstError> {
    let name = child(node, 0)?.text_or_empty().to_string();
    let args = lower_arguments(child(node, 1)?)?;
    let children = match node.children.get(2) {
        None => Vec::new(),
        Some(body) if body.kind == NodeKind::Block => {
            body.children.iter().map(lower_statement).collect::<Result<_, _>>()?
        }
        Some(stmt) => vec![lower_statement(stmt)?],
    };
    Ok(Statement::ModuleCall { name, args, children, span: node.span })
}

fn lower_assignment(node: &CstNode) -> Result<Statement, AstError> {
    let name = child(node, 0)?.text_or_empty().to_string();
    let value = lower_expression(child(node, 1)?)?;
    Ok(Statement::Assignment { name, value, span: node.span })
}

fn lower_module_declaration(node: &CstNode) -> Result<Statement, AstError> {
    let name = child(node, 0)?.text_or_empty().to_string();
    let params = lower_parameters(child(node, 1)?)?;
    let body_block = child(node, 2)?;
    let body = body_block.children.iter().map(lower_statement).collect::<Result<_, _>>()?;
    Ok(Statement::ModuleDeclaration { name, params, body, span: node.span })
}

fn lower_function_declaration(node: &CstNode) -> Result<Statement, AstError> {
    let name = child(node, 0)?.text_or_empty().to_string();
    let params = lower_parameters(child(node, 1)?)?;
    let body = lower_expression(child(node, 2)?)?;
    Ok(Statement::FunctionDeclaration { name, params, body, span: node.span })
}

fn lower_for_block(node: &CstNode) -> Result<Statement, AstError> {
    let assignments = lower_for_assignments(child(node, 0)?)?;
    let body = flatten_statement_body(child(node, 1)?)?;
    Ok(Statement::ForLoop { assignments, body, span: node.span })
}

fn lower_if_block(node: &CstNode) -> Result<Statement, AstError> {
    let condition = lower_expression(child(node, 0)?)?;
    let then_body = flatten_statement_body(child(node, 1)?)?;
    let else_body = match node.children.get(2) {
        Some(else_stmt) => Some(flatten_statement_body(else_stmt)?),
        None => None,
    };
    Ok(Statement::IfElse { condition, then_body, else_body, span: node.span })
}

fn lower_let_statement(node: &CstNode) -> Result<Statement, AstError> {
    let assignments = lower_for_assignments(child(node, 0)?)?;
    let body = Box::new(lower_statement(child(node, 1)?)?);
    Ok(Statement::Let { assignments, body, span: node.span })
}

fn lower_modifier_statement(node: &CstNode) -> Result<Statement, AstError> {
    let marker = child(node, 0)?;
    let kind = ModifierKind::from_str(marker.text_or_empty())
        .ok_or_else(|| AstError::InvalidCst(format!("unknown modifier '{}'", marker.text_or_empty())))?;
    let statement = Box::new(lower_statement(child(node, 1)?)?);
    Ok(Statement::Modifier { kind, statement, span: node.span })
}

/// A statement used as a for/if body can be a bare statement or a `{ }`
/// block; either way the AST wants a flat `Vec<Statement>`.
fn flatten_statement_body(node: &CstNode) -> Result<Vec<Statement>, AstError> {
    if node.kind == NodeKind::Block {
        node.children.iter().map(lower_statement).collect()
    } else {
        Ok(vec![lower_statement(node)?])
    }
}

// =============================================================================
// EXPRESSIONS
// =============================================================================

fn lower_expression(node: &CstNode) -> Result<Expression, AstError> {
    match node.kind {
        NodeKind::Number => {
            let text = node.text_or_empty();
            text.parse::<f64>()
                .map(Expression::Number)
                .map_err(|_| AstError::InvalidNumber(text.to_string()))
        }
        NodeKind::String => Ok(Expression::String(unescape_string(node.text_or_empty()))),
        NodeKind::Boolean => Ok(Expression::Boolean(node.text_or_empty() == "true")),
        NodeKind::Undef => Ok(Expression::Undef),
        NodeKind::Identifier => Ok(Expression::Identifier(node.text_or_empty().to_string())),
        NodeKind::SpecialVariable => Ok(Expression::SpecialVariable(node.text_or_empty().to_string())),
        NodeKind::List => Ok(Expression::List(
            node.children.iter().map(lower_expression).collect::<Result<_, _>>()?,
        )),
        NodeKind::Range => lower_range(node),
        NodeKind::BinaryExpression => lower_binary_expression(node),
        NodeKind::UnaryExpression => lower_unary_expression(node),
        NodeKind::TernaryExpression => Ok(Expression::Ternary {
            condition: Box::new(lower_expression(child(node, 0)?)?),
            then_expr: Box::new(lower_expression(child(node, 1)?)?),
            else_expr: Box::new(lower_expression(child(node, 2)?)?),
        }),
        NodeKind::FunctionCall => lower_function_call(node),
        NodeKind::IndexExpression => Ok(Expression::Index {
            object: Box::new(lower_expression(child(node, 0)?)?),
            index: Box::new(lower_expression(child(node, 1)?)?),
        }),
        NodeKind::DotExpression => Ok(Expression::Member {
            object: Box::new(lower_expression(child(node, 0)?)?),
            member: child(node, 1)?.text_or_empty().to_string(),
        }),
        NodeKind::ListComprehension => lower_list_comprehension(node),
        NodeKind::LetBlock => {
            let assignments = lower_for_assignments(child(node, 0)?)?;
            let body = Box::new(lower_expression(child(node, 1)?)?);
            Ok(Expression::Let { assignments, body })
        }
        other => Err(AstError::UnsupportedNode(format!("{:?} as expression", other))),
    }
}

fn lower_range(node: &CstNode) -> Result<Expression, AstError> {
    match node.children.len() {
        2 => Ok(Expression::Range {
            start: Box::new(lower_expression(child(node, 0)?)?),
            end: Box::new(lower_expression(child(node, 1)?)?),
            step: None,
        }),
        3 => Ok(Expression::Range {
            start: Box::new(lower_expression(child(node, 0)?)?),
            step: Some(Box::new(lower_expression(child(node, 1)?)?)),
            end: Box::new(lower_expression(child(node, 2)?)?),
        }),
        n => Err(AstError::InvalidCst(format!("range with {} children", n))),
    }
}

fn lower_binary_expression(node: &CstNode) -> Result<Expression, AstError> {
    let left = lower_expression(child(node, 0)?)?;
    let op_text = child(node, 1)?.text_or_empty();
    let op = BinaryOp::from_str(op_text)
        .ok_or_else(|| AstError::InvalidCst(format!("unknown binary operator '{}'", op_text)))?;
    let right = lower_expression(child(node, 2)?)?;
    Ok(Expression::BinaryOp { op, left: Box::new(left), right: Box::new(right) })
}

fn lower_unary_expression(node: &CstNode) -> Result<Expression, AstError> {
    let op_text = child(node, 0)?.text_or_empty();
    let op = UnaryOp::from_str(op_text)
        .ok_or_else(|| AstError::InvalidCst(format!("unknown unary operator '{}'", op_text)))?;
    let operand = Box::new(lower_expression(child(node, 1)?)?);
    Ok(Expression::UnaryOp { op, operand })
}

fn lower_function_call(node: &CstNode) -> Result<Expression, AstError> {
    let callee = child(node, 0)?;
    let name = match callee.kind {
        NodeKind::Identifier => callee.text_or_empty().to_string(),
        other => {
            return Err(AstError::UnsupportedNode(format!(
                "function call with non-identifier callee {:?}",
                other
            )))
        }
    };
    let args = lower_arguments(child(node, 1)?)?;
    Ok(Expression::FunctionCall { name, args })
}

fn lower_list_comprehension(node: &CstNode) -> Result<Expression, AstError> {
    let assignments = lower_for_assignments(child(node, 0)?)?;
    let (condition, body) = match node.children.len() {
        2 => (None, lower_expression(child(node, 1)?)?),
        3 => (Some(Box::new(lower_expression(child(node, 1)?)?)), lower_expression(child(node, 2)?)?),
        n => return Err(AstError::InvalidCst(format!("list comprehension with {} children", n))),
    };
    Ok(Expression::ListComprehension { assignments, condition, body: Box::new(body) })
}

// =============================================================================
// SHARED HELPERS
// =============================================================================

fn lower_arguments(node: &CstNode) -> Result<Vec<Argument>, AstError> {
    node.children.iter().map(lower_argument).collect()
}

fn lower_argument(node: &CstNode) -> Result<Argument, AstError> {
    match node.kind {
        NodeKind::Argument => Ok(Argument::Positional(lower_expression(child(node, 0)?)?)),
        NodeKind::NamedArgument => Ok(Argument::Named {
            name: child(node, 0)?.text_or_empty().to_string(),
            value: lower_expression(child(node, 1)?)?,
        }),
        other => Err(AstError::UnsupportedNode(format!("{:?} as argument", other))),
    }
}

fn lower_parameters(node: &CstNode) -> Result<Vec<Parameter>, AstError> {
    node.children
        .iter()
        .map(|p| {
            let name = child(p, 0)?.text_or_empty().to_string();
            let default = match p.children.get(1) {
                Some(expr) => Some(lower_expression(expr)?),
                None => None,
            };
            Ok(Parameter { name, default })
        })
        .collect()
}

fn lower_for_assignments(node: &CstNode) -> Result<Vec<(String, Expression)>, AstError> {
    node.children
        .iter()
        .map(|a| {
            let name = child(a, 0)?.text_or_empty().to_string();
            let value = lower_expression(child(a, 1)?)?;
            Ok((name, value))
        })
        .collect()
}

fn child<'a>(node: &'a CstNode, index: usize) -> Result<&'a CstNode, AstError> {
    node.children
        .get(index)
        .ok_or_else(|| AstError::InvalidCst(format!("{:?} missing child {}", node.kind, index)))
}

/// Strip the surrounding quotes from a string token and resolve escapes.
///
/// The lexer hands us the raw source slice including the `"..."` delimiters,
/// so `"a\nb"` arrives as the seven characters `"`, `a`, `\`, `n`, `b`, `"`.
fn unescape_string(raw: &str) -> String {
    let inner = raw.strip_prefix('"').unwrap_or(raw);
    let inner = inner.strip_suffix('"').unwrap_or(inner);

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn lower(source: &str) -> Ast {
        let cst = openscad_parser::parse(source);
        lower_cst(&cst).unwrap_or_else(|e| panic!("lowering failed for {:?}: {}", source, e))
    }

    #[test]
    fn lowers_module_call() {
        let ast = lower("cube(10, center=true);");
        assert_eq!(ast.statements.len(), 1);
        match &ast.statements[0] {
            Statement::ModuleCall { name, args, children, .. } => {
                assert_eq!(name, "cube");
                assert_eq!(args.len(), 2);
                assert!(children.is_empty());
            }
            other => panic!("expected ModuleCall, got {:?}", other),
        }
    }

    #[test]
    fn lowers_transform_with_child() {
        let ast = lower("translate([1,2,3]) cube(5);");
        match &ast.statements[0] {
            Statement::ModuleCall { name, children, .. } => {
                assert_eq!(name, "translate");
                assert_eq!(children.len(), 1);
            }
            other => panic!("expected ModuleCall, got {:?}", other),
        }
    }

    #[test]
    fn lowers_module_declaration_and_block_body() {
        let ast = lower("module foo() { cube(1); sphere(2); }");
        match &ast.statements[0] {
            Statement::ModuleDeclaration { name, body, .. } => {
                assert_eq!(name, "foo");
                assert_eq!(body.len(), 2);
            }
            other => panic!("expected ModuleDeclaration, got {:?}", other),
        }
    }

    #[test]
    fn lowers_function_declaration() {
        let ast = lower("function double(x) = x * 2;");
        match &ast.statements[0] {
            Statement::FunctionDeclaration { name, params, body, .. } => {
                assert_eq!(name, "double");
                assert_eq!(params.len(), 1);
                assert!(matches!(body, Expression::BinaryOp { .. }));
            }
            other => panic!("expected FunctionDeclaration, got {:?}", other),
        }
    }

    #[test]
    fn lowers_for_loop() {
        let ast = lower("for (i = [0:10]) cube(i);");
        match &ast.statements[0] {
            Statement::ForLoop { assignments, body, .. } => {
                assert_eq!(assignments.len(), 1);
                assert_eq!(assignments[0].0, "i");
                assert_eq!(body.len(), 1);
            }
            other => panic!("expected ForLoop, got {:?}", other),
        }
    }

    #[test]
    fn lowers_if_else() {
        let ast = lower("if (x > 0) cube(1); else sphere(1);");
        match &ast.statements[0] {
            Statement::IfElse { then_body, else_body, .. } => {
                assert_eq!(then_body.len(), 1);
                assert!(else_body.is_some());
            }
            other => panic!("expected IfElse, got {:?}", other),
        }
    }

    #[test]
    fn lowers_let_statement() {
        let ast = lower("let (x = 1, y = 2) cube(x + y);");
        match &ast.statements[0] {
            Statement::Let { assignments, .. } => assert_eq!(assignments.len(), 2),
            other => panic!("expected Let, got {:?}", other),
        }
    }

    #[test]
    fn lowers_echo_and_assert() {
        let ast = lower(r#"echo("x =", 1); assert(1 > 0, "bad");"#);
        assert!(matches!(ast.statements[0], Statement::Echo { .. }));
        assert!(matches!(ast.statements[1], Statement::Assert { .. }));
    }

    #[test]
    fn lowers_include_and_use() {
        let ast = lower("include <MCAD/boxes.scad>\nuse <helpers.scad>\n");
        match &ast.statements[0] {
            Statement::Include { path, .. } => assert_eq!(path, "MCAD/boxes.scad"),
            other => panic!("expected Include, got {:?}", other),
        }
        match &ast.statements[1] {
            Statement::Use { path, .. } => assert_eq!(path, "helpers.scad"),
            other => panic!("expected Use, got {:?}", other),
        }
    }

    #[test]
    fn lowers_modifier() {
        let ast = lower("* cube(10);");
        match &ast.statements[0] {
            Statement::Modifier { kind, statement, .. } => {
                assert_eq!(*kind, ModifierKind::Disable);
                assert!(matches!(**statement, Statement::ModuleCall { .. }));
            }
            other => panic!("expected Modifier, got {:?}", other),
        }
    }

    #[test]
    fn lowers_string_escapes() {
        let ast = lower(r#"x = "a\nb\"c";"#);
        match &ast.statements[0] {
            Statement::Assignment { value: Expression::String(s), .. } => assert_eq!(s, "a\nb\"c"),
            other => panic!("expected string assignment, got {:?}", other),
        }
    }

    #[test]
    fn lowers_list_comprehension() {
        let ast = lower("squares = [for (i = [0:10]) if (i % 2 == 0) i * i];");
        match &ast.statements[0] {
            Statement::Assignment { value: Expression::ListComprehension { condition, .. }, .. } => {
                assert!(condition.is_some());
            }
            other => panic!("expected list comprehension assignment, got {:?}", other),
        }
    }

    #[test]
    fn lowers_let_expression_in_function_body() {
        let ast = lower("function f(a, b) = let (sum = a + b) sum * sum;");
        match &ast.statements[0] {
            Statement::FunctionDeclaration { body: Expression::Let { assignments, .. }, .. } => {
                assert_eq!(assignments.len(), 1);
            }
            other => panic!("expected let-expression body, got {:?}", other),
        }
    }

    #[test]
    fn rejects_cst_with_parse_errors() {
        let cst = openscad_parser::parse("cube(;");
        assert!(lower_cst(&cst).is_err());
    }
}
