//! # Printer
//!
//! Renders an [`Ast`] back to OpenSCAD source text.
//!
//! Not a byte-exact round trip (whitespace and comments are not preserved)
//! but `parse(print(ast))` reproduces an AST equivalent to `ast`.

use crate::ast::{Argument, Ast, BinaryOp, Expression, Parameter, Statement, UnaryOp};

/// Render an AST back to OpenSCAD source text.
pub fn print(ast: &Ast) -> String {
    let mut out = String::new();
    for stmt in &ast.statements {
        print_statement(&mut out, stmt, 0);
    }
    out
}

/// Alias for [`print`].
pub fn unparse(ast: &Ast) -> String {
    print(ast)
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str("    ");
    }
}

fn print_statement(out: &mut String, stmt: &Statement, depth: usize) {
    indent(out, depth);
    match stmt {
        Statement::ModuleCall { name, args, children, .. } => {
            out.push_str(name);
            out.push('(');
            print_args(out, args);
            out.push(')');
            print_body(out, children, depth);
        }
        Statement::Assignment { name, value, .. } => {
            out.push_str(name);
            out.push_str(" = ");
            print_expr(out, value);
            out.push_str(";\n");
        }
        Statement::ModuleDeclaration { name, params, body, .. } => {
            out.push_str("module ");
            out.push_str(name);
            out.push('(');
            print_params(out, params);
            out.push(')');
            print_body(out, body, depth);
        }
        Statement::FunctionDeclaration { name, params, body, .. } => {
            out.push_str("function ");
            out.push_str(name);
            out.push('(');
            print_params(out, params);
            out.push_str(") = ");
            print_expr(out, body);
            out.push_str(";\n");
        }
        Statement::ForLoop { assignments, body, .. } => {
            out.push_str("for (");
            print_assignments(out, assignments);
            out.push(')');
            print_body(out, body, depth);
        }
        Statement::IfElse { condition, then_body, else_body, .. } => {
            out.push_str("if (");
            print_expr(out, condition);
            out.push(')');
            print_body(out, then_body, depth);
            if let Some(else_body) = else_body {
                indent(out, depth);
                out.push_str("else");
                print_body(out, else_body, depth);
            }
        }
        Statement::Block { statements, .. } => {
            out.push('{');
            out.push('\n');
            for inner in statements {
                print_statement(out, inner, depth + 1);
            }
            indent(out, depth);
            out.push_str("}\n");
        }
        Statement::Let { assignments, body, .. } => {
            out.push_str("let (");
            print_assignments(out, assignments);
            out.push(')');
            out.push(' ');
            print_statement_inline(out, body, depth);
        }
        Statement::Echo { args, .. } => {
            out.push_str("echo(");
            print_args(out, args);
            out.push_str(");\n");
        }
        Statement::Assert { args, .. } => {
            out.push_str("assert(");
            print_args(out, args);
            out.push_str(");\n");
        }
        Statement::Include { path, .. } => {
            out.push_str("include <");
            out.push_str(path);
            out.push_str(">;\n");
        }
        Statement::Use { path, .. } => {
            out.push_str("use <");
            out.push_str(path);
            out.push_str(">;\n");
        }
        Statement::Modifier { kind, statement, .. } => {
            // Undo the indent just pushed so the modifier character lands
            // directly before the inner statement's own indentation.
            out.truncate(out.len() - depth * 4);
            indent(out, depth);
            out.push(modifier_char(*kind));
            print_statement_inline(out, statement, depth);
        }
    }
}

/// Print a statement without re-emitting leading indentation (used when the
/// caller has already placed the cursor mid-line, e.g. after `let (...) ` or
/// a modifier character).
fn print_statement_inline(out: &mut String, stmt: &Statement, depth: usize) {
    let mut body = String::new();
    print_statement(&mut body, stmt, depth);
    out.push_str(body.trim_start());
}

fn print_body(out: &mut String, children: &[Statement], depth: usize) {
    match children {
        [] => out.push_str(";\n"),
        [single] if !matches!(single, Statement::Block { .. }) => {
            out.push(' ');
            print_statement_inline(out, single, depth);
        }
        _ => {
            out.push_str(" {\n");
            for child in children {
                print_statement(out, child, depth + 1);
            }
            indent(out, depth);
            out.push_str("}\n");
        }
    }
}

fn print_args(out: &mut String, args: &[Argument]) {
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        match arg {
            Argument::Positional(expr) => print_expr(out, expr),
            Argument::Named { name, value } => {
                out.push_str(name);
                out.push('=');
                print_expr(out, value);
            }
        }
    }
}

fn print_params(out: &mut String, params: &[Parameter]) {
    for (i, param) in params.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(&param.name);
        if let Some(default) = &param.default {
            out.push('=');
            print_expr(out, default);
        }
    }
}

fn print_assignments(out: &mut String, assignments: &[(String, Expression)]) {
    for (i, (name, value)) in assignments.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(name);
        out.push_str(" = ");
        print_expr(out, value);
    }
}

fn print_expr(out: &mut String, expr: &Expression) {
    match expr {
        Expression::Number(n) => out.push_str(&format_number(*n)),
        Expression::String(s) => {
            out.push('"');
            for c in s.chars() {
                match c {
                    '"' => out.push_str("\\\""),
                    '\\' => out.push_str("\\\\"),
                    '\n' => out.push_str("\\n"),
                    _ => out.push(c),
                }
            }
            out.push('"');
        }
        Expression::Boolean(b) => out.push_str(if *b { "true" } else { "false" }),
        Expression::Undef => out.push_str("undef"),
        Expression::Identifier(name) => out.push_str(name),
        Expression::SpecialVariable(name) => {
            out.push('$');
            out.push_str(name);
        }
        Expression::List(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                print_expr(out, item);
            }
            out.push(']');
        }
        Expression::Range { start, end, step } => {
            out.push('[');
            print_expr(out, start);
            out.push(':');
            if let Some(step) = step {
                print_expr(out, step);
                out.push(':');
            }
            print_expr(out, end);
            out.push(']');
        }
        Expression::BinaryOp { op, left, right } => {
            out.push('(');
            print_expr(out, left);
            out.push(' ');
            out.push_str(binary_op_str(*op));
            out.push(' ');
            print_expr(out, right);
            out.push(')');
        }
        Expression::UnaryOp { op, operand } => {
            out.push_str(unary_op_str(*op));
            print_expr(out, operand);
        }
        Expression::Ternary { condition, then_expr, else_expr } => {
            out.push('(');
            print_expr(out, condition);
            out.push_str(" ? ");
            print_expr(out, then_expr);
            out.push_str(" : ");
            print_expr(out, else_expr);
            out.push(')');
        }
        Expression::FunctionCall { name, args } => {
            out.push_str(name);
            out.push('(');
            print_args(out, args);
            out.push(')');
        }
        Expression::Index { object, index } => {
            print_expr(out, object);
            out.push('[');
            print_expr(out, index);
            out.push(']');
        }
        Expression::Member { object, member } => {
            print_expr(out, object);
            out.push('.');
            out.push_str(member);
        }
        Expression::Let { assignments, body } => {
            out.push_str("let (");
            print_assignments(out, assignments);
            out.push_str(") ");
            print_expr(out, body);
        }
        Expression::ListComprehension { assignments, condition, body } => {
            out.push_str("[for (");
            print_assignments(out, assignments);
            out.push(')');
            if let Some(cond) = condition {
                out.push_str(" if (");
                print_expr(out, cond);
                out.push(')');
            }
            out.push(' ');
            print_expr(out, body);
            out.push(']');
        }
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

fn modifier_char(kind: crate::ast::ModifierKind) -> char {
    use crate::ast::ModifierKind;
    match kind {
        ModifierKind::Disable => '*',
        ModifierKind::Root => '!',
        ModifierKind::Debug => '#',
        ModifierKind::Background => '%',
    }
}

fn binary_op_str(op: BinaryOp) -> &'static str {
    match op {
        BinaryOp::Add => "+",
        BinaryOp::Sub => "-",
        BinaryOp::Mul => "*",
        BinaryOp::Div => "/",
        BinaryOp::Mod => "%",
        BinaryOp::Pow => "^",
        BinaryOp::Lt => "<",
        BinaryOp::Gt => ">",
        BinaryOp::Le => "<=",
        BinaryOp::Ge => ">=",
        BinaryOp::Eq => "==",
        BinaryOp::Ne => "!=",
        BinaryOp::And => "&&",
        BinaryOp::Or => "||",
    }
}

fn unary_op_str(op: UnaryOp) -> &'static str {
    match op {
        UnaryOp::Neg => "-",
        UnaryOp::Not => "!",
        UnaryOp::Pos => "+",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use openscad_parser::Span;

    fn span() -> Span {
        Span::default()
    }

    #[test]
    fn prints_simple_module_call() {
        let ast = Ast::with_statements(vec![Statement::ModuleCall {
            name: "cube".to_string(),
            args: vec![Argument::Positional(Expression::Number(10.0))],
            children: vec![],
            span: span(),
        }]);
        assert_eq!(print(&ast), "cube(10);\n");
    }

    #[test]
    fn prints_transform_chain() {
        let ast = Ast::with_statements(vec![Statement::ModuleCall {
            name: "translate".to_string(),
            args: vec![Argument::Positional(Expression::List(vec![
                Expression::Number(1.0),
                Expression::Number(2.0),
                Expression::Number(3.0),
            ]))],
            children: vec![Statement::ModuleCall {
                name: "cube".to_string(),
                args: vec![Argument::Positional(Expression::Number(5.0))],
                children: vec![],
                span: span(),
            }],
            span: span(),
        }]);
        assert_eq!(print(&ast), "translate([1, 2, 3]) cube(5);\n");
    }

    #[test]
    fn round_trips_through_reparse() {
        let ast = Ast::with_statements(vec![Statement::ModuleCall {
            name: "union".to_string(),
            args: vec![],
            children: vec![
                Statement::ModuleCall {
                    name: "cube".to_string(),
                    args: vec![Argument::Positional(Expression::Number(10.0))],
                    children: vec![],
                    span: span(),
                },
                Statement::ModuleCall {
                    name: "sphere".to_string(),
                    args: vec![Argument::Named {
                        name: "r".to_string(),
                        value: Expression::Number(5.0),
                    }],
                    children: vec![],
                    span: span(),
                },
            ],
            span: span(),
        }]);
        let source = print(&ast);
        let reparsed = crate::parse(&source).expect("printed source must reparse");
        assert_eq!(reparsed.statements.len(), ast.statements.len());
    }

    #[test]
    fn prints_assignment() {
        let ast = Ast::with_statements(vec![Statement::Assignment {
            name: "x".to_string(),
            value: Expression::BinaryOp {
                op: BinaryOp::Add,
                left: Box::new(Expression::Number(1.0)),
                right: Box::new(Expression::Number(2.0)),
            },
            span: span(),
        }]);
        assert_eq!(print(&ast), "x = (1 + 2);\n");
    }
}
