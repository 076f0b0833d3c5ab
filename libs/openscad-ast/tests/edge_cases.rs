use openscad_ast::{parse, Statement};

#[test]
fn invalid_dot_index_is_rejected() {
    let src = "echo(object.1);";
    assert!(parse(src).is_err());
}

#[test]
fn empty_let_assignments_parse_with_no_bindings() {
    let src = "let () cube(1);";
    let ast = parse(src).unwrap();
    match &ast.statements[0] {
        Statement::Let { assignments, .. } => assert!(assignments.is_empty()),
        other => panic!("expected Let, got {other:?}"),
    }
}

#[test]
fn empty_for_parens_parses_with_no_bindings() {
    let src = "for () cube(1);";
    let ast = parse(src).unwrap();
    match &ast.statements[0] {
        Statement::ForLoop { assignments, .. } => assert!(assignments.is_empty()),
        other => panic!("expected ForLoop, got {other:?}"),
    }
}
