use openscad_ast::{parse, AstError, Statement};

#[test]
fn parses_var_declaration_and_specials() {
    let src = "$fn = 32; a = 1;";
    let ast = parse(src).unwrap();
    assert_eq!(ast.statements.len(), 2);
    assert!(matches!(ast.statements[0], Statement::Assignment { .. }));
}

#[test]
fn parses_transform_chain() {
    let src = "translate([1,2,3]) cube(1);";
    let ast = parse(src).unwrap();
    assert_eq!(ast.statements.len(), 1);
    match &ast.statements[0] {
        Statement::ModuleCall { name, children, .. } => {
            assert_eq!(name, "translate");
            assert_eq!(children.len(), 1);
        }
        other => panic!("expected ModuleCall, got {other:?}"),
    }
}

#[test]
fn syntax_error_on_unterminated_list() {
    let src = "a = [1,2,3";
    let err = parse(src).err().unwrap();
    assert!(matches!(err, AstError::ParseError(_) | AstError::InvalidCst(_)));
}
