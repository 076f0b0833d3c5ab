use openscad_ast::{parse, print, Statement};

#[test]
fn multmatrix_call_parses_structurally() {
    // Shape validation (a 4x4 matrix is required) is an evaluator concern,
    // not a parse-time one — the AST only records the call and its args.
    let src = "multmatrix([[1,0],[0,1]]) cube(1);";
    let ast = parse(src).unwrap();
    match &ast.statements[0] {
        Statement::ModuleCall { name, args, .. } => {
            assert_eq!(name, "multmatrix");
            assert_eq!(args.len(), 1);
        }
        other => panic!("expected ModuleCall, got {other:?}"),
    }
}

#[test]
fn printed_multmatrix_call_reparses_identically() {
    let src = "multmatrix([[1,0,0,0],[0,1,0,0],[0,0,1,0],[0,0,0,1]]) cube(1);";
    let ast = parse(src).unwrap();
    let reparsed = parse(&print(&ast)).unwrap();
    assert_eq!(reparsed.statements.len(), ast.statements.len());
}
