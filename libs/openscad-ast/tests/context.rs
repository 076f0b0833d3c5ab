use openscad_ast::{parse, Expression, Statement};

#[test]
fn special_variable_assignments_parse() {
    let src = "$fn = 32; $fa = 12; $fs = 0.5;";
    let ast = parse(src).unwrap();
    assert_eq!(ast.statements.len(), 3);
    for (stmt, expected) in ast.statements.iter().zip(["$fn", "$fa", "$fs"]) {
        match stmt {
            Statement::Assignment { name, value, .. } => {
                assert_eq!(name, expected);
                assert!(matches!(value, Expression::Number(_)));
            }
            other => panic!("expected Assignment, got {other:?}"),
        }
    }
}

#[test]
fn special_variable_reference_parses_as_special_variable() {
    let src = "x = $fn;";
    let ast = parse(src).unwrap();
    match &ast.statements[0] {
        Statement::Assignment { value: Expression::SpecialVariable(name), .. } => {
            assert_eq!(name, "$fn");
        }
        other => panic!("expected SpecialVariable reference, got {other:?}"),
    }
}
