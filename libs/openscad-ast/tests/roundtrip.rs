use openscad_ast::{parse, print};

#[test]
fn roundtrip_basic() {
    let src = "a = 1; translate([1,2,3]) cube(1);";
    let ast1 = parse(src).unwrap();
    let out = print(&ast1);
    let ast2 = parse(&out).unwrap();
    assert_eq!(ast2.statements.len(), 2);
}

#[test]
fn roundtrip_boolean_block() {
    let src = "union() { cube(1); sphere(r=2); }";
    let ast1 = parse(src).unwrap();
    let out = print(&ast1);
    let ast2 = parse(&out).unwrap();
    assert_eq!(ast2.statements.len(), ast1.statements.len());
}

#[test]
fn roundtrip_module_declaration() {
    let src = "module box(size=10) { cube(size); }";
    let ast1 = parse(src).unwrap();
    let out = print(&ast1);
    let ast2 = parse(&out).unwrap();
    assert_eq!(ast2.statements.len(), 1);
}
