//! End-to-end evaluation scenarios exercising the full
//! lex → parse → evaluate → mesh → wire-`Geometry` pipeline through
//! [`Engine::evaluate`], one per representative case a host integration
//! would actually hit.

use openscad_engine::{CancellationToken, Engine};
use pipeline_types::{EvalRequest, Geometry, Language};

async fn run_openscad(code: &str) -> pipeline_types::EvalResponse {
    let engine = Engine::new();
    engine
        .evaluate(
            EvalRequest { code: code.to_string(), language: Language::OpenScad, t: None },
            CancellationToken::new(),
        )
        .await
}

#[tokio::test]
async fn simple_cube_produces_single_geometry() {
    let response = run_openscad("cube(10);").await;
    assert!(response.success, "errors: {:?}", response.errors);
    match response.geometry.expect("geometry") {
        Geometry::Single { vertices, indices, bounds, .. } => {
            assert!(!vertices.is_empty());
            assert!(!indices.is_empty());
            assert!((bounds.max[0] - 10.0).abs() < 0.01);
        }
        Geometry::Chunked { .. } => panic!("small cube should not chunk"),
    }
}

#[tokio::test]
async fn centered_sphere_respects_fn_quality() {
    let response = run_openscad("sphere(r=5, $fn=32);").await;
    assert!(response.success, "errors: {:?}", response.errors);
    match response.geometry.expect("geometry") {
        Geometry::Single { bounds, .. } => {
            // A sphere of radius 5 centered at the origin spans [-5, 5].
            assert!((bounds.max[0] - 5.0).abs() < 0.5);
            assert!((bounds.min[0] + 5.0).abs() < 0.5);
        }
        Geometry::Chunked { .. } => panic!("small sphere should not chunk"),
    }
}

#[tokio::test]
async fn difference_cuts_a_hole() {
    let response = run_openscad(
        "difference() { cube(20, center=true); cylinder(h=30, r=5, center=true, $fn=24); }",
    )
    .await;
    assert!(response.success, "errors: {:?}", response.errors);
    assert!(matches!(response.geometry, Some(Geometry::Single { .. })));
}

#[tokio::test]
async fn colored_union_propagates_first_operand_color() {
    let response = run_openscad("union() { color(\"red\") cube(5); sphere(3); }").await;
    assert!(response.success, "errors: {:?}", response.errors);
    match response.geometry.expect("geometry") {
        Geometry::Single { color, .. } => {
            let rgba = color.expect("union should inherit first operand's color");
            assert!((rgba[0] - 1.0).abs() < 0.01);
            assert!(rgba[1] < 0.1);
            assert!(rgba[2] < 0.1);
        }
        Geometry::Chunked { .. } => panic!("small union should not chunk"),
    }
}

#[tokio::test]
async fn linear_extrude_with_twist_is_nonempty() {
    let response = run_openscad("linear_extrude(height=20, twist=180, $fn=64) square(10, center=true);").await;
    assert!(response.success, "errors: {:?}", response.errors);
    match response.geometry.expect("geometry") {
        Geometry::Single { vertices, bounds, .. } => {
            assert!(!vertices.is_empty());
            assert!((bounds.max[2] - bounds.min[2] - 20.0).abs() < 0.5);
        }
        Geometry::Chunked { total_vertices, .. } => assert!(total_vertices > 0),
    }
}

#[tokio::test]
async fn for_loop_places_repeated_geometry() {
    let response = run_openscad(
        "for (i = [0:2]) translate([i * 10, 0, 0]) cube(5);",
    )
    .await;
    assert!(response.success, "errors: {:?}", response.errors);
    match response.geometry.expect("geometry") {
        Geometry::Single { bounds, .. } => {
            // Three cubes of size 5 starting at x=0, 10, 20: overall span > 20.
            assert!(bounds.max[0] > 20.0);
        }
        Geometry::Chunked { .. } => {}
    }
}

#[tokio::test]
async fn root_modifier_short_circuits_to_marked_subtree() {
    let response = run_openscad("cube(100); !sphere(2, $fn=16);").await;
    assert!(response.success, "errors: {:?}", response.errors);
    match response.geometry.expect("geometry") {
        Geometry::Single { bounds, .. } => {
            // Only the `!`-marked sphere (radius 2) should render, not the cube.
            assert!(bounds.max[0] < 3.0, "expected only the root-marked sphere, got bounds {:?}", bounds);
        }
        Geometry::Chunked { .. } => panic!("small sphere should not chunk"),
    }
}

#[tokio::test]
async fn empty_program_reports_null_geometry() {
    let response = run_openscad("x = 1;").await;
    assert!(!response.success);
    assert_eq!(response.errors[0].code, "logic.null_geometry");
}

#[tokio::test]
async fn shape_dsl_forbidden_import_is_rejected_without_execution() {
    let engine = Engine::new();
    let response = engine
        .evaluate(
            EvalRequest {
                code: "import fs from 'fs';\nexport default function main() { return 1; }".to_string(),
                language: Language::JavaScript,
                t: None,
            },
            CancellationToken::new(),
        )
        .await;
    assert!(!response.success);
    assert!(response.errors.iter().any(|e| e.code == "logic.forbidden_import"));
}

#[tokio::test]
async fn shape_dsl_allow_listed_import_passes_static_validation() {
    let engine = Engine::new();
    let response = engine
        .evaluate(
            EvalRequest {
                code: "import { Shape } from 'openscad-shape';\nexport default function main() { return Shape.cube(10); }".to_string(),
                language: Language::JavaScript,
                t: None,
            },
            CancellationToken::new(),
        )
        .await;
    // Scripts are statically checked, not executed, so this still reports
    // `system.unsupported_language` — but with no `logic.*` findings.
    assert!(!response.errors.iter().any(|e| e.code.starts_with("logic.")));
}
