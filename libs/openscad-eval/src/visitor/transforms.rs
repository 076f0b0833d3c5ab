//! # Transform Evaluators
//!
//! Evaluators for geometry transformations.
//!
//! ## Transforms
//!
//! - `translate([x, y, z])` - Move geometry
//! - `rotate([x, y, z])` - Rotate geometry
//! - `scale([x, y, z])` - Scale geometry
//! - `mirror([x, y, z])` - Mirror geometry
//! - `multmatrix(m)` - Arbitrary 4x4 affine transform
//! - `resize(newsize, auto)` - Fit geometry to a target bounding box
//! - `color([r, g, b, a])` - Color geometry
//!
//! ## Example
//!
//! ```rust,ignore
//! let node = eval_translate(&mut ctx, &args, &children)?;
//! ```

use crate::colors::resolve_color_str;
use crate::error::EvalError;
use crate::geometry::GeometryNode;
use crate::value::Value;
use openscad_ast::{Argument, Statement};

use super::context::{EvalContext, evaluate_statements};
use super::expressions::eval_expr;

const IDENTITY_MATRIX: [[f64; 4]; 4] = [
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];

// =============================================================================
// TRANSFORMS
// =============================================================================

/// Evaluate translate() call.
///
/// ## OpenSCAD Signature
///
/// ```text
/// translate([x, y, z]) child;
/// translate(v=[x, y, z]) child;
/// ```
///
/// ## Parameters
///
/// - `ctx`: Evaluation context
/// - `args`: Translation offset arguments
/// - `children`: Child statements to transform
pub fn eval_translate(
    ctx: &mut EvalContext,
    args: &[Argument],
    children: &[Statement],
) -> Result<GeometryNode, EvalError> {
    let offset = args.first()
        .map(|a| match a {
            Argument::Positional(e) => eval_expr(ctx, e),
            Argument::Named { value, .. } => eval_expr(ctx, value),
        })
        .transpose()?
        .map(|v| v.as_vec3())
        .transpose()?
        .unwrap_or([0.0, 0.0, 0.0]);

    let child = evaluate_statements(ctx, children)?;
    Ok(GeometryNode::Translate {
        offset,
        child: Box::new(child),
    })
}

/// Evaluate rotate() call.
///
/// ## OpenSCAD Signature
///
/// ```text
/// rotate([x, y, z]) child;       // Euler angles in degrees
/// rotate(a, v=[x, y, z]) child;  // Angle around axis (not yet supported)
/// ```
///
/// ## Parameters
///
/// - `ctx`: Evaluation context
/// - `args`: Rotation angles arguments
/// - `children`: Child statements to transform
pub fn eval_rotate(
    ctx: &mut EvalContext,
    args: &[Argument],
    children: &[Statement],
) -> Result<GeometryNode, EvalError> {
    let angles = args.first()
        .map(|a| match a {
            Argument::Positional(e) => eval_expr(ctx, e),
            Argument::Named { value, .. } => eval_expr(ctx, value),
        })
        .transpose()?
        .map(|v| v.as_vec3())
        .transpose()?
        .unwrap_or([0.0, 0.0, 0.0]);

    let child = evaluate_statements(ctx, children)?;
    Ok(GeometryNode::Rotate {
        angles,
        child: Box::new(child),
    })
}

/// Evaluate scale() call.
///
/// ## OpenSCAD Signature
///
/// ```text
/// scale([x, y, z]) child;
/// scale(v=[x, y, z]) child;
/// ```
///
/// ## Parameters
///
/// - `ctx`: Evaluation context
/// - `args`: Scale factor arguments
/// - `children`: Child statements to transform
pub fn eval_scale(
    ctx: &mut EvalContext,
    args: &[Argument],
    children: &[Statement],
) -> Result<GeometryNode, EvalError> {
    let factors = args.first()
        .map(|a| match a {
            Argument::Positional(e) => eval_expr(ctx, e),
            Argument::Named { value, .. } => eval_expr(ctx, value),
        })
        .transpose()?
        .map(|v| v.as_vec3())
        .transpose()?
        .unwrap_or([1.0, 1.0, 1.0]);

    let child = evaluate_statements(ctx, children)?;
    Ok(GeometryNode::Scale {
        factors,
        child: Box::new(child),
    })
}

/// Evaluate mirror() call.
///
/// ## OpenSCAD Signature
///
/// ```text
/// mirror([x, y, z]) child;
/// mirror(v=[x, y, z]) child;
/// ```
///
/// The vector specifies the normal of the mirror plane passing through origin.
///
/// ## Parameters
///
/// - `ctx`: Evaluation context
/// - `args`: Mirror plane normal arguments
/// - `children`: Child statements to transform
pub fn eval_mirror(
    ctx: &mut EvalContext,
    args: &[Argument],
    children: &[Statement],
) -> Result<GeometryNode, EvalError> {
    let normal = args.first()
        .map(|a| match a {
            Argument::Positional(e) => eval_expr(ctx, e),
            Argument::Named { value, .. } => eval_expr(ctx, value),
        })
        .transpose()?
        .map(|v| v.as_vec3())
        .transpose()?
        .unwrap_or([1.0, 0.0, 0.0]);

    let child = evaluate_statements(ctx, children)?;
    Ok(GeometryNode::Mirror {
        normal,
        child: Box::new(child),
    })
}

/// Parse `multmatrix()`'s `m` argument: a 4x4 list-of-lists, row-major as
/// OpenSCAD source writes it.
fn row_major_matrix_from_value(value: &Value) -> Result<[[f64; 4]; 4], EvalError> {
    match value {
        Value::List(rows) if rows.len() == 4 => {
            let mut out = [[0.0; 4]; 4];
            for (r, row) in rows.iter().enumerate() {
                let nums = row.as_number_list()?;
                if nums.len() != 4 {
                    return Err(EvalError::InvalidArgument(
                        "multmatrix(): each row must have 4 numbers".to_string(),
                    ));
                }
                out[r].copy_from_slice(&nums);
            }
            Ok(out)
        }
        _ => Err(EvalError::InvalidArgument(
            "multmatrix(): m must be a 4x4 list of lists".to_string(),
        )),
    }
}

/// The mesh layer's `Mesh::transform` reads `matrix[col][row]`; OpenSCAD
/// source writes the matrix row-major, so transpose once here (§4.4).
fn transpose_to_column_major(rows: [[f64; 4]; 4]) -> [[f64; 4]; 4] {
    let mut out = [[0.0; 4]; 4];
    for (r, row) in rows.iter().enumerate() {
        for (c, value) in row.iter().enumerate() {
            out[c][r] = *value;
        }
    }
    out
}

/// Evaluate multmatrix() call: an arbitrary affine transform given as a
/// 4x4 matrix (§4.4).
///
/// ## OpenSCAD Signature
///
/// ```text
/// multmatrix(m) child;  // m = [[r00,r01,r02,tx], [r10,r11,r12,ty], [r20,r21,r22,tz], [0,0,0,1]]
/// ```
///
/// ## Parameters
///
/// - `ctx`: Evaluation context
/// - `args`: The matrix argument
/// - `children`: Child statements to transform
pub fn eval_multmatrix(
    ctx: &mut EvalContext,
    args: &[Argument],
    children: &[Statement],
) -> Result<GeometryNode, EvalError> {
    let value = args
        .first()
        .map(|a| match a {
            Argument::Positional(e) => eval_expr(ctx, e),
            Argument::Named { value, .. } => eval_expr(ctx, value),
        })
        .transpose()?;

    let matrix = match value {
        Some(v) => match row_major_matrix_from_value(&v) {
            Ok(rows) => transpose_to_column_major(rows),
            Err(_) => {
                ctx.warn(format!(
                    "multmatrix(): m must be a 4x4 list of lists, got {:?}; using identity",
                    v
                ));
                IDENTITY_MATRIX
            }
        },
        None => IDENTITY_MATRIX,
    };

    let child = evaluate_statements(ctx, children)?;
    Ok(GeometryNode::Multmatrix {
        matrix,
        child: Box::new(child),
    })
}

/// Evaluate resize() call: scale geometry so its bounding box matches
/// `newsize`, resolved against the child's real mesh extent at the mesh
/// layer (§6.3).
///
/// ## OpenSCAD Signature
///
/// ```text
/// resize([x, y, z]) child;
/// resize([x, y, z], auto=[ax, ay, az]) child;
/// resize([x, y, z], auto=true) child;
/// ```
///
/// A `0` component of `newsize` leaves that axis unscaled unless its
/// `auto` flag is set, in which case it scales to match the other axes'
/// average factor.
///
/// ## Parameters
///
/// - `ctx`: Evaluation context
/// - `args`: Target size and optional per-axis `auto` arguments
/// - `children`: Child statements to resize
pub fn eval_resize(
    ctx: &mut EvalContext,
    args: &[Argument],
    children: &[Statement],
) -> Result<GeometryNode, EvalError> {
    let mut newsize = [0.0, 0.0, 0.0];
    let mut auto = [false, false, false];

    for (i, arg) in args.iter().enumerate() {
        match arg {
            Argument::Positional(expr) => {
                if i == 0 {
                    newsize = eval_expr(ctx, expr)?.as_vec3().unwrap_or(newsize);
                } else if i == 1 {
                    auto = auto_flags_from_value(&eval_expr(ctx, expr)?);
                }
            }
            Argument::Named { name, value } => match name.as_str() {
                "newsize" => newsize = eval_expr(ctx, value)?.as_vec3().unwrap_or(newsize),
                "auto" => auto = auto_flags_from_value(&eval_expr(ctx, value)?),
                _ => {}
            },
        }
    }

    let child = evaluate_statements(ctx, children)?;
    Ok(GeometryNode::Resize {
        newsize,
        auto,
        child: Box::new(child),
    })
}

/// Parse `resize()`'s `auto` argument: a single boolean applied to every
/// axis, or a `[bool, bool, bool]` per-axis list.
fn auto_flags_from_value(value: &Value) -> [bool; 3] {
    match value {
        Value::List(items) => {
            let mut flags = [false, false, false];
            for (i, item) in items.iter().take(3).enumerate() {
                flags[i] = item.as_boolean();
            }
            flags
        }
        other => {
            let flag = other.as_boolean();
            [flag, flag, flag]
        }
    }
}

/// Evaluate color() call.
///
/// ## OpenSCAD Signature
///
/// ```text
/// color([r, g, b]) child;
/// color([r, g, b, a]) child;
/// color("colorname") child;  // Not yet supported
/// ```
///
/// ## Parameters
///
/// - `ctx`: Evaluation context
/// - `args`: Color arguments (RGBA, 0.0-1.0)
/// - `children`: Child statements to color
pub fn eval_color(
    ctx: &mut EvalContext,
    args: &[Argument],
    children: &[Statement],
) -> Result<GeometryNode, EvalError> {
    let mut rgba = [1.0, 1.0, 1.0, 1.0];
    let mut positional = args.iter().filter_map(|arg| match arg {
        Argument::Positional(expr) => Some(expr),
        Argument::Named { .. } => None,
    });

    if let Some(expr) = positional.next() {
        let value = eval_expr(ctx, expr)?;
        match value {
            // `color("red")`, `color("#rrggbb")`, `color("#rrggbbaa")` — a
            // CSS-style name or hex literal; unknown names resolve to
            // medium gray rather than erroring (§4.4).
            Value::String(name) => rgba = resolve_color_str(&name),
            // `color([r, g, b])` / `color([r, g, b, a])`.
            _ => {
                let nums = value.as_number_list()?;
                for (i, n) in nums.iter().take(4).enumerate() {
                    rgba[i] = *n;
                }
            }
        }
    }

    // `color(c, alpha)` — a second positional argument overrides whatever
    // alpha the first argument carried.
    if let Some(expr) = positional.next() {
        let value = eval_expr(ctx, expr)?;
        if let Value::Number(alpha) = value {
            rgba[3] = alpha;
        }
    }

    let child = evaluate_statements(ctx, children)?;
    Ok(GeometryNode::Color {
        rgba,
        child: Box::new(child),
    })
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use openscad_ast::Expression;

    fn ctx() -> EvalContext {
        EvalContext::new()
    }

    #[test]
    fn test_eval_translate_default() {
        let mut ctx = ctx();
        let node = eval_translate(&mut ctx, &[], &[]).unwrap();
        match node {
            GeometryNode::Translate { offset, .. } => {
                assert_eq!(offset, [0.0, 0.0, 0.0]);
            }
            _ => panic!("Expected Translate"),
        }
    }

    #[test]
    fn test_eval_translate_with_offset() {
        let mut ctx = ctx();
        let args = vec![Argument::Positional(Expression::List(vec![
            Expression::Number(1.0),
            Expression::Number(2.0),
            Expression::Number(3.0),
        ]))];
        let node = eval_translate(&mut ctx, &args, &[]).unwrap();
        match node {
            GeometryNode::Translate { offset, .. } => {
                assert_eq!(offset, [1.0, 2.0, 3.0]);
            }
            _ => panic!("Expected Translate"),
        }
    }

    #[test]
    fn test_eval_rotate_default() {
        let mut ctx = ctx();
        let node = eval_rotate(&mut ctx, &[], &[]).unwrap();
        match node {
            GeometryNode::Rotate { angles, .. } => {
                assert_eq!(angles, [0.0, 0.0, 0.0]);
            }
            _ => panic!("Expected Rotate"),
        }
    }

    #[test]
    fn test_eval_scale_default() {
        let mut ctx = ctx();
        let node = eval_scale(&mut ctx, &[], &[]).unwrap();
        match node {
            GeometryNode::Scale { factors, .. } => {
                assert_eq!(factors, [1.0, 1.0, 1.0]);
            }
            _ => panic!("Expected Scale"),
        }
    }

    #[test]
    fn test_eval_mirror_default() {
        let mut ctx = ctx();
        let node = eval_mirror(&mut ctx, &[], &[]).unwrap();
        match node {
            GeometryNode::Mirror { normal, .. } => {
                assert_eq!(normal, [1.0, 0.0, 0.0]);
            }
            _ => panic!("Expected Mirror"),
        }
    }

    #[test]
    fn test_eval_multmatrix_identity_default() {
        let mut ctx = ctx();
        let node = eval_multmatrix(&mut ctx, &[], &[]).unwrap();
        match node {
            GeometryNode::Multmatrix { matrix, .. } => {
                assert_eq!(matrix, IDENTITY_MATRIX);
            }
            _ => panic!("Expected Multmatrix"),
        }
    }

    #[test]
    fn test_eval_multmatrix_translation_transposes_to_column_major() {
        let mut ctx = ctx();
        let row = |vals: [f64; 4]| {
            Expression::List(vals.iter().map(|v| Expression::Number(*v)).collect())
        };
        let m = Expression::List(vec![
            row([1.0, 0.0, 0.0, 5.0]),
            row([0.0, 1.0, 0.0, 6.0]),
            row([0.0, 0.0, 1.0, 7.0]),
            row([0.0, 0.0, 0.0, 1.0]),
        ]);
        let args = vec![Argument::Positional(m)];
        let node = eval_multmatrix(&mut ctx, &args, &[]).unwrap();
        match node {
            GeometryNode::Multmatrix { matrix, .. } => {
                // Translation column lands at column index 3 after transposing
                // from row-major source to the mesh layer's column-major read.
                assert_eq!(matrix[3], [5.0, 6.0, 7.0, 1.0]);
            }
            _ => panic!("Expected Multmatrix"),
        }
    }

    #[test]
    fn test_eval_resize_default() {
        let mut ctx = ctx();
        let node = eval_resize(&mut ctx, &[], &[]).unwrap();
        match node {
            GeometryNode::Resize { newsize, auto, .. } => {
                assert_eq!(newsize, [0.0, 0.0, 0.0]);
                assert_eq!(auto, [false, false, false]);
            }
            _ => panic!("Expected Resize"),
        }
    }

    #[test]
    fn test_eval_resize_with_auto() {
        let mut ctx = ctx();
        let args = vec![
            Argument::Positional(Expression::List(vec![
                Expression::Number(10.0),
                Expression::Number(0.0),
                Expression::Number(0.0),
            ])),
            Argument::Positional(Expression::Boolean(true)),
        ];
        let node = eval_resize(&mut ctx, &args, &[]).unwrap();
        match node {
            GeometryNode::Resize { newsize, auto, .. } => {
                assert_eq!(newsize, [10.0, 0.0, 0.0]);
                assert_eq!(auto, [true, true, true]);
            }
            _ => panic!("Expected Resize"),
        }
    }

    #[test]
    fn test_eval_color_default() {
        let mut ctx = ctx();
        let node = eval_color(&mut ctx, &[], &[]).unwrap();
        match node {
            GeometryNode::Color { rgba, .. } => {
                assert_eq!(rgba, [1.0, 1.0, 1.0, 1.0]);
            }
            _ => panic!("Expected Color"),
        }
    }
}
