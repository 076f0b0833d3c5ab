//! # Primitive Evaluators
//!
//! Evaluators for 3D and 2D OpenSCAD primitives.
//!
//! ## 3D Primitives
//!
//! - `cube(size, center)` - Box primitive
//! - `sphere(r)` - Sphere primitive
//! - `cylinder(h, r1, r2, center)` - Cylinder primitive
//! - `cone(h, r1, r2, center)` - Tapered cylinder (top radius defaults to a point)
//! - `polyhedron(points, faces)` - Arbitrary-face mesh primitive
//! - `pyramid(size, sides, center)` - Regular n-gon base rising to an apex
//!
//! ## 2D Primitives
//!
//! - `circle(r)` - Circle primitive
//! - `square(size, center)` - Rectangle primitive
//! - `polygon(points, paths)` - Arbitrary outline primitive
//!
//! Every primitive here validates its own parameters rather than letting a
//! malformed or `undef` argument hard-abort the whole evaluation (§4.3):
//! invalid input is reported through [`EvalContext::warn`] and the primitive
//! resolves to [`GeometryNode::Empty`] instead of propagating an error.
//!
//! ## Example
//!
//! ```rust,ignore
//! let node = eval_cube(&mut ctx, &args)?;
//! ```

use crate::error::EvalError;
use crate::geometry::GeometryNode;
use crate::value::Value;
use openscad_ast::Argument;

use super::context::EvalContext;
use super::expressions::eval_expr;

// =============================================================================
// PARAMETER VALIDATION
// =============================================================================

/// Coerce a parsed argument to a number for a primitive's scalar parameter
/// (radius, height, diameter, ...). Unlike [`Value::as_number`], failure
/// (including `undef`) does not abort evaluation: it's recorded as a
/// warning and reported as `None` so the caller can skip the primitive.
fn coerce_dimension(ctx: &mut EvalContext, value: Value, module: &str, param: &str) -> Option<f64> {
    match value.as_number() {
        Ok(n) => Some(n),
        Err(_) => {
            ctx.warn(format!(
                "{module}(): {param} must be a number, got {value:?}; skipping primitive"
            ));
            None
        }
    }
}

/// Coerce a parsed argument to a `[x, y, z]` size/vector parameter,
/// warning and skipping instead of hard-erroring on a bad value.
fn coerce_vec3(ctx: &mut EvalContext, value: Value, module: &str, param: &str) -> Option<[f64; 3]> {
    match value.as_vec3() {
        Ok(v) => Some(v),
        Err(_) => {
            ctx.warn(format!(
                "{module}(): {param} must be a number or [x, y, z], got {value:?}; skipping primitive"
            ));
            None
        }
    }
}

/// Coerce a parsed argument to a `[x, y]` size/vector parameter, warning
/// and skipping instead of hard-erroring on a bad value.
fn coerce_vec2(ctx: &mut EvalContext, value: Value, module: &str, param: &str) -> Option<[f64; 2]> {
    match value.as_vec2() {
        Ok(v) => Some(v),
        Err(_) => {
            ctx.warn(format!(
                "{module}(): {param} must be a number or [x, y], got {value:?}; skipping primitive"
            ));
            None
        }
    }
}

/// Parse a `polygon()`/`polyhedron()` point list: a flat `Value::List` of
/// 2-number entries.
fn points2_from_value(value: &Value) -> Result<Vec<[f64; 2]>, EvalError> {
    match value {
        Value::List(items) => items.iter().map(Value::as_vec2).collect(),
        _ => Err(EvalError::TypeError(format!("Expected a list of [x, y] points, got {:?}", value))),
    }
}

/// Parse a `polyhedron()` point list: a flat `Value::List` of 3-number entries.
fn points3_from_value(value: &Value) -> Result<Vec<[f64; 3]>, EvalError> {
    match value {
        Value::List(items) => items.iter().map(Value::as_vec3).collect(),
        _ => Err(EvalError::TypeError(format!("Expected a list of [x, y, z] points, got {:?}", value))),
    }
}

/// Parse a `polygon()`'s `paths` / `polyhedron()`'s `faces` argument: a
/// list of index lists, each naming vertices by position in `points`.
fn index_lists_from_value(value: &Value) -> Result<Vec<Vec<usize>>, EvalError> {
    match value {
        Value::List(items) => items
            .iter()
            .map(|v| v.as_number_list().map(|nums| nums.iter().map(|n| *n as usize).collect()))
            .collect(),
        _ => Err(EvalError::TypeError(format!("Expected a list of index lists, got {:?}", value))),
    }
}

// =============================================================================
// 3D PRIMITIVES
// =============================================================================

/// Evaluate cube() call.
///
/// ## OpenSCAD Signature
///
/// ```text
/// cube(size);
/// cube(size, center);
/// cube([x, y, z], center);
/// ```
///
/// ## Parameters
///
/// - `ctx`: Evaluation context
/// - `args`: Arguments from the module call
///
/// ## Example
///
/// ```text
/// cube(10);              // 10x10x10 cube at origin
/// cube([10, 20, 30]);    // Rectangular box
/// cube(10, center=true); // Centered cube
/// ```
pub fn eval_cube(ctx: &mut EvalContext, args: &[Argument]) -> Result<GeometryNode, EvalError> {
    let mut size = [1.0, 1.0, 1.0];
    let mut center = false;
    let mut valid = true;

    // Process arguments
    for (i, arg) in args.iter().enumerate() {
        match arg {
            Argument::Positional(expr) => {
                if i == 0 {
                    let value = eval_expr(ctx, expr)?;
                    match coerce_vec3(ctx, value, "cube", "size") {
                        Some(v) => size = v,
                        None => valid = false,
                    }
                } else if i == 1 {
                    center = eval_expr(ctx, expr)?.as_boolean();
                }
            }
            Argument::Named { name, value } => match name.as_str() {
                "size" => {
                    let v = eval_expr(ctx, value)?;
                    match coerce_vec3(ctx, v, "cube", "size") {
                        Some(v) => size = v,
                        None => valid = false,
                    }
                }
                "center" => center = eval_expr(ctx, value)?.as_boolean(),
                _ => ctx.warn(format!("Unknown argument for cube: {}", name)),
            },
        }
    }

    if !valid {
        return Ok(GeometryNode::Empty);
    }
    if size.iter().any(|&s| s < 0.0) {
        ctx.warn(format!("cube(): negative size component {:?}; skipping primitive", size));
        return Ok(GeometryNode::Empty);
    }
    if size.iter().any(|&s| s == 0.0) {
        // Any zero component is an empty but valid manifold (§4.5 tie-break), not a warning.
        return Ok(GeometryNode::Empty);
    }

    Ok(GeometryNode::Cube { size, center })
}

/// Evaluate sphere() call.
///
/// ## OpenSCAD Signature
///
/// ```text
/// sphere(r);
/// sphere(r, $fn);
/// sphere(d=diameter);
/// ```
///
/// ## Parameters
///
/// - `ctx`: Evaluation context
/// - `args`: Arguments from the module call
pub fn eval_sphere(ctx: &mut EvalContext, args: &[Argument]) -> Result<GeometryNode, EvalError> {
    let mut radius = 1.0;
    let mut valid = true;

    for (i, arg) in args.iter().enumerate() {
        match arg {
            Argument::Positional(expr) => {
                if i == 0 {
                    let value = eval_expr(ctx, expr)?;
                    match coerce_dimension(ctx, value, "sphere", "r") {
                        Some(n) => radius = n,
                        None => valid = false,
                    }
                }
            }
            Argument::Named { name, value } => match name.as_str() {
                "r" | "radius" => {
                    let v = eval_expr(ctx, value)?;
                    match coerce_dimension(ctx, v, "sphere", "r") {
                        Some(n) => radius = n,
                        None => valid = false,
                    }
                }
                "d" | "diameter" => {
                    let v = eval_expr(ctx, value)?;
                    match coerce_dimension(ctx, v, "sphere", "d") {
                        Some(n) => radius = n / 2.0,
                        None => valid = false,
                    }
                }
                "$fn" => {
                    let fn_val = eval_expr(ctx, value)?.as_number().unwrap_or(0.0);
                    ctx.scope.define("$fn", Value::Number(fn_val));
                }
                _ => {}
            },
        }
    }

    if !valid {
        return Ok(GeometryNode::Empty);
    }
    if radius <= 0.0 {
        ctx.warn(format!("sphere(): radius must be positive, got {radius}; skipping primitive"));
        return Ok(GeometryNode::Empty);
    }

    let fn_ = ctx.calculate_fragments(radius);
    Ok(GeometryNode::Sphere { radius, fn_ })
}

/// Evaluate cylinder() call.
///
/// ## OpenSCAD Signature
///
/// ```text
/// cylinder(h, r, center);
/// cylinder(h, r1, r2, center);
/// cylinder(h, d, center);
/// ```
///
/// ## Parameters
///
/// - `ctx`: Evaluation context
/// - `args`: Arguments from the module call
pub fn eval_cylinder(ctx: &mut EvalContext, args: &[Argument]) -> Result<GeometryNode, EvalError> {
    let mut height = 1.0;
    let mut radius1 = 1.0;
    let mut radius2 = 1.0;
    let mut center = false;
    let mut valid = true;

    for (i, arg) in args.iter().enumerate() {
        match arg {
            Argument::Positional(expr) => {
                let value = eval_expr(ctx, expr)?;
                if i == 0 {
                    match coerce_dimension(ctx, value, "cylinder", "h") {
                        Some(n) => height = n,
                        None => valid = false,
                    }
                } else if i == 1 {
                    match coerce_dimension(ctx, value, "cylinder", "r") {
                        Some(n) => {
                            radius1 = n;
                            radius2 = n;
                        }
                        None => valid = false,
                    }
                }
            }
            Argument::Named { name, value } => match name.as_str() {
                "h" | "height" => {
                    let v = eval_expr(ctx, value)?;
                    match coerce_dimension(ctx, v, "cylinder", "h") {
                        Some(n) => height = n,
                        None => valid = false,
                    }
                }
                "r" | "radius" => {
                    let v = eval_expr(ctx, value)?;
                    match coerce_dimension(ctx, v, "cylinder", "r") {
                        Some(n) => {
                            radius1 = n;
                            radius2 = n;
                        }
                        None => valid = false,
                    }
                }
                "r1" => {
                    let v = eval_expr(ctx, value)?;
                    match coerce_dimension(ctx, v, "cylinder", "r1") {
                        Some(n) => radius1 = n,
                        None => valid = false,
                    }
                }
                "r2" => {
                    let v = eval_expr(ctx, value)?;
                    match coerce_dimension(ctx, v, "cylinder", "r2") {
                        Some(n) => radius2 = n,
                        None => valid = false,
                    }
                }
                "d" | "diameter" => {
                    let v = eval_expr(ctx, value)?;
                    match coerce_dimension(ctx, v, "cylinder", "d") {
                        Some(n) => {
                            radius1 = n / 2.0;
                            radius2 = n / 2.0;
                        }
                        None => valid = false,
                    }
                }
                "d1" => {
                    let v = eval_expr(ctx, value)?;
                    match coerce_dimension(ctx, v, "cylinder", "d1") {
                        Some(n) => radius1 = n / 2.0,
                        None => valid = false,
                    }
                }
                "d2" => {
                    let v = eval_expr(ctx, value)?;
                    match coerce_dimension(ctx, v, "cylinder", "d2") {
                        Some(n) => radius2 = n / 2.0,
                        None => valid = false,
                    }
                }
                "center" => center = eval_expr(ctx, value)?.as_boolean(),
                "$fn" => {
                    let fn_val = eval_expr(ctx, value)?.as_number().unwrap_or(0.0);
                    ctx.scope.define("$fn", Value::Number(fn_val));
                }
                _ => {}
            },
        }
    }

    if !valid {
        return Ok(GeometryNode::Empty);
    }
    if height <= 0.0 || radius1 < 0.0 || radius2 < 0.0 || (radius1 == 0.0 && radius2 == 0.0) {
        ctx.warn(format!(
            "cylinder(): degenerate dimensions (h={height}, r1={radius1}, r2={radius2}); skipping primitive"
        ));
        return Ok(GeometryNode::Empty);
    }

    let fn_ = ctx.calculate_fragments(radius1.max(radius2));
    Ok(GeometryNode::Cylinder {
        height,
        radius1,
        radius2,
        center,
        fn_,
    })
}

/// Evaluate cone() call — a tapered cylinder (§4.5): the same r1/r2/h/center
/// parsing as `cylinder()`, but the top radius defaults to a point (0)
/// instead of mirroring the base radius. A top radius larger than the base
/// (`r2 > r1`) is a valid, inverted cone.
///
/// ## OpenSCAD Signature
///
/// ```text
/// cone(h, r);               // tapers from r at the base to a point
/// cone(h, r1, r2, center);  // explicit base/top radii
/// ```
pub fn eval_cone(ctx: &mut EvalContext, args: &[Argument]) -> Result<GeometryNode, EvalError> {
    let mut height = 1.0;
    let mut radius1 = 1.0;
    let mut radius2 = 0.0;
    let mut center = false;
    let mut valid = true;

    for (i, arg) in args.iter().enumerate() {
        match arg {
            Argument::Positional(expr) => {
                let value = eval_expr(ctx, expr)?;
                if i == 0 {
                    match coerce_dimension(ctx, value, "cone", "h") {
                        Some(n) => height = n,
                        None => valid = false,
                    }
                } else if i == 1 {
                    match coerce_dimension(ctx, value, "cone", "r") {
                        Some(n) => radius1 = n,
                        None => valid = false,
                    }
                }
            }
            Argument::Named { name, value } => match name.as_str() {
                "h" | "height" => {
                    let v = eval_expr(ctx, value)?;
                    match coerce_dimension(ctx, v, "cone", "h") {
                        Some(n) => height = n,
                        None => valid = false,
                    }
                }
                "r" | "r1" => {
                    let v = eval_expr(ctx, value)?;
                    match coerce_dimension(ctx, v, "cone", "r1") {
                        Some(n) => radius1 = n,
                        None => valid = false,
                    }
                }
                "r2" => {
                    let v = eval_expr(ctx, value)?;
                    match coerce_dimension(ctx, v, "cone", "r2") {
                        Some(n) => radius2 = n,
                        None => valid = false,
                    }
                }
                "d" | "d1" => {
                    let v = eval_expr(ctx, value)?;
                    match coerce_dimension(ctx, v, "cone", "d1") {
                        Some(n) => radius1 = n / 2.0,
                        None => valid = false,
                    }
                }
                "d2" => {
                    let v = eval_expr(ctx, value)?;
                    match coerce_dimension(ctx, v, "cone", "d2") {
                        Some(n) => radius2 = n / 2.0,
                        None => valid = false,
                    }
                }
                "center" => center = eval_expr(ctx, value)?.as_boolean(),
                "$fn" => {
                    let fn_val = eval_expr(ctx, value)?.as_number().unwrap_or(0.0);
                    ctx.scope.define("$fn", Value::Number(fn_val));
                }
                _ => {}
            },
        }
    }

    if !valid {
        return Ok(GeometryNode::Empty);
    }
    if height <= 0.0 || radius1 < 0.0 || radius2 < 0.0 || (radius1 == 0.0 && radius2 == 0.0) {
        ctx.warn(format!(
            "cone(): degenerate dimensions (h={height}, r1={radius1}, r2={radius2}); skipping primitive"
        ));
        return Ok(GeometryNode::Empty);
    }

    let fn_ = ctx.calculate_fragments(radius1.max(radius2));
    Ok(GeometryNode::Cylinder {
        height,
        radius1,
        radius2,
        center,
        fn_,
    })
}

/// Evaluate polyhedron() call.
///
/// ## OpenSCAD Signature
///
/// ```text
/// polyhedron(points, faces);
/// polyhedron(points=[...], triangles=[...]);  // legacy alias for faces
/// ```
pub fn eval_polyhedron(ctx: &mut EvalContext, args: &[Argument]) -> Result<GeometryNode, EvalError> {
    let mut points: Option<Vec<[f64; 3]>> = None;
    let mut faces: Option<Vec<Vec<usize>>> = None;

    for (i, arg) in args.iter().enumerate() {
        match arg {
            Argument::Positional(expr) => {
                let value = eval_expr(ctx, expr)?;
                if i == 0 {
                    match points3_from_value(&value) {
                        Ok(p) => points = Some(p),
                        Err(_) => ctx.warn(format!(
                            "polyhedron(): points must be a list of [x, y, z] triples, got {:?}",
                            value
                        )),
                    }
                } else if i == 1 {
                    match index_lists_from_value(&value) {
                        Ok(f) => faces = Some(f),
                        Err(_) => ctx.warn(format!(
                            "polyhedron(): faces must be a list of index lists, got {:?}",
                            value
                        )),
                    }
                }
            }
            Argument::Named { name, value } => match name.as_str() {
                "points" => {
                    let v = eval_expr(ctx, value)?;
                    match points3_from_value(&v) {
                        Ok(p) => points = Some(p),
                        Err(_) => ctx.warn(format!(
                            "polyhedron(): points must be a list of [x, y, z] triples, got {:?}",
                            v
                        )),
                    }
                }
                "faces" | "triangles" => {
                    let v = eval_expr(ctx, value)?;
                    match index_lists_from_value(&v) {
                        Ok(f) => faces = Some(f),
                        Err(_) => ctx.warn(format!(
                            "polyhedron(): faces must be a list of index lists, got {:?}",
                            v
                        )),
                    }
                }
                _ => ctx.warn(format!("Unknown argument for polyhedron: {}", name)),
            },
        }
    }

    let points = points.unwrap_or_default();
    let faces = faces.unwrap_or_default();
    if points.len() < 4 || faces.is_empty() {
        ctx.warn(format!(
            "polyhedron(): needs at least 4 points and 1 face, got {} points and {} faces; skipping primitive",
            points.len(),
            faces.len()
        ));
        return Ok(GeometryNode::Empty);
    }

    Ok(GeometryNode::Polyhedron { points, faces })
}

/// Parse `pyramid()`'s `size` argument: a bare number (base diameter ==
/// height) or a `[base, height]` pair.
fn parse_pyramid_size(ctx: &mut EvalContext, value: &Value) -> Option<(f64, f64)> {
    match value.as_number_list() {
        Ok(nums) if nums.len() == 1 => Some((nums[0], nums[0])),
        Ok(nums) if nums.len() >= 2 => Some((nums[0], nums[1])),
        _ => {
            ctx.warn(format!("pyramid(): size must be a number or [base, height], got {:?}", value));
            None
        }
    }
}

/// Evaluate pyramid() call: a regular polygon base (`sides` vertices
/// inscribed in a circle of the given base diameter) rising to a single
/// apex, built directly as a [`GeometryNode::Polyhedron`] — the mesh layer
/// already fan-triangulates an arbitrary n-gon face.
///
/// ## OpenSCAD Signature
///
/// ```text
/// pyramid(size);                   // base diameter == height
/// pyramid(size=[base, height]);
/// pyramid(size, sides=4, center=true);
/// ```
pub fn eval_pyramid(ctx: &mut EvalContext, args: &[Argument]) -> Result<GeometryNode, EvalError> {
    let mut base = 1.0;
    let mut height = 1.0;
    let mut sides: i64 = 4;
    let mut center = false;
    let mut valid = true;

    for (i, arg) in args.iter().enumerate() {
        match arg {
            Argument::Positional(expr) => {
                let value = eval_expr(ctx, expr)?;
                if i == 0 {
                    match parse_pyramid_size(ctx, &value) {
                        Some((b, h)) => {
                            base = b;
                            height = h;
                        }
                        None => valid = false,
                    }
                } else if i == 1 {
                    match coerce_dimension(ctx, value, "pyramid", "sides") {
                        Some(n) => sides = n as i64,
                        None => valid = false,
                    }
                } else if i == 2 {
                    center = value.as_boolean();
                }
            }
            Argument::Named { name, value } => match name.as_str() {
                "size" => {
                    let v = eval_expr(ctx, value)?;
                    match parse_pyramid_size(ctx, &v) {
                        Some((b, h)) => {
                            base = b;
                            height = h;
                        }
                        None => valid = false,
                    }
                }
                "sides" => {
                    let v = eval_expr(ctx, value)?;
                    match coerce_dimension(ctx, v, "pyramid", "sides") {
                        Some(n) => sides = n as i64,
                        None => valid = false,
                    }
                }
                "center" => center = eval_expr(ctx, value)?.as_boolean(),
                _ => ctx.warn(format!("Unknown argument for pyramid: {}", name)),
            },
        }
    }

    if !valid {
        return Ok(GeometryNode::Empty);
    }
    if base <= 0.0 || height <= 0.0 || sides < 3 {
        ctx.warn(format!(
            "pyramid(): degenerate dimensions (base={base}, height={height}, sides={sides}); skipping primitive"
        ));
        return Ok(GeometryNode::Empty);
    }
    let sides = sides as usize;

    let z_base = if center { -height / 2.0 } else { 0.0 };
    let z_apex = z_base + height;
    let radius = base / 2.0;

    let mut points = Vec::with_capacity(sides + 1);
    for i in 0..sides {
        let theta = 2.0 * std::f64::consts::PI * (i as f64) / (sides as f64);
        points.push([radius * theta.cos(), radius * theta.sin(), z_base]);
    }
    let apex_index = sides;
    points.push([0.0, 0.0, z_apex]);

    // Base face wound clockwise-from-above so its normal points down and
    // out; each side face winds base-edge-then-apex so its normal points
    // outward.
    let mut faces = Vec::with_capacity(sides + 1);
    faces.push((0..sides).rev().collect::<Vec<_>>());
    for i in 0..sides {
        let next = (i + 1) % sides;
        faces.push(vec![i, next, apex_index]);
    }

    Ok(GeometryNode::Polyhedron { points, faces })
}

// =============================================================================
// 2D PRIMITIVES
// =============================================================================

/// Evaluate circle() call.
///
/// ## OpenSCAD Signature
///
/// ```text
/// circle(r);
/// circle(r, $fn);
/// circle(d=diameter);
/// ```
///
/// ## Parameters
///
/// - `ctx`: Evaluation context
/// - `args`: Arguments from the module call
pub fn eval_circle(ctx: &mut EvalContext, args: &[Argument]) -> Result<GeometryNode, EvalError> {
    let mut radius = 1.0;
    let mut valid = true;

    for (i, arg) in args.iter().enumerate() {
        match arg {
            Argument::Positional(expr) => {
                if i == 0 {
                    let value = eval_expr(ctx, expr)?;
                    match coerce_dimension(ctx, value, "circle", "r") {
                        Some(n) => radius = n,
                        None => valid = false,
                    }
                }
            }
            Argument::Named { name, value } => match name.as_str() {
                "r" | "radius" => {
                    let v = eval_expr(ctx, value)?;
                    match coerce_dimension(ctx, v, "circle", "r") {
                        Some(n) => radius = n,
                        None => valid = false,
                    }
                }
                "d" | "diameter" => {
                    let v = eval_expr(ctx, value)?;
                    match coerce_dimension(ctx, v, "circle", "d") {
                        Some(n) => radius = n / 2.0,
                        None => valid = false,
                    }
                }
                "$fn" => {
                    let fn_val = eval_expr(ctx, value)?.as_number().unwrap_or(0.0);
                    ctx.scope.define("$fn", Value::Number(fn_val));
                }
                _ => {}
            },
        }
    }

    if !valid {
        return Ok(GeometryNode::Empty);
    }
    if radius <= 0.0 {
        ctx.warn(format!("circle(): radius must be positive, got {radius}; skipping primitive"));
        return Ok(GeometryNode::Empty);
    }

    let fn_ = ctx.calculate_fragments(radius);
    Ok(GeometryNode::Circle { radius, fn_ })
}

/// Evaluate square() call.
///
/// ## OpenSCAD Signature
///
/// ```text
/// square(size);
/// square(size, center);
/// square([x, y], center);
/// ```
///
/// ## Parameters
///
/// - `ctx`: Evaluation context
/// - `args`: Arguments from the module call
pub fn eval_square(ctx: &mut EvalContext, args: &[Argument]) -> Result<GeometryNode, EvalError> {
    let mut size = [1.0, 1.0];
    let mut center = false;
    let mut valid = true;

    for (i, arg) in args.iter().enumerate() {
        match arg {
            Argument::Positional(expr) => {
                if i == 0 {
                    let value = eval_expr(ctx, expr)?;
                    match coerce_vec2(ctx, value, "square", "size") {
                        Some(v) => size = v,
                        None => valid = false,
                    }
                } else if i == 1 {
                    center = eval_expr(ctx, expr)?.as_boolean();
                }
            }
            Argument::Named { name, value } => match name.as_str() {
                "size" => {
                    let v = eval_expr(ctx, value)?;
                    match coerce_vec2(ctx, v, "square", "size") {
                        Some(v) => size = v,
                        None => valid = false,
                    }
                }
                "center" => center = eval_expr(ctx, value)?.as_boolean(),
                _ => {}
            },
        }
    }

    if !valid {
        return Ok(GeometryNode::Empty);
    }
    if size.iter().any(|&s| s < 0.0) {
        ctx.warn(format!("square(): negative size component {:?}; skipping primitive", size));
        return Ok(GeometryNode::Empty);
    }
    if size.iter().any(|&s| s == 0.0) {
        return Ok(GeometryNode::Empty);
    }

    Ok(GeometryNode::Square { size, center })
}

/// Evaluate polygon() call.
///
/// ## OpenSCAD Signature
///
/// ```text
/// polygon(points);
/// polygon(points, paths);
/// ```
pub fn eval_polygon(ctx: &mut EvalContext, args: &[Argument]) -> Result<GeometryNode, EvalError> {
    let mut points: Option<Vec<[f64; 2]>> = None;
    let mut paths: Option<Vec<Vec<usize>>> = None;

    for (i, arg) in args.iter().enumerate() {
        match arg {
            Argument::Positional(expr) => {
                let value = eval_expr(ctx, expr)?;
                if i == 0 {
                    match points2_from_value(&value) {
                        Ok(p) => points = Some(p),
                        Err(_) => ctx.warn(format!(
                            "polygon(): points must be a list of [x, y] pairs, got {:?}",
                            value
                        )),
                    }
                } else if i == 1 {
                    match index_lists_from_value(&value) {
                        Ok(p) => paths = Some(p),
                        Err(_) => ctx.warn(format!(
                            "polygon(): paths must be a list of index lists, got {:?}",
                            value
                        )),
                    }
                }
            }
            Argument::Named { name, value } => match name.as_str() {
                "points" => {
                    let v = eval_expr(ctx, value)?;
                    match points2_from_value(&v) {
                        Ok(p) => points = Some(p),
                        Err(_) => ctx.warn(format!(
                            "polygon(): points must be a list of [x, y] pairs, got {:?}",
                            v
                        )),
                    }
                }
                "paths" => {
                    let v = eval_expr(ctx, value)?;
                    match index_lists_from_value(&v) {
                        Ok(p) => paths = Some(p),
                        Err(_) => ctx.warn(format!(
                            "polygon(): paths must be a list of index lists, got {:?}",
                            v
                        )),
                    }
                }
                _ => ctx.warn(format!("Unknown argument for polygon: {}", name)),
            },
        }
    }

    let points = points.unwrap_or_default();
    if points.len() < 3 {
        ctx.warn(format!("polygon(): needs at least 3 points, got {}; skipping primitive", points.len()));
        return Ok(GeometryNode::Empty);
    }

    Ok(GeometryNode::Polygon { points, paths })
}

// =============================================================================
// TEXT AND SURFACE
// =============================================================================

/// Evaluate text() call.
///
/// ## OpenSCAD Signature
///
/// ```text
/// text(t, size, font, halign, valign);
/// ```
pub fn eval_text(ctx: &mut EvalContext, args: &[Argument]) -> Result<GeometryNode, EvalError> {
    let mut text = String::new();
    let mut size = 10.0;
    let mut font = None;
    let mut halign = "left".to_string();
    let mut valign = "baseline".to_string();

    for (i, arg) in args.iter().enumerate() {
        match arg {
            Argument::Positional(expr) => {
                if i == 0 {
                    if let Value::String(s) = eval_expr(ctx, expr)? {
                        text = s;
                    }
                }
            }
            Argument::Named { name, value } => match name.as_str() {
                "t" | "text" => {
                    if let Value::String(s) = eval_expr(ctx, value)? {
                        text = s;
                    }
                }
                "size" => size = eval_expr(ctx, value)?.as_number()?,
                "font" => {
                    if let Value::String(s) = eval_expr(ctx, value)? {
                        font = Some(s);
                    }
                }
                "halign" => {
                    if let Value::String(s) = eval_expr(ctx, value)? {
                        halign = s;
                    }
                }
                "valign" => {
                    if let Value::String(s) = eval_expr(ctx, value)? {
                        valign = s;
                    }
                }
                _ => {}
            },
        }
    }

    Ok(GeometryNode::Text { text, size, font, halign, valign })
}

/// Evaluate surface() call.
///
/// ## OpenSCAD Signature
///
/// ```text
/// surface(file, center, invert);
/// ```
pub fn eval_surface(ctx: &mut EvalContext, args: &[Argument]) -> Result<GeometryNode, EvalError> {
    let mut file = String::new();
    let mut center = false;
    let mut invert = false;

    for (i, arg) in args.iter().enumerate() {
        match arg {
            Argument::Positional(expr) => {
                if i == 0 {
                    if let Value::String(s) = eval_expr(ctx, expr)? {
                        file = s;
                    }
                }
            }
            Argument::Named { name, value } => match name.as_str() {
                "file" => {
                    if let Value::String(s) = eval_expr(ctx, value)? {
                        file = s;
                    }
                }
                "center" => center = eval_expr(ctx, value)?.as_boolean(),
                "invert" => invert = eval_expr(ctx, value)?.as_boolean(),
                _ => {}
            },
        }
    }

    Ok(GeometryNode::Surface { file, center, invert })
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
    fn test_eval_cube_default() {
        let mut ctx = ctx();
        let node = eval_cube(&mut ctx, &[]).unwrap();
        match node {
            GeometryNode::Cube { size, center } => {
                assert_eq!(size, [1.0, 1.0, 1.0]);
                assert!(!center);
            }
            _ => panic!("Expected Cube"),
        }
    }

    #[test]
    fn test_eval_cube_size() {
        let mut ctx = ctx();
        let args = vec![Argument::Positional(Expression::Number(10.0))];
        let node = eval_cube(&mut ctx, &args).unwrap();
        match node {
            GeometryNode::Cube { size, .. } => {
                assert_eq!(size, [10.0, 10.0, 10.0]);
            }
            _ => panic!("Expected Cube"),
        }
    }

    #[test]
    fn test_eval_sphere_default() {
        let mut ctx = ctx();
        let node = eval_sphere(&mut ctx, &[]).unwrap();
        match node {
            GeometryNode::Sphere { radius, fn_ } => {
                assert_eq!(radius, 1.0);
                assert!(fn_ >= 3);
            }
            _ => panic!("Expected Sphere"),
        }
    }

    #[test]
    fn test_eval_cylinder_default() {
        let mut ctx = ctx();
        let node = eval_cylinder(&mut ctx, &[]).unwrap();
        match node {
            GeometryNode::Cylinder { height, radius1, radius2, center, .. } => {
                assert_eq!(height, 1.0);
                assert_eq!(radius1, 1.0);
                assert_eq!(radius2, 1.0);
                assert!(!center);
            }
            _ => panic!("Expected Cylinder"),
        }
    }

    #[test]
    fn test_eval_circle_default() {
        let mut ctx = ctx();
        let node = eval_circle(&mut ctx, &[]).unwrap();
        match node {
            GeometryNode::Circle { radius, fn_ } => {
                assert_eq!(radius, 1.0);
                assert!(fn_ >= 3);
            }
            _ => panic!("Expected Circle"),
        }
    }

    #[test]
    fn test_eval_square_default() {
        let mut ctx = ctx();
        let node = eval_square(&mut ctx, &[]).unwrap();
        match node {
            GeometryNode::Square { size, center } => {
                assert_eq!(size, [1.0, 1.0]);
                assert!(!center);
            }
            _ => panic!("Expected Square"),
        }
    }

    #[test]
    fn test_eval_text_default() {
        let mut ctx = ctx();
        let args = vec![Argument::Positional(Expression::String("hi".to_string()))];
        let node = eval_text(&mut ctx, &args).unwrap();
        match node {
            GeometryNode::Text { text, size, .. } => {
                assert_eq!(text, "hi");
                assert_eq!(size, 10.0);
            }
            _ => panic!("Expected Text"),
        }
    }

    #[test]
    fn test_eval_sphere_negative_radius_warns_and_skips() {
        let mut ctx = ctx();
        let args = vec![Argument::Positional(Expression::Number(-5.0))];
        let node = eval_sphere(&mut ctx, &args).unwrap();
        assert!(matches!(node, GeometryNode::Empty));
        assert_eq!(ctx.warnings.len(), 1);
    }

    #[test]
    fn test_eval_sphere_undef_radius_does_not_abort() {
        let mut ctx = ctx();
        let args = vec![Argument::Positional(Expression::Undef)];
        let node = eval_sphere(&mut ctx, &args).unwrap();
        assert!(matches!(node, GeometryNode::Empty));
        assert_eq!(ctx.warnings.len(), 1);
    }

    #[test]
    fn test_eval_cube_zero_component_is_silently_empty() {
        let mut ctx = ctx();
        let args = vec![Argument::Positional(Expression::List(vec![
            Expression::Number(10.0),
            Expression::Number(0.0),
            Expression::Number(10.0),
        ]))];
        let node = eval_cube(&mut ctx, &args).unwrap();
        assert!(matches!(node, GeometryNode::Empty));
        assert!(ctx.warnings.is_empty());
    }

    #[test]
    fn test_eval_cube_negative_component_warns() {
        let mut ctx = ctx();
        let args = vec![Argument::Positional(Expression::List(vec![
            Expression::Number(10.0),
            Expression::Number(-1.0),
            Expression::Number(10.0),
        ]))];
        let node = eval_cube(&mut ctx, &args).unwrap();
        assert!(matches!(node, GeometryNode::Empty));
        assert_eq!(ctx.warnings.len(), 1);
    }

    #[test]
    fn test_eval_cone_defaults_to_point_top() {
        let mut ctx = ctx();
        let args = vec![
            Argument::Positional(Expression::Number(10.0)),
            Argument::Positional(Expression::Number(5.0)),
        ];
        let node = eval_cone(&mut ctx, &args).unwrap();
        match node {
            GeometryNode::Cylinder { radius1, radius2, .. } => {
                assert_eq!(radius1, 5.0);
                assert_eq!(radius2, 0.0);
            }
            _ => panic!("Expected Cylinder"),
        }
    }

    #[test]
    fn test_eval_polyhedron_tetrahedron() {
        let mut ctx = ctx();
        let points = Expression::List(vec![
            Expression::List(vec![Expression::Number(0.0), Expression::Number(0.0), Expression::Number(0.0)]),
            Expression::List(vec![Expression::Number(1.0), Expression::Number(0.0), Expression::Number(0.0)]),
            Expression::List(vec![Expression::Number(0.0), Expression::Number(1.0), Expression::Number(0.0)]),
            Expression::List(vec![Expression::Number(0.0), Expression::Number(0.0), Expression::Number(1.0)]),
        ]);
        let faces = Expression::List(vec![
            Expression::List(vec![Expression::Number(0.0), Expression::Number(1.0), Expression::Number(2.0)]),
            Expression::List(vec![Expression::Number(0.0), Expression::Number(2.0), Expression::Number(3.0)]),
            Expression::List(vec![Expression::Number(0.0), Expression::Number(3.0), Expression::Number(1.0)]),
            Expression::List(vec![Expression::Number(1.0), Expression::Number(3.0), Expression::Number(2.0)]),
        ]);
        let args = vec![Argument::Positional(points), Argument::Positional(faces)];
        let node = eval_polyhedron(&mut ctx, &args).unwrap();
        match node {
            GeometryNode::Polyhedron { points, faces } => {
                assert_eq!(points.len(), 4);
                assert_eq!(faces.len(), 4);
                assert_eq!(faces[0], vec![0, 1, 2]);
            }
            _ => panic!("Expected Polyhedron"),
        }
    }

    #[test]
    fn test_eval_polyhedron_too_few_points_skips() {
        let mut ctx = ctx();
        let node = eval_polyhedron(&mut ctx, &[]).unwrap();
        assert!(matches!(node, GeometryNode::Empty));
        assert_eq!(ctx.warnings.len(), 1);
    }

    #[test]
    fn test_eval_polygon_triangle() {
        let mut ctx = ctx();
        let points = Expression::List(vec![
            Expression::List(vec![Expression::Number(0.0), Expression::Number(0.0)]),
            Expression::List(vec![Expression::Number(1.0), Expression::Number(0.0)]),
            Expression::List(vec![Expression::Number(0.0), Expression::Number(1.0)]),
        ]);
        let args = vec![Argument::Positional(points)];
        let node = eval_polygon(&mut ctx, &args).unwrap();
        match node {
            GeometryNode::Polygon { points, paths } => {
                assert_eq!(points.len(), 3);
                assert!(paths.is_none());
            }
            _ => panic!("Expected Polygon"),
        }
    }

    #[test]
    fn test_eval_pyramid_default_square_base() {
        let mut ctx = ctx();
        let args = vec![Argument::Positional(Expression::Number(10.0))];
        let node = eval_pyramid(&mut ctx, &args).unwrap();
        match node {
            GeometryNode::Polyhedron { points, faces } => {
                assert_eq!(points.len(), 5); // 4 base vertices + apex
                assert_eq!(faces.len(), 5); // 1 base face + 4 side faces
            }
            _ => panic!("Expected Polyhedron"),
        }
    }

    #[test]
    fn test_eval_surface_default() {
        let mut ctx = ctx();
        let args = vec![Argument::Named {
            name: "file".to_string(),
            value: Expression::String("heightmap.png".to_string()),
        }];
        let node = eval_surface(&mut ctx, &args).unwrap();
        match node {
            GeometryNode::Surface { file, center, invert } => {
                assert_eq!(file, "heightmap.png");
                assert!(!center);
                assert!(!invert);
            }
            _ => panic!("Expected Surface"),
        }
    }
}
