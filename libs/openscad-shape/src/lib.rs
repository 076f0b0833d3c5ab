//! # OpenSCAD Shape DSL
//!
//! An immutable builder over evaluated geometry handles (`GeometryNode`),
//! mirroring the OpenSCAD primitive/transform/CSG surface as an ordinary Rust
//! API. Unlike [`openscad_eval::evaluate`], the DSL has no parser path: it
//! builds a `GeometryNode` tree directly and hands it to `manifold-rs` for
//! meshing.
//!
//! ## Example
//!
//! ```rust
//! use openscad_shape::Shape;
//!
//! let shape = Shape::cube([10.0, 10.0, 10.0], true)
//!     .translate([0.0, 0.0, 5.0])
//!     .color([1.0, 0.0, 0.0, 1.0]);
//!
//! let bounds = shape.bounds().unwrap();
//! assert!(bounds.min[2] <= bounds.max[2]);
//! ```

use manifold_rs::openscad::from_ir::geometry_to_mesh;
use manifold_rs::Mesh;
use openscad_eval::GeometryNode;
use pipeline_types::{Bounds, Geometry, GeometryStats};
use thiserror::Error;

mod quality;

pub use quality::Quality;

/// Errors produced while inspecting or meshing a [`Shape`].
#[derive(Debug, Error)]
pub enum ShapeError {
    /// The underlying CSG kernel failed to produce a mesh for this shape.
    #[error("failed to mesh shape: {0}")]
    Kernel(#[from] manifold_rs::ManifoldError),
}

/// An immutable handle to a geometry tree.
///
/// Every combinator returns a new `Shape`; there is no mutation. Cloning a
/// `Shape` is cheap relative to meshing it (the `GeometryNode` tree is plain
/// data, shared structure is not attempted).
#[derive(Debug, Clone)]
pub struct Shape {
    node: GeometryNode,
}

impl Shape {
    fn wrap(node: GeometryNode) -> Self {
        Self { node }
    }

    /// Access the underlying evaluated-geometry node, e.g. to hand off to
    /// `manifold-rs` directly or to embed inside a larger evaluator-built
    /// tree.
    pub fn node(&self) -> &GeometryNode {
        &self.node
    }

    /// Wrap an existing [`GeometryNode`] (for example one produced by
    /// [`openscad_eval::evaluate`]) as a `Shape`.
    pub fn from_node(node: GeometryNode) -> Self {
        Self::wrap(node)
    }

    // =========================================================================
    // 3D PRIMITIVES
    // =========================================================================

    /// `cube(size, center)`.
    pub fn cube(size: [f64; 3], center: bool) -> Self {
        Self::wrap(GeometryNode::Cube { size, center })
    }

    /// `sphere(r, $fn)`.
    pub fn sphere(radius: f64, segments: u32) -> Self {
        Self::wrap(GeometryNode::Sphere { radius, fn_: segments })
    }

    /// `cylinder(h, r1, r2, center, $fn)`.
    pub fn cylinder(height: f64, radius1: f64, radius2: f64, center: bool, segments: u32) -> Self {
        Self::wrap(GeometryNode::Cylinder {
            height,
            radius1,
            radius2,
            center,
            fn_: segments,
        })
    }

    /// `cone(h, r)` — a cylinder with a zero apex radius.
    ///
    /// Per §4.5, a cone with `r2 > r1` is simply inverted; callers wanting
    /// that should call [`Shape::cylinder`] directly with their chosen radii.
    pub fn cone(height: f64, radius: f64, center: bool, segments: u32) -> Self {
        Self::cylinder(height, radius, 0.0, center, segments)
    }

    /// `polyhedron(points, faces)`.
    pub fn polyhedron(points: Vec<[f64; 3]>, faces: Vec<Vec<usize>>) -> Self {
        Self::wrap(GeometryNode::Polyhedron { points, faces })
    }

    /// `pyramid(size, sides, center)` — a polyhedron built from a regular
    /// `sides`-gon base tapering to a single apex.
    pub fn pyramid(size: f64, sides: usize, center: bool) -> Self {
        let half = size / 2.0;
        let z_base = if center { -half } else { 0.0 };
        let z_apex = if center { half } else { size };

        let mut points = Vec::with_capacity(sides + 1);
        for i in 0..sides {
            let theta = std::f64::consts::TAU * (i as f64) / (sides as f64);
            points.push([half * theta.cos(), half * theta.sin(), z_base]);
        }
        let apex_idx = points.len();
        points.push([0.0, 0.0, z_apex]);

        let mut faces = Vec::with_capacity(sides + 1);
        faces.push((0..sides).rev().collect());
        for i in 0..sides {
            let next = (i + 1) % sides;
            faces.push(vec![i, next, apex_idx]);
        }

        Self::polyhedron(points, faces)
    }

    // =========================================================================
    // 2D PRIMITIVES
    // =========================================================================

    /// `circle(r, $fn)`.
    pub fn circle(radius: f64, segments: u32) -> Self {
        Self::wrap(GeometryNode::Circle { radius, fn_: segments })
    }

    /// `square(size, center)`.
    pub fn square(size: [f64; 2], center: bool) -> Self {
        Self::wrap(GeometryNode::Square { size, center })
    }

    /// `polygon(points, paths)`.
    pub fn polygon(points: Vec<[f64; 2]>, paths: Option<Vec<Vec<usize>>>) -> Self {
        Self::wrap(GeometryNode::Polygon { points, paths })
    }

    // =========================================================================
    // TRANSFORMS (unary; metadata is preserved per §4.4)
    // =========================================================================

    /// `translate([x, y, z])`.
    pub fn translate(&self, offset: [f64; 3]) -> Self {
        Self::wrap(GeometryNode::Translate {
            offset,
            child: Box::new(self.node.clone()),
        })
    }

    /// `rotate([x, y, z])`, Euler angles in degrees, applied Z then Y then X.
    pub fn rotate(&self, angles: [f64; 3]) -> Self {
        Self::wrap(GeometryNode::Rotate {
            angles,
            child: Box::new(self.node.clone()),
        })
    }

    /// `scale([x, y, z])`.
    pub fn scale(&self, factors: [f64; 3]) -> Self {
        Self::wrap(GeometryNode::Scale {
            factors,
            child: Box::new(self.node.clone()),
        })
    }

    /// `mirror([x, y, z])` — reflects across the plane through the origin
    /// with the given normal.
    pub fn mirror(&self, normal: [f64; 3]) -> Self {
        Self::wrap(GeometryNode::Mirror {
            normal,
            child: Box::new(self.node.clone()),
        })
    }

    /// `multmatrix(m)` — a row-major 4x4 affine transform.
    pub fn multmatrix(&self, matrix: [[f64; 4]; 4]) -> Self {
        Self::wrap(GeometryNode::Multmatrix {
            matrix,
            child: Box::new(self.node.clone()),
        })
    }

    /// `color([r, g, b, a])`. Replaces any color already attached to this
    /// shape (§4.4's metadata rule: `color` replaces, it does not blend).
    pub fn color(&self, rgba: [f64; 4]) -> Self {
        Self::wrap(GeometryNode::Color {
            rgba,
            child: Box::new(self.node.clone()),
        })
    }

    // =========================================================================
    // CSG (N-ary; metadata from the first operand, result labeled "composite")
    // =========================================================================

    /// `union(shapes...)`.
    pub fn union(shapes: &[Shape]) -> Self {
        Self::wrap(GeometryNode::Union {
            children: shapes.iter().map(|s| s.node.clone()).collect(),
        })
    }

    /// `difference(self, others...)` — left-associative:
    /// `subtract(a, [b1, b2]) == (a - b1) - b2`.
    pub fn subtract(&self, others: &[Shape]) -> Self {
        let mut children = Vec::with_capacity(1 + others.len());
        children.push(self.node.clone());
        children.extend(others.iter().map(|s| s.node.clone()));
        Self::wrap(GeometryNode::Difference { children })
    }

    /// `intersection(shapes...)`.
    pub fn intersect(shapes: &[Shape]) -> Self {
        Self::wrap(GeometryNode::Intersection {
            children: shapes.iter().map(|s| s.node.clone()).collect(),
        })
    }

    /// `hull(shapes...)` — convex hull of all children.
    pub fn hull(shapes: &[Shape]) -> Self {
        Self::wrap(GeometryNode::Hull {
            children: shapes.iter().map(|s| s.node.clone()).collect(),
        })
    }

    /// `minkowski(shapes...)`.
    pub fn minkowski(shapes: &[Shape]) -> Self {
        Self::wrap(GeometryNode::Minkowski {
            children: shapes.iter().map(|s| s.node.clone()).collect(),
        })
    }

    // =========================================================================
    // 2D <-> 3D OPS
    // =========================================================================

    /// `linear_extrude(height, twist, scale, slices, center)`.
    pub fn linear_extrude(
        &self,
        height: f64,
        twist: f64,
        scale: [f64; 2],
        slices: u32,
        center: bool,
    ) -> Self {
        Self::wrap(GeometryNode::LinearExtrude {
            height,
            twist,
            scale,
            slices,
            center,
            child: Box::new(self.node.clone()),
        })
    }

    /// `rotate_extrude(angle, segments)`.
    pub fn rotate_extrude(&self, angle: f64, segments: u32) -> Self {
        Self::wrap(GeometryNode::RotateExtrude {
            angle,
            fn_: segments,
            child: Box::new(self.node.clone()),
        })
    }

    /// `offset(delta, chamfer)`.
    pub fn offset(&self, delta: f64, chamfer: bool) -> Self {
        Self::wrap(GeometryNode::Offset {
            delta,
            chamfer,
            child: Box::new(self.node.clone()),
        })
    }

    /// `projection(cut)`.
    pub fn projection(&self, cut: bool) -> Self {
        Self::wrap(GeometryNode::Projection {
            cut,
            child: Box::new(self.node.clone()),
        })
    }

    // =========================================================================
    // INSPECTION
    // =========================================================================

    fn mesh(&self) -> Result<Mesh, ShapeError> {
        Ok(geometry_to_mesh(&self.node)?)
    }

    /// The axis-aligned bounding box of this shape's mesh.
    pub fn bounds(&self) -> Result<Bounds, ShapeError> {
        let (min, max) = self.mesh()?.bounds();
        Ok(Bounds { min, max })
    }

    /// The (divergence-theorem) volume of this shape's mesh. Zero for 2D
    /// geometry or an empty mesh.
    pub fn volume(&self) -> Result<f64, ShapeError> {
        Ok(self.mesh()?.volume())
    }

    /// The total surface area of this shape's mesh.
    pub fn surface_area(&self) -> Result<f64, ShapeError> {
        Ok(self.mesh()?.surface_area())
    }

    /// Serialize this shape to the on-wire [`Geometry`] record (§3.5).
    pub fn geometry(&self) -> Result<Geometry, ShapeError> {
        let mesh = self.mesh()?;
        let (min, max) = mesh.bounds();
        let stats = GeometryStats {
            vertex_count: mesh.vertex_count(),
            face_count: mesh.triangle_count(),
            volume: mesh.volume(),
        };
        Ok(Geometry::Single {
            vertices: mesh.vertices.clone(),
            indices: mesh.indices.clone(),
            normals: mesh.normals.clone(),
            bounds: Bounds { min, max },
            stats,
            color: None,
            modifier: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn cube_has_expected_bounds() {
        let cube = Shape::cube([2.0, 2.0, 2.0], true);
        let bounds = cube.bounds().unwrap();
        assert_relative_eq!(bounds.min[0], -1.0, epsilon = 1e-4);
        assert_relative_eq!(bounds.max[0], 1.0, epsilon = 1e-4);
    }

    #[test]
    fn cube_volume_matches_analytic_formula() {
        let cube = Shape::cube([2.0, 3.0, 4.0], false);
        assert_relative_eq!(cube.volume().unwrap(), 24.0, epsilon = 1e-3);
    }

    #[test]
    fn translate_then_union_builds_composite_tree() {
        let a = Shape::cube([1.0, 1.0, 1.0], true);
        let b = Shape::cube([1.0, 1.0, 1.0], true).translate([3.0, 0.0, 0.0]);
        let combined = Shape::union(&[a, b]);
        let bounds = combined.bounds().unwrap();
        assert!(bounds.max[0] > 3.0);
    }

    #[test]
    fn subtract_is_left_associative() {
        let a = Shape::cube([4.0, 4.0, 4.0], true);
        let b = Shape::cube([4.0, 4.0, 4.0], true).translate([3.0, 0.0, 0.0]);
        let diff = a.subtract(std::slice::from_ref(&b));
        let vol = diff.volume().unwrap();
        assert!(vol < a.volume().unwrap());
    }

    #[test]
    fn geometry_round_trips_vertex_count() {
        let cube = Shape::cube([1.0, 1.0, 1.0], false);
        let geometry = cube.geometry().unwrap();
        match geometry {
            Geometry::Single { vertices, stats, .. } => {
                assert_eq!(vertices.len() / 3, stats.vertex_count);
                assert_eq!(stats.vertex_count, 24);
            }
            Geometry::Chunked { .. } => panic!("expected Single geometry for a small cube"),
        }
    }
}
