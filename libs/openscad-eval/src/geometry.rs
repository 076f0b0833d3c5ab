//! # Geometry Types
//!
//! Evaluated geometry node types representing resolved OpenSCAD geometry.
//!
//! These types have all expressions evaluated - sizes are concrete numbers,
//! transforms are resolved matrices, etc.

use serde::{Deserialize, Serialize};

// =============================================================================
// EVALUATED AST
// =============================================================================

/// Result of AST evaluation.
///
/// Contains the root geometry node and any warnings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluatedAst {
    /// Root geometry node.
    pub geometry: GeometryNode,
    /// Evaluation warnings.
    pub warnings: Vec<String>,
}

impl EvaluatedAst {
    /// Create new evaluated AST.
    pub fn new(geometry: GeometryNode) -> Self {
        Self {
            geometry,
            warnings: Vec::new(),
        }
    }

    /// Create with warnings.
    pub fn with_warnings(geometry: GeometryNode, warnings: Vec<String>) -> Self {
        Self { geometry, warnings }
    }
}

// =============================================================================
// GEOMETRY NODE
// =============================================================================

/// A node in the evaluated geometry tree.
///
/// All values are fully resolved (no variables, expressions evaluated).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum GeometryNode {
    // =========================================================================
    // 3D PRIMITIVES
    // =========================================================================

    /// Cube primitive.
    ///
    /// ## OpenSCAD Equivalent
    /// 
    /// ```text
    /// cube(size);
    /// cube([x, y, z], center=true);
    /// ```
    Cube {
        /// Size as [x, y, z].
        size: [f64; 3],
        /// Whether centered at origin.
        center: bool,
    },

    /// Sphere primitive.
    ///
    /// ## OpenSCAD Equivalent
    ///
    /// ```text
    /// sphere(r=5);
    /// sphere(d=10, $fn=32);
    /// ```
    Sphere {
        /// Radius.
        radius: f64,
        /// Number of fragments ($fn).
        fn_: u32,
    },

    /// Cylinder primitive.
    ///
    /// ## OpenSCAD Equivalent
    ///
    /// ```text
    /// cylinder(h=10, r=5);
    /// cylinder(h=10, r1=5, r2=3, center=true);
    /// ```
    Cylinder {
        /// Height.
        height: f64,
        /// Bottom radius.
        radius1: f64,
        /// Top radius.
        radius2: f64,
        /// Whether centered.
        center: bool,
        /// Number of fragments.
        fn_: u32,
    },

    /// Polyhedron primitive.
    Polyhedron {
        /// Vertex positions.
        points: Vec<[f64; 3]>,
        /// Face indices.
        faces: Vec<Vec<usize>>,
    },

    // =========================================================================
    // 2D PRIMITIVES
    // =========================================================================

    /// Circle primitive.
    Circle {
        /// Radius.
        radius: f64,
        /// Number of fragments.
        fn_: u32,
    },

    /// Square/rectangle primitive.
    Square {
        /// Size as [x, y].
        size: [f64; 2],
        /// Whether centered.
        center: bool,
    },

    /// Polygon primitive.
    Polygon {
        /// Vertex positions.
        points: Vec<[f64; 2]>,
        /// Optional paths.
        paths: Option<Vec<Vec<usize>>>,
    },

    // =========================================================================
    // TRANSFORMS
    // =========================================================================

    /// Translation transform.
    Translate {
        /// Translation vector [x, y, z].
        offset: [f64; 3],
        /// Child geometry.
        child: Box<GeometryNode>,
    },

    /// Rotation transform.
    Rotate {
        /// Rotation angles [x, y, z] in degrees.
        angles: [f64; 3],
        /// Child geometry.
        child: Box<GeometryNode>,
    },

    /// Scale transform.
    Scale {
        /// Scale factors [x, y, z].
        factors: [f64; 3],
        /// Child geometry.
        child: Box<GeometryNode>,
    },

    /// Mirror transform.
    Mirror {
        /// Mirror plane normal.
        normal: [f64; 3],
        /// Child geometry.
        child: Box<GeometryNode>,
    },

    /// General matrix transform.
    Multmatrix {
        /// 4x4 transformation matrix.
        matrix: [[f64; 4]; 4],
        /// Child geometry.
        child: Box<GeometryNode>,
    },

    /// Resize to a target bounding-box size (§6.3 `resize`). Unlike the
    /// other transforms this can't be resolved from the IR alone — the
    /// scale factors it implies depend on the child's actual mesh extent,
    /// so the mesh layer computes them at meshing time.
    Resize {
        /// Target size per axis; a `0.0` component leaves that axis
        /// unscaled unless the matching `auto` flag is set.
        newsize: [f64; 3],
        /// Per-axis "auto" flag: when `newsize[i]` is `0.0`, scale axis
        /// `i` by the average factor of the axes that did specify one
        /// instead of leaving it at 1.0.
        auto: [bool; 3],
        /// Child geometry.
        child: Box<GeometryNode>,
    },

    /// Color modifier.
    Color {
        /// RGBA color.
        rgba: [f64; 4],
        /// Child geometry.
        child: Box<GeometryNode>,
    },

    // =========================================================================
    // BOOLEAN OPERATIONS
    // =========================================================================

    /// Union of children.
    Union {
        /// Child geometries.
        children: Vec<GeometryNode>,
    },

    /// Difference (first child minus rest).
    Difference {
        /// Child geometries.
        children: Vec<GeometryNode>,
    },

    /// Intersection of children.
    Intersection {
        /// Child geometries.
        children: Vec<GeometryNode>,
    },

    // =========================================================================
    // EXTRUSIONS
    // =========================================================================

    /// Linear extrusion.
    LinearExtrude {
        /// Extrusion height.
        height: f64,
        /// Twist angle in degrees.
        twist: f64,
        /// Scale at top.
        scale: [f64; 2],
        /// Number of slices.
        slices: u32,
        /// Whether centered.
        center: bool,
        /// Child 2D geometry.
        child: Box<GeometryNode>,
    },

    /// Rotational extrusion.
    RotateExtrude {
        /// Sweep angle in degrees.
        angle: f64,
        /// Number of fragments.
        fn_: u32,
        /// Child 2D geometry.
        child: Box<GeometryNode>,
    },

    // =========================================================================
    // META
    // =========================================================================

    // =========================================================================
    // ADDITIONAL CSG OPERATIONS
    // =========================================================================

    /// Convex hull of all children.
    Hull {
        /// Child geometries.
        children: Vec<GeometryNode>,
    },

    /// Minkowski sum of all children.
    Minkowski {
        /// Child geometries.
        children: Vec<GeometryNode>,
    },

    /// 2D offset (round or straight) of a child polygon.
    Offset {
        /// Offset distance. Positive grows, negative shrinks.
        delta: f64,
        /// Use chamfered (straight) corners instead of mitered ones.
        chamfer: bool,
        /// Child 2D geometry.
        child: Box<GeometryNode>,
    },

    /// Projection of a 3D child down to the XY plane.
    Projection {
        /// If true, take the cross-section at Z=0 instead of a full projection.
        cut: bool,
        /// Child 3D geometry.
        child: Box<GeometryNode>,
    },

    /// Rendered text, laid out as a 2D polygon outline.
    Text {
        /// Text content.
        text: String,
        /// Font size.
        size: f64,
        /// Font family name, if specified.
        font: Option<String>,
        /// Horizontal alignment ("left", "center", "right").
        halign: String,
        /// Vertical alignment ("top", "center", "baseline", "bottom").
        valign: String,
    },

    /// Heightmap mesh loaded from an external file.
    Surface {
        /// Path to the heightmap source file.
        file: String,
        /// Whether to center the resulting mesh at the origin.
        center: bool,
        /// Whether to invert the heightmap values.
        invert: bool,
    },

    // =========================================================================
    // META
    // =========================================================================

    /// Group of geometries (implicit union).
    Group {
        /// Child geometries.
        children: Vec<GeometryNode>,
    },

    /// A node carrying metadata (color override, modifier tag, object id,
    /// source line, composite-operation label) about its child.
    ///
    /// Only introduced where there is metadata to attach — plain geometry
    /// that carries no modifier/color/label stays unwrapped.
    Tagged {
        /// Attached metadata.
        meta: GeometryMeta,
        /// The geometry the metadata describes.
        child: Box<GeometryNode>,
    },

    /// Empty geometry (for conditionals that produce nothing).
    Empty,
}

impl GeometryNode {
    /// Check if this is an empty node.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Tagged { child, .. } => child.is_empty(),
            _ => false,
        }
    }

    /// Check if this is a 2D node.
    pub fn is_2d(&self) -> bool {
        match self {
            Self::Circle { .. } | Self::Square { .. } | Self::Polygon { .. } | Self::Text { .. } => true,
            Self::Offset { .. } | Self::Projection { .. } => true,
            Self::Resize { child, .. } => child.is_2d(),
            Self::Tagged { child, .. } => child.is_2d(),
            _ => false,
        }
    }

    /// Resolve the single color that should be reported on the wire
    /// [`pipeline_types::Geometry`] record for this (sub)tree, per §3.4/§3.6:
    /// unary transforms and `color()` preserve/introduce a color; an N-ary
    /// CSG op takes its *first* operand's color (the result is otherwise
    /// labeled `composite`, see [`GeometryNode::resolved_modifier`] callers
    /// in `openscad-engine`). Returns `None` if no color was ever attached
    /// along the path from here to a leaf.
    pub fn resolved_color(&self) -> Option<[f64; 4]> {
        match self {
            Self::Color { rgba, .. } => Some(*rgba),
            Self::Tagged { meta, child } => meta.color.or_else(|| child.resolved_color()),
            Self::Translate { child, .. }
            | Self::Rotate { child, .. }
            | Self::Scale { child, .. }
            | Self::Mirror { child, .. }
            | Self::Multmatrix { child, .. }
            | Self::Resize { child, .. }
            | Self::LinearExtrude { child, .. }
            | Self::RotateExtrude { child, .. }
            | Self::Offset { child, .. }
            | Self::Projection { child, .. } => child.resolved_color(),
            Self::Union { children }
            | Self::Difference { children }
            | Self::Intersection { children }
            | Self::Hull { children }
            | Self::Minkowski { children }
            | Self::Group { children } => children.first().and_then(Self::resolved_color),
            Self::Cube { .. }
            | Self::Sphere { .. }
            | Self::Cylinder { .. }
            | Self::Polyhedron { .. }
            | Self::Circle { .. }
            | Self::Square { .. }
            | Self::Polygon { .. }
            | Self::Text { .. }
            | Self::Surface { .. }
            | Self::Empty => None,
        }
    }

    /// Resolve the modifier tag that should be reported on the wire record,
    /// per §3.4. Unlike color this never crosses into children — a modifier
    /// only applies to the exact statement it prefixed.
    pub fn resolved_modifier(&self) -> Option<ModifierTag> {
        match self {
            Self::Tagged { meta, .. } => meta.modifier,
            _ => None,
        }
    }

    /// `true` if this node is the result of an N-ary CSG op combining two or
    /// more colored inputs, per §3.4's "marked `composite`" rule.
    pub fn is_composite(&self) -> bool {
        matches!(
            self,
            Self::Union { children }
            | Self::Difference { children }
            | Self::Intersection { children }
            | Self::Hull { children }
            | Self::Minkowski { children }
                if children.len() > 1
        )
    }

    /// Check if this is a 3D node.
    pub fn is_3d(&self) -> bool {
        match self {
            Self::Cube { .. }
            | Self::Sphere { .. }
            | Self::Cylinder { .. }
            | Self::Polyhedron { .. }
            | Self::Surface { .. } => true,
            Self::Resize { child, .. } => child.is_3d(),
            Self::Tagged { child, .. } => child.is_3d(),
            _ => false,
        }
    }
}

// =============================================================================
// GEOMETRY METADATA (§3.4)
// =============================================================================

/// The four OpenSCAD statement modifier characters, mirrored onto evaluated
/// geometry so downstream consumers (renderer, export) can honor them
/// without re-parsing source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModifierTag {
    /// `*` — subtree was disabled; callers should already have dropped it.
    Disable,
    /// `!` — root; only this node (and its siblings under the same
    /// statement list) survives the enclosing fold.
    Root,
    /// `#` — debug/highlight.
    Debug,
    /// `%` — background/transparent, excluded from the final CSG result.
    Background,
}

impl ModifierTag {
    /// The OpenSCAD source character this tag was parsed from, used when
    /// serializing to the wire [`pipeline_types::Geometry`] record (§3.4).
    pub fn as_char(self) -> char {
        match self {
            Self::Disable => '*',
            Self::Root => '!',
            Self::Debug => '#',
            Self::Background => '%',
        }
    }
}

/// Per-node metadata propagated alongside evaluated geometry: color,
/// modifier tag, a stable object id, the originating source line, and an
/// optional label naming the composite operation that produced this node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeometryMeta {
    /// Color override, if a `color()` or modifier supplied one.
    pub color: Option<[f64; 4]>,
    /// Modifier character applied to the originating statement.
    pub modifier: Option<ModifierTag>,
    /// Stable id, unique within one evaluation run.
    pub id: u64,
    /// Source line the originating statement started on, if known.
    pub line: Option<u32>,
    /// Name of the composite operation (e.g. "union", "difference") that
    /// produced this node, if this node is the result of one.
    pub operation_label: Option<String>,
}

impl GeometryMeta {
    /// Create metadata with a freshly assigned object id and all other
    /// fields empty.
    pub fn new() -> Self {
        Self {
            color: None,
            modifier: None,
            id: next_object_id(),
            line: None,
            operation_label: None,
        }
    }

    /// Metadata for a modifier-tagged statement.
    pub fn with_modifier(modifier: ModifierTag) -> Self {
        Self {
            modifier: Some(modifier),
            ..Self::new()
        }
    }
}

impl Default for GeometryMeta {
    fn default() -> Self {
        Self::new()
    }
}

use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_OBJECT_ID: AtomicU64 = AtomicU64::new(1);

/// Assign the next globally unique geometry object id.
fn next_object_id() -> u64 {
    NEXT_OBJECT_ID.fetch_add(1, Ordering::Relaxed)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cube_node() {
        let cube = GeometryNode::Cube {
            size: [10.0, 10.0, 10.0],
            center: false,
        };
        assert!(cube.is_3d());
        assert!(!cube.is_2d());
    }

    #[test]
    fn test_circle_node() {
        let circle = GeometryNode::Circle {
            radius: 5.0,
            fn_: 32,
        };
        assert!(circle.is_2d());
        assert!(!circle.is_3d());
    }

    #[test]
    fn test_empty_node() {
        let empty = GeometryNode::Empty;
        assert!(empty.is_empty());
    }
}
