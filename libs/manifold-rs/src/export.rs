/// Mesh export for GPU rendering and file formats.
///
/// This module provides functionality to export manifold geometry to
/// GPU-friendly mesh buffers (`f32` precision), plus STL (binary and ASCII)
/// and OBJ writers for interchange with other tools.

use crate::mesh::Mesh;
use crate::Manifold;

/// Mesh buffers suitable for GPU rendering.
///
/// Contains vertex positions and triangle indices in formats
/// compatible with WebGL/WebGPU.
///
/// # Examples
/// ```
/// use manifold_rs::manifold::constructors::build_cube;
/// use manifold_rs::{Manifold, Mesh};
///
/// let mut mesh = Mesh::new();
/// build_cube(&mut mesh, [1.0, 1.0, 1.0], false);
/// let buffers = Manifold::from_mesh(mesh).to_mesh_buffers();
///
/// assert_eq!(buffers.vertices.len(), 24 * 3);
/// ```
#[derive(Debug, Clone)]
pub struct MeshBuffers {
    /// Vertex positions as flat array [x, y, z, x, y, z, ...].
    /// Uses `f32` for GPU compatibility.
    pub vertices: Vec<f32>,

    /// Triangle indices as flat array [i0, i1, i2, i0, i1, i2, ...].
    pub indices: Vec<u32>,
}

impl MeshBuffers {
    /// Creates empty mesh buffers.
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            indices: Vec::new(),
        }
    }

    /// Returns the number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 3
    }

    /// Returns the number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

impl Default for MeshBuffers {
    fn default() -> Self {
        Self::new()
    }
}

impl Manifold {
    /// Exports the manifold to GPU-friendly mesh buffers.
    ///
    /// The internal mesh is already `f32`-precision and flat-array laid out,
    /// so this is a cheap copy of positions and indices (normals and colors
    /// are dropped; GPU clients recompute normals from winding order).
    pub fn to_mesh_buffers(&self) -> MeshBuffers {
        let mesh = self.mesh();
        MeshBuffers {
            vertices: mesh.vertices.clone(),
            indices: mesh.indices.clone(),
        }
    }

    /// Serializes the manifold to binary STL.
    ///
    /// See [`to_stl_binary`] for the exact byte layout.
    pub fn to_stl_binary(&self, name: &str) -> Vec<u8> {
        to_stl_binary(self.mesh(), name)
    }

    /// Serializes the manifold to ASCII STL.
    pub fn to_stl_ascii(&self, name: &str) -> String {
        to_stl_ascii(self.mesh(), name)
    }

    /// Serializes the manifold to Wavefront OBJ.
    pub fn to_obj(&self) -> String {
        to_obj(self.mesh())
    }
}

// =============================================================================
// STL EXPORT
// =============================================================================

/// Per-triangle facet normal, computed from vertex winding (STL does not
/// carry per-vertex normals).
fn facet_normal(mesh: &Mesh, tri: [u32; 3]) -> [f32; 3] {
    let v = |i: u32| -> [f32; 3] {
        let base = i as usize * 3;
        [mesh.vertices[base], mesh.vertices[base + 1], mesh.vertices[base + 2]]
    };
    let [a, b, c] = [v(tri[0]), v(tri[1]), v(tri[2])];
    let u = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
    let w = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
    let n = [
        u[1] * w[2] - u[2] * w[1],
        u[2] * w[0] - u[0] * w[2],
        u[0] * w[1] - u[1] * w[0],
    ];
    let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
    if len > 0.0 {
        [n[0] / len, n[1] / len, n[2] / len]
    } else {
        [0.0, 0.0, 0.0]
    }
}

/// Serializes a mesh to the binary STL format.
///
/// ## Layout
///
/// - 80-byte header (the solid `name`, truncated/zero-padded)
/// - `u32` little-endian triangle count
/// - per triangle: 12 `f32` little-endian values (facet normal, then the
///   three vertex positions) followed by a `u16` attribute byte count (0)
pub fn to_stl_binary(mesh: &Mesh, name: &str) -> Vec<u8> {
    let triangle_count = mesh.triangle_count();
    let mut out = Vec::with_capacity(80 + 4 + triangle_count * 50);

    let mut header = [0u8; 80];
    let name_bytes = name.as_bytes();
    let copy_len = name_bytes.len().min(80);
    header[..copy_len].copy_from_slice(&name_bytes[..copy_len]);
    out.extend_from_slice(&header);

    out.extend_from_slice(&(triangle_count as u32).to_le_bytes());

    for tri_idx in 0..triangle_count {
        let base = tri_idx * 3;
        let tri = [mesh.indices[base], mesh.indices[base + 1], mesh.indices[base + 2]];
        let normal = facet_normal(mesh, tri);

        for component in normal {
            out.extend_from_slice(&component.to_le_bytes());
        }
        for &vi in &tri {
            let vbase = vi as usize * 3;
            for component in &mesh.vertices[vbase..vbase + 3] {
                out.extend_from_slice(&component.to_le_bytes());
            }
        }
        out.extend_from_slice(&0u16.to_le_bytes());
    }

    out
}

/// Serializes a mesh to the ASCII STL format.
pub fn to_stl_ascii(mesh: &Mesh, name: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!("solid {name}\n"));

    for tri_idx in 0..mesh.triangle_count() {
        let base = tri_idx * 3;
        let tri = [mesh.indices[base], mesh.indices[base + 1], mesh.indices[base + 2]];
        let normal = facet_normal(mesh, tri);

        out.push_str(&format!(
            "  facet normal {} {} {}\n",
            normal[0], normal[1], normal[2]
        ));
        out.push_str("    outer loop\n");
        for &vi in &tri {
            let vbase = vi as usize * 3;
            out.push_str(&format!(
                "      vertex {} {} {}\n",
                mesh.vertices[vbase],
                mesh.vertices[vbase + 1],
                mesh.vertices[vbase + 2]
            ));
        }
        out.push_str("    endloop\n");
        out.push_str("  endfacet\n");
    }

    out.push_str(&format!("endsolid {name}\n"));
    out
}

// =============================================================================
// OBJ EXPORT
// =============================================================================

/// Serializes a mesh to Wavefront OBJ.
///
/// Emits `v` (position), `vn` (normal, when present) and `f` (1-indexed
/// face) records. Faces reference vertex/normal pairs when normals are
/// present, positions only otherwise.
pub fn to_obj(mesh: &Mesh) -> String {
    let mut out = String::new();
    let has_normals = mesh.normals.len() == mesh.vertices.len();

    for i in 0..mesh.vertex_count() {
        let base = i * 3;
        out.push_str(&format!(
            "v {} {} {}\n",
            mesh.vertices[base], mesh.vertices[base + 1], mesh.vertices[base + 2]
        ));
    }

    if has_normals {
        for i in 0..mesh.vertex_count() {
            let base = i * 3;
            out.push_str(&format!(
                "vn {} {} {}\n",
                mesh.normals[base], mesh.normals[base + 1], mesh.normals[base + 2]
            ));
        }
    }

    for tri_idx in 0..mesh.triangle_count() {
        let base = tri_idx * 3;
        let tri = [mesh.indices[base], mesh.indices[base + 1], mesh.indices[base + 2]];
        if has_normals {
            out.push_str(&format!(
                "f {}//{} {}//{} {}//{}\n",
                tri[0] + 1, tri[0] + 1,
                tri[1] + 1, tri[1] + 1,
                tri[2] + 1, tri[2] + 1,
            ));
        } else {
            out.push_str(&format!("f {} {} {}\n", tri[0] + 1, tri[1] + 1, tri[2] + 1));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifold::constructors::build_cube;

    fn cube_manifold() -> Manifold {
        let mut mesh = Mesh::new();
        build_cube(&mut mesh, [1.0, 1.0, 1.0], false);
        Manifold::from_mesh(mesh)
    }

    #[test]
    fn test_mesh_buffers_creation() {
        let buffers = MeshBuffers::new();
        assert_eq!(buffers.vertex_count(), 0);
        assert_eq!(buffers.triangle_count(), 0);
    }

    #[test]
    fn test_cube_export() {
        let buffers = cube_manifold().to_mesh_buffers();

        assert_eq!(buffers.vertex_count(), 24);
        assert_eq!(buffers.triangle_count(), 12);
    }

    #[test]
    fn test_indices_in_range() {
        let buffers = cube_manifold().to_mesh_buffers();
        let vertex_count = buffers.vertex_count() as u32;
        for &idx in &buffers.indices {
            assert!(idx < vertex_count, "Index {} out of range", idx);
        }
    }

    #[test]
    fn test_stl_binary_header_and_count() {
        let manifold = cube_manifold();
        let bytes = manifold.to_stl_binary("cube");

        assert_eq!(&bytes[0..4], b"cube");
        let count = u32::from_le_bytes(bytes[80..84].try_into().unwrap());
        assert_eq!(count as usize, manifold.triangle_count());
        assert_eq!(bytes.len(), 80 + 4 + manifold.triangle_count() * 50);
    }

    #[test]
    fn test_stl_ascii_roundtrip_shape() {
        let manifold = cube_manifold();
        let text = manifold.to_stl_ascii("cube");

        assert!(text.starts_with("solid cube\n"));
        assert!(text.trim_end().ends_with("endsolid cube"));
        assert_eq!(text.matches("facet normal").count(), manifold.triangle_count());
    }

    #[test]
    fn test_obj_vertex_and_face_counts() {
        let manifold = cube_manifold();
        let text = manifold.to_obj();

        assert_eq!(text.lines().filter(|l| l.starts_with("v ")).count(), manifold.vertex_count());
        assert_eq!(text.lines().filter(|l| l.starts_with("f ")).count(), manifold.triangle_count());
    }
}
