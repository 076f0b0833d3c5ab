//! # Mesh Module
//!
//! Triangle mesh representation for 3D geometry output.
//!
//! ## Structure
//!
//! - `Mesh` - Main triangle mesh with vertices, indices, normals
//! - `halfedge` - HalfEdge mesh for topology operations
//!
//! ## Example
//!
//! ```rust
//! use manifold_rs::Mesh;
//!
//! let mut mesh = Mesh::new();
//! let v0 = mesh.add_vertex(0.0, 0.0, 0.0, 0.0, 0.0, 1.0);
//! let v1 = mesh.add_vertex(1.0, 0.0, 0.0, 0.0, 0.0, 1.0);
//! let v2 = mesh.add_vertex(0.5, 1.0, 0.0, 0.0, 0.0, 1.0);
//! mesh.add_triangle(v0, v1, v2);
//! ```

pub mod halfedge;

// =============================================================================
// MESH STRUCT
// =============================================================================

/// Triangle mesh with vertices, indices, and normals.
///
/// This is the output format for all manifold operations. The mesh uses
/// flat arrays optimized for WebGL rendering via Three.js.
///
/// ## Memory Layout
///
/// - `vertices`: [x0, y0, z0, x1, y1, z1, ...] - 3 floats per vertex
/// - `indices`: [i0, i1, i2, ...] - 3 indices per triangle
/// - `normals`: [nx0, ny0, nz0, ...] - 3 floats per vertex
/// - `colors`: Optional [r, g, b, a, ...] - 4 floats per vertex
///
/// ## Example
///
/// ```rust
/// use manifold_rs::Mesh;
///
/// let mesh = Mesh::new();
/// assert_eq!(mesh.vertex_count(), 0);
/// assert_eq!(mesh.triangle_count(), 0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    /// Vertex positions: [x0, y0, z0, x1, y1, z1, ...]
    ///
    /// Each vertex has 3 components (x, y, z).
    pub vertices: Vec<f32>,
    
    /// Triangle indices: [i0, i1, i2, ...]
    ///
    /// Each triangle has 3 vertex indices.
    pub indices: Vec<u32>,
    
    /// Vertex normals: [nx0, ny0, nz0, ...]
    ///
    /// Each vertex has 3 normal components (nx, ny, nz).
    pub normals: Vec<f32>,
    
    /// Optional vertex colors: [r0, g0, b0, a0, ...]
    ///
    /// Each vertex has 4 color components (r, g, b, a) in range [0.0, 1.0].
    pub colors: Option<Vec<f32>>,
}

impl Mesh {
    // =========================================================================
    // CONSTRUCTORS
    // =========================================================================

    /// Create a new empty mesh.
    ///
    /// ## Example
    ///
    /// ```rust
    /// use manifold_rs::Mesh;
    ///
    /// let mesh = Mesh::new();
    /// assert!(mesh.is_empty());
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create mesh with pre-allocated capacity.
    ///
    /// ## Parameters
    ///
    /// - `vertex_capacity`: Expected number of vertices
    /// - `triangle_capacity`: Expected number of triangles
    ///
    /// ## Example
    ///
    /// ```rust
    /// use manifold_rs::Mesh;
    ///
    /// // Pre-allocate for a cube (24 vertices, 12 triangles)
    /// let mesh = Mesh::with_capacity(24, 12);
    /// ```
    #[must_use]
    pub fn with_capacity(vertex_capacity: usize, triangle_capacity: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_capacity * 3),
            indices: Vec::with_capacity(triangle_capacity * 3),
            normals: Vec::with_capacity(vertex_capacity * 3),
            colors: None,
        }
    }

    // =========================================================================
    // VERTEX OPERATIONS
    // =========================================================================

    /// Add a vertex with position and normal.
    ///
    /// Returns the vertex index for use in triangle definitions.
    ///
    /// ## Parameters
    ///
    /// - `x, y, z`: Vertex position
    /// - `nx, ny, nz`: Vertex normal (should be normalized)
    ///
    /// ## Returns
    ///
    /// Vertex index (u32)
    ///
    /// ## Example
    ///
    /// ```rust
    /// use manifold_rs::Mesh;
    ///
    /// let mut mesh = Mesh::new();
    /// let idx = mesh.add_vertex(1.0, 2.0, 3.0, 0.0, 0.0, 1.0);
    /// assert_eq!(idx, 0);
    /// ```
    pub fn add_vertex(&mut self, x: f32, y: f32, z: f32, nx: f32, ny: f32, nz: f32) -> u32 {
        let index = (self.vertices.len() / 3) as u32;
        self.vertices.extend_from_slice(&[x, y, z]);
        self.normals.extend_from_slice(&[nx, ny, nz]);
        index
    }

    /// Add a vertex with position, normal, and color.
    ///
    /// ## Parameters
    ///
    /// - `x, y, z`: Vertex position
    /// - `nx, ny, nz`: Vertex normal
    /// - `r, g, b, a`: Vertex color (range [0.0, 1.0])
    ///
    /// ## Returns
    ///
    /// Vertex index (u32)
    pub fn add_vertex_with_color(
        &mut self,
        x: f32, y: f32, z: f32,
        nx: f32, ny: f32, nz: f32,
        r: f32, g: f32, b: f32, a: f32,
    ) -> u32 {
        let index = self.add_vertex(x, y, z, nx, ny, nz);
        
        // Initialize colors if needed
        if self.colors.is_none() {
            self.colors = Some(Vec::with_capacity(self.vertices.len() / 3 * 4));
        }
        
        if let Some(ref mut colors) = self.colors {
            colors.extend_from_slice(&[r, g, b, a]);
        }
        
        index
    }

    // =========================================================================
    // TRIANGLE OPERATIONS
    // =========================================================================

    /// Add a triangle by vertex indices.
    ///
    /// ## Parameters
    ///
    /// - `v0, v1, v2`: Vertex indices (from `add_vertex`)
    ///
    /// ## Example
    ///
    /// ```rust
    /// use manifold_rs::Mesh;
    ///
    /// let mut mesh = Mesh::new();
    /// let v0 = mesh.add_vertex(0.0, 0.0, 0.0, 0.0, 0.0, 1.0);
    /// let v1 = mesh.add_vertex(1.0, 0.0, 0.0, 0.0, 0.0, 1.0);
    /// let v2 = mesh.add_vertex(0.5, 1.0, 0.0, 0.0, 0.0, 1.0);
    /// mesh.add_triangle(v0, v1, v2);
    /// assert_eq!(mesh.triangle_count(), 1);
    /// ```
    pub fn add_triangle(&mut self, v0: u32, v1: u32, v2: u32) {
        self.indices.extend_from_slice(&[v0, v1, v2]);
    }

    // =========================================================================
    // QUERY METHODS
    // =========================================================================

    /// Get the number of vertices.
    ///
    /// ## Example
    ///
    /// ```rust
    /// use manifold_rs::Mesh;
    ///
    /// let mesh = Mesh::new();
    /// assert_eq!(mesh.vertex_count(), 0);
    /// ```
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 3
    }

    /// Get the number of triangles.
    ///
    /// ## Example
    ///
    /// ```rust
    /// use manifold_rs::Mesh;
    ///
    /// let mesh = Mesh::new();
    /// assert_eq!(mesh.triangle_count(), 0);
    /// ```
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Check if mesh is empty.
    ///
    /// ## Example
    ///
    /// ```rust
    /// use manifold_rs::Mesh;
    ///
    /// let mesh = Mesh::new();
    /// assert!(mesh.is_empty());
    /// ```
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    // =========================================================================
    // TRANSFORM OPERATIONS
    // =========================================================================

    /// Apply translation to all vertices.
    ///
    /// ## Parameters
    ///
    /// - `dx, dy, dz`: Translation offset
    pub fn translate(&mut self, dx: f32, dy: f32, dz: f32) {
        for i in (0..self.vertices.len()).step_by(3) {
            self.vertices[i] += dx;
            self.vertices[i + 1] += dy;
            self.vertices[i + 2] += dz;
        }
    }

    /// Apply scale to all vertices.
    ///
    /// ## Parameters
    ///
    /// - `sx, sy, sz`: Scale factors
    pub fn scale(&mut self, sx: f32, sy: f32, sz: f32) {
        for i in (0..self.vertices.len()).step_by(3) {
            self.vertices[i] *= sx;
            self.vertices[i + 1] *= sy;
            self.vertices[i + 2] *= sz;
        }
    }

    /// Apply 4x4 transformation matrix to all vertices and normals.
    ///
    /// ## Parameters
    ///
    /// - `matrix`: 4x4 transformation matrix in column-major order
    pub fn transform(&mut self, matrix: &[[f32; 4]; 4]) {
        // Transform vertices
        for i in (0..self.vertices.len()).step_by(3) {
            let x = self.vertices[i];
            let y = self.vertices[i + 1];
            let z = self.vertices[i + 2];
            
            self.vertices[i] = matrix[0][0] * x + matrix[1][0] * y + matrix[2][0] * z + matrix[3][0];
            self.vertices[i + 1] = matrix[0][1] * x + matrix[1][1] * y + matrix[2][1] * z + matrix[3][1];
            self.vertices[i + 2] = matrix[0][2] * x + matrix[1][2] * y + matrix[2][2] * z + matrix[3][2];
        }
        
        // Transform normals (without translation, only rotation)
        for i in (0..self.normals.len()).step_by(3) {
            let nx = self.normals[i];
            let ny = self.normals[i + 1];
            let nz = self.normals[i + 2];
            
            let rnx = matrix[0][0] * nx + matrix[1][0] * ny + matrix[2][0] * nz;
            let rny = matrix[0][1] * nx + matrix[1][1] * ny + matrix[2][1] * nz;
            let rnz = matrix[0][2] * nx + matrix[1][2] * ny + matrix[2][2] * nz;
            
            // Renormalize
            let len = (rnx * rnx + rny * rny + rnz * rnz).sqrt();
            if len > 0.0 {
                self.normals[i] = rnx / len;
                self.normals[i + 1] = rny / len;
                self.normals[i + 2] = rnz / len;
            }
        }
    }

    // =========================================================================
    // MERGE OPERATIONS
    // =========================================================================

    /// Merge another mesh into this one.
    ///
    /// Indices are adjusted to account for existing vertices.
    ///
    /// ## Parameters
    ///
    /// - `other`: Mesh to merge
    pub fn merge(&mut self, other: &Mesh) {
        let self_vertex_count = self.vertex_count();
        let vertex_offset = self_vertex_count as u32;

        // Append vertices and normals
        self.vertices.extend_from_slice(&other.vertices);
        self.normals.extend_from_slice(&other.normals);

        // Append indices with offset
        for &idx in &other.indices {
            self.indices.push(idx + vertex_offset);
        }

        // Colors are per-vertex, so once either side carries them the
        // combined array must stay aligned with the combined vertex array:
        // vertices with no explicit color default to opaque white.
        if self.colors.is_some() || other.colors.is_some() {
            const DEFAULT: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
            let other_vertex_count = other.vertex_count();
            let colors = self.colors.get_or_insert_with(|| {
                let mut padding = Vec::with_capacity(self_vertex_count * 4);
                for _ in 0..self_vertex_count {
                    padding.extend_from_slice(&DEFAULT);
                }
                padding
            });
            match &other.colors {
                Some(other_colors) => colors.extend_from_slice(other_colors),
                None => {
                    for _ in 0..other_vertex_count {
                        colors.extend_from_slice(&DEFAULT);
                    }
                }
            }
        }
    }

    // =========================================================================
    // MEASUREMENT
    // =========================================================================

    /// Axis-aligned bounding box of every vertex. `([0,0,0], [0,0,0])` for an
    /// empty mesh.
    pub fn bounds(&self) -> ([f32; 3], [f32; 3]) {
        if self.vertices.is_empty() {
            return ([0.0; 3], [0.0; 3]);
        }
        let mut min = [f32::INFINITY; 3];
        let mut max = [f32::NEG_INFINITY; 3];
        for v in self.vertices.chunks_exact(3) {
            for axis in 0..3 {
                min[axis] = min[axis].min(v[axis]);
                max[axis] = max[axis].max(v[axis]);
            }
        }
        (min, max)
    }

    /// Enclosed volume via the divergence theorem: the sum, over every
    /// triangle, of the signed volume of the tetrahedron it forms with the
    /// origin. Well-defined only for a closed (watertight) mesh.
    pub fn volume(&self) -> f64 {
        let vertex = |i: u32| -> [f64; 3] {
            let base = i as usize * 3;
            [
                self.vertices[base] as f64,
                self.vertices[base + 1] as f64,
                self.vertices[base + 2] as f64,
            ]
        };
        let mut sum = 0.0;
        for tri in self.indices.chunks_exact(3) {
            let [v0, v1, v2] = [vertex(tri[0]), vertex(tri[1]), vertex(tri[2])];
            let cross = [
                v1[1] * v2[2] - v1[2] * v2[1],
                v1[2] * v2[0] - v1[0] * v2[2],
                v1[0] * v2[1] - v1[1] * v2[0],
            ];
            sum += v0[0] * cross[0] + v0[1] * cross[1] + v0[2] * cross[2];
        }
        (sum / 6.0).abs()
    }

    /// Total surface area, summed over every triangle's cross-product area.
    pub fn surface_area(&self) -> f64 {
        let vertex = |i: u32| -> [f64; 3] {
            let base = i as usize * 3;
            [
                self.vertices[base] as f64,
                self.vertices[base + 1] as f64,
                self.vertices[base + 2] as f64,
            ]
        };
        let mut area = 0.0;
        for tri in self.indices.chunks_exact(3) {
            let [v0, v1, v2] = [vertex(tri[0]), vertex(tri[1]), vertex(tri[2])];
            let u = [v1[0] - v0[0], v1[1] - v0[1], v1[2] - v0[2]];
            let w = [v2[0] - v0[0], v2[1] - v0[1], v2[2] - v0[2]];
            let cross = [
                u[1] * w[2] - u[2] * w[1],
                u[2] * w[0] - u[0] * w[2],
                u[0] * w[1] - u[1] * w[0],
            ];
            area += 0.5 * (cross[0] * cross[0] + cross[1] * cross[1] + cross[2] * cross[2]).sqrt();
        }
        area
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Test creating empty mesh.
    #[test]
    fn test_mesh_new() {
        let mesh = Mesh::new();
        assert!(mesh.is_empty());
        assert_eq!(mesh.vertex_count(), 0);
        assert_eq!(mesh.triangle_count(), 0);
    }

    /// Test adding vertices.
    #[test]
    fn test_add_vertex() {
        let mut mesh = Mesh::new();
        let idx = mesh.add_vertex(1.0, 2.0, 3.0, 0.0, 0.0, 1.0);
        assert_eq!(idx, 0);
        assert_eq!(mesh.vertex_count(), 1);
    }

    /// Test adding triangles.
    #[test]
    fn test_add_triangle() {
        let mut mesh = Mesh::new();
        let v0 = mesh.add_vertex(0.0, 0.0, 0.0, 0.0, 0.0, 1.0);
        let v1 = mesh.add_vertex(1.0, 0.0, 0.0, 0.0, 0.0, 1.0);
        let v2 = mesh.add_vertex(0.5, 1.0, 0.0, 0.0, 0.0, 1.0);
        mesh.add_triangle(v0, v1, v2);
        assert_eq!(mesh.triangle_count(), 1);
    }

    /// Test mesh translation.
    #[test]
    fn test_translate() {
        let mut mesh = Mesh::new();
        mesh.add_vertex(0.0, 0.0, 0.0, 0.0, 0.0, 1.0);
        mesh.translate(10.0, 20.0, 30.0);
        
        assert!((mesh.vertices[0] - 10.0).abs() < 0.001);
        assert!((mesh.vertices[1] - 20.0).abs() < 0.001);
        assert!((mesh.vertices[2] - 30.0).abs() < 0.001);
    }

    /// Test mesh merging.
    #[test]
    fn test_merge() {
        let mut mesh1 = Mesh::new();
        mesh1.add_vertex(0.0, 0.0, 0.0, 0.0, 0.0, 1.0);
        
        let mut mesh2 = Mesh::new();
        mesh2.add_vertex(1.0, 1.0, 1.0, 0.0, 0.0, 1.0);
        
        mesh1.merge(&mesh2);
        assert_eq!(mesh1.vertex_count(), 2);
    }

    /// Merging a colored mesh into an uncolored one keeps the color array
    /// aligned with the vertex array instead of leaving it short.
    #[test]
    fn test_merge_pads_missing_colors() {
        let mut mesh1 = Mesh::new();
        mesh1.add_vertex(0.0, 0.0, 0.0, 0.0, 0.0, 1.0);

        let mut mesh2 = Mesh::new();
        mesh2.add_vertex(1.0, 1.0, 1.0, 0.0, 0.0, 1.0);
        mesh2.colors = Some(vec![1.0, 0.0, 0.0, 1.0]);

        mesh1.merge(&mesh2);
        let colors = mesh1.colors.as_ref().unwrap();
        assert_eq!(colors.len(), mesh1.vertex_count() * 4);
        // mesh1's original vertex defaults to opaque white.
        assert_eq!(&colors[0..4], &[1.0, 1.0, 1.0, 1.0]);
        // mesh2's vertex carries its own red.
        assert_eq!(&colors[4..8], &[1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_bounds_of_empty_mesh() {
        let mesh = Mesh::new();
        assert_eq!(mesh.bounds(), ([0.0; 3], [0.0; 3]));
    }

    #[test]
    fn test_bounds_of_cube() {
        use crate::manifold::constructors::build_cube;
        let mut mesh = Mesh::new();
        build_cube(&mut mesh, [2.0, 2.0, 2.0], true);
        let (min, max) = mesh.bounds();
        assert!((min[0] + 1.0).abs() < 1e-4);
        assert!((max[0] - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_volume_of_cube() {
        use crate::manifold::constructors::build_cube;
        let mut mesh = Mesh::new();
        build_cube(&mut mesh, [2.0, 3.0, 4.0], false);
        assert!((mesh.volume() - 24.0).abs() < 1e-2);
    }

    #[test]
    fn test_surface_area_of_cube() {
        use crate::manifold::constructors::build_cube;
        let mut mesh = Mesh::new();
        build_cube(&mut mesh, [1.0, 1.0, 1.0], false);
        assert!((mesh.surface_area() - 6.0).abs() < 1e-2);
    }
}
