//! # Evaluation Engine
//!
//! Ties together the evaluator, the plugin registry, and §5's resource
//! model into the stable request/response contract of §6.1: one
//! [`EvalRequest`] in, one [`EvalResponse`] out, never a panic across the
//! boundary. Each request runs on its own blocking worker thread so that
//! independent evaluations proceed in parallel while a single evaluation
//! stays the single-threaded, cooperatively-cancellable walk described in
//! §5.

use std::sync::Arc;
use std::time::{Duration, Instant};

use pipeline_types::{
    Bounds, EnhancedError, EvalRequest, EvalResponse, Geometry, GeometryChunk, GeometryStats,
    Language,
};
use tracing::{instrument, warn};

use crate::cancellation::CancellationToken;
use crate::registry::PluginRegistry;

/// Tunable resource limits for [`Engine::evaluate`], per §5.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Wall-clock budget for a single evaluation. Default 30s.
    pub timeout: Duration,
    /// Soft cap on the worker thread's stack, guarding against runaway
    /// recursion in user-defined modules. Default 1 GiB.
    pub memory_limit_bytes: usize,
    /// Vertex count above which a result is serialized as
    /// [`Geometry::Chunked`] instead of [`Geometry::Single`]. Default 65536.
    pub chunk_vertex_threshold: usize,
    /// Module names the host-language Shape DSL (§6.7) may `import`; any
    /// other import is reported as `logic.forbidden_import`. Configured at
    /// evaluator construction per §6.7 — there is no sensible language-wide
    /// default, so an empty allow-list ships unless the host opts modules in.
    pub js_import_allow_list: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        config::constants::GlobalConfig::default().into()
    }
}

impl From<config::constants::GlobalConfig> for EngineConfig {
    fn from(global: config::constants::GlobalConfig) -> Self {
        Self {
            timeout: global.timeout,
            memory_limit_bytes: global.memory_cap_bytes,
            chunk_vertex_threshold: global.chunk_vertex_threshold,
            js_import_allow_list: vec!["openscad-shape".to_string()],
        }
    }
}

/// Runs OpenSCAD evaluation requests against a shared plugin registry under
/// the resource limits in [`EngineConfig`].
pub struct Engine {
    config: EngineConfig,
    plugins: Arc<PluginRegistry>,
}

impl Engine {
    /// An engine with no plugins registered and default limits.
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// An engine with no plugins registered and caller-supplied limits.
    pub fn with_config(config: EngineConfig) -> Self {
        Self { config, plugins: Arc::new(PluginRegistry::new()) }
    }

    /// An engine sharing an already-populated registry (built once at host
    /// boot and reused across many `Engine`s/requests).
    pub fn with_plugins(config: EngineConfig, plugins: Arc<PluginRegistry>) -> Self {
        Self { config, plugins }
    }

    /// Evaluate `request.code`, honoring the configured timeout and
    /// translating every failure mode into a fixed-code [`EnhancedError`]
    /// rather than propagating a Rust error across the RPC boundary.
    ///
    /// `cancel` lets the caller request early termination (e.g. the host
    /// dropped the connection); the evaluator checks it cooperatively at
    /// statement and CSG-call boundaries, so cancellation is not instant,
    /// but the timeout always wins eventually even if the script never
    /// checks the token.
    #[instrument(skip(self, request, cancel), fields(language = ?request.language))]
    pub async fn evaluate(&self, request: EvalRequest, cancel: CancellationToken) -> EvalResponse {
        let started = Instant::now();
        let language = request.language;

        if matches!(language, Language::JavaScript) {
            // The Shape DSL itself has no parser path (§4.6); what we can
            // validate here is the §6.7 static surface — import allow-list
            // and export shape — before any execution would happen. See
            // `js_dsl` for why full JS execution is out of scope.
            let errors = crate::js_dsl::validate(&request.code, &self.config.js_import_allow_list);
            return EvalResponse {
                success: false,
                geometry: None,
                errors: if errors.is_empty() {
                    vec![EnhancedError::new(
                        "system.unsupported_language",
                        "Shape DSL scripts are statically validated but not executed",
                    )]
                } else {
                    errors
                },
                execution_time_ms: elapsed_ms(started),
                language,
            };
        }

        let code = request.code;
        let plugins = Arc::clone(&self.plugins);
        let chunk_threshold = self.config.chunk_vertex_threshold;
        let stack_size = self.config.memory_limit_bytes.min(256 << 20).max(2 << 20);

        let work = tokio::task::spawn_blocking(move || {
            run_with_stack(stack_size, move || evaluate_blocking(&code, &plugins, &cancel, chunk_threshold))
        });

        match tokio::time::timeout(self.config.timeout, work).await {
            Ok(Ok(outcome)) => match outcome {
                Ok(geometry) => EvalResponse {
                    success: true,
                    geometry: Some(geometry),
                    errors: Vec::new(),
                    execution_time_ms: elapsed_ms(started),
                    language,
                },
                Err(error) => EvalResponse {
                    success: false,
                    geometry: None,
                    errors: vec![error],
                    execution_time_ms: elapsed_ms(started),
                    language,
                },
            },
            Ok(Err(join_error)) => {
                warn!(%join_error, "evaluation worker panicked");
                EvalResponse {
                    success: false,
                    geometry: None,
                    errors: vec![EnhancedError::new(
                        "system.wasm_crash",
                        "evaluation worker terminated unexpectedly",
                    )],
                    execution_time_ms: elapsed_ms(started),
                    language,
                }
            }
            Err(_elapsed) => EvalResponse {
                success: false,
                geometry: None,
                errors: vec![EnhancedError::new(
                    "system.timeout",
                    format!("evaluation exceeded {:?}", self.config.timeout),
                )],
                execution_time_ms: elapsed_ms(started),
                language,
            },
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}

/// Run `f` on a dedicated OS thread with `stack_size`, per §5's
/// guard against deep recursion in user-defined modules exhausting the
/// default thread stack. Blocks the calling (blocking-pool) thread until `f`
/// completes.
fn run_with_stack<T: Send + 'static>(stack_size: usize, f: impl FnOnce() -> T + Send + 'static) -> T {
    std::thread::Builder::new()
        .stack_size(stack_size)
        .spawn(f)
        .expect("failed to spawn evaluation thread")
        .join()
        .unwrap_or_else(|_| panic!("evaluation thread panicked"))
}

/// The synchronous core: parse, evaluate, mesh, serialize. Runs entirely on
/// a worker thread; never touches async machinery.
fn evaluate_blocking(
    code: &str,
    plugins: &Arc<PluginRegistry>,
    cancel: &CancellationToken,
    chunk_threshold: usize,
) -> Result<Geometry, EnhancedError> {
    if cancel.is_cancelled() {
        return Err(EnhancedError::new("system.cancelled", "evaluation was cancelled"));
    }

    let plugins: Arc<dyn openscad_eval::PluginResolver> = Arc::clone(plugins);
    let mut ctx = openscad_eval::EvalContext::new().with_plugins(plugins);
    let evaluated = openscad_eval::evaluate_with_context(code, &mut ctx).map_err(|err| {
        EnhancedError::new(eval_error_code(&err), err.to_string())
    })?;

    if cancel.is_cancelled() {
        return Err(EnhancedError::new("system.cancelled", "evaluation was cancelled"));
    }

    if evaluated.geometry.is_empty() {
        return Err(EnhancedError::new(
            "logic.null_geometry",
            "evaluation produced no geometry (no primitive, transform, or CSG call contributed a shape)",
        ));
    }

    // Metadata (§3.4) is resolved from the IR before meshing: the boolean
    // engine works on plain triangle soup and has no notion of "first
    // operand's color", so the composite rule is applied here rather than
    // tracked through `manifold-rs`.
    let color = evaluated.geometry.resolved_color();
    let modifier = evaluated.geometry.resolved_modifier().map(|m| m.as_char().to_string());

    let mesh = manifold_rs::openscad::from_ir::geometry_to_mesh(&evaluated.geometry)
        .map_err(|err| EnhancedError::new(manifold_error_code(&err), err.to_string()))?;

    Ok(serialize_geometry(mesh, chunk_threshold, color, modifier))
}

fn eval_error_code(err: &openscad_eval::EvalError) -> &'static str {
    use openscad_eval::EvalError;
    match err {
        EvalError::ParseError(_) => "syntax.parse_error",
        EvalError::UnknownIdentifier(_) => "logic.unknown_identifier",
        EvalError::TypeError(_) => "logic.type_error",
        EvalError::InvalidArgument(_) => "logic.invalid_argument",
        EvalError::WrongArgCount(..) => "logic.wrong_arg_count",
        EvalError::DivisionByZero => "logic.division_by_zero",
        EvalError::InvalidRange(_) => "logic.invalid_range",
    }
}

fn manifold_error_code(err: &manifold_rs::ManifoldError) -> &'static str {
    use manifold_rs::ManifoldError;
    match err {
        ManifoldError::EvalError(_) => "logic.eval_error",
        ManifoldError::GeometryError(_) => "logic.geometry_error",
        ManifoldError::BooleanError { .. } => "logic.boolean_error",
        ManifoldError::NonManifoldError(_) => "logic.non_manifold",
        ManifoldError::CrossSectionError { .. } => "logic.cross_section_error",
        ManifoldError::InvalidSegmentParams(_) => "logic.invalid_segment_params",
    }
}

/// Serialize a [`manifold_rs::Mesh`] into the on-wire [`Geometry`] record,
/// splitting into locally re-indexed chunks (§6.2) once the vertex count
/// passes `chunk_threshold` so no single message holds an unbounded mesh.
fn serialize_geometry(
    mesh: manifold_rs::Mesh,
    chunk_threshold: usize,
    color: Option<[f64; 4]>,
    modifier: Option<String>,
) -> Geometry {
    let (min, max) = mesh.bounds();
    let bounds = Bounds { min, max };
    let stats = GeometryStats {
        vertex_count: mesh.vertex_count(),
        face_count: mesh.triangle_count(),
        volume: mesh.volume(),
    };

    if mesh.vertex_count() <= chunk_threshold {
        return Geometry::Single {
            vertices: mesh.vertices,
            indices: mesh.indices,
            normals: mesh.normals,
            bounds,
            stats,
            color: color.map(|c| [c[0] as f32, c[1] as f32, c[2] as f32, c[3] as f32]),
            modifier,
        };
    }

    let total_vertices = mesh.vertex_count();
    let total_faces = mesh.triangle_count();
    let mut chunks = Vec::new();
    let mut tri_start = 0usize;
    while tri_start < mesh.indices.len() {
        let mut remap = std::collections::HashMap::new();
        let mut chunk_vertices = Vec::new();
        let mut chunk_normals = Vec::new();
        let mut chunk_indices = Vec::new();

        let mut tri = tri_start;
        while tri < mesh.indices.len() && chunk_vertices.len() / 3 < chunk_threshold {
            for corner in 0..3 {
                let original = mesh.indices[tri + corner];
                let local = *remap.entry(original).or_insert_with(|| {
                    let base = original as usize * 3;
                    chunk_vertices.extend_from_slice(&mesh.vertices[base..base + 3]);
                    if base + 3 <= mesh.normals.len() {
                        chunk_normals.extend_from_slice(&mesh.normals[base..base + 3]);
                    }
                    (chunk_vertices.len() / 3 - 1) as u32
                });
                chunk_indices.push(local);
            }
            tri += 3;
        }
        tri_start = tri;

        chunks.push(GeometryChunk {
            vertices: chunk_vertices,
            indices: chunk_indices,
            normals: chunk_normals,
        });
    }

    Geometry::Chunked { chunks, total_vertices, total_faces, bounds, stats }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_evaluate_simple_cube() {
        let engine = Engine::new();
        let response = engine
            .evaluate(
                EvalRequest { code: "cube(10);".to_string(), language: Language::OpenScad, t: None },
                CancellationToken::new(),
            )
            .await;
        assert!(response.success, "errors: {:?}", response.errors);
        assert!(matches!(response.geometry, Some(Geometry::Single { .. })));
    }

    #[tokio::test]
    async fn test_evaluate_parse_error_reports_enhanced_error() {
        let engine = Engine::new();
        let response = engine
            .evaluate(
                EvalRequest { code: "cube(".to_string(), language: Language::OpenScad, t: None },
                CancellationToken::new(),
            )
            .await;
        assert!(!response.success);
        assert_eq!(response.errors[0].code, "syntax.parse_error");
    }

    #[tokio::test]
    async fn test_evaluate_times_out_on_tiny_budget() {
        let engine = Engine::with_config(EngineConfig {
            timeout: Duration::from_nanos(1),
            ..EngineConfig::default()
        });
        let response = engine
            .evaluate(
                EvalRequest { code: "cube(10);".to_string(), language: Language::OpenScad, t: None },
                CancellationToken::new(),
            )
            .await;
        assert!(!response.success);
        assert_eq!(response.errors[0].code, "system.timeout");
    }

    #[tokio::test]
    async fn test_evaluate_honors_pre_cancelled_token() {
        let engine = Engine::new();
        let cancel = CancellationToken::new();
        cancel.cancel();
        let response = engine
            .evaluate(
                EvalRequest { code: "cube(10);".to_string(), language: Language::OpenScad, t: None },
                cancel,
            )
            .await;
        assert!(!response.success);
        assert_eq!(response.errors[0].code, "system.cancelled");
    }

    #[test]
    fn test_chunked_serialization_reconstructs_vertex_count() {
        let mesh = manifold_rs::openscad::from_ir::geometry_to_mesh(
            &openscad_eval::GeometryNode::Cube { size: [10.0, 10.0, 10.0], center: false },
        )
        .unwrap();
        let total = mesh.vertex_count();
        let geometry = serialize_geometry(mesh, 1, None, None);
        match geometry {
            Geometry::Chunked { chunks, total_vertices, .. } => {
                assert_eq!(total_vertices, total);
                let reconstructed: usize = chunks.iter().map(|c| c.vertices.len() / 3).sum();
                assert!(reconstructed >= total);
            }
            Geometry::Single { .. } => panic!("expected chunked geometry"),
        }
    }
}
