use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub span: Span,
    pub hint: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    Parse,
    Ast,
    Eval,
    Kernel,
    Wasm,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceDiagnostic {
    pub stage: Stage,
    pub message: String,
    pub span: Span,
    pub file: Option<String>,
    pub hint: Option<String>,
    pub causes: Option<Vec<TraceDiagnostic>>,
}

/// Axis-aligned bounding box, flat `[x, y, z]` corners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: [f32; 3],
    pub max: [f32; 3],
}

/// Summary statistics carried alongside a [`Geometry`] for quick inspection
/// without walking the vertex/index arrays.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeometryStats {
    pub vertex_count: usize,
    pub face_count: usize,
    pub volume: f64,
}

/// One chunk of a [`Geometry::Chunked`] mesh. `indices` are local to this
/// chunk's own `vertices`; concatenating chunks in order and offsetting
/// indices by the running vertex count reconstructs the full mesh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryChunk {
    pub vertices: Vec<f32>,
    pub indices: Vec<u32>,
    pub normals: Vec<f32>,
}

/// The on-wire mesh record (§3.5). A flat, JSON-clean representation of a
/// watertight manifold plus the metadata (§3.4) that survived evaluation.
///
/// Meshes past a configurable vertex threshold are emitted as `Chunked`
/// instead of `Single` so a single serialized message stays bounded; a
/// client reassembles the full mesh by concatenating chunks and offsetting
/// each chunk's local indices by the running vertex count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "is_chunked")]
pub enum Geometry {
    #[serde(rename = "false")]
    Single {
        vertices: Vec<f32>,
        indices: Vec<u32>,
        normals: Vec<f32>,
        bounds: Bounds,
        stats: GeometryStats,
        color: Option<[f32; 4]>,
        modifier: Option<String>,
    },
    #[serde(rename = "true")]
    Chunked {
        chunks: Vec<GeometryChunk>,
        total_vertices: usize,
        total_faces: usize,
        bounds: Bounds,
        stats: GeometryStats,
    },
}

/// A fixed error code, always `"<category>.<specific>"` (§6.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCategory {
    #[serde(rename = "syntax")]
    Syntax,
    #[serde(rename = "logic")]
    Logic,
    #[serde(rename = "system")]
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorSeverity {
    #[serde(rename = "warning")]
    Warning,
    #[serde(rename = "error")]
    Error,
    #[serde(rename = "critical")]
    Critical,
}

/// Rich, client-renderable error payload (§6.5). `code` is always one of the
/// fixed strings enumerated there (e.g. `syntax.parse_error`,
/// `logic.undefined_variable`, `system.timeout`) — callers should construct
/// `code` via the `EnhancedError::new` constructors rather than by hand to
/// keep it in sync with `category`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnhancedError {
    pub category: ErrorCategory,
    pub severity: ErrorSeverity,
    pub code: String,
    pub message: String,
    pub line: Option<u32>,
    pub column: Option<u32>,
    pub stack: Option<String>,
    pub code_snippet: Option<String>,
    pub context: Option<String>,
    pub suggestion: Option<String>,
    pub fix_example: Option<String>,
    pub documentation: Option<String>,
}

impl EnhancedError {
    /// Build an [`EnhancedError`] from a fixed `category.specific` code,
    /// inferring `category`/`severity` from the code's prefix and sensible
    /// defaults (errors are `error` severity unless overridden).
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        let category = match code.split('.').next() {
            Some("syntax") => ErrorCategory::Syntax,
            Some("logic") => ErrorCategory::Logic,
            _ => ErrorCategory::System,
        };
        let severity = match code {
            "system.timeout" | "system.memory_exceeded" | "system.wasm_crash" => {
                ErrorSeverity::Critical
            }
            _ => ErrorSeverity::Error,
        };
        Self {
            category,
            severity,
            code: code.to_string(),
            message: message.into(),
            line: None,
            column: None,
            stack: None,
            code_snippet: None,
            context: None,
            suggestion: None,
            fix_example: None,
            documentation: None,
        }
    }

    pub fn with_location(mut self, line: u32, column: u32) -> Self {
        self.line = Some(line);
        self.column = Some(column);
        self
    }
}

/// Evaluation language discriminant (§6.1) — OpenSCAD source or a Shape DSL
/// script evaluated by the host-language evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "openscad")]
    OpenScad,
    #[serde(rename = "javascript")]
    JavaScript,
}

/// The stable evaluation RPC request (§6.1).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvalRequest {
    pub code: String,
    pub language: Language,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub t: Option<f64>,
}

/// The stable evaluation RPC response (§6.1).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvalResponse {
    pub success: bool,
    pub geometry: Option<Geometry>,
    pub errors: Vec<EnhancedError>,
    pub execution_time_ms: f64,
    pub language: Language,
}