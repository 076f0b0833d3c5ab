//! # OpenSCAD Engine
//!
//! Host-facing evaluation engine sitting on top of `openscad-eval` and
//! `openscad-shape`: the plugin registry (§4.7), the
//! concurrency/cancellation/timeout/memory-cap model (§5), and the stable
//! evaluation RPC contract (§6.1).
//!
//! ## Architecture
//!
//! ```text
//! EvalRequest → Engine::evaluate → openscad-eval (+ PluginRegistry) → manifold-rs → EvalResponse
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use openscad_engine::{Engine, CancellationToken};
//! use pipeline_types::{EvalRequest, Language};
//!
//! # async fn run() {
//! let engine = Engine::new();
//! let response = engine
//!     .evaluate(
//!         EvalRequest { code: "cube(10);".to_string(), language: Language::OpenScad, t: None },
//!         CancellationToken::new(),
//!     )
//!     .await;
//! assert!(response.success);
//! # }
//! ```

pub mod cancellation;
pub mod engine;
pub mod js_dsl;
pub mod registry;

pub use cancellation::CancellationToken;
pub use engine::{Engine, EngineConfig};
pub use registry::{Plugin, PluginRegistry, RegistryError};
